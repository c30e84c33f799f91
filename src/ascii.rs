//! ascii.rs
//!
//! Fixed-width box-drawing panels for the stats section of the README.
//!
//! Every panel is 60 columns inside its `║` borders. Widths are measured in
//! terminal columns rather than bytes: block and box characters count as one
//! column, pictographs in U+1F300..=U+1F9FF count as two.

use chrono::{DateTime, Utc};
use log::debug;

use crate::stats::Stats;

pub const PANEL_WIDTH: usize = 60;
pub const BAR_WIDTH: usize = 25;
pub const TOP_LANGUAGES: usize = 10;
const CHART_HEIGHT: u64 = 10;
const BASELINE_WIDTH: usize = 54;
const LABEL_WIDTH: usize = 12;

const FILLED: char = '█';
const EMPTY: char = '░';
const CHART_CELL: &str = "  ████  ";
const CHART_GAP: &str = "        ";

/// Column width of `text`, counting wide pictographs as two columns.
pub fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| if ('\u{1F300}'..='\u{1F9FF}').contains(&c) { 2 } else { 1 })
        .sum()
}

/// Center `text` in `width` columns. The left side gets the floor of the
/// free space, the right side the remainder.
pub fn center_text(text: &str, width: usize) -> String {
    let free = width.saturating_sub(display_width(text));
    let left = free / 2;
    let right = free - left;
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

/// `width` cells, `round(percentage / 100 * width)` of them filled.
pub fn progress_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage / 100.0) * width as f64).round().clamp(0.0, width as f64) as usize;
    let mut bar = String::with_capacity(width * FILLED.len_utf8());
    bar.extend(std::iter::repeat_n(FILLED, filled));
    bar.extend(std::iter::repeat_n(EMPTY, width - filled));
    bar
}

/// Round to tenths from the exact decimal expansion of `value`, halves upward.
fn round_tenths(value: f64) -> f64 {
    let exact = format!("{value:.80}");
    let Some((whole, frac)) = exact.split_once('.') else {
        return value;
    };
    let digits = frac.as_bytes();
    let (Ok(whole), Some(&tenths), Some(&hundredths)) =
        (whole.parse::<u64>(), digits.first(), digits.get(1))
    else {
        return value;
    };

    let mut scaled = whole * 10 + u64::from(tenths - b'0');
    if hundredths >= b'5' {
        scaled += 1;
    }
    scaled as f64 / 10.0
}

/// Share of `count` in `total` as a percentage rounded to one decimal.
/// A zero total yields 0.0 instead of NaN.
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_tenths(count as f64 / total as f64 * 100.0)
}

/// Cut `text` to at most `width` columns.
fn truncate_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += display_width(c.encode_utf8(&mut [0; 4]));
            used <= width
        })
        .collect()
}

/// Line-by-line builder for one bordered panel.
struct Panel {
    lines: Vec<String>,
}

impl Panel {
    fn new() -> Self {
        Self {
            lines: vec![format!("╔{}╗", "═".repeat(PANEL_WIDTH))],
        }
    }

    fn line(&mut self, content: &str) -> &mut Self {
        let pad = PANEL_WIDTH.saturating_sub(display_width(content));
        self.lines.push(format!("║{content}{}║", " ".repeat(pad)));
        self
    }

    fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    fn centered(&mut self, text: &str) -> &mut Self {
        let content = center_text(text, PANEL_WIDTH);
        self.line(&content)
    }

    fn separator(&mut self) -> &mut Self {
        self.lines.push(format!("╠{}╣", "═".repeat(PANEL_WIDTH)));
        self
    }

    fn stat(&mut self, label: &str, value: u64) -> &mut Self {
        self.line(&format!("  {label}{value}"))
    }

    /// Title block: blank, title lines, blank, separator.
    fn header(&mut self, titles: &[&str]) -> &mut Self {
        self.blank();
        for title in titles {
            self.centered(title);
        }
        self.blank().separator()
    }

    fn finish(mut self) -> String {
        self.lines.push(format!("╚{}╝", "═".repeat(PANEL_WIDTH)));
        self.lines.join("\n")
    }
}

/// Headline counters: repository section followed by the social section.
pub fn render_summary(stats: &Stats, handle: &str) -> String {
    let handle_line = format!("@{handle}");
    let mut panel = Panel::new();
    panel.header(&["GitHub Statistics Dashboard", handle_line.as_str()]);

    panel
        .blank()
        .centered("Repository Statistics")
        .blank()
        .stat("Total Stars ......... ", stats.total_stars)
        .stat("Total Forks ......... ", stats.total_forks)
        .stat("Total Repos ......... ", stats.total_repos)
        .stat("Public Repos ........ ", stats.public_repos)
        .blank()
        .separator();

    panel
        .blank()
        .centered("Social Statistics")
        .blank()
        .stat("Followers ........... ", stats.followers)
        .stat("Following ........... ", stats.following)
        .blank();

    panel.finish()
}

/// Top languages with percentage bars. Percentages are relative to the
/// languages shown, not to every repository.
pub fn render_languages(stats: &Stats) -> String {
    if stats.languages.is_empty() {
        debug!("No repository declares a language, language panel has no rows");
    }

    let top = stats.languages.ranked(TOP_LANGUAGES);
    let total: u64 = top.iter().map(|(_, count)| count).sum();

    let mut panel = Panel::new();
    panel.header(&["Most Used Languages"]).blank();

    for (language, count) in top {
        let pct = percentage(count, total);
        let bar = progress_bar(pct, BAR_WIDTH);
        let label = format!("{pct:.1}%");
        let name = truncate_to_width(language, LABEL_WIDTH);
        panel.line(&format!("  {name:<LABEL_WIDTH$} {bar} {label:>6}"));
    }

    panel.blank();
    panel.finish()
}

/// Vertical bar chart of stars, forks, repos and followers, scaled to the largest.
pub fn render_chart(stats: &Stats) -> String {
    let metrics = [
        ("Stars", stats.total_stars),
        ("Forks", stats.total_forks),
        ("Repos", stats.total_repos),
        ("Follow", stats.followers),
    ];
    let max = metrics.iter().map(|(_, v)| *v).max().unwrap_or(0);

    let heights: Vec<u64> = metrics
        .iter()
        .map(|(_, value)| {
            if max == 0 {
                0
            } else {
                (*value as f64 / max as f64 * CHART_HEIGHT as f64).round() as u64
            }
        })
        .collect();

    let mut panel = Panel::new();
    panel.header(&["Statistics Overview"]);

    for level in (1..=CHART_HEIGHT).rev() {
        let bars: String = heights
            .iter()
            .map(|&h| if h >= level { CHART_CELL } else { CHART_GAP })
            .collect();
        panel.line(&format!("  {bars}"));
    }

    panel.line(&format!("  {}", "━".repeat(BASELINE_WIDTH)));

    let labels: String = metrics.iter().map(|(label, _)| format!("{label:<8}")).collect();
    panel.line(&format!("  {labels}"));

    let values: String = metrics.iter().map(|(_, value)| format!("{value:<8}")).collect();
    panel.line(&format!("  {values}"));

    panel.blank();
    panel.finish()
}

/// All three panels plus the footer, as placed inside the README code fence.
pub fn render_stats_block(stats: &Stats, handle: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        "{}\n\n{}\n\n{}\n\n---\n*Last updated: {}*\n*Generated automatically by GitHub Actions*",
        render_summary(stats, handle),
        render_languages(stats),
        render_chart(stats),
        generated_at.format("%a, %d %b %Y %H:%M:%S GMT"),
    )
}
