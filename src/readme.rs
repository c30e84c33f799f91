use anyhow::{Context, Result};
use log::{debug, info};
use regex::{NoExpand, Regex};
use std::fs;
use std::io;
use std::path::Path;

pub const START_MARKER: &str = "<!-- GITHUB-STATS:START -->";
pub const END_MARKER: &str = "<!-- GITHUB-STATS:END -->";

/// Older READMEs carried the stats under this heading, running up to the next tag.
const LEGACY_HEADING: &str = r"<h2>Stats</h2>[^<]*";

/// Byte range of the first START..END pair, END included. END is searched after START.
fn marked_region(document: &str) -> Option<(usize, usize)> {
    let start = document.find(START_MARKER)?;
    let after_start = start + START_MARKER.len();
    let end = document[after_start..].find(END_MARKER)?;
    Some((start, after_start + end + END_MARKER.len()))
}

/// Put `block` into `document` inside a fenced, marker-delimited section.
///
/// An existing START..END pair is replaced where it stands and nothing outside it
/// changes. Without one, the section replaces a legacy `<h2>Stats</h2>` region or
/// is prepended. The result is trimmed and ends with a single newline.
pub fn splice_stats(document: &str, block: &str) -> Result<String> {
    let section = format!("{START_MARKER}\n```\n{block}\n```\n{END_MARKER}");

    let updated = if let Some((start, end)) = marked_region(document) {
        format!("{}{section}{}", &document[..start], &document[end..])
    } else {
        let legacy =
            Regex::new(LEGACY_HEADING).context("Failed to compile legacy heading pattern")?;
        let section = format!("{section}\n\n");
        if legacy.is_match(document) {
            debug!("Replacing legacy stats heading");
            legacy.replacen(document, 1, NoExpand(&section)).into_owned()
        } else {
            format!("{section}{document}")
        }
    };

    Ok(format!("{}\n", updated.trim()))
}

/// Rewrite the stats section of the document at `path`. A missing file is treated as empty.
pub fn update_readme(path: &Path, block: &str) -> Result<()> {
    let current = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist yet, starting empty", path.display());
            String::new()
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let updated = splice_stats(&current, block)?;
    fs::write(path, updated).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Updated {} with ASCII stats", path.display());
    Ok(())
}
