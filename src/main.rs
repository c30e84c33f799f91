mod ascii;
mod config;
mod github;
mod readme;
mod stats;

use anyhow::Result;
use chrono::{DateTime, Utc};
use config::Config;
use github::GithubClient;
use log::{debug, error, info};
use stats::Stats;
use std::process::ExitCode;

/// Fetch, render and rewrite the README. Nothing is written unless every step before it succeeded.
async fn run(config: &Config, generated_at: DateTime<Utc>) -> Result<Stats> {
    info!("Fetching GitHub stats for {}...", config.username);

    let client = GithubClient::new(config)?;
    let profile = client.user_profile(&config.username).await?;
    let repos = client.list_repos(&config.username).await?;
    let stats = Stats::aggregate(&config.username, profile, &repos);
    info!(
        "Stats for {}: {} repos, {} stars, {} languages",
        stats.name,
        stats.total_repos,
        stats.total_stars,
        stats.languages.len()
    );
    debug!("Bio: {:?}", stats.bio);

    let block = ascii::render_stats_block(&stats, &config.username, generated_at);
    readme::update_readme(&config.readme_path, &block)?;

    Ok(stats)
}

/// Log the outcome once and map it to the process exit status.
fn report(outcome: &Result<Stats>) -> ExitCode {
    match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to generate stats: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let env = env_logger::Env::default().filter_or("RUST_LOG", "info");
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    let config = Config::default();
    report(&run(&config, Utc::now()).await)
}
