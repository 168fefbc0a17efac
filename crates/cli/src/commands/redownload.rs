//! `redownload resolution <height>|failed`.

use anyhow::{Context, Result};
use tubearchive_core::{RedownloadSummary, RedownloadTarget, Redownloader};

use super::confirm;
use crate::app::App;

pub async fn run(app: &App, target: RedownloadTarget, assume_yes: bool) -> Result<()> {
    let api = app.connected_api().await?;

    println!("Searching for {}...", describe(target));
    let videos = Redownloader::candidates(&app.cache, target)
        .context("Failed to select videos from the cache")?;

    if videos.is_empty() {
        println!("No {} found.", describe(target));
        return Ok(());
    }
    println!("Found {} {}.", videos.len(), describe(target));

    if !assume_yes
        && !confirm(&format!(
            "Do you want to redownload all {} videos?",
            videos.len()
        ))?
    {
        println!("Operation cancelled.");
        return Ok(());
    }

    let redownloader = Redownloader::new(api, app.settings.redownload.requests_per_minute);
    let summary = redownloader
        .run(&videos, |i, total, video| {
            println!(
                "[{}/{}] Redownloading: {} ({})",
                i, total, video.title, video.youtube_id
            );
        })
        .await;

    print!("{}", render_summary(&summary));
    Ok(())
}

fn describe(target: RedownloadTarget) -> String {
    match target {
        RedownloadTarget::Resolution(height) => format!("videos with {}p resolution", height),
        RedownloadTarget::Failed => "failed videos".to_string(),
    }
}

fn render_summary(summary: &RedownloadSummary) -> String {
    format!(
        "\nRedownload Summary:\nSuccessfully queued: {}\nFailed: {}\nTotal videos processed: {}\n",
        summary.queued, summary.failed, summary.total
    )
}
