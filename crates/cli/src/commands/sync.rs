//! `sync video|playlist|channel|all`.

use anyhow::{Context, Result};
use tubearchive_core::{StopReason, SyncOrchestrator, SyncReport};

use crate::app::App;
use crate::cli::SyncTarget;

pub async fn run(app: &App, target: SyncTarget) -> Result<()> {
    let api = app.connected_api().await?;
    let sync = SyncOrchestrator::new(api, app.cache.clone());

    match target.kind() {
        Some(kind) => {
            println!("Syncing {}...", kind.plural());
            let report = sync
                .sync_resource(kind)
                .await
                .with_context(|| format!("Failed to sync {}", kind.plural()))?;
            println!("{}", summary_line(&report));
        }
        None => {
            println!("Syncing all data (videos, playlists, channels)...");
            let reports = sync.sync_all().await.context("Sync aborted")?;
            for report in &reports {
                println!("{}", summary_line(report));
            }
            if reports.iter().any(|r| r.partial) {
                println!("Sync finished with incomplete data, see the messages above.");
            } else {
                println!("All data synced successfully.");
            }
        }
    }
    Ok(())
}

fn summary_line(report: &SyncReport) -> String {
    let line = format!(
        "Synced {} {} to local cache.",
        report.synced,
        report.kind.plural()
    );
    match report.stop_reason {
        StopReason::FetchFailed { page } => format!(
            "{} Incomplete: fetching page {} failed, earlier pages were kept.",
            line, page
        ),
        StopReason::PageNotAdvanced { requested, .. } => format!(
            "{} Incomplete: the server did not return page {}, earlier pages were kept.",
            line, requested
        ),
        _ => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubearchive_core::ResourceKind;

    fn report(kind: ResourceKind, synced: usize, stop_reason: StopReason) -> SyncReport {
        SyncReport {
            kind,
            synced,
            pages_fetched: 1,
            partial: stop_reason.is_failure(),
            stop_reason,
            completed_at: Default::default(),
        }
    }

    #[test]
    fn test_summary_line_complete() {
        let r = report(
            ResourceKind::Video,
            60,
            StopReason::ReachedLastPage { current: 2, last: 2 },
        );
        assert_eq!(summary_line(&r), "Synced 60 videos to local cache.");
    }

    #[test]
    fn test_summary_line_partial() {
        let r = report(ResourceKind::Channel, 50, StopReason::FetchFailed { page: 2 });
        assert_eq!(
            summary_line(&r),
            "Synced 50 channels to local cache. Incomplete: fetching page 2 failed, earlier pages were kept."
        );

        let r = report(
            ResourceKind::Video,
            50,
            StopReason::PageNotAdvanced {
                requested: 2,
                reported: 1,
            },
        );
        assert!(r.partial);
        assert!(summary_line(&r).ends_with("the server did not return page 2, earlier pages were kept."));
    }
}
