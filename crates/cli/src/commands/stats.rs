//! `stats overview|videos|channels|playlists|database`.

use std::fmt::{self, Write};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tubearchive_core::report::{format_bytes, format_count, format_system_time, format_timestamp};
use tubearchive_core::{
    ApiConfig, CacheTable, CatalogCache, ChannelStats, PlaylistStats, VideoStats,
};

use crate::app::App;
use crate::cli::StatsView;

/// Size and location of the database file.
struct DatabaseFile {
    path: PathBuf,
    size: u64,
    modified: Option<String>,
}

impl DatabaseFile {
    fn inspect(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        Some(Self {
            path: fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()),
            size: metadata.len(),
            modified: metadata.modified().ok().map(format_system_time),
        })
    }
}

pub fn run(app: &App, view: StatsView) -> Result<()> {
    let cache = &app.cache;
    let db_file = cache.path().and_then(DatabaseFile::inspect);

    let text = match view {
        StatsView::Overview => {
            let counts = [
                cache.table_count(CacheTable::Videos)?,
                cache.table_count(CacheTable::Channels)?,
                cache.table_count(CacheTable::Playlists)?,
            ];
            let config = cache
                .api_config()
                .context("Failed to read the configuration")?;
            render_overview(counts, db_file.as_ref(), config.as_ref())?
        }
        StatsView::Videos => render_videos(&cache.video_stats()?)?,
        StatsView::Channels => render_channels(&cache.channel_stats()?)?,
        StatsView::Playlists => render_playlists(&cache.playlist_stats()?)?,
        StatsView::Database => {
            let mut tables = Vec::with_capacity(CacheTable::ALL.len());
            for table in CacheTable::ALL {
                tables.push((table, cache.table_count(table)?));
            }
            render_database(db_file.as_ref(), &tables)?
        }
    };

    print!("{}", text);
    Ok(())
}

fn heading(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "=".repeat(title.len().max(20)))
}

fn render_overview(
    [videos, channels, playlists]: [u64; 3],
    db_file: Option<&DatabaseFile>,
    config: Option<&ApiConfig>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    heading(&mut out, "Tube Archivist CLI - Cache Statistics")?;
    writeln!(out, "Videos:    {}", format_count(videos))?;
    writeln!(out, "Channels:  {}", format_count(channels))?;
    writeln!(out, "Playlists: {}", format_count(playlists))?;

    if let Some(db) = db_file {
        writeln!(out, "\nDatabase size: {}", format_bytes(db.size))?;
        writeln!(out, "Database path: {}", db.path.display())?;
    }

    match config {
        Some(config) => {
            writeln!(out, "\nConfiguration: configured")?;
            writeln!(out, "Tube Archivist URL: {}", config.base_url)?;
        }
        None => {
            writeln!(out, "\nConfiguration: not configured")?;
        }
    }
    Ok(out)
}

fn render_videos(stats: &VideoStats) -> Result<String, fmt::Error> {
    let mut out = String::new();
    heading(&mut out, "Video Statistics")?;
    if stats.total == 0 {
        writeln!(out, "No videos in cache.")?;
        return Ok(out);
    }

    writeln!(out, "Total videos: {}", format_count(stats.total))?;
    writeln!(out, "Active videos: {}", format_count(stats.active))?;
    writeln!(out, "Inactive videos: {}", format_count(stats.inactive))?;
    if let Some(total) = stats.total_size_bytes {
        writeln!(out, "Total video size: {}", format_bytes(total))?;
        writeln!(
            out,
            "Average video size: {}",
            format_bytes(stats.avg_size_bytes.unwrap_or(0))
        )?;
    }
    if let Some(latest) = stats.latest_download {
        writeln!(out, "Latest download: {}", format_timestamp(latest))?;
    }
    Ok(out)
}

fn render_channels(stats: &ChannelStats) -> Result<String, fmt::Error> {
    let mut out = String::new();
    heading(&mut out, "Channel Statistics")?;
    if stats.total == 0 {
        writeln!(out, "No channels in cache.")?;
        return Ok(out);
    }

    writeln!(out, "Total channels: {}", format_count(stats.total))?;
    writeln!(out, "Subscribed channels: {}", format_count(stats.subscribed))?;
    writeln!(out, "Active channels: {}", format_count(stats.active))?;
    Ok(out)
}

fn render_playlists(stats: &PlaylistStats) -> Result<String, fmt::Error> {
    let mut out = String::new();
    heading(&mut out, "Playlist Statistics")?;
    if stats.total == 0 {
        writeln!(out, "No playlists in cache.")?;
        return Ok(out);
    }

    writeln!(out, "Total playlists: {}", format_count(stats.total))?;
    writeln!(out, "Active playlists: {}", format_count(stats.active))?;
    if stats.total_entries > 0 {
        writeln!(
            out,
            "Total playlist entries: {}",
            format_count(stats.total_entries)
        )?;
        if let Some(avg) = stats.avg_entries {
            writeln!(out, "Average entries per playlist: {:.1}", avg)?;
        }
    }
    Ok(out)
}

fn render_database(
    db_file: Option<&DatabaseFile>,
    tables: &[(CacheTable, u64)],
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    heading(&mut out, "Database Information")?;
    let Some(db) = db_file else {
        writeln!(out, "Database file not found.")?;
        return Ok(out);
    };

    writeln!(out, "File path: {}", db.path.display())?;
    writeln!(out, "File size: {}", format_bytes(db.size))?;
    if let Some(modified) = &db.modified {
        writeln!(out, "Last modified: {}", modified)?;
    }

    writeln!(out, "\nTables:")?;
    for (table, count) in tables {
        writeln!(out, "  {}: {} records", table.name(), format_count(*count))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_file() -> DatabaseFile {
        DatabaseFile {
            path: PathBuf::from("/data/tubearchive.sqlite"),
            size: 3 * 1024 * 1024,
            modified: Some("2024-01-15 10:00:00".to_string()),
        }
    }

    #[test]
    fn test_render_overview() {
        let config = ApiConfig::new("https://tube.local", "secret");
        let text = render_overview([1234, 5, 0], Some(&db_file()), Some(&config)).unwrap();

        assert!(text.contains("Videos:    1,234"));
        assert!(text.contains("Channels:  5"));
        assert!(text.contains("Database size: 3.0 MB"));
        assert!(text.contains("Tube Archivist URL: https://tube.local"));
        assert!(!text.contains("secret"));
    }

    #[test]
    fn test_render_overview_unconfigured() {
        let text = render_overview([0, 0, 0], None, None).unwrap();
        assert!(text.contains("Configuration: not configured"));
        assert!(!text.contains("Database size"));
    }

    #[test]
    fn test_render_videos() {
        let stats = VideoStats {
            total: 3,
            active: 2,
            inactive: 1,
            total_size_bytes: Some(3 * 1024),
            avg_size_bytes: Some(1024),
            latest_download: None,
        };
        let text = render_videos(&stats).unwrap();
        assert!(text.contains("Total videos: 3"));
        assert!(text.contains("Inactive videos: 1"));
        assert!(text.contains("Total video size: 3.0 KB"));
        assert!(text.contains("Average video size: 1.0 KB"));
        assert!(!text.contains("Latest download"));
    }

    #[test]
    fn test_render_empty_sections() {
        assert!(render_videos(&VideoStats::default()).unwrap().contains("No videos in cache."));
        assert!(render_channels(&ChannelStats::default()).unwrap().contains("No channels in cache."));
        assert!(render_playlists(&PlaylistStats::default()).unwrap().contains("No playlists in cache."));
    }

    #[test]
    fn test_render_playlists_average() {
        let stats = PlaylistStats {
            total: 3,
            active: 3,
            total_entries: 10,
            avg_entries: Some(10.0 / 3.0),
        };
        let text = render_playlists(&stats).unwrap();
        assert!(text.contains("Total playlist entries: 10"));
        assert!(text.contains("Average entries per playlist: 3.3"));
    }

    #[test]
    fn test_render_database() {
        let tables = [(CacheTable::Videos, 1500), (CacheTable::Config, 1)];
        let text = render_database(Some(&db_file()), &tables).unwrap();
        assert!(text.contains("File size: 3.0 MB"));
        assert!(text.contains("Last modified: 2024-01-15 10:00:00"));
        assert!(text.contains("  videos: 1,500 records"));
        assert!(text.contains("  config: 1 records"));

        assert!(render_database(None, &tables).unwrap().contains("Database file not found."));
    }
}
