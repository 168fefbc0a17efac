//! `search videos|channels|playlists|all <query>`.

use std::fmt::{self, Write};

use anyhow::Result;
use tubearchive_core::report::{truncate, DESCRIPTION_LIMIT};
use tubearchive_core::{ChannelHit, PlaylistHit, VideoHit};

use super::rule;
use crate::app::App;
use crate::cli::SearchScope;

/// Result caps for `search all`.
const ALL_VIDEO_LIMIT: u32 = 50;
const ALL_CHANNEL_LIMIT: u32 = 20;
const ALL_PLAYLIST_LIMIT: u32 = 20;
/// Matches listed per kind by `search all`.
const PREVIEW_COUNT: usize = 5;
/// Tags listed per video.
const TAG_COUNT: usize = 5;

pub fn run(app: &App, scope: &SearchScope) -> Result<()> {
    let query = scope.query();
    let cache = &app.cache;

    let text = match scope {
        SearchScope::Videos { .. } => render_videos(&query, &cache.search_videos(&query, None)?)?,
        SearchScope::Channels { .. } => {
            render_channels(&query, &cache.search_channels(&query, None)?)?
        }
        SearchScope::Playlists { .. } => {
            render_playlists(&query, &cache.search_playlists(&query, None)?)?
        }
        SearchScope::All { .. } => render_all(
            &query,
            &cache.search_videos(&query, Some(ALL_VIDEO_LIMIT))?,
            &cache.search_channels(&query, Some(ALL_CHANNEL_LIMIT))?,
            &cache.search_playlists(&query, Some(ALL_PLAYLIST_LIMIT))?,
        )?,
    };

    print!("{}", text);
    Ok(())
}

fn write_description(out: &mut String, description: Option<&str>) -> fmt::Result {
    if let Some(description) = description.filter(|d| !d.is_empty()) {
        writeln!(
            out,
            "Description: {}",
            truncate(description, DESCRIPTION_LIMIT)
        )?;
    }
    Ok(())
}

fn active_label(active: bool) -> &'static str {
    if active {
        "Active"
    } else {
        "Inactive"
    }
}

fn render_videos(query: &str, hits: &[VideoHit]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Searching videos for: '{}'", query)?;
    if hits.is_empty() {
        writeln!(out, "No videos found matching your search.")?;
        return Ok(out);
    }

    writeln!(out, "Found {} video(s):", hits.len())?;
    writeln!(out, "{}", rule())?;
    for hit in hits {
        writeln!(out, "Title: {}", hit.title)?;
        writeln!(out, "ID: {}", hit.youtube_id)?;
        writeln!(out, "Channel: {}", hit.channel_name)?;
        writeln!(
            out,
            "Published: {}",
            hit.published.as_deref().unwrap_or("Unknown")
        )?;
        if !hit.tags.is_empty() {
            let tags: Vec<&str> = hit.tags.iter().take(TAG_COUNT).map(String::as_str).collect();
            writeln!(out, "Tags: {}", tags.join(", "))?;
        }
        writeln!(out, "{}", rule())?;
    }
    Ok(out)
}

fn render_channels(query: &str, hits: &[ChannelHit]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Searching channels for: '{}'", query)?;
    if hits.is_empty() {
        writeln!(out, "No channels found matching your search.")?;
        return Ok(out);
    }

    writeln!(out, "Found {} channel(s):", hits.len())?;
    writeln!(out, "{}", rule())?;
    for hit in hits {
        let mut status = Vec::with_capacity(2);
        if hit.subscribed {
            status.push("Subscribed");
        }
        status.push(active_label(hit.active));

        writeln!(out, "Name: {}", hit.channel_name)?;
        writeln!(out, "ID: {}", hit.channel_id)?;
        writeln!(out, "Status: {}", status.join(" | "))?;
        write_description(&mut out, hit.channel_description.as_deref())?;
        writeln!(out, "{}", rule())?;
    }
    Ok(out)
}

fn render_playlists(query: &str, hits: &[PlaylistHit]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Searching playlists for: '{}'", query)?;
    if hits.is_empty() {
        writeln!(out, "No playlists found matching your search.")?;
        return Ok(out);
    }

    writeln!(out, "Found {} playlist(s):", hits.len())?;
    writeln!(out, "{}", rule())?;
    for hit in hits {
        writeln!(out, "Name: {}", hit.playlist_name)?;
        writeln!(out, "ID: {}", hit.playlist_id)?;
        writeln!(
            out,
            "Channel: {}",
            hit.playlist_channel.as_deref().unwrap_or("Unknown")
        )?;
        writeln!(out, "Entries: {}", hit.entry_count)?;
        writeln!(out, "Status: {}", active_label(hit.active))?;
        write_description(&mut out, hit.playlist_description.as_deref())?;
        writeln!(out, "{}", rule())?;
    }
    Ok(out)
}

/// Write the "Found N" header, up to `PREVIEW_COUNT` lines and a remainder note.
fn write_preview<T>(
    out: &mut String,
    title: &str,
    noun: &str,
    hits: &[T],
    line: impl Fn(&T) -> String,
) -> fmt::Result {
    writeln!(out, "\n{}:", title)?;
    if hits.is_empty() {
        writeln!(out, "  No {}s found", noun)?;
        return Ok(());
    }

    writeln!(out, "Found {} {}(s):", hits.len(), noun)?;
    for (i, hit) in hits.iter().take(PREVIEW_COUNT).enumerate() {
        writeln!(out, "  {}. {}", i + 1, line(hit))?;
    }
    if hits.len() > PREVIEW_COUNT {
        writeln!(out, "  ... and {} more", hits.len() - PREVIEW_COUNT)?;
    }
    Ok(())
}

fn render_all(
    query: &str,
    videos: &[VideoHit],
    channels: &[ChannelHit],
    playlists: &[PlaylistHit],
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Searching all content for: '{}'", query)?;
    writeln!(out, "{}", "=".repeat(80))?;

    write_preview(&mut out, "VIDEOS", "video", videos, |v| {
        format!("{} - {} ({})", v.title, v.channel_name, v.youtube_id)
    })?;
    write_preview(&mut out, "CHANNELS", "channel", channels, |c| {
        let subscribed = if c.subscribed { " (Subscribed)" } else { "" };
        format!("{}{} ({})", c.channel_name, subscribed, c.channel_id)
    })?;
    write_preview(&mut out, "PLAYLISTS", "playlist", playlists, |p| {
        format!("{} ({} entries) ({})", p.playlist_name, p.entry_count, p.playlist_id)
    })?;

    let total = videos.len() + channels.len() + playlists.len();
    writeln!(out, "\nTotal results: {}", total)?;
    if total > 0 {
        writeln!(out, "Use specific search commands for detailed results:")?;
        for kind in ["videos", "channels", "playlists"] {
            writeln!(out, "  tubearchive search {} '{}'", kind, query)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, title: &str) -> VideoHit {
        VideoHit {
            youtube_id: id.to_string(),
            title: title.to_string(),
            published: None,
            channel_name: "Rustaceans".to_string(),
            tags: (0..7).map(|i| format!("tag{}", i)).collect(),
        }
    }

    fn channel(description: Option<String>) -> ChannelHit {
        ChannelHit {
            channel_id: "UC1".to_string(),
            channel_name: "Rustaceans".to_string(),
            channel_description: description,
            subscribed: true,
            active: false,
        }
    }

    #[test]
    fn test_render_videos() {
        let text = render_videos("rust", &[video("abc", "Rust basics")]).unwrap();
        assert!(text.contains("Found 1 video(s):"));
        assert!(text.contains("Published: Unknown"));
        assert!(text.contains("Tags: tag0, tag1, tag2, tag3, tag4\n"));
    }

    #[test]
    fn test_render_no_results() {
        assert!(render_videos("x", &[]).unwrap().contains("No videos found matching your search."));
        assert!(render_channels("x", &[]).unwrap().contains("No channels found matching your search."));
        assert!(render_playlists("x", &[]).unwrap().contains("No playlists found matching your search."));
    }

    #[test]
    fn test_render_channels_truncates_description() {
        let text = render_channels("rust", &[channel(Some("d".repeat(250)))]).unwrap();
        assert!(text.contains("Status: Subscribed | Inactive"));
        assert!(text.contains(&format!("Description: {}...\n", "d".repeat(200))));
    }

    #[test]
    fn test_render_playlists() {
        let hit = PlaylistHit {
            playlist_id: "PL1".to_string(),
            playlist_name: "Talks".to_string(),
            playlist_description: None,
            playlist_channel: None,
            entry_count: 12,
            active: true,
        };
        let text = render_playlists("talks", &[hit]).unwrap();
        assert!(text.contains("Channel: Unknown"));
        assert!(text.contains("Entries: 12"));
        assert!(text.contains("Status: Active"));
        assert!(!text.contains("Description"));
    }

    #[test]
    fn test_render_all_previews_first_five() {
        let videos: Vec<_> = (0..7).map(|i| video(&format!("v{}", i), &format!("Video {}", i))).collect();
        let text = render_all("video", &videos, &[channel(None)], &[]).unwrap();

        assert!(text.contains("Found 7 video(s):"));
        assert!(text.contains("  5. Video 4 - Rustaceans (v4)"));
        assert!(!text.contains("Video 5 -"));
        assert!(text.contains("  ... and 2 more"));
        assert!(text.contains("  1. Rustaceans (Subscribed) (UC1)"));
        assert!(text.contains("  No playlists found"));
        assert!(text.contains("Total results: 8"));
    }

    #[test]
    fn test_render_all_empty() {
        let text = render_all("nothing", &[], &[], &[]).unwrap();
        assert!(text.contains("Total results: 0"));
        assert!(!text.contains("Use specific search commands"));
    }
}
