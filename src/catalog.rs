//! One-shot operations on the remote video collection.
//!
//! Commands name their target with a [`VideoRef`]. An index is resolved
//! against a list fetched immediately before the action, so it is only as
//! stable as the remote ordering between the two calls.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::client::Client;
use crate::download::{derive_filename, save_asset, CAPTIONS_FALLBACK_EXT, VIDEO_FALLBACK_EXT};
use crate::errors::{Result, SynthesiaError};
use crate::models::{CatalogEntry, Video, VideoRef, VideoStatus, Visibility};
use crate::prompt::{require_confirmation, Prompter};

const EMBED_BASE_URL: &str = "https://share.synthesia.io/embeds/videos";

/// Narrow a listing to one lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    InProgress,
    Complete,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::InProgress => "in_progress",
            StatusFilter::Complete => "complete",
        }
    }

    fn matches(self, status: &VideoStatus) -> bool {
        match self {
            StatusFilter::InProgress => *status == VideoStatus::InProgress,
            StatusFilter::Complete => *status == VideoStatus::Complete,
        }
    }
}

/// Number a list response from 1.
pub fn number_entries(videos: Vec<Video>) -> Vec<CatalogEntry> {
    videos
        .into_iter()
        .zip(1u32..)
        .map(|(video, index)| CatalogEntry { index, video })
        .collect()
}

/// Pick the entry at a 1-based `index`; valid range is `1..=videos.len()`.
pub fn select(videos: Vec<Video>, index: u32) -> Result<Video> {
    let invalid = SynthesiaError::InvalidIndex {
        index: i64::from(index),
        len: Some(videos.len()),
    };
    if index == 0 {
        return Err(invalid);
    }
    videos.into_iter().nth(index as usize - 1).ok_or(invalid)
}

/// First page of the collection, numbered for display.
///
/// Filtering keeps the original numbering so the index shown can be passed
/// straight to another command.
pub async fn list(
    client: &Client,
    limit: u32,
    filter: Option<StatusFilter>,
) -> Result<Vec<CatalogEntry>> {
    let entries = number_entries(client.list_videos(limit).await?);

    let Some(filter) = filter else {
        for entry in &entries {
            info!(
                "{}> \"{}\" ({})",
                entry.index, entry.video.title, entry.video.status
            );
        }
        return Ok(entries);
    };

    let filtered: Vec<CatalogEntry> = entries
        .into_iter()
        .filter(|e| filter.matches(&e.video.status))
        .collect();

    if filtered.is_empty() {
        error!("no videos are currently {}", filter.as_str());
    }
    for entry in &filtered {
        info!(
            "{}> {} - \"{}\" ({})",
            entry.index, entry.video.id, entry.video.title, entry.video.status
        );
    }
    Ok(filtered)
}

/// Resolve a reference to a video. An index uses the list entry as returned;
/// an id is fetched directly.
pub async fn resolve(client: &Client, limit: u32, target: &VideoRef) -> Result<Video> {
    match target {
        VideoRef::Index(index) => {
            let video = select(client.list_videos(limit).await?, *index)?;
            info!("({}) {}", index, video.title);
            Ok(video)
        }
        VideoRef::Id(id) => client.get_video(id).await,
    }
}

/// Like [`resolve`], but always returns the video's current state.
pub async fn resolve_fresh(client: &Client, limit: u32, target: &VideoRef) -> Result<Video> {
    match target {
        VideoRef::Index(_) => {
            let entry = resolve(client, limit, target).await?;
            client.get_video(&entry.id).await
        }
        VideoRef::Id(id) => client.get_video(id).await,
    }
}

pub async fn inspect(client: &Client, limit: u32, target: &VideoRef) -> Result<Video> {
    let video = resolve_fresh(client, limit, target).await?;

    info!("title: {}", video.title);
    info!("id: {}", video.id);
    info!("status: {}", video.status);
    if let Some(ref description) = video.description {
        info!("description: {}", description);
    }
    if let Some(visibility) = video.visibility {
        info!("visibility: {}", visibility);
    }
    if video.is_complete() {
        if let Some(ref duration) = video.duration {
            info!("duration: {}", duration);
        }
    }
    Ok(video)
}

/// Full JSON of the video, pretty-printed.
pub async fn inspect_raw(client: &Client, limit: u32, target: &VideoRef) -> Result<String> {
    let video = resolve_fresh(client, limit, target).await?;
    serde_json::to_string_pretty(&video.raw)
        .map_err(|e| SynthesiaError::InvalidInput(format!("unprintable response: {e}")))
}

pub async fn rename(client: &Client, limit: u32, target: &VideoRef, title: &str) -> Result<Video> {
    if title.trim().is_empty() {
        return Err(SynthesiaError::InvalidInput("new title is empty".into()));
    }

    let video = resolve(client, limit, target).await?;
    info!("update title of video {} to \"{}\"", video.id, title);
    let updated = client.update_title(&video.id, title).await?;
    info!("{} title changed to \"{}\"", updated.id, updated.title);
    Ok(updated)
}

pub async fn set_visibility(
    client: &Client,
    limit: u32,
    target: &VideoRef,
    visibility: Visibility,
) -> Result<Video> {
    let video = resolve(client, limit, target).await?;
    let updated = client.set_visibility(&video.id, visibility).await?;
    info!(
        "{} visibility set to \"{}\"",
        video.id,
        updated.visibility.unwrap_or(visibility)
    );
    Ok(updated)
}

/// Make a video public and return its embeddable player markup.
pub async fn publish(client: &Client, limit: u32, target: &VideoRef) -> Result<String> {
    let video = set_visibility(client, limit, target, Visibility::Public).await?;
    let snippet = embed_snippet(&video.id);
    info!("{}", snippet);
    Ok(snippet)
}

/// Delete after an explicit yes. Returns the deleted id.
pub async fn delete(
    client: &Client,
    limit: u32,
    target: &VideoRef,
    prompter: &dyn Prompter,
) -> Result<String> {
    let video = resolve(client, limit, target).await?;
    warn!("({}) \"{}\" marked for deletion", target, video.title);

    require_confirmation(
        prompter,
        &format!("Are you sure you want to delete {}?", video.id),
    )?;

    client.delete_video(&video.id).await?;
    info!("video {} has been deleted", video.id);
    Ok(video.id)
}

/// Save a complete video and, when available, its VTT captions.
pub async fn download(
    client: &Client,
    limit: u32,
    target: &VideoRef,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    let video = resolve_fresh(client, limit, target).await?;

    if !video.is_complete() {
        return Err(SynthesiaError::NotComplete {
            id: video.id,
            status: video.status.to_string(),
        });
    }

    let url = video
        .download
        .as_deref()
        .ok_or_else(|| SynthesiaError::MissingField(format!("download URL for video {}", video.id)))?;

    let mut saved = Vec::new();
    let filename = derive_filename(&video.title, url, VIDEO_FALLBACK_EXT);
    info!("filename is \"{}\"", filename);
    saved.push(save_asset(client, url, dir, &filename).await?);

    match video.captions_vtt() {
        Some(vtt) => {
            let filename = derive_filename(&video.title, vtt, CAPTIONS_FALLBACK_EXT);
            saved.push(save_asset(client, vtt, dir, &filename).await?);
        }
        None => warn!("video {} has no VTT captions", video.id),
    }

    Ok(saved)
}

/// Responsive iframe markup for the hosted player.
pub fn embed_snippet(video_id: &str) -> String {
    format!(
        "<div style=\"position: relative; overflow: hidden; aspect-ratio: 1920/1080\">\
         <iframe src=\"{EMBED_BASE_URL}/{video_id}\" loading=\"lazy\" \
         title=\"Synthesia video player - Placeholder\" allowfullscreen \
         allow=\"encrypted-media; fullscreen;\" \
         style=\"position: absolute; width: 100%; height: 100%; top: 0; left: 0; \
         border: none; padding: 0; margin: 0; overflow:hidden;\"></iframe></div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::video_from_value;
    use serde_json::json;

    fn videos(n: usize) -> Vec<Video> {
        (1..=n)
            .map(|i| video_from_value(json!({"id": format!("id-{i}"), "title": format!("Video {i}"), "status": "complete"})))
            .collect()
    }

    #[test]
    fn index_one_is_first_entry() {
        assert_eq!(select(videos(3), 1).unwrap().id, "id-1");
        assert_eq!(select(videos(3), 3).unwrap().id, "id-3");
    }

    #[test]
    fn out_of_range_indices_are_invalid() {
        for index in [0, 4, 100] {
            match select(videos(3), index) {
                Err(SynthesiaError::InvalidIndex { index: i, len }) => {
                    assert_eq!(i, i64::from(index));
                    assert_eq!(len, Some(3));
                }
                other => panic!("expected InvalidIndex, got {other:?}"),
            }
        }
        assert!(select(Vec::new(), 1).is_err());
    }

    #[test]
    fn entries_are_numbered_from_one() {
        let entries = number_entries(videos(2));
        assert_eq!(entries[0].index, 1);
        assert_eq!(entries[1].index, 2);
        assert_eq!(entries[1].video.id, "id-2");
    }

    #[test]
    fn filter_matches_only_its_status() {
        assert!(StatusFilter::InProgress.matches(&VideoStatus::InProgress));
        assert!(!StatusFilter::InProgress.matches(&VideoStatus::Complete));
        assert!(!StatusFilter::Complete.matches(&VideoStatus::Other("error".into())));
    }

    #[test]
    fn embed_snippet_points_at_share_player() {
        let snippet = embed_snippet("abc-123");
        assert!(snippet.contains("src=\"https://share.synthesia.io/embeds/videos/abc-123\""));
        assert!(snippet.starts_with("<div style=\"position: relative;"));
        assert!(snippet.ends_with("</iframe></div>"));
    }
}
