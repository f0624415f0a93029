//! Saving rendered assets to the local downloads directory.

use std::path::{Path, PathBuf};

use reqwest::Url;
use tracing::info;

use crate::client::Client;
use crate::errors::Result;

pub const VIDEO_FALLBACK_EXT: &str = "mp4";
pub const CAPTIONS_FALLBACK_EXT: &str = "vtt";

/// Local file name for an asset: the title with all whitespace removed, plus
/// the extension found on the URL path (query string ignored), or `fallback_ext`.
///
/// Titles that differ only in whitespace map to the same name.
pub fn derive_filename(title: &str, url: &str, fallback_ext: &str) -> String {
    let mut stem: String = title.chars().filter(|c| !c.is_whitespace()).collect();
    if stem.is_empty() {
        stem = "untitled".to_string();
    }

    let ext = url_extension(url).unwrap_or_else(|| fallback_ext.to_string());
    format!("{stem}.{ext}")
}

fn url_extension(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let ext = Path::new(parsed.path()).extension()?.to_str()?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_string())
    }
}

/// Create the downloads directory if it is missing. Safe to call repeatedly.
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}

/// Download `url` into `dir/filename`, creating `dir` first.
pub async fn save_asset(client: &Client, url: &str, dir: &Path, filename: &str) -> Result<PathBuf> {
    ensure_dir(dir).await?;
    let path = dir.join(filename);
    let bytes = client.download_to(url, &path).await?;
    info!("{} downloaded ({} bytes)", filename, bytes);
    Ok(path)
}
