//! Submit → poll → download, for every script or for one quick test render.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::client::Client;
use crate::config::AppConfig;
use crate::download::{derive_filename, save_asset, VIDEO_FALLBACK_EXT};
use crate::errors::{Result, SynthesiaError};
use crate::models::{PollOptions, SubmissionPayload};
use crate::prompt::{require_confirmation, Prompter};
use crate::scripts::{read_scripts, remove_ds_store};

pub const QUICK_SCRIPT: &str = "This is a test video.";

/// A finished render saved to disk.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub title: String,
    pub video_id: String,
    pub path: PathBuf,
}

/// Render every script in the scripts directory, one after another.
///
/// Asks whether the run is a draft (watermarked test) run, then for a final
/// go-ahead. A failure stops the run; videos already submitted stay remote.
pub async fn run_batch(
    client: &Client,
    config: &AppConfig,
    prompter: &dyn Prompter,
) -> Result<Vec<RenderOutcome>> {
    let test = prompter.confirm("Mark this run as drafts?", true)?;
    if test {
        info!("job queue is marked as a test run");
    } else {
        warn!("JOB IS FLAGGED AS A LIVE RUN");
    }

    remove_ds_store(&config.scripts_dir).await;
    let scripts = read_scripts(&config.scripts_dir).await?;

    require_confirmation(prompter, "Ready to process scripts with Synthesia?")?;
    info!("user has confirmed job ok to process");

    let mut outcomes = Vec::with_capacity(scripts.len());
    for script in scripts {
        let outcome = render(
            client,
            config,
            &script.title,
            &script.body,
            test,
            config.batch_poll_interval,
        )
        .await?;
        outcomes.push(outcome);
    }

    info!("{} video(s) rendered and downloaded", outcomes.len());
    Ok(outcomes)
}

/// One test render with a short polling interval.
pub async fn quick_render(
    client: &Client,
    config: &AppConfig,
    title: &str,
    script: Option<&str>,
) -> Result<RenderOutcome> {
    let outcome = render(
        client,
        config,
        title,
        script.unwrap_or(QUICK_SCRIPT),
        true,
        config.quick_poll_interval,
    )
    .await?;
    info!("video downloaded and saved as {}", outcome.path.display());
    Ok(outcome)
}

/// Full lifecycle of a single job. The title names both the remote video and
/// the local file; nothing links the two after this returns.
pub async fn render(
    client: &Client,
    config: &AppConfig,
    title: &str,
    script: &str,
    test: bool,
    poll_interval: Duration,
) -> Result<RenderOutcome> {
    let payload = SubmissionPayload::new(title, script, test, &config.presentation);
    if test {
        info!(title, "video is a test");
    } else {
        warn!(title, "video is NOT a test");
    }
    info!(
        avatar = %config.presentation.avatar,
        background = %config.presentation.background,
        "sending payload to Synthesia"
    );

    let created = client.create_video(&payload).await?;
    info!(
        id = %created.id,
        status = %created.status,
        visibility = ?created.visibility,
        created_at = ?created.created_at,
        "video submitted"
    );

    let opts = PollOptions::every(poll_interval).max_wait(config.max_wait);
    let video = client.wait_for_completion(&created.id, &opts).await?;

    let url = video
        .download
        .as_deref()
        .ok_or_else(|| SynthesiaError::MissingField(format!("download URL for video {}", video.id)))?;
    let filename = derive_filename(title, url, VIDEO_FALLBACK_EXT);
    info!("video filename set as {}", filename);

    let path = save_asset(client, url, &config.downloads_dir, &filename).await?;

    Ok(RenderOutcome {
        title: title.to_string(),
        video_id: video.id,
        path,
    })
}
