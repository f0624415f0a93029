use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::errors::{Result, SynthesiaError};
use crate::models::{
    video_from_value, ListVideosResponse, PollOptions, SubmissionPayload, Video, VideoStatus,
    VideoUpdate, Visibility,
};

pub const DEFAULT_BASE_URL: &str = "https://api.synthesia.io/v2";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Builder for constructing a [`Client`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// use synthesia_cli::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> synthesia_cli::Result<()> {
/// let client = ClientBuilder::new()
///     .api_key("your-api-key")
///     .base_url("http://localhost:8080/v2")
///     .timeout(Duration::from_secs(120))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the API key sent in the `Authorization` header.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the base URL (defaults to `https://api.synthesia.io/v2`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the HTTP timeout for API calls (defaults to 60 seconds).
    pub fn timeout(mut self, d: Duration) -> Self {
        self.timeout = d;
        self
    }

    /// Build the [`Client`].
    ///
    /// If no API key was set via [`api_key`](Self::api_key), the builder will
    /// attempt to read the `SYNTHESIA_API_KEY` environment variable.
    ///
    /// Returns [`SynthesiaError::Authentication`] if no key is available.
    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("SYNTHESIA_API_KEY").ok())
            .ok_or_else(|| SynthesiaError::Authentication {
                message: "API key is required. Pass it to ClientBuilder::api_key() \
                          or set the SYNTHESIA_API_KEY environment variable."
                    .into(),
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&api_key)
            .map_err(|_| SynthesiaError::Config("API key contains invalid characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(SynthesiaError::Http)?;

        Ok(Client {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            headers,
            http,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the Synthesia `videos` collection.
///
/// Every call is a single request: nothing is retried and nothing is cached.
pub struct Client {
    base_url: String,
    headers: HeaderMap,
    http: reqwest::Client,
}

impl Client {
    /// Create a client for the public API with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().api_key(api_key).build()
    }

    /// Submit a render job. Returns the freshly created video, usually `in_progress`.
    pub async fn create_video(&self, payload: &SubmissionPayload) -> Result<Video> {
        if payload.title().trim().is_empty() {
            return Err(SynthesiaError::InvalidInput("video title is empty".into()));
        }
        if payload.segments().iter().all(|s| s.script_text.trim().is_empty()) {
            return Err(SynthesiaError::InvalidInput(format!(
                "script for \"{}\" is empty",
                payload.title()
            )));
        }

        let value: serde_json::Value = self
            .request(Method::POST, "/videos", Some(payload))
            .await?;
        Ok(video_from_value(value))
    }

    /// Fetch the current state of a video by its identifier.
    pub async fn get_video(&self, video_id: &str) -> Result<Video> {
        let value: serde_json::Value = self
            .request(Method::GET, &format!("/videos/{video_id}"), None::<&()>)
            .await?;
        Ok(video_from_value(value))
    }

    /// First page of the collection, newest first as ordered by the API.
    pub async fn list_videos(&self, limit: u32) -> Result<Vec<Video>> {
        let resp: ListVideosResponse = self
            .request(
                Method::GET,
                &format!("/videos?limit={limit}&offset=0"),
                None::<&()>,
            )
            .await?;
        Ok(resp.videos.into_iter().map(video_from_value).collect())
    }

    pub async fn update_title(&self, video_id: &str, title: &str) -> Result<Video> {
        let update = VideoUpdate {
            title: Some(title),
            ..Default::default()
        };
        let value: serde_json::Value = self
            .request(Method::PATCH, &format!("/videos/{video_id}"), Some(&update))
            .await?;
        Ok(video_from_value(value))
    }

    pub async fn set_visibility(&self, video_id: &str, visibility: Visibility) -> Result<Video> {
        let update = VideoUpdate {
            visibility: Some(visibility),
            ..Default::default()
        };
        let value: serde_json::Value = self
            .request(Method::PATCH, &format!("/videos/{video_id}"), Some(&update))
            .await?;
        Ok(video_from_value(value))
    }

    /// Irreversibly remove a video.
    pub async fn delete_video(&self, video_id: &str) -> Result<()> {
        self.send(Method::DELETE, &format!("/videos/{video_id}"), None::<&()>)
            .await?;
        Ok(())
    }

    /// Poll a video until its status is `complete`.
    ///
    /// Any other status, including ones the client doesn't know, just means
    /// "wait another interval". With `max_wait` unset this never gives up.
    pub async fn wait_for_completion(&self, video_id: &str, opts: &PollOptions) -> Result<Video> {
        let started = Instant::now();

        loop {
            let video = self.get_video(video_id).await?;

            if let Some(ref cb) = opts.on_progress {
                cb(&video);
            }

            match &video.status {
                VideoStatus::Complete => {
                    info!(video_id, "video is complete");
                    return Ok(video);
                }
                VideoStatus::InProgress => {
                    info!(video_id, "video is in_progress, please wait");
                }
                VideoStatus::Other(status) => {
                    warn!(video_id, status = %status, "unexpected video status, still waiting");
                }
            }

            if let Some(max_wait) = opts.max_wait {
                if started.elapsed() >= max_wait {
                    return Err(SynthesiaError::Timeout {
                        id: video_id.to_string(),
                        waited: started.elapsed(),
                    });
                }
            }

            debug!("checking again in {:?}", opts.poll_interval);
            tokio::time::sleep(opts.poll_interval).await;
        }
    }

    /// Stream a remote asset to `dest`, returning the number of bytes written.
    ///
    /// Asset URLs are presigned, so no API headers are sent. The body goes to
    /// `<dest>.part` first and only replaces `dest` once fully written.
    pub async fn download_to(&self, url: &str, dest: &Path) -> Result<u64> {
        debug!(url, dest = %dest.display(), "downloading asset");

        let response = self
            .http
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .map_err(SynthesiaError::Http)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let partial = partial_path(dest);
        match stream_to_file(response, &partial).await {
            Ok(written) => {
                tokio::fs::rename(&partial, dest).await?;
                Ok(written)
            }
            Err(e) => {
                match tokio::fs::remove_file(&partial).await {
                    Err(rm) if rm.kind() != ErrorKind::NotFound => {
                        warn!("can't remove {}: {}", partial.display(), rm);
                    }
                    _ => {}
                }
                Err(e)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<T> {
        let response = self.send(method, path, body).await?;
        response.json().await.map_err(SynthesiaError::Http)
    }

    /// Execute one API call and map non-success statuses to typed errors.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "api request");

        let mut req = self
            .http
            .request(method, &url)
            .headers(self.headers.clone());

        if let Some(b) = body {
            req = req.json(b);
        }

        let response = req.send().await.map_err(SynthesiaError::Http)?;

        if response.status().is_success() {
            return Ok(response);
        }

        Err(error_from_response(response).await)
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

async fn stream_to_file(mut response: reqwest::Response, path: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await.map_err(SynthesiaError::Http)? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

async fn error_from_response(response: reqwest::Response) -> SynthesiaError {
    let status_code = response.status().as_u16();
    let response_text = response.text().await.unwrap_or_default();

    let parsed_body: Option<serde_json::Value> = serde_json::from_str(&response_text).ok();

    let message = parsed_body
        .as_ref()
        .and_then(|b| {
            ["message", "error", "context"]
                .iter()
                .find_map(|key| b.get(key).and_then(|e| e.as_str()))
        })
        .unwrap_or(&response_text)
        .to_string();

    match status_code {
        401 => SynthesiaError::Authentication { message },
        404 => SynthesiaError::NotFound { message },
        _ => SynthesiaError::Api {
            status_code,
            message,
            body: parsed_body,
        },
    }
}
