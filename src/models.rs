use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::SynthesiaError;

/// Default presenter used for every render.
pub const DEFAULT_AVATAR: &str = "fb4aeeb6-b8e2-424e-9631-3900ded817f7";
pub const DEFAULT_VOICE: &str = "398dc821-2eb9-4d93-9dca-ff6f3165906a";
pub const DEFAULT_BACKGROUND: &str = "workspace-media.a0f2bc02-b51f-4d88-8ea6-c42dedc078f1";

/// Lifecycle state reported by the API.
///
/// Only `complete` is terminal. Anything the client does not recognise is kept
/// verbatim in `Other` and treated as "not complete yet".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoStatus {
    InProgress,
    Complete,
    Other(String),
}

impl VideoStatus {
    pub fn as_str(&self) -> &str {
        match self {
            VideoStatus::InProgress => "in_progress",
            VideoStatus::Complete => "complete",
            VideoStatus::Other(s) => s,
        }
    }
}

impl From<&str> for VideoStatus {
    fn from(s: &str) -> Self {
        match s {
            "in_progress" => VideoStatus::InProgress,
            "complete" => VideoStatus::Complete,
            other => VideoStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Public,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Public => "public",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caption file URLs, present once a video is complete.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Captions {
    pub vtt: Option<String>,
    pub srt: Option<String>,
}

/// A remote render job. Always fetched fresh, never cached.
#[derive(Debug, Clone)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub status: VideoStatus,
    pub visibility: Option<Visibility>,
    pub description: Option<String>,
    /// Unix seconds.
    pub created_at: Option<i64>,
    /// Unix seconds.
    pub last_updated_at: Option<i64>,
    /// e.g. "0:00:06.605". Only set once complete.
    pub duration: Option<String>,
    /// Presigned, time-limited asset URL. Only set once complete.
    pub download: Option<String>,
    pub captions: Option<Captions>,
    /// Full API response JSON.
    pub raw: serde_json::Value,
}

impl Video {
    pub fn is_complete(&self) -> bool {
        self.status == VideoStatus::Complete
    }

    /// VTT captions URL, if the API returned one.
    pub fn captions_vtt(&self) -> Option<&str> {
        self.captions.as_ref().and_then(|c| c.vtt.as_deref())
    }
}

/// One row of a list call: the 1-based display position and the video.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub index: u32,
    pub video: Video,
}

/// How a catalog command names its target.
///
/// Numeric tokens are 1-based positions in a list fetched just before the
/// action. That mapping is best effort: it shifts if the remote collection
/// changes in between. Passing the id avoids the problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoRef {
    Index(u32),
    Id(String),
}

impl FromStr for VideoRef {
    type Err = SynthesiaError;

    /// Any integer token is an index and must be at least 1; everything else
    /// is an id.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if let Ok(n) = token.parse::<u32>() {
            if n > 0 {
                return Ok(VideoRef::Index(n));
            }
        }
        match token.parse::<i64>() {
            Ok(index) => Err(SynthesiaError::InvalidIndex { index, len: None }),
            Err(_) if is_integer(token) => Err(SynthesiaError::InvalidIndex {
                index: if token.starts_with('-') { i64::MIN } else { i64::MAX },
                len: None,
            }),
            Err(_) => Ok(VideoRef::Id(token.to_string())),
        }
    }
}

fn is_integer(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for VideoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoRef::Index(n) => write!(f, "#{n}"),
            VideoRef::Id(id) => f.write_str(id),
        }
    }
}

/// Fixed presenter settings baked into every submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub avatar: String,
    pub voice: String,
    pub background: String,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            avatar: DEFAULT_AVATAR.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

/// Body of `POST /videos`.
///
/// Built only through [`SubmissionPayload::new`]: visibility is always
/// private at creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    test: bool,
    visibility: Visibility,
    title: String,
    input: Vec<ScriptSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSegment {
    pub avatar_settings: AvatarSettings,
    pub background_settings: BackgroundSettings,
    pub avatar: String,
    pub background: String,
    pub script_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarSettings {
    pub horizontal_align: String,
    pub scale: u32,
    pub style: String,
    pub seamless: bool,
    pub voice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundSettings {
    pub video_settings: BackgroundVideoSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundVideoSettings {
    pub short_background_content_match_mode: String,
    pub long_background_content_match_mode: String,
}

impl SubmissionPayload {
    pub fn new(
        title: impl Into<String>,
        script: impl Into<String>,
        test: bool,
        presentation: &Presentation,
    ) -> Self {
        Self {
            test,
            visibility: Visibility::Private,
            title: title.into(),
            input: vec![ScriptSegment {
                avatar_settings: AvatarSettings {
                    horizontal_align: "center".to_string(),
                    scale: 1,
                    style: "rectangular".to_string(),
                    seamless: false,
                    voice: presentation.voice.clone(),
                },
                background_settings: BackgroundSettings {
                    video_settings: BackgroundVideoSettings {
                        short_background_content_match_mode: "freeze".to_string(),
                        long_background_content_match_mode: "trim".to_string(),
                    },
                },
                avatar: presentation.avatar.clone(),
                background: presentation.background.clone(),
                script_text: script.into(),
            }],
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Watermarked draft render.
    pub fn is_test(&self) -> bool {
        self.test
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn segments(&self) -> &[ScriptSegment] {
        &self.input
    }
}

/// A script document read from the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptInput {
    /// File name without the `.docx` extension.
    pub title: String,
    pub body: String,
}

/// Polling config for [`Client::wait_for_completion`](crate::Client::wait_for_completion).
pub struct PollOptions {
    /// Default: 120s.
    pub poll_interval: Duration,
    /// `None` polls forever. Default: `None`.
    pub max_wait: Option<Duration>,
    /// Called on each poll iteration with the current `Video`.
    #[allow(clippy::type_complexity)]
    pub on_progress: Option<Box<dyn Fn(&Video) + Send>>,
}

impl PollOptions {
    pub fn every(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            ..Self::default()
        }
    }

    pub fn max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(120),
            max_wait: None,
            on_progress: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Internal deserialization helpers (not part of the public API surface)
// ---------------------------------------------------------------------------

/// GET /videos response.
#[derive(Deserialize)]
pub(crate) struct ListVideosResponse {
    #[serde(default)]
    pub videos: Vec<serde_json::Value>,
}

/// PATCH /videos/{id} body. Absent fields are left untouched remotely.
#[derive(Serialize, Default)]
pub(crate) struct VideoUpdate<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

/// Pull a string out of a JSON value, or `""` if missing.
pub(crate) fn json_str(val: &serde_json::Value, key: &str) -> String {
    json_str_opt(val, key).unwrap_or_default()
}

pub(crate) fn json_str_opt(val: &serde_json::Value, key: &str) -> Option<String> {
    val.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

pub(crate) fn json_i64_opt(val: &serde_json::Value, key: &str) -> Option<i64> {
    val.get(key).and_then(|v| v.as_i64())
}

/// Parse a raw video JSON value into a [`Video`].
pub(crate) fn video_from_value(val: serde_json::Value) -> Video {
    let visibility = val
        .get("visibility")
        .and_then(|v| serde_json::from_value(v.clone()).ok());
    let captions = val
        .get("captions")
        .and_then(|v| serde_json::from_value(v.clone()).ok());

    Video {
        id: json_str(&val, "id"),
        title: json_str(&val, "title"),
        status: VideoStatus::from(json_str(&val, "status").as_str()),
        visibility,
        description: json_str_opt(&val, "description"),
        created_at: json_i64_opt(&val, "createdAt"),
        last_updated_at: json_i64_opt(&val, "lastUpdatedAt"),
        duration: json_str_opt(&val, "duration"),
        download: json_str_opt(&val, "download"),
        captions,
        raw: val,
    }
}
