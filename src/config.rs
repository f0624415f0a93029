use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{Client, ClientBuilder, DEFAULT_BASE_URL};
use crate::credentials::{is_placeholder, CredentialsFile};
use crate::errors::{Result, SynthesiaError};
use crate::models::Presentation;

const DEFAULT_BATCH_POLL_SECONDS: u64 = 120;
const DEFAULT_QUICK_POLL_SECONDS: u64 = 3;
const DEFAULT_LIST_LIMIT: u32 = 100;

/// Everything a command needs, built once at startup and passed down.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub credentials: CredentialsFile,
    /// Loaded by [`load_api_key`](Self::load_api_key); may be the placeholder.
    pub api_key: Option<String>,
    pub scripts_dir: PathBuf,
    pub downloads_dir: PathBuf,
    pub log_path: PathBuf,
    pub batch_poll_interval: Duration,
    pub quick_poll_interval: Duration,
    /// `None` polls until the video completes.
    pub max_wait: Option<Duration>,
    pub list_limit: u32,
    pub presentation: Presentation,
}

impl AppConfig {
    /// Defaults relative to the working directory, with `downloads/` next to
    /// the executable, then environment overrides.
    pub fn from_env() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let install_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| cwd.clone());

        Ok(Self::from_lookup(&cwd, &install_dir, |name| {
            std::env::var(name).ok()
        }))
    }

    /// Defaults rooted at `work_dir` / `install_dir`, no overrides.
    pub fn with_dirs(work_dir: &Path, install_dir: &Path) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: CredentialsFile::new(work_dir.join(".env")),
            api_key: None,
            scripts_dir: work_dir.join("scripts"),
            downloads_dir: install_dir.join("downloads"),
            log_path: work_dir.join("application.log"),
            batch_poll_interval: Duration::from_secs(DEFAULT_BATCH_POLL_SECONDS),
            quick_poll_interval: Duration::from_secs(DEFAULT_QUICK_POLL_SECONDS),
            max_wait: None,
            list_limit: DEFAULT_LIST_LIMIT,
            presentation: Presentation::default(),
        }
    }

    /// Apply `SYNTHESIA_*` overrides read through `lookup`.
    ///
    /// Numbers that fail to parse keep their defaults.
    pub fn from_lookup(
        work_dir: &Path,
        install_dir: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = Self::with_dirs(work_dir, install_dir);
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let seconds = |name: &str| {
            non_empty(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
        };

        if let Some(url) = non_empty("SYNTHESIA_BASE_URL") {
            config.base_url = url;
        }
        if let Some(path) = non_empty("SYNTHESIA_CREDENTIALS_FILE") {
            config.credentials = CredentialsFile::new(path);
        }
        if let Some(dir) = non_empty("SYNTHESIA_SCRIPTS_DIR") {
            config.scripts_dir = PathBuf::from(dir);
        }
        if let Some(dir) = non_empty("SYNTHESIA_DOWNLOADS_DIR") {
            config.downloads_dir = PathBuf::from(dir);
        }
        if let Some(path) = non_empty("SYNTHESIA_LOG_FILE") {
            config.log_path = PathBuf::from(path);
        }
        if let Some(d) = seconds("SYNTHESIA_POLL_INTERVAL_SECONDS") {
            config.batch_poll_interval = d;
        }
        if let Some(d) = seconds("SYNTHESIA_QUICK_POLL_INTERVAL_SECONDS") {
            config.quick_poll_interval = d;
        }
        if let Some(d) = seconds("SYNTHESIA_MAX_WAIT_SECONDS") {
            config.max_wait = Some(d);
        }
        if let Some(limit) = non_empty("SYNTHESIA_LIST_LIMIT").and_then(|v| v.trim().parse().ok()) {
            config.list_limit = limit;
        }
        if let Some(avatar) = non_empty("SYNTHESIA_AVATAR") {
            config.presentation.avatar = avatar;
        }
        if let Some(voice) = non_empty("SYNTHESIA_VOICE") {
            config.presentation.voice = voice;
        }
        if let Some(background) = non_empty("SYNTHESIA_BACKGROUND") {
            config.presentation.background = background;
        }

        config
    }

    /// Create the credentials file on first run and read the key from it.
    pub fn load_api_key(&mut self) -> Result<()> {
        self.credentials.ensure_exists()?;
        self.api_key = self.credentials.read_api_key()?;
        Ok(())
    }

    /// The stored key, unless it is missing or still the placeholder.
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !is_placeholder(key) => Ok(key.trim()),
            _ => Err(SynthesiaError::MissingApiKey(
                self.credentials.path().display().to_string(),
            )),
        }
    }

    pub fn client(&self) -> Result<Client> {
        ClientBuilder::new()
            .api_key(self.require_api_key()?)
            .base_url(&self.base_url)
            .build()
    }
}
