//! The `.env` file that holds the API key.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::{Result, SynthesiaError};

pub const API_KEY_VAR: &str = "API_KEY";
pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

/// `true` for an empty key or the placeholder written on first run.
pub fn is_placeholder(key: &str) -> bool {
    let key = key.trim();
    key.is_empty() || key == PLACEHOLDER_API_KEY
}

#[derive(Debug, Clone)]
pub struct CredentialsFile {
    path: PathBuf,
}

impl CredentialsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a placeholder file if none exists. Returns `true` when created.
    pub fn ensure_exists(&self) -> Result<bool> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path);

        match file {
            Ok(mut f) => {
                writeln!(f, "{API_KEY_VAR}={PLACEHOLDER_API_KEY}")?;
                info!(
                    "{} not found, created with placeholder API key",
                    self.path.display()
                );
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// The `API_KEY` entry, or `None` if the file or entry is missing.
    pub fn read_api_key(&self) -> Result<Option<String>> {
        let iter = match dotenvy::from_path_iter(&self.path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(e)) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(dotenv_error(&self.path, e)),
        };

        for item in iter {
            let (key, value) = item.map_err(|e| dotenv_error(&self.path, e))?;
            if key == API_KEY_VAR {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Replace the `API_KEY` entry (or append one), keeping any other lines.
    pub fn store_api_key(&self, key: &str) -> Result<()> {
        let key = key.trim();
        if is_placeholder(key) || key.chars().any(char::is_whitespace) {
            return Err(SynthesiaError::InvalidInput(
                "API key must be a single non-placeholder token".into(),
            ));
        }

        let existing = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let entry = format!("{API_KEY_VAR}={key}");
        let mut replaced = false;
        let mut lines: Vec<String> = existing
            .lines()
            .map(|line| {
                if is_api_key_line(line) {
                    replaced = true;
                    entry.clone()
                } else {
                    line.to_string()
                }
            })
            .collect();
        if !replaced {
            lines.push(entry);
        }

        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(&self.path, content)?;

        info!("API key in {} updated successfully", self.path.display());
        Ok(())
    }
}

fn is_api_key_line(line: &str) -> bool {
    let line = line.trim_start();
    let line = line.strip_prefix("export ").unwrap_or(line);
    line.split_once('=')
        .is_some_and(|(name, _)| name.trim() == API_KEY_VAR)
}

fn dotenv_error(path: &Path, e: dotenvy::Error) -> SynthesiaError {
    SynthesiaError::Config(format!("failed to parse {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_writes_placeholder_once() {
        let tmp = tempfile::tempdir().unwrap();
        let creds = CredentialsFile::new(tmp.path().join(".env"));

        assert!(creds.ensure_exists().unwrap());
        assert!(!creds.ensure_exists().unwrap());

        let key = creds.read_api_key().unwrap().unwrap();
        assert_eq!(key, PLACEHOLDER_API_KEY);
        assert!(is_placeholder(&key));
    }

    #[test]
    fn store_replaces_existing_key_and_keeps_other_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".env");
        fs::write(&path, "# synthesia\nAPI_KEY=your_api_key_here\nOTHER=1\n").unwrap();
        let creds = CredentialsFile::new(&path);

        creds.store_api_key("abc123").unwrap();
        creds.store_api_key("def456").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# synthesia\nAPI_KEY=def456\nOTHER=1\n"
        );
        assert_eq!(creds.read_api_key().unwrap().as_deref(), Some("def456"));
    }

    #[test]
    fn store_creates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let creds = CredentialsFile::new(tmp.path().join(".env"));

        creds.store_api_key("abc123").unwrap();

        assert_eq!(creds.read_api_key().unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn rejects_placeholder_and_blank_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let creds = CredentialsFile::new(tmp.path().join(".env"));

        assert!(creds.store_api_key(PLACEHOLDER_API_KEY).is_err());
        assert!(creds.store_api_key("  ").is_err());
        assert!(creds.store_api_key("two words").is_err());
    }

    #[test]
    fn missing_file_has_no_key() {
        let tmp = tempfile::tempdir().unwrap();
        let creds = CredentialsFile::new(tmp.path().join(".env"));
        assert_eq!(creds.read_api_key().unwrap(), None);
    }
}
