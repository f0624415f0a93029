//! Reading batch input documents.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};

use crate::errors::{Result, SynthesiaError};
use crate::models::ScriptInput;

const SCRIPT_EXT: &str = "docx";

/// Read every `.docx` file in `dir`, ordered by file name.
///
/// The title is the file name minus its extension and the body is the raw
/// file content decoded as UTF-8 (invalid sequences replaced).
/// Fails with [`SynthesiaError::NoScripts`] if the directory is missing or
/// holds no scripts.
pub async fn read_scripts(dir: &Path) -> Result<Vec<ScriptInput>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SynthesiaError::NoScripts(dir.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_script = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(SCRIPT_EXT));
        if is_script && entry.file_type().await?.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    info!("{} script files found in {}", paths.len(), dir.display());
    if paths.is_empty() {
        return Err(SynthesiaError::NoScripts(dir.display().to_string()));
    }

    let mut scripts = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(&path).await?;
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        scripts.push(ScriptInput {
            title,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    Ok(scripts)
}

/// Delete a Finder `.DS_Store` file from `dir` if one is present.
pub async fn remove_ds_store(dir: &Path) {
    let path = dir.join(".DS_Store");
    match tokio::fs::remove_file(&path).await {
        Ok(()) => warn!(".DS_Store file found and deleted"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("error deleting .DS_Store file: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_only_docx_in_name_order() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("outro.docx"), "Goodbye.").unwrap();
        std::fs::write(tmp.path().join("intro.DOCX"), "Hello world.").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let scripts = read_scripts(tmp.path()).await.unwrap();

        assert_eq!(
            scripts,
            vec![
                ScriptInput {
                    title: "intro".into(),
                    body: "Hello world.".into()
                },
                ScriptInput {
                    title: "outro".into(),
                    body: "Goodbye.".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn empty_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("readme.md"), "nope").unwrap();

        let err = read_scripts(tmp.path()).await.unwrap_err();
        assert!(matches!(err, SynthesiaError::NoScripts(_)));
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_scripts(&tmp.path().join("scripts")).await.unwrap_err();
        assert!(matches!(err, SynthesiaError::NoScripts(_)));
    }

    #[tokio::test]
    async fn ds_store_is_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let junk = tmp.path().join(".DS_Store");
        std::fs::write(&junk, [0u8; 4]).unwrap();

        remove_ds_store(tmp.path()).await;
        remove_ds_store(tmp.path()).await;

        assert!(!junk.exists());
    }
}
