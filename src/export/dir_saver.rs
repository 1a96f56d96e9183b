use super::saver::FileSaver;
use crate::error::RecorderError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tokio::task;

/// Writes exports into a directory
///
/// Each save goes to a temp file in the target directory first and is then
/// renamed into place, so a half-written export never shows up under its
/// final name. File I/O runs on the blocking pool.
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Export names must be a single plain path component.
pub fn check_file_name(file_name: &str) -> Result<(), RecorderError> {
    let mut components = Path::new(file_name).components();
    let plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !plain || file_name.contains('/') || file_name.contains('\\') {
        return Err(RecorderError::InvalidFileName(file_name.to_string()));
    }
    Ok(())
}

fn write_atomically(dir: &Path, file_name: &str, contents: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {:?}", dir))?;

    let mut temp_file = tempfile::Builder::new()
        .prefix(".trail-recorder-")
        .suffix(".json.tmp")
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temp file in {:?}", dir))?;

    temp_file
        .write_all(contents)
        .context("Failed to write export")?;
    temp_file.flush().context("Failed to flush export")?;

    let path = dir.join(file_name);
    temp_file
        .persist(&path)
        .with_context(|| format!("Failed to move export into place: {:?}", path))?;

    Ok(path)
}

#[async_trait]
impl FileSaver for DirectorySaver {
    async fn save(&mut self, contents: Vec<u8>, file_name: &str) -> Result<PathBuf> {
        check_file_name(file_name)?;

        let dir = self.dir.clone();
        let file_name = file_name.to_string();

        let path = task::spawn_blocking(move || write_atomically(&dir, &file_name, &contents))
            .await
            .context("spawn_blocking failed")??;

        tracing::info!("Saved coordinates to {:?}", path);
        Ok(path)
    }
}
