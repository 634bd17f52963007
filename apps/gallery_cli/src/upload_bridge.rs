//! Upload service backed by a local directory. Scans run on the blocking
//! pool and report back to the main task over a channel.

use std::{
    fs, mem,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use anyhow::{ensure, Context, Result};
use photo_services::UploadService;
use shared::domain::PhotoRecord;
use tokio::{
    runtime::Handle,
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadCompletion {
    Uploaded { photos: usize },
    Failed { reason: String },
}

pub struct DirectoryUploadService {
    directory: PathBuf,
    runtime: Handle,
    uploaded: Arc<Mutex<Vec<PhotoRecord>>>,
    completions: UnboundedSender<UploadCompletion>,
}

impl DirectoryUploadService {
    pub fn new(
        directory: impl Into<PathBuf>,
        runtime: Handle,
    ) -> (Self, UnboundedReceiver<UploadCompletion>) {
        let (completions, completion_rx) = mpsc::unbounded_channel();
        let service = Self {
            directory: directory.into(),
            runtime,
            uploaded: Arc::new(Mutex::new(Vec::new())),
            completions,
        };
        (service, completion_rx)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

fn lock(records: &Mutex<Vec<PhotoRecord>>) -> MutexGuard<'_, Vec<PhotoRecord>> {
    records.lock().unwrap_or_else(PoisonError::into_inner)
}

impl UploadService for DirectoryUploadService {
    fn upload_photo(&self) -> Result<()> {
        ensure!(
            self.directory.is_dir(),
            "upload directory '{}' does not exist",
            self.directory.display()
        );

        let directory = self.directory.clone();
        let uploaded = Arc::clone(&self.uploaded);
        let completions = self.completions.clone();
        self.runtime.spawn_blocking(move || {
            let completion = match scan_images(&directory) {
                Ok(records) => {
                    let photos = records.len();
                    lock(&uploaded).extend(records);
                    UploadCompletion::Uploaded { photos }
                }
                Err(err) => {
                    warn!(error = %err, dir = %directory.display(), "directory upload failed");
                    UploadCompletion::Failed {
                        reason: format!("{err:#}"),
                    }
                }
            };
            if completions.send(completion).is_err() {
                debug!("upload completion receiver dropped");
            }
        });
        Ok(())
    }

    fn get_uploaded_photos_data(&self) -> Result<Vec<PhotoRecord>> {
        Ok(mem::take(&mut *lock(&self.uploaded)))
    }
}

/// Image files directly inside `directory`, ordered by file name. The record
/// name is the file stem.
pub fn scan_images(directory: &Path) -> Result<Vec<PhotoRecord>> {
    let entries = fs::read_dir(directory)
        .with_context(|| format!("failed to read upload directory '{}'", directory.display()))?;

    let mut images = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_image = mime_guess::from_path(&path)
            .first_raw()
            .is_some_and(|mime| mime.starts_with("image/"));
        if is_image {
            images.push(path);
        }
    }
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(images
        .into_iter()
        .map(|path| {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            PhotoRecord::new(path.display().to_string(), name)
        })
        .collect())
}

#[cfg(test)]
#[path = "tests/upload_bridge_tests.rs"]
mod tests;
