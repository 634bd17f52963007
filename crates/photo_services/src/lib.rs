//! Contracts for the collaborators the gallery core drives, plus in-memory
//! implementations used by tests and the command-line front end.

use std::num::NonZeroU32;

use shared::domain::{FilterMethod, FilterValue, Photo, PhotoRecord, SurfaceHandle};

pub mod memory;

pub use memory::{GalleryLayout, GalleryTile, InMemoryPhotoAssistant, StagedUploadService};

/// Called by an upload service once an upload has finished.
pub type CompletionHook = Box<dyn Fn() + Send + Sync>;

pub trait UploadService: Send + Sync {
    /// Starts an upload. Completion is signalled out of band, never by returning.
    fn upload_photo(&self) -> anyhow::Result<()>;
    fn get_uploaded_photos_data(&self) -> anyhow::Result<Vec<PhotoRecord>>;
}

pub trait PhotoAssistantService: Send + Sync {
    fn add_photo_to_gallery(&self, photo: &Photo, description: &str) -> anyhow::Result<()>;
    fn sort_photos_alphabetically(&self) -> anyhow::Result<()>;
    fn display_gallery(&self, columns: NonZeroU32, container: &SurfaceHandle)
        -> anyhow::Result<()>;
    fn add_photo_to_be_filtered(&self, photo: &Photo) -> anyhow::Result<()>;
    fn add_filter(&self, method: FilterMethod, value: &FilterValue) -> anyhow::Result<()>;
    fn apply_filter(&self) -> anyhow::Result<()>;
}
