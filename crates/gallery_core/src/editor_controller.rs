use std::sync::Arc;

use photo_services::PhotoAssistantService;
use shared::{
    domain::{FilterRequest, Photo},
    error::GalleryError,
};
use tracing::{debug, info};

/// Relays filter intent for a single queued photo to the assistant.
///
/// At most one photo is queued at a time. A new call to
/// [`add_photo_to_be_filtered`](Self::add_photo_to_be_filtered) replaces the
/// previous target.
pub struct PhotoEditorController {
    photo_assistant: Arc<dyn PhotoAssistantService>,
    photo_to_be_filtered: Option<Photo>,
}

impl PhotoEditorController {
    pub fn new(photo_assistant: Arc<dyn PhotoAssistantService>) -> Self {
        Self {
            photo_assistant,
            photo_to_be_filtered: None,
        }
    }

    pub fn add_photo_to_be_filtered(&mut self, photo: Option<Photo>) -> Result<(), GalleryError> {
        let photo =
            photo.ok_or_else(|| GalleryError::invalid_argument("a valid photo is required"))?;
        self.photo_assistant
            .add_photo_to_be_filtered(&photo)
            .map_err(|err| GalleryError::collaborator("queue photo for filtering", err))?;

        info!(photo = photo.display_name(), id = %photo.id(), "photo queued for editing");
        self.photo_to_be_filtered = Some(photo);
        Ok(())
    }

    pub fn add_filter(&mut self, request: FilterRequest) -> Result<(), GalleryError> {
        debug!(method = %request.method, value = %request.value, "adding filter");
        self.photo_assistant
            .add_filter(request.method, &request.value)
            .map_err(|err| GalleryError::collaborator("add filter", err))
    }

    pub fn apply_filter(&self) -> Result<(), GalleryError> {
        let photo = self
            .photo_to_be_filtered
            .as_ref()
            .ok_or(GalleryError::NotConfigured("photo editor target"))?;
        self.photo_assistant
            .apply_filter()
            .map_err(|err| GalleryError::collaborator("apply filter", err))?;
        debug!(photo = photo.display_name(), "filter applied");
        Ok(())
    }

    pub fn photo_to_be_filtered(&self) -> Option<&Photo> {
        self.photo_to_be_filtered.as_ref()
    }
}

#[cfg(test)]
#[path = "tests/editor_controller_tests.rs"]
mod tests;
