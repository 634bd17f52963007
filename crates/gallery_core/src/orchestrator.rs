//! Composition root: owns the shared services and routes front-end calls to
//! the controller responsible for them.

use std::sync::Arc;

use photo_services::{PhotoAssistantService, UploadService};
use shared::{
    domain::{FilterRequest, GalleryConfiguration, Photo},
    error::GalleryError,
};
use tracing::info;

use crate::{
    editor_controller::PhotoEditorController, event_bus::EventBus,
    gallery_controller::PhotoGalleryController,
};

pub struct ControllerOrchestrator {
    photo_assistant: Arc<dyn PhotoAssistantService>,
    upload_service: Arc<dyn UploadService>,
    events: EventBus,
    photo_editor: PhotoEditorController,
    photo_gallery: Option<PhotoGalleryController>,
}

impl ControllerOrchestrator {
    /// The service instances passed here are the only ones this orchestrator
    /// will ever use.
    pub fn new(
        photo_assistant: Arc<dyn PhotoAssistantService>,
        upload_service: Arc<dyn UploadService>,
        events: EventBus,
    ) -> Self {
        let photo_editor = PhotoEditorController::new(Arc::clone(&photo_assistant));
        Self {
            photo_assistant,
            upload_service,
            events,
            photo_editor,
            photo_gallery: None,
        }
    }

    /// Builds a fresh gallery controller and configures it. Any previous
    /// controller is dropped along with its subscriptions.
    pub fn construct_photo_gallery(
        &mut self,
        columns: f64,
        container: &str,
    ) -> Result<(), GalleryError> {
        GalleryConfiguration::validate(columns, container)?;

        let photo_gallery = PhotoGalleryController::new(
            Arc::clone(&self.photo_assistant),
            Arc::clone(&self.upload_service),
            &self.events,
        );
        photo_gallery.setup_photo_gallery(columns, container)?;

        if self.photo_gallery.replace(photo_gallery).is_some() {
            info!("previous photo gallery controller replaced");
        }
        Ok(())
    }

    pub fn upload_photos(&self) -> Result<(), GalleryError> {
        self.photo_gallery
            .as_ref()
            .ok_or(GalleryError::NotConfigured("photo gallery"))?
            .upload_photos()
    }

    pub fn edit_photo(&mut self, photo: Option<Photo>) -> Result<(), GalleryError> {
        self.photo_editor.add_photo_to_be_filtered(photo)
    }

    pub fn add_filter(&mut self, method: &str, value: &str) -> Result<(), GalleryError> {
        let request = FilterRequest::parse(method, value)?;
        self.photo_editor.add_filter(request)
    }

    pub fn apply_filter(&self) -> Result<(), GalleryError> {
        self.photo_editor.apply_filter()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn photo_gallery(&self) -> Option<&PhotoGalleryController> {
        self.photo_gallery.as_ref()
    }

    pub fn photo_editor(&self) -> &PhotoEditorController {
        &self.photo_editor
    }

    pub fn photo_assistant(&self) -> &Arc<dyn PhotoAssistantService> {
        &self.photo_assistant
    }

    pub fn upload_service(&self) -> &Arc<dyn UploadService> {
        &self.upload_service
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
