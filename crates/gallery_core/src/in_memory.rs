use std::sync::Arc;

use photo_services::{InMemoryPhotoAssistant, StagedUploadService};
use shared::protocol::GalleryEvent;

use crate::{event_bus::EventBus, orchestrator::ControllerOrchestrator};

/// A self-contained set of collaborators: staged uploads, an in-memory
/// assistant and a bus on which upload completion is broadcast.
pub struct InMemoryServices {
    pub upload: Arc<StagedUploadService>,
    pub assistant: Arc<InMemoryPhotoAssistant>,
    pub events: EventBus,
}

impl InMemoryServices {
    pub fn new() -> Self {
        let upload = Arc::new(StagedUploadService::new());
        let assistant = Arc::new(InMemoryPhotoAssistant::new());
        let events = EventBus::new();

        let publisher = events.clone();
        upload.on_upload_complete(Box::new(move || {
            publisher.publish(GalleryEvent::PhotosUploaded)
        }));

        Self {
            upload,
            assistant,
            events,
        }
    }

    pub fn orchestrator(&self) -> ControllerOrchestrator {
        ControllerOrchestrator::new(
            self.assistant.clone(),
            self.upload.clone(),
            self.events.clone(),
        )
    }
}

impl Default for InMemoryServices {
    fn default() -> Self {
        Self::new()
    }
}
