//! Upload-to-display pipeline driven by lifecycle broadcasts.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use photo_services::{PhotoAssistantService, UploadService};
use shared::{
    domain::{GalleryConfiguration, Photo, PhotoRecord},
    error::GalleryError,
    protocol::GalleryEvent,
};
use tracing::{debug, error, info, warn};

use crate::{
    event_bus::{EventBus, Subscription},
    photo_model::PhotoModel,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Unconfigured,
    Configured,
}

#[derive(Debug, Clone, Copy)]
struct PipelineReport {
    fetched: usize,
    built: usize,
    registered: usize,
}

struct GalleryPipeline {
    photo_assistant: Arc<dyn PhotoAssistantService>,
    upload_service: Arc<dyn UploadService>,
    configuration: Option<GalleryConfiguration>,
    uploaded_photos_data: Vec<PhotoRecord>,
    photos: Vec<Photo>,
    registered: usize,
}

impl GalleryPipeline {
    fn on_photos_uploaded(&mut self) -> Result<PipelineReport, GalleryError> {
        let configuration = self.configuration()?.clone();

        let fetched = self.fetch_photo_data();
        let built = self.create_photos_from_data();
        let registered = self.add_photos_to_gallery()?;
        self.sort_photos_alphabetically()?;
        self.display_constructed_gallery(&configuration)?;

        Ok(PipelineReport {
            fetched,
            built,
            registered,
        })
    }

    fn on_editing_modal_closed(&mut self) -> Result<(), GalleryError> {
        let configuration = self.configuration()?.clone();
        self.sort_photos_alphabetically()?;
        self.display_constructed_gallery(&configuration)
    }

    fn configuration(&self) -> Result<&GalleryConfiguration, GalleryError> {
        self.configuration
            .as_ref()
            .ok_or(GalleryError::NotConfigured("photo gallery"))
    }

    /// A failed fetch is not fatal: the run goes on with whatever records are
    /// still pending from earlier fetches.
    fn fetch_photo_data(&mut self) -> usize {
        match self.upload_service.get_uploaded_photos_data() {
            Ok(records) => {
                let fetched = records.len();
                self.uploaded_photos_data.extend(records);
                debug!(fetched, "uploaded photo data fetched");
                fetched
            }
            Err(err) => {
                error!(
                    error = %err,
                    pending = self.uploaded_photos_data.len(),
                    "failed to fetch uploaded photo data; continuing with pending records"
                );
                0
            }
        }
    }

    fn create_photos_from_data(&mut self) -> usize {
        let before = self.photos.len();
        self.photos.extend(
            self.uploaded_photos_data
                .drain(..)
                .map(|record| PhotoModel::from_record(record).constructed_image_element()),
        );
        self.photos.len() - before
    }

    fn add_photos_to_gallery(&mut self) -> Result<usize, GalleryError> {
        let start = self.registered;
        for photo in &self.photos[start..] {
            self.photo_assistant
                .add_photo_to_gallery(photo, photo.display_name())
                .map_err(|err| GalleryError::collaborator("add photo to gallery", err))?;
            self.registered += 1;
        }
        Ok(self.registered - start)
    }

    fn sort_photos_alphabetically(&self) -> Result<(), GalleryError> {
        self.photo_assistant
            .sort_photos_alphabetically()
            .map_err(|err| GalleryError::collaborator("sort photos", err))
    }

    fn display_constructed_gallery(
        &self,
        configuration: &GalleryConfiguration,
    ) -> Result<(), GalleryError> {
        self.photo_assistant
            .display_gallery(configuration.columns, &configuration.container)
            .map_err(|err| GalleryError::collaborator("display gallery", err))
    }
}

fn lock(pipeline: &Mutex<GalleryPipeline>) -> MutexGuard<'_, GalleryPipeline> {
    pipeline.lock().unwrap_or_else(PoisonError::into_inner)
}

fn react(pipeline: &Weak<Mutex<GalleryPipeline>>, event: GalleryEvent) {
    let Some(pipeline) = pipeline.upgrade() else {
        return;
    };
    let mut pipeline = lock(&pipeline);
    if pipeline.configuration.is_none() {
        warn!(event = %event, "photo gallery is not configured; ignoring broadcast");
        return;
    }

    let outcome = match event {
        GalleryEvent::PhotosUploaded => pipeline.on_photos_uploaded().map(|report| {
            info!(
                fetched = report.fetched,
                built = report.built,
                registered = report.registered,
                "photo gallery rebuilt"
            );
        }),
        GalleryEvent::EditingModalClosed => pipeline
            .on_editing_modal_closed()
            .map(|()| debug!("photo gallery redisplayed after editing")),
    };
    if let Err(err) = outcome {
        error!(event = %event, error = %err, "photo gallery pipeline run failed");
    }
}

/// Owns one gallery's working set and keeps it in sync with the two broadcasts.
///
/// Dropping the controller drops its subscriptions, so a replaced controller
/// stops reacting immediately.
pub struct PhotoGalleryController {
    upload_service: Arc<dyn UploadService>,
    pipeline: Arc<Mutex<GalleryPipeline>>,
    _subscriptions: [Subscription; 2],
}

impl PhotoGalleryController {
    pub fn new(
        photo_assistant: Arc<dyn PhotoAssistantService>,
        upload_service: Arc<dyn UploadService>,
        events: &EventBus,
    ) -> Self {
        let pipeline = Arc::new(Mutex::new(GalleryPipeline {
            photo_assistant,
            upload_service: Arc::clone(&upload_service),
            configuration: None,
            uploaded_photos_data: Vec::new(),
            photos: Vec::new(),
            registered: 0,
        }));

        let subscriptions = GalleryEvent::ALL.map(|event| {
            let pipeline = Arc::downgrade(&pipeline);
            events.subscribe(event, move |event| react(&pipeline, event))
        });

        Self {
            upload_service,
            pipeline,
            _subscriptions: subscriptions,
        }
    }

    pub fn setup_photo_gallery(&self, columns: f64, container: &str) -> Result<(), GalleryError> {
        let configuration = GalleryConfiguration::validate(columns, container)?;
        info!(
            columns = configuration.columns.get(),
            container = %configuration.container,
            "photo gallery configured"
        );
        lock(&self.pipeline).configuration = Some(configuration);
        Ok(())
    }

    /// Fire-and-forget: the pipeline runs when `photosUploaded` is broadcast.
    pub fn upload_photos(&self) -> Result<(), GalleryError> {
        // No pipeline lock here; the service may broadcast completion synchronously.
        self.upload_service
            .upload_photo()
            .map_err(|err| GalleryError::collaborator("upload photos", err))
    }

    pub fn state(&self) -> ControllerState {
        match lock(&self.pipeline).configuration {
            Some(_) => ControllerState::Configured,
            None => ControllerState::Unconfigured,
        }
    }

    pub fn configuration(&self) -> Option<GalleryConfiguration> {
        lock(&self.pipeline).configuration.clone()
    }

    pub fn photos(&self) -> Vec<Photo> {
        lock(&self.pipeline).photos.clone()
    }

    pub fn registered_count(&self) -> usize {
        lock(&self.pipeline).registered
    }
}

#[cfg(test)]
#[path = "tests/gallery_controller_tests.rs"]
mod tests;
