//! Recording collaborators shared by the unit test suites.

use std::{
    collections::VecDeque,
    num::NonZeroU32,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, Result};
use photo_services::{PhotoAssistantService, UploadService};
use shared::domain::{FilterMethod, FilterValue, Photo, PhotoRecord, SurfaceHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Upload,
    Fetch,
    AddPhoto { src: String, description: String },
    Sort,
    Display { columns: u32, container: String },
    AddPhotoToBeFiltered(String),
    AddFilter(String, String),
    ApplyFilter,
}

pub(crate) type CallLog = Arc<Mutex<Vec<Call>>>;

pub(crate) fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().expect("call log").clone()
}

pub(crate) fn count(log: &CallLog, wanted: fn(&Call) -> bool) -> usize {
    calls(log).iter().filter(|call| wanted(call)).count()
}

pub(crate) struct RecordingAssistant {
    log: CallLog,
    fail_with: Option<String>,
}

impl RecordingAssistant {
    pub(crate) fn new(log: &CallLog) -> Self {
        Self {
            log: Arc::clone(log),
            fail_with: None,
        }
    }

    pub(crate) fn failing(log: &CallLog, err: impl Into<String>) -> Self {
        Self {
            log: Arc::clone(log),
            fail_with: Some(err.into()),
        }
    }

    fn record(&self, call: Call) -> Result<()> {
        self.log.lock().expect("call log").push(call);
        match &self.fail_with {
            Some(err) => Err(anyhow!(err.clone())),
            None => Ok(()),
        }
    }
}

impl PhotoAssistantService for RecordingAssistant {
    fn add_photo_to_gallery(&self, photo: &Photo, description: &str) -> Result<()> {
        self.record(Call::AddPhoto {
            src: photo.src().to_string(),
            description: description.to_string(),
        })
    }

    fn sort_photos_alphabetically(&self) -> Result<()> {
        self.record(Call::Sort)
    }

    fn display_gallery(&self, columns: NonZeroU32, container: &SurfaceHandle) -> Result<()> {
        self.record(Call::Display {
            columns: columns.get(),
            container: container.to_string(),
        })
    }

    fn add_photo_to_be_filtered(&self, photo: &Photo) -> Result<()> {
        self.record(Call::AddPhotoToBeFiltered(photo.display_name().to_string()))
    }

    fn add_filter(&self, method: FilterMethod, value: &FilterValue) -> Result<()> {
        self.record(Call::AddFilter(
            method.as_str().to_string(),
            value.as_str().to_string(),
        ))
    }

    fn apply_filter(&self) -> Result<()> {
        self.record(Call::ApplyFilter)
    }
}

/// Upload double whose fetch results are scripted up front. It never signals
/// completion; tests publish the broadcast themselves.
pub(crate) struct ScriptedUpload {
    log: CallLog,
    fetches: Mutex<VecDeque<Result<Vec<PhotoRecord>, String>>>,
    upload_error: Option<String>,
}

impl ScriptedUpload {
    pub(crate) fn new(log: &CallLog) -> Self {
        Self {
            log: Arc::clone(log),
            fetches: Mutex::new(VecDeque::new()),
            upload_error: None,
        }
    }

    pub(crate) fn refusing(log: &CallLog, err: impl Into<String>) -> Self {
        let mut upload = Self::new(log);
        upload.upload_error = Some(err.into());
        upload
    }

    pub(crate) fn then_batch(self, records: Vec<PhotoRecord>) -> Self {
        self.fetches.lock().expect("fetches").push_back(Ok(records));
        self
    }

    pub(crate) fn then_failure(self, err: impl Into<String>) -> Self {
        self.fetches.lock().expect("fetches").push_back(Err(err.into()));
        self
    }
}

impl UploadService for ScriptedUpload {
    fn upload_photo(&self) -> Result<()> {
        self.log.lock().expect("call log").push(Call::Upload);
        match &self.upload_error {
            Some(err) => Err(anyhow!(err.clone())),
            None => Ok(()),
        }
    }

    fn get_uploaded_photos_data(&self) -> Result<Vec<PhotoRecord>> {
        self.log.lock().expect("call log").push(Call::Fetch);
        match self.fetches.lock().expect("fetches").pop_front() {
            Some(Ok(records)) => Ok(records),
            Some(Err(err)) => Err(anyhow!(err)),
            None => Ok(Vec::new()),
        }
    }
}

pub(crate) fn zebra_and_apple() -> Vec<PhotoRecord> {
    vec![
        PhotoRecord::new("a.png", "Zebra"),
        PhotoRecord::new("b.png", "Apple"),
    ]
}
