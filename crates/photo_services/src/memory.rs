use std::{
    collections::HashMap,
    mem,
    num::NonZeroU32,
    sync::{Mutex, MutexGuard, PoisonError},
};

use anyhow::{anyhow, bail, Result};
use serde::Serialize;
use shared::domain::{FilterMethod, FilterRequest, FilterValue, Photo, PhotoId, PhotoRecord, SurfaceHandle};
use tracing::debug;

use crate::{CompletionHook, PhotoAssistantService, UploadService};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct UploadState {
    staged: Vec<PhotoRecord>,
    uploaded: Vec<PhotoRecord>,
    fetch_failure: Option<String>,
}

/// Upload service backed by records staged in memory.
///
/// `upload_photo` promotes everything staged so far into the uploaded batch and
/// then runs the completion hook. Each batch is handed out by exactly one fetch.
#[derive(Default)]
pub struct StagedUploadService {
    state: Mutex<UploadState>,
    on_complete: Mutex<Option<CompletionHook>>,
}

impl StagedUploadService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self, records: impl IntoIterator<Item = PhotoRecord>) {
        lock(&self.state).staged.extend(records);
    }

    pub fn on_upload_complete(&self, hook: CompletionHook) {
        *lock(&self.on_complete) = Some(hook);
    }

    /// Makes the next `get_uploaded_photos_data` call fail with `reason`.
    pub fn fail_next_fetch(&self, reason: impl Into<String>) {
        lock(&self.state).fetch_failure = Some(reason.into());
    }

    pub fn pending_uploaded(&self) -> usize {
        lock(&self.state).uploaded.len()
    }
}

impl UploadService for StagedUploadService {
    fn upload_photo(&self) -> Result<()> {
        let promoted = {
            let mut state = lock(&self.state);
            let staged = mem::take(&mut state.staged);
            let promoted = staged.len();
            state.uploaded.extend(staged);
            promoted
        };
        debug!(promoted, "staged photos uploaded");

        // The hook may publish a broadcast whose listeners fetch from this
        // service, so the state lock must already be released.
        if let Some(hook) = lock(&self.on_complete).as_ref() {
            hook();
        }
        Ok(())
    }

    fn get_uploaded_photos_data(&self) -> Result<Vec<PhotoRecord>> {
        let mut state = lock(&self.state);
        if let Some(reason) = state.fetch_failure.take() {
            bail!(reason);
        }
        Ok(mem::take(&mut state.uploaded))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryTile {
    pub photo_id: PhotoId,
    pub src: String,
    pub caption: String,
    pub column: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter: String,
}

/// Snapshot of a gallery as last displayed into one container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryLayout {
    pub container: SurfaceHandle,
    pub columns: u32,
    pub tiles: Vec<GalleryTile>,
}

impl GalleryLayout {
    pub fn captions(&self) -> Vec<&str> {
        self.tiles.iter().map(|tile| tile.caption.as_str()).collect()
    }

    pub fn column(&self, index: u32) -> Vec<&GalleryTile> {
        self.tiles
            .iter()
            .filter(|tile| tile.column == index)
            .collect()
    }
}

struct GalleryMember {
    photo: Photo,
    description: String,
    filters: Vec<FilterRequest>,
}

impl GalleryMember {
    fn css_filter(&self) -> String {
        self.filters
            .iter()
            .map(FilterRequest::render)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Default)]
struct AssistantState {
    members: Vec<GalleryMember>,
    filter_target: Option<PhotoId>,
    pending_filters: Vec<FilterRequest>,
    rendered: HashMap<SurfaceHandle, GalleryLayout>,
}

impl AssistantState {
    fn member_mut(&mut self, id: PhotoId) -> Option<&mut GalleryMember> {
        self.members.iter_mut().find(|member| member.photo.id() == id)
    }
}

/// Photo assistant that keeps gallery state in memory and renders layouts as data.
#[derive(Default)]
pub struct InMemoryPhotoAssistant {
    state: Mutex<AssistantState>,
}

impl InMemoryPhotoAssistant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered(&self, container: &SurfaceHandle) -> Option<GalleryLayout> {
        lock(&self.state).rendered.get(container).cloned()
    }

    /// Member descriptions in current gallery order.
    pub fn descriptions(&self) -> Vec<String> {
        lock(&self.state)
            .members
            .iter()
            .map(|member| member.description.clone())
            .collect()
    }

    pub fn applied_filters(&self, id: PhotoId) -> Vec<FilterRequest> {
        lock(&self.state)
            .members
            .iter()
            .find(|member| member.photo.id() == id)
            .map(|member| member.filters.clone())
            .unwrap_or_default()
    }
}

impl PhotoAssistantService for InMemoryPhotoAssistant {
    fn add_photo_to_gallery(&self, photo: &Photo, description: &str) -> Result<()> {
        let mut state = lock(&self.state);
        if let Some(member) = state.member_mut(photo.id()) {
            member.description = description.to_string();
            return Ok(());
        }
        state.members.push(GalleryMember {
            photo: photo.clone(),
            description: description.to_string(),
            filters: Vec::new(),
        });
        Ok(())
    }

    fn sort_photos_alphabetically(&self) -> Result<()> {
        let mut state = lock(&self.state);
        state
            .members
            .sort_by_cached_key(|member| member.description.to_lowercase());
        Ok(())
    }

    fn display_gallery(&self, columns: NonZeroU32, container: &SurfaceHandle) -> Result<()> {
        let mut state = lock(&self.state);
        let tiles = state
            .members
            .iter()
            .zip((0..columns.get()).cycle())
            .map(|(member, column)| GalleryTile {
                photo_id: member.photo.id(),
                src: member.photo.src().to_string(),
                caption: member.description.clone(),
                column,
                filter: member.css_filter(),
            })
            .collect();
        state.rendered.insert(
            container.clone(),
            GalleryLayout {
                container: container.clone(),
                columns: columns.get(),
                tiles,
            },
        );
        Ok(())
    }

    fn add_photo_to_be_filtered(&self, photo: &Photo) -> Result<()> {
        let mut state = lock(&self.state);
        if state.member_mut(photo.id()).is_none() {
            bail!("photo '{}' is not part of the gallery", photo.display_name());
        }
        state.filter_target = Some(photo.id());
        state.pending_filters.clear();
        Ok(())
    }

    fn add_filter(&self, method: FilterMethod, value: &FilterValue) -> Result<()> {
        let mut state = lock(&self.state);
        state.pending_filters.retain(|pending| pending.method != method);
        state.pending_filters.push(FilterRequest {
            method,
            value: value.clone(),
        });
        Ok(())
    }

    fn apply_filter(&self) -> Result<()> {
        let mut state = lock(&self.state);
        let target = state
            .filter_target
            .ok_or_else(|| anyhow!("no photo selected for filtering"))?;
        let pending = mem::take(&mut state.pending_filters);
        let member = state
            .member_mut(target)
            .ok_or_else(|| anyhow!("filter target {target} left the gallery"))?;
        for request in pending {
            match member
                .filters
                .iter_mut()
                .find(|applied| applied.method == request.method)
            {
                Some(applied) => *applied = request,
                None => member.filters.push(request),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/memory_tests.rs"]
mod tests;
