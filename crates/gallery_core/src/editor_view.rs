//! Behaviour of the photo editor modal, minus its markup: the filter form,
//! input validation, and the close broadcast.

use std::sync::Arc;

use shared::{
    domain::{FilterMethod, FilterValue, Photo},
    error::GalleryError,
    protocol::GalleryEvent,
};
use tracing::warn;

use crate::orchestrator::ControllerOrchestrator;

pub const INVALID_FILTER_VALUE_ALERT: &str = "Filter value needs to be a number";

/// Surfaces blocking messages to the user.
pub trait Alerts: Send + Sync {
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterForm {
    method: FilterMethod,
    value: String,
}

impl Default for FilterForm {
    fn default() -> Self {
        Self {
            method: FilterMethod::Brightness,
            value: String::new(),
        }
    }
}

impl FilterForm {
    pub fn select_method(&mut self, method: FilterMethod) {
        self.method = method;
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn method(&self) -> FilterMethod {
        self.method
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub struct PhotoEditorView {
    form: FilterForm,
    visible: bool,
    photo_to_be_edited: Option<Photo>,
    alerts: Arc<dyn Alerts>,
}

impl PhotoEditorView {
    pub fn new(alerts: Arc<dyn Alerts>) -> Self {
        Self {
            form: FilterForm::default(),
            visible: false,
            photo_to_be_edited: None,
            alerts,
        }
    }

    pub fn form(&self) -> &FilterForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FilterForm {
        &mut self.form
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn photo_to_be_edited(&self) -> Option<&Photo> {
        self.photo_to_be_edited.as_ref()
    }

    /// Queues `photo` for editing and shows the modal.
    pub fn open(
        &mut self,
        photo: Option<Photo>,
        orchestrator: &mut ControllerOrchestrator,
    ) -> Result<(), GalleryError> {
        let photo = photo.ok_or_else(|| GalleryError::invalid_argument("valid photo is required"))?;
        orchestrator.edit_photo(Some(photo.clone()))?;
        self.photo_to_be_edited = Some(photo);
        self.visible = true;
        Ok(())
    }

    /// Validates the form and, if the value is numeric, adds and applies the
    /// selected filter. A non-numeric value alerts, resets the form and
    /// leaves the orchestrator untouched.
    pub fn submit(&mut self, orchestrator: &mut ControllerOrchestrator) -> Result<(), GalleryError> {
        let method = self.form.method();
        if let Err(err) = FilterValue::parse(self.form.value()) {
            warn!(value = self.form.value(), "rejected filter value");
            self.alerts.alert(INVALID_FILTER_VALUE_ALERT);
            self.form.reset();
            return Err(err);
        }

        orchestrator.add_filter(method.as_str(), self.form.value())?;
        orchestrator.apply_filter()
    }

    pub fn close(&mut self, orchestrator: &ControllerOrchestrator) {
        self.visible = false;
        orchestrator
            .events()
            .publish(GalleryEvent::EditingModalClosed);
    }
}

#[cfg(test)]
#[path = "tests/editor_view_tests.rs"]
mod tests;
