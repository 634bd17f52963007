//! Orchestration core for the photo gallery: builds photos from uploaded
//! records, drives the assistant through the sort/display pipeline and
//! mediates the filter-editing round trip over an explicit event bus.

pub mod editor_controller;
pub mod editor_view;
pub mod event_bus;
pub mod gallery_controller;
pub mod in_memory;
pub mod orchestrator;
pub mod photo_model;

#[cfg(test)]
pub(crate) mod test_support;

pub use editor_controller::PhotoEditorController;
pub use editor_view::{Alerts, FilterForm, PhotoEditorView, INVALID_FILTER_VALUE_ALERT};
pub use event_bus::{EventBus, Subscription};
pub use gallery_controller::{ControllerState, PhotoGalleryController};
pub use in_memory::InMemoryServices;
pub use orchestrator::ControllerOrchestrator;
pub use photo_model::PhotoModel;
