use std::fmt;

use serde::{Deserialize, Serialize};

/// Name-addressed lifecycle broadcasts. They carry no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GalleryEvent {
    PhotosUploaded,
    EditingModalClosed,
}

impl GalleryEvent {
    pub const ALL: [GalleryEvent; 2] = [GalleryEvent::PhotosUploaded, GalleryEvent::EditingModalClosed];

    pub fn name(&self) -> &'static str {
        match self {
            GalleryEvent::PhotosUploaded => "photosUploaded",
            GalleryEvent::EditingModalClosed => "editingModalClosed",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        GalleryEvent::ALL
            .into_iter()
            .find(|event| event.name() == name)
    }
}

impl fmt::Display for GalleryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
