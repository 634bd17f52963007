use shared::domain::{Photo, PhotoId, PhotoRecord};

/// Builds a renderable [`Photo`] from one uploaded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoModel {
    url: String,
    name: String,
}

impl PhotoModel {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }

    pub fn from_record(record: PhotoRecord) -> Self {
        Self::new(record.url, record.name)
    }

    /// Each call yields a photo with a fresh identity.
    pub fn constructed_image_element(&self) -> Photo {
        Photo::new(PhotoId::new(), self.url.clone(), self.display_name())
    }

    fn display_name(&self) -> String {
        let name = self.name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
        file_stem(&self.url).to_string()
    }
}

fn file_stem(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let file = path.rsplit('/').next().unwrap_or(path);
    match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    }
}
