use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GalleryError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(PhotoId);

/// Raw metadata for one uploaded photo, as produced by the upload collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    #[serde(alias = "photoUrl")]
    pub url: String,
    #[serde(alias = "photoName")]
    pub name: String,
}

impl PhotoRecord {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// A renderable photo. Immutable once built; clones share the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Photo {
    id: PhotoId,
    src: String,
    alt: String,
}

impl Photo {
    pub fn new(id: PhotoId, src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            id,
            src: src.into(),
            alt: alt.into(),
        }
    }

    pub fn id(&self) -> PhotoId {
        self.id
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn display_name(&self) -> &str {
        &self.alt
    }
}

/// Opaque reference to the region a gallery is rendered into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SurfaceHandle(String);

impl SurfaceHandle {
    pub fn parse(raw: &str) -> Result<Self, GalleryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GalleryError::invalid_argument(
                "a photo gallery container is required",
            ));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(GalleryError::invalid_argument(format!(
                "'{trimmed}' is not a valid container reference"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SurfaceHandle {
    type Error = GalleryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SurfaceHandle> for String {
    fn from(value: SurfaceHandle) -> Self {
        value.0
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryConfiguration {
    pub columns: NonZeroU32,
    pub container: SurfaceHandle,
}

impl GalleryConfiguration {
    pub fn new(columns: u32, container: SurfaceHandle) -> Result<Self, GalleryError> {
        let columns = NonZeroU32::new(columns)
            .ok_or_else(|| GalleryError::invalid_argument("column count must be positive"))?;
        Ok(Self { columns, container })
    }

    /// Validates raw UI input. Both the orchestrator and the gallery controller
    /// go through here so they reject exactly the same values.
    pub fn validate(columns: f64, container: &str) -> Result<Self, GalleryError> {
        if !columns.is_finite() || columns <= 0.0 {
            return Err(GalleryError::invalid_argument(format!(
                "column count must be a positive number, got {columns}"
            )));
        }
        if columns.fract() != 0.0 || columns > f64::from(u32::MAX) {
            return Err(GalleryError::invalid_argument(format!(
                "column count must be a whole number of columns, got {columns}"
            )));
        }
        let container = SurfaceHandle::parse(container)?;
        // Range checked above, the cast cannot truncate.
        Self::new(columns as u32, container)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMethod {
    Brightness,
    Contrast,
    Sepia,
    Grayscale,
    Opacity,
    Saturate,
    Blur,
}

impl FilterMethod {
    pub const ALL: [FilterMethod; 7] = [
        FilterMethod::Brightness,
        FilterMethod::Contrast,
        FilterMethod::Sepia,
        FilterMethod::Grayscale,
        FilterMethod::Opacity,
        FilterMethod::Saturate,
        FilterMethod::Blur,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMethod::Brightness => "brightness",
            FilterMethod::Contrast => "contrast",
            FilterMethod::Sepia => "sepia",
            FilterMethod::Grayscale => "grayscale",
            FilterMethod::Opacity => "opacity",
            FilterMethod::Saturate => "saturate",
            FilterMethod::Blur => "blur",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            FilterMethod::Blur => "px",
            _ => "%",
        }
    }

    /// CSS-style filter function, e.g. `brightness(50%)`.
    pub fn render(&self, value: &FilterValue) -> String {
        format!("{}({}{})", self.as_str(), value.as_str(), self.unit())
    }
}

impl FromStr for FilterMethod {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FilterMethod::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| GalleryError::invalid_argument(format!("unknown filter method '{wanted}'")))
    }
}

impl fmt::Display for FilterMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter strength as entered by the user. Always a finite number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FilterValue(String);

impl FilterValue {
    pub fn parse(raw: &str) -> Result<Self, GalleryError> {
        let trimmed = raw.trim();
        let numeric = !trimmed.is_empty()
            && trimmed
                .parse::<f64>()
                .map(|value| value.is_finite())
                .unwrap_or(false);
        if !numeric {
            return Err(GalleryError::invalid_argument(format!(
                "filter value needs to be a number, got '{raw}'"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0.parse().unwrap_or_default()
    }
}

impl TryFrom<String> for FilterValue {
    type Error = GalleryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FilterValue> for String {
    fn from(value: FilterValue) -> Self {
        value.0
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    pub method: FilterMethod,
    pub value: FilterValue,
}

impl FilterRequest {
    pub fn parse(method: &str, value: &str) -> Result<Self, GalleryError> {
        Ok(Self {
            method: method.parse()?,
            value: FilterValue::parse(value)?,
        })
    }

    pub fn render(&self) -> String {
        self.method.render(&self.value)
    }
}
