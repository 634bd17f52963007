use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidArgument,
    NotConfigured,
    CollaboratorFailure,
}

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("collaborator failure during {operation}: {source}")]
    CollaboratorFailure {
        operation: &'static str,
        source: anyhow::Error,
    },
}

impl GalleryError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn collaborator(operation: &'static str, source: anyhow::Error) -> Self {
        Self::CollaboratorFailure { operation, source }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            GalleryError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            GalleryError::NotConfigured(_) => ErrorCode::NotConfigured,
            GalleryError::CollaboratorFailure { .. } => ErrorCode::CollaboratorFailure,
        }
    }
}
