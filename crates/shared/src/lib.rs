//! Types shared between the gallery core, its collaborators and front ends.

pub mod domain;
pub mod error;
pub mod protocol;
