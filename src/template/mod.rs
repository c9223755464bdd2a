//! Template bundle loading and caching
//!
//! Every supported topology has a template archive produced offline by
//! opening Word, inserting a diagram of that layout, and saving the result.
//! The archive is the only trustworthy source for two things this crate
//! cannot derive: the presentation substructure of the seed graph, and the
//! exact relationship-type strings Word expects for each diagram part
//! (three of the five live in a vendor namespace, not the OPC one).
//!
//! Bundles are read once per topology and cached; repository contents are
//! read-only after load.

mod bundle;
mod repository;

pub use bundle::{ArtifactKind, TemplateBundle};
pub use repository::TemplateRepository;

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading template bundles
///
/// All of these indicate a missing or broken build-time asset, not a
/// runtime condition; none are retryable.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template archive exists for the topology
    #[error("template for '{topology}' not found at {path}")]
    NotFound { topology: String, path: PathBuf },

    /// The archive is present but one of the five artifacts or one of the
    /// relationship manifest entries is missing
    #[error("template for '{topology}' is incomplete: missing {missing}")]
    Incomplete { topology: String, missing: String },

    /// The archive could not be opened or read
    #[error("cannot read template archive for '{topology}': {message}")]
    Archive { topology: String, message: String },

    /// The archive's relationship manifest could not be parsed
    #[error("malformed relationship manifest in template '{topology}': {message}")]
    Manifest { topology: String, message: String },
}
