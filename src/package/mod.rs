//! Target container handling and diagram injection
//!
//! The container is an OPC zip archive holding a WordprocessingML document.
//! [`DocxPackage`] models it as an in-memory map of part names to bytes with
//! typed operations for the pieces injection touches: the content-type
//! registry, the document relationship table, the settings compatibility
//! flag, and the document body. [`inject_diagram`] stages every mutation
//! before committing any of them, so a failed injection leaves the container
//! byte-for-byte unchanged.

mod docx;
mod injector;

pub use docx::{DocxPackage, Relationship};
pub use injector::{inject_diagram, Extent};

use thiserror::Error;

/// Errors raised by container operations
#[derive(Debug, Error)]
pub enum PackageError {
    /// Filesystem failure reading or writing the container archive
    #[error("i/o failure on {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    /// The container archive is not a readable zip
    #[error("container archive error: {0}")]
    Archive(String),

    /// A part the operation requires is absent from the container
    #[error("container is missing required part {name}")]
    MissingPart { name: String },

    /// A part exists but cannot be parsed
    #[error("malformed container part {name}: {message}")]
    MalformedPart { name: String, message: String },

    /// The allocated diagram index is already occupied
    #[error("part name collision: {name} already exists in the container")]
    PartCollision { name: String },
}
