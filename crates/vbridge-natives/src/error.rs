//! # Design
//!
//! - Provide structured, constant-message errors for native bootstrap.
//! - Capture operation context (paths, entry indices) to make failures reproducible in tests.
//! - Preserve source errors without interpolating context into error messages.

use std::env::JoinPathsError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for native bootstrap operations.
pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Errors produced while preparing native resources.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The plugin binary path has no parent directory or file name.
    #[error("invalid plugin binary path")]
    InvalidBinaryPath {
        /// Offending path.
        path: PathBuf,
    },
    /// Creating the native resource directory failed.
    #[error("failed to create native directory")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The platform archive could not be opened.
    #[error("failed to open native archive")]
    OpenArchive {
        /// Archive path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The platform archive is not a readable zip file.
    #[error("failed to decode native archive")]
    DecodeArchive {
        /// Archive path.
        path: PathBuf,
        /// Underlying zip error.
        source: zip::result::ZipError,
    },
    /// An archive entry could not be read.
    #[error("failed to read native archive entry")]
    ReadEntry {
        /// Index of the entry within the archive.
        index: usize,
        /// Underlying zip error.
        source: zip::result::ZipError,
    },
    /// An archive entry name cannot be used as a file name.
    #[error("invalid native archive entry")]
    InvalidEntry {
        /// Entry name as stored in the archive.
        name: String,
    },
    /// Copying an entry to disk failed.
    #[error("failed to extract native archive entry")]
    ExtractEntry {
        /// Operation that failed.
        operation: &'static str,
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The search path entries could not be joined.
    #[error("failed to join library search path")]
    JoinPaths {
        /// Underlying join error.
        source: JoinPathsError,
    },
}

impl BootstrapError {
    pub(crate) fn extract(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        Self::ExtractEntry {
            operation,
            path: path.into(),
            source,
        }
    }
}
