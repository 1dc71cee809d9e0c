//! Error types for session operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from tagging operations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// Clear was requested for text that carries no tag
    #[error(
        "An existing tag was not found for the selected text. Make sure you've selected \
         all the text for this tag (including whitespace) and try again."
    )]
    NoExistingTag,
}

/// Errors from exporting a session to CSV
#[derive(Error, Debug)]
pub enum ExportError {
    /// Destination could not be opened for writing
    #[error("Failed to create {path:?}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be written
    #[error("CSV write error: {0}")]
    Write(#[from] csv::Error),

    /// Buffered output could not be flushed to the destination
    #[error("Failed to flush export: {0}")]
    Flush(#[from] std::io::Error),
}
