//! Error types for the papercat library.
//!
//! Errors fall into two groups. Errors that are global to an operation (a scan
//! target that does not exist, a second background task while one is running)
//! abort the operation before anything is mutated. Errors that are local to a
//! single file or record (a failed extraction, a failed delete) are reported to
//! the caller, who decides whether to continue with the rest of the batch.
//!
//! Parse failures for dates, years and identifiers never show up here: those
//! parsers return `Option` or an empty string instead.
//!
//! # Examples
//!
//! ```no_run
//! use papercat::{catalog::Catalog, error::PapercatError, scanner::Scanner};
//!
//! # fn example() -> Result<(), PapercatError> {
//! let catalog = Catalog::open("papers.csv")?;
//! match Scanner::default().scan("/does/not/exist", catalog.records()) {
//!   Err(PapercatError::DirectoryNotFound(dir)) => println!("missing: {}", dir.display()),
//!   Err(e) => println!("other error: {e}"),
//!   Ok(result) => println!("{} new files", result.new_count()),
//! }
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Error type alias used for the [`papercat`](crate) crate.
pub type Result<T> = core::result::Result<T, PapercatError>;

/// Errors that can occur when working with a paper catalog.
#[derive(Error, Debug)]
pub enum PapercatError {
  /// The directory handed to the scanner does not exist.
  ///
  /// Raised before any filesystem walk takes place, so the snapshot is
  /// guaranteed to be untouched.
  #[error("The directory '{}' does not exist.", .0.display())]
  DirectoryNotFound(PathBuf),

  /// Metadata extraction failed or produced unusable data.
  ///
  /// Callers in the update pipeline degrade this to an empty metadata block;
  /// it is only surfaced directly when an extractor is called on its own.
  #[error("Metadata extraction failed: {0}")]
  ExtractionFailed(String),

  /// Moving or deleting a file on disk failed.
  ///
  /// This can occur when:
  /// - The process lacks permission for the file or its directory
  /// - The file is held open by another program
  /// - The destination path is already taken
  #[error("File system operation failed for '{}': {source}", path.display())]
  FileSystemOperationFailed {
    /// The file the operation was acting on.
    path:   PathBuf,
    /// The underlying I/O failure.
    source: std::io::Error,
  },

  /// A background task was requested while another one is still running.
  #[error("Another background task is still running")]
  TaskInFlight,

  /// A background task panicked or could not be joined.
  #[error("Background task failed: {0}")]
  BackgroundTaskFailure(String),

  /// An instruction referred to a path that is not in the catalog.
  #[error("No catalog record for '{}'", .0.display())]
  RecordNotFound(PathBuf),

  /// A file system operation outside of a specific move/delete failed.
  ///
  /// This covers reading and writing the catalog file itself, reading the
  /// configuration, and stat calls during a scan.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// Reading or writing the catalog table failed.
  #[error(transparent)]
  Csv(#[from] csv::Error),

  /// A metadata lookup request failed.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// PDF parsing errors from the lopdf library.
  ///
  /// Common cases are malformed or encrypted files, and missing objects in the
  /// document structure.
  #[error(transparent)]
  Lopdf(#[from] lopdf::Error),

  /// A metadata response could not be decoded.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The configuration could not be serialized.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// Invalid or missing configuration.
  #[error("{0}")]
  Config(String),
}
