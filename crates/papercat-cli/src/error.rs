//! Errors surfaced by the `papercat` command line.

use thiserror::Error;

use super::*;

/// Result alias for the CLI.
pub type Result<T> = core::result::Result<T, CliError>;

/// Everything a command can fail with.
#[derive(Error, Debug)]
pub enum CliError {
  /// Errors from the catalog library.
  #[error(transparent)]
  Papercat(#[from] PapercatError),

  /// A prompt could not be shown or read.
  #[error(transparent)]
  Dialog(#[from] dialoguer::Error),

  /// Reading input files or writing to the terminal failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// Neither a directory argument nor a saved default directory was available.
  #[error("No directory given and no default directory configured (see `papercat init --directory`)")]
  NoDirectory,

  /// No opener program could be started for a file.
  #[error("Could not hand '{}' to the system viewer or file manager", .0.display())]
  OpenFailed(PathBuf),
}
