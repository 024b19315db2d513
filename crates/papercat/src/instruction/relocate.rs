//! Moving a paper's file into another folder.
//!
//! The file is moved first and the record rewritten second. If the move fails
//! the record is left as it was. A destination already holding a file with the
//! same name is refused without touching either file.

use std::{fs, io};

use super::*;

/// Moves the file of the record at `path` into `destination`.
#[derive(Debug, Clone)]
pub struct Relocate {
  path:        PathBuf,
  destination: PathBuf,
}

impl Relocate {
  /// Moves `path` into the directory `destination`, creating it when missing.
  pub fn new(path: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), destination: destination.into() }
  }
}

/// Renames `from` to `to`, copying and deleting when a rename is not possible.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
  if let Err(e) = fs::rename(from, to) {
    trace!("Rename failed ({e}), falling back to copy");
    fs::copy(from, to)?;
    if let Err(e) = fs::remove_file(from) {
      fs::remove_file(to).ok();
      return Err(e);
    }
  }
  Ok(())
}

impl CatalogInstruction for Relocate {
  type Output = PathBuf;

  fn execute(&self, catalog: &mut Catalog) -> Result<Self::Output> {
    if catalog.get(&self.path).is_none() {
      return Err(PapercatError::RecordNotFound(self.path.clone()));
    }
    let fs_error = |source: io::Error| PapercatError::FileSystemOperationFailed {
      path: self.path.clone(),
      source,
    };

    let name = self.path.file_name().ok_or_else(|| {
      fs_error(io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))
    })?;
    let target = self.destination.join(name);
    if target.exists() {
      return Err(fs_error(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{} already exists", target.display()),
      )));
    }

    fs::create_dir_all(&self.destination).map_err(fs_error)?;
    move_file(&self.path, &target).map_err(fs_error)?;

    if let Some(record) = catalog.get_mut(&self.path) {
      record.path = target.clone();
      record.name = record::file_name(&target);
    }
    catalog.save()?;
    info!("Moved {} to {}", self.path.display(), target.display());
    Ok(target)
  }
}
