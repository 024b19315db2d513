//! Replacing the comments or metadata block of one record.

use super::*;

/// Which text field an [`Annotate`] overwrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
  /// Free-text comments, including `{tag}` markers.
  Comments(String),
  /// The citation block.
  Metadata(String),
}

/// Overwrites one text field of the record at `path`, then saves the catalog.
#[derive(Debug, Clone)]
pub struct Annotate {
  path:       PathBuf,
  annotation: Annotation,
}

impl Annotate {
  /// Replaces the comments of the record at `path`.
  pub fn comments(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
    Self { path: path.into(), annotation: Annotation::Comments(text.into()) }
  }

  /// Replaces the metadata block of the record at `path`.
  pub fn metadata(path: impl Into<PathBuf>, block: impl Into<String>) -> Self {
    Self { path: path.into(), annotation: Annotation::Metadata(block.into()) }
  }
}

impl CatalogInstruction for Annotate {
  type Output = FileRecord;

  fn execute(&self, catalog: &mut Catalog) -> Result<Self::Output> {
    let record =
      catalog.get_mut(&self.path).ok_or_else(|| PapercatError::RecordNotFound(self.path.clone()))?;
    match &self.annotation {
      Annotation::Comments(text) => record.comments = text.clone(),
      Annotation::Metadata(block) => record.metadata_block = block.clone(),
    }
    let updated = record.clone();
    catalog.save()?;
    debug!("Annotated {}", self.path.display());
    Ok(updated)
  }
}
