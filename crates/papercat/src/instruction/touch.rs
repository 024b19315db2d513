//! Recording when a paper was last opened.

use super::*;

/// Stamps `last_used_time` of the record at `path` with the current local time.
#[derive(Debug, Clone)]
pub struct Touch {
  path: PathBuf,
}

impl Touch {
  /// Touches the record at `path`.
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }
}

impl CatalogInstruction for Touch {
  type Output = String;

  fn execute(&self, catalog: &mut Catalog) -> Result<Self::Output> {
    let record =
      catalog.get_mut(&self.path).ok_or_else(|| PapercatError::RecordNotFound(self.path.clone()))?;
    let now = record::now_timestamp();
    record.last_used_time = Some(now.clone());
    catalog.save()?;
    Ok(now)
  }
}
