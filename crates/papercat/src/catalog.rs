//! The record store: a catalog table persisted as a delimited file.
//!
//! A [`Catalog`] is the in-memory snapshot of one table plus the path it is
//! persisted to. It only does data access. Scanning, reconciliation and
//! duplicate resolution live in their own modules and hand the catalog a new
//! snapshot through [`Catalog::replace`] or remove records through
//! [`Catalog::remove`].
//!
//! Persistence is a whole-table overwrite. The table is rendered in memory
//! first, so a record that cannot be serialized leaves the file as it was.
//!
//! # Examples
//!
//! ```no_run
//! use papercat::catalog::Catalog;
//!
//! # fn example() -> papercat::error::Result<()> {
//! // Opening a table that does not exist creates it with the canonical columns.
//! let catalog = Catalog::open("file_database.csv")?;
//! for record in catalog.records() {
//!   println!("{} ({} bytes)", record.path.display(), record.size_bytes);
//! }
//! # Ok(())
//! # }
//! ```

use std::fs;

use csv::{ReaderBuilder, WriterBuilder};

use super::*;
use crate::record::COLUMNS;

/// A catalog snapshot and the file it is persisted to.
#[derive(Debug, Clone)]
pub struct Catalog {
  /// Location of the persisted table.
  path:    PathBuf,
  /// Records in table order.
  records: Vec<FileRecord>,
}

impl Catalog {
  /// Opens the table at `path`, creating it when it does not exist.
  ///
  /// Loading tolerates tables that carry only some of the canonical columns
  /// and ignores columns it does not know. Rows without a path are skipped, and
  /// a repeated path keeps only its first row.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    if !path.exists() {
      debug!("Creating empty catalog at {}", path.display());
      let catalog = Self { path, records: Vec::new() };
      if let Some(parent) = catalog.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
      }
      catalog.save()?;
      return Ok(catalog);
    }

    let mut reader = ReaderBuilder::new().flexible(true).from_path(&path)?;
    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for row in reader.deserialize::<FileRecord>() {
      let mut record = row?;
      if record.path.as_os_str().is_empty() {
        trace!("Skipping catalog row without a path");
        continue;
      }
      if !seen.insert(record.path.clone()) {
        warn!("Duplicate catalog row for {}, keeping the first", record.path.display());
        continue;
      }
      record.fill_derived_fields();
      records.push(record);
    }
    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(Self { path, records })
  }

  /// An unsaved catalog holding `records`, for callers that persist elsewhere.
  pub fn in_memory(path: impl Into<PathBuf>, records: Vec<FileRecord>) -> Self {
    Self { path: path.into(), records }
  }

  /// Overwrites the persisted table with the current snapshot.
  pub fn save(&self) -> Result<()> {
    let table = render(&self.records)?;
    fs::write(&self.path, table)?;
    debug!("Saved {} records to {}", self.records.len(), self.path.display());
    Ok(())
  }

  /// Persists `records` and makes them the current snapshot.
  ///
  /// On error neither the file nor the in-memory snapshot changes.
  pub fn commit(&mut self, records: Vec<FileRecord>) -> Result<()> {
    let table = render(&records)?;
    fs::write(&self.path, table)?;
    debug!("Committed {} records to {}", records.len(), self.path.display());
    self.records = records;
    Ok(())
  }

  /// Location of the persisted table.
  pub fn path(&self) -> &Path { &self.path }

  /// The current snapshot, in table order.
  pub fn records(&self) -> &[FileRecord] { &self.records }

  /// A copy of the current snapshot, for handing to a background task.
  pub fn snapshot(&self) -> Vec<FileRecord> { self.records.clone() }

  /// Number of records.
  pub fn len(&self) -> usize { self.records.len() }

  /// Whether the catalog has no records.
  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  /// The record for `path`, if any.
  pub fn get(&self, path: impl AsRef<Path>) -> Option<&FileRecord> {
    let path = path.as_ref();
    self.records.iter().find(|r| r.path == path)
  }

  /// Mutable access to the record for `path`, if any.
  pub fn get_mut(&mut self, path: impl AsRef<Path>) -> Option<&mut FileRecord> {
    let path = path.as_ref();
    self.records.iter_mut().find(|r| r.path == path)
  }

  /// Removes and returns the record for `path`, keeping the order of the rest.
  pub fn remove(&mut self, path: impl AsRef<Path>) -> Option<FileRecord> {
    let path = path.as_ref();
    let index = self.records.iter().position(|r| r.path == path)?;
    Some(self.records.remove(index))
  }

  /// Replaces the whole snapshot, as produced by the reconciler.
  pub fn replace(&mut self, records: Vec<FileRecord>) { self.records = records; }
}

/// Serializes `records` under the canonical header.
fn render(records: &[FileRecord]) -> Result<Vec<u8>> {
  let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
  writer.write_record(COLUMNS)?;
  for record in records {
    writer.serialize(record)?;
  }
  writer
    .into_inner()
    .map_err(|e| PapercatError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))
}
