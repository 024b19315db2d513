//! Merging a scan back into the catalog.
//!
//! [`reconcile`] is the only place a scan result turns into catalog changes.
//! Changes are applied in a fixed order:
//!
//! 1. Moves rewrite the path, size and mtime of the record stored under the old path. Everything
//!    else about the record is kept.
//! 2. New files are appended, with whatever metadata block the caller extracted for them.
//! 3. Updates overwrite size and mtime only.
//! 4. Records that went missing and were not the source of a move are removed.
//!
//! The [`ReconcileReport`] always carries all four counts, zeros included.

use std::fmt;

use super::*;

/// Counts of what a reconciliation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
  /// Records whose path was rewritten.
  pub moved:   usize,
  /// Records appended.
  pub new:     usize,
  /// Records whose size or mtime was refreshed.
  pub updated: usize,
  /// Records dropped because their file is gone.
  pub removed: usize,
}

impl ReconcileReport {
  /// Whether nothing changed.
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  /// The report as display lines, always four, in moved/new/updated/removed order.
  pub fn lines(&self) -> [String; 4] {
    [
      format!("{} moved files found", self.moved),
      format!("{} new files found", self.new),
      format!("{} updated files found", self.updated),
      format!("{} removed files found", self.removed),
    ]
  }
}

impl fmt::Display for ReconcileReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.lines().join("\n"))
  }
}

/// Applies `scan` to `snapshot`, returning the new snapshot and a report.
///
/// `extractions` maps newly discovered paths to the metadata block extracted
/// for them. A new path without an entry gets an empty block. New records are
/// stamped with the current time as their `date_added`.
///
/// # Examples
///
/// ```no_run
/// use std::collections::HashMap;
///
/// use papercat::{catalog::Catalog, reconcile::reconcile, scanner::Scanner};
///
/// # fn example() -> papercat::error::Result<()> {
/// let mut catalog = Catalog::open("file_database.csv")?;
/// let scan = Scanner::default().scan("/home/me/papers", catalog.records())?;
/// let (records, report) = reconcile(catalog.snapshot(), &scan, &HashMap::new());
/// catalog.replace(records);
/// catalog.save()?;
/// println!("{report}");
/// # Ok(())
/// # }
/// ```
pub fn reconcile(
  snapshot: Vec<FileRecord>,
  scan: &ScanResult,
  extractions: &HashMap<PathBuf, String>,
) -> (Vec<FileRecord>, ReconcileReport) {
  let mut records = snapshot;
  let mut report = ReconcileReport::default();
  let mut move_sources: HashSet<&Path> = HashSet::new();

  for classification in &scan.classifications {
    if let ScanClassification::Moved { old_path, new_path, size_bytes, modified_time } =
      classification
    {
      match records.iter_mut().find(|r| r.path == *old_path) {
        Some(record) => {
          debug!("Moving record {} -> {}", old_path.display(), new_path.display());
          record.path = new_path.clone();
          record.name = record::file_name(new_path);
          record.extension = record::extension_of(new_path);
          record.size_bytes = *size_bytes;
          record.modified_time = modified_time.clone();
          report.moved += 1;
        },
        None => warn!("Move source {} is not in the snapshot", old_path.display()),
      }
      move_sources.insert(old_path.as_path());
    }
  }

  let date_added = record::now_timestamp();
  for classification in &scan.classifications {
    if let ScanClassification::New { path, name, extension, size_bytes, modified_time } =
      classification
    {
      if records.iter().any(|r| r.path == *path) {
        warn!("New file {} is already in the snapshot, skipping", path.display());
        continue;
      }
      debug!("Adding record {}", path.display());
      records.push(FileRecord {
        path:           path.clone(),
        name:           name.clone(),
        extension:      extension.clone(),
        size_bytes:     *size_bytes,
        modified_time:  modified_time.clone(),
        metadata_block: extractions.get(path).cloned().unwrap_or_default(),
        comments:       String::new(),
        last_used_time: None,
        date_added:     Some(date_added.clone()),
      });
      report.new += 1;
    }
  }

  for classification in &scan.classifications {
    if let ScanClassification::Updated { path, size_bytes, modified_time } = classification {
      if let Some(record) = records.iter_mut().find(|r| r.path == *path) {
        debug!("Updating record {}", path.display());
        record.size_bytes = *size_bytes;
        record.modified_time = modified_time.clone();
        report.updated += 1;
      }
    }
  }

  let residual: HashSet<&Path> = scan
    .missing
    .iter()
    .map(PathBuf::as_path)
    .filter(|path| !move_sources.contains(path))
    .collect();
  let before = records.len();
  records.retain(|r| {
    let gone = residual.contains(r.path.as_path());
    if gone {
      debug!("Removing missing record {}", r.path.display());
    }
    !gone
  });
  report.removed = before - records.len();

  info!(
    "Reconciled: {} moved, {} new, {} updated, {} removed",
    report.moved, report.new, report.updated, report.removed
  );
  (records, report)
}
