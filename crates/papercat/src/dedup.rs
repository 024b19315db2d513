//! Finding and resolving records that describe the same paper.
//!
//! Two records are duplicates when their metadata blocks carry the same DOI.
//! Records without a DOI never take part. Within a [`DuplicateGroup`] the first
//! record in snapshot order is the canonical one and is always kept; the others
//! are candidates for deletion.
//!
//! Nothing is deleted without an explicit confirmation. A confirmed deletion
//! removes the file first and the record second, and keeps the record when the
//! file could not be removed.
//!
//! # Examples
//!
//! ```no_run
//! use papercat::{catalog::Catalog, dedup};
//!
//! # fn example() -> papercat::error::Result<()> {
//! let mut catalog = Catalog::open("file_database.csv")?;
//! for group in dedup::find_duplicate_groups(catalog.records()) {
//!   println!("{} is kept", group.canonical().path.display());
//!   for candidate in group.candidates() {
//!     // Ask the operator before deleting anything.
//!     let confirmed = false;
//!     dedup::resolve_duplicate(&mut catalog, &candidate.path, confirmed)?;
//!   }
//! }
//! catalog.save()?;
//! # Ok(())
//! # }
//! ```

use std::fs;

use super::*;

/// Records sharing one DOI, canonical record first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
  /// The shared DOI.
  pub identifier: String,
  /// At least two records, in snapshot order.
  pub records:    Vec<FileRecord>,
}

impl DuplicateGroup {
  /// The record that is kept.
  pub fn canonical(&self) -> &FileRecord { &self.records[0] }

  /// The records proposed for deletion.
  pub fn candidates(&self) -> &[FileRecord] { &self.records[1..] }
}

/// What happened to one deletion candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
  /// The file and its record were removed.
  Deleted,
  /// The operator declined; file and record are untouched.
  Kept,
}

/// Outcome of a confirmation pass over several groups.
#[derive(Debug, Default)]
pub struct DedupReport {
  /// Candidates whose file and record were removed.
  pub deleted:  Vec<PathBuf>,
  /// Candidates the operator declined to delete.
  pub declined: Vec<PathBuf>,
  /// Candidates whose deletion failed, with the error.
  pub failed:   Vec<(PathBuf, PapercatError)>,
}

/// Groups records by DOI, returning only groups of two or more.
///
/// Groups are ordered by the first appearance of their DOI in the snapshot.
pub fn find_duplicate_groups(snapshot: &[FileRecord]) -> Vec<DuplicateGroup> {
  let mut order: Vec<String> = Vec::new();
  let mut by_identifier: HashMap<String, Vec<FileRecord>> = HashMap::new();

  for record in snapshot {
    let identifier = record.doi();
    if identifier.trim().is_empty() {
      continue;
    }
    let members = by_identifier.entry(identifier.clone()).or_default();
    if members.is_empty() {
      order.push(identifier);
    }
    members.push(record.clone());
  }

  let groups: Vec<DuplicateGroup> = order
    .into_iter()
    .filter_map(|identifier| {
      let records = by_identifier.remove(&identifier)?;
      (records.len() >= 2).then_some(DuplicateGroup { identifier, records })
    })
    .collect();
  debug!("Found {} duplicate groups", groups.len());
  groups
}

/// Deletes one duplicate candidate when `confirmed`, otherwise leaves it alone.
///
/// # Errors
///
/// - [`PapercatError::RecordNotFound`] when `path` is not in the catalog.
/// - [`PapercatError::FileSystemOperationFailed`] when the file could not be removed. The record is
///   kept in that case.
pub fn resolve_duplicate(
  catalog: &mut Catalog,
  path: impl AsRef<Path>,
  confirmed: bool,
) -> Result<Resolution> {
  let path = path.as_ref();
  if catalog.get(path).is_none() {
    return Err(PapercatError::RecordNotFound(path.to_path_buf()));
  }
  if !confirmed {
    debug!("Keeping duplicate {}", path.display());
    return Ok(Resolution::Kept);
  }

  fs::remove_file(path).map_err(|source| {
    warn!("Could not delete duplicate {}: {source}", path.display());
    PapercatError::FileSystemOperationFailed { path: path.to_path_buf(), source }
  })?;
  catalog.remove(path);
  info!("Deleted duplicate {}", path.display());
  Ok(Resolution::Deleted)
}

/// Walks every candidate of every group, asking `confirm` for each one.
///
/// Failures are collected in the report and do not stop the pass.
pub fn resolve_groups(
  catalog: &mut Catalog,
  groups: &[DuplicateGroup],
  mut confirm: impl FnMut(&DuplicateGroup, &FileRecord) -> bool,
) -> DedupReport {
  let mut report = DedupReport::default();
  for group in groups {
    for candidate in group.candidates() {
      let confirmed = confirm(group, candidate);
      match resolve_duplicate(catalog, &candidate.path, confirmed) {
        Ok(Resolution::Deleted) => report.deleted.push(candidate.path.clone()),
        Ok(Resolution::Kept) => report.declined.push(candidate.path.clone()),
        Err(e) => report.failed.push((candidate.path.clone(), e)),
      }
    }
  }
  report
}

#[cfg(test)]
mod tests {
  use super::*;

  fn with_doi(path: &str, doi: &str) -> FileRecord {
    FileRecord::new(path, 1, "").with_metadata(format!("@article{{k,\n  DOI = {{{doi}}},\n}}"))
  }

  #[test]
  fn test_groups_only_shared_identifiers() {
    let snapshot = vec![
      with_doi("/p/1.pdf", "10.1/a"),
      with_doi("/p/2.pdf", "10.1/b"),
      with_doi("/p/3.pdf", "10.1/a"),
      FileRecord::new("/p/4.pdf", 1, ""),
      with_doi("/p/5.pdf", "  "),
      with_doi("/p/6.pdf", "  "),
    ];

    let groups = find_duplicate_groups(&snapshot);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].identifier, "10.1/a");
    assert_eq!(groups[0].canonical().path, PathBuf::from("/p/1.pdf"));
    assert_eq!(groups[0].candidates().len(), 1);
    assert_eq!(groups[0].candidates()[0].path, PathBuf::from("/p/3.pdf"));
  }

  #[test]
  fn test_group_order_follows_first_appearance() {
    let snapshot = vec![
      with_doi("/p/1.pdf", "10.1/z"),
      with_doi("/p/2.pdf", "10.1/a"),
      with_doi("/p/3.pdf", "10.1/a"),
      with_doi("/p/4.pdf", "10.1/z"),
      with_doi("/p/5.pdf", "10.1/z"),
    ];
    let groups = find_duplicate_groups(&snapshot);
    let ids: Vec<_> = groups.iter().map(|g| g.identifier.as_str()).collect();
    assert_eq!(ids, vec!["10.1/z", "10.1/a"]);
    assert_eq!(groups[0].records.len(), 3);
  }

  #[traced_test]
  #[test]
  fn test_declined_leaves_file_and_record() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("copy.pdf");
    std::fs::write(&file, b"pdf").unwrap();
    let mut catalog = Catalog::in_memory(dir.path().join("c.csv"), vec![
      with_doi(dir.path().join("orig.pdf").to_str().unwrap(), "10.1/a"),
      with_doi(file.to_str().unwrap(), "10.1/a"),
    ]);

    let resolution = resolve_duplicate(&mut catalog, &file, false).unwrap();
    assert_eq!(resolution, Resolution::Kept);
    assert!(file.exists());
    assert_eq!(catalog.len(), 2);
  }

  #[traced_test]
  #[test]
  fn test_confirmed_deletes_file_and_record() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("copy.pdf");
    std::fs::write(&file, b"pdf").unwrap();
    let mut catalog =
      Catalog::in_memory(dir.path().join("c.csv"), vec![with_doi(
        file.to_str().unwrap(),
        "10.1/a",
      )]);

    assert_eq!(resolve_duplicate(&mut catalog, &file, true).unwrap(), Resolution::Deleted);
    assert!(!file.exists());
    assert!(catalog.is_empty());
  }

  #[traced_test]
  #[test]
  fn test_failed_delete_keeps_record() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("already-gone.pdf");
    let mut catalog =
      Catalog::in_memory(dir.path().join("c.csv"), vec![with_doi(
        file.to_str().unwrap(),
        "10.1/a",
      )]);

    let result = resolve_duplicate(&mut catalog, &file, true);
    assert!(matches!(result, Err(PapercatError::FileSystemOperationFailed { .. })));
    assert_eq!(catalog.len(), 1);
  }

  #[test]
  fn test_unknown_record() {
    let mut catalog = Catalog::in_memory("c.csv", vec![]);
    let result = resolve_duplicate(&mut catalog, "/nowhere.pdf", true);
    assert!(matches!(result, Err(PapercatError::RecordNotFound(_))));
  }

  #[traced_test]
  #[test]
  fn test_resolve_groups_reports_each_outcome() {
    let dir = tempdir().unwrap();
    let keep = dir.path().join("keep.pdf");
    let delete = dir.path().join("delete.pdf");
    let missing = dir.path().join("missing.pdf");
    std::fs::write(&keep, b"1").unwrap();
    std::fs::write(&delete, b"2").unwrap();
    let mut catalog = Catalog::in_memory(dir.path().join("c.csv"), vec![
      with_doi(dir.path().join("canonical.pdf").to_str().unwrap(), "10.1/a"),
      with_doi(keep.to_str().unwrap(), "10.1/a"),
      with_doi(delete.to_str().unwrap(), "10.1/a"),
      with_doi(missing.to_str().unwrap(), "10.1/a"),
    ]);

    let groups = find_duplicate_groups(catalog.records());
    let report = resolve_groups(&mut catalog, &groups, |_, candidate| candidate.path != keep);
    assert_eq!(report.deleted, vec![delete]);
    assert_eq!(report.declined, vec![keep]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, missing);
    assert_eq!(catalog.len(), 3);
  }
}
