//! Local catalog management for research papers.
//!
//! `papercat` keeps a tabular catalog of the PDFs in a directory tree and keeps
//! it in step with what is actually on disk:
//!
//! - Scan a directory and classify every file as new, updated, moved or unchanged
//! - Reconcile the scan into the catalog and report what changed
//! - Extract bibliographic metadata from new PDFs through their DOI
//! - Find and, on confirmation, delete duplicate papers sharing a DOI
//! - Fuzzy keyword search, tag and recency listings
//!
//! # Getting Started
//!
//! ```no_run
//! use std::collections::HashMap;
//!
//! use papercat::{config::Config, Papercat};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let mut papercat = Papercat::open(Config::default(), "/home/me/papers")?;
//!
//!   // Scan in the background, then reconcile on this thread.
//!   papercat.start_scan()?;
//!   let scan = papercat.wait_scan().await.expect("a scan was started")?;
//!   let report = papercat.apply_scan(&scan, &HashMap::new())?;
//!   println!("{report}");
//!
//!   for group in papercat.find_duplicates() {
//!     println!("{} copies of {}", group.records.len(), group.identifier);
//!   }
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`catalog`]: the persisted record store
//! - [`scanner`]: directory walk and change classification
//! - [`reconcile`]: merging a scan into the catalog
//! - [`dedup`]: duplicate detection and confirmed deletion
//! - [`search`] and [`fuzz`]: fuzzy search and listings
//! - [`extract`] and [`pdf`]: metadata extraction
//! - [`instruction`]: edits and lookups in command form
//! - [`task`]: the single background task slot

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::{HashMap, HashSet, VecDeque},
  path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod bibtex;
pub mod catalog;
pub mod config;
pub mod dedup;
pub mod error;
pub mod extract;
pub mod fuzz;
pub mod instruction;
pub mod pdf;
pub mod reconcile;
pub mod record;
pub mod scanner;
pub mod search;
pub mod task;

use crate::{
  bibtex::BibEntry,
  catalog::Catalog,
  config::Config,
  dedup::{DedupReport, DuplicateGroup, Resolution},
  error::*,
  instruction::CatalogInstruction,
  pdf::PdfAnalyzer,
  reconcile::ReconcileReport,
  record::FileRecord,
  scanner::{ScanClassification, ScanResult, Scanner},
  task::TaskSlot,
};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use papercat::{catalog::Catalog, instruction::Touch, prelude::*};
///
/// fn example() -> Result<(), PapercatError> {
///   let mut catalog = Catalog::open("file_database.csv")?;
///   Touch::new("/papers/epr.pdf").execute(&mut catalog)?;
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    error::PapercatError, extract::MetadataExtractor, instruction::CatalogInstruction,
  };
}

/// The application core: one scan root, its catalog and the background task slot.
///
/// All catalog mutation goes through this type on the caller's thread. Only the
/// scan itself runs in the background, on a copy of the snapshot.
#[derive(Debug)]
pub struct Papercat {
  /// Active configuration.
  config:    Config,
  /// Directory this catalog describes.
  directory: PathBuf,
  /// The catalog for `directory`.
  catalog:   Catalog,
  /// At most one outstanding scan.
  scan_task: TaskSlot<ScanResult>,
}

impl Papercat {
  /// Opens the catalog for `directory` at the location chosen by `config`.
  pub fn open(config: Config, directory: impl Into<PathBuf>) -> Result<Self> {
    let directory = directory.into();
    let catalog_path = config.catalog_path_for(&directory);
    Self::with_catalog_path(config, directory, catalog_path)
  }

  /// Opens `directory` with its catalog at an explicit `catalog_path`.
  pub fn with_catalog_path(
    config: Config,
    directory: impl Into<PathBuf>,
    catalog_path: impl AsRef<Path>,
  ) -> Result<Self> {
    config.validate()?;
    let catalog = Catalog::open(catalog_path)?;
    Ok(Self { config, directory: directory.into(), catalog, scan_task: TaskSlot::new() })
  }

  /// Active configuration.
  pub fn config(&self) -> &Config { &self.config }

  /// Directory this catalog describes.
  pub fn directory(&self) -> &Path { &self.directory }

  /// The catalog.
  pub fn catalog(&self) -> &Catalog { &self.catalog }

  /// Runs `instruction` against the catalog.
  pub fn execute<I: CatalogInstruction>(&mut self, instruction: &I) -> Result<I::Output> {
    instruction.execute(&mut self.catalog)
  }

  /// Whether a scan is outstanding.
  pub fn is_busy(&self) -> bool { self.scan_task.is_busy() }

  /// Starts scanning the directory in the background.
  ///
  /// Must be called from within a tokio runtime.
  ///
  /// # Errors
  ///
  /// [`PapercatError::TaskInFlight`] while a previous scan is uncollected.
  pub fn start_scan(&mut self) -> Result<()> {
    let scanner = Scanner::from_config(&self.config);
    let directory = self.directory.clone();
    let snapshot = self.catalog.snapshot();
    self.scan_task.start(move || scanner.scan(directory, &snapshot))
  }

  /// The scan outcome once finished, `None` while it is still running or when no scan was started.
  pub fn poll_scan(&mut self) -> Option<Result<ScanResult>> { self.scan_task.poll() }

  /// Waits for the outstanding scan, `None` when no scan was started.
  pub async fn wait_scan(&mut self) -> Option<Result<ScanResult>> { self.scan_task.wait().await }

  /// Reconciles `scan` into the catalog and saves it.
  ///
  /// When the save fails the catalog keeps its previous snapshot.
  ///
  /// `extractions` maps new paths to their metadata blocks, see
  /// [`reconcile::reconcile`].
  pub fn apply_scan(
    &mut self,
    scan: &ScanResult,
    extractions: &HashMap<PathBuf, String>,
  ) -> Result<ReconcileReport> {
    let (records, report) = reconcile::reconcile(self.catalog.snapshot(), scan, extractions);
    self.catalog.commit(records)?;
    Ok(report)
  }

  /// Duplicate groups in the current catalog.
  pub fn find_duplicates(&self) -> Vec<DuplicateGroup> {
    dedup::find_duplicate_groups(self.catalog.records())
  }

  /// Deletes one duplicate when `confirmed` and saves the catalog.
  ///
  /// See [`dedup::resolve_duplicate`].
  pub fn resolve_duplicate(
    &mut self,
    path: impl AsRef<Path>,
    confirmed: bool,
  ) -> Result<Resolution> {
    let resolution = dedup::resolve_duplicate(&mut self.catalog, path, confirmed)?;
    if resolution == Resolution::Deleted {
      self.catalog.save()?;
    }
    Ok(resolution)
  }

  /// Walks every duplicate candidate in `groups`, deleting those `confirm` accepts.
  ///
  /// The catalog is saved once at the end when anything was deleted.
  pub fn resolve_groups(
    &mut self,
    groups: &[DuplicateGroup],
    confirm: impl FnMut(&DuplicateGroup, &FileRecord) -> bool,
  ) -> Result<DedupReport> {
    let report = dedup::resolve_groups(&mut self.catalog, groups, confirm);
    if !report.deleted.is_empty() {
      self.catalog.save()?;
    }
    Ok(report)
  }
}
