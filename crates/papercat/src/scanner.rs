//! Directory scanning and change classification.
//!
//! The [`Scanner`] walks a directory tree and compares every accepted file with
//! the current catalog snapshot. It never touches the snapshot itself; it
//! produces a [`ScanResult`] that the reconciler consumes.
//!
//! Classification, in priority order, for each discovered file:
//!
//! 1. Path in the snapshot with identical size and mtime: unchanged, nothing is emitted.
//! 2. Path in the snapshot with a different size or mtime: [`ScanClassification::Updated`].
//! 3. Path not in the snapshot, but its filename matches a snapshot record whose path no longer
//!    exists: [`ScanClassification::Moved`].
//! 4. Otherwise: [`ScanClassification::New`]. New PDFs are queued in
//!    [`ScanResult::pending_extraction`] rather than extracted during the scan.
//!
//! When several missing records share a filename, the first one in snapshot
//! order is matched to the first discovered file with that name, in walk order.
//! The walk visits entries sorted by filename, so repeated scans of the same
//! tree pair moves the same way.
//!
//! Only the stat pass runs in parallel, on a dedicated pool sized by
//! [`Scanner::with_workers`]. Classification is sequential.
//!
//! # Examples
//!
//! ```no_run
//! use papercat::{catalog::Catalog, scanner::Scanner};
//!
//! # fn example() -> papercat::error::Result<()> {
//! let catalog = Catalog::open("file_database.csv")?;
//! let result = Scanner::default().with_workers(4).scan("/home/me/papers", catalog.records())?;
//! println!(
//!   "{} new, {} updated, {} moved, {} missing",
//!   result.new_count(),
//!   result.updated_count(),
//!   result.moved_count(),
//!   result.missing.len()
//! );
//! # Ok(())
//! # }
//! ```

use std::{fs, time::SystemTime};

use rayon::prelude::*;
use walkdir::WalkDir;

use super::*;

/// How one discovered file differs from the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanClassification {
  /// A file the snapshot has never seen.
  New {
    /// Absolute path of the discovered file.
    path:          PathBuf,
    /// Base filename.
    name:          String,
    /// Lowercased extension with its leading dot.
    extension:     String,
    /// Size in bytes.
    size_bytes:    u64,
    /// Formatted mtime.
    modified_time: String,
  },
  /// A known path whose size or mtime changed.
  Updated {
    /// Path of the record to update.
    path:          PathBuf,
    /// New size in bytes.
    size_bytes:    u64,
    /// New formatted mtime.
    modified_time: String,
  },
  /// A record whose file now lives at a different path.
  Moved {
    /// Path stored in the snapshot, which no longer exists.
    old_path:      PathBuf,
    /// Path the file was discovered at.
    new_path:      PathBuf,
    /// Size in bytes at the new location.
    size_bytes:    u64,
    /// Formatted mtime at the new location.
    modified_time: String,
  },
}

/// Everything a scan found, ready for the reconciler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
  /// The scanned root.
  pub directory:          PathBuf,
  /// One entry per discovered file that is not unchanged, in walk order.
  pub classifications:    Vec<ScanClassification>,
  /// Snapshot paths that no longer exist on disk, in snapshot order.
  ///
  /// This includes the sources of moves; the reconciler subtracts those.
  pub missing:            Vec<PathBuf>,
  /// New PDFs that may be handed to a metadata extractor.
  pub pending_extraction: Vec<PathBuf>,
  /// Number of accepted files seen, unchanged ones included.
  pub discovered:         usize,
}

impl ScanResult {
  /// New files, in walk order.
  pub fn new_files(&self) -> impl Iterator<Item = &ScanClassification> {
    self.classifications.iter().filter(|c| matches!(c, ScanClassification::New { .. }))
  }

  /// Updated files, in walk order.
  pub fn updated_files(&self) -> impl Iterator<Item = &ScanClassification> {
    self.classifications.iter().filter(|c| matches!(c, ScanClassification::Updated { .. }))
  }

  /// Moved files, in walk order.
  pub fn moved_files(&self) -> impl Iterator<Item = &ScanClassification> {
    self.classifications.iter().filter(|c| matches!(c, ScanClassification::Moved { .. }))
  }

  /// Number of new files.
  pub fn new_count(&self) -> usize { self.new_files().count() }

  /// Number of updated files.
  pub fn updated_count(&self) -> usize { self.updated_files().count() }

  /// Number of moved files.
  pub fn moved_count(&self) -> usize { self.moved_files().count() }

  /// Whether the scan found nothing to reconcile.
  pub fn is_clean(&self) -> bool { self.classifications.is_empty() && self.missing.is_empty() }
}

/// Size and formatted mtime of one discovered file.
#[derive(Debug)]
struct FileStat {
  /// Discovered path.
  path:          PathBuf,
  /// Size in bytes.
  size_bytes:    u64,
  /// Formatted mtime.
  modified_time: String,
}

/// Walks a directory and classifies its files against a snapshot.
#[derive(Debug, Clone)]
pub struct Scanner {
  /// Accepted extensions, lowercase, without the dot.
  extensions: Vec<String>,
  /// Size of the stat worker pool.
  workers:    usize,
}

impl Default for Scanner {
  fn default() -> Self { Self { extensions: vec!["pdf".to_string()], workers: num_cpus::get() } }
}

impl Scanner {
  /// A scanner using the extensions and worker count from `config`.
  pub fn from_config(config: &Config) -> Self {
    Self::default()
      .with_extensions(config.extensions.as_slice())
      .with_workers(config.scan_workers)
  }

  /// Replaces the accepted extensions. Leading dots and case are ignored.
  pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
    self.extensions =
      extensions.iter().map(|e| e.as_ref().trim_start_matches('.').to_lowercase()).collect();
    self
  }

  /// Sets the stat worker pool size, at least one.
  pub fn with_workers(mut self, workers: usize) -> Self {
    self.workers = workers.max(1);
    self
  }

  /// Scans `directory` and classifies its files against `snapshot`.
  ///
  /// # Errors
  ///
  /// [`PapercatError::DirectoryNotFound`] when `directory` is not an existing
  /// directory. This is checked before anything else happens.
  pub fn scan(&self, directory: impl AsRef<Path>, snapshot: &[FileRecord]) -> Result<ScanResult> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
      return Err(PapercatError::DirectoryNotFound(directory.to_path_buf()));
    }
    info!("Scanning {}", directory.display());

    let known: HashMap<&Path, &FileRecord> =
      snapshot.iter().map(|r| (r.path.as_path(), r)).collect();

    let missing: Vec<PathBuf> =
      snapshot.iter().filter(|r| !r.path.exists()).map(|r| r.path.clone()).collect();
    let mut candidates: HashMap<String, VecDeque<PathBuf>> = HashMap::new();
    for path in &missing {
      candidates.entry(record::file_name(path)).or_default().push_back(path.clone());
    }
    debug!("{} snapshot records are missing from disk", missing.len());

    let discovered = self.discover(directory);
    let stats = self.stat_all(discovered)?;

    let mut result = ScanResult {
      directory: directory.to_path_buf(),
      missing,
      discovered: stats.len(),
      ..Default::default()
    };

    for stat in stats {
      let FileStat { path, size_bytes, modified_time } = stat;
      if let Some(record) = known.get(path.as_path()) {
        if record.is_unchanged(size_bytes, &modified_time) {
          trace!("Unchanged: {}", path.display());
        } else {
          trace!("Updated: {}", path.display());
          result.classifications.push(ScanClassification::Updated {
            path,
            size_bytes,
            modified_time,
          });
        }
        continue;
      }

      let name = record::file_name(&path);
      if let Some(old_path) = candidates.get_mut(&name).and_then(VecDeque::pop_front) {
        trace!("Moved: {} -> {}", old_path.display(), path.display());
        result.classifications.push(ScanClassification::Moved {
          old_path,
          new_path: path,
          size_bytes,
          modified_time,
        });
        continue;
      }

      trace!("New: {}", path.display());
      let extension = record::extension_of(&path);
      if extension == ".pdf" {
        result.pending_extraction.push(path.clone());
      }
      result.classifications.push(ScanClassification::New {
        path,
        name,
        extension,
        size_bytes,
        modified_time,
      });
    }

    info!(
      "Scan of {} finished: {} files, {} new, {} updated, {} moved, {} missing",
      directory.display(),
      result.discovered,
      result.new_count(),
      result.updated_count(),
      result.moved_count(),
      result.missing.len()
    );
    Ok(result)
  }

  /// Whether `path` carries one of the accepted extensions.
  fn accepts(&self, path: &Path) -> bool {
    path
      .extension()
      .map(|e| e.to_string_lossy().to_lowercase())
      .is_some_and(|e| self.extensions.iter().any(|accepted| *accepted == e))
  }

  /// Regular files under `directory` with an accepted extension, in walk order.
  fn discover(&self, directory: &Path) -> Vec<PathBuf> {
    WalkDir::new(directory)
      .sort_by_file_name()
      .into_iter()
      .filter_map(|entry| match entry {
        Ok(entry) => Some(entry),
        Err(e) => {
          warn!("Skipping unreadable entry during scan: {e}");
          None
        },
      })
      .filter(|entry| entry.file_type().is_file() && self.accepts(entry.path()))
      .filter(|entry| {
        let printable = entry.path().to_str().is_some();
        if !printable {
          warn!("Skipping {}: path is not valid UTF-8", entry.path().display());
        }
        printable
      })
      .map(|entry| entry.into_path())
      .collect()
  }

  /// Stats every path on the worker pool, keeping walk order.
  ///
  /// A file that disappears or cannot be read between the walk and the stat is
  /// skipped with a warning.
  fn stat_all(&self, paths: Vec<PathBuf>) -> Result<Vec<FileStat>> {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(self.workers).build().map_err(|e| {
      PapercatError::BackgroundTaskFailure(format!("failed to build scan worker pool: {e}"))
    })?;

    let stats = pool.install(|| {
      paths
        .into_par_iter()
        .filter_map(|path| match stat(&path) {
          Ok((size_bytes, modified)) =>
            Some(FileStat { path, size_bytes, modified_time: record::format_mtime(modified) }),
          Err(e) => {
            warn!("Could not stat {}: {e}", path.display());
            None
          },
        })
        .collect::<Vec<_>>()
    });
    Ok(stats)
  }
}

/// Size and mtime of one file.
fn stat(path: &Path) -> std::io::Result<(u64, SystemTime)> {
  let metadata = fs::metadata(path)?;
  Ok((metadata.len(), metadata.modified()?))
}
