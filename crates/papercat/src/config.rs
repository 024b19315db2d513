//! Configuration for catalog locations, scanning and search defaults.
//!
//! The configuration lives in a TOML file, by default
//! `<platform config dir>/papercat/config.toml`. A missing file is not an error:
//! [`Config::load`] falls back to [`Config::default`].
//!
//! Each scanned directory gets its own catalog table inside
//! [`Config::catalog_dir`]; see [`Config::catalog_path_for`].
//!
//! # Examples
//!
//! ```no_run
//! use papercat::config::Config;
//!
//! # fn example() -> papercat::error::Result<()> {
//! let config = Config::load(Config::default_path())?.with_search_threshold(80);
//! let catalog = config.catalog_path_for("/home/me/papers");
//! println!("catalog for this directory: {}", catalog.display());
//! # Ok(())
//! # }
//! ```

use std::fs;

use super::*;

/// Default similarity threshold for searches.
pub const DEFAULT_SEARCH_THRESHOLD: u8 = 70;

/// Default look-back window, in days, for the recent papers listing.
pub const DEFAULT_RECENT_DAYS: u32 = 28;

/// Longest sanitized directory component used in a catalog filename.
const MAX_SAFE_NAME_LEN: usize = 200;

/// User configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Directory holding the per-directory catalog tables.
  pub catalog_dir:            PathBuf,
  /// Single-line text file naming the directory to scan when none is given.
  pub default_directory_file: PathBuf,
  /// Accepted file extensions, without the dot, compared case-insensitively.
  pub extensions:             Vec<String>,
  /// Number of workers used for the parallel stat pass.
  pub scan_workers:           usize,
  /// Default similarity threshold, 0-100.
  pub search_threshold:       u8,
  /// Window for the recent papers listing.
  pub recent_days:            u32,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      catalog_dir:            Self::default_catalog_dir(),
      default_directory_file: Self::default_config_dir().join("default_directory.txt"),
      extensions:             vec!["pdf".to_string()],
      scan_workers:           num_cpus::get().max(1),
      search_threshold:       DEFAULT_SEARCH_THRESHOLD,
      recent_days:            DEFAULT_RECENT_DAYS,
    }
  }
}

impl Config {
  /// Platform config directory for papercat.
  ///
  /// - On Unix: `~/.config/papercat`
  /// - On macOS: `~/Library/Application Support/papercat`
  /// - On Windows: `%APPDATA%\papercat`
  /// - Fallback: `./papercat`
  pub fn default_config_dir() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("papercat")
  }

  /// Default location of the configuration file.
  pub fn default_path() -> PathBuf { Self::default_config_dir().join("config.toml") }

  /// Default directory for catalog tables.
  pub fn default_catalog_dir() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("papercat")
  }

  /// Loads a configuration file, or the defaults when it does not exist.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if !path.exists() {
      debug!("No config at {}, using defaults", path.display());
      return Ok(Self::default());
    }
    let content = fs::read_to_string(path)?;
    let config: Self = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
  }

  /// Writes this configuration, creating parent directories as needed.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(self)?)?;
    Ok(())
  }

  /// Rejects values the scanner and search cannot work with.
  pub fn validate(&self) -> Result<()> {
    if self.scan_workers == 0 {
      return Err(PapercatError::Config("scan_workers must be at least 1".into()));
    }
    if self.search_threshold > 100 {
      return Err(PapercatError::Config("search_threshold must be between 0 and 100".into()));
    }
    if self.extensions.is_empty() {
      return Err(PapercatError::Config("at least one extension must be accepted".into()));
    }
    Ok(())
  }

  /// Sets the directory holding the per-directory catalog tables.
  pub fn with_catalog_dir(mut self, dir: &Path) -> Self {
    self.catalog_dir = dir.to_path_buf();
    self
  }

  /// Sets the file remembering the default scan directory.
  pub fn with_default_directory_file(mut self, path: &Path) -> Self {
    self.default_directory_file = path.to_path_buf();
    self
  }

  /// Sets the accepted extensions, with or without a leading dot.
  pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
    self.extensions =
      extensions.iter().map(|e| e.as_ref().trim_start_matches('.').to_lowercase()).collect();
    self
  }

  /// Sets the stat worker count, at least 1.
  pub fn with_scan_workers(mut self, workers: usize) -> Self {
    self.scan_workers = workers.max(1);
    self
  }

  /// Sets the default search threshold, capped at 100.
  pub fn with_search_threshold(mut self, threshold: u8) -> Self {
    self.search_threshold = threshold.min(100);
    self
  }

  /// Sets the window of the recent papers listing.
  pub fn with_recent_days(mut self, days: u32) -> Self {
    self.recent_days = days;
    self
  }

  /// Catalog table for a scan root: `file_database_<sanitized directory>.csv`.
  pub fn catalog_path_for(&self, directory: impl AsRef<Path>) -> PathBuf {
    self.catalog_dir.join(catalog_file_name(directory.as_ref()))
  }

  /// The default scan directory named by [`Config::default_directory_file`], if any.
  pub fn default_directory(&self) -> Option<PathBuf> {
    load_default_directory(&self.default_directory_file)
  }

  /// Records `directory` as the default scan directory.
  pub fn save_default_directory(&self, directory: impl AsRef<Path>) -> Result<()> {
    if let Some(parent) = self.default_directory_file.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(&self.default_directory_file, format!("{}\n", directory.as_ref().display()))?;
    Ok(())
  }
}

lazy_static! {
  /// Windows drive prefix, e.g. `C:\`.
  static ref DRIVE_PREFIX: Regex = Regex::new(r"^[a-zA-Z]:\\").unwrap();
  /// Characters that may not appear in a filename on common platforms.
  static ref UNSAFE_CHARS: Regex = Regex::new(r#"[<>:"/\\|?*]"#).unwrap();
}

/// Sanitizes a directory path into a catalog filename.
pub fn catalog_file_name(directory: &Path) -> String {
  let raw = directory.to_string_lossy();
  let without_drive = DRIVE_PREFIX.replace(&raw, "");
  let safe = UNSAFE_CHARS.replace_all(&without_drive, "_").replace(' ', "_");
  let safe: String = safe.chars().take(MAX_SAFE_NAME_LEN).collect();
  format!("file_database_{safe}.csv")
}

/// Reads the first line of the default directory file.
///
/// A missing file, an unreadable file or a blank first line all mean "no
/// default"; the read error is logged rather than returned.
pub fn load_default_directory(path: impl AsRef<Path>) -> Option<PathBuf> {
  let path = path.as_ref();
  if !path.exists() {
    warn!("Default directory file not found: {}", path.display());
    return None;
  }
  match fs::read_to_string(path) {
    Ok(content) => content
      .lines()
      .next()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .map(PathBuf::from),
    Err(e) => {
      warn!("Error reading default directory from {}: {e}", path.display());
      None
    },
  }
}
