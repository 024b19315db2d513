//! The catalog row type and its timestamp conventions.
//!
//! A [`FileRecord`] is one row of the catalog table. Its serde attributes name
//! the table's columns, so the same struct is used for reading and writing the
//! persisted store.
//!
//! Timestamps are kept as strings, exactly as they appear in the table.
//! `modified_time` uses the `ctime` layout (`Mon Jan  1 09:30:00 2024`) and is
//! compared as a string during change detection. The other timestamps use
//! `%Y-%m-%d %H:%M:%S`. Parsing either one back into a date returns `None` on
//! failure instead of raising.

use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::Deserializer;

use super::*;

/// Column headers of the persisted table, in canonical order.
pub const COLUMNS: [&str; 9] = [
  "Path",
  "Name",
  "Extension",
  "Size",
  "Modified Date",
  "BibTeX",
  "Comments",
  "Last Used Time",
  "Date Added",
];

/// `strftime` layout for `modified_time`.
pub const MTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// `strftime` layout for `last_used_time` and `date_added`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One catalog entry, keyed by its absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
  /// Absolute filesystem path. Unique within a snapshot.
  #[serde(rename = "Path")]
  pub path:           PathBuf,
  /// Base filename.
  #[serde(rename = "Name", default)]
  pub name:           String,
  /// Lowercase extension including the leading dot, e.g. `.pdf`.
  #[serde(rename = "Extension", default)]
  pub extension:      String,
  /// File size in bytes.
  #[serde(rename = "Size", default, deserialize_with = "lenient_size")]
  pub size_bytes:     u64,
  /// Filesystem mtime, `ctime` formatted.
  #[serde(rename = "Modified Date", default)]
  pub modified_time:  String,
  /// Citation block; may be empty.
  #[serde(rename = "BibTeX", default)]
  pub metadata_block: String,
  /// Free text, may contain `{tag}` markers.
  #[serde(rename = "Comments", default)]
  pub comments:       String,
  /// When the operator last opened the paper.
  #[serde(rename = "Last Used Time", default)]
  pub last_used_time: Option<String>,
  /// When the scanner first added the paper.
  #[serde(rename = "Date Added", default)]
  pub date_added:     Option<String>,
}

impl FileRecord {
  /// Creates a record for a freshly discovered file, deriving name and extension from the path.
  pub fn new(path: impl Into<PathBuf>, size_bytes: u64, modified_time: impl Into<String>) -> Self {
    let path = path.into();
    Self {
      name: file_name(&path),
      extension: extension_of(&path),
      path,
      size_bytes,
      modified_time: modified_time.into(),
      metadata_block: String::new(),
      comments: String::new(),
      last_used_time: None,
      date_added: None,
    }
  }

  /// Sets the metadata block.
  pub fn with_metadata(mut self, block: impl Into<String>) -> Self {
    self.metadata_block = block.into();
    self
  }

  /// Sets the comments.
  pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
    self.comments = comments.into();
    self
  }

  /// The DOI recorded in the metadata block, empty when there is none.
  pub fn doi(&self) -> String { bibtex::doi(&self.metadata_block) }

  /// The publication year recorded in the metadata block.
  pub fn year(&self) -> Option<i32> { bibtex::year(&self.metadata_block) }

  /// The title from the metadata block, empty when there is none.
  pub fn title(&self) -> String { bibtex::title(&self.metadata_block) }

  /// The author list from the metadata block, empty when there is none.
  pub fn author(&self) -> String { bibtex::author(&self.metadata_block) }

  /// Parsed `modified_time`, `None` when the stored string is not a recognizable date.
  pub fn modified_at(&self) -> Option<NaiveDateTime> { parse_timestamp(&self.modified_time) }

  /// Whether the stored size and mtime match the given stat values.
  pub fn is_unchanged(&self, size_bytes: u64, modified_time: &str) -> bool {
    self.size_bytes == size_bytes && self.modified_time == modified_time
  }

  /// Lowercased concatenation of the fields searched by the fuzzy index.
  pub fn search_text(&self) -> String {
    format!(
      "{} {} {} {}",
      self.path.display(),
      self.name,
      self.metadata_block,
      self.comments
    )
    .to_lowercase()
  }

  /// All non-blank `{tag}` markers found in the comments, in order of appearance.
  pub fn tags(&self) -> Vec<String> {
    TAG_PATTERN
      .captures_iter(&self.comments)
      .map(|c| c[1].to_string())
      .filter(|tag| !tag.trim().is_empty())
      .collect()
  }

  /// Fills `name` and `extension` when a partial table left them empty.
  pub(crate) fn fill_derived_fields(&mut self) {
    if self.name.is_empty() {
      self.name = file_name(&self.path);
    }
    if self.extension.is_empty() {
      self.extension = extension_of(&self.path);
    }
  }
}

lazy_static! {
  /// Matches `{tag}` markers, shortest match.
  static ref TAG_PATTERN: Regex = Regex::new(r"\{(.*?)\}").unwrap();
}

/// Base filename of `path` as a string, empty when there is none.
pub fn file_name(path: &Path) -> String {
  path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Lowercased extension of `path` with its leading dot, empty when there is none.
pub fn extension_of(path: &Path) -> String {
  path
    .extension()
    .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
    .unwrap_or_default()
}

/// Formats a filesystem time as a catalog `modified_time`.
pub fn format_mtime(time: SystemTime) -> String {
  DateTime::<Local>::from(time).format(MTIME_FORMAT).to_string()
}

/// The current local time as a catalog timestamp.
pub fn now_timestamp() -> String { Local::now().format(TIMESTAMP_FORMAT).to_string() }

/// Parses any timestamp layout the catalog may contain.
///
/// Accepts the `ctime` layout (with any run of whitespace between parts),
/// `%Y-%m-%d %H:%M:%S`, RFC 3339 and a bare `%Y-%m-%d`. Anything else is `None`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
  let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
  if normalized.is_empty() {
    return None;
  }

  NaiveDateTime::parse_from_str(&normalized, "%a %b %d %H:%M:%S %Y")
    .or_else(|_| NaiveDateTime::parse_from_str(&normalized, TIMESTAMP_FORMAT))
    .ok()
    .or_else(|| DateTime::parse_from_rfc3339(&normalized).ok().map(|d| d.naive_local()))
    .or_else(|| {
      NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

/// Reads the size column, tolerating floats (`100.0`) and blanks written by other tools.
fn lenient_size<'de, D>(deserializer: D) -> core::result::Result<u64, D::Error>
where D: Deserializer<'de> {
  let raw = String::deserialize(deserializer)?;
  let raw = raw.trim();
  Ok(raw.parse::<u64>().ok().or_else(|| raw.parse::<f64>().ok().map(|f| f as u64)).unwrap_or(0))
}
