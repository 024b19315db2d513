//! Turning a PDF into a metadata block.
//!
//! The catalog treats extraction as an opaque function from a file path to a
//! citation block. It is slow and may fail, so it never runs inside the scan:
//! callers collect [`ScanResult::pending_extraction`], ask the operator which
//! files to extract, and run the extractor one file at a time.
//!
//! [`DoiExtractor`] is the default implementation:
//!
//! 1. [`PdfAnalyzer`] reads the Info dictionary and the first pages.
//! 2. The first DOI found is resolved at `https://doi.org` as CSL JSON.
//! 3. The response is rendered with [`BibEntry::to_block`].
//!
//! # Examples
//!
//! ```no_run
//! use papercat::extract::{extract_or_empty, DoiExtractor};
//!
//! # async fn example() {
//! let extractor = DoiExtractor::new();
//! let block = extract_or_empty(&extractor, "/home/me/papers/new.pdf").await;
//! if block.is_empty() {
//!   println!("no metadata found");
//! }
//! # }
//! ```

use async_trait::async_trait;
use reqwest::header;
use serde_json::Value;

use super::*;

/// Base URL DOIs are resolved against.
pub const DOI_RESOLVER: &str = "https://doi.org";

/// Content type requested from the resolver.
const CSL_JSON: &str = "application/vnd.citationstyles.csl+json";

lazy_static! {
  /// A DOI as it appears in running text.
  static ref DOI_PATTERN: Regex = Regex::new(r"10\.\d{4,9}/[-._;()/:A-Za-z0-9]+").unwrap();
}

/// Something that can produce a metadata block for a file.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
  /// Produces the metadata block for `path`.
  ///
  /// Any failure is an error; callers decide whether to degrade it.
  async fn extract(&self, path: &Path) -> Result<String>;
}

/// Finds the first DOI in `text`, with trailing sentence punctuation removed.
///
/// ```
/// use papercat::extract::find_doi;
///
/// assert_eq!(find_doi("see doi:10.1103/PhysRev.47.777."), Some("10.1103/PhysRev.47.777".into()));
/// assert_eq!(find_doi("no identifier here"), None);
/// ```
pub fn find_doi(text: &str) -> Option<String> {
  DOI_PATTERN
    .find(text)
    .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', ')']).to_string())
    .filter(|doi| !doi.is_empty())
}

/// Extracts metadata by locating a DOI in the PDF and resolving it online.
#[derive(Debug, Clone)]
pub struct DoiExtractor {
  client:   reqwest::Client,
  analyzer: PdfAnalyzer,
  resolver: String,
}

impl Default for DoiExtractor {
  fn default() -> Self {
    Self {
      client:   reqwest::Client::new(),
      analyzer: PdfAnalyzer::default(),
      resolver: DOI_RESOLVER.to_string(),
    }
  }
}

impl DoiExtractor {
  /// An extractor resolving against [`DOI_RESOLVER`].
  pub fn new() -> Self { Self::default() }

  /// Resolves DOIs against `base` instead, e.g. a local mirror.
  pub fn with_resolver(mut self, base: impl Into<String>) -> Self {
    self.resolver = base.into().trim_end_matches('/').to_string();
    self
  }

  /// Sets the analyzer used to read the PDF.
  pub fn with_analyzer(mut self, analyzer: PdfAnalyzer) -> Self {
    self.analyzer = analyzer;
    self
  }

  /// The DOI found in the PDF at `path`, if any.
  ///
  /// An Info dictionary `doi` entry wins over anything in the page text.
  pub async fn locate_doi(&self, path: &Path) -> Result<Option<String>> {
    let analyzer = self.analyzer.clone();
    let owned = path.to_path_buf();
    let content = tokio::task::spawn_blocking(move || analyzer.analyze(&owned))
      .await
      .map_err(|e| PapercatError::BackgroundTaskFailure(e.to_string()))??;
    Ok(content.metadata.doi.as_deref().and_then(find_doi).or_else(|| find_doi(&content.text())))
  }

  /// Fetches the CSL JSON record of `doi` and maps it to a [`BibEntry`].
  pub async fn resolve(&self, doi: &str) -> Result<BibEntry> {
    let url = format!("{}/{doi}", self.resolver);
    debug!("Resolving {url}");
    let response = self.client.get(&url).header(header::ACCEPT, CSL_JSON).send().await?;
    if !response.status().is_success() {
      return Err(PapercatError::ExtractionFailed(format!(
        "resolver answered {} for {doi}",
        response.status()
      )));
    }
    let data = response.bytes().await?;
    let json: Value = serde_json::from_slice(&data)?;
    csl_to_entry(&json, doi)
  }
}

#[async_trait]
impl MetadataExtractor for DoiExtractor {
  async fn extract(&self, path: &Path) -> Result<String> {
    let doi = self.locate_doi(path).await?.ok_or_else(|| {
      PapercatError::ExtractionFailed(format!("no DOI found in {}", path.display()))
    })?;
    debug!("Found DOI {doi} in {}", path.display());
    Ok(self.resolve(&doi).await?.to_block())
  }
}

/// Runs `extractor`, turning any failure into an empty block.
pub async fn extract_or_empty(
  extractor: &dyn MetadataExtractor,
  path: impl AsRef<Path>,
) -> String {
  let path = path.as_ref();
  match extractor.extract(path).await {
    Ok(block) => block,
    Err(e) => {
      warn!("Metadata extraction failed for {}: {e}", path.display());
      String::new()
    },
  }
}

/// A string field of a CSL record, empty when missing.
fn csl_text(json: &Value, field: &str) -> String {
  match json.get(field) {
    Some(Value::String(s)) => s.trim().to_string(),
    Some(Value::Number(n)) => n.to_string(),
    Some(Value::Array(items)) =>
      items.first().and_then(Value::as_str).map(str::trim).unwrap_or_default().to_string(),
    _ => String::new(),
  }
}

/// Maps a CSL JSON record to a [`BibEntry`].
///
/// Authors become `Family, Given` joined by ` and `. The year comes from
/// `created.date-parts`, falling back to `issued.date-parts`. A record without a
/// title is rejected.
pub fn csl_to_entry(json: &Value, doi: &str) -> Result<BibEntry> {
  let title = csl_text(json, "title");
  if title.is_empty() {
    return Err(PapercatError::ExtractionFailed(format!("no title in record for {doi}")));
  }

  let author = json
    .get("author")
    .and_then(Value::as_array)
    .map(|authors| {
      authors
        .iter()
        .filter_map(|a| {
          let family = a.get("family").and_then(Value::as_str).unwrap_or_default().trim();
          let given = a.get("given").and_then(Value::as_str).unwrap_or_default().trim();
          match (family.is_empty(), given.is_empty()) {
            (false, false) => Some(format!("{family}, {given}")),
            (false, true) => Some(family.to_string()),
            (true, false) => Some(given.to_string()),
            (true, true) => a.get("name").and_then(Value::as_str).map(str::to_string),
          }
        })
        .collect::<Vec<_>>()
        .join(" and ")
    })
    .unwrap_or_default();

  let year = ["created", "issued"]
    .iter()
    .find_map(|key| json.get(*key)?.get("date-parts")?.get(0)?.get(0)?.as_i64())
    .map(|y| y.to_string())
    .unwrap_or_default();

  let doi_field = csl_text(json, "DOI");
  let key = bibtex::citation_key(&author, &year);
  Ok(BibEntry {
    key,
    title,
    author,
    year,
    volume: csl_text(json, "volume"),
    pages: csl_text(json, "page"),
    number: csl_text(json, "issue"),
    journal: csl_text(json, "container-title"),
    publisher: csl_text(json, "publisher"),
    doi: if doi_field.is_empty() { doi.to_string() } else { doi_field },
  })
}
