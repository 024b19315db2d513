//! Reading and writing the citation block stored with each record.
//!
//! The block follows a fixed `@article` grammar:
//!
//! ```text
//! @article{Smith2020q,
//!   title = {Quantum Entanglement},
//!   author = {Smith, John and Doe, Jane},
//!   year = {2020},
//!   ...
//!   DOI = {10.1000/xyz},
//! }
//! ```
//!
//! Field lookup is a case-insensitive textual match on `name = {value}`, taking
//! the shortest value up to the first closing brace, with newlines folded to
//! spaces and surrounding whitespace trimmed. A missing field is an empty
//! string, never an error.

use std::collections::HashMap;

use rand::Rng;

use super::*;

/// Field names the block grammar defines.
pub const FIELDS: [&str; 9] =
  ["title", "author", "year", "volume", "pages", "number", "journal", "publisher", "doi"];

lazy_static! {
  /// Precompiled lookups for the fields in [`FIELDS`].
  static ref FIELD_PATTERNS: HashMap<&'static str, Regex> =
    FIELDS.iter().map(|name| (*name, field_pattern(name))).collect();
}

/// Builds the lookup pattern for one field name.
fn field_pattern(name: &str) -> Regex {
  // The escaped name cannot produce an invalid pattern.
  Regex::new(&format!(r"(?is){}\s*=\s*\{{(.*?)\}}", regex::escape(name))).unwrap()
}

/// Extracts one field from a citation block, or an empty string when absent.
///
/// # Examples
///
/// ```
/// use papercat::bibtex::parse_field;
///
/// let block = "@article{k,\n  DOI = {10.1000/\nxyz},\n}";
/// assert_eq!(parse_field(block, "doi"), "10.1000/ xyz");
/// assert_eq!(parse_field(block, "title"), "");
/// ```
pub fn parse_field(block: &str, name: &str) -> String {
  let lowered = name.to_lowercase();
  let captured = match FIELD_PATTERNS.get(lowered.as_str()) {
    Some(pattern) => pattern.captures(block).map(|c| c[1].to_string()),
    None => field_pattern(name).captures(block).map(|c| c[1].to_string()),
  };
  captured.map(|value| value.replace(['\r', '\n'], " ").trim().to_string()).unwrap_or_default()
}

/// The DOI field.
pub fn doi(block: &str) -> String { parse_field(block, "doi") }

/// The title field.
pub fn title(block: &str) -> String { parse_field(block, "title") }

/// The author field.
pub fn author(block: &str) -> String { parse_field(block, "author") }

/// The year field as a number, `None` when it is missing or not numeric.
pub fn year(block: &str) -> Option<i32> {
  let raw = parse_field(block, "year");
  raw
    .parse::<i32>()
    .ok()
    .or_else(|| raw.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i32))
}

/// Disambiguating citation key: first author surname, year, one random lowercase letter.
///
/// Returns `unknown` when either authors or year is empty. The letter is random,
/// so two papers by the same author in the same year can still collide.
pub fn citation_key(authors: &str, year: &str) -> String {
  if authors.trim().is_empty() || year.trim().is_empty() {
    return "unknown".to_string();
  }
  let surname = authors.split(',').next().and_then(|s| s.split(' ').next()).unwrap_or_default();
  let letter = rand::rng().random_range(b'a'..=b'z') as char;
  format!("{surname}{year}{letter}")
}

/// A citation that can be rendered into a metadata block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibEntry {
  /// Citation key; generated by [`BibEntry::to_block`] when empty.
  pub key:       String,
  /// Paper title.
  pub title:     String,
  /// Authors as `Family, Given` joined by ` and `.
  pub author:    String,
  /// Publication year.
  pub year:      String,
  /// Journal volume.
  pub volume:    String,
  /// Page range.
  pub pages:     String,
  /// Issue number.
  pub number:    String,
  /// Journal or container title.
  pub journal:   String,
  /// Publisher name.
  pub publisher: String,
  /// Digital Object Identifier.
  pub doi:       String,
}

impl BibEntry {
  /// Reads every known field back out of a block.
  pub fn parse(block: &str) -> Self {
    Self {
      key:       BLOCK_KEY.captures(block).map(|c| c[1].trim().to_string()).unwrap_or_default(),
      title:     parse_field(block, "title"),
      author:    parse_field(block, "author"),
      year:      parse_field(block, "year"),
      volume:    parse_field(block, "volume"),
      pages:     parse_field(block, "pages"),
      number:    parse_field(block, "number"),
      journal:   parse_field(block, "journal"),
      publisher: parse_field(block, "publisher"),
      doi:       parse_field(block, "doi"),
    }
  }

  /// Renders the entry in the `@article` grammar.
  pub fn to_block(&self) -> String {
    let key =
      if self.key.is_empty() { citation_key(&self.author, &self.year) } else { self.key.clone() };
    format!(
      "@article{{{key},\n  title = {{{}}},\n  author = {{{}}},\n  year = {{{}}},\n  volume = \
       {{{}}},\n  pages = {{{}}},\n  number = {{{}}},\n  journal = {{{}}},\n  publisher = \
       {{{}}},\n  DOI = {{{}}},\n}}",
      self.title,
      self.author,
      self.year,
      self.volume,
      self.pages,
      self.number,
      self.journal,
      self.publisher,
      self.doi,
    )
  }
}

lazy_static! {
  /// Matches the key in `@article{key,`.
  static ref BLOCK_KEY: Regex = Regex::new(r"@\w+\s*\{\s*([^,\s]*)\s*,").unwrap();
}
