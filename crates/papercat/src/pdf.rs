//! Reading the Info dictionary and leading page text of a PDF.
//!
//! This is the first half of metadata extraction: it finds the raw material a
//! DOI can be located in. Nothing here touches the network.

#![allow(missing_docs, clippy::missing_docs_in_private_items)]

use lopdf::{Dictionary, Document, Object};

use super::*;

/// What the analyzer pulled out of one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfContent {
  /// Values from the Info dictionary.
  pub metadata: PdfMetadata,
  /// Text of the leading pages, in page order.
  pub pages:    Vec<PageContent>,
}

impl PdfContent {
  /// Info dictionary values followed by page text, for pattern searches.
  pub fn text(&self) -> String {
    let m = &self.metadata;
    [&m.doi, &m.title, &m.subject, &m.keywords]
      .into_iter()
      .flatten()
      .map(String::as_str)
      .chain(self.pages.iter().map(|p| p.text.as_str()))
      .collect::<Vec<_>>()
      .join("\n")
  }
}

/// Entries of the Info dictionary that can carry bibliographic hints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfMetadata {
  pub title:    Option<String>,
  pub author:   Option<String>,
  pub subject:  Option<String>,
  pub keywords: Option<String>,
  /// Non-standard `doi` entry written by some publishers.
  pub doi:      Option<String>,
}

/// Text of one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContent {
  pub page_number: u32,
  pub text:        String,
}

/// Loads PDFs with `lopdf` and extracts [`PdfContent`].
#[derive(Debug, Clone)]
pub struct PdfAnalyzer {
  /// How many leading pages to extract text from.
  max_pages: usize,
}

impl Default for PdfAnalyzer {
  fn default() -> Self { Self { max_pages: 2 } }
}

impl PdfAnalyzer {
  pub fn new() -> Self { Self::default() }

  /// Limits text extraction to the first `max_pages` pages.
  pub fn with_max_pages(mut self, max_pages: usize) -> Self {
    self.max_pages = max_pages;
    self
  }

  /// Loads `path` and extracts its Info dictionary and leading page text.
  ///
  /// A page whose text cannot be decoded is skipped with a warning; only a
  /// document that cannot be loaded at all is an error.
  pub fn analyze(&self, path: impl AsRef<Path>) -> Result<PdfContent> {
    let path = path.as_ref();
    let doc = Document::load(path)?;
    let metadata = self.extract_metadata(&doc);

    let mut pages = Vec::new();
    for page_number in doc.get_pages().into_keys().take(self.max_pages) {
      match doc.extract_text(&[page_number]) {
        Ok(text) => pages.push(PageContent { page_number, text }),
        Err(e) => warn!("Could not extract text of page {page_number} in {}: {e}", path.display()),
      }
    }
    trace!("Analyzed {}: {} pages of text", path.display(), pages.len());
    Ok(PdfContent { metadata, pages })
  }

  fn extract_metadata(&self, doc: &Document) -> PdfMetadata {
    let info = match doc.trailer.get(b"Info") {
      Ok(Object::Reference(id)) => doc.get_object(*id).and_then(Object::as_dict).ok(),
      Ok(Object::Dictionary(dict)) => Some(dict),
      _ => None,
    };
    let Some(info) = info else {
      return PdfMetadata::default();
    };

    PdfMetadata {
      title:    text_from_dict(info, "Title"),
      author:   text_from_dict(info, "Author"),
      subject:  text_from_dict(info, "Subject"),
      keywords: text_from_dict(info, "Keywords"),
      doi:      text_from_dict(info, "doi").or_else(|| text_from_dict(info, "DOI")),
    }
  }
}

/// A string entry of `dict`, decoding UTF-16BE when it starts with a byte order mark.
fn text_from_dict(dict: &Dictionary, key: &str) -> Option<String> {
  let bytes = dict.get(key.as_bytes()).ok()?.as_str().ok()?;
  let text = if bytes.starts_with(&[0xFE, 0xFF]) {
    let (cow, ..) = encoding_rs::UTF_16BE.decode(&bytes[2..]);
    cow.into_owned()
  } else {
    String::from_utf8_lossy(bytes).into_owned()
  };
  let text = text.trim().to_string();
  (!text.is_empty()).then_some(text)
}
