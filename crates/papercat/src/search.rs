//! Fuzzy keyword search and the tag and recency listings.
//!
//! Search runs over whatever snapshot it is handed and is recomputed on every
//! call. A record matches when either:
//!
//! - every keyword scores at least the threshold under [`fuzz::partial_ratio`] against the record's
//!   [`FileRecord::search_text`], or
//! - all keywords joined by spaces score at least the threshold under [`fuzz::token_set_ratio`].
//!
//! Matches are ordered by publication year, newest first, with records lacking
//! a usable year at the end. Records with the same year keep snapshot order.
//!
//! # Examples
//!
//! ```no_run
//! use papercat::{catalog::Catalog, search};
//!
//! # fn example() -> papercat::error::Result<()> {
//! let catalog = Catalog::open("file_database.csv")?;
//! for record in search::search(catalog.records(), &["quantum", "smith"], 70) {
//!   println!("{:?} {}", record.year(), record.title());
//! }
//! for tag in search::tags(catalog.records()) {
//!   println!("{{{tag}}}");
//! }
//! # Ok(())
//! # }
//! ```

use std::{cmp::Reverse, collections::BTreeSet};

use chrono::NaiveDateTime;

use super::*;

/// Lowercased keywords with blanks dropped.
fn normalize<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
  keywords
    .iter()
    .map(|k| k.as_ref().trim().to_lowercase())
    .filter(|k| !k.is_empty())
    .collect()
}

/// Whether `text` matches `keywords` at `threshold`.
///
/// `text` is compared as given; keywords are lowercased. An empty keyword list
/// matches nothing.
pub fn matches<S: AsRef<str>>(text: &str, keywords: &[S], threshold: u8) -> bool {
  let keywords = normalize(keywords);
  if keywords.is_empty() {
    return false;
  }
  let individually = keywords.iter().all(|k| fuzz::partial_ratio(k, text) >= threshold);
  individually || fuzz::token_set_ratio(&keywords.join(" "), text) >= threshold
}

/// Records matching `keywords` at `threshold`, newest publication year first.
pub fn search<'a, S: AsRef<str>>(
  snapshot: &'a [FileRecord],
  keywords: &[S],
  threshold: u8,
) -> Vec<&'a FileRecord> {
  let mut results: Vec<&FileRecord> =
    snapshot.iter().filter(|r| matches(&r.search_text(), keywords, threshold)).collect();
  sort_by_year(&mut results);
  debug!("Search matched {} of {} records", results.len(), snapshot.len());
  results
}

/// Stable sort by year descending, missing years last.
pub fn sort_by_year(records: &mut [&FileRecord]) {
  records.sort_by_key(|r| match r.year() {
    Some(year) => (0, Reverse(year)),
    None => (1, Reverse(0)),
  });
}

/// Every distinct `{tag}` in the snapshot's comments, sorted.
pub fn tags(snapshot: &[FileRecord]) -> Vec<String> {
  snapshot.iter().flat_map(FileRecord::tags).collect::<BTreeSet<_>>().into_iter().collect()
}

/// Records whose comments contain `{tag}`, ignoring case, in snapshot order.
pub fn with_tag<'a>(snapshot: &'a [FileRecord], tag: &str) -> Vec<&'a FileRecord> {
  let marker = format!("{{{}}}", tag.to_lowercase());
  snapshot.iter().filter(|r| r.comments.to_lowercase().contains(&marker)).collect()
}

/// Records modified at or after `since`, newest first.
///
/// Records whose `modified_time` cannot be parsed are left out.
pub fn recent(snapshot: &[FileRecord], since: NaiveDateTime) -> Vec<&FileRecord> {
  let mut dated: Vec<(NaiveDateTime, &FileRecord)> = snapshot
    .iter()
    .filter_map(|r| r.modified_at().map(|at| (at, r)))
    .filter(|(at, _)| *at >= since)
    .collect();
  dated.sort_by_key(|(at, _)| Reverse(*at));
  dated.into_iter().map(|(_, r)| r).collect()
}
