//! Read-only lookups over the catalog.
//!
//! A [`Query`] wraps the fuzzy search and the listings from
//! [`search`](crate::search) so they can be run like any other instruction.
//! Results are owned copies of the matching records.

use chrono::{Duration, Local, NaiveDateTime};

use super::*;

/// Ways to select records.
#[derive(Debug, Clone)]
pub enum QueryCriteria {
  /// Fuzzy keyword search, ordered by publication year.
  Keywords {
    /// Terms to look for.
    keywords:  Vec<String>,
    /// Similarity threshold, 0-100.
    threshold: u8,
  },
  /// Records carrying a `{tag}` in their comments.
  Tag(String),
  /// Records modified at or after a point in time, newest first.
  ModifiedSince(NaiveDateTime),
  /// Every record, in catalog order.
  All,
}

/// A lookup over the catalog.
#[derive(Debug, Clone)]
pub struct Query {
  criteria: QueryCriteria,
}

impl Query {
  /// A query with the given criteria.
  pub fn new(criteria: QueryCriteria) -> Self { Self { criteria } }

  /// Fuzzy search at the default threshold.
  pub fn keywords<S: AsRef<str>>(keywords: &[S]) -> Self {
    Self::new(QueryCriteria::Keywords {
      keywords:  keywords.iter().map(|k| k.as_ref().to_string()).collect(),
      threshold: config::DEFAULT_SEARCH_THRESHOLD,
    })
  }

  /// Records tagged `tag`.
  pub fn tag(tag: impl Into<String>) -> Self { Self::new(QueryCriteria::Tag(tag.into())) }

  /// Records modified within the last `days` days.
  pub fn recent(days: u32) -> Self { Self::within(Duration::days(i64::from(days))) }

  /// Records modified within the last `hours` hours.
  pub fn recent_hours(hours: u32) -> Self { Self::within(Duration::hours(i64::from(hours))) }

  /// Records modified within `window` of now.
  fn within(window: Duration) -> Self {
    Self::new(QueryCriteria::ModifiedSince(Local::now().naive_local() - window))
  }

  /// Every record.
  pub fn all() -> Self { Self::new(QueryCriteria::All) }

  /// Overrides the similarity threshold of a keyword search. Other criteria ignore it.
  pub fn with_threshold(mut self, threshold: u8) -> Self {
    if let QueryCriteria::Keywords { threshold: current, .. } = &mut self.criteria {
      *current = threshold.min(100);
    }
    self
  }
}

impl CatalogInstruction for Query {
  type Output = Vec<FileRecord>;

  fn execute(&self, catalog: &mut Catalog) -> Result<Self::Output> {
    let snapshot = catalog.records();
    let found: Vec<&FileRecord> = match &self.criteria {
      QueryCriteria::Keywords { keywords, threshold } =>
        search::search(snapshot, keywords.as_slice(), *threshold),
      QueryCriteria::Tag(tag) => search::with_tag(snapshot, tag),
      QueryCriteria::ModifiedSince(since) => search::recent(snapshot, *since),
      QueryCriteria::All => snapshot.iter().collect(),
    };
    Ok(found.into_iter().cloned().collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn catalog() -> Catalog {
    Catalog::in_memory("unused.csv", vec![
      FileRecord::new("/p/epr.pdf", 1, "Mon Jan  1 09:00:00 2024")
        .with_metadata("title = {Quantum Reality},\n  year = {1935}")
        .with_comments("{classic}"),
      FileRecord::new("/p/bell.pdf", 1, "garbage")
        .with_metadata("title = {On the Einstein Podolsky Rosen Paradox},\n  year = {1964}"),
      FileRecord::new("/p/notes.pdf", 1, &record::format_mtime(std::time::SystemTime::now())),
    ])
  }

  #[test]
  fn test_keyword_query() {
    let mut catalog = catalog();
    let found = Query::keywords(&["einstein", "paradox"]).execute(&mut catalog).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "bell.pdf");

    let all = Query::keywords(&["pdf"]).with_threshold(100).execute(&mut catalog).unwrap();
    let names: Vec<_> = all.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["bell.pdf", "epr.pdf", "notes.pdf"]);
  }

  #[test]
  fn test_tag_recent_and_all() {
    let mut catalog = catalog();
    let tagged = Query::tag("Classic").execute(&mut catalog).unwrap();
    assert_eq!(tagged.len(), 1);

    let recent = Query::recent(28).execute(&mut catalog).unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].name, "notes.pdf");

    assert_eq!(Query::all().execute(&mut catalog).unwrap().len(), 3);
  }

  #[test]
  fn test_recent_hours() {
    let hours_ago = |h: u64| {
      record::format_mtime(std::time::SystemTime::now() - std::time::Duration::from_secs(h * 3600))
    };
    let mut catalog = Catalog::in_memory("unused.csv", vec![
      FileRecord::new("/p/yesterday.pdf", 1, &hours_ago(30)),
      FileRecord::new("/p/morning.pdf", 1, &hours_ago(2)),
    ]);

    let found = Query::recent_hours(12).execute(&mut catalog).unwrap();
    let names: Vec<_> = found.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["morning.pdf"]);
    assert_eq!(Query::recent(2).execute(&mut catalog).unwrap().len(), 2);
  }
}
