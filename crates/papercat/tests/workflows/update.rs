use async_trait::async_trait;

use super::*;

/// Hands out canned metadata blocks and fails for every other path.
struct StubExtractor {
  blocks: HashMap<PathBuf, String>,
}

#[async_trait]
impl MetadataExtractor for StubExtractor {
  async fn extract(&self, path: &Path) -> papercat::error::Result<String> {
    self
      .blocks
      .get(path)
      .cloned()
      .ok_or_else(|| PapercatError::ExtractionFailed(format!("no DOI in {}", path.display())))
  }
}

/// Scans and reconciles, extracting every pending file with `extractor` first.
async fn update_with(
  papercat: &mut Papercat,
  extractor: &dyn MetadataExtractor,
) -> TestResult<ReconcileReport> {
  papercat.start_scan()?;
  let scan = papercat.wait_scan().await.ok_or("scan was not started")??;
  let mut extractions = HashMap::new();
  for path in &scan.pending_extraction {
    let block = papercat::extract::extract_or_empty(extractor, path).await;
    if !block.is_empty() {
      extractions.insert(path.clone(), block);
    }
  }
  Ok(papercat.apply_scan(&scan, &extractions)?)
}

#[traced_test]
#[tokio::test]
async fn test_new_file_next_to_unchanged_one() -> TestResult<()> {
  let (mut papercat, root, _data) = create_test_papercat();
  write_paper(root.path(), "x.pdf", b"first paper");
  assert_eq!(update(&mut papercat, &HashMap::new()).await?.new, 1);

  write_paper(root.path(), "y.pdf", b"second paper");
  let report = update(&mut papercat, &HashMap::new()).await?;
  assert_eq!(report, ReconcileReport { moved: 0, new: 1, updated: 0, removed: 0 });
  assert_eq!(
    report.to_string(),
    "0 moved files found\n1 new files found\n0 updated files found\n0 removed files found"
  );

  let reopened = Catalog::open(papercat.catalog().path())?;
  let names: Vec<_> = reopened.records().iter().map(|r| r.name.as_str()).collect();
  assert_eq!(names, vec!["x.pdf", "y.pdf"]);
  assert!(reopened.records().iter().all(|r| r.date_added.is_some()));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_rescan_without_changes_is_a_no_op() -> TestResult<()> {
  let (mut papercat, root, _data) = create_test_papercat();
  write_paper(root.path(), "a.pdf", b"a");
  write_paper(root.path(), "nested/b.pdf", b"b");
  update(&mut papercat, &HashMap::new()).await?;
  let before = papercat.catalog().snapshot();

  let report = update(&mut papercat, &HashMap::new()).await?;
  assert!(report.is_empty());
  assert_eq!(papercat.catalog().snapshot(), before);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_moved_file_keeps_its_annotations() -> TestResult<()> {
  let (mut papercat, root, _data) = create_test_papercat();
  let original = write_paper(root.path(), "inbox/epr.pdf", b"einstein podolsky rosen");
  update(&mut papercat, &HashMap::new()).await?;
  papercat.execute(&Annotate::comments(&original, "{classic} reread"))?;

  let target = root.path().join("physics").join("epr.pdf");
  std::fs::create_dir_all(target.parent().unwrap())?;
  std::fs::rename(&original, &target)?;

  let report = update(&mut papercat, &HashMap::new()).await?;
  assert_eq!(report, ReconcileReport { moved: 1, new: 0, updated: 0, removed: 0 });
  assert_eq!(papercat.catalog().len(), 1);
  let record = papercat.catalog().get(&target).ok_or("moved record missing")?;
  assert_eq!(record.comments, "{classic} reread");
  assert!(papercat.catalog().get(&original).is_none());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_rewritten_file_is_updated() -> TestResult<()> {
  let (mut papercat, root, _data) = create_test_papercat();
  let path = write_paper(root.path(), "draft.pdf", b"v1");
  update(&mut papercat, &HashMap::new()).await?;

  write_paper(root.path(), "draft.pdf", b"version two, longer");
  let report = update(&mut papercat, &HashMap::new()).await?;
  assert_eq!(report, ReconcileReport { moved: 0, new: 0, updated: 1, removed: 0 });
  assert_eq!(papercat.catalog().get(&path).ok_or("record missing")?.size_bytes, 19);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_deleted_file_is_removed() -> TestResult<()> {
  let (mut papercat, root, _data) = create_test_papercat();
  write_paper(root.path(), "keep.pdf", b"keep");
  let gone = write_paper(root.path(), "gone.pdf", b"gone");
  update(&mut papercat, &HashMap::new()).await?;

  std::fs::remove_file(&gone)?;
  let report = update(&mut papercat, &HashMap::new()).await?;
  assert_eq!(report, ReconcileReport { moved: 0, new: 0, updated: 0, removed: 1 });
  assert!(papercat.catalog().get(&gone).is_none());
  assert_eq!(Catalog::open(papercat.catalog().path())?.len(), 1);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_failed_extraction_leaves_block_empty() -> TestResult<()> {
  let (mut papercat, root, _data) = create_test_papercat();
  let known = write_paper(root.path(), "known.pdf", b"known");
  let unknown = write_paper(root.path(), "unknown.pdf", b"unknown");
  let extractor =
    StubExtractor { blocks: HashMap::from([(known.clone(), block_with_doi("10.1/known"))]) };

  let report = update_with(&mut papercat, &extractor).await?;
  assert_eq!(report.new, 2);
  assert_eq!(papercat.catalog().get(&known).ok_or("missing")?.doi(), "10.1/known");
  assert_eq!(papercat.catalog().get(&unknown).ok_or("missing")?.metadata_block, "");
  Ok(())
}

#[cfg(unix)]
#[traced_test]
#[tokio::test]
async fn test_unprintable_file_name_does_not_block_updates() -> TestResult<()> {
  use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

  let (mut papercat, root, _data) = create_test_papercat();
  write_paper(root.path(), "a_good.pdf", b"good");
  update(&mut papercat, &HashMap::new()).await?;

  std::fs::write(root.path().join(OsStr::from_bytes(b"0_\xff.pdf")), b"bad")?;
  let report = update(&mut papercat, &HashMap::new()).await?;
  assert!(report.is_empty());
  assert_eq!(papercat.catalog().len(), 1);
  assert_eq!(Catalog::open(papercat.catalog().path())?.len(), 1);
  Ok(())
}
