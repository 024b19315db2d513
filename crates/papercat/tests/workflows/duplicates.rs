use super::*;

/// Catalogs three papers, the first two sharing a DOI.
async fn catalog_with_duplicates() -> TestResult<(Papercat, TempDir, TempDir, [PathBuf; 3])> {
  let (mut papercat, root, data) = create_test_papercat();
  let a = write_paper(root.path(), "a.pdf", b"a");
  let b = write_paper(root.path(), "b.pdf", b"bb");
  let c = write_paper(root.path(), "c.pdf", b"ccc");
  let extractions = HashMap::from([
    (a.clone(), block_with_doi("10.1/a")),
    (b.clone(), block_with_doi("10.1/a")),
    (c.clone(), block_with_doi("10.1/b")),
  ]);
  update(&mut papercat, &extractions).await?;
  Ok((papercat, root, data, [a, b, c]))
}

#[traced_test]
#[tokio::test]
async fn test_duplicates_are_grouped_by_doi() -> TestResult<()> {
  let (papercat, _root, _data, [a, b, _c]) = catalog_with_duplicates().await?;

  let groups = papercat.find_duplicates();
  assert_eq!(groups.len(), 1);
  assert_eq!(groups[0].identifier, "10.1/a");
  assert_eq!(groups[0].canonical().path, a);
  let candidates: Vec<_> = groups[0].candidates().iter().map(|r| r.path.clone()).collect();
  assert_eq!(candidates, vec![b]);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_declining_changes_nothing() -> TestResult<()> {
  let (mut papercat, _root, _data, [a, b, c]) = catalog_with_duplicates().await?;
  let groups = papercat.find_duplicates();

  let report = papercat.resolve_groups(&groups, |_, _| false)?;
  assert!(report.deleted.is_empty());
  assert_eq!(report.declined, vec![b.clone()]);
  assert!(a.exists() && b.exists() && c.exists());
  assert_eq!(Catalog::open(papercat.catalog().path())?.len(), 3);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_confirmed_duplicate_is_deleted_and_persisted() -> TestResult<()> {
  let (mut papercat, _root, _data, [a, b, _c]) = catalog_with_duplicates().await?;
  let groups = papercat.find_duplicates();

  let report = papercat.resolve_groups(&groups, |group, candidate| {
    assert_eq!(group.canonical().path, a);
    candidate.path == b
  })?;
  assert_eq!(report.deleted, vec![b.clone()]);
  assert!(a.exists());
  assert!(!b.exists());

  let reopened = Catalog::open(papercat.catalog().path())?;
  assert_eq!(reopened.len(), 2);
  assert!(reopened.get(&b).is_none());
  assert!(papercat.find_duplicates().is_empty());

  // The next scan agrees with the catalog.
  assert!(update(&mut papercat, &HashMap::new()).await?.is_empty());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_failed_delete_keeps_record() -> TestResult<()> {
  let (mut papercat, _root, _data, [_a, b, _c]) = catalog_with_duplicates().await?;
  std::fs::remove_file(&b)?;

  let result = papercat.resolve_duplicate(&b, true);
  assert!(matches!(result, Err(PapercatError::FileSystemOperationFailed { .. })));
  assert!(papercat.catalog().get(&b).is_some());

  assert_eq!(papercat.resolve_duplicate(&b, false)?, Resolution::Kept);
  Ok(())
}
