use super::*;

#[traced_test]
#[tokio::test]
async fn test_hand_written_table_is_reconciled_in_place() -> TestResult<()> {
  let root = tempdir()?;
  let data = tempdir()?;
  let paper = write_paper(root.path(), "epr.pdf", b"%PDF-1.4 epr");
  let meta = std::fs::metadata(&paper)?;
  let mtime = record::format_mtime(meta.modified()?);

  // Only three of the columns, plus one nobody knows about.
  let table = data.path().join("legacy.csv");
  let mut writer = csv::Writer::from_path(&table)?;
  writer.write_record(["Path", "Size", "Modified Date", "Rating"])?;
  let size = meta.len().to_string();
  writer.write_record([paper.to_str().unwrap(), size.as_str(), mtime.as_str(), "5"])?;
  writer.flush()?;
  drop(writer);

  let mut papercat = Papercat::with_catalog_path(Config::default(), root.path(), &table)?;
  assert_eq!(papercat.catalog().records()[0].name, "epr.pdf");
  assert_eq!(papercat.catalog().records()[0].extension, ".pdf");

  let report = update(&mut papercat, &HashMap::new()).await?;
  assert!(report.is_empty(), "unexpected changes: {report}");

  let header = std::fs::read_to_string(&table)?.lines().next().unwrap().to_string();
  assert_eq!(header, record::COLUMNS.join(","));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_catalogs_are_kept_per_directory() -> TestResult<()> {
  let data = tempdir()?;
  let first = tempdir()?;
  let second = tempdir()?;
  write_paper(first.path(), "a.pdf", b"a");
  write_paper(second.path(), "b.pdf", b"b");
  write_paper(second.path(), "c.pdf", b"c");
  let config = Config::default().with_catalog_dir(data.path());

  let mut one = Papercat::open(config.clone(), first.path())?;
  let mut two = Papercat::open(config, second.path())?;
  assert_ne!(one.catalog().path(), two.catalog().path());

  assert_eq!(update(&mut one, &HashMap::new()).await?.new, 1);
  assert_eq!(update(&mut two, &HashMap::new()).await?.new, 2);
  assert_eq!(Catalog::open(one.catalog().path())?.len(), 1);
  assert_eq!(Catalog::open(two.catalog().path())?.len(), 2);
  Ok(())
}
