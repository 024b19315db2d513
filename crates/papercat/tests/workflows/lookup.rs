use super::*;

fn block(title: &str, year: u32) -> String {
  format!("@article{{key,\n  title = {{{title}}},\n  year = {{{year}}},\n}}")
}

/// Catalogs three titled papers.
async fn library() -> TestResult<(Papercat, TempDir, TempDir)> {
  let (mut papercat, root, data) = create_test_papercat();
  let a = write_paper(root.path(), "a.pdf", b"a");
  let b = write_paper(root.path(), "b.pdf", b"b");
  let c = write_paper(root.path(), "c.pdf", b"c");
  let extractions = HashMap::from([
    (a, block("Quantum Entanglement in Practice", 2020)),
    (b, block("Classical Mechanics", 1990)),
    (c, block("Entanglement Witnesses and Quantum Channels", 2022)),
  ]);
  update(&mut papercat, &extractions).await?;
  Ok((papercat, root, data))
}

#[traced_test]
#[tokio::test]
async fn test_keyword_search_orders_by_year() -> TestResult<()> {
  let (mut papercat, _root, _data) = library().await?;

  let found = papercat.execute(&Query::keywords(&["quantum", "entanglement"]))?;
  let names: Vec<_> = found.iter().map(|r| r.name.as_str()).collect();
  assert_eq!(names, vec!["c.pdf", "a.pdf"]);

  // Close misspellings still match.
  let found = papercat.execute(&Query::keywords(&["entanglment"]))?;
  assert_eq!(found.len(), 2);

  let found = papercat.execute(&Query::keywords(&["classical", "mechanics"]))?;
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].year(), Some(1990));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_tags_and_recent() -> TestResult<()> {
  let (mut papercat, root, _data) = library().await?;
  let a = root.path().join("a.pdf");
  papercat.execute(&Annotate::comments(&a, "{to-read} soon"))?;

  let tagged = papercat.execute(&Query::tag("TO-READ"))?;
  assert_eq!(tagged.len(), 1);
  assert_eq!(tagged[0].path, a);
  assert_eq!(papercat::search::tags(papercat.catalog().records()), vec!["to-read".to_string()]);

  // Everything was just written.
  assert_eq!(papercat.execute(&Query::recent(1))?.len(), 3);

  let stamp = papercat.execute(&Touch::new(&a))?;
  assert_eq!(papercat.catalog().get(&a).ok_or("missing")?.last_used_time, Some(stamp));
  Ok(())
}
