//! Integration tests for the papercat CLI commands.
//!
//! Every test works in its own temporary directory with its own configuration
//! file. Prompts are declined through `--accept-defaults`, so no metadata is
//! fetched and no duplicate is ever deleted.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::{tempdir, TempDir};

// Helper function to create a clean command instance
fn papercat() -> Command { Command::cargo_bin("papercat").unwrap() }

/// A temporary home: a papers directory and a config pointing into the sandbox.
struct Sandbox {
  dir:    TempDir,
  papers: PathBuf,
  config: PathBuf,
}

impl Sandbox {
  fn new() -> Self {
    let dir = tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    let papers = root.join("papers");
    std::fs::create_dir_all(&papers).unwrap();
    let config = root.join("config.toml");
    std::fs::write(
      &config,
      format!(
        "catalog_dir = '{}'\ndefault_directory_file = '{}'\n",
        root.join("catalogs").display(),
        root.join("default_directory.txt").display()
      ),
    )
    .unwrap();
    Self { dir, papers, config }
  }

  fn root(&self) -> PathBuf { self.dir.path().canonicalize().unwrap() }

  fn paper(&self, name: &str, content: &[u8]) -> PathBuf {
    let path = self.papers.join(name);
    std::fs::write(&path, content).unwrap();
    path
  }

  /// A command with this sandbox's config and all prompts declined.
  fn cmd(&self) -> Command {
    let mut cmd = papercat();
    cmd.arg("--config").arg(&self.config).arg("--accept-defaults");
    cmd
  }

  /// Remembers the papers directory and runs a first update.
  fn initialized(self) -> Self {
    self.cmd().arg("init").arg("--directory").arg(&self.papers).assert().success();
    self.cmd().arg("update").assert().success();
    self
  }
}

fn bibtex_file(dir: &Path, doi: &str) -> PathBuf {
  let path = dir.join(format!("{}.bib", doi.replace('/', "_")));
  std::fs::write(
    &path,
    format!(
      "@article{{einstein1935,\n  title = {{Can Quantum-Mechanical Description of Physical \
       Reality Be Considered Complete?}},\n  year = {{1935}},\n  DOI = {{{doi}}},\n}}\n"
    ),
  )
  .unwrap();
  path
}

#[test]
#[serial]
fn test_init_writes_config() {
  let dir = tempdir().unwrap();
  let config = dir.path().join("fresh").join("config.toml");

  papercat()
    .arg("--config")
    .arg(&config)
    .arg("--accept-defaults")
    .arg("init")
    .arg("--catalog-dir")
    .arg(dir.path().join("catalogs"))
    .assert()
    .success()
    .stdout(predicate::str::contains("Configuration written"));
  assert!(config.exists());

  // An existing configuration is kept when the overwrite is declined.
  std::fs::write(&config, "search_threshold = 55\n").unwrap();
  papercat()
    .arg("--config")
    .arg(&config)
    .arg("--accept-defaults")
    .arg("init")
    .assert()
    .success()
    .stdout(predicate::str::contains("Keeping the existing configuration"));
  assert_eq!(std::fs::read_to_string(&config).unwrap(), "search_threshold = 55\n");
}

#[test]
#[serial]
fn test_update_reports_counts() {
  let sandbox = Sandbox::new();
  sandbox.paper("alpha.pdf", b"alpha");
  sandbox.paper("beta.pdf", b"beta");
  sandbox.paper("notes.txt", b"ignored");

  sandbox
    .cmd()
    .arg("update")
    .arg(&sandbox.papers)
    .assert()
    .success()
    .stdout(predicate::str::contains("0 moved files found"))
    .stdout(predicate::str::contains("2 new files found"))
    .stdout(predicate::str::contains("0 updated files found"))
    .stdout(predicate::str::contains("0 removed files found"))
    .stdout(predicate::str::contains("No duplicates found"));

  // Nothing changed on disk, nothing changes in the catalog.
  sandbox
    .cmd()
    .arg("update")
    .arg(&sandbox.papers)
    .assert()
    .success()
    .stdout(predicate::str::contains("0 new files found"))
    .stdout(predicate::str::contains("0 removed files found"));

  std::fs::remove_file(sandbox.papers.join("beta.pdf")).unwrap();
  sandbox
    .cmd()
    .arg("update")
    .arg(&sandbox.papers)
    .assert()
    .success()
    .stdout(predicate::str::contains("1 removed files found"));
}

#[test]
#[serial]
fn test_update_missing_directory_fails() {
  let sandbox = Sandbox::new();
  sandbox
    .cmd()
    .arg("update")
    .arg(sandbox.root().join("nope"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("does not exist"));
}

#[test]
#[serial]
fn test_commands_need_a_directory() {
  let sandbox = Sandbox::new();
  sandbox
    .cmd()
    .arg("search")
    .arg("quantum")
    .assert()
    .failure()
    .stderr(predicate::str::contains("No directory given"));
}

#[test]
#[serial]
fn test_search_by_name() {
  let sandbox = Sandbox::new();
  sandbox.paper("alpha.pdf", b"alpha");
  sandbox.paper("omega.pdf", b"omega");
  let sandbox = sandbox.initialized();

  sandbox
    .cmd()
    .arg("search")
    .arg("alpha")
    .assert()
    .success()
    .stdout(predicate::str::contains("alpha.pdf"))
    .stdout(predicate::str::contains("omega.pdf").not());

  sandbox
    .cmd()
    .arg("search")
    .arg("zzzzqqqq")
    .arg("--threshold")
    .arg("95")
    .assert()
    .success()
    .stdout(predicate::str::contains("No matching results found"));
}

#[test]
#[serial]
fn test_comment_tags_and_show() {
  let sandbox = Sandbox::new();
  let alpha = sandbox.paper("alpha.pdf", b"alpha");
  let sandbox = sandbox.initialized();

  sandbox
    .cmd()
    .arg("comment")
    .arg(&alpha)
    .arg("{quantum} read twice")
    .assert()
    .success()
    .stdout(predicate::str::contains("Comments saved for alpha.pdf"));

  sandbox.cmd().arg("tags").assert().success().stdout(predicate::str::contains("quantum"));
  sandbox
    .cmd()
    .arg("tag")
    .arg("Quantum")
    .assert()
    .success()
    .stdout(predicate::str::contains("alpha.pdf"));
  sandbox
    .cmd()
    .arg("show")
    .arg(&alpha)
    .assert()
    .success()
    .stdout(predicate::str::contains("{quantum} read twice"));

  sandbox
    .cmd()
    .arg("show")
    .arg(sandbox.papers.join("ghost.pdf"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("No catalog record"));
}

#[test]
#[serial]
fn test_dedup_declined_keeps_files() {
  let sandbox = Sandbox::new();
  let alpha = sandbox.paper("alpha.pdf", b"alpha");
  let beta = sandbox.paper("beta.pdf", b"beta");
  let sandbox = sandbox.initialized();
  let bib = bibtex_file(&sandbox.root(), "10.1103/PhysRev.47.777");

  for path in [&alpha, &beta] {
    sandbox.cmd().arg("bibtex").arg(path).arg(&bib).assert().success();
  }
  sandbox
    .cmd()
    .arg("show")
    .arg(&beta)
    .assert()
    .success()
    .stdout(predicate::str::contains("10.1103/PhysRev.47.777"));

  sandbox
    .cmd()
    .arg("dedup")
    .assert()
    .success()
    .stdout(predicate::str::contains(format!("Kept {}", beta.display())));
  assert!(alpha.exists());
  assert!(beta.exists());
}

#[test]
#[serial]
fn test_move_updates_catalog() {
  let sandbox = Sandbox::new();
  let alpha = sandbox.paper("alpha.pdf", b"alpha");
  let sandbox = sandbox.initialized();
  let destination = sandbox.papers.join("read");

  sandbox.cmd().arg("move").arg(&alpha).arg(&destination).assert().success();
  let moved = destination.join("alpha.pdf");
  assert!(moved.exists());
  assert!(!alpha.exists());

  sandbox.cmd().arg("show").arg(&moved).assert().success();
  sandbox
    .cmd()
    .arg("update")
    .assert()
    .success()
    .stdout(predicate::str::contains("0 moved files found"))
    .stdout(predicate::str::contains("0 new files found"))
    .stdout(predicate::str::contains("0 removed files found"));
}

#[test]
#[serial]
fn test_recent_lists_fresh_files() {
  let sandbox = Sandbox::new();
  sandbox.paper("fresh.pdf", b"fresh");
  let sandbox = sandbox.initialized();

  sandbox
    .cmd()
    .arg("recent")
    .arg("--days")
    .arg("1")
    .assert()
    .success()
    .stdout(predicate::str::contains("fresh.pdf"));
}

#[test]
#[serial]
fn test_recent_within_hours() {
  let sandbox = Sandbox::new();
  sandbox.paper("fresh.pdf", b"fresh");
  let sandbox = sandbox.initialized();

  sandbox
    .cmd()
    .arg("recent")
    .arg("--hours")
    .assert()
    .success()
    .stdout(predicate::str::contains("fresh.pdf"));
  sandbox.cmd().arg("recent").arg("--hours").arg("1").arg("--days").arg("2").assert().failure();
}

#[test]
#[serial]
fn test_reveal_checks_the_catalog() {
  let sandbox = Sandbox::new();
  let alpha = sandbox.paper("alpha.pdf", b"alpha");
  let sandbox = sandbox.initialized();

  sandbox
    .cmd()
    .arg("reveal")
    .arg(sandbox.papers.join("ghost.pdf"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("No catalog record"));

  std::fs::remove_file(&alpha).unwrap();
  sandbox
    .cmd()
    .arg("reveal")
    .arg(&alpha)
    .assert()
    .success()
    .stderr(predicate::str::contains("File not found"));
}

