//! Module for the "update" flow: scan, extract, reconcile, deduplicate.

use std::{collections::HashMap, time::Duration};

use papercat::extract::{extract_or_empty, DoiExtractor};

use super::*;

/// How often the scan is polled while it runs.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Args, Clone)]
pub struct UpdateOptions {
  /// Directory to scan, defaults to the configured default directory
  pub directory: Option<PathBuf>,

  /// Skip the duplicate check after updating
  #[arg(long)]
  pub no_dedup: bool,
}

/// Function for the [`Commands::Update`] in the CLI.
pub async fn update<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  update_options: UpdateOptions,
) -> Result<()> {
  let UpdateOptions { directory, no_dedup } = update_options;
  let mut papercat = cli.open(directory)?;

  interaction.reply(ResponseContent::Working(&format!(
    "Scanning {}",
    papercat.directory().display()
  )))?;
  papercat.start_scan()?;
  let scan = loop {
    if let Some(outcome) = papercat.poll_scan() {
      break outcome?;
    }
    tokio::time::sleep(POLL_INTERVAL).await;
  };
  debug!(
    "Scan of {} saw {} files, {} changed, {} missing",
    scan.directory.display(),
    scan.discovered,
    scan.classifications.len(),
    scan.missing.len()
  );

  let mut extractions = HashMap::new();
  if !scan.pending_extraction.is_empty() {
    let extractor = DoiExtractor::new();
    for path in &scan.pending_extraction {
      let question = format!("Extract metadata for {}?", path.display());
      if !interaction.confirm(&question)? {
        continue;
      }
      interaction
        .reply(ResponseContent::Working(&format!("Looking up metadata for {}", path.display())))?;
      let block = extract_or_empty(&extractor, path).await;
      if block.is_empty() {
        interaction.reply(ResponseContent::Warning(&format!(
          "No metadata found for {}",
          path.display()
        )))?;
      } else {
        extractions.insert(path.clone(), block);
      }
    }
  }

  let report = papercat.apply_scan(&scan, &extractions)?;
  interaction.reply(ResponseContent::Report(&report))?;

  if !no_dedup {
    dedup::resolve_duplicates(interaction, &mut papercat)?;
  }
  Ok(())
}
