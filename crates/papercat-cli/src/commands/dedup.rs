//! Module for finding and removing duplicate papers.

use super::*;

#[derive(Args, Clone)]
pub struct DedupOptions {
  /// Directory whose catalog is checked, defaults to the configured default directory
  pub directory: Option<PathBuf>,
}

/// Function for the [`Commands::Dedup`] in the CLI.
pub async fn dedup<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  dedup_options: DedupOptions,
) -> Result<()> {
  let mut papercat = cli.open(dedup_options.directory)?;
  resolve_duplicates(interaction, &mut papercat)
}

/// Asks about every duplicate candidate in the catalog and reports the outcome.
///
/// The first record of each group is always kept. A failed prompt counts as
/// declining, a failed delete is reported and the pass moves on.
pub(crate) fn resolve_duplicates<I: UserInteraction>(
  interaction: &I,
  papercat: &mut Papercat,
) -> Result<()> {
  let groups = papercat.find_duplicates();
  if groups.is_empty() {
    return interaction.reply(ResponseContent::Info("No duplicates found"));
  }

  let report = papercat.resolve_groups(&groups, |group, candidate| {
    let question = format!(
      "{} is a duplicate of {} (DOI {}). Delete it?",
      candidate.path.display(),
      group.canonical().path.display(),
      group.identifier
    );
    interaction.confirm(&question).unwrap_or_else(|e| {
      debug!("Prompt failed, keeping {}: {e}", candidate.path.display());
      false
    })
  })?;

  for path in &report.deleted {
    interaction.reply(ResponseContent::Success(&format!("Deleted {}", path.display())))?;
  }
  for path in &report.declined {
    interaction.reply(ResponseContent::Info(&format!("Kept {}", path.display())))?;
  }
  for (path, e) in &report.failed {
    interaction
      .reply(ResponseContent::Error(&format!("Could not delete {}: {e}", path.display())))?;
  }
  Ok(())
}
