//! Module for displaying one catalog record.

use super::*;

#[derive(Args, Clone)]
pub struct ShowOptions {
  /// Path of the paper
  pub path: PathBuf,
}

/// Function for the [`Commands::Show`] in the CLI.
pub async fn show<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  show_options: ShowOptions,
) -> Result<()> {
  let papercat = cli.open(None)?;
  let path = absolute(&show_options.path);
  let record = papercat.catalog().get(&path).ok_or(PapercatError::RecordNotFound(path.clone()))?;
  interaction.reply(ResponseContent::Record(record))
}
