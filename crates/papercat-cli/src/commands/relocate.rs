//! Module for moving a paper to another directory.

use papercat::instruction::Relocate;

use super::*;

#[derive(Args, Clone)]
pub struct MoveOptions {
  /// Path of the paper
  pub path: PathBuf,

  /// Directory to move it into, created when missing
  pub destination: PathBuf,
}

/// Function for the [`Commands::Move`] in the CLI.
pub async fn relocate<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  move_options: MoveOptions,
) -> Result<()> {
  let MoveOptions { path, destination } = move_options;
  let mut papercat = cli.open(None)?;
  let path = absolute(&path);
  let target = papercat.execute(&Relocate::new(&path, absolute(&destination)))?;
  interaction.reply(ResponseContent::Success(&format!(
    "Moved {} {} {}",
    path.display(),
    ARROW,
    target.display()
  )))
}
