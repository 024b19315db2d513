//! Module for opening a paper in the system viewer or its file manager.

use std::process::{Command, Stdio};

use papercat::instruction::Touch;

use super::*;

#[derive(Args, Clone)]
pub struct OpenOptions {
  /// Path of the paper
  pub path: PathBuf,
}

#[derive(Args, Clone)]
pub struct RevealOptions {
  /// Path of the paper
  pub path: PathBuf,
}

/// Platform command that hands a file to its default application.
fn opener(path: &Path) -> Command {
  let mut command = if cfg!(target_os = "windows") {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]);
    command
  } else if cfg!(target_os = "macos") {
    Command::new("open")
  } else {
    Command::new("xdg-open")
  };
  command.arg(path).stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
  command
}

/// Platform command that shows a file selected in the file manager.
///
/// Without a selecting file manager on Linux, the containing directory is opened.
fn revealer(path: &Path) -> Command {
  let mut command = if cfg!(target_os = "windows") {
    let mut command = Command::new("explorer");
    command.arg(format!("/select,{}", path.display()));
    command
  } else if cfg!(target_os = "macos") {
    let mut command = Command::new("open");
    command.arg("-R").arg(path);
    command
  } else {
    let mut command = Command::new("xdg-open");
    command.arg(path.parent().unwrap_or(path));
    command
  };
  command.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
  command
}

/// Resolves `path` to a cataloged file that exists on disk.
///
/// `Ok(None)` means the file is gone and an error was already shown.
fn existing_record<I: UserInteraction>(
  interaction: &I,
  papercat: &Papercat,
  path: &Path,
) -> Result<Option<PathBuf>> {
  let path = absolute(path);
  if papercat.catalog().get(&path).is_none() {
    return Err(PapercatError::RecordNotFound(path).into());
  }
  if !path.is_file() {
    interaction.reply(ResponseContent::Error(&format!("File not found: {}", path.display())))?;
    return Ok(None);
  }
  Ok(Some(path))
}

/// Function for the [`Commands::Open`] in the CLI.
///
/// The viewer is started and left running; only a failure to start it is
/// reported.
pub async fn open<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  open_options: OpenOptions,
) -> Result<()> {
  let mut papercat = cli.open(None)?;
  let Some(path) = existing_record(interaction, &papercat, &open_options.path)? else {
    return Ok(());
  };

  if let Err(e) = opener(&path).spawn() {
    debug!("Could not start viewer for {}: {e}", path.display());
    return Err(CliError::OpenFailed(path));
  }
  let stamp = papercat.execute(&Touch::new(&path))?;
  interaction.reply(ResponseContent::Success(&format!("Opened {} at {stamp}", path.display())))
}

/// Function for the [`Commands::Reveal`] in the CLI.
pub async fn reveal<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  reveal_options: RevealOptions,
) -> Result<()> {
  let papercat = cli.open(None)?;
  let Some(path) = existing_record(interaction, &papercat, &reveal_options.path)? else {
    return Ok(());
  };

  if let Err(e) = revealer(&path).spawn() {
    debug!("Could not start file manager for {}: {e}", path.display());
    return Err(CliError::OpenFailed(path));
  }
  interaction.reply(ResponseContent::Success(&format!("Revealed {}", path.display())))
}
