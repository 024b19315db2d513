//! Module for editing the comments and metadata of a paper.

use papercat::instruction::Annotate;

use super::*;

#[derive(Args, Clone)]
pub struct CommentOptions {
  /// Path of the paper
  pub path: PathBuf,

  /// New comments; `{tag}` markers become tags
  pub text: String,
}

#[derive(Args, Clone)]
pub struct BibtexOptions {
  /// Path of the paper
  pub path: PathBuf,

  /// File holding the new BibTeX block
  pub file: PathBuf,
}

/// Function for the [`Commands::Comment`] in the CLI.
pub async fn comment<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  comment_options: CommentOptions,
) -> Result<()> {
  let CommentOptions { path, text } = comment_options;
  let mut papercat = cli.open(None)?;
  let record = papercat.execute(&Annotate::comments(absolute(&path), text))?;
  interaction.reply(ResponseContent::Success(&format!("Comments saved for {}", record.name)))?;
  let tags = record.tags();
  if !tags.is_empty() {
    interaction.reply(ResponseContent::Tags(&tags))?;
  }
  Ok(())
}

/// Function for the [`Commands::Bibtex`] in the CLI.
pub async fn bibtex<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  bibtex_options: BibtexOptions,
) -> Result<()> {
  let BibtexOptions { path, file } = bibtex_options;
  let block = tokio::fs::read_to_string(&file).await?;
  let mut papercat = cli.open(None)?;
  let record = papercat.execute(&Annotate::metadata(absolute(&path), block.trim()))?;
  interaction.reply(ResponseContent::Success(&format!("Metadata saved for {}", record.name)))?;
  interaction.reply(ResponseContent::Record(&record))
}
