//! Module for the fuzzy keyword search over the catalog.

use papercat::instruction::Query;

use super::*;

#[derive(Args, Clone)]
pub struct SearchOptions {
  /// Keywords to look for; a record matches when every keyword is found or
  /// when the keywords as a whole are close enough
  #[arg(required = true, num_args = 1..)]
  pub keywords: Vec<String>,

  /// Similarity threshold from 0 to 100, defaults to the configured value
  #[arg(long, short, value_parser = clap::value_parser!(u8).range(0..=100))]
  pub threshold: Option<u8>,

  /// Show detailed paper information
  #[arg(long)]
  pub detailed: bool,
}

/// Function for the [`Commands::Search`] in the CLI.
pub async fn search<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  search_options: SearchOptions,
) -> Result<()> {
  let SearchOptions { keywords, threshold, detailed } = search_options;
  if keywords.iter().all(|k| k.trim().is_empty()) {
    interaction.reply(ResponseContent::Error("Please enter at least one keyword"))?;
    return Ok(());
  }

  let mut papercat = cli.open(None)?;
  let threshold = threshold.unwrap_or(papercat.config().search_threshold);
  interaction.reply(ResponseContent::Info(&format!(
    "Searching for: {} (threshold {threshold})",
    keywords.join(" ")
  )))?;

  let query = Query::keywords(keywords.as_slice()).with_threshold(threshold);
  let records = papercat.execute(&query)?;
  if records.is_empty() {
    interaction.reply(ResponseContent::Info("No matching results found"))
  } else if detailed {
    for record in &records {
      interaction.reply(ResponseContent::Record(record))?;
    }
    Ok(())
  } else {
    interaction.reply(ResponseContent::Records(&records))
  }
}
