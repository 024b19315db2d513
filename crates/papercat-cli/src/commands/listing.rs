//! Module for the tag and recency listings.

use papercat::{instruction::Query, search};

use super::*;

#[derive(Args, Clone)]
pub struct TagOptions {
  /// Tag to list, without the braces
  pub tag: String,
}

#[derive(Args, Clone)]
pub struct RecentOptions {
  /// Look-back window in days, defaults to the configured value
  #[arg(long, short)]
  pub days: Option<u32>,

  /// Look-back window in hours instead, 12 when given without a value
  #[arg(long, conflicts_with = "days", num_args = 0..=1, default_missing_value = "12")]
  pub hours: Option<u32>,
}

/// Function for the [`Commands::Tags`] in the CLI.
pub async fn tags<I: UserInteraction>(interaction: &I, cli: &Cli) -> Result<()> {
  let papercat = cli.open(None)?;
  let tags = search::tags(papercat.catalog().records());
  if tags.is_empty() {
    interaction.reply(ResponseContent::Info("No tags found"))
  } else {
    interaction.reply(ResponseContent::Tags(&tags))
  }
}

/// Function for the [`Commands::Tag`] in the CLI.
pub async fn tag<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  tag_options: TagOptions,
) -> Result<()> {
  let mut papercat = cli.open(None)?;
  let records = papercat.execute(&Query::tag(tag_options.tag.trim()))?;
  if records.is_empty() {
    interaction
      .reply(ResponseContent::Info(&format!("No papers tagged {{{}}}", tag_options.tag.trim())))
  } else {
    interaction.reply(ResponseContent::Records(&records))
  }
}

/// Function for the [`Commands::Recent`] in the CLI.
pub async fn recent<I: UserInteraction>(
  interaction: &I,
  cli: &Cli,
  recent_options: RecentOptions,
) -> Result<()> {
  let mut papercat = cli.open(None)?;
  let (query, window) = match recent_options.hours {
    Some(hours) => (Query::recent_hours(hours), format!("{hours} hours")),
    None => {
      let days = recent_options.days.unwrap_or(papercat.config().recent_days);
      (Query::recent(days), format!("{days} days"))
    },
  };
  let records = papercat.execute(&query)?;
  if records.is_empty() {
    interaction.reply(ResponseContent::Info(&format!("No papers modified in the last {window}")))
  } else {
    interaction.reply(ResponseContent::Records(&records))
  }
}
