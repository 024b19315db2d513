use console::style;
use dialoguer::{Confirm, Input};

use super::*;

pub static INFO_PREFIX: &str = "ℹ ";
pub static WORKING_PREFIX: &str = "» ";
pub static SUCCESS_PREFIX: &str = "✓ ";
pub static ERROR_PREFIX: &str = "✗ ";
pub static WARNING_PREFIX: &str = "! ";
pub static PROMPT_PREFIX: &str = "❯ ";
pub static ITEM_PREFIX: &str = "├─";
pub static LAST_ITEM_PREFIX: &str = "└─";
pub static CONTINUE_PREFIX: &str = "│  ";
pub static BULLET: &str = "•";
pub static ARROW: &str = "→";

/// Something to show the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// One record in full.
  Record(&'a FileRecord),
  /// A listing of records, one summary entry each.
  Records(&'a [FileRecord]),
  /// Counts of a finished catalog update.
  Report(&'a ReconcileReport),
  /// A list of tags.
  Tags(&'a [String]),
  /// Progress on a longer running step.
  Working(&'a str),
  Success(&'a str),
  Warning(&'a str),
  Error(&'a str),
  Info(&'a str),
}

pub trait UserInteraction {
  fn confirm(&self, message: &str) -> Result<bool>;
  fn prompt(&self, message: &str) -> Result<String>;
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// Terminal interaction through `dialoguer`.
///
/// With `accept_defaults` set no prompt is ever shown: confirmations answer "no"
/// and prompts answer with an empty string.
#[derive(Debug, Clone, Copy)]
pub struct Interactor {
  pub accept_defaults: bool,
}

impl Interactor {
  pub fn new(accept_defaults: bool) -> Self { Self { accept_defaults } }
}

/// Title of a record, falling back to its file name.
fn display_title(record: &FileRecord) -> String {
  let title = record.title();
  if title.is_empty() {
    record.name.clone()
  } else {
    title
  }
}

/// Prints one labelled line of the detailed record view, skipping empty values.
fn print_field(label: &str, value: &str) {
  if !value.trim().is_empty() {
    println!("{}{} {}", CONTINUE_PREFIX, style(format!("{label}:")).dim(), value);
  }
}

impl UserInteraction for Interactor {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      trace!("Declining '{message}' without asking");
      return Ok(false);
    }
    Ok(
      Confirm::new()
        .with_prompt(format!("{}{}", style(PROMPT_PREFIX).cyan(), message))
        .default(false)
        .interact()?,
    )
  }

  fn prompt(&self, message: &str) -> Result<String> {
    if self.accept_defaults {
      return Ok(String::new());
    }
    Ok(
      Input::<String>::new()
        .with_prompt(format!("{}{}", style(PROMPT_PREFIX).cyan(), message))
        .allow_empty(true)
        .interact_text()?,
    )
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Record(record) => {
        println!("{} {}", style(BULLET).cyan(), style(display_title(record)).bold());
        print_field("Path", &record.path.display().to_string());
        print_field("Author", &record.author());
        print_field("Year", &record.year().map(|y| y.to_string()).unwrap_or_default());
        print_field("DOI", &record.doi());
        print_field("Size", &format!("{} bytes", record.size_bytes));
        print_field("Modified", &record.modified_time);
        print_field("Added", record.date_added.as_deref().unwrap_or_default());
        print_field("Last opened", record.last_used_time.as_deref().unwrap_or_default());
        print_field("Comments", &record.comments);
        if !record.metadata_block.trim().is_empty() {
          println!("{}{}", CONTINUE_PREFIX, style("Metadata:").dim());
          for line in record.metadata_block.lines() {
            println!("{}  {}", CONTINUE_PREFIX, style(line).yellow());
          }
        }
      },
      ResponseContent::Records(records) => {
        println!("{} Found {} record(s)", style(INFO_PREFIX).blue(), records.len());
        for (i, record) in records.iter().enumerate() {
          let prefix = if i + 1 == records.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
          let year = record.year().map(|y| format!("[{y}] ")).unwrap_or_default();
          println!("{} {}{}", style(prefix).dim(), style(year).cyan(), display_title(record));
          let indent = if i + 1 == records.len() { "   " } else { CONTINUE_PREFIX };
          println!("{}   {} {}", style(indent).dim(), style(ARROW).dim(), record.path.display());
        }
      },
      ResponseContent::Report(report) =>
        for line in report.lines() {
          println!("{} {}", style(INFO_PREFIX).blue(), line);
        },
      ResponseContent::Tags(tags) =>
        for (i, tag) in tags.iter().enumerate() {
          let prefix = if i + 1 == tags.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
          println!("{} {}", style(prefix).dim(), style(tag).cyan());
        },
      ResponseContent::Working(message) =>
        println!("{} {}", style(WORKING_PREFIX).cyan(), message),
      ResponseContent::Success(message) =>
        println!("{} {}", style(SUCCESS_PREFIX).green(), message),
      ResponseContent::Warning(message) =>
        println!("{} {}", style(WARNING_PREFIX).yellow(), message),
      ResponseContent::Error(message) =>
        eprintln!("{} {}", style(ERROR_PREFIX).red(), style(message).red()),
      ResponseContent::Info(message) => println!("{} {}", style(INFO_PREFIX).blue(), message),
    }
    Ok(())
  }
}
