use clap::Args;

use super::*;

pub mod annotate;
pub mod dedup;
pub mod init;
pub mod listing;
pub mod open;
pub mod relocate;
pub mod search;
pub mod show;
pub mod update;

pub use annotate::{bibtex, comment, BibtexOptions, CommentOptions};
pub use dedup::{dedup, DedupOptions};
pub use init::{init, InitOptions};
pub use listing::{recent, tag, tags, RecentOptions, TagOptions};
pub use open::{open, reveal, OpenOptions, RevealOptions};
pub use relocate::{relocate, MoveOptions};
pub use search::{search, SearchOptions};
pub use show::{show, ShowOptions};
pub use update::{update, UpdateOptions};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Write a configuration file and optionally remember a default directory
  Init(InitOptions),

  /// Scan a directory and bring its catalog up to date
  Update(UpdateOptions),

  /// Find papers sharing a DOI and offer to delete the extra copies
  Dedup(DedupOptions),

  /// Fuzzy search over names, titles, comments and metadata
  Search(SearchOptions),

  /// List every tag used in comments
  Tags,

  /// List the papers carrying a tag
  Tag(TagOptions),

  /// List papers modified recently, newest first
  Recent(RecentOptions),

  /// Show everything the catalog knows about one paper
  Show(ShowOptions),

  /// Replace the comments of a paper
  Comment(CommentOptions),

  /// Replace the metadata block of a paper with the contents of a file
  Bibtex(BibtexOptions),

  /// Move a paper into another directory
  Move(MoveOptions),

  /// Open a paper in the system viewer and record when it was opened
  Open(OpenOptions),

  /// Show a paper in the system file manager
  Reveal(RevealOptions),
}
