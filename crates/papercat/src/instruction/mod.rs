//! Catalog edits and lookups expressed as instructions.
//!
//! Each instruction is a small value describing one operation, executed against
//! a [`Catalog`] through [`CatalogInstruction::execute`]. Instructions that
//! change the catalog persist it before returning.
//!
//! # Examples
//!
//! ```no_run
//! use papercat::{
//!   catalog::Catalog,
//!   instruction::{Annotate, Query, Relocate},
//!   prelude::*,
//! };
//!
//! # fn example() -> Result<(), PapercatError> {
//! let mut catalog = Catalog::open("file_database.csv")?;
//!
//! Annotate::comments("/papers/epr.pdf", "classic {quantum}").execute(&mut catalog)?;
//! Relocate::new("/papers/epr.pdf", "/papers/read").execute(&mut catalog)?;
//!
//! let tagged = Query::tag("quantum").execute(&mut catalog)?;
//! println!("{} papers tagged", tagged.len());
//! # Ok(())
//! # }
//! ```

use super::*;

pub mod annotate;
pub mod query;
pub mod relocate;
pub mod touch;

pub use self::{annotate::*, query::*, relocate::*, touch::*};

/// An operation run against a catalog.
pub trait CatalogInstruction {
  /// What the instruction produces.
  type Output;

  /// Runs the instruction. Borrowing the catalog mutably lets several
  /// instructions run one after another on the same catalog.
  fn execute(&self, catalog: &mut Catalog) -> Result<Self::Output>;
}
