use super::*;

mod duplicates;
mod lookup;
mod update;
