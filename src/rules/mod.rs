//! Matchers and text rules used by the extraction cascade.

mod abbreviations;
mod cleaner;
pub(crate) mod matchers;


pub use abbreviations::{Abbreviation, AbbreviationTable};
pub use cleaner::clean_name;
