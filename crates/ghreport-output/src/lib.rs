mod formatters;
mod parse;

pub use formatters::*;
pub use parse::*;
