mod login;
mod profile;
mod repository;

pub use login::*;
pub use profile::*;
pub use repository::*;

/// Label used when a profile field was not provided.
pub const MISSING_VALUE: &str = "(none)";
