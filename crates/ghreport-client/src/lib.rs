mod client;
mod error;
#[cfg(test)]
mod mock;

pub use client::*;
pub use error::*;
