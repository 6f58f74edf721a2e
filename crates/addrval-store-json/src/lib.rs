//! JSON-file backend for the validation history.
//!
//! The whole log lives in one pretty-printed JSON array, newest record
//! first. Every operation reads the file afresh; writes replace it through a
//! temporary sibling file and a rename.

mod encode;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::JsonHistoryStore;
