//! Core types and trait definitions for the address validator.
//!
//! This crate is deliberately free of HTTP and filesystem dependencies. The
//! geocoding provider and the history backend are reached through the
//! [`provider::GeocodingProvider`] and [`history::HistoryStore`] traits; the
//! [`engine::Validator`] turns provider candidates into a
//! [`validation::ValidationResult`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod address;
pub mod engine;
pub mod error;
pub mod geocode;
pub mod history;
pub mod provider;
pub mod validation;

pub use error::{Error, Result};
