//! Storage abstractions for service layer
//!
//! File-backed document collections persisted as JSON arrays.

pub mod collection;

pub use collection::{Document, JsonCollection};
