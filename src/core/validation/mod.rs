//! Request body validation
//!
//! Bodies are deserialized and then checked with the `validator` crate
//! before they reach a handler.

pub mod extractor;

pub use extractor::ValidJson;
