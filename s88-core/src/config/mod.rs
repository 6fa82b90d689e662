//! Configuration
//!
//! Board-agnostic bus configuration. Loaded from a TOML subset or, with the
//! `serde` feature, from postcard binary data.

#[cfg(feature = "serde")]
pub mod binary;
pub mod toml;
pub mod types;

pub use types::*;
