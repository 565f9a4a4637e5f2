//! CLI command implementations.

pub mod common;
pub mod exchange;
pub mod survey;
pub mod version;
