//! Models Module - Data Structures & Configuration
//!
//! Attribute records, predictions, the model schema, configuration and
//! error codes used across the crate.

pub mod config;
pub mod errors;
pub mod schema;
pub mod types;

pub use config::*;
pub use errors::*;
pub use schema::*;
pub use types::*;
