//! Utils Module - Shared Helpers
//!
//! Constants, display formatting, telemetry and the transaction cache.

pub mod cache;
pub mod constants;
pub mod format;
pub mod telemetry;

pub use cache::*;
pub use constants::*;
pub use format::*;
pub use telemetry::*;
