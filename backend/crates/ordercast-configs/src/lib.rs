//! ordercast-configs
//!
//! Server configuration types and loader for ordercast.

pub mod config;

pub use config::*;
pub use config::defaults;
