//! ordercast Server Library
//!
//! This library exposes server modules for integration testing.

pub mod lifecycle;
pub mod logging;
pub mod middleware;
