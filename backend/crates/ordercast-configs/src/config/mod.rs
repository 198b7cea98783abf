pub mod defaults;
mod loader;
mod overrides;
mod types;

pub use types::*;
