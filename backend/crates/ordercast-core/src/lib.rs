// ordercast core library
//
// Per-recipient stream sessions, the connection registry that routes to them,
// subscription tracking, and the channel bus that carries notifications
// between server processes.

pub mod app_context;
pub mod bus;
pub mod error;
pub mod live;

pub use app_context::AppContext;
pub use error::{LiveError, Result};
