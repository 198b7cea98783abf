mod recipient_id;
mod session_id;

pub use recipient_id::{RecipientId, RecipientIdValidationError};
pub use session_id::SessionId;
