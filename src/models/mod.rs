// Declare modules
pub mod alert;
pub mod event;

// Re-export so callers can `use crate::models::Event`.
pub use alert::{AlertAction, AlertInfo, ACTION_DISMISS, ACTION_OPEN};
pub use event::{Event, SOON_WINDOW_HOURS, VERY_SOON_WINDOW_MINUTES};
