// Meeting Alarm library
// Calendar filtering and the report cycle, plus the desktop adapters around them

pub mod calendar;
pub mod config;
pub mod error;
pub mod http_config;
pub mod messages;
pub mod models;
pub mod notifier;
pub mod report;
pub mod tray;
pub mod utils;

// Re-export commonly used types
pub use calendar::{filter_upcoming, resolve_event_url, Calendar, CalendarSource, Lookahead};
pub use config::{Args, Config};
pub use error::{AppError, AppResult};
pub use messages::Message;
pub use models::*;
pub use notifier::{DesktopNotifier, Notifier};
pub use report::{run_report_loop, ReportCycle, TraySurface};
pub use utils::{SystemOpener, UrlOpener};
