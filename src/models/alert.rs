// file: src/alert.rs
use super::event::Event;
use chrono::{DateTime, Local, Utc};

pub const ACTION_OPEN: &str = "open";
pub const ACTION_DISMISS: &str = "dismiss";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertAction {
    pub id: String,
    pub label: String,
}

impl AlertAction {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

/// Content of the single "meeting is about to start" notification.
#[derive(Debug, Clone)]
pub struct AlertInfo {
    pub title: String,
    pub body: String,
    pub uid: String,
    pub actions: Vec<AlertAction>,
}

impl AlertInfo {
    pub fn new(event: &Event, now: DateTime<Utc>, with_actions: bool) -> Self {
        let title = format!(
            "You have a meeting in {:.1} minutes.",
            event.minutes_left(now)
        );

        let start = event.start.with_timezone(&Local).format("%H:%M");
        let body = match event.location.as_deref().filter(|l| !l.trim().is_empty()) {
            Some(location) => format!("{} starts {} at {}.", event.summary, start, location),
            None => format!("{} starts {}.", event.summary, start),
        };

        let actions = if with_actions {
            vec![
                AlertAction::new(ACTION_OPEN, "Jump into Meeting"),
                AlertAction::new(ACTION_DISMISS, "Dismiss"),
            ]
        } else {
            Vec::new()
        };

        Self {
            title,
            body,
            uid: event.uid.clone(),
            actions,
        }
    }
}
