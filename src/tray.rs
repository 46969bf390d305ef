//! System tray integration (StatusNotifierItem via ksni).
//!
//! Provides the status icon, the upcoming-meetings tooltip and a context menu:
//! - Open Calendar (not implemented, only reported to the loop)
//! - notify on upcoming meetings (checkbox)
//! - Exit

use crate::messages::Message;
use crate::notifier::ICON_NAME;
use crate::report::{TraySurface, NO_MEETINGS, TOOLTIP_TITLE};
use ksni::menu::{CheckmarkItem, StandardItem};
use ksni::{MenuItem, ToolTip};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

pub const MAX_WAIT_FOR_TRAY: Duration = Duration::from_secs(10);

pub struct MeetingTray {
    tooltip: String,
    show_report: bool,
    sender: UnboundedSender<Message>,
    online: Arc<AtomicBool>,
}

impl MeetingTray {
    pub fn new(show_report: bool, sender: UnboundedSender<Message>, online: Arc<AtomicBool>) -> Self {
        Self {
            tooltip: NO_MEETINGS.to_string(),
            show_report,
            sender,
            online,
        }
    }

    fn send(&self, message: Message) {
        if self.sender.send(message).is_err() {
            log::debug!("Tray event dropped, report loop has stopped");
        }
    }
}

impl ksni::Tray for MeetingTray {
    fn id(&self) -> String {
        env!("CARGO_PKG_NAME").into()
    }

    fn title(&self) -> String {
        "Meeting Alarm".into()
    }

    fn icon_name(&self) -> String {
        ICON_NAME.into()
    }

    fn tool_tip(&self) -> ToolTip {
        ToolTip {
            title: TOOLTIP_TITLE.into(),
            description: self.tooltip.clone(),
            icon_name: String::new(),
            icon_pixmap: Vec::new(),
        }
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        vec![
            StandardItem {
                label: "Open Calendar".into(),
                activate: Box::new(|this: &mut Self| this.send(Message::OpenCalendar)),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            CheckmarkItem {
                label: "notify on upcoming meetings".into(),
                checked: self.show_report,
                activate: Box::new(|this: &mut Self| {
                    this.show_report = !this.show_report;
                    this.send(Message::ToggleReport(this.show_report));
                }),
                ..Default::default()
            }
            .into(),
            MenuItem::Separator,
            StandardItem {
                label: "Exit".into(),
                icon_name: "application-exit".into(),
                activate: Box::new(|this: &mut Self| this.send(Message::Exit)),
                ..Default::default()
            }
            .into(),
        ]
    }

    fn watcher_online(&self) {
        log::debug!("StatusNotifierWatcher is online");
        self.online.store(true, Ordering::SeqCst);
    }
}

impl TraySurface for ksni::Handle<MeetingTray> {
    fn set_tooltip(&self, tooltip: String) {
        self.update(move |tray: &mut MeetingTray| tray.tooltip = tooltip);
    }
}

/// Poll until a tray host has accepted the icon or `timeout` elapses.
pub async fn wait_for_tray(online: &AtomicBool, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while !online.load(Ordering::SeqCst) {
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    true
}
