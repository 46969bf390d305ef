//! Desktop notification service
//!
//! One owned service object is created at startup and handed to the report
//! cycle. It keeps a single notification on screen and updates it in place.

use crate::error::{AppError, AppResult};
use crate::messages::Message;
use crate::models::AlertInfo;
use notify_rust::{Notification, NotificationHandle, Urgency};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc::UnboundedSender;

pub const APP_NAME: &str = "Meeting Alarm Notifier";
pub const ICON_NAME: &str = "alarm-symbolic";
pub const CAPABILITY_ACTIONS: &str = "actions";

/// Action name the server reports when the notification is closed.
const CLOSED: &str = "__closed";

const WAITER_THREAD_NAME: &str = "notification-actions";

pub trait Notifier: Send {
    /// Capability flags advertised by the notification server.
    fn capabilities(&self) -> Vec<String>;

    /// Show `alert`, replacing whatever this notifier showed before.
    fn show(&mut self, alert: &AlertInfo) -> AppResult<()>;
}

pub struct DesktopNotifier {
    app_name: String,
    notification_id: Option<u32>,
    current_uid: Arc<Mutex<String>>,
    waiter: Option<JoinHandle<()>>,
    sender: UnboundedSender<Message>,
}

impl DesktopNotifier {
    pub fn new(app_name: &str, sender: UnboundedSender<Message>) -> Self {
        Self {
            app_name: app_name.to_string(),
            notification_id: None,
            current_uid: Arc::new(Mutex::new(String::new())),
            waiter: None,
            sender,
        }
    }

    fn waiter_running(&self) -> bool {
        self.waiter.as_ref().map_or(false, |w| !w.is_finished())
    }

    /// Updating a notification in place keeps its id, so a waiter that is
    /// still listening also receives actions from the new content. Only one
    /// waiter is kept alive and it resolves the uid when the action fires.
    fn spawn_action_waiter(&mut self, handle: NotificationHandle) {
        if self.waiter_running() {
            return;
        }

        let current_uid = Arc::clone(&self.current_uid);
        let sender = self.sender.clone();
        let spawned = spawn_waiter_thread(move || {
            handle.wait_for_action(|action| {
                if action == CLOSED {
                    log::debug!("Meeting notification closed");
                    return;
                }
                let uid = match current_uid.lock() {
                    Ok(uid) => uid.clone(),
                    Err(poisoned) => poisoned.into_inner().clone(),
                };
                let message = Message::NotificationAction {
                    action: action.to_string(),
                    uid,
                };
                if sender.send(message).is_err() {
                    log::debug!("Report loop stopped before action '{}' arrived", action);
                }
            });
        });

        match spawned {
            Ok(waiter) => self.waiter = Some(waiter),
            Err(e) => log::warn!("Could not start notification action listener: {}", e),
        }
    }
}

/// Runs `wait` on its own detached thread. The wait may never return (a
/// notification left on screen), so it stays off the runtime's blocking pool,
/// which is joined when the runtime drops.
fn spawn_waiter_thread<F>(wait: F) -> std::io::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(WAITER_THREAD_NAME.to_string())
        .spawn(wait)
}

impl Notifier for DesktopNotifier {
    fn capabilities(&self) -> Vec<String> {
        match notify_rust::get_capabilities() {
            Ok(caps) => {
                log::debug!("Notification server capabilities: {:?}", caps);
                caps
            }
            Err(e) => {
                log::warn!("Could not query notification server capabilities: {}", e);
                Vec::new()
            }
        }
    }

    fn show(&mut self, alert: &AlertInfo) -> AppResult<()> {
        let mut notification = Notification::new();
        notification
            .appname(&self.app_name)
            .summary(&alert.title)
            .body(&alert.body)
            .icon(ICON_NAME)
            .urgency(Urgency::Normal);
        if let Some(id) = self.notification_id {
            notification.id(id);
        }
        for action in &alert.actions {
            notification.action(&action.id, &action.label);
        }

        let handle = track_shown(&self.current_uid, &alert.uid, || {
            notification
                .show()
                .map_err(|e| AppError::notification(format!("Failed to show notification: {}", e)))
        })?;
        self.notification_id = Some(handle.id());

        if !alert.actions.is_empty() {
            self.spawn_action_waiter(handle);
        }
        Ok(())
    }
}

/// Records `uid` as the displayed event once `show` succeeded. A failed show
/// leaves the previous uid in place for a waiter that is still listening.
fn track_shown<T>(
    current_uid: &Mutex<String>,
    uid: &str,
    show: impl FnOnce() -> AppResult<T>,
) -> AppResult<T> {
    let shown = show()?;
    match current_uid.lock() {
        Ok(mut current) => *current = uid.to_string(),
        Err(poisoned) => *poisoned.into_inner() = uid.to_string(),
    }
    Ok(shown)
}
