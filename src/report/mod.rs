use crate::calendar::{Calendar, Lookahead};
use crate::error::AppResult;
use crate::messages::Message;
use crate::models::{AlertInfo, Event, ACTION_DISMISS, ACTION_OPEN};
use crate::notifier::{Notifier, CAPABILITY_ACTIONS};
use crate::utils::UrlOpener;
use chrono::Utc;
use log::{debug, info, warn};
use std::ops::ControlFlow;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub const REPORT_INTERVAL: Duration = Duration::from_secs(30);
pub const TOOLTIP_TITLE: &str = "Upcoming meetings";
pub const NO_MEETINGS: &str = "No Meetings";

/// Where the idle summary is shown.
pub trait TraySurface: Send {
    fn set_tooltip(&self, tooltip: String);
}

pub fn format_tooltip(events: &[Event]) -> String {
    if events.is_empty() {
        return NO_MEETINGS.to_string();
    }
    events
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct ReportCycle {
    calendar: Calendar,
    notifier: Box<dyn Notifier>,
    tray: Box<dyn TraySurface>,
    opener: Box<dyn UrlOpener>,
    supports_actions: bool,
    show_report: bool,
}

impl ReportCycle {
    /// Capabilities are queried once here, like the notification service
    /// initialization itself.
    pub fn new(
        calendar: Calendar,
        notifier: Box<dyn Notifier>,
        tray: Box<dyn TraySurface>,
        opener: Box<dyn UrlOpener>,
        show_report: bool,
    ) -> Self {
        let supports_actions = notifier
            .capabilities()
            .iter()
            .any(|cap| cap == CAPABILITY_ACTIONS);
        debug!("Notification actions supported: {}", supports_actions);

        Self {
            calendar,
            notifier,
            tray,
            opener,
            supports_actions,
            show_report,
        }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn show_report(&self) -> bool {
        self.show_report
    }

    pub fn set_show_report(&mut self, enabled: bool) {
        self.show_report = enabled;
    }

    pub async fn update_tooltip(&mut self) -> AppResult<()> {
        let events = self.calendar.get_upcoming_events(Lookahead::Soon).await?;
        self.tray.set_tooltip(format_tooltip(&events));
        Ok(())
    }

    /// One timer tick: refresh the summary, then notify about the most
    /// imminent meeting. The same meeting is re-announced every tick while
    /// it stays in the window, with the minutes counting down.
    pub async fn do_report(&mut self) -> AppResult<()> {
        self.update_tooltip().await?;

        if !self.show_report {
            return Ok(());
        }

        let events = self.calendar.get_upcoming_events(Lookahead::VerySoon).await?;
        let Some(event) = events.first() else {
            return Ok(());
        };

        let alert = AlertInfo::new(event, Utc::now(), self.supports_actions);
        debug!("Notifying about '{}' ({})", event.summary, event.uid);
        self.notifier.show(&alert)
    }

    pub async fn handle_action(&mut self, action: &str, uid: &str) -> AppResult<()> {
        match action {
            ACTION_DISMISS => {
                info!("ignoring event with uid {}", uid);
                self.calendar.ignore_event(uid);
                Ok(())
            }
            ACTION_OPEN => {
                info!("jumping to event with uid {}", uid);
                self.calendar.open_event(uid, self.opener.as_ref()).await
            }
            other => {
                debug!("Ignoring unknown notification action '{}'", other);
                Ok(())
            }
        }
    }

    pub async fn handle_message(&mut self, message: Message) -> ControlFlow<()> {
        match message {
            Message::ToggleReport(enabled) => {
                info!("Meeting notifications {}", if enabled { "enabled" } else { "disabled" });
                self.set_show_report(enabled);
            }
            Message::OpenCalendar => {
                // Not implemented: there is no calendar view to open yet.
                info!("Open Calendar requested");
            }
            Message::NotificationAction { action, uid } => {
                if let Err(e) = self.handle_action(&action, &uid).await {
                    warn!("Notification action '{}' failed: {}", action, e.to_safe_string());
                }
            }
            Message::Exit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }
}

/// Drive the report cycle until Exit or shutdown.
///
/// Timer ticks and incoming messages are handled one at a time on this task,
/// so a dismissal always lands before the next fetch is filtered.
pub async fn run_report_loop(
    mut cycle: ReportCycle,
    mut receiver: UnboundedReceiver<Message>,
    shutdown: CancellationToken,
) {
    info!("Starting report loop for {}", cycle.calendar().source());

    if let Err(e) = cycle.update_tooltip().await {
        warn!("Initial calendar fetch failed: {}", e.to_safe_string());
    }

    let mut ticker = interval_at(Instant::now() + REPORT_INTERVAL, REPORT_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Shutdown signal received, stopping report loop");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = cycle.do_report().await {
                    warn!("Skipping report: {}", e.to_safe_string());
                }
            }
            message = receiver.recv() => {
                let Some(message) = message else {
                    debug!("All message senders dropped");
                    break;
                };
                if cycle.handle_message(message).await.is_break() {
                    break;
                }
            }
        }
    }

    info!("Report loop stopped");
}
