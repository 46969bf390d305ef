/// Everything that can reach the report loop from outside a timer tick.
///
/// The tray service and the notification action waiter run on their own
/// threads and only ever send these; the loop applies them in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// "notify on upcoming meetings" checkbox changed
    ToggleReport(bool),
    /// "Open Calendar" menu entry
    OpenCalendar,
    /// A button on the meeting notification was pressed
    NotificationAction { action: String, uid: String },
    /// "Exit" menu entry
    Exit,
}
