#![allow(dead_code)]
use chrono::{DateTime, Duration, Utc};
use meetingalarm::{Calendar, CalendarSource};
use std::io::Write;
use tempfile::NamedTempFile;

pub struct TestEvent<'a> {
    pub uid: &'a str,
    pub summary: &'a str,
    pub start_in: Duration,
    pub length: Duration,
    pub all_day: bool,
    pub location: Option<&'a str>,
    pub description: Option<&'a str>,
    pub rrule: Option<&'a str>,
}

impl<'a> TestEvent<'a> {
    pub fn new(uid: &'a str, summary: &'a str, start_in: Duration) -> Self {
        Self {
            uid,
            summary,
            start_in,
            length: Duration::minutes(30),
            all_day: false,
            location: None,
            description: None,
            rrule: None,
        }
    }
}

fn ics_time(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

pub fn render_ics(events: &[TestEvent<'_>], now: DateTime<Utc>) -> String {
    let mut ics = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//meetingalarm//tests//EN\r\n");
    for event in events {
        let start = now + event.start_in;
        ics.push_str("BEGIN:VEVENT\r\n");
        ics.push_str(&format!("UID:{}\r\n", event.uid));
        ics.push_str(&format!("DTSTAMP:{}\r\n", ics_time(now)));
        if event.all_day {
            ics.push_str(&format!("DTSTART;VALUE=DATE:{}\r\n", start.format("%Y%m%d")));
        } else {
            ics.push_str(&format!("DTSTART:{}\r\n", ics_time(start)));
            ics.push_str(&format!("DTEND:{}\r\n", ics_time(start + event.length)));
        }
        if let Some(rrule) = event.rrule {
            ics.push_str(&format!("RRULE:{}\r\n", rrule));
        }
        ics.push_str(&format!("SUMMARY:{}\r\n", event.summary));
        if let Some(location) = event.location {
            ics.push_str(&format!("LOCATION:{}\r\n", location));
        }
        if let Some(description) = event.description {
            ics.push_str(&format!("DESCRIPTION:{}\r\n", description));
        }
        ics.push_str("END:VEVENT\r\n");
    }
    ics.push_str("END:VCALENDAR\r\n");
    ics
}

/// Writes the events to a temporary ICS file. Keep the file alive for the
/// duration of the test.
pub fn calendar_file(events: &[TestEvent<'_>]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(render_ics(events, Utc::now()).as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn rewrite(file: &NamedTempFile, events: &[TestEvent<'_>]) {
    std::fs::write(file.path(), render_ics(events, Utc::now())).unwrap();
}

pub fn file_calendar(file: &NamedTempFile, default_url: Option<&str>) -> Calendar {
    Calendar::new(
        CalendarSource::File(file.path().to_path_buf()),
        default_url.map(str::to_string),
    )
    .unwrap()
}
