use crate::error::{AppError, AppResult};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use reqwest::Client;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

/// Where calendar data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarSource {
    File(PathBuf),
    Url(Url),
}

impl fmt::Display for CalendarSource {
    // Feed URLs usually embed a private token, so only the host is shown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Url(url) => write!(f, "url on {}", url.host_str().unwrap_or("unknown host")),
        }
    }
}

/// Validates a calendar feed URL.
///
/// Plain `http` is accepted with a warning since self-hosted calendars are
/// often served that way on a local network.
pub fn validate_ics_url_format(ics_url: &str) -> AppResult<Url> {
    if ics_url.trim().is_empty() {
        return Err(AppError::config(
            "Calendar URL cannot be empty. Please provide a valid calendar ICS URL.",
        ));
    }

    let parsed_url = Url::parse(ics_url.trim()).map_err(|e| {
        AppError::config(format!(
            "Invalid calendar URL format: {}. Please ensure the URL is properly formatted (e.g., https://calendar.example.com/path/calendar.ics)",
            e
        ))
    })?;

    match parsed_url.scheme() {
        "https" => {}
        "http" => log::warn!("Calendar URL uses plain HTTP; the feed will be fetched unencrypted"),
        other => {
            return Err(AppError::config(format!(
                "Calendar URL must use http or https, not '{}://'",
                other
            )));
        }
    }

    if parsed_url.host_str().map_or(true, str::is_empty) {
        return Err(AppError::config(
            "Calendar URL must have a valid host name.",
        ));
    }

    Ok(parsed_url)
}

/// Read ICS text from whichever source is configured.
pub async fn fetch_ics_data(source: &CalendarSource, client: &Client) -> AppResult<String> {
    match source {
        CalendarSource::File(path) => read_ics_file(path).await,
        CalendarSource::Url(url) => download_ics(url, client).await,
    }
}

async fn read_ics_file(path: &Path) -> AppResult<String> {
    let content = tokio::fs::read_to_string(path).await?;
    check_ics_content(&content)?;
    Ok(content)
}

async fn download_ics(url: &Url, client: &Client) -> AppResult<String> {
    let response = client.get(url.clone()).send().await?;

    if !response.status().is_success() {
        return Err(AppError::calendar(format!(
            "Calendar server answered HTTP {}",
            response.status()
        )));
    }

    let content = response.text().await?;
    check_ics_content(&content)?;
    Ok(content)
}

fn check_ics_content(content: &str) -> AppResult<()> {
    let head = content.trim_start();
    // Catch a browser page returned in place of the feed
    if head.starts_with("<!DOCTYPE") || head.starts_with("<html") {
        return Err(AppError::calendar(
            "The calendar source returned HTML instead of a calendar file. Please use the 'Secret address in iCal format' from your calendar settings, not the web browser URL.",
        ));
    }

    if !content.contains("BEGIN:VCALENDAR") {
        log::warn!("Calendar data does not contain BEGIN:VCALENDAR.");
    }

    Ok(())
}

/// Parse ICS datetime with proper timezone conversion
pub fn parse_ical_datetime(dt: &icalendar::DatePerhapsTime) -> Option<DateTime<Utc>> {
    match dt {
        icalendar::DatePerhapsTime::DateTime(dt) => match dt {
            icalendar::CalendarDateTime::Utc(dt) => Some(*dt),

            // Floating time (no timezone specified) - interpret as local system time
            icalendar::CalendarDateTime::Floating(naive_dt) => chrono::Local
                .from_local_datetime(naive_dt)
                .earliest()
                .map(|local| local.with_timezone(&Utc)),

            icalendar::CalendarDateTime::WithTimezone { date_time, tzid } => {
                if let Ok(tz) = chrono_tz::Tz::from_str(tzid) {
                    tz.from_local_datetime(date_time)
                        .earliest()
                        .map(|zoned| zoned.with_timezone(&Utc))
                } else {
                    log::warn!("Unrecognized timezone '{}', treating as local time", tzid);
                    chrono::Local
                        .from_local_datetime(date_time)
                        .earliest()
                        .map(|local| local.with_timezone(&Utc))
                }
            }
        },
        icalendar::DatePerhapsTime::Date(date) => chrono::Local
            .with_ymd_and_hms(date.year(), date.month(), date.day(), 0, 0, 0)
            .earliest()
            .map(|local| local.with_timezone(&Utc)),
    }
}
