// Calendar accessor
// Fetches events from the configured source, filters them and tracks dismissals

use crate::error::AppResult;
use crate::http_config::HttpConfig;
use crate::models::Event;
use crate::utils::{self, logging, UrlOpener};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::collections::HashSet;
use std::time::Instant;

pub mod common;
pub mod ics;

pub use common::CalendarSource;

/// How far ahead upcoming events are considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookahead {
    /// Within the next 12 hours (tooltip summary).
    Soon,
    /// Within the next 10 minutes (notification).
    VerySoon,
}

impl Lookahead {
    pub fn contains(self, event: &Event, now: DateTime<Utc>) -> bool {
        match self {
            Self::Soon => event.soon(now),
            Self::VerySoon => event.very_soon(now),
        }
    }
}

pub struct Calendar {
    source: CalendarSource,
    default_url: Option<String>,
    ignored: HashSet<String>,
    client: Client,
}

impl Calendar {
    pub fn new(source: CalendarSource, default_url: Option<String>) -> AppResult<Self> {
        let client = HttpConfig::ics_fetch().build_client()?;
        Ok(Self::with_client(source, default_url, client))
    }

    pub fn with_client(source: CalendarSource, default_url: Option<String>, client: Client) -> Self {
        Self {
            source,
            default_url,
            ignored: HashSet::new(),
            client,
        }
    }

    pub fn source(&self) -> &CalendarSource {
        &self.source
    }

    /// Fresh, unfiltered events from the source. Nothing is cached.
    pub async fn fetch_events(&self) -> AppResult<Vec<Event>> {
        let started = Instant::now();
        let ics_data = common::fetch_ics_data(&self.source, &self.client).await?;
        let events = ics::parse_ics_data(&ics_data, Utc::now())?;
        logging::log_calendar_fetch(
            &self.source.to_string(),
            events.len(),
            started.elapsed().as_millis() as u64,
        );
        Ok(events)
    }

    pub async fn get_upcoming_events(&self, lookahead: Lookahead) -> AppResult<Vec<Event>> {
        let events = self.fetch_events().await?;
        Ok(filter_upcoming(events, lookahead, &self.ignored, Utc::now()))
    }

    pub async fn get_event_by_uid(&self, uid: &str) -> AppResult<Option<Event>> {
        let events = self.fetch_events().await?;
        Ok(events.into_iter().find(|event| event.uid == uid))
    }

    pub fn ignore_event(&mut self, uid: &str) {
        self.ignored.insert(uid.to_string());
    }

    pub fn is_ignored(&self, uid: &str) -> bool {
        self.ignored.contains(uid)
    }

    /// Open the link found in the event, or the default URL.
    ///
    /// An unknown uid or a missing target is logged and otherwise a no-op.
    pub async fn open_event(&self, uid: &str, opener: &dyn UrlOpener) -> AppResult<()> {
        let Some(event) = self.get_event_by_uid(uid).await? else {
            log::warn!("Cannot open event {}: it is no longer in the calendar", uid);
            return Ok(());
        };

        match resolve_event_url(&event, self.default_url.as_deref()) {
            Some(url) => opener.open_url(&url),
            None => {
                log::warn!(
                    "Event '{}' has no link and no default URL is configured",
                    event.summary
                );
                Ok(())
            }
        }
    }
}

/// Keep timed, unfinished, non-ignored events inside the window, earliest first.
pub fn filter_upcoming(
    events: Vec<Event>,
    lookahead: Lookahead,
    ignored: &HashSet<String>,
    now: DateTime<Utc>,
) -> Vec<Event> {
    let mut upcoming: Vec<Event> = events
        .into_iter()
        .filter(|event| !event.all_day)
        .filter(|event| !event.ended(now))
        .filter(|event| lookahead.contains(event, now))
        .filter(|event| !ignored.contains(&event.uid))
        .collect();

    upcoming.sort_by_key(|event| event.start);
    upcoming
}

/// Location, then description, then summary; the first http(s) link wins.
pub fn resolve_event_url(event: &Event, default_url: Option<&str>) -> Option<String> {
    [
        event.location.as_deref(),
        event.description.as_deref(),
        Some(event.summary.as_str()),
    ]
    .into_iter()
    .flatten()
    .find_map(utils::extract_url)
    .or_else(|| default_url.map(str::trim).filter(|url| !url.is_empty()))
    .map(str::to_string)
}
