// ICS feed parsing
// Turns VEVENT components into locally owned events

use crate::calendar::common;
use crate::error::{AppError, AppResult};
use crate::models::Event;
use chrono::{DateTime, Duration, Utc};
use icalendar::{
    Calendar as IcsCalendar, Component, DatePerhapsTime, Event as IcsEvent, EventLike, Property,
};
use rrule::{RRuleSet, Tz};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Recurring events are expanded this far on either side of "now".
const RECURRENCE_WINDOW_DAYS: i64 = 1;
/// Upper bound on occurrences taken from a single rule.
const MAX_OCCURRENCES: u16 = 500;

/// Parses a feed, expanding recurring events into the occurrences around `now`.
pub fn parse_ics_data(ics_data: &str, now: DateTime<Utc>) -> AppResult<Vec<Event>> {
    let calendar = IcsCalendar::from_str(ics_data)
        .map_err(|e| AppError::calendar(format!("Failed to parse ICS data: {}", e)))?;

    let ics_events: Vec<&IcsEvent> = calendar
        .components
        .iter()
        .filter_map(|component| component.as_event())
        .collect();

    // Moved or edited occurrences replace the slot their rule would produce.
    let overridden: HashSet<(String, DateTime<Utc>)> = ics_events
        .iter()
        .filter_map(|ics_event| Some((ics_event.get_uid()?.to_string(), recurrence_id(ics_event)?)))
        .collect();

    let events: Vec<Event> = ics_events
        .into_iter()
        .flat_map(|ics_event| occurrences(ics_event, &overridden, now))
        .collect();

    if events.is_empty() && !ics_data.trim().is_empty() {
        log::debug!("Parsed 0 events from {} bytes of ICS data", ics_data.len());
    }

    Ok(events)
}

fn occurrences(
    ics_event: &IcsEvent,
    overridden: &HashSet<(String, DateTime<Utc>)>,
    now: DateTime<Utc>,
) -> Vec<Event> {
    let Some(event) = convert_ics_event(ics_event) else {
        return Vec::new();
    };
    if ics_event.properties().contains_key("RECURRENCE-ID") {
        return vec![event];
    }

    expand_recurrence(ics_event, event, now)
        .into_iter()
        .filter(|occurrence| !overridden.contains(&(occurrence.uid.clone(), occurrence.start)))
        .collect()
}

fn convert_ics_event(ics_event: &IcsEvent) -> Option<Event> {
    let summary = ics_event
        .get_summary()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Untitled Event".to_string());

    let Some(start_value) = ics_event.get_start() else {
        log::debug!("Skipping event '{}' without DTSTART", summary);
        return None;
    };
    let all_day = matches!(start_value, DatePerhapsTime::Date(_));
    let Some(start) = common::parse_ical_datetime(&start_value) else {
        log::debug!(
            "Skipping event '{}': start {:?} does not exist in its timezone",
            summary,
            start_value
        );
        return None;
    };

    let end = ics_event
        .get_end()
        .as_ref()
        .and_then(common::parse_ical_datetime)
        .unwrap_or_else(|| {
            if all_day {
                start + Duration::days(1)
            } else {
                start
            }
        });

    let uid = ics_event
        .get_uid()
        .map(|uid| uid.to_string())
        .unwrap_or_else(|| {
            let mut hasher = DefaultHasher::new();
            format!("{}{}", summary, start.timestamp()).hash(&mut hasher);
            format!("meetingalarm-{:x}", hasher.finish())
        });

    Some(Event {
        uid,
        start,
        end,
        summary,
        location: non_empty(ics_event.get_location()),
        description: non_empty(ics_event.get_description()),
        all_day,
    })
}

/// Every occurrence of `base` starting inside the window around `now`, all
/// sharing the series uid. Events without a rule, all-day series, rules that
/// cannot be evaluated and series with nothing inside the window yield `base`.
fn expand_recurrence(ics_event: &IcsEvent, base: Event, now: DateTime<Utc>) -> Vec<Event> {
    if base.all_day {
        return vec![base];
    }
    let Some(source) = recurrence_source(ics_event) else {
        return vec![base];
    };
    let rules = match source.parse::<RRuleSet>() {
        Ok(rules) => rules,
        Err(e) => {
            log::debug!("Not expanding recurrence of '{}': {}", base.summary, e);
            return vec![base];
        }
    };

    let length = base.end - base.start;
    let window = Duration::days(RECURRENCE_WINDOW_DAYS);
    let result = rules
        .after((now - window - length).with_timezone(&Tz::UTC))
        .before((now + window).with_timezone(&Tz::UTC))
        .all(MAX_OCCURRENCES);
    if result.limited {
        log::debug!("Recurrence of '{}' truncated at {} occurrences", base.summary, MAX_OCCURRENCES);
    }

    let occurrences: Vec<Event> = result
        .dates
        .into_iter()
        .map(|start| {
            let start = start.with_timezone(&Utc);
            Event {
                start,
                end: start + length,
                ..base.clone()
            }
        })
        .collect();

    if occurrences.is_empty() {
        vec![base]
    } else {
        occurrences
    }
}

/// Rebuilds the DTSTART, RRULE, RDATE and EXDATE lines of a VEVENT as the
/// input of an `RRuleSet`. `None` when the event does not recur.
fn recurrence_source(ics_event: &IcsEvent) -> Option<String> {
    let properties = ics_event.properties();
    if !properties.contains_key("RRULE") && !properties.contains_key("RDATE") {
        return None;
    }

    let mut lines = vec![content_line("DTSTART", properties.get("DTSTART")?)];
    for name in ["RRULE", "RDATE", "EXDATE"] {
        if let Some(property) = properties.get(name) {
            lines.push(content_line(name, property));
        }
    }
    Some(lines.join("\n"))
}

fn content_line(name: &str, property: &Property) -> String {
    match property.params().get("TZID") {
        Some(tzid) => format!("{};TZID={}:{}", name, tzid.value(), property.value()),
        None => format!("{}:{}", name, property.value()),
    }
}

/// The original start of the occurrence a VEVENT overrides.
fn recurrence_id(ics_event: &IcsEvent) -> Option<DateTime<Utc>> {
    let property = ics_event.properties().get("RECURRENCE-ID")?;

    // Read through DTSTART so TZID and VALUE=DATE are honoured the same way.
    let mut as_start = Property::new("DTSTART", property.value());
    for param in property.params().values() {
        as_start.append_parameter(param.clone());
    }
    let mut holder = IcsEvent::new();
    holder.append_property(as_start);

    common::parse_ical_datetime(&holder.get_start()?)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
