//! Command line configuration
//!
//! Parses the flags and validates them into a [`Config`].

use crate::calendar::{common, CalendarSource};
use crate::error::{AppError, AppResult};
use clap::{ArgGroup, Parser};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "meetingalarm", version, about = "Meeting Alarm")]
#[command(group(ArgGroup::new("source").required(true).args(["calendar_file", "calendar_url"])))]
pub struct Args {
    /// Calendar file in iCalendar format
    #[arg(long, value_name = "PATH")]
    pub calendar_file: Option<PathBuf>,

    /// Calendar URL serving iCalendar data
    #[arg(long, value_name = "URL")]
    pub calendar_url: Option<String>,

    /// Start with meeting notifications switched off
    #[arg(long)]
    pub disable_alarm: bool,

    /// URL to open if an event does not contain one
    #[arg(long, value_name = "URL")]
    pub default_url: Option<String>,

    /// Be verbose
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: CalendarSource,
    pub default_url: Option<String>,
    pub alarm_enabled: bool,
}

impl TryFrom<Args> for Config {
    type Error = AppError;

    fn try_from(args: Args) -> AppResult<Self> {
        let source = match (args.calendar_file, args.calendar_url) {
            (Some(path), None) => CalendarSource::File(path),
            (None, Some(url)) => CalendarSource::Url(common::validate_ics_url_format(&url)?),
            (Some(_), Some(_)) => {
                return Err(AppError::config(
                    "Use either --calendar-file or --calendar-url, not both",
                ));
            }
            (None, None) => {
                return Err(AppError::config(
                    "A calendar source is required (--calendar-file or --calendar-url)",
                ));
            }
        };

        let config = Config {
            source,
            default_url: args.default_url,
            alarm_enabled: !args.disable_alarm,
        };
        validate_config(&config)?;
        Ok(config)
    }
}

/// Checks that cannot be expressed as clap constraints.
pub fn validate_config(config: &Config) -> AppResult<()> {
    if let Some(url) = &config.default_url {
        if url.trim().is_empty() {
            return Err(AppError::config("--default-url cannot be empty"));
        }
    }

    if let CalendarSource::File(path) = &config.source {
        if !path.exists() {
            // It may be created later; fetches fail softly until then.
            warn!("Calendar file {} does not exist yet", path.display());
        }
    }

    info!("Using calendar {}", config.source);
    Ok(())
}
