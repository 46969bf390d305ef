use env_logger::{Builder, Target};
use log::{Level, LevelFilter, SetLoggerError};
use std::env;
use std::io::Write;

/// Level used when neither `--verbose` nor `RUST_LOG` asks for more.
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

pub fn init_logging(verbose: bool) -> Result<(), SetLoggerError> {
    let mut builder = Builder::new();
    builder.filter_level(default_level(verbose));

    // Quiet the HTTP and D-Bus stacks unless explicitly requested.
    builder.filter_module("reqwest", LevelFilter::Warn);
    builder.filter_module("hyper", LevelFilter::Warn);
    builder.filter_module("zbus", LevelFilter::Warn);

    // RUST_LOG wins over the flag.
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    builder.format(|buf, record| {
        let timestamp = buf.timestamp();
        match record.level() {
            Level::Info => writeln!(
                buf,
                "{} [INFO ] [{}]: {}",
                timestamp,
                record.target(),
                record.args()
            ),
            level => writeln!(
                buf,
                "{} [{:<5}] [{}:{}] {}: {}",
                timestamp,
                level,
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.target(),
                record.args()
            ),
        }
    });

    builder.target(Target::Stderr).try_init()
}

pub fn log_calendar_fetch(source: &str, events_count: usize, duration_ms: u64) {
    log::debug!(
        "[Calendar] Fetched {} events from {} in {}ms",
        events_count,
        source,
        duration_ms
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(false), LevelFilter::Warn);
        assert_eq!(default_level(true), LevelFilter::Debug);
    }
}
