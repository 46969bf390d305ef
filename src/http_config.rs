//! HTTP client configuration module
//!
//! Timeouts for calendar feed downloads. A calendar URL that never answers
//! would otherwise hold up the report loop indefinitely.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

pub const USER_AGENT: &str = concat!("meetingalarm/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Total request timeout
    pub timeout: Duration,
    /// How long idle pooled connections are kept
    pub pool_idle_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(45),
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl HttpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create HTTP config for ICS data fetching
    ///
    /// The total timeout stays below the 30 second report interval so a slow
    /// server costs at most one tick.
    pub fn ics_fetch() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(25),
            pool_idle_timeout: Duration::from_secs(90),
        }
    }

    /// Build a reqwest client with this configuration
    pub fn build_client(&self) -> reqwest::Result<Client> {
        ClientBuilder::new()
            .user_agent(USER_AGENT)
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(1)
            .build()
    }
}
