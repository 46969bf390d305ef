use crate::error::{AppError, AppResult};
use lazy_static::lazy_static;
use regex::Regex;

pub mod logging;

lazy_static! {
    static ref HTTP_URL: Regex = Regex::new(r"https?://\S+").expect("valid url pattern");
}

/// Returns the first http(s) URL found in `text`.
pub fn extract_url(text: &str) -> Option<&str> {
    HTTP_URL.find(text).map(|m| m.as_str())
}

/// Hands a URL to the desktop's default handler.
pub trait UrlOpener: Send {
    fn open_url(&self, url: &str) -> AppResult<()>;
}

/// Opens URLs with the system handler (`xdg-open` and friends).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open_url(&self, url: &str) -> AppResult<()> {
        log::debug!("Opening {} with the default handler", url);
        open::that_detached(url)
            .map_err(|e| AppError::operation_failed(format!("Failed to open URL: {}", e)))
    }
}
