use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl AppError {
    pub fn calendar<S: Into<String>>(msg: S) -> Self {
        Self::Calendar(msg.into())
    }

    pub fn notification<S: Into<String>>(msg: S) -> Self {
        Self::Notification(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn operation_failed<S: Into<String>>(msg: S) -> Self {
        Self::OperationFailed(msg.into())
    }

    /// Network and I/O errors may embed the calendar URL or file path,
    /// which often carries a private access token.
    pub fn is_pii_safe(&self) -> bool {
        match self {
            Self::Network(_) | Self::Io(_) => false,
            Self::Calendar(_)
            | Self::Notification(_)
            | Self::Config(_)
            | Self::OperationFailed(_) => true,
        }
    }

    pub fn to_safe_string(&self) -> String {
        if self.is_pii_safe() {
            return self.to_string();
        }
        match self {
            Self::Network(e) if e.is_timeout() => "Network request timed out".to_string(),
            Self::Network(e) => match e.status() {
                Some(status) => format!("Network request failed with HTTP {}", status),
                None => "Network request failed".to_string(),
            },
            Self::Io(e) => format!("Reading calendar failed: {}", e.kind()),
            _ => self.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
