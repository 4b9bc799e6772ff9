//! User-facing notices raised by the session.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Screen corner a notice is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticePlacement {
    TopLeft,
    BottomLeft,
}

/// A short-lived message shown to the user, such as a failed search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: Option<String>,
    pub level: NoticeLevel,
    pub placement: NoticePlacement,
    pub duration: Duration,
}

impl Notice {
    pub fn empty_search(duration: Duration) -> Self {
        Self {
            title: "Please enter something in search".to_string(),
            description: None,
            level: NoticeLevel::Warning,
            placement: NoticePlacement::TopLeft,
            duration,
        }
    }

    pub fn search_failed(duration: Duration) -> Self {
        Self::failure("Failed to load search results", duration)
    }

    pub fn open_failed(duration: Duration) -> Self {
        Self::failure("Failed to open chat", duration)
    }

    fn failure(description: &str, duration: Duration) -> Self {
        Self {
            title: "Error occurred".to_string(),
            description: Some(description.to_string()),
            level: NoticeLevel::Error,
            placement: NoticePlacement::BottomLeft,
            duration,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}: {}", self.title, description),
            None => f.write_str(&self.title),
        }
    }
}
