//! User-facing alert messages for non-fatal problems during a save.
//!
//! Code that wants to tell the user something went wrong without failing
//! the request pushes an [`Alert`] into an [`AlertSink`]. The API layer
//! collects them per request and returns them alongside the response body.

use std::sync::Mutex;

use serde::Serialize;

/// Severity of a user-facing alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Error,
}

/// A single message destined for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
}

/// Destination for user-facing alerts.
pub trait AlertSink: Send + Sync {
    fn push(&self, alert: Alert);

    fn error(&self, message: &str) {
        self.push(Alert {
            level: AlertLevel::Error,
            message: message.to_string(),
        });
    }
}

/// Collects alerts raised while handling one request.
#[derive(Debug, Default)]
pub struct AlertBuffer {
    alerts: Mutex<Vec<Alert>>,
}

impl AlertBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every alert collected so far, leaving the buffer empty.
    pub fn drain(&self) -> Vec<Alert> {
        match self.alerts.lock() {
            Ok(mut alerts) => std::mem::take(&mut *alerts),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl AlertSink for AlertBuffer {
    fn push(&self, alert: Alert) {
        match self.alerts.lock() {
            Ok(mut alerts) => alerts.push(alert),
            Err(poisoned) => poisoned.into_inner().push(alert),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_collects_and_drains() {
        let buffer = AlertBuffer::new();
        buffer.error("disk full");
        buffer.push(Alert {
            level: AlertLevel::Info,
            message: "saved".into(),
        });

        let alerts = buffer.drain();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].level, AlertLevel::Error);
        assert_eq!(alerts[0].message, "disk full");
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn level_serializes_lowercase() {
        let json = serde_json::to_value(AlertLevel::Warning).unwrap();
        assert_eq!(json, "warning");
    }
}
