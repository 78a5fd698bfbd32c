//! Stored response snapshots and their timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A response snapshot captured from a successful network fetch:
/// status, headers, and body exactly as they arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSnapshot {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ResponseSnapshot {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A bucket entry: the snapshot plus the moment it was captured.
/// The timestamp is display-only; routing never checks freshness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedEntry {
    /// Normalized request key the entry was stored under.
    pub key: String,
    pub snapshot: ResponseSnapshot,
    pub cached_at: DateTime<Utc>,
}

impl CachedEntry {
    pub fn new(key: String, snapshot: ResponseSnapshot) -> Self {
        Self {
            key,
            snapshot,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 0 {
            // Handle clock skew gracefully
            "just now".to_string()
        } else if minutes < 1 {
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                // Round up: 1h 30m+ becomes 2h
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                // Round up: 1d 12h+ becomes 2d
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
