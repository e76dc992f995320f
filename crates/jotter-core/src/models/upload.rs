use chrono::{DateTime, Utc};
use serde::Serialize;

/// Final outcome of a completed object upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    /// Object key the file was stored under.
    pub key: String,
    /// Public URL of the stored object.
    pub url: String,
    /// Provider-reported location (host/key, no scheme), when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Provider entity tag, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Point-in-time transfer status handed to progress observers.
///
/// `loaded` and `percent` never decrease across one upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadProgress {
    /// Bytes handed to the transport so far.
    pub loaded: u64,
    /// Total bytes in this upload.
    pub total: u64,
    /// Average transfer rate in bytes per second since the upload began.
    pub speed: f64,
    /// Completion in percent, 0..=100, two-decimal precision.
    pub percent: f64,
}

impl UploadProgress {
    pub fn new(loaded: u64, total: u64, speed: f64) -> Self {
        let percent = if total == 0 {
            100.0
        } else {
            (loaded as f64 / total as f64 * 10_000.0).round() / 100.0
        };
        Self {
            loaded,
            total,
            speed,
            percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_two_decimal() {
        let progress = UploadProgress::new(1, 3, 0.0);
        assert_eq!(progress.percent, 33.33);
    }

    #[test]
    fn complete_transfer_is_hundred_percent() {
        assert_eq!(UploadProgress::new(4096, 4096, 1.0).percent, 100.0);
    }

    #[test]
    fn zero_total_reports_complete() {
        assert_eq!(UploadProgress::new(0, 0, 0.0).percent, 100.0);
    }
}
