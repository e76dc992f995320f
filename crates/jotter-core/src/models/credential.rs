use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Temporary storage credential issued by the backend STS endpoint.
///
/// Wire format is camelCase JSON. The credential grants access to exactly
/// one bucket/region for the `start_time..expired_time` window (epoch
/// seconds) and must not be reused once that window closes. `key` is the
/// object path the issuer reserved for this grant; uploads derive their own
/// object key and carry this field for reference only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StsCredential {
    pub tmp_secret_id: String,
    pub tmp_secret_key: String,
    pub session_token: String,
    pub start_time: i64,
    pub expired_time: i64,
    pub bucket: String,
    pub region: String,
    #[serde(default)]
    pub key: String,
    /// Issuer request id, present in newer backend revisions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// RFC 3339 expiry string, present in newer backend revisions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
}

impl StsCredential {
    /// The `(start, expired)` validity window in epoch seconds.
    pub fn validity_window(&self) -> (i64, i64) {
        (self.start_time, self.expired_time)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expired_time, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_shape() {
        let json = r#"{
            "tmpSecretId": "AKIDtest",
            "tmpSecretKey": "secret",
            "sessionToken": "token",
            "startTime": 1700000000,
            "expiredTime": 1700001800,
            "bucket": "notes-1250000000",
            "region": "ap-guangzhou",
            "key": "uploads/",
            "requestId": "req-1",
            "expiration": "2023-11-14T22:43:20Z"
        }"#;
        let credential: StsCredential = serde_json::from_str(json).unwrap();
        assert_eq!(credential.tmp_secret_id, "AKIDtest");
        assert_eq!(credential.validity_window(), (1700000000, 1700001800));
        assert_eq!(credential.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn older_revision_without_optional_fields() {
        let json = r#"{
            "tmpSecretId": "AKIDtest",
            "tmpSecretKey": "secret",
            "sessionToken": "token",
            "startTime": 1700000000,
            "expiredTime": 1700001800,
            "bucket": "notes-1250000000",
            "region": "ap-guangzhou"
        }"#;
        let credential: StsCredential = serde_json::from_str(json).unwrap();
        assert!(credential.key.is_empty());
        assert!(credential.request_id.is_none());
        assert!(credential.expiration.is_none());
    }
}
