use serde::Deserialize;

/// The `{code, message, data}` wrapper every note-service endpoint returns.
///
/// A success carries code 0 (or no code at all); failures carry a non-zero
/// code and a human-readable message.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, failing on a non-zero code or a missing `data`.
    pub fn into_data(self) -> anyhow::Result<T> {
        self.checked()?
            .data
            .ok_or_else(|| anyhow::anyhow!("API response missing data field"))
    }

    /// Check the envelope code only, for endpoints that return no payload.
    pub fn ensure_ok(self) -> anyhow::Result<()> {
        self.checked().map(|_| ())
    }

    fn checked(self) -> anyhow::Result<Self> {
        match self.code {
            Some(code) if code != 0 => Err(anyhow::anyhow!(
                "API error {}: {}",
                code,
                self.message.as_deref().unwrap_or("no message")
            )),
            _ => Ok(self),
        }
    }
}
