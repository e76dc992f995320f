//! The upload orchestrator.
//!
//! One call drives the whole flow: argument check, credential fetch,
//! credential field check, key derivation, session construction, transfer.
//! Every failure is surfaced from where it arose; no step retries.

use crate::cos::CosSession;
use crate::keys::derive_object_key;
use crate::traits::{ObjectTransport, ProgressFn, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use jotter_core::models::{StsCredential, UploadOutcome, UploadProgress};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Upload flow errors
#[derive(Debug, Error)]
pub enum UploadError {
    /// Caller-side misuse; never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The backend could not issue a temporary credential.
    #[error("temporary credential unavailable")]
    CredentialUnavailable(#[source] anyhow::Error),

    /// The issued credential is missing a required field (wire name).
    #[error("credential field {0} is missing or empty")]
    InvalidCredential(&'static str),

    /// The provider rejected or failed the transfer.
    #[error("upload transport failed")]
    Transport(#[source] TransportError),

    /// The caller cancelled the upload.
    #[error("upload cancelled")]
    Cancelled,
}

/// One file pending transfer, consumed whole by a single attempt.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub body: Bytes,
}

impl UploadFile {
    pub fn from_bytes(name: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }

    /// Read a local file; the stored name is the path's final component.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let body = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self {
            name,
            body: Bytes::from(body),
        })
    }
}

/// Per-call options: an optional progress observer and cancellation signal.
#[derive(Default, Clone)]
pub struct UploadOptions {
    pub on_progress: Option<Arc<ProgressFn>>,
    pub cancel: Option<CancellationToken>,
}

impl UploadOptions {
    pub fn with_progress(
        mut self,
        callback: impl Fn(UploadProgress) + Send + Sync + 'static,
    ) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Supplies a fresh temporary credential for each upload. Implemented by
/// the API client; tests provide their own.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn fetch_credential(&self) -> Result<StsCredential, UploadError>;
}

/// Check required credential fields, in a fixed order, before any session
/// is constructed. The reported name is the wire field name.
pub(crate) fn validate_credential(credential: &StsCredential) -> Result<(), UploadError> {
    let required: [(&'static str, &str); 5] = [
        ("tmpSecretId", &credential.tmp_secret_id),
        ("tmpSecretKey", &credential.tmp_secret_key),
        ("sessionToken", &credential.session_token),
        ("bucket", &credential.bucket),
        ("region", &credential.region),
    ];
    for (field, value) in required {
        if value.is_empty() {
            return Err(UploadError::InvalidCredential(field));
        }
    }
    Ok(())
}

/// Drives one upload end to end.
///
/// Stateless between calls: each call owns its credential, derived key and
/// session, so concurrent uploads need no coordination.
pub struct Uploader<C, T> {
    credentials: C,
    transport: T,
}

impl<C: CredentialSource, T: ObjectTransport> Uploader<C, T> {
    pub fn new(credentials: C, transport: T) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    pub async fn upload(
        &self,
        file: UploadFile,
        options: UploadOptions,
    ) -> Result<UploadOutcome, UploadError> {
        if file.name.is_empty() {
            return Err(UploadError::InvalidArgument("file name must not be empty"));
        }
        if file.body.is_empty() {
            return Err(UploadError::InvalidArgument("file body must not be empty"));
        }

        // A default token never fires, so the no-cancellation path costs
        // nothing extra.
        let cancel = options.cancel.clone().unwrap_or_default();
        if cancel.is_cancelled() {
            return Err(UploadError::Cancelled);
        }

        let credential = tokio::select! {
            _ = cancel.cancelled() => return Err(UploadError::Cancelled),
            fetched = self.credentials.fetch_credential() => fetched?,
        };

        validate_credential(&credential)?;

        let key = derive_object_key(&file.name);
        let session = CosSession::from_credential(&credential);
        let size = file.body.len() as u64;
        tracing::debug!(
            bucket = %session.bucket(),
            region = %session.region(),
            key = %key,
            size_bytes = size,
            "starting object upload"
        );

        let output = tokio::select! {
            _ = cancel.cancelled() => return Err(UploadError::Cancelled),
            put = self
                .transport
                .put_object(&session, &key, file.body, options.on_progress.clone()) =>
            {
                put.map_err(UploadError::Transport)?
            }
        };

        let url = session.object_url(&key);
        Ok(UploadOutcome {
            key,
            url,
            location: output.location,
            etag: output.etag,
            uploaded_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> StsCredential {
        StsCredential {
            tmp_secret_id: "AKIDtest".to_string(),
            tmp_secret_key: "secret".to_string(),
            session_token: "token".to_string(),
            start_time: 1700000000,
            expired_time: 1700001800,
            bucket: "notes-1250000000".to_string(),
            region: "ap-guangzhou".to_string(),
            key: String::new(),
            request_id: None,
            expiration: None,
        }
    }

    #[test]
    fn complete_credential_passes() {
        assert!(validate_credential(&credential()).is_ok());
    }

    #[test]
    fn each_required_field_is_checked() {
        for (field, mutate) in [
            (
                "tmpSecretId",
                Box::new(|c: &mut StsCredential| c.tmp_secret_id.clear())
                    as Box<dyn Fn(&mut StsCredential)>,
            ),
            (
                "tmpSecretKey",
                Box::new(|c: &mut StsCredential| c.tmp_secret_key.clear()),
            ),
            (
                "sessionToken",
                Box::new(|c: &mut StsCredential| c.session_token.clear()),
            ),
            ("bucket", Box::new(|c: &mut StsCredential| c.bucket.clear())),
            ("region", Box::new(|c: &mut StsCredential| c.region.clear())),
        ] {
            let mut broken = credential();
            mutate(&mut broken);
            match validate_credential(&broken) {
                Err(UploadError::InvalidCredential(reported)) => assert_eq!(reported, field),
                other => panic!("expected InvalidCredential({}), got {:?}", field, other),
            }
        }
    }

    #[test]
    fn first_missing_field_wins() {
        let mut broken = credential();
        broken.tmp_secret_key.clear();
        broken.bucket.clear();
        broken.region.clear();
        match validate_credential(&broken) {
            Err(UploadError::InvalidCredential(field)) => assert_eq!(field, "tmpSecretKey"),
            other => panic!("expected InvalidCredential, got {:?}", other),
        }
    }
}
