//! COS sessions and the HTTP object transport.

use crate::signer::CosSigner;
use crate::traits::{ObjectTransport, ProgressFn, PutObjectOutput, TransportResult};
use crate::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use jotter_core::models::{StsCredential, UploadProgress};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::header::{CONTENT_LENGTH, ETAG};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Bytes escaped in the object-key path on the wire. Derived keys only use
/// alphanumerics, `_` and `.`, but caller-supplied extensions can carry
/// anything.
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}')
    .add(b'\\');

const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// One authenticated upload session.
///
/// Built from a single validated credential and bound to its validity
/// window through the signer's key time. A session serves exactly one
/// upload and is never shared or reused.
pub struct CosSession {
    signer: CosSigner,
    bucket: String,
    region: String,
    security_token: String,
    start_time: i64,
    expired_time: i64,
}

impl CosSession {
    /// Build a session from a credential whose required fields have
    /// already been checked.
    pub fn from_credential(credential: &StsCredential) -> Self {
        Self {
            signer: CosSigner::new(
                &credential.tmp_secret_id,
                &credential.tmp_secret_key,
                credential.start_time,
                credential.expired_time,
            ),
            bucket: credential.bucket.clone(),
            region: credential.region.clone(),
            security_token: credential.session_token.clone(),
            start_time: credential.start_time,
            expired_time: credential.expired_time,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn security_token(&self) -> &str {
        &self.security_token
    }

    /// The `(start, expired)` window of the credential this session wraps.
    pub fn validity_window(&self) -> (i64, i64) {
        (self.start_time, self.expired_time)
    }

    /// Virtual-host style bucket host: `{bucket}.cos.{region}.myqcloud.com`.
    pub fn host(&self) -> String {
        format!("{}.cos.{}.myqcloud.com", self.bucket, self.region)
    }

    pub fn endpoint(&self) -> String {
        format!("https://{}", self.host())
    }

    /// Public URL of an object under this session's bucket.
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.endpoint(), key)
    }

    pub(crate) fn signer(&self) -> &CosSigner {
        &self.signer
    }
}

/// HTTP transport: streams the body to the bucket with a counted chunk
/// stream, emitting one progress snapshot per chunk.
#[derive(Clone)]
pub struct HttpObjectTransport {
    client: reqwest::Client,
    chunk_size: usize,
    /// Custom endpoint for COS-compatible targets (e.g. a local fixture
    /// server). `None` uses the session's virtual-host endpoint.
    endpoint_url: Option<String>,
}

impl HttpObjectTransport {
    pub fn new() -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            chunk_size: DEFAULT_CHUNK_SIZE,
            endpoint_url: None,
        })
    }

    /// Point the transport at a custom endpoint instead of the bucket's
    /// public host.
    pub fn with_endpoint(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Endpoint and wire host for a session, honoring the override.
    fn target(&self, session: &CosSession) -> (String, String) {
        match &self.endpoint_url {
            Some(endpoint) => (endpoint.clone(), host_of(endpoint)),
            None => (session.endpoint(), session.host()),
        }
    }
}

/// Host (with port) part of an endpoint URL.
fn host_of(endpoint: &str) -> String {
    let rest = endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"))
        .unwrap_or(endpoint);
    match rest.find('/') {
        Some(pos) => rest[..pos].to_string(),
        None => rest.to_string(),
    }
}

#[async_trait]
impl ObjectTransport for HttpObjectTransport {
    async fn put_object(
        &self,
        session: &CosSession,
        key: &str,
        body: Bytes,
        observer: Option<Arc<ProgressFn>>,
    ) -> TransportResult<PutObjectOutput> {
        let total = body.len() as u64;
        let (endpoint, host) = self.target(session);
        let uri_path = format!("/{}", utf8_percent_encode(key, PATH_ESCAPE));
        let url = format!("{}{}", endpoint, uri_path);

        let mut signed_headers = BTreeMap::new();
        signed_headers.insert("host".to_string(), host.clone());
        signed_headers.insert("content-length".to_string(), total.to_string());
        let authorization =
            session
                .signer()
                .authorization("put", &uri_path, &BTreeMap::new(), &signed_headers);

        let started = Instant::now();
        let loaded = Arc::new(AtomicU64::new(0));
        let chunks: Vec<Bytes> = (0..body.len())
            .step_by(self.chunk_size.max(1))
            .map(|offset| body.slice(offset..usize::min(offset + self.chunk_size, body.len())))
            .collect();

        let counter = loaded.clone();
        let progress = observer.clone();
        let stream = futures::stream::iter(chunks.into_iter().map(move |chunk| {
            let sent = counter.fetch_add(chunk.len() as u64, Ordering::Relaxed) + chunk.len() as u64;
            if let Some(callback) = &progress {
                callback(UploadProgress::new(sent, total, rate(sent, started)));
            }
            Ok::<Bytes, std::io::Error>(chunk)
        }));

        let response = self
            .client
            .put(&url)
            .header("Authorization", authorization)
            .header("x-cos-security-token", session.security_token())
            .header(CONTENT_LENGTH, total)
            .body(reqwest::Body::wrap_stream(stream))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                bucket = %session.bucket(),
                key = %key,
                status = status.as_u16(),
                size_bytes = total,
                duration_ms = started.elapsed().as_secs_f64() * 1000.0,
                "object upload failed"
            );
            return Err(TransportError::Provider {
                status: status.as_u16(),
                body: body_text,
            });
        }

        if let Some(callback) = &observer {
            callback(UploadProgress::new(total, total, rate(total, started)));
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        tracing::info!(
            bucket = %session.bucket(),
            key = %key,
            size_bytes = total,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "object upload successful"
        );

        Ok(PutObjectOutput {
            etag,
            location: Some(format!("{}/{}", host, key)),
        })
    }
}

/// Average bytes per second since `started`.
fn rate(bytes: u64, started: Instant) -> f64 {
    bytes as f64 / started.elapsed().as_secs_f64().max(1e-6)
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
    fn session_host_and_url() {
        let session = CosSession::from_credential(&credential());
        assert_eq!(
            session.host(),
            "notes-1250000000.cos.ap-guangzhou.myqcloud.com"
        );
        assert_eq!(
            session.object_url("1700000000000_ab12cd34.png"),
            "https://notes-1250000000.cos.ap-guangzhou.myqcloud.com/1700000000000_ab12cd34.png"
        );
    }

    #[test]
    fn session_keeps_validity_window() {
        let session = CosSession::from_credential(&credential());
        assert_eq!(session.validity_window(), (1700000000, 1700001800));
        assert_eq!(session.signer().key_time(), "1700000000;1700001800");
    }

    #[test]
    fn host_of_strips_scheme_and_path() {
        assert_eq!(host_of("http://127.0.0.1:9000"), "127.0.0.1:9000");
        assert_eq!(host_of("https://cos.example.com/base"), "cos.example.com");
    }
}
