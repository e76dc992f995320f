//! Transport abstraction for the object-storage provider.
//!
//! The upload orchestrator drives any [`ObjectTransport`]; production code
//! uses the HTTP implementation in [`crate::cos`], tests substitute their
//! own.

use crate::cos::CosSession;
use async_trait::async_trait;
use bytes::Bytes;
use jotter_core::models::UploadProgress;
use std::sync::Arc;
use thiserror::Error;

/// Progress observer invoked with every transfer snapshot.
pub type ProgressFn = dyn Fn(UploadProgress) + Send + Sync;

/// Transport failure, carrying the provider's payload untouched.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("storage provider returned status {status}: {body}")]
    Provider { status: u16, body: String },
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Metadata the provider returns for a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectOutput {
    /// Entity tag, as returned (quotes included when the provider sends them).
    pub etag: Option<String>,
    /// `host/key` location, no scheme.
    pub location: Option<String>,
}

/// Executes one PUT against the provider under an authenticated session.
///
/// Implementations emit zero or more progress snapshots to `observer`,
/// order-preserving with non-decreasing `loaded`, and do not retry.
#[async_trait]
pub trait ObjectTransport: Send + Sync {
    async fn put_object(
        &self,
        session: &CosSession,
        key: &str,
        body: Bytes,
        observer: Option<Arc<ProgressFn>>,
    ) -> TransportResult<PutObjectOutput>;
}
