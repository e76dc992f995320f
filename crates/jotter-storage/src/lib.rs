//! Jotter Storage Library
//!
//! Direct-to-COS media upload with backend-issued temporary credentials.
//!
//! The flow is linear: fetch a credential from the note service, check its
//! required fields, derive a collision-resistant object key, build one
//! signed session bound to the credential's validity window, and stream the
//! body to the bucket while relaying progress to the caller's observer.
//! Nothing is retried and nothing is cached; a failed call is retried by
//! calling [`Uploader::upload`] again, which starts over with a fresh
//! credential.

pub mod cos;
pub mod keys;
pub mod signer;
pub mod traits;
pub mod uploader;

// Re-export commonly used types
pub use cos::{CosSession, HttpObjectTransport};
pub use keys::derive_object_key;
pub use signer::CosSigner;
pub use traits::{ObjectTransport, ProgressFn, PutObjectOutput, TransportError, TransportResult};
pub use uploader::{CredentialSource, UploadError, UploadFile, UploadOptions, Uploader};
