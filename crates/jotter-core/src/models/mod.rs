pub mod credential;
pub mod envelope;
pub mod note;
pub mod upload;
pub mod user;

pub use credential::StsCredential;
pub use envelope::ApiEnvelope;
pub use note::{Note, NoteDraft, NotePage, NoteSummary};
pub use upload::{UploadOutcome, UploadProgress};
pub use user::{LoginData, LoginRequest};
