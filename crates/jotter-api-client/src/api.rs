//! Domain methods for the Jotter API client.
//!
//! Thin wrappers over the generic helpers: user session, note CRUD, and
//! temporary storage credential issuance. Every endpoint answers the
//! `{code, message, data}` envelope.

use crate::ApiClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use jotter_core::models::{
    ApiEnvelope, LoginData, LoginRequest, Note, NoteDraft, NotePage, StsCredential,
};
use jotter_storage::{CredentialSource, UploadError};
use validator::Validate;

impl ApiClient {
    /// Log in and persist the returned bearer token in the token store.
    pub async fn login(&self, account: &str, password: &str) -> Result<()> {
        let request = LoginRequest {
            account: account.to_string(),
            password: password.to_string(),
        };
        request.validate().context("Invalid login request")?;

        let envelope: ApiEnvelope<LoginData> = self.post_json("/api/user/login", &request).await?;
        let data = envelope.into_data()?;
        self.token_store()
            .put(&data.token)
            .context("Failed to persist token")?;
        Ok(())
    }

    /// Log out. The local token is dropped even when the server call fails.
    pub async fn logout(&self) -> Result<()> {
        let result: Result<ApiEnvelope<serde_json::Value>> =
            self.post_json("/api/user/logout", &serde_json::json!({})).await;
        if let Err(error) = self.token_store().clear() {
            tracing::warn!(error = %error, "failed to clear stored token");
        }
        result?.ensure_ok()
    }

    /// List notes, paginated.
    pub async fn list_notes(&self, current: u32, page_size: u32) -> Result<NotePage> {
        let body = serde_json::json!({ "current": current, "pageSize": page_size });
        let envelope: ApiEnvelope<NotePage> = self.post_json("/api/note/list/page", &body).await?;
        envelope.into_data()
    }

    /// Get a single note by id.
    pub async fn get_note(&self, id: i64) -> Result<Note> {
        let envelope: ApiEnvelope<Note> = self.get(&format!("/api/note/{}", id), &[]).await?;
        envelope.into_data()
    }

    /// Create a note; returns the new note's id.
    pub async fn create_note(&self, draft: &NoteDraft) -> Result<i64> {
        draft.validate().context("Invalid note draft")?;
        let envelope: ApiEnvelope<i64> = self.post_json("/api/note/add", draft).await?;
        envelope.into_data()
    }

    /// Update fields of a note.
    pub async fn update_note(&self, id: i64, patch: &serde_json::Value) -> Result<()> {
        let envelope: ApiEnvelope<serde_json::Value> =
            self.put_json(&format!("/api/note/{}", id), patch).await?;
        envelope.ensure_ok()
    }

    /// Delete a note.
    pub async fn delete_note(&self, id: i64) -> Result<()> {
        let envelope: ApiEnvelope<serde_json::Value> =
            self.delete(&format!("/api/note/{}", id)).await?;
        envelope.ensure_ok()
    }

    /// Like a note.
    pub async fn like_note(&self, id: i64) -> Result<()> {
        let envelope: ApiEnvelope<serde_json::Value> = self
            .post_json(&format!("/api/note/{}/like", id), &serde_json::json!({}))
            .await?;
        envelope.ensure_ok()
    }

    /// Collect (bookmark) a note.
    pub async fn collect_note(&self, id: i64) -> Result<()> {
        let envelope: ApiEnvelope<serde_json::Value> = self
            .post_json(&format!("/api/note/{}/collect", id), &serde_json::json!({}))
            .await?;
        envelope.ensure_ok()
    }

    /// Ask the backend to issue a temporary object-storage credential.
    pub async fn fetch_sts_credential(&self) -> Result<StsCredential> {
        let envelope: ApiEnvelope<StsCredential> = self.get("/api/cos/sts", &[]).await?;
        envelope.into_data()
    }
}

#[async_trait]
impl CredentialSource for ApiClient {
    async fn fetch_credential(&self) -> std::result::Result<StsCredential, UploadError> {
        self.fetch_sts_credential()
            .await
            .map_err(UploadError::CredentialUnavailable)
    }
}
