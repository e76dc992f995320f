//! Jotter Core Library
//!
//! This crate provides the domain models and configuration shared across
//! the Jotter client crates: credential and note shapes, upload results,
//! progress snapshots, and environment-driven client configuration.

pub mod config;
pub mod models;

// Re-export commonly used types
pub use config::{ClientConfig, ConfigError};
pub use models::{
    ApiEnvelope, LoginData, LoginRequest, Note, NoteDraft, NotePage, NoteSummary, StsCredential,
    UploadOutcome, UploadProgress,
};
