//! Traits and types for creating pre-signed urls.

use std::{fmt::Display, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::action::Action;

pub mod s3;

/// Everything a signer needs to pre-sign a single object action.
#[derive(Debug, Clone, PartialEq)]
pub struct PresignRequest {
    /// Action the url grants.
    pub action: Action,
    /// Bucket holding the object. Passed through unvalidated.
    pub bucket: Option<String>,
    /// Key of the object. Passed through unvalidated.
    pub key: Option<String>,
    /// Region the bucket lives in.
    pub region: String,
    /// How long the url stays valid.
    pub expires_in: Duration,
}

/// Trait implemented by object store clients to derive a pre-signed url for
/// an object action.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlSigner: Send + Sync {
    /// Create a pre-signed url for the requested action.
    async fn presign(&self, request: &PresignRequest) -> Result<SignedUrl, SignerError>;
}

/// A pre-signed url with a validity period.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedUrl {
    url: String,
    valid_from: DateTime<Utc>,
    valid_duration: Duration,
}

impl SignedUrl {
    /// Create a new signed url valid for `valid_duration` from `valid_from`.
    pub fn new(url: String, valid_from: DateTime<Utc>, valid_duration: Duration) -> Self {
        Self {
            url,
            valid_from,
            valid_duration,
        }
    }

    /// Get the pre-signed url.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the time the pre-signed url expires.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.valid_from + self.valid_duration
    }
}

/// Classification of signer failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignerErrorKind {
    /// The request could not be turned into a signable request.
    InvalidRequest,
    /// Any other failure of the object store client.
    Internal,
}

/// Error raised by a [`UrlSigner`].
#[derive(Debug, Clone, PartialEq)]
pub struct SignerError {
    kind: SignerErrorKind,
    message: String,
}

impl SignerError {
    /// Create a new signer error.
    pub fn new(kind: SignerErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The request could not be signed as given.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(SignerErrorKind::InvalidRequest, message)
    }

    /// The object store client failed.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SignerErrorKind::Internal, message)
    }

    /// Kind of the failure.
    pub fn kind(&self) -> SignerErrorKind {
        self.kind
    }

    /// Description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for SignerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SignerError {}
