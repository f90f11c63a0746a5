#![allow(missing_docs)]

use std::fmt::Display;

use axum::response::IntoResponse;

use crate::{
    action::UnsupportedMethod,
    config::ConfigError,
    extract::ResolvedParameters,
    response::PresignEnvelope,
    signer::{SignerError, SignerErrorKind},
};

pub type Result<T> = core::result::Result<T, ServerError>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ServerErrorKind {
    InvalidParameters,
    Configuration,
    Internal,
}

impl ServerErrorKind {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidParameters => 400,
            Self::Configuration => 500,
            Self::Internal => 500,
        }
    }
}

impl Display for ServerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParameters => write!(f, "INVALID_PARAMETERS"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerError {
    kind: ServerErrorKind,
    message: String,
}

impl ServerError {
    pub fn new(kind: ServerErrorKind, message: String) -> Self {
        Self { kind, message }
    }

    pub fn kind(&self) -> ServerErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::new(ServerErrorKind::InvalidParameters, message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ServerErrorKind::Configuration, message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ServerErrorKind::Internal, message.into())
    }
}

impl Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ServerError {}

impl From<ConfigError> for ServerError {
    fn from(err: ConfigError) -> Self {
        ServerError::configuration(err.to_string())
    }
}

impl From<UnsupportedMethod> for ServerError {
    fn from(err: UnsupportedMethod) -> Self {
        ServerError::invalid_parameters(err.to_string())
    }
}

impl From<SignerError> for ServerError {
    fn from(err: SignerError) -> Self {
        match err.kind() {
            SignerErrorKind::InvalidRequest => ServerError::invalid_parameters(err.message()),
            SignerErrorKind::Internal => ServerError::internal(err.message()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        PresignEnvelope::failure(self, ResolvedParameters::default()).into_response()
    }
}
