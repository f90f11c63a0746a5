//! The API Gateway compatible response envelope.

use std::collections::BTreeMap;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{error::ServerError, extract::ResolvedParameters};

const CONTENT_TYPE_JSON: &str = "application/json";

/// Payload serialized into the envelope body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresignBody {
    /// Error message, `None` on success.
    pub message: Option<String>,
    /// Pre-signed url on the proxy domain.
    pub proxy_presign_url: Option<String>,
    /// Pre-signed url as issued by S3.
    pub s3_presign_url: Option<String>,
    /// Resolved bucket.
    pub bucket: Option<String>,
    /// Resolved method, as supplied by the caller.
    pub method: Option<String>,
    /// Resolved object key.
    pub key: Option<String>,
}

impl PresignBody {
    fn with_parameters(params: &ResolvedParameters) -> Self {
        Self {
            bucket: params.bucket().map(ToOwned::to_owned),
            method: params.method().map(ToOwned::to_owned),
            key: params.key().map(ToOwned::to_owned),
            ..Default::default()
        }
    }
}

/// Response of a single invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresignEnvelope {
    status_code: u16,
    headers: BTreeMap<String, String>,
    body: String,
}

impl PresignEnvelope {
    fn new(status_code: u16, body: &PresignBody) -> Self {
        let headers = BTreeMap::from([("Content-Type".to_owned(), CONTENT_TYPE_JSON.to_owned())]);
        // Serializing a struct of optional strings cannot fail.
        let body = serde_json::to_string(body).unwrap_or_default();
        Self {
            status_code,
            headers,
            body,
        }
    }

    /// A successful response carrying both urls.
    pub fn success(params: &ResolvedParameters, s3_url: String, proxy_url: String) -> Self {
        let body = PresignBody {
            proxy_presign_url: Some(proxy_url),
            s3_presign_url: Some(s3_url),
            ..PresignBody::with_parameters(params)
        };
        Self::new(200, &body)
    }

    /// A failed response echoing whatever parameters were resolved.
    pub fn failure(err: ServerError, params: ResolvedParameters) -> Self {
        tracing::error!(error = %err, details = ?err, "Returning error response");
        let body = PresignBody {
            message: Some(err.message().to_owned()),
            ..PresignBody::with_parameters(&params)
        };
        Self::new(err.status_code(), &body)
    }

    /// HTTP status code of the response.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Response headers.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// JSON encoded [`PresignBody`].
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Decode the body.
    pub fn presign_body(&self) -> serde_json::Result<PresignBody> {
        serde_json::from_str(&self.body)
    }
}

impl IntoResponse for PresignEnvelope {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status_code,
            [(header::CONTENT_TYPE, CONTENT_TYPE_JSON)],
            self.body,
        )
            .into_response()
    }
}
