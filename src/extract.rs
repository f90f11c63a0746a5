//! Invocation input and request parameter resolution.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ServerError;

/// Object parameters as they appear at either level of the invocation input.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryParameters {
    /// Name of the bucket.
    pub bucket: Option<String>,
    /// HTTP verb the url is signed for.
    pub method: Option<String>,
    /// Key of the object.
    pub key: Option<String>,
}

/// Payload of a single invocation.
///
/// A direct invocation carries the parameters at the top level; an API
/// Gateway proxy event carries them in `queryStringParameters`. Any other
/// field of the event is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvocationInput {
    /// Parameters of a direct invocation.
    #[serde(flatten)]
    pub parameters: QueryParameters,
    /// Parameters forwarded by API Gateway.
    pub query_string_parameters: Option<NestedParameters>,
}

/// Parameters of `queryStringParameters`.
///
/// The outer `Option` tells whether the key was present at all, so an
/// explicit `null` still overwrites the top-level value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NestedParameters {
    /// Name of the bucket.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub bucket: Option<Option<String>>,
    /// HTTP verb the url is signed for.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub method: Option<Option<String>>,
    /// Key of the object.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub key: Option<Option<String>>,
}

impl From<QueryParameters> for NestedParameters {
    fn from(value: QueryParameters) -> Self {
        Self {
            bucket: value.bucket.map(Some),
            method: value.method.map(Some),
            key: value.key.map(Some),
        }
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl InvocationInput {
    /// Parse an invocation from a raw JSON event.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ServerError> {
        serde_json::from_value(value)
            .map_err(|e| ServerError::invalid_parameters(format!("malformed invocation: {e}")))
    }

    /// Parse an invocation from a JSON document.
    pub fn from_slice(body: &[u8]) -> Result<Self, ServerError> {
        serde_json::from_slice(body)
            .map_err(|e| ServerError::invalid_parameters(format!("malformed invocation: {e}")))
    }

    /// Resolve the object parameters. A key present in
    /// `queryStringParameters`, even as `null`, overwrites the top-level value.
    pub fn resolve(&self) -> ResolvedParameters {
        let top = &self.parameters;
        let nested = self.query_string_parameters.clone().unwrap_or_default();

        ResolvedParameters {
            bucket: nested.bucket.unwrap_or_else(|| top.bucket.clone()),
            method: nested.method.unwrap_or_else(|| top.method.clone()),
            key: nested.key.unwrap_or_else(|| top.key.clone()),
        }
    }
}

/// Bucket, method and key after resolution. Absent values stay unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedParameters {
    bucket: Option<String>,
    method: Option<String>,
    key: Option<String>,
}

impl ResolvedParameters {
    /// Create resolved parameters from their parts.
    pub fn new(bucket: Option<String>, method: Option<String>, key: Option<String>) -> Self {
        Self {
            bucket,
            method,
            key,
        }
    }

    /// The resolved bucket.
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// The resolved method, exactly as supplied.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// The resolved object key.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for InvocationInput
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let parameters = serde_urlencoded::from_str::<QueryParameters>(query)
            .map_err(|e| ServerError::invalid_parameters(e.to_string()))?;
        Ok(InvocationInput {
            parameters: QueryParameters::default(),
            query_string_parameters: Some(parameters.into()),
        })
    }
}
