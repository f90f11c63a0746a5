//! Mapping of HTTP verbs onto S3 object actions.

use std::{fmt::Display, str::FromStr};

/// S3 object action a pre-signed url grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Download the object.
    GetObject,
    /// Upload or overwrite the object.
    PutObject,
    /// Delete the object.
    DeleteObject,
}

impl Action {
    /// Map an optional, case-insensitive verb onto an action.
    ///
    /// An absent verb is rejected the same way as an unknown one.
    pub fn from_method(method: Option<&str>) -> Result<Self, UnsupportedMethod> {
        match method {
            Some(method) => method.parse(),
            None => Err(UnsupportedMethod(None)),
        }
    }

    /// Name of the action in the storage API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::GetObject => "get_object",
            Action::PutObject => "put_object",
            Action::DeleteObject => "delete_object",
        }
    }
}

impl FromStr for Action {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Action::GetObject),
            "put" => Ok(Action::PutObject),
            "delete" => Ok(Action::DeleteObject),
            _ => Err(UnsupportedMethod(Some(s.to_owned()))),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The requested method has no corresponding action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedMethod(Option<String>);

impl UnsupportedMethod {
    /// The rejected method, if one was supplied.
    pub fn method(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl Display for UnsupportedMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(method) => write!(
                f,
                "Unsupported method `{method}`, expected one of get, put, delete"
            ),
            None => write!(f, "Missing method, expected one of get, put, delete"),
        }
    }
}

impl std::error::Error for UnsupportedMethod {}
