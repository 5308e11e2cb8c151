use std::fmt;

use crate::credentials::Credentials;
use crate::resolver::{CascadeResolver, ProjectCache};
use crate::traits::{DeployClient, Output};

const NOT_EMPTY_MESSAGE: &str = "Please set a value for this field.";
const NO_PROTOCOL_MESSAGE: &str = "Specify a protocol for the URL, e.g. \"http://\".";
const CONNECTION_BAD_MESSAGE: &str = "Unable to establish connection.";

/// Result of checking a single credential field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    Ok,
    /// Non-blocking; the field is usable but probably wrong
    Warning(FieldWarning),
    Error(FieldError),
}

/// Field problems that block using the value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The field is blank
    EmptyField,
    /// Verification retrieved no projects with these credentials
    ConnectionFailed,
}

/// Field problems worth flagging without blocking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldWarning {
    /// The URL lacks an http:// or https:// prefix
    MissingProtocolScheme,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::EmptyField => write!(f, "{}", NOT_EMPTY_MESSAGE),
            FieldError::ConnectionFailed => write!(f, "{}", CONNECTION_BAD_MESSAGE),
        }
    }
}

impl fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldWarning::MissingProtocolScheme => write!(f, "{}", NO_PROTOCOL_MESSAGE),
        }
    }
}

/// Check the server URL field. Every invocation marks the project cache
/// dirty: an edited credential must force the next resolution to refetch.
pub fn validate_server_url(cache: &ProjectCache, value: &str) -> FieldCheck {
    cache.invalidate();

    if value.is_empty() {
        FieldCheck::Error(FieldError::EmptyField)
    } else if !value.starts_with("http://") && !value.starts_with("https://") {
        FieldCheck::Warning(FieldWarning::MissingProtocolScheme)
    } else {
        FieldCheck::Ok
    }
}

/// Check the authentication token field. Every invocation marks the project
/// cache dirty, like the URL check.
pub fn validate_auth_token(cache: &ProjectCache, value: &str) -> FieldCheck {
    cache.invalidate();

    if value.is_empty() {
        FieldCheck::Error(FieldError::EmptyField)
    } else {
        FieldCheck::Ok
    }
}

/// Explicit "verify connection" action: refetch the project list and report
/// whether anything came back. An empty list and a failed lookup are
/// indistinguishable here by design.
pub fn verify_connection(
    client: &dyn DeployClient,
    cache: &ProjectCache,
    output: &dyn Output,
    credentials: &Credentials,
) -> FieldCheck {
    cache.invalidate();

    let resolver = CascadeResolver::new(client, cache, output);
    if resolver.project_choices(credentials).is_empty() {
        FieldCheck::Error(FieldError::ConnectionFailed)
    } else {
        FieldCheck::Ok
    }
}
