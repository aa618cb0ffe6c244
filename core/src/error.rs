//! Error taxonomy for the CI/CD control client.
//!
//! # Design
//! Two disjoint families. `TransportError` means no HTTP response was ever
//! obtained (DNS, connection, TLS, or some other pre-response network fault) —
//! each kind has a different remediation path for an operator, so they are
//! never collapsed into one generic error. `ApiError` means a response *was*
//! obtained with a failure status; mapping status codes to `ApiError` is the
//! caller's job, never the transport's, which returns every status as data.

use std::fmt;
use std::path::PathBuf;

use crate::http::{Body, HttpResponse};

/// Network-level failure: the request never produced an HTTP status line.
///
/// Every variant carries the target URL and the underlying cause so a raised
/// error identifies both what was being reached and why it failed.
#[derive(Debug)]
pub enum TransportError {
    /// Host name resolution failed.
    Dns { url: String, detail: String },

    /// TCP connection refused, reset, or timed out — including a timeout that
    /// fires before any status line is received.
    Connection { url: String, detail: String },

    /// TLS handshake failed, including trust-chain validation against the
    /// configured root authorities.
    Tls { url: String, detail: String },

    /// Any other failure below the HTTP layer.
    Network { url: String, detail: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Dns { url, detail } => {
                write!(f, "DNS resolution failed for {url}: {detail}")
            }
            TransportError::Connection { url, detail } => {
                write!(f, "connection failed for {url}: {detail}")
            }
            TransportError::Tls { url, detail } => {
                write!(f, "TLS handshake failed for {url}: {detail}")
            }
            TransportError::Network { url, detail } => {
                write!(f, "network error for {url}: {detail}")
            }
        }
    }
}

impl std::error::Error for TransportError {}

/// API-level failure: an HTTP response was obtained with a 4xx/5xx status.
///
/// Produced by [`ApiError::classify`], a pure mapping callers apply to a
/// returned response. Each variant carries the numeric status and a message
/// derived from the response body.
#[derive(Debug)]
pub enum ApiError {
    /// 401 Unauthorized or 403 Forbidden.
    Auth { status: u16, message: String },

    /// 404 Not Found.
    NotFound { status: u16, message: String },

    /// 409 Conflict, e.g. the resource already exists.
    Conflict { status: u16, message: String },

    /// 500 and above.
    Server { status: u16, message: String },

    /// Any other 4xx/5xx status.
    Http { status: u16, message: String },
}

impl ApiError {
    /// Map a response's status code to an API error kind.
    ///
    /// Returns `None` for anything below 400: informational and success
    /// statuses are not failures, and redirects are already followed by the
    /// transport before a response reaches a caller.
    pub fn classify(response: &HttpResponse) -> Option<ApiError> {
        let message = summarize_body(&response.body);
        match response.status {
            401 | 403 => Some(ApiError::Auth {
                status: response.status,
                message,
            }),
            404 => Some(ApiError::NotFound {
                status: response.status,
                message,
            }),
            409 => Some(ApiError::Conflict {
                status: response.status,
                message,
            }),
            s if s >= 500 => Some(ApiError::Server { status: s, message }),
            s if s >= 400 => Some(ApiError::Http { status: s, message }),
            _ => None,
        }
    }

    /// The HTTP status that produced this error.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Auth { status, .. }
            | ApiError::NotFound { status, .. }
            | ApiError::Conflict { status, .. }
            | ApiError::Server { status, .. }
            | ApiError::Http { status, .. } => *status,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Auth { status, message } => {
                write!(f, "authentication rejected (HTTP {status}): {message}")
            }
            ApiError::NotFound { status, message } => {
                write!(f, "resource not found (HTTP {status}): {message}")
            }
            ApiError::Conflict { status, message } => {
                write!(f, "conflict (HTTP {status}): {message}")
            }
            ApiError::Server { status, message } => {
                write!(f, "server error (HTTP {status}): {message}")
            }
            ApiError::Http { status, message } => {
                write!(f, "HTTP {status}: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Configuration loading failure.
#[derive(Debug)]
pub enum ConfigError {
    /// The env file does not exist.
    FileNotFound(PathBuf),

    /// The env file exists but could not be read or parsed.
    FileInvalid { path: PathBuf, detail: String },

    /// No token was found for a service after environment and file resolution.
    MissingToken(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "configuration file {} not found", path.display())
            }
            ConfigError::FileInvalid { path, detail } => {
                write!(f, "configuration file {} invalid: {detail}", path.display())
            }
            ConfigError::MissingToken(service) => {
                write!(f, "no token found for {service}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Root error for the whole package.
#[derive(Debug)]
pub enum CicdError {
    Transport(TransportError),
    Api(ApiError),
    Config(ConfigError),
}

impl fmt::Display for CicdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CicdError::Transport(e) => e.fmt(f),
            CicdError::Api(e) => e.fmt(f),
            CicdError::Config(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for CicdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CicdError::Transport(e) => Some(e),
            CicdError::Api(e) => Some(e),
            CicdError::Config(e) => Some(e),
        }
    }
}

impl From<TransportError> for CicdError {
    fn from(e: TransportError) -> Self {
        CicdError::Transport(e)
    }
}

impl From<ApiError> for CicdError {
    fn from(e: ApiError) -> Self {
        CicdError::Api(e)
    }
}

impl From<ConfigError> for CicdError {
    fn from(e: ConfigError) -> Self {
        CicdError::Config(e)
    }
}

const BODY_PREVIEW_LIMIT: usize = 200;

/// Pull a human-readable message out of a response body.
///
/// Structured API errors commonly carry an `error` or `message` field; fall
/// back to a truncated text preview of whatever the server sent.
fn summarize_body(body: &Body) -> String {
    match body {
        Body::Decoded(value) => value
            .get("error")
            .or_else(|| value.get("message"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        Body::Raw(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            let mut preview: String = text.chars().take(BODY_PREVIEW_LIMIT).collect();
            if text.chars().count() > BODY_PREVIEW_LIMIT {
                preview.push_str("...");
            }
            preview
        }
    }
}
