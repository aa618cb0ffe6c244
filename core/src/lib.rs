//! Synchronous client core for a fixed CI/CD service stack.
//!
//! # Overview
//! Talks to the five backend services of the stack — source control, build
//! server, code-quality server, artifact repository, chat hub — over TLS
//! through one blocking transport operation. Every HTTP reply, error statuses
//! included, is normalized into a uniform `HttpResponse`; only the complete
//! absence of a reply (DNS, connection, TLS, or other pre-response fault)
//! surfaces as an error, classified into a small stable taxonomy.
//!
//! # Design
//! - `HttpTransport` is a one-method trait; `UreqTransport` is the concrete
//!   blocking implementation and tests substitute fakes.
//! - The transport never branches on status code: 4xx/5xx are data. Mapping
//!   failure statuses to typed `ApiError`s is the caller's `classify` step,
//!   done by `ServiceClient`.
//! - Response bodies decode opportunistically: JSON when the bytes parse,
//!   untouched raw bytes otherwise.
//! - Configuration resolves from env files with precedence environment >
//!   file > built-in stack defaults.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;

pub use client::ServiceClient;
pub use config::{ConfigLoader, GlobalConfig, ServiceConfig};
pub use error::{ApiError, CicdError, ConfigError, TransportError};
pub use http::{normalize, Body, HttpMethod, HttpRequest, HttpResponse};
pub use transport::{HttpTransport, UreqTransport};
