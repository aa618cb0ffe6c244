//! Blocking HTTP transport and network-fault classification.
//!
//! # Design
//! `HttpTransport` is the single seam between the client layer and the wire:
//! one method, one blocking round trip per call. The concrete implementation
//! wraps a `ureq::Agent` configured so that 4xx/5xx statuses come back as
//! responses rather than errors — the transport never branches on status code.
//! Failures that occur before a status line is obtained are classified by an
//! ordered predicate chain (DNS, then connection, then TLS, then generic), the
//! most specific category first.

use std::io;
use std::time::Duration;

use ureq::http::Request;

use crate::error::TransportError;
use crate::http::{normalize, HttpRequest, HttpResponse};

/// A single blocking HTTP request/response exchange.
///
/// Implementations hold no cross-call state; concurrent calls are independent.
pub trait HttpTransport {
    /// Execute `request` and return the normalized response.
    ///
    /// Any HTTP status — success or error range — is a returned response.
    /// `Err` means the exchange never produced a status line, classified per
    /// [`TransportError`]; a response with status 0 is never returned.
    fn request(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport over a `ureq` agent with rustls TLS.
///
/// Each call owns its socket and TLS session for its own duration; there is no
/// connection reuse, retry, or logging in this layer.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Transport with no deadline: a call blocks until the exchange completes
    /// or the peer fails it.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Transport with a global per-call deadline. A timeout that fires before
    /// any status line is obtained classifies as a connection error.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }

    fn dispatch(
        &self,
        request: &HttpRequest,
    ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        let mut builder = Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let wire = builder.body(request.body.as_deref().unwrap_or(&[]))?;
        self.agent.run(wire)
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for UreqTransport {
    fn request(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut response = self
            .dispatch(request)
            .map_err(|e| classify(&request.url, &e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        // A fault while draining the body means the exchange never completed;
        // it classifies like any other pre-completion failure instead of
        // surfacing a truncated response.
        let raw = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| classify(&request.url, &e))?;

        Ok(normalize(status, headers, raw))
    }
}

/// Map a ureq failure to the transport error taxonomy.
///
/// Deterministic for a given fault: the same underlying cause always yields
/// the same kind.
fn classify(url: &str, err: &ureq::Error) -> TransportError {
    let url = url.to_string();
    let detail = err.to_string();
    match err {
        ureq::Error::HostNotFound => TransportError::Dns { url, detail },
        ureq::Error::Timeout(_) | ureq::Error::ConnectionFailed => {
            TransportError::Connection { url, detail }
        }
        ureq::Error::Io(io) => classify_io(url, io),
        ureq::Error::Rustls(_) | ureq::Error::Tls(_) => TransportError::Tls { url, detail },
        // A peer hanging up before the status line can surface from the HTTP
        // layer rather than the socket; it is still a connection fault.
        _ if is_disconnect(&detail) => TransportError::Connection { url, detail },
        _ => TransportError::Network { url, detail },
    }
}

fn is_disconnect(detail: &str) -> bool {
    let detail = detail.to_lowercase();
    detail.contains("unexpected eof")
        || detail.contains("disconnect")
        || detail.contains("connection closed")
}

/// Ordered predicate chain over a raw socket error, most specific first.
fn classify_io(url: String, io: &io::Error) -> TransportError {
    let detail = io.to_string();
    if is_dns_fault(io) {
        TransportError::Dns { url, detail }
    } else if is_connection_fault(io) {
        TransportError::Connection { url, detail }
    } else if is_tls_fault(io) {
        TransportError::Tls { url, detail }
    } else {
        TransportError::Network { url, detail }
    }
}

/// std surfaces getaddrinfo failures as uncategorized io errors; the libc
/// message is the only stable signal.
fn is_dns_fault(io: &io::Error) -> bool {
    let text = io.to_string();
    text.contains("failed to lookup address")
        || text.contains("Name or service not known")
        || text.contains("nodename nor servname")
        || text.contains("No such host")
}

fn is_connection_fault(io: &io::Error) -> bool {
    matches!(
        io.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected
            | io::ErrorKind::TimedOut
            | io::ErrorKind::UnexpectedEof
    )
}

/// rustls handshake and certificate-trust failures travel wrapped inside io
/// errors; recognize them by their source.
fn is_tls_fault(io: &io::Error) -> bool {
    io.get_ref()
        .map(|source| source.downcast_ref::<rustls::Error>().is_some())
        .unwrap_or(false)
}
