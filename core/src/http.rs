//! Plain-data HTTP types and the response normalizer.
//!
//! # Design
//! Requests and responses are described as owned plain data. The caller (or a
//! façade such as `ServiceClient`) builds `HttpRequest` values; a transport
//! executes them and hands the raw status/headers/bytes triple to
//! [`normalize`], which produces the one uniform `HttpResponse` shape used for
//! every HTTP reply — success and error statuses alike.

use serde_json::Value;

/// HTTP verb for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute; the authority component must match the server's TLS
/// certificate for the call to succeed. `body` is `None` for bodyless verbs.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// A bodyless, headerless request. Callers add headers/body by mutating
    /// the returned value or with struct update syntax.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }
}

/// Response payload: decoded JSON when the bytes parse, raw bytes otherwise.
///
/// The decision is made purely by whether parsing succeeds — never by
/// content-type sniffing. Plain-text, empty, and binary payloads all land in
/// `Raw` byte-for-byte.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Decoded(Value),
    Raw(Vec<u8>),
}

impl Body {
    /// The decoded JSON value, if the payload parsed as JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Decoded(value) => Some(value),
            Body::Raw(_) => None,
        }
    }

    /// The payload as bytes, if it did not parse as JSON.
    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            Body::Decoded(_) => None,
            Body::Raw(bytes) => Some(bytes),
        }
    }
}

/// A completed HTTP exchange.
///
/// Constructed for *any* HTTP reply, including 4xx/5xx — error statuses are
/// data here, not failures. `status` is never 0 on a returned value; the
/// complete absence of a reply surfaces as a `TransportError` instead.
///
/// Header names arrive lower-cased by the HTTP layer; duplicate names are kept
/// as separate pairs in arrival order rather than collapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl HttpResponse {
    /// Case-insensitive lookup of the first value for `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Normalize a raw status/headers/bytes triple into an [`HttpResponse`].
///
/// Pure function of its inputs: tries to decode the body as JSON and keeps the
/// original bytes unchanged when that fails. Applies identically whether
/// `status` is in the success range or the error range.
pub fn normalize(status: u16, headers: Vec<(String, String)>, raw_body: Vec<u8>) -> HttpResponse {
    debug_assert!(status != 0, "status 0 is reserved for 'no HTTP reply obtained'");
    HttpResponse {
        status,
        headers,
        body: parse_body(raw_body),
    }
}

fn parse_body(raw: Vec<u8>) -> Body {
    match serde_json::from_slice(&raw) {
        Ok(value) => Body::Decoded(value),
        Err(_) => Body::Raw(raw),
    }
}
