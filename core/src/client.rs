//! Generic service façade over a transport.
//!
//! # Design
//! `ServiceClient` binds one service's base URL and token to a transport and
//! carries no other state between calls. It owns the policy the transport
//! deliberately does not: bearer-token injection and mapping 4xx/5xx statuses
//! to typed API errors. Service-specific clients (source control, build,
//! quality, artifacts, chat) are expected to wrap this with their own paths
//! and payloads.

use log::debug;

use crate::config::ServiceConfig;
use crate::error::{ApiError, CicdError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::HttpTransport;

/// Client for one configured service, generic over the transport it drives.
#[derive(Debug, Clone)]
pub struct ServiceClient<T: HttpTransport> {
    transport: T,
    base_url: String,
    token: Option<String>,
}

impl<T: HttpTransport> ServiceClient<T> {
    pub fn new(config: &ServiceConfig, transport: T) -> Self {
        Self {
            transport,
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    pub fn get(&self, path: &str) -> Result<HttpResponse, CicdError> {
        self.request(HttpMethod::Get, path, Vec::new(), None)
    }

    pub fn delete(&self, path: &str) -> Result<HttpResponse, CicdError> {
        self.request(HttpMethod::Delete, path, Vec::new(), None)
    }

    pub fn post(&self, path: &str, body: Vec<u8>) -> Result<HttpResponse, CicdError> {
        self.request(HttpMethod::Post, path, Vec::new(), Some(body))
    }

    pub fn put(&self, path: &str, body: Vec<u8>) -> Result<HttpResponse, CicdError> {
        self.request(HttpMethod::Put, path, Vec::new(), Some(body))
    }

    /// Execute one request against the service.
    ///
    /// Joins `path` onto the base URL, injects `Authorization` when a token is
    /// configured, defaults `content-type` to JSON for bodied requests, then
    /// applies [`ApiError::classify`] to the returned response — so an error
    /// status comes back as a typed API error while a pre-response fault keeps
    /// its transport classification.
    pub fn request(
        &self,
        method: HttpMethod,
        path: &str,
        mut headers: Vec<(String, String)>,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse, CicdError> {
        let url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        debug!("{} {}", method.as_str(), url);

        if let Some(token) = &self.token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        if body.is_some() && !has_header(&headers, "content-type") {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        let request = HttpRequest {
            method,
            url,
            headers,
            body,
        };
        let response = self.transport.request(&request)?;
        if let Some(err) = ApiError::classify(&response) {
            return Err(err.into());
        }
        Ok(response)
    }
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::error::TransportError;
    use crate::http::{normalize, Body};

    /// Fake transport: hands out one canned reply and records what it saw.
    struct FakeTransport {
        reply: RefCell<Option<Result<HttpResponse, TransportError>>>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        fn replying(status: u16, body: &[u8]) -> Self {
            Self {
                reply: RefCell::new(Some(Ok(normalize(status, Vec::new(), body.to_vec())))),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn failing(err: TransportError) -> Self {
            Self {
                reply: RefCell::new(Some(Err(err))),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn last_request(&self) -> HttpRequest {
            self.seen.borrow().last().cloned().expect("no request made")
        }
    }

    impl HttpTransport for &FakeTransport {
        fn request(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.borrow_mut().push(request.clone());
            self.reply.borrow_mut().take().expect("no canned reply left")
        }
    }

    fn config(url: &str, token: Option<&str>) -> ServiceConfig {
        ServiceConfig {
            url: url.to_string(),
            token: token.map(str::to_string),
        }
    }

    #[test]
    fn get_joins_path_and_returns_response() {
        let transport = FakeTransport::replying(200, br#"{"status":"ok"}"#);
        let client = ServiceClient::new(&config("https://gitlab.cicd.local:10300/", None), &transport);

        let response = client.get("/api/v4/version").unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, Body::Decoded(serde_json::json!({"status": "ok"})));

        let seen = transport.last_request();
        assert_eq!(seen.method, HttpMethod::Get);
        assert_eq!(seen.url, "https://gitlab.cicd.local:10300/api/v4/version");
        assert!(seen.body.is_none());
    }

    #[test]
    fn path_without_leading_slash_still_joins() {
        let transport = FakeTransport::replying(200, b"");
        let client = ServiceClient::new(&config("https://jenkins.cicd.local:10400", None), &transport);
        client.get("api/json").unwrap();
        assert_eq!(
            transport.last_request().url,
            "https://jenkins.cicd.local:10400/api/json"
        );
    }

    #[test]
    fn bearer_token_is_injected() {
        let transport = FakeTransport::replying(200, b"");
        let client = ServiceClient::new(
            &config("https://artifactory.cicd.local:8082", Some("secret")),
            &transport,
        );
        client.get("/api/repositories").unwrap();

        let seen = transport.last_request();
        assert!(seen
            .headers
            .iter()
            .any(|(n, v)| n == "Authorization" && v == "Bearer secret"));
    }

    #[test]
    fn no_token_means_no_auth_header() {
        let transport = FakeTransport::replying(200, b"");
        let client = ServiceClient::new(&config("http://sonarqube.cicd.local:9000", None), &transport);
        client.get("/api/system/health").unwrap();

        let seen = transport.last_request();
        assert!(!seen.headers.iter().any(|(n, _)| n == "Authorization"));
    }

    #[test]
    fn bodied_request_defaults_content_type_to_json() {
        let transport = FakeTransport::replying(201, b"");
        let client = ServiceClient::new(&config("https://mattermost.cicd.local:8065", None), &transport);
        client.post("/api/v4/posts", br#"{"message":"build green"}"#.to_vec()).unwrap();

        let seen = transport.last_request();
        assert!(seen
            .headers
            .iter()
            .any(|(n, v)| n == "Content-Type" && v == "application/json"));
        assert_eq!(seen.body.as_deref(), Some(&br#"{"message":"build green"}"#[..]));
    }

    #[test]
    fn caller_supplied_content_type_is_kept() {
        let transport = FakeTransport::replying(200, b"");
        let client = ServiceClient::new(&config("https://artifactory.cicd.local:8082", None), &transport);
        client
            .request(
                HttpMethod::Put,
                "/artifactory/libs/app.tar.gz",
                vec![("content-type".to_string(), "application/octet-stream".to_string())],
                Some(vec![0x1f, 0x8b]),
            )
            .unwrap();

        let seen = transport.last_request();
        let content_types: Vec<_> = seen
            .headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case("content-type"))
            .collect();
        assert_eq!(content_types.len(), 1);
        assert_eq!(content_types[0].1, "application/octet-stream");
    }

    #[test]
    fn error_status_maps_to_typed_api_error() {
        let transport = FakeTransport::replying(404, br#"{"error":"missing"}"#);
        let client = ServiceClient::new(&config("https://gitlab.cicd.local:10300", None), &transport);

        let err = client.get("/api/v4/projects/42").unwrap_err();
        assert!(matches!(
            err,
            CicdError::Api(ApiError::NotFound { status: 404, .. })
        ));
    }

    #[test]
    fn transport_fault_keeps_its_classification() {
        let transport = FakeTransport::failing(TransportError::Dns {
            url: "https://gitlab.cicd.local:10300/api".to_string(),
            detail: "no such host".to_string(),
        });
        let client = ServiceClient::new(&config("https://gitlab.cicd.local:10300", None), &transport);

        let err = client.get("/api").unwrap_err();
        assert!(matches!(
            err,
            CicdError::Transport(TransportError::Dns { .. })
        ));
    }
}
