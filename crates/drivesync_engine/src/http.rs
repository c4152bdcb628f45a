//! HTTP delta source.
//!
//! The actual HTTP client is abstracted via [`HttpClient`] so the engine does
//! not depend on a particular HTTP library, and credentials come from an
//! [`AccessTokenProvider`] so authentication stays outside the engine.

use crate::error::{FetchError, FetchResult};
use crate::source::DeltaSource;
use drivesync_protocol::{endpoints, parse_delta_page, parse_folder_id, CreateFolderRequest, DeltaPage};

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET.
    Get,
    /// PUT.
    Put,
}

/// A request handed to an [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Request body; empty for GET.
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Creates a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Creates a PUT request with a typed body.
    pub fn put(url: impl Into<String>, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            method: HttpMethod::Put,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body,
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the first value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response returned by an [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Raw body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// HTTP client abstraction.
///
/// Implementations return `Err` only when no response was received
/// (connection failure, timeout); any status code is an `Ok` response.
pub trait HttpClient: Send + Sync {
    /// Sends a request and waits for the response.
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String>;
}

/// Supplies bearer tokens for API requests.
pub trait AccessTokenProvider: Send + Sync {
    /// Returns a currently valid access token.
    fn access_token(&self) -> Result<String, String>;
}

/// A fixed access token.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Wraps `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticToken(..)")
    }
}

impl AccessTokenProvider for StaticToken {
    fn access_token(&self) -> Result<String, String> {
        if self.0.is_empty() {
            return Err("no access token configured".to_string());
        }
        Ok(self.0.clone())
    }
}

/// Delta source backed by the drive HTTP API.
pub struct GraphDeltaSource<C: HttpClient, P: AccessTokenProvider> {
    base_url: String,
    client: C,
    tokens: P,
}

impl<C: HttpClient, P: AccessTokenProvider> GraphDeltaSource<C, P> {
    /// Creates a source talking to `base_url` (e.g. `https://api.onedrive.com/v1.0`).
    pub fn new(base_url: impl Into<String>, client: C, tokens: P) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            tokens,
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    fn send(&self, request: HttpRequest) -> FetchResult<HttpResponse> {
        let token = self
            .tokens
            .access_token()
            .map_err(FetchError::Authentication)?;
        let request = request.with_header("Authorization", format!("Bearer {}", token));
        let method = request.method;
        let url = request.url.clone();

        let response = self.client.execute(request).map_err(|e| {
            tracing::warn!(?method, %url, error = %e, "request failed");
            FetchError::Transport(e)
        })?;
        tracing::debug!(?method, %url, status = response.status, "response received");
        Ok(response)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn status_error(status: u16) -> FetchError {
    match status {
        404 => FetchError::ResourceNotFound,
        status => FetchError::UnspecifiedStatus { status },
    }
}

fn expect_created(response: HttpResponse) -> FetchResult<()> {
    match response.status {
        200 | 201 => Ok(()),
        status => Err(status_error(status)),
    }
}

impl<C: HttpClient, P: AccessTokenProvider> DeltaSource for GraphDeltaSource<C, P> {
    fn app_folder_id(&self) -> FetchResult<String> {
        let response = self.send(HttpRequest::get(self.url(endpoints::app_folder())))?;
        if response.status != 200 {
            return Err(status_error(response.status));
        }
        Ok(parse_folder_id(&response.body)?)
    }

    fn fetch_delta(&self, token: Option<&str>) -> FetchResult<DeltaPage> {
        let response = self.send(HttpRequest::get(self.url(&endpoints::delta(token))))?;
        if response.status != 200 {
            return Err(status_error(response.status));
        }
        Ok(parse_delta_page(&response.body)?)
    }

    fn create_file(&self, name: &str, _folder_id: &str) -> FetchResult<()> {
        let request = HttpRequest::put(
            self.url(&endpoints::file_content(name)),
            "text/plain",
            endpoints::NEW_FILE_CONTENT.as_bytes().to_vec(),
        );
        expect_created(self.send(request)?)
    }

    fn create_folder(&self, name: &str, _folder_id: &str) -> FetchResult<()> {
        let body = CreateFolderRequest::new(name).to_json()?;
        let request = HttpRequest::put(
            self.url(&endpoints::folder(name)),
            "application/json",
            body,
        );
        expect_created(self.send(request)?)
    }
}
