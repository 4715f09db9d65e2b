use std::collections::HashMap;

use url::Url;

/// HTTP request methods.
///
/// GET and POST are served; PUT, DELETE and PATCH are recognised but not
/// implemented. Any other token is kept verbatim in `Other` so the
/// dispatcher can reject it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Download a file
    GET,
    /// POST - Upload a file
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// PATCH - Partial modification of a resource
    PATCH,
    /// Any other method token, e.g. `TRACE`
    Other(String),
}

/// Represents a parsed HTTP request head from a client.
///
/// Header names are stored lower-cased. The body is not part of the
/// request value: it stays on the connection and is read as a stream.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request target (e.g., "/index.html?x=1")
    pub path: String,
    /// HTTP version as sent by the client (e.g. "HTTP/1.1")
    pub version: String,
    /// Request headers, keyed by lower-cased name
    pub headers: HashMap<String, String>,
}

/// Errors raised while interpreting an already parsed request head.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("invalid request target: {0}")]
    InvalidTarget(String),
    #[error("chunked transfer encoding is not supported")]
    ChunkedBody,
}

/// Builder for constructing Request objects.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    headers: HashMap<String, String>,
}

impl From<&str> for Method {
    /// Parses an HTTP method token (case-sensitive).
    ///
    /// ```
    /// # use flatserve::http::request::Method;
    /// assert_eq!(Method::from("GET"), Method::GET);
    /// assert_eq!(Method::from("get"), Method::Other("get".to_string()));
    /// ```
    fn from(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "PATCH" => Method::PATCH,
            other => Method::Other(other.to_string()),
        }
    }
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::Other(token) => token,
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            version: None,
            headers: HashMap::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(key.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
        })
    }
}

impl Request {
    /// Retrieves a header value by name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    /// Retrieves the Content-Length header value and parses it.
    ///
    /// Returns 0 if the header is missing or not a valid number. The parser
    /// already refuses heads with an unparseable Content-Length.
    pub fn content_length(&self) -> u64 {
        self.header("Content-Length")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Number of body bytes that follow the head on the wire.
    pub fn body_length(&self) -> Result<u64, RequestError> {
        let chunked = self
            .header("Transfer-Encoding")
            .is_some_and(|v| v.to_ascii_lowercase().contains("chunked"));

        if chunked {
            return Err(RequestError::ChunkedBody);
        }

        Ok(self.content_length())
    }

    /// Whether the client declared a `multipart/form-data` body.
    pub fn is_multipart(&self) -> bool {
        self.header("Content-Type").is_some_and(|v| {
            v.trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
    }

    /// Returns the decoded path component of the request target.
    ///
    /// Query and fragment are dropped, dot segments are resolved and
    /// percent-escapes are decoded, so `/a%2Fb.txt` yields `/a/b.txt`.
    pub fn url_path(&self) -> Result<String, RequestError> {
        // Origin-form targets are glued onto a fixed authority; joining them
        // would read `//name` as a host.
        let parsed = if self.path.starts_with('/') {
            Url::parse(&format!("http://localhost{}", self.path))
        } else {
            Url::parse(&self.path)
        };
        let url = parsed.map_err(|_| RequestError::InvalidTarget(self.path.clone()))?;

        urlencoding::decode(url.path())
            .map(|p| p.into_owned())
            .map_err(|_| RequestError::InvalidTarget(self.path.clone()))
    }
}
