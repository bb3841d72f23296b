//! Request and response messages: start-line fields, a [`HeaderTable`], and
//! an optional body buffer.

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::header::HeaderTable;

/// An HTTP/1.1 request message.
///
/// Defaults on construction: `method = "GET"`, `uri = "/"`,
/// `version = "HTTP/1.1"`, empty headers, no body.
#[derive(Clone, Debug)]
pub struct Request {
    method: String,
    uri: String,
    version: String,
    headers: HeaderTable,
    body: Option<Bytes>,
    body_owned: bool,
}

impl Default for Request {
    fn default() -> Self {
        Request::new()
    }
}

impl Request {
    /// Builds a request with the default method, URI, and version.
    pub fn new() -> Request {
        Request {
            method: "GET".to_owned(),
            uri: "/".to_owned(),
            version: "HTTP/1.1".to_owned(),
            headers: HeaderTable::new(),
            body: None,
            body_owned: false,
        }
    }

    /// The request method, e.g. `"GET"`.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Replaces the request method.
    ///
    /// Rejects an empty method: `method`, `uri`, and `version` are always
    /// non-empty strings, the same invariant a parsed request-line already
    /// enforces.
    pub fn set_method(&mut self, method: impl Into<String>) -> Result<()> {
        let method = method.into();
        if method.is_empty() {
            return Err(Error::new_start_line());
        }
        self.method = method;
        Ok(())
    }

    /// The request-target, e.g. `"/index.html"`.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Replaces the request-target. Rejects an empty URI.
    pub fn set_uri(&mut self, uri: impl Into<String>) -> Result<()> {
        let uri = uri.into();
        if uri.is_empty() {
            return Err(Error::new_start_line());
        }
        self.uri = uri;
        Ok(())
    }

    /// The HTTP version token, e.g. `"HTTP/1.1"`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Replaces the HTTP version token. Rejects an empty version.
    pub fn set_version(&mut self, version: impl Into<String>) -> Result<()> {
        let version = version.into();
        if version.is_empty() {
            return Err(Error::new_start_line());
        }
        self.version = version;
        Ok(())
    }

    /// The request's header table.
    pub fn headers(&self) -> &HeaderTable {
        &self.headers
    }

    /// The request's header table, mutably.
    pub fn headers_mut(&mut self) -> &mut HeaderTable {
        &mut self.headers
    }

    /// The request body, if one was set.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// True if this message exclusively owns its body's storage (as opposed
    /// to sharing a caller-provided buffer that must outlive transmission).
    pub fn body_owned(&self) -> bool {
        self.body_owned
    }

    /// Sets the body to `data`, writes `Content-Length: <len>` via
    /// [`HeaderTable::set`] (replacing, never folding, any prior value), and
    /// records whether this message now exclusively owns the storage.
    pub fn set_body(&mut self, data: Bytes, owned: bool) {
        self.headers.set("Content-Length", data.len().to_string());
        self.body = Some(data);
        self.body_owned = owned;
    }

    /// Copies `data` into a freshly owned buffer and calls [`Self::set_body`]
    /// with `owned = true`.
    pub fn copy_body(&mut self, data: &[u8]) {
        self.set_body(Bytes::copy_from_slice(data), true);
    }

    /// Clears any body and its `Content-Length` header.
    pub fn clear_body(&mut self) {
        self.body = None;
        self.body_owned = false;
    }
}

/// An HTTP/1.1 response message.
///
/// Defaults on construction: `version = "HTTP/1.1"`, `status = 200`,
/// `reason = "OK"`, empty headers, no body.
#[derive(Clone, Debug)]
pub struct Response {
    version: String,
    status: u16,
    reason: String,
    headers: HeaderTable,
    body: Option<Bytes>,
    body_owned: bool,
}

impl Default for Response {
    fn default() -> Self {
        Response::new()
    }
}

impl Response {
    /// Builds a `200 OK` response.
    pub fn new() -> Response {
        Response {
            version: "HTTP/1.1".to_owned(),
            status: 200,
            reason: "OK".to_owned(),
            headers: HeaderTable::new(),
            body: None,
            body_owned: false,
        }
    }

    /// The HTTP version token.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Replaces the HTTP version token. Rejects an empty version.
    pub fn set_version(&mut self, version: impl Into<String>) -> Result<()> {
        let version = version.into();
        if version.is_empty() {
            return Err(Error::new_start_line());
        }
        self.version = version;
        Ok(())
    }

    /// The status code, always in `[100, 999]`.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The reason phrase, e.g. `"OK"` or `"Not Found"`.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Sets status and reason together. Rejects a status outside
    /// `[100, 999]` or a reason phrase containing CR or LF.
    ///
    /// Returns `std::result::Result` directly rather than this crate's own
    /// `Result<T>` alias (which fixes the error type to `Error`): the error
    /// here is the two-variant [`StatusError`], not the crate-wide `Error`.
    pub fn set_status(
        &mut self,
        status: u16,
        reason: impl Into<String>,
    ) -> std::result::Result<(), StatusError> {
        if !(100..=999).contains(&status) {
            return Err(StatusError::OutOfRange(status));
        }
        let reason = reason.into();
        if reason.bytes().any(|b| b == b'\r' || b == b'\n') {
            return Err(StatusError::BadReasonPhrase);
        }
        self.status = status;
        self.reason = reason;
        Ok(())
    }

    /// The response's header table.
    pub fn headers(&self) -> &HeaderTable {
        &self.headers
    }

    /// The response's header table, mutably.
    pub fn headers_mut(&mut self) -> &mut HeaderTable {
        &mut self.headers
    }

    /// The response body, if one was set.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// True if this message exclusively owns its body's storage.
    pub fn body_owned(&self) -> bool {
        self.body_owned
    }

    /// Sets the body to `data`, writes `Content-Length: <len>` via
    /// [`HeaderTable::set`], and records ownership.
    pub fn set_body(&mut self, data: Bytes, owned: bool) {
        self.headers.set("Content-Length", data.len().to_string());
        self.body = Some(data);
        self.body_owned = owned;
    }

    /// Copies `data` into a freshly owned buffer and calls [`Self::set_body`]
    /// with `owned = true`.
    pub fn copy_body(&mut self, data: &[u8]) {
        self.set_body(Bytes::copy_from_slice(data), true);
    }

    /// Clears any body and its `Content-Length` header.
    pub fn clear_body(&mut self) {
        self.body = None;
        self.body_owned = false;
    }
}

/// Why [`Response::set_status`] rejected a status/reason pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusError {
    /// The status code was not in `[100, 999]`.
    OutOfRange(u16),
    /// The reason phrase contained a CR or LF byte.
    BadReasonPhrase,
}

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusError::OutOfRange(code) => write!(f, "status code {} out of [100, 999]", code),
            StatusError::BadReasonPhrase => write!(f, "reason phrase contains CR or LF"),
        }
    }
}

impl std::error::Error for StatusError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req = Request::new();
        assert_eq!(req.method(), "GET");
        assert_eq!(req.uri(), "/");
        assert_eq!(req.version(), "HTTP/1.1");
        assert!(req.body().is_none());
    }

    #[test]
    fn response_defaults() {
        let res = Response::new();
        assert_eq!(res.status(), 200);
        assert_eq!(res.reason(), "OK");
    }

    #[test]
    fn set_body_writes_content_length() {
        let mut req = Request::new();
        req.copy_body(b"hello");
        assert_eq!(req.headers().find("Content-Length"), Some("5"));
        assert_eq!(req.body().unwrap().as_ref(), b"hello");
        assert!(req.body_owned());
    }

    #[test]
    fn request_setters_accept_non_empty_values() {
        let mut req = Request::new();
        req.set_method("POST").unwrap();
        req.set_uri("/submit").unwrap();
        req.set_version("HTTP/1.0").unwrap();
        assert_eq!(req.method(), "POST");
        assert_eq!(req.uri(), "/submit");
        assert_eq!(req.version(), "HTTP/1.0");
    }

    #[test]
    fn request_setters_reject_empty_values() {
        let mut req = Request::new();
        assert!(req.set_method("").unwrap_err().is_protocol());
        assert!(req.set_uri("").unwrap_err().is_protocol());
        assert!(req.set_version("").unwrap_err().is_protocol());
        // A rejected setter must not have mutated the field.
        assert_eq!(req.method(), "GET");
        assert_eq!(req.uri(), "/");
        assert_eq!(req.version(), "HTTP/1.1");
    }

    #[test]
    fn response_set_version_rejects_empty() {
        let mut res = Response::new();
        assert!(res.set_version("").unwrap_err().is_protocol());
        assert_eq!(res.version(), "HTTP/1.1");
        assert!(res.set_version("HTTP/1.0").is_ok());
        assert_eq!(res.version(), "HTTP/1.0");
    }

    #[test]
    fn set_status_rejects_out_of_range() {
        let mut res = Response::new();
        assert_eq!(
            res.set_status(1000, "Bad"),
            Err(StatusError::OutOfRange(1000))
        );
        assert_eq!(res.set_status(99, "Bad"), Err(StatusError::OutOfRange(99)));
        assert!(res.set_status(404, "Not Found").is_ok());
        assert_eq!(res.status(), 404);
    }

    #[test]
    fn set_status_rejects_crlf_in_reason() {
        let mut res = Response::new();
        assert_eq!(
            res.set_status(200, "OK\r\nEvil: header"),
            Err(StatusError::BadReasonPhrase)
        );
    }
}
