//! The Message Parser: turns tokenized lines into request-line/status-line
//! fields and header entries, and decides how large a body (if any) follows
//! the head.

use crate::error::{Error, Result};
use crate::header::HeaderTable;

/// The parsed fields of a request-line: `METHOD SP request-target SP
/// HTTP-version`.
#[derive(Debug)]
pub struct RequestLine {
    pub method: String,
    pub uri: String,
    pub version: String,
}

/// The parsed fields of a status-line: `HTTP-version SP status-code SP
/// reason-phrase`.
#[derive(Debug)]
pub struct StatusLine {
    pub version: String,
    pub status: u16,
    pub reason: String,
}

/// Splits a request-line into its three space-separated fields.
///
/// Per RFC 7230 §3.1.1, exactly two single-space separators are expected;
/// the reason this is `splitn(3, ...)`-based rather than a general
/// whitespace split is that a request-target may itself be followed by
/// nothing but the version token, never embedded spaces.
pub fn parse_request_line(line: &[u8]) -> Result<RequestLine> {
    let line = str_from_ascii(line)?;
    let mut parts = line.splitn(3, ' ');
    let method = parts.next().filter(|s| !s.is_empty());
    let uri = parts.next().filter(|s| !s.is_empty());
    let version = parts.next().filter(|s| !s.is_empty());
    match (method, uri, version) {
        (Some(method), Some(uri), Some(version)) => Ok(RequestLine {
            method: method.to_owned(),
            uri: uri.to_owned(),
            version: version.to_owned(),
        }),
        _ => Err(Error::new_start_line()),
    }
}

/// Splits a status-line into its version, status code, and reason phrase.
///
/// The reason phrase may itself contain spaces, so only the first two
/// separators are significant (`splitn(3, ...)`); the status code must be
/// exactly three ASCII digits in `[100, 999]`.
pub fn parse_status_line(line: &[u8]) -> Result<StatusLine> {
    let line = str_from_ascii(line)?;
    let mut parts = line.splitn(3, ' ');
    let version = parts.next().filter(|s| !s.is_empty());
    let status = parts.next().filter(|s| !s.is_empty());
    let reason = parts.next().unwrap_or("");
    match (version, status) {
        (Some(version), Some(status)) => {
            let status = parse_status_code(status)?;
            Ok(StatusLine {
                version: version.to_owned(),
                status,
                reason: reason.to_owned(),
            })
        }
        _ => Err(Error::new_start_line()),
    }
}

fn parse_status_code(status: &str) -> Result<u16> {
    if status.len() != 3 || !status.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::new_status_code());
    }
    let code: u16 = status.parse().map_err(|_| Error::new_status_code())?;
    if !(100..=999).contains(&code) {
        return Err(Error::new_status_code());
    }
    Ok(code)
}

/// The outcome of parsing one header-region line.
#[derive(Debug)]
pub enum HeaderLine<'a> {
    /// The empty line that terminates the header block.
    End,
    /// A `name: value` pair with leading/trailing optional whitespace (OWS)
    /// trimmed from the value.
    Header { name: &'a str, value: &'a str },
}

/// Parses a single line already extracted from the header region.
///
/// Splits on the first colon, then trims `SP`/`HTAB` (OWS) from both ends of
/// the value per RFC 7230 §3.2; the header name itself is not permitted to
/// contain whitespace and is rejected if it does.
pub fn parse_header_line(line: &[u8]) -> Result<HeaderLine<'_>> {
    if line.is_empty() {
        return Ok(HeaderLine::End);
    }
    let line = str_from_ascii(line)?;
    let colon = line.find(':').ok_or_else(Error::new_header_name)?;
    let name = &line[..colon];
    if name.is_empty() || name.bytes().any(|b| b.is_ascii_whitespace()) {
        return Err(Error::new_header_name());
    }
    let value = line[colon + 1..].trim_matches(|c| c == ' ' || c == '\t');
    Ok(HeaderLine::Header { name, value })
}

/// Determines how many body bytes follow the head, per the `Content-Length`
/// header and HTTP version.
///
/// Only an `HTTP/1.1` message with a present, strictly positive
/// `Content-Length` carries a body at this layer; an `HTTP/1.0` message, one
/// with no `Content-Length`, or one whose `Content-Length` is zero,
/// non-numeric, or negative, always has an empty body here — matching the
/// original prototype's `atoi()`-based read (`http.c`'s
/// `nni_http_conn_read_req`/`read_res`: `(len = atoi(lstr)) > 0`), which
/// silently treats anything `atoi` can't parse as `0` rather than failing
/// the exchange. Connection-close-delimited bodies are left to the caller.
pub fn body_length(version: &str, headers: &HeaderTable) -> Result<usize> {
    if version != "HTTP/1.1" {
        return Ok(0);
    }
    match headers.find("Content-Length") {
        Some(value) => Ok(value.trim().parse::<usize>().unwrap_or(0)),
        None => Ok(0),
    }
}

fn str_from_ascii(line: &[u8]) -> Result<&str> {
    std::str::from_utf8(line).map_err(|_| Error::new_start_line())
}
