//! The Serializer: renders a [`Request`](crate::message::Request) or
//! [`Response`](crate::message::Response) head to RFC 7230 wire form using a
//! two-pass dry-run/emit strategy, so the caller can size a buffer exactly
//! before writing into it.

use std::fmt::Write as _;

use crate::header::HeaderTable;
use crate::message::{Request, Response};

/// Computes the exact serialized size of a request head, in bytes.
///
/// Mirrors [`write_request_head`] byte-for-byte; callers size a scratch
/// buffer with this before calling the emit pass, matching the original
/// prototype's own dry-run-then-format `http_sprintf_req`/`http_req_prepare`
/// convention.
pub fn request_head_len(req: &Request) -> usize {
    // "METHOD SP uri SP version CRLF"
    let mut len = req.method().len() + 1 + req.uri().len() + 1 + req.version().len() + 2;
    len += headers_len(req.headers());
    len += 2; // trailing CRLF terminating the head
    len
}

/// Computes the exact serialized size of a response head, in bytes.
pub fn response_head_len(res: &Response) -> usize {
    // "version SP status SP reason CRLF"
    let mut len = res.version().len() + 1 + 3 + 1 + res.reason().len() + 2;
    len += headers_len(res.headers());
    len += 2;
    len
}

fn headers_len(headers: &HeaderTable) -> usize {
    headers
        .iter()
        .map(|h| h.name().len() + 2 + h.value().len() + 2) // "name: value\r\n"
        .sum()
}

/// Appends a request head (request-line, headers, terminating blank line) to
/// `out`. The body, if any, is never written here — the Connection Engine
/// appends it as a separate `iov` entry so it can share a caller's buffer
/// without a copy.
pub fn write_request_head(req: &Request, out: &mut Vec<u8>) {
    out.reserve(request_head_len(req));
    out.extend_from_slice(req.method().as_bytes());
    out.push(b' ');
    out.extend_from_slice(req.uri().as_bytes());
    out.push(b' ');
    out.extend_from_slice(req.version().as_bytes());
    out.extend_from_slice(b"\r\n");
    write_headers(req.headers(), out);
    out.extend_from_slice(b"\r\n");
}

/// Appends a response head (status-line, headers, terminating blank line) to
/// `out`.
pub fn write_response_head(res: &Response, out: &mut Vec<u8>) {
    out.reserve(response_head_len(res));
    out.extend_from_slice(res.version().as_bytes());
    out.push(b' ');
    let mut status_buf = itoa_u16(res.status());
    out.append(&mut status_buf);
    out.push(b' ');
    out.extend_from_slice(res.reason().as_bytes());
    out.extend_from_slice(b"\r\n");
    write_headers(res.headers(), out);
    out.extend_from_slice(b"\r\n");
}

fn write_headers(headers: &HeaderTable, out: &mut Vec<u8>) {
    for header in headers.iter() {
        out.extend_from_slice(header.name().as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(header.value().as_bytes());
        out.extend_from_slice(b"\r\n");
    }
}

fn itoa_u16(n: u16) -> Vec<u8> {
    let mut s = String::with_capacity(3);
    write!(s, "{}", n).expect("writing to a String cannot fail");
    s.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Request, Response};

    #[test]
    fn request_head_len_matches_emitted_length() {
        let mut req = Request::new();
        req.set_uri("/index.html").unwrap();
        req.headers_mut().set("Host", "example.com");
        let expected = request_head_len(&req);
        let mut out = Vec::new();
        write_request_head(&req, &mut out);
        assert_eq!(out.len(), expected);
    }

    #[test]
    fn writes_minimal_get_request() {
        let req = Request::new();
        let mut out = Vec::new();
        write_request_head(&req, &mut out);
        assert_eq!(out, b"GET / HTTP/1.1\r\n\r\n");
    }

    #[test]
    fn writes_headers_in_insertion_order() {
        let mut req = Request::new();
        req.headers_mut().set("Host", "example.com");
        req.headers_mut().set("Accept", "*/*");
        let mut out = Vec::new();
        write_request_head(&req, &mut out);
        assert_eq!(
            out,
            b"GET / HTTP/1.1\r\nHost: example.com\r\nAccept: */*\r\n\r\n".to_vec()
        );
    }

    #[test]
    fn response_head_len_matches_emitted_length() {
        let mut res = Response::new();
        res.set_status(404, "Not Found").unwrap();
        res.headers_mut().set("Content-Length", "0");
        let expected = response_head_len(&res);
        let mut out = Vec::new();
        write_response_head(&res, &mut out);
        assert_eq!(out.len(), expected);
    }

    #[test]
    fn writes_default_response_head() {
        let res = Response::new();
        let mut out = Vec::new();
        write_response_head(&res, &mut out);
        assert_eq!(out, b"HTTP/1.1 200 OK\r\n\r\n");
    }
}
