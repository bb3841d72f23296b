//! The Line Tokenizer: extracts one CRLF-terminated line at a time from a
//! byte slice, enforcing the buffer-bound and control-character rules ahead
//! of the Message Parser.

use crate::error::{Error, Result};

/// What [`scan_line`] found in `input`.
#[derive(Debug)]
pub enum Outcome<'a> {
    /// No complete line is available yet; more bytes must be read before
    /// trying again. Not itself an error — the caller should `compact` its
    /// buffer and issue another transport read.
    NeedMore,
    /// A complete line, with CRLF stripped, plus the number of input bytes
    /// (including the CRLF) the caller should consume.
    Line { content: &'a [u8], consumed: usize },
}

/// Scans `input` for a single CRLF-terminated line.
///
/// `max_len` bounds how many bytes may be scanned without finding a CRLF
/// before this is treated as a protocol error (the line, and therefore the
/// message head, is too large to fit the buffer).
///
/// A bare LF not preceded by CR, a CR not immediately followed by LF, or any
/// control byte other than HTAB (`0x09`) appearing before the terminator, is
/// a protocol error: this tokenizer enforces strict CRLF framing per RFC
/// 7230 §3.5, and allows HTAB anywhere in the line body (resolving how a
/// tab inside a folded header value is treated — trimming it, if any, is the
/// Message Parser's job, not the tokenizer's).
pub fn scan_line(input: &[u8], max_len: usize) -> Result<Outcome<'_>> {
    for i in 0..input.len() {
        let b = input[i];
        match b {
            b'\r' => {
                if i + 1 >= input.len() {
                    break;
                }
                if input[i + 1] != b'\n' {
                    return Err(Error::new_bad_crlf());
                }
                return Ok(Outcome::Line {
                    content: &input[..i],
                    consumed: i + 2,
                });
            }
            b'\n' => return Err(Error::new_bad_crlf()),
            0x09 => {}
            b if b < 0x20 || b == 0x7f => return Err(Error::new_bad_crlf()),
            _ => {}
        }
    }
    if input.len() >= max_len {
        return Err(Error::new_too_large());
    }
    Ok(Outcome::NeedMore)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line<'a>(outcome: Outcome<'a>) -> (&'a [u8], usize) {
        match outcome {
            Outcome::Line { content, consumed } => (content, consumed),
            Outcome::NeedMore => panic!("expected a complete line"),
        }
    }

    #[test]
    fn extracts_line_without_crlf() {
        let (content, consumed) = line(scan_line(b"GET / HTTP/1.1\r\nHost: x", 8192).unwrap());
        assert_eq!(content, b"GET / HTTP/1.1");
        assert_eq!(consumed, 16);
    }

    #[test]
    fn needs_more_without_terminator() {
        assert!(matches!(
            scan_line(b"GET / HTTP/1.1", 8192).unwrap(),
            Outcome::NeedMore
        ));
    }

    #[test]
    fn needs_more_on_trailing_bare_cr() {
        assert!(matches!(
            scan_line(b"GET / HTTP/1.1\r", 8192).unwrap(),
            Outcome::NeedMore
        ));
    }

    #[test]
    fn rejects_cr_not_followed_by_lf() {
        let err = scan_line(b"bad\rline\r\n", 8192).unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn rejects_bare_lf() {
        let err = scan_line(b"bad\nline\r\n", 8192).unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn rejects_stray_control_byte() {
        let err = scan_line(b"bad\x01line\r\n", 8192).unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn allows_htab_in_line_body() {
        let (content, _) = line(scan_line(b"X-Custom:\tvalue\r\n", 8192).unwrap());
        assert_eq!(content, b"X-Custom:\tvalue");
    }

    #[test]
    fn too_large_without_terminator_within_bound() {
        let input = vec![b'a'; 100];
        let err = scan_line(&input, 100).unwrap_err();
        assert!(err.is_too_large());
    }

    #[test]
    fn empty_line_is_a_valid_zero_length_line() {
        let (content, consumed) = line(scan_line(b"\r\nrest", 8192).unwrap());
        assert_eq!(content, b"");
        assert_eq!(consumed, 2);
    }
}
