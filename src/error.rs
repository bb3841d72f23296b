//! Error and Result module.

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Result type returned from methods in this crate that can fail.
pub type Result<T> = std::result::Result<T, Error>;

type Cause = Box<dyn StdError + Send + Sync>;

/// Errors that can occur while framing, parsing, or driving an HTTP/1.1
/// exchange.
pub struct Error {
    inner: Box<ErrorImpl>,
}

struct ErrorImpl {
    kind: Kind,
    cause: Option<Cause>,
}

#[derive(Debug)]
pub(crate) enum Kind {
    Parse(Parse),
    Io,
    Canceled,
    Alloc,
}

/// The more specific reason a message failed to parse.
#[derive(Debug)]
pub(crate) enum Parse {
    StartLine,
    StatusCode,
    HeaderName,
    HeaderValue,
    BadCrlf,
    TooLarge,
}

impl Error {
    /// Returns true if this was any kind of protocol/parse error.
    pub fn is_protocol(&self) -> bool {
        matches!(self.inner.kind, Kind::Parse(_))
    }

    /// Returns true if the parse error was specifically "message head too large".
    pub fn is_too_large(&self) -> bool {
        matches!(self.inner.kind, Kind::Parse(Parse::TooLarge))
    }

    /// Returns true if this was an error surfaced by the underlying transport.
    pub fn is_io(&self) -> bool {
        matches!(self.inner.kind, Kind::Io)
    }

    /// Returns true if this was an explicit cancellation.
    pub fn is_canceled(&self) -> bool {
        matches!(self.inner.kind, Kind::Canceled)
    }

    /// Returns true if this was an allocation failure.
    pub fn is_alloc(&self) -> bool {
        matches!(self.inner.kind, Kind::Alloc)
    }

    /// Consumes the error, returning its underlying cause, if any.
    pub fn into_cause(self) -> Option<Box<dyn StdError + Send + Sync>> {
        self.inner.cause
    }

    fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(ErrorImpl { kind, cause: None }),
        }
    }

    fn with<C: Into<Cause>>(mut self, cause: C) -> Error {
        self.inner.cause = Some(cause.into());
        self
    }

    pub(crate) fn new_canceled() -> Error {
        Error::new(Kind::Canceled)
    }

    pub(crate) fn new_alloc() -> Error {
        Error::new(Kind::Alloc)
    }

    pub(crate) fn new_io(cause: io::Error) -> Error {
        Error::new(Kind::Io).with(cause)
    }

    pub(crate) fn new_start_line() -> Error {
        Error::new(Kind::Parse(Parse::StartLine))
    }

    pub(crate) fn new_status_code() -> Error {
        Error::new(Kind::Parse(Parse::StatusCode))
    }

    pub(crate) fn new_header_name() -> Error {
        Error::new(Kind::Parse(Parse::HeaderName))
    }

    pub(crate) fn new_header_value() -> Error {
        Error::new(Kind::Parse(Parse::HeaderValue))
    }

    pub(crate) fn new_bad_crlf() -> Error {
        Error::new(Kind::Parse(Parse::BadCrlf))
    }

    pub(crate) fn new_too_large() -> Error {
        Error::new(Kind::Parse(Parse::TooLarge))
    }

    /// The error's standalone message, without any wrapped cause.
    pub fn message(&self) -> impl fmt::Display + '_ {
        self.description()
    }

    fn description(&self) -> &str {
        match self.inner.kind {
            Kind::Parse(Parse::StartLine) => "invalid request-line or status-line",
            Kind::Parse(Parse::StatusCode) => "invalid HTTP status code",
            Kind::Parse(Parse::HeaderName) => "invalid header line",
            Kind::Parse(Parse::HeaderValue) => "invalid header value",
            Kind::Parse(Parse::BadCrlf) => "CR not followed by LF, or stray control byte",
            Kind::Parse(Parse::TooLarge) => "header line exceeded the buffer bound",
            Kind::Io => "transport error",
            Kind::Canceled => "operation was canceled",
            Kind::Alloc => "allocation failed",
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_tuple("httpcore::Error");
        f.field(&self.inner.kind);
        if let Some(ref cause) = self.inner.cause {
            f.field(cause);
        }
        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref cause) = self.inner.cause {
            write!(f, "{}: {}", self.description(), cause)
        } else {
            f.write_str(self.description())
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .cause
            .as_ref()
            .map(|cause| &**cause as &(dyn StdError + 'static))
    }
}

#[doc(hidden)]
trait AssertSendSync: Send + Sync + 'static {}
#[doc(hidden)]
impl AssertSendSync for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size_of() {
        assert_eq!(std::mem::size_of::<Error>(), std::mem::size_of::<usize>());
    }

    #[test]
    fn predicates() {
        assert!(Error::new_too_large().is_protocol());
        assert!(Error::new_too_large().is_too_large());
        assert!(Error::new_canceled().is_canceled());
        assert!(Error::new_io(io::Error::new(io::ErrorKind::Other, "x")).is_io());
        assert!(Error::new_alloc().is_alloc());
    }

    #[test]
    fn display_includes_cause() {
        let err = Error::new_io(io::Error::new(io::ErrorKind::Other, "boom"));
        assert!(format!("{}", err).contains("boom"));
    }
}
