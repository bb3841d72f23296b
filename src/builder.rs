//! Connection configuration, following the shape of this crate's lineage's
//! own `server::conn::http1::Builder` / `client::conn::http1::Builder`.

use crate::conn::Connection;
use crate::transport::Transport;

/// The Read Buffer's initial, and minimum, capacity; also the fixed
/// capacity it's built with unless [`ConnectionBuilder::max_buf_size`] or
/// [`ConnectionBuilder::read_buf_exact_size`] says otherwise.
pub const INIT_BUFFER_SIZE: usize = 8192;
/// A convenience ceiling for callers that want to opt into growth via
/// [`ConnectionBuilder::max_buf_size`] without picking their own bound.
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 8192 + 4096 * 100;

/// Builds a [`Connection`] with a chosen buffer policy.
///
/// By default the Read Buffer is fixed at [`INIT_BUFFER_SIZE`] (8192 bytes,
/// per the Data Model's bound on a single header line) and never grows: a
/// line that doesn't fit is a protocol error, not a reason to reallocate.
/// Call [`Self::max_buf_size`] to opt into a buffer that starts at
/// [`INIT_BUFFER_SIZE`] and grows on demand up to the given ceiling instead.
#[derive(Clone, Debug)]
pub struct ConnectionBuilder {
    max_buf_size: usize,
    read_buf_exact_size: Option<usize>,
}

impl Default for ConnectionBuilder {
    fn default() -> Self {
        ConnectionBuilder::new()
    }
}

impl ConnectionBuilder {
    /// Starts a builder with the default buffer policy: fixed at
    /// [`INIT_BUFFER_SIZE`], never growing.
    pub fn new() -> ConnectionBuilder {
        ConnectionBuilder {
            max_buf_size: INIT_BUFFER_SIZE,
            read_buf_exact_size: Some(INIT_BUFFER_SIZE),
        }
    }

    /// Opts into a Read Buffer that starts at [`INIT_BUFFER_SIZE`] and grows
    /// on demand, up to `max`, while a single message head is being
    /// assembled; exceeding `max` without completing the head is a protocol
    /// error (the head is "too large"), never an unbounded allocation.
    ///
    /// Calling this supersedes the fixed-size default (and any prior call to
    /// [`Self::read_buf_exact_size`]).
    ///
    /// Panics if `max` is below [`INIT_BUFFER_SIZE`] — a buffer that can
    /// never hold even its own initial capacity is not a usable bound.
    pub fn max_buf_size(&mut self, max: usize) -> &mut ConnectionBuilder {
        assert!(
            max >= INIT_BUFFER_SIZE,
            "max_buf_size must be at least {}",
            INIT_BUFFER_SIZE
        );
        self.max_buf_size = max;
        self.read_buf_exact_size = None;
        self
    }

    /// Fixes the Read Buffer at exactly `size` bytes, never growing, in
    /// place of the default [`INIT_BUFFER_SIZE`]. Calling this supersedes
    /// any prior call to [`Self::max_buf_size`].
    pub fn read_buf_exact_size(&mut self, size: usize) -> &mut ConnectionBuilder {
        self.read_buf_exact_size = Some(size);
        self
    }

    /// The capacity the Read Buffer should be created with.
    fn initial_capacity(&self) -> usize {
        self.read_buf_exact_size.unwrap_or(INIT_BUFFER_SIZE)
    }

    /// The capacity the Read Buffer must never grow past.
    pub(crate) fn max_capacity(&self) -> usize {
        self.read_buf_exact_size.unwrap_or(self.max_buf_size)
    }

    /// Builds a [`Connection`] driving exchanges over `transport`.
    pub fn build<T: Transport>(&self, transport: T) -> Connection<T> {
        Connection::new(transport, self.initial_capacity(), self.max_capacity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_a_fixed_buffer_that_never_grows() {
        let b = ConnectionBuilder::new();
        assert_eq!(b.initial_capacity(), INIT_BUFFER_SIZE);
        assert_eq!(b.max_capacity(), INIT_BUFFER_SIZE);
    }

    #[test]
    fn read_buf_exact_size_overrides_both_bounds() {
        let mut b = ConnectionBuilder::new();
        b.read_buf_exact_size(1024);
        assert_eq!(b.initial_capacity(), 1024);
        assert_eq!(b.max_capacity(), 1024);
    }

    #[test]
    fn max_buf_size_opts_into_growth_past_the_fixed_default() {
        let mut b = ConnectionBuilder::new();
        b.max_buf_size(DEFAULT_MAX_BUFFER_SIZE);
        assert_eq!(b.initial_capacity(), INIT_BUFFER_SIZE);
        assert_eq!(b.max_capacity(), DEFAULT_MAX_BUFFER_SIZE);
    }

    #[test]
    fn max_buf_size_after_read_buf_exact_size_reenables_growth() {
        let mut b = ConnectionBuilder::new();
        b.read_buf_exact_size(1024);
        b.max_buf_size(DEFAULT_MAX_BUFFER_SIZE);
        assert_eq!(b.initial_capacity(), INIT_BUFFER_SIZE);
        assert_eq!(b.max_capacity(), DEFAULT_MAX_BUFFER_SIZE);
    }

    #[test]
    #[should_panic(expected = "max_buf_size must be at least")]
    fn max_buf_size_below_init_panics() {
        let mut b = ConnectionBuilder::new();
        b.max_buf_size(100);
    }
}
