//! An in-memory [`Transport`](crate::transport::Transport) used by this
//! crate's own tests, following the role `AsyncIo<T>` plays in this crate's
//! lineage's own test-only mock transport: a controllable stand-in for a
//! real socket that lets a test feed bytes in and inspect bytes written out.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// A mock duplex transport backed by in-memory buffers.
///
/// Reads are satisfied from a queue of bytes fed in ahead of time (via
/// [`MockTransport::new`] or [`MockTransport::feed`]); once the queue is
/// drained, reads report EOF rather than blocking, since these tests drive
/// the connection engine against a scripted exchange rather than a live
/// peer. Writes are appended to an internal buffer inspectable via
/// [`MockTransport::written`].
#[derive(Debug, Default)]
pub struct MockTransport {
    to_read: VecDeque<u8>,
    written: Vec<u8>,
    shutdown: bool,
    block_when_empty: bool,
}

impl MockTransport {
    /// Creates a transport that will yield `initial` bytes to the first
    /// reads issued against it, then EOF.
    pub fn new(initial: impl Into<Vec<u8>>) -> MockTransport {
        MockTransport {
            to_read: initial.into().into(),
            written: Vec::new(),
            shutdown: false,
            block_when_empty: false,
        }
    }

    /// Creates a transport with nothing to read, whose reads never resolve
    /// (rather than reporting EOF) until bytes are [`fed`](Self::feed) in —
    /// useful for tests exercising cancellation of a pending read.
    pub fn blocking() -> MockTransport {
        MockTransport {
            block_when_empty: true,
            ..MockTransport::default()
        }
    }

    /// Queues more bytes to be returned by subsequent reads, for tests that
    /// need to simulate a peer's second message arriving after the first is
    /// consumed.
    pub fn feed(&mut self, more: &[u8]) {
        self.to_read.extend(more);
    }

    /// Everything written to this transport so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// True if the transport was shut down via `AsyncWrite::poll_shutdown`.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }
}

impl AsyncRead for MockTransport {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        if self.to_read.is_empty() && self.block_when_empty {
            // Never wakes on its own: a test using `blocking()` is
            // expected to resolve the pending read via cancellation, not
            // by waiting for more bytes.
            let _ = &cx;
            return Poll::Pending;
        }
        let n = buf.remaining().min(self.to_read.len());
        for _ in 0..n {
            buf.put_slice(&[self.to_read.pop_front().unwrap()]);
        }
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockTransport {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        self.written.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_write_vectored(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        bufs: &[std::io::IoSlice<'_>],
    ) -> Poll<std::io::Result<usize>> {
        let mut total = 0;
        for buf in bufs {
            self.written.extend_from_slice(buf);
            total += buf.len();
        }
        Poll::Ready(Ok(total))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        self.shutdown = true;
        Poll::Ready(Ok(()))
    }
}
