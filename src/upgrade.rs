//! Protocol upgrades.
//!
//! [`Connection::upgrade`](crate::conn::Connection::upgrade) hands back the
//! underlying transport together with any bytes already read into the Read
//! Buffer but not yet consumed by the HTTP/1.1 head — e.g. the first frame
//! of a WebSocket handshake, read speculatively along with the trailing
//! headers of the `101 Switching Protocols` response. [`Upgraded`] rewinds
//! those residual bytes in front of the transport so the new protocol sees
//! them exactly where it would have, had it been reading the raw stream
//! itself all along.
//!
//! This mirrors this crate's own `common::io::Rewind` helper, generalized
//! to work over any [`Transport`](crate::transport::Transport)-capable I/O
//! type instead of a boxed trait object.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// The transport handed back after a protocol upgrade, with any bytes the
/// Connection Engine had already buffered rewound in front of it.
#[derive(Debug)]
pub struct Upgraded<T> {
    residual: Bytes,
    io: T,
}

impl<T> Upgraded<T> {
    /// Wraps `io`, serving `residual` to the first reads before falling
    /// through to `io` itself.
    pub fn new(io: T, residual: Bytes) -> Upgraded<T> {
        Upgraded { residual, io }
    }

    /// Splits this back into the bare transport and any bytes that were
    /// never drained from the residual buffer.
    pub fn into_parts(self) -> (T, Bytes) {
        (self.io, self.residual)
    }

    /// A reference to the wrapped transport.
    pub fn get_ref(&self) -> &T {
        &self.io
    }
}

impl<T: AsyncRead + Unpin> AsyncRead for Upgraded<T> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        if !self.residual.is_empty() {
            let n = buf.remaining().min(self.residual.len());
            let chunk = self.residual.split_to(n);
            buf.put_slice(&chunk);
            return Poll::Ready(Ok(()));
        }
        Pin::new(&mut self.io).poll_read(cx, buf)
    }
}

impl<T: AsyncWrite + Unpin> AsyncWrite for Upgraded<T> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        Pin::new(&mut self.io).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.io).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.io).poll_shutdown(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn residual_bytes_are_served_before_the_underlying_transport() {
        let io = MockTransport::new(b"live-bytes".to_vec());
        let mut upgraded = Upgraded::new(io, Bytes::from_static(b"residual-"));
        let mut out = Vec::new();
        upgraded.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, b"residual-live-bytes".to_vec());
    }

    #[tokio::test]
    async fn into_parts_returns_unconsumed_residual() {
        let io = MockTransport::new(Vec::new());
        let mut upgraded = Upgraded::new(io, Bytes::from_static(b"abc"));
        let mut first_byte = [0u8; 1];
        upgraded.read_exact(&mut first_byte).await.unwrap();
        let (_, remaining) = upgraded.into_parts();
        assert_eq!(remaining.as_ref(), b"bc");
    }
}
