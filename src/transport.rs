//! The abstract byte transport the Connection Engine drives exchanges over.
//!
//! Rust's native asychronous I/O idiom is poll-based futures rather than an
//! explicit completion-handle object, so the "completion interface" this
//! crate's design calls for is realized here as a trait whose methods return
//! futures: awaiting the future *is* the completion, resolving to a byte
//! count or an [`io::Error`] exactly once per submission.

use std::future::Future;
use std::io::{self, IoSlice, IoSliceMut};
use std::pin::Pin;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};

/// An asynchronous, vectored-capable byte transport.
///
/// A blanket implementation is provided for any
/// `T: AsyncRead + AsyncWrite + Unpin`, so concrete transports (a
/// `TcpStream`, a TLS-wrapped stream, an in-memory duplex) need no
/// hand-written impl — the same role `T: AsyncRead + AsyncWrite` plays for
/// the buffered I/O layer this crate's connection engine is modeled on.
pub trait Transport: Unpin {
    /// The future returned by [`Self::read_vectored`].
    type Read<'a>: Future<Output = io::Result<usize>> + 'a
    where
        Self: 'a;
    /// The future returned by [`Self::write_vectored`].
    type Write<'a>: Future<Output = io::Result<usize>> + 'a
    where
        Self: 'a;

    /// Reads into one or more buffers, returning the number of bytes read.
    /// Zero means EOF.
    fn read_vectored<'a>(&'a mut self, bufs: &'a mut [IoSliceMut<'a>]) -> Self::Read<'a>;

    /// Writes from one or more buffers, returning the number of bytes
    /// written. May write fewer bytes than requested; the caller is
    /// responsible for resubmitting the remainder.
    fn write_vectored<'a>(&'a mut self, bufs: &'a [IoSlice<'a>]) -> Self::Write<'a>;

    /// Shuts the transport down. Best-effort: errors are not surfaced, since
    /// a transport being torn down is itself usually the reason to call
    /// this.
    fn close(&mut self);
}

impl<T> Transport for T
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    type Read<'a> = ReadVectored<'a, T> where T: 'a;
    type Write<'a> = Pin<Box<dyn Future<Output = io::Result<usize>> + 'a>> where T: 'a;

    fn read_vectored<'a>(&'a mut self, bufs: &'a mut [IoSliceMut<'a>]) -> Self::Read<'a> {
        ReadVectored { io: self, bufs }
    }

    fn write_vectored<'a>(&'a mut self, bufs: &'a [IoSlice<'a>]) -> Self::Write<'a> {
        Box::pin(async move { AsyncWriteExt::write_vectored(self, bufs).await })
    }

    fn close(&mut self) {
        // Best-effort: a synchronous shutdown isn't expressible for an
        // arbitrary AsyncWrite without polling, so callers that need a
        // graceful close should await `tokio::io::AsyncWriteExt::shutdown`
        // themselves before dropping the transport. Dropping still closes
        // the underlying resource.
    }
}

/// The future returned by the blanket [`Transport::read_vectored`] impl.
///
/// `tokio::io::AsyncRead` has no vectored-read method of its own (unlike
/// `AsyncWrite`), so this polls the first non-empty buffer via
/// `poll_read` — sufficient for this crate, which only ever submits a
/// single-slice read into the Read Buffer's spare capacity.
pub struct ReadVectored<'a, T: ?Sized> {
    io: &'a mut T,
    bufs: &'a mut [IoSliceMut<'a>],
}

impl<'a, T: ?Sized> std::fmt::Debug for ReadVectored<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadVectored").finish_non_exhaustive()
    }
}

impl<'a, T> Future for ReadVectored<'a, T>
where
    T: AsyncRead + Unpin + ?Sized,
{
    type Output = io::Result<usize>;

    fn poll(self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> std::task::Poll<Self::Output> {
        let this = self.get_mut();
        let buf = match this.bufs.iter_mut().find(|b| !b.is_empty()) {
            Some(buf) => buf,
            None => return std::task::Poll::Ready(Ok(0)),
        };
        let mut read_buf = ReadBuf::new(buf);
        match Pin::new(&mut *this.io).poll_read(cx, &mut read_buf) {
            std::task::Poll::Ready(Ok(())) => std::task::Poll::Ready(Ok(read_buf.filled().len())),
            std::task::Poll::Ready(Err(e)) => std::task::Poll::Ready(Err(e)),
            std::task::Poll::Pending => std::task::Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::IoSliceMut;

    #[tokio::test]
    async fn blanket_impl_reads_from_a_cursor_backed_duplex() {
        let mut io = tokio_test::io::Builder::new().read(b"hello").build();
        let mut storage = [0u8; 5];
        let n = {
            let mut bufs = [IoSliceMut::new(&mut storage)];
            Transport::read_vectored(&mut io, &mut bufs).await.unwrap()
        };
        assert_eq!(n, 5);
        assert_eq!(&storage, b"hello");
    }
}
