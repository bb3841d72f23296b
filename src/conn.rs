//! The Connection Engine: drives full request/response exchanges over a
//! [`Transport`], turning bytes into [`Request`]/[`Response`] messages and
//! back, via the Read Buffer, Line Tokenizer, Message Parser, and
//! Serializer.
//!
//! Every operation is serialized through a single `tokio::sync::Mutex`
//! guarding the transport, Read Buffer, and write scratch buffer together —
//! this crate's `Transport` trait has no split read/write halves (unlike a
//! real socket), so a read and a write can never genuinely proceed at the
//! hardware level at once; submissions queue FIFO on the mutex the same way
//! this crate's lineage drives its own `Conn` as a single actor with one
//! owner at a time.

use std::io::{self, IoSlice, IoSliceMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use log::{debug, trace};
use tokio::sync::{Mutex, Notify};

use crate::buffer::ReadBuffer;
use crate::encode;
use crate::error::{Error, Result};
use crate::header::HeaderTable;
use crate::message::{Request, Response};
use crate::parse::{self, HeaderLine};
use crate::tokenizer::{self, Outcome};
use crate::transport::Transport;
use crate::upgrade::Upgraded;

struct State<T> {
    transport: T,
    read_buf: ReadBuffer,
    write_scratch: Vec<u8>,
}

/// A single HTTP/1.1 connection: a Read Buffer and write scratch buffer
/// paired with a transport, driving one message exchange at a time.
pub struct Connection<T: Transport> {
    state: Mutex<State<T>>,
    max_buf_size: usize,
    read_cancel: Arc<Notify>,
    read_canceled: Arc<AtomicBool>,
    write_cancel: Arc<Notify>,
    write_canceled: Arc<AtomicBool>,
}

impl<T: Transport> std::fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("max_buf_size", &self.max_buf_size)
            .finish()
    }
}

impl<T: Transport> Connection<T> {
    pub(crate) fn new(transport: T, init_capacity: usize, max_buf_size: usize) -> Connection<T> {
        Connection {
            state: Mutex::new(State {
                transport,
                read_buf: ReadBuffer::with_capacity(init_capacity),
                write_scratch: Vec::new(),
            }),
            max_buf_size,
            read_cancel: Arc::new(Notify::new()),
            read_canceled: Arc::new(AtomicBool::new(false)),
            write_cancel: Arc::new(Notify::new()),
            write_canceled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reads one complete request (head, and body if `Content-Length`
    /// indicates one) from the transport.
    pub async fn read_request(&self) -> Result<Request> {
        tokio::select! {
            biased;
            _ = wait_canceled(&self.read_canceled, &self.read_cancel) => Err(Error::new_canceled()),
            result = self.do_read_request() => result,
        }
    }

    /// Reads one complete response from the transport.
    pub async fn read_response(&self) -> Result<Response> {
        tokio::select! {
            biased;
            _ = wait_canceled(&self.read_canceled, &self.read_cancel) => Err(Error::new_canceled()),
            result = self.do_read_response() => result,
        }
    }

    /// Serializes and writes `req` (head, then body if one is set).
    pub async fn write_request(&self, req: &Request) -> Result<()> {
        tokio::select! {
            biased;
            _ = wait_canceled(&self.write_canceled, &self.write_cancel) => Err(Error::new_canceled()),
            result = self.do_write_request(req) => result,
        }
    }

    /// Serializes and writes `res`.
    pub async fn write_response(&self, res: &Response) -> Result<()> {
        tokio::select! {
            biased;
            _ = wait_canceled(&self.write_canceled, &self.write_cancel) => Err(Error::new_canceled()),
            result = self.do_write_response(res) => result,
        }
    }

    /// Cancels whichever read is currently in flight, or the next one to
    /// start if none is in flight yet, synchronously: this does not await
    /// anything, it just marks the affected call (in flight or not yet
    /// begun) so it returns a [`Error::is_canceled`] error at its next
    /// suspension point, or immediately if it hasn't started waiting yet.
    pub fn cancel_read(&self) {
        self.read_canceled.store(true, Ordering::SeqCst);
        self.read_cancel.notify_waiters();
    }

    /// Cancels whichever write is currently in flight, or the next one to
    /// start if none is in flight yet, synchronously.
    pub fn cancel_write(&self) {
        self.write_canceled.store(true, Ordering::SeqCst);
        self.write_cancel.notify_waiters();
    }

    /// Cancels any outstanding read and write, then shuts the transport
    /// down.
    ///
    /// Cancellation is signaled before the state mutex is acquired: an
    /// in-flight `read_request`/`write_request` is holding that mutex across
    /// its transport await, so `close` must wake it (the same way
    /// `cancel_read`/`cancel_write` do) rather than block behind it
    /// indefinitely.
    pub async fn close(&self) {
        self.cancel_read();
        self.cancel_write();
        let mut state = self.state.lock().await;
        state.transport.close();
    }

    /// Consumes the connection for a protocol upgrade, returning the
    /// transport wrapped so that any bytes already buffered but not yet
    /// consumed by the HTTP head are replayed first.
    pub fn upgrade(self) -> Upgraded<T> {
        let State {
            transport,
            mut read_buf,
            ..
        } = self.state.into_inner();
        let residual = Bytes::copy_from_slice(read_buf.unread());
        read_buf.clear();
        Upgraded::new(transport, residual)
    }

    async fn do_read_request(&self) -> Result<Request> {
        let mut state = self.state.lock().await;
        let State {
            transport,
            read_buf,
            ..
        } = &mut *state;

        let line = fill_line(transport, read_buf, self.max_buf_size).await?;
        let rl = parse::parse_request_line(&line).map_err(|e| {
            debug!("request-line parse failed: {}", e);
            e
        })?;
        trace!("parsed request-line: {} {} {}", rl.method, rl.uri, rl.version);
        let headers = read_headers(transport, read_buf, self.max_buf_size).await?;
        let body_len = parse::body_length(&rl.version, &headers)?;
        let body = if body_len > 0 {
            Some(read_body(transport, read_buf, body_len).await?)
        } else {
            None
        };

        let mut req = Request::new();
        req.set_method(rl.method)?;
        req.set_uri(rl.uri)?;
        req.set_version(rl.version)?;
        *req.headers_mut() = headers;
        if let Some(body) = body {
            req.set_body(body, true);
        }
        Ok(req)
    }

    async fn do_read_response(&self) -> Result<Response> {
        let mut state = self.state.lock().await;
        let State {
            transport,
            read_buf,
            ..
        } = &mut *state;

        let line = fill_line(transport, read_buf, self.max_buf_size).await?;
        let sl = parse::parse_status_line(&line).map_err(|e| {
            debug!("status-line parse failed: {}", e);
            e
        })?;
        trace!("parsed status-line: {} {}", sl.version, sl.status);
        let headers = read_headers(transport, read_buf, self.max_buf_size).await?;
        let body_len = parse::body_length(&sl.version, &headers)?;
        let body = if body_len > 0 {
            Some(read_body(transport, read_buf, body_len).await?)
        } else {
            None
        };

        let mut res = Response::new();
        res.set_version(sl.version)?;
        res.set_status(sl.status, sl.reason)
            .map_err(|_| Error::new_status_code())?;
        *res.headers_mut() = headers;
        if let Some(body) = body {
            res.set_body(body, true);
        }
        Ok(res)
    }

    async fn do_write_request(&self, req: &Request) -> Result<()> {
        let mut state = self.state.lock().await;
        state.write_scratch.clear();
        encode::write_request_head(req, &mut state.write_scratch);
        let body = req.body().map(|b| b.as_ref());
        write_all(&mut state.transport, &state.write_scratch, body).await
    }

    async fn do_write_response(&self, res: &Response) -> Result<()> {
        let mut state = self.state.lock().await;
        state.write_scratch.clear();
        encode::write_response_head(res, &mut state.write_scratch);
        let body = res.body().map(|b| b.as_ref());
        write_all(&mut state.transport, &state.write_scratch, body).await
    }
}

/// Resolves once `flag` has been set by a `cancel_read`/`cancel_write` call,
/// whether that call happened before this future was ever polled or while it
/// was already suspended waiting on `notify`.
///
/// `Notify::notify_waiters` only wakes tasks that were already registered as
/// listeners at the moment it's called — a bare `notify.notified().await`
/// would miss a cancellation that arrives before the read/write it's racing
/// against has started awaiting anything. Calling `enable()` on the
/// `Notified` future registers it as a listener immediately, before the
/// flag is checked, closing that window: a `cancel_*` call is visible either
/// through the flag (checked right after registering) or through the
/// wakeup it triggers (since registration already happened).
async fn wait_canceled(flag: &AtomicBool, notify: &Notify) {
    loop {
        let notified = notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if flag.swap(false, Ordering::SeqCst) {
            return;
        }
        notified.await;
    }
}

/// Reads one CRLF-terminated line, compacting or growing the Read Buffer
/// and pulling more bytes from the transport as needed.
async fn fill_line<T: Transport>(
    transport: &mut T,
    buf: &mut ReadBuffer,
    max_buf_size: usize,
) -> Result<Vec<u8>> {
    loop {
        match tokenizer::scan_line(buf.unread(), max_buf_size)? {
            Outcome::Line { content, consumed } => {
                let line = content.to_vec();
                buf.consume(consumed);
                return Ok(line);
            }
            Outcome::NeedMore => {
                // Compact unconditionally first: `get` bytes already
                // consumed (prior header lines) may be reclaimable headroom
                // even though the raw `put` cursor sits at capacity. Only
                // the post-compaction unread length (`buf.len()`) is the
                // real too-large oracle; a bare `put == capacity` check
                // would spuriously fail a message whose head merely spans
                // more than one physical buffer-fill.
                buf.compact();
                if buf.len() == buf.capacity() {
                    if buf.capacity() >= max_buf_size {
                        debug!("message head exceeded max_buf_size of {}", max_buf_size);
                        return Err(Error::new_too_large());
                    }
                    let new_cap = (buf.capacity() * 2).min(max_buf_size);
                    trace!("growing read buffer {} -> {}", buf.capacity(), new_cap);
                    buf.grow_to(new_cap);
                }
                if read_into(transport, buf).await? == 0 {
                    return Err(Error::new_io(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "transport closed while reading a message head",
                    )));
                }
            }
        }
    }
}

async fn read_headers<T: Transport>(
    transport: &mut T,
    buf: &mut ReadBuffer,
    max_buf_size: usize,
) -> Result<HeaderTable> {
    let mut headers = HeaderTable::new();
    loop {
        let line = fill_line(transport, buf, max_buf_size).await?;
        match parse::parse_header_line(&line)? {
            HeaderLine::End => return Ok(headers),
            HeaderLine::Header { name, value } => headers.append(name, value),
        }
    }
}

async fn read_into<T: Transport>(transport: &mut T, buf: &mut ReadBuffer) -> Result<usize> {
    let spare = buf.spare_capacity();
    if spare.is_empty() {
        return Ok(0);
    }
    let n = {
        let mut slices = [IoSliceMut::new(spare)];
        transport
            .read_vectored(&mut slices)
            .await
            .map_err(Error::new_io)?
    };
    buf.fill(n);
    Ok(n)
}

/// Reads exactly `len` body bytes, draining whatever is already buffered
/// before issuing further transport reads.
async fn read_body<T: Transport>(transport: &mut T, buf: &mut ReadBuffer, len: usize) -> Result<Bytes> {
    let mut out = Vec::with_capacity(len);
    let take = len.min(buf.len());
    out.extend_from_slice(&buf.unread()[..take]);
    buf.consume(take);

    while out.len() < len {
        let want = (len - out.len()).min(64 * 1024);
        let mut chunk = vec![0u8; want];
        let n = {
            let mut slices = [IoSliceMut::new(&mut chunk)];
            transport
                .read_vectored(&mut slices)
                .await
                .map_err(Error::new_io)?
        };
        if n == 0 {
            return Err(Error::new_io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "transport closed while reading a message body",
            )));
        }
        out.extend_from_slice(&chunk[..n]);
    }
    Ok(Bytes::from(out))
}

/// Writes `head` followed by `body` (if any), looping on short writes the
/// way the original prototype's write callback advances its iov cursor
/// across a head-then-body pair after a partial write.
async fn write_all<T: Transport>(transport: &mut T, head: &[u8], body: Option<&[u8]>) -> Result<()> {
    let body = body.unwrap_or(&[]);
    let mut head_off = 0usize;
    let mut body_off = 0usize;

    while head_off < head.len() || body_off < body.len() {
        let mut slices: Vec<IoSlice<'_>> = Vec::with_capacity(2);
        if head_off < head.len() {
            slices.push(IoSlice::new(&head[head_off..]));
        }
        if body_off < body.len() {
            slices.push(IoSlice::new(&body[body_off..]));
        }

        let n = transport
            .write_vectored(&slices)
            .await
            .map_err(Error::new_io)?;
        if n == 0 {
            return Err(Error::new_io(io::Error::new(
                io::ErrorKind::WriteZero,
                "transport accepted zero bytes",
            )));
        }

        let mut remaining = n;
        if head_off < head.len() {
            let take = remaining.min(head.len() - head_off);
            head_off += take;
            remaining -= take;
        }
        if remaining > 0 {
            body_off += remaining;
        }
    }
    Ok(())
}
