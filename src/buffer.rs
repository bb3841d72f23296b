//! The Read Buffer: a fixed-capacity byte buffer with a `get` cursor (start
//! of unconsumed data) and a `put` cursor (end of valid data), compacted back
//! to `get == 0` whenever the tokenizer needs more room at the tail.

use log::trace;

/// A fixed-capacity buffer accumulating bytes read from the transport ahead
/// of the Line Tokenizer and Message Parser.
///
/// Bytes in `[0, get)` have already been consumed. Bytes in `[get, put)` are
/// unread. Bytes in `[put, capacity)` are free space available for the next
/// transport read. [`ReadBuffer::compact`] restores `get == 0`, sliding the
/// unread region to the front so the free region is contiguous again.
#[derive(Debug)]
pub struct ReadBuffer {
    buf: Vec<u8>,
    get: usize,
    put: usize,
}

impl ReadBuffer {
    /// Creates a buffer with the given fixed capacity.
    pub fn with_capacity(capacity: usize) -> ReadBuffer {
        ReadBuffer {
            buf: vec![0u8; capacity],
            get: 0,
            put: 0,
        }
    }

    /// The buffer's fixed capacity.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The unread region, `[get, put)`.
    pub fn unread(&self) -> &[u8] {
        &self.buf[self.get..self.put]
    }

    /// Number of unread bytes.
    pub fn len(&self) -> usize {
        self.put - self.get
    }

    /// True if there are no unread bytes.
    pub fn is_empty(&self) -> bool {
        self.get == self.put
    }

    /// True if the free region `[put, capacity)` is empty.
    pub fn is_full(&self) -> bool {
        self.put == self.buf.len()
    }

    /// Marks `n` bytes at the front of the unread region as consumed.
    ///
    /// Panics if `n` exceeds the unread length.
    pub fn consume(&mut self, n: usize) {
        assert!(n <= self.len(), "consume past put cursor");
        self.get += n;
        if self.get == self.put {
            self.get = 0;
            self.put = 0;
        }
    }

    /// The free region available for a transport read, `[put, capacity)`.
    pub fn spare_capacity(&mut self) -> &mut [u8] {
        &mut self.buf[self.put..]
    }

    /// Records that `n` bytes were written into the slice returned by
    /// [`Self::spare_capacity`], advancing the put cursor.
    ///
    /// Panics if `n` would advance `put` past `capacity`.
    pub fn fill(&mut self, n: usize) {
        assert!(self.put + n <= self.buf.len(), "fill past capacity");
        self.put += n;
    }

    /// Slides the unread region to the front of the buffer so that `get ==
    /// 0` and free space is contiguous at the tail again.
    ///
    /// A no-op if `get` is already `0`.
    pub fn compact(&mut self) {
        if self.get == 0 {
            return;
        }
        trace!(
            "compact: sliding {} unread bytes from {} to 0",
            self.put - self.get,
            self.get
        );
        self.buf.copy_within(self.get..self.put, 0);
        self.put -= self.get;
        self.get = 0;
    }

    /// Discards all unread bytes, resetting both cursors to `0`.
    pub fn clear(&mut self) {
        self.get = 0;
        self.put = 0;
    }

    /// Grows the buffer's capacity to `new_capacity`, preserving the unread
    /// region at the front (as if `compact` had just run).
    ///
    /// Panics if `new_capacity` is smaller than the current unread length.
    pub fn grow_to(&mut self, new_capacity: usize) {
        self.compact();
        assert!(
            new_capacity >= self.put,
            "cannot shrink below the unread region"
        );
        self.buf.resize(new_capacity, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_buffer_is_empty() {
        let buf = ReadBuffer::with_capacity(16);
        assert!(buf.is_empty());
        assert_eq!(buf.unread(), b"");
        assert_eq!(buf.capacity(), 16);
    }

    #[test]
    fn fill_then_consume() {
        let mut buf = ReadBuffer::with_capacity(16);
        buf.spare_capacity()[..5].copy_from_slice(b"hello");
        buf.fill(5);
        assert_eq!(buf.unread(), b"hello");
        buf.consume(2);
        assert_eq!(buf.unread(), b"llo");
        buf.consume(3);
        assert!(buf.is_empty());
        // full consume resets cursors to 0, not left dangling mid-buffer
        assert_eq!(buf.spare_capacity().len(), 16);
    }

    #[test]
    fn compact_slides_unread_region_to_front() {
        let mut buf = ReadBuffer::with_capacity(16);
        buf.spare_capacity()[..10].copy_from_slice(b"0123456789");
        buf.fill(10);
        buf.consume(7);
        assert_eq!(buf.unread(), b"789");
        buf.compact();
        assert_eq!(buf.unread(), b"789");
        assert_eq!(buf.spare_capacity().len(), 13);
    }

    #[test]
    fn compact_is_noop_when_get_already_zero() {
        let mut buf = ReadBuffer::with_capacity(8);
        buf.spare_capacity()[..4].copy_from_slice(b"abcd");
        buf.fill(4);
        buf.compact();
        assert_eq!(buf.unread(), b"abcd");
    }

    #[test]
    fn is_full_when_put_reaches_capacity() {
        let mut buf = ReadBuffer::with_capacity(4);
        buf.fill(4);
        assert!(buf.is_full());
    }

    #[test]
    #[should_panic(expected = "fill past capacity")]
    fn fill_past_capacity_panics() {
        let mut buf = ReadBuffer::with_capacity(4);
        buf.fill(5);
    }

    #[test]
    fn grow_to_preserves_unread_bytes() {
        let mut buf = ReadBuffer::with_capacity(4);
        buf.fill(4);
        buf.consume(2);
        buf.grow_to(8);
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn clear_resets_cursors() {
        let mut buf = ReadBuffer::with_capacity(8);
        buf.fill(4);
        buf.consume(1);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.spare_capacity().len(), 8);
    }
}
