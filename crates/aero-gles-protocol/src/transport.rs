//! The ordered byte channel between the guest encoder and the host.
//!
//! The encoder needs exactly three operations: append bytes, flush, and block for a reply of a
//! known size. Framing below that (pipes, sockets, shared memory rings) belongs to the
//! implementor.

use std::collections::VecDeque;
use std::io;

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport closed")]
    Closed,
    #[error("transport I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub trait Transport: Send {
    /// Appends `bytes` to the outgoing stream. May buffer.
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Pushes buffered bytes to the host.
    fn flush(&mut self) -> Result<(), TransportError>;

    /// Blocks until `out.len()` reply bytes are available and copies them into `out`.
    fn read_reply(&mut self, out: &mut [u8]) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).write(bytes)
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        (**self).flush()
    }

    fn read_reply(&mut self, out: &mut [u8]) -> Result<(), TransportError> {
        (**self).read_reply(out)
    }
}

/// In-process transport that records everything written and serves scripted replies.
///
/// Replies are consumed in FIFO order. A read that outruns the scripted bytes is zero-filled,
/// which is what a host that knows nothing about the object would answer for most queries.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    pending: Vec<u8>,
    flushed: Vec<u8>,
    replies: VecDeque<u8>,
    flushes: usize,
    reply_reads: usize,
    closed: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply_bytes(&mut self, bytes: &[u8]) {
        self.replies.extend(bytes.iter().copied());
    }

    pub fn push_reply_u32(&mut self, v: u32) {
        self.push_reply_bytes(&v.to_le_bytes());
    }

    pub fn push_reply_i32(&mut self, v: i32) {
        self.push_reply_bytes(&v.to_le_bytes());
    }

    pub fn push_reply_u32s(&mut self, values: &[u32]) {
        for &v in values {
            self.push_reply_u32(v);
        }
    }

    /// Every byte written so far, flushed or not.
    pub fn written(&self) -> Vec<u8> {
        let mut out = self.flushed.clone();
        out.extend_from_slice(&self.pending);
        out
    }

    /// Bytes that have been flushed to the "host".
    pub fn flushed(&self) -> &[u8] {
        &self.flushed
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Number of synchronous reply reads, i.e. host round trips.
    pub fn round_trips(&self) -> usize {
        self.reply_reads
    }

    pub fn unread_reply_bytes(&self) -> usize {
        self.replies.len()
    }

    /// Forgets everything recorded so far; scripted replies are kept.
    pub fn clear_recorded(&mut self) {
        self.pending.clear();
        self.flushed.clear();
        self.flushes = 0;
        self.reply_reads = 0;
    }

    /// Makes every subsequent operation fail with [`TransportError::Closed`].
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl Transport for MemoryTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.pending.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.flushed.append(&mut self.pending);
        self.flushes += 1;
        Ok(())
    }

    fn read_reply(&mut self, out: &mut [u8]) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.reply_reads += 1;
        let available = self.replies.len().min(out.len());
        for (dst, src) in out.iter_mut().zip(self.replies.drain(..available)) {
            *dst = src;
        }
        if available < out.len() {
            warn!(
                wanted = out.len(),
                available, "scripted reply exhausted, zero-filling"
            );
            out[available..].fill(0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn replies_are_fifo_and_zero_filled() {
        let mut t = MemoryTransport::new();
        t.push_reply_u32(7);
        let mut out = [0xAAu8; 8];
        t.read_reply(&mut out).unwrap();
        assert_eq!(out, [7, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(t.round_trips(), 1);
    }

    #[test]
    fn flush_moves_pending_bytes() {
        let mut t = MemoryTransport::new();
        t.write(&[1, 2, 3, 4]).unwrap();
        assert!(t.flushed().is_empty());
        t.flush().unwrap();
        assert_eq!(t.flushed(), &[1, 2, 3, 4]);
        assert_eq!(t.flush_count(), 1);
    }

    #[test]
    fn closed_transport_fails() {
        let mut t = MemoryTransport::new();
        t.close();
        assert!(matches!(t.write(&[0]), Err(TransportError::Closed)));
    }
}
