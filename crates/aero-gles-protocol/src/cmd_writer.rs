//! Packet builder for the guest-to-host GLES command stream.
//!
//! Every packet is `opcode: u32`, `size_bytes: u32` followed by little-endian arguments. The
//! packet size always includes the header and is padded to 4 bytes. Variable-length payloads
//! (`blob`) are written as a `u32` byte length followed by the bytes and zero padding.

use crate::cmd_stream::GlesPacketHdr;
use crate::opcode::GlesOpcode;

fn align_up(v: usize, a: usize) -> usize {
    debug_assert!(a.is_power_of_two());
    (v + (a - 1)) & !(a - 1)
}

/// Accumulates encoded packets until they are handed to a transport.
#[derive(Debug, Default, Clone)]
pub struct GlesCmdWriter {
    buf: Vec<u8>,
    packets: usize,
}

impl GlesCmdWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Number of packets written since the last [`GlesCmdWriter::take`].
    pub fn packet_count(&self) -> usize {
        self.packets
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Drains the encoded bytes, leaving the writer empty.
    pub fn take(&mut self) -> Vec<u8> {
        self.packets = 0;
        std::mem::take(&mut self.buf)
    }

    /// Starts a packet. The packet's `size_bytes` is patched when the returned builder drops.
    pub fn begin(&mut self, opcode: GlesOpcode) -> PacketBuilder<'_> {
        let start = self.buf.len();
        debug_assert_eq!(start % 4, 0);
        self.buf.extend_from_slice(&(opcode as u32).to_le_bytes());
        self.buf.extend_from_slice(&0u32.to_le_bytes());
        self.packets += 1;
        PacketBuilder {
            buf: &mut self.buf,
            start,
        }
    }
}

/// Argument sink for one packet.
pub struct PacketBuilder<'a> {
    buf: &'a mut Vec<u8>,
    start: usize,
}

impl PacketBuilder<'_> {
    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.u32(v as u32)
    }

    pub fn f32(&mut self, v: f32) -> &mut Self {
        self.u32(v.to_bits())
    }

    pub fn u64(&mut self, v: u64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i64(&mut self, v: i64) -> &mut Self {
        self.u64(v as u64)
    }

    /// `GLintptr`/`GLsizeiptr` travel as 64-bit values regardless of guest pointer width.
    pub fn isize(&mut self, v: isize) -> &mut Self {
        self.i64(v as i64)
    }

    pub fn bool(&mut self, v: bool) -> &mut Self {
        self.u32(u32::from(v))
    }

    pub fn blob(&mut self, bytes: &[u8]) -> &mut Self {
        self.blob_with(bytes.len(), |dst| dst.copy_from_slice(bytes))
    }

    /// Reserves a `len`-byte blob and lets `fill` write it in place.
    pub fn blob_with(&mut self, len: usize, fill: impl FnOnce(&mut [u8])) -> &mut Self {
        self.u32(len as u32);
        let at = self.buf.len();
        self.buf.resize(align_up(at + len, 4), 0);
        fill(&mut self.buf[at..at + len]);
        self
    }

    pub fn str(&mut self, s: &str) -> &mut Self {
        self.blob(s.as_bytes())
    }

    pub fn u32s(&mut self, values: &[u32]) -> &mut Self {
        self.u32(values.len() as u32);
        for &v in values {
            self.u32(v);
        }
        self
    }

    pub fn i32s(&mut self, values: &[i32]) -> &mut Self {
        self.u32(values.len() as u32);
        for &v in values {
            self.i32(v);
        }
        self
    }

    pub fn f32s(&mut self, values: &[f32]) -> &mut Self {
        self.u32(values.len() as u32);
        for &v in values {
            self.f32(v);
        }
        self
    }
}

impl Drop for PacketBuilder<'_> {
    fn drop(&mut self) {
        let size = (self.buf.len() - self.start) as u32;
        debug_assert!(size as usize >= GlesPacketHdr::SIZE_BYTES);
        self.buf[self.start + 4..self.start + 8].copy_from_slice(&size.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn blob_is_length_prefixed_and_padded() {
        let mut w = GlesCmdWriter::new();
        w.begin(GlesOpcode::ShaderString).u32(7).blob(b"abcde");
        let bytes = w.take();

        // header(8) + shader(4) + len(4) + 5 bytes padded to 8
        assert_eq!(bytes.len(), 24);
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 24);
        assert_eq!(u32::from_le_bytes(bytes[12..16].try_into().unwrap()), 5);
        assert_eq!(&bytes[16..21], b"abcde");
        assert_eq!(&bytes[21..24], &[0, 0, 0]);
    }

    #[test]
    fn take_resets_packet_count() {
        let mut w = GlesCmdWriter::new();
        w.begin(GlesOpcode::Flush);
        w.begin(GlesOpcode::Finish);
        assert_eq!(w.packet_count(), 2);
        let _ = w.take();
        assert_eq!(w.packet_count(), 0);
        assert!(w.is_empty());
    }
}
