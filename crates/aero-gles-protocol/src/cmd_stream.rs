//! Decoder for streams produced by [`crate::GlesCmdWriter`].

use thiserror::Error;

use crate::opcode::GlesOpcode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlesPacketHdr {
    pub opcode: u32,
    pub size_bytes: u32,
}

impl GlesPacketHdr {
    pub const SIZE_BYTES: usize = 8;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GlesCmdDecodeError {
    #[error("buffer too small for a packet header")]
    BufferTooSmall,
    #[error("packet size_bytes {found} is smaller than the header")]
    BadSizeBytes { found: u32 },
    #[error("packet size_bytes {found} is not 4-byte aligned")]
    SizeNotAligned { found: u32 },
    #[error("packet at offset {offset} with size {packet_size_bytes} overruns a {stream_size_bytes}-byte stream")]
    PacketOverrunsStream {
        offset: usize,
        packet_size_bytes: u32,
        stream_size_bytes: usize,
    },
    #[error("packet payload ended early: wanted {wanted} bytes at {at}, payload is {len}")]
    PayloadTooSmall { at: usize, wanted: usize, len: usize },
}

pub fn decode_packet_hdr_le(buf: &[u8]) -> Result<GlesPacketHdr, GlesCmdDecodeError> {
    if buf.len() < GlesPacketHdr::SIZE_BYTES {
        return Err(GlesCmdDecodeError::BufferTooSmall);
    }

    let opcode = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let size_bytes = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);

    if size_bytes < GlesPacketHdr::SIZE_BYTES as u32 {
        return Err(GlesCmdDecodeError::BadSizeBytes { found: size_bytes });
    }
    if size_bytes % 4 != 0 {
        return Err(GlesCmdDecodeError::SizeNotAligned { found: size_bytes });
    }

    Ok(GlesPacketHdr { opcode, size_bytes })
}

/// One decoded packet borrowing its payload from the stream.
#[derive(Clone, Copy, Debug)]
pub struct GlesPacket<'a> {
    pub hdr: GlesPacketHdr,
    pub payload: &'a [u8],
}

impl<'a> GlesPacket<'a> {
    pub fn opcode(&self) -> Option<GlesOpcode> {
        GlesOpcode::from_u32(self.hdr.opcode)
    }

    pub fn args(&self) -> ArgReader<'a> {
        ArgReader {
            payload: self.payload,
            pos: 0,
        }
    }
}

/// Iterates packets in a byte stream; stops after the first decode error.
pub struct GlesPacketIter<'a> {
    stream: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> GlesPacketIter<'a> {
    pub fn new(stream: &'a [u8]) -> Self {
        Self {
            stream,
            offset: 0,
            failed: false,
        }
    }
}

impl<'a> Iterator for GlesPacketIter<'a> {
    type Item = Result<GlesPacket<'a>, GlesCmdDecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.stream.len() {
            return None;
        }
        let rest = &self.stream[self.offset..];
        let hdr = match decode_packet_hdr_le(rest) {
            Ok(hdr) => hdr,
            Err(err) => {
                self.failed = true;
                return Some(Err(err));
            }
        };
        let size = hdr.size_bytes as usize;
        if size > rest.len() {
            self.failed = true;
            return Some(Err(GlesCmdDecodeError::PacketOverrunsStream {
                offset: self.offset,
                packet_size_bytes: hdr.size_bytes,
                stream_size_bytes: self.stream.len(),
            }));
        }
        self.offset += size;
        Some(Ok(GlesPacket {
            hdr,
            payload: &rest[GlesPacketHdr::SIZE_BYTES..size],
        }))
    }
}

/// Sequential reader over a packet payload, mirroring [`crate::cmd_writer::PacketBuilder`].
#[derive(Clone, Debug)]
pub struct ArgReader<'a> {
    payload: &'a [u8],
    pos: usize,
}

impl<'a> ArgReader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], GlesCmdDecodeError> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.payload.len());
        let Some(end) = end else {
            return Err(GlesCmdDecodeError::PayloadTooSmall {
                at: self.pos,
                wanted: n,
                len: self.payload.len(),
            });
        };
        let out = &self.payload[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    pub fn u32(&mut self) -> Result<u32, GlesCmdDecodeError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn i32(&mut self) -> Result<i32, GlesCmdDecodeError> {
        Ok(self.u32()? as i32)
    }

    pub fn f32(&mut self) -> Result<f32, GlesCmdDecodeError> {
        Ok(f32::from_bits(self.u32()?))
    }

    pub fn u64(&mut self) -> Result<u64, GlesCmdDecodeError> {
        let lo = self.u32()? as u64;
        let hi = self.u32()? as u64;
        Ok(lo | (hi << 32))
    }

    pub fn i64(&mut self) -> Result<i64, GlesCmdDecodeError> {
        Ok(self.u64()? as i64)
    }

    pub fn blob(&mut self) -> Result<&'a [u8], GlesCmdDecodeError> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        let pad = (4 - len % 4) % 4;
        self.take(pad)?;
        Ok(bytes)
    }

    pub fn u32s(&mut self) -> Result<Vec<u32>, GlesCmdDecodeError> {
        let n = self.u32()? as usize;
        (0..n).map(|_| self.u32()).collect()
    }

    pub fn i32s(&mut self) -> Result<Vec<i32>, GlesCmdDecodeError> {
        let n = self.u32()? as usize;
        (0..n).map(|_| self.i32()).collect()
    }

    pub fn f32s(&mut self) -> Result<Vec<f32>, GlesCmdDecodeError> {
        let n = self.u32()? as usize;
        (0..n).map(|_| self.f32()).collect()
    }

    pub fn remaining(&self) -> usize {
        self.payload.len() - self.pos
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rejects_unaligned_packet_size() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(GlesOpcode::Flush as u32).to_le_bytes());
        buf.extend_from_slice(&10u32.to_le_bytes());
        assert_eq!(
            decode_packet_hdr_le(&buf),
            Err(GlesCmdDecodeError::SizeNotAligned { found: 10 })
        );
    }

    #[test]
    fn iterator_reports_overrun_once() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(GlesOpcode::Flush as u32).to_le_bytes());
        buf.extend_from_slice(&16u32.to_le_bytes());
        let items: Vec<_> = GlesPacketIter::new(&buf).collect();
        assert_eq!(items.len(), 1);
        assert!(matches!(
            items[0],
            Err(GlesCmdDecodeError::PacketOverrunsStream { packet_size_bytes: 16, .. })
        ));
    }
}
