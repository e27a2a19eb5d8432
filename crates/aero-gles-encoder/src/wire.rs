//! Packet encoding on top of a [`Transport`].
//!
//! [`GlesWire`] owns the transport and the pending packet buffer. Commands are appended to the
//! buffer and pushed to the transport once it grows past the flush threshold; every call that
//! needs a reply flushes first and then blocks in [`Transport::read_reply`].
//!
//! A transport failure is not recoverable. The first one is logged, the wire is latched into the
//! lost state, and from then on commands are dropped and every reply reads as zeros.

use std::io;

use aero_gles_protocol::cmd_writer::PacketBuilder;
use aero_gles_protocol::gl::GLuint;
use aero_gles_protocol::{GlesCmdWriter, GlesOpcode, Transport, TransportError};
use tracing::{debug, error};

/// Pending bytes that trigger a push to the transport.
pub const DEFAULT_FLUSH_THRESHOLD: usize = 64 * 1024;

/// Upper bound for a string reply (info logs, shader sources).
pub const MAX_REPLY_STRING_BYTES: u32 = 1 << 24;

/// A value that can be read back from a host reply.
pub trait WireScalar: Copy + Default {
    const SIZE: usize;

    fn from_le(bytes: &[u8]) -> Self;
}

macro_rules! wire_scalar {
    ($($ty:ty),*) => {
        $(
            impl WireScalar for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn from_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

wire_scalar!(u32, i32, f32, u64, i64);

/// `GLboolean` replies occupy a full 32-bit slot.
impl WireScalar for u8 {
    const SIZE: usize = 4;

    fn from_le(bytes: &[u8]) -> Self {
        u8::from(<u32 as WireScalar>::from_le(bytes) != 0)
    }
}

impl WireScalar for bool {
    const SIZE: usize = 4;

    fn from_le(bytes: &[u8]) -> Self {
        <u32 as WireScalar>::from_le(bytes) != 0
    }
}

/// A value that can be appended to a packet.
pub trait WireArg {
    fn put(&self, p: &mut PacketBuilder<'_>);
}

impl WireArg for u32 {
    fn put(&self, p: &mut PacketBuilder<'_>) {
        p.u32(*self);
    }
}

impl WireArg for i32 {
    fn put(&self, p: &mut PacketBuilder<'_>) {
        p.i32(*self);
    }
}

impl WireArg for f32 {
    fn put(&self, p: &mut PacketBuilder<'_>) {
        p.f32(*self);
    }
}

impl WireArg for u8 {
    fn put(&self, p: &mut PacketBuilder<'_>) {
        p.u32(u32::from(*self));
    }
}

impl WireArg for bool {
    fn put(&self, p: &mut PacketBuilder<'_>) {
        p.bool(*self);
    }
}

impl WireArg for u64 {
    fn put(&self, p: &mut PacketBuilder<'_>) {
        p.u64(*self);
    }
}

impl WireArg for i64 {
    fn put(&self, p: &mut PacketBuilder<'_>) {
        p.i64(*self);
    }
}

impl WireArg for isize {
    fn put(&self, p: &mut PacketBuilder<'_>) {
        p.isize(*self);
    }
}

impl WireArg for &[u8] {
    fn put(&self, p: &mut PacketBuilder<'_>) {
        p.blob(self);
    }
}

/// `None` travels as an empty blob.
impl WireArg for Option<&[u8]> {
    fn put(&self, p: &mut PacketBuilder<'_>) {
        p.blob(self.unwrap_or_default());
    }
}

impl WireArg for &[u32] {
    fn put(&self, p: &mut PacketBuilder<'_>) {
        p.u32s(self);
    }
}

impl WireArg for &[i32] {
    fn put(&self, p: &mut PacketBuilder<'_>) {
        p.i32s(self);
    }
}

impl WireArg for &[f32] {
    fn put(&self, p: &mut PacketBuilder<'_>) {
        p.f32s(self);
    }
}

impl WireArg for &str {
    fn put(&self, p: &mut PacketBuilder<'_>) {
        p.str(self);
    }
}

/// A string list: count, then one length-prefixed blob per string.
impl WireArg for &[&str] {
    fn put(&self, p: &mut PacketBuilder<'_>) {
        p.u32(self.len() as u32);
        for s in self.iter() {
            p.str(s);
        }
    }
}

fn put_all(p: &mut PacketBuilder<'_>, args: &[&dyn WireArg]) {
    for arg in args {
        arg.put(p);
    }
}

/// Packet buffer plus transport, with the lost-transport latch.
#[derive(Debug)]
pub struct GlesWire<T> {
    transport: T,
    writer: GlesCmdWriter,
    flush_threshold: usize,
    lost: bool,
}

impl<T: Transport> GlesWire<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            writer: GlesCmdWriter::new(),
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
            lost: false,
        }
    }

    pub fn with_flush_threshold(mut self, bytes: usize) -> Self {
        self.flush_threshold = bytes.max(1);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Bytes encoded but not yet handed to the transport.
    pub fn pending_bytes(&self) -> usize {
        self.writer.len()
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    /// Appends one packet; `build` writes its arguments.
    pub fn encode(&mut self, op: GlesOpcode, build: impl FnOnce(&mut PacketBuilder<'_>)) {
        if self.lost {
            debug!(op = op.name(), "transport lost, dropping command");
            return;
        }
        {
            let mut p = self.writer.begin(op);
            build(&mut p);
        }
        if self.writer.len() >= self.flush_threshold {
            self.push_pending();
        }
    }

    pub fn command(&mut self, op: GlesOpcode, args: &[&dyn WireArg]) {
        self.encode(op, |p| put_all(p, args));
    }

    /// Encodes `op` and blocks for a single scalar reply.
    pub fn call<R: WireScalar>(&mut self, op: GlesOpcode, args: &[&dyn WireArg]) -> R {
        self.command(op, args);
        self.read_scalar()
    }

    /// Encodes `op` with the number of expected values appended, then fills `out`.
    pub fn call_into<R: WireScalar>(
        &mut self,
        op: GlesOpcode,
        args: &[&dyn WireArg],
        out: &mut [R],
    ) {
        self.encode(op, |p| {
            put_all(p, args);
            p.u32(out.len() as u32);
        });
        self.read_scalars(out);
    }

    /// Like [`GlesWire::call_into`] for raw byte replies (pixels, mapped ranges).
    pub fn call_bytes(&mut self, op: GlesOpcode, args: &[&dyn WireArg], out: &mut [u8]) {
        self.encode(op, |p| {
            put_all(p, args);
            p.u32(out.len() as u32);
        });
        self.read_reply(out);
    }

    /// Encodes `op` and reads a length-prefixed string reply.
    pub fn call_string(&mut self, op: GlesOpcode, args: &[&dyn WireArg]) -> String {
        self.command(op, args);
        self.read_string()
    }

    /// `glGen*`: the host picks the names.
    pub fn gen_names(&mut self, op: GlesOpcode, n: usize) -> Vec<GLuint> {
        self.encode(op, |p| {
            p.u32(n as u32);
        });
        let mut names = vec![0; n];
        self.read_scalars(&mut names);
        names
    }

    fn push_pending(&mut self) {
        if self.lost || self.writer.is_empty() {
            return;
        }
        let bytes = self.writer.take();
        if let Err(err) = self.transport.write(&bytes) {
            self.fail(err);
        }
    }

    /// Hands pending packets to the transport and flushes it.
    pub fn flush(&mut self) {
        self.push_pending();
        if self.lost {
            return;
        }
        if let Err(err) = self.transport.flush() {
            self.fail(err);
        }
    }

    /// Flushes, then blocks until `out` is filled from the reply stream.
    pub fn read_reply(&mut self, out: &mut [u8]) {
        self.flush();
        if self.lost {
            out.fill(0);
            return;
        }
        if out.is_empty() {
            return;
        }
        if let Err(err) = self.transport.read_reply(out) {
            self.fail(err);
            out.fill(0);
        }
    }

    pub fn read_scalar<R: WireScalar>(&mut self) -> R {
        let mut raw = [0u8; 8];
        let raw = &mut raw[..R::SIZE];
        self.read_reply(raw);
        R::from_le(raw)
    }

    pub fn read_scalars<R: WireScalar>(&mut self, out: &mut [R]) {
        if out.is_empty() {
            return;
        }
        let mut raw = vec![0u8; out.len() * R::SIZE];
        self.read_reply(&mut raw);
        for (dst, chunk) in out.iter_mut().zip(raw.chunks_exact(R::SIZE)) {
            *dst = R::from_le(chunk);
        }
    }

    /// `u32` byte length followed by that many bytes; invalid UTF-8 is replaced.
    pub fn read_string(&mut self) -> String {
        let len: u32 = self.read_scalar();
        if len > MAX_REPLY_STRING_BYTES {
            self.fail(TransportError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("string reply of {len} bytes"),
            )));
            return String::new();
        }
        let mut raw = vec![0u8; len as usize];
        self.read_reply(&mut raw);
        String::from_utf8_lossy(&raw).into_owned()
    }

    fn fail(&mut self, err: TransportError) {
        if !self.lost {
            error!(%err, "GLES transport lost; further commands are dropped");
        }
        self.lost = true;
        let _ = self.writer.take();
    }
}
