//! An encoder that validates nothing and forwards every call.
//!
//! Host replay tooling and conformance baselines use it to see what the host does with a call
//! the validating encoder would have rejected. The only local bookkeeping is what the wire
//! protocol cannot do without: mapped ranges and guest-allocated sync handles.

use std::sync::Arc;

use aero_gles_protocol::gl::*;
use aero_gles_protocol::Transport;
use aero_gles_state::{BufferData, BufferRef, FenceRegistry, MapAccess};
use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::api::{
    BufferApi, BufferMapping, DrawApi, EncoderBase, FramebufferApi, ObjectApi, ProgramApi,
    StateApi, TextureApi, VertexApi,
};
use crate::wire::GlesWire;

/// One live mapping: a scratch mirror of exactly the mapped range.
#[derive(Debug)]
struct ScratchMapping {
    data: BufferRef,
    offset: GLintptr,
    access: MapAccess,
}

pub struct PassthroughEncoder<T: Transport> {
    wire: GlesWire<T>,
    mappings: HashMap<GLenum, ScratchMapping>,
    fences: Arc<FenceRegistry>,
}

impl<T: Transport> PassthroughEncoder<T> {
    pub fn new(transport: T, fences: Arc<FenceRegistry>) -> Self {
        Self {
            wire: GlesWire::new(transport),
            mappings: HashMap::new(),
            fences,
        }
    }

    /// Flushes pending packets and hands back the transport.
    pub fn into_transport(mut self) -> T {
        self.wire.flush();
        self.wire.into_transport()
    }
}

impl<T: Transport> EncoderBase for PassthroughEncoder<T> {
    type Transport = T;

    fn wire(&mut self) -> &mut GlesWire<T> {
        &mut self.wire
    }
}

impl<T: Transport> BufferApi for PassthroughEncoder<T> {
    fn map_buffer_range(
        &mut self,
        target: GLenum,
        offset: GLintptr,
        length: GLsizeiptr,
        access: GLbitfield,
    ) -> Option<BufferMapping> {
        let len = usize::try_from(length).ok()?;
        let mut data = BufferData::new();
        data.respecify(len, None, 0);
        let bits = MapAccess::from_bits_truncate(access);
        if let Some(scratch) = data.range_mut(0, len) {
            self.wire.map_buffer_range_fetch(target, offset, access, scratch);
        }
        let data = Arc::new(RwLock::new(data));
        self.mappings.insert(
            target,
            ScratchMapping {
                data: Arc::clone(&data),
                offset,
                access: bits,
            },
        );
        Some(BufferMapping::new(data, 0, len))
    }

    fn unmap_buffer(&mut self, target: GLenum) -> bool {
        match self.mappings.remove(&target) {
            Some(m) if m.access.contains(MapAccess::WRITE) => {
                let data = m.data.read();
                self.wire.unmap_buffer_with(target, m.offset, data.bytes())
            }
            Some(m) => self.wire.unmap_buffer_with(target, m.offset, &[]),
            None => {
                debug!(target, "unmap without a local mapping");
                self.wire.unmap_buffer_with(target, 0, &[])
            }
        }
    }

    fn flush_mapped_buffer_range(&mut self, target: GLenum, offset: GLintptr, length: GLsizeiptr) {
        let Some(m) = self.mappings.get(&target) else {
            debug!(target, "flush without a local mapping");
            return;
        };
        let (Ok(start), Ok(len)) = (usize::try_from(offset), usize::try_from(length)) else {
            return;
        };
        let data = m.data.read();
        if let Some(bytes) = data.range(start, len) {
            self.wire
                .flush_mapped_buffer_range_with(target, m.offset + offset, bytes);
        }
    }
}

impl<T: Transport> TextureApi for PassthroughEncoder<T> {}
impl<T: Transport> FramebufferApi for PassthroughEncoder<T> {}
impl<T: Transport> VertexApi for PassthroughEncoder<T> {}
impl<T: Transport> DrawApi for PassthroughEncoder<T> {}
impl<T: Transport> ProgramApi for PassthroughEncoder<T> {}
impl<T: Transport> StateApi for PassthroughEncoder<T> {}

impl<T: Transport> ObjectApi for PassthroughEncoder<T> {
    fn fence_sync(&mut self, condition: GLenum, flags: GLbitfield) -> GLsync {
        let sync = self.fences.create();
        self.wire.fence_sync_with(condition, flags, sync);
        sync
    }

    fn delete_sync(&mut self, sync: GLsync) {
        self.fences.remove(sync);
        self.wire.delete_sync(sync);
    }
}

#[cfg(test)]
mod tests {
    use aero_gles_protocol::{GlesOpcode, GlesPacketIter, MemoryTransport};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::api::GlesApi;

    fn opcodes(transport: &MemoryTransport) -> Vec<GlesOpcode> {
        GlesPacketIter::new(&transport.written())
            .map(|p| p.unwrap().opcode().unwrap())
            .collect()
    }

    fn exercise(enc: &mut impl GlesApi) {
        enc.bind_buffer(0xDEAD, 1);
        enc.draw_arrays(GL_TRIANGLES, 0, -5);
        enc.flush();
    }

    #[test]
    fn invalid_calls_are_forwarded_verbatim() {
        let mut enc = PassthroughEncoder::new(MemoryTransport::new(), FenceRegistry::new());
        exercise(&mut enc);
        let t = enc.into_transport();
        assert_eq!(
            opcodes(&t),
            vec![GlesOpcode::BindBuffer, GlesOpcode::DrawArrays, GlesOpcode::Flush]
        );
    }

    #[test]
    fn write_mapping_sends_scratch_bytes_on_unmap() {
        let mut t = MemoryTransport::new();
        t.push_reply_bytes(&[0; 4]);
        t.push_reply_u32(1);
        let mut enc = PassthroughEncoder::new(t, FenceRegistry::new());

        let mapping = enc
            .map_buffer_range(GL_ARRAY_BUFFER, 8, 4, GL_MAP_WRITE_BIT)
            .unwrap();
        mapping.write().unwrap().copy_from_slice(&[1, 2, 3, 4]);
        assert!(enc.unmap_buffer(GL_ARRAY_BUFFER));

        let written = enc.into_transport().written();
        let packets: Vec<_> = GlesPacketIter::new(&written).map(Result::unwrap).collect();
        assert_eq!(packets[1].opcode(), Some(GlesOpcode::UnmapBuffer));
        let mut args = packets[1].args();
        assert_eq!(args.u32().unwrap(), GL_ARRAY_BUFFER);
        assert_eq!(args.i64().unwrap(), 8);
        assert_eq!(args.blob().unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn fences_are_registered_and_released() {
        let fences = FenceRegistry::new();
        let mut enc = PassthroughEncoder::new(MemoryTransport::new(), Arc::clone(&fences));
        let sync = enc.fence_sync(GL_SYNC_GPU_COMMANDS_COMPLETE, 0);
        assert!(fences.contains(sync));
        enc.delete_sync(sync);
        assert!(fences.is_empty());
    }
}
