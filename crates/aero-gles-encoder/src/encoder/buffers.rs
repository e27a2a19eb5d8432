use std::sync::Arc;

use aero_gles_protocol::gl::*;
use aero_gles_protocol::Transport;
use aero_gles_state::{
    fail_if, is_indexed_buffer_target, BufferRef, GlError, GlResult, IndexedBufferBinding,
    MapAccess, NameState, ObjectKind,
};
use tracing::debug;

use super::Gl2Encoder;
use crate::api::{BufferApi, BufferMapping};

/// Targets `GetBufferParameter*` accepts.
fn is_queryable_buffer_target(target: GLenum) -> bool {
    matches!(
        target,
        GL_ARRAY_BUFFER
            | GL_ELEMENT_ARRAY_BUFFER
            | GL_COPY_READ_BUFFER
            | GL_COPY_WRITE_BUFFER
            | GL_PIXEL_PACK_BUFFER
            | GL_PIXEL_UNPACK_BUFFER
            | GL_TRANSFORM_FEEDBACK_BUFFER
            | GL_UNIFORM_BUFFER
    )
}

fn to_usize(v: impl TryInto<usize>) -> GlResult<usize> {
    v.try_into().map_err(|_| GlError::InvalidValue)
}

impl<T: Transport> Gl2Encoder<T> {
    fn is_valid_usage(&self, usage: GLenum) -> bool {
        match usage {
            GL_STREAM_DRAW | GL_STATIC_DRAW | GL_DYNAMIC_DRAW => true,
            GL_STREAM_READ | GL_STREAM_COPY | GL_STATIC_READ | GL_STATIC_COPY | GL_DYNAMIC_READ
            | GL_DYNAMIC_COPY => self.state.is_es3(),
            _ => false,
        }
    }

    /// The record behind `target` for calls that operate on buffer contents: an invalid target
    /// is `INVALID_ENUM`, nothing bound `INVALID_OPERATION`, a bound name without data
    /// `INVALID_VALUE`.
    fn bound_buffer_data(&self, target: GLenum) -> GlResult<BufferRef> {
        fail_if(!self.state.is_valid_buffer_target(target), GlError::InvalidEnum)?;
        fail_if(
            self.state.bound_buffer(target).unwrap_or(0) == 0,
            GlError::InvalidOperation,
        )?;
        self.state.bound_buffer_ref(target).ok_or(GlError::InvalidValue)
    }

    fn try_bind_buffer(&mut self, target: GLenum, buffer: GLuint) -> GlResult {
        fail_if(!self.state.is_valid_buffer_target(target), GlError::InvalidEnum)?;
        if self.state.is_non_indexed_bind_noop(target, buffer) {
            debug!(target, buffer, "buffer bind elided");
            return Ok(());
        }
        self.state.bind_buffer(target, buffer)?;
        self.wire.bind_buffer(target, buffer);
        self.state.set_last_encoded_buffer(target, buffer);
        Ok(())
    }

    fn try_buffer_data(
        &mut self,
        target: GLenum,
        size: GLsizeiptr,
        data: Option<&[u8]>,
        usage: GLenum,
    ) -> GlResult {
        fail_if(!self.state.is_valid_buffer_target(target), GlError::InvalidEnum)?;
        fail_if(
            self.state.bound_buffer(target).unwrap_or(0) == 0,
            GlError::InvalidOperation,
        )?;
        let len = to_usize(size)?;
        fail_if(!self.is_valid_usage(usage), GlError::InvalidEnum)?;
        let data = match data {
            Some(bytes) => Some(bytes.get(..len).ok_or(GlError::InvalidOperation)?),
            None => None,
        };
        let buf = self.state.bound_buffer_ref(target).ok_or(GlError::InvalidOperation)?;
        buf.write().respecify(len, data, usage);
        self.wire.buffer_data(target, size, data, usage);
        Ok(())
    }

    fn try_buffer_sub_data(&mut self, target: GLenum, offset: GLintptr, data: &[u8]) -> GlResult {
        let buf = self.bound_buffer_data(target)?;
        let mut b = buf.write();
        fail_if(b.mapped, GlError::InvalidOperation)?;
        b.update(to_usize(offset)?, data)?;
        drop(b);
        self.wire.buffer_sub_data(target, offset, data);
        Ok(())
    }

    fn try_map_buffer_range(
        &mut self,
        target: GLenum,
        offset: GLintptr,
        length: GLsizeiptr,
        access: GLbitfield,
    ) -> GlResult<Option<BufferMapping>> {
        let buf = self.bound_buffer_data(target)?;
        let skip_fetch = self.state.should_skip_host_map(target);
        let mut b = buf.write();

        let off = to_usize(offset)?;
        let len = to_usize(length)?;
        fail_if(
            off.checked_add(len).map_or(true, |end| end > b.size),
            GlError::InvalidValue,
        )?;
        let bits = MapAccess::from_bits(access).ok_or(GlError::InvalidValue)?;
        fail_if(b.mapped, GlError::InvalidOperation)?;
        fail_if(
            !bits.intersects(MapAccess::READ | MapAccess::WRITE),
            GlError::InvalidOperation,
        )?;
        fail_if(
            bits.contains(MapAccess::READ)
                && bits.intersects(
                    MapAccess::INVALIDATE_RANGE
                        | MapAccess::INVALIDATE_BUFFER
                        | MapAccess::UNSYNCHRONIZED
                        | MapAccess::FLUSH_EXPLICIT,
                ),
            GlError::InvalidOperation,
        )?;

        b.begin_map(bits, off, len);
        let needs_contents = bits.contains(MapAccess::READ)
            || !bits.intersects(MapAccess::INVALIDATE_RANGE | MapAccess::INVALIDATE_BUFFER);
        let fetch = needs_contents && !skip_fetch;
        if fetch {
            if let Some(range) = b.range_mut(off, len) {
                self.wire.map_buffer_range_fetch(target, offset, access, range);
            }
            b.invalidate_index_ranges(off, len);
        } else {
            debug!(target, offset, length, "host map skipped");
        }
        drop(b);
        if fetch {
            self.state.on_host_mapped(target);
        }
        Ok(Some(BufferMapping::new(buf, off, len)))
    }

    fn try_unmap_buffer(&mut self, target: GLenum) -> GlResult<bool> {
        let buf = self.bound_buffer_data(target)?;
        let mut b = buf.write();
        fail_if(!b.mapped, GlError::InvalidOperation)?;
        let (off, len, access) = (b.mapped_offset, b.mapped_length, b.access);
        let write = access.contains(MapAccess::WRITE);
        if write {
            if access.contains(MapAccess::INVALIDATE_BUFFER) {
                let size = b.size;
                b.invalidate_index_ranges(0, size);
            } else {
                b.invalidate_index_ranges(off, len);
            }
        }
        let ok = {
            let written: &[u8] = if write {
                b.range(off, len).unwrap_or_default()
            } else {
                &[]
            };
            self.wire.unmap_buffer_with(target, off as GLintptr, written)
        };
        b.end_map();
        Ok(ok)
    }

    fn try_flush_mapped_buffer_range(
        &mut self,
        target: GLenum,
        offset: GLintptr,
        length: GLsizeiptr,
    ) -> GlResult {
        let buf = self.bound_buffer_data(target)?;
        let mut b = buf.write();
        fail_if(!b.mapped, GlError::InvalidOperation)?;
        fail_if(
            !b.access.contains(MapAccess::FLUSH_EXPLICIT),
            GlError::InvalidOperation,
        )?;
        let off = to_usize(offset)?;
        let len = to_usize(length)?;
        fail_if(
            off.checked_add(len).map_or(true, |end| end > b.mapped_length),
            GlError::InvalidValue,
        )?;
        let start = b.mapped_offset + off;
        b.invalidate_index_ranges(start, len);
        if let Some(bytes) = b.range(start, len) {
            self.wire
                .flush_mapped_buffer_range_with(target, start as GLintptr, bytes);
        }
        Ok(())
    }

    fn buffer_parameter(&self, target: GLenum, pname: GLenum) -> GlResult<i64> {
        fail_if(!self.state.is_valid_buffer_target(target), GlError::InvalidEnum)?;
        fail_if(!is_queryable_buffer_target(target), GlError::InvalidEnum)?;
        let known = match pname {
            GL_BUFFER_SIZE | GL_BUFFER_USAGE => true,
            GL_BUFFER_ACCESS_FLAGS | GL_BUFFER_MAPPED | GL_BUFFER_MAP_LENGTH
            | GL_BUFFER_MAP_OFFSET => self.state.is_es3(),
            _ => false,
        };
        fail_if(!known, GlError::InvalidEnum)?;
        let buf = self.bound_buffer_data(target)?;
        let b = buf.read();
        let v = match pname {
            GL_BUFFER_SIZE => b.size as i64,
            GL_BUFFER_USAGE if b.usage == 0 => i64::from(GL_STATIC_DRAW),
            GL_BUFFER_USAGE => i64::from(b.usage),
            GL_BUFFER_ACCESS_FLAGS => i64::from(b.access.bits()),
            GL_BUFFER_MAPPED => i64::from(b.mapped),
            GL_BUFFER_MAP_LENGTH => b.mapped_length as i64,
            _ => b.mapped_offset as i64,
        };
        Ok(v)
    }

    fn try_copy_buffer_sub_data(
        &mut self,
        read_target: GLenum,
        write_target: GLenum,
        read_offset: GLintptr,
        write_offset: GLintptr,
        size: GLsizeiptr,
    ) -> GlResult {
        for target in [read_target, write_target] {
            fail_if(!self.state.is_valid_buffer_target(target), GlError::InvalidEnum)?;
            fail_if(
                matches!(
                    target,
                    GL_ATOMIC_COUNTER_BUFFER
                        | GL_DISPATCH_INDIRECT_BUFFER
                        | GL_DRAW_INDIRECT_BUFFER
                        | GL_SHADER_STORAGE_BUFFER
                ),
                GlError::InvalidEnum,
            )?;
        }
        let src = self.bound_buffer_data(read_target)?;
        let dst = self.bound_buffer_data(write_target)?;
        let src_mapped = src.read().mapped;
        let dst_mapped = dst.read().mapped;
        fail_if(src_mapped || dst_mapped, GlError::InvalidOperation)?;
        let r = to_usize(read_offset)?;
        let w = to_usize(write_offset)?;
        let n = to_usize(size)?;
        let in_range = |start: usize, len: usize| start.checked_add(n).is_some_and(|e| e <= len);
        fail_if(!in_range(r, src.read().size), GlError::InvalidValue)?;
        fail_if(!in_range(w, dst.read().size), GlError::InvalidValue)?;
        fail_if(
            Arc::ptr_eq(&src, &dst) && r < w + n && w < r + n,
            GlError::InvalidValue,
        )?;

        let bytes = src
            .read()
            .range(r, n)
            .map(<[u8]>::to_vec)
            .unwrap_or_default();
        dst.write().update(w, &bytes)?;
        self.wire
            .copy_buffer_sub_data(read_target, write_target, read_offset, write_offset, size);
        Ok(())
    }

    /// Target and index checks shared by `BindBufferRange` and `BindBufferBase`.
    fn check_indexed_target(&self, target: GLenum, index: GLuint) -> GlResult {
        fail_if(!self.state.is_valid_buffer_target(target), GlError::InvalidEnum)?;
        fail_if(!is_indexed_buffer_target(target), GlError::InvalidEnum)?;
        fail_if(
            index as usize >= self.state.max_indexed_bindings(target),
            GlError::InvalidValue,
        )
    }

    fn try_bind_buffer_range(
        &mut self,
        target: GLenum,
        index: GLuint,
        buffer: GLuint,
        offset: GLintptr,
        size: GLsizeiptr,
    ) -> GlResult {
        self.check_indexed_target(target, index)?;
        fail_if(buffer != 0 && size <= 0, GlError::InvalidValue)?;
        let caps = self.state.caps();
        let misaligned = |align: GLint| align > 0 && offset % align as GLintptr != 0;
        match target {
            GL_ATOMIC_COUNTER_BUFFER | GL_TRANSFORM_FEEDBACK_BUFFER => {
                fail_if(size % 4 != 0 || offset % 4 != 0, GlError::InvalidValue)?
            }
            GL_SHADER_STORAGE_BUFFER => fail_if(
                misaligned(caps.shader_storage_buffer_offset_alignment),
                GlError::InvalidValue,
            )?,
            GL_UNIFORM_BUFFER => fail_if(
                misaligned(caps.uniform_buffer_offset_alignment),
                GlError::InvalidValue,
            )?,
            _ => {}
        }
        let binding = IndexedBufferBinding {
            buffer,
            offset,
            size,
            stride: 0,
        };
        if self.state.is_indexed_bind_noop(target, index, binding) {
            debug!(target, index, buffer, "indexed buffer bind elided");
            return Ok(());
        }
        self.state.bind_buffer(target, buffer)?;
        self.state.bind_indexed_buffer(target, index, binding);
        self.wire.bind_buffer_range(target, index, buffer, offset, size);
        self.state.set_last_encoded_buffer(target, buffer);
        Ok(())
    }

    fn try_bind_buffer_base(&mut self, target: GLenum, index: GLuint, buffer: GLuint) -> GlResult {
        self.check_indexed_target(target, index)?;
        let size = match buffer {
            0 => 0,
            id => self
                .state
                .share_group()
                .buffer(id)
                .map_or(0, |b| b.read().size as GLsizeiptr),
        };
        let binding = IndexedBufferBinding {
            buffer,
            offset: 0,
            size,
            stride: 0,
        };
        if self.state.is_indexed_bind_noop(target, index, binding) {
            debug!(target, index, buffer, "indexed buffer bind elided");
            return Ok(());
        }
        self.state.bind_buffer(target, buffer)?;
        self.state.bind_indexed_buffer(target, index, binding);
        self.wire.bind_buffer_base(target, index, buffer);
        self.state.set_last_encoded_buffer(target, buffer);
        Ok(())
    }
}

impl<T: Transport> BufferApi for Gl2Encoder<T> {
    fn gen_buffers(&mut self, n: GLsizei) -> Vec<GLuint> {
        self.guarded("glGenBuffers", |e| {
            fail_if(n < 0, GlError::InvalidValue)?;
            let names = e.wire.gen_buffers(n);
            e.state.set_existence(ObjectKind::Buffer, true, &names);
            Ok(names)
        })
    }

    fn delete_buffers(&mut self, buffers: &[GLuint]) {
        for &id in buffers {
            self.state.delete_buffer(id);
        }
        self.wire.delete_buffers(buffers);
    }

    fn bind_buffer(&mut self, target: GLenum, buffer: GLuint) {
        self.guarded("glBindBuffer", |e| e.try_bind_buffer(target, buffer))
    }

    fn buffer_data(&mut self, target: GLenum, size: GLsizeiptr, data: Option<&[u8]>, usage: GLenum) {
        self.guarded("glBufferData", |e| e.try_buffer_data(target, size, data, usage))
    }

    fn buffer_sub_data(&mut self, target: GLenum, offset: GLintptr, data: &[u8]) {
        self.guarded("glBufferSubData", |e| e.try_buffer_sub_data(target, offset, data))
    }

    fn is_buffer(&mut self, buffer: GLuint) -> bool {
        buffer != 0 && self.state.query_existence(ObjectKind::Buffer, buffer) == NameState::UsedAndBound
    }

    fn map_buffer_range(
        &mut self,
        target: GLenum,
        offset: GLintptr,
        length: GLsizeiptr,
        access: GLbitfield,
    ) -> Option<BufferMapping> {
        self.guarded("glMapBufferRange", |e| {
            e.try_map_buffer_range(target, offset, length, access)
        })
    }

    fn unmap_buffer(&mut self, target: GLenum) -> bool {
        self.guarded("glUnmapBuffer", |e| e.try_unmap_buffer(target))
    }

    fn flush_mapped_buffer_range(&mut self, target: GLenum, offset: GLintptr, length: GLsizeiptr) {
        self.guarded("glFlushMappedBufferRange", |e| {
            e.try_flush_mapped_buffer_range(target, offset, length)
        })
    }

    fn copy_buffer_sub_data(
        &mut self,
        read_target: GLenum,
        write_target: GLenum,
        read_offset: GLintptr,
        write_offset: GLintptr,
        size: GLsizeiptr,
    ) {
        self.guarded("glCopyBufferSubData", |e| {
            e.try_copy_buffer_sub_data(read_target, write_target, read_offset, write_offset, size)
        })
    }

    fn bind_buffer_range(
        &mut self,
        target: GLenum,
        index: GLuint,
        buffer: GLuint,
        offset: GLintptr,
        size: GLsizeiptr,
    ) {
        self.guarded("glBindBufferRange", |e| {
            e.try_bind_buffer_range(target, index, buffer, offset, size)
        })
    }

    fn bind_buffer_base(&mut self, target: GLenum, index: GLuint, buffer: GLuint) {
        self.guarded("glBindBufferBase", |e| e.try_bind_buffer_base(target, index, buffer))
    }

    fn get_buffer_parameteriv(&mut self, target: GLenum, pname: GLenum, out: &mut [GLint]) {
        self.guarded("glGetBufferParameteriv", |e| {
            let v = e.buffer_parameter(target, pname)?;
            if let Some(slot) = out.first_mut() {
                *slot = v as GLint;
            }
            Ok(())
        })
    }

    fn get_buffer_parameteri64v(&mut self, target: GLenum, pname: GLenum, out: &mut [GLint64]) {
        self.guarded("glGetBufferParameteri64v", |e| {
            let v = e.buffer_parameter(target, pname)?;
            if let Some(slot) = out.first_mut() {
                *slot = v;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use aero_gles_protocol::{GlesOpcode, GlesPacketIter};
    use aero_gles_state::VertexPointer;
    use pretty_assertions::assert_eq;

    use super::super::test_support::*;
    use super::*;
    use crate::api::{StateApi, VertexApi};

    #[test]
    fn buffer_size_is_answered_locally() {
        let mut enc = encoder();
        enc.transport_mut().push_reply_u32(7);
        let names = enc.gen_buffers(1);
        assert_eq!(names, vec![7]);
        enc.bind_buffer(GL_ARRAY_BUFFER, 7);
        enc.buffer_data(GL_ARRAY_BUFFER, 100, None, GL_STATIC_DRAW);

        let trips = enc.transport().round_trips();
        let mut size = [0];
        enc.get_buffer_parameteriv(GL_ARRAY_BUFFER, GL_BUFFER_SIZE, &mut size);
        assert_eq!(size, [100]);
        assert_eq!(enc.transport().round_trips(), trips);
        assert!(enc.is_buffer(7));
        assert_eq!(
            opcodes(&mut enc),
            vec![GlesOpcode::GenBuffers, GlesOpcode::BindBuffer, GlesOpcode::BufferData]
        );
    }

    #[test]
    fn rebinding_the_same_buffer_is_elided() {
        let mut enc = encoder();
        enc.bind_buffer(GL_ARRAY_BUFFER, 3);
        enc.bind_buffer(GL_ARRAY_BUFFER, 3);
        enc.bind_buffer(GL_COPY_READ_BUFFER, 3);
        enc.bind_buffer(GL_COPY_READ_BUFFER, 3);
        enc.bind_buffer(GL_ARRAY_BUFFER, 0);
        assert_eq!(opcodes(&mut enc).len(), 3);
    }

    #[test]
    fn buffer_data_checks_run_in_order() {
        let mut enc = encoder();
        enc.buffer_data(GL_ARRAY_BUFFER, 4, None, GL_STATIC_DRAW);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        enc.bind_buffer(GL_ARRAY_BUFFER, 1);
        enc.buffer_data(GL_ARRAY_BUFFER, -1, None, 0x1234);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.buffer_data(GL_ARRAY_BUFFER, 4, None, 0x1234);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        enc.buffer_data(GL_ARRAY_BUFFER, 8, Some(&[1, 2, 3]), GL_STATIC_DRAW);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
    }

    #[test]
    fn sub_data_updates_the_mirror_and_rejects_overruns() {
        let mut enc = encoder();
        enc.bind_buffer(GL_ARRAY_BUFFER, 1);
        enc.buffer_data(GL_ARRAY_BUFFER, 4, Some(&[0; 4]), GL_DYNAMIC_DRAW);
        enc.buffer_sub_data(GL_ARRAY_BUFFER, 2, &[9, 9]);
        assert_eq!(take_error(&mut enc), None);
        enc.buffer_sub_data(GL_ARRAY_BUFFER, 3, &[1, 1]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));

        let buf = enc.state().bound_buffer_ref(GL_ARRAY_BUFFER).unwrap();
        assert_eq!(buf.read().bytes(), &[0, 0, 9, 9]);
    }

    #[test]
    fn read_mapping_fetches_the_range_from_the_host() {
        let mut enc = encoder();
        enc.bind_buffer(GL_ARRAY_BUFFER, 1);
        enc.buffer_data(GL_ARRAY_BUFFER, 8, None, GL_STATIC_DRAW);
        // A buffer written by the host (transform feedback here) cannot trust the mirror.
        enc.state().bound_buffer_ref(GL_ARRAY_BUFFER).unwrap().write().host_map_dirty = true;
        enc.transport_mut().push_reply_bytes(&[5, 6, 7, 8]);

        let mapping = enc
            .map_buffer_range(GL_ARRAY_BUFFER, 4, 4, GL_MAP_READ_BIT)
            .unwrap();
        assert_eq!(&*mapping.read().unwrap(), &[5, 6, 7, 8]);

        let mut mapped = [0];
        enc.get_buffer_parameteriv(GL_ARRAY_BUFFER, GL_BUFFER_MAPPED, &mut mapped);
        assert_eq!(mapped, [1]);

        // A second mapping of the same buffer is rejected while the first is live.
        assert!(enc.map_buffer_range(GL_ARRAY_BUFFER, 0, 4, GL_MAP_READ_BIT).is_none());
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        enc.transport_mut().push_reply_u32(1);
        assert!(enc.unmap_buffer(GL_ARRAY_BUFFER));
        enc.get_buffer_parameteriv(GL_ARRAY_BUFFER, GL_BUFFER_MAPPED, &mut mapped);
        assert_eq!(mapped, [0]);
    }

    #[test]
    fn clean_buffers_map_without_a_host_fetch() {
        let mut enc = encoder();
        enc.bind_buffer(GL_ARRAY_BUFFER, 1);
        enc.buffer_data(GL_ARRAY_BUFFER, 4, Some(&[1, 2, 3, 4]), GL_STATIC_DRAW);
        let mapping = enc
            .map_buffer_range(GL_ARRAY_BUFFER, 0, 4, GL_MAP_READ_BIT)
            .unwrap();
        assert_eq!(&*mapping.read().unwrap(), &[1, 2, 3, 4]);
        assert!(!opcodes(&mut enc).contains(&GlesOpcode::MapBufferRange));
    }

    #[test]
    fn write_mapping_sends_the_mapped_range_on_unmap() {
        let mut enc = encoder();
        enc.bind_buffer(GL_ARRAY_BUFFER, 1);
        enc.buffer_data(GL_ARRAY_BUFFER, 8, None, GL_STATIC_DRAW);
        let mapping = enc
            .map_buffer_range(
                GL_ARRAY_BUFFER,
                2,
                3,
                GL_MAP_WRITE_BIT | GL_MAP_INVALIDATE_RANGE_BIT,
            )
            .unwrap();
        mapping.write().unwrap().copy_from_slice(&[7, 7, 7]);
        enc.transport_mut().push_reply_u32(1);
        assert!(enc.unmap_buffer(GL_ARRAY_BUFFER));

        let written = sent(&mut enc);
        let unmap = GlesPacketIter::new(&written)
            .map(Result::unwrap)
            .find(|p| p.opcode() == Some(GlesOpcode::UnmapBuffer))
            .unwrap();
        let mut args = unmap.args();
        assert_eq!(args.u32().unwrap(), GL_ARRAY_BUFFER);
        assert_eq!(args.i64().unwrap(), 2);
        assert_eq!(args.blob().unwrap(), &[7, 7, 7]);
    }

    #[test]
    fn map_access_rules() {
        let mut enc = encoder();
        enc.bind_buffer(GL_ARRAY_BUFFER, 1);
        enc.buffer_data(GL_ARRAY_BUFFER, 8, None, GL_STATIC_DRAW);

        let cases = [
            (0, 16, GL_MAP_READ_BIT, GlError::InvalidValue),
            (0, 4, 0x8000_0000, GlError::InvalidValue),
            (0, 4, GL_MAP_FLUSH_EXPLICIT_BIT, GlError::InvalidOperation),
            (
                0,
                4,
                GL_MAP_READ_BIT | GL_MAP_INVALIDATE_BUFFER_BIT,
                GlError::InvalidOperation,
            ),
        ];
        for (offset, length, access, err) in cases {
            assert!(enc.map_buffer_range(GL_ARRAY_BUFFER, offset, length, access).is_none());
            assert_eq!(take_error(&mut enc), Some(err), "access {access:#x}");
        }
    }

    #[test]
    fn explicit_flush_needs_the_flag_and_stays_inside_the_mapping() {
        let mut enc = encoder();
        enc.bind_buffer(GL_ARRAY_BUFFER, 1);
        enc.buffer_data(GL_ARRAY_BUFFER, 16, None, GL_STATIC_DRAW);
        enc.flush_mapped_buffer_range(GL_ARRAY_BUFFER, 0, 4);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        let access = GL_MAP_WRITE_BIT | GL_MAP_FLUSH_EXPLICIT_BIT | GL_MAP_INVALIDATE_RANGE_BIT;
        let mapping = enc.map_buffer_range(GL_ARRAY_BUFFER, 8, 8, access).unwrap();
        mapping.write().unwrap()[..2].copy_from_slice(&[4, 2]);
        enc.flush_mapped_buffer_range(GL_ARRAY_BUFFER, 6, 4);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        clear(&mut enc);
        enc.flush_mapped_buffer_range(GL_ARRAY_BUFFER, 0, 2);
        assert_eq!(take_error(&mut enc), None);

        let written = sent(&mut enc);
        let packet = GlesPacketIter::new(&written).next().unwrap().unwrap();
        assert_eq!(packet.opcode(), Some(GlesOpcode::FlushMappedBufferRange));
        let mut args = packet.args();
        assert_eq!(args.u32().unwrap(), GL_ARRAY_BUFFER);
        assert_eq!(args.i64().unwrap(), 8);
        assert_eq!(args.blob().unwrap(), &[4, 2]);
    }

    #[test]
    fn copy_rejects_overlap_within_one_buffer() {
        let mut enc = encoder();
        enc.bind_buffer(GL_COPY_READ_BUFFER, 1);
        enc.bind_buffer(GL_COPY_WRITE_BUFFER, 1);
        enc.buffer_data(GL_COPY_READ_BUFFER, 8, Some(&[1, 2, 3, 4, 5, 6, 7, 8]), GL_STATIC_DRAW);
        enc.copy_buffer_sub_data(GL_COPY_READ_BUFFER, GL_COPY_WRITE_BUFFER, 0, 2, 4);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));

        enc.copy_buffer_sub_data(GL_COPY_READ_BUFFER, GL_COPY_WRITE_BUFFER, 0, 4, 4);
        assert_eq!(take_error(&mut enc), None);
        let buf = enc.state().bound_buffer_ref(GL_COPY_READ_BUFFER).unwrap();
        assert_eq!(buf.read().bytes(), &[1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn indexed_binds_check_alignment_and_elide_repeats() {
        let mut enc = encoder();
        enc.bind_buffer(GL_UNIFORM_BUFFER, 2);
        enc.buffer_data(GL_UNIFORM_BUFFER, 1024, None, GL_DYNAMIC_DRAW);
        clear(&mut enc);

        enc.bind_buffer_range(GL_UNIFORM_BUFFER, 0, 2, 4, 64);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.bind_buffer_range(GL_UNIFORM_BUFFER, 99, 2, 0, 64);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.bind_buffer_range(GL_ARRAY_BUFFER, 0, 2, 0, 64);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));

        enc.bind_buffer_range(GL_UNIFORM_BUFFER, 0, 2, 256, 64);
        enc.bind_buffer_range(GL_UNIFORM_BUFFER, 0, 2, 256, 64);
        enc.bind_buffer_base(GL_TRANSFORM_FEEDBACK_BUFFER, 0, 2);
        enc.bind_buffer_base(GL_TRANSFORM_FEEDBACK_BUFFER, 0, 2);
        assert_eq!(
            opcodes(&mut enc),
            vec![
                GlesOpcode::BindBufferRange,
                GlesOpcode::BindBufferBase,
                GlesOpcode::BindBufferBase,
            ]
        );

        let mut size = [0];
        enc.get_integeri_v(GL_TRANSFORM_FEEDBACK_BUFFER_SIZE, 0, &mut size);
        assert_eq!(size, [1024]);
    }

    #[test]
    fn deleting_a_bound_buffer_clears_its_bindings() {
        let mut enc = encoder();
        enc.bind_buffer(GL_UNIFORM_BUFFER, 4);
        enc.buffer_data(GL_UNIFORM_BUFFER, 256, None, GL_DYNAMIC_DRAW);
        enc.bind_buffer_range(GL_UNIFORM_BUFFER, 0, 4, 0, 64);
        enc.bind_buffer(GL_ARRAY_BUFFER, 4);
        enc.bind_buffer(GL_ELEMENT_ARRAY_BUFFER, 4);
        enc.vertex_attrib_pointer(0, 4, GL_FLOAT, false, 0, VertexPointer::Offset(0));
        enc.enable_vertex_attrib_array(0);
        assert_eq!(take_error(&mut enc), None);
        assert!(enc.state.current_vao_mut().vbo_usage().has_vbos);

        enc.delete_buffers(&[4]);

        let mut binding = [-1];
        enc.get_integerv(GL_ARRAY_BUFFER_BINDING, &mut binding);
        assert_eq!(binding, [0]);
        enc.get_integerv(GL_ELEMENT_ARRAY_BUFFER_BINDING, &mut binding);
        assert_eq!(binding, [0]);
        enc.get_integerv(GL_UNIFORM_BUFFER_BINDING, &mut binding);
        assert_eq!(binding, [0]);
        enc.get_integeri_v(GL_UNIFORM_BUFFER_BINDING, 0, &mut binding);
        assert_eq!(binding, [0]);
        assert_eq!(take_error(&mut enc), None);
        assert!(!enc.state.current_vao_mut().vbo_usage().has_vbos);
        assert!(!enc.is_buffer(4));
    }

    #[test]
    fn usage_defaults_to_static_draw_before_data() {
        let mut enc = encoder();
        enc.bind_buffer(GL_ARRAY_BUFFER, 1);
        let mut usage = [0];
        enc.get_buffer_parameteriv(GL_ARRAY_BUFFER, GL_BUFFER_USAGE, &mut usage);
        assert_eq!(usage, [GL_STATIC_DRAW as GLint]);

        enc.bind_buffer(GL_ATOMIC_COUNTER_BUFFER, 1);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
    }
}
