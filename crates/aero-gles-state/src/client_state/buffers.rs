use aero_gles_protocol::gl::*;
use tracing::debug;

use super::GlClientState;
use crate::buffer::BufferRef;
use crate::caps::HostCaps;
use crate::error::{fail_if, GlError, GlResult};
use crate::names::ObjectKind;

/// One slot of an indexed buffer binding table (`BindBufferRange`/`BindBufferBase`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexedBufferBinding {
    pub buffer: GLuint,
    pub offset: GLintptr,
    pub size: GLsizeiptr,
    pub stride: GLintptr,
}

#[derive(Clone, Debug, Default)]
pub(super) struct BufferState {
    array: GLuint,
    array_last_encoded: GLuint,
    copy_read: GLuint,
    copy_write: GLuint,
    pixel_pack: GLuint,
    pixel_unpack: GLuint,
    transform_feedback: GLuint,
    uniform: GLuint,
    atomic_counter: GLuint,
    dispatch_indirect: GLuint,
    draw_indirect: GLuint,
    shader_storage: GLuint,
    texture_buffer: GLuint,
    indexed_transform_feedback: Vec<IndexedBufferBinding>,
    indexed_uniform: Vec<IndexedBufferBinding>,
    indexed_atomic_counter: Vec<IndexedBufferBinding>,
    indexed_shader_storage: Vec<IndexedBufferBinding>,
}

fn table(n: GLint) -> Vec<IndexedBufferBinding> {
    vec![IndexedBufferBinding::default(); usize::try_from(n).unwrap_or(0)]
}

impl BufferState {
    pub(super) fn new(caps: &HostCaps) -> Self {
        Self {
            indexed_transform_feedback: table(caps.max_transform_feedback_separate_attribs),
            indexed_uniform: table(caps.max_uniform_buffer_bindings),
            indexed_atomic_counter: table(caps.max_atomic_counter_buffer_bindings),
            indexed_shader_storage: table(caps.max_shader_storage_buffer_bindings),
            ..Self::default()
        }
    }

    fn slot_mut(&mut self, target: GLenum) -> Option<&mut GLuint> {
        let slot = match target {
            GL_ARRAY_BUFFER => &mut self.array,
            GL_COPY_READ_BUFFER => &mut self.copy_read,
            GL_COPY_WRITE_BUFFER => &mut self.copy_write,
            GL_PIXEL_PACK_BUFFER => &mut self.pixel_pack,
            GL_PIXEL_UNPACK_BUFFER => &mut self.pixel_unpack,
            GL_TRANSFORM_FEEDBACK_BUFFER => &mut self.transform_feedback,
            GL_UNIFORM_BUFFER => &mut self.uniform,
            GL_ATOMIC_COUNTER_BUFFER => &mut self.atomic_counter,
            GL_DISPATCH_INDIRECT_BUFFER => &mut self.dispatch_indirect,
            GL_DRAW_INDIRECT_BUFFER => &mut self.draw_indirect,
            GL_SHADER_STORAGE_BUFFER => &mut self.shader_storage,
            GL_TEXTURE_BUFFER_OES => &mut self.texture_buffer,
            _ => return None,
        };
        Some(slot)
    }

    fn indexed(&self, target: GLenum) -> Option<&[IndexedBufferBinding]> {
        let t = match target {
            GL_TRANSFORM_FEEDBACK_BUFFER => &self.indexed_transform_feedback,
            GL_UNIFORM_BUFFER => &self.indexed_uniform,
            GL_ATOMIC_COUNTER_BUFFER => &self.indexed_atomic_counter,
            GL_SHADER_STORAGE_BUFFER => &self.indexed_shader_storage,
            _ => return None,
        };
        Some(t)
    }

    fn indexed_mut(&mut self, target: GLenum) -> Option<&mut Vec<IndexedBufferBinding>> {
        let t = match target {
            GL_TRANSFORM_FEEDBACK_BUFFER => &mut self.indexed_transform_feedback,
            GL_UNIFORM_BUFFER => &mut self.indexed_uniform,
            GL_ATOMIC_COUNTER_BUFFER => &mut self.indexed_atomic_counter,
            GL_SHADER_STORAGE_BUFFER => &mut self.indexed_shader_storage,
            _ => return None,
        };
        Some(t)
    }

    fn unbind(&mut self, id: GLuint) {
        if self.array == id {
            self.array = 0;
            self.array_last_encoded = 0;
        }
        for target in [
            GL_COPY_READ_BUFFER,
            GL_COPY_WRITE_BUFFER,
            GL_PIXEL_PACK_BUFFER,
            GL_PIXEL_UNPACK_BUFFER,
            GL_TRANSFORM_FEEDBACK_BUFFER,
            GL_UNIFORM_BUFFER,
            GL_ATOMIC_COUNTER_BUFFER,
            GL_DISPATCH_INDIRECT_BUFFER,
            GL_DRAW_INDIRECT_BUFFER,
            GL_SHADER_STORAGE_BUFFER,
            GL_TEXTURE_BUFFER_OES,
        ] {
            if let Some(slot) = self.slot_mut(target) {
                if *slot == id {
                    *slot = 0;
                }
            }
        }
        for table in [
            &mut self.indexed_transform_feedback,
            &mut self.indexed_uniform,
            &mut self.indexed_atomic_counter,
            &mut self.indexed_shader_storage,
        ] {
            for b in table.iter_mut().filter(|b| b.buffer == id) {
                *b = IndexedBufferBinding::default();
            }
        }
    }
}

/// Targets `BindBufferRange`/`BindBufferBase` accept.
pub fn is_indexed_buffer_target(target: GLenum) -> bool {
    matches!(
        target,
        GL_TRANSFORM_FEEDBACK_BUFFER
            | GL_UNIFORM_BUFFER
            | GL_ATOMIC_COUNTER_BUFFER
            | GL_SHADER_STORAGE_BUFFER
    )
}

impl GlClientState {
    pub fn is_valid_buffer_target(&self, target: GLenum) -> bool {
        match target {
            GL_ARRAY_BUFFER | GL_ELEMENT_ARRAY_BUFFER => true,
            GL_COPY_READ_BUFFER
            | GL_COPY_WRITE_BUFFER
            | GL_PIXEL_PACK_BUFFER
            | GL_PIXEL_UNPACK_BUFFER
            | GL_TRANSFORM_FEEDBACK_BUFFER
            | GL_UNIFORM_BUFFER => self.is_es3(),
            GL_ATOMIC_COUNTER_BUFFER
            | GL_DISPATCH_INDIRECT_BUFFER
            | GL_DRAW_INDIRECT_BUFFER
            | GL_SHADER_STORAGE_BUFFER => self.is_es31(),
            GL_TEXTURE_BUFFER_OES => self.is_es31() || self.has_extension("GL_OES_texture_buffer"),
            _ => false,
        }
    }

    /// Buffer bound to `target`, or `None` for a target that is not a buffer binding point.
    pub fn bound_buffer(&self, target: GLenum) -> Option<GLuint> {
        if target == GL_ELEMENT_ARRAY_BUFFER {
            return Some(self.vao.current.element_array_buffer);
        }
        self.buffers.slot(target)
    }

    /// Record of the buffer bound to `target`, if any.
    pub fn bound_buffer_ref(&self, target: GLenum) -> Option<BufferRef> {
        match self.bound_buffer(target)? {
            0 => None,
            id => self.share.buffer(id),
        }
    }

    /// `glBindBuffer` on the shadow. Creates the record on first bind.
    pub fn bind_buffer(&mut self, target: GLenum, id: GLuint) -> GlResult {
        fail_if(!self.is_valid_buffer_target(target), GlError::InvalidEnum)?;
        if target == GL_ELEMENT_ARRAY_BUFFER {
            self.vao.current.element_array_buffer = id;
        } else if let Some(slot) = self.buffers.slot_mut(target) {
            *slot = id;
        }
        if id != 0 {
            self.share.buffer_or_insert(id);
            self.share.names_mut().buffers.mark_bound(id);
        }
        Ok(())
    }

    /// Value the host last saw for `target`. Only `ARRAY_BUFFER` and the VAO's element array
    /// keep a separate shadow; every other target is sent on each change of the binding.
    pub fn last_encoded_buffer(&self, target: GLenum) -> GLuint {
        match target {
            GL_ARRAY_BUFFER => self.buffers.array_last_encoded,
            GL_ELEMENT_ARRAY_BUFFER => self.vao.current.element_array_last_encoded,
            _ => self.bound_buffer(target).unwrap_or(0),
        }
    }

    pub fn set_last_encoded_buffer(&mut self, target: GLenum, id: GLuint) {
        match target {
            GL_ARRAY_BUFFER => self.buffers.array_last_encoded = id,
            GL_ELEMENT_ARRAY_BUFFER => self.vao.current.element_array_last_encoded = id,
            _ => {}
        }
    }

    pub fn is_non_indexed_bind_noop(&self, target: GLenum, id: GLuint) -> bool {
        id == self.last_encoded_buffer(target) && self.bound_buffer(target) == Some(id)
    }

    pub fn max_indexed_bindings(&self, target: GLenum) -> usize {
        self.buffers.indexed(target).map_or(0, <[_]>::len)
    }

    pub fn indexed_buffer_binding(&self, target: GLenum, index: GLuint) -> Option<IndexedBufferBinding> {
        self.buffers.indexed(target)?.get(index as usize).copied()
    }

    pub fn bind_indexed_buffer(
        &mut self,
        target: GLenum,
        index: GLuint,
        binding: IndexedBufferBinding,
    ) {
        let slot = self
            .buffers
            .indexed_mut(target)
            .and_then(|t| t.get_mut(index as usize));
        match slot {
            Some(slot) => *slot = binding,
            None => debug!(target, index, "indexed bind outside the binding table"),
        }
    }

    /// Whether an indexed bind would change nothing.
    ///
    /// Transform feedback bindings are always re-sent.
    pub fn is_indexed_bind_noop(
        &self,
        target: GLenum,
        index: GLuint,
        binding: IndexedBufferBinding,
    ) -> bool {
        if target == GL_TRANSFORM_FEEDBACK_BUFFER {
            return false;
        }
        if binding.buffer != self.last_encoded_buffer(target) {
            return false;
        }
        self.indexed_buffer_binding(target, index) == Some(binding)
    }

    /// Drops buffer `id`: every binding point referencing it, its record and its name.
    pub fn delete_buffer(&mut self, id: GLuint) {
        if id == 0 {
            return;
        }
        self.buffers.unbind(id);
        self.vao.current.unbind_buffer(id);
        self.share.remove_buffer(id);
        self.set_existence(ObjectKind::Buffer, false, &[id]);
    }

    fn set_host_map_dirty(&self, id: GLuint) {
        if id == 0 {
            return;
        }
        if let Some(buf) = self.share.buffer(id) {
            buf.write().host_map_dirty = true;
        }
    }

    fn set_indexed_dirty(&self, target: GLenum) {
        if let Some(generic) = self.bound_buffer(target) {
            self.set_host_map_dirty(generic);
        }
        for b in self.buffers.indexed(target).unwrap_or_default() {
            self.set_host_map_dirty(b.buffer);
        }
    }

    /// Buffers the host may have written during a draw.
    pub fn post_draw(&self) {
        self.set_indexed_dirty(GL_TRANSFORM_FEEDBACK_BUFFER);
        if self.is_es31() {
            self.set_indexed_dirty(GL_SHADER_STORAGE_BUFFER);
            self.set_indexed_dirty(GL_ATOMIC_COUNTER_BUFFER);
        }
    }

    pub fn post_dispatch_compute(&self) {
        if self.is_es31() {
            self.set_indexed_dirty(GL_SHADER_STORAGE_BUFFER);
            self.set_indexed_dirty(GL_ATOMIC_COUNTER_BUFFER);
        }
    }

    pub fn post_read_pixels(&self) {
        self.set_host_map_dirty(self.buffers.pixel_pack);
    }

    /// A mapping of `target` can trust the guest mirror.
    pub fn should_skip_host_map(&self, target: GLenum) -> bool {
        self.bound_buffer_ref(target)
            .is_some_and(|b| !b.read().host_map_dirty)
    }

    pub fn on_host_mapped(&self, target: GLenum) {
        if let Some(b) = self.bound_buffer_ref(target) {
            b.write().host_map_dirty = false;
        }
    }

    pub(super) fn buffer_binding_query(&self, pname: GLenum) -> Option<GLuint> {
        let target = match pname {
            GL_ARRAY_BUFFER_BINDING => GL_ARRAY_BUFFER,
            GL_ELEMENT_ARRAY_BUFFER_BINDING => GL_ELEMENT_ARRAY_BUFFER,
            GL_COPY_READ_BUFFER_BINDING => GL_COPY_READ_BUFFER,
            GL_COPY_WRITE_BUFFER_BINDING => GL_COPY_WRITE_BUFFER,
            GL_PIXEL_PACK_BUFFER_BINDING => GL_PIXEL_PACK_BUFFER,
            GL_PIXEL_UNPACK_BUFFER_BINDING => GL_PIXEL_UNPACK_BUFFER,
            GL_TRANSFORM_FEEDBACK_BUFFER_BINDING => GL_TRANSFORM_FEEDBACK_BUFFER,
            GL_UNIFORM_BUFFER_BINDING => GL_UNIFORM_BUFFER,
            GL_ATOMIC_COUNTER_BUFFER_BINDING => GL_ATOMIC_COUNTER_BUFFER,
            GL_SHADER_STORAGE_BUFFER_BINDING => GL_SHADER_STORAGE_BUFFER,
            GL_DRAW_INDIRECT_BUFFER_BINDING => GL_DRAW_INDIRECT_BUFFER,
            GL_DISPATCH_INDIRECT_BUFFER_BINDING => GL_DISPATCH_INDIRECT_BUFFER,
            _ => return None,
        };
        self.bound_buffer(target)
    }

    /// `GetInteger(64)i_v` for the indexed buffer tables.
    ///
    /// `Ok(None)` means `pname` is not an indexed buffer query.
    pub fn indexed_buffer_query(&self, pname: GLenum, index: GLuint) -> GlResult<Option<i64>> {
        let (target, field) = match pname {
            GL_TRANSFORM_FEEDBACK_BUFFER_BINDING => (GL_TRANSFORM_FEEDBACK_BUFFER, 0),
            GL_TRANSFORM_FEEDBACK_BUFFER_START => (GL_TRANSFORM_FEEDBACK_BUFFER, 1),
            GL_TRANSFORM_FEEDBACK_BUFFER_SIZE => (GL_TRANSFORM_FEEDBACK_BUFFER, 2),
            GL_UNIFORM_BUFFER_BINDING => (GL_UNIFORM_BUFFER, 0),
            GL_UNIFORM_BUFFER_START => (GL_UNIFORM_BUFFER, 1),
            GL_UNIFORM_BUFFER_SIZE => (GL_UNIFORM_BUFFER, 2),
            GL_ATOMIC_COUNTER_BUFFER_BINDING => (GL_ATOMIC_COUNTER_BUFFER, 0),
            GL_ATOMIC_COUNTER_BUFFER_START => (GL_ATOMIC_COUNTER_BUFFER, 1),
            GL_ATOMIC_COUNTER_BUFFER_SIZE => (GL_ATOMIC_COUNTER_BUFFER, 2),
            GL_SHADER_STORAGE_BUFFER_BINDING => (GL_SHADER_STORAGE_BUFFER, 0),
            GL_SHADER_STORAGE_BUFFER_START => (GL_SHADER_STORAGE_BUFFER, 1),
            GL_SHADER_STORAGE_BUFFER_SIZE => (GL_SHADER_STORAGE_BUFFER, 2),
            _ => return Ok(None),
        };
        let b = self
            .indexed_buffer_binding(target, index)
            .ok_or(GlError::InvalidValue)?;
        Ok(Some(match field {
            0 => i64::from(b.buffer),
            1 => b.offset as i64,
            _ => b.size as i64,
        }))
    }
}

impl BufferState {
    fn slot(&self, target: GLenum) -> Option<GLuint> {
        let v = match target {
            GL_ARRAY_BUFFER => self.array,
            GL_COPY_READ_BUFFER => self.copy_read,
            GL_COPY_WRITE_BUFFER => self.copy_write,
            GL_PIXEL_PACK_BUFFER => self.pixel_pack,
            GL_PIXEL_UNPACK_BUFFER => self.pixel_unpack,
            GL_TRANSFORM_FEEDBACK_BUFFER => self.transform_feedback,
            GL_UNIFORM_BUFFER => self.uniform,
            GL_ATOMIC_COUNTER_BUFFER => self.atomic_counter,
            GL_DISPATCH_INDIRECT_BUFFER => self.dispatch_indirect,
            GL_DRAW_INDIRECT_BUFFER => self.draw_indirect,
            GL_SHADER_STORAGE_BUFFER => self.shader_storage,
            GL_TEXTURE_BUFFER_OES => self.texture_buffer,
            _ => return None,
        };
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::share_group::ShareGroup;

    fn state() -> GlClientState {
        GlClientState::new(ShareGroup::new(), HostCaps::default(), (3, 1))
    }

    #[test]
    fn bind_creates_the_record_and_marks_the_name() {
        let mut s = state();
        s.bind_buffer(GL_ARRAY_BUFFER, 7).unwrap();
        assert_eq!(s.bound_buffer(GL_ARRAY_BUFFER), Some(7));
        assert!(s.share_group().buffer(7).is_some());
        assert_eq!(
            s.query_existence(ObjectKind::Buffer, 7),
            crate::names::NameState::UsedAndBound
        );
        assert_eq!(s.bind_buffer(0x1234, 7), Err(GlError::InvalidEnum));
    }

    #[test]
    fn array_buffer_noop_tracks_the_last_encoded_value() {
        let mut s = state();
        s.bind_buffer(GL_ARRAY_BUFFER, 3).unwrap();
        assert!(!s.is_non_indexed_bind_noop(GL_ARRAY_BUFFER, 3));
        s.set_last_encoded_buffer(GL_ARRAY_BUFFER, 3);
        assert!(s.is_non_indexed_bind_noop(GL_ARRAY_BUFFER, 3));
    }

    #[test]
    fn transform_feedback_indexed_binds_are_never_noops() {
        let mut s = state();
        let b = IndexedBufferBinding {
            buffer: 2,
            offset: 0,
            size: 16,
            stride: 0,
        };
        s.bind_buffer(GL_UNIFORM_BUFFER, 2).unwrap();
        s.bind_indexed_buffer(GL_UNIFORM_BUFFER, 1, b);
        assert!(s.is_indexed_bind_noop(GL_UNIFORM_BUFFER, 1, b));

        s.bind_buffer(GL_TRANSFORM_FEEDBACK_BUFFER, 2).unwrap();
        s.bind_indexed_buffer(GL_TRANSFORM_FEEDBACK_BUFFER, 1, b);
        assert!(!s.is_indexed_bind_noop(GL_TRANSFORM_FEEDBACK_BUFFER, 1, b));
    }

    #[test]
    fn delete_clears_every_binding() {
        let mut s = state();
        s.set_existence(ObjectKind::Buffer, true, &[5]);
        for t in [GL_ARRAY_BUFFER, GL_ELEMENT_ARRAY_BUFFER, GL_UNIFORM_BUFFER] {
            s.bind_buffer(t, 5).unwrap();
        }
        s.bind_indexed_buffer(
            GL_UNIFORM_BUFFER,
            0,
            IndexedBufferBinding {
                buffer: 5,
                offset: 0,
                size: 4,
                stride: 0,
            },
        );
        s.delete_buffer(5);
        for t in [GL_ARRAY_BUFFER, GL_ELEMENT_ARRAY_BUFFER, GL_UNIFORM_BUFFER] {
            assert_eq!(s.bound_buffer(t), Some(0));
        }
        assert_eq!(
            s.indexed_buffer_binding(GL_UNIFORM_BUFFER, 0),
            Some(IndexedBufferBinding::default())
        );
        assert!(s.share_group().buffer(5).is_none());
        assert!(!s.exists(ObjectKind::Buffer, 5));
    }

    #[test]
    fn draws_dirty_transform_feedback_buffers() {
        let mut s = state();
        s.bind_buffer(GL_TRANSFORM_FEEDBACK_BUFFER, 9).unwrap();
        assert!(s.should_skip_host_map(GL_TRANSFORM_FEEDBACK_BUFFER));
        s.post_draw();
        assert!(!s.should_skip_host_map(GL_TRANSFORM_FEEDBACK_BUFFER));
        s.on_host_mapped(GL_TRANSFORM_FEEDBACK_BUFFER);
        assert!(s.should_skip_host_map(GL_TRANSFORM_FEEDBACK_BUFFER));
    }
}
