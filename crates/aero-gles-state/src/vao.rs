//! Vertex array object state: attribute formats, buffer binding points, and the
//! client-array/VBO usage cache consulted on every draw.

use std::sync::Arc;

use aero_gles_protocol::gl::{
    gl_sizeof, GLenum, GLint, GLintptr, GLsizei, GLuint, GL_BGRA_EXT, GL_FLOAT, GL_INT_2_10_10_10_REV,
    GL_UNSIGNED_INT_2_10_10_10_REV,
};

/// Where an attribute's data comes from when no buffer is bound to its binding point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VertexPointer {
    /// Byte offset into the bound `ARRAY_BUFFER`.
    Offset(usize),
    /// Client memory, captured when the pointer was specified. Index 0 is the first vertex.
    Client(Arc<[u8]>),
}

impl Default for VertexPointer {
    fn default() -> Self {
        Self::Offset(0)
    }
}

impl VertexPointer {
    pub fn offset(&self) -> usize {
        match self {
            Self::Offset(o) => *o,
            Self::Client(_) => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VertexAttribState {
    pub enabled: bool,
    pub size: GLint,
    pub ty: GLenum,
    pub normalized: bool,
    /// Stride as the application passed it (`0` means tightly packed).
    pub stride: GLsizei,
    /// Bytes of one element.
    pub elem_size: usize,
    pub binding_index: GLuint,
    pub relative_offset: GLuint,
    pub is_int: bool,
    pub pointer: VertexPointer,
}

impl VertexAttribState {
    fn new(index: GLuint) -> Self {
        Self {
            enabled: false,
            size: 4,
            ty: GL_FLOAT,
            normalized: false,
            stride: 0,
            elem_size: 16,
            binding_index: index,
            relative_offset: 0,
            is_int: false,
            pointer: VertexPointer::default(),
        }
    }
}

/// Bytes of one element. A `size` of `GL_BGRA_EXT` is four components.
pub fn attrib_elem_size(size: GLint, ty: GLenum) -> usize {
    let components = if size == GL_BGRA_EXT as GLint {
        4
    } else {
        usize::try_from(size).unwrap_or(0)
    };
    match ty {
        GL_INT_2_10_10_10_REV | GL_UNSIGNED_INT_2_10_10_10_REV => 4,
        _ => components * gl_sizeof(ty),
    }
}

/// One vertex buffer binding point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VertexBinding {
    pub buffer: GLuint,
    pub offset: GLintptr,
    pub stride: GLsizei,
    /// `stride`, or the element size when `stride` is 0.
    pub effective_stride: GLsizei,
    pub divisor: GLuint,
}

/// Outcome of the per-draw client-array/VBO scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VboUsage {
    pub has_client_arrays: bool,
    pub has_vbos: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct AttribUsage {
    client: bool,
    vbo: bool,
}

#[derive(Clone, Debug)]
pub struct VaoState {
    pub attribs: Vec<VertexAttribState>,
    pub bindings: Vec<VertexBinding>,
    pub element_array_buffer: GLuint,
    /// Element array binding as last sent to the host for this VAO.
    pub element_array_last_encoded: GLuint,
    usage: Vec<AttribUsage>,
    // bit i set: attribute i must be rescanned
    usage_invalid: u32,
}

impl VaoState {
    pub fn new(max_attribs: usize, max_bindings: usize) -> Self {
        let attribs = (0..max_attribs)
            .map(|i| VertexAttribState::new(i as GLuint))
            .collect();
        Self {
            attribs,
            bindings: vec![VertexBinding::default(); max_bindings.max(max_attribs)],
            element_array_buffer: 0,
            element_array_last_encoded: 0,
            usage: vec![AttribUsage::default(); max_attribs],
            usage_invalid: u32::MAX,
        }
    }

    pub fn invalidate_usage(&mut self, index: usize) {
        if index < 32 {
            self.usage_invalid |= 1 << index;
        } else {
            self.usage_invalid = u32::MAX;
        }
    }

    fn invalidate_binding(&mut self, binding: GLuint) {
        let hits: Vec<usize> = self
            .attribs
            .iter()
            .enumerate()
            .filter(|(_, a)| a.binding_index == binding)
            .map(|(i, _)| i)
            .collect();
        for i in hits {
            self.invalidate_usage(i);
        }
    }

    pub fn set_enabled(&mut self, index: usize, enabled: bool) {
        if let Some(a) = self.attribs.get_mut(index) {
            a.enabled = enabled;
            self.invalidate_usage(index);
        }
    }

    /// `VertexAttrib{I}Pointer`: format, binding `index`, and the buffer currently bound to
    /// `ARRAY_BUFFER` (or the client pointer when that is 0).
    #[allow(clippy::too_many_arguments)]
    pub fn set_pointer(
        &mut self,
        index: usize,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        is_int: bool,
        buffer: GLuint,
        pointer: VertexPointer,
    ) {
        let elem_size = attrib_elem_size(size, ty);
        let Some(a) = self.attribs.get_mut(index) else {
            return;
        };
        a.size = size;
        a.ty = ty;
        a.normalized = normalized;
        a.stride = stride;
        a.elem_size = elem_size;
        a.is_int = is_int;
        a.relative_offset = 0;
        a.binding_index = index as GLuint;
        let offset = pointer.offset() as GLintptr;
        a.pointer = pointer;
        if let Some(b) = self.bindings.get_mut(index) {
            b.buffer = buffer;
            b.offset = offset;
            b.stride = stride;
            b.effective_stride = if stride != 0 {
                stride
            } else {
                elem_size as GLsizei
            };
        }
        // Attributes moved onto this binding with `VertexAttribBinding` read the new buffer too.
        self.invalidate_binding(index as GLuint);
    }

    /// `VertexAttrib{I}Format`.
    pub fn set_format(
        &mut self,
        index: usize,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        relative_offset: GLuint,
        is_int: bool,
    ) {
        if let Some(a) = self.attribs.get_mut(index) {
            a.size = size;
            a.ty = ty;
            a.normalized = normalized;
            a.relative_offset = relative_offset;
            a.is_int = is_int;
            a.elem_size = attrib_elem_size(size, ty);
        }
    }

    pub fn set_attrib_binding(&mut self, index: usize, binding: GLuint) {
        if let Some(a) = self.attribs.get_mut(index) {
            a.binding_index = binding;
            self.invalidate_usage(index);
        }
    }

    /// `BindVertexBuffer`.
    pub fn bind_vertex_buffer(
        &mut self,
        binding: GLuint,
        buffer: GLuint,
        offset: GLintptr,
        stride: GLsizei,
    ) {
        if let Some(b) = self.bindings.get_mut(binding as usize) {
            b.buffer = buffer;
            b.offset = offset;
            b.stride = stride;
            b.effective_stride = stride;
            self.invalidate_binding(binding);
        }
    }

    pub fn set_binding_divisor(&mut self, binding: GLuint, divisor: GLuint) {
        if let Some(b) = self.bindings.get_mut(binding as usize) {
            b.divisor = divisor;
        }
    }

    /// `VertexAttribDivisor` (ES 3.0): the attribute's own binding point.
    pub fn set_attrib_divisor(&mut self, index: usize, divisor: GLuint) {
        if let Some(a) = self.attribs.get_mut(index) {
            a.binding_index = index as GLuint;
            self.set_binding_divisor(index as GLuint, divisor);
            self.invalidate_usage(index);
        }
    }

    pub fn binding_for(&self, index: usize) -> Option<&VertexBinding> {
        let a = self.attribs.get(index)?;
        self.bindings.get(a.binding_index as usize)
    }

    /// Drops every reference to a deleted buffer.
    pub fn unbind_buffer(&mut self, buffer: GLuint) {
        if buffer == 0 {
            return;
        }
        if self.element_array_buffer == buffer {
            self.element_array_buffer = 0;
            self.element_array_last_encoded = 0;
        }
        let hits: Vec<GLuint> = self
            .bindings
            .iter()
            .enumerate()
            .filter(|(_, b)| b.buffer == buffer)
            .map(|(i, _)| i as GLuint)
            .collect();
        for i in hits {
            self.bindings[i as usize].buffer = 0;
            self.invalidate_binding(i);
        }
    }

    /// Which enabled attributes read client memory and which read buffers.
    ///
    /// Only attributes invalidated since the last scan are re-examined.
    pub fn vbo_usage(&mut self) -> VboUsage {
        if self.usage_invalid != 0 {
            for i in 0..self.attribs.len() {
                if i < 32 && self.usage_invalid & (1 << i) == 0 {
                    continue;
                }
                let a = &self.attribs[i];
                let buffer = self
                    .bindings
                    .get(a.binding_index as usize)
                    .map_or(0, |b| b.buffer);
                self.usage[i] = AttribUsage {
                    client: a.enabled && buffer == 0 && matches!(a.pointer, VertexPointer::Client(_)),
                    vbo: a.enabled && buffer != 0,
                };
            }
            self.usage_invalid = 0;
        }
        self.usage.iter().fold(VboUsage::default(), |acc, u| VboUsage {
            has_client_arrays: acc.has_client_arrays || u.client,
            has_vbos: acc.has_vbos || u.vbo,
        })
    }
}
