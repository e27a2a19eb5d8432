use aero_gles_protocol::gl::*;
use aero_gles_protocol::{GlesOpcode, Transport};
use aero_gles_state::VertexPointer;

use crate::wire::GlesWire;

gles_family! {
    /// Vertex array objects, attribute formats and generic attribute values.
    pub trait VertexApi {
        commands {
            fn delete_vertex_arrays(arrays: &[GLuint]) = DeleteVertexArrays;
            fn bind_vertex_array(array: GLuint) = BindVertexArray;
            fn enable_vertex_attrib_array(index: GLuint) = EnableVertexAttribArray;
            fn disable_vertex_attrib_array(index: GLuint) = DisableVertexAttribArray;
            fn vertex_attrib_divisor(index: GLuint, divisor: GLuint) = VertexAttribDivisor;
            fn vertex_attrib_format(
                index: GLuint,
                size: GLint,
                ty: GLenum,
                normalized: bool,
                relative_offset: GLuint,
            ) = VertexAttribFormat;
            fn vertex_attrib_i_format(index: GLuint, size: GLint, ty: GLenum, relative_offset: GLuint) = VertexAttribIFormat;
            fn vertex_attrib_binding(index: GLuint, binding: GLuint) = VertexAttribBinding;
            fn vertex_binding_divisor(binding: GLuint, divisor: GLuint) = VertexBindingDivisor;
            fn bind_vertex_buffer(binding: GLuint, buffer: GLuint, offset: GLintptr, stride: GLsizei) = BindVertexBuffer;
            /// Current value of a generic attribute; one to four components.
            fn vertex_attrib_nfv(index: GLuint, values: &[GLfloat]) = VertexAttribFv;
            fn vertex_attrib_i4i(index: GLuint, x: GLint, y: GLint, z: GLint, w: GLint) = VertexAttribI4i;
            fn vertex_attrib_i4ui(index: GLuint, x: GLuint, y: GLuint, z: GLuint, w: GLuint) = VertexAttribI4ui;
        }
        returns {
            fn is_vertex_array(array: GLuint) -> bool = IsVertexArray;
        }
        outputs {
            fn get_vertex_attribfv(index: GLuint, pname: GLenum; out: &mut [GLfloat]) = GetVertexAttribfv;
            fn get_vertex_attribiv(index: GLuint, pname: GLenum; out: &mut [GLint]) = GetVertexAttribiv;
        }
        uploads {}
        gens {
            fn gen_vertex_arrays = GenVertexArrays;
        }
        provided {
            fn vertex_attrib_pointer(
                &mut self,
                index: GLuint,
                size: GLint,
                ty: GLenum,
                normalized: bool,
                stride: GLsizei,
                pointer: VertexPointer,
            ) {
                self.wire().vertex_attrib_pointer(index, size, ty, normalized, stride, &pointer);
            }

            fn vertex_attrib_i_pointer(
                &mut self,
                index: GLuint,
                size: GLint,
                ty: GLenum,
                stride: GLsizei,
                pointer: VertexPointer,
            ) {
                self.wire().vertex_attrib_i_pointer(index, size, ty, stride, &pointer);
            }

            /// Only `VERTEX_ATTRIB_ARRAY_POINTER` is defined; client pointers come back as the
            /// offset 0 they were rebased to.
            fn get_vertex_attrib_pointerv(&mut self, index: GLuint, pname: GLenum) -> VertexPointer {
                let offset: u64 = self.wire().call(GlesOpcode::GetVertexAttribPointerv, &[&index, &pname]);
                VertexPointer::Offset(offset as usize)
            }

            fn vertex_attrib1f(&mut self, index: GLuint, x: GLfloat) {
                self.vertex_attrib_nfv(index, &[x]);
            }

            fn vertex_attrib2f(&mut self, index: GLuint, x: GLfloat, y: GLfloat) {
                self.vertex_attrib_nfv(index, &[x, y]);
            }

            fn vertex_attrib3f(&mut self, index: GLuint, x: GLfloat, y: GLfloat, z: GLfloat) {
                self.vertex_attrib_nfv(index, &[x, y, z]);
            }

            fn vertex_attrib4f(&mut self, index: GLuint, x: GLfloat, y: GLfloat, z: GLfloat, w: GLfloat) {
                self.vertex_attrib_nfv(index, &[x, y, z, w]);
            }

            fn vertex_attrib1fv(&mut self, index: GLuint, v: &[GLfloat; 1]) {
                self.vertex_attrib_nfv(index, v);
            }

            fn vertex_attrib2fv(&mut self, index: GLuint, v: &[GLfloat; 2]) {
                self.vertex_attrib_nfv(index, v);
            }

            fn vertex_attrib3fv(&mut self, index: GLuint, v: &[GLfloat; 3]) {
                self.vertex_attrib_nfv(index, v);
            }

            fn vertex_attrib4fv(&mut self, index: GLuint, v: &[GLfloat; 4]) {
                self.vertex_attrib_nfv(index, v);
            }
        }
    }
}

impl<T: Transport> GlesWire<T> {
    /// Offsets go out as `VertexAttribPointerOffset`; client bytes travel whole.
    pub fn vertex_attrib_pointer(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        pointer: &VertexPointer,
    ) {
        match pointer {
            VertexPointer::Offset(offset) => self.command(
                GlesOpcode::VertexAttribPointerOffset,
                &[&index, &size, &ty, &normalized, &stride, &(*offset as u64)],
            ),
            VertexPointer::Client(bytes) => {
                self.vertex_attrib_pointer_data(index, size, ty, normalized, stride, bytes)
            }
        }
    }

    /// `VertexAttribPointerData`: the host copies `bytes` into a scratch buffer whose first
    /// element is vertex 0 of the next draw.
    pub fn vertex_attrib_pointer_data(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        bytes: &[u8],
    ) {
        self.command(
            GlesOpcode::VertexAttribPointerData,
            &[&index, &size, &ty, &normalized, &stride, &bytes],
        );
    }

    pub fn vertex_attrib_i_pointer(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        stride: GLsizei,
        pointer: &VertexPointer,
    ) {
        match pointer {
            VertexPointer::Offset(offset) => self.command(
                GlesOpcode::VertexAttribIPointerOffset,
                &[&index, &size, &ty, &stride, &(*offset as u64)],
            ),
            VertexPointer::Client(bytes) => self.vertex_attrib_i_pointer_data(index, size, ty, stride, bytes),
        }
    }

    pub fn vertex_attrib_i_pointer_data(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        stride: GLsizei,
        bytes: &[u8],
    ) {
        self.command(
            GlesOpcode::VertexAttribIPointerData,
            &[&index, &size, &ty, &stride, &bytes],
        );
    }
}
