use aero_gles_protocol::gl::*;
use aero_gles_protocol::{GlesOpcode, Transport};

use super::BufferMapping;
use crate::wire::GlesWire;

gles_family! {
    /// Buffer objects.
    ///
    /// Mapping has no verbatim form: the mapped bytes live in guest memory, so every encoder
    /// decides itself where they come from.
    pub trait BufferApi {
        commands {
            fn delete_buffers(buffers: &[GLuint]) = DeleteBuffers;
            fn bind_buffer(target: GLenum, buffer: GLuint) = BindBuffer;
            fn buffer_data(target: GLenum, size: GLsizeiptr, data: Option<&[u8]>, usage: GLenum) = BufferData;
            fn buffer_sub_data(target: GLenum, offset: GLintptr, data: &[u8]) = BufferSubData;
            fn copy_buffer_sub_data(
                read_target: GLenum,
                write_target: GLenum,
                read_offset: GLintptr,
                write_offset: GLintptr,
                size: GLsizeiptr,
            ) = CopyBufferSubData;
            fn bind_buffer_range(
                target: GLenum,
                index: GLuint,
                buffer: GLuint,
                offset: GLintptr,
                size: GLsizeiptr,
            ) = BindBufferRange;
            fn bind_buffer_base(target: GLenum, index: GLuint, buffer: GLuint) = BindBufferBase;
        }
        returns {
            fn is_buffer(buffer: GLuint) -> bool = IsBuffer;
        }
        outputs {
            fn get_buffer_parameteriv(target: GLenum, pname: GLenum; out: &mut [GLint]) = GetBufferParameteriv;
            fn get_buffer_parameteri64v(target: GLenum, pname: GLenum; out: &mut [GLint64]) = GetBufferParameteri64v;
        }
        uploads {}
        gens {
            fn gen_buffers = GenBuffers;
        }
        provided {
            fn map_buffer_range(
                &mut self,
                target: GLenum,
                offset: GLintptr,
                length: GLsizeiptr,
                access: GLbitfield,
            ) -> Option<BufferMapping>;

            /// Returns `GL_FALSE` when the host reports the contents were lost while mapped.
            fn unmap_buffer(&mut self, target: GLenum) -> bool;

            fn flush_mapped_buffer_range(&mut self, target: GLenum, offset: GLintptr, length: GLsizeiptr);
        }
    }
}

impl<T: Transport> GlesWire<T> {
    /// `MapBufferRange`: the host replies with the `out.len()` bytes of the range.
    pub fn map_buffer_range_fetch(
        &mut self,
        target: GLenum,
        offset: GLintptr,
        access: GLbitfield,
        out: &mut [u8],
    ) {
        let length = out.len() as i64;
        self.call_bytes(
            GlesOpcode::MapBufferRange,
            &[&target, &(offset as i64), &length, &access],
            out,
        );
    }

    /// `UnmapBuffer` carrying the bytes written through the mapping (empty for read mappings).
    pub fn unmap_buffer_with(&mut self, target: GLenum, offset: GLintptr, written: &[u8]) -> bool {
        self.call(GlesOpcode::UnmapBuffer, &[&target, &(offset as i64), &written])
    }

    /// `FlushMappedBufferRange` at an absolute buffer offset.
    pub fn flush_mapped_buffer_range_with(&mut self, target: GLenum, offset: GLintptr, bytes: &[u8]) {
        self.command(
            GlesOpcode::FlushMappedBufferRange,
            &[&target, &(offset as i64), &bytes],
        );
    }
}
