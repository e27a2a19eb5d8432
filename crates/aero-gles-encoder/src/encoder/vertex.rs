use aero_gles_protocol::gl::*;
use aero_gles_protocol::Transport;
use aero_gles_state::{fail_if, GlError, GlResult, VertexPointer};
use tracing::debug;

use super::Gl2Encoder;
use crate::api::VertexApi;
use crate::wire::{GlesWire, WireScalar};

fn is_integer_attrib_type(ty: GLenum) -> bool {
    matches!(
        ty,
        GL_BYTE | GL_UNSIGNED_BYTE | GL_SHORT | GL_UNSIGNED_SHORT | GL_INT | GL_UNSIGNED_INT
    )
}

fn is_packed_attrib_type(ty: GLenum) -> bool {
    matches!(ty, GL_INT_2_10_10_10_REV | GL_UNSIGNED_INT_2_10_10_10_REV)
}

impl<T: Transport> Gl2Encoder<T> {
    fn check_attrib_index(&self, index: GLuint) -> GlResult<usize> {
        let index = index as usize;
        fail_if(index >= self.state.max_vertex_attribs(), GlError::InvalidValue)?;
        Ok(index)
    }

    fn check_binding_index(&self, binding: GLuint) -> GlResult {
        let max = usize::try_from(self.state.caps().max_vertex_attrib_bindings).unwrap_or(0);
        fail_if(binding as usize >= max, GlError::InvalidValue)
    }

    fn is_vertex_attrib_type(&self, ty: GLenum) -> bool {
        match ty {
            GL_BYTE | GL_UNSIGNED_BYTE | GL_SHORT | GL_UNSIGNED_SHORT | GL_FIXED | GL_FLOAT => true,
            GL_INT | GL_UNSIGNED_INT | GL_HALF_FLOAT | GL_INT_2_10_10_10_REV
            | GL_UNSIGNED_INT_2_10_10_10_REV => self.state.is_es3(),
            GL_HALF_FLOAT_OES => self.state.has_extension("GL_OES_vertex_half_float"),
            _ => false,
        }
    }

    /// Size and type rules shared by the pointer and format entry points.
    fn check_attrib_format(&self, size: GLint, ty: GLenum, is_int: bool) -> GlResult {
        let bgra = !is_int && size == GL_BGRA_EXT as GLint;
        fail_if(!(1..=4).contains(&size) && !bgra, GlError::InvalidValue)?;
        let known = if is_int {
            is_integer_attrib_type(ty)
        } else {
            self.is_vertex_attrib_type(ty)
        };
        fail_if(!known, GlError::InvalidEnum)?;
        fail_if(
            is_packed_attrib_type(ty) && size != 4 && !bgra,
            GlError::InvalidOperation,
        )?;
        fail_if(
            bgra && ty != GL_UNSIGNED_BYTE && !is_packed_attrib_type(ty),
            GlError::InvalidOperation,
        )
    }

    fn check_vao_bound(&self) -> GlResult {
        fail_if(self.state.bound_vertex_array() == 0, GlError::InvalidOperation)
    }

    /// `VertexAttribPointer` and `VertexAttribIPointer`.
    ///
    /// Buffer-backed pointers are forwarded now. Client pointers are only recorded; their bytes
    /// travel with the next draw that reads them.
    #[allow(clippy::too_many_arguments)]
    fn try_vertex_attrib_pointer(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        is_int: bool,
        pointer: VertexPointer,
    ) -> GlResult {
        let slot = self.check_attrib_index(index)?;
        self.check_attrib_format(size, ty, is_int)?;
        fail_if(stride < 0, GlError::InvalidValue)?;
        fail_if(
            stride > self.state.caps().max_vertex_attrib_stride && self.state.is_es31(),
            GlError::InvalidValue,
        )?;
        let array_buffer = self.state.bound_buffer(GL_ARRAY_BUFFER).unwrap_or(0);
        let client = matches!(pointer, VertexPointer::Client(_));
        // Client memory is only reachable through VAO 0, and never through a bound buffer.
        fail_if(
            client && (array_buffer != 0 || self.state.bound_vertex_array() != 0),
            GlError::InvalidOperation,
        )?;

        self.state
            .set_vertex_attrib_pointer(slot, size, ty, normalized, stride, is_int, pointer.clone());
        if array_buffer == 0 {
            debug!(index, "client array recorded");
            return Ok(());
        }
        if is_int {
            self.wire.vertex_attrib_i_pointer(index, size, ty, stride, &pointer);
        } else {
            self.wire
                .vertex_attrib_pointer(index, size, ty, normalized, stride, &pointer);
        }
        Ok(())
    }

    fn try_set_attrib_enabled(&mut self, index: GLuint, enabled: bool) -> GlResult {
        let slot = self.check_attrib_index(index)?;
        if enabled {
            self.wire.enable_vertex_attrib_array(index);
        } else {
            self.wire.disable_vertex_attrib_array(index);
        }
        self.state.current_vao_mut().set_enabled(slot, enabled);
        Ok(())
    }

    fn try_vertex_attrib_format(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        relative_offset: GLuint,
        is_int: bool,
    ) -> GlResult {
        let slot = self.check_attrib_index(index)?;
        self.check_vao_bound()?;
        self.check_attrib_format(size, ty, is_int)?;
        self.state
            .current_vao_mut()
            .set_format(slot, size, ty, normalized, relative_offset, is_int);
        if is_int {
            self.wire.vertex_attrib_i_format(index, size, ty, relative_offset);
        } else {
            self.wire
                .vertex_attrib_format(index, size, ty, normalized, relative_offset);
        }
        Ok(())
    }

    fn try_bind_vertex_buffer(
        &mut self,
        binding: GLuint,
        buffer: GLuint,
        offset: GLintptr,
        stride: GLsizei,
    ) -> GlResult {
        fail_if(offset < 0, GlError::InvalidValue)?;
        fail_if(
            stride < 0 || stride > self.state.caps().max_vertex_attrib_stride,
            GlError::InvalidValue,
        )?;
        self.check_vao_bound()?;
        self.check_binding_index(binding)?;
        self.state
            .current_vao_mut()
            .bind_vertex_buffer(binding, buffer, offset, stride);
        self.wire.bind_vertex_buffer(binding, buffer, offset, stride);
        Ok(())
    }

    fn is_vertex_attrib_pname(&self, pname: GLenum) -> bool {
        match pname {
            GL_VERTEX_ATTRIB_ARRAY_ENABLED
            | GL_VERTEX_ATTRIB_ARRAY_SIZE
            | GL_VERTEX_ATTRIB_ARRAY_STRIDE
            | GL_VERTEX_ATTRIB_ARRAY_TYPE
            | GL_VERTEX_ATTRIB_ARRAY_NORMALIZED
            | GL_VERTEX_ATTRIB_ARRAY_BUFFER_BINDING
            | GL_CURRENT_VERTEX_ATTRIB => true,
            GL_VERTEX_ATTRIB_ARRAY_INTEGER | GL_VERTEX_ATTRIB_ARRAY_DIVISOR => self.state.is_es3(),
            GL_VERTEX_ATTRIB_BINDING | GL_VERTEX_ATTRIB_RELATIVE_OFFSET => self.state.is_es31(),
            _ => false,
        }
    }

    /// Answers from the VAO shadow; only `CURRENT_VERTEX_ATTRIB` needs the host.
    fn try_get_vertex_attrib<R: WireScalar>(
        &mut self,
        index: GLuint,
        pname: GLenum,
        out: &mut [R],
        convert: fn(GLint) -> R,
        host: fn(&mut GlesWire<T>, GLuint, GLenum, &mut [R]),
    ) -> GlResult {
        let slot = self.check_attrib_index(index)?;
        fail_if(!self.is_vertex_attrib_pname(pname), GlError::InvalidEnum)?;
        if out.is_empty() {
            return Ok(());
        }
        match self.state.vertex_attrib_query(slot, pname)? {
            Some(v) => out[0] = convert(v),
            None => self.safe_host_query(out, |wire, o| host(wire, index, pname, o)),
        }
        Ok(())
    }
}

impl<T: Transport> VertexApi for Gl2Encoder<T> {
    fn gen_vertex_arrays(&mut self, n: GLsizei) -> Vec<GLuint> {
        self.guarded("glGenVertexArrays", |e| {
            fail_if(n < 0, GlError::InvalidValue)?;
            let names = e.wire.gen_vertex_arrays(n);
            e.state.add_vertex_arrays(&names);
            Ok(names)
        })
    }

    fn delete_vertex_arrays(&mut self, arrays: &[GLuint]) {
        self.wire.delete_vertex_arrays(arrays);
        for &vao in arrays {
            self.state.delete_vertex_array(vao);
        }
    }

    fn bind_vertex_array(&mut self, array: GLuint) {
        self.guarded("glBindVertexArray", |e| {
            if e.state.bound_vertex_array() == array {
                debug!(array, "vertex array bind elided");
                return Ok(());
            }
            e.state.bind_vertex_array(array)?;
            e.wire.bind_vertex_array(array);
            Ok(())
        })
    }

    fn is_vertex_array(&mut self, array: GLuint) -> bool {
        self.state.is_vertex_array(array)
    }

    fn enable_vertex_attrib_array(&mut self, index: GLuint) {
        self.guarded("glEnableVertexAttribArray", |e| e.try_set_attrib_enabled(index, true))
    }

    fn disable_vertex_attrib_array(&mut self, index: GLuint) {
        self.guarded("glDisableVertexAttribArray", |e| e.try_set_attrib_enabled(index, false))
    }

    fn vertex_attrib_pointer(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        stride: GLsizei,
        pointer: VertexPointer,
    ) {
        self.guarded("glVertexAttribPointer", |e| {
            e.try_vertex_attrib_pointer(index, size, ty, normalized, stride, false, pointer)
        })
    }

    fn vertex_attrib_i_pointer(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        stride: GLsizei,
        pointer: VertexPointer,
    ) {
        self.guarded("glVertexAttribIPointer", |e| {
            e.try_vertex_attrib_pointer(index, size, ty, false, stride, true, pointer)
        })
    }

    fn vertex_attrib_divisor(&mut self, index: GLuint, divisor: GLuint) {
        self.guarded("glVertexAttribDivisor", |e| {
            let slot = e.check_attrib_index(index)?;
            e.state.current_vao_mut().set_attrib_divisor(slot, divisor);
            e.wire.vertex_attrib_divisor(index, divisor);
            Ok(())
        })
    }

    fn vertex_attrib_format(
        &mut self,
        index: GLuint,
        size: GLint,
        ty: GLenum,
        normalized: bool,
        relative_offset: GLuint,
    ) {
        self.guarded("glVertexAttribFormat", |e| {
            e.try_vertex_attrib_format(index, size, ty, normalized, relative_offset, false)
        })
    }

    fn vertex_attrib_i_format(&mut self, index: GLuint, size: GLint, ty: GLenum, relative_offset: GLuint) {
        self.guarded("glVertexAttribIFormat", |e| {
            e.try_vertex_attrib_format(index, size, ty, false, relative_offset, true)
        })
    }

    fn vertex_attrib_binding(&mut self, index: GLuint, binding: GLuint) {
        self.guarded("glVertexAttribBinding", |e| {
            let slot = e.check_attrib_index(index)?;
            e.check_vao_bound()?;
            e.check_binding_index(binding)?;
            e.state.current_vao_mut().set_attrib_binding(slot, binding);
            e.wire.vertex_attrib_binding(index, binding);
            Ok(())
        })
    }

    fn vertex_binding_divisor(&mut self, binding: GLuint, divisor: GLuint) {
        self.guarded("glVertexBindingDivisor", |e| {
            e.check_vao_bound()?;
            e.check_binding_index(binding)?;
            e.state.current_vao_mut().set_binding_divisor(binding, divisor);
            e.wire.vertex_binding_divisor(binding, divisor);
            Ok(())
        })
    }

    fn bind_vertex_buffer(&mut self, binding: GLuint, buffer: GLuint, offset: GLintptr, stride: GLsizei) {
        self.guarded("glBindVertexBuffer", |e| {
            e.try_bind_vertex_buffer(binding, buffer, offset, stride)
        })
    }

    fn vertex_attrib_nfv(&mut self, index: GLuint, values: &[GLfloat]) {
        self.guarded("glVertexAttrib", |e| {
            e.check_attrib_index(index)?;
            fail_if(!(1..=4).contains(&values.len()), GlError::InvalidValue)?;
            e.wire.vertex_attrib_nfv(index, values);
            Ok(())
        })
    }

    fn vertex_attrib_i4i(&mut self, index: GLuint, x: GLint, y: GLint, z: GLint, w: GLint) {
        self.guarded("glVertexAttribI4i", |e| {
            e.check_attrib_index(index)?;
            e.wire.vertex_attrib_i4i(index, x, y, z, w);
            Ok(())
        })
    }

    fn vertex_attrib_i4ui(&mut self, index: GLuint, x: GLuint, y: GLuint, z: GLuint, w: GLuint) {
        self.guarded("glVertexAttribI4ui", |e| {
            e.check_attrib_index(index)?;
            e.wire.vertex_attrib_i4ui(index, x, y, z, w);
            Ok(())
        })
    }

    fn get_vertex_attribiv(&mut self, index: GLuint, pname: GLenum, out: &mut [GLint]) {
        self.guarded("glGetVertexAttribiv", |e| {
            e.try_get_vertex_attrib(index, pname, out, |v| v, |w, i, p, o| {
                w.get_vertex_attribiv(i, p, o)
            })
        })
    }

    fn get_vertex_attribfv(&mut self, index: GLuint, pname: GLenum, out: &mut [GLfloat]) {
        self.guarded("glGetVertexAttribfv", |e| {
            e.try_get_vertex_attrib(index, pname, out, |v| v as GLfloat, |w, i, p, o| {
                w.get_vertex_attribfv(i, p, o)
            })
        })
    }

    /// The pointer as recorded: a buffer offset, or the captured client bytes.
    fn get_vertex_attrib_pointerv(&mut self, index: GLuint, pname: GLenum) -> VertexPointer {
        self.guarded("glGetVertexAttribPointerv", |e| {
            let slot = e.check_attrib_index(index)?;
            fail_if(pname != GL_VERTEX_ATTRIB_ARRAY_POINTER, GlError::InvalidEnum)?;
            Ok(e.state.current_vao().attribs[slot].pointer.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aero_gles_protocol::{GlesOpcode, GlesPacketIter};
    use pretty_assertions::assert_eq;

    use super::super::test_support::*;
    use super::*;
    use crate::api::BufferApi;

    #[test]
    fn pointer_checks_run_in_order() {
        let mut enc = encoder();
        let ptr = VertexPointer::Offset(0);
        enc.vertex_attrib_pointer(16, 4, GL_FLOAT, false, 0, ptr.clone());
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.vertex_attrib_pointer(0, 5, GL_FLOAT, false, 0, ptr.clone());
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.vertex_attrib_pointer(0, 4, GL_RGBA, false, 0, ptr.clone());
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        enc.vertex_attrib_pointer(0, 4, GL_FLOAT, false, -4, ptr.clone());
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.vertex_attrib_pointer(0, 3, GL_INT_2_10_10_10_REV, true, 0, ptr.clone());
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.vertex_attrib_i_pointer(0, 4, GL_FLOAT, 0, ptr);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        assert!(opcodes(&mut enc).is_empty());
    }

    #[test]
    fn buffer_pointers_are_forwarded_and_client_pointers_wait_for_a_draw() {
        let mut enc = encoder();
        enc.bind_buffer(GL_ARRAY_BUFFER, 4);
        enc.vertex_attrib_pointer(1, 3, GL_FLOAT, false, 0, VertexPointer::Offset(12));
        enc.bind_buffer(GL_ARRAY_BUFFER, 0);
        let bytes: Arc<[u8]> = Arc::from(vec![0u8; 24]);
        enc.vertex_attrib_pointer(2, 2, GL_FLOAT, false, 0, VertexPointer::Client(bytes.clone()));
        assert_eq!(take_error(&mut enc), None);
        assert_eq!(
            opcodes(&mut enc),
            vec![
                GlesOpcode::BindBuffer,
                GlesOpcode::VertexAttribPointerOffset,
                GlesOpcode::BindBuffer
            ]
        );

        let mut out = [0];
        enc.get_vertex_attribiv(1, GL_VERTEX_ATTRIB_ARRAY_BUFFER_BINDING, &mut out);
        assert_eq!(out, [4]);
        enc.get_vertex_attribiv(1, GL_VERTEX_ATTRIB_ARRAY_STRIDE, &mut out);
        assert_eq!(out, [0]);
        assert_eq!(
            enc.get_vertex_attrib_pointerv(2, GL_VERTEX_ATTRIB_ARRAY_POINTER),
            VertexPointer::Client(bytes)
        );
        assert_eq!(enc.transport().round_trips(), 0);
    }

    #[test]
    fn client_pointers_need_vao_zero_and_no_array_buffer() {
        let mut enc = encoder();
        let client = VertexPointer::Client(Arc::from(vec![0u8; 4]));
        enc.bind_buffer(GL_ARRAY_BUFFER, 4);
        enc.vertex_attrib_pointer(0, 1, GL_FLOAT, false, 0, client.clone());
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.bind_buffer(GL_ARRAY_BUFFER, 0);

        enc.transport_mut().push_reply_u32(5);
        let vaos = enc.gen_vertex_arrays(1);
        enc.bind_vertex_array(vaos[0]);
        enc.vertex_attrib_pointer(0, 1, GL_FLOAT, false, 0, client);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
    }

    #[test]
    fn vao_binding_is_checked_and_elided() {
        let mut enc = encoder();
        enc.bind_vertex_array(9);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        enc.transport_mut().push_reply_u32(3);
        assert_eq!(enc.gen_vertex_arrays(1), vec![3]);
        assert!(!enc.is_vertex_array(3));
        enc.bind_vertex_array(3);
        enc.bind_vertex_array(3);
        assert!(enc.is_vertex_array(3));
        enc.delete_vertex_arrays(&[3]);
        assert!(!enc.is_vertex_array(3));
        assert_eq!(enc.state().bound_vertex_array(), 0);
        assert_eq!(
            opcodes(&mut enc),
            vec![
                GlesOpcode::GenVertexArrays,
                GlesOpcode::BindVertexArray,
                GlesOpcode::DeleteVertexArrays
            ]
        );
    }

    #[test]
    fn separate_format_calls_need_a_vao() {
        let mut enc = encoder_es31();
        enc.vertex_attrib_format(0, 4, GL_FLOAT, false, 0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.bind_vertex_buffer(0, 2, 0, 16);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        enc.transport_mut().push_reply_u32(1);
        enc.gen_vertex_arrays(1);
        enc.bind_vertex_array(1);
        enc.bind_vertex_buffer(0, 2, -1, 16);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.bind_vertex_buffer(0, 2, 0, 4096);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));

        enc.vertex_attrib_format(3, 2, GL_SHORT, true, 8);
        enc.vertex_attrib_binding(3, 1);
        enc.bind_vertex_buffer(1, 2, 64, 16);
        enc.vertex_binding_divisor(1, 2);
        assert_eq!(take_error(&mut enc), None);

        let mut out = [0];
        enc.get_vertex_attribiv(3, GL_VERTEX_ATTRIB_RELATIVE_OFFSET, &mut out);
        assert_eq!(out, [8]);
        enc.get_vertex_attribiv(3, GL_VERTEX_ATTRIB_BINDING, &mut out);
        assert_eq!(out, [1]);
        enc.get_vertex_attribiv(3, GL_VERTEX_ATTRIB_ARRAY_DIVISOR, &mut out);
        assert_eq!(out, [2]);
        enc.get_vertex_attribiv(3, GL_VERTEX_ATTRIB_ARRAY_BUFFER_BINDING, &mut out);
        assert_eq!(out, [2]);
    }

    #[test]
    fn es31_pnames_are_rejected_on_es30() {
        let mut enc = encoder();
        let mut out = [0];
        enc.get_vertex_attribiv(0, GL_VERTEX_ATTRIB_RELATIVE_OFFSET, &mut out);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        enc.get_vertex_attribiv(0, GL_VERTEX_ATTRIB_ARRAY_INTEGER, &mut out);
        assert_eq!(take_error(&mut enc), None);
    }

    #[test]
    fn current_value_comes_from_the_host() {
        let mut enc = encoder();
        enc.transport_mut().push_reply_u32(GL_NO_ERROR);
        for v in [1.0f32, 2.0, 3.0, 4.0] {
            enc.transport_mut().push_reply_bytes(&v.to_le_bytes());
        }
        enc.transport_mut().push_reply_u32(GL_NO_ERROR);
        let mut out = [0.0f32; 4];
        enc.get_vertex_attribfv(0, GL_CURRENT_VERTEX_ATTRIB, &mut out);
        assert_eq!(out, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn generic_values_are_sent_as_float_vectors() {
        let mut enc = encoder();
        enc.vertex_attrib3f(2, 1.0, 2.0, 3.0);
        enc.vertex_attrib_nfv(2, &[]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        let bytes = sent(&mut enc);
        let packets: Vec<_> = GlesPacketIter::new(&bytes).map(Result::unwrap).collect();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].opcode(), Some(GlesOpcode::VertexAttribFv));
        let mut args = packets[0].args();
        assert_eq!(args.u32().unwrap(), 2);
        assert_eq!(args.f32s().unwrap(), vec![1.0, 2.0, 3.0]);
    }
}
