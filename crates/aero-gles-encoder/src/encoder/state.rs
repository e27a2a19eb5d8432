//! Capabilities, pixel store, stencil, clears, errors and the generic `Get*` queries.

use aero_gles_protocol::gl::*;
use aero_gles_protocol::{GlesOpcode, Transport};
use aero_gles_state::format;
use aero_gles_state::{fail_if, GlError, GlResult};
use tracing::debug;

use super::Gl2Encoder;
use crate::api::StateApi;
use crate::limits::limit_value_count;
use crate::wire::{GlesWire, WireScalar};

const CLEAR_MASK_BITS: GLbitfield = GL_COLOR_BUFFER_BIT | GL_DEPTH_BUFFER_BIT | GL_STENCIL_BUFFER_BIT;

fn is_compare_func(func: GLenum) -> bool {
    (GL_NEVER..=GL_ALWAYS).contains(&func)
}

fn is_stencil_op(op: GLenum) -> bool {
    matches!(
        op,
        GL_KEEP | GL_ZERO | GL_REPLACE | GL_INCR | GL_DECR | GL_INVERT | GL_INCR_WRAP | GL_DECR_WRAP
    )
}

fn publish<R: Copy>(out: &mut [R], values: &[GLint], from_int: impl Fn(GLint) -> R) {
    for (slot, &v) in out.iter_mut().zip(values) {
        *slot = from_int(v);
    }
}

impl<T: Transport> Gl2Encoder<T> {
    /// Integer answer for `pname` without a round trip, when one is known.
    fn local_integers(&self, pname: GLenum) -> GlResult<Option<Vec<GLint>>> {
        if let Some(v) = self.state.get_integer(pname) {
            return Ok(Some(vec![v]));
        }
        if self.limits.is_limit(pname) {
            self.limits.check(pname)?;
            return Ok(self.limits.lookup(pname));
        }
        Ok(None)
    }

    /// Asks the host for a limit once and caches the answer.
    fn fetch_limit(&mut self, pname: GLenum) -> Option<Vec<GLint>> {
        let mut values = vec![0; limit_value_count(pname)];
        if !self.host_query_accepted(|w| w.get_integerv(pname, &mut values)) {
            debug!(pname, "limit query failed");
            return None;
        }
        debug!(pname, ?values, "limit cached");
        self.limits.store(pname, &values);
        Some(values)
    }

    fn try_get<R: WireScalar>(
        &mut self,
        pname: GLenum,
        out: &mut [R],
        from_int: impl Fn(GLint) -> R,
        query: impl FnOnce(&mut GlesWire<T>, GLenum, &mut [R]),
    ) -> GlResult {
        if let Some(values) = self.local_integers(pname)? {
            publish(out, &values, from_int);
            return Ok(());
        }
        if self.limits.is_limit(pname) {
            if let Some(values) = self.fetch_limit(pname) {
                publish(out, &values, from_int);
            }
            return Ok(());
        }
        self.safe_host_query(out, |w, o| query(w, pname, o));
        Ok(())
    }

    /// Indexed queries the shadow can answer; `None` sends the query to the host.
    fn local_indexed(&self, target: GLenum, index: GLuint) -> GlResult<Option<i64>> {
        if let Some(v) = self.state.indexed_buffer_query(target, index)? {
            return Ok(Some(v));
        }
        if !self.state.is_es31() {
            return Ok(None);
        }
        let index = usize::try_from(index).map_err(|_| GlError::InvalidValue)?;
        self.state.vertex_binding_query(target, index)
    }

    fn try_pixel_storei(&mut self, pname: GLenum, param: GLint) -> GlResult {
        fail_if(
            !self.state.is_es3() && !matches!(pname, GL_UNPACK_ALIGNMENT | GL_PACK_ALIGNMENT),
            GlError::InvalidEnum,
        )?;
        self.state.pixel_store.set(pname, param)?;
        self.wire.pixel_storei(pname, param);
        Ok(())
    }

    fn check_stencil_func(&mut self, face: GLenum, func: GLenum, reference: GLint, mask: GLuint) -> GlResult {
        fail_if(!is_compare_func(func), GlError::InvalidEnum)?;
        self.state.stencil.func(face, func, reference, mask)
    }

    fn check_stencil_op(&mut self, face: GLenum, fail: GLenum, zfail: GLenum, zpass: GLenum) -> GlResult {
        fail_if(
            ![fail, zfail, zpass].into_iter().all(is_stencil_op),
            GlError::InvalidEnum,
        )?;
        self.state.stencil.op(face, fail, zfail, zpass)
    }

    /// `ClearBuffer*` checks. `allowed` lists the buffers the variant accepts; `len` is the
    /// number of values supplied.
    fn check_clear_buffer(
        &mut self,
        buffer: GLenum,
        drawbuffer: GLint,
        len: usize,
        allowed: &[GLenum],
    ) -> GlResult {
        fail_if(!allowed.contains(&buffer), GlError::InvalidEnum)?;
        let (draw_buffers, needed) = match buffer {
            GL_COLOR => (self.state.caps().max_draw_buffers, 4),
            _ => (1, 1),
        };
        fail_if(
            drawbuffer < 0 || drawbuffer >= draw_buffers,
            GlError::InvalidValue,
        )?;
        fail_if(len < needed, GlError::InvalidValue)?;
        self.check_framebuffer_complete(GL_DRAW_FRAMEBUFFER)
    }

    fn try_get_internalformativ(
        &mut self,
        target: GLenum,
        internal_format: GLenum,
        pname: GLenum,
        out: &mut [GLint],
    ) -> GlResult {
        let multisample_texture = target == GL_TEXTURE_2D_MULTISAMPLE && self.state.is_es31();
        fail_if(
            target != GL_RENDERBUFFER && !multisample_texture,
            GlError::InvalidEnum,
        )?;
        fail_if(
            !format::is_renderbuffer_format(internal_format, self.state.caps().format_caps),
            GlError::InvalidEnum,
        )?;
        fail_if(
            !matches!(pname, GL_SAMPLES | GL_NUM_SAMPLE_COUNTS),
            GlError::InvalidEnum,
        )?;
        self.safe_host_query(out, |w, o| {
            w.get_internalformativ(target, internal_format, pname, o)
        });
        Ok(())
    }
}

impl<T: Transport> StateApi for Gl2Encoder<T> {
    fn enable(&mut self, cap: GLenum) {
        self.guarded("glEnable", |e| {
            e.state.set_capability(cap, true)?;
            e.wire.enable(cap);
            Ok(())
        })
    }

    fn disable(&mut self, cap: GLenum) {
        self.guarded("glDisable", |e| {
            e.state.set_capability(cap, false)?;
            e.wire.disable(cap);
            Ok(())
        })
    }

    fn is_enabled(&mut self, cap: GLenum) -> bool {
        self.guarded("glIsEnabled", |e| {
            fail_if(!e.state.is_valid_capability(cap), GlError::InvalidEnum)?;
            Ok(match e.state.capability(cap) {
                Some(enabled) => enabled,
                None => e.wire.is_enabled(cap),
            })
        })
    }

    fn pixel_storei(&mut self, pname: GLenum, param: GLint) {
        self.guarded("glPixelStorei", |e| e.try_pixel_storei(pname, param))
    }

    /// The client register is reported first. Reading it also drains the host flag, which is
    /// kept for the next call.
    fn get_error(&mut self) -> GLenum {
        let Some(err) = self.errors.take() else {
            return self.wire.get_error();
        };
        let host_error: GLenum = self.wire.get_error();
        self.errors.record_gl(host_error);
        err.to_gl()
    }

    fn clear(&mut self, mask: GLbitfield) {
        self.guarded("glClear", |e| {
            fail_if(mask & !CLEAR_MASK_BITS != 0, GlError::InvalidValue)?;
            e.check_framebuffer_complete(GL_DRAW_FRAMEBUFFER)?;
            e.wire.clear(mask);
            Ok(())
        })
    }

    fn clear_bufferiv(&mut self, buffer: GLenum, drawbuffer: GLint, value: &[GLint]) {
        self.guarded("glClearBufferiv", |e| {
            e.check_clear_buffer(buffer, drawbuffer, value.len(), &[GL_COLOR, GL_STENCIL])?;
            e.wire.clear_bufferiv(buffer, drawbuffer, value);
            Ok(())
        })
    }

    fn clear_bufferuiv(&mut self, buffer: GLenum, drawbuffer: GLint, value: &[GLuint]) {
        self.guarded("glClearBufferuiv", |e| {
            e.check_clear_buffer(buffer, drawbuffer, value.len(), &[GL_COLOR])?;
            e.wire.clear_bufferuiv(buffer, drawbuffer, value);
            Ok(())
        })
    }

    fn clear_bufferfv(&mut self, buffer: GLenum, drawbuffer: GLint, value: &[GLfloat]) {
        self.guarded("glClearBufferfv", |e| {
            e.check_clear_buffer(buffer, drawbuffer, value.len(), &[GL_COLOR, GL_DEPTH])?;
            e.wire.clear_bufferfv(buffer, drawbuffer, value);
            Ok(())
        })
    }

    fn clear_bufferfi(&mut self, buffer: GLenum, drawbuffer: GLint, depth: GLfloat, stencil: GLint) {
        self.guarded("glClearBufferfi", |e| {
            e.check_clear_buffer(buffer, drawbuffer, 1, &[GL_DEPTH_STENCIL])?;
            e.wire.clear_bufferfi(buffer, drawbuffer, depth, stencil);
            Ok(())
        })
    }

    fn stencil_func(&mut self, func: GLenum, reference: GLint, mask: GLuint) {
        self.guarded("glStencilFunc", |e| {
            e.check_stencil_func(GL_FRONT_AND_BACK, func, reference, mask)?;
            e.wire.stencil_func(func, reference, mask);
            Ok(())
        })
    }

    fn stencil_func_separate(&mut self, face: GLenum, func: GLenum, reference: GLint, mask: GLuint) {
        self.guarded("glStencilFuncSeparate", |e| {
            e.check_stencil_func(face, func, reference, mask)?;
            e.wire.stencil_func_separate(face, func, reference, mask);
            Ok(())
        })
    }

    fn stencil_mask(&mut self, mask: GLuint) {
        self.guarded("glStencilMask", |e| {
            e.state.stencil.mask(GL_FRONT_AND_BACK, mask)?;
            e.wire.stencil_mask(mask);
            Ok(())
        })
    }

    fn stencil_mask_separate(&mut self, face: GLenum, mask: GLuint) {
        self.guarded("glStencilMaskSeparate", |e| {
            e.state.stencil.mask(face, mask)?;
            e.wire.stencil_mask_separate(face, mask);
            Ok(())
        })
    }

    fn stencil_op(&mut self, fail: GLenum, zfail: GLenum, zpass: GLenum) {
        self.guarded("glStencilOp", |e| {
            e.check_stencil_op(GL_FRONT_AND_BACK, fail, zfail, zpass)?;
            e.wire.stencil_op(fail, zfail, zpass);
            Ok(())
        })
    }

    fn stencil_op_separate(&mut self, face: GLenum, fail: GLenum, zfail: GLenum, zpass: GLenum) {
        self.guarded("glStencilOpSeparate", |e| {
            e.check_stencil_op(face, fail, zfail, zpass)?;
            e.wire.stencil_op_separate(face, fail, zfail, zpass);
            Ok(())
        })
    }

    fn get_integerv(&mut self, pname: GLenum, out: &mut [GLint]) {
        self.guarded("glGetIntegerv", |e| {
            e.try_get(pname, out, |v| v, |w, p, o| w.get_integerv(p, o))
        })
    }

    fn get_floatv(&mut self, pname: GLenum, out: &mut [GLfloat]) {
        self.guarded("glGetFloatv", |e| {
            e.try_get(pname, out, |v| v as GLfloat, |w, p, o| w.get_floatv(p, o))
        })
    }

    fn get_booleanv(&mut self, pname: GLenum, out: &mut [GLboolean]) {
        self.guarded("glGetBooleanv", |e| {
            e.try_get(
                pname,
                out,
                |v| GLboolean::from(v != 0),
                |w, p, o| w.get_booleanv(p, o),
            )
        })
    }

    fn get_integer64v(&mut self, pname: GLenum, out: &mut [GLint64]) {
        self.guarded("glGetInteger64v", |e| {
            e.try_get(pname, out, GLint64::from, |w, p, o| w.get_integer64v(p, o))
        })
    }

    fn get_integeri_v(&mut self, target: GLenum, index: GLuint, out: &mut [GLint]) {
        self.guarded("glGetIntegeri_v", |e| {
            match e.local_indexed(target, index)? {
                Some(v) => {
                    if let Some(slot) = out.first_mut() {
                        *slot = GLint::try_from(v).unwrap_or(GLint::MAX);
                    }
                }
                None => e.safe_host_query(out, |w, o| w.get_integeri_v(target, index, o)),
            }
            Ok(())
        })
    }

    fn get_integer64i_v(&mut self, target: GLenum, index: GLuint, out: &mut [GLint64]) {
        self.guarded("glGetInteger64i_v", |e| {
            match e.local_indexed(target, index)? {
                Some(v) => {
                    if let Some(slot) = out.first_mut() {
                        *slot = v;
                    }
                }
                None => e.safe_host_query(out, |w, o| w.get_integer64i_v(target, index, o)),
            }
            Ok(())
        })
    }

    fn get_internalformativ(
        &mut self,
        target: GLenum,
        internal_format: GLenum,
        pname: GLenum,
        out: &mut [GLint],
    ) {
        self.guarded("glGetInternalformativ", |e| {
            e.try_get_internalformativ(target, internal_format, pname, out)
        })
    }

    fn get_string(&mut self, name: GLenum) -> String {
        self.guarded("glGetString", |e| match name {
            GL_EXTENSIONS => Ok(e.state.extensions().join(" ")),
            GL_VENDOR | GL_RENDERER | GL_VERSION | GL_SHADING_LANGUAGE_VERSION => {
                Ok(e.wire.call_string(GlesOpcode::GetString, &[&name]))
            }
            _ => Err(GlError::InvalidEnum),
        })
    }

    fn get_stringi(&mut self, name: GLenum, index: GLuint) -> String {
        self.guarded("glGetStringi", |e| {
            fail_if(name != GL_EXTENSIONS, GlError::InvalidEnum)?;
            let index = usize::try_from(index).map_err(|_| GlError::InvalidValue)?;
            e.state
                .extensions()
                .get(index)
                .cloned()
                .ok_or(GlError::InvalidValue)
        })
    }
}

#[cfg(test)]
mod tests {
    use aero_gles_protocol::GlesOpcode;
    use pretty_assertions::assert_eq;

    use super::super::test_support::*;
    use super::*;
    use crate::api::{BufferApi, FramebufferApi};
    use crate::config::EncoderConfig;

    #[test]
    fn stencil_setters_feed_the_local_queries() {
        let mut enc = encoder();
        enc.stencil_func_separate(GL_BACK, GL_EQUAL, 3, 0xF);
        enc.stencil_op(GL_KEEP, GL_INCR_WRAP, GL_REPLACE);
        enc.stencil_func(0x1234, 0, 0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        enc.stencil_mask_separate(0x1234, 0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));

        let mut out = [0];
        enc.get_integerv(GL_STENCIL_BACK_REF, &mut out);
        assert_eq!(out, [3]);
        enc.get_integerv(GL_STENCIL_PASS_DEPTH_FAIL, &mut out);
        assert_eq!(out, [GL_INCR_WRAP as GLint]);
        enc.get_integerv(GL_STENCIL_BACK_FUNC, &mut out);
        assert_eq!(out, [GL_EQUAL as GLint]);
        assert_eq!(
            opcodes(&mut enc),
            vec![GlesOpcode::StencilFuncSeparate, GlesOpcode::StencilOp]
        );
    }

    #[test]
    fn uncached_limits_are_fetched_once() {
        let mut enc = encoder();
        enc.transport_mut().push_reply_u32(GL_NO_ERROR);
        enc.transport_mut().push_reply_i32(15);
        enc.transport_mut().push_reply_u32(GL_NO_ERROR);

        let mut out = [0];
        enc.get_integerv(GL_MAX_VARYING_VECTORS, &mut out);
        assert_eq!(out, [15]);
        let mut f = [0.0f32];
        enc.get_floatv(GL_MAX_VARYING_VECTORS, &mut f);
        assert_eq!(f, [15.0]);
        let mut b = [0u8];
        enc.get_booleanv(GL_MAX_TEXTURE_SIZE, &mut b);
        assert_eq!(b, [GL_TRUE]);

        assert_eq!(
            opcodes(&mut enc),
            vec![GlesOpcode::GetError, GlesOpcode::GetIntegerv, GlesOpcode::GetError]
        );
        assert_eq!(take_error(&mut enc), None);
    }

    #[test]
    fn newer_limits_are_invalid_on_older_contexts() {
        let mut enc = encoder_with(EncoderConfig::default().with_version(2, 0));
        let mut out = [9];
        enc.get_integerv(GL_MAX_3D_TEXTURE_SIZE, &mut out);
        assert_eq!(out, [9]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        enc.pixel_storei(GL_UNPACK_ROW_LENGTH, 4);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        assert!(opcodes(&mut enc).is_empty());
    }

    #[test]
    fn client_errors_are_reported_before_host_errors() {
        let mut enc = encoder();
        enc.bind_buffer(0xDEAD, 1);
        enc.transport_mut()
            .push_reply_u32s(&[GL_OUT_OF_MEMORY, GL_NO_ERROR, GL_NO_ERROR]);
        assert_eq!(enc.get_error(), GL_INVALID_ENUM);
        assert_eq!(enc.get_error(), GL_OUT_OF_MEMORY);
        assert_eq!(enc.get_error(), GL_NO_ERROR);
    }

    #[test]
    fn extension_strings_come_from_the_config() {
        let mut enc = encoder_with(EncoderConfig {
            extensions: vec![
                "GL_OES_EGL_image_external".to_string(),
                "GL_EXT_color_buffer_float".to_string(),
            ],
            ..EncoderConfig::default()
        });
        assert_eq!(enc.get_stringi(GL_EXTENSIONS, 1), "GL_EXT_color_buffer_float");
        assert_eq!(enc.get_stringi(GL_EXTENSIONS, 2), "");
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        assert_eq!(
            enc.get_string(GL_EXTENSIONS),
            "GL_OES_EGL_image_external GL_EXT_color_buffer_float"
        );
        let mut n = [0];
        enc.get_integerv(GL_NUM_EXTENSIONS, &mut n);
        assert_eq!(n, [2]);
        assert!(opcodes(&mut enc).is_empty());
    }

    #[test]
    fn pixel_store_is_checked_and_shadowed() {
        let mut enc = encoder();
        enc.pixel_storei(GL_UNPACK_ALIGNMENT, 3);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.pixel_storei(GL_PACK_SKIP_ROWS, -1);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.pixel_storei(0x1234, 1);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));

        enc.pixel_storei(GL_UNPACK_ALIGNMENT, 1);
        let mut out = [0];
        enc.get_integerv(GL_UNPACK_ALIGNMENT, &mut out);
        assert_eq!(out, [1]);
        assert_eq!(opcodes(&mut enc), vec![GlesOpcode::PixelStorei]);
    }

    #[test]
    fn tracked_capabilities_are_answered_locally() {
        let mut enc = encoder();
        enc.enable(GL_STENCIL_TEST);
        assert!(enc.is_enabled(GL_STENCIL_TEST));
        enc.enable(0x1234);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        assert!(!enc.is_enabled(0x1234));
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));

        enc.transport_mut().push_reply_u32(1);
        assert!(enc.is_enabled(GL_BLEND));
        assert_eq!(
            opcodes(&mut enc),
            vec![GlesOpcode::Enable, GlesOpcode::IsEnabled]
        );
    }

    #[test]
    fn clears_need_a_complete_framebuffer() {
        let mut enc = encoder();
        enc.clear(GL_COLOR_BUFFER_BIT | 0x8);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.clear(GL_COLOR_BUFFER_BIT | GL_DEPTH_BUFFER_BIT);

        enc.transport_mut().push_reply_u32(6);
        let fbo = enc.gen_framebuffers(1)[0];
        enc.bind_framebuffer(GL_FRAMEBUFFER, fbo);
        clear(&mut enc);
        enc.clear(GL_COLOR_BUFFER_BIT);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidFramebufferOperation));
        enc.clear_bufferfv(GL_COLOR, 0, &[0.0; 4]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidFramebufferOperation));
        assert!(opcodes(&mut enc).is_empty());
    }

    #[test]
    fn clear_buffer_arguments_are_checked() {
        let mut enc = encoder();
        enc.clear_bufferiv(GL_DEPTH, 0, &[0]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        enc.clear_bufferfv(GL_COLOR, 99, &[0.0; 4]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.clear_bufferiv(GL_COLOR, 0, &[0; 3]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.clear_bufferiv(GL_STENCIL, 1, &[0]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));

        enc.clear_bufferuiv(GL_COLOR, 1, &[0; 4]);
        enc.clear_bufferfi(GL_DEPTH_STENCIL, 0, 1.0, 0);
        assert_eq!(
            opcodes(&mut enc),
            vec![GlesOpcode::ClearBufferuiv, GlesOpcode::ClearBufferfi]
        );
    }

    #[test]
    fn indexed_bindings_are_answered_locally() {
        let mut enc = encoder();
        let mut out = [7];
        enc.get_integeri_v(GL_UNIFORM_BUFFER_BINDING, 0, &mut out);
        assert_eq!(out, [0]);
        enc.get_integeri_v(GL_UNIFORM_BUFFER_BINDING, 1000, &mut out);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        assert!(opcodes(&mut enc).is_empty());
    }

    #[test]
    fn internal_format_queries_are_restricted_to_renderable_formats() {
        let mut enc = encoder();
        let mut out = [0];
        enc.get_internalformativ(GL_TEXTURE_2D, GL_RGBA8, GL_SAMPLES, &mut out);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        enc.get_internalformativ(GL_RENDERBUFFER, GL_RGB, GL_SAMPLES, &mut out);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));

        enc.transport_mut().push_reply_u32(GL_NO_ERROR);
        enc.transport_mut().push_reply_i32(2);
        enc.transport_mut().push_reply_u32(GL_NO_ERROR);
        enc.get_internalformativ(GL_RENDERBUFFER, GL_RGBA8, GL_NUM_SAMPLE_COUNTS, &mut out);
        assert_eq!(out, [2]);
    }
}
