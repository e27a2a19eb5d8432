use aero_gles_protocol::gl::*;
use aero_gles_protocol::GlesOpcode;

gles_family! {
    /// Fixed-function state, errors and the generic `Get*` queries.
    pub trait StateApi {
        commands {
            fn blend_color(red: GLfloat, green: GLfloat, blue: GLfloat, alpha: GLfloat) = BlendColor;
            fn blend_equation(mode: GLenum) = BlendEquation;
            fn blend_equation_separate(mode_rgb: GLenum, mode_alpha: GLenum) = BlendEquationSeparate;
            fn blend_func(sfactor: GLenum, dfactor: GLenum) = BlendFunc;
            fn blend_func_separate(src_rgb: GLenum, dst_rgb: GLenum, src_alpha: GLenum, dst_alpha: GLenum) = BlendFuncSeparate;
            fn clear(mask: GLbitfield) = Clear;
            fn clear_color(red: GLfloat, green: GLfloat, blue: GLfloat, alpha: GLfloat) = ClearColor;
            fn clear_depthf(depth: GLfloat) = ClearDepthf;
            fn clear_stencil(s: GLint) = ClearStencil;
            fn color_mask(red: bool, green: bool, blue: bool, alpha: bool) = ColorMask;
            fn cull_face(mode: GLenum) = CullFace;
            fn depth_func(func: GLenum) = DepthFunc;
            fn depth_mask(flag: bool) = DepthMask;
            fn depth_rangef(near: GLfloat, far: GLfloat) = DepthRangef;
            fn front_face(mode: GLenum) = FrontFace;
            fn hint(target: GLenum, mode: GLenum) = Hint;
            fn line_width(width: GLfloat) = LineWidth;
            fn polygon_offset(factor: GLfloat, units: GLfloat) = PolygonOffset;
            fn sample_coverage(value: GLfloat, invert: bool) = SampleCoverage;
            fn scissor(x: GLint, y: GLint, width: GLsizei, height: GLsizei) = Scissor;
            fn viewport(x: GLint, y: GLint, width: GLsizei, height: GLsizei) = Viewport;
            fn enable(cap: GLenum) = Enable;
            fn disable(cap: GLenum) = Disable;
            fn pixel_storei(pname: GLenum, param: GLint) = PixelStorei;
            fn stencil_func(func: GLenum, reference: GLint, mask: GLuint) = StencilFunc;
            fn stencil_func_separate(face: GLenum, func: GLenum, reference: GLint, mask: GLuint) = StencilFuncSeparate;
            fn stencil_mask(mask: GLuint) = StencilMask;
            fn stencil_mask_separate(face: GLenum, mask: GLuint) = StencilMaskSeparate;
            fn stencil_op(fail: GLenum, zfail: GLenum, zpass: GLenum) = StencilOp;
            fn stencil_op_separate(face: GLenum, fail: GLenum, zfail: GLenum, zpass: GLenum) = StencilOpSeparate;
            fn clear_bufferiv(buffer: GLenum, drawbuffer: GLint, value: &[GLint]) = ClearBufferiv;
            fn clear_bufferuiv(buffer: GLenum, drawbuffer: GLint, value: &[GLuint]) = ClearBufferuiv;
            fn clear_bufferfv(buffer: GLenum, drawbuffer: GLint, value: &[GLfloat]) = ClearBufferfv;
            fn clear_bufferfi(buffer: GLenum, drawbuffer: GLint, depth: GLfloat, stencil: GLint) = ClearBufferfi;
        }
        returns {
            fn is_enabled(cap: GLenum) -> bool = IsEnabled;
            fn get_error() -> GLenum = GetError;
        }
        outputs {
            fn get_integerv(pname: GLenum; out: &mut [GLint]) = GetIntegerv;
            fn get_floatv(pname: GLenum; out: &mut [GLfloat]) = GetFloatv;
            fn get_booleanv(pname: GLenum; out: &mut [GLboolean]) = GetBooleanv;
            fn get_integer64v(pname: GLenum; out: &mut [GLint64]) = GetInteger64v;
            fn get_integeri_v(target: GLenum, index: GLuint; out: &mut [GLint]) = GetIntegeriv;
            fn get_integer64i_v(target: GLenum, index: GLuint; out: &mut [GLint64]) = GetInteger64iv;
            fn get_internalformativ(
                target: GLenum,
                internal_format: GLenum,
                pname: GLenum;
                out: &mut [GLint]
            ) = GetInternalformativ;
        }
        uploads {}
        gens {}
        provided {
            /// Pushes everything pending to the host.
            fn flush(&mut self) {
                let wire = self.wire();
                wire.command(GlesOpcode::Flush, &[]);
                wire.flush();
            }

            fn finish(&mut self) {
                let wire = self.wire();
                wire.command(GlesOpcode::Finish, &[]);
                wire.flush();
            }

            fn get_string(&mut self, name: GLenum) -> String {
                self.wire().call_string(GlesOpcode::GetString, &[&name])
            }

            fn get_stringi(&mut self, name: GLenum, index: GLuint) -> String {
                self.wire().call_string(GlesOpcode::GetStringi, &[&name, &index])
            }
        }
    }
}
