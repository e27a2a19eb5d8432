use aero_gles_protocol::gl::*;
use aero_gles_protocol::{GlesOpcode, Transport};

use super::ActiveInfo;
use crate::wire::{GlesWire, MAX_REPLY_STRING_BYTES};

/// `glUniform{1,2,3,4}{f,i,ui}` and their `v` forms, all funnelled into one core setter.
macro_rules! uniform_setters {
    ($core:ident, $elem:ty; $($scalar:ident, $vector:ident => $n:literal ($($arg:ident),+);)*) => {
        $(
            fn $scalar(&mut self, location: GLint, $($arg: $elem),+) {
                self.$core(location, $n, &[$($arg),+]);
            }

            fn $vector(&mut self, location: GLint, values: &[$elem]) {
                self.$core(location, $n, values);
            }
        )*
    };
}

macro_rules! uniform_matrices {
    ($($name:ident => $cols:literal x $rows:literal;)*) => {
        $(
            fn $name(&mut self, location: GLint, transpose: bool, values: &[GLfloat]) {
                self.uniform_matrix_f(location, $cols, $rows, transpose, values);
            }
        )*
    };
}

gles_family! {
    /// Shaders, programs, reflection and uniforms.
    pub trait ProgramApi {
        commands {
            fn delete_shader(shader: GLuint) = DeleteShader;
            fn compile_shader(shader: GLuint) = CompileShader;
            fn attach_shader(program: GLuint, shader: GLuint) = AttachShader;
            fn detach_shader(program: GLuint, shader: GLuint) = DetachShader;
            fn delete_program(program: GLuint) = DeleteProgram;
            fn link_program(program: GLuint) = LinkProgram;
            fn use_program(program: GLuint) = UseProgram;
            fn validate_program(program: GLuint) = ValidateProgram;
            fn bind_attrib_location(program: GLuint, index: GLuint, name: &str) = BindAttribLocation;
            fn uniform_block_binding(program: GLuint, block_index: GLuint, binding: GLuint) = UniformBlockBinding;
            fn transform_feedback_varyings(program: GLuint, varyings: &[&str], buffer_mode: GLenum) = TransformFeedbackVaryings;
            fn release_shader_compiler() = ReleaseShaderCompiler;
            /// `components` values per element; the element count is implied by the slice.
            fn uniform_f(location: GLint, components: u8, values: &[GLfloat]) = UniformFv;
            fn uniform_i(location: GLint, components: u8, values: &[GLint]) = UniformIv;
            fn uniform_ui(location: GLint, components: u8, values: &[GLuint]) = UniformUiv;
            fn uniform_matrix_f(location: GLint, columns: u8, rows: u8, transpose: bool, values: &[GLfloat]) = UniformMatrixFv;
        }
        returns {
            fn create_shader(ty: GLenum) -> GLuint = CreateShader;
            fn create_program() -> GLuint = CreateProgram;
            fn is_shader(shader: GLuint) -> bool = IsShader;
            fn is_program(program: GLuint) -> bool = IsProgram;
            fn get_attrib_location(program: GLuint, name: &str) -> GLint = GetAttribLocation;
            fn get_uniform_location(program: GLuint, name: &str) -> GLint = GetUniformLocation;
            fn get_uniform_block_index(program: GLuint, name: &str) -> GLuint = GetUniformBlockIndex;
        }
        outputs {
            fn get_shaderiv(shader: GLuint, pname: GLenum; out: &mut [GLint]) = GetShaderiv;
            fn get_programiv(program: GLuint, pname: GLenum; out: &mut [GLint]) = GetProgramiv;
            fn get_active_uniform_blockiv(
                program: GLuint,
                block_index: GLuint,
                pname: GLenum;
                out: &mut [GLint]
            ) = GetActiveUniformBlockiv;
            fn get_uniformfv(program: GLuint, location: GLint; out: &mut [GLfloat]) = GetUniformfv;
            fn get_uniformiv(program: GLuint, location: GLint; out: &mut [GLint]) = GetUniformiv;
            fn get_uniformuiv(program: GLuint, location: GLint; out: &mut [GLuint]) = GetUniformuiv;
        }
        uploads {}
        gens {}
        provided {
            fn shader_source(&mut self, shader: GLuint, sources: &[&str]) {
                self.wire().shader_string(shader, &sources.concat());
            }

            fn get_shader_source(&mut self, shader: GLuint) -> String {
                self.wire().call_string(GlesOpcode::GetShaderSource, &[&shader])
            }

            fn get_shader_info_log(&mut self, shader: GLuint) -> String {
                self.wire().call_string(GlesOpcode::GetShaderInfoLog, &[&shader])
            }

            fn get_program_info_log(&mut self, program: GLuint) -> String {
                self.wire().call_string(GlesOpcode::GetProgramInfoLog, &[&program])
            }

            /// Returns `(range, precision)`.
            fn get_shader_precision_format(
                &mut self,
                shader_type: GLenum,
                precision_type: GLenum,
            ) -> ([GLint; 2], GLint) {
                self.wire().shader_precision_format(shader_type, precision_type)
            }

            fn get_active_uniform(&mut self, program: GLuint, index: GLuint) -> ActiveInfo {
                self.wire().active_info(GlesOpcode::GetActiveUniform, program, index)
            }

            fn get_active_attrib(&mut self, program: GLuint, index: GLuint) -> ActiveInfo {
                self.wire().active_info(GlesOpcode::GetActiveAttrib, program, index)
            }

            fn get_transform_feedback_varying(&mut self, program: GLuint, index: GLuint) -> ActiveInfo {
                self.wire().active_info(GlesOpcode::GetTransformFeedbackVarying, program, index)
            }

            fn get_attached_shaders(&mut self, program: GLuint) -> Vec<GLuint> {
                self.wire().attached_shaders(program)
            }

            uniform_setters! {
                uniform_f, GLfloat;
                uniform1f, uniform1fv => 1 (x);
                uniform2f, uniform2fv => 2 (x, y);
                uniform3f, uniform3fv => 3 (x, y, z);
                uniform4f, uniform4fv => 4 (x, y, z, w);
            }

            uniform_setters! {
                uniform_i, GLint;
                uniform1i, uniform1iv => 1 (x);
                uniform2i, uniform2iv => 2 (x, y);
                uniform3i, uniform3iv => 3 (x, y, z);
                uniform4i, uniform4iv => 4 (x, y, z, w);
            }

            uniform_setters! {
                uniform_ui, GLuint;
                uniform1ui, uniform1uiv => 1 (x);
                uniform2ui, uniform2uiv => 2 (x, y);
                uniform3ui, uniform3uiv => 3 (x, y, z);
                uniform4ui, uniform4uiv => 4 (x, y, z, w);
            }

            uniform_matrices! {
                uniform_matrix2fv => 2 x 2;
                uniform_matrix3fv => 3 x 3;
                uniform_matrix4fv => 4 x 4;
                uniform_matrix2x3fv => 2 x 3;
                uniform_matrix3x2fv => 3 x 2;
                uniform_matrix2x4fv => 2 x 4;
                uniform_matrix4x2fv => 4 x 2;
                uniform_matrix3x4fv => 3 x 4;
                uniform_matrix4x3fv => 4 x 3;
            }
        }
    }
}

impl<T: Transport> GlesWire<T> {
    /// `ShaderString`: the whole source as one string.
    pub fn shader_string(&mut self, shader: GLuint, source: &str) {
        self.command(GlesOpcode::ShaderString, &[&shader, &source]);
    }

    /// Reply layout: `range_min`, `range_max`, `precision`, all `i32`.
    pub fn shader_precision_format(
        &mut self,
        shader_type: GLenum,
        precision_type: GLenum,
    ) -> ([GLint; 2], GLint) {
        let mut out = [0; 3];
        self.call_into(
            GlesOpcode::GetShaderPrecisionFormat,
            &[&shader_type, &precision_type],
            &mut out,
        );
        ([out[0], out[1]], out[2])
    }

    /// Reply layout: `size: i32`, `type: u32`, then a length-prefixed name.
    pub fn active_info(&mut self, op: GlesOpcode, program: GLuint, index: GLuint) -> ActiveInfo {
        self.command(op, &[&program, &index]);
        let size = self.read_scalar();
        let ty = self.read_scalar();
        let name = self.read_string();
        ActiveInfo { size, ty, name }
    }

    /// Reply layout: `count: u32`, then `count` names.
    pub fn attached_shaders(&mut self, program: GLuint) -> Vec<GLuint> {
        self.command(GlesOpcode::GetAttachedShaders, &[&program]);
        let count: u32 = self.read_scalar();
        let mut names = vec![0; count.min(MAX_REPLY_STRING_BYTES / 4) as usize];
        self.read_scalars(&mut names);
        names
    }
}
