//! Shaders, programs and uniforms.
//!
//! Every successful `LinkProgram` is followed by a reflection pass: link status, the active
//! uniforms and attributes with their locations, and on ES 3 the uniform block and transform
//! feedback varying counts. Uniform setters, `GetActive*` and most `GetProgramiv` queries are
//! then answered or checked from that snapshot.

use std::sync::Arc;

use aero_gles_protocol::gl::*;
use aero_gles_protocol::{GlesOpcode, Transport};
use aero_gles_state::{
    fail_if, ActiveVariable, GlError, GlResult, ProgramRef, SamplerUniform, ShaderRef,
    UniformSetter,
};
use tracing::{debug, warn};

use super::Gl2Encoder;
use crate::api::{ActiveInfo, ProgramApi};
use crate::shader_rewrite::rewrite_external_samplers;
use crate::wire::GlesWire;

/// Upper bound on the variables one reflection pass asks the host about.
const MAX_ACTIVE_VARIABLES: GLint = 4096;

fn is_shader_pname(pname: GLenum) -> bool {
    matches!(
        pname,
        GL_SHADER_TYPE
            | GL_DELETE_STATUS
            | GL_COMPILE_STATUS
            | GL_INFO_LOG_LENGTH
            | GL_SHADER_SOURCE_LENGTH
    )
}

fn is_uniform_block_pname(pname: GLenum) -> bool {
    matches!(
        pname,
        GL_UNIFORM_BLOCK_BINDING
            | GL_UNIFORM_BLOCK_DATA_SIZE
            | GL_UNIFORM_BLOCK_NAME_LENGTH
            | GL_UNIFORM_BLOCK_ACTIVE_UNIFORMS
            | GL_UNIFORM_BLOCK_ACTIVE_UNIFORM_INDICES
            | GL_UNIFORM_BLOCK_REFERENCED_BY_VERTEX_SHADER
            | GL_UNIFORM_BLOCK_REFERENCED_BY_FRAGMENT_SHADER
    )
}

fn is_precision_type(ty: GLenum) -> bool {
    matches!(
        ty,
        GL_LOW_FLOAT | GL_MEDIUM_FLOAT | GL_HIGH_FLOAT | GL_LOW_INT | GL_MEDIUM_INT | GL_HIGH_INT
    )
}

fn active_info(v: &ActiveVariable) -> ActiveInfo {
    ActiveInfo {
        size: v.size,
        ty: v.ty,
        name: v.name.clone(),
    }
}

impl<T: Transport> Gl2Encoder<T> {
    fn is_shader_type(&self, ty: GLenum) -> bool {
        match ty {
            GL_VERTEX_SHADER | GL_FRAGMENT_SHADER => true,
            GL_COMPUTE_SHADER => self.state.is_es31(),
            _ => false,
        }
    }

    fn is_program_pname(&self, pname: GLenum) -> bool {
        match pname {
            GL_DELETE_STATUS
            | GL_LINK_STATUS
            | GL_VALIDATE_STATUS
            | GL_INFO_LOG_LENGTH
            | GL_ATTACHED_SHADERS
            | GL_ACTIVE_ATTRIBUTES
            | GL_ACTIVE_ATTRIBUTE_MAX_LENGTH
            | GL_ACTIVE_UNIFORMS
            | GL_ACTIVE_UNIFORM_MAX_LENGTH => true,
            GL_ACTIVE_UNIFORM_BLOCKS
            | GL_ACTIVE_UNIFORM_BLOCK_MAX_NAME_LENGTH
            | GL_TRANSFORM_FEEDBACK_BUFFER_MODE
            | GL_TRANSFORM_FEEDBACK_VARYINGS
            | GL_TRANSFORM_FEEDBACK_VARYING_MAX_LENGTH
            | GL_PROGRAM_BINARY_RETRIEVABLE_HINT
            | GL_PROGRAM_BINARY_LENGTH => self.state.is_es3(),
            GL_COMPUTE_WORK_GROUP_SIZE | GL_PROGRAM_SEPARABLE | GL_ACTIVE_ATOMIC_COUNTER_BUFFERS => {
                self.state.is_es31()
            }
            _ => false,
        }
    }

    /// `INVALID_VALUE` for a name that is neither kind, `INVALID_OPERATION` for a shader.
    fn check_program(&self, program: GLuint) -> GlResult<ProgramRef> {
        let share = self.state.share_group();
        fail_if(!share.is_shader_or_program(program), GlError::InvalidValue)?;
        share.program(program).ok_or(GlError::InvalidOperation)
    }

    fn check_shader(&self, shader: GLuint) -> GlResult<ShaderRef> {
        let share = self.state.share_group();
        fail_if(!share.is_shader_or_program(shader), GlError::InvalidValue)?;
        share.shader(shader).ok_or(GlError::InvalidOperation)
    }

    fn check_linked_program(&self, program: GLuint) -> GlResult<ProgramRef> {
        let record = self.check_program(program)?;
        fail_if(!record.read().linked, GlError::InvalidOperation)?;
        Ok(record)
    }

    fn try_attach_shader(&mut self, program: GLuint, shader: GLuint, attach: bool) -> GlResult {
        let share = self.state.share_group();
        fail_if(
            !share.is_shader_or_program(program) || !share.is_shader_or_program(shader),
            GlError::InvalidValue,
        )?;
        fail_if(
            !share.is_program(program) || !share.is_shader(shader),
            GlError::InvalidOperation,
        )?;
        let done = if attach {
            share.attach_shader(program, shader)
        } else {
            share.detach_shader(program, shader)
        };
        fail_if(!done, GlError::InvalidOperation)?;
        if attach {
            self.wire.attach_shader(program, shader);
        } else {
            self.wire.detach_shader(program, shader);
        }
        Ok(())
    }

    fn try_shader_source(&mut self, shader: GLuint, sources: &[&str]) -> GlResult {
        let record = self.check_shader(shader)?;
        let (text, external) = rewrite_external_samplers(&sources.concat());
        if !external.is_empty() {
            debug!(shader, ?external, "external samplers lowered to sampler2D");
        }
        {
            let mut s = record.write();
            s.sources = sources.iter().map(|s| (*s).to_owned()).collect();
            s.external_samplers = external;
        }
        self.wire.shader_string(shader, &text);
        Ok(())
    }

    fn program_param(&mut self, program: GLuint, pname: GLenum) -> GLint {
        let mut v = [0];
        self.wire.get_programiv(program, pname, &mut v);
        v[0]
    }

    /// Asks the host for every active uniform or attribute and its location.
    fn reflect_variables(
        &mut self,
        program: GLuint,
        count_pname: GLenum,
        op: GlesOpcode,
        locate: fn(&mut GlesWire<T>, GLuint, &str) -> GLint,
    ) -> Vec<ActiveVariable> {
        let reported = self.program_param(program, count_pname);
        if reported > MAX_ACTIVE_VARIABLES {
            warn!(program, count_pname, reported, "host reported too many active variables");
        }
        let count = reported.clamp(0, MAX_ACTIVE_VARIABLES) as GLuint;
        (0..count)
            .map(|index| {
                let info = self.wire.active_info(op, program, index);
                let location = locate(&mut self.wire, program, &info.name);
                ActiveVariable {
                    name: info.name,
                    size: info.size,
                    ty: info.ty,
                    location,
                }
            })
            .collect()
    }

    /// Rebuilds the program's reflection snapshot after a link.
    fn reflect_program(&mut self, program: GLuint, record: &ProgramRef) {
        if self.program_param(program, GL_LINK_STATUS) == 0 {
            debug!(program, "link failed");
            record.write().mark_link_failed();
            return;
        }
        let uniforms = self.reflect_variables(
            program,
            GL_ACTIVE_UNIFORMS,
            GlesOpcode::GetActiveUniform,
            GlesWire::get_uniform_location,
        );
        let attribs = self.reflect_variables(
            program,
            GL_ACTIVE_ATTRIBUTES,
            GlesOpcode::GetActiveAttrib,
            GlesWire::get_attrib_location,
        );
        let (blocks, varyings) = if self.state.is_es3() {
            (
                self.program_param(program, GL_ACTIVE_UNIFORM_BLOCKS),
                self.program_param(program, GL_TRANSFORM_FEEDBACK_VARYINGS),
            )
        } else {
            (0, 0)
        };

        let shaders = record.read().shaders.clone();
        let share = Arc::clone(self.state.share_group());
        let external: Vec<String> = shaders
            .iter()
            .filter_map(|&s| share.shader(s))
            .flat_map(|s| s.read().external_samplers.clone())
            .collect();

        let mut p = record.write();
        p.set_link_result(uniforms, attribs, blocks, &external);
        p.transform_feedback_varyings = varyings;
        debug!(
            program,
            uniforms = p.uniforms.len(),
            attribs = p.attribs.len(),
            samplers = p.samplers.len(),
            "program reflected"
        );
    }

    fn try_link_program(&mut self, program: GLuint) -> GlResult {
        let record = self.check_program(program)?;
        fail_if(
            program == self.state.current_program() && self.state.transform_feedback_active(),
            GlError::InvalidOperation,
        )?;
        self.wire.link_program(program);
        self.reflect_program(program, &record);
        Ok(())
    }

    /// Releases a program whose deletion waited for it to stop being current.
    fn release_if_delete_pending(&mut self, program: GLuint) {
        let share = self.state.share_group();
        if share.program(program).is_some_and(|p| p.read().delete_pending) {
            debug!(program, "releasing deleted program");
            share.release_program(program);
        }
    }

    /// Makes the host `TEXTURE_2D` bind point on the sampler's unit show the texture its
    /// uniform reads.
    fn resync_sampler_binding(&mut self, sampler: SamplerUniform) {
        let Ok(unit) = usize::try_from(sampler.unit) else {
            return;
        };
        if unit >= self.state.texture_unit_count() {
            return;
        }
        if let Some(target) = sampler.texture_target() {
            self.resync_host_2d(unit, target);
        }
    }

    fn try_use_program(&mut self, program: GLuint) -> GlResult {
        if program != 0 {
            self.check_program(program)?;
        }
        fail_if(self.state.transform_feedback_capturing(), GlError::InvalidOperation)?;
        self.wire.use_program(program);

        let previous = self.state.current_program();
        self.state.set_current_program(program);
        if previous != program && previous != 0 {
            self.release_if_delete_pending(previous);
        }
        for sampler in self.state.current_program_samplers() {
            self.resync_sampler_binding(sampler);
        }
        Ok(())
    }

    fn try_delete_program(&mut self, program: GLuint) -> GlResult {
        if program == 0 {
            return Ok(());
        }
        self.check_program(program)?;
        self.wire.delete_program(program);
        let in_use = self.state.current_program() == program;
        self.state.share_group().delete_program(program, in_use);
        Ok(())
    }

    /// Shape checks shared by every `Uniform*` setter. `None` for location `-1`.
    fn check_uniform(
        &self,
        location: GLint,
        setter: UniformSetter,
        columns: u8,
        rows: u8,
        len: usize,
    ) -> GlResult<Option<GLsizei>> {
        let per_element = usize::from(columns) * usize::from(rows);
        fail_if(
            per_element == 0 || len % per_element != 0,
            GlError::InvalidValue,
        )?;
        let count = GLsizei::try_from(len / per_element).map_err(|_| GlError::InvalidValue)?;
        let checked = self
            .state
            .validate_uniform(location, setter, columns, rows, count)?;
        Ok(checked.map(|_| count))
    }

    fn try_get_uniform(&self, program: GLuint, location: GLint) -> GlResult {
        let record = self.check_linked_program(program)?;
        let missing = record.read().uniform_info(location).is_none();
        fail_if(missing, GlError::InvalidOperation)
    }
}

impl<T: Transport> ProgramApi for Gl2Encoder<T> {
    fn create_shader(&mut self, ty: GLenum) -> GLuint {
        self.guarded("glCreateShader", |e| {
            fail_if(!e.is_shader_type(ty), GlError::InvalidEnum)?;
            let shader = e.wire.create_shader(ty);
            if shader != 0 {
                e.state.share_group().add_shader(shader, ty);
            }
            Ok(shader)
        })
    }

    fn delete_shader(&mut self, shader: GLuint) {
        self.guarded("glDeleteShader", |e| {
            if shader == 0 {
                return Ok(());
            }
            e.check_shader(shader)?;
            e.wire.delete_shader(shader);
            e.state.share_group().delete_shader(shader);
            Ok(())
        })
    }

    fn shader_source(&mut self, shader: GLuint, sources: &[&str]) {
        self.guarded("glShaderSource", |e| e.try_shader_source(shader, sources))
    }

    fn compile_shader(&mut self, shader: GLuint) {
        self.guarded("glCompileShader", |e| {
            e.check_shader(shader)?;
            e.wire.compile_shader(shader);
            Ok(())
        })
    }

    /// The application's own text, not the rewritten one the host compiled.
    fn get_shader_source(&mut self, shader: GLuint) -> String {
        self.guarded("glGetShaderSource", |e| {
            Ok(e.check_shader(shader)?.read().source())
        })
    }

    fn get_shaderiv(&mut self, shader: GLuint, pname: GLenum, out: &mut [GLint]) {
        self.guarded("glGetShaderiv", |e| {
            fail_if(!is_shader_pname(pname), GlError::InvalidEnum)?;
            let record = e.check_shader(shader)?;
            let Some(first) = out.first_mut() else {
                return Ok(());
            };
            match pname {
                GL_SHADER_TYPE => *first = record.read().ty as GLint,
                GL_DELETE_STATUS => *first = GLint::from(record.read().delete_pending),
                GL_SHADER_SOURCE_LENGTH => {
                    let len = record.read().source().len();
                    *first = if len == 0 { 0 } else { len as GLint + 1 };
                }
                _ => e.wire.get_shaderiv(shader, pname, out),
            }
            Ok(())
        })
    }

    fn get_shader_info_log(&mut self, shader: GLuint) -> String {
        self.guarded("glGetShaderInfoLog", |e| {
            e.check_shader(shader)?;
            Ok(e.wire.call_string(GlesOpcode::GetShaderInfoLog, &[&shader]))
        })
    }

    fn get_shader_precision_format(
        &mut self,
        shader_type: GLenum,
        precision_type: GLenum,
    ) -> ([GLint; 2], GLint) {
        self.guarded("glGetShaderPrecisionFormat", |e| {
            fail_if(
                !matches!(shader_type, GL_VERTEX_SHADER | GL_FRAGMENT_SHADER)
                    || !is_precision_type(precision_type),
                GlError::InvalidEnum,
            )?;
            Ok(e.wire.shader_precision_format(shader_type, precision_type))
        })
    }

    fn is_shader(&mut self, shader: GLuint) -> bool {
        self.state.share_group().is_shader(shader)
    }

    fn create_program(&mut self) -> GLuint {
        let program = self.wire.create_program();
        if program != 0 {
            self.state.share_group().add_program(program);
        }
        program
    }

    fn delete_program(&mut self, program: GLuint) {
        self.guarded("glDeleteProgram", |e| e.try_delete_program(program))
    }

    fn attach_shader(&mut self, program: GLuint, shader: GLuint) {
        self.guarded("glAttachShader", |e| e.try_attach_shader(program, shader, true))
    }

    fn detach_shader(&mut self, program: GLuint, shader: GLuint) {
        self.guarded("glDetachShader", |e| e.try_attach_shader(program, shader, false))
    }

    fn link_program(&mut self, program: GLuint) {
        self.guarded("glLinkProgram", |e| e.try_link_program(program))
    }

    fn use_program(&mut self, program: GLuint) {
        self.guarded("glUseProgram", |e| e.try_use_program(program))
    }

    fn validate_program(&mut self, program: GLuint) {
        self.guarded("glValidateProgram", |e| {
            e.check_program(program)?;
            e.wire.validate_program(program);
            Ok(())
        })
    }

    fn is_program(&mut self, program: GLuint) -> bool {
        self.state.share_group().is_program(program)
    }

    /// Status, counts and name lengths come from the reflection snapshot.
    fn get_programiv(&mut self, program: GLuint, pname: GLenum, out: &mut [GLint]) {
        self.guarded("glGetProgramiv", |e| {
            fail_if(!e.is_program_pname(pname), GlError::InvalidEnum)?;
            let record = e.check_program(program)?;
            let Some(first) = out.first_mut() else {
                return Ok(());
            };
            let local = {
                let p = record.read();
                match pname {
                    GL_DELETE_STATUS => Some(GLint::from(p.delete_pending)),
                    GL_LINK_STATUS => Some(GLint::from(p.linked)),
                    GL_ATTACHED_SHADERS => Some(p.shaders.len() as GLint),
                    GL_ACTIVE_UNIFORMS => Some(p.uniforms.len() as GLint),
                    GL_ACTIVE_ATTRIBUTES => Some(p.attribs.len() as GLint),
                    GL_ACTIVE_UNIFORM_MAX_LENGTH => Some(p.max_uniform_name_length()),
                    GL_ACTIVE_ATTRIBUTE_MAX_LENGTH => Some(p.max_attrib_name_length()),
                    GL_ACTIVE_UNIFORM_BLOCKS => Some(p.uniform_blocks),
                    GL_TRANSFORM_FEEDBACK_VARYINGS => Some(p.transform_feedback_varyings),
                    _ => None,
                }
            };
            match local {
                Some(v) => *first = v,
                None => e.wire.get_programiv(program, pname, out),
            }
            Ok(())
        })
    }

    fn get_program_info_log(&mut self, program: GLuint) -> String {
        self.guarded("glGetProgramInfoLog", |e| {
            e.check_program(program)?;
            Ok(e.wire.call_string(GlesOpcode::GetProgramInfoLog, &[&program]))
        })
    }

    fn bind_attrib_location(&mut self, program: GLuint, index: GLuint, name: &str) {
        self.guarded("glBindAttribLocation", |e| {
            e.check_program(program)?;
            fail_if(
                index as usize >= e.state.max_vertex_attribs(),
                GlError::InvalidValue,
            )?;
            fail_if(name.starts_with("gl_"), GlError::InvalidOperation)?;
            e.wire.bind_attrib_location(program, index, name);
            Ok(())
        })
    }

    fn get_attrib_location(&mut self, program: GLuint, name: &str) -> GLint {
        self.guarded("glGetAttribLocation", |e| {
            e.check_linked_program(program)?;
            Ok(Some(e.wire.get_attrib_location(program, name)))
        })
        .unwrap_or(-1)
    }

    fn get_uniform_location(&mut self, program: GLuint, name: &str) -> GLint {
        self.guarded("glGetUniformLocation", |e| {
            e.check_linked_program(program)?;
            Ok(Some(e.wire.get_uniform_location(program, name)))
        })
        .unwrap_or(-1)
    }

    fn get_active_uniform(&mut self, program: GLuint, index: GLuint) -> ActiveInfo {
        self.guarded("glGetActiveUniform", |e| {
            let record = e.check_program(program)?;
            let p = record.read();
            let v = p.uniforms.get(index as usize).ok_or(GlError::InvalidValue)?;
            Ok(active_info(v))
        })
    }

    fn get_active_attrib(&mut self, program: GLuint, index: GLuint) -> ActiveInfo {
        self.guarded("glGetActiveAttrib", |e| {
            let record = e.check_program(program)?;
            let p = record.read();
            let v = p.attribs.get(index as usize).ok_or(GlError::InvalidValue)?;
            Ok(active_info(v))
        })
    }

    fn get_attached_shaders(&mut self, program: GLuint) -> Vec<GLuint> {
        self.guarded("glGetAttachedShaders", |e| {
            Ok(e.check_program(program)?.read().shaders.clone())
        })
    }

    fn get_uniform_block_index(&mut self, program: GLuint, name: &str) -> GLuint {
        self.guarded("glGetUniformBlockIndex", |e| {
            e.check_program(program)?;
            Ok(Some(e.wire.get_uniform_block_index(program, name)))
        })
        .unwrap_or(GL_INVALID_INDEX)
    }

    fn uniform_block_binding(&mut self, program: GLuint, block_index: GLuint, binding: GLuint) {
        self.guarded("glUniformBlockBinding", |e| {
            let record = e.check_program(program)?;
            let blocks = record.read().uniform_blocks;
            fail_if(i64::from(block_index) >= i64::from(blocks), GlError::InvalidValue)?;
            let max = e.state.caps().max_uniform_buffer_bindings;
            fail_if(i64::from(binding) >= i64::from(max), GlError::InvalidValue)?;
            e.wire.uniform_block_binding(program, block_index, binding);
            Ok(())
        })
    }

    fn get_active_uniform_blockiv(
        &mut self,
        program: GLuint,
        block_index: GLuint,
        pname: GLenum,
        out: &mut [GLint],
    ) {
        self.guarded("glGetActiveUniformBlockiv", |e| {
            let record = e.check_program(program)?;
            fail_if(!is_uniform_block_pname(pname), GlError::InvalidEnum)?;
            let blocks = record.read().uniform_blocks;
            fail_if(i64::from(block_index) >= i64::from(blocks), GlError::InvalidValue)?;
            e.wire.get_active_uniform_blockiv(program, block_index, pname, out);
            Ok(())
        })
    }

    fn transform_feedback_varyings(&mut self, program: GLuint, varyings: &[&str], buffer_mode: GLenum) {
        self.guarded("glTransformFeedbackVaryings", |e| {
            fail_if(!e.state.share_group().is_program(program), GlError::InvalidValue)?;
            let max = e.state.caps().max_transform_feedback_separate_attribs;
            fail_if(
                buffer_mode == GL_SEPARATE_ATTRIBS && varyings.len() > max.max(0) as usize,
                GlError::InvalidValue,
            )?;
            fail_if(
                !matches!(buffer_mode, GL_INTERLEAVED_ATTRIBS | GL_SEPARATE_ATTRIBS),
                GlError::InvalidEnum,
            )?;
            e.wire.transform_feedback_varyings(program, varyings, buffer_mode);
            Ok(())
        })
    }

    fn get_transform_feedback_varying(&mut self, program: GLuint, index: GLuint) -> ActiveInfo {
        self.guarded("glGetTransformFeedbackVarying", |e| {
            let record = e.check_linked_program(program)?;
            let varyings = record.read().transform_feedback_varyings;
            fail_if(i64::from(index) >= i64::from(varyings), GlError::InvalidValue)?;
            Ok(e.wire
                .active_info(GlesOpcode::GetTransformFeedbackVarying, program, index))
        })
    }

    fn get_uniformfv(&mut self, program: GLuint, location: GLint, out: &mut [GLfloat]) {
        self.guarded("glGetUniformfv", |e| {
            e.try_get_uniform(program, location)?;
            e.wire.get_uniformfv(program, location, out);
            Ok(())
        })
    }

    fn get_uniformiv(&mut self, program: GLuint, location: GLint, out: &mut [GLint]) {
        self.guarded("glGetUniformiv", |e| {
            e.try_get_uniform(program, location)?;
            e.wire.get_uniformiv(program, location, out);
            Ok(())
        })
    }

    fn get_uniformuiv(&mut self, program: GLuint, location: GLint, out: &mut [GLuint]) {
        self.guarded("glGetUniformuiv", |e| {
            e.try_get_uniform(program, location)?;
            e.wire.get_uniformuiv(program, location, out);
            Ok(())
        })
    }

    fn uniform_f(&mut self, location: GLint, components: u8, values: &[GLfloat]) {
        self.guarded("glUniform*f", |e| {
            if e
                .check_uniform(location, UniformSetter::Float, 1, components, values.len())?
                .is_some()
            {
                e.wire.uniform_f(location, components, values);
            }
            Ok(())
        })
    }

    /// Integer uniforms may be samplers; the unit they name decides which of 2D and external
    /// the host sees on that unit.
    fn uniform_i(&mut self, location: GLint, components: u8, values: &[GLint]) {
        self.guarded("glUniform*i", |e| {
            if e
                .check_uniform(location, UniformSetter::Int, 1, components, values.len())?
                .is_none()
            {
                return Ok(());
            }
            e.wire.uniform_i(location, components, values);
            if components == 1 {
                for (element, &unit) in (0..).zip(values) {
                    if let Some(sampler) = e.state.set_sampler_uniform(location + element, unit) {
                        e.resync_sampler_binding(sampler);
                    }
                }
            }
            Ok(())
        })
    }

    fn uniform_ui(&mut self, location: GLint, components: u8, values: &[GLuint]) {
        self.guarded("glUniform*ui", |e| {
            if e
                .check_uniform(location, UniformSetter::Unsigned, 1, components, values.len())?
                .is_some()
            {
                e.wire.uniform_ui(location, components, values);
            }
            Ok(())
        })
    }

    fn uniform_matrix_f(
        &mut self,
        location: GLint,
        columns: u8,
        rows: u8,
        transpose: bool,
        values: &[GLfloat],
    ) {
        self.guarded("glUniformMatrix*fv", |e| {
            fail_if(transpose && !e.state.is_es3(), GlError::InvalidValue)?;
            if e
                .check_uniform(location, UniformSetter::Float, columns, rows, values.len())?
                .is_some()
            {
                e.wire.uniform_matrix_f(location, columns, rows, transpose, values);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use aero_gles_protocol::{GlesOpcode, GlesPacketIter, MemoryTransport};
    use pretty_assertions::assert_eq;

    use super::super::test_support::*;
    use super::*;
    use crate::api::TextureApi;

    type Var<'a> = (&'a str, GLint, GLenum, GLint);

    fn push_variable(enc: &mut Gl2Encoder<MemoryTransport>, (name, size, ty, location): Var<'_>) {
        let t = enc.transport_mut();
        t.push_reply_i32(size);
        t.push_reply_u32(ty);
        t.push_reply_u32(name.len() as u32);
        t.push_reply_bytes(name.as_bytes());
        t.push_reply_i32(location);
    }

    /// Scripts the host side of a successful link and links `program`.
    fn link(
        enc: &mut Gl2Encoder<MemoryTransport>,
        program: GLuint,
        uniforms: &[Var<'_>],
        attribs: &[Var<'_>],
    ) {
        let t = enc.transport_mut();
        t.push_reply_i32(1);
        t.push_reply_i32(uniforms.len() as GLint);
        for &u in uniforms {
            push_variable(enc, u);
        }
        enc.transport_mut().push_reply_i32(attribs.len() as GLint);
        for &a in attribs {
            push_variable(enc, a);
        }
        // Uniform blocks, transform feedback varyings.
        enc.transport_mut().push_reply_i32(1);
        enc.transport_mut().push_reply_i32(0);
        enc.link_program(program);
        assert_eq!(take_error(enc), None);
        assert_eq!(enc.transport().unread_reply_bytes(), 0);
    }

    fn create_program(enc: &mut Gl2Encoder<MemoryTransport>, id: GLuint) {
        enc.transport_mut().push_reply_u32(id);
        assert_eq!(enc.create_program(), id);
    }

    fn create_shader(enc: &mut Gl2Encoder<MemoryTransport>, id: GLuint, ty: GLenum) {
        enc.transport_mut().push_reply_u32(id);
        assert_eq!(enc.create_shader(ty), id);
    }

    fn linked_program(enc: &mut Gl2Encoder<MemoryTransport>) {
        create_program(enc, 1);
        link(
            enc,
            1,
            &[
                ("u_color", 1, GL_FLOAT_VEC4, 0),
                ("u_offsets[0]", 2, GL_FLOAT_VEC2, 1),
                ("u_tex", 1, GL_SAMPLER_2D, 3),
                ("u_mvp", 1, GL_FLOAT_MAT4, 4),
            ],
            &[("a_pos", 1, GL_FLOAT_VEC4, 0)],
        );
        enc.use_program(1);
        assert_eq!(take_error(enc), None);
        clear(enc);
    }

    #[test]
    fn uniform_reads_need_an_active_location() {
        let mut enc = encoder();
        linked_program(&mut enc);

        let mut out = [0.0f32; 4];
        enc.get_uniformfv(1, 9, &mut out);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.get_uniformfv(7, 0, &mut out);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        assert!(opcodes(&mut enc).is_empty());

        enc.transport_mut()
            .push_reply_bytes(&[1.0f32, 0.5, 0.25, 1.0].map(f32::to_le_bytes).concat());
        enc.get_uniformfv(1, 0, &mut out);
        assert_eq!(take_error(&mut enc), None);
        assert_eq!(out, [1.0, 0.5, 0.25, 1.0]);
        assert_eq!(opcodes(&mut enc), vec![GlesOpcode::GetUniformfv]);
    }

    #[test]
    fn name_kinds_are_checked() {
        let mut enc = encoder();
        create_program(&mut enc, 1);
        create_shader(&mut enc, 2, GL_VERTEX_SHADER);
        clear(&mut enc);

        enc.compile_shader(1);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.link_program(2);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.link_program(9);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.attach_shader(2, 1);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        assert!(opcodes(&mut enc).is_empty());

        enc.attach_shader(1, 2);
        enc.attach_shader(1, 2);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        assert_eq!(enc.get_attached_shaders(1), vec![2]);
        assert_eq!(opcodes(&mut enc), vec![GlesOpcode::AttachShader]);

        assert_eq!(enc.create_shader(0x1234), 0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
    }

    #[test]
    fn sources_are_rewritten_for_the_host_and_kept_for_the_app() {
        let mut enc = encoder();
        create_shader(&mut enc, 2, GL_FRAGMENT_SHADER);
        clear(&mut enc);
        let src = [
            "#extension GL_OES_EGL_image_external : require\n",
            "uniform samplerExternalOES u_frame;\n",
        ];
        enc.shader_source(2, &src);
        assert_eq!(take_error(&mut enc), None);
        assert_eq!(enc.get_shader_source(2), src.concat());

        let mut len = [0];
        enc.get_shaderiv(2, GL_SHADER_SOURCE_LENGTH, &mut len);
        assert_eq!(len[0], src.concat().len() as GLint + 1);

        let bytes = sent(&mut enc);
        let packets: Vec<_> = GlesPacketIter::new(&bytes).map(Result::unwrap).collect();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].opcode(), Some(GlesOpcode::ShaderString));
        let mut args = packets[0].args();
        assert_eq!(args.u32().unwrap(), 2);
        let text = String::from_utf8(args.blob().unwrap().to_vec()).unwrap();
        assert!(text.contains("uniform sampler2D"));
        assert!(!text.contains("samplerExternalOES"));
        assert_eq!(text.len(), src.concat().len());
    }

    #[test]
    fn link_rebuilds_reflection() {
        let mut enc = encoder();
        linked_program(&mut enc);
        assert_eq!(enc.state.current_program(), 1);

        let mut v = [0];
        enc.get_programiv(1, GL_ACTIVE_UNIFORMS, &mut v);
        assert_eq!(v, [4]);
        enc.get_programiv(1, GL_LINK_STATUS, &mut v);
        assert_eq!(v, [1]);
        enc.get_programiv(1, GL_ACTIVE_UNIFORM_BLOCKS, &mut v);
        assert_eq!(v, [1]);
        assert_eq!(
            enc.get_active_attrib(1, 0),
            ActiveInfo {
                size: 1,
                ty: GL_FLOAT_VEC4,
                name: "a_pos".into()
            }
        );
        enc.get_active_uniform(1, 4);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        assert!(opcodes(&mut enc).is_empty());

        // A failed relink drops the snapshot.
        enc.transport_mut().push_reply_i32(0);
        enc.link_program(1);
        enc.get_programiv(1, GL_ACTIVE_UNIFORMS, &mut v);
        assert_eq!(v, [0]);
        assert_eq!(enc.get_uniform_location(1, "u_color"), -1);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
    }

    #[test]
    fn uniforms_are_checked_against_the_snapshot() {
        let mut enc = encoder();
        enc.uniform1f(0, 1.0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        linked_program(&mut enc);
        enc.uniform4f(0, 1.0, 0.0, 0.0, 1.0);
        enc.uniform2fv(1, &[0.0, 1.0, 2.0, 3.0]);
        enc.uniform_matrix4fv(4, false, &[0.0; 16]);
        enc.uniform1f(-1, 3.0);
        assert_eq!(take_error(&mut enc), None);
        assert_eq!(
            opcodes(&mut enc),
            vec![GlesOpcode::UniformFv, GlesOpcode::UniformFv, GlesOpcode::UniformMatrixFv]
        );
        clear(&mut enc);

        enc.uniform3f(0, 1.0, 0.0, 0.0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.uniform4fv(0, &[0.0; 8]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.uniform4i(0, 1, 0, 0, 1);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.uniform1f(3, 1.0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.uniform1f(17, 1.0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.uniform4fv(0, &[0.0; 3]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        assert!(opcodes(&mut enc).is_empty());
    }

    #[test]
    fn external_sampler_uniforms_move_the_host_2d_binding() {
        let mut enc = encoder();
        create_shader(&mut enc, 2, GL_FRAGMENT_SHADER);
        enc.shader_source(2, &["uniform samplerExternalOES u_frame;\n"]);
        create_program(&mut enc, 1);
        enc.attach_shader(1, 2);
        link(&mut enc, 1, &[("u_frame", 1, GL_SAMPLER_2D, 0)], &[]);

        enc.active_texture(GL_TEXTURE0 + 1);
        enc.bind_texture(GL_TEXTURE_EXTERNAL_OES, 5);
        enc.active_texture(GL_TEXTURE0);
        enc.use_program(1);
        assert_eq!(take_error(&mut enc), None);
        clear(&mut enc);

        enc.uniform1i(0, 1);
        assert_eq!(take_error(&mut enc), None);

        let bytes = sent(&mut enc);
        let packets: Vec<_> = GlesPacketIter::new(&bytes).map(Result::unwrap).collect();
        let ops: Vec<_> = packets.iter().map(|p| p.opcode().unwrap()).collect();
        assert_eq!(
            ops,
            vec![
                GlesOpcode::UniformIv,
                GlesOpcode::ActiveTexture,
                GlesOpcode::BindTexture,
                GlesOpcode::ActiveTexture
            ]
        );
        let mut args = packets[2].args();
        assert_eq!(args.u32().unwrap(), GL_TEXTURE_2D);
        assert_eq!(args.u32().unwrap(), 5);
        assert_eq!(
            enc.state.texture_unit(1).unwrap().priority_target(GL_TEXTURE_2D),
            GL_TEXTURE_EXTERNAL_OES
        );
    }

    #[test]
    fn use_program_is_refused_while_capturing() {
        let mut enc = encoder();
        linked_program(&mut enc);
        enc.state.begin_transform_feedback(GL_POINTS).unwrap();
        enc.use_program(0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.link_program(1);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        assert!(opcodes(&mut enc).is_empty());
    }

    #[test]
    fn deleting_the_current_program_waits_for_use_program() {
        let mut enc = encoder();
        linked_program(&mut enc);
        enc.delete_program(1);
        assert!(enc.is_program(1));
        let mut v = [0];
        enc.get_programiv(1, GL_DELETE_STATUS, &mut v);
        assert_eq!(v, [1]);

        enc.use_program(0);
        assert!(!enc.is_program(1));
        assert_eq!(take_error(&mut enc), None);
    }

    #[test]
    fn attrib_locations_reject_reserved_names() {
        let mut enc = encoder();
        create_program(&mut enc, 1);
        clear(&mut enc);
        enc.bind_attrib_location(1, 16, "a_pos");
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.bind_attrib_location(1, 0, "gl_Position");
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.bind_attrib_location(1, 0, "a_pos");
        assert_eq!(take_error(&mut enc), None);
        assert_eq!(opcodes(&mut enc), vec![GlesOpcode::BindAttribLocation]);

        assert_eq!(enc.get_uniform_block_index(7, "b"), GL_INVALID_INDEX);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
    }
}
