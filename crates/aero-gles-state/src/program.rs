//! Shader and program records plus the per-location uniform validation snapshot rebuilt after
//! every successful link.

use std::sync::Arc;

use aero_gles_protocol::gl::*;
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::error::{fail_if, GlError, GlResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UniformKind {
    Float,
    Int,
    Unsigned,
    Bool,
    Sampler,
}

/// Shape and scalar family of a GLSL uniform type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformTypeInfo {
    pub columns: u8,
    pub rows: u8,
    pub kind: UniformKind,
}

pub fn uniform_type_info(ty: GLenum) -> Option<UniformTypeInfo> {
    use UniformKind::*;
    let (columns, rows, kind) = match ty {
        GL_FLOAT => (1, 1, Float),
        GL_FLOAT_VEC2 => (1, 2, Float),
        GL_FLOAT_VEC3 => (1, 3, Float),
        GL_FLOAT_VEC4 => (1, 4, Float),
        GL_INT => (1, 1, Int),
        GL_INT_VEC2 => (1, 2, Int),
        GL_INT_VEC3 => (1, 3, Int),
        GL_INT_VEC4 => (1, 4, Int),
        GL_UNSIGNED_INT => (1, 1, Unsigned),
        GL_UNSIGNED_INT_VEC2 => (1, 2, Unsigned),
        GL_UNSIGNED_INT_VEC3 => (1, 3, Unsigned),
        GL_UNSIGNED_INT_VEC4 => (1, 4, Unsigned),
        GL_BOOL => (1, 1, Bool),
        GL_BOOL_VEC2 => (1, 2, Bool),
        GL_BOOL_VEC3 => (1, 3, Bool),
        GL_BOOL_VEC4 => (1, 4, Bool),
        GL_FLOAT_MAT2 => (2, 2, Float),
        GL_FLOAT_MAT3 => (3, 3, Float),
        GL_FLOAT_MAT4 => (4, 4, Float),
        GL_FLOAT_MAT2x3 => (2, 3, Float),
        GL_FLOAT_MAT2x4 => (2, 4, Float),
        GL_FLOAT_MAT3x2 => (3, 2, Float),
        GL_FLOAT_MAT3x4 => (3, 4, Float),
        GL_FLOAT_MAT4x2 => (4, 2, Float),
        GL_FLOAT_MAT4x3 => (4, 3, Float),
        t if is_sampler_type(t) => (1, 1, Sampler),
        _ => return None,
    };
    Some(UniformTypeInfo {
        columns,
        rows,
        kind,
    })
}

pub fn is_sampler_type(ty: GLenum) -> bool {
    matches!(
        ty,
        GL_SAMPLER_2D
            | GL_SAMPLER_3D
            | GL_SAMPLER_CUBE
            | GL_SAMPLER_2D_SHADOW
            | GL_SAMPLER_2D_ARRAY
            | GL_SAMPLER_2D_ARRAY_SHADOW
            | GL_SAMPLER_CUBE_SHADOW
            | GL_SAMPLER_EXTERNAL_OES
            | GL_SAMPLER_2D_MULTISAMPLE
            | GL_INT_SAMPLER_2D
            | GL_INT_SAMPLER_3D
            | GL_INT_SAMPLER_CUBE
            | GL_INT_SAMPLER_2D_ARRAY
            | GL_INT_SAMPLER_2D_MULTISAMPLE
            | GL_UNSIGNED_INT_SAMPLER_2D
            | GL_UNSIGNED_INT_SAMPLER_3D
            | GL_UNSIGNED_INT_SAMPLER_CUBE
            | GL_UNSIGNED_INT_SAMPLER_2D_ARRAY
            | GL_UNSIGNED_INT_SAMPLER_2D_MULTISAMPLE
            | GL_IMAGE_2D
            | GL_IMAGE_3D
            | GL_IMAGE_CUBE
            | GL_IMAGE_2D_ARRAY
            | GL_INT_IMAGE_2D
            | GL_INT_IMAGE_3D
            | GL_INT_IMAGE_CUBE
            | GL_INT_IMAGE_2D_ARRAY
            | GL_UNSIGNED_INT_IMAGE_2D
            | GL_UNSIGNED_INT_IMAGE_3D
            | GL_UNSIGNED_INT_IMAGE_CUBE
            | GL_UNSIGNED_INT_IMAGE_2D_ARRAY
            | GL_UNSIGNED_INT_ATOMIC_COUNTER
    )
}

/// Texture target a sampler type reads through, used to re-alias 2D/external host bindings.
pub fn sampler_texture_target(ty: GLenum) -> Option<GLenum> {
    match ty {
        GL_SAMPLER_2D | GL_SAMPLER_2D_SHADOW | GL_INT_SAMPLER_2D | GL_UNSIGNED_INT_SAMPLER_2D => {
            Some(GL_TEXTURE_2D)
        }
        GL_SAMPLER_EXTERNAL_OES => Some(GL_TEXTURE_EXTERNAL_OES),
        GL_SAMPLER_CUBE | GL_SAMPLER_CUBE_SHADOW | GL_INT_SAMPLER_CUBE
        | GL_UNSIGNED_INT_SAMPLER_CUBE => Some(GL_TEXTURE_CUBE_MAP),
        GL_SAMPLER_3D | GL_INT_SAMPLER_3D | GL_UNSIGNED_INT_SAMPLER_3D => Some(GL_TEXTURE_3D),
        GL_SAMPLER_2D_ARRAY | GL_SAMPLER_2D_ARRAY_SHADOW | GL_INT_SAMPLER_2D_ARRAY
        | GL_UNSIGNED_INT_SAMPLER_2D_ARRAY => Some(GL_TEXTURE_2D_ARRAY),
        _ => None,
    }
}

/// Scalar family of a `Uniform*` setter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformSetter {
    Float,
    Int,
    Unsigned,
}

impl UniformSetter {
    fn accepts(self, kind: UniformKind) -> bool {
        match kind {
            UniformKind::Bool => true,
            UniformKind::Float => self == Self::Float,
            UniformKind::Int | UniformKind::Sampler => self == Self::Int,
            UniformKind::Unsigned => self == Self::Unsigned,
        }
    }
}

/// One active uniform or attribute as reported by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveVariable {
    pub name: String,
    pub size: GLint,
    pub ty: GLenum,
    pub location: GLint,
}

impl ActiveVariable {
    /// Name without a trailing `[0]`.
    pub fn base_name(&self) -> &str {
        self.name.strip_suffix("[0]").unwrap_or(&self.name)
    }

    fn is_array(&self) -> bool {
        self.size > 1 || self.name.ends_with("[0]")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformValidationInfo {
    pub info: UniformTypeInfo,
    pub ty: GLenum,
    pub is_array: bool,
}

/// A sampler uniform location and the unit it currently samples from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplerUniform {
    pub location: GLint,
    pub ty: GLenum,
    pub unit: GLint,
    /// Declared `samplerExternalOES` in guest source (the host sees `sampler2D`).
    pub external: bool,
}

impl SamplerUniform {
    pub fn texture_target(&self) -> Option<GLenum> {
        if self.external {
            Some(GL_TEXTURE_EXTERNAL_OES)
        } else {
            sampler_texture_target(self.ty)
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ShaderData {
    pub id: GLuint,
    pub ty: GLenum,
    /// Sources exactly as the application passed them.
    pub sources: Vec<String>,
    /// Uniform names the application declared with an external sampler type.
    pub external_samplers: Vec<String>,
    pub delete_pending: bool,
    /// Programs this shader is attached to.
    pub attached_to: Vec<GLuint>,
}

impl ShaderData {
    pub fn new(id: GLuint, ty: GLenum) -> Self {
        Self {
            id,
            ty,
            ..Self::default()
        }
    }

    /// Concatenated original source, as `GetShaderSource` returns it.
    pub fn source(&self) -> String {
        self.sources.concat()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProgramData {
    pub id: GLuint,
    pub shaders: Vec<GLuint>,
    pub linked: bool,
    /// Number of successful links so far.
    pub link_count: u32,
    pub delete_pending: bool,
    pub uniforms: Vec<ActiveVariable>,
    pub attribs: Vec<ActiveVariable>,
    pub uniform_blocks: GLint,
    pub transform_feedback_varyings: GLint,
    pub samplers: Vec<SamplerUniform>,
    validation: HashMap<GLint, UniformValidationInfo>,
}

pub type ProgramRef = Arc<RwLock<ProgramData>>;
pub type ShaderRef = Arc<RwLock<ShaderData>>;

impl ProgramData {
    pub fn new(id: GLuint) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn mark_link_failed(&mut self) {
        self.linked = false;
        self.uniforms.clear();
        self.attribs.clear();
        self.samplers.clear();
        self.validation.clear();
        self.uniform_blocks = 0;
        self.transform_feedback_varyings = 0;
    }

    /// Installs a fresh reflection snapshot after a successful link.
    pub fn set_link_result(
        &mut self,
        uniforms: Vec<ActiveVariable>,
        attribs: Vec<ActiveVariable>,
        uniform_blocks: GLint,
        external_samplers: &[String],
    ) {
        self.validation.clear();
        self.samplers.clear();
        for u in &uniforms {
            let Some(info) = uniform_type_info(u.ty) else {
                continue;
            };
            if u.location < 0 {
                continue;
            }
            let is_array = u.is_array();
            for i in 0..u.size.max(1) {
                self.validation.insert(
                    u.location + i,
                    UniformValidationInfo {
                        info,
                        ty: u.ty,
                        is_array,
                    },
                );
                if info.kind == UniformKind::Sampler {
                    self.samplers.push(SamplerUniform {
                        location: u.location + i,
                        ty: u.ty,
                        unit: 0,
                        external: u.ty == GL_SAMPLER_EXTERNAL_OES
                            || external_samplers.iter().any(|n| n == u.base_name()),
                    });
                }
            }
        }
        self.uniforms = uniforms;
        self.attribs = attribs;
        self.uniform_blocks = uniform_blocks;
        self.linked = true;
        self.link_count += 1;
    }

    pub fn uniform_info(&self, location: GLint) -> Option<&UniformValidationInfo> {
        self.validation.get(&location)
    }

    /// Checks a `Uniform*` call against the snapshot.
    ///
    /// Returns `Ok(None)` for location `-1`, which GL silently ignores.
    pub fn validate_uniform(
        &self,
        location: GLint,
        setter: UniformSetter,
        columns: u8,
        rows: u8,
        count: GLsizei,
    ) -> GlResult<Option<UniformValidationInfo>> {
        if location == -1 {
            return Ok(None);
        }
        fail_if(count < 0, GlError::InvalidValue)?;
        let v = *self.validation.get(&location).ok_or(GlError::InvalidOperation)?;
        fail_if(
            v.info.columns != columns || v.info.rows != rows,
            GlError::InvalidOperation,
        )?;
        fail_if(count > 1 && !v.is_array, GlError::InvalidOperation)?;
        fail_if(!setter.accepts(v.info.kind), GlError::InvalidOperation)?;
        Ok(Some(v))
    }

    pub fn sampler_mut(&mut self, location: GLint) -> Option<&mut SamplerUniform> {
        self.samplers.iter_mut().find(|s| s.location == location)
    }

    pub fn uniform_location(&self, name: &str) -> Option<GLint> {
        self.uniforms.iter().find_map(|u| {
            if u.name == name || u.base_name() == name {
                return Some(u.location);
            }
            // `name[i]` addresses element `i` of an array uniform.
            let (base, idx) = name.strip_suffix(']')?.split_once('[')?;
            let idx: GLint = idx.parse().ok()?;
            (u.base_name() == base && idx < u.size).then(|| u.location + idx)
        })
    }

    pub fn attrib_location(&self, name: &str) -> Option<GLint> {
        self.attribs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.location)
    }

    pub fn max_uniform_name_length(&self) -> GLint {
        max_name_length(&self.uniforms)
    }

    pub fn max_attrib_name_length(&self) -> GLint {
        max_name_length(&self.attribs)
    }
}

fn max_name_length(vars: &[ActiveVariable]) -> GLint {
    vars.iter()
        .map(|v| v.name.len() as GLint + 1)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn var(name: &str, size: GLint, ty: GLenum, location: GLint) -> ActiveVariable {
        ActiveVariable {
            name: name.to_owned(),
            size,
            ty,
            location,
        }
    }

    fn linked() -> ProgramData {
        let mut p = ProgramData::new(1);
        p.set_link_result(
            vec![
                var("u_color", 1, GL_FLOAT_VEC4, 0),
                var("u_lights[0]", 3, GL_FLOAT_VEC3, 1),
                var("u_tex", 1, GL_SAMPLER_2D, 4),
                var("u_ext", 1, GL_SAMPLER_2D, 5),
                var("u_flag", 1, GL_BOOL, 6),
                var("u_mvp", 1, GL_FLOAT_MAT4, 7),
            ],
            vec![var("a_pos", 1, GL_FLOAT_VEC4, 0)],
            0,
            &["u_ext".to_owned()],
        );
        p
    }

    #[test]
    fn uniform_shape_and_family_checks() {
        let p = linked();
        assert!(p.validate_uniform(0, UniformSetter::Float, 1, 4, 1).is_ok());
        assert_eq!(
            p.validate_uniform(0, UniformSetter::Float, 1, 3, 1),
            Err(GlError::InvalidOperation)
        );
        assert_eq!(
            p.validate_uniform(0, UniformSetter::Int, 1, 4, 1),
            Err(GlError::InvalidOperation)
        );
        // Non-array uniforms take exactly one element.
        assert_eq!(
            p.validate_uniform(0, UniformSetter::Float, 1, 4, 2),
            Err(GlError::InvalidOperation)
        );
        assert!(p.validate_uniform(2, UniformSetter::Float, 1, 3, 2).is_ok());
        // Samplers only take integers.
        assert!(p.validate_uniform(4, UniformSetter::Int, 1, 1, 1).is_ok());
        assert_eq!(
            p.validate_uniform(4, UniformSetter::Float, 1, 1, 1),
            Err(GlError::InvalidOperation)
        );
        // Booleans take every family.
        assert!(p.validate_uniform(6, UniformSetter::Unsigned, 1, 1, 1).is_ok());
        assert!(p.validate_uniform(7, UniformSetter::Float, 4, 4, 1).is_ok());
        assert_eq!(p.validate_uniform(-1, UniformSetter::Float, 9, 9, 1), Ok(None));
        assert_eq!(
            p.validate_uniform(42, UniformSetter::Float, 1, 1, 1),
            Err(GlError::InvalidOperation)
        );
    }

    #[test]
    fn external_samplers_come_from_the_rewritten_source() {
        let p = linked();
        let ext: Vec<_> = p.samplers.iter().map(|s| (s.location, s.external)).collect();
        assert_eq!(ext, vec![(4, false), (5, true)]);
        assert_eq!(p.samplers[1].texture_target(), Some(GL_TEXTURE_EXTERNAL_OES));
    }

    #[test]
    fn array_element_locations_resolve() {
        let p = linked();
        assert_eq!(p.uniform_location("u_lights"), Some(1));
        assert_eq!(p.uniform_location("u_lights[2]"), Some(3));
        assert_eq!(p.uniform_location("u_lights[3]"), None);
        assert_eq!(p.uniform_location("nope"), None);
        assert_eq!(p.attrib_location("a_pos"), Some(0));
        assert_eq!(p.max_uniform_name_length(), "u_lights[0]".len() as GLint + 1);
    }
}
