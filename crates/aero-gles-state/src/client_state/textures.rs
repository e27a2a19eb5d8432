use aero_gles_protocol::gl::*;

use super::GlClientState;
use crate::error::{fail_if, GlError, GlResult};
use crate::names::{NameState, ObjectKind};
use crate::texture::{LevelDims, TextureRef};

/// Per-unit texture binding points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Tex2D,
    External,
    CubeMap,
    Tex2DArray,
    Tex3D,
    Tex2DMultisample,
    Buffer,
}

impl TextureSlot {
    pub const COUNT: usize = 7;

    /// Binding point a target addresses; cube faces address the cube map.
    pub fn from_target(target: GLenum) -> Option<Self> {
        let slot = match target {
            GL_TEXTURE_2D => Self::Tex2D,
            GL_TEXTURE_EXTERNAL_OES => Self::External,
            GL_TEXTURE_CUBE_MAP
            | GL_TEXTURE_CUBE_MAP_POSITIVE_X..=GL_TEXTURE_CUBE_MAP_NEGATIVE_Z => Self::CubeMap,
            GL_TEXTURE_2D_ARRAY => Self::Tex2DArray,
            GL_TEXTURE_3D => Self::Tex3D,
            GL_TEXTURE_2D_MULTISAMPLE => Self::Tex2DMultisample,
            GL_TEXTURE_BUFFER_OES => Self::Buffer,
            _ => return None,
        };
        Some(slot)
    }

    pub const fn target(self) -> GLenum {
        match self {
            Self::Tex2D => GL_TEXTURE_2D,
            Self::External => GL_TEXTURE_EXTERNAL_OES,
            Self::CubeMap => GL_TEXTURE_CUBE_MAP,
            Self::Tex2DArray => GL_TEXTURE_2D_ARRAY,
            Self::Tex3D => GL_TEXTURE_3D,
            Self::Tex2DMultisample => GL_TEXTURE_2D_MULTISAMPLE,
            Self::Buffer => GL_TEXTURE_BUFFER_OES,
        }
    }
}

/// One texture image unit.
///
/// `TEXTURE_2D` and `TEXTURE_EXTERNAL_OES` share a single host binding point. The enable
/// bits record which of the two the host currently has bound there.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextureUnit {
    textures: [GLuint; TextureSlot::COUNT],
    pub enabled_2d: bool,
    pub enabled_external: bool,
    pub sampler: GLuint,
}

impl TextureUnit {
    pub fn texture(&self, slot: TextureSlot) -> GLuint {
        self.textures[slot as usize]
    }

    /// The 2D-like target whose texture the host should see on this unit: external when
    /// enabled, else 2D when enabled, else `all_disabled`.
    pub fn priority_target(&self, all_disabled: GLenum) -> GLenum {
        if self.enabled_external {
            GL_TEXTURE_EXTERNAL_OES
        } else if self.enabled_2d {
            GL_TEXTURE_2D
        } else {
            all_disabled
        }
    }
}

#[derive(Clone, Debug)]
pub(super) struct TextureState {
    active: usize,
    units: Vec<TextureUnit>,
}

impl TextureState {
    pub(super) fn new(units: GLint) -> Self {
        Self {
            active: 0,
            units: vec![TextureUnit::default(); usize::try_from(units).unwrap_or(1).max(1)],
        }
    }

    fn active_mut(&mut self) -> &mut TextureUnit {
        &mut self.units[self.active]
    }

    fn active(&self) -> &TextureUnit {
        &self.units[self.active]
    }
}

/// Outcome of a successful `bind_texture`.
#[derive(Clone, Debug)]
pub struct TextureBind {
    /// The texture had never been bound in this share group.
    pub first_use: bool,
    pub rec: TextureRef,
}

impl GlClientState {
    pub fn is_valid_texture_target(&self, target: GLenum) -> bool {
        match target {
            GL_TEXTURE_2D | GL_TEXTURE_CUBE_MAP | GL_TEXTURE_EXTERNAL_OES => true,
            GL_TEXTURE_3D | GL_TEXTURE_2D_ARRAY => self.is_es3(),
            GL_TEXTURE_2D_MULTISAMPLE => self.is_es31(),
            GL_TEXTURE_BUFFER_OES => self.is_es31() || self.has_extension("GL_OES_texture_buffer"),
            _ => false,
        }
    }

    pub fn active_texture_unit(&self) -> usize {
        self.tex.active
    }

    /// `glActiveTexture` with the unit already converted from `GL_TEXTUREi`.
    pub fn set_active_texture_unit(&mut self, unit: usize) -> GlResult {
        fail_if(unit >= self.tex.units.len(), GlError::InvalidEnum)?;
        self.tex.active = unit;
        Ok(())
    }

    pub fn texture_unit_count(&self) -> usize {
        self.tex.units.len()
    }

    pub fn texture_unit(&self, unit: usize) -> Option<&TextureUnit> {
        self.tex.units.get(unit)
    }

    pub fn active_unit(&self) -> &TextureUnit {
        self.tex.active()
    }

    pub(super) fn texture_unit_mut(&mut self, unit: usize) -> Option<&mut TextureUnit> {
        self.tex.units.get_mut(unit)
    }

    /// Records that the host's 2D binding point on the active unit now shows `target`.
    pub fn enable_texture_target(&mut self, target: GLenum) {
        let unit = self.tex.active_mut();
        match target {
            GL_TEXTURE_2D => unit.enabled_2d = true,
            GL_TEXTURE_EXTERNAL_OES => unit.enabled_external = true,
            _ => {}
        }
    }

    pub fn disable_texture_target(&mut self, target: GLenum) {
        let unit = self.tex.active_mut();
        match target {
            GL_TEXTURE_2D => unit.enabled_2d = false,
            GL_TEXTURE_EXTERNAL_OES => unit.enabled_external = false,
            _ => {}
        }
    }

    pub fn priority_enabled_target(&self, all_disabled: GLenum) -> GLenum {
        self.tex.active().priority_target(all_disabled)
    }

    /// `glBindTexture` on the shadow.
    ///
    /// The record is created on first use with `target` as its target. Binding a texture to a
    /// different target than it was created with is `INVALID_OPERATION`, except that 2D and
    /// external textures may be bound to either.
    pub fn bind_texture(&mut self, target: GLenum, texture: GLuint) -> GlResult<TextureBind> {
        let slot = TextureSlot::from_target(target).ok_or(GlError::InvalidEnum)?;
        let (rec, first_use) = self.share.texture_or_insert(texture);
        {
            let mut r = rec.write();
            if first_use {
                r.target = target;
            }
            let external = target == GL_TEXTURE_EXTERNAL_OES || r.target == GL_TEXTURE_EXTERNAL_OES;
            fail_if(
                texture != 0 && r.target != target && !external,
                GlError::InvalidOperation,
            )?;
        }
        self.tex.active_mut().textures[slot as usize] = texture;
        if texture != 0 {
            self.share.names_mut().textures.mark_bound(texture);
        }
        Ok(TextureBind { first_use, rec })
    }

    /// Texture bound to `target` on the active unit (0 for unknown targets).
    pub fn bound_texture(&self, target: GLenum) -> GLuint {
        TextureSlot::from_target(target).map_or(0, |slot| self.tex.active().texture(slot))
    }

    pub fn bound_texture_ref(&self, target: GLenum) -> Option<TextureRef> {
        TextureSlot::from_target(target)?;
        self.share.texture(self.bound_texture(target))
    }

    /// `glIsTexture`: the name has been bound at least once.
    pub fn is_texture(&self, texture: GLuint) -> bool {
        texture != 0 && self.share.texture(texture).is_some()
    }

    /// Drops texture `texture`: framebuffer attachments of the bound framebuffers, every unit
    /// binding, its record and its name.
    pub fn delete_texture(&mut self, texture: GLuint) {
        if texture == 0 {
            return;
        }
        self.detach_texture_from_bound_framebuffers(texture);
        for unit in &mut self.tex.units {
            for t in unit.textures.iter_mut().filter(|t| **t == texture) {
                *t = 0;
            }
        }
        self.share.remove_texture(texture);
        self.set_existence(ObjectKind::Texture, false, &[texture]);
    }

    /// `EGLImageTargetTexture2DOES`: the bound texture takes RGBA8 storage from the image.
    pub fn set_bound_texture_egl_image(&mut self, target: GLenum, width: GLint, height: GLint) {
        if let Some(rec) = self.bound_texture_ref(target) {
            rec.write().set_egl_image(width, height);
        }
    }

    /// Dimensions of `level` of the texture bound to `target` (a cube face selects its face).
    pub fn bound_texture_dims(&self, target: GLenum, level: GLint) -> Option<LevelDims> {
        self.bound_texture_ref(target)?.read().dims(target, level)
    }

    pub(super) fn texture_binding_query(&self, pname: GLenum) -> Option<GLint> {
        let unit = self.tex.active();
        let slot = match pname {
            GL_TEXTURE_BINDING_2D => TextureSlot::Tex2D,
            GL_TEXTURE_BINDING_EXTERNAL_OES => TextureSlot::External,
            GL_TEXTURE_BINDING_CUBE_MAP => TextureSlot::CubeMap,
            GL_TEXTURE_BINDING_2D_ARRAY => TextureSlot::Tex2DArray,
            GL_TEXTURE_BINDING_3D => TextureSlot::Tex3D,
            GL_TEXTURE_BINDING_2D_MULTISAMPLE => TextureSlot::Tex2DMultisample,
            GL_ACTIVE_TEXTURE => return Some((GL_TEXTURE0 as usize + self.tex.active) as GLint),
            GL_SAMPLER_BINDING => return Some(unit.sampler as GLint),
            _ => return None,
        };
        Some(unit.texture(slot) as GLint)
    }

    /// `glBindSampler` on the shadow.
    pub fn bind_sampler(&mut self, unit: GLuint, sampler: GLuint) -> GlResult {
        let unit = unit as usize;
        fail_if(unit >= self.tex.units.len(), GlError::InvalidValue)?;
        fail_if(
            sampler != 0 && !self.exists(ObjectKind::Sampler, sampler),
            GlError::InvalidOperation,
        )?;
        self.tex.units[unit].sampler = sampler;
        if sampler != 0 {
            self.share.names_mut().samplers.mark_bound(sampler);
        }
        Ok(())
    }

    pub fn is_sampler_bind_noop(&self, unit: GLuint, sampler: GLuint) -> bool {
        self.tex
            .units
            .get(unit as usize)
            .is_some_and(|u| u.sampler == sampler)
    }

    pub fn is_sampler(&self, sampler: GLuint) -> bool {
        sampler != 0 && self.query_existence(ObjectKind::Sampler, sampler) != NameState::Unused
    }

    /// Unbinds a deleted sampler from every unit and forgets its name.
    pub fn delete_sampler(&mut self, sampler: GLuint) {
        if sampler == 0 {
            return;
        }
        for unit in self.tex.units.iter_mut().filter(|u| u.sampler == sampler) {
            unit.sampler = 0;
        }
        self.set_existence(ObjectKind::Sampler, false, &[sampler]);
    }
}
