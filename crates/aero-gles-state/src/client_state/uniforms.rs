use aero_gles_protocol::gl::*;

use super::textures::TextureSlot;
use super::GlClientState;
use crate::error::{GlError, GlResult};
use crate::program::{ProgramRef, SamplerUniform, UniformSetter, UniformValidationInfo};

impl GlClientState {
    pub fn current_program_ref(&self) -> Option<ProgramRef> {
        match self.current_program {
            0 => None,
            id => self.share.program(id),
        }
    }

    /// Validates a `glUniform*` call against the current program's reflection snapshot.
    ///
    /// `Ok(None)` is location `-1`: GL ignores the call without an error.
    pub fn validate_uniform(
        &self,
        location: GLint,
        setter: UniformSetter,
        columns: u8,
        rows: u8,
        count: GLsizei,
    ) -> GlResult<Option<UniformValidationInfo>> {
        let program = self.current_program_ref().ok_or(GlError::InvalidOperation)?;
        let program = program.read();
        program.validate_uniform(location, setter, columns, rows, count)
    }

    /// Points a sampler uniform of the current program at `unit`. Returns the updated sampler,
    /// or `None` when `location` is not a sampler.
    pub fn set_sampler_uniform(&mut self, location: GLint, unit: GLint) -> Option<SamplerUniform> {
        let program = self.current_program_ref()?;
        let mut program = program.write();
        let sampler = program.sampler_mut(location)?;
        sampler.unit = unit;
        Some(*sampler)
    }

    pub fn current_program_samplers(&self) -> Vec<SamplerUniform> {
        self.current_program_ref()
            .map(|p| p.read().samplers.clone())
            .unwrap_or_default()
    }

    /// Switches which of 2D/external the host's 2D binding point on `unit` shows.
    ///
    /// Returns the texture the host must now see bound to `TEXTURE_2D` on that unit, or `None`
    /// when nothing changes (including targets other than 2D and external).
    pub fn update_host_texture_2d_binding(&mut self, unit: usize, target: GLenum) -> Option<GLuint> {
        if target != GL_TEXTURE_2D && target != GL_TEXTURE_EXTERNAL_OES {
            return None;
        }
        let u = self.texture_unit_mut(unit)?;
        if u.priority_target(GL_TEXTURE_2D) == target {
            return None;
        }
        let external = target == GL_TEXTURE_EXTERNAL_OES;
        u.enabled_external = external;
        u.enabled_2d = !external;
        let slot = if external {
            TextureSlot::External
        } else {
            TextureSlot::Tex2D
        };
        Some(u.texture(slot))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::caps::HostCaps;
    use crate::program::ActiveVariable;
    use crate::share_group::ShareGroup;

    fn linked_state() -> GlClientState {
        let mut s = GlClientState::new(ShareGroup::new(), HostCaps::default(), (3, 0));
        let program = s.share_group().add_program(3);
        program.write().set_link_result(
            vec![
                ActiveVariable {
                    name: "tex".into(),
                    size: 1,
                    ty: GL_SAMPLER_2D,
                    location: 0,
                },
                ActiveVariable {
                    name: "color".into(),
                    size: 1,
                    ty: GL_FLOAT_VEC4,
                    location: 1,
                },
            ],
            Vec::new(),
            0,
            &["tex".to_owned()],
        );
        s.set_current_program(3);
        s
    }

    #[test]
    fn uniforms_need_a_current_program() {
        let s = GlClientState::new(ShareGroup::new(), HostCaps::default(), (3, 0));
        assert_eq!(
            s.validate_uniform(0, UniformSetter::Float, 1, 4, 1),
            Err(GlError::InvalidOperation)
        );
        let s = linked_state();
        assert!(s.validate_uniform(1, UniformSetter::Float, 1, 4, 1).unwrap().is_some());
        assert_eq!(s.validate_uniform(-1, UniformSetter::Int, 1, 1, 1), Ok(None));
    }

    #[test]
    fn sampler_units_follow_uniform1i() {
        let mut s = linked_state();
        assert_eq!(s.set_sampler_uniform(1, 2), None);
        let sampler = s.set_sampler_uniform(0, 2).unwrap();
        assert_eq!(sampler.unit, 2);
        assert_eq!(sampler.texture_target(), Some(GL_TEXTURE_EXTERNAL_OES));
        assert_eq!(s.current_program_samplers()[0].unit, 2);
    }

    #[test]
    fn host_2d_binding_switches_once() {
        let mut s = linked_state();
        s.set_active_texture_unit(1).unwrap();
        s.bind_texture(GL_TEXTURE_EXTERNAL_OES, 8).unwrap();
        s.set_active_texture_unit(0).unwrap();

        assert_eq!(s.update_host_texture_2d_binding(1, GL_TEXTURE_EXTERNAL_OES), Some(8));
        assert_eq!(s.update_host_texture_2d_binding(1, GL_TEXTURE_EXTERNAL_OES), None);
        assert_eq!(s.update_host_texture_2d_binding(1, GL_TEXTURE_2D), Some(0));
        assert_eq!(s.update_host_texture_2d_binding(1, GL_TEXTURE_3D), None);
        assert_eq!(s.active_texture_unit(), 0);
    }
}
