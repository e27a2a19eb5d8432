use aero_gles_protocol::gl::*;
use hashbrown::HashMap;

use super::GlClientState;
use crate::caps::HostCaps;
use crate::error::{GlError, GlResult};
use crate::framebuffer::{CompletenessRules, FboAttachment, FboProps};
use crate::names::{NameState, NameTable, ObjectKind};
use crate::renderbuffer::RboRef;
use crate::texture::TextureRef;

#[derive(Debug)]
pub(super) struct FramebufferState {
    pub(super) names: NameTable,
    draw: GLuint,
    read: GLuint,
    framebuffers: HashMap<GLuint, FboProps>,
    renderbuffer: GLuint,
    max_color_attachments: usize,
}

impl FramebufferState {
    pub(super) fn new(caps: &HostCaps) -> Self {
        let max_color_attachments = usize::try_from(caps.max_color_attachments).unwrap_or(1).max(1);
        let mut framebuffers = HashMap::new();
        framebuffers.insert(0, FboProps::new(0, max_color_attachments));
        Self {
            names: NameTable::new(),
            draw: 0,
            read: 0,
            framebuffers,
            renderbuffer: 0,
            max_color_attachments,
        }
    }

    fn bound_ids(&self) -> [GLuint; 2] {
        [self.draw, self.read]
    }
}

/// What one framebuffer attachment point holds, resolved against the attached record.
///
/// `kind` is `GL_NONE`, `GL_TEXTURE` or `GL_RENDERBUFFER`. Image fields are 0 when the
/// attachment is empty or the attached object has been deleted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttachmentInfo {
    pub kind: GLenum,
    pub name: GLuint,
    pub internal_format: GLenum,
    pub ty: GLenum,
    pub samples: GLint,
    pub width: GLint,
    pub height: GLint,
    /// Texture target the image was attached through (a face for cube maps).
    pub tex_target: GLenum,
    pub level: GLint,
    pub layer: GLint,
    pub egl_image_backed: bool,
}

impl AttachmentInfo {
    fn from_attachment(att: &FboAttachment) -> Self {
        match att {
            FboAttachment::Texture {
                id,
                rec,
                target,
                level,
                layer,
                ..
            } => {
                let mut info = Self {
                    kind: GL_TEXTURE,
                    name: *id,
                    tex_target: *target,
                    level: *level,
                    layer: *layer,
                    ..Self::default()
                };
                if let Some(rec) = rec.upgrade() {
                    let t = rec.read();
                    info.internal_format = t.internal_format;
                    info.ty = t.ty;
                    info.samples = t.samples;
                    info.egl_image_backed = t.egl_image_backed;
                    if let Some(d) = t.dims(*target, *level) {
                        info.width = d.width;
                        info.height = d.height;
                    }
                }
                info
            }
            FboAttachment::Renderbuffer { id, rec, .. } => {
                let mut info = Self {
                    kind: GL_RENDERBUFFER,
                    name: *id,
                    ..Self::default()
                };
                if let Some(rec) = rec.upgrade() {
                    let r = rec.read();
                    info.internal_format = r.format;
                    info.samples = r.samples;
                    info.width = r.width;
                    info.height = r.height;
                    info.egl_image_backed = r.egl_image_backed;
                }
                info
            }
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind == GL_NONE
    }
}

fn is_framebuffer_target(target: GLenum) -> bool {
    matches!(
        target,
        GL_FRAMEBUFFER | GL_DRAW_FRAMEBUFFER | GL_READ_FRAMEBUFFER
    )
}

impl GlClientState {
    pub fn is_valid_framebuffer_target(&self, target: GLenum) -> bool {
        target == GL_FRAMEBUFFER || (self.is_es3() && is_framebuffer_target(target))
    }

    /// `glBindFramebuffer` on the shadow. `FRAMEBUFFER` binds both draw and read.
    pub fn bind_framebuffer(&mut self, target: GLenum, framebuffer: GLuint) {
        let max_color = self.fbo.max_color_attachments;
        let props = self
            .fbo
            .framebuffers
            .entry(framebuffer)
            .or_insert_with(|| FboProps::new(framebuffer, max_color));
        props.previously_bound = true;
        if framebuffer != 0 {
            self.fbo.names.mark_bound(framebuffer);
        }
        match target {
            GL_DRAW_FRAMEBUFFER => self.fbo.draw = framebuffer,
            GL_READ_FRAMEBUFFER => self.fbo.read = framebuffer,
            _ => {
                self.fbo.draw = framebuffer;
                self.fbo.read = framebuffer;
            }
        }
    }

    pub fn bound_framebuffer(&self, target: GLenum) -> GLuint {
        match target {
            GL_READ_FRAMEBUFFER => self.fbo.read,
            _ => self.fbo.draw,
        }
    }

    pub fn bound_framebuffer_props(&self, target: GLenum) -> Option<&FboProps> {
        self.fbo.framebuffers.get(&self.bound_framebuffer(target))
    }

    fn bound_framebuffer_props_mut(&mut self, target: GLenum) -> Option<&mut FboProps> {
        let id = self.bound_framebuffer(target);
        self.fbo.framebuffers.get_mut(&id)
    }

    /// `glIsFramebuffer`: generated and bound at least once.
    pub fn is_framebuffer(&self, framebuffer: GLuint) -> bool {
        framebuffer != 0 && self.fbo.names.state(framebuffer) == NameState::UsedAndBound
    }

    /// Drops a framebuffer, rebinding 0 wherever it was bound. The default framebuffer is never
    /// removed.
    pub fn delete_framebuffer(&mut self, framebuffer: GLuint) {
        if framebuffer == 0 {
            return;
        }
        if self.fbo.draw == framebuffer {
            self.bind_framebuffer(GL_DRAW_FRAMEBUFFER, 0);
        }
        if self.fbo.read == framebuffer {
            self.bind_framebuffer(GL_READ_FRAMEBUFFER, 0);
        }
        self.fbo.framebuffers.remove(&framebuffer);
        self.set_existence(ObjectKind::Framebuffer, false, &[framebuffer]);
    }

    /// `glFramebufferTexture*` on the bound framebuffer. `None` detaches.
    pub fn attach_texture(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        texture: Option<(&TextureRef, GLenum)>,
        level: GLint,
        layer: GLint,
    ) {
        let value = texture.map(|(rec, tex_target)| FboAttachment::texture(rec, tex_target, level, layer));
        if let Some(fbo) = self.bound_framebuffer_props_mut(target) {
            fbo.set_attachment(attachment, value);
        }
    }

    /// `glFramebufferRenderbuffer` on the bound framebuffer. `None` detaches.
    pub fn attach_renderbuffer(&mut self, target: GLenum, attachment: GLenum, rbo: Option<&RboRef>) {
        let value = rbo.map(FboAttachment::renderbuffer);
        if let Some(fbo) = self.bound_framebuffer_props_mut(target) {
            fbo.set_attachment(attachment, value);
        }
    }

    pub fn attachment_info(&self, target: GLenum, attachment: GLenum) -> AttachmentInfo {
        self.bound_framebuffer_props(target)
            .and_then(|fbo| fbo.attachment(attachment))
            .map(AttachmentInfo::from_attachment)
            .unwrap_or_default()
    }

    /// Whether the framebuffer bound to `target` has an image at `attachment`.
    pub fn has_attachment(&self, target: GLenum, attachment: GLenum) -> bool {
        self.bound_framebuffer_props(target)
            .is_some_and(|fbo| fbo.attachment(attachment).is_some())
    }

    /// `glFramebufferParameteri` (ES 3.1).
    pub fn set_framebuffer_parameter(&mut self, target: GLenum, pname: GLenum, param: GLint) -> GlResult {
        let fbo = self
            .bound_framebuffer_props_mut(target)
            .ok_or(GlError::InvalidOperation)?;
        match pname {
            GL_FRAMEBUFFER_DEFAULT_WIDTH => fbo.default_width = param,
            GL_FRAMEBUFFER_DEFAULT_HEIGHT => fbo.default_height = param,
            _ => return Ok(()),
        }
        fbo.mark_dirty();
        Ok(())
    }

    /// Local `glCheckFramebufferStatus`. The default framebuffer is always complete.
    pub fn check_framebuffer_completeness(&mut self, target: GLenum) -> GLenum {
        let rules = CompletenessRules {
            es3: self.is_es3(),
            format_caps: self.caps.format_caps,
        };
        if self.bound_framebuffer(target) == 0 {
            return GL_FRAMEBUFFER_COMPLETE;
        }
        self.bound_framebuffer_props_mut(target)
            .map_or(GL_FRAMEBUFFER_COMPLETE, |fbo| fbo.completeness(rules))
    }

    pub(super) fn detach_texture_from_bound_framebuffers(&mut self, texture: GLuint) {
        for id in self.fbo.bound_ids() {
            if let Some(fbo) = self.fbo.framebuffers.get_mut(&id) {
                fbo.detach_texture(texture);
            }
        }
    }

    fn detach_renderbuffer_from_bound_framebuffers(&mut self, rbo: GLuint) {
        for id in self.fbo.bound_ids() {
            if let Some(fbo) = self.fbo.framebuffers.get_mut(&id) {
                fbo.detach_renderbuffer(rbo);
            }
        }
    }

    /// `glBindRenderbuffer` on the shadow; the record is created on first bind.
    pub fn bind_renderbuffer(&mut self, renderbuffer: GLuint) {
        self.fbo.renderbuffer = renderbuffer;
        if renderbuffer == 0 {
            return;
        }
        let (rec, _) = self.share.renderbuffer_or_insert(renderbuffer);
        rec.write().previously_bound = true;
        self.share.names_mut().renderbuffers.mark_bound(renderbuffer);
    }

    pub fn bound_renderbuffer(&self) -> GLuint {
        self.fbo.renderbuffer
    }

    pub fn bound_renderbuffer_ref(&self) -> Option<RboRef> {
        match self.fbo.renderbuffer {
            0 => None,
            id => self.share.renderbuffer(id),
        }
    }

    pub fn is_renderbuffer(&self, renderbuffer: GLuint) -> bool {
        renderbuffer != 0
            && self
                .share
                .renderbuffer(renderbuffer)
                .is_some_and(|r| r.read().previously_bound)
    }

    /// `glRenderbufferStorage*` on the bound renderbuffer. Framebuffers that attach it see the
    /// new storage through the record's generation.
    pub fn set_bound_renderbuffer_storage(
        &mut self,
        internal_format: GLenum,
        samples: GLint,
        width: GLint,
        height: GLint,
    ) {
        if let Some(rec) = self.bound_renderbuffer_ref() {
            rec.write().set_storage(internal_format, samples, width, height);
        }
    }

    pub fn set_bound_renderbuffer_egl_image(&mut self, width: GLint, height: GLint) {
        if let Some(rec) = self.bound_renderbuffer_ref() {
            rec.write().set_egl_image(width, height);
        }
    }

    /// Drops a renderbuffer: detaches it from the bound framebuffers, unbinds it, and forgets
    /// its record and name.
    pub fn delete_renderbuffer(&mut self, renderbuffer: GLuint) {
        if renderbuffer == 0 {
            return;
        }
        self.detach_renderbuffer_from_bound_framebuffers(renderbuffer);
        if self.fbo.renderbuffer == renderbuffer {
            self.fbo.renderbuffer = 0;
        }
        self.share.remove_renderbuffer(renderbuffer);
        self.set_existence(ObjectKind::Renderbuffer, false, &[renderbuffer]);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::share_group::ShareGroup;

    fn state() -> GlClientState {
        GlClientState::new(ShareGroup::new(), HostCaps::default(), (3, 0))
    }

    #[test]
    fn framebuffer_target_binds_draw_and_read() {
        let mut s = state();
        s.bind_framebuffer(GL_FRAMEBUFFER, 2);
        assert_eq!(s.bound_framebuffer(GL_READ_FRAMEBUFFER), 2);
        s.bind_framebuffer(GL_READ_FRAMEBUFFER, 3);
        assert_eq!(s.get_integer(GL_DRAW_FRAMEBUFFER_BINDING), Some(2));
        assert_eq!(s.get_integer(GL_READ_FRAMEBUFFER_BINDING), Some(3));

        s.delete_framebuffer(3);
        assert_eq!(s.bound_framebuffer(GL_READ_FRAMEBUFFER), 0);
        assert_eq!(s.bound_framebuffer(GL_DRAW_FRAMEBUFFER), 2);
    }

    #[test]
    fn renderbuffer_storage_reaches_attachments() {
        let mut s = state();
        s.bind_framebuffer(GL_FRAMEBUFFER, 1);
        s.bind_renderbuffer(5);
        let rbo = s.bound_renderbuffer_ref().unwrap();
        s.attach_renderbuffer(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, Some(&rbo));
        assert_eq!(
            s.check_framebuffer_completeness(GL_FRAMEBUFFER),
            GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT
        );
        s.set_bound_renderbuffer_storage(GL_RGBA8, 0, 32, 16);
        assert_eq!(s.check_framebuffer_completeness(GL_FRAMEBUFFER), GL_FRAMEBUFFER_COMPLETE);

        let info = s.attachment_info(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0);
        assert_eq!((info.kind, info.name, info.width), (GL_RENDERBUFFER, 5, 32));
    }

    #[test]
    fn deleting_a_renderbuffer_detaches_and_unbinds_it() {
        let mut s = state();
        s.bind_framebuffer(GL_FRAMEBUFFER, 1);
        s.bind_renderbuffer(5);
        let rbo = s.bound_renderbuffer_ref().unwrap();
        s.attach_renderbuffer(GL_FRAMEBUFFER, GL_DEPTH_ATTACHMENT, Some(&rbo));
        drop(rbo);

        s.delete_renderbuffer(5);
        assert_eq!(s.bound_renderbuffer(), 0);
        assert!(!s.has_attachment(GL_FRAMEBUFFER, GL_DEPTH_ATTACHMENT));
        assert!(!s.is_renderbuffer(5));
    }

    #[test]
    fn default_framebuffer_is_complete_and_sized_by_parameters() {
        let mut s = state();
        assert_eq!(s.check_framebuffer_completeness(GL_FRAMEBUFFER), GL_FRAMEBUFFER_COMPLETE);
        s.bind_framebuffer(GL_FRAMEBUFFER, 4);
        assert_eq!(
            s.check_framebuffer_completeness(GL_FRAMEBUFFER),
            GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT
        );
        s.set_framebuffer_parameter(GL_FRAMEBUFFER, GL_FRAMEBUFFER_DEFAULT_WIDTH, 8)
            .unwrap();
        s.set_framebuffer_parameter(GL_FRAMEBUFFER, GL_FRAMEBUFFER_DEFAULT_HEIGHT, 8)
            .unwrap();
        assert_eq!(s.check_framebuffer_completeness(GL_FRAMEBUFFER), GL_FRAMEBUFFER_COMPLETE);
    }

    #[test]
    fn deleted_texture_leaves_the_bound_framebuffer() {
        let mut s = state();
        s.bind_framebuffer(GL_FRAMEBUFFER, 1);
        let rec = s.bind_texture(GL_TEXTURE_2D, 9).unwrap().rec;
        s.attach_texture(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, Some((&rec, GL_TEXTURE_2D)), 0, 0);
        assert!(s.has_attachment(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0));
        s.delete_texture(9);
        assert!(s.attachment_info(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0).is_none());
    }
}
