//! Framebuffer attachment graph and completeness.
//!
//! Attachments hold weak references to their texture/renderbuffer records together with the
//! record's `storage_generation` at the time completeness was last computed. A framebuffer is
//! re-checked when its own dirty flag is set or when any attached record's generation moved,
//! so storage changes invalidate every framebuffer that uses the image without the records
//! having to know who attaches them.

use std::sync::{Arc, Weak};

use aero_gles_protocol::gl::{
    color_attachment_index, GLenum, GLint, GLuint, GL_DEPTH_ATTACHMENT,
    GL_DEPTH_STENCIL_ATTACHMENT, GL_FRAMEBUFFER_COMPLETE, GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT,
    GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT, GL_FRAMEBUFFER_INCOMPLETE_MULTISAMPLE,
    GL_FRAMEBUFFER_UNSUPPORTED, GL_STENCIL_ATTACHMENT,
};
use parking_lot::RwLock;

use crate::format::{is_color_renderable, is_depth_renderable, is_stencil_renderable, FormatCaps};
use crate::renderbuffer::{RboProps, RboRef};
use crate::texture::{TextureRec, TextureRef};

/// Generation recorded for an attachment whose record has been dropped.
const DELETED_GENERATION: u64 = u64::MAX;

#[derive(Clone, Debug)]
pub enum FboAttachment {
    Texture {
        id: GLuint,
        rec: Weak<RwLock<TextureRec>>,
        /// Texture target the image was attached through (a cube face for cube maps).
        target: GLenum,
        level: GLint,
        layer: GLint,
        generation: u64,
    },
    Renderbuffer {
        id: GLuint,
        rec: Weak<RwLock<RboProps>>,
        generation: u64,
    },
}

impl FboAttachment {
    pub fn texture(rec: &TextureRef, target: GLenum, level: GLint, layer: GLint) -> Self {
        let r = rec.read();
        Self::Texture {
            id: r.id,
            rec: Arc::downgrade(rec),
            target,
            level,
            layer,
            generation: r.storage_generation,
        }
    }

    pub fn renderbuffer(rec: &RboRef) -> Self {
        let r = rec.read();
        Self::Renderbuffer {
            id: r.id,
            rec: Arc::downgrade(rec),
            generation: r.storage_generation,
        }
    }

    pub fn name(&self) -> GLuint {
        match self {
            Self::Texture { id, .. } | Self::Renderbuffer { id, .. } => *id,
        }
    }

    pub fn is_texture(&self) -> bool {
        matches!(self, Self::Texture { .. })
    }

    /// Storage generation of the attached record, or [`DELETED_GENERATION`] once it is gone.
    fn current_generation(&self) -> u64 {
        let live = match self {
            Self::Texture { rec, .. } => rec.upgrade().map(|r| r.read().storage_generation),
            Self::Renderbuffer { rec, .. } => rec.upgrade().map(|r| r.read().storage_generation),
        };
        live.unwrap_or(DELETED_GENERATION)
    }

    fn snapshot_generation(&self) -> u64 {
        match self {
            Self::Texture { generation, .. } | Self::Renderbuffer { generation, .. } => *generation,
        }
    }

    fn is_stale(&self) -> bool {
        self.current_generation() != self.snapshot_generation()
    }

    fn refresh(&mut self) {
        let now = self.current_generation();
        match self {
            Self::Texture { generation, .. } | Self::Renderbuffer { generation, .. } => {
                *generation = now;
            }
        }
    }

    fn same_image(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Texture { id: a, .. }, Self::Texture { id: b, .. }) => a == b,
            (Self::Renderbuffer { id: a, .. }, Self::Renderbuffer { id: b, .. }) => a == b,
            _ => false,
        }
    }
}

/// Attachment point category, which selects the renderability rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttachmentKind {
    Color,
    Depth,
    Stencil,
}

/// Context inputs to the completeness rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompletenessRules {
    /// ES 3.0+: depth and stencil must be the same image.
    pub es3: bool,
    pub format_caps: FormatCaps,
}

/// Shadow of one framebuffer object.
#[derive(Clone, Debug)]
pub struct FboProps {
    pub id: GLuint,
    pub previously_bound: bool,
    pub color: Vec<Option<FboAttachment>>,
    pub depth: Option<FboAttachment>,
    pub stencil: Option<FboAttachment>,
    pub depth_stencil: Option<FboAttachment>,
    pub default_width: GLint,
    pub default_height: GLint,
    dirty: bool,
    cached_status: GLenum,
}

/// Outcome of checking a single attachment.
enum AttachmentCheck {
    Missing,
    Complete { samples: GLint },
    Incomplete(GLenum),
}

impl FboProps {
    pub fn new(id: GLuint, max_color_attachments: usize) -> Self {
        Self {
            id,
            previously_bound: false,
            color: vec![None; max_color_attachments],
            depth: None,
            stencil: None,
            depth_stencil: None,
            default_width: 0,
            default_height: 0,
            dirty: true,
            cached_status: GL_FRAMEBUFFER_COMPLETE,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn attachment(&self, attachment: GLenum) -> Option<&FboAttachment> {
        match attachment {
            GL_DEPTH_ATTACHMENT => self.depth.as_ref(),
            GL_STENCIL_ATTACHMENT => self.stencil.as_ref(),
            GL_DEPTH_STENCIL_ATTACHMENT => self.depth_stencil.as_ref(),
            _ => color_attachment_index(attachment)
                .and_then(|i| self.color.get(i))
                .and_then(Option::as_ref),
        }
    }

    /// Attaches (or with `None`, detaches) an image. `DEPTH_STENCIL_ATTACHMENT` fills the depth,
    /// stencil and combined slots together.
    pub fn set_attachment(&mut self, attachment: GLenum, value: Option<FboAttachment>) {
        match attachment {
            GL_DEPTH_ATTACHMENT => self.depth = value,
            GL_STENCIL_ATTACHMENT => self.stencil = value,
            GL_DEPTH_STENCIL_ATTACHMENT => {
                self.depth.clone_from(&value);
                self.stencil.clone_from(&value);
                self.depth_stencil = value;
            }
            _ => {
                let slot = color_attachment_index(attachment).and_then(|i| self.color.get_mut(i));
                if let Some(slot) = slot {
                    *slot = value;
                }
            }
        }
        self.dirty = true;
    }

    fn slots_mut(&mut self) -> impl Iterator<Item = &mut Option<FboAttachment>> {
        self.color
            .iter_mut()
            .chain([&mut self.depth, &mut self.stencil, &mut self.depth_stencil])
    }

    fn detach_where(&mut self, pred: impl Fn(&FboAttachment) -> bool) -> bool {
        let mut changed = false;
        for slot in self.slots_mut() {
            if slot.as_ref().is_some_and(&pred) {
                *slot = None;
                changed = true;
            }
        }
        if changed {
            self.dirty = true;
        }
        changed
    }

    pub fn detach_texture(&mut self, id: GLuint) -> bool {
        self.detach_where(|a| a.is_texture() && a.name() == id)
    }

    pub fn detach_renderbuffer(&mut self, id: GLuint) -> bool {
        self.detach_where(|a| !a.is_texture() && a.name() == id)
    }

    pub fn has_any_attachment(&self) -> bool {
        self.color.iter().any(Option::is_some)
            || self.depth.is_some()
            || self.stencil.is_some()
            || self.depth_stencil.is_some()
    }

    fn needs_recheck(&self) -> bool {
        self.dirty
            || self
                .color
                .iter()
                .chain([&self.depth, &self.stencil, &self.depth_stencil])
                .flatten()
                .any(FboAttachment::is_stale)
    }

    /// `CheckFramebufferStatus` for this framebuffer. Cached until an input changes.
    pub fn completeness(&mut self, rules: CompletenessRules) -> GLenum {
        if !self.needs_recheck() {
            return self.cached_status;
        }
        let status = self.compute_completeness(rules);
        for slot in self.slots_mut() {
            if let Some(att) = slot {
                att.refresh();
            }
        }
        self.cached_status = status;
        self.dirty = false;
        status
    }

    fn compute_completeness(&self, rules: CompletenessRules) -> GLenum {
        let mut has_attachment = false;
        let mut samples: Option<GLint> = None;

        let mut visit = |att: &FboAttachment, kind: AttachmentKind| -> Option<GLenum> {
            match check_attachment(att, kind, rules.format_caps) {
                AttachmentCheck::Missing => None,
                AttachmentCheck::Incomplete(status) => {
                    has_attachment = true;
                    Some(status)
                }
                AttachmentCheck::Complete { samples: s } => {
                    has_attachment = true;
                    let first = *samples.get_or_insert(s);
                    (first != s).then_some(GL_FRAMEBUFFER_INCOMPLETE_MULTISAMPLE)
                }
            }
        };

        for att in self.color.iter().flatten() {
            if let Some(status) = visit(att, AttachmentKind::Color) {
                return status;
            }
        }
        if let Some(att) = self.depth.as_ref() {
            if let Some(status) = visit(att, AttachmentKind::Depth) {
                return status;
            }
        }
        if let Some(att) = self.stencil.as_ref() {
            if let Some(status) = visit(att, AttachmentKind::Stencil) {
                return status;
            }
        }

        if rules.es3 {
            if let (Some(depth), Some(stencil)) = (&self.depth, &self.stencil) {
                if !depth.same_image(stencil) {
                    return GL_FRAMEBUFFER_UNSUPPORTED;
                }
            }
        }

        if !has_attachment && (self.default_width == 0 || self.default_height == 0) {
            return GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT;
        }
        GL_FRAMEBUFFER_COMPLETE
    }
}

fn renderable(internal_format: GLenum, ty: GLenum, kind: AttachmentKind, caps: FormatCaps) -> bool {
    match kind {
        AttachmentKind::Color => is_color_renderable(internal_format, ty, caps),
        AttachmentKind::Depth => is_depth_renderable(internal_format),
        AttachmentKind::Stencil => is_stencil_renderable(internal_format),
    }
}

fn check_attachment(att: &FboAttachment, kind: AttachmentKind, caps: FormatCaps) -> AttachmentCheck {
    match att {
        FboAttachment::Renderbuffer { rec, .. } => {
            // A deleted image no longer contributes.
            let Some(rec) = rec.upgrade() else {
                return AttachmentCheck::Missing;
            };
            let rbo = rec.read();
            if rbo.egl_image_backed {
                return AttachmentCheck::Complete { samples: rbo.samples };
            }
            if !renderable(rbo.format, 0, kind, caps) || rbo.width == 0 || rbo.height == 0 {
                return AttachmentCheck::Incomplete(GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT);
            }
            AttachmentCheck::Complete { samples: rbo.samples }
        }
        FboAttachment::Texture {
            rec,
            target,
            level,
            layer,
            ..
        } => {
            let Some(rec) = rec.upgrade() else {
                return AttachmentCheck::Missing;
            };
            let tex = rec.read();
            if tex.egl_image_backed {
                return AttachmentCheck::Complete { samples: tex.samples };
            }
            if !renderable(tex.internal_format, tex.ty, kind, caps) {
                return AttachmentCheck::Incomplete(GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT);
            }
            match tex.dims(*target, *level) {
                Some(d) if d.width > 0 && d.height > 0 && *layer < d.depth.max(1) => {
                    AttachmentCheck::Complete { samples: tex.samples }
                }
                _ => AttachmentCheck::Incomplete(GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use aero_gles_protocol::gl::{
        GL_COLOR_ATTACHMENT0, GL_DEPTH24_STENCIL8, GL_DEPTH_COMPONENT16, GL_LUMINANCE, GL_RGBA,
        GL_RGBA8, GL_STENCIL_INDEX8, GL_TEXTURE_2D, GL_TEXTURE_2D_ARRAY, GL_UNSIGNED_BYTE,
    };
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::texture::LevelDims;

    const ES3: CompletenessRules = CompletenessRules {
        es3: true,
        format_caps: FormatCaps {
            color_buffer_float: false,
            color_buffer_half_float: false,
        },
    };

    fn rbo(id: GLuint, format: GLenum, samples: GLint, w: GLint, h: GLint) -> RboRef {
        let mut r = RboProps::new(id);
        r.set_storage(format, samples, w, h);
        Arc::new(RwLock::new(r))
    }

    fn tex2d(id: GLuint, internal: GLenum, w: GLint, h: GLint) -> TextureRef {
        let mut t = TextureRec::new(id);
        t.target = GL_TEXTURE_2D;
        t.internal_format = internal;
        t.format = GL_RGBA;
        t.ty = GL_UNSIGNED_BYTE;
        t.set_level_dims(GL_TEXTURE_2D, 0, LevelDims::new(w, h, 1));
        Arc::new(RwLock::new(t))
    }

    #[test]
    fn empty_framebuffer_needs_default_size() {
        let mut fbo = FboProps::new(1, 4);
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT);
        fbo.default_width = 16;
        fbo.mark_dirty();
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT);
        fbo.default_height = 16;
        fbo.mark_dirty();
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_COMPLETE);
    }

    #[test]
    fn texture_storage_change_invalidates_the_cache() {
        let tex = tex2d(7, GL_RGBA8, 0, 0);
        let mut fbo = FboProps::new(1, 4);
        fbo.set_attachment(
            GL_COLOR_ATTACHMENT0,
            Some(FboAttachment::texture(&tex, GL_TEXTURE_2D, 0, 0)),
        );
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT);
        // Cached: no input changed.
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT);

        tex.write()
            .set_level_dims(GL_TEXTURE_2D, 0, LevelDims::new(4, 4, 1));
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_COMPLETE);
    }

    #[test]
    fn dropped_attachments_keep_the_cached_status() {
        let color = rbo(3, GL_RGBA8, 0, 4, 4);
        let mut fbo = FboProps::new(1, 4);
        fbo.set_attachment(GL_COLOR_ATTACHMENT0, Some(FboAttachment::renderbuffer(&color)));
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_COMPLETE);

        drop(color);
        assert!(fbo.needs_recheck());
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT);
        assert!(!fbo.needs_recheck());
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT);
    }

    #[test]
    fn non_renderable_formats_are_incomplete() {
        let tex = tex2d(7, GL_LUMINANCE, 4, 4);
        let mut fbo = FboProps::new(1, 4);
        fbo.set_attachment(
            GL_COLOR_ATTACHMENT0,
            Some(FboAttachment::texture(&tex, GL_TEXTURE_2D, 0, 0)),
        );
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT);

        let color_as_depth = rbo(3, GL_RGBA8, 0, 4, 4);
        let mut fbo = FboProps::new(2, 4);
        fbo.set_attachment(
            GL_DEPTH_ATTACHMENT,
            Some(FboAttachment::renderbuffer(&color_as_depth)),
        );
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT);
    }

    #[test]
    fn sample_counts_must_agree() {
        let a = rbo(1, GL_RGBA8, 4, 8, 8);
        let b = rbo(2, GL_RGBA8, 0, 8, 8);
        let mut fbo = FboProps::new(1, 4);
        fbo.set_attachment(GL_COLOR_ATTACHMENT0, Some(FboAttachment::renderbuffer(&a)));
        fbo.set_attachment(GL_COLOR_ATTACHMENT0 + 1, Some(FboAttachment::renderbuffer(&b)));
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_INCOMPLETE_MULTISAMPLE);
    }

    #[test]
    fn separate_depth_and_stencil_images_are_unsupported_on_es3() {
        let depth = rbo(1, GL_DEPTH_COMPONENT16, 0, 8, 8);
        let stencil = rbo(2, GL_STENCIL_INDEX8, 0, 8, 8);
        let mut fbo = FboProps::new(1, 4);
        fbo.set_attachment(GL_DEPTH_ATTACHMENT, Some(FboAttachment::renderbuffer(&depth)));
        fbo.set_attachment(GL_STENCIL_ATTACHMENT, Some(FboAttachment::renderbuffer(&stencil)));
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_UNSUPPORTED);

        let es2 = CompletenessRules { es3: false, ..ES3 };
        fbo.mark_dirty();
        assert_eq!(fbo.completeness(es2), GL_FRAMEBUFFER_COMPLETE);

        let ds = rbo(3, GL_DEPTH24_STENCIL8, 0, 8, 8);
        fbo.set_attachment(GL_DEPTH_STENCIL_ATTACHMENT, Some(FboAttachment::renderbuffer(&ds)));
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_COMPLETE);
    }

    #[test]
    fn layer_must_be_inside_the_level() {
        let mut t = TextureRec::new(9);
        t.target = GL_TEXTURE_2D_ARRAY;
        t.internal_format = GL_RGBA8;
        t.set_level_dims(GL_TEXTURE_2D_ARRAY, 0, LevelDims::new(4, 4, 2));
        let tex = Arc::new(RwLock::new(t));
        let mut fbo = FboProps::new(1, 4);
        fbo.set_attachment(
            GL_COLOR_ATTACHMENT0,
            Some(FboAttachment::texture(&tex, GL_TEXTURE_2D_ARRAY, 0, 2)),
        );
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT);
        fbo.set_attachment(
            GL_COLOR_ATTACHMENT0,
            Some(FboAttachment::texture(&tex, GL_TEXTURE_2D_ARRAY, 0, 1)),
        );
        assert_eq!(fbo.completeness(ES3), GL_FRAMEBUFFER_COMPLETE);
    }

    #[test]
    fn detaching_a_renderbuffer_clears_every_slot_it_occupies() {
        let ds = rbo(3, GL_DEPTH24_STENCIL8, 0, 8, 8);
        let mut fbo = FboProps::new(1, 4);
        fbo.set_attachment(GL_DEPTH_STENCIL_ATTACHMENT, Some(FboAttachment::renderbuffer(&ds)));
        assert!(fbo.detach_renderbuffer(3));
        assert!(!fbo.has_any_attachment());
        assert!(!fbo.detach_renderbuffer(3));
    }
}
