//! Per-context GL state: every binding point, the vertex array objects, framebuffer objects,
//! query and transform feedback bookkeeping, and the handful of server-side toggles the
//! encoder needs to validate calls locally.
//!
//! One `GlClientState` belongs to one context and is only touched by the thread the context is
//! current on. Objects that outlive the context (buffers, textures, renderbuffers, samplers,
//! programs and shaders) live in the [`ShareGroup`] it was created with.

mod buffers;
mod framebuffers;
mod objects;
mod textures;
mod uniforms;
mod vertex;

use aero_gles_protocol::gl::*;

use crate::caps::HostCaps;
use crate::error::{fail_if, GlError, GlResult};
use crate::names::{NameState, ObjectKind};
use crate::pixel::PixelStoreState;
use crate::share_group::ShareGroupRef;

pub use buffers::{is_indexed_buffer_target, IndexedBufferBinding};
pub use framebuffers::AttachmentInfo;
pub use objects::QuerySlot;
pub use textures::{TextureBind, TextureSlot, TextureUnit};

use buffers::BufferState;
use framebuffers::FramebufferState;
use objects::{QueryState, TransformFeedbackState};
use textures::TextureState;
use vertex::VertexArrayState;

/// Front and back stencil state, shadowed so `GetIntegerv` can answer it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilFace {
    pub func: GLenum,
    pub reference: GLint,
    pub value_mask: GLuint,
    pub writemask: GLuint,
    pub fail: GLenum,
    pub depth_fail: GLenum,
    pub depth_pass: GLenum,
}

impl Default for StencilFace {
    fn default() -> Self {
        Self {
            func: GL_ALWAYS,
            reference: 0,
            value_mask: u32::MAX,
            writemask: u32::MAX,
            fail: GL_KEEP,
            depth_fail: GL_KEEP,
            depth_pass: GL_KEEP,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StencilState {
    pub front: StencilFace,
    pub back: StencilFace,
}

impl StencilState {
    fn faces_mut(&mut self, face: GLenum) -> GlResult<impl Iterator<Item = &mut StencilFace>> {
        let (front, back) = match face {
            GL_FRONT => (true, false),
            GL_BACK => (false, true),
            GL_FRONT_AND_BACK => (true, true),
            _ => return Err(GlError::InvalidEnum),
        };
        Ok([(front, &mut self.front), (back, &mut self.back)]
            .into_iter()
            .filter_map(|(on, f)| on.then_some(f)))
    }

    pub fn func(&mut self, face: GLenum, func: GLenum, reference: GLint, mask: GLuint) -> GlResult {
        for f in self.faces_mut(face)? {
            f.func = func;
            f.reference = reference;
            f.value_mask = mask;
        }
        Ok(())
    }

    pub fn mask(&mut self, face: GLenum, mask: GLuint) -> GlResult {
        for f in self.faces_mut(face)? {
            f.writemask = mask;
        }
        Ok(())
    }

    pub fn op(&mut self, face: GLenum, fail: GLenum, depth_fail: GLenum, depth_pass: GLenum) -> GlResult {
        for f in self.faces_mut(face)? {
            f.fail = fail;
            f.depth_fail = depth_fail;
            f.depth_pass = depth_pass;
        }
        Ok(())
    }

    pub fn get(&self, pname: GLenum) -> Option<GLint> {
        let (f, b) = (&self.front, &self.back);
        let v = match pname {
            GL_STENCIL_FUNC => f.func as GLint,
            GL_STENCIL_REF => f.reference,
            GL_STENCIL_VALUE_MASK => f.value_mask as GLint,
            GL_STENCIL_WRITEMASK => f.writemask as GLint,
            GL_STENCIL_FAIL => f.fail as GLint,
            GL_STENCIL_PASS_DEPTH_FAIL => f.depth_fail as GLint,
            GL_STENCIL_PASS_DEPTH_PASS => f.depth_pass as GLint,
            GL_STENCIL_BACK_FUNC => b.func as GLint,
            GL_STENCIL_BACK_REF => b.reference,
            GL_STENCIL_BACK_VALUE_MASK => b.value_mask as GLint,
            GL_STENCIL_BACK_WRITEMASK => b.writemask as GLint,
            GL_STENCIL_BACK_FAIL => b.fail as GLint,
            GL_STENCIL_BACK_PASS_DEPTH_FAIL => b.depth_fail as GLint,
            GL_STENCIL_BACK_PASS_DEPTH_PASS => b.depth_pass as GLint,
            _ => return None,
        };
        Some(v)
    }
}

#[derive(Debug)]
pub struct GlClientState {
    share: ShareGroupRef,
    caps: HostCaps,
    version: (u32, u32),
    extensions: Vec<String>,
    pub pixel_store: PixelStoreState,
    pub stencil: StencilState,
    buffers: BufferState,
    tex: TextureState,
    fbo: FramebufferState,
    vao: VertexArrayState,
    queries: QueryState,
    tf: TransformFeedbackState,
    current_program: GLuint,
    primitive_restart: bool,
    rasterizer_discard: bool,
    stencil_test: bool,
}

impl GlClientState {
    pub fn new(share: ShareGroupRef, caps: HostCaps, version: (u32, u32)) -> Self {
        Self {
            buffers: BufferState::new(&caps),
            tex: TextureState::new(caps.max_combined_texture_image_units),
            fbo: FramebufferState::new(&caps),
            vao: VertexArrayState::new(&caps),
            queries: QueryState::default(),
            tf: TransformFeedbackState::default(),
            share,
            caps,
            version,
            extensions: Vec::new(),
            pixel_store: PixelStoreState::default(),
            stencil: StencilState::default(),
            current_program: 0,
            primitive_restart: false,
            rasterizer_discard: false,
            stencil_test: false,
        }
    }

    pub fn share_group(&self) -> &ShareGroupRef {
        &self.share
    }

    pub fn caps(&self) -> &HostCaps {
        &self.caps
    }

    pub fn version(&self) -> (u32, u32) {
        self.version
    }

    pub fn is_es3(&self) -> bool {
        self.version.0 >= 3
    }

    pub fn is_es31(&self) -> bool {
        self.version >= (3, 1)
    }

    pub fn set_extensions<I, S>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| e == name)
    }

    /// Marks names live (`exists`) or dead in the table for `kind`.
    ///
    /// Dead names only leave the existence table; binding cleanup is the job of the matching
    /// `delete_*` method.
    pub fn set_existence(&mut self, kind: ObjectKind, exists: bool, ids: &[GLuint]) {
        let apply = |table: &mut crate::names::NameTable| {
            for &id in ids {
                if exists {
                    table.add(id);
                } else {
                    table.remove(id);
                }
            }
        };
        match kind {
            ObjectKind::Buffer => apply(&mut self.share.names_mut().buffers),
            ObjectKind::Texture => apply(&mut self.share.names_mut().textures),
            ObjectKind::Renderbuffer => apply(&mut self.share.names_mut().renderbuffers),
            ObjectKind::Sampler => apply(&mut self.share.names_mut().samplers),
            ObjectKind::Framebuffer => apply(&mut self.fbo.names),
            ObjectKind::VertexArray => apply(&mut self.vao.names),
            ObjectKind::Query => apply(&mut self.queries.names),
            ObjectKind::TransformFeedback => apply(&mut self.tf.names),
            // Sync objects live in the process-wide fence registry.
            ObjectKind::Sync => {}
        }
    }

    pub fn query_existence(&self, kind: ObjectKind, id: GLuint) -> NameState {
        match kind {
            ObjectKind::Buffer => self.share.names().buffers.state(id),
            ObjectKind::Texture => self.share.names().textures.state(id),
            ObjectKind::Renderbuffer => self.share.names().renderbuffers.state(id),
            ObjectKind::Sampler => self.share.names().samplers.state(id),
            ObjectKind::Framebuffer => self.fbo.names.state(id),
            ObjectKind::VertexArray => self.vao.names.state(id),
            ObjectKind::Query => self.queries.names.state(id),
            ObjectKind::TransformFeedback => self.tf.names.state(id),
            ObjectKind::Sync => NameState::Unused,
        }
    }

    fn exists(&self, kind: ObjectKind, id: GLuint) -> bool {
        self.query_existence(kind, id) != NameState::Unused
    }

    /// `glEnable`/`glDisable`. Unknown capabilities are `INVALID_ENUM`.
    pub fn set_capability(&mut self, cap: GLenum, enabled: bool) -> GlResult {
        fail_if(!self.is_valid_capability(cap), GlError::InvalidEnum)?;
        match cap {
            GL_PRIMITIVE_RESTART_FIXED_INDEX => self.primitive_restart = enabled,
            GL_RASTERIZER_DISCARD => self.rasterizer_discard = enabled,
            GL_STENCIL_TEST => self.stencil_test = enabled,
            _ => {}
        }
        Ok(())
    }

    /// Locally tracked capabilities; `None` means the host has to be asked.
    pub fn capability(&self, cap: GLenum) -> Option<bool> {
        match cap {
            GL_PRIMITIVE_RESTART_FIXED_INDEX => Some(self.primitive_restart),
            GL_RASTERIZER_DISCARD => Some(self.rasterizer_discard),
            GL_STENCIL_TEST => Some(self.stencil_test),
            _ => None,
        }
    }

    pub fn is_valid_capability(&self, cap: GLenum) -> bool {
        match cap {
            GL_BLEND | GL_CULL_FACE | GL_DEPTH_TEST | GL_DITHER | GL_POLYGON_OFFSET_FILL
            | GL_SAMPLE_ALPHA_TO_COVERAGE | GL_SAMPLE_COVERAGE | GL_SCISSOR_TEST
            | GL_STENCIL_TEST => true,
            GL_PRIMITIVE_RESTART_FIXED_INDEX | GL_RASTERIZER_DISCARD => self.is_es3(),
            GL_SAMPLE_MASK => self.is_es31(),
            _ => false,
        }
    }

    pub fn primitive_restart_enabled(&self) -> bool {
        self.primitive_restart
    }

    pub fn current_program(&self) -> GLuint {
        self.current_program
    }

    pub fn set_current_program(&mut self, program: GLuint) {
        self.current_program = program;
    }

    /// Bindings and toggles answered without a host round trip.
    ///
    /// Limits are not included; they come from the encoder's limit cache.
    pub fn get_integer(&self, pname: GLenum) -> Option<GLint> {
        if let Some(v) = self.stencil.get(pname) {
            return Some(v);
        }
        if let Some(v) = self.pixel_store.get(pname) {
            return Some(v);
        }
        if let Some(v) = self.buffer_binding_query(pname) {
            return Some(v as GLint);
        }
        if let Some(v) = self.texture_binding_query(pname) {
            return Some(v);
        }
        let v = match pname {
            GL_RENDERBUFFER_BINDING => self.bound_renderbuffer() as GLint,
            GL_DRAW_FRAMEBUFFER_BINDING | GL_FRAMEBUFFER_BINDING => {
                self.bound_framebuffer(GL_DRAW_FRAMEBUFFER) as GLint
            }
            GL_READ_FRAMEBUFFER_BINDING => self.bound_framebuffer(GL_READ_FRAMEBUFFER) as GLint,
            GL_VERTEX_ARRAY_BINDING => self.bound_vertex_array() as GLint,
            GL_CURRENT_PROGRAM => self.current_program as GLint,
            GL_TRANSFORM_FEEDBACK_BINDING => self.bound_transform_feedback() as GLint,
            GL_TRANSFORM_FEEDBACK_ACTIVE => GLint::from(self.transform_feedback_active()),
            GL_TRANSFORM_FEEDBACK_PAUSED => GLint::from(
                self.transform_feedback_active() && !self.transform_feedback_unpaused(),
            ),
            GL_MAJOR_VERSION if self.is_es3() => self.version.0 as GLint,
            GL_MINOR_VERSION if self.is_es3() => self.version.1 as GLint,
            GL_NUM_EXTENSIONS if self.is_es3() => self.extensions.len() as GLint,
            _ => return None,
        };
        Some(v)
    }
}
