//! Implementation limits for the `Get*` queries.
//!
//! Limits the context was created with come straight from [`HostCaps`]. Any other limit is
//! asked of the host once and remembered; limits never change for the life of a context.
//! Every limit carries the ES version that introduced it and is `INVALID_ENUM` below that.

use aero_gles_protocol::gl::*;
use aero_gles_state::{fail_if, GlError, GlResult, HostCaps};
use hashbrown::HashMap;

const ES2: (u32, u32) = (2, 0);
const ES3: (u32, u32) = (3, 0);
const ES31: (u32, u32) = (3, 1);

/// ES version a limit pname first appears in, or `None` when `pname` is not a limit.
pub fn limit_version(pname: GLenum) -> Option<(u32, u32)> {
    let v = match pname {
        GL_MAX_TEXTURE_SIZE
        | GL_MAX_CUBE_MAP_TEXTURE_SIZE
        | GL_MAX_RENDERBUFFER_SIZE
        | GL_MAX_VERTEX_ATTRIBS
        | GL_MAX_COMBINED_TEXTURE_IMAGE_UNITS
        | GL_MAX_VERTEX_TEXTURE_IMAGE_UNITS
        | GL_MAX_TEXTURE_IMAGE_UNITS
        | GL_MAX_VERTEX_UNIFORM_VECTORS
        | GL_MAX_VARYING_VECTORS
        | GL_MAX_FRAGMENT_UNIFORM_VECTORS
        | GL_MAX_VIEWPORT_DIMS => ES2,
        GL_MAX_3D_TEXTURE_SIZE
        | GL_MAX_ARRAY_TEXTURE_LAYERS
        | GL_MAX_COLOR_ATTACHMENTS
        | GL_MAX_DRAW_BUFFERS
        | GL_MAX_SAMPLES
        | GL_MAX_TRANSFORM_FEEDBACK_SEPARATE_ATTRIBS
        | GL_MAX_UNIFORM_BUFFER_BINDINGS
        | GL_UNIFORM_BUFFER_OFFSET_ALIGNMENT
        | GL_MAX_ELEMENT_INDEX
        | GL_MAX_ELEMENTS_VERTICES
        | GL_MAX_ELEMENTS_INDICES
        | GL_MAX_UNIFORM_BLOCK_SIZE
        | GL_MAX_VERTEX_UNIFORM_BLOCKS
        | GL_MAX_FRAGMENT_UNIFORM_BLOCKS
        | GL_MAX_COMBINED_UNIFORM_BLOCKS
        | GL_MAX_VARYING_COMPONENTS
        | GL_MAX_VERTEX_OUTPUT_COMPONENTS
        | GL_MAX_FRAGMENT_INPUT_COMPONENTS => ES3,
        GL_MAX_VERTEX_ATTRIB_BINDINGS
        | GL_MAX_VERTEX_ATTRIB_STRIDE
        | GL_MAX_COLOR_TEXTURE_SAMPLES
        | GL_MAX_DEPTH_TEXTURE_SAMPLES
        | GL_MAX_INTEGER_SAMPLES
        | GL_MAX_ATOMIC_COUNTER_BUFFER_BINDINGS
        | GL_MAX_SHADER_STORAGE_BUFFER_BINDINGS
        | GL_SHADER_STORAGE_BUFFER_OFFSET_ALIGNMENT
        | GL_MAX_SAMPLE_MASK_WORDS
        | GL_MAX_FRAMEBUFFER_WIDTH
        | GL_MAX_FRAMEBUFFER_HEIGHT
        | GL_MAX_COMPUTE_WORK_GROUP_INVOCATIONS
        | GL_MAX_COMPUTE_SHARED_MEMORY_SIZE => ES31,
        _ => return None,
    };
    Some(v)
}

/// Number of values a limit query writes.
pub fn limit_value_count(pname: GLenum) -> usize {
    match pname {
        GL_MAX_VIEWPORT_DIMS => 2,
        _ => 1,
    }
}

#[derive(Clone, Debug)]
pub struct LimitCache {
    caps: HostCaps,
    version: (u32, u32),
    fetched: HashMap<GLenum, Vec<GLint>>,
}

impl LimitCache {
    pub fn new(caps: HostCaps, version: (u32, u32)) -> Self {
        Self {
            caps,
            version,
            fetched: HashMap::new(),
        }
    }

    pub fn caps(&self) -> &HostCaps {
        &self.caps
    }

    pub fn is_limit(&self, pname: GLenum) -> bool {
        limit_version(pname).is_some()
    }

    /// `INVALID_ENUM` for a limit this context's version does not have.
    pub fn check(&self, pname: GLenum) -> GlResult {
        let required = limit_version(pname).ok_or(GlError::InvalidEnum)?;
        fail_if(self.version < required, GlError::InvalidEnum)
    }

    /// Answers `pname` without the host when possible.
    pub fn lookup(&self, pname: GLenum) -> Option<Vec<GLint>> {
        if let Some(v) = self.caps.get(pname) {
            return Some(vec![v]);
        }
        self.fetched.get(&pname).cloned()
    }

    /// Remembers what the host answered for `pname`. Non-limits are not stored.
    pub fn store(&mut self, pname: GLenum, values: &[GLint]) {
        if self.is_limit(pname) && self.caps.get(pname).is_none() {
            let n = limit_value_count(pname).min(values.len());
            self.fetched.insert(pname, values[..n].to_vec());
        }
    }

    pub fn fetched_len(&self) -> usize {
        self.fetched.len()
    }
}
