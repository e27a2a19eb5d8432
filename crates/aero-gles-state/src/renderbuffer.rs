use std::sync::Arc;

use aero_gles_protocol::gl::{GLenum, GLint, GLuint, GL_NONE, GL_RGBA4, GL_RGBA8};
use parking_lot::RwLock;

/// Shadow of one renderbuffer.
#[derive(Clone, Debug)]
pub struct RboProps {
    pub id: GLuint,
    pub format: GLenum,
    pub width: GLint,
    pub height: GLint,
    pub samples: GLint,
    pub previously_bound: bool,
    pub egl_image_backed: bool,
    pub storage_generation: u64,
}

pub type RboRef = Arc<RwLock<RboProps>>;

impl RboProps {
    pub fn new(id: GLuint) -> Self {
        Self {
            id,
            // GL's initial RENDERBUFFER_INTERNAL_FORMAT.
            format: GL_RGBA4,
            width: 0,
            height: 0,
            samples: 0,
            previously_bound: false,
            egl_image_backed: false,
            storage_generation: 0,
        }
    }

    pub fn set_storage(&mut self, format: GLenum, samples: GLint, width: GLint, height: GLint) {
        self.format = format;
        self.samples = samples;
        self.width = width;
        self.height = height;
        self.egl_image_backed = false;
        self.storage_generation = self.storage_generation.wrapping_add(1);
    }

    pub fn set_egl_image(&mut self, width: GLint, height: GLint) {
        self.set_storage(GL_RGBA8, 0, width, height);
        self.egl_image_backed = true;
    }

    pub fn has_storage(&self) -> bool {
        self.format != GL_NONE && self.width > 0 && self.height > 0
    }
}
