use aero_gles_protocol::gl::{
    GLenum, GL_INVALID_ENUM, GL_INVALID_FRAMEBUFFER_OPERATION, GL_INVALID_OPERATION,
    GL_INVALID_VALUE, GL_NO_ERROR, GL_OUT_OF_MEMORY,
};
use thiserror::Error;

/// A client-visible GL error.
///
/// `GL_NO_ERROR` is deliberately not a variant; "no error" is the `Ok` side of [`GlResult`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum GlError {
    #[error("GL_INVALID_ENUM")]
    InvalidEnum,
    #[error("GL_INVALID_VALUE")]
    InvalidValue,
    #[error("GL_INVALID_OPERATION")]
    InvalidOperation,
    #[error("GL_INVALID_FRAMEBUFFER_OPERATION")]
    InvalidFramebufferOperation,
    #[error("GL_OUT_OF_MEMORY")]
    OutOfMemory,
}

impl GlError {
    pub const fn to_gl(self) -> GLenum {
        match self {
            Self::InvalidEnum => GL_INVALID_ENUM,
            Self::InvalidValue => GL_INVALID_VALUE,
            Self::InvalidOperation => GL_INVALID_OPERATION,
            Self::InvalidFramebufferOperation => GL_INVALID_FRAMEBUFFER_OPERATION,
            Self::OutOfMemory => GL_OUT_OF_MEMORY,
        }
    }

    /// Returns `None` for `GL_NO_ERROR` and for values that are not GL error codes.
    pub const fn from_gl(value: GLenum) -> Option<Self> {
        match value {
            GL_INVALID_ENUM => Some(Self::InvalidEnum),
            GL_INVALID_VALUE => Some(Self::InvalidValue),
            GL_INVALID_OPERATION => Some(Self::InvalidOperation),
            GL_INVALID_FRAMEBUFFER_OPERATION => Some(Self::InvalidFramebufferOperation),
            GL_OUT_OF_MEMORY => Some(Self::OutOfMemory),
            _ => None,
        }
    }
}

pub fn error_to_gl(err: Option<GlError>) -> GLenum {
    err.map_or(GL_NO_ERROR, GlError::to_gl)
}

pub type GlResult<T = ()> = Result<T, GlError>;

/// Guard helper: fails with `err` when `cond` holds.
#[inline]
pub fn fail_if(cond: bool, err: GlError) -> GlResult {
    if cond {
        Err(err)
    } else {
        Ok(())
    }
}
