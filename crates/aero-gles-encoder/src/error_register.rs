use aero_gles_protocol::gl::{GLenum, GL_NO_ERROR};
use aero_gles_state::GlError;

/// The context's sticky GL error flag.
///
/// The first error recorded wins; later ones are dropped until `GetError` reads the flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ErrorRegister {
    pending: Option<GlError>,
}

impl ErrorRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, err: GlError) {
        if self.pending.is_none() {
            self.pending = Some(err);
        }
    }

    /// Records a raw GL error value, as read back from the host. Unknown values are ignored.
    pub fn record_gl(&mut self, value: GLenum) {
        if let Some(err) = GlError::from_gl(value) {
            self.record(err);
        }
    }

    pub fn peek(&self) -> Option<GlError> {
        self.pending
    }

    pub fn is_set(&self) -> bool {
        self.pending.is_some()
    }

    /// Reads and clears the flag.
    pub fn take(&mut self) -> Option<GlError> {
        self.pending.take()
    }

    pub fn take_gl(&mut self) -> GLenum {
        self.take().map_or(GL_NO_ERROR, GlError::to_gl)
    }
}

#[cfg(test)]
mod tests {
    use aero_gles_protocol::gl::{GL_INVALID_ENUM, GL_OUT_OF_MEMORY};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn first_error_wins_until_read() {
        let mut reg = ErrorRegister::new();
        reg.record(GlError::InvalidEnum);
        reg.record_gl(GL_OUT_OF_MEMORY);
        assert_eq!(reg.take_gl(), GL_INVALID_ENUM);
        assert_eq!(reg.take_gl(), GL_NO_ERROR);

        reg.record_gl(0x1234);
        assert!(!reg.is_set());
        reg.record_gl(GL_OUT_OF_MEMORY);
        assert_eq!(reg.peek(), Some(GlError::OutOfMemory));
    }
}
