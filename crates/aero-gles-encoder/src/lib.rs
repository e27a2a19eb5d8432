//! `aero-gles-encoder` turns GLES calls into wire packets.
//!
//! Two encoders implement the [`GlesApi`] surface:
//! - [`Gl2Encoder`] validates every call against the shadow state in `aero-gles-state`, keeps
//!   that state current, answers queries locally where it can and elides redundant binds.
//! - [`PassthroughEncoder`] forwards every call verbatim.
//!
//! Both write through a [`GlesWire`], which batches packets and owns the transport.

pub mod wire;

pub mod api;
pub mod config;
pub mod encoder;
pub mod error_register;
pub mod limits;
pub mod passthrough;
pub mod pixel_stream;
pub mod shader_rewrite;

pub use api::{
    ActiveInfo, BufferApi, BufferMapping, DataSource, DrawApi, EglImage, EncoderBase,
    FramebufferApi, GlesApi, ObjectApi, PixelSink, ProgramApi, StateApi, TextureApi, VertexApi,
};
pub use config::EncoderConfig;
pub use encoder::Gl2Encoder;
pub use error_register::ErrorRegister;
pub use passthrough::PassthroughEncoder;
pub use wire::GlesWire;

/// Everything needed to drive an encoder: the traits plus the argument types.
pub mod prelude {
    pub use aero_gles_protocol::gl::*;
    pub use aero_gles_state::VertexPointer;

    pub use crate::api::{
        ActiveInfo, BufferApi, BufferMapping, DataSource, DrawApi, EglImage, FramebufferApi,
        GlesApi, ObjectApi, PixelSink, ProgramApi, StateApi, TextureApi, VertexApi,
    };
}
