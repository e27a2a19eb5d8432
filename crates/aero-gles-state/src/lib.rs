//! `aero-gles-state` is the guest-side shadow of OpenGL ES state.
//!
//! The encoder consults it to validate calls without a host round trip and to answer queries
//! locally. Currently this crate provides:
//! - Per-context bindings, vertex arrays, framebuffers, queries and transform feedback
//!   (see [`GlClientState`]).
//! - Objects shared between contexts: buffers with their contents mirror, textures,
//!   renderbuffers, programs and shaders (see [`ShareGroup`]).
//! - Framebuffer completeness, format tables and pixel transfer addressing.
//! - Index range scanning with a per-buffer cache (see [`index_range`]).

pub mod buffer;
pub mod caps;
pub mod client_state;
pub mod error;
pub mod fence;
pub mod format;
pub mod framebuffer;
pub mod index_range;
pub mod names;
pub mod pixel;
pub mod program;
pub mod renderbuffer;
pub mod share_group;
pub mod texture;
pub mod vao;

pub use buffer::{BufferData, BufferRef, MapAccess};
pub use caps::HostCaps;
pub use client_state::{
    is_indexed_buffer_target, AttachmentInfo, GlClientState, IndexedBufferBinding, QuerySlot,
    StencilFace, StencilState, TextureBind, TextureSlot, TextureUnit,
};
pub use error::{error_to_gl, fail_if, GlError, GlResult};
pub use fence::FenceRegistry;
pub use format::FormatCaps;
pub use framebuffer::{CompletenessRules, FboAttachment, FboProps};
pub use index_range::{IndexRange, IndexRangeCache, IndexType};
pub use names::{NameState, NameTable, ObjectKind};
pub use pixel::{PixelLayout, PixelStoreState};
pub use program::{
    ActiveVariable, ProgramData, ProgramRef, SamplerUniform, ShaderData, ShaderRef,
    UniformSetter, UniformValidationInfo,
};
pub use renderbuffer::{RboProps, RboRef};
pub use share_group::{ShareGroup, ShareGroupRef, SharedNames};
pub use texture::{LevelDims, TextureRec, TextureRef};
pub use vao::{VaoState, VboUsage, VertexAttribState, VertexBinding, VertexPointer};
