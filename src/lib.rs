//! Guest-side OpenGL ES command encoding.
//!
//! Re-exports the member crates so embedders depend on one package:
//! [`protocol`] for the wire format and transports, [`state`] for the shadow GL state and
//! [`encoder`] for the validating and passthrough encoders.

pub use aero_gles_encoder as encoder;
pub use aero_gles_protocol as protocol;
pub use aero_gles_state as state;

pub use aero_gles_encoder::{prelude, EncoderConfig, Gl2Encoder, GlesApi, PassthroughEncoder};
pub use aero_gles_protocol::{MemoryTransport, Transport, TransportError};
pub use aero_gles_state::{FenceRegistry, ShareGroup};
