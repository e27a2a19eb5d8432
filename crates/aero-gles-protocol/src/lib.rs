//! Wire-level building blocks shared by the guest GLES encoder and host-side tooling.
//!
//! - [`gl`]: GL scalar aliases and enum constants.
//! - [`opcode`]: packet opcodes.
//! - [`cmd_writer`]: packet builder used by the encoder.
//! - [`cmd_stream`]: packet decoder used by tests and replay tooling.
//! - [`transport`]: the ordered byte channel the encoder writes into.

pub mod cmd_stream;
pub mod cmd_writer;
pub mod gl;
pub mod opcode;
pub mod transport;

pub use cmd_stream::{GlesCmdDecodeError, GlesPacket, GlesPacketHdr, GlesPacketIter};
pub use cmd_writer::GlesCmdWriter;
pub use opcode::GlesOpcode;
pub use transport::{MemoryTransport, Transport, TransportError};
