//! The transport-facing GLES entry points.
//!
//! Each object family is its own trait (`BufferApi`, `TextureApi`, ...). Every method has a
//! default that forwards the call verbatim through [`GlesWire`], so an encoder only spells out
//! the calls it validates or caches. [`GlesApi`] is implemented for anything that implements all
//! of the families.
//!
//! The forwarding bodies live on `GlesWire` as inherent methods of the same name, which lets an
//! override finish with `self.wire.bind_buffer(target, buffer)` once it has done its own work.

use aero_gles_protocol::gl::*;
use aero_gles_protocol::{GlesOpcode, Transport};
use aero_gles_state::BufferRef;
use parking_lot::{MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLockReadGuard, RwLockWriteGuard};

use crate::wire::{GlesWire, WireArg};

/// Declares one API family: the verbatim wire methods and the trait whose defaults call them.
///
/// Sections, all required, any may be empty:
/// - `commands`: fire-and-forget packets carrying exactly the arguments.
/// - `returns`: one scalar reply.
/// - `outputs`: fills a caller slice; the slice length travels with the packet.
/// - `uploads`: the final [`DataSource`] selects the data or the `Offset` opcode.
/// - `gens`: `glGen*` style name allocation.
/// - `provided`: extra trait items, written out by hand.
macro_rules! gles_family {
    (
        $(#[$meta:meta])*
        pub trait $family:ident {
            commands {
                $( $(#[$cm:meta])* fn $cname:ident($($carg:ident: $cty:ty),* $(,)?) = $cop:ident; )*
            }
            returns {
                $( $(#[$rm:meta])* fn $rname:ident($($rarg:ident: $rty:ty),* $(,)?) -> $rret:ty = $rop:ident; )*
            }
            outputs {
                $( $(#[$om:meta])* fn $oname:ident($($oarg:ident: $oty:ty),* ; $oout:ident: &mut [$oelem:ty]) = $oop:ident; )*
            }
            uploads {
                $( $(#[$um:meta])* fn $uname:ident($($uarg:ident: $uty:ty),* ; $udata:ident) = $udop:ident / $uoop:ident; )*
            }
            gens {
                $( $(#[$gm:meta])* fn $gname:ident = $gop:ident; )*
            }
            provided {
                $($provided:tt)*
            }
        }
    ) => {
        #[allow(clippy::too_many_arguments)]
        impl<T: ::aero_gles_protocol::Transport> $crate::wire::GlesWire<T> {
            $(
                pub fn $cname(&mut self, $($carg: $cty),*) {
                    self.command(::aero_gles_protocol::GlesOpcode::$cop, &[$(&$carg as &dyn $crate::wire::WireArg),*]);
                }
            )*
            $(
                pub fn $rname(&mut self, $($rarg: $rty),*) -> $rret {
                    self.call(::aero_gles_protocol::GlesOpcode::$rop, &[$(&$rarg as &dyn $crate::wire::WireArg),*])
                }
            )*
            $(
                pub fn $oname(&mut self, $($oarg: $oty,)* $oout: &mut [$oelem]) {
                    self.call_into(::aero_gles_protocol::GlesOpcode::$oop, &[$(&$oarg as &dyn $crate::wire::WireArg),*], $oout);
                }
            )*
            $(
                pub fn $uname(&mut self, $($uarg: $uty,)* $udata: $crate::api::DataSource<'_>) {
                    self.data_command(
                        ::aero_gles_protocol::GlesOpcode::$udop,
                        ::aero_gles_protocol::GlesOpcode::$uoop,
                        &[$(&$uarg as &dyn $crate::wire::WireArg),*],
                        $udata,
                    );
                }
            )*
            $(
                pub fn $gname(&mut self, n: ::aero_gles_protocol::gl::GLsizei) -> Vec<::aero_gles_protocol::gl::GLuint> {
                    self.gen_names(::aero_gles_protocol::GlesOpcode::$gop, usize::try_from(n).unwrap_or(0))
                }
            )*
        }

        $(#[$meta])*
        #[allow(clippy::too_many_arguments)]
        pub trait $family: $crate::api::EncoderBase {
            $(
                $(#[$cm])*
                fn $cname(&mut self, $($carg: $cty),*) {
                    self.wire().$cname($($carg),*)
                }
            )*
            $(
                $(#[$rm])*
                fn $rname(&mut self, $($rarg: $rty),*) -> $rret {
                    self.wire().$rname($($rarg),*)
                }
            )*
            $(
                $(#[$om])*
                fn $oname(&mut self, $($oarg: $oty,)* $oout: &mut [$oelem]) {
                    self.wire().$oname($($oarg,)* $oout)
                }
            )*
            $(
                $(#[$um])*
                fn $uname(&mut self, $($uarg: $uty,)* $udata: $crate::api::DataSource<'_>) {
                    self.wire().$uname($($uarg,)* $udata)
                }
            )*
            $(
                $(#[$gm])*
                fn $gname(&mut self, n: ::aero_gles_protocol::gl::GLsizei) -> Vec<::aero_gles_protocol::gl::GLuint> {
                    self.wire().$gname(n)
                }
            )*

            $($provided)*
        }
    };
}

mod buffers;
mod draw;
mod framebuffers;
mod objects;
mod program;
mod state;
mod textures;
mod vertex;

pub use buffers::BufferApi;
pub use draw::DrawApi;
pub use framebuffers::FramebufferApi;
pub use objects::ObjectApi;
pub use program::ProgramApi;
pub use state::StateApi;
pub use textures::TextureApi;
pub use vertex::VertexApi;

/// Access to the wire an encoder forwards through.
pub trait EncoderBase {
    type Transport: Transport;

    fn wire(&mut self) -> &mut GlesWire<Self::Transport>;
}

/// Every GLES entry point.
pub trait GlesApi:
    BufferApi + TextureApi + FramebufferApi + VertexApi + DrawApi + ProgramApi + ObjectApi + StateApi
{
}

impl<E> GlesApi for E where
    E: BufferApi
        + TextureApi
        + FramebufferApi
        + VertexApi
        + DrawApi
        + ProgramApi
        + ObjectApi
        + StateApi
{
}

/// Source of pixel, compressed-image or index data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DataSource<'a> {
    /// Client memory.
    Client(&'a [u8]),
    /// Byte offset into the buffer bound to the matching unpack or element target.
    BufferOffset(usize),
    /// No data: allocate only.
    #[default]
    Null,
}

impl<'a> DataSource<'a> {
    pub fn client_bytes(&self) -> Option<&'a [u8]> {
        match *self {
            Self::Client(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Destination of a pixel readback.
#[derive(Debug)]
pub enum PixelSink<'a> {
    Client(&'a mut [u8]),
    /// Byte offset into the bound `PIXEL_PACK_BUFFER`.
    BufferOffset(usize),
}

/// An EGL image as seen by the GLES layer: the opaque handle the host resolves, plus the image
/// size the shadow state records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EglImage {
    pub handle: u64,
    pub width: GLint,
    pub height: GLint,
}

impl WireArg for EglImage {
    fn put(&self, p: &mut aero_gles_protocol::cmd_writer::PacketBuilder<'_>) {
        p.u64(self.handle);
    }
}

/// Result of `GetActiveUniform`, `GetActiveAttrib` and `GetTransformFeedbackVarying`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveInfo {
    pub size: GLint,
    pub ty: GLenum,
    pub name: String,
}

/// A live `glMapBufferRange` mapping: a window onto the buffer's guest mirror.
///
/// Writes land in the mirror and reach the host on unmap (or an explicit flush).
#[derive(Clone, Debug)]
pub struct BufferMapping {
    buffer: BufferRef,
    offset: usize,
    len: usize,
}

impl BufferMapping {
    pub fn new(buffer: BufferRef, offset: usize, len: usize) -> Self {
        Self {
            buffer,
            offset,
            len,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `None` once the buffer has been re-specified smaller than the mapping.
    pub fn read(&self) -> Option<MappedRwLockReadGuard<'_, [u8]>> {
        let (offset, len) = (self.offset, self.len);
        RwLockReadGuard::try_map(self.buffer.read(), |b| b.range(offset, len)).ok()
    }

    pub fn write(&self) -> Option<MappedRwLockWriteGuard<'_, [u8]>> {
        let (offset, len) = (self.offset, self.len);
        RwLockWriteGuard::try_map(self.buffer.write(), |b| b.range_mut(offset, len)).ok()
    }
}

impl<T: Transport> GlesWire<T> {
    /// Sends `data_op` with the client bytes as a trailing blob, or `offset_op` with the buffer
    /// offset as a trailing `u64`.
    pub fn data_command(
        &mut self,
        data_op: GlesOpcode,
        offset_op: GlesOpcode,
        args: &[&dyn WireArg],
        data: DataSource<'_>,
    ) {
        match data {
            DataSource::BufferOffset(offset) => self.encode(offset_op, |p| {
                for arg in args {
                    arg.put(p);
                }
                p.u64(offset as u64);
            }),
            DataSource::Client(bytes) => self.encode(data_op, |p| {
                for arg in args {
                    arg.put(p);
                }
                p.blob(bytes);
            }),
            DataSource::Null => self.encode(data_op, |p| {
                for arg in args {
                    arg.put(p);
                }
                p.blob(&[]);
            }),
        }
    }
}
