//! The validating encoder.
//!
//! [`Gl2Encoder`] sits between the application and the wire. Every overridden entry point runs
//! its guard checks against the shadow [`GlClientState`]; the first failing check is latched
//! into the context's error register and nothing reaches the host. Calls that pass update the
//! shadow first and are then forwarded, possibly rewritten (shader sources, client arrays,
//! index buffers) or dropped entirely when they would not change host state.
//!
//! Entry points are grouped by object family, one submodule per [`crate::api`] trait.

mod buffers;
mod draw;
mod framebuffers;
mod objects;
mod programs;
mod state;
mod textures;
mod vertex;

use std::sync::Arc;

use aero_gles_protocol::gl::*;
use aero_gles_protocol::Transport;
use aero_gles_state::{
    FenceRegistry, GlClientState, GlError, GlResult, ShareGroupRef, TextureSlot,
};
use tracing::debug;

use crate::api::EncoderBase;
use crate::config::EncoderConfig;
use crate::error_register::ErrorRegister;
use crate::limits::LimitCache;
use crate::wire::{GlesWire, WireScalar};

/// Texture names the host has bound, per unit and per host bind point.
///
/// `TEXTURE_EXTERNAL_OES` has no bind point of its own on the host: external textures are
/// bound through `TEXTURE_2D`, so that slot holds whichever of the two the host sees.
#[derive(Clone, Debug)]
struct HostBindings {
    textures: Vec<[GLuint; TextureSlot::COUNT]>,
}

impl HostBindings {
    fn new(units: usize) -> Self {
        Self {
            textures: vec![[0; TextureSlot::COUNT]; units],
        }
    }

    fn texture_mut(&mut self, unit: usize, slot: TextureSlot) -> Option<&mut GLuint> {
        self.textures.get_mut(unit).map(|u| &mut u[slot as usize])
    }

    /// The host drops a deleted texture from every bind point.
    fn forget_texture(&mut self, texture: GLuint) {
        for unit in &mut self.textures {
            for t in unit.iter_mut().filter(|t| **t == texture) {
                *t = 0;
            }
        }
    }
}

/// Maps the guest texture target onto the host bind point that carries it.
fn host_texture_target(target: GLenum) -> GLenum {
    match target {
        GL_TEXTURE_EXTERNAL_OES => GL_TEXTURE_2D,
        t => t,
    }
}

pub struct Gl2Encoder<T: Transport> {
    state: GlClientState,
    wire: GlesWire<T>,
    errors: ErrorRegister,
    host: HostBindings,
    limits: LimitCache,
    config: EncoderConfig,
    fences: Arc<FenceRegistry>,
    draw_calls: u32,
}

impl<T: Transport> Gl2Encoder<T> {
    /// Creates the encoder for one context of `share`.
    pub fn new(
        transport: T,
        config: EncoderConfig,
        share: ShareGroupRef,
        fences: Arc<FenceRegistry>,
    ) -> Self {
        let mut state = GlClientState::new(share, config.host_caps.clone(), config.gles_version);
        state.set_extensions(config.extensions.iter().cloned());
        let host = HostBindings::new(state.texture_unit_count());
        let limits = LimitCache::new(config.host_caps.clone(), config.gles_version);
        Self {
            state,
            wire: GlesWire::new(transport),
            errors: ErrorRegister::new(),
            host,
            limits,
            config,
            fences,
            draw_calls: 0,
        }
    }

    pub fn state(&self) -> &GlClientState {
        &self.state
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        self.wire.transport()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.wire.transport_mut()
    }

    /// Flushes pending packets and hands back the transport.
    pub fn into_transport(mut self) -> T {
        self.wire.flush();
        self.wire.into_transport()
    }

    /// The transport failed; the context must be torn down.
    pub fn is_lost(&self) -> bool {
        self.wire.is_lost()
    }

    /// Error `GetError` would report next without asking the host.
    pub fn pending_error(&self) -> Option<GlError> {
        self.errors.peek()
    }

    /// Runs one entry point. A failed guard check is latched and yields `R::default()`.
    fn guarded<R: Default>(
        &mut self,
        call: &'static str,
        f: impl FnOnce(&mut Self) -> GlResult<R>,
    ) -> R {
        match f(self) {
            Ok(r) => r,
            Err(err) => {
                debug!(call, %err, "rejected");
                self.errors.record(err);
                R::default()
            }
        }
    }

    /// Runs `query` between two host `GetError` calls and reports whether the host accepted it.
    ///
    /// An error the host already held belongs to an earlier call, so it is committed to the
    /// register first and does not count against `query`.
    fn host_query_accepted(&mut self, query: impl FnOnce(&mut GlesWire<T>)) -> bool {
        let earlier: GLenum = self.wire.get_error();
        if earlier != GL_NO_ERROR {
            debug!(host_error = earlier, "earlier host error committed");
            self.errors.record_gl(earlier);
        }
        query(&mut self.wire);
        let host_error: GLenum = self.wire.get_error();
        if host_error != GL_NO_ERROR {
            debug!(host_error, "host query failed");
            self.errors.record_gl(host_error);
            return false;
        }
        true
    }

    /// Runs a host query into a staging copy and only publishes it when the host reports no
    /// error; a host error joins the register behind any earlier client error.
    fn safe_host_query<R: WireScalar>(
        &mut self,
        out: &mut [R],
        query: impl FnOnce(&mut GlesWire<T>, &mut [R]),
    ) {
        let mut staging = vec![R::default(); out.len()];
        if self.host_query_accepted(|w| query(w, &mut staging)) {
            out.copy_from_slice(&staging);
        }
    }

    /// Binds `texture` on the host bind point for `target` in the active unit, unless the host
    /// already has it there.
    fn host_bind_texture(&mut self, target: GLenum, texture: GLuint) {
        let host_target = host_texture_target(target);
        let Some(slot) = TextureSlot::from_target(host_target) else {
            return;
        };
        let unit = self.state.active_texture_unit();
        if let Some(bound) = self.host.texture_mut(unit, slot) {
            if *bound == texture {
                debug!(target, texture, unit, "host texture bind elided");
                return;
            }
            *bound = texture;
        }
        self.wire.bind_texture(host_target, texture);
    }

    /// Runs `f` with the host `TEXTURE_2D` bind point holding the texture the guest has on
    /// `target`, restoring the unit's priority texture afterwards.
    ///
    /// Targets other than 2D and external pass through unchanged. `f` receives the target to
    /// put on the wire.
    fn with_host_2d<R>(&mut self, target: GLenum, f: impl FnOnce(&mut Self, GLenum) -> R) -> R {
        if target != GL_TEXTURE_2D && target != GL_TEXTURE_EXTERNAL_OES {
            return f(self, target);
        }
        let priority = self.state.priority_enabled_target(GL_TEXTURE_2D);
        if target == priority {
            return f(self, GL_TEXTURE_2D);
        }
        let texture = self.state.bound_texture(target);
        self.host_bind_texture(GL_TEXTURE_2D, texture);
        let r = f(self, GL_TEXTURE_2D);
        let restore = self.state.bound_texture(priority);
        self.host_bind_texture(GL_TEXTURE_2D, restore);
        r
    }

    /// Points the host `TEXTURE_2D` bind point of `unit` at the guest texture for `target`
    /// when the unit's priority target changes.
    fn resync_host_2d(&mut self, unit: usize, target: GLenum) {
        let Some(texture) = self.state.update_host_texture_2d_binding(unit, target) else {
            return;
        };
        let active = self.state.active_texture_unit();
        if unit == active {
            self.host_bind_texture(GL_TEXTURE_2D, texture);
            return;
        }
        // Host and guest agree on the active unit, so only the host needs to switch.
        let Ok(unit_enum) = GLenum::try_from(unit) else {
            return;
        };
        self.wire.active_texture(GL_TEXTURE0 + unit_enum);
        if let Some(bound) = self.host.texture_mut(unit, TextureSlot::Tex2D) {
            if *bound != texture {
                *bound = texture;
                self.wire.bind_texture(GL_TEXTURE_2D, texture);
            }
        }
        self.wire.active_texture(GL_TEXTURE0 + active as GLenum);
    }

    /// `INVALID_FRAMEBUFFER_OPERATION` unless the framebuffer bound to `target` is complete.
    fn check_framebuffer_complete(&mut self, target: GLenum) -> GlResult {
        let status = self.state.check_framebuffer_completeness(target);
        if status != GL_FRAMEBUFFER_COMPLETE {
            debug!(target, status, "framebuffer incomplete");
            return Err(GlError::InvalidFramebufferOperation);
        }
        Ok(())
    }

    /// Counts a draw and flushes the stream every `draw_call_flush_interval` draws.
    fn count_draw(&mut self) {
        let interval = self.config.draw_call_flush_interval;
        if interval == 0 {
            return;
        }
        self.draw_calls += 1;
        if self.draw_calls >= interval {
            self.draw_calls = 0;
            self.wire.flush();
        }
    }
}

impl<T: Transport> EncoderBase for Gl2Encoder<T> {
    type Transport = T;

    fn wire(&mut self) -> &mut GlesWire<T> {
        &mut self.wire
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use aero_gles_protocol::{GlesOpcode, GlesPacketIter, MemoryTransport};
    use aero_gles_state::ShareGroup;

    use super::*;

    pub fn encoder() -> Gl2Encoder<MemoryTransport> {
        encoder_with(EncoderConfig::default())
    }

    pub fn encoder_es31() -> Gl2Encoder<MemoryTransport> {
        encoder_with(EncoderConfig::default().with_version(3, 1))
    }

    pub fn encoder_with(config: EncoderConfig) -> Gl2Encoder<MemoryTransport> {
        Gl2Encoder::new(
            MemoryTransport::new(),
            config,
            ShareGroup::new(),
            FenceRegistry::new(),
        )
    }

    /// Every byte sent so far. Pushes the pending batch to the transport first.
    pub fn sent(enc: &mut Gl2Encoder<MemoryTransport>) -> Vec<u8> {
        enc.wire.flush();
        enc.wire.transport().written()
    }

    pub fn opcodes(enc: &mut Gl2Encoder<MemoryTransport>) -> Vec<GlesOpcode> {
        GlesPacketIter::new(&sent(enc))
            .map(|p| p.unwrap().opcode().unwrap())
            .collect()
    }

    /// Forgets everything sent so far.
    pub fn clear(enc: &mut Gl2Encoder<MemoryTransport>) {
        enc.wire.flush();
        enc.wire.transport_mut().clear_recorded();
    }

    pub fn take_error(enc: &mut Gl2Encoder<MemoryTransport>) -> Option<GlError> {
        enc.errors.take()
    }
}
