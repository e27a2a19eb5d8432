use std::sync::Arc;

use aero_gles_encoder::prelude::*;
use aero_gles_encoder::{EncoderConfig, Gl2Encoder, PassthroughEncoder};
use aero_gles_protocol::{GlesOpcode, GlesPacketIter, MemoryTransport};
use aero_gles_state::{FenceRegistry, ShareGroup, ShareGroupRef};
use anyhow::Context;
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn context(share: &ShareGroupRef, fences: &Arc<FenceRegistry>) -> Gl2Encoder<MemoryTransport> {
    Gl2Encoder::new(
        MemoryTransport::new(),
        EncoderConfig::default(),
        share.clone(),
        fences.clone(),
    )
}

fn opcodes(bytes: &[u8]) -> anyhow::Result<Vec<GlesOpcode>> {
    GlesPacketIter::new(bytes)
        .map(|p| {
            let p = p?;
            p.opcode()
                .with_context(|| format!("unknown opcode {:#x}", p.hdr.opcode))
        })
        .collect()
}

#[test]
fn buffer_size_needs_no_round_trip() -> anyhow::Result<()> {
    init_tracing();
    let mut enc = context(&ShareGroup::new(), &FenceRegistry::new());
    enc.transport_mut().push_reply_u32(1);
    let b = enc.gen_buffers(1)[0];
    enc.bind_buffer(GL_ARRAY_BUFFER, b);
    enc.buffer_data(GL_ARRAY_BUFFER, 100, None, GL_STATIC_DRAW);
    let mut size = [0];
    enc.get_buffer_parameteriv(GL_ARRAY_BUFFER, GL_BUFFER_SIZE, &mut size);
    assert_eq!(size, [100]);
    assert_eq!(enc.pending_error(), None);

    let t = enc.into_transport();
    assert_eq!(t.unread_reply_bytes(), 0);
    assert_eq!(
        opcodes(&t.written())?,
        vec![GlesOpcode::GenBuffers, GlesOpcode::BindBuffer, GlesOpcode::BufferData]
    );
    Ok(())
}

#[test]
fn repeated_binds_reach_the_host_once() -> anyhow::Result<()> {
    init_tracing();
    let mut enc = context(&ShareGroup::new(), &FenceRegistry::new());
    enc.bind_texture(GL_TEXTURE_2D, 42);
    enc.bind_texture(GL_TEXTURE_2D, 42);
    enc.bind_buffer(GL_ARRAY_BUFFER, 7);
    enc.bind_buffer(GL_ARRAY_BUFFER, 7);
    let t = enc.into_transport();
    assert_eq!(
        opcodes(&t.written())?,
        vec![GlesOpcode::BindTexture, GlesOpcode::BindBuffer]
    );
    Ok(())
}

#[test]
fn contexts_in_a_share_group_see_each_others_buffers() {
    init_tracing();
    let share = ShareGroup::new();
    let fences = FenceRegistry::new();
    let mut a = context(&share, &fences);
    let mut b = context(&share, &fences);

    a.bind_buffer(GL_ARRAY_BUFFER, 5);
    a.buffer_data(GL_ARRAY_BUFFER, 64, None, GL_DYNAMIC_DRAW);

    b.bind_buffer(GL_COPY_READ_BUFFER, 5);
    let mut out = [0];
    b.get_buffer_parameteriv(GL_COPY_READ_BUFFER, GL_BUFFER_SIZE, &mut out);
    assert_eq!(out, [64]);
    b.get_buffer_parameteriv(GL_COPY_READ_BUFFER, GL_BUFFER_USAGE, &mut out);
    assert_eq!(out, [GL_DYNAMIC_DRAW as GLint]);
    assert!(b.is_buffer(5));
}

#[test]
fn fences_are_visible_to_every_context() {
    init_tracing();
    let fences = FenceRegistry::new();
    let mut a = context(&ShareGroup::new(), &fences);
    let mut b = context(&ShareGroup::new(), &fences);

    let sync = a.fence_sync(GL_SYNC_GPU_COMMANDS_COMPLETE, 0);
    assert!(b.is_sync(sync));
    b.delete_sync(sync);
    assert!(!a.is_sync(sync));
    assert_eq!(fences.len(), 0);
}

#[test]
fn passthrough_forwards_what_the_validator_rejects() -> anyhow::Result<()> {
    init_tracing();
    let fences = FenceRegistry::new();
    let exercise = |enc: &mut dyn FnMut(GLenum, GLuint)| {
        enc(0xDEAD, 1);
        enc(GL_ARRAY_BUFFER, 2);
    };

    let mut checked = context(&ShareGroup::new(), &fences);
    exercise(&mut |t, b| checked.bind_buffer(t, b));
    assert_eq!(checked.pending_error().map(|e| e.to_gl()), Some(GL_INVALID_ENUM));
    let checked = opcodes(&checked.into_transport().written())?;

    let mut raw = PassthroughEncoder::new(MemoryTransport::new(), fences.clone());
    exercise(&mut |t, b| raw.bind_buffer(t, b));
    let raw = opcodes(&raw.into_transport().written())?;

    assert_eq!(checked, vec![GlesOpcode::BindBuffer]);
    assert_eq!(raw, vec![GlesOpcode::BindBuffer, GlesOpcode::BindBuffer]);
    Ok(())
}

#[test]
fn lost_transport_is_latched() {
    init_tracing();
    let mut enc = context(&ShareGroup::new(), &FenceRegistry::new());
    enc.transport_mut().close();
    enc.clear_color(0.0, 0.0, 0.0, 1.0);
    enc.flush();
    assert!(enc.is_lost());
    // Nothing is sent once the transport is gone.
    enc.clear(GL_COLOR_BUFFER_BIT);
    enc.flush();
    assert!(enc.transport().written().is_empty());
}
