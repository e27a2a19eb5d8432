use aero_gles::prelude::*;
use aero_gles::protocol::{GlesOpcode, GlesPacketIter};
use aero_gles::{EncoderConfig, FenceRegistry, Gl2Encoder, MemoryTransport, ShareGroup};
use anyhow::Context;
use pretty_assertions::assert_eq;

const VERTEX_SHADER: &str = "attribute vec4 a_pos;\nvoid main() { gl_Position = a_pos; }\n";

fn new_context() -> Gl2Encoder<MemoryTransport> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    Gl2Encoder::new(
        MemoryTransport::new(),
        EncoderConfig::default(),
        ShareGroup::new(),
        FenceRegistry::new(),
    )
}

fn opcodes(t: &MemoryTransport) -> anyhow::Result<Vec<GlesOpcode>> {
    let bytes = t.written();
    GlesPacketIter::new(&bytes)
        .map(|p| p?.opcode().context("unknown opcode"))
        .collect()
}

/// Scripts the host replies for a successful link with one active attribute.
fn script_link(t: &mut MemoryTransport, attrib: &str) {
    t.push_reply_i32(1); // LINK_STATUS
    t.push_reply_i32(0); // ACTIVE_UNIFORMS
    t.push_reply_i32(1); // ACTIVE_ATTRIBUTES
    t.push_reply_i32(1);
    t.push_reply_u32(GL_FLOAT_VEC4);
    t.push_reply_u32(attrib.len() as u32);
    t.push_reply_bytes(attrib.as_bytes());
    t.push_reply_i32(0); // location
    t.push_reply_i32(0); // ACTIVE_UNIFORM_BLOCKS
    t.push_reply_i32(0); // TRANSFORM_FEEDBACK_VARYINGS
}

#[test]
fn first_triangle_reaches_the_host() -> anyhow::Result<()> {
    let mut enc = new_context();
    let vertices: Vec<u8> = [0.0f32, 0.5, 0.0, -0.5, -0.5, 0.0, 0.5, -0.5, 0.0]
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect();

    enc.transport_mut().push_reply_u32(1);
    let vbo = enc.gen_buffers(1)[0];
    enc.bind_buffer(GL_ARRAY_BUFFER, vbo);
    enc.buffer_data(
        GL_ARRAY_BUFFER,
        vertices.len() as GLsizeiptr,
        Some(&vertices),
        GL_STATIC_DRAW,
    );

    enc.transport_mut().push_reply_u32(2);
    let vs = enc.create_shader(GL_VERTEX_SHADER);
    enc.shader_source(vs, &[VERTEX_SHADER]);
    enc.compile_shader(vs);

    enc.transport_mut().push_reply_u32(3);
    let program = enc.create_program();
    enc.attach_shader(program, vs);
    script_link(enc.transport_mut(), "a_pos");
    enc.link_program(program);
    enc.use_program(program);

    enc.vertex_attrib_pointer(0, 3, GL_FLOAT, false, 0, VertexPointer::Offset(0));
    enc.enable_vertex_attrib_array(0);
    enc.draw_arrays(GL_TRIANGLES, 0, 3);
    assert_eq!(enc.pending_error(), None);

    let mut status = [0];
    enc.get_programiv(program, GL_LINK_STATUS, &mut status);
    assert_eq!(status, [1]);
    assert_eq!(enc.get_shader_source(vs), VERTEX_SHADER);

    let t = enc.into_transport();
    assert_eq!(t.unread_reply_bytes(), 0);
    let ops = opcodes(&t)?;
    assert_eq!(ops.first(), Some(&GlesOpcode::GenBuffers));
    assert_eq!(ops.last(), Some(&GlesOpcode::DrawArrays));
    assert_eq!(
        ops.iter().filter(|&&op| op == GlesOpcode::GetProgramiv).count(),
        5
    );
    let link = ops.iter().position(|&op| op == GlesOpcode::LinkProgram);
    let use_program = ops.iter().position(|&op| op == GlesOpcode::UseProgram);
    assert!(link < use_program);
    Ok(())
}

#[test]
fn draws_into_an_incomplete_framebuffer_are_dropped() -> anyhow::Result<()> {
    let mut enc = new_context();
    enc.transport_mut().push_reply_u32(4);
    let fbo = enc.gen_framebuffers(1)[0];
    enc.bind_framebuffer(GL_FRAMEBUFFER, fbo);
    enc.draw_arrays(GL_TRIANGLES, 0, 3);
    enc.clear(GL_COLOR_BUFFER_BIT);

    enc.transport_mut().push_reply_u32(GL_NO_ERROR);
    enc.transport_mut().push_reply_u32(GL_NO_ERROR);
    assert_eq!(enc.get_error(), GL_INVALID_FRAMEBUFFER_OPERATION);
    assert_eq!(enc.get_error(), GL_NO_ERROR);

    let t = enc.into_transport();
    assert_eq!(
        opcodes(&t)?,
        vec![
            GlesOpcode::GenFramebuffers,
            GlesOpcode::BindFramebuffer,
            GlesOpcode::GetError,
            GlesOpcode::GetError,
        ]
    );
    Ok(())
}
