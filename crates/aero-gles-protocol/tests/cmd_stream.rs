use aero_gles_protocol::cmd_stream::{decode_packet_hdr_le, GlesPacketHdr, GlesPacketIter};
use aero_gles_protocol::gl::{GL_ARRAY_BUFFER, GL_STATIC_DRAW, GL_TRIANGLES};
use aero_gles_protocol::{GlesCmdWriter, GlesOpcode};
use pretty_assertions::assert_eq;

#[test]
fn writer_emits_aligned_packets_that_walk_cleanly() -> anyhow::Result<()> {
    let mut w = GlesCmdWriter::new();
    w.begin(GlesOpcode::BindBuffer).u32(GL_ARRAY_BUFFER).u32(3);
    w.begin(GlesOpcode::BufferData)
        .u32(GL_ARRAY_BUFFER)
        .isize(5)
        .blob(&[1, 2, 3, 4, 5])
        .u32(GL_STATIC_DRAW);
    w.begin(GlesOpcode::DrawArrays).u32(GL_TRIANGLES).i32(0).i32(3);
    w.begin(GlesOpcode::Flush);
    let buf = w.take();

    // Walk packets with the header helper, making sure no packet overruns the stream.
    let mut cursor = 0;
    let mut seen_opcodes = Vec::new();
    while cursor < buf.len() {
        let hdr = decode_packet_hdr_le(&buf[cursor..])?;
        assert_eq!(hdr.size_bytes % 4, 0);
        assert!(cursor + hdr.size_bytes as usize <= buf.len());
        seen_opcodes.push(GlesOpcode::from_u32(hdr.opcode));
        cursor += hdr.size_bytes as usize;
    }
    assert_eq!(cursor, buf.len());
    assert_eq!(
        seen_opcodes,
        vec![
            Some(GlesOpcode::BindBuffer),
            Some(GlesOpcode::BufferData),
            Some(GlesOpcode::DrawArrays),
            Some(GlesOpcode::Flush),
        ]
    );

    // Decode the arguments back through the iterator.
    let packets = GlesPacketIter::new(&buf).collect::<Result<Vec<_>, _>>()?;
    let mut args = packets[1].args();
    assert_eq!(args.u32()?, GL_ARRAY_BUFFER);
    assert_eq!(args.i64()?, 5);
    assert_eq!(args.blob()?, &[1, 2, 3, 4, 5]);
    assert_eq!(args.u32()?, GL_STATIC_DRAW);
    assert_eq!(args.remaining(), 0);

    assert_eq!(packets[3].hdr.size_bytes as usize, GlesPacketHdr::SIZE_BYTES);
    Ok(())
}

#[test]
fn arg_reader_reports_short_payloads() {
    let mut w = GlesCmdWriter::new();
    w.begin(GlesOpcode::ActiveTexture).u32(0x84C0);
    let buf = w.take();
    let packet = GlesPacketIter::new(&buf).next().unwrap().unwrap();
    let mut args = packet.args();
    assert_eq!(args.u32().unwrap(), 0x84C0);
    assert!(args.u32().is_err());
}
