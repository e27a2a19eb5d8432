//! Draw calls.
//!
//! Attributes backed by buffers reach the host as offsets. Client arrays have no host-side
//! storage, so a draw that reads them streams exactly the vertices it touches: `[first,
//! first + count)` for array draws, `[min, max]` of the index data for element draws. The
//! streamed vertices start at host index 0, which is why array draws are re-issued with
//! `first = 0` and element draws with indices rebased to `min`.

use aero_gles_protocol::gl::*;
use aero_gles_protocol::Transport;
use aero_gles_state::index_range::{calc_index_range, recenter_indices};
use aero_gles_state::{fail_if, GlError, GlResult, IndexType, VertexPointer};
use tracing::{debug, error};

use super::Gl2Encoder;
use crate::api::{DataSource, DrawApi};

fn is_draw_mode(mode: GLenum) -> bool {
    matches!(
        mode,
        GL_POINTS
            | GL_LINE_STRIP
            | GL_LINE_LOOP
            | GL_LINES
            | GL_TRIANGLE_STRIP
            | GL_TRIANGLE_FAN
            | GL_TRIANGLES
    )
}

/// Elements one attribute supplies: one per vertex, or one per `divisor` instances.
fn attrib_element_count(count: usize, divisor: GLuint, instances: usize) -> usize {
    if divisor == 0 {
        count
    } else {
        instances.div_ceil(divisor as usize).max(1)
    }
}

/// Packs `n` elements of `elem_size` bytes found `stride` apart from `start`. `None` when the
/// last one ends past `bytes`.
fn pack_client_elements(
    bytes: &[u8],
    start: usize,
    stride: usize,
    elem_size: usize,
    n: usize,
) -> Option<Vec<u8>> {
    if n == 0 {
        return Some(Vec::new());
    }
    let end = stride
        .checked_mul(n - 1)?
        .checked_add(start)?
        .checked_add(elem_size)?;
    if end > bytes.len() {
        return None;
    }
    if stride == elem_size {
        return Some(bytes[start..end].to_vec());
    }
    let mut out = Vec::with_capacity(elem_size * n);
    for i in 0..n {
        let at = start + i * stride;
        out.extend_from_slice(&bytes[at..at + elem_size]);
    }
    Some(out)
}

#[derive(Clone, Copy, Debug)]
enum ElementsDraw {
    Plain,
    Instanced(GLsizei),
    Range { start: GLuint, end: GLuint },
}

impl<T: Transport> Gl2Encoder<T> {
    /// Sends `id` to the host for `target` unless the host already has it.
    fn bind_buffer_cached(&mut self, target: GLenum, id: GLuint) {
        if self.state.last_encoded_buffer(target) == id {
            return;
        }
        self.wire.bind_buffer(target, id);
        self.state.set_last_encoded_buffer(target, id);
    }

    /// Makes every enabled attribute readable by a draw of `count` vertices from `first`.
    ///
    /// With `has_client_arrays` the draw is rebased: client arrays are streamed from `first`
    /// and buffer attributes re-pointed at `first`. Otherwise only the buffer bounds are
    /// checked. An attribute the current program reads that would run past its data is
    /// disabled on the host for this draw.
    fn send_vertex_attributes(
        &mut self,
        first: usize,
        count: usize,
        has_client_arrays: bool,
        instances: usize,
    ) {
        let array_buffer = self.state.bound_buffer(GL_ARRAY_BUFFER).unwrap_or(0);
        let mut host_vbo = self.state.last_encoded_buffer(GL_ARRAY_BUFFER);
        for i in 0..self.state.max_vertex_attribs() {
            let (attrib, binding) = {
                let vao = self.state.current_vao();
                let attrib = &vao.attribs[i];
                if !attrib.enabled {
                    continue;
                }
                (attrib.clone(), vao.binding_for(i).copied().unwrap_or_default())
            };
            let index = i as GLuint;
            if has_client_arrays && host_vbo != binding.buffer {
                self.wire.bind_buffer(GL_ARRAY_BUFFER, binding.buffer);
                host_vbo = binding.buffer;
            }

            let stride = usize::try_from(binding.effective_stride).unwrap_or(0);
            let first_byte = if binding.divisor == 0 { stride * first } else { 0 };
            let n = attrib_element_count(count, binding.divisor, instances);

            if binding.buffer == 0 {
                if attrib.elem_size == 0 {
                    self.wire.disable_vertex_attrib_array(index);
                    continue;
                }
                self.wire.enable_vertex_attrib_array(index);
                let VertexPointer::Client(bytes) = &attrib.pointer else {
                    continue;
                };
                if !self.state.is_attrib_used_by_program(i) {
                    continue;
                }
                let Some(data) = pack_client_elements(bytes, first_byte, stride, attrib.elem_size, n)
                else {
                    error!(index, first, count = n, len = bytes.len(), "client vertex array shorter than the draw");
                    self.wire.disable_vertex_attrib_array(index);
                    continue;
                };
                // Packed tightly, so the host sees stride 0.
                if attrib.is_int {
                    self.wire
                        .vertex_attrib_i_pointer_data(index, attrib.size, attrib.ty, 0, &data);
                } else {
                    self.wire.vertex_attrib_pointer_data(
                        index,
                        attrib.size,
                        attrib.ty,
                        attrib.normalized,
                        0,
                        &data,
                    );
                }
                continue;
            }

            let base = usize::try_from(binding.offset).unwrap_or(0);
            let start = base + attrib.relative_offset as usize + first_byte;
            let needed = stride * n.saturating_sub(1) + attrib.elem_size;
            let buffer_len = self
                .state
                .share_group()
                .buffer(binding.buffer)
                .map(|b| b.read().bytes().len());
            if buffer_len.is_some_and(|len| start + needed <= len) {
                if has_client_arrays {
                    self.wire.enable_vertex_attrib_array(index);
                    let pointer = VertexPointer::Offset(base + first_byte);
                    if attrib.is_int {
                        self.wire.vertex_attrib_i_pointer(
                            index,
                            attrib.size,
                            attrib.ty,
                            attrib.stride,
                            &pointer,
                        );
                    } else {
                        self.wire.vertex_attrib_pointer(
                            index,
                            attrib.size,
                            attrib.ty,
                            attrib.normalized,
                            attrib.stride,
                            &pointer,
                        );
                    }
                }
            } else if self.state.is_attrib_used_by_program(i) {
                error!(
                    index,
                    buffer = binding.buffer,
                    start,
                    end = start + needed,
                    ?buffer_len,
                    "vertex attribute reads past the end of its buffer; skipping it"
                );
                self.wire.disable_vertex_attrib_array(index);
            }
        }
        if has_client_arrays && host_vbo != array_buffer {
            self.wire.bind_buffer(GL_ARRAY_BUFFER, array_buffer);
            host_vbo = array_buffer;
        }
        self.state.set_last_encoded_buffer(GL_ARRAY_BUFFER, host_vbo);
    }

    fn finish_draw(&mut self) {
        self.state.post_draw();
        self.count_draw();
    }

    fn try_draw_arrays(
        &mut self,
        mode: GLenum,
        first: GLint,
        count: GLsizei,
        instances: Option<GLsizei>,
    ) -> GlResult {
        fail_if(!is_draw_mode(mode), GlError::InvalidEnum)?;
        fail_if(first < 0 || count < 0, GlError::InvalidValue)?;
        fail_if(instances.is_some_and(|n| n < 0), GlError::InvalidValue)?;
        self.check_framebuffer_complete(GL_DRAW_FRAMEBUFFER)?;

        let usage = self.state.current_vao_mut().vbo_usage();
        let instance_count = instances.map_or(0, |n| n as usize);
        let rebase = usage.has_client_arrays || !usage.has_vbos;
        self.send_vertex_attributes(first as usize, count as usize, rebase, instance_count);
        let first = if rebase { 0 } else { first };
        match instances {
            Some(n) => self.wire.draw_arrays_instanced(mode, first, count, n),
            None => self.wire.draw_arrays(mode, first, count),
        }
        self.finish_draw();
        Ok(())
    }

    fn encode_draw_elements(
        &mut self,
        mode: GLenum,
        count: GLsizei,
        ty: GLenum,
        kind: ElementsDraw,
        indices: DataSource<'_>,
    ) {
        match kind {
            ElementsDraw::Plain => self.wire.draw_elements(mode, count, ty, indices),
            ElementsDraw::Instanced(n) => {
                self.wire.draw_elements_instanced(mode, count, ty, n, indices)
            }
            ElementsDraw::Range { start, end } => {
                self.wire
                    .draw_range_elements(mode, start, end, count, ty, indices)
            }
        }
    }

    fn try_draw_elements(
        &mut self,
        mode: GLenum,
        count: GLsizei,
        ty: GLenum,
        kind: ElementsDraw,
        indices: DataSource<'_>,
    ) -> GlResult {
        fail_if(!is_draw_mode(mode), GlError::InvalidEnum)?;
        if let ElementsDraw::Range { start, end } = kind {
            fail_if(end < start, GlError::InvalidValue)?;
        }
        fail_if(count < 0, GlError::InvalidValue)?;
        let instances = match kind {
            ElementsDraw::Instanced(n) => {
                fail_if(n < 0, GlError::InvalidValue)?;
                n as usize
            }
            _ => 0,
        };
        let index_type = IndexType::from_gl(ty).ok_or(GlError::InvalidEnum)?;
        fail_if(
            self.state.transform_feedback_capturing(),
            GlError::InvalidOperation,
        )?;
        self.check_framebuffer_complete(GL_DRAW_FRAMEBUFFER)?;

        let usage = self.state.current_vao_mut().vbo_usage();
        let restart = self.state.primitive_restart_enabled();
        let n = count as usize;
        let len = n * index_type.size();
        let element_buffer = self.state.bound_buffer(GL_ELEMENT_ARRAY_BUFFER).unwrap_or(0);

        let (range, mut rebased) = if element_buffer != 0 {
            let offset = match indices {
                DataSource::BufferOffset(offset) => offset,
                DataSource::Null => 0,
                DataSource::Client(_) => return Err(GlError::InvalidOperation),
            };
            let buffer = self
                .state
                .share_group()
                .buffer(element_buffer)
                .ok_or(GlError::InvalidOperation)?;
            let mut data = buffer.write();
            let Some(range) = data.index_range(index_type, offset, n, restart) else {
                debug!(element_buffer, offset, count, "indices run past the element buffer");
                return Err(GlError::InvalidOperation);
            };
            if count == 0 {
                return Ok(());
            }
            if !usage.has_client_arrays {
                drop(data);
                self.send_vertex_attributes(0, range.max as usize + 1, false, instances);
                self.bind_buffer_cached(GL_ELEMENT_ARRAY_BUFFER, element_buffer);
                self.encode_draw_elements(mode, count, ty, kind, DataSource::BufferOffset(offset));
                self.finish_draw();
                return Ok(());
            }
            let rebased = data.bytes()[offset..offset + len].to_vec();
            drop(data);
            // The rebased indices travel inline, so the host must not read an element buffer.
            self.bind_buffer_cached(GL_ELEMENT_ARRAY_BUFFER, 0);
            (range, rebased)
        } else {
            let bytes = match indices {
                DataSource::Client(bytes) => bytes,
                DataSource::Null => &[][..],
                DataSource::BufferOffset(_) => return Err(GlError::InvalidOperation),
            };
            fail_if(bytes.len() < len, GlError::InvalidOperation)?;
            let range = calc_index_range(index_type, bytes, n, restart);
            if count == 0 {
                return Ok(());
            }
            (range, bytes[..len].to_vec())
        };

        recenter_indices(index_type, &mut rebased, n, range.min, restart);
        self.send_vertex_attributes(range.min as usize, range.vertex_count(), true, instances);
        let kind = match kind {
            ElementsDraw::Range { .. } => ElementsDraw::Range {
                start: 0,
                end: range.max - range.min,
            },
            other => other,
        };
        self.encode_draw_elements(mode, count, ty, kind, DataSource::Client(&rebased));
        self.finish_draw();
        Ok(())
    }

    /// `DrawArraysIndirect` (`ty = None`) and `DrawElementsIndirect`.
    fn try_draw_indirect(&mut self, mode: GLenum, ty: Option<GLenum>, indirect: GLintptr) -> GlResult {
        fail_if(!is_draw_mode(mode), GlError::InvalidEnum)?;
        if let Some(ty) = ty {
            IndexType::from_gl(ty).ok_or(GlError::InvalidEnum)?;
        }
        let usage = self.state.current_vao_mut().vbo_usage();
        fail_if(usage.has_client_arrays, GlError::InvalidOperation)?;
        fail_if(self.state.bound_vertex_array() == 0, GlError::InvalidOperation)?;
        fail_if(
            self.state.bound_buffer(GL_DRAW_INDIRECT_BUFFER).unwrap_or(0) == 0,
            GlError::InvalidOperation,
        )?;
        fail_if(indirect < 0, GlError::InvalidValue)?;
        if ty.is_some() {
            fail_if(
                self.state.transform_feedback_capturing(),
                GlError::InvalidOperation,
            )?;
        }
        self.check_framebuffer_complete(GL_DRAW_FRAMEBUFFER)?;

        match ty {
            Some(ty) => {
                let element_buffer = self.state.bound_buffer(GL_ELEMENT_ARRAY_BUFFER).unwrap_or(0);
                self.bind_buffer_cached(GL_ELEMENT_ARRAY_BUFFER, element_buffer);
                self.wire.draw_elements_indirect(mode, ty, indirect);
            }
            None => self.wire.draw_arrays_indirect(mode, indirect),
        }
        self.finish_draw();
        Ok(())
    }
}

impl<T: Transport> DrawApi for Gl2Encoder<T> {
    fn draw_arrays(&mut self, mode: GLenum, first: GLint, count: GLsizei) {
        self.guarded("glDrawArrays", |e| e.try_draw_arrays(mode, first, count, None))
    }

    fn draw_arrays_instanced(&mut self, mode: GLenum, first: GLint, count: GLsizei, instance_count: GLsizei) {
        self.guarded("glDrawArraysInstanced", |e| {
            e.try_draw_arrays(mode, first, count, Some(instance_count))
        })
    }

    fn draw_elements(&mut self, mode: GLenum, count: GLsizei, ty: GLenum, indices: DataSource<'_>) {
        self.guarded("glDrawElements", |e| {
            e.try_draw_elements(mode, count, ty, ElementsDraw::Plain, indices)
        })
    }

    fn draw_elements_instanced(
        &mut self,
        mode: GLenum,
        count: GLsizei,
        ty: GLenum,
        instance_count: GLsizei,
        indices: DataSource<'_>,
    ) {
        self.guarded("glDrawElementsInstanced", |e| {
            e.try_draw_elements(mode, count, ty, ElementsDraw::Instanced(instance_count), indices)
        })
    }

    fn draw_range_elements(
        &mut self,
        mode: GLenum,
        start: GLuint,
        end: GLuint,
        count: GLsizei,
        ty: GLenum,
        indices: DataSource<'_>,
    ) {
        self.guarded("glDrawRangeElements", |e| {
            e.try_draw_elements(mode, count, ty, ElementsDraw::Range { start, end }, indices)
        })
    }

    fn draw_arrays_indirect(&mut self, mode: GLenum, indirect: GLintptr) {
        self.guarded("glDrawArraysIndirect", |e| e.try_draw_indirect(mode, None, indirect))
    }

    fn draw_elements_indirect(&mut self, mode: GLenum, ty: GLenum, indirect: GLintptr) {
        self.guarded("glDrawElementsIndirect", |e| {
            e.try_draw_indirect(mode, Some(ty), indirect)
        })
    }

    fn dispatch_compute(&mut self, num_groups_x: GLuint, num_groups_y: GLuint, num_groups_z: GLuint) {
        self.wire.dispatch_compute(num_groups_x, num_groups_y, num_groups_z);
        self.state.post_dispatch_compute();
    }

    fn dispatch_compute_indirect(&mut self, indirect: GLintptr) {
        self.guarded("glDispatchComputeIndirect", |e| {
            fail_if(indirect < 0, GlError::InvalidValue)?;
            e.wire.dispatch_compute_indirect(indirect);
            e.state.post_dispatch_compute();
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aero_gles_protocol::{GlesOpcode, GlesPacketIter, MemoryTransport};
    use pretty_assertions::assert_eq;

    use super::super::test_support::*;
    use super::*;
    use crate::api::{BufferApi, FramebufferApi, VertexApi};

    /// Attribute 0 reads two floats per vertex from client memory holding vertices 0..4, each
    /// vertex `[v, v]`.
    fn client_positions(enc: &mut Gl2Encoder<MemoryTransport>) {
        let bytes: Vec<u8> = (0..4u8)
            .flat_map(|v| {
                let f = f32::from(v).to_le_bytes();
                f.into_iter().chain(f)
            })
            .collect();
        enc.vertex_attrib_pointer(0, 2, GL_FLOAT, false, 0, VertexPointer::Client(Arc::from(bytes)));
        enc.enable_vertex_attrib_array(0);
        assert_eq!(take_error(enc), None);
        clear(enc);
    }

    fn floats(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    #[test]
    fn draw_checks_run_in_order() {
        let mut enc = encoder();
        enc.draw_arrays(0x20, 0, 3);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        enc.draw_arrays(GL_TRIANGLES, 0, -1);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.draw_elements(GL_TRIANGLES, 3, GL_FLOAT, DataSource::Null);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        enc.draw_range_elements(GL_TRIANGLES, 5, 4, 3, GL_UNSIGNED_SHORT, DataSource::Null);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));

        // A bound framebuffer with nothing attached.
        enc.bind_framebuffer(GL_FRAMEBUFFER, 1);
        clear(&mut enc);
        enc.draw_arrays(GL_TRIANGLES, 0, 3);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidFramebufferOperation));
        assert!(opcodes(&mut enc).is_empty());
    }

    #[test]
    fn client_arrays_are_streamed_from_first() {
        let mut enc = encoder();
        client_positions(&mut enc);
        enc.draw_arrays(GL_TRIANGLES, 1, 3);
        assert_eq!(take_error(&mut enc), None);

        let bytes = sent(&mut enc);
        let packets: Vec<_> = GlesPacketIter::new(&bytes).map(Result::unwrap).collect();
        let ops: Vec<_> = packets.iter().map(|p| p.opcode().unwrap()).collect();
        assert_eq!(
            ops,
            vec![
                GlesOpcode::EnableVertexAttribArray,
                GlesOpcode::VertexAttribPointerData,
                GlesOpcode::DrawArrays
            ]
        );
        let mut args = packets[1].args();
        assert_eq!(args.u32().unwrap(), 0);
        assert_eq!(args.i32().unwrap(), 2);
        assert_eq!(args.u32().unwrap(), GL_FLOAT);
        assert_eq!(args.u32().unwrap(), 0);
        assert_eq!(args.i32().unwrap(), 0);
        assert_eq!(floats(args.blob().unwrap()), vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);

        let mut args = packets[2].args();
        assert_eq!(args.u32().unwrap(), GL_TRIANGLES);
        assert_eq!(args.i32().unwrap(), 0);
        assert_eq!(args.i32().unwrap(), 3);
    }

    #[test]
    fn client_indices_are_rebased_to_their_minimum() {
        let mut enc = encoder();
        client_positions(&mut enc);
        let indices: Vec<u8> = [3u16, 2, 3].iter().flat_map(|i| i.to_le_bytes()).collect();
        enc.draw_elements(GL_TRIANGLES, 3, GL_UNSIGNED_SHORT, DataSource::Client(&indices));
        assert_eq!(take_error(&mut enc), None);

        let bytes = sent(&mut enc);
        let packets: Vec<_> = GlesPacketIter::new(&bytes).map(Result::unwrap).collect();
        let data = packets
            .iter()
            .find(|p| p.opcode() == Some(GlesOpcode::VertexAttribPointerData))
            .unwrap();
        let mut args = data.args();
        for _ in 0..5 {
            args.u32().unwrap();
        }
        assert_eq!(floats(args.blob().unwrap()), vec![2.0, 2.0, 3.0, 3.0]);

        let draw = packets.last().unwrap();
        assert_eq!(draw.opcode(), Some(GlesOpcode::DrawElementsData));
        let mut args = draw.args();
        for _ in 0..3 {
            args.u32().unwrap();
        }
        let rebased: Vec<u8> = [1u16, 0, 1].iter().flat_map(|i| i.to_le_bytes()).collect();
        assert_eq!(args.blob().unwrap(), rebased.as_slice());
    }

    #[test]
    fn element_buffer_draws_check_bounds_and_forward_offsets() {
        let mut enc = encoder();
        let indices: Vec<u8> = [0u16, 1, 2].iter().flat_map(|i| i.to_le_bytes()).collect();
        enc.bind_buffer(GL_ELEMENT_ARRAY_BUFFER, 5);
        enc.buffer_data(GL_ELEMENT_ARRAY_BUFFER, 6, Some(&indices), GL_STATIC_DRAW);
        enc.bind_buffer(GL_ARRAY_BUFFER, 6);
        enc.buffer_data(GL_ARRAY_BUFFER, 48, None, GL_STATIC_DRAW);
        enc.vertex_attrib_pointer(0, 4, GL_FLOAT, false, 0, VertexPointer::Offset(0));
        enc.enable_vertex_attrib_array(0);
        clear(&mut enc);

        enc.draw_elements(GL_TRIANGLES, 4, GL_UNSIGNED_SHORT, DataSource::BufferOffset(0));
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.draw_elements(GL_TRIANGLES, 2, GL_UNSIGNED_SHORT, DataSource::BufferOffset(2));
        assert_eq!(take_error(&mut enc), None);
        assert_eq!(opcodes(&mut enc), vec![GlesOpcode::DrawElementsOffset]);
        assert_eq!(enc.state().share_group().buffer(5).unwrap().read().cached_index_ranges(), 1);
    }

    #[test]
    fn attributes_past_the_buffer_end_are_disabled_for_the_draw() {
        let mut enc = encoder();
        enc.bind_buffer(GL_ARRAY_BUFFER, 6);
        enc.buffer_data(GL_ARRAY_BUFFER, 32, None, GL_STATIC_DRAW);
        enc.vertex_attrib_pointer(0, 4, GL_FLOAT, false, 0, VertexPointer::Offset(0));
        enc.enable_vertex_attrib_array(0);
        clear(&mut enc);

        enc.draw_arrays(GL_TRIANGLES, 0, 2);
        assert_eq!(opcodes(&mut enc), vec![GlesOpcode::DrawArrays]);
        clear(&mut enc);
        enc.draw_arrays(GL_TRIANGLES, 0, 3);
        assert_eq!(
            opcodes(&mut enc),
            vec![GlesOpcode::DisableVertexAttribArray, GlesOpcode::DrawArrays]
        );
    }

    #[test]
    fn per_instance_client_arrays_send_one_element_per_divisor() {
        let mut enc = encoder();
        client_positions(&mut enc);
        enc.vertex_attrib_divisor(0, 2);
        clear(&mut enc);
        enc.draw_arrays_instanced(GL_TRIANGLES, 2, 3, 3);
        assert_eq!(take_error(&mut enc), None);

        let bytes = sent(&mut enc);
        let data = GlesPacketIter::new(&bytes)
            .map(Result::unwrap)
            .find(|p| p.opcode() == Some(GlesOpcode::VertexAttribPointerData))
            .unwrap();
        let mut args = data.args();
        for _ in 0..5 {
            args.u32().unwrap();
        }
        assert_eq!(floats(args.blob().unwrap()), vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn capturing_transform_feedback_rejects_element_draws() {
        let mut enc = encoder();
        enc.state.set_current_program(1);
        enc.state.begin_transform_feedback(GL_TRIANGLES).unwrap();
        let indices = [0u8, 1, 2];
        enc.draw_elements(GL_TRIANGLES, 3, GL_UNSIGNED_BYTE, DataSource::Client(&indices));
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.draw_arrays(GL_TRIANGLES, 0, 3);
        assert_eq!(take_error(&mut enc), None);
    }

    #[test]
    fn indirect_draws_need_a_vao_and_an_indirect_buffer() {
        let mut enc = encoder_es31();
        enc.draw_arrays_indirect(GL_TRIANGLES, 0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        enc.transport_mut().push_reply_u32(1);
        enc.gen_vertex_arrays(1);
        enc.bind_vertex_array(1);
        enc.draw_arrays_indirect(GL_TRIANGLES, 0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        enc.bind_buffer(GL_DRAW_INDIRECT_BUFFER, 3);
        clear(&mut enc);
        enc.draw_arrays_indirect(GL_TRIANGLES, 16);
        enc.draw_elements_indirect(GL_TRIANGLES, GL_UNSIGNED_INT, 0);
        assert_eq!(take_error(&mut enc), None);
        assert_eq!(
            opcodes(&mut enc),
            vec![GlesOpcode::DrawArraysIndirect, GlesOpcode::DrawElementsIndirect]
        );
    }

    #[test]
    fn draws_mark_transform_feedback_buffers_host_dirty() {
        let mut enc = encoder();
        enc.bind_buffer(GL_TRANSFORM_FEEDBACK_BUFFER, 8);
        enc.buffer_data(GL_TRANSFORM_FEEDBACK_BUFFER, 16, None, GL_STATIC_DRAW);
        enc.state().share_group().buffer(8).unwrap().write().host_map_dirty = false;
        enc.draw_arrays(GL_POINTS, 0, 1);
        assert!(enc.state().share_group().buffer(8).unwrap().read().host_map_dirty);
    }

    #[test]
    fn element_count_follows_the_divisor() {
        assert_eq!(attrib_element_count(6, 0, 4), 6);
        assert_eq!(attrib_element_count(6, 3, 4), 2);
        assert_eq!(attrib_element_count(6, 3, 0), 1);
        assert_eq!(pack_client_elements(&[0, 1, 2, 3, 4, 5], 1, 2, 1, 3), Some(vec![1, 3, 5]));
        assert_eq!(pack_client_elements(&[0, 1, 2, 3, 4], 1, 2, 1, 3), None);
    }
}
