use aero_gles_protocol::gl::*;

gles_family! {
    /// Draw calls and compute dispatch.
    ///
    /// The verbatim forms assume every enabled attribute reads a buffer; client arrays are
    /// streamed only by encoders that track vertex state.
    pub trait DrawApi {
        commands {
            fn draw_arrays(mode: GLenum, first: GLint, count: GLsizei) = DrawArrays;
            fn draw_arrays_instanced(mode: GLenum, first: GLint, count: GLsizei, instance_count: GLsizei) = DrawArraysInstanced;
            fn draw_arrays_indirect(mode: GLenum, indirect: GLintptr) = DrawArraysIndirect;
            fn draw_elements_indirect(mode: GLenum, ty: GLenum, indirect: GLintptr) = DrawElementsIndirect;
            fn dispatch_compute(num_groups_x: GLuint, num_groups_y: GLuint, num_groups_z: GLuint) = DispatchCompute;
            fn dispatch_compute_indirect(indirect: GLintptr) = DispatchComputeIndirect;
            fn memory_barrier(barriers: GLbitfield) = MemoryBarrier;
        }
        returns {}
        outputs {}
        uploads {
            fn draw_elements(mode: GLenum, count: GLsizei, ty: GLenum; indices) = DrawElementsData / DrawElementsOffset;
            fn draw_elements_instanced(
                mode: GLenum,
                count: GLsizei,
                ty: GLenum,
                instance_count: GLsizei;
                indices
            ) = DrawElementsInstancedData / DrawElementsInstancedOffset;
            fn draw_range_elements(
                mode: GLenum,
                start: GLuint,
                end: GLuint,
                count: GLsizei,
                ty: GLenum;
                indices
            ) = DrawRangeElementsData / DrawRangeElementsOffset;
        }
        gens {}
        provided {}
    }
}
