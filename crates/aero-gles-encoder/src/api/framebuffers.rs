use aero_gles_protocol::gl::*;
use aero_gles_protocol::{GlesOpcode, Transport};

use super::{EglImage, PixelSink};
use crate::wire::GlesWire;

gles_family! {
    /// Renderbuffers, framebuffers and pixel readback.
    pub trait FramebufferApi {
        commands {
            fn delete_renderbuffers(renderbuffers: &[GLuint]) = DeleteRenderbuffers;
            fn bind_renderbuffer(target: GLenum, renderbuffer: GLuint) = BindRenderbuffer;
            fn renderbuffer_storage(
                target: GLenum,
                internal_format: GLenum,
                width: GLsizei,
                height: GLsizei,
            ) = RenderbufferStorage;
            fn renderbuffer_storage_multisample(
                target: GLenum,
                samples: GLsizei,
                internal_format: GLenum,
                width: GLsizei,
                height: GLsizei,
            ) = RenderbufferStorageMultisample;
            fn egl_image_target_renderbuffer_storage_oes(target: GLenum, image: EglImage) = EglImageTargetRenderbufferStorageOes;
            fn delete_framebuffers(framebuffers: &[GLuint]) = DeleteFramebuffers;
            fn bind_framebuffer(target: GLenum, framebuffer: GLuint) = BindFramebuffer;
            fn framebuffer_texture_2d(
                target: GLenum,
                attachment: GLenum,
                tex_target: GLenum,
                texture: GLuint,
                level: GLint,
            ) = FramebufferTexture2D;
            fn framebuffer_renderbuffer(
                target: GLenum,
                attachment: GLenum,
                renderbuffer_target: GLenum,
                renderbuffer: GLuint,
            ) = FramebufferRenderbuffer;
            fn framebuffer_texture_layer(
                target: GLenum,
                attachment: GLenum,
                texture: GLuint,
                level: GLint,
                layer: GLint,
            ) = FramebufferTextureLayer;
            fn framebuffer_parameteri(target: GLenum, pname: GLenum, param: GLint) = FramebufferParameteri;
            fn draw_buffers(buffers: &[GLenum]) = DrawBuffers;
            fn read_buffer(src: GLenum) = ReadBuffer;
            fn blit_framebuffer(
                src_x0: GLint,
                src_y0: GLint,
                src_x1: GLint,
                src_y1: GLint,
                dst_x0: GLint,
                dst_y0: GLint,
                dst_x1: GLint,
                dst_y1: GLint,
                mask: GLbitfield,
                filter: GLenum,
            ) = BlitFramebuffer;
            fn invalidate_framebuffer(target: GLenum, attachments: &[GLenum]) = InvalidateFramebuffer;
            fn invalidate_sub_framebuffer(
                target: GLenum,
                attachments: &[GLenum],
                x: GLint,
                y: GLint,
                width: GLsizei,
                height: GLsizei,
            ) = InvalidateSubFramebuffer;
        }
        returns {
            fn is_renderbuffer(renderbuffer: GLuint) -> bool = IsRenderbuffer;
            fn is_framebuffer(framebuffer: GLuint) -> bool = IsFramebuffer;
            fn check_framebuffer_status(target: GLenum) -> GLenum = CheckFramebufferStatus;
        }
        outputs {
            fn get_renderbuffer_parameteriv(target: GLenum, pname: GLenum; out: &mut [GLint]) = GetRenderbufferParameteriv;
            fn get_framebuffer_attachment_parameteriv(
                target: GLenum,
                attachment: GLenum,
                pname: GLenum;
                out: &mut [GLint]
            ) = GetFramebufferAttachmentParameteriv;
        }
        uploads {}
        gens {
            fn gen_renderbuffers = GenRenderbuffers;
            fn gen_framebuffers = GenFramebuffers;
        }
        provided {
            /// Client destinations receive exactly `dst.len()` bytes from the host.
            #[allow(clippy::too_many_arguments)]
            fn read_pixels(
                &mut self,
                x: GLint,
                y: GLint,
                width: GLsizei,
                height: GLsizei,
                format: GLenum,
                ty: GLenum,
                dst: PixelSink<'_>,
            ) {
                self.wire().read_pixels(x, y, width, height, format, ty, dst);
            }
        }
    }
}

impl<T: Transport> GlesWire<T> {
    /// `ReadPixels` replies with the requested byte count; `ReadPixelsOffset` writes into the
    /// bound pack buffer on the host and has no reply.
    #[allow(clippy::too_many_arguments)]
    pub fn read_pixels(
        &mut self,
        x: GLint,
        y: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        dst: PixelSink<'_>,
    ) {
        match dst {
            PixelSink::Client(out) => self.call_bytes(
                GlesOpcode::ReadPixels,
                &[&x, &y, &width, &height, &format, &ty],
                out,
            ),
            PixelSink::BufferOffset(offset) => self.command(
                GlesOpcode::ReadPixelsOffset,
                &[&x, &y, &width, &height, &format, &ty, &(offset as u64)],
            ),
        }
    }
}
