use aero_gles_protocol::gl::*;
use aero_gles_protocol::Transport;
use aero_gles_state::caps::ilog2;
use aero_gles_state::format;
use aero_gles_state::{fail_if, AttachmentInfo, GlError, GlResult, ObjectKind};
use tracing::debug;

use super::Gl2Encoder;
use crate::api::{EglImage, FramebufferApi, PixelSink};
use crate::pixel_stream;

fn is_depth_or_stencil_attachment(attachment: GLenum) -> bool {
    matches!(
        attachment,
        GL_DEPTH_ATTACHMENT | GL_STENCIL_ATTACHMENT | GL_DEPTH_STENCIL_ATTACHMENT
    )
}

/// Queries `glGetFramebufferAttachmentParameteriv` answers from the attachment shadow.
fn local_attachment_parameter(info: &AttachmentInfo, pname: GLenum) -> Option<GLint> {
    let v = match pname {
        GL_FRAMEBUFFER_ATTACHMENT_OBJECT_TYPE => info.kind as GLint,
        GL_FRAMEBUFFER_ATTACHMENT_OBJECT_NAME => info.name as GLint,
        GL_FRAMEBUFFER_ATTACHMENT_TEXTURE_LEVEL => info.level,
        GL_FRAMEBUFFER_ATTACHMENT_TEXTURE_LAYER => info.layer,
        GL_FRAMEBUFFER_ATTACHMENT_TEXTURE_CUBE_MAP_FACE if is_cube_face_target(info.tex_target) => {
            info.tex_target as GLint
        }
        GL_FRAMEBUFFER_ATTACHMENT_TEXTURE_CUBE_MAP_FACE => 0,
        _ => return None,
    };
    Some(v)
}

impl<T: Transport> Gl2Encoder<T> {
    fn is_valid_attachment(&self, attachment: GLenum) -> bool {
        let es3 = self.state.is_es3();
        match attachment {
            GL_DEPTH_ATTACHMENT | GL_STENCIL_ATTACHMENT => true,
            GL_DEPTH_STENCIL_ATTACHMENT => es3,
            GL_COLOR_ATTACHMENT0 => true,
            a => es3
                && color_attachment_index(a)
                    .is_some_and(|i| i < self.state.caps().max_color_attachments as usize),
        }
    }

    fn check_attachment_target(&self, target: GLenum, attachment: GLenum) -> GlResult {
        fail_if(!self.state.is_valid_framebuffer_target(target), GlError::InvalidEnum)?;
        fail_if(!self.is_valid_attachment(attachment), GlError::InvalidEnum)?;
        Ok(())
    }

    fn try_bind_renderbuffer(&mut self, target: GLenum, renderbuffer: GLuint) -> GlResult {
        fail_if(target != GL_RENDERBUFFER, GlError::InvalidEnum)?;
        if self.state.bound_renderbuffer() == renderbuffer {
            debug!(renderbuffer, "renderbuffer bind elided");
            return Ok(());
        }
        self.state.bind_renderbuffer(renderbuffer);
        self.wire.bind_renderbuffer(target, renderbuffer);
        Ok(())
    }

    fn try_renderbuffer_storage(
        &mut self,
        target: GLenum,
        samples: Option<GLsizei>,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    ) -> GlResult {
        fail_if(target != GL_RENDERBUFFER, GlError::InvalidEnum)?;
        fail_if(self.state.bound_renderbuffer() == 0, GlError::InvalidOperation)?;
        let caps = self.state.caps();
        fail_if(
            !format::is_renderbuffer_format(internal_format, caps.format_caps),
            GlError::InvalidEnum,
        )?;
        let max = caps.max_renderbuffer_size;
        fail_if(
            width < 0 || height < 0 || width > max || height > max,
            GlError::InvalidValue,
        )?;
        if let Some(samples) = samples {
            fail_if(samples < 0, GlError::InvalidValue)?;
            let max_samples = format::max_samples_for_format(internal_format, caps.max_samples);
            fail_if(samples > max_samples, GlError::InvalidOperation)?;
        }

        self.state.set_bound_renderbuffer_storage(
            internal_format,
            samples.unwrap_or(0),
            width,
            height,
        );
        match samples {
            None => self
                .wire
                .renderbuffer_storage(target, internal_format, width, height),
            Some(samples) => self.wire.renderbuffer_storage_multisample(
                target,
                samples,
                internal_format,
                width,
                height,
            ),
        }
        Ok(())
    }

    fn try_get_renderbuffer_parameter(
        &mut self,
        target: GLenum,
        pname: GLenum,
        out: &mut [GLint],
    ) -> GlResult {
        fail_if(target != GL_RENDERBUFFER, GlError::InvalidEnum)?;
        let known = matches!(
            pname,
            GL_RENDERBUFFER_WIDTH
                | GL_RENDERBUFFER_HEIGHT
                | GL_RENDERBUFFER_INTERNAL_FORMAT
                | GL_RENDERBUFFER_RED_SIZE..=GL_RENDERBUFFER_STENCIL_SIZE
        ) || (pname == GL_RENDERBUFFER_SAMPLES && self.state.is_es3());
        fail_if(!known, GlError::InvalidEnum)?;
        let rec = self
            .state
            .bound_renderbuffer_ref()
            .ok_or(GlError::InvalidOperation)?;

        let local = {
            let r = rec.read();
            match pname {
                GL_RENDERBUFFER_WIDTH => Some(r.width),
                GL_RENDERBUFFER_HEIGHT => Some(r.height),
                GL_RENDERBUFFER_INTERNAL_FORMAT => Some(r.format as GLint),
                GL_RENDERBUFFER_SAMPLES => Some(r.samples),
                _ => None,
            }
        };
        match local {
            Some(v) => {
                if let Some(slot) = out.first_mut() {
                    *slot = v;
                }
            }
            None => self.safe_host_query(out, |w, o| w.get_renderbuffer_parameteriv(target, pname, o)),
        }
        Ok(())
    }

    fn try_bind_framebuffer(&mut self, target: GLenum, framebuffer: GLuint) -> GlResult {
        fail_if(!self.state.is_valid_framebuffer_target(target), GlError::InvalidEnum)?;
        let draw = self.state.bound_framebuffer(GL_DRAW_FRAMEBUFFER);
        let read = self.state.bound_framebuffer(GL_READ_FRAMEBUFFER);
        let unchanged = match target {
            GL_DRAW_FRAMEBUFFER => draw == framebuffer,
            GL_READ_FRAMEBUFFER => read == framebuffer,
            _ => draw == framebuffer && read == framebuffer,
        };
        if unchanged {
            debug!(target, framebuffer, "framebuffer bind elided");
            return Ok(());
        }
        self.state.bind_framebuffer(target, framebuffer);
        self.wire.bind_framebuffer(target, framebuffer);
        Ok(())
    }

    fn try_framebuffer_texture_2d(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        tex_target: GLenum,
        texture: GLuint,
        level: GLint,
    ) -> GlResult {
        fail_if(!self.state.is_valid_framebuffer_target(target), GlError::InvalidEnum)?;
        let valid_tex_target = tex_target == GL_TEXTURE_2D
            || is_cube_face_target(tex_target)
            || (tex_target == GL_TEXTURE_2D_MULTISAMPLE && self.state.is_es31());
        fail_if(!valid_tex_target, GlError::InvalidEnum)?;
        fail_if(!self.is_valid_attachment(attachment), GlError::InvalidEnum)?;
        fail_if(self.state.bound_framebuffer(target) == 0, GlError::InvalidOperation)?;

        let rec = match texture {
            0 => None,
            id => Some(
                self.state
                    .share_group()
                    .texture(id)
                    .ok_or(GlError::InvalidOperation)?,
            ),
        };
        let is_cube = rec
            .as_ref()
            .is_some_and(|r| r.read().target == GL_TEXTURE_CUBE_MAP);
        fail_if(
            texture != 0 && is_cube_face_target(tex_target) != is_cube,
            GlError::InvalidOperation,
        )?;
        if texture != 0 {
            fail_if(level < 0, GlError::InvalidValue)?;
            let caps = self.state.caps();
            let max = match tex_target {
                GL_TEXTURE_2D | GL_TEXTURE_2D_MULTISAMPLE => caps.max_texture_size,
                _ => caps.max_cube_map_texture_size,
            };
            fail_if(level > ilog2(max), GlError::InvalidValue)?;
        }

        self.state
            .attach_texture(target, attachment, rec.as_ref().map(|r| (r, tex_target)), level, 0);
        self.wire
            .framebuffer_texture_2d(target, attachment, tex_target, texture, level);
        Ok(())
    }

    fn try_framebuffer_renderbuffer(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        renderbuffer_target: GLenum,
        renderbuffer: GLuint,
    ) -> GlResult {
        self.check_attachment_target(target, attachment)?;
        fail_if(renderbuffer_target != GL_RENDERBUFFER, GlError::InvalidEnum)?;
        fail_if(self.state.bound_framebuffer(target) == 0, GlError::InvalidOperation)?;
        let rec = match renderbuffer {
            0 => None,
            id => {
                // Only a renderbuffer that has been bound has an object behind its name.
                fail_if(!self.state.is_renderbuffer(id), GlError::InvalidOperation)?;
                self.state.share_group().renderbuffer(id)
            }
        };

        self.state.attach_renderbuffer(target, attachment, rec.as_ref());
        self.wire
            .framebuffer_renderbuffer(target, attachment, renderbuffer_target, renderbuffer);
        Ok(())
    }

    fn try_framebuffer_texture_layer(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        texture: GLuint,
        level: GLint,
        layer: GLint,
    ) -> GlResult {
        self.check_attachment_target(target, attachment)?;
        let caps = self.state.caps();
        if texture != 0 {
            fail_if(
                layer < 0 || layer > caps.max_array_texture_layers - 1,
                GlError::InvalidValue,
            )?;
        }
        fail_if(self.state.bound_framebuffer(target) == 0, GlError::InvalidOperation)?;

        let rec = match texture {
            0 => None,
            id => {
                let rec = self
                    .state
                    .share_group()
                    .texture(id)
                    .ok_or(GlError::InvalidOperation)?;
                let tex_target = rec.read().target;
                fail_if(
                    !matches!(tex_target, GL_TEXTURE_2D_ARRAY | GL_TEXTURE_3D),
                    GlError::InvalidOperation,
                )?;
                fail_if(level < 0, GlError::InvalidValue)?;
                fail_if(
                    tex_target == GL_TEXTURE_3D && layer >= caps.max_3d_texture_size,
                    GlError::InvalidValue,
                )?;
                Some((rec, tex_target))
            }
        };

        self.state.attach_texture(
            target,
            attachment,
            rec.as_ref().map(|(r, t)| (r, *t)),
            level,
            layer,
        );
        self.wire
            .framebuffer_texture_layer(target, attachment, texture, level, layer);
        Ok(())
    }

    fn try_framebuffer_parameteri(&mut self, target: GLenum, pname: GLenum, param: GLint) -> GlResult {
        fail_if(
            !self.state.is_es31() || !self.state.is_valid_framebuffer_target(target),
            GlError::InvalidEnum,
        )?;
        fail_if(
            !matches!(
                pname,
                GL_FRAMEBUFFER_DEFAULT_WIDTH
                    | GL_FRAMEBUFFER_DEFAULT_HEIGHT
                    | GL_FRAMEBUFFER_DEFAULT_SAMPLES
                    | GL_FRAMEBUFFER_DEFAULT_FIXED_SAMPLE_LOCATIONS
            ),
            GlError::InvalidEnum,
        )?;
        fail_if(self.state.bound_framebuffer(target) == 0, GlError::InvalidOperation)?;
        fail_if(param < 0, GlError::InvalidValue)?;
        self.state.set_framebuffer_parameter(target, pname, param)?;
        self.wire.framebuffer_parameteri(target, pname, param);
        Ok(())
    }

    fn try_get_framebuffer_attachment_parameter(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        pname: GLenum,
        out: &mut [GLint],
    ) -> GlResult {
        fail_if(!self.state.is_valid_framebuffer_target(target), GlError::InvalidEnum)?;
        let bound = self.state.bound_framebuffer(target) != 0;
        let default_buffer = matches!(attachment, GL_BACK | GL_FRONT | GL_DEPTH | GL_STENCIL);
        fail_if(!bound && !default_buffer, GlError::InvalidOperation)?;
        fail_if(bound && default_buffer, GlError::InvalidOperation)?;

        let info = self.state.attachment_info(target, attachment);
        let has_object = !info.is_none();
        let names_object = matches!(
            pname,
            GL_FRAMEBUFFER_ATTACHMENT_OBJECT_NAME | GL_FRAMEBUFFER_ATTACHMENT_OBJECT_TYPE
        );
        if bound {
            fail_if(!names_object && !has_object, GlError::InvalidOperation)?;
            let texture_only = matches!(
                pname,
                GL_FRAMEBUFFER_ATTACHMENT_TEXTURE_LEVEL
                    | GL_FRAMEBUFFER_ATTACHMENT_TEXTURE_CUBE_MAP_FACE
                    | GL_FRAMEBUFFER_ATTACHMENT_TEXTURE_LAYER
            );
            fail_if(texture_only && info.kind != GL_TEXTURE, GlError::InvalidEnum)?;
            if attachment == GL_DEPTH_STENCIL_ATTACHMENT && pname == GL_FRAMEBUFFER_ATTACHMENT_OBJECT_NAME {
                let depth = self.state.attachment_info(target, GL_DEPTH_ATTACHMENT);
                let stencil = self.state.attachment_info(target, GL_STENCIL_ATTACHMENT);
                fail_if(
                    (depth.kind, depth.name) != (stencil.kind, stencil.name),
                    GlError::InvalidOperation,
                )?;
            }
            if let Some(v) = local_attachment_parameter(&info, pname) {
                if let Some(slot) = out.first_mut() {
                    *slot = v;
                }
                return Ok(());
            }
        } else {
            fail_if(
                matches!(attachment, GL_BACK | GL_FRONT)
                    && pname == GL_FRAMEBUFFER_ATTACHMENT_OBJECT_NAME,
                GlError::InvalidEnum,
            )?;
        }
        self.safe_host_query(out, |w, o| {
            w.get_framebuffer_attachment_parameteriv(target, attachment, pname, o)
        });
        Ok(())
    }

    fn try_draw_buffers(&mut self, buffers: &[GLenum]) -> GlResult {
        let fb = self.state.bound_framebuffer(GL_DRAW_FRAMEBUFFER);
        fail_if(fb == 0 && buffers.len() > 1, GlError::InvalidOperation)?;
        fail_if(
            buffers.len() > self.state.caps().max_draw_buffers as usize,
            GlError::InvalidValue,
        )?;
        for (i, &buf) in buffers.iter().enumerate() {
            let index = color_attachment_index(buf);
            fail_if(
                buf != GL_NONE && buf != GL_BACK && index.is_none(),
                GlError::InvalidEnum,
            )?;
            let misplaced = if fb == 0 {
                index.is_some()
            } else {
                buf == GL_BACK || index.is_some_and(|j| j != i)
            };
            fail_if(misplaced, GlError::InvalidOperation)?;
        }
        self.wire.draw_buffers(buffers);
        Ok(())
    }

    fn try_read_buffer(&mut self, src: GLenum) -> GlResult {
        let index = color_attachment_index(src);
        fail_if(
            index.is_some_and(|i| i >= self.state.caps().max_color_attachments as usize),
            GlError::InvalidOperation,
        )?;
        fail_if(
            src != GL_NONE && src != GL_BACK && index.is_none(),
            GlError::InvalidEnum,
        )?;
        let fb = self.state.bound_framebuffer(GL_READ_FRAMEBUFFER);
        fail_if(fb == 0 && index.is_some(), GlError::InvalidOperation)?;
        fail_if(fb != 0 && src == GL_BACK, GlError::InvalidOperation)?;
        self.wire.read_buffer(src);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn try_blit_framebuffer(
        &mut self,
        src: [GLint; 4],
        dst: [GLint; 4],
        mask: GLbitfield,
        filter: GLenum,
    ) -> GlResult {
        let all = GL_COLOR_BUFFER_BIT | GL_DEPTH_BUFFER_BIT | GL_STENCIL_BUFFER_BIT;
        fail_if(mask & !all != 0, GlError::InvalidValue)?;
        fail_if(
            !matches!(filter, GL_NEAREST | GL_LINEAR),
            GlError::InvalidEnum,
        )?;
        self.check_framebuffer_complete(GL_DRAW_FRAMEBUFFER)?;
        self.check_framebuffer_complete(GL_READ_FRAMEBUFFER)?;

        let both_bound = self.state.bound_framebuffer(GL_READ_FRAMEBUFFER) != 0
            && self.state.bound_framebuffer(GL_DRAW_FRAMEBUFFER) != 0;
        let read = self.state.attachment_info(GL_READ_FRAMEBUFFER, GL_COLOR_ATTACHMENT0);
        let draw = self.state.attachment_info(GL_DRAW_FRAMEBUFFER, GL_COLOR_ATTACHMENT0);
        if mask & GL_COLOR_BUFFER_BIT != 0 {
            let read_integer = format::is_integer_format(read.internal_format);
            fail_if(
                read.kind == GL_TEXTURE && filter == GL_LINEAR && read_integer,
                GlError::InvalidOperation,
            )?;
            fail_if(
                both_bound
                    && read.kind == GL_TEXTURE
                    && draw.kind == GL_TEXTURE
                    && read_integer != format::is_integer_format(draw.internal_format),
                GlError::InvalidOperation,
            )?;
        }
        for (bit, attachment) in [
            (GL_DEPTH_BUFFER_BIT, GL_DEPTH_ATTACHMENT),
            (GL_STENCIL_BUFFER_BIT, GL_STENCIL_ATTACHMENT),
        ] {
            if mask & bit == 0 {
                continue;
            }
            let r = self.state.attachment_info(GL_READ_FRAMEBUFFER, attachment);
            let d = self.state.attachment_info(GL_DRAW_FRAMEBUFFER, attachment);
            fail_if(
                both_bound
                    && r.kind == GL_RENDERBUFFER
                    && d.kind == GL_RENDERBUFFER
                    && r.internal_format != d.internal_format,
                GlError::InvalidOperation,
            )?;
            fail_if(filter != GL_NEAREST, GlError::InvalidOperation)?;
        }

        fail_if(draw.samples > 0, GlError::InvalidOperation)?;
        if read.kind == GL_RENDERBUFFER && read.samples > 0 && draw.kind == GL_RENDERBUFFER {
            fail_if(
                both_bound && read.internal_format != draw.internal_format,
                GlError::InvalidOperation,
            )?;
            fail_if(src != dst, GlError::InvalidOperation)?;
        }

        let [sx0, sy0, sx1, sy1] = src;
        let [dx0, dy0, dx1, dy1] = dst;
        self.wire
            .blit_framebuffer(sx0, sy0, sx1, sy1, dx0, dy0, dx1, dy1, mask, filter);
        Ok(())
    }

    fn check_invalidate(&self, target: GLenum, attachments: &[GLenum]) -> GlResult {
        fail_if(!self.state.is_valid_framebuffer_target(target), GlError::InvalidEnum)?;
        let limit = GL_COLOR_ATTACHMENT0 + self.state.caps().max_color_attachments as GLenum;
        let past_limit = attachments
            .iter()
            .any(|&a| !is_depth_or_stencil_attachment(a) && a >= limit);
        fail_if(past_limit, GlError::InvalidOperation)
    }

    #[allow(clippy::too_many_arguments)]
    fn try_read_pixels(
        &mut self,
        x: GLint,
        y: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        dst: PixelSink<'_>,
    ) -> GlResult {
        fail_if(
            !format::is_valid_pixel_format(format) || !format::is_valid_pixel_type(ty),
            GlError::InvalidEnum,
        )?;
        fail_if(format::pixel_size(format, ty) == 0, GlError::InvalidOperation)?;
        fail_if(width < 0 || height < 0, GlError::InvalidValue)?;

        let layout = self.state.pixel_store.pack_layout(width, height, format, ty)?;
        let empty = width == 0 || height == 0;
        let pack = self.state.bound_buffer_ref(GL_PIXEL_PACK_BUFFER);
        if let Some(buf) = &pack {
            let b = buf.read();
            fail_if(b.mapped, GlError::InvalidOperation)?;
            let offset = match dst {
                PixelSink::BufferOffset(offset) => offset,
                PixelSink::Client(_) => return Err(GlError::InvalidOperation),
            };
            let needed = if empty { 0 } else { layout.needed_size };
            fail_if(
                offset.checked_add(needed).map_or(true, |end| end > b.size),
                GlError::InvalidOperation,
            )?;
        } else {
            fail_if(
                matches!(dst, PixelSink::BufferOffset(_)),
                GlError::InvalidOperation,
            )?;
        }
        self.check_framebuffer_complete(GL_READ_FRAMEBUFFER)?;

        let read = self.state.attachment_info(GL_READ_FRAMEBUFFER, GL_COLOR_ATTACHMENT0);
        if self.state.bound_framebuffer(GL_READ_FRAMEBUFFER) != 0 {
            fail_if(read.samples > 0, GlError::InvalidOperation)?;
        }
        if read.kind == GL_TEXTURE {
            let integer_surface = format::is_integer_format(read.internal_format);
            fail_if(
                integer_surface != (format == GL_RGBA_INTEGER),
                GlError::InvalidOperation,
            )?;
        }

        match dst {
            PixelSink::BufferOffset(offset) => {
                self.wire
                    .read_pixels(x, y, width, height, format, ty, PixelSink::BufferOffset(offset));
            }
            PixelSink::Client(out) if empty => {
                debug!(len = out.len(), "empty readback");
            }
            PixelSink::Client(out) => {
                fail_if(out.len() < layout.needed_size, GlError::InvalidOperation)?;
                let rows = height as usize;
                let size = pixel_stream::tight_size(&layout, rows, 1);
                if layout.is_tightly_packed() {
                    let start = layout.start_offset;
                    self.wire.read_pixels(
                        x,
                        y,
                        width,
                        height,
                        format,
                        ty,
                        PixelSink::Client(&mut out[start..start + size]),
                    );
                } else {
                    let mut tight = vec![0u8; size];
                    self.wire.read_pixels(
                        x,
                        y,
                        width,
                        height,
                        format,
                        ty,
                        PixelSink::Client(&mut tight),
                    );
                    pixel_stream::scatter(&tight, out, &layout, rows)?;
                }
            }
        }
        self.state.post_read_pixels();
        Ok(())
    }
}

impl<T: Transport> FramebufferApi for Gl2Encoder<T> {
    fn gen_renderbuffers(&mut self, n: GLsizei) -> Vec<GLuint> {
        self.guarded("glGenRenderbuffers", |e| {
            fail_if(n < 0, GlError::InvalidValue)?;
            let names = e.wire.gen_renderbuffers(n);
            e.state.set_existence(ObjectKind::Renderbuffer, true, &names);
            Ok(names)
        })
    }

    fn delete_renderbuffers(&mut self, renderbuffers: &[GLuint]) {
        for &id in renderbuffers {
            self.state.delete_renderbuffer(id);
        }
        self.wire.delete_renderbuffers(renderbuffers);
    }

    fn bind_renderbuffer(&mut self, target: GLenum, renderbuffer: GLuint) {
        self.guarded("glBindRenderbuffer", |e| e.try_bind_renderbuffer(target, renderbuffer))
    }

    fn is_renderbuffer(&mut self, renderbuffer: GLuint) -> bool {
        self.state.is_renderbuffer(renderbuffer)
    }

    fn renderbuffer_storage(
        &mut self,
        target: GLenum,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    ) {
        self.guarded("glRenderbufferStorage", |e| {
            e.try_renderbuffer_storage(target, None, internal_format, width, height)
        })
    }

    fn renderbuffer_storage_multisample(
        &mut self,
        target: GLenum,
        samples: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    ) {
        self.guarded("glRenderbufferStorageMultisample", |e| {
            e.try_renderbuffer_storage(target, Some(samples), internal_format, width, height)
        })
    }

    fn egl_image_target_renderbuffer_storage_oes(&mut self, target: GLenum, image: EglImage) {
        self.guarded("glEGLImageTargetRenderbufferStorageOES", |e| {
            fail_if(target != GL_RENDERBUFFER, GlError::InvalidEnum)?;
            fail_if(e.state.bound_renderbuffer() == 0, GlError::InvalidOperation)?;
            e.state
                .set_bound_renderbuffer_egl_image(image.width, image.height);
            e.wire.egl_image_target_renderbuffer_storage_oes(target, image);
            Ok(())
        })
    }

    fn get_renderbuffer_parameteriv(&mut self, target: GLenum, pname: GLenum, out: &mut [GLint]) {
        self.guarded("glGetRenderbufferParameteriv", |e| {
            e.try_get_renderbuffer_parameter(target, pname, out)
        })
    }

    fn gen_framebuffers(&mut self, n: GLsizei) -> Vec<GLuint> {
        self.guarded("glGenFramebuffers", |e| {
            fail_if(n < 0, GlError::InvalidValue)?;
            let names = e.wire.gen_framebuffers(n);
            e.state.set_existence(ObjectKind::Framebuffer, true, &names);
            Ok(names)
        })
    }

    fn delete_framebuffers(&mut self, framebuffers: &[GLuint]) {
        for &id in framebuffers {
            self.state.delete_framebuffer(id);
        }
        self.wire.delete_framebuffers(framebuffers);
    }

    fn bind_framebuffer(&mut self, target: GLenum, framebuffer: GLuint) {
        self.guarded("glBindFramebuffer", |e| e.try_bind_framebuffer(target, framebuffer))
    }

    fn is_framebuffer(&mut self, framebuffer: GLuint) -> bool {
        self.state.is_framebuffer(framebuffer)
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        tex_target: GLenum,
        texture: GLuint,
        level: GLint,
    ) {
        self.guarded("glFramebufferTexture2D", |e| {
            e.try_framebuffer_texture_2d(target, attachment, tex_target, texture, level)
        })
    }

    fn framebuffer_renderbuffer(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        renderbuffer_target: GLenum,
        renderbuffer: GLuint,
    ) {
        self.guarded("glFramebufferRenderbuffer", |e| {
            e.try_framebuffer_renderbuffer(target, attachment, renderbuffer_target, renderbuffer)
        })
    }

    fn framebuffer_texture_layer(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        texture: GLuint,
        level: GLint,
        layer: GLint,
    ) {
        self.guarded("glFramebufferTextureLayer", |e| {
            e.try_framebuffer_texture_layer(target, attachment, texture, level, layer)
        })
    }

    fn framebuffer_parameteri(&mut self, target: GLenum, pname: GLenum, param: GLint) {
        self.guarded("glFramebufferParameteri", |e| {
            e.try_framebuffer_parameteri(target, pname, param)
        })
    }

    fn check_framebuffer_status(&mut self, target: GLenum) -> GLenum {
        self.guarded("glCheckFramebufferStatus", |e| {
            fail_if(!e.state.is_valid_framebuffer_target(target), GlError::InvalidEnum)?;
            Ok(e.state.check_framebuffer_completeness(target))
        })
    }

    fn get_framebuffer_attachment_parameteriv(
        &mut self,
        target: GLenum,
        attachment: GLenum,
        pname: GLenum,
        out: &mut [GLint],
    ) {
        self.guarded("glGetFramebufferAttachmentParameteriv", |e| {
            e.try_get_framebuffer_attachment_parameter(target, attachment, pname, out)
        })
    }

    fn draw_buffers(&mut self, buffers: &[GLenum]) {
        self.guarded("glDrawBuffers", |e| e.try_draw_buffers(buffers))
    }

    fn read_buffer(&mut self, src: GLenum) {
        self.guarded("glReadBuffer", |e| e.try_read_buffer(src))
    }

    fn blit_framebuffer(
        &mut self,
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
    ) {
        self.guarded("glBlitFramebuffer", |e| {
            e.try_blit_framebuffer(
                [src_x0, src_y0, src_x1, src_y1],
                [dst_x0, dst_y0, dst_x1, dst_y1],
                mask,
                filter,
            )
        })
    }

    fn invalidate_framebuffer(&mut self, target: GLenum, attachments: &[GLenum]) {
        self.guarded("glInvalidateFramebuffer", |e| {
            e.check_invalidate(target, attachments)?;
            e.wire.invalidate_framebuffer(target, attachments);
            Ok(())
        })
    }

    fn invalidate_sub_framebuffer(
        &mut self,
        target: GLenum,
        attachments: &[GLenum],
        x: GLint,
        y: GLint,
        width: GLsizei,
        height: GLsizei,
    ) {
        self.guarded("glInvalidateSubFramebuffer", |e| {
            fail_if(width < 0 || height < 0, GlError::InvalidValue)?;
            e.check_invalidate(target, attachments)?;
            e.wire
                .invalidate_sub_framebuffer(target, attachments, x, y, width, height);
            Ok(())
        })
    }

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
        self.guarded("glReadPixels", |e| {
            e.try_read_pixels(x, y, width, height, format, ty, dst)
        })
    }
}

#[cfg(test)]
mod tests {
    use aero_gles_protocol::{GlesOpcode, GlesPacketIter};
    use pretty_assertions::assert_eq;

    use super::super::test_support::*;
    use super::*;
    use crate::api::{BufferApi, DataSource, StateApi, TextureApi};

    /// Framebuffer 1 bound with a 4x4 RGBA8 texture (name 2) at color 0.
    fn complete_fbo(enc: &mut Gl2Encoder<aero_gles_protocol::MemoryTransport>) {
        enc.bind_texture(GL_TEXTURE_2D, 2);
        enc.tex_image_2d(GL_TEXTURE_2D, 0, GL_RGBA8 as GLint, 4, 4, 0, GL_RGBA, GL_UNSIGNED_BYTE, DataSource::Null);
        enc.bind_framebuffer(GL_FRAMEBUFFER, 1);
        enc.framebuffer_texture_2d(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, GL_TEXTURE_2D, 2, 0);
        assert_eq!(take_error(enc), None);
    }

    #[test]
    fn renderbuffer_storage_is_shadowed_and_queried_locally() {
        let mut enc = encoder();
        enc.renderbuffer_storage(GL_RENDERBUFFER, GL_RGBA8, 16, 16);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        enc.bind_renderbuffer(GL_RENDERBUFFER, 3);
        enc.bind_renderbuffer(GL_RENDERBUFFER, 3);
        enc.renderbuffer_storage(GL_RENDERBUFFER, GL_RGBA, 16, 16);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        enc.renderbuffer_storage(GL_RENDERBUFFER, GL_RGBA8, 16, 5000);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.renderbuffer_storage_multisample(GL_RENDERBUFFER, 8, GL_RGBA8, 16, 16);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.renderbuffer_storage_multisample(GL_RENDERBUFFER, 2, GL_RGBA8, 16, 8);
        assert_eq!(take_error(&mut enc), None);

        let mut out = [0];
        enc.get_renderbuffer_parameteriv(GL_RENDERBUFFER, GL_RENDERBUFFER_HEIGHT, &mut out);
        assert_eq!(out, [8]);
        enc.get_renderbuffer_parameteriv(GL_RENDERBUFFER, GL_RENDERBUFFER_SAMPLES, &mut out);
        assert_eq!(out, [2]);
        assert!(enc.is_renderbuffer(3));
        assert_eq!(
            opcodes(&mut enc),
            vec![GlesOpcode::BindRenderbuffer, GlesOpcode::RenderbufferStorageMultisample]
        );
    }

    #[test]
    fn framebuffer_binds_elide_per_target() {
        let mut enc = encoder();
        enc.bind_framebuffer(GL_FRAMEBUFFER, 1);
        enc.bind_framebuffer(GL_DRAW_FRAMEBUFFER, 1);
        enc.bind_framebuffer(GL_READ_FRAMEBUFFER, 2);
        enc.bind_framebuffer(GL_READ_FRAMEBUFFER, 2);
        enc.bind_framebuffer(GL_FRAMEBUFFER, 1);
        assert_eq!(
            opcodes(&mut enc),
            vec![
                GlesOpcode::BindFramebuffer,
                GlesOpcode::BindFramebuffer,
                GlesOpcode::BindFramebuffer,
            ]
        );
        assert!(enc.is_framebuffer(2));
    }

    #[test]
    fn texture_attachment_checks() {
        let mut enc = encoder();
        enc.bind_texture(GL_TEXTURE_CUBE_MAP, 5);
        enc.framebuffer_texture_2d(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, GL_TEXTURE_2D, 5, 0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        enc.bind_framebuffer(GL_FRAMEBUFFER, 1);
        enc.framebuffer_texture_2d(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0 + 8, GL_TEXTURE_2D, 5, 0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        enc.framebuffer_texture_2d(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, GL_TEXTURE_2D, 5, 0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.framebuffer_texture_2d(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, GL_TEXTURE_2D, 99, 0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.framebuffer_texture_2d(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, GL_TEXTURE_CUBE_MAP_POSITIVE_X, 5, 13);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.framebuffer_texture_2d(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, GL_TEXTURE_CUBE_MAP_POSITIVE_X, 5, 0);
        assert_eq!(take_error(&mut enc), None);

        let info = enc.state().attachment_info(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0);
        assert_eq!((info.kind, info.name), (GL_TEXTURE, 5));
        let mut face = [0];
        enc.get_framebuffer_attachment_parameteriv(
            GL_FRAMEBUFFER,
            GL_COLOR_ATTACHMENT0,
            GL_FRAMEBUFFER_ATTACHMENT_TEXTURE_CUBE_MAP_FACE,
            &mut face,
        );
        assert_eq!(face, [GL_TEXTURE_CUBE_MAP_POSITIVE_X as GLint]);
    }

    #[test]
    fn layer_attachments_need_array_or_3d_textures() {
        let mut enc = encoder();
        enc.bind_texture(GL_TEXTURE_2D, 4);
        enc.bind_texture(GL_TEXTURE_2D_ARRAY, 5);
        enc.bind_framebuffer(GL_FRAMEBUFFER, 1);
        enc.framebuffer_texture_layer(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, 4, 0, 0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.framebuffer_texture_layer(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, 5, 0, 256);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.framebuffer_texture_layer(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, 5, 0, 3);
        assert_eq!(take_error(&mut enc), None);
        assert_eq!(
            enc.state().attachment_info(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0).layer,
            3
        );
    }

    #[test]
    fn renderbuffers_must_have_been_bound_before_attaching() {
        let mut enc = encoder();
        enc.bind_framebuffer(GL_FRAMEBUFFER, 1);
        enc.framebuffer_renderbuffer(GL_FRAMEBUFFER, GL_DEPTH_ATTACHMENT, GL_RENDERBUFFER, 6);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        enc.bind_renderbuffer(GL_RENDERBUFFER, 6);
        enc.renderbuffer_storage(GL_RENDERBUFFER, GL_DEPTH_COMPONENT16, 4, 4);
        enc.framebuffer_renderbuffer(GL_FRAMEBUFFER, GL_DEPTH_ATTACHMENT, GL_RENDERBUFFER, 6);
        assert_eq!(take_error(&mut enc), None);
        assert!(enc.state().has_attachment(GL_FRAMEBUFFER, GL_DEPTH_ATTACHMENT));

        enc.delete_renderbuffers(&[6]);
        assert!(!enc.state().has_attachment(GL_FRAMEBUFFER, GL_DEPTH_ATTACHMENT));
        assert_eq!(enc.state().bound_renderbuffer(), 0);
    }

    #[test]
    fn completeness_follows_attachments_and_storage() {
        let mut enc = encoder();
        enc.bind_framebuffer(GL_FRAMEBUFFER, 1);
        assert_eq!(
            enc.check_framebuffer_status(GL_FRAMEBUFFER),
            GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT
        );
        assert_eq!(enc.check_framebuffer_status(0x1234), 0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));

        enc.bind_renderbuffer(GL_RENDERBUFFER, 2);
        enc.framebuffer_renderbuffer(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, GL_RENDERBUFFER, 2);
        enc.renderbuffer_storage(GL_RENDERBUFFER, GL_RGBA8, 8, 8);
        assert_eq!(enc.check_framebuffer_status(GL_FRAMEBUFFER), GL_FRAMEBUFFER_COMPLETE);
        enc.renderbuffer_storage(GL_RENDERBUFFER, GL_RGBA8, 0, 0);
        assert_ne!(enc.check_framebuffer_status(GL_FRAMEBUFFER), GL_FRAMEBUFFER_COMPLETE);
    }

    #[test]
    fn draw_and_read_buffer_rules() {
        let mut enc = encoder();
        enc.draw_buffers(&[GL_BACK]);
        assert_eq!(take_error(&mut enc), None);
        enc.draw_buffers(&[GL_COLOR_ATTACHMENT0]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.read_buffer(GL_COLOR_ATTACHMENT0);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        enc.bind_framebuffer(GL_FRAMEBUFFER, 1);
        enc.draw_buffers(&[GL_COLOR_ATTACHMENT0, GL_NONE, GL_COLOR_ATTACHMENT0 + 2]);
        assert_eq!(take_error(&mut enc), None);
        enc.draw_buffers(&[GL_NONE, GL_COLOR_ATTACHMENT0]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.draw_buffers(&[GL_BACK]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.draw_buffers(&[GL_DEPTH_ATTACHMENT]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidEnum));
        enc.read_buffer(GL_COLOR_ATTACHMENT0 + 8);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.read_buffer(GL_BACK);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.read_buffer(GL_COLOR_ATTACHMENT0 + 1);
        assert_eq!(take_error(&mut enc), None);
    }

    #[test]
    fn blits_check_filters_and_completeness() {
        let mut enc = encoder();
        enc.blit_framebuffer(0, 0, 4, 4, 0, 0, 4, 4, GL_DEPTH_BUFFER_BIT, GL_LINEAR);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.blit_framebuffer(0, 0, 4, 4, 0, 0, 4, 4, 0x8000_0000, GL_NEAREST);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));

        enc.bind_framebuffer(GL_READ_FRAMEBUFFER, 1);
        enc.blit_framebuffer(0, 0, 4, 4, 0, 0, 4, 4, GL_COLOR_BUFFER_BIT, GL_NEAREST);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidFramebufferOperation));
    }

    #[test]
    fn invalidate_rejects_attachments_past_the_limit() {
        let mut enc = encoder();
        enc.invalidate_framebuffer(GL_FRAMEBUFFER, &[GL_DEPTH_ATTACHMENT, GL_COLOR_ATTACHMENT0 + 8]);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.invalidate_sub_framebuffer(GL_FRAMEBUFFER, &[GL_COLOR_ATTACHMENT0], 0, 0, -1, 1);
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidValue));
        enc.invalidate_framebuffer(GL_FRAMEBUFFER, &[GL_COLOR_ATTACHMENT0, GL_STENCIL_ATTACHMENT]);
        assert_eq!(opcodes(&mut enc), vec![GlesOpcode::InvalidateFramebuffer]);
    }

    #[test]
    fn read_pixels_scatters_into_the_pack_layout() {
        let mut enc = encoder();
        // RGB8 rows of 3 bytes are padded to 4 by the default pack alignment.
        enc.transport_mut().push_reply_bytes(&[1, 2, 3, 4, 5, 6]);
        let mut out = [0xEEu8; 7];
        enc.read_pixels(0, 0, 1, 2, GL_RGB, GL_UNSIGNED_BYTE, PixelSink::Client(&mut out));
        assert_eq!(take_error(&mut enc), None);
        assert_eq!(out, [1, 2, 3, 0xEE, 4, 5, 6]);

        let mut short = [0u8; 6];
        enc.read_pixels(0, 0, 1, 2, GL_RGB, GL_UNSIGNED_BYTE, PixelSink::Client(&mut short));
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
    }

    #[test]
    fn huge_pack_skips_are_rejected_before_reading() {
        let mut enc = encoder();
        enc.pixel_storei(GL_PACK_ROW_LENGTH, i32::MAX);
        enc.pixel_storei(GL_PACK_SKIP_ROWS, i32::MAX);
        assert_eq!(take_error(&mut enc), None);
        clear(&mut enc);

        let mut out = [0u8; 16];
        enc.read_pixels(0, 0, 1, 1, GL_RGBA, GL_FLOAT, PixelSink::Client(&mut out));
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        assert_eq!(out, [0; 16]);
        assert!(GlesPacketIter::new(&sent(&mut enc)).next().is_none());
    }

    #[test]
    fn read_pixels_into_a_pack_buffer_marks_it_dirty() {
        let mut enc = encoder();
        enc.bind_buffer(GL_PIXEL_PACK_BUFFER, 4);
        enc.buffer_data(GL_PIXEL_PACK_BUFFER, 16, None, GL_STREAM_READ);
        let mut out = [0u8; 16];
        enc.read_pixels(0, 0, 2, 2, GL_RGBA, GL_UNSIGNED_BYTE, PixelSink::Client(&mut out));
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        enc.read_pixels(0, 0, 2, 2, GL_RGBA, GL_UNSIGNED_BYTE, PixelSink::BufferOffset(4));
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        clear(&mut enc);
        enc.read_pixels(0, 0, 2, 2, GL_RGBA, GL_UNSIGNED_BYTE, PixelSink::BufferOffset(0));
        assert_eq!(take_error(&mut enc), None);
        assert_eq!(opcodes(&mut enc), vec![GlesOpcode::ReadPixelsOffset]);
        assert!(!enc.state().should_skip_host_map(GL_PIXEL_PACK_BUFFER));
    }

    #[test]
    fn read_pixels_rejects_multisample_and_mismatched_reads() {
        let mut enc = encoder();
        complete_fbo(&mut enc);
        let mut out = [0u8; 16];
        enc.read_pixels(0, 0, 2, 2, GL_RGBA_INTEGER, GL_UNSIGNED_INT, PixelSink::Client(&mut out));
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));

        enc.bind_renderbuffer(GL_RENDERBUFFER, 3);
        enc.renderbuffer_storage_multisample(GL_RENDERBUFFER, 4, GL_RGBA8, 4, 4);
        enc.framebuffer_renderbuffer(GL_FRAMEBUFFER, GL_COLOR_ATTACHMENT0, GL_RENDERBUFFER, 3);
        clear(&mut enc);
        enc.read_pixels(0, 0, 2, 2, GL_RGBA, GL_UNSIGNED_BYTE, PixelSink::Client(&mut out));
        assert_eq!(take_error(&mut enc), Some(GlError::InvalidOperation));
        assert!(GlesPacketIter::new(&sent(&mut enc)).next().is_none());
    }
}
