//! Texture objects, image specification and the host `TEXTURE_2D` aliasing of external textures.

use std::borrow::Cow;

use aero_gles_protocol::gl::*;
use aero_gles_protocol::Transport;
use aero_gles_state::caps::ilog2;
use aero_gles_state::format;
use aero_gles_state::{
    fail_if, BufferRef, GlError, GlResult, LevelDims, ObjectKind, PixelLayout, TextureRef,
    TextureSlot,
};
use tracing::debug;

use super::Gl2Encoder;
use crate::api::{DataSource, EglImage, TextureApi};
use crate::pixel_stream;
use crate::wire::{GlesWire, WireScalar};

fn is_image_2d_target(target: GLenum) -> bool {
    target == GL_TEXTURE_2D || is_cube_face_target(target)
}

/// Byte alignment an unpack-buffer offset needs for pixels of type `ty`.
fn type_alignment(ty: GLenum) -> usize {
    match ty {
        GL_UNSIGNED_SHORT_5_6_5 | GL_UNSIGNED_SHORT_4_4_4_4 | GL_UNSIGNED_SHORT_5_5_5_1 => 2,
        GL_UNSIGNED_INT_10F_11F_11F_REV
        | GL_UNSIGNED_INT_5_9_9_9_REV
        | GL_UNSIGNED_INT_24_8
        | GL_FLOAT_32_UNSIGNED_INT_24_8_REV => 4,
        ty => gl_sizeof(ty).max(1),
    }
}

fn dim(v: GLint) -> usize {
    usize::try_from(v).unwrap_or(0)
}

/// `offset + size` reaches past `extent`.
fn outside(offset: GLint, size: GLint, extent: GLint) -> bool {
    i64::from(offset) + i64::from(size) > i64::from(extent)
}

fn is_wrap_mode(v: GLenum) -> bool {
    matches!(v, GL_REPEAT | GL_CLAMP_TO_EDGE | GL_MIRRORED_REPEAT)
}

/// Compressed formats that cannot back a `TEXTURE_3D` image.
fn is_2d_only_compressed(internal_format: GLenum) -> bool {
    internal_format == GL_ETC1_RGB8_OES
        || format::is_etc2(internal_format)
        || format::is_astc(internal_format)
}

/// Resolves the data of an upload against the pixel-unpack binding.
///
/// With a buffer bound the data is an offset (`Null` means offset 0) that must leave `needed`
/// bytes in the buffer and be a multiple of `align`; client memory is rejected. Without one an
/// offset is rejected.
fn unpack_source<'a>(
    unpack: Option<&BufferRef>,
    data: DataSource<'a>,
    needed: usize,
    align: usize,
) -> GlResult<DataSource<'a>> {
    let Some(buf) = unpack else {
        fail_if(
            matches!(data, DataSource::BufferOffset(_)),
            GlError::InvalidOperation,
        )?;
        return Ok(data);
    };
    let offset = match data {
        DataSource::Client(_) => return Err(GlError::InvalidOperation),
        DataSource::BufferOffset(offset) => offset,
        DataSource::Null => 0,
    };
    let size = buf.read().size;
    fail_if(
        offset.checked_add(needed).map_or(true, |end| end > size),
        GlError::InvalidOperation,
    )?;
    fail_if(offset % align != 0, GlError::InvalidOperation)?;
    Ok(DataSource::BufferOffset(offset))
}

/// Bytes an uncompressed upload reads from its source.
fn needed_size(layout: &PixelLayout, width: GLint, height: GLint, depth: GLint) -> usize {
    if width == 0 || height == 0 || depth == 0 {
        0
    } else {
        layout.needed_size
    }
}

fn gather_client<'a>(
    src: DataSource<'a>,
    layout: &PixelLayout,
    height: GLint,
    depth: GLint,
) -> GlResult<Option<Cow<'a, [u8]>>> {
    match src {
        DataSource::Client(bytes) => {
            pixel_stream::gather(bytes, layout, dim(height), dim(depth)).map(Some)
        }
        _ => Ok(None),
    }
}

/// Compressed client data is cut to `image_size`; short data is `INVALID_OPERATION`.
fn clip_client(src: DataSource<'_>, image_size: usize) -> GlResult<DataSource<'_>> {
    match src {
        DataSource::Client(bytes) => bytes
            .get(..image_size)
            .map(DataSource::Client)
            .ok_or(GlError::InvalidOperation),
        other => Ok(other),
    }
}

impl<T: Transport> Gl2Encoder<T> {
    /// Largest width/height and largest depth (layers for arrays) of an image on `target`.
    fn max_image_dims(&self, target: GLenum) -> (GLint, GLint) {
        let caps = self.state.caps();
        let depth = match target {
            GL_TEXTURE_3D => caps.max_3d_texture_size,
            GL_TEXTURE_2D_ARRAY => caps.max_array_texture_layers,
            _ => 1,
        };
        (caps.max_texture_dim(target), depth)
    }

    fn check_level(&self, target: GLenum, level: GLint) -> GlResult {
        fail_if(
            level < 0 || level > self.state.caps().max_texture_level(target),
            GlError::InvalidValue,
        )
    }

    fn check_image_dims(&self, target: GLenum, width: GLint, height: GLint, depth: GLint) -> GlResult {
        fail_if(width < 0 || height < 0 || depth < 0, GlError::InvalidValue)?;
        let (max, max_depth) = self.max_image_dims(target);
        fail_if(
            width > max || height > max || depth > max_depth,
            GlError::InvalidValue,
        )?;
        fail_if(
            is_cube_face_target(target) && width != height,
            GlError::InvalidValue,
        )
    }

    fn is_image_3d_target(&self, target: GLenum) -> bool {
        self.state.is_es3() && matches!(target, GL_TEXTURE_3D | GL_TEXTURE_2D_ARRAY)
    }

    /// Record of the texture bound to `target`. The default texture gets one on first use.
    fn bound_texture_rec(&self, target: GLenum) -> TextureRef {
        let id = self.state.bound_texture(target);
        let (rec, created) = self.state.share_group().texture_or_insert(id);
        if created {
            rec.write().target = TextureSlot::from_target(target).map_or(target, TextureSlot::target);
        }
        rec
    }

    /// The bound pixel-unpack buffer; a mapped one is `INVALID_OPERATION`.
    fn unpack_buffer(&self) -> GlResult<Option<BufferRef>> {
        let Some(buf) = self.state.bound_buffer_ref(GL_PIXEL_UNPACK_BUFFER) else {
            return Ok(None);
        };
        fail_if(buf.read().mapped, GlError::InvalidOperation)?;
        Ok(Some(buf))
    }

    fn try_active_texture(&mut self, texture: GLenum) -> GlResult {
        let unit = texture
            .checked_sub(GL_TEXTURE0)
            .map_or(usize::MAX, |u| u as usize);
        if unit == self.state.active_texture_unit() {
            debug!(texture, "active texture elided");
            return Ok(());
        }
        self.state.set_active_texture_unit(unit)?;
        self.wire.active_texture(texture);
        Ok(())
    }

    fn try_bind_texture(&mut self, target: GLenum, texture: GLuint) -> GlResult {
        fail_if(!self.state.is_valid_texture_target(target), GlError::InvalidEnum)?;
        let bind = self.state.bind_texture(target, texture)?;
        if target != GL_TEXTURE_2D && target != GL_TEXTURE_EXTERNAL_OES {
            self.host_bind_texture(target, texture);
            return Ok(());
        }

        let priority = self.state.priority_enabled_target(GL_TEXTURE_2D);
        if bind.first_use && target == GL_TEXTURE_EXTERNAL_OES {
            // The host creates the object as a 2D texture; give it the external defaults.
            self.host_bind_texture(GL_TEXTURE_2D, texture);
            self.wire
                .tex_parameteri(GL_TEXTURE_2D, GL_TEXTURE_MIN_FILTER, GL_LINEAR as GLint);
            self.wire
                .tex_parameteri(GL_TEXTURE_2D, GL_TEXTURE_WRAP_S, GL_CLAMP_TO_EDGE as GLint);
            self.wire
                .tex_parameteri(GL_TEXTURE_2D, GL_TEXTURE_WRAP_T, GL_CLAMP_TO_EDGE as GLint);
            if priority != target {
                let restore = self.state.bound_texture(priority);
                self.host_bind_texture(GL_TEXTURE_2D, restore);
            }
            return Ok(());
        }
        if target == priority {
            self.host_bind_texture(GL_TEXTURE_2D, texture);
        } else {
            debug!(target, texture, "texture bound behind the priority target");
        }
        Ok(())
    }

    fn try_delete_textures(&mut self, textures: &[GLuint]) {
        for &id in textures {
            self.state.delete_texture(id);
            self.host.forget_texture(id);
        }
        self.wire.delete_textures(textures);
    }

    /// Checks one `TexParameter*` call; `value` is the parameter as an integer.
    pub(super) fn check_tex_parameter(&self, target: GLenum, pname: GLenum, value: GLint) -> GlResult {
        fail_if(!self.state.is_valid_texture_target(target), GlError::InvalidEnum)?;
        let es3 = self.state.is_es3();
        let external = target == GL_TEXTURE_EXTERNAL_OES;
        let v = value as GLenum;
        let valid = match pname {
            GL_TEXTURE_MIN_FILTER if external => matches!(v, GL_NEAREST | GL_LINEAR),
            GL_TEXTURE_MIN_FILTER => matches!(
                v,
                GL_NEAREST
                    | GL_LINEAR
                    | GL_NEAREST_MIPMAP_NEAREST
                    | GL_LINEAR_MIPMAP_NEAREST
                    | GL_NEAREST_MIPMAP_LINEAR
                    | GL_LINEAR_MIPMAP_LINEAR
            ),
            GL_TEXTURE_MAG_FILTER => matches!(v, GL_NEAREST | GL_LINEAR),
            GL_TEXTURE_WRAP_S | GL_TEXTURE_WRAP_T if external => v == GL_CLAMP_TO_EDGE,
            GL_TEXTURE_WRAP_S | GL_TEXTURE_WRAP_T => is_wrap_mode(v),
            GL_TEXTURE_WRAP_R if es3 => is_wrap_mode(v),
            GL_TEXTURE_COMPARE_MODE if es3 => matches!(v, GL_NONE | GL_COMPARE_REF_TO_TEXTURE),
            GL_TEXTURE_COMPARE_FUNC if es3 => (GL_NEVER..=GL_ALWAYS).contains(&v),
            GL_TEXTURE_SWIZZLE_R..=GL_TEXTURE_SWIZZLE_A if es3 => {
                matches!(v, GL_RED | GL_GREEN | GL_BLUE | GL_ALPHA | GL_ZERO | GL_ONE)
            }
            GL_TEXTURE_BASE_LEVEL | GL_TEXTURE_MAX_LEVEL if es3 => {
                fail_if(value < 0, GlError::InvalidValue)?;
                true
            }
            GL_TEXTURE_MIN_LOD | GL_TEXTURE_MAX_LOD if es3 => true,
            GL_DEPTH_STENCIL_TEXTURE_MODE if self.state.is_es31() => {
                matches!(v, GL_DEPTH_COMPONENT | GL_STENCIL_INDEX)
            }
            GL_TEXTURE_MAX_ANISOTROPY_EXT => true,
            _ => false,
        };
        fail_if(!valid, GlError::InvalidEnum)
    }

    /// Parameters the shadow answers without the host.
    fn local_tex_parameter(&self, target: GLenum, pname: GLenum) -> Option<GLint> {
        if !self.state.is_es3() {
            return None;
        }
        let rec = self.state.bound_texture_ref(target);
        match pname {
            GL_TEXTURE_IMMUTABLE_FORMAT => Some(GLint::from(rec.is_some_and(|t| t.read().immutable))),
            GL_TEXTURE_IMMUTABLE_LEVELS => Some(rec.map_or(0, |t| t.read().immutable_levels)),
            _ => None,
        }
    }

    fn try_get_tex_parameter<R: WireScalar>(
        &mut self,
        target: GLenum,
        pname: GLenum,
        out: &mut [R],
        from_int: impl FnOnce(GLint) -> R,
        query: impl FnOnce(&mut GlesWire<T>, GLenum, &mut [R]),
    ) -> GlResult {
        fail_if(!self.state.is_valid_texture_target(target), GlError::InvalidEnum)?;
        if let Some(v) = self.local_tex_parameter(target, pname) {
            if let Some(slot) = out.first_mut() {
                *slot = from_int(v);
            }
            return Ok(());
        }
        self.with_host_2d(target, |e, t| e.safe_host_query(out, |w, o| query(w, t, o)));
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn try_tex_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        internal_format: GLint,
        width: GLsizei,
        height: GLsizei,
        border: GLint,
        format: GLenum,
        ty: GLenum,
        pixels: DataSource<'_>,
    ) -> GlResult {
        fail_if(!is_image_2d_target(target), GlError::InvalidEnum)?;
        self.check_level(target, level)?;
        self.check_image_dims(target, width, height, 1)?;
        fail_if(border != 0, GlError::InvalidValue)?;
        let ifmt = GLenum::try_from(internal_format).map_err(|_| GlError::InvalidEnum)?;
        format::check_tex_image_format(ifmt, format, ty)?;

        let layout = self.state.pixel_store.unpack_layout(width, height, 1, format, ty)?;
        let unpack = self.unpack_buffer()?;
        let src = unpack_source(
            unpack.as_ref(),
            pixels,
            needed_size(&layout, width, height, 1),
            type_alignment(ty),
        )?;
        let rec = self.bound_texture_rec(target);
        fail_if(rec.read().immutable, GlError::InvalidOperation)?;
        let tight = gather_client(src, &layout, height, 1)?;
        let src = tight.as_deref().map_or(src, DataSource::Client);

        {
            let mut t = rec.write();
            t.set_level_dims(target, level, LevelDims::new(width, height, 1));
            t.internal_format = ifmt;
            t.format = format;
            t.ty = ty;
        }
        self.with_host_2d(target, |e, t| {
            e.wire
                .tex_image_2d(t, level, internal_format, width, height, border, format, ty, src)
        });
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn try_tex_sub_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        xoffset: GLint,
        yoffset: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: DataSource<'_>,
    ) -> GlResult {
        fail_if(!is_image_2d_target(target), GlError::InvalidEnum)?;
        self.check_level(target, level)?;
        fail_if(
            xoffset < 0 || yoffset < 0 || width < 0 || height < 0,
            GlError::InvalidValue,
        )?;
        fail_if(
            !format::is_valid_pixel_format(format) || !format::is_valid_pixel_type(ty),
            GlError::InvalidEnum,
        )?;

        let layout = self.state.pixel_store.unpack_layout(width, height, 1, format, ty)?;
        let unpack = self.unpack_buffer()?;
        let src = unpack_source(
            unpack.as_ref(),
            pixels,
            needed_size(&layout, width, height, 1),
            type_alignment(ty),
        )?;
        let dims = self.state.bound_texture_dims(target, level).unwrap_or_default();
        fail_if(
            outside(xoffset, width, dims.width) || outside(yoffset, height, dims.height),
            GlError::InvalidValue,
        )?;
        let tight = gather_client(src, &layout, height, 1)?;
        let src = tight.as_deref().map_or(src, DataSource::Client);

        self.with_host_2d(target, |e, t| {
            e.wire
                .tex_sub_image_2d(t, level, xoffset, yoffset, width, height, format, ty, src)
        });
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn try_tex_image_3d(
        &mut self,
        target: GLenum,
        level: GLint,
        internal_format: GLint,
        width: GLsizei,
        height: GLsizei,
        depth: GLsizei,
        border: GLint,
        format: GLenum,
        ty: GLenum,
        pixels: DataSource<'_>,
    ) -> GlResult {
        fail_if(!self.is_image_3d_target(target), GlError::InvalidEnum)?;
        self.check_level(target, level)?;
        self.check_image_dims(target, width, height, depth)?;
        fail_if(border != 0, GlError::InvalidValue)?;
        let ifmt = GLenum::try_from(internal_format).map_err(|_| GlError::InvalidEnum)?;
        format::check_tex_image_format(ifmt, format, ty)?;

        let layout = self
            .state
            .pixel_store
            .unpack_layout(width, height, depth, format, ty)?;
        let unpack = self.unpack_buffer()?;
        let src = unpack_source(
            unpack.as_ref(),
            pixels,
            needed_size(&layout, width, height, depth),
            type_alignment(ty),
        )?;
        let rec = self.bound_texture_rec(target);
        fail_if(rec.read().immutable, GlError::InvalidOperation)?;
        let tight = gather_client(src, &layout, height, depth)?;
        let src = tight.as_deref().map_or(src, DataSource::Client);

        {
            let mut t = rec.write();
            t.set_level_dims(target, level, LevelDims::new(width, height, depth));
            t.internal_format = ifmt;
            t.format = format;
            t.ty = ty;
        }
        self.wire.tex_image_3d(
            target,
            level,
            internal_format,
            width,
            height,
            depth,
            border,
            format,
            ty,
            src,
        );
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn try_tex_sub_image_3d(
        &mut self,
        target: GLenum,
        level: GLint,
        xoffset: GLint,
        yoffset: GLint,
        zoffset: GLint,
        width: GLsizei,
        height: GLsizei,
        depth: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: DataSource<'_>,
    ) -> GlResult {
        fail_if(!self.is_image_3d_target(target), GlError::InvalidEnum)?;
        self.check_level(target, level)?;
        fail_if(
            xoffset < 0 || yoffset < 0 || zoffset < 0 || width < 0 || height < 0 || depth < 0,
            GlError::InvalidValue,
        )?;
        fail_if(
            !format::is_valid_pixel_format(format) || !format::is_valid_pixel_type(ty),
            GlError::InvalidEnum,
        )?;

        let layout = self
            .state
            .pixel_store
            .unpack_layout(width, height, depth, format, ty)?;
        let unpack = self.unpack_buffer()?;
        let src = unpack_source(
            unpack.as_ref(),
            pixels,
            needed_size(&layout, width, height, depth),
            type_alignment(ty),
        )?;
        let dims = self.state.bound_texture_dims(target, level).unwrap_or_default();
        fail_if(
            outside(xoffset, width, dims.width)
                || outside(yoffset, height, dims.height)
                || outside(zoffset, depth, dims.depth),
            GlError::InvalidValue,
        )?;
        let tight = gather_client(src, &layout, height, depth)?;
        let src = tight.as_deref().map_or(src, DataSource::Client);

        self.wire.tex_sub_image_3d(
            target, level, xoffset, yoffset, zoffset, width, height, depth, format, ty, src,
        );
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn try_copy_tex_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        internal_format: GLenum,
        x: GLint,
        y: GLint,
        width: GLsizei,
        height: GLsizei,
        border: GLint,
    ) -> GlResult {
        fail_if(!is_image_2d_target(target), GlError::InvalidEnum)?;
        self.check_level(target, level)?;
        self.check_image_dims(target, width, height, 1)?;
        fail_if(border != 0, GlError::InvalidValue)?;
        fail_if(
            !format::is_unsized_format(internal_format) && !format::is_sized_format(internal_format),
            GlError::InvalidEnum,
        )?;
        self.check_framebuffer_complete(GL_READ_FRAMEBUFFER)?;
        let rec = self.bound_texture_rec(target);
        fail_if(rec.read().immutable, GlError::InvalidOperation)?;

        {
            let mut t = rec.write();
            t.set_level_dims(target, level, LevelDims::new(width, height, 1));
            t.internal_format = internal_format;
        }
        self.with_host_2d(target, |e, t| {
            e.wire
                .copy_tex_image_2d(t, level, internal_format, x, y, width, height, border)
        });
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn try_copy_tex_sub_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        xoffset: GLint,
        yoffset: GLint,
        x: GLint,
        y: GLint,
        width: GLsizei,
        height: GLsizei,
    ) -> GlResult {
        fail_if(!is_image_2d_target(target), GlError::InvalidEnum)?;
        self.check_level(target, level)?;
        fail_if(
            xoffset < 0 || yoffset < 0 || width < 0 || height < 0,
            GlError::InvalidValue,
        )?;
        self.check_framebuffer_complete(GL_READ_FRAMEBUFFER)?;
        let dims = self.state.bound_texture_dims(target, level).unwrap_or_default();
        fail_if(
            outside(xoffset, width, dims.width) || outside(yoffset, height, dims.height),
            GlError::InvalidValue,
        )?;
        self.with_host_2d(target, |e, t| {
            e.wire
                .copy_tex_sub_image_2d(t, level, xoffset, yoffset, x, y, width, height)
        });
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn try_compressed_tex_image(
        &mut self,
        target: GLenum,
        level: GLint,
        internal_format: GLenum,
        (width, height, depth): (GLsizei, GLsizei, GLsizei),
        border: GLint,
        image_size: GLsizei,
        data: DataSource<'_>,
        is_3d: bool,
    ) -> GlResult {
        if is_3d {
            fail_if(!self.is_image_3d_target(target), GlError::InvalidEnum)?;
        } else {
            fail_if(!is_image_2d_target(target), GlError::InvalidEnum)?;
        }
        fail_if(!format::is_compressed(internal_format), GlError::InvalidEnum)?;
        fail_if(
            target == GL_TEXTURE_3D && is_2d_only_compressed(internal_format),
            GlError::InvalidOperation,
        )?;
        self.check_level(target, level)?;
        let (max, max_depth) = self.max_image_dims(target);
        fail_if(
            width > max || height > max || depth > max_depth,
            GlError::InvalidValue,
        )?;
        fail_if(border != 0, GlError::InvalidValue)?;
        let unpack = self.unpack_buffer()?;
        fail_if(
            width < 0 || height < 0 || depth < 0 || image_size < 0,
            GlError::InvalidValue,
        )?;

        let size = dim(image_size);
        let src = unpack_source(unpack.as_ref(), data, size, 1)?;
        let expected =
            format::expected_compressed_size(internal_format, dim(width), dim(height), dim(depth));
        fail_if(expected != Some(size), GlError::InvalidValue)?;
        let rec = self.bound_texture_rec(target);
        fail_if(rec.read().immutable, GlError::InvalidOperation)?;
        let src = clip_client(src, size)?;

        {
            let mut t = rec.write();
            t.set_level_dims(target, level, LevelDims::new(width, height, depth));
            t.internal_format = internal_format;
            t.format = internal_format;
        }
        if is_3d {
            self.wire.compressed_tex_image_3d(
                target,
                level,
                internal_format,
                width,
                height,
                depth,
                border,
                image_size,
                src,
            );
        } else {
            self.with_host_2d(target, |e, t| {
                e.wire.compressed_tex_image_2d(
                    t,
                    level,
                    internal_format,
                    width,
                    height,
                    border,
                    image_size,
                    src,
                )
            });
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn try_compressed_tex_sub_image(
        &mut self,
        target: GLenum,
        level: GLint,
        (xoffset, yoffset, zoffset): (GLint, GLint, GLint),
        (width, height, depth): (GLsizei, GLsizei, GLsizei),
        format: GLenum,
        image_size: GLsizei,
        data: DataSource<'_>,
        is_3d: bool,
    ) -> GlResult {
        if is_3d {
            fail_if(!self.is_image_3d_target(target), GlError::InvalidEnum)?;
        } else {
            fail_if(!is_image_2d_target(target), GlError::InvalidEnum)?;
        }
        self.check_level(target, level)?;
        fail_if(
            xoffset < 0
                || yoffset < 0
                || zoffset < 0
                || width < 0
                || height < 0
                || depth < 0
                || image_size < 0,
            GlError::InvalidValue,
        )?;
        let unpack = self.unpack_buffer()?;
        let size = dim(image_size);
        let src = unpack_source(unpack.as_ref(), data, size, 1)?;

        let rec = self.bound_texture_rec(target);
        let (internal_format, dims) = {
            let t = rec.read();
            (t.internal_format, t.dims(target, level).unwrap_or_default())
        };
        fail_if(format != internal_format, GlError::InvalidOperation)?;
        if format::is_etc2(format) {
            let misaligned = xoffset % 4 != 0 || yoffset % 4 != 0;
            let partial_block = (width % 4 != 0 && i64::from(xoffset) + i64::from(width) != i64::from(dims.width))
                || (height % 4 != 0 && i64::from(yoffset) + i64::from(height) != i64::from(dims.height));
            fail_if(misaligned || partial_block, GlError::InvalidOperation)?;
        }
        fail_if(
            outside(xoffset, width, dims.width)
                || outside(yoffset, height, dims.height)
                || outside(zoffset, depth, dims.depth),
            GlError::InvalidValue,
        )?;
        let expected =
            format::expected_compressed_size(format, dim(width), dim(height), dim(depth));
        fail_if(expected != Some(size), GlError::InvalidValue)?;
        let src = clip_client(src, size)?;

        if is_3d {
            self.wire.compressed_tex_sub_image_3d(
                target, level, xoffset, yoffset, zoffset, width, height, depth, format,
                image_size, src,
            );
        } else {
            self.with_host_2d(target, |e, t| {
                e.wire.compressed_tex_sub_image_2d(
                    t, level, xoffset, yoffset, width, height, format, image_size, src,
                )
            });
        }
        Ok(())
    }

    /// Shared `TexStorage2D`/`TexStorage3D` checks and bookkeeping.
    fn try_tex_storage(
        &mut self,
        target: GLenum,
        levels: GLsizei,
        internal_format: GLenum,
        (width, height, depth): (GLsizei, GLsizei, GLsizei),
    ) -> GlResult {
        fail_if(
            !format::is_sized_format(internal_format) && !format::is_compressed(internal_format),
            GlError::InvalidEnum,
        )?;
        fail_if(self.state.bound_texture(target) == 0, GlError::InvalidOperation)?;
        fail_if(
            levels < 1 || width < 1 || height < 1 || depth < 1,
            GlError::InvalidValue,
        )?;
        let (max, max_depth) = self.max_image_dims(target);
        fail_if(
            width > max || height > max || depth > max_depth,
            GlError::InvalidValue,
        )?;
        fail_if(
            target == GL_TEXTURE_CUBE_MAP && width != height,
            GlError::InvalidValue,
        )?;
        fail_if(
            target == GL_TEXTURE_3D && is_2d_only_compressed(internal_format),
            GlError::InvalidOperation,
        )?;
        let largest = match target {
            GL_TEXTURE_3D => width.max(height).max(depth),
            _ => width.max(height),
        };
        fail_if(levels > ilog2(largest) + 1, GlError::InvalidOperation)?;
        let rec = self.bound_texture_rec(target);
        fail_if(rec.read().immutable, GlError::InvalidOperation)?;
        rec.write()
            .set_storage(target, levels, internal_format, LevelDims::new(width, height, depth));
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn try_tex_storage_2d_multisample(
        &mut self,
        target: GLenum,
        samples: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
        fixed_sample_locations: bool,
    ) -> GlResult {
        fail_if(
            !self.state.is_es31() || target != GL_TEXTURE_2D_MULTISAMPLE,
            GlError::InvalidEnum,
        )?;
        let caps = self.state.caps();
        let depth_stencil = format::is_depth_renderable(internal_format)
            || format::is_stencil_renderable(internal_format);
        let color = format::is_color_renderable(internal_format, GL_NONE, caps.format_caps);
        fail_if(
            format::is_unsized_format(internal_format) || !(color || depth_stencil),
            GlError::InvalidEnum,
        )?;
        fail_if(samples < 1, GlError::InvalidValue)?;
        let max_samples = if format::is_integer_format(internal_format) {
            caps.max_integer_samples
        } else if depth_stencil {
            caps.max_depth_texture_samples
        } else {
            caps.max_color_texture_samples
        };
        fail_if(samples > max_samples, GlError::InvalidOperation)?;
        let max = caps.max_texture_size;
        fail_if(
            width < 1 || height < 1 || width > max || height > max,
            GlError::InvalidValue,
        )?;
        fail_if(self.state.bound_texture(target) == 0, GlError::InvalidOperation)?;
        let rec = self.bound_texture_rec(target);
        fail_if(rec.read().immutable, GlError::InvalidOperation)?;

        {
            let mut t = rec.write();
            t.set_storage(target, 1, internal_format, LevelDims::new(width, height, 1));
            t.samples = samples;
        }
        self.wire.tex_storage_2d_multisample(
            target,
            samples,
            internal_format,
            width,
            height,
            fixed_sample_locations,
        );
        Ok(())
    }

    fn try_generate_mipmap(&mut self, target: GLenum) -> GlResult {
        let valid = matches!(target, GL_TEXTURE_2D | GL_TEXTURE_CUBE_MAP)
            || self.is_image_3d_target(target);
        fail_if(!valid, GlError::InvalidEnum)?;
        let caps = self.state.caps().format_caps;
        let rec = self.bound_texture_rec(target);
        {
            let t = rec.read();
            let ifmt = t.internal_format;
            fail_if(format::is_compressed(ifmt), GlError::InvalidOperation)?;
            let renderable_and_filterable =
                format::is_color_renderable(ifmt, t.ty, caps) && format::is_filterable(ifmt);
            fail_if(
                format::is_sized_format(ifmt) && !renderable_and_filterable,
                GlError::InvalidOperation,
            )?;
            fail_if(!t.is_complete(), GlError::InvalidOperation)?;
        }

        let mut t = rec.write();
        if !t.immutable {
            if let Some(base) = t.level_dims(0, 0) {
                t.set_mip_chain(target, base, None);
            }
        }
        drop(t);
        self.with_host_2d(target, |e, t| e.wire.generate_mipmap(t));
        Ok(())
    }

    fn try_egl_image_target_texture_2d(&mut self, target: GLenum, image: EglImage) -> GlResult {
        fail_if(
            !matches!(target, GL_TEXTURE_2D | GL_TEXTURE_EXTERNAL_OES),
            GlError::InvalidEnum,
        )?;
        self.bound_texture_rec(target)
            .write()
            .set_egl_image(image.width, image.height);
        self.with_host_2d(target, |e, t| e.wire.egl_image_target_texture_2d_oes(t, image));
        Ok(())
    }
}

impl<T: Transport> TextureApi for Gl2Encoder<T> {
    fn active_texture(&mut self, texture: GLenum) {
        self.guarded("glActiveTexture", |e| e.try_active_texture(texture))
    }

    fn gen_textures(&mut self, n: GLsizei) -> Vec<GLuint> {
        self.guarded("glGenTextures", |e| {
            fail_if(n < 0, GlError::InvalidValue)?;
            let names = e.wire.gen_textures(n);
            e.state.set_existence(ObjectKind::Texture, true, &names);
            Ok(names)
        })
    }

    fn delete_textures(&mut self, textures: &[GLuint]) {
        self.try_delete_textures(textures);
    }

    fn bind_texture(&mut self, target: GLenum, texture: GLuint) {
        self.guarded("glBindTexture", |e| e.try_bind_texture(target, texture))
    }

    fn is_texture(&mut self, texture: GLuint) -> bool {
        self.state.is_texture(texture)
    }

    fn tex_parameterf(&mut self, target: GLenum, pname: GLenum, param: GLfloat) {
        self.guarded("glTexParameterf", |e| {
            e.check_tex_parameter(target, pname, param as GLint)?;
            e.with_host_2d(target, |e, t| e.wire.tex_parameterf(t, pname, param));
            Ok(())
        })
    }

    fn tex_parameteri(&mut self, target: GLenum, pname: GLenum, param: GLint) {
        self.guarded("glTexParameteri", |e| {
            e.check_tex_parameter(target, pname, param)?;
            e.with_host_2d(target, |e, t| e.wire.tex_parameteri(t, pname, param));
            Ok(())
        })
    }

    fn tex_parameterfv(&mut self, target: GLenum, pname: GLenum, params: &[GLfloat]) {
        self.guarded("glTexParameterfv", |e| {
            let first = params.first().copied().ok_or(GlError::InvalidValue)?;
            e.check_tex_parameter(target, pname, first as GLint)?;
            e.with_host_2d(target, |e, t| e.wire.tex_parameterfv(t, pname, params));
            Ok(())
        })
    }

    fn tex_parameteriv(&mut self, target: GLenum, pname: GLenum, params: &[GLint]) {
        self.guarded("glTexParameteriv", |e| {
            let first = params.first().copied().ok_or(GlError::InvalidValue)?;
            e.check_tex_parameter(target, pname, first)?;
            e.with_host_2d(target, |e, t| e.wire.tex_parameteriv(t, pname, params));
            Ok(())
        })
    }

    fn get_tex_parameterfv(&mut self, target: GLenum, pname: GLenum, out: &mut [GLfloat]) {
        self.guarded("glGetTexParameterfv", |e| {
            e.try_get_tex_parameter(
                target,
                pname,
                out,
                |v| v as GLfloat,
                |w, t, o| w.get_tex_parameterfv(t, pname, o),
            )
        })
    }

    fn get_tex_parameteriv(&mut self, target: GLenum, pname: GLenum, out: &mut [GLint]) {
        self.guarded("glGetTexParameteriv", |e| {
            e.try_get_tex_parameter(
                target,
                pname,
                out,
                |v| v,
                |w, t, o| w.get_tex_parameteriv(t, pname, o),
            )
        })
    }

    fn tex_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        internal_format: GLint,
        width: GLsizei,
        height: GLsizei,
        border: GLint,
        format: GLenum,
        ty: GLenum,
        pixels: DataSource<'_>,
    ) {
        self.guarded("glTexImage2D", |e| {
            e.try_tex_image_2d(
                target,
                level,
                internal_format,
                width,
                height,
                border,
                format,
                ty,
                pixels,
            )
        })
    }

    fn tex_sub_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        xoffset: GLint,
        yoffset: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: DataSource<'_>,
    ) {
        self.guarded("glTexSubImage2D", |e| {
            e.try_tex_sub_image_2d(target, level, xoffset, yoffset, width, height, format, ty, pixels)
        })
    }

    fn tex_image_3d(
        &mut self,
        target: GLenum,
        level: GLint,
        internal_format: GLint,
        width: GLsizei,
        height: GLsizei,
        depth: GLsizei,
        border: GLint,
        format: GLenum,
        ty: GLenum,
        pixels: DataSource<'_>,
    ) {
        self.guarded("glTexImage3D", |e| {
            e.try_tex_image_3d(
                target,
                level,
                internal_format,
                width,
                height,
                depth,
                border,
                format,
                ty,
                pixels,
            )
        })
    }

    fn tex_sub_image_3d(
        &mut self,
        target: GLenum,
        level: GLint,
        xoffset: GLint,
        yoffset: GLint,
        zoffset: GLint,
        width: GLsizei,
        height: GLsizei,
        depth: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: DataSource<'_>,
    ) {
        self.guarded("glTexSubImage3D", |e| {
            e.try_tex_sub_image_3d(
                target, level, xoffset, yoffset, zoffset, width, height, depth, format, ty, pixels,
            )
        })
    }

    fn copy_tex_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        internal_format: GLenum,
        x: GLint,
        y: GLint,
        width: GLsizei,
        height: GLsizei,
        border: GLint,
    ) {
        self.guarded("glCopyTexImage2D", |e| {
            e.try_copy_tex_image_2d(target, level, internal_format, x, y, width, height, border)
        })
    }

    fn copy_tex_sub_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        xoffset: GLint,
        yoffset: GLint,
        x: GLint,
        y: GLint,
        width: GLsizei,
        height: GLsizei,
    ) {
        self.guarded("glCopyTexSubImage2D", |e| {
            e.try_copy_tex_sub_image_2d(target, level, xoffset, yoffset, x, y, width, height)
        })
    }

    fn compressed_tex_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
        border: GLint,
        image_size: GLsizei,
        data: DataSource<'_>,
    ) {
        self.guarded("glCompressedTexImage2D", |e| {
            e.try_compressed_tex_image(
                target,
                level,
                internal_format,
                (width, height, 1),
                border,
                image_size,
                data,
                false,
            )
        })
    }

    fn compressed_tex_sub_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        xoffset: GLint,
        yoffset: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        image_size: GLsizei,
        data: DataSource<'_>,
    ) {
        self.guarded("glCompressedTexSubImage2D", |e| {
            e.try_compressed_tex_sub_image(
                target,
                level,
                (xoffset, yoffset, 0),
                (width, height, 1),
                format,
                image_size,
                data,
                false,
            )
        })
    }

    fn compressed_tex_image_3d(
        &mut self,
        target: GLenum,
        level: GLint,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
        depth: GLsizei,
        border: GLint,
        image_size: GLsizei,
        data: DataSource<'_>,
    ) {
        self.guarded("glCompressedTexImage3D", |e| {
            e.try_compressed_tex_image(
                target,
                level,
                internal_format,
                (width, height, depth),
                border,
                image_size,
                data,
                true,
            )
        })
    }

    fn compressed_tex_sub_image_3d(
        &mut self,
        target: GLenum,
        level: GLint,
        xoffset: GLint,
        yoffset: GLint,
        zoffset: GLint,
        width: GLsizei,
        height: GLsizei,
        depth: GLsizei,
        format: GLenum,
        image_size: GLsizei,
        data: DataSource<'_>,
    ) {
        self.guarded("glCompressedTexSubImage3D", |e| {
            e.try_compressed_tex_sub_image(
                target,
                level,
                (xoffset, yoffset, zoffset),
                (width, height, depth),
                format,
                image_size,
                data,
                true,
            )
        })
    }

    fn tex_storage_2d(
        &mut self,
        target: GLenum,
        levels: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    ) {
        self.guarded("glTexStorage2D", |e| {
            fail_if(
                !matches!(target, GL_TEXTURE_2D | GL_TEXTURE_CUBE_MAP),
                GlError::InvalidEnum,
            )?;
            e.try_tex_storage(target, levels, internal_format, (width, height, 1))?;
            e.with_host_2d(target, |e, t| {
                e.wire.tex_storage_2d(t, levels, internal_format, width, height)
            });
            Ok(())
        })
    }

    fn tex_storage_3d(
        &mut self,
        target: GLenum,
        levels: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
        depth: GLsizei,
    ) {
        self.guarded("glTexStorage3D", |e| {
            fail_if(!e.is_image_3d_target(target), GlError::InvalidEnum)?;
            e.try_tex_storage(target, levels, internal_format, (width, height, depth))?;
            e.wire
                .tex_storage_3d(target, levels, internal_format, width, height, depth);
            Ok(())
        })
    }

    fn tex_storage_2d_multisample(
        &mut self,
        target: GLenum,
        samples: GLsizei,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
        fixed_sample_locations: bool,
    ) {
        self.guarded("glTexStorage2DMultisample", |e| {
            e.try_tex_storage_2d_multisample(
                target,
                samples,
                internal_format,
                width,
                height,
                fixed_sample_locations,
            )
        })
    }

    fn generate_mipmap(&mut self, target: GLenum) {
        self.guarded("glGenerateMipmap", |e| e.try_generate_mipmap(target))
    }

    fn egl_image_target_texture_2d_oes(&mut self, target: GLenum, image: EglImage) {
        self.guarded("glEGLImageTargetTexture2DOES", |e| {
            e.try_egl_image_target_texture_2d(target, image)
        })
    }
}
