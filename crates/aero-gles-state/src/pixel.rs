//! Pixel-store parameters and transfer addressing.
//!
//! [`PixelStoreState::unpack_layout`] and [`PixelStoreState::pack_layout`] replicate the GL
//! client memory layout rules: rows are padded to the alignment, row length and image height
//! override the transfer extent when non-zero, and skips move the starting offset.

use aero_gles_protocol::gl::{
    GLenum, GLint, GL_PACK_ALIGNMENT, GL_PACK_ROW_LENGTH, GL_PACK_SKIP_PIXELS, GL_PACK_SKIP_ROWS,
    GL_UNPACK_ALIGNMENT, GL_UNPACK_IMAGE_HEIGHT, GL_UNPACK_ROW_LENGTH, GL_UNPACK_SKIP_IMAGES,
    GL_UNPACK_SKIP_PIXELS, GL_UNPACK_SKIP_ROWS,
};

use crate::error::{fail_if, GlError, GlResult};
use crate::format::pixel_size;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelStoreState {
    pub unpack_alignment: GLint,
    pub unpack_row_length: GLint,
    pub unpack_image_height: GLint,
    pub unpack_skip_pixels: GLint,
    pub unpack_skip_rows: GLint,
    pub unpack_skip_images: GLint,
    pub pack_alignment: GLint,
    pub pack_row_length: GLint,
    pub pack_skip_pixels: GLint,
    pub pack_skip_rows: GLint,
}

impl Default for PixelStoreState {
    fn default() -> Self {
        Self {
            unpack_alignment: 4,
            unpack_row_length: 0,
            unpack_image_height: 0,
            unpack_skip_pixels: 0,
            unpack_skip_rows: 0,
            unpack_skip_images: 0,
            pack_alignment: 4,
            pack_row_length: 0,
            pack_skip_pixels: 0,
            pack_skip_rows: 0,
        }
    }
}

/// Byte layout of one pixel transfer in client memory (or in a PBO).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelLayout {
    pub bpp: usize,
    /// Offset of the first transferred pixel.
    pub start_offset: usize,
    /// Bytes actually transferred per row (`width * bpp`).
    pub pixel_row_size: usize,
    /// Row stride including row-length override and alignment padding.
    pub total_row_size: usize,
    /// Bytes spanned by the transferred rows of one image, padding included.
    pub pixel_image_size: usize,
    /// Image stride (`total_row_size * image_height_or_height`).
    pub total_image_size: usize,
    /// Minimum buffer size: the last row of the last image ends at `pixel_row_size`.
    pub needed_size: usize,
}

impl PixelLayout {
    /// Byte offset of texel `(x, y, z)`.
    pub fn texel_offset(&self, x: usize, y: usize, z: usize) -> usize {
        self.start_offset + z * self.total_image_size + y * self.total_row_size + x * self.bpp
    }

    /// True when rows are contiguous so the whole transfer is one slice.
    pub fn is_tightly_packed(&self) -> bool {
        self.pixel_row_size == self.total_row_size
            && self.pixel_image_size == self.total_image_size
    }
}

fn to_usize(v: GLint) -> usize {
    usize::try_from(v).unwrap_or(0)
}

/// Bytes `a * b`, or `INVALID_OPERATION` when the transfer cannot be addressed.
fn mul(a: usize, b: usize) -> GlResult<usize> {
    a.checked_mul(b).ok_or(GlError::InvalidOperation)
}

fn add(a: usize, b: usize) -> GlResult<usize> {
    a.checked_add(b).ok_or(GlError::InvalidOperation)
}

#[allow(clippy::too_many_arguments)]
fn layout(
    alignment: GLint,
    row_length: GLint,
    image_height: GLint,
    skip_pixels: GLint,
    skip_rows: GLint,
    skip_images: GLint,
    extent: (GLint, GLint, GLint),
    bpp: usize,
) -> GlResult<PixelLayout> {
    let (width, height, depth) = extent;
    if width <= 0 || height <= 0 || depth <= 0 || bpp == 0 {
        return Ok(PixelLayout {
            bpp,
            ..PixelLayout::default()
        });
    }
    let (width, height, depth) = (to_usize(width), to_usize(height), to_usize(depth));
    let align = to_usize(alignment).max(1);

    let row_len = if row_length > 0 { to_usize(row_length) } else { width };
    let total_row_size = mul(mul(row_len, bpp)?.div_ceil(align), align)?;
    let pixel_row_size = mul(width, bpp)?;
    let image_rows = if image_height > 0 { to_usize(image_height) } else { height };
    let total_image_size = mul(total_row_size, image_rows)?;
    let pixel_image_size = mul(total_row_size, height)?;

    let start_offset = add(
        add(
            mul(to_usize(skip_images), total_image_size)?,
            mul(to_usize(skip_rows), total_row_size)?,
        )?,
        mul(to_usize(skip_pixels), bpp)?,
    )?;
    let needed_size = add(
        add(
            add(start_offset, mul(total_image_size, depth - 1)?)?,
            mul(total_row_size, height - 1)?,
        )?,
        pixel_row_size,
    )?;

    Ok(PixelLayout {
        bpp,
        start_offset,
        pixel_row_size,
        total_row_size,
        pixel_image_size,
        total_image_size,
        needed_size,
    })
}

impl PixelStoreState {
    /// `glPixelStorei`.
    pub fn set(&mut self, pname: GLenum, value: GLint) -> GlResult {
        let slot = match pname {
            GL_UNPACK_ALIGNMENT => &mut self.unpack_alignment,
            GL_UNPACK_ROW_LENGTH => &mut self.unpack_row_length,
            GL_UNPACK_IMAGE_HEIGHT => &mut self.unpack_image_height,
            GL_UNPACK_SKIP_PIXELS => &mut self.unpack_skip_pixels,
            GL_UNPACK_SKIP_ROWS => &mut self.unpack_skip_rows,
            GL_UNPACK_SKIP_IMAGES => &mut self.unpack_skip_images,
            GL_PACK_ALIGNMENT => &mut self.pack_alignment,
            GL_PACK_ROW_LENGTH => &mut self.pack_row_length,
            GL_PACK_SKIP_PIXELS => &mut self.pack_skip_pixels,
            GL_PACK_SKIP_ROWS => &mut self.pack_skip_rows,
            _ => return Err(GlError::InvalidEnum),
        };
        fail_if(value < 0, GlError::InvalidValue)?;
        if matches!(pname, GL_UNPACK_ALIGNMENT | GL_PACK_ALIGNMENT) {
            fail_if(!matches!(value, 1 | 2 | 4 | 8), GlError::InvalidValue)?;
        }
        *slot = value;
        Ok(())
    }

    pub fn get(&self, pname: GLenum) -> Option<GLint> {
        Some(match pname {
            GL_UNPACK_ALIGNMENT => self.unpack_alignment,
            GL_UNPACK_ROW_LENGTH => self.unpack_row_length,
            GL_UNPACK_IMAGE_HEIGHT => self.unpack_image_height,
            GL_UNPACK_SKIP_PIXELS => self.unpack_skip_pixels,
            GL_UNPACK_SKIP_ROWS => self.unpack_skip_rows,
            GL_UNPACK_SKIP_IMAGES => self.unpack_skip_images,
            GL_PACK_ALIGNMENT => self.pack_alignment,
            GL_PACK_ROW_LENGTH => self.pack_row_length,
            GL_PACK_SKIP_PIXELS => self.pack_skip_pixels,
            GL_PACK_SKIP_ROWS => self.pack_skip_rows,
            _ => return None,
        })
    }

    /// Fails with `INVALID_OPERATION` when the addressed range does not fit in memory.
    pub fn unpack_layout(
        &self,
        width: GLint,
        height: GLint,
        depth: GLint,
        format: GLenum,
        ty: GLenum,
    ) -> GlResult<PixelLayout> {
        layout(
            self.unpack_alignment,
            self.unpack_row_length,
            self.unpack_image_height,
            self.unpack_skip_pixels,
            self.unpack_skip_rows,
            self.unpack_skip_images,
            (width, height, depth),
            pixel_size(format, ty),
        )
    }

    /// Pack transfers are 2D; there is no pack image height or image skip.
    pub fn pack_layout(
        &self,
        width: GLint,
        height: GLint,
        format: GLenum,
        ty: GLenum,
    ) -> GlResult<PixelLayout> {
        layout(
            self.pack_alignment,
            self.pack_row_length,
            0,
            self.pack_skip_pixels,
            self.pack_skip_rows,
            0,
            (width, height, 1),
            pixel_size(format, ty),
        )
    }
}
