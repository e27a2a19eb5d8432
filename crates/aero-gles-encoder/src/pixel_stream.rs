//! Moving pixel rectangles between client memory and the wire.
//!
//! Pixel data travels tightly packed: rows of `width * bpp` bytes, images of `height` rows, no
//! skips. Client memory follows the pixel-store layout, so uploads gather rows out of it and
//! readbacks scatter rows into it. Contiguous layouts skip the copy.

use std::borrow::Cow;

use aero_gles_state::{fail_if, GlError, GlResult, PixelLayout};

/// Byte size of `height` rows by `depth` images of tightly packed pixels.
pub fn tight_size(layout: &PixelLayout, height: usize, depth: usize) -> usize {
    layout
        .pixel_row_size
        .saturating_mul(height)
        .saturating_mul(depth)
}

/// Collects the transferred texels of `src` into tight rows.
///
/// A `src` shorter than the layout needs is `INVALID_OPERATION`.
pub fn gather<'a>(
    src: &'a [u8],
    layout: &PixelLayout,
    height: usize,
    depth: usize,
) -> GlResult<Cow<'a, [u8]>> {
    let size = tight_size(layout, height, depth);
    if size == 0 {
        return Ok(Cow::Borrowed(&[]));
    }
    fail_if(src.len() < layout.needed_size, GlError::InvalidOperation)?;
    if layout.is_tightly_packed() {
        let start = layout.start_offset;
        return Ok(Cow::Borrowed(&src[start..start + size]));
    }

    let row = layout.pixel_row_size;
    let mut out = Vec::with_capacity(size);
    for z in 0..depth {
        for y in 0..height {
            let at = layout.texel_offset(0, y, z);
            out.extend_from_slice(&src[at..at + row]);
        }
    }
    Ok(Cow::Owned(out))
}

/// Writes tight rows from `tight` into `dst` following the pack layout. Bytes between rows are
/// left untouched.
pub fn scatter(tight: &[u8], dst: &mut [u8], layout: &PixelLayout, height: usize) -> GlResult {
    let size = tight_size(layout, height, 1);
    if size == 0 {
        return Ok(());
    }
    fail_if(dst.len() < layout.needed_size, GlError::InvalidOperation)?;
    fail_if(tight.len() < size, GlError::InvalidOperation)?;
    if layout.is_tightly_packed() {
        let start = layout.start_offset;
        dst[start..start + size].copy_from_slice(&tight[..size]);
        return Ok(());
    }

    let row = layout.pixel_row_size;
    for (y, chunk) in tight[..size].chunks_exact(row).enumerate() {
        let at = layout.texel_offset(0, y, 0);
        dst[at..at + row].copy_from_slice(chunk);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use aero_gles_protocol::gl::{GL_RGB, GL_RGBA, GL_UNSIGNED_BYTE};
    use aero_gles_state::PixelStoreState;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn padded_rows_are_compacted() {
        // RGB8 with alignment 4: 3x2 pixels have 9 data bytes and 3 padding bytes per row.
        let layout = PixelStoreState::default()
            .unpack_layout(3, 2, 1, GL_RGB, GL_UNSIGNED_BYTE)
            .unwrap();
        let mut src: Vec<u8> = (0..9).collect();
        src.extend([0xEE; 3]);
        src.extend(10..19);

        let tight = gather(&src, &layout, 2, 1).unwrap();
        assert!(matches!(tight, Cow::Owned(_)));
        let expected: Vec<u8> = (0..9).chain(10..19).collect();
        assert_eq!(tight.as_ref(), expected.as_slice());
    }

    #[test]
    fn contiguous_layouts_borrow() {
        let mut store = PixelStoreState::default();
        store.set(aero_gles_protocol::gl::GL_UNPACK_SKIP_ROWS, 1).unwrap();
        let layout = store.unpack_layout(1, 2, 1, GL_RGBA, GL_UNSIGNED_BYTE).unwrap();
        let src: Vec<u8> = (0..12).collect();
        let tight = gather(&src, &layout, 2, 1).unwrap();
        assert_eq!(tight, Cow::Borrowed(&src[4..12]));
    }

    #[test]
    fn short_client_memory_is_rejected() {
        let layout = PixelStoreState::default()
            .unpack_layout(2, 2, 1, GL_RGBA, GL_UNSIGNED_BYTE)
            .unwrap();
        assert_eq!(
            gather(&[0; 15], &layout, 2, 1).unwrap_err(),
            GlError::InvalidOperation
        );
    }

    #[test]
    fn readback_lands_on_the_pack_layout() {
        let mut store = PixelStoreState::default();
        store.set(aero_gles_protocol::gl::GL_PACK_ROW_LENGTH, 3).unwrap();
        store.set(aero_gles_protocol::gl::GL_PACK_SKIP_PIXELS, 1).unwrap();
        let layout = store.pack_layout(1, 2, GL_RGBA, GL_UNSIGNED_BYTE).unwrap();
        let tight = [1, 2, 3, 4, 5, 6, 7, 8];
        let mut dst = [0u8; 24];
        scatter(&tight, &mut dst, &layout, 2).unwrap();

        assert_eq!(&dst[4..8], &[1, 2, 3, 4]);
        assert_eq!(&dst[16..20], &[5, 6, 7, 8]);
        assert_eq!(dst.iter().filter(|&&b| b != 0).count(), 8);

        // Gathering back with the same parameters sees the same texels.
        let again = gather(&dst, &layout, 2, 1).unwrap();
        assert_eq!(again.as_ref(), &tight);
    }
}
