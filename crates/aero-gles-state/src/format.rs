//! Format tables: pixel sizes, renderability, filterability and compressed block sizes.
//!
//! Everything here is a pure function of GL enums; context-dependent capabilities are passed
//! in through [`FormatCaps`].

use aero_gles_protocol::gl::*;

use crate::error::{fail_if, GlError, GlResult};

/// Capabilities that change which formats are renderable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormatCaps {
    /// `EXT_color_buffer_float`: 16/32-bit float and `R11F_G11F_B10F` color attachments.
    pub color_buffer_float: bool,
    /// `EXT_color_buffer_half_float`: 16-bit float color attachments only.
    pub color_buffer_half_float: bool,
}

/// Number of components of an external pixel `format`, or `0` if unknown.
pub fn components(format: GLenum) -> usize {
    match format {
        GL_RED | GL_RED_INTEGER | GL_ALPHA | GL_LUMINANCE | GL_DEPTH_COMPONENT => 1,
        GL_RG | GL_RG_INTEGER | GL_LUMINANCE_ALPHA | GL_DEPTH_STENCIL => 2,
        GL_RGB | GL_RGB_INTEGER => 3,
        GL_RGBA | GL_RGBA_INTEGER | GL_BGRA_EXT => 4,
        _ => 0,
    }
}

/// Bytes per pixel of `(format, type)` as laid out in client memory.
pub fn pixel_size(format: GLenum, ty: GLenum) -> usize {
    match ty {
        GL_UNSIGNED_SHORT_5_6_5 | GL_UNSIGNED_SHORT_4_4_4_4 | GL_UNSIGNED_SHORT_5_5_5_1 => 2,
        GL_UNSIGNED_INT_2_10_10_10_REV
        | GL_UNSIGNED_INT_10F_11F_11F_REV
        | GL_UNSIGNED_INT_5_9_9_9_REV
        | GL_UNSIGNED_INT_24_8 => 4,
        GL_FLOAT_32_UNSIGNED_INT_24_8_REV => 8,
        _ => components(format) * gl_sizeof(ty),
    }
}

pub fn is_valid_pixel_format(format: GLenum) -> bool {
    components(format) != 0
}

pub fn is_valid_pixel_type(ty: GLenum) -> bool {
    matches!(
        ty,
        GL_UNSIGNED_BYTE
            | GL_BYTE
            | GL_UNSIGNED_SHORT
            | GL_SHORT
            | GL_UNSIGNED_INT
            | GL_INT
            | GL_HALF_FLOAT
            | GL_HALF_FLOAT_OES
            | GL_FLOAT
            | GL_UNSIGNED_SHORT_5_6_5
            | GL_UNSIGNED_SHORT_4_4_4_4
            | GL_UNSIGNED_SHORT_5_5_5_1
            | GL_UNSIGNED_INT_2_10_10_10_REV
            | GL_UNSIGNED_INT_10F_11F_11F_REV
            | GL_UNSIGNED_INT_5_9_9_9_REV
            | GL_UNSIGNED_INT_24_8
            | GL_FLOAT_32_UNSIGNED_INT_24_8_REV
    )
}

/// Unsized internal formats accepted by `TexImage*`, where `format` must equal the internal
/// format.
pub fn is_unsized_format(internal_format: GLenum) -> bool {
    matches!(
        internal_format,
        GL_ALPHA
            | GL_LUMINANCE
            | GL_LUMINANCE_ALPHA
            | GL_RGB
            | GL_RGBA
            | GL_BGRA_EXT
            | GL_DEPTH_COMPONENT
            | GL_DEPTH_STENCIL
            | GL_RED
            | GL_RG
    )
}

/// External `(format, accepted types)` for a sized internal format.
pub fn sized_format_info(internal_format: GLenum) -> Option<(GLenum, &'static [GLenum])> {
    const UB: &[GLenum] = &[GL_UNSIGNED_BYTE];
    const B: &[GLenum] = &[GL_BYTE];
    const HALF_OR_FLOAT: &[GLenum] = &[GL_HALF_FLOAT, GL_HALF_FLOAT_OES, GL_FLOAT];
    const F: &[GLenum] = &[GL_FLOAT];
    let info: (GLenum, &'static [GLenum]) = match internal_format {
        GL_R8 => (GL_RED, UB),
        GL_R8_SNORM => (GL_RED, B),
        GL_R16F => (GL_RED, HALF_OR_FLOAT),
        GL_R32F => (GL_RED, F),
        GL_R8UI => (GL_RED_INTEGER, UB),
        GL_R8I => (GL_RED_INTEGER, B),
        GL_R16UI => (GL_RED_INTEGER, &[GL_UNSIGNED_SHORT]),
        GL_R16I => (GL_RED_INTEGER, &[GL_SHORT]),
        GL_R32UI => (GL_RED_INTEGER, &[GL_UNSIGNED_INT]),
        GL_R32I => (GL_RED_INTEGER, &[GL_INT]),
        GL_RG8 => (GL_RG, UB),
        GL_RG8_SNORM => (GL_RG, B),
        GL_RG16F => (GL_RG, HALF_OR_FLOAT),
        GL_RG32F => (GL_RG, F),
        GL_RG8UI => (GL_RG_INTEGER, UB),
        GL_RG8I => (GL_RG_INTEGER, B),
        GL_RG16UI => (GL_RG_INTEGER, &[GL_UNSIGNED_SHORT]),
        GL_RG16I => (GL_RG_INTEGER, &[GL_SHORT]),
        GL_RG32UI => (GL_RG_INTEGER, &[GL_UNSIGNED_INT]),
        GL_RG32I => (GL_RG_INTEGER, &[GL_INT]),
        GL_RGB8 | GL_SRGB8 => (GL_RGB, UB),
        GL_RGB565 => (GL_RGB, &[GL_UNSIGNED_BYTE, GL_UNSIGNED_SHORT_5_6_5]),
        GL_RGB8_SNORM => (GL_RGB, B),
        GL_R11F_G11F_B10F => (
            GL_RGB,
            &[GL_UNSIGNED_INT_10F_11F_11F_REV, GL_HALF_FLOAT, GL_HALF_FLOAT_OES, GL_FLOAT],
        ),
        GL_RGB9_E5 => (
            GL_RGB,
            &[GL_UNSIGNED_INT_5_9_9_9_REV, GL_HALF_FLOAT, GL_HALF_FLOAT_OES, GL_FLOAT],
        ),
        GL_RGB16F => (GL_RGB, HALF_OR_FLOAT),
        GL_RGB32F => (GL_RGB, F),
        GL_RGB8UI => (GL_RGB_INTEGER, UB),
        GL_RGB8I => (GL_RGB_INTEGER, B),
        GL_RGB16UI => (GL_RGB_INTEGER, &[GL_UNSIGNED_SHORT]),
        GL_RGB16I => (GL_RGB_INTEGER, &[GL_SHORT]),
        GL_RGB32UI => (GL_RGB_INTEGER, &[GL_UNSIGNED_INT]),
        GL_RGB32I => (GL_RGB_INTEGER, &[GL_INT]),
        GL_RGBA8 | GL_SRGB8_ALPHA8 => (GL_RGBA, UB),
        GL_RGBA8_SNORM => (GL_RGBA, B),
        GL_RGB5_A1 => (
            GL_RGBA,
            &[GL_UNSIGNED_BYTE, GL_UNSIGNED_SHORT_5_5_5_1, GL_UNSIGNED_INT_2_10_10_10_REV],
        ),
        GL_RGBA4 => (GL_RGBA, &[GL_UNSIGNED_BYTE, GL_UNSIGNED_SHORT_4_4_4_4]),
        GL_RGB10_A2 => (GL_RGBA, &[GL_UNSIGNED_INT_2_10_10_10_REV]),
        GL_RGBA16F => (GL_RGBA, HALF_OR_FLOAT),
        GL_RGBA32F => (GL_RGBA, F),
        GL_RGBA8UI => (GL_RGBA_INTEGER, UB),
        GL_RGBA8I => (GL_RGBA_INTEGER, B),
        GL_RGB10_A2UI => (GL_RGBA_INTEGER, &[GL_UNSIGNED_INT_2_10_10_10_REV]),
        GL_RGBA16UI => (GL_RGBA_INTEGER, &[GL_UNSIGNED_SHORT]),
        GL_RGBA16I => (GL_RGBA_INTEGER, &[GL_SHORT]),
        GL_RGBA32UI => (GL_RGBA_INTEGER, &[GL_UNSIGNED_INT]),
        GL_RGBA32I => (GL_RGBA_INTEGER, &[GL_INT]),
        GL_BGRA8_EXT => (GL_BGRA_EXT, UB),
        GL_DEPTH_COMPONENT16 => (GL_DEPTH_COMPONENT, &[GL_UNSIGNED_SHORT, GL_UNSIGNED_INT]),
        GL_DEPTH_COMPONENT24 => (GL_DEPTH_COMPONENT, &[GL_UNSIGNED_INT]),
        GL_DEPTH_COMPONENT32F => (GL_DEPTH_COMPONENT, F),
        GL_DEPTH24_STENCIL8 => (GL_DEPTH_STENCIL, &[GL_UNSIGNED_INT_24_8]),
        GL_DEPTH32F_STENCIL8 => (GL_DEPTH_STENCIL, &[GL_FLOAT_32_UNSIGNED_INT_24_8_REV]),
        _ => return None,
    };
    Some(info)
}

pub fn is_sized_format(internal_format: GLenum) -> bool {
    sized_format_info(internal_format).is_some() || internal_format == GL_STENCIL_INDEX8
}

/// Checks an `(internal_format, format, type)` triple for `TexImage*`.
///
/// Unknown enums are `INVALID_ENUM`; known enums that do not combine are
/// `INVALID_OPERATION`.
pub fn check_tex_image_format(internal_format: GLenum, format: GLenum, ty: GLenum) -> GlResult {
    fail_if(
        !is_valid_pixel_format(format) || !is_valid_pixel_type(ty),
        GlError::InvalidEnum,
    )?;
    if is_unsized_format(internal_format) {
        return fail_if(internal_format != format, GlError::InvalidOperation);
    }
    match sized_format_info(internal_format) {
        None => Err(GlError::InvalidEnum),
        Some((fmt, types)) => fail_if(
            fmt != format || !types.contains(&ty),
            GlError::InvalidOperation,
        ),
    }
}

pub fn is_integer_format(internal_format: GLenum) -> bool {
    matches!(
        sized_format_info(internal_format),
        Some((GL_RED_INTEGER | GL_RG_INTEGER | GL_RGB_INTEGER | GL_RGBA_INTEGER, _))
    )
}

pub fn is_float_format(internal_format: GLenum) -> bool {
    matches!(
        internal_format,
        GL_R16F | GL_RG16F | GL_RGB16F | GL_RGBA16F | GL_R32F | GL_RG32F | GL_RGB32F | GL_RGBA32F
            | GL_R11F_G11F_B10F
    )
}

/// Color renderability of a renderbuffer format or texture internal format.
///
/// Unsized texture formats are renderable when they carry color channels beyond
/// luminance/alpha; `ty` only matters for those.
pub fn is_color_renderable(internal_format: GLenum, ty: GLenum, caps: FormatCaps) -> bool {
    match internal_format {
        GL_R8 | GL_RG8 | GL_RGB8 | GL_RGB565 | GL_RGBA4 | GL_RGB5_A1 | GL_RGBA8 | GL_RGB10_A2
        | GL_RGB10_A2UI | GL_SRGB8_ALPHA8 | GL_R8I | GL_R8UI | GL_R16I | GL_R16UI | GL_R32I
        | GL_R32UI | GL_RG8I | GL_RG8UI | GL_RG16I | GL_RG16UI | GL_RG32I | GL_RG32UI
        | GL_RGBA8I | GL_RGBA8UI | GL_RGBA16I | GL_RGBA16UI | GL_RGBA32I | GL_RGBA32UI
        | GL_BGRA8_EXT => true,
        GL_R16F | GL_RG16F | GL_RGBA16F => caps.color_buffer_float || caps.color_buffer_half_float,
        GL_RGB16F => caps.color_buffer_half_float,
        GL_R32F | GL_RG32F | GL_RGBA32F | GL_R11F_G11F_B10F => caps.color_buffer_float,
        GL_RGB | GL_RGBA | GL_BGRA_EXT => match ty {
            GL_FLOAT | GL_HALF_FLOAT | GL_HALF_FLOAT_OES => {
                caps.color_buffer_float || caps.color_buffer_half_float
            }
            _ => true,
        },
        _ => false,
    }
}

pub fn is_depth_renderable(internal_format: GLenum) -> bool {
    matches!(
        internal_format,
        GL_DEPTH_COMPONENT
            | GL_DEPTH_STENCIL
            | GL_DEPTH_COMPONENT16
            | GL_DEPTH_COMPONENT24
            | GL_DEPTH_COMPONENT32F
            | GL_DEPTH24_STENCIL8
            | GL_DEPTH32F_STENCIL8
    )
}

pub fn is_stencil_renderable(internal_format: GLenum) -> bool {
    matches!(
        internal_format,
        GL_STENCIL_INDEX8 | GL_DEPTH_STENCIL | GL_DEPTH24_STENCIL8 | GL_DEPTH32F_STENCIL8
    )
}

/// Formats accepted by `RenderbufferStorage*`.
pub fn is_renderbuffer_format(internal_format: GLenum, caps: FormatCaps) -> bool {
    !is_unsized_format(internal_format)
        && (is_color_renderable(internal_format, GL_NONE, caps)
            || is_depth_renderable(internal_format)
            || is_stencil_renderable(internal_format))
}

/// Texture-filterable sized formats (table 3.13 "filterable" column).
pub fn is_filterable(internal_format: GLenum) -> bool {
    matches!(
        internal_format,
        GL_R8 | GL_R8_SNORM | GL_RG8 | GL_RG8_SNORM | GL_RGB8 | GL_RGB8_SNORM | GL_RGB565
            | GL_RGBA4 | GL_RGB5_A1 | GL_RGBA8 | GL_RGBA8_SNORM | GL_RGB10_A2 | GL_SRGB8
            | GL_SRGB8_ALPHA8 | GL_R16F | GL_RG16F | GL_RGB16F | GL_RGBA16F
            | GL_R11F_G11F_B10F | GL_RGB9_E5 | GL_BGRA8_EXT
    )
}

/// Largest sample count the host supports for `internal_format`.
pub fn max_samples_for_format(internal_format: GLenum, max_samples: i32) -> i32 {
    if is_integer_format(internal_format) {
        0
    } else {
        max_samples
    }
}

const ASTC_BLOCKS: [(usize, usize); 14] = [
    (4, 4),
    (5, 4),
    (5, 5),
    (6, 5),
    (6, 6),
    (8, 5),
    (8, 6),
    (8, 8),
    (10, 5),
    (10, 6),
    (10, 8),
    (10, 10),
    (12, 10),
    (12, 12),
];

/// `(block width, block height, bytes per block)`.
pub fn compressed_block(internal_format: GLenum) -> Option<(usize, usize, usize)> {
    let block = match internal_format {
        GL_ETC1_RGB8_OES
        | GL_COMPRESSED_R11_EAC
        | GL_COMPRESSED_SIGNED_R11_EAC
        | GL_COMPRESSED_RGB8_ETC2
        | GL_COMPRESSED_SRGB8_ETC2
        | GL_COMPRESSED_RGB8_PUNCHTHROUGH_ALPHA1_ETC2
        | GL_COMPRESSED_SRGB8_PUNCHTHROUGH_ALPHA1_ETC2 => (4, 4, 8),
        GL_COMPRESSED_RG11_EAC
        | GL_COMPRESSED_SIGNED_RG11_EAC
        | GL_COMPRESSED_RGBA8_ETC2_EAC
        | GL_COMPRESSED_SRGB8_ALPHA8_ETC2_EAC => (4, 4, 16),
        GL_COMPRESSED_RGB_S3TC_DXT1_EXT
        | GL_COMPRESSED_RGBA_S3TC_DXT1_EXT
        | GL_COMPRESSED_SRGB_S3TC_DXT1_EXT
        | GL_COMPRESSED_SRGB_ALPHA_S3TC_DXT1_EXT
        | GL_COMPRESSED_RED_RGTC1_EXT
        | GL_COMPRESSED_SIGNED_RED_RGTC1_EXT => (4, 4, 8),
        GL_COMPRESSED_RGBA_S3TC_DXT3_EXT
        | GL_COMPRESSED_RGBA_S3TC_DXT5_EXT
        | GL_COMPRESSED_SRGB_ALPHA_S3TC_DXT3_EXT
        | GL_COMPRESSED_SRGB_ALPHA_S3TC_DXT5_EXT
        | GL_COMPRESSED_RED_GREEN_RGTC2_EXT
        | GL_COMPRESSED_SIGNED_RED_GREEN_RGTC2_EXT
        | GL_COMPRESSED_RGBA_BPTC_UNORM_EXT
        | GL_COMPRESSED_SRGB_ALPHA_BPTC_UNORM_EXT
        | GL_COMPRESSED_RGB_BPTC_SIGNED_FLOAT_EXT
        | GL_COMPRESSED_RGB_BPTC_UNSIGNED_FLOAT_EXT => (4, 4, 16),
        GL_COMPRESSED_RGBA_ASTC_4x4_KHR..=GL_COMPRESSED_RGBA_ASTC_12x12_KHR => {
            let (w, h) = ASTC_BLOCKS[(internal_format - GL_COMPRESSED_RGBA_ASTC_4x4_KHR) as usize];
            (w, h, 16)
        }
        GL_COMPRESSED_SRGB8_ALPHA8_ASTC_4x4_KHR..=GL_COMPRESSED_SRGB8_ALPHA8_ASTC_12x12_KHR => {
            let (w, h) =
                ASTC_BLOCKS[(internal_format - GL_COMPRESSED_SRGB8_ALPHA8_ASTC_4x4_KHR) as usize];
            (w, h, 16)
        }
        _ => return None,
    };
    Some(block)
}

pub fn is_compressed(internal_format: GLenum) -> bool {
    compressed_block(internal_format).is_some()
}

/// ETC2/EAC formats (not ETC1), which carry the sub-image block alignment rule.
pub fn is_etc2(internal_format: GLenum) -> bool {
    (GL_COMPRESSED_R11_EAC..=GL_COMPRESSED_SRGB8_ALPHA8_ETC2_EAC).contains(&internal_format)
}

pub fn is_astc(internal_format: GLenum) -> bool {
    (GL_COMPRESSED_RGBA_ASTC_4x4_KHR..=GL_COMPRESSED_RGBA_ASTC_12x12_KHR)
        .contains(&internal_format)
        || (GL_COMPRESSED_SRGB8_ALPHA8_ASTC_4x4_KHR..=GL_COMPRESSED_SRGB8_ALPHA8_ASTC_12x12_KHR)
            .contains(&internal_format)
}

/// Byte size of a compressed image, or `None` for non-compressed formats.
pub fn expected_compressed_size(
    internal_format: GLenum,
    width: usize,
    height: usize,
    depth: usize,
) -> Option<usize> {
    let (bw, bh, bytes) = compressed_block(internal_format)?;
    Some(width.div_ceil(bw) * height.div_ceil(bh) * depth * bytes)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn packed_types_override_component_math() {
        assert_eq!(pixel_size(GL_RGBA, GL_UNSIGNED_BYTE), 4);
        assert_eq!(pixel_size(GL_RGB, GL_UNSIGNED_SHORT_5_6_5), 2);
        assert_eq!(pixel_size(GL_RGBA, GL_FLOAT), 16);
        assert_eq!(pixel_size(GL_DEPTH_STENCIL, GL_FLOAT_32_UNSIGNED_INT_24_8_REV), 8);
        assert_eq!(pixel_size(GL_LUMINANCE_ALPHA, GL_UNSIGNED_BYTE), 2);
    }

    #[test]
    fn compressed_sizes_round_up_to_whole_blocks() {
        assert_eq!(expected_compressed_size(GL_ETC1_RGB8_OES, 5, 5, 1), Some(4 * 8));
        assert_eq!(
            expected_compressed_size(GL_COMPRESSED_RGBA8_ETC2_EAC, 8, 4, 2),
            Some(2 * 16 * 2)
        );
        // 5x4 ASTC is the second entry of the block table.
        assert_eq!(
            expected_compressed_size(GL_COMPRESSED_RGBA_ASTC_4x4_KHR + 1, 10, 4, 1),
            Some(2 * 16)
        );
        assert_eq!(
            expected_compressed_size(GL_COMPRESSED_SRGB8_ALPHA8_ASTC_12x12_KHR, 13, 1, 1),
            Some(2 * 16)
        );
        assert_eq!(expected_compressed_size(GL_RGBA8, 4, 4, 1), None);
    }

    #[test]
    fn tex_image_format_combinations() {
        assert_eq!(check_tex_image_format(GL_RGBA8, GL_RGBA, GL_UNSIGNED_BYTE), Ok(()));
        assert_eq!(check_tex_image_format(GL_RGBA, GL_RGBA, GL_UNSIGNED_BYTE), Ok(()));
        assert_eq!(
            check_tex_image_format(GL_RGBA, GL_RGB, GL_UNSIGNED_BYTE),
            Err(GlError::InvalidOperation)
        );
        assert_eq!(
            check_tex_image_format(GL_RGBA8, GL_RGBA, GL_FLOAT),
            Err(GlError::InvalidOperation)
        );
        assert_eq!(
            check_tex_image_format(GL_RGBA8, 0x1234, GL_UNSIGNED_BYTE),
            Err(GlError::InvalidEnum)
        );
        assert_eq!(
            check_tex_image_format(0x1234, GL_RGBA, GL_UNSIGNED_BYTE),
            Err(GlError::InvalidEnum)
        );
    }

    #[test]
    fn renderability_honors_float_caps() {
        let none = FormatCaps::default();
        let float = FormatCaps {
            color_buffer_float: true,
            ..FormatCaps::default()
        };
        assert!(!is_color_renderable(GL_RGBA32F, GL_FLOAT, none));
        assert!(is_color_renderable(GL_RGBA32F, GL_FLOAT, float));
        assert!(is_color_renderable(GL_RGBA, GL_UNSIGNED_BYTE, none));
        assert!(!is_color_renderable(GL_LUMINANCE, GL_UNSIGNED_BYTE, none));
        assert!(is_depth_renderable(GL_DEPTH24_STENCIL8));
        assert!(is_stencil_renderable(GL_DEPTH24_STENCIL8));
        assert!(!is_stencil_renderable(GL_DEPTH_COMPONENT16));
        assert!(is_renderbuffer_format(GL_STENCIL_INDEX8, none));
        assert!(!is_renderbuffer_format(GL_RGBA, none));
    }

    #[test]
    fn etc2_range_excludes_etc1() {
        assert!(is_etc2(GL_COMPRESSED_RGB8_ETC2));
        assert!(is_etc2(GL_COMPRESSED_R11_EAC));
        assert!(!is_etc2(GL_ETC1_RGB8_OES));
        assert!(is_astc(GL_COMPRESSED_SRGB8_ALPHA8_ASTC_4x4_KHR));
    }
}
