use aero_gles_protocol::gl::*;

use crate::format::FormatCaps;

/// Host implementation limits the context is created with.
///
/// These size the indexed-binding tables and answer limit queries without a round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostCaps {
    pub max_vertex_attribs: GLint,
    pub max_vertex_attrib_bindings: GLint,
    pub max_vertex_attrib_stride: GLint,
    pub max_combined_texture_image_units: GLint,
    pub max_texture_image_units: GLint,
    pub max_vertex_texture_image_units: GLint,
    pub max_texture_size: GLint,
    pub max_cube_map_texture_size: GLint,
    pub max_3d_texture_size: GLint,
    pub max_array_texture_layers: GLint,
    pub max_renderbuffer_size: GLint,
    pub max_color_attachments: GLint,
    pub max_draw_buffers: GLint,
    pub max_samples: GLint,
    pub max_color_texture_samples: GLint,
    pub max_depth_texture_samples: GLint,
    pub max_integer_samples: GLint,
    pub max_transform_feedback_separate_attribs: GLint,
    pub max_uniform_buffer_bindings: GLint,
    pub max_atomic_counter_buffer_bindings: GLint,
    pub max_shader_storage_buffer_bindings: GLint,
    pub uniform_buffer_offset_alignment: GLint,
    pub shader_storage_buffer_offset_alignment: GLint,
    pub format_caps: FormatCaps,
}

impl Default for HostCaps {
    fn default() -> Self {
        Self {
            max_vertex_attribs: 16,
            max_vertex_attrib_bindings: 16,
            max_vertex_attrib_stride: 2048,
            max_combined_texture_image_units: 32,
            max_texture_image_units: 16,
            max_vertex_texture_image_units: 16,
            max_texture_size: 4096,
            max_cube_map_texture_size: 4096,
            max_3d_texture_size: 256,
            max_array_texture_layers: 256,
            max_renderbuffer_size: 4096,
            max_color_attachments: 8,
            max_draw_buffers: 8,
            max_samples: 4,
            max_color_texture_samples: 4,
            max_depth_texture_samples: 4,
            max_integer_samples: 1,
            max_transform_feedback_separate_attribs: 4,
            max_uniform_buffer_bindings: 24,
            max_atomic_counter_buffer_bindings: 1,
            max_shader_storage_buffer_bindings: 4,
            uniform_buffer_offset_alignment: 256,
            shader_storage_buffer_offset_alignment: 256,
            format_caps: FormatCaps::default(),
        }
    }
}

impl HostCaps {
    /// Answers a limit query, or `None` when `pname` is not a tracked limit.
    pub fn get(&self, pname: GLenum) -> Option<GLint> {
        let v = match pname {
            GL_MAX_VERTEX_ATTRIBS => self.max_vertex_attribs,
            GL_MAX_VERTEX_ATTRIB_BINDINGS => self.max_vertex_attrib_bindings,
            GL_MAX_VERTEX_ATTRIB_STRIDE => self.max_vertex_attrib_stride,
            GL_MAX_COMBINED_TEXTURE_IMAGE_UNITS => self.max_combined_texture_image_units,
            GL_MAX_TEXTURE_IMAGE_UNITS => self.max_texture_image_units,
            GL_MAX_VERTEX_TEXTURE_IMAGE_UNITS => self.max_vertex_texture_image_units,
            GL_MAX_TEXTURE_SIZE => self.max_texture_size,
            GL_MAX_CUBE_MAP_TEXTURE_SIZE => self.max_cube_map_texture_size,
            GL_MAX_3D_TEXTURE_SIZE => self.max_3d_texture_size,
            GL_MAX_ARRAY_TEXTURE_LAYERS => self.max_array_texture_layers,
            GL_MAX_RENDERBUFFER_SIZE => self.max_renderbuffer_size,
            GL_MAX_COLOR_ATTACHMENTS => self.max_color_attachments,
            GL_MAX_DRAW_BUFFERS => self.max_draw_buffers,
            GL_MAX_SAMPLES => self.max_samples,
            GL_MAX_COLOR_TEXTURE_SAMPLES => self.max_color_texture_samples,
            GL_MAX_DEPTH_TEXTURE_SAMPLES => self.max_depth_texture_samples,
            GL_MAX_INTEGER_SAMPLES => self.max_integer_samples,
            GL_MAX_TRANSFORM_FEEDBACK_SEPARATE_ATTRIBS => {
                self.max_transform_feedback_separate_attribs
            }
            GL_MAX_UNIFORM_BUFFER_BINDINGS => self.max_uniform_buffer_bindings,
            GL_MAX_ATOMIC_COUNTER_BUFFER_BINDINGS => self.max_atomic_counter_buffer_bindings,
            GL_MAX_SHADER_STORAGE_BUFFER_BINDINGS => self.max_shader_storage_buffer_bindings,
            GL_UNIFORM_BUFFER_OFFSET_ALIGNMENT => self.uniform_buffer_offset_alignment,
            GL_SHADER_STORAGE_BUFFER_OFFSET_ALIGNMENT => {
                self.shader_storage_buffer_offset_alignment
            }
            _ => return None,
        };
        Some(v)
    }

    /// `log2(max_texture_size)`: the largest legal mip level.
    pub fn max_texture_level(&self, target: GLenum) -> GLint {
        let max = match target {
            GL_TEXTURE_3D => self.max_3d_texture_size,
            GL_TEXTURE_CUBE_MAP
            | GL_TEXTURE_CUBE_MAP_POSITIVE_X..=GL_TEXTURE_CUBE_MAP_NEGATIVE_Z => {
                self.max_cube_map_texture_size
            }
            _ => self.max_texture_size,
        };
        ilog2(max)
    }

    pub fn max_texture_dim(&self, target: GLenum) -> GLint {
        match target {
            GL_TEXTURE_3D => self.max_3d_texture_size,
            GL_TEXTURE_CUBE_MAP
            | GL_TEXTURE_CUBE_MAP_POSITIVE_X..=GL_TEXTURE_CUBE_MAP_NEGATIVE_Z => {
                self.max_cube_map_texture_size
            }
            _ => self.max_texture_size,
        }
    }
}

pub fn ilog2(v: GLint) -> GLint {
    if v <= 0 {
        0
    } else {
        v.ilog2() as GLint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_level_follows_the_target_limit() {
        let caps = HostCaps::default();
        assert_eq!(caps.max_texture_level(GL_TEXTURE_2D), 12);
        assert_eq!(caps.max_texture_level(GL_TEXTURE_3D), 8);
        assert_eq!(caps.get(GL_MAX_COLOR_ATTACHMENTS), Some(8));
        assert_eq!(caps.get(GL_VENDOR), None);
    }
}
