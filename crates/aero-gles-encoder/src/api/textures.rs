use aero_gles_protocol::gl::*;

use super::EglImage;

gles_family! {
    /// Texture objects and image specification.
    ///
    /// Client pixel data is sent as-is; callers of the verbatim forms hand over tightly packed
    /// rows.
    pub trait TextureApi {
        commands {
            fn active_texture(texture: GLenum) = ActiveTexture;
            fn delete_textures(textures: &[GLuint]) = DeleteTextures;
            fn bind_texture(target: GLenum, texture: GLuint) = BindTexture;
            fn tex_parameterf(target: GLenum, pname: GLenum, param: GLfloat) = TexParameterf;
            fn tex_parameteri(target: GLenum, pname: GLenum, param: GLint) = TexParameteri;
            fn tex_parameterfv(target: GLenum, pname: GLenum, params: &[GLfloat]) = TexParameterfv;
            fn tex_parameteriv(target: GLenum, pname: GLenum, params: &[GLint]) = TexParameteriv;
            fn copy_tex_image_2d(
                target: GLenum,
                level: GLint,
                internal_format: GLenum,
                x: GLint,
                y: GLint,
                width: GLsizei,
                height: GLsizei,
                border: GLint,
            ) = CopyTexImage2D;
            fn copy_tex_sub_image_2d(
                target: GLenum,
                level: GLint,
                xoffset: GLint,
                yoffset: GLint,
                x: GLint,
                y: GLint,
                width: GLsizei,
                height: GLsizei,
            ) = CopyTexSubImage2D;
            fn tex_storage_2d(
                target: GLenum,
                levels: GLsizei,
                internal_format: GLenum,
                width: GLsizei,
                height: GLsizei,
            ) = TexStorage2D;
            fn tex_storage_3d(
                target: GLenum,
                levels: GLsizei,
                internal_format: GLenum,
                width: GLsizei,
                height: GLsizei,
                depth: GLsizei,
            ) = TexStorage3D;
            fn tex_storage_2d_multisample(
                target: GLenum,
                samples: GLsizei,
                internal_format: GLenum,
                width: GLsizei,
                height: GLsizei,
                fixed_sample_locations: bool,
            ) = TexStorage2DMultisample;
            fn generate_mipmap(target: GLenum) = GenerateMipmap;
            fn egl_image_target_texture_2d_oes(target: GLenum, image: EglImage) = EglImageTargetTexture2DOes;
        }
        returns {
            fn is_texture(texture: GLuint) -> bool = IsTexture;
        }
        outputs {
            fn get_tex_parameterfv(target: GLenum, pname: GLenum; out: &mut [GLfloat]) = GetTexParameterfv;
            fn get_tex_parameteriv(target: GLenum, pname: GLenum; out: &mut [GLint]) = GetTexParameteriv;
        }
        uploads {
            fn tex_image_2d(
                target: GLenum,
                level: GLint,
                internal_format: GLint,
                width: GLsizei,
                height: GLsizei,
                border: GLint,
                format: GLenum,
                ty: GLenum;
                pixels
            ) = TexImage2D / TexImage2DOffset;
            fn tex_sub_image_2d(
                target: GLenum,
                level: GLint,
                xoffset: GLint,
                yoffset: GLint,
                width: GLsizei,
                height: GLsizei,
                format: GLenum,
                ty: GLenum;
                pixels
            ) = TexSubImage2D / TexSubImage2DOffset;
            fn tex_image_3d(
                target: GLenum,
                level: GLint,
                internal_format: GLint,
                width: GLsizei,
                height: GLsizei,
                depth: GLsizei,
                border: GLint,
                format: GLenum,
                ty: GLenum;
                pixels
            ) = TexImage3D / TexImage3DOffset;
            fn tex_sub_image_3d(
                target: GLenum,
                level: GLint,
                xoffset: GLint,
                yoffset: GLint,
                zoffset: GLint,
                width: GLsizei,
                height: GLsizei,
                depth: GLsizei,
                format: GLenum,
                ty: GLenum;
                pixels
            ) = TexSubImage3D / TexSubImage3DOffset;
            fn compressed_tex_image_2d(
                target: GLenum,
                level: GLint,
                internal_format: GLenum,
                width: GLsizei,
                height: GLsizei,
                border: GLint,
                image_size: GLsizei;
                data
            ) = CompressedTexImage2D / CompressedTexImage2DOffset;
            fn compressed_tex_sub_image_2d(
                target: GLenum,
                level: GLint,
                xoffset: GLint,
                yoffset: GLint,
                width: GLsizei,
                height: GLsizei,
                format: GLenum,
                image_size: GLsizei;
                data
            ) = CompressedTexSubImage2D / CompressedTexSubImage2DOffset;
            fn compressed_tex_image_3d(
                target: GLenum,
                level: GLint,
                internal_format: GLenum,
                width: GLsizei,
                height: GLsizei,
                depth: GLsizei,
                border: GLint,
                image_size: GLsizei;
                data
            ) = CompressedTexImage3D / CompressedTexImage3DOffset;
            fn compressed_tex_sub_image_3d(
                target: GLenum,
                level: GLint,
                xoffset: GLint,
                yoffset: GLint,
                zoffset: GLint,
                width: GLsizei,
                height: GLsizei,
                depth: GLsizei,
                format: GLenum,
                image_size: GLsizei;
                data
            ) = CompressedTexSubImage3D / CompressedTexSubImage3DOffset;
        }
        gens {
            fn gen_textures = GenTextures;
        }
        provided {}
    }
}
