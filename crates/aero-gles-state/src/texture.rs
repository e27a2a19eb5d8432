use std::sync::Arc;

use aero_gles_protocol::gl::{
    cube_face_index, GLenum, GLint, GLuint, GL_NONE, GL_RGBA, GL_TEXTURE_3D, GL_TEXTURE_CUBE_MAP,
    GL_UNSIGNED_BYTE,
};
use parking_lot::RwLock;

/// Dimensions of one mip level of one face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelDims {
    pub width: GLint,
    pub height: GLint,
    pub depth: GLint,
}

impl LevelDims {
    pub const fn new(width: GLint, height: GLint, depth: GLint) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    fn next_mip(self, halve_depth: bool) -> Self {
        Self {
            width: (self.width >> 1).max(1),
            height: (self.height >> 1).max(1),
            depth: if halve_depth {
                (self.depth >> 1).max(1)
            } else {
                self.depth
            },
        }
    }
}

/// Which faces an image specification touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceSel {
    One(usize),
    All,
}

impl FaceSel {
    /// Cube map faces select themselves, `TEXTURE_CUBE_MAP` selects every face, and every other
    /// target lives in face 0.
    pub fn for_target(target: GLenum) -> Self {
        match cube_face_index(target) {
            Some(face) => Self::One(face),
            None if target == GL_TEXTURE_CUBE_MAP => Self::All,
            None => Self::One(0),
        }
    }

    fn faces(self) -> std::ops::Range<usize> {
        match self {
            Self::One(face) => face..face + 1,
            Self::All => 0..6,
        }
    }
}

/// Shadow of one texture object.
#[derive(Clone, Debug)]
pub struct TextureRec {
    pub id: GLuint,
    /// Target of the first bind. `GL_NONE` until then.
    pub target: GLenum,
    pub internal_format: GLenum,
    pub format: GLenum,
    pub ty: GLenum,
    pub immutable: bool,
    pub immutable_levels: GLint,
    pub samples: GLint,
    pub egl_image_backed: bool,
    pub has_storage: bool,
    /// Bumped on every storage or dimension change; framebuffer attachments compare against it.
    pub storage_generation: u64,
    faces: [Vec<Option<LevelDims>>; 6],
}

pub type TextureRef = Arc<RwLock<TextureRec>>;

impl TextureRec {
    pub fn new(id: GLuint) -> Self {
        Self {
            id,
            target: GL_NONE,
            internal_format: GL_NONE,
            format: GL_NONE,
            ty: GL_NONE,
            immutable: false,
            immutable_levels: 0,
            samples: 0,
            egl_image_backed: false,
            has_storage: false,
            storage_generation: 0,
            faces: Default::default(),
        }
    }

    pub fn level_dims(&self, face: usize, level: GLint) -> Option<LevelDims> {
        let level = usize::try_from(level).ok()?;
        self.faces.get(face)?.get(level).copied().flatten()
    }

    /// Dimensions of `level` as seen through `target` (a cube face target picks its face).
    pub fn dims(&self, target: GLenum, level: GLint) -> Option<LevelDims> {
        let face = match FaceSel::for_target(target) {
            FaceSel::One(face) => face,
            FaceSel::All => 0,
        };
        self.level_dims(face, level)
    }

    pub fn face_present(&self, face: usize) -> bool {
        self.faces[face].iter().any(Option::is_some)
    }

    fn set_one(&mut self, face: usize, level: usize, dims: LevelDims) {
        let levels = &mut self.faces[face];
        if levels.len() <= level {
            levels.resize(level + 1, None);
        }
        levels[level] = Some(dims);
    }

    fn touch(&mut self) {
        self.has_storage = true;
        self.storage_generation = self.storage_generation.wrapping_add(1);
    }

    /// Records one image specification (`TexImage*`, `CopyTexImage2D`, compressed images).
    pub fn set_level_dims(&mut self, target: GLenum, level: GLint, dims: LevelDims) {
        let Ok(level) = usize::try_from(level) else {
            return;
        };
        for face in FaceSel::for_target(target).faces() {
            self.set_one(face, level, dims);
        }
        self.touch();
    }

    /// Records a full mip chain starting at level 0: `levels` levels when given, otherwise down
    /// to 1x1.
    pub fn set_mip_chain(&mut self, target: GLenum, base: LevelDims, levels: Option<usize>) {
        let halve_depth = self.target == GL_TEXTURE_3D || target == GL_TEXTURE_3D;
        for face in FaceSel::for_target(target).faces() {
            self.faces[face].clear();
            let mut dims = base;
            let mut level = 0;
            loop {
                self.set_one(face, level, dims);
                level += 1;
                let done = match levels {
                    Some(n) => level >= n,
                    None => dims.width >> 1 == 0 && dims.height >> 1 == 0,
                };
                if done {
                    break;
                }
                dims = dims.next_mip(halve_depth);
            }
        }
        self.touch();
    }

    /// `TexStorage*`.
    pub fn set_storage(
        &mut self,
        target: GLenum,
        levels: GLint,
        internal_format: GLenum,
        base: LevelDims,
    ) {
        self.internal_format = internal_format;
        self.immutable = true;
        self.immutable_levels = levels;
        self.set_mip_chain(target, base, Some(usize::try_from(levels).unwrap_or(1)));
    }

    /// `EGLImageTargetTexture2DOES`: RGBA8 storage owned by the image.
    pub fn set_egl_image(&mut self, width: GLint, height: GLint) {
        self.egl_image_backed = true;
        self.internal_format = GL_RGBA;
        self.format = GL_RGBA;
        self.ty = GL_UNSIGNED_BYTE;
        self.samples = 0;
        for levels in &mut self.faces {
            levels.clear();
        }
        self.set_one(0, 0, LevelDims::new(width, height, 1));
        self.touch();
    }

    /// Mipmap-generation completeness.
    ///
    /// Only cube maps can be incomplete here: every face must exist with the same base level
    /// dimensions.
    pub fn is_complete(&self) -> bool {
        if self.immutable || !self.has_storage || self.target != GL_TEXTURE_CUBE_MAP {
            return true;
        }
        let base = self.faces[0].first().copied().flatten();
        match base {
            None => false,
            Some(base) => self
                .faces
                .iter()
                .all(|levels| levels.first().copied().flatten() == Some(base)),
        }
    }
}

#[cfg(test)]
mod tests {
    use aero_gles_protocol::gl::{
        GL_TEXTURE_2D, GL_TEXTURE_2D_ARRAY, GL_TEXTURE_CUBE_MAP_NEGATIVE_Y,
        GL_TEXTURE_CUBE_MAP_POSITIVE_X,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn full_mip_chain_stops_at_one_by_one() {
        let mut t = TextureRec::new(1);
        t.target = GL_TEXTURE_2D;
        t.set_mip_chain(GL_TEXTURE_2D, LevelDims::new(8, 2, 1), None);
        assert_eq!(t.level_dims(0, 1), Some(LevelDims::new(4, 1, 1)));
        assert_eq!(t.level_dims(0, 3), Some(LevelDims::new(1, 1, 1)));
        assert_eq!(t.level_dims(0, 4), None);
    }

    #[test]
    fn storage_records_only_the_requested_levels() {
        let mut t = TextureRec::new(1);
        t.target = GL_TEXTURE_2D_ARRAY;
        t.set_storage(GL_TEXTURE_2D_ARRAY, 2, 0x8058, LevelDims::new(16, 16, 4));
        assert!(t.immutable);
        assert_eq!(t.level_dims(0, 1), Some(LevelDims::new(8, 8, 4)));
        assert_eq!(t.level_dims(0, 2), None);
    }

    #[test]
    fn cube_completeness_needs_matching_faces() {
        let mut t = TextureRec::new(1);
        t.target = GL_TEXTURE_CUBE_MAP;
        t.set_level_dims(GL_TEXTURE_CUBE_MAP_POSITIVE_X, 0, LevelDims::new(4, 4, 1));
        assert!(!t.is_complete());
        for face in 0..6 {
            t.set_level_dims(GL_TEXTURE_CUBE_MAP_POSITIVE_X + face, 0, LevelDims::new(4, 4, 1));
        }
        assert!(t.is_complete());
        t.set_level_dims(GL_TEXTURE_CUBE_MAP_NEGATIVE_Y, 0, LevelDims::new(2, 2, 1));
        assert!(!t.is_complete());
    }

    #[test]
    fn every_dimension_change_bumps_the_generation() {
        let mut t = TextureRec::new(1);
        let g0 = t.storage_generation;
        t.set_level_dims(GL_TEXTURE_2D, 0, LevelDims::new(1, 1, 1));
        let g1 = t.storage_generation;
        t.set_egl_image(2, 2);
        assert!(g0 != g1 && g1 != t.storage_generation);
        assert_eq!(t.dims(GL_TEXTURE_2D, 0), Some(LevelDims::new(2, 2, 1)));
    }
}
