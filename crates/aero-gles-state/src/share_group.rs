//! Objects shared by every context of a share group.
//!
//! Each map sits behind its own reader/writer lock; lookups take the read lock and clone the
//! record handle, so a context never holds a map lock while it works on a record.

use std::sync::Arc;

use aero_gles_protocol::gl::{GLenum, GLuint};
use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::buffer::{BufferData, BufferRef};
use crate::names::NameTable;
use crate::program::{ProgramData, ProgramRef, ShaderData, ShaderRef};
use crate::renderbuffer::{RboProps, RboRef};
use crate::texture::{TextureRec, TextureRef};

/// Name tables for the object kinds a share group owns.
#[derive(Debug, Default)]
pub struct SharedNames {
    pub buffers: NameTable,
    pub textures: NameTable,
    pub renderbuffers: NameTable,
    pub samplers: NameTable,
}

#[derive(Debug, Default)]
pub struct ShareGroup {
    names: RwLock<SharedNames>,
    buffers: RwLock<HashMap<GLuint, BufferRef>>,
    textures: RwLock<HashMap<GLuint, TextureRef>>,
    renderbuffers: RwLock<HashMap<GLuint, RboRef>>,
    programs: RwLock<HashMap<GLuint, ProgramRef>>,
    shaders: RwLock<HashMap<GLuint, ShaderRef>>,
}

pub type ShareGroupRef = Arc<ShareGroup>;

fn get<V: Clone>(map: &RwLock<HashMap<GLuint, V>>, id: GLuint) -> Option<V> {
    map.read().get(&id).cloned()
}

fn get_or_insert<V: Clone>(
    map: &RwLock<HashMap<GLuint, V>>,
    id: GLuint,
    make: impl FnOnce() -> V,
) -> (V, bool) {
    if let Some(v) = get(map, id) {
        return (v, false);
    }
    let mut map = map.write();
    // Another context may have raced us between the two locks.
    if let Some(v) = map.get(&id) {
        return (v.clone(), false);
    }
    let v = make();
    map.insert(id, v.clone());
    (v, true)
}

impl ShareGroup {
    pub fn new() -> ShareGroupRef {
        Arc::new(Self::default())
    }

    pub fn names(&self) -> RwLockReadGuard<'_, SharedNames> {
        self.names.read()
    }

    pub fn names_mut(&self) -> RwLockWriteGuard<'_, SharedNames> {
        self.names.write()
    }

    pub fn buffer(&self, id: GLuint) -> Option<BufferRef> {
        get(&self.buffers, id)
    }

    pub fn buffer_or_insert(&self, id: GLuint) -> BufferRef {
        get_or_insert(&self.buffers, id, || {
            Arc::new(RwLock::new(BufferData::new()))
        })
        .0
    }

    pub fn remove_buffer(&self, id: GLuint) -> Option<BufferRef> {
        self.buffers.write().remove(&id)
    }

    pub fn texture(&self, id: GLuint) -> Option<TextureRef> {
        get(&self.textures, id)
    }

    /// Returns the record and whether this call created it.
    pub fn texture_or_insert(&self, id: GLuint) -> (TextureRef, bool) {
        get_or_insert(&self.textures, id, || {
            Arc::new(RwLock::new(TextureRec::new(id)))
        })
    }

    pub fn remove_texture(&self, id: GLuint) -> Option<TextureRef> {
        self.textures.write().remove(&id)
    }

    pub fn renderbuffer(&self, id: GLuint) -> Option<RboRef> {
        get(&self.renderbuffers, id)
    }

    pub fn renderbuffer_or_insert(&self, id: GLuint) -> (RboRef, bool) {
        get_or_insert(&self.renderbuffers, id, || {
            Arc::new(RwLock::new(RboProps::new(id)))
        })
    }

    pub fn remove_renderbuffer(&self, id: GLuint) -> Option<RboRef> {
        self.renderbuffers.write().remove(&id)
    }

    pub fn program(&self, id: GLuint) -> Option<ProgramRef> {
        get(&self.programs, id)
    }

    pub fn add_program(&self, id: GLuint) -> ProgramRef {
        get_or_insert(&self.programs, id, || {
            Arc::new(RwLock::new(ProgramData::new(id)))
        })
        .0
    }

    pub fn remove_program(&self, id: GLuint) -> Option<ProgramRef> {
        self.programs.write().remove(&id)
    }

    pub fn shader(&self, id: GLuint) -> Option<ShaderRef> {
        get(&self.shaders, id)
    }

    pub fn add_shader(&self, id: GLuint, ty: GLenum) -> ShaderRef {
        get_or_insert(&self.shaders, id, || {
            Arc::new(RwLock::new(ShaderData::new(id, ty)))
        })
        .0
    }

    pub fn remove_shader(&self, id: GLuint) -> Option<ShaderRef> {
        self.shaders.write().remove(&id)
    }

    pub fn is_program(&self, id: GLuint) -> bool {
        self.programs.read().contains_key(&id)
    }

    pub fn is_shader(&self, id: GLuint) -> bool {
        self.shaders.read().contains_key(&id)
    }

    pub fn is_shader_or_program(&self, id: GLuint) -> bool {
        self.is_program(id) || self.is_shader(id)
    }

    /// Records `shader` as attached to `program`. `false` when either record is missing or the
    /// shader is already attached.
    pub fn attach_shader(&self, program: GLuint, shader: GLuint) -> bool {
        let (Some(p), Some(s)) = (self.program(program), self.shader(shader)) else {
            return false;
        };
        let mut p = p.write();
        if p.shaders.contains(&shader) {
            return false;
        }
        p.shaders.push(shader);
        s.write().attached_to.push(program);
        true
    }

    /// `false` when `shader` is not attached to `program`.
    pub fn detach_shader(&self, program: GLuint, shader: GLuint) -> bool {
        let Some(p) = self.program(program) else {
            return false;
        };
        {
            let mut p = p.write();
            let Some(i) = p.shaders.iter().position(|&s| s == shader) else {
                return false;
            };
            p.shaders.remove(i);
        }
        self.unlink_shader(program, shader);
        true
    }

    /// Drops the program's claim on `shader` and releases a shader whose deletion was waiting
    /// on it.
    fn unlink_shader(&self, program: GLuint, shader: GLuint) {
        let Some(s) = self.shader(shader) else {
            return;
        };
        let release = {
            let mut s = s.write();
            s.attached_to.retain(|&p| p != program);
            s.delete_pending && s.attached_to.is_empty()
        };
        if release {
            self.remove_shader(shader);
        }
    }

    /// `glDeleteShader`: attached shaders linger until their last program lets go.
    pub fn delete_shader(&self, shader: GLuint) {
        let Some(s) = self.shader(shader) else {
            return;
        };
        let attached = {
            let mut s = s.write();
            s.delete_pending = true;
            !s.attached_to.is_empty()
        };
        if !attached {
            self.remove_shader(shader);
        }
    }

    /// `glDeleteProgram`: a program current in some context only gets flagged.
    pub fn delete_program(&self, program: GLuint, in_use: bool) {
        let Some(p) = self.program(program) else {
            return;
        };
        if in_use {
            p.write().delete_pending = true;
            return;
        }
        self.release_program(program);
    }

    /// Removes a program record and detaches its shaders.
    pub fn release_program(&self, program: GLuint) {
        let Some(p) = self.remove_program(program) else {
            return;
        };
        let shaders = std::mem::take(&mut p.write().shaders);
        for shader in shaders {
            self.unlink_shader(program, shader);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use aero_gles_protocol::gl::{GL_FRAGMENT_SHADER, GL_VERTEX_SHADER};

    use super::*;

    #[test]
    fn records_are_shared_across_threads() {
        let group = ShareGroup::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let group = Arc::clone(&group);
                thread::spawn(move || group.texture_or_insert(5).1)
            })
            .collect();
        let created = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&created| created)
            .count();
        assert_eq!(created, 1);

        let buf = group.buffer_or_insert(3);
        buf.write().respecify(8, None, 0);
        assert_eq!(group.buffer(3).unwrap().read().size, 8);
        assert!(group.remove_buffer(3).is_some());
        assert!(group.buffer(3).is_none());
    }

    #[test]
    fn deleted_shaders_wait_for_their_programs() {
        let group = ShareGroup::new();
        group.add_program(1);
        group.add_shader(2, GL_VERTEX_SHADER);
        assert!(group.attach_shader(1, 2));
        assert!(!group.attach_shader(1, 2));

        group.delete_shader(2);
        assert!(group.is_shader(2));
        assert!(group.detach_shader(1, 2));
        assert!(!group.is_shader(2));
        assert!(!group.detach_shader(1, 2));
    }

    #[test]
    fn releasing_a_program_frees_pending_shaders() {
        let group = ShareGroup::new();
        group.add_program(1);
        group.add_shader(2, GL_FRAGMENT_SHADER);
        group.attach_shader(1, 2);
        group.delete_shader(2);

        group.delete_program(1, true);
        assert!(group.is_program(1));
        assert!(group.program(1).unwrap().read().delete_pending);

        group.release_program(1);
        assert!(!group.is_program(1));
        assert!(!group.is_shader(2));
    }
}
