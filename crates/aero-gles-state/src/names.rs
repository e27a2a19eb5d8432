//! Sparse "is this name live" tables.

use aero_gles_protocol::gl::GLuint;
use hashbrown::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Buffer,
    Texture,
    Renderbuffer,
    Framebuffer,
    VertexArray,
    Query,
    TransformFeedback,
    Sampler,
    Sync,
}

/// GL distinguishes names that were never generated, names that were generated but never
/// bound (no object yet), and names that have an object behind them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameState {
    Unused,
    Used,
    UsedAndBound,
}

/// Name table for one object kind. Name `0` is never stored.
#[derive(Clone, Debug, Default)]
pub struct NameTable {
    // name -> has been bound at least once
    names: HashMap<GLuint, bool>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: GLuint) {
        if name != 0 {
            self.names.entry(name).or_insert(false);
        }
    }

    pub fn add_all(&mut self, names: &[GLuint]) {
        for &name in names {
            self.add(name);
        }
    }

    /// Marks `name` as bound, adding it if it was never generated.
    pub fn mark_bound(&mut self, name: GLuint) {
        if name != 0 {
            self.names.insert(name, true);
        }
    }

    pub fn remove(&mut self, name: GLuint) -> bool {
        self.names.remove(&name).is_some()
    }

    pub fn contains(&self, name: GLuint) -> bool {
        self.names.contains_key(&name)
    }

    pub fn state(&self, name: GLuint) -> NameState {
        match self.names.get(&name) {
            None => NameState::Unused,
            Some(false) => NameState::Used,
            Some(true) => NameState::UsedAndBound,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
