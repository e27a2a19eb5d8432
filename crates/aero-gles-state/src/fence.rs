use std::sync::Arc;

use aero_gles_protocol::gl::GLsync;
use hashbrown::HashSet;
use parking_lot::Mutex;

#[derive(Debug)]
struct FenceTable {
    next: u64,
    live: HashSet<GLsync>,
}

/// Process-wide registry of live fence sync handles.
///
/// Sync objects are visible to every context of the guest process, so the registry is owned by
/// whoever brings the context subsystem up and handed to each encoder as an `Arc`.
#[derive(Debug)]
pub struct FenceRegistry {
    table: Mutex<FenceTable>,
}

impl Default for FenceRegistry {
    fn default() -> Self {
        Self {
            table: Mutex::new(FenceTable {
                next: 1,
                live: HashSet::new(),
            }),
        }
    }
}

impl FenceRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Allocates a fresh non-zero handle.
    pub fn create(&self) -> GLsync {
        let mut table = self.table.lock();
        let sync = table.next;
        table.next = table.next.checked_add(1).unwrap_or(1);
        table.live.insert(sync);
        sync
    }

    pub fn contains(&self, sync: GLsync) -> bool {
        self.table.lock().live.contains(&sync)
    }

    pub fn remove(&self, sync: GLsync) -> bool {
        self.table.lock().live.remove(&sync)
    }

    pub fn len(&self) -> usize {
        self.table.lock().live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
