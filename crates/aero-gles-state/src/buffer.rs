use std::sync::Arc;

use aero_gles_protocol::gl::{
    GLbitfield, GLenum, GL_MAP_FLUSH_EXPLICIT_BIT, GL_MAP_INVALIDATE_BUFFER_BIT,
    GL_MAP_INVALIDATE_RANGE_BIT, GL_MAP_READ_BIT, GL_MAP_UNSYNCHRONIZED_BIT, GL_MAP_WRITE_BIT,
};
use bitflags::bitflags;
use parking_lot::RwLock;

use crate::error::{fail_if, GlError, GlResult};
use crate::index_range::{IndexRange, IndexRangeCache, IndexType};

bitflags! {
    /// `glMapBufferRange` access bits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MapAccess: GLbitfield {
        const READ = GL_MAP_READ_BIT;
        const WRITE = GL_MAP_WRITE_BIT;
        const INVALIDATE_RANGE = GL_MAP_INVALIDATE_RANGE_BIT;
        const INVALIDATE_BUFFER = GL_MAP_INVALIDATE_BUFFER_BIT;
        const FLUSH_EXPLICIT = GL_MAP_FLUSH_EXPLICIT_BIT;
        const UNSYNCHRONIZED = GL_MAP_UNSYNCHRONIZED_BIT;
    }
}

/// Shadow of one buffer object.
///
/// `data` mirrors the buffer contents as last written by the guest (or fetched by a read
/// mapping). Map fields are only meaningful while `mapped` is set.
#[derive(Debug, Default)]
pub struct BufferData {
    pub size: usize,
    /// `0` until the first `glBufferData`.
    pub usage: GLenum,
    pub mapped: bool,
    pub access: MapAccess,
    pub mapped_offset: usize,
    pub mapped_length: usize,
    /// Set when the host may have written the buffer (transform feedback, SSBO, pack PBO), so a
    /// read mapping has to fetch instead of trusting `data`.
    pub host_map_dirty: bool,
    data: Vec<u8>,
    index_ranges: IndexRangeCache,
}

pub type BufferRef = Arc<RwLock<BufferData>>;

impl BufferData {
    pub fn new() -> Self {
        Self::default()
    }

    /// `glBufferData`: reallocates the mirror and drops every cached index range.
    pub fn respecify(&mut self, size: usize, data: Option<&[u8]>, usage: GLenum) {
        self.size = size;
        self.usage = usage;
        self.data.clear();
        self.data.resize(size, 0);
        if let Some(src) = data {
            let n = src.len().min(size);
            self.data[..n].copy_from_slice(&src[..n]);
        }
        self.index_ranges.clear();
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn range(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        self.data.get(offset..end)
    }

    /// Mutable view of a sub-range. The caller is responsible for invalidating index ranges.
    pub fn range_mut(&mut self, offset: usize, len: usize) -> Option<&mut [u8]> {
        let end = offset.checked_add(len)?;
        self.data.get_mut(offset..end)
    }

    /// `glBufferSubData` on the mirror.
    pub fn update(&mut self, offset: usize, bytes: &[u8]) -> GlResult {
        let end = offset
            .checked_add(bytes.len())
            .ok_or(GlError::InvalidValue)?;
        fail_if(end > self.size, GlError::InvalidValue)?;
        self.data[offset..end].copy_from_slice(bytes);
        self.index_ranges.invalidate_range(offset, bytes.len());
        Ok(())
    }

    pub fn invalidate_index_ranges(&mut self, offset: usize, len: usize) {
        self.index_ranges.invalidate_range(offset, len);
    }

    pub fn cached_index_ranges(&self) -> usize {
        self.index_ranges.len()
    }

    /// Index range of `count` indices at byte `offset`, or `None` when they run past the end.
    pub fn index_range(
        &mut self,
        ty: IndexType,
        offset: usize,
        count: usize,
        primitive_restart: bool,
    ) -> Option<IndexRange> {
        let end = count.checked_mul(ty.size())?.checked_add(offset)?;
        if end > self.data.len() {
            return None;
        }
        Some(
            self.index_ranges
                .get_or_compute(&self.data, ty, offset, count, primitive_restart),
        )
    }

    pub fn begin_map(&mut self, access: MapAccess, offset: usize, length: usize) {
        debug_assert!(!self.mapped);
        self.mapped = true;
        self.access = access;
        self.mapped_offset = offset;
        self.mapped_length = length;
    }

    pub fn end_map(&mut self) {
        self.mapped = false;
        self.access = MapAccess::empty();
        self.mapped_offset = 0;
        self.mapped_length = 0;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn update_rejects_writes_past_the_end() {
        let mut b = BufferData::new();
        b.respecify(4, None, 0);
        assert_eq!(b.update(2, &[1, 2, 3]), Err(GlError::InvalidValue));
        assert_eq!(b.update(2, &[1, 2]), Ok(()));
        assert_eq!(b.bytes(), &[0, 0, 1, 2]);
    }

    #[test]
    fn index_range_is_none_when_out_of_bounds() {
        let mut b = BufferData::new();
        b.respecify(4, Some(&[3, 1, 2, 9]), 0);
        assert_eq!(
            b.index_range(IndexType::U8, 1, 3, false),
            Some(IndexRange { min: 1, max: 9 })
        );
        assert_eq!(b.index_range(IndexType::U16, 2, 2, false), None);
    }

    #[test]
    fn respecify_drops_cached_ranges() {
        let mut b = BufferData::new();
        b.respecify(2, Some(&[1, 2]), 0);
        b.index_range(IndexType::U8, 0, 2, false);
        assert_eq!(b.cached_index_ranges(), 1);
        b.respecify(2, Some(&[5, 6]), 0);
        assert_eq!(b.cached_index_ranges(), 0);
    }
}
