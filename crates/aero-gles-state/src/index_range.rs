//! Index-buffer scanning and the per-buffer `(min, max)` cache used by indexed draws.

use aero_gles_protocol::gl::{GLenum, GL_UNSIGNED_BYTE, GL_UNSIGNED_INT, GL_UNSIGNED_SHORT};
use hashbrown::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexType {
    U8,
    U16,
    U32,
}

impl IndexType {
    pub fn from_gl(ty: GLenum) -> Option<Self> {
        match ty {
            GL_UNSIGNED_BYTE => Some(Self::U8),
            GL_UNSIGNED_SHORT => Some(Self::U16),
            GL_UNSIGNED_INT => Some(Self::U32),
            _ => None,
        }
    }

    pub const fn size(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// The fixed restart index for `GL_PRIMITIVE_RESTART_FIXED_INDEX`.
    pub const fn restart_value(self) -> u32 {
        match self {
            Self::U8 => 0xFF,
            Self::U16 => 0xFFFF,
            Self::U32 => 0xFFFF_FFFF,
        }
    }

    fn read(self, bytes: &[u8], i: usize) -> u32 {
        match self {
            Self::U8 => u32::from(bytes[i]),
            Self::U16 => u32::from(u16::from_le_bytes([bytes[2 * i], bytes[2 * i + 1]])),
            Self::U32 => u32::from_le_bytes([
                bytes[4 * i],
                bytes[4 * i + 1],
                bytes[4 * i + 2],
                bytes[4 * i + 3],
            ]),
        }
    }

    fn write(self, bytes: &mut [u8], i: usize, v: u32) {
        match self {
            Self::U8 => bytes[i] = v as u8,
            Self::U16 => bytes[2 * i..2 * i + 2].copy_from_slice(&(v as u16).to_le_bytes()),
            Self::U32 => bytes[4 * i..4 * i + 4].copy_from_slice(&v.to_le_bytes()),
        }
    }
}

/// Inclusive range of referenced vertex indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndexRange {
    pub min: u32,
    pub max: u32,
}

impl IndexRange {
    /// Number of vertices in `[min, max]`.
    pub fn vertex_count(&self) -> usize {
        (self.max - self.min) as usize + 1
    }
}

/// Scans the first `count` indices of `bytes`.
///
/// With `primitive_restart` the type's restart value is skipped. A scan that sees no usable
/// index yields `0..=0`.
pub fn calc_index_range(
    ty: IndexType,
    bytes: &[u8],
    count: usize,
    primitive_restart: bool,
) -> IndexRange {
    debug_assert!(bytes.len() >= count * ty.size());
    let restart = ty.restart_value();
    let mut min = u32::MAX;
    let mut max = 0u32;
    let mut seen = false;
    for i in 0..count {
        let v = ty.read(bytes, i);
        if primitive_restart && v == restart {
            continue;
        }
        seen = true;
        min = min.min(v);
        max = max.max(v);
    }
    if seen {
        IndexRange { min, max }
    } else {
        IndexRange::default()
    }
}

/// Rebases indices so that `min` becomes `0`, leaving restart values untouched.
pub fn recenter_indices(
    ty: IndexType,
    bytes: &mut [u8],
    count: usize,
    min: u32,
    primitive_restart: bool,
) {
    if min == 0 {
        return;
    }
    let restart = ty.restart_value();
    for i in 0..count {
        let v = ty.read(bytes, i);
        if primitive_restart && v == restart {
            continue;
        }
        ty.write(bytes, i, v - min);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct IndexRangeKey {
    ty: IndexType,
    offset: usize,
    count: usize,
    primitive_restart: bool,
}

impl IndexRangeKey {
    fn byte_len(&self) -> usize {
        self.count * self.ty.size()
    }

    fn overlaps(&self, offset: usize, size: usize) -> bool {
        let len = self.byte_len();
        len != 0 && size != 0 && self.offset < offset + size && offset < self.offset + len
    }
}

/// Per-buffer cache of index ranges keyed by `(type, byte offset, count, restart)`.
#[derive(Clone, Debug, Default)]
pub struct IndexRangeCache {
    entries: HashMap<IndexRangeKey, IndexRange>,
}

impl IndexRangeCache {
    pub fn get(
        &self,
        ty: IndexType,
        offset: usize,
        count: usize,
        primitive_restart: bool,
    ) -> Option<IndexRange> {
        self.entries
            .get(&IndexRangeKey {
                ty,
                offset,
                count,
                primitive_restart,
            })
            .copied()
    }

    pub fn insert(
        &mut self,
        ty: IndexType,
        offset: usize,
        count: usize,
        primitive_restart: bool,
        range: IndexRange,
    ) {
        self.entries.insert(
            IndexRangeKey {
                ty,
                offset,
                count,
                primitive_restart,
            },
            range,
        );
    }

    /// Looks up or scans `data[offset..]`. The caller guarantees the range is in bounds.
    pub fn get_or_compute(
        &mut self,
        data: &[u8],
        ty: IndexType,
        offset: usize,
        count: usize,
        primitive_restart: bool,
    ) -> IndexRange {
        if let Some(range) = self.get(ty, offset, count, primitive_restart) {
            return range;
        }
        let range = calc_index_range(ty, &data[offset..], count, primitive_restart);
        self.insert(ty, offset, count, primitive_restart, range);
        range
    }

    /// Drops every entry whose bytes overlap `[offset, offset + size)`.
    pub fn invalidate_range(&mut self, offset: usize, size: usize) {
        self.entries.retain(|key, _| !key.overlaps(offset, size));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn u16_bytes(values: &[u16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn restart_values_are_excluded_only_with_restart_enabled() {
        let bytes = u16_bytes(&[4, 0xFFFF, 2, 9]);
        assert_eq!(
            calc_index_range(IndexType::U16, &bytes, 4, true),
            IndexRange { min: 2, max: 9 }
        );
        assert_eq!(
            calc_index_range(IndexType::U16, &bytes, 4, false),
            IndexRange { min: 2, max: 0xFFFF }
        );
    }

    #[test]
    fn recentering_keeps_restart_markers() {
        let mut bytes = vec![5u8, 0xFF, 7, 6];
        recenter_indices(IndexType::U8, &mut bytes, 4, 5, true);
        assert_eq!(bytes, vec![0, 0xFF, 2, 1]);
    }

    #[test]
    fn invalidation_drops_exactly_the_overlapping_entries() {
        let data = u16_bytes(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let mut cache = IndexRangeCache::default();
        // bytes [0, 4), [4, 8), [8, 16)
        cache.get_or_compute(&data, IndexType::U16, 0, 2, false);
        cache.get_or_compute(&data, IndexType::U16, 4, 2, false);
        cache.get_or_compute(&data, IndexType::U16, 8, 4, false);
        assert_eq!(cache.len(), 3);

        // Touches only the second entry's last byte.
        cache.invalidate_range(7, 1);
        assert_eq!(cache.len(), 2);
        assert!(cache.get(IndexType::U16, 0, 2, false).is_some());
        assert!(cache.get(IndexType::U16, 4, 2, false).is_none());
        assert!(cache.get(IndexType::U16, 8, 4, false).is_some());

        // Adjacent writes do not overlap.
        cache.invalidate_range(4, 4);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn cached_ranges_match_fresh_scans_after_rewrites() {
        let mut data = u16_bytes(&[10, 11, 12, 13]);
        let mut cache = IndexRangeCache::default();
        let first = cache.get_or_compute(&data, IndexType::U16, 0, 4, false);
        assert_eq!(first, IndexRange { min: 10, max: 13 });

        data[2..4].copy_from_slice(&1u16.to_le_bytes());
        cache.invalidate_range(2, 2);
        let second = cache.get_or_compute(&data, IndexType::U16, 0, 4, false);
        assert_eq!(second, calc_index_range(IndexType::U16, &data, 4, false));
        assert_eq!(second, IndexRange { min: 1, max: 13 });
    }
}
