// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshforge Contributors

//! Quantized spatial index used for vertex welding.
//!
//! Positions are snapped to a grid of `threshold` cells and packed into a
//! 64-bit key (23 bits per axis). Vertices landing in the same cell are
//! candidates for reuse; an exact distance check against the threshold
//! decides. Each stored vertex remembers how many primitives reuse it so
//! attribute values can be blended as a running average.

use ahash::AHashMap;
use nalgebra::Point3;

/// Smallest usable welding threshold; smaller values would overflow the
/// 23-bit per-axis key range for typical scene extents.
pub const MIN_SHARE_THRESHOLD: f32 = 0.001;

#[derive(Debug, Clone)]
struct WeldEntry {
    index: u32,
    uses: u32,
}

/// Spatial hash from quantized positions to vertex indices
#[derive(Debug, Clone, Default)]
pub struct VertexWeld {
    threshold: f32,
    buckets: AHashMap<u64, Vec<WeldEntry>>,
}

fn pack_key(p: &Point3<f32>, threshold: f32) -> u64 {
    const MASK: i64 = (1 << 23) - 1;
    let qx = ((p.x / threshold) as i64) & MASK;
    let qy = ((p.y / threshold) as i64) & MASK;
    let qz = ((p.z / threshold) as i64) & MASK;
    (qx as u64) | ((qy as u64) << 24) | ((qz as u64) << 48)
}

impl VertexWeld {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.max(MIN_SHARE_THRESHOLD),
            buckets: AHashMap::new(),
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Change the welding threshold. Existing entries keep their old cells,
    /// so callers should clear and rebuild if an exact re-index is needed.
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold.max(MIN_SHARE_THRESHOLD);
    }

    /// Look up a vertex within `threshold` of `p`.
    /// On a hit the use count is bumped and `(index, uses)` returned,
    /// where `uses` is the count after this lookup.
    pub fn find_and_use(
        &mut self,
        p: &Point3<f32>,
        positions: &[Point3<f32>],
    ) -> Option<(u32, u32)> {
        let key = pack_key(p, self.threshold);
        let entries = self.buckets.get_mut(&key)?;
        for entry in entries.iter_mut() {
            let q = positions.get(entry.index as usize)?;
            if nalgebra::distance(p, q) <= self.threshold {
                entry.uses += 1;
                return Some((entry.index, entry.uses));
            }
        }
        None
    }

    /// Look up a vertex without touching use counts
    pub fn find(&self, p: &Point3<f32>, positions: &[Point3<f32>]) -> Option<u32> {
        let key = pack_key(p, self.threshold);
        let entries = self.buckets.get(&key)?;
        for entry in entries {
            let q = positions.get(entry.index as usize)?;
            if nalgebra::distance(p, q) <= self.threshold {
                return Some(entry.index);
            }
        }
        None
    }

    /// Register a freshly appended vertex with a use count of one
    pub fn insert(&mut self, p: &Point3<f32>, index: u32) {
        let key = pack_key(p, self.threshold);
        self.buckets
            .entry(key)
            .or_default()
            .push(WeldEntry { index, uses: 1 });
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Approximate heap usage in bytes
    pub fn memory(&self) -> usize {
        self.buckets.capacity() * (std::mem::size_of::<u64>() + std::mem::size_of::<Vec<WeldEntry>>())
            + self
                .buckets
                .values()
                .map(|v| v.capacity() * std::mem::size_of::<WeldEntry>())
                .sum::<usize>()
    }
}
