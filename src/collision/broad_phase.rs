use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::math::Aabb;

/// Trait for broad-phase acceleration structures.
///
/// The index is rebuilt from scratch every step: `clear`, then one `insert`
/// per participating body, then any number of `retrieve` queries.
pub trait SpatialIndex<H> {
    /// Discards every inserted handle
    fn clear(&mut self);

    /// Registers `handle` under the footprint of `rect`
    fn insert(&mut self, handle: H, rect: &Aabb);

    /// Returns every handle whose footprint may overlap `rect`.
    ///
    /// False positives are allowed, false negatives are not. Each handle is
    /// returned at most once and the order is deterministic for a given
    /// sequence of inserts.
    fn retrieve(&self, rect: &Aabb) -> Vec<H>;

    /// Returns the number of inserted handles
    fn len(&self) -> usize;

    /// Returns whether nothing has been inserted since the last clear
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Simple brute-force index: every query scans every entry
pub struct BruteForceIndex<H> {
    entries: Vec<(H, Aabb)>,
}

impl<H> BruteForceIndex<H> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<H> Default for BruteForceIndex<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Copy + Eq + Hash> SpatialIndex<H> for BruteForceIndex<H> {
    fn clear(&mut self) {
        self.entries.clear();
    }

    fn insert(&mut self, handle: H, rect: &Aabb) {
        self.entries.push((handle, *rect));
    }

    fn retrieve(&self, rect: &Aabb) -> Vec<H> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|(handle, aabb)| aabb.intersects(rect) && seen.insert(*handle))
            .map(|(handle, _)| *handle)
            .collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Entries covering more cells than this go to the oversized list instead
const MAX_CELLS_PER_ENTRY: i64 = 64;

/// Uniform spatial hash grid over an unbounded plane
pub struct SpatialHashGrid<H> {
    /// The cell size (both dimensions)
    cell_size: f32,

    /// Cached `1.0 / cell_size`
    inv_cell_size: f32,

    /// Occupied cells, keyed by integer cell coordinates
    cells: HashMap<(i32, i32), Vec<usize>>,

    /// Every inserted handle with its footprint, in insertion order
    entries: Vec<(H, Aabb)>,

    /// Entries too large to bucket; checked by every query
    oversized: Vec<usize>,
}

impl<H> SpatialHashGrid<H> {
    /// Creates a new grid; non-positive or non-finite sizes fall back to 1.0
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 { cell_size } else { 1.0 };
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
            entries: Vec::new(),
            oversized: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Returns the number of occupied cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Gets the cell coordinate containing a scalar position
    #[inline]
    fn cell_coord(&self, value: f32) -> i32 {
        // `as` saturates, so far-away or non-finite values stay in range.
        (value * self.inv_cell_size).floor() as i32
    }

    /// Gets the inclusive range of cells covered by an AABB
    fn cell_range(&self, aabb: &Aabb) -> ((i32, i32), (i32, i32)) {
        (
            (self.cell_coord(aabb.min.x), self.cell_coord(aabb.min.y)),
            (self.cell_coord(aabb.max.x), self.cell_coord(aabb.max.y)),
        )
    }

    /// Number of cells in an inclusive range, saturating at `i64::MAX`.
    ///
    /// Each side spans at most 2^32 cells, so the product can exceed `i64`.
    fn cells_in_range(min: (i32, i32), max: (i32, i32)) -> i64 {
        let w = (max.0 as i64 - min.0 as i64 + 1).max(0);
        let h = (max.1 as i64 - min.1 as i64 + 1).max(0);
        w.saturating_mul(h)
    }
}

impl<H> Default for SpatialHashGrid<H> {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl<H: Copy + Eq + Hash> SpatialIndex<H> for SpatialHashGrid<H> {
    fn clear(&mut self) {
        self.cells.clear();
        self.entries.clear();
        self.oversized.clear();
    }

    fn insert(&mut self, handle: H, rect: &Aabb) {
        let index = self.entries.len();
        self.entries.push((handle, *rect));

        let (min, max) = self.cell_range(rect);
        if Self::cells_in_range(min, max) > MAX_CELLS_PER_ENTRY {
            self.oversized.push(index);
            return;
        }

        for x in min.0..=max.0 {
            for y in min.1..=max.1 {
                self.cells.entry((x, y)).or_default().push(index);
            }
        }
    }

    fn retrieve(&self, rect: &Aabb) -> Vec<H> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        let (min, max) = self.cell_range(rect);

        if Self::cells_in_range(min, max) > self.cells.len() as i64 {
            // Cheaper to walk the occupied cells than the query footprint.
            for (&(x, y), bucket) in &self.cells {
                if x >= min.0 && x <= max.0 && y >= min.1 && y <= max.1 {
                    seen.extend(bucket.iter().copied());
                }
            }
        } else {
            for x in min.0..=max.0 {
                for y in min.1..=max.1 {
                    if let Some(bucket) = self.cells.get(&(x, y)) {
                        seen.extend(bucket.iter().copied());
                    }
                }
            }
        }

        seen.extend(
            self.oversized
                .iter()
                .copied()
                .filter(|&index| self.entries[index].1.intersects(rect)),
        );

        // Entry order, not bucket order, keeps results deterministic.
        let mut indices: Vec<usize> = seen.into_iter().collect();
        indices.sort_unstable();

        let mut handles = HashSet::new();
        for index in indices {
            let (handle, _) = self.entries[index];
            if handles.insert(handle) {
                found.push(handle);
            }
        }

        found
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
