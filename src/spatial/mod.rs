//! Broad-phase grid for collision queries. Actors are re-inserted every
//! frame; bullets then probe their own cell plus the eight neighbors.

use glam::Vec2;

/// Spatial hash keyed on cell coordinates. Table size must be a power of
/// two; buckets are pre-allocated and kept across frames.
pub struct SpatialHash {
    inv_cell: f32,
    mask: usize,
    buckets: Vec<Vec<u32>>,
}

impl SpatialHash {
    /// `cell_size` should be at least the largest footprint being queried;
    /// `table_size` is rounded up to a power of two.
    pub fn new(cell_size: f32, table_size: usize) -> Self {
        let table = table_size.next_power_of_two();
        Self {
            inv_cell: 1.0 / cell_size,
            mask: table - 1,
            buckets: (0..table).map(|_| Vec::with_capacity(4)).collect(),
        }
    }

    /// Drop all entries, keeping bucket allocations.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    pub fn insert(&mut self, pos: Vec2, index: u32) {
        let (cx, cy) = self.cell(pos);
        let slot = self.slot(cx, cy);
        self.buckets[slot].push(index);
    }

    /// Visit every index stored in the 3x3 cell neighborhood of `pos`.
    /// Bucket collisions can surface an index more than once; callers that
    /// care must dedupe.
    pub fn query_neighbors(&self, pos: Vec2, mut visit: impl FnMut(u32)) {
        let (cx, cy) = self.cell(pos);
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                let slot = self.slot(cx.wrapping_add(dx), cy.wrapping_add(dy));
                for &index in &self.buckets[slot] {
                    visit(index);
                }
            }
        }
    }

    fn cell(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x * self.inv_cell).floor() as i32,
            (pos.y * self.inv_cell).floor() as i32,
        )
    }

    fn slot(&self, cx: i32, cy: i32) -> usize {
        let h = (cx as u32).wrapping_mul(73856093) ^ (cy as u32).wrapping_mul(19349663);
        h as usize & self.mask
    }
}
