//! Flat slot storage addressed as a 2-D grid.
//!
//! # Layout
//! Slots live in one `Vec` of length `columns × rows`, partitioned into
//! `rows` contiguous blocks of `columns` slots. The slot for
//! `(activity a, window w)` sits at flat position `w × columns + a`.
//! [`SlotGrid::position`] is the only place that formula appears.
//!
//! Every structural operation ends with a full re-derivation of each
//! slot's `activity_index`/`window_index` from its flat position.
//!
//! # Preconditions
//! Structural methods are `pub(crate)` and trust their arguments;
//! [`MatrixStore`](super::MatrixStore) checks bounds and shapes first.

use serde::{Deserialize, Serialize};

use super::sequence::landing;
use crate::models::{Slot, SlotCoord};

/// Slots of the sign-up matrix, row-major by window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGrid {
    columns: usize,
    rows: usize,
    cells: Vec<Slot>,
}

impl SlotGrid {
    /// Creates an empty 0 × 0 grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of activity columns.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of window rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of slots (`columns × rows`).
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid holds no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat position of `coord`, or `None` if it lies outside the grid.
    #[inline]
    pub fn position(&self, coord: SlotCoord) -> Option<usize> {
        (coord.activity_index < self.columns && coord.window_index < self.rows)
            .then(|| coord.window_index * self.columns + coord.activity_index)
    }

    /// Slot at `coord`.
    pub fn get(&self, coord: SlotCoord) -> Option<&Slot> {
        self.position(coord).map(|p| &self.cells[p])
    }

    pub(crate) fn get_mut(&mut self, coord: SlotCoord) -> Option<&mut Slot> {
        self.position(coord).map(move |p| &mut self.cells[p])
    }

    /// All slots in flat order.
    pub fn as_slice(&self) -> &[Slot] {
        &self.cells
    }

    /// Iterates slots in flat order.
    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.cells.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Slot> {
        self.cells.iter_mut()
    }

    /// The block of one window: every activity's slot, in activity order.
    pub fn row(&self, window_index: usize) -> Option<&[Slot]> {
        (window_index < self.rows).then(|| {
            let start = window_index * self.columns;
            &self.cells[start..start + self.columns]
        })
    }

    /// Every window block in row order. Yields `rows` slices even when
    /// there are no columns.
    pub fn row_blocks(&self) -> impl Iterator<Item = &[Slot]> + '_ {
        (0..self.rows).map(move |w| {
            let start = w * self.columns;
            &self.cells[start..start + self.columns]
        })
    }

    /// One activity's slot in every window, in window order.
    pub fn column(&self, activity_index: usize) -> impl Iterator<Item = &Slot> + '_ {
        let (skip, rows) = if activity_index < self.columns {
            (activity_index, self.rows)
        } else {
            (0, 0)
        };
        self.cells
            .iter()
            .skip(skip)
            .step_by(self.columns.max(1))
            .take(rows)
    }

    /// Appends a column: slot `w` goes to the end of window `w`'s block.
    ///
    /// Requires `slots.len() == rows`.
    pub(crate) fn push_column(&mut self, slots: Vec<Slot>) {
        debug_assert_eq!(slots.len(), self.rows);
        let width = self.columns + 1;
        self.cells.reserve(slots.len());
        for (w, slot) in slots.into_iter().enumerate() {
            self.cells.insert((w + 1) * width - 1, slot);
        }
        self.columns = width;
        self.reindex();
    }

    /// Appends a row block at the end.
    ///
    /// Requires `slots.len() == columns`.
    pub(crate) fn push_row(&mut self, slots: Vec<Slot>) {
        debug_assert_eq!(slots.len(), self.columns);
        self.cells.extend(slots);
        self.rows += 1;
        self.reindex();
    }

    /// Moves column `from` toward `to` inside every block.
    pub(crate) fn move_column(&mut self, from: usize, to: usize) {
        let dest = landing(from, to);
        for w in 0..self.rows {
            let base = w * self.columns;
            let slot = self.cells.remove(base + from);
            self.cells.insert(base + dest, slot);
        }
        self.reindex();
    }

    /// Moves the whole block of window `from` toward `to`.
    pub(crate) fn move_row(&mut self, from: usize, to: usize) {
        let width = self.columns;
        let block: Vec<Slot> = self
            .cells
            .drain(from * width..(from + 1) * width)
            .collect();
        let dest = landing(from, to) * width;
        self.cells.splice(dest..dest, block);
        self.reindex();
    }

    /// Removes column `target`, returning its slots in window order.
    ///
    /// Blocks are walked from the last window to the first so earlier
    /// flat positions stay valid while removing.
    pub(crate) fn remove_column(&mut self, target: usize) -> Vec<Slot> {
        let mut removed = Vec::with_capacity(self.rows);
        for w in (0..self.rows).rev() {
            removed.push(self.cells.remove(w * self.columns + target));
        }
        removed.reverse();
        self.columns -= 1;
        self.reindex();
        removed
    }

    /// Removes the block of window `target`, returning it.
    pub(crate) fn remove_row(&mut self, target: usize) -> Vec<Slot> {
        let width = self.columns;
        let removed = self
            .cells
            .drain(target * width..(target + 1) * width)
            .collect();
        self.rows -= 1;
        self.reindex();
        removed
    }

    fn reindex(&mut self) {
        let width = self.columns;
        for (p, slot) in self.cells.iter_mut().enumerate() {
            slot.window_index = p / width;
            slot.activity_index = p % width;
        }
    }
}
