//! Ordered-sequence helpers shared by every positioned collection.
//!
//! # Move semantics
//! Standard list move: the element is removed from `from`, then inserted
//! at `to` if `from > to`, or at `to - 1` if `from < to` (the removal has
//! shifted everything after `from` left by one). Valid destinations are
//! `0..=len`.

use crate::error::{Axis, MatrixError};
use crate::models::{Activity, Detail, Window};

/// A value that records its own position in an ordered collection.
pub(crate) trait Positioned {
    fn set_position(&mut self, index: usize);
}

impl Positioned for Activity {
    fn set_position(&mut self, index: usize) {
        self.index = index;
    }
}

impl Positioned for Window {
    fn set_position(&mut self, index: usize) {
        self.index = index;
    }
}

impl Positioned for Detail {
    fn set_position(&mut self, index: usize) {
        self.index = index;
    }
}

/// Fails unless `index < len`.
pub(crate) fn check_index(axis: Axis, index: usize, len: usize) -> Result<(), MatrixError> {
    if index < len {
        Ok(())
    } else {
        Err(MatrixError::out_of_bounds(axis, index, len))
    }
}

/// Validates a move: `from < len`, `to <= len`.
pub(crate) fn check_move(axis: Axis, from: usize, to: usize, len: usize) -> Result<(), MatrixError> {
    check_index(axis, from, len)?;
    if to > len {
        return Err(MatrixError::out_of_bounds(axis, to, len));
    }
    Ok(())
}

/// Final position of an element moved from `from` toward `to`.
#[inline]
pub(crate) fn landing(from: usize, to: usize) -> usize {
    if from < to {
        to - 1
    } else {
        to
    }
}

/// Moves one element. Bounds must already be checked.
pub(crate) fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(landing(from, to), item);
}

/// Rewrites every element's position field from its actual position.
pub(crate) fn reindex<T: Positioned>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_position(index);
    }
}
