//! Horizontal paging over activity columns.
//!
//! The matrix may be arbitrarily wide, but only a fixed number of columns
//! fit on screen. One column of the viewport is reserved for the window
//! labels, so a viewport `width` shows `width - 1` activities.
//!
//! # Step
//! The scroll position `step` is 1-based. With `n` activities and
//! `k = width - 1` visible columns:
//! - if `n <= k`, there is one page and `step` is fixed at 1;
//! - otherwise `step` ranges over `1..=n - k + 1` and shows activities
//!   `step - 1 ..= step - 1 + (k - 1)`, sliding one column per step.
//!
//! An empty matrix (no activities, no windows) renders as a placeholder.
//!
//! Everything here is a pure query over a [`MatrixStore`].

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::matrix::MatrixStore;
use crate::models::{Activity, Slot, Window};

/// Viewport configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Total viewport columns, including the row-label column.
    pub width: usize,
}

impl Viewport {
    /// Default viewport width.
    pub const DEFAULT_WIDTH: usize = 5;

    /// Smallest usable width: one label column plus one activity column.
    pub const MIN_WIDTH: usize = 2;

    /// Creates a viewport, clamping `width` to at least [`Self::MIN_WIDTH`].
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(Self::MIN_WIDTH),
        }
    }

    /// Sets the width, clamped like [`Viewport::new`].
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(Self::MIN_WIDTH);
        self
    }

    /// Activity columns shown per page (`width - 1`).
    #[inline]
    pub fn columns_per_page(&self) -> usize {
        self.width.max(Self::MIN_WIDTH) - 1
    }

    /// Largest valid step for `num_activities` columns.
    pub fn max_step(&self, num_activities: usize) -> usize {
        let k = self.columns_per_page();
        if num_activities <= k {
            1
        } else {
            num_activities - k + 1
        }
    }

    /// Clamps a step into `1..=max_step`.
    pub fn clamp_step(&self, num_activities: usize, step: usize) -> usize {
        step.clamp(1, self.max_step(num_activities))
    }

    /// Page shown at `step` (clamped) for `num_activities` columns.
    pub fn page(&self, num_activities: usize, step: usize) -> Page {
        let max_step = self.max_step(num_activities);
        let step = step.clamp(1, max_step);
        let start = step - 1;
        let end = (start + self.columns_per_page()).min(num_activities);
        Page {
            step,
            max_step,
            columns: start..end,
        }
    }

    /// Layout of a whole store at `step`.
    pub fn layout(&self, num_activities: usize, num_windows: usize, step: usize) -> Layout {
        if num_activities == 0 && num_windows == 0 {
            Layout::Placeholder
        } else {
            Layout::Paged(self.page(num_activities, step))
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH)
    }
}

/// One page of activity columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Effective (clamped) step.
    pub step: usize,
    /// Largest valid step.
    pub max_step: usize,
    /// Visible activity indices (half-open).
    pub columns: Range<usize>,
}

impl Page {
    /// Whether more than one page exists.
    pub fn is_scrollable(&self) -> bool {
        self.max_step > 1
    }

    /// Whether activity `index` is visible.
    pub fn contains(&self, index: usize) -> bool {
        self.columns.contains(&index)
    }
}

/// What the matrix renders as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// Nothing to show yet.
    Placeholder,
    /// A page of columns.
    Paged(Page),
}

/// One visible row: a window and its slots in the visible columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow<'a> {
    pub window: &'a Window,
    pub slots: &'a [Slot],
}

/// The visible slice of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleSlice<'a> {
    pub page: Page,
    /// Visible activities, in column order.
    pub activities: &'a [Activity],
    /// Every window row, restricted to the visible columns.
    pub rows: Vec<VisibleRow<'a>>,
}

/// Computes the visible slice at `step`, or `None` for the placeholder.
pub fn visible_slice<'a>(
    store: &'a MatrixStore,
    viewport: &Viewport,
    step: usize,
) -> Option<VisibleSlice<'a>> {
    let page = match viewport.layout(store.num_activities(), store.num_windows(), step) {
        Layout::Placeholder => return None,
        Layout::Paged(page) => page,
    };
    let cols = page.columns.clone();
    let rows = store
        .windows()
        .iter()
        .zip(store.slots().row_blocks())
        .map(|(window, block)| VisibleRow {
            window,
            slots: &block[cols.clone()],
        })
        .collect();
    Some(VisibleSlice {
        activities: &store.activities()[cols],
        page,
        rows,
    })
}

/// Scroll position that stays valid as the store changes shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollState {
    step: usize,
}

impl ScrollState {
    /// Starts at step 1.
    pub fn new() -> Self {
        Self { step: 1 }
    }

    /// Current step.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Scrolls to `step`, clamped for `num_activities` columns.
    pub fn scroll_to(&mut self, viewport: &Viewport, num_activities: usize, step: usize) -> usize {
        self.step = viewport.clamp_step(num_activities, step);
        self.step
    }

    /// Re-clamps after activities were added or removed.
    pub fn sync(&mut self, viewport: &Viewport, num_activities: usize) -> usize {
        self.scroll_to(viewport, num_activities, self.step)
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}
