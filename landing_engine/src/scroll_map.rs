// Scroll-to-frame mapping for a pinned region.
// Pure functions of (offset, budget, frame count). No DOM, no state.

use serde::{Deserialize, Serialize};

use crate::types::FrameIndex;

/// Fraction of the budget traversed, clamped to [0, 1].
/// A non-positive budget is treated as a step: complete as soon as the offset is positive.
pub fn scroll_progress(offset: f64, budget: f64) -> f64 {
    if offset.is_nan() {
        return 0.0;
    }
    if budget <= 0.0 || budget.is_nan() {
        return if offset > 0.0 { 1.0 } else { 0.0 };
    }
    (offset / budget).clamp(0.0, 1.0)
}

/// Nearest frame for a progress value, in [0, frame_count - 1].
pub fn frame_for_progress(progress: f64, frame_count: u32) -> FrameIndex {
    let last = frame_count.saturating_sub(1);
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let index = (progress * last as f64).round() as u32;
    FrameIndex::new(index.min(last))
}

/// Frame shown at `offset` pixels into a pinned region of `budget` pixels.
pub fn frame_for_offset(offset: f64, budget: f64, frame_count: u32) -> FrameIndex {
    frame_for_progress(scroll_progress(offset, budget), frame_count)
}

/// Where the viewport is relative to a pinned region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinPhase {
    /// Region top is still below the viewport top.
    Before,
    /// Region is held at the viewport top; scroll drives the animation.
    Pinned,
    /// Budget used up; the region scrolls away normally.
    After,
}

/// How the pinned container is laid out for the current scroll position.
///
/// The container sits inside a spacer whose height is the container height plus the budget,
/// so the document never changes length while the container leaves the flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum PinLayout {
    /// At the top of its spacer, in normal flow.
    InFlow,
    /// Fixed to the viewport top.
    Fixed,
    /// In flow at the bottom of its spacer, shifted down by the whole budget.
    Released { shift: f64 },
}

/// A region pinned at the viewport top for `budget` pixels of scroll, starting when its top
/// (in document coordinates) reaches the top of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinnedRegion {
    start: f64,
    budget: f64,
}

impl PinnedRegion {
    pub fn new(start: f64, budget: f64) -> Self {
        PinnedRegion {
            start,
            budget: budget.max(0.0),
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.start + self.budget
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    /// Scroll consumed inside the region, clamped to [0, budget].
    pub fn offset(&self, scroll_y: f64) -> f64 {
        (scroll_y - self.start).clamp(0.0, self.budget)
    }

    pub fn phase(&self, scroll_y: f64) -> PinPhase {
        if scroll_y < self.start {
            PinPhase::Before
        } else if scroll_y < self.end() {
            PinPhase::Pinned
        } else {
            PinPhase::After
        }
    }

    pub fn progress(&self, scroll_y: f64) -> f64 {
        scroll_progress(self.offset(scroll_y), self.budget)
    }

    pub fn layout(&self, scroll_y: f64) -> PinLayout {
        match self.phase(scroll_y) {
            PinPhase::Before => PinLayout::InFlow,
            PinPhase::Pinned => PinLayout::Fixed,
            PinPhase::After => PinLayout::Released {
                shift: self.budget,
            },
        }
    }
}
