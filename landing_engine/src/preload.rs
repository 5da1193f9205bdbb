// Frame load gate: all frames must load before playback, the first failure wins.
// Owned by one player instance; nothing here is shared between players.

use tracing::{trace, warn};

use crate::assets::FrameAddressing;
use crate::error::EngineError;
use crate::types::{FrameIndex, LoadState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameSlot {
    Pending,
    Loaded,
    Failed,
}

/// Outcome of feeding one load notification into the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    /// A frame loaded; the set is not complete yet.
    Progress { loaded: u32, total: u32 },
    /// The last outstanding frame loaded and nothing failed.
    Ready,
    /// First failure. The gate is now permanently in the error state.
    Failed(EngineError),
    /// Duplicate, out-of-range, or post-failure notification. No visible change.
    Ignored,
}

/// Tracks the load state of every frame in a set.
#[derive(Debug, Clone)]
pub struct FrameLoadGate {
    addressing: FrameAddressing,
    slots: Vec<FrameSlot>,
    loaded: u32,
    first_error: Option<EngineError>,
    failures: Vec<FrameIndex>,
}

impl FrameLoadGate {
    pub fn new(frame_count: u32, addressing: FrameAddressing) -> Self {
        FrameLoadGate {
            addressing,
            slots: vec![FrameSlot::Pending; frame_count as usize],
            loaded: 0,
            first_error: None,
            failures: Vec::new(),
        }
    }

    pub fn total(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Record a successful load.
    pub fn mark_loaded(&mut self, index: FrameIndex) -> LoadEvent {
        match self.slots.get_mut(index.as_usize()) {
            Some(slot @ FrameSlot::Pending) => *slot = FrameSlot::Loaded,
            _ => {
                trace!(index = index.as_u32(), "ignoring load notification");
                return LoadEvent::Ignored;
            }
        }
        self.loaded += 1;

        if self.first_error.is_some() {
            LoadEvent::Ignored
        } else if self.loaded == self.total() {
            LoadEvent::Ready
        } else {
            LoadEvent::Progress {
                loaded: self.loaded,
                total: self.total(),
            }
        }
    }

    /// Record a failed load. Only the first failure is reported; the rest are kept and logged.
    pub fn mark_failed(&mut self, index: FrameIndex) -> LoadEvent {
        match self.slots.get_mut(index.as_usize()) {
            Some(slot @ FrameSlot::Pending) => *slot = FrameSlot::Failed,
            _ => return LoadEvent::Ignored,
        }
        self.failures.push(index);

        let frame_number = self.addressing.frame_number(index);
        if self.first_error.is_some() {
            warn!(
                frame_number,
                src = %self.addressing.frame_src(index),
                "additional frame failed to load"
            );
            return LoadEvent::Ignored;
        }

        let err = EngineError::FrameLoad {
            frame_number,
            path_prefix: self.addressing.path_prefix().to_string(),
        };
        warn!(%err, "frame set failed to load");
        self.first_error = Some(err.clone());
        LoadEvent::Failed(err)
    }

    pub fn state(&self) -> LoadState {
        match &self.first_error {
            Some(err) => LoadState::Error {
                message: err.to_string(),
            },
            None if self.loaded == self.total() => LoadState::Ready,
            None => LoadState::Loading,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state().is_ready()
    }

    /// True if the frame's image data finished loading.
    pub fn is_loaded(&self, index: FrameIndex) -> bool {
        matches!(self.slots.get(index.as_usize()), Some(FrameSlot::Loaded))
    }

    /// Every failed frame, in the order failures arrived.
    pub fn failures(&self) -> &[FrameIndex] {
        &self.failures
    }

    /// Fraction of frames loaded so far.
    pub fn progress(&self) -> f64 {
        if self.slots.is_empty() {
            return 0.0;
        }
        self.loaded as f64 / self.total() as f64
    }
}
