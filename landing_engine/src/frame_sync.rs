// Single-flight coalescing of scroll/resize work onto display refreshes.
// At most one recomputation is pending; bursts collapse into it.

/// Tracks whether a refresh callback is already scheduled.
#[derive(Debug, Default)]
pub struct FrameCoalescer {
    pending: bool,
    coalesced: u64,
}

impl FrameCoalescer {
    pub fn new() -> Self {
        FrameCoalescer::default()
    }

    /// Ask for a recomputation. Returns true if the caller must schedule the refresh callback.
    pub fn request(&mut self) -> bool {
        if self.pending {
            self.coalesced += 1;
            false
        } else {
            self.pending = true;
            true
        }
    }

    /// Request a recomputation and run `schedule` if one has to be queued.
    ///
    /// A failed `schedule` leaves nothing pending, so later requests can try again.
    pub fn schedule<H, E>(
        &mut self,
        schedule: impl FnOnce() -> Result<H, E>,
    ) -> Result<Option<H>, E> {
        if !self.request() {
            return Ok(None);
        }
        match schedule() {
            Ok(handle) => Ok(Some(handle)),
            Err(err) => {
                self.cancel();
                Err(err)
            }
        }
    }

    /// Called from the refresh callback. Returns true if work was pending.
    pub fn begin_frame(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Requests absorbed by an already pending refresh.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
