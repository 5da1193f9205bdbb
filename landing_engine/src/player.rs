// Frame sequence player: scroll position in a pinned region -> frame on a fixed-size surface.
// Owns its load gate and frame metadata; one instance per mounted player.

use serde::{Deserialize, Serialize};
use tracing::debug;
use wasm_bindgen::prelude::*;

use crate::assets::FrameAddressing;
use crate::caption::{CaptionReveal, CaptionStyle};
use crate::error::EngineError;
use crate::preload::{FrameLoadGate, LoadEvent};
use crate::render::{DrawCommand, FramePainter};
use crate::scroll_map::{frame_for_progress, PinLayout, PinPhase, PinnedRegion};
use crate::types::{FrameIndex, LoadState, PixelSize, PlayerConfig};

/// Scroll geometry read from the browser on one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollSample {
    /// Document scroll position (`window.scrollY`).
    pub scroll_y: f64,
    /// Top of the pin spacer in document coordinates. The spacer never moves while pinned.
    pub region_top: f64,
    pub viewport_height: f64,
}

/// Everything the DOM layer needs to apply after one scroll recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameUpdate {
    pub frame: FrameIndex,
    pub phase: PinPhase,
    pub progress: f64,
    /// Scroll consumed inside the pinned region.
    pub pin_offset: f64,
    /// Extra scroll room reserved below the container.
    pub pin_spacing: f64,
    pub layout: PinLayout,
    /// Present only when the frame index changed since the last draw.
    pub draw: Option<DrawCommand>,
    pub caption: CaptionStyle,
}

pub struct FrameSequencePlayer {
    config: PlayerConfig,
    frame_count: u32,
    addressing: FrameAddressing,
    gate: FrameLoadGate,
    painter: FramePainter,
    caption: CaptionReveal,
    frame_sizes: Vec<Option<PixelSize>>,
    last_drawn: Option<FrameIndex>,
    active: bool,
}

impl FrameSequencePlayer {
    /// Validate `config` and prepare an empty frame set. No loads are started here.
    pub fn new(config: PlayerConfig) -> Result<Self, EngineError> {
        let frame_count = config.validate()?;
        let addressing = FrameAddressing::from_config(&config);
        let gate = FrameLoadGate::new(frame_count, addressing.clone());
        let painter = FramePainter::new(
            config.canvas_size(),
            config.crop_inset,
            config.placeholder_fill.clone(),
        );
        let caption = CaptionReveal::new(config.caption_reveal_start);

        Ok(FrameSequencePlayer {
            frame_count,
            addressing,
            gate,
            painter,
            caption,
            frame_sizes: vec![None; frame_count as usize],
            last_drawn: None,
            active: true,
            config,
        })
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Address of every frame, in playback order.
    pub fn frame_sources(&self) -> Vec<String> {
        self.addressing.sources(self.frame_count)
    }

    pub fn frame_src(&self, index: FrameIndex) -> String {
        self.addressing.frame_src(index)
    }

    pub fn load_state(&self) -> LoadState {
        self.gate.state()
    }

    pub fn is_ready(&self) -> bool {
        self.active && self.gate.is_ready()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Failed frames, first failure first.
    pub fn failures(&self) -> &[FrameIndex] {
        self.gate.failures()
    }

    /// What to paint while the set is not ready.
    pub fn placeholder(&self) -> DrawCommand {
        self.painter.placeholder()
    }

    /// Placeholder naming the frame, for image data that turned out not to be decodable.
    pub fn loading_placeholder(&self, index: FrameIndex) -> DrawCommand {
        self.painter
            .plan(index, None, self.addressing.frame_number(index))
    }

    /// Record a decoded frame. Returns the first frame's draw command when this completes the set.
    pub fn frame_loaded(&mut self, index: FrameIndex, natural: PixelSize) -> Option<DrawCommand> {
        if !self.active {
            return None;
        }
        if let Some(size) = self.frame_sizes.get_mut(index.as_usize()) {
            *size = Some(natural);
        }

        match self.gate.mark_loaded(index) {
            LoadEvent::Ready => {
                debug!(frames = self.frame_count, "frame set ready");
                let first = FrameIndex::new(0);
                self.last_drawn = Some(first);
                Some(self.plan(first))
            }
            _ => None,
        }
    }

    /// Record a failed frame. Returns the error only for the first failure.
    pub fn frame_failed(&mut self, index: FrameIndex) -> Option<EngineError> {
        if !self.active {
            return None;
        }
        match self.gate.mark_failed(index) {
            LoadEvent::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Recompute from the current scroll geometry. `None` until ready and after teardown.
    pub fn update(&mut self, sample: ScrollSample) -> Option<FrameUpdate> {
        if !self.is_ready() {
            return None;
        }

        let budget = self.config.scroll_budget.resolve(sample.viewport_height);
        let region = PinnedRegion::new(sample.region_top, budget);
        let progress = region.progress(sample.scroll_y);
        let frame = frame_for_progress(progress, self.frame_count);

        let draw = if self.last_drawn == Some(frame) {
            None
        } else {
            self.last_drawn = Some(frame);
            Some(self.plan(frame))
        };

        Some(FrameUpdate {
            frame,
            phase: region.phase(sample.scroll_y),
            progress,
            pin_offset: region.offset(sample.scroll_y),
            pin_spacing: region.budget(),
            layout: region.layout(sample.scroll_y),
            draw,
            caption: self.caption.style_at(progress),
        })
    }

    /// Stop reacting to loads and scroll. Late notifications are ignored afterwards.
    pub fn teardown(&mut self) {
        if self.active {
            debug!("frame player torn down");
        }
        self.active = false;
        self.last_drawn = None;
    }

    fn plan(&self, index: FrameIndex) -> DrawCommand {
        let natural = if self.gate.is_loaded(index) {
            self.frame_sizes.get(index.as_usize()).copied().flatten()
        } else {
            None
        };
        self.painter
            .plan(index, natural, self.addressing.frame_number(index))
    }
}

// =============================================================================
// WASM Bindings
// =============================================================================

/// WASM-exposed player for hosts that do their own DOM plumbing.
///
/// # Example JSON Config
/// ```json
/// {
///   "frame_count": 210,
///   "frame_path_prefix": "/frames/",
///   "frame_file_extension": "png",
///   "canvas_width": 1158,
///   "canvas_height": 770,
///   "scroll_budget": "200%"
/// }
/// ```
#[wasm_bindgen]
pub struct WasmFrameSequencePlayer {
    inner: FrameSequencePlayer,
}

#[wasm_bindgen]
impl WasmFrameSequencePlayer {
    /// Create a player from JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmFrameSequencePlayer, JsValue> {
        let config: PlayerConfig = serde_json::from_str(config_json).map_err(EngineError::from)?;
        Ok(WasmFrameSequencePlayer {
            inner: FrameSequencePlayer::new(config)?,
        })
    }

    /// JSON array of frame addresses in playback order.
    pub fn frame_sources(&self) -> Result<String, JsValue> {
        Ok(to_json(&self.inner.frame_sources())?)
    }

    /// Report a decoded frame. Returns a JSON draw command or `null`.
    pub fn frame_loaded(&mut self, index: u32, width: u32, height: u32) -> Result<String, JsValue> {
        let draw = self
            .inner
            .frame_loaded(FrameIndex::new(index), PixelSize::new(width, height));
        Ok(to_json(&draw)?)
    }

    /// Report a failed frame. Returns the user-visible message for the first failure only.
    pub fn frame_failed(&mut self, index: u32) -> Option<String> {
        self.inner
            .frame_failed(FrameIndex::new(index))
            .map(|err| err.to_string())
    }

    /// Recompute for the current scroll geometry. Returns a JSON update or `null`.
    pub fn update(
        &mut self,
        scroll_y: f64,
        region_top: f64,
        viewport_height: f64,
    ) -> Result<String, JsValue> {
        let update = self.inner.update(ScrollSample {
            scroll_y,
            region_top,
            viewport_height,
        });
        Ok(to_json(&update)?)
    }

    /// JSON load state: `{"state":"loading"}`, `{"state":"ready"}`, or an error with message.
    pub fn load_state(&self) -> Result<String, JsValue> {
        Ok(to_json(&self.inner.load_state())?)
    }

    pub fn teardown(&mut self) {
        self.inner.teardown();
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, EngineError> {
    Ok(serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScrollBudget;

    fn config(frame_count: i64) -> PlayerConfig {
        PlayerConfig {
            frame_count,
            frame_path_prefix: "/frames/".to_string(),
            frame_file_extension: "png".to_string(),
            frame_number_offset: 48,
            canvas_width: 1158,
            canvas_height: 770,
            scroll_budget: ScrollBudget::ViewportPercent(200.0),
            crop_inset: 2,
            caption_reveal_start: 0.85,
            placeholder_fill: "#e9e9e9".to_string(),
        }
    }

    fn ready_player(frame_count: i64) -> FrameSequencePlayer {
        let mut player = FrameSequencePlayer::new(config(frame_count)).unwrap();
        for i in 0..frame_count as u32 {
            player.frame_loaded(FrameIndex::new(i), PixelSize::new(1162, 774));
        }
        player
    }

    fn sample(scroll_y: f64) -> ScrollSample {
        ScrollSample {
            scroll_y,
            region_top: 0.0,
            viewport_height: 500.0,
        }
    }

    #[test]
    fn rejects_non_positive_frame_count() {
        assert!(matches!(
            FrameSequencePlayer::new(config(0)),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(FrameSequencePlayer::new(config(-1)).is_err());
    }

    #[test]
    fn sources_follow_offset_numbering() {
        let player = FrameSequencePlayer::new(config(3)).unwrap();
        assert_eq!(
            player.frame_sources(),
            vec!["/frames/48.png", "/frames/49.png", "/frames/50.png"]
        );
    }

    #[test]
    fn first_frame_drawn_when_set_completes() {
        let mut player = FrameSequencePlayer::new(config(2)).unwrap();
        assert!(player
            .frame_loaded(FrameIndex::new(1), PixelSize::new(10, 10))
            .is_none());
        let draw = player.frame_loaded(FrameIndex::new(0), PixelSize::new(10, 10));
        assert!(matches!(
            draw,
            Some(DrawCommand::Frame { index, .. }) if index == FrameIndex::new(0)
        ));
        assert_eq!(player.load_state(), LoadState::Ready);
    }

    #[test]
    fn no_updates_before_ready() {
        let mut player = FrameSequencePlayer::new(config(5)).unwrap();
        assert!(player.update(sample(100.0)).is_none());
        assert!(matches!(
            player.placeholder(),
            DrawCommand::Placeholder { status: None, .. }
        ));
    }

    #[test]
    fn frame_failure_blocks_playback() {
        let mut player = FrameSequencePlayer::new(config(10)).unwrap();
        let mut errors = Vec::new();
        for i in 0..10 {
            if i == 5 {
                errors.extend(player.frame_failed(FrameIndex::new(i)));
            } else {
                player.frame_loaded(FrameIndex::new(i), PixelSize::new(10, 10));
            }
        }
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "Failed to load frame 53. Check console & path: /frames/"
        );
        assert!(!player.is_ready());
        assert!(player.update(sample(300.0)).is_none());
    }

    #[test]
    fn redraws_only_on_frame_change() {
        let mut player = ready_player(11);
        // Budget 1000px, one frame per 100px. Frame 0 was drawn on ready.
        let update = player.update(sample(10.0)).unwrap();
        assert_eq!(update.frame, FrameIndex::new(0));
        assert!(update.draw.is_none());

        let update = player.update(sample(120.0)).unwrap();
        assert_eq!(update.frame, FrameIndex::new(1));
        assert!(update.draw.is_some());

        let update = player.update(sample(130.0)).unwrap();
        assert!(update.draw.is_none());
    }

    #[test]
    fn pin_geometry_follows_region() {
        let mut player = ready_player(11);
        let before = player
            .update(ScrollSample {
                scroll_y: 100.0,
                region_top: 400.0,
                viewport_height: 500.0,
            })
            .unwrap();
        assert_eq!(before.phase, PinPhase::Before);
        assert_eq!(before.pin_offset, 0.0);
        assert_eq!(before.pin_spacing, 1000.0);
        assert_eq!(before.layout, PinLayout::InFlow);

        let pinned = player
            .update(ScrollSample {
                scroll_y: 900.0,
                region_top: 400.0,
                viewport_height: 500.0,
            })
            .unwrap();
        assert_eq!(pinned.phase, PinPhase::Pinned);
        assert_eq!(pinned.pin_offset, 500.0);
        assert_eq!(pinned.layout, PinLayout::Fixed);
        assert_eq!(pinned.frame, FrameIndex::new(5));

        let after = player
            .update(ScrollSample {
                scroll_y: 5000.0,
                region_top: 400.0,
                viewport_height: 500.0,
            })
            .unwrap();
        assert_eq!(after.phase, PinPhase::After);
        assert_eq!(after.pin_offset, 1000.0);
        assert_eq!(after.layout, PinLayout::Released { shift: 1000.0 });
        assert_eq!(after.frame, FrameIndex::new(10));
    }

    #[test]
    fn caption_appears_in_final_stretch() {
        let mut player = ready_player(11);
        assert_eq!(
            player.update(sample(800.0)).unwrap().caption,
            CaptionStyle::hidden()
        );
        assert_eq!(
            player.update(sample(1000.0)).unwrap().caption,
            CaptionStyle::shown()
        );
    }

    #[test]
    fn single_frame_player_always_shows_frame_zero() {
        let mut player = ready_player(1);
        for scroll_y in [0.0, 250.0, 999.0, 5000.0] {
            assert_eq!(
                player.update(sample(scroll_y)).unwrap().frame,
                FrameIndex::new(0)
            );
        }
    }

    #[test]
    fn teardown_makes_player_inert() {
        let mut player = ready_player(3);
        player.teardown();
        assert!(!player.is_active());
        assert!(player.update(sample(100.0)).is_none());
        assert!(player
            .frame_loaded(FrameIndex::new(0), PixelSize::new(1, 1))
            .is_none());
        assert!(player.frame_failed(FrameIndex::new(2)).is_none());
    }

    // =========================================================================
    // WASM Wrapper Tests
    // =========================================================================

    #[test]
    fn test_wasm_player_from_json() {
        let player = WasmFrameSequencePlayer::new(
            r#"{"frame_count":2,"frame_path_prefix":"/f/","canvas_width":4,"canvas_height":4}"#,
        )
        .expect("Should parse valid config");
        assert_eq!(
            player.frame_sources().unwrap(),
            r#"["/f/48.png","/f/49.png"]"#
        );
        assert_eq!(player.load_state().unwrap(), r#"{"state":"loading"}"#);
    }

    #[test]
    fn test_wasm_player_round() {
        let mut player = WasmFrameSequencePlayer::new(
            r#"{"frame_count":2,"frame_path_prefix":"/f/","canvas_width":4,"canvas_height":4,"scroll_budget":100}"#,
        )
        .expect("Should parse valid config");

        assert_eq!(player.update(0.0, 0.0, 800.0).unwrap(), "null");
        assert_eq!(player.frame_loaded(0, 8, 8).unwrap(), "null");
        let draw = player.frame_loaded(1, 8, 8).unwrap();
        assert!(draw.contains(r#""kind":"frame""#));

        let update: FrameUpdate =
            serde_json::from_str(&player.update(100.0, 0.0, 800.0).unwrap()).unwrap();
        assert_eq!(update.frame, FrameIndex::new(1));
        assert_eq!(update.phase, PinPhase::After);
    }

    #[test]
    fn test_wasm_player_reports_first_failure_only() {
        let mut player = WasmFrameSequencePlayer::new(
            r#"{"frame_count":3,"frame_path_prefix":"/f/","canvas_width":4,"canvas_height":4}"#,
        )
        .expect("Should parse valid config");
        assert_eq!(
            player.frame_failed(2).as_deref(),
            Some("Failed to load frame 50. Check console & path: /f/")
        );
        assert_eq!(player.frame_failed(0), None);
    }

    // Note: invalid-config errors from the WASM wrapper are only testable on wasm32
    // because JsValue::from_str is not available on non-wasm32 targets.
}
