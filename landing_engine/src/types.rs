// Strong typing over strings. Newtypes for frame indices, pixel units, and scroll budgets.
// Configuration structs are deserialized from JSON handed over by the host page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Frame index (0-based position in the sequence). Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct FrameIndex(u32);

impl FrameIndex {
    pub fn new(index: u32) -> Self {
        FrameIndex(index)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

/// Integer pixel dimensions of a surface or a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        PixelSize { width, height }
    }

    /// A decoded image with a zero dimension cannot be drawn.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Rectangle in pixel units, used for canvas source and destination regions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        PixelRect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: PixelSize) -> Self {
        PixelRect::new(0.0, 0.0, size.width as f64, size.height as f64)
    }
}

/// Scroll distance over which a pinned animation completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScrollBudgetRepr", into = "ScrollBudgetRepr")]
pub enum ScrollBudget {
    /// Percentage of the viewport height (`"200%"` is two viewports).
    ViewportPercent(f64),
    /// Absolute distance in CSS pixels.
    Pixels(f64),
}

impl ScrollBudget {
    /// Resolve to CSS pixels for the current viewport height.
    pub fn resolve(&self, viewport_height: f64) -> f64 {
        match *self {
            ScrollBudget::ViewportPercent(percent) => viewport_height.max(0.0) * percent / 100.0,
            ScrollBudget::Pixels(px) => px,
        }
    }
}

impl Default for ScrollBudget {
    fn default() -> Self {
        ScrollBudget::ViewportPercent(200.0)
    }
}

impl FromStr for ScrollBudget {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (number, budget): (&str, fn(f64) -> ScrollBudget) =
            if let Some(percent) = trimmed.strip_suffix('%') {
                (percent, ScrollBudget::ViewportPercent)
            } else {
                (trimmed.strip_suffix("px").unwrap_or(trimmed), ScrollBudget::Pixels)
            };

        let value: f64 = number.trim().parse().map_err(|_| {
            EngineError::InvalidConfig(format!("scroll budget \"{}\" is not a number", s))
        })?;
        positive_budget(value).map(budget)
    }
}

impl fmt::Display for ScrollBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollBudget::ViewportPercent(percent) => write!(f, "{}%", percent),
            ScrollBudget::Pixels(px) => write!(f, "{}px", px),
        }
    }
}

fn positive_budget(value: f64) -> Result<f64, EngineError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::InvalidConfig(format!(
            "scroll budget must be positive, got {}",
            value
        )))
    }
}

/// JSON shape of a scroll budget: a bare number of pixels or a `"200%"` / `"800px"` string.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ScrollBudgetRepr {
    Pixels(f64),
    Text(String),
}

impl TryFrom<ScrollBudgetRepr> for ScrollBudget {
    type Error = EngineError;

    fn try_from(repr: ScrollBudgetRepr) -> Result<Self, Self::Error> {
        match repr {
            ScrollBudgetRepr::Pixels(px) => positive_budget(px).map(ScrollBudget::Pixels),
            ScrollBudgetRepr::Text(text) => text.parse(),
        }
    }
}

impl From<ScrollBudget> for ScrollBudgetRepr {
    fn from(budget: ScrollBudget) -> Self {
        match budget {
            ScrollBudget::Pixels(px) => ScrollBudgetRepr::Pixels(px),
            percent => ScrollBudgetRepr::Text(percent.to_string()),
        }
    }
}

/// Frame sequence player configuration passed from JS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Signed so that zero and negative counts reach validation instead of failing to parse.
    pub frame_count: i64,
    pub frame_path_prefix: String,
    #[serde(default = "default_extension")]
    pub frame_file_extension: String,
    /// Number in the first frame's filename.
    #[serde(default = "default_frame_number_offset")]
    pub frame_number_offset: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    #[serde(default)]
    pub scroll_budget: ScrollBudget,
    /// Pixels trimmed from every edge of a source frame before scaling.
    #[serde(default = "default_crop_inset")]
    pub crop_inset: u32,
    /// Scroll progress (0-1) at which the caption starts to appear.
    #[serde(default = "default_caption_reveal_start")]
    pub caption_reveal_start: f64,
    #[serde(default = "default_placeholder_fill")]
    pub placeholder_fill: String,
}

fn default_extension() -> String {
    "png".to_string()
}

fn default_frame_number_offset() -> u32 {
    48
}

fn default_crop_inset() -> u32 {
    2
}

fn default_caption_reveal_start() -> f64 {
    0.85
}

fn default_placeholder_fill() -> String {
    "#e9e9e9".to_string()
}

impl PlayerConfig {
    /// Check the configuration and return the frame count as an unsigned value.
    pub fn validate(&self) -> Result<u32, EngineError> {
        if self.frame_count <= 0 {
            return Err(EngineError::InvalidConfig(
                "frameCount must be a positive number.".to_string(),
            ));
        }
        let frame_count = u32::try_from(self.frame_count).map_err(|_| {
            EngineError::InvalidConfig(format!("frameCount {} is too large", self.frame_count))
        })?;
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "canvas size {}x{} must be non-zero",
                self.canvas_width, self.canvas_height
            )));
        }
        if !(0.0..=1.0).contains(&self.caption_reveal_start) {
            return Err(EngineError::InvalidConfig(format!(
                "caption reveal start {} must lie in [0, 1]",
                self.caption_reveal_start
            )));
        }
        Ok(frame_count)
    }

    pub fn canvas_size(&self) -> PixelSize {
        PixelSize::new(self.canvas_width, self.canvas_height)
    }
}

/// Typewriter timing and content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypewriterConfig {
    pub texts: Vec<String>,
    #[serde(default = "default_typing_speed")]
    pub typing_speed_ms: u32,
    #[serde(default = "default_deleting_speed")]
    pub deleting_speed_ms: u32,
    /// Hold time once a string is fully typed.
    #[serde(default = "default_pause")]
    pub pause_ms: u32,
}

fn default_typing_speed() -> u32 {
    100
}

fn default_deleting_speed() -> u32 {
    50
}

fn default_pause() -> u32 {
    1500
}

impl TypewriterConfig {
    pub fn with_texts(texts: Vec<String>) -> Self {
        TypewriterConfig {
            texts,
            typing_speed_ms: default_typing_speed(),
            deleting_speed_ms: default_deleting_speed(),
            pause_ms: default_pause(),
        }
    }
}

/// Scroll reveal settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Fraction of the element that must be visible before it is revealed.
    #[serde(default = "default_reveal_threshold")]
    pub threshold: f64,
    /// Transition delay once revealed, for staggering neighbours.
    #[serde(default)]
    pub delay_ms: u32,
}

fn default_reveal_threshold() -> f64 {
    0.1
}

impl Default for RevealConfig {
    fn default() -> Self {
        RevealConfig {
            threshold: default_reveal_threshold(),
            delay_ms: 0,
        }
    }
}

/// Load state of a whole frame set. All-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Ready,
    Error { message: String },
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }
}
