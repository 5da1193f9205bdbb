// One-way visibility latch for scroll reveals.

use crate::types::RevealConfig;

/// Classes applied before an element has been seen.
pub const HIDDEN_CLASSES: &str = "opacity-0 translate-y-8 blur-sm";
/// Classes applied once it has.
pub const VISIBLE_CLASSES: &str = "opacity-100 translate-y-0 blur-0";

/// Flips hidden -> visible at most once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealLatch {
    threshold: f64,
    visible: bool,
}

impl RevealLatch {
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            0.0
        } else {
            threshold.clamp(0.0, 1.0)
        };
        RevealLatch {
            threshold,
            visible: false,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Feed one observation. Returns true only on the observation that latched.
    pub fn observe(&mut self, visible_ratio: f64, intersecting: bool) -> bool {
        if self.visible {
            return false;
        }
        if intersecting && visible_ratio >= self.threshold {
            self.visible = true;
            return true;
        }
        false
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn classes(&self) -> &'static str {
        if self.visible {
            VISIBLE_CLASSES
        } else {
            HIDDEN_CLASSES
        }
    }
}

/// Settings for one element: `data-threshold` and `data-delay` override `defaults`.
/// Unparseable attributes fall back silently.
pub fn reveal_settings(
    defaults: RevealConfig,
    threshold: Option<&str>,
    delay_ms: Option<&str>,
) -> RevealConfig {
    RevealConfig {
        threshold: threshold
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .unwrap_or(defaults.threshold),
        delay_ms: delay_ms
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(defaults.delay_ms),
    }
}

/// CSS `transition-delay` value, or `None` for no delay.
pub fn transition_delay(config: &RevealConfig) -> Option<String> {
    (config.delay_ms > 0).then(|| format!("{}ms", config.delay_ms))
}
