// Caption overlay reveal over the last stretch of the pinned scroll budget.
// Shares the progress value used for frame selection so both stay in sync.

use serde::{Deserialize, Serialize};

const HIDDEN_SCALE: f64 = 0.8;
const HIDDEN_OFFSET_PX: f64 = 30.0;

/// Visual state of the caption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptionStyle {
    pub opacity: f64,
    pub scale: f64,
    /// Downward offset in CSS pixels.
    pub translate_y: f64,
}

impl CaptionStyle {
    pub fn hidden() -> Self {
        CaptionStyle {
            opacity: 0.0,
            scale: HIDDEN_SCALE,
            translate_y: HIDDEN_OFFSET_PX,
        }
    }

    pub fn shown() -> Self {
        CaptionStyle {
            opacity: 1.0,
            scale: 1.0,
            translate_y: 0.0,
        }
    }

    /// CSS `transform` value.
    pub fn css_transform(&self) -> String {
        format!(
            "translateY({:.2}px) scale({:.4})",
            self.translate_y, self.scale
        )
    }
}

/// Maps scroll progress to a caption style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionReveal {
    start: f64,
}

impl CaptionReveal {
    /// `start` is the progress (0-1) at which the caption begins to appear.
    pub fn new(start: f64) -> Self {
        CaptionReveal {
            start: start.clamp(0.0, 1.0),
        }
    }

    pub fn style_at(&self, progress: f64) -> CaptionStyle {
        if progress.is_nan() || progress < self.start {
            return CaptionStyle::hidden();
        }
        let span = 1.0 - self.start;
        let t = if span <= 0.0 {
            1.0
        } else {
            ((progress - self.start) / span).clamp(0.0, 1.0)
        };
        if t >= 1.0 {
            return CaptionStyle::shown();
        }
        let eased = ease_out_cubic(t);
        let hidden = CaptionStyle::hidden();

        CaptionStyle {
            opacity: eased,
            scale: lerp(hidden.scale, 1.0, eased),
            translate_y: lerp(hidden.translate_y, 0.0, eased),
        }
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn hidden_before_start() {
        let reveal = CaptionReveal::new(0.85);
        assert_eq!(reveal.style_at(0.0), CaptionStyle::hidden());
        assert_eq!(reveal.style_at(0.84), CaptionStyle::hidden());
        assert_eq!(reveal.style_at(0.85).opacity, 0.0);
    }

    #[test]
    fn fully_shown_at_end() {
        let reveal = CaptionReveal::new(0.85);
        let style = reveal.style_at(1.0);
        assert!((style.opacity - 1.0).abs() < 1e-9);
        assert!((style.scale - 1.0).abs() < 1e-9);
        assert!(style.translate_y.abs() < 1e-9);
    }

    #[test]
    fn start_at_one_shows_only_at_completion() {
        let reveal = CaptionReveal::new(1.0);
        assert_eq!(reveal.style_at(0.999), CaptionStyle::hidden());
        assert_eq!(reveal.style_at(1.0), CaptionStyle::shown());
    }

    #[test]
    fn transform_string() {
        assert_eq!(
            CaptionStyle::hidden().css_transform(),
            "translateY(30.00px) scale(0.8000)"
        );
    }

    proptest! {
        #[test]
        fn opacity_rises_with_progress(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let reveal = CaptionReveal::new(0.85);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let (lo, hi) = (reveal.style_at(lo), reveal.style_at(hi));
            prop_assert!(lo.opacity <= hi.opacity);
            prop_assert!((0.0..=1.0).contains(&hi.opacity));
        }
    }
}
