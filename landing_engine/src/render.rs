// Draw planning for the frame surface. Produces commands; the DOM layer executes them.

use serde::{Deserialize, Serialize};

use crate::types::{FrameIndex, PixelRect, PixelSize};

/// One repaint of the drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Fill with `background`, then draw `source` of the frame image scaled onto `destination`.
    Frame {
        index: FrameIndex,
        background: String,
        source: PixelRect,
        destination: PixelRect,
    },
    /// Fill only, optionally with a status line in the top-left corner.
    Placeholder {
        fill: String,
        status: Option<String>,
    },
}

/// Source rectangle with `inset` pixels trimmed from every edge.
/// Images too small to trim are used whole.
pub fn crop_source(natural: PixelSize, inset: u32) -> PixelRect {
    let trim = inset as u64 * 2;
    if (natural.width as u64) <= trim || (natural.height as u64) <= trim {
        return PixelRect::from_size(natural);
    }
    PixelRect::new(
        inset as f64,
        inset as f64,
        (natural.width - inset * 2) as f64,
        (natural.height - inset * 2) as f64,
    )
}

/// Plans repaints for a fixed-size surface.
#[derive(Debug, Clone)]
pub struct FramePainter {
    surface: PixelSize,
    crop_inset: u32,
    fill: String,
}

impl FramePainter {
    pub fn new(surface: PixelSize, crop_inset: u32, fill: impl Into<String>) -> Self {
        FramePainter {
            surface,
            crop_inset,
            fill: fill.into(),
        }
    }

    pub fn surface(&self) -> PixelSize {
        self.surface
    }

    /// Plain placeholder fill, shown while the set is loading.
    pub fn placeholder(&self) -> DrawCommand {
        DrawCommand::Placeholder {
            fill: self.fill.clone(),
            status: None,
        }
    }

    /// Draw the frame if its image is decodable, otherwise a placeholder naming it.
    pub fn plan(
        &self,
        index: FrameIndex,
        natural: Option<PixelSize>,
        frame_number: u32,
    ) -> DrawCommand {
        match natural {
            Some(size) if !size.is_empty() => DrawCommand::Frame {
                index,
                background: self.fill.clone(),
                source: crop_source(size, self.crop_inset),
                destination: PixelRect::from_size(self.surface),
            },
            _ => DrawCommand::Placeholder {
                fill: self.fill.clone(),
                status: Some(format!("Loading frame {}...", frame_number)),
            },
        }
    }
}
