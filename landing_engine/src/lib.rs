// landing_engine: Rust/WASM behaviour for the RhythmSync landing page.
// Pure state machines live in their own modules; `dom` is the only file that touches the browser.

mod assets;
mod caption;
mod dom;
mod error;
mod frame_sync;
#[cfg(feature = "console_log")]
mod logging;
mod page;
mod player;
mod preload;
mod render;
mod reveal;
mod scroll_map;
mod types;
mod typewriter;

use wasm_bindgen::prelude::*;

pub use assets::FrameAddressing;
pub use caption::{CaptionReveal, CaptionStyle};
pub use dom::{
    bind_scroll_down, mount_frame_player, mount_landing, mount_scroll_reveal, mount_typewriter,
    FramePlayerHandle, LandingHandle, ScrollDownHandle, ScrollRevealHandle, TypewriterHandle,
};
pub use error::EngineError;
pub use frame_sync::FrameCoalescer;
pub use page::{
    scroll_button_label, scroll_target_after, LandingConfig, Section, RECOMMENDATION_EXAMPLES,
    SECTIONS,
};
pub use player::{FrameSequencePlayer, FrameUpdate, ScrollSample, WasmFrameSequencePlayer};
pub use preload::{FrameLoadGate, LoadEvent};
pub use render::{crop_source, DrawCommand, FramePainter};
pub use reveal::{
    reveal_settings, transition_delay, RevealLatch, HIDDEN_CLASSES, VISIBLE_CLASSES,
};
pub use scroll_map::{
    frame_for_offset, frame_for_progress, scroll_progress, PinLayout, PinPhase, PinnedRegion,
};
pub use types::*;
pub use typewriter::{Typewriter, TypewriterPhase, TypewriterStep};

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    logging::install(if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    });
}
