// Page composition: section order, scroll-down wiring, and the shipped component settings.

use serde::{Deserialize, Serialize};

use crate::types::{PlayerConfig, RevealConfig, ScrollBudget, TypewriterConfig};

/// Element ids the host page must provide for the frame player.
pub const FRAME_CONTAINER_ID: &str = "frame-animation-container";
pub const FRAME_CANVAS_ID: &str = "frame-canvas";
pub const FRAME_CAPTION_ID: &str = "frame-caption";
pub const FRAME_STATUS_ID: &str = "frame-status";
pub const TYPEWRITER_ID: &str = "typewriter-text";

/// A full-height section and the section its scroll-down button leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub id: &'static str,
    pub scroll_target: Option<&'static str>,
}

pub const SECTIONS: &[Section] = &[
    Section {
        id: "frame-animation",
        scroll_target: Some("hero"),
    },
    Section {
        id: "hero",
        scroll_target: Some("features-combined"),
    },
    Section {
        id: "features-combined",
        scroll_target: Some("tech-specs"),
    },
    Section {
        id: "tech-specs",
        scroll_target: Some("cta"),
    },
    Section {
        id: "cta",
        scroll_target: None,
    },
];

/// Where the scroll-down button in section `id` leads.
pub fn scroll_target_after(id: &str) -> Option<&'static str> {
    SECTIONS
        .iter()
        .find(|section| section.id == id)
        .and_then(|section| section.scroll_target)
}

/// Accessible label for a scroll-down button.
pub fn scroll_button_label(target_id: &str) -> String {
    format!("Scroll down to {} section", target_id.replace('-', " "))
}

pub const RECOMMENDATION_EXAMPLES: [&str; 4] = [
    "Finding upbeat tracks for your peak intensity...",
    "Queueing calming tunes for your cooldown...",
    "Matching tempo to your current heart rate...",
    "Discovering new music based on your workout...",
];

/// Settings for every interactive component on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingConfig {
    #[serde(default = "default_frame_player")]
    pub frame_player: PlayerConfig,
    #[serde(default = "default_typewriter")]
    pub typewriter: TypewriterConfig,
    /// Used by reveals without their own `data-threshold` or `data-delay`.
    #[serde(default)]
    pub reveal: RevealConfig,
}

fn default_frame_player() -> PlayerConfig {
    PlayerConfig {
        frame_count: 210,
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

fn default_typewriter() -> TypewriterConfig {
    TypewriterConfig::with_texts(
        RECOMMENDATION_EXAMPLES
            .iter()
            .map(|text| text.to_string())
            .collect(),
    )
}

impl Default for LandingConfig {
    fn default() -> Self {
        LandingConfig {
            frame_player: default_frame_player(),
            typewriter: default_typewriter(),
            reveal: RevealConfig::default(),
        }
    }
}

impl LandingConfig {
    /// Parse host overrides; an empty string means the shipped defaults.
    pub fn from_json(json: &str) -> Result<Self, crate::EngineError> {
        if json.trim().is_empty() {
            return Ok(LandingConfig::default());
        }
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_chain_to_cta() {
        let mut id = "frame-animation";
        let mut visited = vec![id];
        while let Some(next) = scroll_target_after(id) {
            visited.push(next);
            id = next;
        }
        assert_eq!(
            visited,
            vec!["frame-animation", "hero", "features-combined", "tech-specs", "cta"]
        );
        assert_eq!(scroll_target_after("nowhere"), None);
    }

    #[test]
    fn label_replaces_dashes() {
        assert_eq!(
            scroll_button_label("tech-specs"),
            "Scroll down to tech specs section"
        );
    }

    #[test]
    fn defaults_match_shipped_page() {
        let config = LandingConfig::default();
        assert_eq!(config.frame_player.validate(), Ok(210));
        assert_eq!(config.typewriter.texts.len(), 4);
        assert_eq!(config.reveal.threshold, 0.1);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = LandingConfig::from_json(r#"{"reveal":{"threshold":0.3}}"#).unwrap();
        assert_eq!(config.reveal.threshold, 0.3);
        assert_eq!(config.frame_player, LandingConfig::default().frame_player);
        assert_eq!(LandingConfig::from_json("  ").unwrap(), LandingConfig::default());
    }
}
