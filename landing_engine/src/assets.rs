// Frame asset addressing: prefix + (index + offset) + extension.

use crate::types::{FrameIndex, PlayerConfig};

/// Locates frame images on the static asset server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameAddressing {
    prefix: String,
    offset: u32,
    extension: String,
}

impl FrameAddressing {
    pub fn new(prefix: impl Into<String>, offset: u32, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        FrameAddressing {
            prefix: prefix.into(),
            offset,
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn from_config(config: &PlayerConfig) -> Self {
        FrameAddressing::new(
            config.frame_path_prefix.clone(),
            config.frame_number_offset,
            config.frame_file_extension.clone(),
        )
    }

    /// Number used in the filename of the frame at `index`.
    pub fn frame_number(&self, index: FrameIndex) -> u32 {
        index.as_u32().saturating_add(self.offset)
    }

    /// Address of the frame at `index`, e.g. `/frames/48.png` for index 0.
    pub fn frame_src(&self, index: FrameIndex) -> String {
        format!(
            "{}{}.{}",
            self.prefix,
            self.frame_number(index),
            self.extension
        )
    }

    /// Addresses of the first `count` frames, in order.
    pub fn sources(&self, count: u32) -> Vec<String> {
        (0..count)
            .map(|i| self.frame_src(FrameIndex::new(i)))
            .collect()
    }

    pub fn path_prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_uses_offset() {
        let addressing = FrameAddressing::new("/frames/", 48, "png");
        assert_eq!(addressing.frame_src(FrameIndex::new(0)), "/frames/48.png");
        assert_eq!(addressing.frame_src(FrameIndex::new(209)), "/frames/257.png");
    }

    #[test]
    fn leading_dot_in_extension_is_dropped() {
        let addressing = FrameAddressing::new("/f/", 0, ".jpg");
        assert_eq!(addressing.frame_src(FrameIndex::new(3)), "/f/3.jpg");
    }

    #[test]
    fn sources_are_ordered() {
        let addressing = FrameAddressing::new("/frames/", 48, "png");
        let sources = addressing.sources(3);
        assert_eq!(
            sources,
            vec!["/frames/48.png", "/frames/49.png", "/frames/50.png"]
        );
    }
}
