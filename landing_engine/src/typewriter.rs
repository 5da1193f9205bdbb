// Typewriter text: type forward, hold, delete, move on to the next string, forever.

use serde::{Deserialize, Serialize};

use crate::types::TypewriterConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypewriterPhase {
    Typing,
    Deleting,
}

/// Result of one tick: what to display and how long to wait before the next tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypewriterStep {
    pub text: String,
    pub delay_ms: u32,
}

/// Cycles through a list of strings one character at a time.
#[derive(Debug, Clone)]
pub struct Typewriter {
    config: TypewriterConfig,
    text_index: usize,
    char_index: usize,
    phase: TypewriterPhase,
}

impl Typewriter {
    pub fn new(config: TypewriterConfig) -> Self {
        Typewriter {
            config,
            text_index: 0,
            char_index: 0,
            phase: TypewriterPhase::Typing,
        }
    }

    /// No strings to show. Ticking an idle typewriter does nothing.
    pub fn is_idle(&self) -> bool {
        self.config.texts.is_empty()
    }

    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    pub fn text_index(&self) -> usize {
        self.text_index
    }

    /// Currently visible prefix of the current string.
    pub fn display(&self) -> String {
        self.current()
            .map(|text| text.chars().take(self.char_index).collect())
            .unwrap_or_default()
    }

    /// Delay before the first tick.
    pub fn initial_delay_ms(&self) -> u32 {
        self.config.typing_speed_ms
    }

    /// Advance one step. Returns `None` when idle.
    ///
    /// A full string is held for one typing interval plus the pause, and the first deletion
    /// follows a deleting interval after that. An emptied string waits one deleting interval
    /// before the next string starts on the typing interval.
    pub fn tick(&mut self) -> Option<TypewriterStep> {
        let len = self.current()?.chars().count();
        let TypewriterConfig {
            typing_speed_ms: typing,
            deleting_speed_ms: deleting,
            pause_ms: pause,
            ..
        } = self.config;

        let delay_ms = match self.phase {
            // Only an empty string is already complete when typing starts.
            TypewriterPhase::Typing if self.char_index >= len => {
                self.phase = TypewriterPhase::Deleting;
                pause.saturating_add(deleting)
            }
            TypewriterPhase::Typing => {
                self.char_index += 1;
                if self.char_index == len {
                    self.phase = TypewriterPhase::Deleting;
                    typing.saturating_add(pause).saturating_add(deleting)
                } else {
                    typing
                }
            }
            TypewriterPhase::Deleting if self.char_index == 0 => {
                self.advance();
                typing
            }
            TypewriterPhase::Deleting => {
                self.char_index -= 1;
                if self.char_index == 0 {
                    self.advance();
                    deleting.saturating_add(typing)
                } else {
                    deleting
                }
            }
        };

        Some(TypewriterStep {
            text: self.display(),
            delay_ms,
        })
    }

    fn advance(&mut self) {
        self.text_index = (self.text_index + 1) % self.config.texts.len();
        self.phase = TypewriterPhase::Typing;
    }

    fn current(&self) -> Option<&str> {
        self.config.texts.get(self.text_index).map(String::as_str)
    }
}
