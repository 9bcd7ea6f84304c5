//! The document the game runs in, seen through the handful of elements it
//! touches.

use core::fmt;

mod memory;
pub use memory::MemoryPage;

pub mod timers;

pub const START_BUTTON_CLASS: &str = "start-button";
pub const FLASH_CLASS: &str = "flash-red";
pub const DOC_HEIGHT_PROPERTY: &str = "--doc-height";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    /// Where the player types a guess.
    AnswerBox,
    /// Hidden field holding the current autocomplete suggestion.
    PredictionBox,
    /// Visible rendering of the suggestion.
    Prediction,
}

impl ElementId {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AnswerBox => "answerBox",
            Self::PredictionBox => "predictionBox",
            Self::Prediction => "prediction",
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads and writes on the host document.
///
/// Every element may be missing at any time. Writers report whether the
/// element was there; callers treat a missing element as a no-op.
pub trait Page {
    fn value(&self, id: ElementId) -> Option<String>;

    fn set_value(&mut self, id: ElementId, value: &str) -> bool;

    /// Empties the element's rendered content.
    fn clear_content(&mut self, id: ElementId) -> bool;

    fn add_class(&mut self, id: ElementId, class: &str) -> bool;

    fn remove_class(&mut self, id: ElementId, class: &str) -> bool;

    /// Clicks the first element carrying `class`, if any.
    fn click_first(&mut self, class: &str) -> bool;

    fn viewport_height(&self) -> u32;

    /// Sets a custom property on the document root.
    fn set_root_property(&mut self, name: &str, value: &str);

    fn contains(&self, id: ElementId) -> bool {
        self.value(id).is_some()
    }
}
