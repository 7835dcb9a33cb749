//! Change notifications for configuration consumers

use serde::{Deserialize, Serialize};

use crate::palette::PageColor;
use crate::typography::{ReaderFont, TransitionStyle};

/// A configuration change that consumers may want to re-render for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ConfigEvent {
    /// Every setting was reloaded from storage
    Reloaded,
    /// A new page-color preset (and its derived palette) is active
    PageColorChanged(PageColor),
    /// The selected typeface changed
    FontChanged(ReaderFont),
    /// The text-size multiplier changed
    TextSizeChanged(u8),
    /// The page transition changed
    TransitionStyleChanged(TransitionStyle),
    /// Following the system light/dark appearance was toggled
    FollowSystemThemeChanged(bool),
    /// Screen brightness changed
    BrightnessChanged(f32),
    /// A downloadable typeface finished loading and can be rendered
    TypefaceReady(ReaderFont),
}

impl ConfigEvent {
    /// Whether the event changes anything colored on screen
    pub fn affects_colors(&self) -> bool {
        matches!(self, ConfigEvent::Reloaded | ConfigEvent::PageColorChanged(_))
    }

    /// Whether the event requires text to be laid out again
    pub fn affects_layout(&self) -> bool {
        matches!(
            self,
            ConfigEvent::Reloaded
                | ConfigEvent::FontChanged(_)
                | ConfigEvent::TextSizeChanged(_)
                | ConfigEvent::TransitionStyleChanged(_)
                | ConfigEvent::TypefaceReady(_)
        )
    }
}
