//! Navigation chrome styling derived from the reader configuration
//!
//! Screens layered over the reader (chapter list, settings panels) take
//! their bar and tint colors from the active page-color preset so they blend
//! with the page underneath.

use reader_config::{Color, ReaderSettings};
use serde::{Deserialize, Serialize};

/// Navigation bar appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarStyle {
    /// Dark content on a light bar
    #[default]
    Default,
    /// Light content on a dark bar
    Black,
}

/// Colors for navigation chrome over the reader
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderChrome {
    /// Bar content style
    pub bar_style: BarStyle,
    /// Bar fill
    pub bar_tint: Color,
    /// Buttons and icons
    pub tint: Color,
    /// Content area behind lists
    pub background: Color,
    /// Row separators
    pub separator: Color,
}

impl ReaderChrome {
    /// Derive chrome colors from the current settings
    pub fn from_settings(settings: &ReaderSettings) -> Self {
        let palette = &settings.palette;
        Self {
            bar_style: if settings.page_color.is_dark() { BarStyle::Black } else { BarStyle::Default },
            bar_tint: palette.page,
            tint: palette.text,
            background: palette.page,
            separator: palette.separator,
        }
    }

    /// Whether the chrome is drawn dark
    pub fn is_dark(&self) -> bool {
        self.bar_style == BarStyle::Black
    }
}

impl Default for ReaderChrome {
    fn default() -> Self {
        Self::from_settings(&ReaderSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_config::PageColor;

    fn settings_for(page_color: PageColor) -> ReaderSettings {
        ReaderSettings { page_color, palette: page_color.palette(), ..Default::default() }
    }

    #[test]
    fn test_light_presets_use_default_bar() {
        for preset in [PageColor::Light, PageColor::Sepia] {
            let chrome = ReaderChrome::from_settings(&settings_for(preset));
            assert_eq!(chrome.bar_style, BarStyle::Default);
            assert!(!chrome.is_dark());
        }
    }

    #[test]
    fn test_dark_presets_use_black_bar() {
        for preset in [PageColor::DarkGray, PageColor::DarkBlack] {
            let chrome = ReaderChrome::from_settings(&settings_for(preset));
            assert_eq!(chrome.bar_style, BarStyle::Black);
        }
    }

    #[test]
    fn test_colors_follow_palette() {
        let chrome = ReaderChrome::from_settings(&settings_for(PageColor::Sepia));
        assert_eq!(chrome.bar_tint.to_hex(), "E9E6D7");
        assert_eq!(chrome.tint.to_hex(), "4C3824");
        assert_eq!(chrome.background.to_hex(), "E9E6D7");
        assert_eq!(chrome.separator, Color::white(0.0, 0.05));
    }

    #[test]
    fn test_chrome_tracks_config_changes() {
        use reader_config::{ReaderConfigOptions, ReaderDisplayConfig};
        use std::sync::Arc;
        use storage::MemoryPreferenceStore;

        let store = Arc::new(MemoryPreferenceStore::new());
        let mut config = ReaderDisplayConfig::new(store, ReaderConfigOptions::default());
        config.initialize();
        assert!(!ReaderChrome::from_settings(config.settings()).is_dark());

        config.set_page_color(PageColor::DarkGray);
        let chrome = ReaderChrome::from_settings(config.settings());
        assert!(chrome.is_dark());
        assert_eq!(chrome.tint.to_hex(), "DDDDDD");
    }

    #[test]
    fn test_default_chrome_is_light() {
        let chrome = ReaderChrome::default();
        assert_eq!(chrome.bar_tint.to_hex(), "F8F8F8");
        assert!(!chrome.is_dark());
    }
}
