//! Page-color presets and the colors derived from them
//!
//! Every reading theme is keyed by the hex token of its page color. The rest
//! of the palette (text, secondary text, separator and background) is a pure
//! function of that preset, so the colors can never be mixed from two
//! different presets.
//!
//! ```rust
//! use reader_config::palette::{Color, PageColor};
//!
//! let palette = PageColor::DarkGray.palette();
//! assert_eq!(palette.text.to_hex(), "DDDDDD");
//! assert_eq!(palette.separator, Color::white(1.0, 0.05));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, Result};

// =============================================================================
// Color
// =============================================================================

/// An sRGB color with alpha
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub red: u8,
    /// Green channel
    pub green: u8,
    /// Blue channel
    pub blue: u8,
    /// Opacity in `[0, 1]`
    pub alpha: f32,
}

impl Color {
    /// Opaque color from RGB components
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue, alpha: 1.0 }
    }

    /// Grayscale color, `level` 0.0 is black and 1.0 is white
    pub fn white(level: f32, alpha: f32) -> Self {
        let channel = (level.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { red: channel, green: channel, blue: channel, alpha: alpha.clamp(0.0, 1.0) }
    }

    /// Parse a six digit hex color such as `"F8F8F8"` or `"#f8f8f8"`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let red = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let green = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let blue = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::rgb(red, green, blue))
    }

    /// Upper-case hex of the RGB channels, without a leading `#`
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// Same color with a different opacity
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha: alpha.clamp(0.0, 1.0), ..self }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha >= 1.0 {
            write!(f, "#{}", self.to_hex())
        } else {
            write!(f, "#{} @ {:.0}%", self.to_hex(), self.alpha * 100.0)
        }
    }
}

// =============================================================================
// Presets
// =============================================================================

/// Opacity of the separator line in every preset
const SEPARATOR_ALPHA: f32 = 0.05;

/// Opacity of secondary text relative to the primary text color
const SECONDARY_TEXT_ALPHA: f32 = 0.6;

/// Page-color presets, identified by the hex token of the page color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageColor {
    /// Near-white page
    #[default]
    #[serde(rename = "F8F8F8")]
    Light,
    /// Warm paper page
    #[serde(rename = "E9E6D7")]
    Sepia,
    /// Dark gray page
    #[serde(rename = "373737")]
    DarkGray,
    /// Black page
    #[serde(rename = "000000")]
    DarkBlack,
}

impl PageColor {
    /// All presets in display order
    pub const ALL: [PageColor; 4] =
        [PageColor::Light, PageColor::Sepia, PageColor::DarkGray, PageColor::DarkBlack];

    /// The persisted identifier of this preset
    pub fn hex(&self) -> &'static str {
        match self {
            PageColor::Light => "F8F8F8",
            PageColor::Sepia => "E9E6D7",
            PageColor::DarkGray => "373737",
            PageColor::DarkBlack => "000000",
        }
    }

    /// Look up a preset by its identifier
    ///
    /// Matching ignores case and a leading `#`. Anything that is not one of
    /// the four presets is rejected rather than mapped to a default.
    pub fn from_hex(id: &str) -> Result<Self> {
        let normalized = id.trim_start_matches('#');
        Self::ALL
            .into_iter()
            .find(|preset| preset.hex().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| ConfigError::InvalidArgument(format!("unknown page color: {id:?}")))
    }

    /// Whether this preset renders light text on a dark page
    pub fn is_dark(&self) -> bool {
        matches!(self, PageColor::DarkGray | PageColor::DarkBlack)
    }

    /// Derived colors for this preset
    pub fn palette(&self) -> ReaderPalette {
        let (text, background, separator_level) = match self {
            PageColor::Light => (0x333333, 0xFFFFFF, 0.0),
            PageColor::Sepia => (0x4C3824, 0xFDF9EA, 0.0),
            PageColor::DarkGray => (0xDDDDDD, 0x454545, 1.0),
            PageColor::DarkBlack => (0xAAAAAA, 0x282828, 1.0),
        };
        let text = packed(text);

        ReaderPalette {
            page: self.page(),
            text,
            secondary_text: text.with_alpha(SECONDARY_TEXT_ALPHA),
            separator: Color::white(separator_level, SEPARATOR_ALPHA),
            background: packed(background),
        }
    }

    fn page(&self) -> Color {
        match self {
            PageColor::Light => packed(0xF8F8F8),
            PageColor::Sepia => packed(0xE9E6D7),
            PageColor::DarkGray => packed(0x373737),
            PageColor::DarkBlack => packed(0x000000),
        }
    }
}

impl FromStr for PageColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for PageColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

fn packed(rgb: u32) -> Color {
    Color::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

/// Colors derived from the active [`PageColor`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReaderPalette {
    /// Page fill
    pub page: Color,
    /// Body text
    pub text: Color,
    /// Captions, page numbers and other de-emphasized text
    pub secondary_text: Color,
    /// Hairline separators
    pub separator: Color,
    /// Surrounding chrome and list backgrounds
    pub background: Color,
}

impl Default for ReaderPalette {
    fn default() -> Self {
        PageColor::default().palette()
    }
}
