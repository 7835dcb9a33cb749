//! Typefaces, text size and fixed layout metrics

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, Result};

// =============================================================================
// Text Size
// =============================================================================

/// Base point size at the default multiplier
pub const DEFAULT_TEXT_SIZE: f32 = 15.0;

/// Smallest accepted text-size multiplier
pub const MIN_TEXT_SIZE_MULTIPLIER: u8 = 6;

/// Largest accepted text-size multiplier
pub const MAX_TEXT_SIZE_MULTIPLIER: u8 = 20;

/// Multiplier used when nothing has been stored
pub const DEFAULT_TEXT_SIZE_MULTIPLIER: u8 = 10;

/// Clamp an arbitrary multiplier into the supported range
pub fn clamp_text_size_multiplier(value: i64) -> u8 {
    value.clamp(MIN_TEXT_SIZE_MULTIPLIER as i64, MAX_TEXT_SIZE_MULTIPLIER as i64) as u8
}

/// Point size of body text for a multiplier (10 is the base size)
pub fn point_size(multiplier: u8) -> f32 {
    DEFAULT_TEXT_SIZE * f32::from(multiplier) / f32::from(DEFAULT_TEXT_SIZE_MULTIPLIER)
}

// =============================================================================
// Typefaces
// =============================================================================

/// Label shown for identifiers outside the supported set
pub const FALLBACK_DISPLAY_NAME: &str = "黑体";

/// Supported reading typefaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReaderFont {
    /// PingFang SC, the system typeface
    #[default]
    #[serde(rename = "PingFangSC-Regular")]
    PingFang,
    /// Songti SC
    #[serde(rename = "STSongti-SC-Regular")]
    Song,
    /// Kaiti SC
    #[serde(rename = "STKaitiSC-Regular")]
    Kaiti,
    /// Yuanti SC
    #[serde(rename = "STYuanti-SC-Regular")]
    Yuanti,
    /// Heiti SC
    #[serde(rename = "STHeitiSC-Medium")]
    Heiti,
}

impl ReaderFont {
    /// All typefaces in picker order
    pub const ALL: [ReaderFont; 5] = [
        ReaderFont::PingFang,
        ReaderFont::Song,
        ReaderFont::Kaiti,
        ReaderFont::Yuanti,
        ReaderFont::Heiti,
    ];

    /// PostScript name, which is also the persisted identifier
    pub fn identifier(&self) -> &'static str {
        match self {
            ReaderFont::PingFang => "PingFangSC-Regular",
            ReaderFont::Song => "STSongti-SC-Regular",
            ReaderFont::Kaiti => "STKaitiSC-Regular",
            ReaderFont::Yuanti => "STYuanti-SC-Regular",
            ReaderFont::Heiti => "STHeitiSC-Medium",
        }
    }

    /// Localized label for the font picker
    pub fn display_name(&self) -> &'static str {
        match self {
            ReaderFont::PingFang => "苹方",
            ReaderFont::Song => "宋体",
            ReaderFont::Kaiti => "楷体",
            ReaderFont::Yuanti => "圆体",
            ReaderFont::Heiti => "黑体",
        }
    }

    /// Strict lookup by identifier
    pub fn parse(identifier: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|font| font.identifier() == identifier)
            .ok_or_else(|| {
                ConfigError::InvalidArgument(format!("unsupported typeface: {identifier:?}"))
            })
    }

    /// Whether the typeface ships with the system and never needs loading
    ///
    /// Song, Kaiti and Yuanti are downloaded on demand.
    pub fn is_system(&self) -> bool {
        matches!(self, ReaderFont::PingFang | ReaderFont::Heiti)
    }
}

impl FromStr for ReaderFont {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ReaderFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Display label for any identifier; never fails
pub fn display_name(identifier: &str) -> &'static str {
    ReaderFont::parse(identifier)
        .map(|font| font.display_name())
        .unwrap_or(FALLBACK_DISPLAY_NAME)
}

// =============================================================================
// Page Transition
// =============================================================================

/// How the reader moves between pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionStyle {
    /// Horizontal page curl
    #[default]
    PageCurl,
    /// Vertical continuous scroll
    Scroll,
}

impl TransitionStyle {
    /// Persisted integer value
    pub fn raw(&self) -> i64 {
        match self {
            TransitionStyle::PageCurl => 0,
            TransitionStyle::Scroll => 1,
        }
    }

    /// Decode a persisted value, treating anything unknown as page curl
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => TransitionStyle::Scroll,
            _ => TransitionStyle::PageCurl,
        }
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Fixed paragraph and page metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReaderLayout {
    /// Extra space between lines
    pub line_spacing: f32,
    /// Line height as a multiple of the font's natural height
    pub line_height_multiple: f32,
    /// Space after each paragraph
    pub paragraph_spacing: f32,
    /// Left and right page margin
    pub horizontal_spacing: f32,
}

impl Default for ReaderLayout {
    fn default() -> Self {
        Self {
            line_spacing: 2.0,
            line_height_multiple: 1.1,
            paragraph_spacing: 10.0,
            horizontal_spacing: 26.0,
        }
    }
}

/// Size of the visible reading page
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageSize {
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
}

impl PageSize {
    /// Create a page size
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width left for text once the horizontal margins are taken off
    pub fn text_width(&self, layout: &ReaderLayout) -> f32 {
        (self.width - 2.0 * layout.horizontal_spacing).max(0.0)
    }
}
