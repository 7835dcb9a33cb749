//! Table of contents and bookmark list
//!
//! [`ChapterListPresenter`] holds the two lists shown behind the reader's
//! contents button and the segment toggle that switches between them. A
//! selection produces exactly one [`ChapterListEvent`] for the owning
//! reader screen to act on.

use reader_config::{Color, ReaderFont, ReaderSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Row height of a chapter entry
pub const CHAPTER_ROW_HEIGHT: f32 = 50.0;

/// Row height of a bookmark entry
pub const BOOKMARK_ROW_HEIGHT: f32 = 80.0;

/// Chapter list errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChapterListError {
    /// Selected row does not exist in the visible list
    #[error("Index {index} out of range for {segment:?} list of {len}")]
    IndexOutOfRange {
        /// Visible segment
        segment: ListSegment,
        /// Requested row
        index: usize,
        /// Rows in the segment
        len: usize,
    },

    /// Segment control index other than 0 or 1
    #[error("Unknown segment index: {0}")]
    UnknownSegment(usize),
}

/// Result type for chapter list operations
pub type Result<T> = std::result::Result<T, ChapterListError>;

/// An entry in the book's table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocReference {
    /// Chapter title
    pub title: String,
    /// Resource location inside the book
    pub href: String,
    /// Nesting depth, 0 for top-level chapters
    #[serde(default)]
    pub level: u8,
}

impl TocReference {
    /// Create a top-level entry
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self { title: title.into(), href: href.into(), level: 0 }
    }

    /// Set the nesting depth
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }
}

/// A saved reading position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkEntry {
    /// Chapter the bookmark is in
    pub chapter_index: usize,
    /// Page within the chapter
    pub page_index: usize,
    /// Text at the bookmarked position
    pub excerpt: String,
    /// When the bookmark was created
    pub created_at: String,
}

/// Which list is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSegment {
    /// Table of contents
    #[default]
    Chapters,
    /// Bookmarks
    Bookmarks,
}

impl ListSegment {
    /// Segment control title
    pub fn label(&self) -> &'static str {
        match self {
            ListSegment::Chapters => "目录",
            ListSegment::Bookmarks => "书签",
        }
    }

    /// Position in the segment control
    pub fn index(&self) -> usize {
        match self {
            ListSegment::Chapters => 0,
            ListSegment::Bookmarks => 1,
        }
    }

    /// Segment at a control position
    pub fn from_index(index: usize) -> Result<Self> {
        match index {
            0 => Ok(ListSegment::Chapters),
            1 => Ok(ListSegment::Bookmarks),
            other => Err(ChapterListError::UnknownSegment(other)),
        }
    }

    /// The other segment
    pub fn toggled(&self) -> Self {
        match self {
            ListSegment::Chapters => ListSegment::Bookmarks,
            ListSegment::Bookmarks => ListSegment::Chapters,
        }
    }
}

/// A user selection reported to the owner of the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChapterListEvent {
    /// A table of contents entry was picked
    TocSelected {
        /// Row that was picked
        index: usize,
        /// The picked entry
        reference: TocReference,
    },
    /// A bookmark was picked
    BookmarkSelected {
        /// Row that was picked
        index: usize,
        /// The picked bookmark
        bookmark: BookmarkEntry,
    },
}

/// Colors and typeface for the list, taken from the reader configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTheme {
    /// List background, matching the page
    pub background: Color,
    /// Row titles
    pub text: Color,
    /// Row details such as bookmark dates
    pub secondary_text: Color,
    /// Row separators
    pub separator: Color,
    /// Typeface for row titles
    pub font: ReaderFont,
}

/// Presenter state for the chapter and bookmark lists
#[derive(Debug, Clone, Default)]
pub struct ChapterListPresenter {
    segment: ListSegment,
    chapters: Vec<TocReference>,
    bookmarks: Vec<BookmarkEntry>,
    current_chapter: Option<usize>,
}

impl ChapterListPresenter {
    /// Create a presenter showing the table of contents
    pub fn new(chapters: Vec<TocReference>, bookmarks: Vec<BookmarkEntry>) -> Self {
        Self { chapters, bookmarks, ..Default::default() }
    }

    /// Mark the chapter currently being read
    pub fn with_current_chapter(mut self, index: usize) -> Self {
        self.current_chapter = Some(index);
        self
    }

    /// Visible segment
    pub fn segment(&self) -> ListSegment {
        self.segment
    }

    /// Control position of the visible segment
    pub fn segment_index(&self) -> usize {
        self.segment.index()
    }

    /// Show a segment
    pub fn set_segment(&mut self, segment: ListSegment) {
        if self.segment != segment {
            debug!(?segment, "Chapter list segment changed");
        }
        self.segment = segment;
    }

    /// Show the segment at a control position
    pub fn set_segment_index(&mut self, index: usize) -> Result<()> {
        self.set_segment(ListSegment::from_index(index)?);
        Ok(())
    }

    /// Switch to the other segment and return it
    pub fn toggle_segment(&mut self) -> ListSegment {
        self.set_segment(self.segment.toggled());
        self.segment
    }

    /// Table of contents
    pub fn chapters(&self) -> &[TocReference] {
        &self.chapters
    }

    /// Bookmarks
    pub fn bookmarks(&self) -> &[BookmarkEntry] {
        &self.bookmarks
    }

    /// Replace the bookmarks, e.g. after one was added or removed
    pub fn set_bookmarks(&mut self, bookmarks: Vec<BookmarkEntry>) {
        self.bookmarks = bookmarks;
    }

    /// Rows in the visible segment
    pub fn item_count(&self) -> usize {
        match self.segment {
            ListSegment::Chapters => self.chapters.len(),
            ListSegment::Bookmarks => self.bookmarks.len(),
        }
    }

    /// Row height in the visible segment
    pub fn item_height(&self) -> f32 {
        match self.segment {
            ListSegment::Chapters => CHAPTER_ROW_HEIGHT,
            ListSegment::Bookmarks => BOOKMARK_ROW_HEIGHT,
        }
    }

    /// Whether a chapter row should be drawn as the one being read
    pub fn is_current_chapter(&self, index: usize) -> bool {
        self.segment == ListSegment::Chapters && self.current_chapter == Some(index)
    }

    /// Pick a row in the visible segment
    pub fn select(&self, index: usize) -> Result<ChapterListEvent> {
        let out_of_range = |len| ChapterListError::IndexOutOfRange {
            segment: self.segment,
            index,
            len,
        };

        let event = match self.segment {
            ListSegment::Chapters => {
                let reference =
                    self.chapters.get(index).ok_or_else(|| out_of_range(self.chapters.len()))?;
                ChapterListEvent::TocSelected { index, reference: reference.clone() }
            }
            ListSegment::Bookmarks => {
                let bookmark =
                    self.bookmarks.get(index).ok_or_else(|| out_of_range(self.bookmarks.len()))?;
                ChapterListEvent::BookmarkSelected { index, bookmark: bookmark.clone() }
            }
        };

        debug!(segment = ?self.segment, index, "Chapter list selection");
        Ok(event)
    }

    /// Theme the list with the reader's current settings
    pub fn theme(&self, settings: &ReaderSettings) -> ListTheme {
        ListTheme {
            background: settings.palette.page,
            text: settings.palette.text,
            secondary_text: settings.palette.secondary_text,
            separator: settings.palette.separator,
            font: settings.font,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_config::PageColor;

    fn presenter() -> ChapterListPresenter {
        let chapters = vec![
            TocReference::new("第一章", "ch01.xhtml"),
            TocReference::new("第二章", "ch02.xhtml"),
            TocReference::new("第二章 第一节", "ch02.xhtml#s1").with_level(1),
        ];
        let bookmarks = vec![BookmarkEntry {
            chapter_index: 1,
            page_index: 4,
            excerpt: "天色渐晚".to_string(),
            created_at: "2020-10-25T08:00:00Z".to_string(),
        }];
        ChapterListPresenter::new(chapters, bookmarks).with_current_chapter(1)
    }

    #[test]
    fn test_defaults_to_chapters() {
        let list = presenter();
        assert_eq!(list.segment(), ListSegment::Chapters);
        assert_eq!(list.item_count(), 3);
        assert_eq!(list.item_height(), CHAPTER_ROW_HEIGHT);
    }

    #[test]
    fn test_toggle_segment() {
        let mut list = presenter();
        assert_eq!(list.toggle_segment(), ListSegment::Bookmarks);
        assert_eq!(list.item_count(), 1);
        assert_eq!(list.item_height(), BOOKMARK_ROW_HEIGHT);
        assert_eq!(list.toggle_segment(), ListSegment::Chapters);
    }

    #[test]
    fn test_segment_index() {
        let mut list = presenter();
        assert_eq!(list.segment_index(), 0);
        list.set_segment_index(1).unwrap();
        assert_eq!(list.segment(), ListSegment::Bookmarks);
        assert_eq!(list.segment_index(), 1);
        assert_eq!(list.set_segment_index(2), Err(ChapterListError::UnknownSegment(2)));
        assert_eq!(list.segment(), ListSegment::Bookmarks);
    }

    #[test]
    fn test_segment_labels() {
        assert_eq!(ListSegment::Chapters.label(), "目录");
        assert_eq!(ListSegment::Bookmarks.label(), "书签");
    }

    #[test]
    fn test_select_chapter() {
        let list = presenter();
        match list.select(2).unwrap() {
            ChapterListEvent::TocSelected { index, reference } => {
                assert_eq!(index, 2);
                assert_eq!(reference.href, "ch02.xhtml#s1");
                assert_eq!(reference.level, 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_select_bookmark() {
        let mut list = presenter();
        list.set_segment(ListSegment::Bookmarks);

        let event = list.select(0).unwrap();
        assert!(matches!(
            event,
            ChapterListEvent::BookmarkSelected { index: 0, ref bookmark } if bookmark.page_index == 4
        ));
    }

    #[test]
    fn test_select_out_of_range() {
        let mut list = presenter();
        assert_eq!(
            list.select(3),
            Err(ChapterListError::IndexOutOfRange {
                segment: ListSegment::Chapters,
                index: 3,
                len: 3
            })
        );

        list.set_segment(ListSegment::Bookmarks);
        assert!(list.select(1).is_err());
    }

    #[test]
    fn test_current_chapter_only_in_chapter_segment() {
        let mut list = presenter();
        assert!(list.is_current_chapter(1));
        assert!(!list.is_current_chapter(0));

        list.set_segment(ListSegment::Bookmarks);
        assert!(!list.is_current_chapter(1));
    }

    #[test]
    fn test_empty_bookmarks() {
        let mut list = presenter();
        list.set_bookmarks(Vec::new());
        list.set_segment(ListSegment::Bookmarks);
        assert_eq!(list.item_count(), 0);
        assert!(list.select(0).is_err());
    }

    #[test]
    fn test_theme_from_settings() {
        let settings = ReaderSettings {
            page_color: PageColor::DarkBlack,
            palette: PageColor::DarkBlack.palette(),
            font: ReaderFont::Yuanti,
            ..Default::default()
        };

        let theme = presenter().theme(&settings);
        assert_eq!(theme.background.to_hex(), "000000");
        assert_eq!(theme.text.to_hex(), "AAAAAA");
        assert_eq!(theme.separator, Color::white(1.0, 0.05));
        assert_eq!(theme.font, ReaderFont::Yuanti);
    }

    #[test]
    fn test_event_serialization() {
        let event = presenter().select(0).unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "tocSelected");
        assert_eq!(json["reference"]["title"], "第一章");
    }
}
