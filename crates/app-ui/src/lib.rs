//! User interface models for iRead
//!
//! This crate holds the view-facing pieces that consume the reader
//! configuration: the chapter/bookmark list presenter and the navigation
//! chrome colors. Neither talks to persistence; both read the current
//! [`reader_config::ReaderSettings`].
//!
//! # Modules
//!
//! - [`chapter_list`] - Table of contents and bookmark list presenter
//! - [`theme`] - Navigation chrome derived from the page-color preset
//!
//! # Example
//!
//! ```rust
//! use app_ui::chapter_list::{ChapterListEvent, ChapterListPresenter, TocReference};
//!
//! let list = ChapterListPresenter::new(vec![TocReference::new("Chapter 1", "ch01.xhtml")], vec![]);
//! let event = list.select(0).unwrap();
//! assert!(matches!(event, ChapterListEvent::TocSelected { index: 0, .. }));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chapter_list;
pub mod theme;

// Re-export commonly used types
pub use chapter_list::{
    BookmarkEntry, ChapterListError, ChapterListEvent, ChapterListPresenter, ListSegment,
    ListTheme, TocReference,
};
pub use theme::{BarStyle, ReaderChrome};
