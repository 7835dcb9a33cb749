//! Chapter List Integration Tests
//!
//! Drives the chapter list the way the reader screen does: theme it from the
//! live configuration, re-theme on change events, and route selections.

use app_ui::{
    BarStyle, BookmarkEntry, ChapterListEvent, ChapterListPresenter, ListSegment, ReaderChrome,
    TocReference,
};
use reader_config::{ConfigEvent, PageColor, ReaderConfigOptions, ReaderDisplayConfig, ReaderFont};
use std::sync::Arc;
use storage::MemoryPreferenceStore;

fn reader_config() -> ReaderDisplayConfig {
    let mut config = ReaderDisplayConfig::new(
        Arc::new(MemoryPreferenceStore::new()),
        ReaderConfigOptions::default(),
    );
    config.initialize();
    config
}

fn book_lists() -> ChapterListPresenter {
    let chapters = (1..=12)
        .map(|n| TocReference::new(format!("Chapter {n}"), format!("ch{n:02}.xhtml")))
        .collect();
    let bookmarks = vec![
        BookmarkEntry {
            chapter_index: 2,
            page_index: 0,
            excerpt: "It was a bright cold day in April".to_string(),
            created_at: "2020-10-25T09:15:00Z".to_string(),
        },
        BookmarkEntry {
            chapter_index: 7,
            page_index: 3,
            excerpt: "and the clocks were striking thirteen".to_string(),
            created_at: "2020-10-26T21:40:00Z".to_string(),
        },
    ];
    ChapterListPresenter::new(chapters, bookmarks).with_current_chapter(2)
}

#[test]
fn test_list_rethemes_on_page_color_change() {
    let mut config = reader_config();
    let mut events = config.subscribe();
    let list = book_lists();

    let before = list.theme(config.settings());
    assert_eq!(before.background.to_hex(), "F8F8F8");

    config.set_page_color(PageColor::DarkBlack);
    let event = events.try_recv().unwrap();
    assert!(event.affects_colors());
    assert_eq!(event, ConfigEvent::PageColorChanged(PageColor::DarkBlack));

    let after = list.theme(config.settings());
    assert_eq!(after.background.to_hex(), "000000");
    assert_eq!(after.text.to_hex(), "AAAAAA");
    assert_eq!(ReaderChrome::from_settings(config.settings()).bar_style, BarStyle::Black);
}

#[test]
fn test_list_uses_selected_font() {
    let mut config = reader_config();
    config.set_font(ReaderFont::Kaiti);

    assert_eq!(book_lists().theme(config.settings()).font, ReaderFont::Kaiti);
}

#[test]
fn test_selection_routes_by_segment() {
    let mut list = book_lists();

    match list.select(2).unwrap() {
        ChapterListEvent::TocSelected { index, reference } => {
            assert_eq!(index, 2);
            assert_eq!(reference.href, "ch03.xhtml");
        }
        other => panic!("expected a chapter selection, got {other:?}"),
    }
    assert!(list.is_current_chapter(2));

    list.set_segment_index(ListSegment::Bookmarks.index()).unwrap();
    match list.select(1).unwrap() {
        ChapterListEvent::BookmarkSelected { index, bookmark } => {
            assert_eq!(index, 1);
            assert_eq!(bookmark.chapter_index, 7);
        }
        other => panic!("expected a bookmark selection, got {other:?}"),
    }

    assert!(list.select(2).is_err());
}
