//! Render state - data structure sent from App layer to UI for rendering

use chrono::{DateTime, Local};

use crate::messages::ui_events::{InputMode, Screen};
use crate::models::{ChapterSummary, FetchError, MangaDetail, MangaSummary};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    pub screen: Screen,
    pub input_mode: InputMode,

    /// Startup health probe result; None until the probe resolves
    pub backend_ok: Option<bool>,

    // Search screen
    pub query: String,
    pub cursor_position: usize,
    pub results: Vec<MangaSummary>,
    pub selected_result: usize,
    pub search_loading: bool,
    pub search_error: Option<FetchError>,

    // Title-detail screen
    pub manga_id: String,
    pub detail: Option<MangaDetail>,
    pub chapters: Vec<ChapterSummary>,
    pub selected_chapter: usize,
    pub chapters_loading: bool,
    pub chapters_error: Option<FetchError>,

    // Reader screen
    pub reader_manga_id: String,
    pub chapter_id: String,
    pub pages: Vec<String>,
    pub current_page: usize,
    pub pages_loading: bool,
    pub pages_error: Option<FetchError>,

    // Popups
    pub show_help: bool,
    pub show_goto: bool,
    pub goto_buffer: String,

    // Status line
    pub status: String,
    pub last_fetch: Option<DateTime<Local>>,
    pub last_time_ms: u64,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            screen: Screen::Home,
            input_mode: InputMode::Normal,
            backend_ok: None,
            query: String::new(),
            cursor_position: 0,
            results: Vec::new(),
            selected_result: 0,
            search_loading: false,
            search_error: None,
            manga_id: String::new(),
            detail: None,
            chapters: Vec::new(),
            selected_chapter: 0,
            chapters_loading: false,
            chapters_error: None,
            reader_manga_id: String::new(),
            chapter_id: String::new(),
            pages: Vec::new(),
            current_page: 0,
            pages_loading: false,
            pages_error: None,
            show_help: false,
            show_goto: false,
            goto_buffer: String::new(),
            status: String::new(),
            last_fetch: None,
            last_time_ms: 0,
        }
    }
}
