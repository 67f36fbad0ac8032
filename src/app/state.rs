//! App state - pure data structure with no I/O logic
//!
//! Each screen owns its display state exclusively. Lists are replaced
//! wholesale when a fetch resolves and discarded when the screen is
//! re-activated; nothing is shared across screens.

use chrono::{DateTime, Local};

use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::RenderState;
use crate::models::{ChapterSummary, FetchError, MangaDetail, MangaSummary};
use crate::routes::Route;

/// Search screen state
#[derive(Clone, Debug, Default)]
pub struct SearchState {
    pub query: String,
    pub cursor_position: usize,
    pub results: Vec<MangaSummary>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<FetchError>,
    /// Id of the latest in-flight search; responses with any other id are stale
    pub pending: Option<u64>,
}

/// Title-detail screen state
#[derive(Clone, Debug, Default)]
pub struct MangaState {
    pub manga_id: String,
    pub detail: Option<MangaDetail>,
    pub chapters: Vec<ChapterSummary>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<FetchError>,
    pub pending_detail: Option<u64>,
    pub pending_chapters: Option<u64>,
}

impl MangaState {
    pub fn for_id(manga_id: String) -> Self {
        MangaState {
            manga_id,
            ..Default::default()
        }
    }
}

/// Reader screen state
#[derive(Clone, Debug, Default)]
pub struct ReaderState {
    pub manga_id: String,
    pub chapter_id: String,
    /// Page source URLs, kept strictly in response order
    pub pages: Vec<String>,
    pub current_page: usize,
    pub loading: bool,
    pub error: Option<FetchError>,
    pub pending: Option<u64>,
}

impl ReaderState {
    pub fn for_ids(manga_id: String, chapter_id: String) -> Self {
        ReaderState {
            manga_id,
            chapter_id,
            ..Default::default()
        }
    }
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub screen: Screen,
    pub input_mode: InputMode,

    /// Routes to return to on GoBack, oldest first
    pub back_stack: Vec<Route>,

    pub search: SearchState,
    pub manga: MangaState,
    pub reader: ReaderState,

    // Startup health probe
    pub backend_ok: Option<bool>,
    pub pending_health: Option<u64>,

    // Request id source, shared by every fetch
    pub next_request_id: u64,

    // Popups
    pub show_help: bool,
    pub show_goto: bool,
    pub goto_buffer: String,

    // Status line
    pub status: String,
    pub last_fetch: Option<DateTime<Local>>,
    pub last_time_ms: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            screen: Screen::Home,
            input_mode: InputMode::Normal,
            back_stack: Vec::new(),
            search: SearchState::default(),
            manga: MangaState::default(),
            reader: ReaderState::default(),
            backend_ok: None,
            pending_health: None,
            next_request_id: 1,
            show_help: false,
            show_goto: false,
            goto_buffer: String::new(),
            status: String::new(),
            last_fetch: None,
            last_time_ms: 0,
        }
    }

    /// Generate a unique request id
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// The route matching the active screen
    pub fn current_route(&self) -> Route {
        match self.screen {
            Screen::Home => Route::Home,
            Screen::Search => Route::Search,
            Screen::Manga => Route::Manga {
                manga_id: self.manga.manga_id.clone(),
            },
            Screen::Reader => Route::Reader {
                manga_id: self.reader.manga_id.clone(),
                chapter_id: self.reader.chapter_id.clone(),
            },
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            screen: self.screen,
            input_mode: self.input_mode,
            backend_ok: self.backend_ok,
            query: self.search.query.clone(),
            cursor_position: self.search.cursor_position,
            results: self.search.results.clone(),
            selected_result: self.search.selected,
            search_loading: self.search.loading,
            search_error: self.search.error.clone(),
            manga_id: self.manga.manga_id.clone(),
            detail: self.manga.detail.clone(),
            chapters: self.manga.chapters.clone(),
            selected_chapter: self.manga.selected,
            chapters_loading: self.manga.loading,
            chapters_error: self.manga.error.clone(),
            reader_manga_id: self.reader.manga_id.clone(),
            chapter_id: self.reader.chapter_id.clone(),
            pages: self.reader.pages.clone(),
            current_page: self.reader.current_page,
            pages_loading: self.reader.loading,
            pages_error: self.reader.error.clone(),
            show_help: self.show_help,
            show_goto: self.show_goto,
            goto_buffer: self.goto_buffer.clone(),
            status: self.status.clone(),
            last_fetch: self.last_fetch,
            last_time_ms: self.last_time_ms,
        }
    }
}
