//! Command handlers - business logic for processing UI events
//!
//! Every screen activation maps to the fetches that screen needs, and every
//! resolved fetch replaces the owning screen's list wholesale. Responses are
//! matched against the per-screen pending id; anything else is stale and
//! dropped.

use crate::app::state::{AppState, MangaState, ReaderState};
use crate::messages::ui_events::{InputMode, Screen};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::routes::Route;

impl AppState {
    // ========================
    // Startup
    // ========================

    /// Commands issued once when the app starts
    pub fn startup(&mut self) -> Vec<NetworkCommand> {
        let id = self.next_id();
        self.pending_health = Some(id);
        vec![NetworkCommand::CheckHealth { id }]
    }

    // ========================
    // Navigation
    // ========================

    pub fn go_home(&mut self) -> Vec<NetworkCommand> {
        self.navigate_to(Route::Home)
    }

    pub fn go_search(&mut self) -> Vec<NetworkCommand> {
        self.navigate_to(Route::Search)
    }

    pub fn open_manga(&mut self, manga_id: String) -> Vec<NetworkCommand> {
        self.navigate_to(Route::Manga { manga_id })
    }

    pub fn open_reader(&mut self, manga_id: String, chapter_id: String) -> Vec<NetworkCommand> {
        self.navigate_to(Route::Reader {
            manga_id,
            chapter_id,
        })
    }

    /// Navigate forward, remembering the current route for GoBack
    pub fn navigate_to(&mut self, route: Route) -> Vec<NetworkCommand> {
        if route == self.current_route() {
            return Vec::new();
        }
        let from = self.current_route();
        self.back_stack.push(from);
        self.enter(route)
    }

    /// Pop the route stack and re-activate the previous screen. The previous
    /// screen's display state was discarded when it was left, so activation
    /// fetches run again.
    pub fn go_back(&mut self) -> Vec<NetworkCommand> {
        match self.back_stack.pop() {
            Some(route) => self.enter(route),
            None => Vec::new(),
        }
    }

    /// Re-activate the current screen: a fresh fetch with a fresh generation
    pub fn refresh(&mut self) -> Vec<NetworkCommand> {
        match self.screen {
            Screen::Home => {
                let id = self.next_id();
                self.pending_health = Some(id);
                self.backend_ok = None;
                vec![NetworkCommand::CheckHealth { id }]
            }
            Screen::Search => self.submit_search(),
            Screen::Manga => self.activate_manga(),
            Screen::Reader => self.activate_reader(),
        }
    }

    /// Switch the active screen and run its activation fetches. Display state
    /// belonging to the entered screen is reset first; each screen's lists
    /// live only as long as the screen itself.
    fn enter(&mut self, route: Route) -> Vec<NetworkCommand> {
        self.input_mode = InputMode::Normal;
        self.screen = route.screen();
        tracing::info!(path = %route.path(), "navigating");

        match route {
            Route::Home => Vec::new(),
            Route::Search => {
                self.search.results = Vec::new();
                self.search.selected = 0;
                self.search.loading = false;
                self.search.error = None;
                self.search.pending = None;
                Vec::new()
            }
            Route::Manga { manga_id } => {
                self.manga = MangaState::for_id(manga_id);
                self.activate_manga()
            }
            Route::Reader {
                manga_id,
                chapter_id,
            } => {
                self.reader = ReaderState::for_ids(manga_id, chapter_id);
                self.activate_reader()
            }
        }
    }

    // ========================
    // Activation fetches
    // ========================

    /// One chapter-list request plus one detail request for the routed id
    fn activate_manga(&mut self) -> Vec<NetworkCommand> {
        self.manga.loading = true;
        self.manga.error = None;

        let detail_id = self.next_id();
        let chapters_id = self.next_id();
        self.manga.pending_detail = Some(detail_id);
        self.manga.pending_chapters = Some(chapters_id);

        vec![
            NetworkCommand::FetchManga {
                id: detail_id,
                manga_id: self.manga.manga_id.clone(),
            },
            NetworkCommand::FetchChapters {
                id: chapters_id,
                manga_id: self.manga.manga_id.clone(),
            },
        ]
    }

    /// One page-list request for the routed chapter id
    fn activate_reader(&mut self) -> Vec<NetworkCommand> {
        self.reader.loading = true;
        self.reader.error = None;

        let id = self.next_id();
        self.reader.pending = Some(id);

        vec![NetworkCommand::FetchPages {
            id,
            chapter_id: self.reader.chapter_id.clone(),
        }]
    }

    // ========================
    // Search
    // ========================

    /// Issue a search for the current query text, as typed. A submit while a
    /// previous search is in flight simply supersedes it: the pending id
    /// moves to the new request and the old response will arrive stale.
    pub fn submit_search(&mut self) -> Vec<NetworkCommand> {
        if self.input_mode == InputMode::Editing {
            self.stop_editing();
        }

        let id = self.next_id();
        self.search.pending = Some(id);
        self.search.loading = true;
        self.search.error = None;

        vec![NetworkCommand::FetchSearch {
            id,
            query: self.search.query.clone(),
        }]
    }

    // ========================
    // Query editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.screen == Screen::Search {
            self.input_mode = InputMode::Editing;
            self.search.cursor_position = self.search.query.len();
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn enter_char(&mut self, c: char) {
        let pos = self.search.cursor_position;
        if pos <= self.search.query.len() {
            self.search.query.insert(pos, c);
            self.search.cursor_position = pos + c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        if self.search.cursor_position > 0 {
            let pos = self.search.cursor_position;
            let prev = self.search.query[..pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.search.query.remove(prev);
            self.search.cursor_position = prev;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.search.cursor_position > 0 {
            let new_pos = self.search.query[..self.search.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.search.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.search.cursor_position < self.search.query.len() {
            let new_pos = self.search.query[self.search.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.search.cursor_position + i)
                .unwrap_or(self.search.query.len());
            self.search.cursor_position = new_pos;
        }
    }

    // ========================
    // List selection
    // ========================

    pub fn select_next(&mut self) {
        match self.screen {
            Screen::Search => {
                if !self.search.results.is_empty() {
                    self.search.selected =
                        (self.search.selected + 1) % self.search.results.len();
                }
            }
            Screen::Manga => {
                if !self.manga.chapters.is_empty() {
                    self.manga.selected = (self.manga.selected + 1) % self.manga.chapters.len();
                }
            }
            _ => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.screen {
            Screen::Search => {
                if !self.search.results.is_empty() {
                    self.search.selected = self
                        .search
                        .selected
                        .checked_sub(1)
                        .unwrap_or(self.search.results.len() - 1);
                }
            }
            Screen::Manga => {
                if !self.manga.chapters.is_empty() {
                    self.manga.selected = self
                        .manga
                        .selected
                        .checked_sub(1)
                        .unwrap_or(self.manga.chapters.len() - 1);
                }
            }
            _ => {}
        }
    }

    /// Open whatever is selected: a search hit routes to its title screen, a
    /// chapter row routes to the reader.
    pub fn activate_selected(&mut self) -> Vec<NetworkCommand> {
        match self.screen {
            Screen::Search => {
                match self.search.results.get(self.search.selected).cloned() {
                    Some(hit) => self.open_manga(hit.id),
                    None => Vec::new(),
                }
            }
            Screen::Manga => {
                match self.manga.chapters.get(self.manga.selected).cloned() {
                    Some(chapter) => {
                        self.open_reader(self.manga.manga_id.clone(), chapter.id)
                    }
                    None => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }

    // ========================
    // Reader paging
    // ========================

    pub fn next_page(&mut self) {
        if self.reader.current_page + 1 < self.reader.pages.len() {
            self.reader.current_page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.reader.current_page = self.reader.current_page.saturating_sub(1);
    }

    pub fn first_page(&mut self) {
        self.reader.current_page = 0;
    }

    pub fn last_page(&mut self) {
        self.reader.current_page = self.reader.pages.len().saturating_sub(1);
    }

    // ========================
    // Goto popup
    // ========================

    pub fn open_goto(&mut self) {
        self.show_goto = true;
        self.goto_buffer.clear();
    }

    pub fn goto_char(&mut self, c: char) {
        self.goto_buffer.push(c);
    }

    pub fn goto_backspace(&mut self) {
        self.goto_buffer.pop();
    }

    pub fn cancel_goto(&mut self) {
        self.show_goto = false;
        self.goto_buffer.clear();
    }

    pub fn submit_goto(&mut self) -> Vec<NetworkCommand> {
        let input = std::mem::take(&mut self.goto_buffer);
        self.show_goto = false;

        match Route::parse(&input) {
            Some(route) => {
                self.status.clear();
                self.navigate_to(route)
            }
            None => {
                self.status = format!("unrecognized path: {}", input);
                Vec::new()
            }
        }
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Response handling
    // ========================

    /// Apply a network response. A response is only rendered when its id
    /// matches the owning screen's pending id; superseded and post-navigation
    /// responses fail the match and are dropped.
    pub fn handle_response(&mut self, response: NetworkResponse) {
        let id = response.id();

        match response {
            NetworkResponse::SearchResults {
                results, time_ms, ..
            } => {
                if self.search.pending == Some(id) {
                    self.search.results = results;
                    self.search.selected = 0;
                    self.search.loading = false;
                    self.search.error = None;
                    self.search.pending = None;
                    self.mark_fetch(time_ms);
                } else {
                    tracing::debug!(id, "dropping stale search response");
                }
            }

            NetworkResponse::Manga {
                detail, time_ms, ..
            } => {
                if self.manga.pending_detail == Some(id) {
                    self.manga.detail = Some(detail);
                    self.manga.pending_detail = None;
                    self.mark_fetch(time_ms);
                } else {
                    tracing::debug!(id, "dropping stale detail response");
                }
            }

            NetworkResponse::Chapters {
                chapters, time_ms, ..
            } => {
                if self.manga.pending_chapters == Some(id) {
                    self.manga.chapters = chapters;
                    self.manga.selected = 0;
                    self.manga.loading = false;
                    self.manga.error = None;
                    self.manga.pending_chapters = None;
                    self.mark_fetch(time_ms);
                } else {
                    tracing::debug!(id, "dropping stale chapter response");
                }
            }

            NetworkResponse::Pages { pages, time_ms, .. } => {
                if self.reader.pending == Some(id) {
                    self.reader.pages = pages;
                    self.reader.current_page = 0;
                    self.reader.loading = false;
                    self.reader.error = None;
                    self.reader.pending = None;
                    self.mark_fetch(time_ms);
                } else {
                    tracing::debug!(id, "dropping stale page response");
                }
            }

            NetworkResponse::Health { reachable, .. } => {
                if self.pending_health == Some(id) {
                    self.backend_ok = Some(reachable);
                    self.pending_health = None;
                }
            }

            NetworkResponse::Failed { error, time_ms, .. } => {
                // The failed list keeps whatever it was showing; only the
                // error slot changes.
                if self.search.pending == Some(id) {
                    self.search.loading = false;
                    self.search.error = Some(error);
                    self.search.pending = None;
                    self.mark_fetch(time_ms);
                } else if self.manga.pending_chapters == Some(id) {
                    self.manga.loading = false;
                    self.manga.error = Some(error);
                    self.manga.pending_chapters = None;
                    self.mark_fetch(time_ms);
                } else if self.manga.pending_detail == Some(id) {
                    self.manga.error = Some(error);
                    self.manga.pending_detail = None;
                    self.mark_fetch(time_ms);
                } else if self.reader.pending == Some(id) {
                    self.reader.loading = false;
                    self.reader.error = Some(error);
                    self.reader.pending = None;
                    self.mark_fetch(time_ms);
                } else if self.pending_health == Some(id) {
                    self.backend_ok = Some(false);
                    self.pending_health = None;
                } else {
                    tracing::debug!(id, %error, "dropping stale error response");
                }
            }
        }
    }

    fn mark_fetch(&mut self, time_ms: u64) {
        self.last_fetch = Some(chrono::Local::now());
        self.last_time_ms = time_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChapterNumber, ChapterSummary, FetchError, MangaSummary};

    fn search_command(commands: &[NetworkCommand]) -> (u64, String) {
        match commands {
            [NetworkCommand::FetchSearch { id, query }] => (*id, query.clone()),
            other => panic!("expected a single search command, got {:?}", other),
        }
    }

    fn naruto_hit() -> MangaSummary {
        serde_json::from_str(r#"{"id":1,"title":"Naruto"}"#).unwrap()
    }

    #[test]
    fn test_submit_search_issues_one_request_with_query_text() {
        let mut state = AppState::new();
        state.go_search();
        state.search.query = String::from("naruto");

        let commands = state.submit_search();
        let (_, query) = search_command(&commands);
        assert_eq!(query, "naruto");
    }

    #[test]
    fn test_empty_query_is_submitted_unvalidated() {
        let mut state = AppState::new();
        state.go_search();

        let commands = state.submit_search();
        let (_, query) = search_command(&commands);
        assert_eq!(query, "");
    }

    #[test]
    fn test_search_response_replaces_results_and_routes_to_manga() {
        let mut state = AppState::new();
        state.go_search();
        state.search.query = String::from("naruto");

        let (id, _) = search_command(&state.submit_search());
        state.handle_response(NetworkResponse::SearchResults {
            id,
            results: vec![naruto_hit()],
            time_ms: 12,
        });

        assert_eq!(state.search.results.len(), 1);
        assert_eq!(state.search.results[0].title, "Naruto");
        assert!(!state.search.loading);

        // Opening the hit routes to /manga/1
        let commands = state.activate_selected();
        assert_eq!(state.current_route().path(), "/manga/1");
        assert!(commands
            .iter()
            .any(|c| matches!(c, NetworkCommand::FetchChapters { manga_id, .. } if manga_id == "1")));
    }

    #[test]
    fn test_stale_search_response_is_discarded() {
        let mut state = AppState::new();
        state.go_search();

        state.search.query = String::from("old");
        let (first_id, _) = search_command(&state.submit_search());
        state.search.query = String::from("new");
        let (second_id, _) = search_command(&state.submit_search());

        // The superseded response arrives late and must not render
        state.handle_response(NetworkResponse::SearchResults {
            id: first_id,
            results: vec![naruto_hit()],
            time_ms: 300,
        });
        assert!(state.search.results.is_empty());
        assert!(state.search.loading);

        state.handle_response(NetworkResponse::SearchResults {
            id: second_id,
            results: Vec::new(),
            time_ms: 5,
        });
        assert!(state.search.results.is_empty());
        assert!(!state.search.loading);
    }

    #[test]
    fn test_search_is_idempotent() {
        let mut state = AppState::new();
        state.go_search();
        state.search.query = String::from("naruto");

        let (id, _) = search_command(&state.submit_search());
        state.handle_response(NetworkResponse::SearchResults {
            id,
            results: vec![naruto_hit()],
            time_ms: 10,
        });
        let first = state.search.results.clone();

        let (id, _) = search_command(&state.submit_search());
        state.handle_response(NetworkResponse::SearchResults {
            id,
            results: vec![naruto_hit()],
            time_ms: 10,
        });

        assert_eq!(state.search.results, first);
    }

    #[test]
    fn test_open_manga_issues_one_chapter_request() {
        let mut state = AppState::new();
        let commands = state.open_manga(String::from("5"));

        let chapter_fetches: Vec<_> = commands
            .iter()
            .filter(|c| matches!(c, NetworkCommand::FetchChapters { manga_id, .. } if manga_id == "5"))
            .collect();
        assert_eq!(chapter_fetches.len(), 1);
        assert_eq!(state.screen, Screen::Manga);
    }

    #[test]
    fn test_chapter_list_length_matches_response() {
        let mut state = AppState::new();
        state.open_manga(String::from("5"));
        let id = state.manga.pending_chapters.unwrap();

        let chapters: Vec<ChapterSummary> =
            serde_json::from_str(r#"[{"id":9,"chapter":1},{"id":10,"chapter":2}]"#).unwrap();
        state.handle_response(NetworkResponse::Chapters {
            id,
            chapters: chapters.clone(),
            time_ms: 8,
        });

        assert_eq!(state.manga.chapters.len(), chapters.len());
        assert_eq!(state.manga.chapters[0].label(), "Chapter 1");
    }

    #[test]
    fn test_selecting_chapter_routes_to_reader() {
        let mut state = AppState::new();
        state.open_manga(String::from("5"));
        let id = state.manga.pending_chapters.unwrap();

        state.handle_response(NetworkResponse::Chapters {
            id,
            chapters: vec![ChapterSummary {
                id: String::from("9"),
                chapter: Some(ChapterNumber::Number(1.0)),
                title: None,
            }],
            time_ms: 8,
        });

        let commands = state.activate_selected();
        assert_eq!(state.current_route().path(), "/reader/5/9");
        assert!(matches!(
            commands.as_slice(),
            [NetworkCommand::FetchPages { chapter_id, .. }] if chapter_id == "9"
        ));
    }

    #[test]
    fn test_reader_preserves_response_order() {
        let mut state = AppState::new();
        state.open_reader(String::from("5"), String::from("9"));
        let id = state.reader.pending.unwrap();

        let pages = vec![
            String::from("http://x/1.png"),
            String::from("http://x/2.png"),
        ];
        state.handle_response(NetworkResponse::Pages {
            id,
            pages: pages.clone(),
            time_ms: 20,
        });

        assert_eq!(state.reader.pages, pages);
        assert_eq!(state.reader.current_page, 0);
    }

    #[test]
    fn test_reader_paging_saturates_at_ends() {
        let mut state = AppState::new();
        state.open_reader(String::from("5"), String::from("9"));
        let id = state.reader.pending.unwrap();
        state.handle_response(NetworkResponse::Pages {
            id,
            pages: vec![String::from("a"), String::from("b")],
            time_ms: 1,
        });

        state.prev_page();
        assert_eq!(state.reader.current_page, 0);
        state.next_page();
        state.next_page();
        assert_eq!(state.reader.current_page, 1);
        state.first_page();
        assert_eq!(state.reader.current_page, 0);
        state.last_page();
        assert_eq!(state.reader.current_page, 1);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_list_and_sets_error() {
        let mut state = AppState::new();
        state.go_search();
        state.search.query = String::from("naruto");

        let (id, _) = search_command(&state.submit_search());
        state.handle_response(NetworkResponse::SearchResults {
            id,
            results: vec![naruto_hit()],
            time_ms: 10,
        });

        let (id, _) = search_command(&state.submit_search());
        state.handle_response(NetworkResponse::Failed {
            id,
            error: FetchError::Status(500),
            time_ms: 4,
        });

        assert_eq!(state.search.results.len(), 1);
        assert_eq!(state.search.error, Some(FetchError::Status(500)));
        assert!(!state.search.loading);
    }

    #[test]
    fn test_go_back_reactivates_previous_screen() {
        let mut state = AppState::new();
        state.go_search();
        state.open_manga(String::from("5"));
        state.open_reader(String::from("5"), String::from("9"));

        // Back to the title screen re-issues its activation fetches
        let commands = state.go_back();
        assert_eq!(state.screen, Screen::Manga);
        assert!(commands
            .iter()
            .any(|c| matches!(c, NetworkCommand::FetchChapters { .. })));

        let commands = state.go_back();
        assert_eq!(state.screen, Screen::Search);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_navigation_discards_view_state() {
        let mut state = AppState::new();
        state.go_search();
        let (id, _) = search_command(&state.submit_search());
        state.handle_response(NetworkResponse::SearchResults {
            id,
            results: vec![naruto_hit()],
            time_ms: 10,
        });

        state.open_manga(String::from("1"));
        state.go_back();

        // Search results were owned by the left screen and are gone
        assert!(state.search.results.is_empty());
    }

    #[test]
    fn test_response_after_navigation_is_dropped() {
        let mut state = AppState::new();
        state.open_manga(String::from("5"));
        let id = state.manga.pending_chapters.unwrap();

        // Navigating away re-keys the screen; the in-flight response is stale
        state.open_manga(String::from("6"));
        state.handle_response(NetworkResponse::Chapters {
            id,
            chapters: vec![ChapterSummary {
                id: String::from("9"),
                chapter: None,
                title: None,
            }],
            time_ms: 90,
        });

        assert!(state.manga.chapters.is_empty());
        assert_eq!(state.manga.manga_id, "6");
    }

    #[test]
    fn test_goto_navigates_on_valid_path() {
        let mut state = AppState::new();
        state.open_goto();
        for c in "/manga/5".chars() {
            state.goto_char(c);
        }

        let commands = state.submit_goto();
        assert_eq!(state.screen, Screen::Manga);
        assert_eq!(state.manga.manga_id, "5");
        assert!(!commands.is_empty());
        assert!(!state.show_goto);
    }

    #[test]
    fn test_goto_reports_invalid_path() {
        let mut state = AppState::new();
        state.open_goto();
        for c in "/bogus".chars() {
            state.goto_char(c);
        }

        let commands = state.submit_goto();
        assert!(commands.is_empty());
        assert_eq!(state.screen, Screen::Home);
        assert!(state.status.contains("unrecognized"));
    }

    #[test]
    fn test_health_probe_sets_indicator() {
        let mut state = AppState::new();
        let commands = state.startup();
        let id = match commands.as_slice() {
            [NetworkCommand::CheckHealth { id }] => *id,
            other => panic!("expected health probe, got {:?}", other),
        };

        state.handle_response(NetworkResponse::Health { id, reachable: true });
        assert_eq!(state.backend_ok, Some(true));
    }

    #[test]
    fn test_editing_moves_cursor_over_multibyte_chars() {
        let mut state = AppState::new();
        state.go_search();
        state.start_editing();
        for c in "呪術".chars() {
            state.enter_char(c);
        }
        assert_eq!(state.search.query, "呪術");

        state.move_cursor_left();
        state.delete_char();
        assert_eq!(state.search.query, "術");
    }
}
