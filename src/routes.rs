//! Client-side routes with structured parameters
//!
//! The four logical screens are addressed by paths, same as a browser client
//! would expose them. Identifiers travel as typed route parameters; views
//! never read them back out of a raw location string.

use crate::messages::ui_events::Screen;

/// A navigational location
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Search,
    Manga { manga_id: String },
    Reader { manga_id: String, chapter_id: String },
}

impl Route {
    /// Parse a route path. Query strings and fragments are stripped and
    /// trailing slashes are tolerated, so `/manga/5/?from=search` still
    /// resolves to the title-detail route for id `5`.
    pub fn parse(input: &str) -> Option<Route> {
        let path = input
            .trim()
            .split(|c| c == '?' || c == '#')
            .next()
            .unwrap_or("");

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["search"] => Some(Route::Search),
            ["manga", id] => Some(Route::Manga {
                manga_id: (*id).to_string(),
            }),
            ["reader", manga_id, chapter_id] => Some(Route::Reader {
                manga_id: (*manga_id).to_string(),
                chapter_id: (*chapter_id).to_string(),
            }),
            _ => None,
        }
    }

    /// Canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Route::Home => String::from("/"),
            Route::Search => String::from("/search"),
            Route::Manga { manga_id } => format!("/manga/{}", manga_id),
            Route::Reader {
                manga_id,
                chapter_id,
            } => format!("/reader/{}/{}", manga_id, chapter_id),
        }
    }

    /// The screen this route renders
    pub fn screen(&self) -> Screen {
        match self {
            Route::Home => Screen::Home,
            Route::Search => Screen::Search,
            Route::Manga { .. } => Screen::Manga,
            Route::Reader { .. } => Screen::Reader,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_screens() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse("/search"), Some(Route::Search));
        assert_eq!(
            Route::parse("/manga/5"),
            Some(Route::Manga {
                manga_id: "5".to_string()
            })
        );
        assert_eq!(
            Route::parse("/reader/5/9"),
            Some(Route::Reader {
                manga_id: "5".to_string(),
                chapter_id: "9".to_string()
            })
        );
    }

    #[test]
    fn test_parse_tolerates_trailing_slash_and_query() {
        assert_eq!(
            Route::parse("/manga/5/"),
            Some(Route::Manga {
                manga_id: "5".to_string()
            })
        );
        assert_eq!(
            Route::parse("/manga/5?from=search"),
            Some(Route::Manga {
                manga_id: "5".to_string()
            })
        );
        assert_eq!(Route::parse("/search/#results"), Some(Route::Search));
    }

    #[test]
    fn test_parse_rejects_unknown_paths() {
        assert_eq!(Route::parse("/bogus"), None);
        assert_eq!(Route::parse("/manga"), None);
        assert_eq!(Route::parse("/reader/5"), None);
        assert_eq!(Route::parse("/reader/5/9/extra"), None);
    }

    #[test]
    fn test_path_round_trips() {
        for path in ["/", "/search", "/manga/5", "/reader/5/9"] {
            let route = Route::parse(path).unwrap();
            assert_eq!(route.path(), path);
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }
}
