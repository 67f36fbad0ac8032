//! Network messages - communication between App and Network layers

use crate::models::{ChapterSummary, FetchError, MangaDetail, MangaSummary};

/// Commands sent from the App layer to the Network layer. Every fetch carries
/// the request id the issuing view recorded as pending; the id is how stale
/// responses are told apart from current ones.
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// `/api/search?title=<query>`
    FetchSearch { id: u64, query: String },
    /// `/api/manga/:id`
    FetchManga { id: u64, manga_id: String },
    /// `/api/chapters/:id`
    FetchChapters { id: u64, manga_id: String },
    /// `/api/pages/:chapterId`
    FetchPages { id: u64, chapter_id: String },
    /// `/api/health`
    CheckHealth { id: u64 },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from the Network layer back to the App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    SearchResults {
        id: u64,
        results: Vec<MangaSummary>,
        time_ms: u64,
    },
    Manga {
        id: u64,
        detail: MangaDetail,
        time_ms: u64,
    },
    Chapters {
        id: u64,
        chapters: Vec<ChapterSummary>,
        time_ms: u64,
    },
    Pages {
        id: u64,
        pages: Vec<String>,
        time_ms: u64,
    },
    Health {
        id: u64,
        reachable: bool,
    },
    /// Classified failure for any of the fetches above
    Failed {
        id: u64,
        error: FetchError,
        time_ms: u64,
    },
}

impl NetworkResponse {
    /// Get the request id from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::SearchResults { id, .. } => *id,
            NetworkResponse::Manga { id, .. } => *id,
            NetworkResponse::Chapters { id, .. } => *id,
            NetworkResponse::Pages { id, .. } => *id,
            NetworkResponse::Health { id, .. } => *id,
            NetworkResponse::Failed { id, .. } => *id,
        }
    }
}
