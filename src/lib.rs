//! # Tankobon TUI
//!
//! A terminal browser for a manga catalog backend.
//!
//! ## Features
//! - Title search against the catalog's search endpoint
//! - Chapter list per title, with title detail
//! - Reader paging through a chapter's image URLs, in server order
//! - Route-addressed screens (`/`, `/search`, `/manga/:id`,
//!   `/reader/:mangaId/:chapterId`) with a goto popup and back navigation
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod config;
pub mod constants;
pub mod messages;
pub mod models;
pub mod network;
pub mod routes;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use config::Config;
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{ChapterSummary, FetchError, MangaDetail, MangaSummary};
pub use network::NetworkActor;
pub use routes::Route;
