//! Message types passed between the three layers

pub mod network;
pub mod render;
pub mod ui_events;

pub use network::{NetworkCommand, NetworkResponse};
pub use render::RenderState;
pub use ui_events::UiEvent;
