//! Network layer - async HTTP execution against the catalog backend

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
