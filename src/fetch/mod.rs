// src/fetch/mod.rs
// =============================================================================
// Everything that talks to the remote genealogy service.
//
// Submodules:
// - client: Throttled, retrying GET (plus the Transport trait and the
//   reqwest-backed HttpTransport)
// - entity: Person-by-ID and Family-by-ID on top of the client
// - error: Why one attempt failed (only used for logging and retry decisions)
// =============================================================================

mod client;
mod entity;
mod error;

pub use client::{FetchClient, HttpTransport, Transport};
pub use entity::EntityFetcher;
pub use error::FetchError;
