// src/tree/mod.rs
// =============================================================================
// The family tree being rebuilt.
//
// Submodules:
// - model: Person, Family and typed IDs (plus decoding from the wire format)
// - store: The shared, insert-once Tree that traversals fill in
// =============================================================================

mod model;
mod store;

pub use model::{Family, FamilyId, MissingId, Person, PersonId};
pub use store::{Tree, TreeSnapshot};
