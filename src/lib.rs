// src/lib.rs
// =============================================================================
// pedigree-crawler: rebuild a family tree from a remote genealogy service.
//
// Modules, leaf first:
// - config:   Base URL, timeouts, retry and concurrency limits
// - tree:     Person / Family types and the shared, insert-once Tree
// - fetch:    Throttled, retrying GET client and the Person/Family fetchers
// - traverse: Depth-first, breadth-first and pipelined crawls over the graph
// - cli:      clap definitions for the binary
// =============================================================================

pub mod cli;
pub mod config;
pub mod fetch;
pub mod traverse;
pub mod tree;

#[cfg(test)]
mod testing;
