// src/traverse/mod.rs
// =============================================================================
// Traversal engine: rebuild the whole tree reachable from one family.
//
// Three strategies, same result:
// - depth:    recursive fan-out, every parent family is its own branch
// - breadth:  wave by wave, one coordinator owns the visited set
// - pipeline: like breadth, but no wave barrier; up to N families in flight
//
// All of them share the same two steps, implemented here:
// 1. claim_family: fetch a family and insert it into the Tree. Only the
//    branch whose insert wins goes on to fetch the members.
// 2. fetch_members: fetch the husband, wife and children concurrently,
//    insert them, and report which families they are children of.
//
// The Tree is the only thing the branches share. Every "already there?"
// decision is a single Tree call, so no two branches can both add the same
// ID.
//
// A person already in the Tree is never fetched again, so their parent
// family gets exactly one chance: if that family's fetch runs out of
// retries, it is left out even when another family later lists the same
// person. Unresolved families are dropped rather than retried from a second
// path.
// =============================================================================

mod breadth;
mod depth;
mod pipeline;

use crate::fetch::{EntityFetcher, Transport};
use crate::tree::{FamilyId, PersonId, Tree};
use futures::future::join_all;
use std::collections::HashSet;
use tracing::debug;

pub const DEFAULT_WORKERS: usize = 100;

/// Which traversal to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    DepthFirst,
    BreadthFirst,
    /// Keep up to `workers` families in flight, no wave barrier
    Pipelined { workers: usize },
}

pub struct Crawler<T> {
    fetcher: EntityFetcher<T>,
}

impl<T: Transport> Crawler<T> {
    pub fn new(fetcher: EntityFetcher<T>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &EntityFetcher<T> {
        &self.fetcher
    }

    /// Runs the chosen strategy from `root`. The returned Tree is empty if
    /// the root family could not be fetched.
    pub async fn run(&self, strategy: Strategy, root: FamilyId) -> Tree {
        match strategy {
            Strategy::DepthFirst => self.depth_first(root).await,
            Strategy::BreadthFirst => self.breadth_first(root).await,
            Strategy::Pipelined { workers } => self.pipelined(root, workers).await,
        }
    }

    // Fetches the family and tries to insert it.
    //
    // Returns the member IDs only if this call inserted the family. None
    // means either "not found" or "someone else already has it"; in both
    // cases there is nothing more to do for this ID.
    async fn claim_family(&self, id: FamilyId, tree: &Tree) -> Option<Vec<PersonId>> {
        let family = self.fetcher.family(id).await?;
        let members: Vec<PersonId> = family.member_ids().collect();
        let family_id = family.id;

        if tree.insert_family(family) {
            debug!(family = %family_id, members = members.len(), "family added");
            Some(members)
        } else {
            debug!(family = %family_id, "family already in tree");
            None
        }
    }

    // Fetches every person in `ids` at once and waits for all of them.
    //
    // Persons the tree already holds are skipped: whoever inserted them also
    // took care of their parent family. Returns the family each newly
    // inserted person is a child of (no duplicates, unordered).
    async fn fetch_members(&self, ids: &[PersonId], tree: &Tree) -> Vec<FamilyId> {
        let mut wanted = HashSet::new();
        let pending: Vec<PersonId> = ids
            .iter()
            .copied()
            .filter(|id| wanted.insert(*id) && !tree.contains_person(*id))
            .collect();

        let fetched = join_all(pending.iter().map(|id| self.fetcher.person(*id))).await;

        let mut parents = HashSet::new();
        for person in fetched.into_iter().flatten() {
            let parent = person.parent_id;
            let person_id = person.id;
            if tree.insert_person(person) {
                debug!(person = %person_id, "person added");
                parents.extend(parent);
            }
        }

        parents.into_iter().collect()
    }
}
