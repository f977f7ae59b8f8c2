// src/traverse/breadth.rs
// =============================================================================
// Breadth-first traversal: one wave of families at a time.
//
// How it works:
// 1. Start with a frontier of one family (the root)
// 2. Fetch every family in the frontier at once
// 3. Claim the ones not yet in the Tree and collect their members
// 4. Fetch all those members at once
// 5. The parent families of those members that we have never queued form
//    the next frontier
// 6. Repeat until a frontier comes out empty
//
// Unlike depth-first, only this one loop decides what gets queued, and it
// keeps its own visited set. So no family is ever requested twice.
//
// Rust concepts:
// - HashSet::insert returns false for a value already present, which makes
//   "mark visited and check" a single call
// =============================================================================

use super::Crawler;
use crate::fetch::Transport;
use crate::tree::{FamilyId, PersonId, Tree};
use futures::future::join_all;
use std::collections::HashSet;
use tracing::info;

impl<T: Transport> Crawler<T> {
    pub async fn breadth_first(&self, root: FamilyId) -> Tree {
        let tree = Tree::new();
        let mut visited = HashSet::from([root]);
        let mut frontier = vec![root];
        let mut wave = 0;

        while !frontier.is_empty() {
            wave += 1;

            // Fetch the whole frontier at once; failed fetches come back None
            let families = join_all(frontier.iter().map(|id| self.fetcher.family(*id))).await;

            // Claim the new families and gather everyone they point at
            let mut members: Vec<PersonId> = Vec::new();
            for family in families.into_iter().flatten() {
                let ids: Vec<PersonId> = family.member_ids().collect();
                if tree.insert_family(family) {
                    members.extend(ids);
                }
            }

            // Second batch of the wave: all members at once
            let parents = self.fetch_members(&members, &tree).await;

            // Parent families never queued before form the next wave
            let next: Vec<FamilyId> = parents.into_iter().filter(|id| visited.insert(*id)).collect();

            info!(
                wave,
                families = frontier.len(),
                members = members.len(),
                next = next.len(),
                "wave finished"
            );
            frontier = next;
        }

        info!(
            waves = wave,
            families = tree.family_count(),
            persons = tree.person_count(),
            "breadth-first traversal finished"
        );
        tree
    }
}
