// src/traverse/depth.rs
// =============================================================================
// Depth-first traversal: recursive fan-out.
//
// For one family ID:
// 1. Fetch the family and claim it in the Tree (insert before doing any
//    more work, so racing branches see it as taken)
// 2. Fetch all members at once and wait for the whole batch
// 3. For every parent family that is not in the Tree yet, start a branch;
//    wait for all branches before returning
//
// Two branches can both see "not in the Tree yet" for the same family and
// both fetch it. Only one of them wins the insert, the other stops there.
// That costs one extra request, never a duplicate entry.
//
// Rust concepts:
// - BoxFuture: An async fn cannot call itself directly (its future type
//   would be infinitely large), so the recursive step returns a boxed future
// - join_all: Run all branches concurrently, resume when every one is done
// =============================================================================

use super::Crawler;
use crate::fetch::Transport;
use crate::tree::{FamilyId, Tree};
use futures::future::{join_all, BoxFuture, FutureExt};
use tracing::{debug, info};

impl<T: Transport> Crawler<T> {
    pub async fn depth_first(&self, root: FamilyId) -> Tree {
        let tree = Tree::new();
        self.visit_family(root, &tree, 0).await;

        info!(
            families = tree.family_count(),
            persons = tree.person_count(),
            "depth-first traversal finished"
        );
        tree
    }

    fn visit_family<'a>(&'a self, id: FamilyId, tree: &'a Tree, depth: usize) -> BoxFuture<'a, ()> {
        async move {
            // Not found, or another branch got there first
            let Some(members) = self.claim_family(id, tree).await else {
                return;
            };

            // Fetch the whole batch of members, then keep only the parent
            // families nobody has claimed yet
            let parents: Vec<FamilyId> = self
                .fetch_members(&members, tree)
                .await
                .into_iter()
                .filter(|parent| !tree.contains_family(*parent))
                .collect();

            // One branch per parent family; this call finishes when all do
            if !parents.is_empty() {
                debug!(family = %id, depth, branches = parents.len(), "descending");
                join_all(parents.into_iter().map(|parent| self.visit_family(parent, tree, depth + 1))).await;
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fetcher, MapTransport};
    use std::time::Duration;

    // F1's husband and wife are cousins: both grandparent families (F2, F3)
    // descend from F4, so two branches race towards F4
    fn shared_ancestor() -> MapTransport {
        MapTransport::new()
            .with_family(1, 1, 2, &[9])
            .with_person(1, 2)
            .with_person(2, 3)
            .with_person(9, 1)
            .with_family(2, 4, 5, &[1])
            .with_family(3, 6, 7, &[2])
            .with_person(4, 4)
            .with_person(5, 0)
            .with_person(6, 4)
            .with_person(7, 0)
            .with_family(4, 10, 11, &[4, 6])
            .with_person(10, 0)
            .with_person(11, 0)
            .with_latency(Duration::from_millis(20))
    }

    #[tokio::test]
    async fn test_shared_ancestor_is_stored_once() {
        let crawler = Crawler::new(fetcher(shared_ancestor()));
        let tree = crawler.depth_first(FamilyId::new(1).unwrap()).await;

        assert_eq!(tree.family_count(), 4);
        assert_eq!(tree.person_count(), 9);
        assert!(tree.contains_family(FamilyId::new(4).unwrap()));

        // However many branches fetched F4, only the winner fetched its
        // members
        let transport = crawler.fetcher().client().transport();
        assert!(transport.calls("family/4") >= 1);
        assert_eq!(transport.calls("person/10"), 1);
        assert_eq!(transport.calls("person/11"), 1);
    }

    #[tokio::test]
    async fn test_root_without_parents_stops_at_root() {
        let transport = MapTransport::new()
            .with_family(5, 50, 51, &[])
            .with_person(50, 0)
            .with_person(51, 0);
        let crawler = Crawler::new(fetcher(transport));

        let tree = crawler.depth_first(FamilyId::new(5).unwrap()).await;

        assert_eq!(tree.family_count(), 1);
        assert_eq!(tree.person_count(), 2);
        assert_eq!(crawler.fetcher().client().transport().total_calls(), 3);
    }
}
