// src/traverse/pipeline.rs
// =============================================================================
// Pipelined traversal: a bounded pool of family jobs, no wave barrier.
//
// Breadth-first waits for the slowest family of a wave before starting the
// next one. Here a single coordinator keeps up to `workers` families in
// flight, and the moment any of them finishes, its newly found parent
// families are queued and the free slot is refilled.
//
// One job = claim the family, fetch its members, report their parents.
// The coordinator owns the visited set, so (like breadth-first) no family is
// ever requested twice.
//
// Rust concepts:
// - FuturesUnordered: A set of running futures that yields results in
//   completion order, like buffer_unordered but we can keep adding to it
// =============================================================================

use super::Crawler;
use crate::fetch::Transport;
use crate::tree::{FamilyId, Tree};
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::{HashSet, VecDeque};
use tracing::info;

impl<T: Transport> Crawler<T> {
    pub async fn pipelined(&self, root: FamilyId, workers: usize) -> Tree {
        let tree = Tree::new();
        let workers = workers.max(1);
        let mut visited = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);
        let mut in_flight = FuturesUnordered::new();
        let mut jobs = 0usize;

        loop {
            while in_flight.len() < workers {
                let Some(id) = queue.pop_front() else { break };
                in_flight.push(self.family_job(id, &tree));
                jobs += 1;
            }

            // None: nothing running and nothing queued
            let Some(parents) = in_flight.next().await else { break };

            queue.extend(parents.into_iter().filter(|id| visited.insert(*id)));
        }
        drop(in_flight);

        info!(
            jobs,
            families = tree.family_count(),
            persons = tree.person_count(),
            "pipelined traversal finished"
        );
        tree
    }

    async fn family_job(&self, id: FamilyId, tree: &Tree) -> Vec<FamilyId> {
        match self.claim_family(id, tree).await {
            Some(members) => self.fetch_members(&members, tree).await,
            None => Vec::new(),
        }
    }
}
