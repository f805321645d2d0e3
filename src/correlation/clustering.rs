use crate::correlation::models::{Cluster, ScoredPair};
use crate::error::{AppError, Result};
use crate::models::Alert;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Union-find over alert indices, with path compression and union by rank
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Find the root of `x`, pointing every node on the path straight at it
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Merge the sets holding `a` and `b`; returns false if already joined
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }

        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
        true
    }

    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

/// Turns accepted pairs into clusters of alert indices
pub struct ClusteringEngine;

impl ClusteringEngine {
    /// Compute the connected components induced by `accepted`.
    ///
    /// Every non-"normal" alert lands in exactly one cluster; an alert with no
    /// accepted pair forms a singleton. Clusters are ordered by their smallest
    /// member and members are ascending.
    pub fn cluster(alerts: &[Alert], accepted: &[ScoredPair]) -> Result<Vec<Cluster>> {
        let mut sets = DisjointSet::new(alerts.len());
        let mut merges = 0usize;

        for pair in accepted {
            if pair.first >= alerts.len() || pair.second >= alerts.len() {
                return Err(AppError::Processing(format!(
                    "Pair ({}, {}) is outside a batch of {} alerts",
                    pair.first,
                    pair.second,
                    alerts.len()
                )));
            }

            let (a, b) = (&alerts[pair.first], &alerts[pair.second]);
            // Linking through a normal alert or across labels would merge unrelated threats
            if !a.is_threat() || !b.is_threat() || a.label != b.label {
                warn!(
                    first = pair.first,
                    second = pair.second,
                    "Ignoring pair that does not join two same-label threat alerts"
                );
                continue;
            }

            if sets.union(pair.first, pair.second) {
                merges += 1;
            }
        }

        let mut clusters: Vec<Cluster> = Vec::new();
        let mut position_by_root: HashMap<usize, usize> = HashMap::new();

        for (index, alert) in alerts.iter().enumerate() {
            if !alert.is_threat() {
                continue;
            }
            let root = sets.find(index);
            match position_by_root.get(&root) {
                Some(&position) => clusters[position].members.push(index),
                None => {
                    position_by_root.insert(root, clusters.len());
                    clusters.push(Cluster {
                        root,
                        members: vec![index],
                    });
                }
            }
        }

        debug!(
            accepted_pairs = accepted.len(),
            merges = merges,
            clusters = clusters.len(),
            "Clustered threat alerts"
        );

        Ok(clusters)
    }
}
