use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Label of a row that no cluster ever claimed.
pub const UNASSIGNED: i64 = -1;

/// Output of a clustering run, one entry per corpus row.
///
/// `labels[i]` is the cluster id of row `i` (ids start at 0 and follow
/// discovery order) or [`UNASSIGNED`]. `noise[i]` records whether row `i`
/// failed the density check when it was picked as a seed by the outer
/// traversal. The flag is never cleared, so a noise row can still carry a
/// cluster id if a later expansion reached it as a border point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignments {
    pub labels: Vec<i64>,
    pub noise: Vec<bool>,
    pub num_clusters: usize,
}

impl ClusterAssignments {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Cluster id of `row`. `None` for unassigned rows, rows past the end
    /// and ids outside `0..num_clusters`.
    pub fn label(&self, row: usize) -> Option<usize> {
        let label = usize::try_from(*self.labels.get(row)?).ok()?;
        (label < self.num_clusters).then_some(label)
    }

    /// Rows that ended up in some cluster.
    pub fn num_assigned(&self) -> usize {
        self.labels.iter().filter(|l| **l != UNASSIGNED).count()
    }

    pub fn num_noise(&self) -> usize {
        self.noise.iter().filter(|n| **n).count()
    }

    /// Member count per cluster id. Ids outside `0..num_clusters` are not
    /// counted.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.num_clusters];
        for label in self.labels.iter() {
            let slot = usize::try_from(*label).ok().and_then(|l| sizes.get_mut(l));
            if let Some(size) = slot {
                *size += 1;
            }
        }
        sizes
    }

    pub fn members(&self, cluster_id: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == cluster_id as i64)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Mutable labelling state used while the traversal runs.
pub(crate) struct ClusterLabels {
    labels: Vec<i64>,
    noise: Vec<bool>,
    last_cluster: i64,
}

impl ClusterLabels {
    pub(crate) fn new(num_rows: usize) -> Result<Self> {
        let mut labels = Vec::new();
        labels.try_reserve_exact(num_rows)?;
        labels.resize(num_rows, UNASSIGNED);

        let mut noise = Vec::new();
        noise.try_reserve_exact(num_rows)?;
        noise.resize(num_rows, false);

        Ok(Self {
            labels,
            noise,
            last_cluster: UNASSIGNED,
        })
    }

    /// Opens the next cluster id and gives it to `index`.
    pub(crate) fn set_new_cluster(&mut self, index: usize) -> i64 {
        self.last_cluster += 1;
        self.labels[index] = self.last_cluster;
        self.last_cluster
    }

    /// First assignment wins.
    pub(crate) fn assign_if_unassigned(&mut self, index: usize, cluster_id: i64) {
        if self.labels[index] == UNASSIGNED {
            self.labels[index] = cluster_id;
        }
    }

    pub(crate) fn set_noise(&mut self, index: usize) {
        self.noise[index] = true;
    }

    pub(crate) fn num_clusters(&self) -> usize {
        (self.last_cluster + 1) as usize
    }

    pub(crate) fn finish(self) -> ClusterAssignments {
        let num_clusters = self.num_clusters();
        ClusterAssignments {
            labels: self.labels,
            noise: self.noise,
            num_clusters,
        }
    }
}

#[cfg(test)]
mod test_labels {
    use super::*;

    #[test]
    fn test_first_assignment_wins() {
        let mut labels = ClusterLabels::new(4).unwrap();
        assert_eq!(labels.num_clusters(), 0);

        assert_eq!(labels.set_new_cluster(0), 0);
        labels.assign_if_unassigned(1, 0);
        assert_eq!(labels.set_new_cluster(2), 1);
        labels.assign_if_unassigned(1, 1);
        labels.set_noise(3);

        let out = labels.finish();
        assert_eq!(out.labels, vec![0, 0, 1, UNASSIGNED]);
        assert_eq!(out.noise, vec![false, false, false, true]);
        assert_eq!(out.num_clusters, 2);
        assert_eq!(out.cluster_sizes(), vec![2, 1]);
        assert_eq!(out.members(0), vec![0, 1]);
        assert_eq!(out.num_assigned(), 3);
        assert_eq!(out.num_noise(), 1);
        assert_eq!(out.label(3), None);
        assert_eq!(out.label(2), Some(1));
    }

    #[test]
    fn test_out_of_range_ids_are_ignored() {
        // Values built by hand or read back from JSON need not be consistent.
        let out = ClusterAssignments {
            labels: vec![0, 5, -3, UNASSIGNED, 1],
            noise: vec![false; 5],
            num_clusters: 2,
        };
        assert_eq!(out.label(0), Some(0));
        assert_eq!(out.label(1), None);
        assert_eq!(out.label(2), None);
        assert_eq!(out.label(3), None);
        assert_eq!(out.label(4), Some(1));
        assert_eq!(out.label(17), None);
        assert_eq!(out.cluster_sizes(), vec![1, 1]);
    }
}
