use indicatif::ProgressIterator;
use log::{debug, info};

use crate::clustering::labels::{ClusterAssignments, ClusterLabels};
use crate::error::Result;
use crate::mod_types::Float;
use crate::space::space_generics::{insert_checked, IndexSet, RegionQuery};
use crate::utils;

// Pseudocode from wikipedia, with the seed set split in two so the set being
// walked is never grown while it is iterated.
//
// DBSCAN(DB, distFunc, eps, minPts) {
//     C := -1
//     for each point P in database DB {
//         if visited(P) then continue
//         mark P visited
//         Neighbors N := RangeQuery(DB, distFunc, P, eps)     /* P excluded */
//         if |N| < minPts then { noise(P) := true; continue }
//         C := C + 1; label(P) := C
//         Frontier F := N
//         while F not empty {
//             Staged S := {}
//             for each point Q in F {
//                 if not visited(Q) {
//                     mark Q visited
//                     Neighbors M := RangeQuery(DB, distFunc, Q, eps)
//                     if |M| >= minPts then S := S ∪ (M \ F)
//                 }
//                 if label(Q) = undefined then label(Q) := C
//             }
//             F := S
//         }
//     }
// }

/// Rows already processed by the traversal. Only ever grows.
struct VisitedSet {
    marks: Vec<bool>,
}

impl VisitedSet {
    fn new(num_rows: usize) -> Result<Self> {
        let mut marks = Vec::new();
        marks.try_reserve_exact(num_rows)?;
        marks.resize(num_rows, false);
        Ok(Self { marks })
    }

    /// Returns true when `index` was not visited before.
    fn insert(&mut self, index: usize) -> bool {
        !std::mem::replace(&mut self.marks[index], true)
    }
}

struct DBScanTimers {
    main: utils::ContextTimer,
    seed_query_timer: utils::ContextTimer,
    expansion_query_timer: utils::ContextTimer,
}

impl DBScanTimers {
    fn new() -> Self {
        let timer = utils::ContextTimer::new("dbscan", false, utils::LogLevel::DEBUG);
        let seed_query_timer = timer.start_sub_timer("seed_region_query");
        let expansion_query_timer = timer.start_sub_timer("expansion_region_query");
        Self {
            main: timer,
            seed_query_timer,
            expansion_query_timer,
        }
    }

    fn report_if_gt_us(&self, min_time: u128) {
        if self.main.cumtime.as_micros() > min_time {
            self.main.report();
            self.seed_query_timer.report();
            self.expansion_query_timer.report();
        }
    }
}

struct NeighborCountMetrics {
    seed_counts: utils::RollingStats,
    expansion_counts: utils::RollingStats,
}

impl NeighborCountMetrics {
    fn new() -> Self {
        Self {
            seed_counts: utils::RollingStats::default(),
            expansion_counts: utils::RollingStats::default(),
        }
    }

    fn report(&self) {
        for (name, stats) in [("seed", &self.seed_counts), ("expansion", &self.expansion_counts)] {
            if stats.count() == 0 {
                continue;
            }
            debug!(
                "{} region queries: {}, neighbors mean {:.02} sd {:.02} min {:?} max {:?}",
                name,
                stats.count(),
                stats.mean(),
                stats.sd(),
                stats.min(),
                stats.max()
            );
        }
    }
}

struct DBSCANRunnerState {
    cluster_labels: ClusterLabels,
    visited: VisitedSet,
    timers: DBScanTimers,
    neighbor_metrics: NeighborCountMetrics,
}

impl DBSCANRunnerState {
    fn new(num_rows: usize) -> Result<Self> {
        Ok(Self {
            cluster_labels: ClusterLabels::new(num_rows)?,
            visited: VisitedSet::new(num_rows)?,
            timers: DBScanTimers::new(),
            neighbor_metrics: NeighborCountMetrics::new(),
        })
    }

    fn create_progress_bar(&self, len: usize, visible: bool) -> indicatif::ProgressBar {
        if visible {
            indicatif::ProgressBar::new(len as u64)
        } else {
            indicatif::ProgressBar::hidden()
        }
    }
}

/// Drives the traversal over any [`RegionQuery`]. It never looks at the
/// corpus representation, only at the neighbor sets it returns.
pub(crate) struct DBSCANRunner<'a, T, Q: ?Sized> {
    corpus: &'a Q,
    eps: T,
    min_pts: usize,
    progress: bool,
}

impl<'a, T, Q> DBSCANRunner<'a, T, Q>
where
    T: Float,
    Q: RegionQuery<T> + ?Sized,
{
    pub(crate) fn new(corpus: &'a Q, eps: T, min_pts: usize, progress: bool) -> Self {
        Self {
            corpus,
            eps,
            min_pts,
            progress,
        }
    }

    pub(crate) fn run(&self) -> Result<ClusterAssignments> {
        let num_rows = self.corpus.num_rows();
        let mut state = DBSCANRunnerState::new(num_rows)?;

        let progbar = state.create_progress_bar(num_rows, self.progress);
        for point_index in (0..num_rows).progress_with(progbar) {
            self.process_single_point(point_index, &mut state)?;
        }

        state.timers.main.stop(false);
        state.timers.report_if_gt_us(1_000_000);
        state.neighbor_metrics.report();

        let out = state.cluster_labels.finish();
        info!(
            "DBSCAN (eps={}, min_pts={}) found {} clusters, {}/{} rows assigned, {} seed-time noise rows",
            self.eps,
            self.min_pts,
            out.num_clusters,
            out.num_assigned(),
            num_rows,
            out.num_noise()
        );
        Ok(out)
    }

    fn process_single_point(&self, point_index: usize, state: &mut DBSCANRunnerState) -> Result<()> {
        if !state.visited.insert(point_index) {
            return Ok(());
        }

        let neighbors = self.find_neighbors(
            point_index,
            &mut state.timers.seed_query_timer,
            &mut state.neighbor_metrics.seed_counts,
        )?;
        if !self.is_core_point(&neighbors) {
            state.cluster_labels.set_noise(point_index);
            return Ok(());
        }

        let cluster_id = state.cluster_labels.set_new_cluster(point_index);
        self.expand_cluster(cluster_id, neighbors, state)
    }

    fn find_neighbors(
        &self,
        point_index: usize,
        timer: &mut utils::ContextTimer,
        counts: &mut utils::RollingStats,
    ) -> Result<IndexSet> {
        timer.reset_start();
        let neighbors = self.corpus.region_query(point_index, self.eps)?;
        timer.stop(false);
        counts.add(neighbors.len() as f64);
        Ok(neighbors)
    }

    #[inline]
    fn is_core_point(&self, neighbors: &IndexSet) -> bool {
        neighbors.len() >= self.min_pts
    }

    fn expand_cluster(
        &self,
        cluster_id: i64,
        neighbors: IndexSet,
        state: &mut DBSCANRunnerState,
    ) -> Result<()> {
        let mut frontier = neighbors;
        loop {
            let staged = self.expand_frontier(cluster_id, &frontier, state)?;
            if staged.is_empty() {
                return Ok(());
            }
            frontier = staged;
        }
    }

    /// One pass over `frontier`. Neighbors of newly visited core points that
    /// are not in `frontier` are collected and returned as the next frontier.
    fn expand_frontier(
        &self,
        cluster_id: i64,
        frontier: &IndexSet,
        state: &mut DBSCANRunnerState,
    ) -> Result<IndexSet> {
        let mut staged = IndexSet::new();

        for &candidate in frontier.iter() {
            if state.visited.insert(candidate) {
                let local_neighbors = self.find_neighbors(
                    candidate,
                    &mut state.timers.expansion_query_timer,
                    &mut state.neighbor_metrics.expansion_counts,
                )?;
                if self.is_core_point(&local_neighbors) {
                    for neighbor in local_neighbors {
                        if !frontier.contains(&neighbor) {
                            insert_checked(&mut staged, neighbor)?;
                        }
                    }
                }
            }
            state.cluster_labels.assign_if_unassigned(candidate, cluster_id);
        }

        Ok(staged)
    }
}
