use log::debug;

use crate::clustering::labels::ClusterAssignments;
use crate::clustering::runner::DBSCANRunner;
use crate::config::{check_pairing, CorpusKind, Metric};
use crate::error::Result;
use crate::mod_types::Float;
use crate::space::dense::DenseCorpus;
use crate::space::metrics::{CosineAbove, EuclideanWithin};
use crate::space::space_generics::RegionQuery;
use crate::space::sparse::SparseCorpus;

/// Region query chosen at runtime, e.g. from a [`crate::config::DbscanConfig`].
pub type BoxedRegionQuery<'a, T> = Box<dyn RegionQuery<T> + Send + Sync + 'a>;

/// Runs DBSCAN over any corpus representation.
///
/// `eps` and `min_pts` are expected to be strictly positive; they are not
/// checked again here (see [`crate::config::DbscanConfig::validate`]).
pub fn dbscan<T, Q>(corpus: &Q, eps: T, min_pts: usize) -> Result<ClusterAssignments>
where
    T: Float,
    Q: RegionQuery<T> + ?Sized,
{
    DBSCANRunner::new(corpus, eps, min_pts, false).run()
}

/// Builds the representation for a (corpus, metric) pair.
///
/// Dense corpora borrow `data`; sparse corpora copy the non-zero entries out
/// of it, so `data` can be dropped right after for those. Pairings without an
/// implementation are rejected before the buffer is touched.
pub fn build_region_query<'a, T: Float>(
    data: &'a [T],
    rows: usize,
    cols: usize,
    corpus: CorpusKind,
    metric: Metric,
) -> Result<BoxedRegionQuery<'a, T>> {
    check_pairing(corpus, metric)?;
    debug!("Building {} corpus with {} metric", corpus, metric);

    let out: BoxedRegionQuery<'a, T> = match (corpus, metric) {
        (CorpusKind::Dense, _) => Box::new(DenseCorpus::new(data, rows, cols)?),
        (CorpusKind::Sparse, Metric::Euclidean) => Box::new(
            SparseCorpus::<T, EuclideanWithin<T>>::from_dense(data, rows, cols)?,
        ),
        (CorpusKind::Sparse, Metric::Cosine) => Box::new(
            SparseCorpus::<T, CosineAbove<T>>::from_dense(data, rows, cols)?,
        ),
    };
    Ok(out)
}

/// A fixed corpus ready to be clustered with different parameters.
///
/// ```
/// use ndscan::Dbscan;
/// use ndscan::space::dense::DenseCorpus;
///
/// let points = [0.0f64, 0.0, 0.0, 0.1, 0.1, 0.0, 10.0, 10.0];
/// let corpus = DenseCorpus::new(&points, 4, 2).unwrap();
/// let out = Dbscan::new(corpus).run(0.5, 2).unwrap();
/// assert_eq!(out.labels, vec![0, 0, 0, -1]);
/// assert_eq!(out.noise, vec![false, false, false, true]);
/// ```
pub struct Dbscan<'a, T: Float> {
    corpus: BoxedRegionQuery<'a, T>,
    progress: bool,
}

impl<'a, T: Float> Dbscan<'a, T> {
    pub fn new<Q>(corpus: Q) -> Self
    where
        Q: RegionQuery<T> + Send + Sync + 'a,
    {
        Self {
            corpus: Box::new(corpus),
            progress: false,
        }
    }

    pub fn from_boxed(corpus: BoxedRegionQuery<'a, T>) -> Self {
        Self {
            corpus,
            progress: false,
        }
    }

    pub fn from_buffer(
        data: &'a [T],
        rows: usize,
        cols: usize,
        corpus: CorpusKind,
        metric: Metric,
    ) -> Result<Self> {
        Ok(Self::from_boxed(build_region_query(data, rows, cols, corpus, metric)?))
    }

    /// Shows a progress bar over the outer traversal.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn num_rows(&self) -> usize {
        self.corpus.num_rows()
    }

    pub fn num_cols(&self) -> usize {
        self.corpus.num_cols()
    }

    pub fn run(&self, eps: T, min_pts: usize) -> Result<ClusterAssignments> {
        DBSCANRunner::new(&*self.corpus, eps, min_pts, self.progress).run()
    }
}
