use crate::mod_types::Float;
use crate::space::kernel;
use crate::space::sparse::SparseVector;

/// Neighbor test between two sparse rows under a fixed threshold.
///
/// Implementations must be symmetric in their arguments and free of side
/// effects, the region query calls them with the query row second.
pub trait SparseMetric<T: Float>: Send + Sync {
    const NAME: &'static str;

    fn with_threshold(threshold: T) -> Self;
    fn test(&self, x: &SparseVector<T>, y: &SparseVector<T>) -> bool;
}

/// Walks the non-zero entries of two rows in column order, calling `f` with
/// the pair of values for every column present in at least one of them.
/// Missing entries are passed as zero.
#[inline]
fn merge_walk<T: Float, F: FnMut(T, T)>(x: &SparseVector<T>, y: &SparseVector<T>, mut f: F) {
    let (xi, xv) = (x.indices(), x.values());
    let (yi, yv) = (y.indices(), y.values());
    let mut i = 0;
    let mut j = 0;

    while i < xi.len() && j < yi.len() {
        if xi[i] < yi[j] {
            f(xv[i], T::zero());
            i += 1;
        } else if yi[j] < xi[i] {
            f(T::zero(), yv[j]);
            j += 1;
        } else {
            f(xv[i], yv[j]);
            i += 1;
            j += 1;
        }
    }
    for v in &xv[i..] {
        f(*v, T::zero());
    }
    for v in &yv[j..] {
        f(T::zero(), *v);
    }
}

/// `|x - y|^2 <= eps^2`. The threshold is squared once here so the pairwise
/// test never takes a square root.
#[derive(Debug, Clone, Copy)]
pub struct EuclideanWithin<T> {
    eps_squared: T,
}

impl<T: Float> EuclideanWithin<T> {
    pub fn new(eps: T) -> Self {
        Self {
            eps_squared: eps * eps,
        }
    }

    pub fn eps_squared(&self) -> T {
        self.eps_squared
    }

    /// Dense rows go through the vectorized kernel.
    #[inline]
    pub fn test_dense(&self, x: &[T], y: &[T]) -> bool {
        kernel::squared_distance(x, y) <= self.eps_squared
    }

    pub fn squared_distance_sparse(x: &SparseVector<T>, y: &SparseVector<T>) -> T {
        let mut sum = T::zero();
        merge_walk(x, y, |a, b| {
            let d = a - b;
            sum = sum + d * d;
        });
        sum
    }
}

impl<T: Float> SparseMetric<T> for EuclideanWithin<T> {
    const NAME: &'static str = "euclidean";

    fn with_threshold(threshold: T) -> Self {
        Self::new(threshold)
    }

    /// A row without any non-zero entry is never a neighbor of anything.
    #[inline]
    fn test(&self, x: &SparseVector<T>, y: &SparseVector<T>) -> bool {
        if x.is_empty() || y.is_empty() {
            return false;
        }
        Self::squared_distance_sparse(x, y) <= self.eps_squared
    }
}

/// `dot(x, y) / (|x| * |y|) > threshold`. Larger values mean more similar,
/// so unlike a distance this passes when the score is *above* the threshold.
#[derive(Debug, Clone, Copy)]
pub struct CosineAbove<T> {
    threshold: T,
}

impl<T: Float> CosineAbove<T> {
    pub fn new(threshold: T) -> Self {
        Self { threshold }
    }

    /// `None` when either row has zero norm.
    pub fn similarity(x: &SparseVector<T>, y: &SparseVector<T>) -> Option<T> {
        let mut dot = T::zero();
        let mut sum_x = T::zero();
        let mut sum_y = T::zero();
        merge_walk(x, y, |a, b| {
            dot = dot + a * b;
            sum_x = sum_x + a * a;
            sum_y = sum_y + b * b;
        });

        let denom = sum_x.sqrt() * sum_y.sqrt();
        if denom == T::zero() {
            None
        } else {
            Some(dot / denom)
        }
    }
}

impl<T: Float> SparseMetric<T> for CosineAbove<T> {
    const NAME: &'static str = "cosine";

    fn with_threshold(threshold: T) -> Self {
        Self::new(threshold)
    }

    #[inline]
    fn test(&self, x: &SparseVector<T>, y: &SparseVector<T>) -> bool {
        match Self::similarity(x, y) {
            Some(sim) => sim > self.threshold,
            None => false,
        }
    }
}
