use std::marker::PhantomData;

use log::debug;

use crate::error::{Error, Result};
use crate::mod_types::Float;
use crate::space::metrics::{EuclideanWithin, SparseMetric};
use crate::space::space_generics::{insert_checked, IndexSet, RegionQuery};

/// Non-zero entries of one row, sorted by column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector<T> {
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Float> SparseVector<T> {
    pub fn from_dense(row: &[T]) -> Result<Self> {
        let nnz = row.iter().filter(|v| **v != T::zero()).count();
        let mut indices = Vec::new();
        let mut values = Vec::new();
        indices.try_reserve_exact(nnz)?;
        values.try_reserve_exact(nnz)?;

        for (column, value) in row.iter().enumerate() {
            if *value != T::zero() {
                indices.push(column);
                values.push(*value);
            }
        }
        Ok(Self { indices, values })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Owned sparse copy of a dense corpus, one [`SparseVector`] per row.
///
/// The conversion happens once in [`SparseCorpus::from_dense`]. The neighbor
/// test is chosen with `M`, Euclidean unless stated otherwise.
#[derive(Debug, Clone)]
pub struct SparseCorpus<T, M = EuclideanWithin<T>> {
    rows: Vec<SparseVector<T>>,
    cols: usize,
    _metric: PhantomData<fn() -> M>,
}

impl<T: Float, M: SparseMetric<T>> SparseCorpus<T, M> {
    pub fn from_dense(data: &[T], rows: usize, cols: usize) -> Result<Self> {
        let expected = rows.checked_mul(cols).ok_or(Error::InvalidParameter {
            name: "rows",
            message: format!("{} rows of {} columns overflows usize", rows, cols),
        })?;
        if expected != data.len() {
            return Err(Error::DimensionMismatch {
                expected,
                found: data.len(),
            });
        }

        let mut sparse_rows = Vec::new();
        sparse_rows.try_reserve_exact(rows)?;
        for i in 0..rows {
            sparse_rows.push(SparseVector::from_dense(&data[i * cols..(i + 1) * cols])?);
        }

        let out = Self {
            rows: sparse_rows,
            cols,
            _metric: PhantomData,
        };
        debug!(
            "Sparse corpus ({}): {} rows x {} cols, {} non-zero entries",
            M::NAME,
            rows,
            cols,
            out.nnz()
        );
        Ok(out)
    }

    pub fn row(&self, index: usize) -> &SparseVector<T> {
        &self.rows[index]
    }

    /// Total non-zero entries across all rows.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|r| r.nnz()).sum()
    }
}

impl<T: Float, M: SparseMetric<T>> RegionQuery<T> for SparseCorpus<T, M> {
    fn num_rows(&self) -> usize {
        self.rows.len()
    }

    fn num_cols(&self) -> usize {
        self.cols
    }

    fn region_query(&self, row: usize, eps: T) -> Result<IndexSet> {
        let metric = M::with_threshold(eps);
        let query = &self.rows[row];

        let mut result = IndexSet::new();
        for (i, other) in self.rows.iter().enumerate() {
            if i == row {
                continue;
            }
            if metric.test(other, query) {
                insert_checked(&mut result, i)?;
            }
        }
        Ok(result)
    }
}
