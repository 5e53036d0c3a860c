use log::debug;

use crate::error::{Error, Result};
use crate::mod_types::Float;
use crate::space::metrics::EuclideanWithin;
use crate::space::space_generics::{insert_checked, IndexSet, RegionQuery};

/// Row-major view over a caller-owned buffer of `rows * cols` values.
///
/// Nothing is copied; the buffer is borrowed for `'a` and must not change
/// while the corpus is alive (the borrow enforces both). Only Euclidean
/// distance is available on this representation.
#[derive(Debug, Clone, Copy)]
pub struct DenseCorpus<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
}

impl<'a, T: Float> DenseCorpus<'a, T> {
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Result<Self> {
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
        debug!("Dense corpus view: {} rows x {} cols", rows, cols);
        Ok(Self { data, rows, cols })
    }

    #[inline]
    pub fn row(&self, index: usize) -> &'a [T] {
        let start = index * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn data(&self) -> &'a [T] {
        self.data
    }
}

impl<'a, T: Float> RegionQuery<T> for DenseCorpus<'a, T> {
    fn num_rows(&self) -> usize {
        self.rows
    }

    fn num_cols(&self) -> usize {
        self.cols
    }

    fn region_query(&self, row: usize, eps: T) -> Result<IndexSet> {
        let metric = EuclideanWithin::new(eps);
        let query = self.row(row);

        let mut result = IndexSet::new();
        for i in 0..self.rows {
            if i == row {
                continue;
            }
            if metric.test_dense(self.row(i), query) {
                insert_checked(&mut result, i)?;
            }
        }
        Ok(result)
    }
}
