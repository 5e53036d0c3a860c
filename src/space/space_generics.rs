use std::collections::HashSet;

use crate::error::Result;
use crate::mod_types::Float;

/// Rows found by a single region query. Hash based, iteration order is not
/// meaningful, only membership is.
pub type IndexSet = HashSet<usize>;

/// The seam between the clustering traversal and a corpus representation.
///
/// `region_query` scans every row except `row` and returns the indices that
/// pass the representation's neighbor test under `eps`. The query row itself
/// is never part of the result.
pub trait RegionQuery<T: Float> {
    fn num_rows(&self) -> usize;
    fn num_cols(&self) -> usize;
    fn region_query(&self, row: usize, eps: T) -> Result<IndexSet>;
}

impl<T: Float, Q: RegionQuery<T> + ?Sized> RegionQuery<T> for Box<Q> {
    fn num_rows(&self) -> usize {
        (**self).num_rows()
    }

    fn num_cols(&self) -> usize {
        (**self).num_cols()
    }

    fn region_query(&self, row: usize, eps: T) -> Result<IndexSet> {
        (**self).region_query(row, eps)
    }
}

/// Insert that reports allocation failure instead of aborting.
#[inline]
pub(crate) fn insert_checked(set: &mut IndexSet, index: usize) -> Result<bool> {
    set.try_reserve(1)?;
    Ok(set.insert(index))
}
