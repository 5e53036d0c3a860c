//! Brute-force DBSCAN over dense and sparse vector corpora.
//!
//! The traversal in [`clustering`] only talks to corpora through
//! [`space::space_generics::RegionQuery`]; [`space`] provides a borrowed dense
//! representation (Euclidean, SIMD kernel) and an owned sparse one
//! (Euclidean or cosine).

pub mod clustering;
pub mod config;
pub mod error;
pub mod io;
pub mod mod_types;
pub mod space;
pub mod utils;

pub use clustering::dbscan::{build_region_query, dbscan, BoxedRegionQuery, Dbscan};
pub use clustering::labels::{ClusterAssignments, UNASSIGNED};
pub use error::{Error, Result};
pub use mod_types::Float;
