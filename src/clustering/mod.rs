pub mod dbscan;
pub mod labels;
mod runner;
