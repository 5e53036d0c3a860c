pub mod dense;
pub mod kernel;
pub mod metrics;
pub mod space_generics;
pub mod sparse;
