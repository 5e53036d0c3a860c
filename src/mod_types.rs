// Floating-point precision is a construction time choice.
// https://users.rust-lang.org/t/generics-using-either-f32-or-f64/28647/3
use std::fmt::{Debug, Display};
use std::str::FromStr;

use crate::space::kernel::KernelFloat;

/// Numeric type a corpus can be stored in. Implemented for `f32` and `f64`,
/// there is no mixed precision within a single corpus.
pub trait Float:
    num_traits::Float + KernelFloat + FromStr + Debug + Display + Default + Send + Sync + 'static
{
    /// Lossy conversion used when thresholds come from a `f64` config.
    fn from_f64_lossy(x: f64) -> Self;
}

impl Float for f32 {
    fn from_f64_lossy(x: f64) -> Self {
        x as f32
    }
}

impl Float for f64 {
    fn from_f64_lossy(x: f64) -> Self {
        x
    }
}
