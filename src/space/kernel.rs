//! Sum of squared differences between two dense buffers.
//!
//! The accelerated path works on 128 bit registers: 4 lanes for `f32` and
//! 2 lanes for `f64` (SSE/SSE2 on x86_64, NEON on aarch64). Remainder lanes
//! are finished with the scalar loop. Which path backs
//! [`KernelFloat::squared_distance`] is decided at build time; enabling the
//! `scalar-kernel` feature forces the scalar loop everywhere.

/// Precision-specific entry point for the kernel.
pub trait KernelFloat: Copy {
    fn squared_distance(x: &[Self], y: &[Self]) -> Self;
}

/// True when `KernelFloat::squared_distance` dispatches to SIMD registers.
pub const ACCELERATED: bool = cfg!(all(
    any(target_arch = "x86_64", target_arch = "aarch64"),
    not(feature = "scalar-kernel")
));

/// Per-element accumulation. Used for remainders and as the fallback.
#[inline]
pub fn squared_distance_scalar<T: num_traits::Float>(x: &[T], y: &[T]) -> T {
    debug_assert_eq!(x.len(), y.len());
    let mut result = T::zero();
    for (a, b) in x.iter().zip(y.iter()) {
        let d = *a - *b;
        result = result + d * d;
    }
    result
}

#[cfg(target_arch = "x86_64")]
pub mod accelerated {
    use super::squared_distance_scalar;
    use std::arch::x86_64::*;

    #[inline]
    pub fn squared_distance_f32(x: &[f32], y: &[f32]) -> f32 {
        debug_assert_eq!(x.len(), y.len());
        let n = x.len().min(y.len());
        let chunks = n / 4;

        // SAFETY: SSE is part of the x86_64 baseline and every load reads
        // 4 elements starting below `chunks * 4 <= n`.
        let mut distance = unsafe {
            let mut sum = _mm_setzero_ps();
            let x_ptr = x.as_ptr();
            let y_ptr = y.as_ptr();
            for i in 0..chunks {
                let vx = _mm_loadu_ps(x_ptr.add(i * 4));
                let vy = _mm_loadu_ps(y_ptr.add(i * 4));
                let delta = _mm_sub_ps(vx, vy);
                sum = _mm_add_ps(sum, _mm_mul_ps(delta, delta));
            }

            // [s0 + s2, s1 + s3, ..] then lane 0 + lane 1
            let high = _mm_movehl_ps(sum, sum);
            let pairs = _mm_add_ps(sum, high);
            let odd = _mm_shuffle_ps::<0b01>(pairs, pairs);
            _mm_cvtss_f32(_mm_add_ss(pairs, odd))
        };

        let tail = chunks * 4;
        if tail < n {
            distance += squared_distance_scalar(&x[tail..n], &y[tail..n]);
        }
        distance
    }

    #[inline]
    pub fn squared_distance_f64(x: &[f64], y: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), y.len());
        let n = x.len().min(y.len());
        let chunks = n / 2;

        // SAFETY: SSE2 is part of the x86_64 baseline and every load reads
        // 2 elements starting below `chunks * 2 <= n`.
        let mut distance = unsafe {
            let mut sum = _mm_setzero_pd();
            let x_ptr = x.as_ptr();
            let y_ptr = y.as_ptr();
            for i in 0..chunks {
                let vx = _mm_loadu_pd(x_ptr.add(i * 2));
                let vy = _mm_loadu_pd(y_ptr.add(i * 2));
                let delta = _mm_sub_pd(vx, vy);
                sum = _mm_add_pd(sum, _mm_mul_pd(delta, delta));
            }

            let high = _mm_unpackhi_pd(sum, sum);
            _mm_cvtsd_f64(_mm_add_sd(sum, high))
        };

        let tail = chunks * 2;
        if tail < n {
            distance += squared_distance_scalar(&x[tail..n], &y[tail..n]);
        }
        distance
    }
}

#[cfg(target_arch = "aarch64")]
pub mod accelerated {
    use super::squared_distance_scalar;
    use std::arch::aarch64::*;

    #[inline]
    pub fn squared_distance_f32(x: &[f32], y: &[f32]) -> f32 {
        debug_assert_eq!(x.len(), y.len());
        let n = x.len().min(y.len());
        let chunks = n / 4;

        // SAFETY: NEON is mandatory on aarch64 and every load reads
        // 4 elements starting below `chunks * 4 <= n`.
        let mut distance = unsafe {
            let mut sum = vdupq_n_f32(0.0);
            let x_ptr = x.as_ptr();
            let y_ptr = y.as_ptr();
            for i in 0..chunks {
                let vx = vld1q_f32(x_ptr.add(i * 4));
                let vy = vld1q_f32(y_ptr.add(i * 4));
                let delta = vsubq_f32(vx, vy);
                sum = vaddq_f32(sum, vmulq_f32(delta, delta));
            }
            vaddvq_f32(sum)
        };

        let tail = chunks * 4;
        if tail < n {
            distance += squared_distance_scalar(&x[tail..n], &y[tail..n]);
        }
        distance
    }

    #[inline]
    pub fn squared_distance_f64(x: &[f64], y: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), y.len());
        let n = x.len().min(y.len());
        let chunks = n / 2;

        // SAFETY: NEON is mandatory on aarch64 and every load reads
        // 2 elements starting below `chunks * 2 <= n`.
        let mut distance = unsafe {
            let mut sum = vdupq_n_f64(0.0);
            let x_ptr = x.as_ptr();
            let y_ptr = y.as_ptr();
            for i in 0..chunks {
                let vx = vld1q_f64(x_ptr.add(i * 2));
                let vy = vld1q_f64(y_ptr.add(i * 2));
                let delta = vsubq_f64(vx, vy);
                sum = vaddq_f64(sum, vmulq_f64(delta, delta));
            }
            vaddvq_f64(sum)
        };

        let tail = chunks * 2;
        if tail < n {
            distance += squared_distance_scalar(&x[tail..n], &y[tail..n]);
        }
        distance
    }
}

#[cfg(all(
    any(target_arch = "x86_64", target_arch = "aarch64"),
    not(feature = "scalar-kernel")
))]
mod select {
    pub use super::accelerated::{squared_distance_f32, squared_distance_f64};
}

#[cfg(not(all(
    any(target_arch = "x86_64", target_arch = "aarch64"),
    not(feature = "scalar-kernel")
)))]
mod select {
    use super::squared_distance_scalar;

    #[inline]
    pub fn squared_distance_f32(x: &[f32], y: &[f32]) -> f32 {
        squared_distance_scalar(x, y)
    }

    #[inline]
    pub fn squared_distance_f64(x: &[f64], y: &[f64]) -> f64 {
        squared_distance_scalar(x, y)
    }
}

impl KernelFloat for f32 {
    #[inline]
    fn squared_distance(x: &[f32], y: &[f32]) -> f32 {
        select::squared_distance_f32(x, y)
    }
}

impl KernelFloat for f64 {
    #[inline]
    fn squared_distance(x: &[f64], y: &[f64]) -> f64 {
        select::squared_distance_f64(x, y)
    }
}

/// Squared Euclidean distance through the build-selected kernel.
#[inline]
pub fn squared_distance<T: KernelFloat>(x: &[T], y: &[T]) -> T {
    T::squared_distance(x, y)
}
