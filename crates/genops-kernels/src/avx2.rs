//! AVX2 kernels for floating-point arithmetic
//!
//! Handles `Add`, `Subtract` and `Multiply` over two `f32` or `f64`
//! sequences. Every other call is declined. Lane-wise IEEE arithmetic gives
//! the same bits as the scalar operators, so results match the emulated
//! engine exactly.

use genops_core::Kernels;

/// AVX2 kernel set for x86_64 processors
#[derive(Clone, Copy, Debug)]
pub struct Avx2Kernels;

impl Avx2Kernels {
    /// Create the AVX2 kernel set
    ///
    /// # Panics
    /// Panics if the CPU doesn't support AVX2 instructions
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
        {
            if !is_x86_feature_detected!("avx2") {
                panic!("AVX2 kernels requested but CPU doesn't support AVX2 instructions");
            }
            Self
        }
        #[cfg(not(all(target_arch = "x86_64", feature = "avx2")))]
        {
            panic!("AVX2 kernels not available: not compiled with AVX2 support");
        }
    }

    /// Check if AVX2 is available on this CPU
    pub fn is_available() -> bool {
        #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
        {
            is_x86_feature_detected!("avx2")
        }
        #[cfg(not(all(target_arch = "x86_64", feature = "avx2")))]
        {
            false
        }
    }
}

#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
mod ops {
    use std::arch::x86_64::*;

    macro_rules! lane_kernel {
        ($name:ident, $ty:ty, $width:expr, $load:ident, $op:ident, $store:ident, $scalar:tt) => {
            #[target_feature(enable = "avx2")]
            pub unsafe fn $name(lhs: &[$ty], rhs: &[$ty], dst: &mut [$ty]) {
                let n = dst.len();
                let chunks = n / $width;

                // Main loop - process a full register at a time
                for i in 0..chunks {
                    let offset = i * $width;
                    let a = $load(lhs.as_ptr().add(offset));
                    let b = $load(rhs.as_ptr().add(offset));
                    $store(dst.as_mut_ptr().add(offset), $op(a, b));
                }

                // Handle remainder
                for i in chunks * $width..n {
                    dst[i] = lhs[i] $scalar rhs[i];
                }
            }
        };
    }

    lane_kernel!(add_f64, f64, 4, _mm256_loadu_pd, _mm256_add_pd, _mm256_storeu_pd, +);
    lane_kernel!(sub_f64, f64, 4, _mm256_loadu_pd, _mm256_sub_pd, _mm256_storeu_pd, -);
    lane_kernel!(mul_f64, f64, 4, _mm256_loadu_pd, _mm256_mul_pd, _mm256_storeu_pd, *);
    lane_kernel!(add_f32, f32, 8, _mm256_loadu_ps, _mm256_add_ps, _mm256_storeu_ps, +);
    lane_kernel!(sub_f32, f32, 8, _mm256_loadu_ps, _mm256_sub_ps, _mm256_storeu_ps, -);
    lane_kernel!(mul_f32, f32, 8, _mm256_loadu_ps, _mm256_mul_ps, _mm256_storeu_ps, *);
}

#[cfg(all(target_arch = "x86_64", feature = "avx2"))]
macro_rules! avx2_point {
    ($method:ident, $ty:ty, $add:ident, $sub:ident, $mul:ident) => {
        fn $method(
            &self,
            call: &mut genops_core::BulkCall<'_, $ty>,
        ) -> Option<genops_core::Result<()>> {
            use genops_core::{BinaryOp, BulkCall, Operands};

            let BulkCall::Binary {
                op,
                operands: Operands::VectorVector(lhs, rhs),
                dst,
            } = call
            else {
                return None;
            };
            if lhs.len() != dst.len() || rhs.len() != dst.len() {
                return None;
            }
            // Safety: both operands cover every index of dst and CPU support
            // was checked in new()
            unsafe {
                match *op {
                    BinaryOp::Add => ops::$add(lhs, rhs, dst),
                    BinaryOp::Subtract => ops::$sub(lhs, rhs, dst),
                    BinaryOp::Multiply => ops::$mul(lhs, rhs, dst),
                    _ => return None,
                }
            }
            Some(Ok(()))
        }
    };
}

impl Kernels for Avx2Kernels {
    fn name(&self) -> &str {
        "avx2"
    }

    #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
    avx2_point!(try_f32, f32, add_f32, sub_f32, mul_f32);

    #[cfg(all(target_arch = "x86_64", feature = "avx2"))]
    avx2_point!(try_f64, f64, add_f64, sub_f64, mul_f64);
}
