//! Portable kernels: tight zipped loops over native operators
//!
//! The loops are monomorphized per type and shape, so the compiler is free
//! to auto-vectorize them. Only operations that cannot fail are handled;
//! checked arithmetic, division and everything else is declined.

use genops_core::{BinaryOp, BulkCall, Kernels, Operands, Result};
use num_traits::{Float, PrimInt, WrappingAdd, WrappingMul, WrappingSub};

/// Kernel set available on every target
#[derive(Clone, Copy, Debug, Default)]
pub struct PortableKernels;

impl PortableKernels {
    pub fn new() -> Self {
        Self
    }
}

#[inline(always)]
fn zip_apply<T: Copy>(operands: Operands<'_, T>, dst: &mut [T], f: impl Fn(T, T) -> T) {
    match operands {
        Operands::VectorVector(lhs, rhs) => {
            for ((out, &a), &b) in dst.iter_mut().zip(lhs).zip(rhs) {
                *out = f(a, b);
            }
        }
        Operands::VectorScalar(lhs, &b) => {
            for (out, &a) in dst.iter_mut().zip(lhs) {
                *out = f(a, b);
            }
        }
        Operands::ScalarVector(&a, rhs) => {
            for (out, &b) in dst.iter_mut().zip(rhs) {
                *out = f(a, b);
            }
        }
    }
}

fn integer_kernel<T>(call: &mut BulkCall<'_, T>) -> Option<Result<()>>
where
    T: PrimInt + WrappingAdd + WrappingSub + WrappingMul,
{
    let BulkCall::Binary { op, operands, dst } = call else {
        return None;
    };
    let operands = *operands;
    match *op {
        BinaryOp::Add => zip_apply(operands, &mut **dst, |a, b| a.wrapping_add(&b)),
        BinaryOp::Subtract => zip_apply(operands, &mut **dst, |a, b| a.wrapping_sub(&b)),
        BinaryOp::Multiply => zip_apply(operands, &mut **dst, |a, b| a.wrapping_mul(&b)),
        BinaryOp::And => zip_apply(operands, &mut **dst, |a, b| a & b),
        BinaryOp::Or => zip_apply(operands, &mut **dst, |a, b| a | b),
        BinaryOp::Xor => zip_apply(operands, &mut **dst, |a, b| a ^ b),
        _ => return None,
    }
    Some(Ok(()))
}

fn float_kernel<T: Float>(call: &mut BulkCall<'_, T>) -> Option<Result<()>> {
    let BulkCall::Binary { op, operands, dst } = call else {
        return None;
    };
    let operands = *operands;
    match *op {
        BinaryOp::Add => zip_apply(operands, &mut **dst, |a, b| a + b),
        BinaryOp::Subtract => zip_apply(operands, &mut **dst, |a, b| a - b),
        BinaryOp::Multiply => zip_apply(operands, &mut **dst, |a, b| a * b),
        _ => return None,
    }
    Some(Ok(()))
}

macro_rules! portable_points {
    ($kernel:ident: $($method:ident => $ty:ty),*) => {
        $(
            fn $method(&self, call: &mut BulkCall<'_, $ty>) -> Option<Result<()>> {
                $kernel(call)
            }
        )*
    };
}

impl Kernels for PortableKernels {
    fn name(&self) -> &str {
        "portable"
    }

    portable_points!(integer_kernel:
        try_u8 => u8, try_i8 => i8, try_u16 => u16, try_i16 => i16,
        try_u32 => u32, try_i32 => i32, try_u64 => u64, try_i64 => i64);

    portable_points!(float_kernel: try_f32 => f32, try_f64 => f64);
}
