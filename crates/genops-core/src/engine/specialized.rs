//! Fast-path engine layered on a fallback

use super::call::{BulkCall, Lanes};
use super::{sealed, VectorEngine};
use crate::error::Result;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Per-type kernel table for a [`SpecializedEngine`]
///
/// Each method receives a call over one vectorizable primitive and either
/// handles it, returning `Some(result)`, or declines with `None`. Declined
/// calls go to the engine's fallback unchanged, so a kernel set only
/// implements the combinations it accelerates. Results must match the
/// emulated engine exactly, errors included.
pub trait Kernels: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn try_u8(&self, _call: &mut BulkCall<'_, u8>) -> Option<Result<()>> {
        None
    }

    fn try_i8(&self, _call: &mut BulkCall<'_, i8>) -> Option<Result<()>> {
        None
    }

    fn try_u16(&self, _call: &mut BulkCall<'_, u16>) -> Option<Result<()>> {
        None
    }

    fn try_i16(&self, _call: &mut BulkCall<'_, i16>) -> Option<Result<()>> {
        None
    }

    fn try_u32(&self, _call: &mut BulkCall<'_, u32>) -> Option<Result<()>> {
        None
    }

    fn try_i32(&self, _call: &mut BulkCall<'_, i32>) -> Option<Result<()>> {
        None
    }

    fn try_u64(&self, _call: &mut BulkCall<'_, u64>) -> Option<Result<()>> {
        None
    }

    fn try_i64(&self, _call: &mut BulkCall<'_, i64>) -> Option<Result<()>> {
        None
    }

    fn try_f32(&self, _call: &mut BulkCall<'_, f32>) -> Option<Result<()>> {
        None
    }

    fn try_f64(&self, _call: &mut BulkCall<'_, f64>) -> Option<Result<()>> {
        None
    }
}

/// Engine that tries its kernels first and forwards everything else
///
/// Non-vectorizable types never reach the kernels.
pub struct SpecializedEngine<K: Kernels> {
    kernels: K,
    fallback: Arc<dyn VectorEngine>,
}

impl<K: Kernels> SpecializedEngine<K> {
    pub fn new(kernels: K, fallback: Arc<dyn VectorEngine>) -> Self {
        Self { kernels, fallback }
    }

    /// Layer `kernels` over the process-wide emulated engine
    pub fn over_emulated(kernels: K) -> Self {
        Self::new(kernels, super::EmulatedEngine::global())
    }

    pub fn kernels(&self) -> &K {
        &self.kernels
    }
}

impl<K: Kernels> fmt::Debug for SpecializedEngine<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecializedEngine")
            .field("kernels", &self.kernels)
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl<K: Kernels> sealed::Sealed for SpecializedEngine<K> {}

macro_rules! specialize {
    ($self:ident, $lanes:ident, $($variant:ident => $method:ident),* $(,)?) => {
        match $lanes {
            $(
                Lanes::$variant(mut call) => match $self.kernels.$method(&mut call) {
                    Some(result) => {
                        trace!(
                            engine = $self.kernels.name(),
                            lane = stringify!($variant),
                            operation = %call.kind(),
                            len = call.len(),
                            "kernel hit"
                        );
                        result
                    }
                    None => $self.forward(Lanes::$variant(call)),
                },
            )*
            other @ Lanes::Other(_) => $self.forward(other),
        }
    };
}

impl<K: Kernels> SpecializedEngine<K> {
    fn forward(&self, lanes: Lanes<'_>) -> Result<()> {
        trace!(
            engine = self.kernels.name(),
            fallback = self.fallback.name(),
            type_name = lanes.type_name(),
            operation = %lanes.kind(),
            "forwarding bulk call"
        );
        self.fallback.dispatch(lanes)
    }
}

impl<K: Kernels> VectorEngine for SpecializedEngine<K> {
    fn name(&self) -> &str {
        self.kernels.name()
    }

    fn fallback(&self) -> Option<&dyn VectorEngine> {
        Some(self.fallback.as_ref())
    }

    fn dispatch(&self, lanes: Lanes<'_>) -> Result<()> {
        // kernels index operands by the destination length
        lanes.validate()?;
        specialize!(
            self, lanes,
            U8 => try_u8,
            I8 => try_i8,
            U16 => try_u16,
            I16 => try_i16,
            U32 => try_u32,
            I32 => try_i32,
            U64 => try_u64,
            I64 => try_i64,
            F32 => try_f32,
            F64 => try_f64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EmulatedEngine, Operands, VectorOps};
    use crate::ops::BinaryOp;
    use crate::resolver::Resolver;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Handles i32 vector-vector add by writing a sentinel, counts every call
    #[derive(Debug, Default)]
    struct SentinelKernels {
        hits: AtomicUsize,
    }

    impl Kernels for SentinelKernels {
        fn name(&self) -> &str {
            "sentinel"
        }

        fn try_i32(&self, call: &mut BulkCall<'_, i32>) -> Option<Result<()>> {
            match call {
                BulkCall::Binary {
                    op: BinaryOp::Add,
                    operands: Operands::VectorVector(..),
                    dst,
                } => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    dst.fill(-1);
                    Some(Ok(()))
                }
                _ => None,
            }
        }
    }

    #[test]
    fn test_kernel_hit_and_decline() {
        let engine = SpecializedEngine::new(
            SentinelKernels::default(),
            Arc::new(EmulatedEngine::sequential(Arc::new(Resolver::new()))),
        );
        let a = [1, 2, 3];
        let mut dst = [0; 3];

        engine.add(&a, &a, &mut dst).unwrap();
        assert_eq!(dst, [-1, -1, -1]);
        assert_eq!(engine.kernels().hits.load(Ordering::Relaxed), 1);

        // same type, other shape: declined and emulated
        engine.add_scalar(&a, &1, &mut dst).unwrap();
        assert_eq!(dst, [2, 3, 4]);

        // other type: never offered to try_i32
        let b = [1i64, 2, 3];
        let mut wide = [0i64; 3];
        engine.add(&b, &b, &mut wide).unwrap();
        assert_eq!(wide, [2, 4, 6]);
        assert_eq!(engine.kernels().hits.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_non_vectorizable_types_forward() {
        let engine = SpecializedEngine::over_emulated(SentinelKernels::default());
        let a = [true, false];
        let b = [true, true];
        let mut dst = [false; 2];
        engine.and(&a, &b, &mut dst).unwrap();
        assert_eq!(dst, [true, false]);
        assert_eq!(engine.kernels().hits.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_mismatched_call_never_reaches_kernels() {
        let engine = SpecializedEngine::over_emulated(SentinelKernels::default());
        let a = [1i32, 2];
        let mut dst = [5i32; 3];
        let err = engine
            .dispatch(Lanes::I32(BulkCall::Binary {
                op: BinaryOp::Add,
                operands: Operands::VectorVector(&a, &a),
                dst: &mut dst,
            }))
            .unwrap_err();
        assert!(matches!(err, crate::Error::LengthMismatch { expected: 3, actual: 2, .. }));
        assert_eq!(dst, [5; 3]);
        assert_eq!(engine.kernels().hits.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_chain_names() {
        let inner: Arc<dyn VectorEngine> =
            Arc::new(SpecializedEngine::over_emulated(SentinelKernels::default()));
        let outer = SpecializedEngine::new(SentinelKernels::default(), inner);
        assert_eq!(outer.chain(), vec!["sentinel", "sentinel", "emulated"]);
        assert!(format!("{outer:?}").contains("sentinel"));
    }
}
