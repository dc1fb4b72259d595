//! Terminal engine: element-by-element evaluation through the resolver

use super::call::{BulkCall, Lanes};
use super::{sealed, VectorEngine};
use crate::error::Result;
use crate::iteration::{Iteration, SequentialLoop, Task};
use crate::numeric::Scalar;
use crate::resolver::{Bound, Resolver};
use lazy_static::lazy_static;
use std::sync::Arc;
use tracing::trace;

lazy_static! {
    static ref GLOBAL_EMULATED: Arc<EmulatedEngine> = Arc::new(EmulatedEngine::new(
        Resolver::global(),
        Arc::new(SequentialLoop)
    ));
}

/// The always-correct terminal engine
///
/// Works for every type the resolver can resolve. The resolver lookup happens
/// once per call, so a call over an unresolved type fails before anything is
/// written to the destination.
#[derive(Debug, Clone)]
pub struct EmulatedEngine {
    resolver: Arc<Resolver>,
    iteration: Arc<dyn Iteration>,
}

impl EmulatedEngine {
    pub fn new(resolver: Arc<Resolver>, iteration: Arc<dyn Iteration>) -> Self {
        Self {
            resolver,
            iteration,
        }
    }

    /// Sequential engine over the given resolver
    pub fn sequential(resolver: Arc<Resolver>) -> Self {
        Self::new(resolver, Arc::new(SequentialLoop))
    }

    /// Rayon-backed engine over the given resolver
    #[cfg(feature = "parallel")]
    pub fn parallel(resolver: Arc<Resolver>) -> Self {
        Self::new(resolver, Arc::new(crate::iteration::ParallelLoop::new()))
    }

    /// Process-wide instance over [`Resolver::global`] with sequential iteration
    pub fn global() -> Arc<EmulatedEngine> {
        GLOBAL_EMULATED.clone()
    }

    pub fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    pub fn iteration(&self) -> &dyn Iteration {
        self.iteration.as_ref()
    }
}

impl sealed::Sealed for EmulatedEngine {}

impl VectorEngine for EmulatedEngine {
    fn name(&self) -> &str {
        "emulated"
    }

    fn fallback(&self) -> Option<&dyn VectorEngine> {
        None
    }

    fn dispatch(&self, lanes: Lanes<'_>) -> Result<()> {
        trace!(
            engine = "emulated",
            type_name = lanes.type_name(),
            operation = %lanes.kind(),
            len = lanes.len(),
            "emulating bulk call"
        );
        let resolver = self.resolver.as_ref();
        let iteration = self.iteration.as_ref();
        super::call::for_each_lane!(
            lanes,
            mut call => run(&mut call, resolver, iteration),
            erased => erased.emulate(resolver, iteration)
        )
    }
}

/// Evaluate `call` element by element
pub(crate) fn run<T: Scalar>(
    call: &mut BulkCall<'_, T>,
    resolver: &Resolver,
    iteration: &dyn Iteration,
) -> Result<()> {
    call.validate()?;
    let bound = resolver.bind::<T>(call.kind())?;
    let bound: &Bound<'_, T> = &bound;

    match call {
        BulkCall::Unary { op, input, dst } => {
            let (op, input) = (*op, &**input);
            for_each_chunk(iteration, dst, move |offset, out| {
                for (i, slot) in out.iter_mut().enumerate() {
                    *slot = bound.unary(op, &input[offset + i])?;
                }
                Ok(())
            })
        }
        BulkCall::Binary { op, operands, dst } => {
            let (op, operands) = (*op, *operands);
            for_each_chunk(iteration, dst, move |offset, out| {
                for (i, slot) in out.iter_mut().enumerate() {
                    let (a, b) = operands.at(offset + i);
                    *slot = bound.binary(op, a, b)?;
                }
                Ok(())
            })
        }
        BulkCall::Shift { op, operands, dst } => {
            let (op, operands) = (*op, *operands);
            for_each_chunk(iteration, dst, move |offset, out| {
                for (i, slot) in out.iter_mut().enumerate() {
                    let (x, count) = operands.at(offset + i);
                    *slot = bound.shift(op, x, count)?;
                }
                Ok(())
            })
        }
        BulkCall::Equals { operands, dst } => {
            let operands = *operands;
            for_each_chunk(iteration, dst, move |offset, out| {
                for (i, slot) in out.iter_mut().enumerate() {
                    let (a, b) = operands.at(offset + i);
                    *slot = bound.equals(a, b)?;
                }
                Ok(())
            })
        }
        BulkCall::Compare { operands, dst } => {
            let operands = *operands;
            for_each_chunk(iteration, dst, move |offset, out| {
                for (i, slot) in out.iter_mut().enumerate() {
                    let (a, b) = operands.at(offset + i);
                    *slot = bound.compare(a, b)?;
                }
                Ok(())
            })
        }
        BulkCall::Relational { op, operands, dst } => {
            let (op, operands) = (*op, *operands);
            for_each_chunk(iteration, dst, move |offset, out| {
                for (i, slot) in out.iter_mut().enumerate() {
                    let (a, b) = operands.at(offset + i);
                    *slot = op.holds(bound.compare(a, b)?);
                }
                Ok(())
            })
        }
    }
}

/// Split `dst` into disjoint chunks and run `body(offset, chunk)` for each
fn for_each_chunk<U, F>(iteration: &dyn Iteration, dst: &mut [U], body: F) -> Result<()>
where
    U: Send,
    F: Fn(usize, &mut [U]) -> Result<()> + Sync,
{
    let len = dst.len();
    if len == 0 {
        return Ok(());
    }
    let chunk_size = iteration.chunk_size(len).clamp(1, len);
    let body = &body;
    let mut tasks: Vec<Task<'_>> = dst
        .chunks_mut(chunk_size)
        .enumerate()
        .map(|(index, out)| {
            let offset = index * chunk_size;
            Box::new(move || body(offset, &mut *out)) as Task<'_>
        })
        .collect();
    iteration.for_each(&mut tasks)
}
