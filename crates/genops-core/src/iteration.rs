//! Iteration capability for bulk operations
//!
//! The emulated engine never loops on its own: it splits a call into
//! per-chunk tasks and hands them to an [`Iteration`]. The sequential loop is
//! always available; the rayon-backed loop lives behind the `parallel`
//! feature.
//!
//! Iterations may run tasks in any order and concurrently, but every task
//! writes a disjoint slice of the destination, so element `i` of the result
//! depends only on element `i` of the operands.

use crate::error::Result;
use std::fmt;
use std::ops::Range;

/// Execution strategy for bulk operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Process items sequentially
    Sequential,
    /// Process items in parallel
    Parallel,
}

/// One unit of work handed to an [`Iteration`]
pub type Task<'a> = Box<dyn FnMut() -> Result<()> + Send + 'a>;

/// Index-iteration capability consumed by the emulated engine
///
/// Both methods stop at the first error they observe; work already completed
/// by other tasks is not rolled back.
pub trait Iteration: Send + Sync + fmt::Debug {
    fn strategy(&self) -> ExecutionStrategy;

    fn num_threads(&self) -> usize;

    /// Elements per task for a call writing `n_items` elements
    fn chunk_size(&self, n_items: usize) -> usize;

    /// Run `body` for every index in `range`
    fn for_range(
        &self,
        range: Range<usize>,
        body: &(dyn Fn(usize) -> Result<()> + Sync),
    ) -> Result<()>;

    /// Run every task exactly once
    fn for_each(&self, tasks: &mut [Task<'_>]) -> Result<()>;

    fn is_parallel(&self) -> bool {
        matches!(self.strategy(), ExecutionStrategy::Parallel)
    }
}

/// Runs everything on the calling thread, in index order
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialLoop;

impl Iteration for SequentialLoop {
    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Sequential
    }

    fn num_threads(&self) -> usize {
        1
    }

    fn chunk_size(&self, _n_items: usize) -> usize {
        // Whole call as a single chunk
        usize::MAX
    }

    fn for_range(
        &self,
        range: Range<usize>,
        body: &(dyn Fn(usize) -> Result<()> + Sync),
    ) -> Result<()> {
        range.into_iter().try_for_each(body)
    }

    fn for_each(&self, tasks: &mut [Task<'_>]) -> Result<()> {
        tasks.iter_mut().try_for_each(|task| task())
    }
}

/// Parallel iteration using Rayon
///
/// Runs on the global rayon pool unless a dedicated pool is supplied.
#[cfg(feature = "parallel")]
#[derive(Clone, Debug, Default)]
pub struct ParallelLoop {
    thread_pool: Option<std::sync::Arc<rayon::ThreadPool>>,
}

#[cfg(feature = "parallel")]
impl ParallelLoop {
    pub fn new() -> Self {
        Self { thread_pool: None }
    }

    /// Create a parallel loop on a custom thread pool
    pub fn with_thread_pool(pool: std::sync::Arc<rayon::ThreadPool>) -> Self {
        Self {
            thread_pool: Some(pool),
        }
    }

    /// Create with a specific number of threads
    pub fn with_num_threads(num_threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| crate::Error::Execution(format!("Failed to create thread pool: {e}")))?;

        Ok(Self {
            thread_pool: Some(std::sync::Arc::new(pool)),
        })
    }

    fn install<R: Send>(&self, f: impl FnOnce() -> R + Send) -> R {
        match &self.thread_pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

#[cfg(feature = "parallel")]
impl Iteration for ParallelLoop {
    fn strategy(&self) -> ExecutionStrategy {
        ExecutionStrategy::Parallel
    }

    fn num_threads(&self) -> usize {
        match &self.thread_pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn chunk_size(&self, n_items: usize) -> usize {
        let target_chunks = self.num_threads() * 6;
        let chunk_size = n_items.div_ceil(target_chunks);
        chunk_size.max(4).min(n_items)
    }

    fn for_range(
        &self,
        range: Range<usize>,
        body: &(dyn Fn(usize) -> Result<()> + Sync),
    ) -> Result<()> {
        use rayon::prelude::*;

        self.install(|| range.into_par_iter().try_for_each(body))
    }

    fn for_each(&self, tasks: &mut [Task<'_>]) -> Result<()> {
        use rayon::prelude::*;

        self.install(|| tasks.par_iter_mut().try_for_each(|task| task()))
    }
}
