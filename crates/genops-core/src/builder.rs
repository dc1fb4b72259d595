//! Type-safe builder for engine chains
//!
//! Chains are assembled bottom-up: the builder starts with no engine, must
//! be given a terminal, and only then accepts specialized layers. Each layer
//! wraps the chain built so far, so every fallback exists before the engine
//! that refers to it.
//!
//! ```rust
//! use genops_core::{EngineBuilder, VectorOps};
//!
//! let engine = EngineBuilder::new().emulated().build();
//! let mut dst = [0u32; 3];
//! engine.add(&[1, 2, 3], &[4, 5, 6], &mut dst).unwrap();
//! assert_eq!(dst, [5, 7, 9]);
//! ```

use crate::engine::{EmulatedEngine, Kernels, SpecializedEngine, VectorEngine};
use crate::iteration::{Iteration, SequentialLoop};
use crate::resolver::Resolver;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Type-state markers for builder pattern
pub mod state {
    /// Marker for builder that still needs a terminal engine
    pub struct NeedsTerminal;

    /// Marker for builder holding a complete chain
    pub struct Layered;
}

pub use state::{Layered, NeedsTerminal};

/// Builder state trait
pub trait BuilderState {}

impl BuilderState for NeedsTerminal {}
impl BuilderState for Layered {}

/// Type-safe builder for engine chains
pub struct EngineBuilder<E, State: BuilderState> {
    resolver: Option<Arc<Resolver>>,
    iteration: Option<Arc<dyn Iteration>>,
    engine: E,
    _state: PhantomData<State>,
}

impl EngineBuilder<(), NeedsTerminal> {
    pub fn new() -> Self {
        Self {
            resolver: None,
            iteration: None,
            engine: (),
            _state: PhantomData,
        }
    }

    /// Resolver for the emulated terminal; defaults to [`Resolver::global`]
    pub fn with_resolver(mut self, resolver: Arc<Resolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Iteration for the emulated terminal; defaults to [`SequentialLoop`]
    pub fn with_iteration(mut self, iteration: Arc<dyn Iteration>) -> Self {
        self.iteration = Some(iteration);
        self
    }

    /// Terminate the chain in an emulated engine
    ///
    /// Without a configured resolver or iteration this is the process-wide
    /// [`EmulatedEngine::global`] instance.
    pub fn emulated(self) -> EngineBuilder<Arc<dyn VectorEngine>, Layered> {
        let terminal: Arc<dyn VectorEngine> = match (self.resolver, self.iteration) {
            (None, None) => EmulatedEngine::global(),
            (resolver, iteration) => Arc::new(EmulatedEngine::new(
                resolver.unwrap_or_else(Resolver::global),
                iteration.unwrap_or_else(|| Arc::new(SequentialLoop)),
            )),
        };
        layered(terminal)
    }

    /// Continue from an already complete chain
    pub fn on(self, engine: Arc<dyn VectorEngine>) -> EngineBuilder<Arc<dyn VectorEngine>, Layered> {
        layered(engine)
    }
}

impl Default for EngineBuilder<(), NeedsTerminal> {
    fn default() -> Self {
        Self::new()
    }
}

fn layered(engine: Arc<dyn VectorEngine>) -> EngineBuilder<Arc<dyn VectorEngine>, Layered> {
    EngineBuilder {
        resolver: None,
        iteration: None,
        engine,
        _state: PhantomData,
    }
}

impl EngineBuilder<Arc<dyn VectorEngine>, Layered> {
    /// Put a specialized engine with `kernels` on top of the chain
    pub fn specialize<K: Kernels + 'static>(self, kernels: K) -> Self {
        layered(Arc::new(SpecializedEngine::new(kernels, self.engine)))
    }

    /// Get the chain built so far
    pub fn engine(&self) -> &Arc<dyn VectorEngine> {
        &self.engine
    }

    pub fn build(self) -> Arc<dyn VectorEngine> {
        debug!(chain = ?self.engine.chain(), "built engine chain");
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BulkCall, VectorOps};
    use crate::error::Result;

    #[derive(Debug)]
    struct Named(&'static str);

    impl Kernels for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_builder_type_safety() {
        // These lines should not compile:
        // let bad1 = EngineBuilder::new().specialize(Named("x"));
        // let bad2 = EngineBuilder::new().build();

        let engine = EngineBuilder::new()
            .emulated()
            .specialize(Named("lower"))
            .specialize(Named("upper"))
            .build();
        assert_eq!(engine.chain(), vec!["upper", "lower", "emulated"]);
    }

    #[test]
    fn test_default_terminal_is_global() {
        let engine = EngineBuilder::new().emulated().build();
        let global: Arc<dyn VectorEngine> = EmulatedEngine::global();
        assert!(std::ptr::addr_eq(Arc::as_ptr(&engine), Arc::as_ptr(&global)));
    }

    #[test]
    fn test_custom_resolver_terminal() {
        #[derive(Debug, Clone, PartialEq)]
        struct Token(u8);
        impl crate::Scalar for Token {}

        struct TokenOps;
        impl crate::OperationProvider<Token> for TokenOps {
            fn xor(&self, a: &Token, b: &Token) -> Result<Token> {
                Ok(Token(a.0 ^ b.0))
            }
        }

        let resolver = Arc::new(Resolver::new());
        resolver.register::<Token, _>(TokenOps).unwrap();
        let engine = EngineBuilder::new()
            .with_resolver(resolver)
            .emulated()
            .specialize(Named("noop"))
            .build();

        let a = [Token(0b1100), Token(0b1010)];
        let mut dst = [Token(0), Token(0)];
        engine.xor_scalar(&a, &Token(0b0110), &mut dst).unwrap();
        assert_eq!(dst, [Token(0b1010), Token(0b1100)]);

        // the global resolver never heard of Token
        let global = EngineBuilder::new().emulated().build();
        assert!(global.xor_scalar(&a, &Token(1), &mut dst).is_err());
    }

    #[test]
    fn test_layering_on_existing_chain() {
        let base = EngineBuilder::new().emulated().specialize(Named("a")).build();
        let engine = EngineBuilder::new().on(base).specialize(Named("b")).build();
        assert_eq!(engine.chain(), vec!["b", "a", "emulated"]);

        let input = [3i8, -4];
        let mut dst = [0i8; 2];
        engine
            .execute(BulkCall::Unary {
                op: crate::ops::UnaryOp::Negate,
                input: &input,
                dst: &mut dst,
            })
            .unwrap();
        assert_eq!(dst, [-3, 4]);
    }
}
