//! Effective method computation.
//!
//! For one concrete signature the resolver:
//!
//! 1. **Filters** the registered methods down to the applicable ones
//! 2. **Layers** them by specificity, most specific first
//! 3. **Folds** the layers, least specific first, into a chain of
//!    [`Invoker`]s starting from a "no more methods" sentinel
//!
//! A single-method layer binds that method over the chain built so far. A
//! layer with several methods is a tie and binds an ambiguity failure in its
//! place; a more specific leaf method can still answer without ever
//! reaching it.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::descriptor::Dispatchable;
use crate::dominance::Implication;
use crate::result::{DispatchError, DispatchResult};
use crate::signature::Signature;
use crate::types::{Entry, InnerBody, LeafBody, NextMethod};

/// Where a failing invoker reports from.
#[derive(Debug, Clone)]
pub(crate) struct Failure<A: Dispatchable> {
    operation: Arc<str>,
    signature: Signature<A::Type>,
}

/// One link of a bound, ready-to-run effective method.
pub(crate) enum Invoker<A: Dispatchable, R> {
    /// Terminal method.
    Leaf {
        signature: Signature<A::Type>,
        body: Arc<LeafBody<A, R>>,
    },
    /// Method that may continue with `next`.
    Inner {
        signature: Signature<A::Type>,
        body: Arc<InnerBody<A, R>>,
        next: Arc<Invoker<A, R>>,
    },
    /// No method applies.
    Missing(Failure<A>),
    /// Tied methods.
    Ambiguous {
        failure: Failure<A>,
        candidates: Vec<Signature<A::Type>>,
    },
    /// End of the chain.
    NoMoreMethods(Failure<A>),
}

impl<A: Dispatchable, R> Invoker<A, R> {
    /// Run this invoker with the given arguments.
    pub(crate) fn invoke(&self, arguments: &[A]) -> DispatchResult<A, R> {
        match self {
            Invoker::Leaf { body, .. } => Ok(body(arguments)),
            Invoker::Inner { body, next, .. } => body(&NextMethod::new(next, arguments), arguments),
            Invoker::Missing(failure) => Err(DispatchError::MissingMethod {
                operation: Arc::clone(&failure.operation),
                arguments: arguments.to_vec(),
                signature: failure.signature.clone(),
            }),
            Invoker::Ambiguous {
                failure,
                candidates,
            } => Err(DispatchError::AmbiguousMethods {
                operation: Arc::clone(&failure.operation),
                arguments: arguments.to_vec(),
                signature: failure.signature.clone(),
                candidates: candidates.clone(),
            }),
            Invoker::NoMoreMethods(failure) => Err(DispatchError::NoMoreMethods {
                operation: Arc::clone(&failure.operation),
                arguments: arguments.to_vec(),
                signature: failure.signature.clone(),
            }),
        }
    }

    /// Number of methods reachable through `next` links from here.
    pub(crate) fn depth(&self) -> usize {
        match self {
            Invoker::Leaf { .. } => 1,
            Invoker::Inner { next, .. } => 1 + next.depth(),
            _ => 0,
        }
    }
}

impl<A: Dispatchable, R> fmt::Debug for Invoker<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invoker::Leaf { signature, .. } => write!(f, "Leaf{}", signature),
            Invoker::Inner { signature, next, .. } => write!(f, "Inner{} -> {:?}", signature, next),
            Invoker::Missing(_) => write!(f, "Missing"),
            Invoker::Ambiguous { candidates, .. } => write!(f, "Ambiguous{:?}", candidates),
            Invoker::NoMoreMethods(_) => write!(f, "NoMoreMethods"),
        }
    }
}

/// Dispatch resolution over one operation's registered methods.
pub(crate) struct DispatchResolver<'a, A: Dispatchable, R> {
    /// The operation name, for diagnostics.
    operation: &'a Arc<str>,
    /// Registered methods, in registration order.
    methods: &'a IndexMap<Signature<A::Type>, Arc<Entry<A, R>>>,
}

impl<'a, A: Dispatchable, R> DispatchResolver<'a, A, R> {
    pub(crate) fn new(
        operation: &'a Arc<str>,
        methods: &'a IndexMap<Signature<A::Type>, Arc<Entry<A, R>>>,
    ) -> Self {
        Self { operation, methods }
    }

    /// Methods applicable to the concrete signature, in registration order.
    pub(crate) fn candidates(&self, concrete: &Signature<A::Type>) -> Vec<Arc<Entry<A, R>>> {
        self.methods
            .values()
            .filter(|entry| entry.accepts(concrete))
            .cloned()
            .collect()
    }

    /// Applicable methods partitioned into specificity layers, most specific
    /// first.
    pub(crate) fn layers(&self, concrete: &Signature<A::Type>) -> Vec<Vec<Arc<Entry<A, R>>>> {
        let implication = Implication::new(|a: &Arc<Entry<A, R>>, b: &Arc<Entry<A, R>>| a.implies(b));
        implication.layers(&self.candidates(concrete))
    }

    /// Build the effective method for the concrete signature.
    pub(crate) fn compute_effective_method(&self, concrete: &Signature<A::Type>) -> Invoker<A, R> {
        let failure = || Failure {
            operation: Arc::clone(self.operation),
            signature: concrete.clone(),
        };

        // Step 1: Handle no applicable methods
        let layers = self.layers(concrete);
        if layers.is_empty() {
            debug!(
                operation = %self.operation,
                signature = %concrete,
                "no applicable methods"
            );
            return Invoker::Missing(failure());
        }

        // Step 2: Fold from the least specific layer upwards
        let mut seed = Invoker::NoMoreMethods(failure());
        for layer in layers.iter().rev() {
            seed = match layer.as_slice() {
                [] => unreachable!("dominance layers are never empty"),
                [entry] => entry.bind(Arc::new(seed)),
                tied => Invoker::Ambiguous {
                    failure: failure(),
                    candidates: tied.iter().map(|e| e.signature().clone()).collect(),
                },
            };
        }

        debug!(
            operation = %self.operation,
            signature = %concrete,
            candidates = layers.iter().map(Vec::len).sum::<usize>(),
            layers = layers.len(),
            chain = ?seed,
            "computed effective method"
        );
        seed
    }
}
