//! Runtime multiple dispatch.
//!
//! This crate selects which of several registered implementations of an
//! operation to run based on the runtime types of *all* of its arguments.
//! Methods are registered against a [`GenericFunction`] together with the
//! declared type of every parameter; an invocation picks the most specific
//! applicable method and lets it delegate to the next most specific one
//! ("call next method").
//!
//! # Algorithm Overview
//!
//! 1. **Classify**: Reduce each argument to its runtime [`TypeDescriptor`]
//! 2. **Filter applicable**: Keep methods whose declared signature accepts
//!    the concrete signature
//! 3. **Layer by specificity**: Partition the candidates into antichains,
//!    most specific first
//! 4. **Build the chain**: Fold the layers into an invoker chain, least
//!    specific first, so every inner method can reach the next one
//! 5. **Cache**: Memoize the chain per concrete signature until the next
//!    registration
//!
//! # Module Structure
//!
//! - [`descriptor`] - Type descriptor and runtime classification traits
//! - [`hierarchy`] - A nominal type hierarchy usable as a descriptor
//! - [`signature`] - Signatures and the specificity relation
//! - [`dominance`] - Dominator and layering computation over a partial order
//! - [`types`] - Registered methods and the next-method continuation
//! - [`resolver`] - Effective method computation and invoker chains
//! - [`result`] - Dispatch and registration errors
//! - [`config`] - Dispatch configuration
//! - [`stats`] - Instrumentation counters
//! - [`function`] - The generic function facade

pub mod config;
pub mod descriptor;
pub mod dominance;
pub mod function;
pub mod hierarchy;
pub mod resolver;
pub mod result;
pub mod signature;
pub mod stats;
pub mod types;


pub use config::{CacheConfig, ConfigError, DispatchConfig};
pub use descriptor::{Dispatchable, TypeDescriptor};
pub use dominance::Implication;
pub use function::{
    BinaryFunction, GenericConsumer, GenericFunction, GenericPredicate, TernaryFunction,
    UnaryFunction,
};
pub use hierarchy::{HierarchyError, Tagged, TypeHierarchy, TypeTag};
pub use result::{DispatchError, DispatchResult, RegistrationError, RegistrationResult};
pub use signature::Signature;
pub use stats::DispatchStats;
pub use types::{Entry, Method, MethodKind, NextMethod};
