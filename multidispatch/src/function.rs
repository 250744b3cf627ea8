//! The generic function facade.
//!
//! A [`GenericFunction`] owns its method registry and its resolution cache.
//! Both live behind one mutex: registration mutates the registry and clears
//! the whole cache in a single critical section, and invocation holds the
//! lock only to look up (or compute and store) the effective method. The
//! method bodies themselves run after the lock is released, so they may
//! dispatch on the same function again or run for as long as they like.
//!
//! Resolution itself happens under the lock, so each concrete signature is
//! computed at most once between two registrations.

use std::fmt;
use std::sync::Arc;

use indexmap::map::Entry as MapEntry;
use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::config::DispatchConfig;
use crate::descriptor::Dispatchable;
use crate::resolver::{DispatchResolver, Invoker};
use crate::result::{DispatchResult, RegistrationError, RegistrationResult};
use crate::signature::Signature;
use crate::stats::{Counters, DispatchStats};
use crate::types::{Entry, Method, NextMethod};

/// A generic function of one argument.
pub type UnaryFunction<A, R> = GenericFunction<A, R, 1>;

/// A generic function of two arguments.
pub type BinaryFunction<A, R> = GenericFunction<A, R, 2>;

/// A generic function of three arguments.
pub type TernaryFunction<A, R> = GenericFunction<A, R, 3>;

/// A generic function returning `bool`.
pub type GenericPredicate<A, const N: usize> = GenericFunction<A, bool, N>;

/// A generic function run for its side effects.
pub type GenericConsumer<A, const N: usize> = GenericFunction<A, (), N>;

/// Registry and cache, guarded together.
struct DispatchTable<A: Dispatchable, R> {
    /// Registered methods by declared signature, in registration order.
    methods: IndexMap<Signature<A::Type>, Arc<Entry<A, R>>>,
    /// Effective methods by concrete signature.
    cache: FxHashMap<Signature<A::Type>, Arc<Invoker<A, R>>>,
}

/// An operation of arity `N` dispatching on the runtime types of all of its
/// arguments.
///
/// `A` is the argument type (anything [`Dispatchable`]) and `R` the result
/// type of every method.
pub struct GenericFunction<A: Dispatchable, R, const N: usize> {
    name: Arc<str>,
    config: DispatchConfig,
    table: Mutex<DispatchTable<A, R>>,
    counters: Counters,
}

impl<A: Dispatchable, R: 'static, const N: usize> GenericFunction<A, R, N> {
    /// Create a generic function with the default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, DispatchConfig::default())
    }

    /// Create a generic function with an explicit configuration.
    pub fn with_config(name: impl Into<String>, config: DispatchConfig) -> Self {
        let cache = FxHashMap::with_capacity_and_hasher(
            config.cache.initial_capacity,
            Default::default(),
        );
        Self {
            name: Arc::from(name.into()),
            config,
            table: Mutex::new(DispatchTable {
                methods: IndexMap::new(),
                cache,
            }),
            counters: Counters::default(),
        }
    }

    /// The operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Register a terminal method for the given parameter types.
    pub fn add_leaf<F>(&self, types: [A::Type; N], body: F) -> RegistrationResult<A::Type>
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
    {
        self.add_method(types, Method::leaf(body))
    }

    /// Register a method that may call the next most specific method.
    pub fn add_inner<F>(&self, types: [A::Type; N], body: F) -> RegistrationResult<A::Type>
    where
        F: Fn(&NextMethod<'_, A, R>, &[A]) -> DispatchResult<A, R> + Send + Sync + 'static,
    {
        self.add_method(types, Method::inner(body))
    }

    /// Register a method for the given parameter types.
    ///
    /// Fails if a method with an equal signature is already registered; the
    /// registry is left untouched in that case. On success every cached
    /// effective method is discarded.
    pub fn add_method(&self, types: [A::Type; N], method: Method<A, R>) -> RegistrationResult<A::Type> {
        let signature = Signature::from(types);
        let kind = method.kind();

        let mut guard = self.table.lock();
        let table = &mut *guard;

        match table.methods.entry(signature.clone()) {
            MapEntry::Occupied(_) => {
                debug!(
                    operation = %self.name,
                    signature = %signature,
                    "rejected duplicate method"
                );
                return Err(RegistrationError::DuplicateSignature {
                    operation: Arc::clone(&self.name),
                    signature,
                });
            }
            MapEntry::Vacant(slot) => {
                slot.insert(Arc::new(Entry::new(signature.clone(), method)));
            }
        }

        let dropped = table.cache.len();
        table.cache.clear();
        self.counters.registration();
        self.counters.invalidation();

        debug!(
            operation = %self.name,
            signature = %signature,
            kind = ?kind,
            dropped,
            "registered method"
        );
        Ok(())
    }

    /// Invoke the operation.
    ///
    /// Runs the effective method for the runtime types of `arguments`.
    pub fn invoke(&self, arguments: &[A; N]) -> DispatchResult<A, R> {
        let invoker = self.effective_method(Signature::of(arguments.as_slice()));
        invoker.invoke(arguments.as_slice())
    }

    /// Get or compute the effective method for a concrete signature.
    fn effective_method(&self, signature: Signature<A::Type>) -> Arc<Invoker<A, R>> {
        self.counters.invocation();

        let mut guard = self.table.lock();
        let table = &mut *guard;

        if !self.config.cache.enabled {
            self.counters.resolution();
            return Arc::new(
                DispatchResolver::new(&self.name, &table.methods).compute_effective_method(&signature),
            );
        }

        if let Some(invoker) = table.cache.get(&signature) {
            self.counters.cache_hit();
            trace!(operation = %self.name, signature = %signature, "cache hit");
            return Arc::clone(invoker);
        }

        self.counters.resolution();
        let invoker = Arc::new(
            DispatchResolver::new(&self.name, &table.methods).compute_effective_method(&signature),
        );
        table.cache.insert(signature, Arc::clone(&invoker));
        invoker
    }

    /// Specificity layers of the methods applicable to `types`, most specific
    /// first, without invoking anything.
    ///
    /// A layer with more than one signature is a tie.
    pub fn applicable(&self, types: [A::Type; N]) -> Vec<Vec<Signature<A::Type>>> {
        let signature = Signature::from(types);
        let table = self.table.lock();
        DispatchResolver::new(&self.name, &table.methods)
            .layers(&signature)
            .into_iter()
            .map(|layer| layer.iter().map(|e| e.signature().clone()).collect())
            .collect()
    }

    /// Declared signatures in registration order.
    pub fn signatures(&self) -> Vec<Signature<A::Type>> {
        self.table.lock().methods.keys().cloned().collect()
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.table.lock().methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of concrete signatures with a cached effective method.
    pub fn cached_signatures(&self) -> usize {
        self.table.lock().cache.len()
    }

    /// Snapshot of the instrumentation counters.
    pub fn stats(&self) -> DispatchStats {
        self.counters.snapshot()
    }
}

impl<A: Dispatchable, R, const N: usize> fmt::Display for GenericFunction<A, R, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GenericFunction({})", self.name)
    }
}

impl<A: Dispatchable, R, const N: usize> fmt::Debug for GenericFunction<A, R, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.lock();
        f.debug_struct("GenericFunction")
            .field("name", &self.name)
            .field("arity", &N)
            .field("methods", &table.methods.values().collect::<Vec<_>>())
            .field("cached", &table.cache.len())
            .finish()
    }
}
