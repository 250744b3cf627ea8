//! Dispatch result types and errors.

use std::sync::Arc;

use thiserror::Error;

use crate::descriptor::{Dispatchable, TypeDescriptor};
use crate::signature::Signature;

/// Result of invoking a generic function.
pub type DispatchResult<A, R> = Result<R, DispatchError<A>>;

/// Result of registering a method.
pub type RegistrationResult<T> = Result<(), RegistrationError<T>>;

/// Error raised by an invocation.
///
/// Every variant carries the operation name, the argument values and their
/// concrete signature.
#[derive(Debug, Error)]
pub enum DispatchError<A: Dispatchable> {
    /// No registered method accepts the concrete signature.
    #[error("there are no applicable methods on GenericFunction({operation}) when invoked with {arguments:?}")]
    MissingMethod {
        /// The operation that was called.
        operation: Arc<str>,
        /// The arguments provided.
        arguments: Vec<A>,
        /// Runtime types of the arguments.
        signature: Signature<A::Type>,
    },

    /// Two or more methods tie in the layer the call reached.
    #[error("ambiguous method selection on GenericFunction({operation}) when invoked with {arguments:?}; candidates are {candidates:?}")]
    AmbiguousMethods {
        /// The operation that was called.
        operation: Arc<str>,
        /// The arguments provided.
        arguments: Vec<A>,
        /// Runtime types of the arguments.
        signature: Signature<A::Type>,
        /// Declared signatures of the tied methods.
        candidates: Vec<Signature<A::Type>>,
    },

    /// An inner method asked for the next method past the end of the chain.
    #[error("there are no further applicable methods on GenericFunction({operation}) when invoked with {arguments:?}")]
    NoMoreMethods {
        /// The operation that was called.
        operation: Arc<str>,
        /// The arguments provided.
        arguments: Vec<A>,
        /// Runtime types of the arguments.
        signature: Signature<A::Type>,
    },
}

impl<A: Dispatchable> DispatchError<A> {
    /// Name of the operation that failed.
    pub fn operation(&self) -> &str {
        match self {
            Self::MissingMethod { operation, .. }
            | Self::AmbiguousMethods { operation, .. }
            | Self::NoMoreMethods { operation, .. } => operation.as_ref(),
        }
    }

    /// The arguments the operation was invoked with.
    pub fn arguments(&self) -> &[A] {
        match self {
            Self::MissingMethod { arguments, .. }
            | Self::AmbiguousMethods { arguments, .. }
            | Self::NoMoreMethods { arguments, .. } => arguments.as_slice(),
        }
    }

    /// The concrete signature of the failed call.
    pub fn signature(&self) -> &Signature<A::Type> {
        match self {
            Self::MissingMethod { signature, .. }
            | Self::AmbiguousMethods { signature, .. }
            | Self::NoMoreMethods { signature, .. } => signature,
        }
    }

    /// The tied candidates, for an ambiguity; empty otherwise.
    pub fn candidates(&self) -> &[Signature<A::Type>] {
        match self {
            Self::AmbiguousMethods { candidates, .. } => candidates.as_slice(),
            _ => &[],
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::MissingMethod { .. })
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::AmbiguousMethods { .. })
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::NoMoreMethods { .. })
    }
}

/// Error raised when registering a method.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError<T: TypeDescriptor> {
    /// A method with an equal declared signature already exists.
    #[error("GenericFunction({operation}) already has a method for {signature}")]
    DuplicateSignature {
        /// The operation being extended.
        operation: Arc<str>,
        /// The rejected declared signature.
        signature: Signature<T>,
    },
}
