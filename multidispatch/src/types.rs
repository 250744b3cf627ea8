//! Registered methods and the next-method continuation.

use std::fmt;
use std::sync::Arc;

use crate::descriptor::Dispatchable;
use crate::resolver::Invoker;
use crate::result::DispatchResult;
use crate::signature::Signature;

/// Body of a leaf method: terminal, never delegates.
pub type LeafBody<A, R> = dyn Fn(&[A]) -> R + Send + Sync;

/// Body of an inner method: may delegate through its [`NextMethod`].
pub type InnerBody<A, R> =
    dyn Fn(&NextMethod<'_, A, R>, &[A]) -> DispatchResult<A, R> + Send + Sync;

/// Whether a method can delegate onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Terminal implementation.
    Leaf,
    /// Implementation that may call the next less specific method.
    Inner,
}

/// A method body tagged with its kind.
pub enum Method<A: Dispatchable, R> {
    Leaf(Arc<LeafBody<A, R>>),
    Inner(Arc<InnerBody<A, R>>),
}

impl<A: Dispatchable, R> Method<A, R> {
    /// Wrap a terminal method body.
    pub fn leaf<F>(body: F) -> Self
    where
        F: Fn(&[A]) -> R + Send + Sync + 'static,
    {
        Self::Leaf(Arc::new(body))
    }

    /// Wrap a method body that receives a next-method continuation.
    pub fn inner<F>(body: F) -> Self
    where
        F: Fn(&NextMethod<'_, A, R>, &[A]) -> DispatchResult<A, R> + Send + Sync + 'static,
    {
        Self::Inner(Arc::new(body))
    }

    pub fn kind(&self) -> MethodKind {
        match self {
            Self::Leaf(_) => MethodKind::Leaf,
            Self::Inner(_) => MethodKind::Inner,
        }
    }
}

impl<A: Dispatchable, R> Clone for Method<A, R> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf(body) => Self::Leaf(Arc::clone(body)),
            Self::Inner(body) => Self::Inner(Arc::clone(body)),
        }
    }
}

impl<A: Dispatchable, R> fmt::Debug for Method<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method::{:?}", self.kind())
    }
}

/// A registered method: a declared signature and its body.
///
/// Created only by registration and never mutated afterwards.
pub struct Entry<A: Dispatchable, R> {
    signature: Signature<A::Type>,
    method: Method<A, R>,
}

impl<A: Dispatchable, R> Entry<A, R> {
    pub(crate) fn new(signature: Signature<A::Type>, method: Method<A, R>) -> Self {
        Self { signature, method }
    }

    /// The declared parameter types.
    pub fn signature(&self) -> &Signature<A::Type> {
        &self.signature
    }

    pub fn kind(&self) -> MethodKind {
        self.method.kind()
    }

    /// Check whether this method is applicable to the concrete signature.
    pub fn accepts(&self, concrete: &Signature<A::Type>) -> bool {
        self.signature.accepts(concrete)
    }

    /// Check whether this method is at least as specific as `other`.
    pub fn implies(&self, other: &Entry<A, R>) -> bool {
        self.signature.implies(&other.signature)
    }

    /// Bind this method in front of `next`.
    ///
    /// A leaf ignores `next` and becomes a terminal invoker; an inner method
    /// keeps `next` as its continuation.
    pub(crate) fn bind(&self, next: Arc<Invoker<A, R>>) -> Invoker<A, R> {
        match &self.method {
            Method::Leaf(body) => Invoker::Leaf {
                signature: self.signature.clone(),
                body: Arc::clone(body),
            },
            Method::Inner(body) => Invoker::Inner {
                signature: self.signature.clone(),
                body: Arc::clone(body),
                next,
            },
        }
    }
}

impl<A: Dispatchable, R> fmt::Debug for Entry<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("signature", &self.signature)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Continuation handed to inner methods.
///
/// [`call`](Self::call) runs the next less specific applicable method with
/// the same arguments.
pub struct NextMethod<'a, A: Dispatchable, R> {
    invoker: &'a Invoker<A, R>,
    arguments: &'a [A],
}

impl<'a, A: Dispatchable, R> NextMethod<'a, A, R> {
    pub(crate) fn new(invoker: &'a Invoker<A, R>, arguments: &'a [A]) -> Self {
        Self { invoker, arguments }
    }

    /// Invoke the next method.
    ///
    /// Fails with [`NoMoreMethods`](crate::DispatchError::NoMoreMethods) when
    /// the caller is already the least specific applicable method, and with
    /// [`AmbiguousMethods`](crate::DispatchError::AmbiguousMethods) when the
    /// next layer is a tie.
    pub fn call(&self) -> DispatchResult<A, R> {
        self.invoker.invoke(self.arguments)
    }

    /// The arguments the chain was invoked with.
    pub fn arguments(&self) -> &'a [A] {
        self.arguments
    }
}

impl<A: Dispatchable, R> fmt::Debug for NextMethod<'_, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NextMethod")
            .field("invoker", self.invoker)
            .field("arguments", &self.arguments)
            .finish()
    }
}
