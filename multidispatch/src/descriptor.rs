//! Runtime type descriptors.
//!
//! Dispatch never inspects argument values directly. Each argument is reduced
//! to a [`TypeDescriptor`] through [`Dispatchable`], and applicability is
//! decided by the descriptor's subtype test alone.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// An opaque handle for a runtime type.
///
/// Descriptors are compared by identity (`Eq`/`Hash`) when used as cache and
/// registry keys, and by [`is_assignable_from`](Self::is_assignable_from) when
/// deciding applicability and specificity.
pub trait TypeDescriptor: Clone + Eq + Hash + fmt::Debug + Send + Sync {
    /// Check whether values of type `other` can be used where `self` is
    /// expected.
    ///
    /// Must be reflexive and transitive.
    fn is_assignable_from(&self, other: &Self) -> bool;
}

/// A value whose runtime type can be observed.
pub trait Dispatchable: Clone + fmt::Debug + 'static {
    /// The descriptor type describing values of this kind.
    type Type: TypeDescriptor;

    /// The runtime type of this value.
    fn runtime_type(&self) -> Self::Type;
}

/// Rust's own type ids have no subtyping: a type only accepts itself.
impl TypeDescriptor for TypeId {
    fn is_assignable_from(&self, other: &Self) -> bool {
        self == other
    }
}

impl Dispatchable for Arc<dyn Any + Send + Sync> {
    type Type = TypeId;

    fn runtime_type(&self) -> TypeId {
        // Through the vtable, so this is the erased type and not `Arc`'s.
        Any::type_id(self.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id_is_exact() {
        let int = TypeId::of::<i32>();
        let long = TypeId::of::<i64>();

        assert!(int.is_assignable_from(&int));
        assert!(!int.is_assignable_from(&long));
        assert!(!long.is_assignable_from(&int));
    }

    #[test]
    fn test_erased_value_reports_inner_type() {
        let value: Arc<dyn Any + Send + Sync> = Arc::new(7u8);
        assert_eq!(value.runtime_type(), TypeId::of::<u8>());
        assert_ne!(value.runtime_type(), TypeId::of::<Arc<dyn Any + Send + Sync>>());
    }
}
