//! Signatures and the specificity relation.

use std::fmt;
use std::sync::Arc;

use crate::descriptor::{Dispatchable, TypeDescriptor};

/// An ordered, fixed-length tuple of type descriptors.
///
/// Used both for the declared parameter types of a method and for the
/// concrete argument types of a call. Two signatures are equal iff they are
/// equal position by position.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature<T> {
    types: Arc<[T]>,
}

impl<T: TypeDescriptor> Signature<T> {
    /// Create a signature from the given types.
    pub fn new(types: impl Into<Arc<[T]>>) -> Self {
        Self { types: types.into() }
    }

    /// The concrete signature of a list of arguments.
    pub fn of<A>(arguments: &[A]) -> Self
    where
        A: Dispatchable<Type = T>,
    {
        arguments.iter().map(Dispatchable::runtime_type).collect()
    }

    /// Number of positions.
    pub fn arity(&self) -> usize {
        self.types.len()
    }

    /// The types, in position order.
    pub fn types(&self) -> &[T] {
        &self.types
    }

    /// Check whether a method declared with this signature can be called with
    /// arguments of the `concrete` types.
    ///
    /// Holds iff every declared type is assignable from the concrete type at
    /// the same position.
    pub fn accepts(&self, concrete: &Signature<T>) -> bool {
        debug_assert_eq!(
            self.arity(),
            concrete.arity(),
            "signatures of one operation share an arity"
        );
        self.types
            .iter()
            .zip(concrete.types.iter())
            .all(|(declared, actual)| declared.is_assignable_from(actual))
    }

    /// Check whether this signature is at least as specific as `other`.
    ///
    /// Reflexive and transitive, but not total: two signatures may be
    /// incomparable.
    pub fn implies(&self, other: &Signature<T>) -> bool {
        other.accepts(self)
    }

    /// Check whether this signature is strictly more specific than `other`.
    pub fn strictly_implies(&self, other: &Signature<T>) -> bool {
        self.implies(other) && !other.implies(self)
    }
}

impl<T: TypeDescriptor> FromIterator<T> for Signature<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: TypeDescriptor, const N: usize> From<[T; N]> for Signature<T> {
    fn from(types: [T; N]) -> Self {
        Self::new(Vec::from(types))
    }
}

impl<T: fmt::Debug> fmt::Display for Signature<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, ty) in self.types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", ty)?;
        }
        write!(f, ")")
    }
}

impl<T: fmt::Debug> fmt::Debug for Signature<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::TypeHierarchy;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_accepts_componentwise() {
        let mut h = TypeHierarchy::with_root("Object");
        let object = h.root().cloned().unwrap();
        let chars = h.define("CharSequence", &[]).unwrap();
        let string = h.define("String", &[&chars]).unwrap();

        let declared = Signature::from([chars.clone(), object.clone()]);

        assert!(declared.accepts(&Signature::from([string.clone(), string.clone()])));
        assert!(declared.accepts(&Signature::from([chars.clone(), object.clone()])));
        assert!(!declared.accepts(&Signature::from([object.clone(), string.clone()])));
    }

    #[test]
    fn test_implies_is_partial() {
        let mut h = TypeHierarchy::with_root("Object");
        let chars = h.define("CharSequence", &[]).unwrap();
        let string = h.define("String", &[&chars]).unwrap();

        let cs = Signature::from([chars.clone(), string.clone()]);
        let sc = Signature::from([string.clone(), chars.clone()]);
        let ss = Signature::from([string.clone(), string.clone()]);

        // Reflexive
        assert!(cs.implies(&cs));
        assert!(!cs.strictly_implies(&cs));

        // Incomparable
        assert!(!cs.implies(&sc));
        assert!(!sc.implies(&cs));

        // Strictly more specific than both
        assert!(ss.strictly_implies(&cs));
        assert!(ss.strictly_implies(&sc));
    }

    #[test]
    fn test_display() {
        let mut h = TypeHierarchy::with_root("Object");
        let string = h.define("String", &[]).unwrap();
        let object = h.root().cloned().unwrap();

        let sig = Signature::from([string, object]);
        assert_eq!(sig.to_string(), "(String, Object)");
        assert_eq!(format!("{:?}", sig), "(String, Object)");
        assert_eq!(sig.arity(), 2);
    }
}
