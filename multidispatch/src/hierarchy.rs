//! A nominal type hierarchy.
//!
//! Hosts without a reflective type system of their own can declare their
//! types here. Every type records its direct supertypes and the transitive
//! closure of its ancestors (itself included), so the subtype test is a
//! single set lookup. Multiple inheritance is allowed: a type may extend any
//! number of previously defined types, the way a class both extends a base
//! class and implements interfaces.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::descriptor::{Dispatchable, TypeDescriptor};

/// Source of process-unique tag ids, so tags from different hierarchies never
/// compare equal.
static NEXT_TAG_ID: AtomicU64 = AtomicU64::new(1);

/// Errors raised while defining types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("type `{0}` is already defined")]
    DuplicateType(String),

    #[error("supertype `{supertype}` of `{name}` belongs to a different hierarchy")]
    ForeignSupertype {
        /// The type being defined.
        name: String,
        /// The offending supertype.
        supertype: String,
    },
}

/// Hierarchy result type.
pub type HierarchyResult<T> = Result<T, HierarchyError>;

/// A handle to a type defined in a [`TypeHierarchy`].
///
/// Cheap to clone. Equality and hashing use the tag's identity, not its name.
#[derive(Clone)]
pub struct TypeTag {
    node: Arc<TypeNode>,
}

struct TypeNode {
    id: u64,
    name: String,
    supertypes: Vec<TypeTag>,
    /// Ids of every type this one is assignable to, including itself.
    ancestors: FxHashSet<u64>,
}

impl TypeTag {
    fn new(name: String, supertypes: Vec<TypeTag>) -> Self {
        let id = NEXT_TAG_ID.fetch_add(1, Ordering::Relaxed);
        let mut ancestors = FxHashSet::default();
        ancestors.insert(id);
        for st in &supertypes {
            ancestors.extend(st.node.ancestors.iter().copied());
        }
        Self {
            node: Arc::new(TypeNode {
                id,
                name,
                supertypes,
                ancestors,
            }),
        }
    }

    /// The type's name.
    pub fn name(&self) -> &str {
        &self.node.name
    }

    /// Direct supertypes, in declaration order.
    pub fn supertypes(&self) -> &[TypeTag] {
        &self.node.supertypes
    }

    /// Check whether this type is `other` or one of its descendants.
    pub fn is_subtype_of(&self, other: &TypeTag) -> bool {
        self.node.ancestors.contains(&other.node.id)
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.node.id == other.node.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.node.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.node.name)
    }
}

impl TypeDescriptor for TypeTag {
    fn is_assignable_from(&self, other: &Self) -> bool {
        other.is_subtype_of(self)
    }
}

/// A set of named types and their subtype relation.
#[derive(Debug, Default)]
pub struct TypeHierarchy {
    /// Implicit supertype of every type declared without one.
    root: Option<TypeTag>,
    types: IndexMap<String, TypeTag>,
}

impl TypeHierarchy {
    /// Create an empty hierarchy without a common root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a hierarchy whose root type is an implicit supertype of every
    /// type defined without explicit supertypes.
    pub fn with_root(name: impl Into<String>) -> Self {
        let name = name.into();
        let root = TypeTag::new(name.clone(), Vec::new());
        let mut types = IndexMap::new();
        types.insert(name, root.clone());
        Self {
            root: Some(root),
            types,
        }
    }

    /// The root type, if this hierarchy has one.
    pub fn root(&self) -> Option<&TypeTag> {
        self.root.as_ref()
    }

    /// Define a new type extending `supertypes`.
    ///
    /// With no supertypes the type extends the root, if any. Fails if the
    /// name is taken or a supertype was not defined in this hierarchy.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        supertypes: &[&TypeTag],
    ) -> HierarchyResult<TypeTag> {
        let name = name.into();
        if self.types.contains_key(&name) {
            return Err(HierarchyError::DuplicateType(name));
        }

        for st in supertypes {
            if self.types.get(st.name()) != Some(*st) {
                return Err(HierarchyError::ForeignSupertype {
                    name,
                    supertype: st.name().to_string(),
                });
            }
        }

        let supertypes: Vec<TypeTag> = if supertypes.is_empty() {
            self.root.iter().cloned().collect()
        } else {
            supertypes.iter().map(|&st| st.clone()).collect()
        };

        let tag = TypeTag::new(name.clone(), supertypes);
        self.types.insert(name, tag.clone());
        Ok(tag)
    }

    /// Look up a type by name.
    pub fn lookup(&self, name: &str) -> Option<&TypeTag> {
        self.types.get(name)
    }

    /// Number of defined types, the root included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check whether no type has been defined.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All types in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeTag> {
        self.types.values()
    }
}

/// A value paired with its type tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<V> {
    /// The runtime type of the value.
    pub tag: TypeTag,
    /// The payload.
    pub value: V,
}

impl<V> Tagged<V> {
    /// Pair a value with its type.
    pub fn new(tag: &TypeTag, value: V) -> Self {
        Self {
            tag: tag.clone(),
            value,
        }
    }
}

impl<V: Clone + fmt::Debug + 'static> Dispatchable for Tagged<V> {
    type Type = TypeTag;

    fn runtime_type(&self) -> TypeTag {
        self.tag.clone()
    }
}
