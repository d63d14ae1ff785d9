//! Runtime type descriptions.
//!
//! Every type the engine can write implements [`Reflect`]. Its
//! [`TypeDescriptor`] is built once on first request, leaked into a
//! process-wide registry and handed out as `&'static TypeDescriptor` from then
//! on, so descriptors can reference each other freely.
//!
//! Nested types are referenced through [`TypeRef`] function pointers instead
//! of descriptors. Building a descriptor never builds the descriptors of its
//! members, which is what lets a type contain itself:
//!
//! ```rust
//! use typetext::{reflect_object, to_json};
//!
//! struct Node {
//!     name: String,
//!     children: Vec<Node>,
//! }
//!
//! reflect_object!(Node { name, children });
//!
//! let tree = Node {
//!     name: "root".into(),
//!     children: vec![Node { name: "leaf".into(), children: vec![] }],
//! };
//! assert_eq!(
//!     to_json(&tree).unwrap(),
//!     r#"{"name":"root","children":[{"name":"leaf","children":[]}]}"#
//! );
//! ```

mod descriptor;
mod impls;

pub use descriptor::{
    BitsFn, Capability, DataMember, DefaultValue, DictionaryInfo, EntriesFn, EntryIter, EnumInfo,
    EnumerableInfo, FieldInfo, GetFn, Integral, IterFn, LenFn, MemberAccess, NameFn,
    NullableInfo, ObjectBuilder, ObjectInfo, PolymorphicInfo, PolymorphicKind, ReflectIter,
    Resolve, Scalar, ScalarInfo, ScalarKind, SequenceInfo, TypeDescriptor, TypeKind, WellKnown,
    WellKnownInfo, WellKnownKind,
};
pub use impls::Blob;

use crate::cache::SnapshotMap;
use crate::{Error, Result};
use std::any::{Any, TypeId};
use std::sync::OnceLock;

/// Lazy reference to the descriptor of a nested type.
pub type TypeRef = fn() -> &'static TypeDescriptor;

/// A type the engine knows how to describe and write.
///
/// Implement it with [`reflect_object!`](crate::reflect_object),
/// [`reflect_enum!`](crate::reflect_enum) and the other macros, or by hand
/// with the [`TypeDescriptor`] builders.
pub trait Reflect: AsReflect + Send + Sync + 'static {
    /// Builds the descriptor of this type. Called at most once per type.
    fn describe() -> TypeDescriptor
    where
        Self: Sized;

    /// Returns `true` if this value stands for an absent value.
    fn is_null(&self) -> bool {
        false
    }
}

/// Object-safe access to a value's reflection data.
pub trait AsReflect {
    fn as_reflect(&self) -> &dyn Reflect;

    fn as_any(&self) -> &dyn Any;

    /// Descriptor of the value's concrete type.
    fn type_descriptor(&self) -> &'static TypeDescriptor;
}

impl<T: Reflect> AsReflect for T {
    #[inline]
    fn as_reflect(&self) -> &dyn Reflect {
        self
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn type_descriptor(&self) -> &'static TypeDescriptor {
        descriptor_of::<T>()
    }
}

fn registry() -> &'static SnapshotMap<TypeId, &'static TypeDescriptor> {
    static REGISTRY: OnceLock<SnapshotMap<TypeId, &'static TypeDescriptor>> = OnceLock::new();
    REGISTRY.get_or_init(SnapshotMap::new)
}

/// Returns the descriptor of `T`, building it on first use.
///
/// Lookups read a lock-free snapshot. The descriptor is built before it is
/// published; when two threads race, the first publish wins and the other
/// copy stays unused.
///
/// # Examples
///
/// ```rust
/// use typetext::reflect::{descriptor_of, TypeKind};
///
/// let desc = descriptor_of::<Option<i32>>();
/// assert!(matches!(desc.kind(), TypeKind::Nullable(_)));
/// assert!(std::ptr::eq(desc, descriptor_of::<Option<i32>>()));
/// ```
#[must_use]
pub fn descriptor_of<T: Reflect>() -> &'static TypeDescriptor {
    let id = TypeId::of::<T>();
    if let Some(desc) = registry().get(&id) {
        return desc;
    }
    let built: &'static TypeDescriptor = Box::leak(Box::new(T::describe()));
    registry().publish(id, built)
}

/// Downcasts a reflected value to its concrete type.
///
/// # Errors
///
/// Returns [`Error::TypeMismatch`] when `value` is not a `T`.
pub fn downcast<T: Reflect>(value: &dyn Reflect) -> Result<&T> {
    value.as_any().downcast_ref::<T>().ok_or_else(|| {
        Error::type_mismatch(
            std::any::type_name::<T>(),
            value.type_descriptor().type_path(),
        )
    })
}

/// Strips module paths from a type name: `alloc::vec::Vec<my::Node>` becomes `Vec<Node>`.
#[must_use]
pub fn short_type_name(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut segment_start = 0;
    for (i, ch) in path.char_indices() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            continue;
        }
        push_last_segment(&mut out, &path[segment_start..i]);
        out.push(ch);
        segment_start = i + ch.len_utf8();
    }
    push_last_segment(&mut out, &path[segment_start..]);
    out
}

fn push_last_segment(out: &mut String, ident: &str) {
    out.push_str(ident.rsplit("::").next().unwrap_or(ident));
}
