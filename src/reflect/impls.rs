//! `Reflect` for std, chrono, uuid and num-bigint types.

use super::descriptor::{
    EntryIter, NullableInfo, PolymorphicKind, ReflectIter, Scalar, ScalarKind, SequenceInfo,
    TypeDescriptor, TypeKind, WellKnown, WellKnownInfo, WellKnownKind,
};
use super::{descriptor_of, downcast, Reflect};
use crate::Result;
use chrono::{DateTime, FixedOffset, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use uuid::Uuid;

macro_rules! impl_scalar {
    ($($ty:ty => $kind:ident, |$v:ident| $read:expr;)*) => {
        $(
            impl Reflect for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::scalar::<$ty>(ScalarKind::$kind, |value| {
                        let $v = downcast::<$ty>(value)?;
                        Ok($read)
                    })
                }
            }
        )*
    };
}

// Widths below 32 bits are promoted to i32 before the integer path.
impl_scalar! {
    bool => Bool, |v| Scalar::Bool(*v);
    char => Char, |v| Scalar::Char(*v);
    i8 => Integer, |v| Scalar::Int(i64::from(i32::from(*v)));
    i16 => Integer, |v| Scalar::Int(i64::from(i32::from(*v)));
    u8 => Integer, |v| Scalar::Int(i64::from(i32::from(*v)));
    u16 => Integer, |v| Scalar::Int(i64::from(i32::from(*v)));
    i32 => Integer, |v| Scalar::Int(i64::from(*v));
    i64 => Integer, |v| Scalar::Int(*v);
    isize => Integer, |v| Scalar::Int(*v as i64);
    u32 => Integer, |v| Scalar::UInt(u64::from(*v));
    u64 => Integer, |v| Scalar::UInt(*v);
    usize => Integer, |v| Scalar::UInt(*v as u64);
    f32 => Float, |v| Scalar::Float(*v);
    f64 => Float, |v| Scalar::Double(*v);
    BigInt => Decimal, |v| Scalar::Decimal(v);
    String => String, |v| Scalar::Str(v.as_str());
    &'static str => String, |v| Scalar::Str(*v);
}

impl Reflect for () {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<()>(TypeKind::Null).value_type()
    }

    fn is_null(&self) -> bool {
        true
    }
}

fn unwrap_option<T: Reflect>(value: &dyn Reflect) -> Result<Option<&dyn Reflect>> {
    Ok(downcast::<Option<T>>(value)?
        .as_ref()
        .map(|inner| inner as &dyn Reflect))
}

impl<T: Reflect> Reflect for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Option<T>>(TypeKind::Nullable(NullableInfo {
            inner: descriptor_of::<T>,
            unwrap: unwrap_option::<T>,
        }))
        .value_type()
    }

    fn is_null(&self) -> bool {
        self.as_ref().map_or(true, |inner| inner.is_null())
    }
}

fn slice_len<C: Reflect + AsRef<[T]>, T: Reflect>(value: &dyn Reflect) -> Result<usize> {
    Ok(downcast::<C>(value)?.as_ref().len())
}

fn slice_get<C: Reflect + AsRef<[T]>, T: Reflect>(
    value: &dyn Reflect,
    index: usize,
) -> Result<Option<&dyn Reflect>> {
    Ok(downcast::<C>(value)?
        .as_ref()
        .get(index)
        .map(|item| item as &dyn Reflect))
}

fn slice_info<C: Reflect + AsRef<[T]>, T: Reflect>() -> SequenceInfo {
    SequenceInfo {
        element: descriptor_of::<T>,
        len: slice_len::<C, T>,
        get: slice_get::<C, T>,
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<[T; N]>(TypeKind::Array(slice_info::<[T; N], T>()))
    }
}

impl<T: Reflect> Reflect for Box<[T]> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Box<[T]>>(TypeKind::Array(slice_info::<Box<[T]>, T>()))
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::collection::<Vec<T>>()
            .list::<T>(slice_len::<Vec<T>, T>, slice_get::<Vec<T>, T>)
            .build()
    }
}

fn deque_len<T: Reflect>(value: &dyn Reflect) -> Result<usize> {
    Ok(downcast::<VecDeque<T>>(value)?.len())
}

fn deque_get<T: Reflect>(value: &dyn Reflect, index: usize) -> Result<Option<&dyn Reflect>> {
    Ok(downcast::<VecDeque<T>>(value)?
        .get(index)
        .map(|item| item as &dyn Reflect))
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::collection::<VecDeque<T>>()
            .list::<T>(deque_len::<T>, deque_get::<T>)
            .build()
    }
}

fn hash_set_iter<T: Reflect + Eq + Hash>(value: &dyn Reflect) -> Result<ReflectIter<'_>> {
    let iter: ReflectIter<'_> = Box::new(
        downcast::<HashSet<T>>(value)?
            .iter()
            .map(|item| item as &dyn Reflect),
    );
    Ok(iter)
}

fn btree_set_iter<T: Reflect + Ord>(value: &dyn Reflect) -> Result<ReflectIter<'_>> {
    let iter: ReflectIter<'_> = Box::new(
        downcast::<BTreeSet<T>>(value)?
            .iter()
            .map(|item| item as &dyn Reflect),
    );
    Ok(iter)
}

impl<T: Reflect + Eq + Hash> Reflect for HashSet<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::collection::<HashSet<T>>()
            .enumerable::<T>(hash_set_iter::<T>)
            .build()
    }
}

impl<T: Reflect + Ord> Reflect for BTreeSet<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::collection::<BTreeSet<T>>()
            .enumerable::<T>(btree_set_iter::<T>)
            .build()
    }
}

fn hash_map_entries<K, V>(value: &dyn Reflect) -> Result<EntryIter<'_>>
where
    K: Reflect + Eq + Hash,
    V: Reflect,
{
    let entries: EntryIter<'_> = Box::new(
        downcast::<HashMap<K, V>>(value)?
            .iter()
            .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
    );
    Ok(entries)
}

fn index_map_entries<K, V>(value: &dyn Reflect) -> Result<EntryIter<'_>>
where
    K: Reflect + Eq + Hash,
    V: Reflect,
{
    let entries: EntryIter<'_> = Box::new(
        downcast::<IndexMap<K, V>>(value)?
            .iter()
            .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
    );
    Ok(entries)
}

fn btree_map_entries<K, V>(value: &dyn Reflect) -> Result<EntryIter<'_>>
where
    K: Reflect + Ord,
    V: Reflect,
{
    let entries: EntryIter<'_> = Box::new(
        downcast::<BTreeMap<K, V>>(value)?
            .iter()
            .map(|(k, v)| (k as &dyn Reflect, v as &dyn Reflect)),
    );
    Ok(entries)
}

impl<K: Reflect + Eq + Hash, V: Reflect> Reflect for HashMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::collection::<HashMap<K, V>>()
            .dictionary::<K, V>(hash_map_entries::<K, V>)
            .build()
    }
}

impl<K: Reflect + Eq + Hash, V: Reflect> Reflect for IndexMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::collection::<IndexMap<K, V>>()
            .dictionary::<K, V>(index_map_entries::<K, V>)
            .build()
    }
}

impl<K: Reflect + Ord, V: Reflect> Reflect for BTreeMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::collection::<BTreeMap<K, V>>()
            .dictionary::<K, V>(btree_map_entries::<K, V>)
            .build()
    }
}

fn resolve_boxed(value: &dyn Reflect) -> Result<Option<&dyn Reflect>> {
    let boxed = downcast::<Box<dyn Reflect>>(value)?;
    let inner = (**boxed).as_reflect();
    Ok((!inner.is_null()).then_some(inner))
}

/// A boxed value of any type; the runtime type decides how it is written.
impl Reflect for Box<dyn Reflect> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::polymorphic::<Box<dyn Reflect>>(PolymorphicKind::Dynamic, resolve_boxed)
            .with_name("Object")
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

macro_rules! impl_well_known {
    ($($ty:ty => $kind:ident, $name:literal, |$v:ident| $read:expr;)*) => {
        $(
            impl Reflect for $ty {
                fn describe() -> TypeDescriptor {
                    well_known::<$ty>(WellKnownKind::$kind, $name, |value| {
                        let $v = downcast::<$ty>(value)?;
                        Ok($read)
                    })
                }
            }
        )*
    };
}

fn well_known<T: Reflect>(
    kind: WellKnownKind,
    name: &'static str,
    read: for<'a> fn(&'a dyn Reflect) -> Result<WellKnown<'a>>,
) -> TypeDescriptor {
    TypeDescriptor::new::<T>(TypeKind::WellKnown(WellKnownInfo { kind, read })).with_name(name)
}

impl_well_known! {
    Box<dyn std::error::Error + Send + Sync> => Exception, "Exception", |v| WellKnown::Exception(&**v);
    &'static TypeDescriptor => Type, "Type", |v| WellKnown::Type(*v);
    Blob => Blob, "Blob", |v| WellKnown::Blob(&v.0);
}

// Dates, durations and identifiers are value types with a default.
macro_rules! impl_well_known_value {
    ($($ty:ty => $kind:ident, $name:literal, |$v:ident| $read:expr;)*) => {
        $(
            impl Reflect for $ty {
                fn describe() -> TypeDescriptor {
                    well_known::<$ty>(WellKnownKind::$kind, $name, |value| {
                        let $v = downcast::<$ty>(value)?;
                        Ok($read)
                    })
                    .value_type()
                    .with_default::<$ty>()
                }
            }
        )*
    };
}

impl_well_known_value! {
    DateTime<Utc> => Date, "DateTime", |v| WellKnown::Date(v);
    DateTime<FixedOffset> => DateOffset, "DateTimeOffset", |v| WellKnown::DateOffset(v);
    Uuid => Guid, "Guid", |v| WellKnown::Guid(v);
    chrono::Duration => TimeSpan, "TimeSpan", |v| WellKnown::TimeSpan(v);
}

/// Opaque binary content written as a base64 string.
///
/// `Vec<u8>` is a list of numbers; wrap bytes in `Blob` (or use `[u8; N]` /
/// `Box<[u8]>`) to get base64 text instead.
///
/// # Examples
///
/// ```rust
/// use typetext::{to_json, Blob};
///
/// assert_eq!(to_json(&Blob(b"hi".to_vec())).unwrap(), "\"aGk=\"");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Blob(pub Vec<u8>);

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Blob(bytes)
    }
}
