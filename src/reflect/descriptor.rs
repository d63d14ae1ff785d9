use super::{downcast, short_type_name, Reflect, TypeRef};
use crate::Result;
use chrono::{DateTime, FixedOffset, Utc};
use num_bigint::BigInt;
use std::any::{type_name, TypeId};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

pub type Resolve = for<'a> fn(&'a dyn Reflect) -> Result<Option<&'a dyn Reflect>>;
pub type LenFn = fn(&dyn Reflect) -> Result<usize>;
pub type GetFn = for<'a> fn(&'a dyn Reflect, usize) -> Result<Option<&'a dyn Reflect>>;
pub type ReflectIter<'a> = Box<dyn Iterator<Item = &'a dyn Reflect> + 'a>;
pub type EntryIter<'a> = Box<dyn Iterator<Item = (&'a dyn Reflect, &'a dyn Reflect)> + 'a>;
pub type IterFn = for<'a> fn(&'a dyn Reflect) -> Result<ReflectIter<'a>>;
pub type EntriesFn = for<'a> fn(&'a dyn Reflect) -> Result<EntryIter<'a>>;

type TextFn = Box<dyn Fn(&dyn Reflect) -> Result<String> + Send + Sync>;
pub type NameFn = Box<dyn Fn(&dyn Reflect) -> Result<&'static str> + Send + Sync>;
/// Hands the reflected underlying integer of a flags value to a writer.
pub type BitsFn = Box<
    dyn Fn(&dyn Reflect, &mut dyn FnMut(&dyn Reflect) -> Result<()>) -> Result<()> + Send + Sync,
>;

/// Immutable classification of one Rust type.
pub struct TypeDescriptor {
    type_id: TypeId,
    type_path: &'static str,
    name: String,
    kind: TypeKind,
    value_type: bool,
    default: Option<DefaultValue>,
}

/// What a type is, as far as the procedure compiler is concerned.
pub enum TypeKind {
    /// The unit type; always written as the null token.
    Null,
    Scalar(ScalarInfo),
    Nullable(NullableInfo),
    /// Fixed-size arrays and boxed slices.
    Array(SequenceInfo),
    Enum(EnumInfo),
    WellKnown(WellKnownInfo),
    Polymorphic(PolymorphicInfo),
    Object(ObjectInfo),
}

impl TypeKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            TypeKind::Null => "null",
            TypeKind::Scalar(_) => "scalar",
            TypeKind::Nullable(_) => "nullable",
            TypeKind::Array(_) => "array",
            TypeKind::Enum(_) => "enum",
            TypeKind::WellKnown(_) => "well-known",
            TypeKind::Polymorphic(_) => "polymorphic",
            TypeKind::Object(_) => "object",
        }
    }
}

/// A scalar value borrowed out of a reflected value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
    Decimal(&'a BigInt),
    Str(&'a str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Char,
    Integer,
    Float,
    Decimal,
    String,
}

impl ScalarKind {
    /// Numeric and boolean keys are quoted when they serve as map keys.
    #[must_use]
    pub const fn needs_key_encoding(self) -> bool {
        matches!(
            self,
            ScalarKind::Bool | ScalarKind::Integer | ScalarKind::Float | ScalarKind::Decimal
        )
    }
}

pub struct ScalarInfo {
    pub kind: ScalarKind,
    pub read: for<'a> fn(&'a dyn Reflect) -> Result<Scalar<'a>>,
}

pub struct NullableInfo {
    pub inner: TypeRef,
    pub unwrap: Resolve,
}

/// Indexed access to a sequence.
pub struct SequenceInfo {
    pub element: TypeRef,
    pub len: LenFn,
    pub get: GetFn,
}

pub enum EnumInfo {
    /// Written as the variant name.
    Named { name: NameFn },
    /// Written through the procedure of the underlying integer type.
    Flags { underlying: TypeRef, bits: BitsFn },
}

impl EnumInfo {
    #[must_use]
    pub const fn is_flags(&self) -> bool {
        matches!(self, EnumInfo::Flags { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WellKnownKind {
    Date,
    DateOffset,
    Guid,
    TimeSpan,
    Exception,
    Type,
    Blob,
}

/// A borrowed value of one of the types with a dedicated canonical form.
pub enum WellKnown<'a> {
    Date(&'a DateTime<Utc>),
    DateOffset(&'a DateTime<FixedOffset>),
    Guid(&'a Uuid),
    TimeSpan(&'a chrono::Duration),
    Exception(&'a (dyn std::error::Error + Send + Sync)),
    Type(&'static TypeDescriptor),
    Blob(&'a [u8]),
}

pub struct WellKnownInfo {
    pub kind: WellKnownKind,
    pub read: for<'a> fn(&'a dyn Reflect) -> Result<WellKnown<'a>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolymorphicKind {
    /// `Box<dyn Reflect>` and other "any value" holders.
    Dynamic,
    /// A boxed user trait object.
    Interface,
    /// A boxed user trait object whose implementors share a base shape.
    Abstract,
}

pub struct PolymorphicInfo {
    pub kind: PolymorphicKind,
    /// Returns the runtime value, or `None` for an absent one.
    pub resolve: Resolve,
}

pub struct ObjectInfo {
    contract: bool,
    fields: Vec<FieldInfo>,
    capabilities: Vec<Capability>,
    to_text: Option<TextFn>,
}

impl ObjectInfo {
    /// Whether only [`DataMember`]-tagged fields are written.
    #[must_use]
    pub fn is_contract(&self) -> bool {
        self.contract
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Default string conversion, if the type has one.
    pub fn to_text(&self, value: &dyn Reflect) -> Option<Result<String>> {
        self.to_text.as_ref().map(|text| text(value))
    }

    #[must_use]
    pub fn has_text(&self) -> bool {
        self.to_text.is_some()
    }
}

/// A collection behaviour an object type exposes.
pub enum Capability {
    Dictionary(DictionaryInfo),
    UntypedDictionary(EntriesFn),
    List(SequenceInfo),
    UntypedList { len: LenFn, get: GetFn },
    Enumerable(EnumerableInfo),
    UntypedEnumerable(IterFn),
}

impl Capability {
    /// Dispatch priority; lower wins.
    #[must_use]
    pub const fn priority(&self) -> u8 {
        match self {
            Capability::Dictionary(_) => 0,
            Capability::UntypedDictionary(_) => 1,
            Capability::List(_) => 2,
            Capability::UntypedList { .. } => 3,
            Capability::Enumerable(_) => 4,
            Capability::UntypedEnumerable(_) => 5,
        }
    }
}

pub struct DictionaryInfo {
    pub key: TypeRef,
    pub value: TypeRef,
    pub entries: EntriesFn,
}

pub struct EnumerableInfo {
    pub element: TypeRef,
    pub iter: IterFn,
}

/// Reads one member out of its owner.
pub trait MemberAccess: Send + Sync {
    fn get<'a>(&self, owner: &'a dyn Reflect) -> Result<&'a dyn Reflect>;
}

struct FieldAccess<T, F> {
    get: fn(&T) -> &F,
}

impl<T: Reflect, F: Reflect> MemberAccess for FieldAccess<T, F> {
    fn get<'a>(&self, owner: &'a dyn Reflect) -> Result<&'a dyn Reflect> {
        Ok((self.get)(downcast::<T>(owner)?))
    }
}

/// A declared member of an object type.
pub struct FieldInfo {
    name: &'static str,
    member_type: TypeRef,
    access: Box<dyn MemberAccess>,
    data_member: Option<DataMember>,
}

impl FieldInfo {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn member_type(&self) -> &'static TypeDescriptor {
        (self.member_type)()
    }

    #[must_use]
    pub fn type_ref(&self) -> TypeRef {
        self.member_type
    }

    pub fn get<'a>(&self, owner: &'a dyn Reflect) -> Result<&'a dyn Reflect> {
        self.access.get(owner)
    }

    #[must_use]
    pub fn data_member(&self) -> Option<&DataMember> {
        self.data_member.as_ref()
    }
}

/// Contract tag on a member: optional name override and ordering.
///
/// # Examples
///
/// ```rust
/// use typetext::DataMember;
///
/// let tag = DataMember::new().named("id").order(1);
/// assert_eq!(tag.name, Some("id"));
/// assert_eq!(tag.order, Some(1));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DataMember {
    pub name: Option<&'static str>,
    pub order: Option<i32>,
}

impl DataMember {
    #[must_use]
    pub const fn new() -> Self {
        DataMember {
            name: None,
            order: None,
        }
    }

    #[must_use]
    pub const fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    #[must_use]
    pub const fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }
}

/// Factory and equality test for a type's default value.
#[derive(Clone, Copy)]
pub struct DefaultValue {
    make: fn() -> Box<dyn Reflect>,
    eq: fn(&dyn Reflect, &dyn Reflect) -> bool,
}

fn make_default<T: Reflect + Default>() -> Box<dyn Reflect> {
    Box::new(T::default())
}

fn eq_default<T: Reflect + PartialEq>(a: &dyn Reflect, b: &dyn Reflect) -> bool {
    match (
        a.as_any().downcast_ref::<T>(),
        b.as_any().downcast_ref::<T>(),
    ) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

impl DefaultValue {
    #[must_use]
    pub fn of<T: Reflect + Default + PartialEq>() -> Self {
        DefaultValue {
            make: make_default::<T>,
            eq: eq_default::<T>,
        }
    }

    #[must_use]
    pub fn make(&self) -> Box<dyn Reflect> {
        (self.make)()
    }

    /// Returns `true` if `value` equals `default`.
    #[must_use]
    pub fn matches(&self, value: &dyn Reflect, default: &dyn Reflect) -> bool {
        (self.eq)(value, default)
    }
}

impl TypeDescriptor {
    /// Creates a descriptor for `T` named after its short type name.
    #[must_use]
    pub fn new<T: Reflect>(kind: TypeKind) -> Self {
        let type_path = type_name::<T>();
        TypeDescriptor {
            type_id: TypeId::of::<T>(),
            type_path,
            name: short_type_name(type_path),
            kind,
            value_type: false,
            default: None,
        }
    }

    /// Describes a scalar. Every scalar kind except strings is a value type.
    #[must_use]
    pub fn scalar<T: Reflect + Default + PartialEq>(
        kind: ScalarKind,
        read: for<'a> fn(&'a dyn Reflect) -> Result<Scalar<'a>>,
    ) -> Self {
        let desc = TypeDescriptor::new::<T>(TypeKind::Scalar(ScalarInfo { kind, read }))
            .with_default::<T>();
        if kind == ScalarKind::String {
            desc
        } else {
            desc.value_type()
        }
    }

    /// Starts describing a struct-like type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typetext::{to_json, Reflect, TypeDescriptor};
    ///
    /// struct Person {
    ///     name: String,
    ///     age: Option<u32>,
    /// }
    ///
    /// impl Reflect for Person {
    ///     fn describe() -> TypeDescriptor {
    ///         TypeDescriptor::object::<Person>("Person")
    ///             .field("Name", |p| &p.name)
    ///             .field("Age", |p| &p.age)
    ///             .build()
    ///     }
    /// }
    ///
    /// let bob = Person { name: "Bob".into(), age: None };
    /// assert_eq!(to_json(&bob).unwrap(), r#"{"Name":"Bob"}"#);
    /// ```
    #[must_use]
    pub fn object<T: Reflect>(name: &'static str) -> ObjectBuilder<T> {
        ObjectBuilder::new().named(name)
    }

    /// Starts describing an object type named after its Rust type.
    #[must_use]
    pub fn collection<T: Reflect>() -> ObjectBuilder<T> {
        ObjectBuilder::new()
    }

    /// Starts describing a value type written through its `Display` text.
    #[must_use]
    pub fn value<T: Reflect + fmt::Display>(name: &'static str) -> ObjectBuilder<T> {
        ObjectBuilder::new()
            .named(name)
            .value_type()
            .text(|value: &T| value.to_string())
    }

    /// Describes a fieldless enum written as its variant name.
    #[must_use]
    pub fn enumeration<T: Reflect>(name: &'static str, name_of: fn(&T) -> &'static str) -> Self {
        let name_fn: NameFn = Box::new(move |value: &dyn Reflect| -> Result<&'static str> {
            Ok(name_of(downcast::<T>(value)?))
        });
        TypeDescriptor::new::<T>(TypeKind::Enum(EnumInfo::Named { name: name_fn }))
            .with_name(name)
            .value_type()
    }

    /// Describes a flags type written as its underlying integer.
    #[must_use]
    pub fn flags<T: Reflect, U: Integral>(name: &'static str, bits: fn(&T) -> U) -> Self {
        let bits_fn: BitsFn = Box::new(
            move |value: &dyn Reflect, write: &mut dyn FnMut(&dyn Reflect) -> Result<()>| -> Result<()> {
                let underlying = bits(downcast::<T>(value)?);
                write(&underlying)
            },
        );
        TypeDescriptor::new::<T>(TypeKind::Enum(EnumInfo::Flags {
            underlying: super::descriptor_of::<U>,
            bits: bits_fn,
        }))
        .with_name(name)
        .value_type()
    }

    #[must_use]
    pub fn polymorphic<T: Reflect>(kind: PolymorphicKind, resolve: Resolve) -> Self {
        TypeDescriptor::new::<T>(TypeKind::Polymorphic(PolymorphicInfo { kind, resolve }))
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn value_type(mut self) -> Self {
        self.value_type = true;
        self
    }

    #[must_use]
    pub fn with_default<T: Reflect + Default + PartialEq>(mut self) -> Self {
        self.default = Some(DefaultValue::of::<T>());
        self
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Full path of the type, as reported by `std::any::type_name`.
    #[must_use]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Name written as the type discriminator.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Value types skip the null check unless configured as reference-like.
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        self.value_type
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// Whether values of this type are quoted when used as JSON map keys.
    #[must_use]
    pub fn needs_key_encoding(&self) -> bool {
        match &self.kind {
            TypeKind::Scalar(info) => info.kind.needs_key_encoding(),
            TypeKind::Enum(info) => info.is_flags(),
            TypeKind::Nullable(info) => (info.inner)().needs_key_encoding(),
            _ => false,
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("type_path", &self.type_path)
            .field("kind", &self.kind.label())
            .field("value_type", &self.value_type)
            .finish()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

/// Integer types usable as the underlying representation of a flags type.
pub trait Integral: Reflect + Copy {}

macro_rules! impl_integral {
    ($($ty:ty),* $(,)?) => {
        $(impl Integral for $ty {})*
    };
}

impl_integral!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Builder for [`TypeKind::Object`] descriptors.
pub struct ObjectBuilder<T> {
    descriptor: TypeDescriptor,
    info: ObjectInfo,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Reflect> ObjectBuilder<T> {
    fn new() -> Self {
        ObjectBuilder {
            descriptor: TypeDescriptor::new::<T>(TypeKind::Null),
            info: ObjectInfo {
                contract: false,
                fields: Vec::new(),
                capabilities: Vec::new(),
                to_text: None,
            },
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.descriptor.name = name.to_string();
        self
    }

    /// Adds a member read through `get`.
    #[must_use]
    pub fn field<F: Reflect>(mut self, name: &'static str, get: fn(&T) -> &F) -> Self {
        self.info.fields.push(FieldInfo {
            name,
            member_type: super::descriptor_of::<F>,
            access: Box::new(FieldAccess { get }),
            data_member: None,
        });
        self
    }

    /// Adds a member tagged for contract-style selection and marks the type as a contract.
    #[must_use]
    pub fn data_member<F: Reflect>(
        mut self,
        name: &'static str,
        tag: DataMember,
        get: fn(&T) -> &F,
    ) -> Self {
        self.info.fields.push(FieldInfo {
            name,
            member_type: super::descriptor_of::<F>,
            access: Box::new(FieldAccess { get }),
            data_member: Some(tag),
        });
        self.info.contract = true;
        self
    }

    /// Only [`DataMember`]-tagged fields are written.
    #[must_use]
    pub fn contract(mut self) -> Self {
        self.info.contract = true;
        self
    }

    #[must_use]
    pub fn value_type(mut self) -> Self {
        self.descriptor.value_type = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self) -> Self
    where
        T: Default + PartialEq,
    {
        self.descriptor.default = Some(DefaultValue::of::<T>());
        self
    }

    /// Sets the default string conversion used for value types.
    #[must_use]
    pub fn text<S>(mut self, text: S) -> Self
    where
        S: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.info.to_text = Some(Box::new(move |value: &dyn Reflect| -> Result<String> {
            Ok(text(downcast::<T>(value)?))
        }));
        self
    }

    #[must_use]
    pub fn dictionary<K: Reflect, V: Reflect>(mut self, entries: EntriesFn) -> Self {
        self.info.capabilities.push(Capability::Dictionary(DictionaryInfo {
            key: super::descriptor_of::<K>,
            value: super::descriptor_of::<V>,
            entries,
        }));
        self
    }

    #[must_use]
    pub fn untyped_dictionary(mut self, entries: EntriesFn) -> Self {
        self.info
            .capabilities
            .push(Capability::UntypedDictionary(entries));
        self
    }

    #[must_use]
    pub fn list<E: Reflect>(mut self, len: LenFn, get: GetFn) -> Self {
        self.info.capabilities.push(Capability::List(SequenceInfo {
            element: super::descriptor_of::<E>,
            len,
            get,
        }));
        self
    }

    #[must_use]
    pub fn untyped_list(mut self, len: LenFn, get: GetFn) -> Self {
        self.info
            .capabilities
            .push(Capability::UntypedList { len, get });
        self
    }

    #[must_use]
    pub fn enumerable<E: Reflect>(mut self, iter: IterFn) -> Self {
        self.info
            .capabilities
            .push(Capability::Enumerable(EnumerableInfo {
                element: super::descriptor_of::<E>,
                iter,
            }));
        self
    }

    #[must_use]
    pub fn untyped_enumerable(mut self, iter: IterFn) -> Self {
        self.info
            .capabilities
            .push(Capability::UntypedEnumerable(iter));
        self
    }

    #[must_use]
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor {
            kind: TypeKind::Object(self.info),
            ..self.descriptor
        }
    }
}
