/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// # Examples
///
/// ```rust
/// use typetext::{to_json, value};
///
/// let doc = value!({ "id": 1, "tags": ["a", "b"], "ok": true });
/// assert_eq!(to_json(&doc).unwrap(), r#"{"id":1,"tags":["a","b"],"ok":true}"#);
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::ValueMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ValueMap::new();
        $(
            object.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Any other expression convertible into a value.
    ($s:expr) => {
        $crate::Value::from($s)
    };
}

/// Implements [`Reflect`](crate::Reflect) for a struct, writing the listed
/// fields in order.
///
/// Fields are written under their Rust name unless renamed with `as`. The
/// `contract` form tags every listed field with a
/// [`DataMember`](crate::DataMember).
///
/// # Examples
///
/// ```rust
/// use typetext::{reflect_object, to_json, DataMember};
///
/// struct User {
///     id: u32,
///     name: String,
///     email: Option<String>,
/// }
///
/// reflect_object!(User { id as "Id", name as "Name", email as "Email" });
///
/// let user = User { id: 1, name: "Ann".into(), email: None };
/// assert_eq!(to_json(&user).unwrap(), r#"{"Id":1,"Name":"Ann"}"#);
///
/// struct Row {
///     key: String,
///     internal: u64,
///     value: i32,
/// }
///
/// reflect_object!(Row contract {
///     value: DataMember::new().order(1),
///     key: DataMember::new().named("Key"),
/// });
///
/// let row = Row { key: "k".into(), internal: 9, value: 3 };
/// assert_eq!(to_json(&row).unwrap(), r#"{"Key":"k","value":3}"#);
/// ```
#[macro_export]
macro_rules! reflect_object {
    ($ty:ident contract { $($field:ident : $tag:expr),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            fn describe() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::object::<$ty>(stringify!($ty))
                    $(.data_member(stringify!($field), $tag, |v| &v.$field))*
                    .contract()
                    .build()
            }
        }
    };

    ($ty:ident { $($field:ident $(as $name:literal)?),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            fn describe() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::object::<$ty>(stringify!($ty))
                    $(.field($crate::__member_name!($field $(, $name)?), |v| &v.$field))*
                    .build()
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __member_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $name:literal) => {
        $name
    };
}

/// Implements [`Reflect`](crate::Reflect) for a fieldless enum written as its
/// variant name.
///
/// # Examples
///
/// ```rust
/// use typetext::{reflect_enum, to_json, to_jsv};
///
/// #[derive(Clone, Copy)]
/// enum Color { Red, Green }
///
/// reflect_enum!(Color { Red, Green });
///
/// assert_eq!(to_json(&Color::Green).unwrap(), r#""Green""#);
/// assert_eq!(to_jsv(&Color::Red).unwrap(), "Red");
/// ```
#[macro_export]
macro_rules! reflect_enum {
    ($ty:ident { $($variant:ident),* $(,)? }) => {
        impl $crate::Reflect for $ty {
            fn describe() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::enumeration::<$ty>(stringify!($ty), |v| match v {
                    $($ty::$variant => stringify!($variant),)*
                })
            }
        }
    };
}

/// Implements [`Reflect`](crate::Reflect) for a flags type with a
/// `bits()` accessor, such as one generated by `bitflags`. Values are written
/// as their underlying integer.
#[macro_export]
macro_rules! reflect_flags {
    ($ty:ident : $bits:ty) => {
        impl $crate::Reflect for $ty {
            fn describe() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::flags::<$ty, $bits>(stringify!($ty), |v| v.bits())
            }
        }
    };
}

/// Implements [`Reflect`](crate::Reflect) for a value type written through its
/// `Display` text.
///
/// # Examples
///
/// ```rust
/// use std::fmt;
/// use typetext::{reflect_value, to_json};
///
/// struct Version(u32, u32);
///
/// impl fmt::Display for Version {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{}.{}", self.0, self.1)
///     }
/// }
///
/// reflect_value!(Version);
///
/// assert_eq!(to_json(&Version(1, 2)).unwrap(), r#""1.2""#);
/// ```
#[macro_export]
macro_rules! reflect_value {
    ($ty:ident) => {
        impl $crate::Reflect for $ty {
            fn describe() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::value::<$ty>(stringify!($ty)).build()
            }
        }
    };
}

/// Implements [`Reflect`](crate::Reflect) for `Box<dyn Trait>`, where `Trait`
/// has `Reflect` as a supertrait. Boxed values are written with the procedure
/// of their runtime type, led by its type discriminator.
///
/// # Examples
///
/// ```rust
/// use typetext::{reflect_interface, reflect_object, to_json, Reflect};
///
/// trait Shape: Reflect {}
///
/// struct Circle { radius: f64 }
/// reflect_object!(Circle { radius });
/// impl Shape for Circle {}
///
/// reflect_interface!(Shape);
///
/// let shapes: Vec<Box<dyn Shape>> = vec![Box::new(Circle { radius: 1.5 })];
/// assert_eq!(to_json(&shapes).unwrap(), r#"[{"__type":"Circle","radius":1.5}]"#);
/// ```
#[macro_export]
macro_rules! reflect_interface {
    ($trait:ident) => {
        $crate::__reflect_boxed_trait!($trait, Interface);
    };
}

/// Like [`reflect_interface!`], for traits standing in for an abstract base
/// type. Excluding the boxed type from type info with
/// [`Options::exclude_type_info_for`](crate::Options::exclude_type_info_for)
/// drops the discriminator of its runtime values.
#[macro_export]
macro_rules! reflect_abstract {
    ($trait:ident) => {
        $crate::__reflect_boxed_trait!($trait, Abstract);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __reflect_boxed_trait {
    ($trait:ident, $kind:ident) => {
        impl $crate::Reflect for ::std::boxed::Box<dyn $trait> {
            fn describe() -> $crate::TypeDescriptor {
                fn resolve(
                    value: &dyn $crate::Reflect,
                ) -> $crate::Result<::std::option::Option<&dyn $crate::Reflect>> {
                    let boxed = $crate::reflect::downcast::<::std::boxed::Box<dyn $trait>>(value)?;
                    let inner = $crate::reflect::AsReflect::as_reflect(&**boxed);
                    Ok((!$crate::Reflect::is_null(inner)).then_some(inner))
                }
                $crate::TypeDescriptor::polymorphic::<::std::boxed::Box<dyn $trait>>(
                    $crate::reflect::PolymorphicKind::$kind,
                    resolve,
                )
                .with_name(stringify!($trait))
            }

            fn is_null(&self) -> bool {
                $crate::Reflect::is_null($crate::reflect::AsReflect::as_reflect(&**self))
            }
        }
    };
}
