//! # typetext
//!
//! Reflection-driven text serialization to JSON and JSV.
//!
//! ## What is JSV?
//!
//! JSV is a compact, CSV-flavoured relative of JSON. Objects and lists keep
//! JSON's braces and brackets, but strings are only quoted when they contain
//! a delimiter, booleans are `True`/`False`, and null is written as nothing:
//!
//! ```text
//! JSON: {"Name":"Ann","Tags":["a","b,c"],"Admin":true,"Email":null}
//! JSV:  {Name:Ann,Tags:[a,"b,c"],Admin:True,Email:}
//! ```
//!
//! ## How it works
//!
//! Every writable type implements [`Reflect`], which describes its shape once
//! as a [`TypeDescriptor`]. On first use the [`Engine`] compiles the
//! descriptor into a write procedure for the requested [`Format`] and caches
//! it, so later writes of the same type skip all classification work.
//!
//! - **Polymorphic**: values declared as `Box<dyn Reflect>` or a boxed trait
//!   object are written with their runtime type, led by a type discriminator
//! - **Configurable**: null handling, camel-cased names, discriminator
//!   control and per-type custom hooks through [`Options`]
//! - **Concurrent**: engines are `Send + Sync`; compiled procedures are shared
//!   without locks on the read path
//!
//! ## Quick Start
//!
//! ```rust
//! use typetext::{reflect_object, to_json, to_jsv};
//!
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! reflect_object!(User { id, name, active });
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//!
//! assert_eq!(to_json(&user).unwrap(), r#"{"id":123,"name":"Alice","active":true}"#);
//! assert_eq!(to_jsv(&user).unwrap(), "{id:123,name:Alice,active:True}");
//! ```
//!
//! ### Polymorphic values
//!
//! ```rust
//! use typetext::{reflect_interface, reflect_object, to_json, Reflect};
//!
//! trait Animal: Reflect {}
//!
//! struct Dog { name: String }
//! struct Cat { lives: u8 }
//!
//! reflect_object!(Dog { name });
//! reflect_object!(Cat { lives });
//! impl Animal for Dog {}
//! impl Animal for Cat {}
//! reflect_interface!(Animal);
//!
//! let pets: Vec<Box<dyn Animal>> = vec![
//!     Box::new(Dog { name: "Rex".into() }),
//!     Box::new(Cat { lives: 9 }),
//! ];
//! assert_eq!(
//!     to_json(&pets).unwrap(),
//!     r#"[{"__type":"Dog","name":"Rex"},{"__type":"Cat","lives":9}]"#
//! );
//! ```
//!
//! ### Custom engines
//!
//! ```rust
//! use typetext::{reflect_object, Engine, Format, Options};
//!
//! struct Account { display_name: String, nickname: Option<String> }
//! reflect_object!(Account { display_name, nickname });
//!
//! let engine = Engine::new(
//!     Options::new()
//!         .with_camel_case_names(true)
//!         .with_include_null_values(true),
//! );
//! let account = Account { display_name: "Ann".into(), nickname: None };
//! assert_eq!(
//!     engine.serialize(&account, Format::Json).unwrap(),
//!     r#"{"displayName":"Ann","nickname":null}"#
//! );
//! ```
//!
//! ## Supported types
//!
//! | Rust type | JSON | JSV |
//! |-----------|------|-----|
//! | `bool` | `true` | `True` |
//! | integers, floats, `BigInt` | `42` | `42` |
//! | `String`, `&'static str`, `char` | `"text"` | `text` |
//! | `Option<T>`, `()` | `null` | *(empty)* |
//! | `Vec<T>`, `VecDeque<T>`, sets, arrays | `[1,2]` | `[1,2]` |
//! | `HashMap`, `BTreeMap`, `IndexMap` | `{"k":1}` | `{k:1}` |
//! | `DateTime<Utc>`, `DateTime<FixedOffset>` | `"2024-01-01T00:00:00Z"` | `2024-01-01T00:00:00Z` |
//! | `Uuid` | `"9f2c…"` (no dashes) | `9f2c…` |
//! | `chrono::Duration` | `"PT1H"` | `PT1H` |
//! | [`Blob`], `[u8; N]`, `Box<[u8]>` | base64 string | base64 |
//! | `Vec<u8>` | `[104,105]` | `[104,105]` |
//! | `Box<dyn Reflect>`, [`Value`] | runtime type | runtime type |
//!
//! A `Vec<u8>` is an ordinary sequence of numbers. Wrap it in [`Blob`] to get
//! base64 text instead:
//!
//! ```rust
//! use typetext::{to_json, Blob};
//!
//! let bytes = b"hi".to_vec();
//! assert_eq!(to_json(&bytes).unwrap(), "[104,105]");
//! assert_eq!(to_json(&Blob::from(bytes)).unwrap(), "\"aGk=\"");
//! ```

pub mod cache;
pub mod collections;
pub mod compiler;
mod composite;
pub mod context;
pub mod engine;
pub mod error;
pub mod escape;
pub mod format;
pub mod macros;
pub mod map;
pub mod members;
pub mod options;
mod polymorphic;
mod query;
pub mod reflect;
pub mod value;
pub mod wellknown;

pub use engine::Engine;
pub use error::{Error, Result};
pub use format::Format;
pub use map::ValueMap;
pub use options::{Options, Settings};
pub use polymorphic::write_late_bound;
pub use reflect::{descriptor_of, Blob, DataMember, Reflect, TypeDescriptor};
pub use value::{Number, Value};

use std::io;

/// Serialize a value to JSON with the global engine.
///
/// # Examples
///
/// ```rust
/// use typetext::to_json;
///
/// assert_eq!(to_json(&42).unwrap(), "42");
/// assert_eq!(to_json(&"a\"b\\c\n").unwrap(), r#""a\"b\\c\n""#);
/// ```
///
/// # Errors
///
/// Returns an error if a type in the value has no write strategy or a custom
/// hook fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_json<T: Reflect>(value: &T) -> Result<String> {
    to_string(value, Format::Json)
}

/// Serialize a value to JSV with the global engine.
///
/// # Examples
///
/// ```rust
/// use typetext::to_jsv;
///
/// assert_eq!(to_jsv(&true).unwrap(), "True");
/// assert_eq!(to_jsv(&vec!["a", "b,c"]).unwrap(), r#"[a,"b,c"]"#);
/// ```
///
/// # Errors
///
/// Returns an error if a type in the value has no write strategy or a custom
/// hook fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_jsv<T: Reflect>(value: &T) -> Result<String> {
    to_string(value, Format::Jsv)
}

/// Serialize a value in the given format with the global engine.
///
/// # Errors
///
/// Returns an error if a type in the value has no write strategy or a custom
/// hook fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T: Reflect>(value: &T, format: Format) -> Result<String> {
    Engine::global().serialize(value, format)
}

/// Serialize a type-erased value under an explicit declared type.
///
/// # Examples
///
/// ```rust
/// use typetext::{descriptor_of, to_string_as, Format, Reflect};
///
/// let value: &dyn Reflect = &Some(5u16);
/// let json = to_string_as(value, descriptor_of::<Option<u16>>(), Format::Json).unwrap();
/// assert_eq!(json, "5");
/// ```
///
/// # Errors
///
/// Returns [`Error::TypeMismatch`] if `value` is not an instance of `declared`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_as(
    value: &dyn Reflect,
    declared: &'static TypeDescriptor,
    format: Format,
) -> Result<String> {
    Engine::global().serialize_as(value, declared, format)
}

/// Serialize a type-erased value as if declared as "any value", so composite
/// values lead with their type discriminator.
///
/// # Errors
///
/// Returns an error if a type in the value has no write strategy or a custom
/// hook fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_dynamic(value: &dyn Reflect, format: Format) -> Result<String> {
    Engine::global().serialize_dynamic(value, format)
}

/// Serialize a value to a writer.
///
/// # Examples
///
/// ```rust
/// use typetext::{to_writer, Format};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec![1, 2], Format::Jsv).unwrap();
/// assert_eq!(buffer, b"[1,2]");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or the writer reports an I/O error.
pub fn to_writer<W, T>(writer: W, value: &T, format: Format) -> Result<()>
where
    W: io::Write,
    T: Reflect,
{
    Engine::global().to_writer(writer, value, format)
}

/// Write an object's members as a URL query string.
///
/// # Examples
///
/// ```rust
/// use typetext::{reflect_object, to_query_string};
///
/// struct Search { q: String, page: Option<u32>, limit: u32 }
/// reflect_object!(Search { q, page, limit });
///
/// let search = Search { q: "red shoes".into(), page: None, limit: 20 };
/// assert_eq!(to_query_string(&search).unwrap(), "q=red+shoes&limit=20");
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] if `T` is not an object type.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_query_string<T: Reflect>(value: &T) -> Result<String> {
    Engine::global().to_query_string(value)
}
