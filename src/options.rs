//! Configuration for an [`Engine`](crate::Engine).
//!
//! - [`Settings`]: plain flags, loadable from any serde format
//! - [`Options`]: settings plus per-type registries (type-info exclusion,
//!   reference-like value types, custom write hooks)
//!
//! Options are fixed once the engine is built, so compiled procedures can
//! bake them in.
//!
//! ## Examples
//!
//! ```rust
//! use typetext::{Engine, Format, Options};
//!
//! let options = Options::new()
//!     .with_include_null_values(true)
//!     .with_camel_case_names(true);
//! let engine = Engine::new(options);
//!
//! assert_eq!(engine.serialize(&Some(1), Format::Json).unwrap(), "1");
//! ```

use crate::reflect::{downcast, Reflect};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_TYPE_ATTR: &str = "__type";

/// Flag-style configuration.
///
/// # Examples
///
/// ```rust
/// use typetext::Settings;
///
/// let settings: Settings =
///     serde_json::from_str(r#"{"includeNullValues": true}"#).unwrap();
/// assert!(settings.include_null_values);
/// assert_eq!(settings.type_attr, "__type");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Write null and default-valued members and map entries instead of omitting them.
    pub include_null_values: bool,
    /// Write the camel-cased variant of member names.
    pub emit_camel_case_names: bool,
    /// Never write type discriminators.
    pub exclude_type_info: bool,
    /// Member name of the type discriminator.
    pub type_attr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            include_null_values: false,
            emit_camel_case_names: false,
            exclude_type_info: false,
            type_attr: DEFAULT_TYPE_ATTR.to_string(),
        }
    }
}

type HookFn = dyn Fn(&dyn Reflect) -> Result<String> + Send + Sync;

/// A per-type custom write hook.
#[derive(Clone)]
pub struct Hook {
    write: Arc<HookFn>,
    raw: bool,
}

impl Hook {
    /// Runs the hook against `value`.
    pub fn text(&self, value: &dyn Reflect) -> Result<String> {
        (self.write)(value)
    }

    /// Raw hooks write their text verbatim; the others write it as a string.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.raw
    }
}

/// Engine configuration.
///
/// # Examples
///
/// ```rust
/// use typetext::{reflect_object, Engine, Format, Options};
///
/// struct Money {
///     cents: i64,
/// }
/// reflect_object!(Money { cents });
///
/// let options = Options::new()
///     .with_serialize_fn::<Money>(|m| format!("{}.{:02}", m.cents / 100, m.cents % 100));
/// let engine = Engine::new(options);
///
/// let json = engine.serialize(&Money { cents: 1250 }, Format::Json).unwrap();
/// assert_eq!(json, "\"12.50\"");
/// ```
#[derive(Clone, Default)]
pub struct Options {
    pub settings: Settings,
    exclude_type_info_for: HashSet<TypeId>,
    treat_as_ref: HashSet<TypeId>,
    hooks: HashMap<TypeId, Hook>,
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_settings(settings: Settings) -> Self {
        Options {
            settings,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_include_null_values(mut self, include: bool) -> Self {
        self.settings.include_null_values = include;
        self
    }

    #[must_use]
    pub fn with_camel_case_names(mut self, camel_case: bool) -> Self {
        self.settings.emit_camel_case_names = camel_case;
        self
    }

    /// Suppresses type discriminators for every type.
    #[must_use]
    pub fn with_exclude_type_info(mut self, exclude: bool) -> Self {
        self.settings.exclude_type_info = exclude;
        self
    }

    #[must_use]
    pub fn with_type_attr(mut self, name: impl Into<String>) -> Self {
        self.settings.type_attr = name.into();
        self
    }

    /// Suppresses type discriminators for `T` only.
    #[must_use]
    pub fn exclude_type_info_for<T: Reflect>(mut self) -> Self {
        self.exclude_type_info_for.insert(TypeId::of::<T>());
        self
    }

    /// Gives the value type `T` reference-type null semantics and member-wise output.
    #[must_use]
    pub fn treat_as_ref_type<T: Reflect>(mut self) -> Self {
        self.treat_as_ref.insert(TypeId::of::<T>());
        self
    }

    /// Registers a hook whose text is written as a string value.
    #[must_use]
    pub fn with_serialize_fn<T: Reflect>(
        self,
        f: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        self.with_try_serialize_fn::<T>(move |value| Ok(f(value)))
    }

    /// Registers a fallible hook whose text is written as a string value.
    /// Its errors propagate out of the write unchanged.
    #[must_use]
    pub fn with_try_serialize_fn<T: Reflect>(
        self,
        f: impl Fn(&T) -> Result<String> + Send + Sync + 'static,
    ) -> Self {
        self.with_hook::<T>(f, false)
    }

    /// Registers a hook whose text is written verbatim.
    #[must_use]
    pub fn with_raw_serialize_fn<T: Reflect>(
        self,
        f: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        self.with_hook::<T>(move |value| Ok(f(value)), true)
    }

    fn with_hook<T: Reflect>(
        mut self,
        f: impl Fn(&T) -> Result<String> + Send + Sync + 'static,
        raw: bool,
    ) -> Self {
        let write: Arc<HookFn> =
            Arc::new(move |value: &dyn Reflect| -> Result<String> { f(downcast::<T>(value)?) });
        self.hooks.insert(TypeId::of::<T>(), Hook { write, raw });
        self
    }

    /// Whether discriminators are suppressed for `ty`, globally or per type.
    #[must_use]
    pub fn excludes_type_info(&self, ty: TypeId) -> bool {
        self.settings.exclude_type_info || self.exclude_type_info_for.contains(&ty)
    }

    #[must_use]
    pub fn treats_as_ref(&self, ty: TypeId) -> bool {
        self.treat_as_ref.contains(&ty)
    }

    #[must_use]
    pub fn hook(&self, ty: TypeId) -> Option<&Hook> {
        self.hooks.get(&ty)
    }

    #[must_use]
    pub fn has_hook(&self, ty: TypeId) -> bool {
        self.hooks.contains_key(&ty)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("settings", &self.settings)
            .field("exclude_type_info_for", &self.exclude_type_info_for.len())
            .field("treat_as_ref", &self.treat_as_ref.len())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
