//! The serialization engine: options plus the caches built from them.
//!
//! An [`Engine`] owns its [`Options`], the compiled procedure of every
//! (type, format) pair it has written, and the member list of every composite
//! type. All of it is shared across threads without locks on the read path.
//!
//! Most callers use the process-wide engine through the crate-level functions
//! ([`to_json`](crate::to_json), [`to_jsv`](crate::to_jsv), ...). Build a
//! dedicated engine when different call sites need different options.
//!
//! ## Examples
//!
//! ```rust
//! use typetext::{Engine, Format, Options};
//!
//! let engine = Engine::new(Options::new().with_include_null_values(true));
//! let values = vec![Some(1), None];
//!
//! assert_eq!(engine.serialize(&values, Format::Json).unwrap(), "[1,null]");
//! assert_eq!(engine.serialize(&values, Format::Jsv).unwrap(), "[1,]");
//! ```

use crate::cache::{ProcedureCache, SnapshotMap};
use crate::compiler::{self, Procedure};
use crate::context::WriteContext;
use crate::format::Format;
use crate::members::{self, MemberDescriptor};
use crate::options::Options;
use crate::query;
use crate::reflect::{descriptor_of, Reflect, TypeDescriptor};
use crate::{Error, Result};
use std::any::TypeId;
use std::fmt;
use std::io;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Engine> = OnceLock::new();

pub struct Engine {
    options: Options,
    procedures: ProcedureCache,
    members: SnapshotMap<TypeId, Arc<[MemberDescriptor]>>,
}

impl Engine {
    #[must_use]
    pub fn new(options: Options) -> Self {
        Engine {
            options,
            procedures: ProcedureCache::new(),
            members: SnapshotMap::new(),
        }
    }

    /// The process-wide engine, created with default options on first use
    /// unless [`Engine::configure_global`] ran first.
    pub fn global() -> &'static Engine {
        GLOBAL.get_or_init(|| Engine::new(Options::default()))
    }

    /// Sets the options of the process-wide engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyInitialized`] once the global engine exists,
    /// including when it was created implicitly by an earlier write.
    pub fn configure_global(options: Options) -> Result<()> {
        GLOBAL
            .set(Engine::new(options))
            .map_err(|_| Error::AlreadyInitialized)
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the procedure of `ty` for `format`, compiling and publishing it on first request.
    ///
    /// Concurrent first requests may each compile; all of them get the
    /// procedure that was published first.
    pub fn procedure(&self, ty: &'static TypeDescriptor, format: Format) -> Result<Procedure> {
        if let Some(procedure) = self.procedures.get(ty.type_id(), format) {
            return Ok(procedure);
        }
        let compiled = compiler::compile(self, ty, format)?;
        Ok(self.procedures.publish(ty.type_id(), format, compiled))
    }

    /// Returns the writable members of `ty`, introspecting it on first request.
    pub fn members(&self, ty: &'static TypeDescriptor) -> Arc<[MemberDescriptor]> {
        if let Some(members) = self.members.get(&ty.type_id()) {
            return members;
        }
        let introspected: Arc<[MemberDescriptor]> =
            Arc::from(members::introspect(&self.options, ty));
        self.members.publish(ty.type_id(), introspected)
    }

    /// Number of compiled procedures across both formats.
    #[must_use]
    pub fn cached_procedures(&self) -> usize {
        self.procedures.len()
    }

    /// Writes `value`, declared as `declared`, to `out`.
    ///
    /// On error, whatever was written before the failure stays in `out`.
    pub fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        declared: &'static TypeDescriptor,
        format: Format,
    ) -> Result<()> {
        let procedure = self.procedure(declared, format)?;
        let mut ctx = WriteContext::new(self, format);
        procedure.write(out, value, &mut ctx)
    }

    /// Serializes `value` under its own type.
    #[must_use = "this returns the result of the operation, errors must be handled"]
    pub fn serialize<T: Reflect>(&self, value: &T, format: Format) -> Result<String> {
        self.serialize_as(value, descriptor_of::<T>(), format)
    }

    /// Serializes `value` under the declared type `declared`.
    ///
    /// `value` must be an instance of `declared`; use
    /// [`serialize_dynamic`](Engine::serialize_dynamic) to write a value of
    /// unknown type with its discriminator.
    #[must_use = "this returns the result of the operation, errors must be handled"]
    pub fn serialize_as(
        &self,
        value: &dyn Reflect,
        declared: &'static TypeDescriptor,
        format: Format,
    ) -> Result<String> {
        let mut out = String::with_capacity(128);
        self.write(&mut out, value, declared, format)?;
        Ok(out)
    }

    /// Serializes `value` as if declared as "any value": composite values lead
    /// with their type discriminator.
    #[must_use = "this returns the result of the operation, errors must be handled"]
    pub fn serialize_dynamic(&self, value: &dyn Reflect, format: Format) -> Result<String> {
        let mut out = String::with_capacity(128);
        let mut ctx = WriteContext::new(self, format);
        if value.is_null() {
            ctx.write_null(&mut out)?;
            return Ok(out);
        }
        let procedure = self.procedure(value.type_descriptor(), format)?;
        ctx.with_dynamic(true, |ctx| procedure.write(&mut out, value, ctx))?;
        Ok(out)
    }

    /// Serializes `value` into an `io::Write`.
    pub fn to_writer<W: io::Write, T: Reflect>(
        &self,
        mut writer: W,
        value: &T,
        format: Format,
    ) -> Result<()> {
        let text = self.serialize(value, format)?;
        writer
            .write_all(text.as_bytes())
            .map_err(|e| Error::io(&e.to_string()))
    }

    /// Writes the members of an object as `name=value` pairs joined by `&`.
    #[must_use = "this returns the result of the operation, errors must be handled"]
    pub fn to_query_string<T: Reflect>(&self, value: &T) -> Result<String> {
        query::write_query_string(self, value, descriptor_of::<T>())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(Options::default())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("procedures", &self.procedures.len())
            .field("members", &self.members.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn test_procedure_is_compiled_once() {
        let engine = Engine::new(Options::new());
        assert_eq!(engine.cached_procedures(), 0);
        engine.serialize(&1i32, Format::Json).unwrap();
        engine.serialize(&2i32, Format::Json).unwrap();
        assert_eq!(engine.cached_procedures(), 1);
        engine.serialize(&2i32, Format::Jsv).unwrap();
        assert_eq!(engine.cached_procedures(), 2);
    }

    #[test]
    fn test_nested_procedures_compile_lazily() {
        let engine = Engine::new(Options::new());
        engine.serialize(&Vec::<String>::new(), Format::Json).unwrap();
        assert_eq!(engine.cached_procedures(), 1);
        engine.serialize(&vec!["x".to_string()], Format::Json).unwrap();
        assert_eq!(engine.cached_procedures(), 2);
    }

    #[test]
    fn test_concurrent_first_use_agrees() {
        let engine = Engine::new(Options::new());
        let barrier = Barrier::new(8);
        let mut map = HashMap::new();
        map.insert(1u32, vec![Some(1.5f64), None]);
        let outputs: Vec<String> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let (engine, barrier, map) = (&engine, &barrier, &map);
                    scope.spawn(move || {
                        barrier.wait();
                        engine.serialize(map, Format::Json).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(outputs.iter().all(|o| o == r#"{"1":[1.5,null]}"#));
        let procedure = engine
            .procedure(descriptor_of::<HashMap<u32, Vec<Option<f64>>>>(), Format::Json)
            .unwrap();
        let again = engine
            .procedure(descriptor_of::<HashMap<u32, Vec<Option<f64>>>>(), Format::Json)
            .unwrap();
        assert!(Arc::ptr_eq(&procedure, &again));
    }

    #[test]
    fn test_serialize_dynamic() {
        let engine = Engine::new(Options::new());
        assert_eq!(engine.serialize_dynamic(&5u8, Format::Json).unwrap(), "5");
        assert_eq!(
            engine.serialize_dynamic(&None::<i32>, Format::Json).unwrap(),
            "null"
        );
    }

    #[test]
    fn test_serialize_as_mismatch() {
        let engine = Engine::new(Options::new());
        let err = engine
            .serialize_as(&1i32, descriptor_of::<String>(), Format::Json)
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_to_writer() {
        let engine = Engine::new(Options::new());
        let mut buf = Vec::new();
        engine.to_writer(&mut buf, &vec![true], Format::Jsv).unwrap();
        assert_eq!(buf, b"[True]");
    }
}
