//! The type procedure compiler.
//!
//! [`compile`] classifies a [`TypeDescriptor`] and assembles one
//! [`WriteProcedure`] for it. The classification cascade, in priority order:
//!
//! 1. `Option<T>`: absent values write the null token, present ones recurse into `T`.
//! 2. Reference types (and value types configured as reference-like) are
//!    wrapped in a null check.
//! 3. Everything else, first match wins:
//!    - arrays: `u8` elements become base64 text, others use the list strategy
//!    - flags enums are written by their underlying integer type, other enums as their variant name
//!    - well-known types write their canonical text
//!    - polymorphic declared types dispatch on the runtime value
//!    - value types with a custom hook run the hook
//!    - scalars write their literal text
//!    - value objects write their `Display` text
//!    - collections use the map or list strategy
//!    - reference objects with a custom hook run the hook
//!    - the remaining objects are written member by member
//!
//! Nested types are never compiled eagerly. Procedures hold a
//! [`ProcedureRef`] that asks the engine's cache for the nested procedure on
//! first use, so self-referential types compile in constant time and each
//! nested procedure is shared by every procedure that needs it.

use crate::collections::{self, SequenceWriter};
use crate::composite::CompositeWriter;
use crate::context::WriteContext;
use crate::engine::Engine;
use crate::escape;
use crate::format::Format;
use crate::options::Hook;
use crate::polymorphic;
use crate::reflect::{
    downcast, BitsFn, EnumInfo, GetFn, LenFn, NameFn, ObjectInfo, Reflect, Resolve, Scalar,
    TypeDescriptor, TypeKind, TypeRef, WellKnown,
};
use crate::wellknown;
use crate::{Error, Result};
use std::any::TypeId;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A compiled, stateless writer for one (type, format) pair.
pub trait WriteProcedure: Send + Sync {
    /// Writes `value` to `out`. `value` must be of the type the procedure was compiled for.
    fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()>;
}

pub type Procedure = Arc<dyn WriteProcedure>;

/// Lazily resolved procedure of a nested type, one slot per format.
pub struct ProcedureRef {
    ty: TypeRef,
    slots: [OnceLock<Procedure>; 2],
}

impl ProcedureRef {
    #[must_use]
    pub fn new(ty: TypeRef) -> Self {
        ProcedureRef {
            ty,
            slots: [OnceLock::new(), OnceLock::new()],
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &'static TypeDescriptor {
        (self.ty)()
    }

    /// Returns the nested procedure for the context's format, compiling it on first use.
    pub fn resolve(&self, ctx: &WriteContext<'_>) -> Result<&Procedure> {
        let slot = &self.slots[ctx.format().index()];
        if let Some(procedure) = slot.get() {
            return Ok(procedure);
        }
        let procedure = ctx.engine().procedure((self.ty)(), ctx.format())?;
        Ok(slot.get_or_init(|| procedure))
    }

    pub fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        self.resolve(ctx)?.write(out, value, ctx)
    }
}

/// Compiles the write procedure of `ty` for `format`.
///
/// Callers normally go through [`Engine::procedure`], which memoizes the result.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for value types with no hook and no
/// string conversion.
pub fn compile(engine: &Engine, ty: &'static TypeDescriptor, format: Format) -> Result<Procedure> {
    log::debug!(
        "compiling {} procedure for {} ({})",
        format,
        ty.type_path(),
        ty.kind().label()
    );
    if let TypeKind::Nullable(info) = ty.kind() {
        return Ok(Arc::new(NullableWriter {
            unwrap: info.unwrap,
            inner: ProcedureRef::new(info.inner),
        }));
    }
    let reference_like = !ty.is_value_type() || engine.options().treats_as_ref(ty.type_id());
    let procedure = compile_non_null(engine, ty, format, !reference_like)?;
    if reference_like {
        Ok(Arc::new(NullGuard { inner: procedure }))
    } else {
        Ok(procedure)
    }
}

fn compile_non_null(
    engine: &Engine,
    ty: &'static TypeDescriptor,
    format: Format,
    as_value: bool,
) -> Result<Procedure> {
    let options = engine.options();
    if let TypeKind::Array(seq) = ty.kind() {
        if (seq.element)().type_id() == TypeId::of::<u8>() {
            return Ok(Arc::new(ByteArrayWriter {
                len: seq.len,
                get: seq.get,
            }));
        }
        return Ok(Arc::new(SequenceWriter::indexed(
            Some(seq.element),
            seq.len,
            seq.get,
        )));
    }
    match ty.kind() {
        TypeKind::Enum(EnumInfo::Named { name }) => return Ok(Arc::new(EnumNameWriter { name })),
        TypeKind::Enum(EnumInfo::Flags { underlying, bits }) => {
            return Ok(Arc::new(FlagsWriter {
                bits,
                underlying: ProcedureRef::new(*underlying),
            }))
        }
        TypeKind::WellKnown(info) => return Ok(Arc::new(WellKnownWriter { read: info.read })),
        TypeKind::Polymorphic(info) => return Ok(polymorphic::compile(engine, ty, info)),
        _ => {}
    }
    if as_value {
        if let Some(hook) = options.hook(ty.type_id()) {
            return Ok(Arc::new(HookWriter { hook: hook.clone() }));
        }
    }
    match ty.kind() {
        TypeKind::Scalar(info) => Ok(Arc::new(ScalarWriter { read: info.read })),
        TypeKind::Null => Ok(Arc::new(NullWriter)),
        TypeKind::Object(info) if as_value => {
            if info.has_text() {
                Ok(Arc::new(TextWriter { ty, info }))
            } else {
                Err(unsupported(ty, format))
            }
        }
        TypeKind::Object(_) => {
            if let Some(strategy) = collections::classify(ty) {
                return Ok(strategy.into_procedure(format));
            }
            if let Some(hook) = options.hook(ty.type_id()) {
                return Ok(Arc::new(HookWriter { hook: hook.clone() }));
            }
            Ok(Arc::new(CompositeWriter::new(engine, ty)))
        }
        TypeKind::Enum(_)
        | TypeKind::WellKnown(_)
        | TypeKind::Polymorphic(_)
        | TypeKind::Nullable(_)
        | TypeKind::Array(_) => Err(unsupported(ty, format)),
    }
}

fn unsupported(ty: &TypeDescriptor, format: Format) -> Error {
    log::error!(
        "no {} write strategy for {} ({})",
        format,
        ty.type_path(),
        ty.kind().label()
    );
    Error::unsupported_type(ty.type_path())
}

struct NullableWriter {
    unwrap: Resolve,
    inner: ProcedureRef,
}

impl WriteProcedure for NullableWriter {
    fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        match (self.unwrap)(value)? {
            Some(inner) => self.inner.write(out, inner, ctx),
            None => ctx.write_null(out),
        }
    }
}

struct NullGuard {
    inner: Procedure,
}

impl WriteProcedure for NullGuard {
    fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        if value.is_null() {
            ctx.write_null(out)
        } else {
            self.inner.write(out, value, ctx)
        }
    }
}

struct NullWriter;

impl WriteProcedure for NullWriter {
    fn write(
        &self,
        out: &mut dyn fmt::Write,
        _value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        ctx.write_null(out)
    }
}

struct ScalarWriter {
    read: for<'a> fn(&'a dyn Reflect) -> Result<Scalar<'a>>,
}

impl WriteProcedure for ScalarWriter {
    fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        write_scalar(out, (self.read)(value)?, ctx.format())
    }
}

/// Writes a scalar's literal text.
pub(crate) fn write_scalar(out: &mut dyn fmt::Write, scalar: Scalar<'_>, format: Format) -> Result<()> {
    match scalar {
        Scalar::Bool(b) => out.write_str(format.bool_token(b))?,
        Scalar::Char(c) => {
            let mut buf = [0u8; 4];
            escape::write_string(out, c.encode_utf8(&mut buf), format)?;
        }
        Scalar::Int(n) => write!(out, "{}", n)?,
        Scalar::UInt(n) => write!(out, "{}", n)?,
        Scalar::Float(f) => {
            if f == f32::MIN || f == f32::MAX {
                write!(out, "{:e}", f)?;
            } else {
                write_finite_or_special(out, f64::from(f), || f.to_string())?;
            }
        }
        Scalar::Double(d) => {
            if d == f64::MIN || d == f64::MAX {
                write!(out, "{:e}", d)?;
            } else {
                write_finite_or_special(out, d, || d.to_string())?;
            }
        }
        Scalar::Decimal(n) => write!(out, "{}", n)?,
        Scalar::Str(s) => escape::write_string(out, s, format)?,
    }
    Ok(())
}

fn write_finite_or_special(
    out: &mut dyn fmt::Write,
    value: f64,
    text: impl FnOnce() -> String,
) -> fmt::Result {
    if value.is_nan() {
        out.write_str("NaN")
    } else if value == f64::INFINITY {
        out.write_str("Infinity")
    } else if value == f64::NEG_INFINITY {
        out.write_str("-Infinity")
    } else {
        out.write_str(&text())
    }
}

struct EnumNameWriter {
    name: &'static NameFn,
}

impl WriteProcedure for EnumNameWriter {
    fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        escape::write_string(out, (self.name)(value)?, ctx.format())?;
        Ok(())
    }
}

/// Writes a flags value as its underlying integer type would be written.
struct FlagsWriter {
    bits: &'static BitsFn,
    underlying: ProcedureRef,
}

impl WriteProcedure for FlagsWriter {
    fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        (self.bits)(value, &mut |bits: &dyn Reflect| -> Result<()> {
            self.underlying.write(out, bits, ctx)
        })
    }
}

struct WellKnownWriter {
    read: for<'a> fn(&'a dyn Reflect) -> Result<WellKnown<'a>>,
}

impl WriteProcedure for WellKnownWriter {
    fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        wellknown::write(out, (self.read)(value)?, ctx.format())
    }
}

struct ByteArrayWriter {
    len: LenFn,
    get: GetFn,
}

impl WriteProcedure for ByteArrayWriter {
    fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        let len = (self.len)(value)?;
        let mut bytes = Vec::with_capacity(len);
        for index in 0..len {
            if let Some(byte) = (self.get)(value, index)? {
                bytes.push(*downcast::<u8>(byte)?);
            }
        }
        wellknown::write(out, WellKnown::Blob(&bytes), ctx.format())
    }
}

struct TextWriter {
    ty: &'static TypeDescriptor,
    info: &'static ObjectInfo,
}

impl WriteProcedure for TextWriter {
    fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        match self.info.to_text(value) {
            Some(text) => {
                escape::write_string(out, &text?, ctx.format())?;
                Ok(())
            }
            None => Err(unsupported(self.ty, ctx.format())),
        }
    }
}

struct HookWriter {
    hook: Hook,
}

impl WriteProcedure for HookWriter {
    fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        let text = self.hook.text(value)?;
        if self.hook.is_raw() {
            out.write_str(&text)?;
        } else {
            escape::write_string(out, &text, ctx.format())?;
        }
        Ok(())
    }
}
