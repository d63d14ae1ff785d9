//! Dispatch on the runtime type of values declared as `Box<dyn Reflect>` or a
//! boxed trait object.
//!
//! The declared type only says "some value". At write time the procedure
//! unwraps the box, looks up the procedure of the runtime type and runs it
//! with the dynamic flag set, so a composite runtime value leads with its
//! type discriminator. For [`PolymorphicKind::Abstract`] declared types that
//! are excluded from type info the flag is left alone.

use crate::compiler::{Procedure, WriteProcedure};
use crate::context::WriteContext;
use crate::engine::Engine;
use crate::reflect::{PolymorphicInfo, PolymorphicKind, Reflect, Resolve, TypeDescriptor};
use crate::Result;
use std::fmt;
use std::sync::Arc;

pub(crate) fn compile(
    engine: &Engine,
    ty: &'static TypeDescriptor,
    info: &'static PolymorphicInfo,
) -> Procedure {
    let mark_dynamic = match info.kind {
        PolymorphicKind::Dynamic | PolymorphicKind::Interface => true,
        PolymorphicKind::Abstract => !engine.options().excludes_type_info(ty.type_id()),
    };
    Arc::new(PolymorphicWriter {
        resolve: info.resolve,
        mark_dynamic,
    })
}

struct PolymorphicWriter {
    resolve: Resolve,
    mark_dynamic: bool,
}

impl WriteProcedure for PolymorphicWriter {
    fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        let Some(runtime) = (self.resolve)(value)? else {
            return ctx.write_null(out);
        };
        let procedure = ctx
            .engine()
            .procedure(runtime.type_descriptor(), ctx.format())?;
        if self.mark_dynamic {
            ctx.with_dynamic(true, |ctx| procedure.write(out, runtime, ctx))
        } else {
            procedure.write(out, runtime, ctx)
        }
    }
}

/// Writes `value` with the procedure of its runtime type.
pub fn write_late_bound(
    out: &mut dyn fmt::Write,
    value: &dyn Reflect,
    ctx: &mut WriteContext<'_>,
) -> Result<()> {
    if value.is_null() {
        return ctx.write_null(out);
    }
    let procedure = ctx
        .engine()
        .procedure(value.type_descriptor(), ctx.format())?;
    procedure.write(out, value, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;
    use crate::reflect::descriptor_of;
    use crate::Options;

    #[test]
    fn test_boxed_scalar_has_no_discriminator() {
        let engine = Engine::new(Options::new());
        let value: Box<dyn Reflect> = Box::new(42);
        assert_eq!(engine.serialize(&value, Format::Json).unwrap(), "42");
    }

    #[test]
    fn test_boxed_null_writes_null_token() {
        let engine = Engine::new(Options::new());
        let value: Box<dyn Reflect> = Box::new(None::<i32>);
        assert_eq!(engine.serialize(&value, Format::Json).unwrap(), "null");
        assert_eq!(engine.serialize(&value, Format::Jsv).unwrap(), "");
    }

    #[test]
    fn test_late_bound_uses_runtime_descriptor() {
        let engine = Engine::new(Options::new());
        let mut out = String::new();
        let mut ctx = WriteContext::new(&engine, Format::Jsv);
        write_late_bound(&mut out, &true, &mut ctx).unwrap();
        assert_eq!(out, "True");
        assert!(engine
            .procedure(descriptor_of::<bool>(), Format::Jsv)
            .is_ok());
    }
}
