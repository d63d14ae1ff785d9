//! Map and list write strategies.
//!
//! A collection type can advertise several capabilities at once (a map type
//! is also enumerable, for example). [`classify`] picks the most specific one:
//!
//! 1. typed dictionary
//! 2. untyped dictionary
//! 3. typed list
//! 4. untyped list
//! 5. typed enumerable
//! 6. untyped enumerable
//!
//! Typed strategies compile their element, key and value procedures once
//! through [`ProcedureRef`]. Untyped strategies look up the procedure of each
//! element's runtime type as it is written.

use crate::compiler::{Procedure, ProcedureRef, WriteProcedure};
use crate::context::WriteContext;
use crate::format::{
    Format, ITEM_SEPARATOR, LIST_END, LIST_START, MAP_END, MAP_KEY_SEPARATOR, MAP_START, QUOTE,
};
use crate::polymorphic::write_late_bound;
use crate::reflect::{
    Capability, EntriesFn, GetFn, IterFn, LenFn, Reflect, TypeDescriptor, TypeKind, TypeRef,
};
use crate::Result;
use std::fmt;
use std::sync::Arc;

/// The write strategy chosen for a collection type.
#[derive(Clone, Copy)]
pub enum CollectionStrategy {
    Map {
        key: TypeRef,
        value: TypeRef,
        entries: EntriesFn,
    },
    UntypedMap {
        entries: EntriesFn,
    },
    List {
        element: TypeRef,
        len: LenFn,
        get: GetFn,
    },
    UntypedList {
        len: LenFn,
        get: GetFn,
    },
    Enumerable {
        element: TypeRef,
        iter: IterFn,
    },
    UntypedEnumerable {
        iter: IterFn,
    },
}

impl CollectionStrategy {
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(
            self,
            CollectionStrategy::Map { .. } | CollectionStrategy::UntypedMap { .. }
        )
    }

    #[must_use]
    pub fn is_typed(&self) -> bool {
        matches!(
            self,
            CollectionStrategy::Map { .. }
                | CollectionStrategy::List { .. }
                | CollectionStrategy::Enumerable { .. }
        )
    }

    /// Builds the write procedure for this strategy.
    #[must_use]
    pub fn into_procedure(self, format: Format) -> Procedure {
        match self {
            CollectionStrategy::Map {
                key,
                value,
                entries,
            } => Arc::new(MapWriter {
                key: Some(ProcedureRef::new(key)),
                encode_keys: format.quotes_keys() && key().needs_key_encoding(),
                value: Some(ProcedureRef::new(value)),
                entries,
            }),
            CollectionStrategy::UntypedMap { entries } => Arc::new(MapWriter {
                key: None,
                encode_keys: false,
                value: None,
                entries,
            }),
            CollectionStrategy::List { element, len, get } => {
                Arc::new(SequenceWriter::indexed(Some(element), len, get))
            }
            CollectionStrategy::UntypedList { len, get } => {
                Arc::new(SequenceWriter::indexed(None, len, get))
            }
            CollectionStrategy::Enumerable { element, iter } => {
                Arc::new(SequenceWriter::iterated(Some(element), iter))
            }
            CollectionStrategy::UntypedEnumerable { iter } => {
                Arc::new(SequenceWriter::iterated(None, iter))
            }
        }
    }
}

impl From<&Capability> for CollectionStrategy {
    fn from(capability: &Capability) -> Self {
        match capability {
            Capability::Dictionary(info) => CollectionStrategy::Map {
                key: info.key,
                value: info.value,
                entries: info.entries,
            },
            Capability::UntypedDictionary(entries) => {
                CollectionStrategy::UntypedMap { entries: *entries }
            }
            Capability::List(info) => CollectionStrategy::List {
                element: info.element,
                len: info.len,
                get: info.get,
            },
            Capability::UntypedList { len, get } => CollectionStrategy::UntypedList {
                len: *len,
                get: *get,
            },
            Capability::Enumerable(info) => CollectionStrategy::Enumerable {
                element: info.element,
                iter: info.iter,
            },
            Capability::UntypedEnumerable(iter) => {
                CollectionStrategy::UntypedEnumerable { iter: *iter }
            }
        }
    }
}

/// Picks the collection strategy of `ty`, or `None` if it is not a collection.
#[must_use]
pub fn classify(ty: &TypeDescriptor) -> Option<CollectionStrategy> {
    let TypeKind::Object(info) = ty.kind() else {
        return None;
    };
    info.capabilities()
        .iter()
        .min_by_key(|capability| capability.priority())
        .map(CollectionStrategy::from)
}

struct MapWriter {
    key: Option<ProcedureRef>,
    encode_keys: bool,
    value: Option<ProcedureRef>,
    entries: EntriesFn,
}

impl MapWriter {
    fn write_key(
        &self,
        out: &mut dyn fmt::Write,
        key: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        let encode = match self.key {
            Some(_) => self.encode_keys,
            None => ctx.format().quotes_keys() && key.type_descriptor().needs_key_encoding(),
        };
        if encode {
            out.write_char(QUOTE)?;
        }
        match &self.key {
            Some(procedure) => procedure.write(out, key, ctx)?,
            None => write_late_bound(out, key, ctx)?,
        }
        if encode {
            out.write_char(QUOTE)?;
        }
        Ok(())
    }
}

impl WriteProcedure for MapWriter {
    fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        let include_null = ctx.engine().options().settings.include_null_values;
        out.write_char(MAP_START)?;
        ctx.with_dynamic(false, |ctx| {
            let mut first = true;
            for (key, item) in (self.entries)(value)? {
                if !include_null && item.is_null() {
                    continue;
                }
                if !first {
                    out.write_char(ITEM_SEPARATOR)?;
                }
                first = false;
                ctx.with_key(|ctx| self.write_key(out, key, ctx))?;
                out.write_char(MAP_KEY_SEPARATOR)?;
                ctx.with_map_value(true, |ctx| match &self.value {
                    Some(procedure) => procedure.write(out, item, ctx),
                    None => write_late_bound(out, item, ctx),
                })?;
            }
            Ok(())
        })?;
        out.write_char(MAP_END)?;
        Ok(())
    }
}

enum Access {
    Indexed { len: LenFn, get: GetFn },
    Iterated(IterFn),
}

/// Writes every element of a list, array or enumerable, absent ones as the null token.
pub(crate) struct SequenceWriter {
    element: Option<ProcedureRef>,
    access: Access,
}

impl SequenceWriter {
    pub(crate) fn indexed(element: Option<TypeRef>, len: LenFn, get: GetFn) -> Self {
        SequenceWriter {
            element: element.map(ProcedureRef::new),
            access: Access::Indexed { len, get },
        }
    }

    pub(crate) fn iterated(element: Option<TypeRef>, iter: IterFn) -> Self {
        SequenceWriter {
            element: element.map(ProcedureRef::new),
            access: Access::Iterated(iter),
        }
    }

    fn write_element(
        &self,
        out: &mut dyn fmt::Write,
        item: Option<&dyn Reflect>,
        first: &mut bool,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        if !*first {
            out.write_char(ITEM_SEPARATOR)?;
        }
        *first = false;
        match (item, &self.element) {
            (None, _) => ctx.write_null(out),
            (Some(item), Some(element)) => element.write(out, item, ctx),
            (Some(item), None) => write_late_bound(out, item, ctx),
        }
    }
}

impl WriteProcedure for SequenceWriter {
    fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        out.write_char(LIST_START)?;
        ctx.with_dynamic(false, |ctx| {
            let mut first = true;
            match self.access {
                Access::Indexed { len, get } => {
                    for index in 0..len(value)? {
                        self.write_element(out, get(value, index)?, &mut first, ctx)?;
                    }
                }
                Access::Iterated(iter) => {
                    for item in iter(value)? {
                        self.write_element(out, Some(item), &mut first, ctx)?;
                    }
                }
            }
            Ok(())
        })?;
        out.write_char(LIST_END)?;
        Ok(())
    }
}
