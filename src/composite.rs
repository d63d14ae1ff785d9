//! Member-wise writer for user object types.
//!
//! Output shape, JSON then JSV:
//!
//! ```text
//! {"__type":"Dog","Name":"Rex","Age":3}
//! {__type:Dog,Name:Rex,Age:3}
//! ```
//!
//! The discriminator is only written when the value was reached through a
//! polymorphic declared type and its runtime type is not excluded from type
//! info. Null members, and members equal to the default of a hooked value
//! type, are omitted unless null values are included. A composite written as
//! a JSON map key is wrapped in quotes so the key stays a string.

use crate::compiler::WriteProcedure;
use crate::context::WriteContext;
use crate::engine::Engine;
use crate::escape;
use crate::format::{ITEM_SEPARATOR, MAP_END, MAP_KEY_SEPARATOR, MAP_START, QUOTE};
use crate::members::MemberDescriptor;
use crate::reflect::{Reflect, TypeDescriptor};
use crate::Result;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

pub(crate) struct CompositeWriter {
    type_id: TypeId,
    type_name: &'static str,
    members: Arc<[MemberDescriptor]>,
}

impl CompositeWriter {
    pub(crate) fn new(engine: &Engine, ty: &'static TypeDescriptor) -> Self {
        CompositeWriter {
            type_id: ty.type_id(),
            type_name: ty.name(),
            members: engine.members(ty),
        }
    }
}

impl WriteProcedure for CompositeWriter {
    fn write(
        &self,
        out: &mut dyn fmt::Write,
        value: &dyn Reflect,
        ctx: &mut WriteContext<'_>,
    ) -> Result<()> {
        let format = ctx.format();
        let options = ctx.engine().options();
        let include_null = options.settings.include_null_values;
        let camel_case = options.settings.emit_camel_case_names;
        let quote_wrapped = format.quotes_keys() && ctx.key_depth() > 0 && !ctx.is_writing_map_value();

        if quote_wrapped {
            out.write_char(QUOTE)?;
        }
        out.write_char(MAP_START)?;

        let mut first = true;
        if ctx.is_writing_dynamic() && !options.excludes_type_info(self.type_id) {
            escape::write_property_name(out, &options.settings.type_attr, format)?;
            out.write_char(MAP_KEY_SEPARATOR)?;
            escape::write_canonical(out, self.type_name, format)?;
            first = false;
        }

        ctx.with_dynamic(false, |ctx| {
            ctx.with_map_value(true, |ctx| {
                for member in self.members.iter() {
                    let item = member.get(value)?;
                    if !include_null && member.is_skippable(item) {
                        continue;
                    }
                    if !first {
                        out.write_char(ITEM_SEPARATOR)?;
                    }
                    first = false;
                    escape::write_property_name(out, member.name_for(camel_case), format)?;
                    out.write_char(MAP_KEY_SEPARATOR)?;
                    member.procedure().write(out, item, ctx)?;
                }
                Ok(())
            })
        })?;

        out.write_char(MAP_END)?;
        if quote_wrapped {
            out.write_char(QUOTE)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::reflect::{Reflect, TypeDescriptor};
    use crate::{Engine, Format, Options};
    use indexmap::IndexMap;

    #[derive(Clone, Default, PartialEq, Eq, Hash)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl Reflect for Point {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::object::<Point>("Point")
                .field("X", |p| &p.x)
                .field("Y", |p| &p.y)
                .build()
        }
    }

    struct Labelled {
        label: Option<String>,
        at: Point,
    }

    impl Reflect for Labelled {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::object::<Labelled>("Labelled")
                .field("Label", |l| &l.label)
                .field("At", |l| &l.at)
                .build()
        }
    }

    fn engine() -> Engine {
        Engine::new(Options::new())
    }

    #[test]
    fn test_members_in_declaration_order() {
        let point = Point { x: 1, y: 2 };
        assert_eq!(
            engine().serialize(&point, Format::Json).unwrap(),
            r#"{"X":1,"Y":2}"#
        );
        assert_eq!(engine().serialize(&point, Format::Jsv).unwrap(), "{X:1,Y:2}");
    }

    #[test]
    fn test_null_members_skipped_by_default() {
        let value = Labelled {
            label: None,
            at: Point::default(),
        };
        assert_eq!(
            engine().serialize(&value, Format::Json).unwrap(),
            r#"{"At":{"X":0,"Y":0}}"#
        );
        let with_nulls = Engine::new(Options::new().with_include_null_values(true));
        assert_eq!(
            with_nulls.serialize(&value, Format::Json).unwrap(),
            r#"{"Label":null,"At":{"X":0,"Y":0}}"#
        );
    }

    #[test]
    fn test_camel_case_names() {
        let value = Labelled {
            label: Some("here".into()),
            at: Point { x: 3, y: 4 },
        };
        let engine = Engine::new(Options::new().with_camel_case_names(true));
        assert_eq!(
            engine.serialize(&value, Format::Json).unwrap(),
            r#"{"label":"here","at":{"x":3,"y":4}}"#
        );
    }

    #[test]
    fn test_composite_key_is_quote_wrapped_in_json() {
        let mut map = IndexMap::new();
        map.insert(Point { x: 1, y: 2 }, "a".to_string());
        assert_eq!(
            engine().serialize(&map, Format::Json).unwrap(),
            r#"{"{"X":1,"Y":2}":"a"}"#
        );
        assert_eq!(
            engine().serialize(&map, Format::Jsv).unwrap(),
            "{{X:1,Y:2}:a}"
        );
    }

    #[test]
    fn test_composite_map_value_is_not_wrapped() {
        let mut map = IndexMap::new();
        map.insert("p".to_string(), Point { x: 5, y: 6 });
        assert_eq!(
            engine().serialize(&map, Format::Json).unwrap(),
            r#"{"p":{"X":5,"Y":6}}"#
        );
    }

    #[test]
    fn test_hooked_default_members_are_skipped() {
        let engine = Engine::new(Options::new().with_serialize_fn::<i32>(|n| format!("n{n}")));
        let point = Point { x: 0, y: 9 };
        assert_eq!(
            engine.serialize(&point, Format::Json).unwrap(),
            r#"{"Y":"n9"}"#
        );
    }
}
