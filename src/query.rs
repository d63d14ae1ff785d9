//! Query-string rendering of objects.
//!
//! Each present member becomes `name=value`, pairs are joined by `&`. String
//! values are URL-encoded; every other value is written in JSV, which keeps
//! nested objects and lists readable in a URL.

use crate::context::WriteContext;
use crate::engine::Engine;
use crate::escape::url_encode;
use crate::format::Format;
use crate::reflect::{Reflect, Scalar, ScalarKind, TypeDescriptor, TypeKind};
use crate::{Error, Result};

pub(crate) fn write_query_string(
    engine: &Engine,
    value: &dyn Reflect,
    ty: &'static TypeDescriptor,
) -> Result<String> {
    if !matches!(ty.kind(), TypeKind::Object(_)) || crate::collections::classify(ty).is_some() {
        log::error!("query strings need an object type, got {}", ty.type_path());
        return Err(Error::unsupported_type(ty.type_path()));
    }
    let camel_case = engine.options().settings.emit_camel_case_names;
    let mut ctx = WriteContext::new(engine, Format::Jsv);
    let mut out = String::with_capacity(64);
    let mut first = true;
    for member in engine.members(ty).iter() {
        let item = member.get(value)?;
        if item.is_null() {
            continue;
        }
        if !first {
            out.push('&');
        }
        first = false;
        out.push_str(&url_encode(member.name_for(camel_case)));
        out.push('=');
        match text_of(item)? {
            Some(text) => out.push_str(&url_encode(text)),
            None => member.procedure().write(&mut out, item, &mut ctx)?,
        }
    }
    Ok(out)
}

/// The string content of a string or `Option<String>`-like value.
fn text_of(value: &dyn Reflect) -> Result<Option<&str>> {
    match value.type_descriptor().kind() {
        TypeKind::Scalar(info) if info.kind == ScalarKind::String => match (info.read)(value)? {
            Scalar::Str(text) => Ok(Some(text)),
            _ => Ok(None),
        },
        TypeKind::Nullable(info) => match (info.unwrap)(value)? {
            Some(inner) => text_of(inner),
            None => Ok(None),
        },
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Options;

    struct Search {
        query: String,
        page: Option<u32>,
        tags: Vec<String>,
        note: Option<String>,
    }

    impl Reflect for Search {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::object::<Search>("Search")
                .field("Query", |s| &s.query)
                .field("Page", |s| &s.page)
                .field("Tags", |s| &s.tags)
                .field("Note", |s| &s.note)
                .build()
        }
    }

    #[test]
    fn test_query_string() {
        let search = Search {
            query: "rust & more".into(),
            page: Some(2),
            tags: vec!["a".into(), "b,c".into()],
            note: None,
        };
        let engine = Engine::new(Options::new());
        assert_eq!(
            engine.to_query_string(&search).unwrap(),
            "Query=rust+%26+more&Page=2&Tags=[a,\"b,c\"]"
        );
    }

    #[test]
    fn test_query_string_camel_case_and_optional_text() {
        let search = Search {
            query: String::new(),
            page: None,
            tags: Vec::new(),
            note: Some("x y".into()),
        };
        let engine = Engine::new(Options::new().with_camel_case_names(true));
        assert_eq!(
            engine.to_query_string(&search).unwrap(),
            "query=&tags=[]&note=x+y"
        );
    }

    #[test]
    fn test_query_string_rejects_non_objects() {
        let engine = Engine::new(Options::new());
        assert!(matches!(
            engine.to_query_string(&5i32),
            Err(Error::UnsupportedType(_))
        ));
        assert!(engine.to_query_string(&vec![1]).is_err());
    }
}
