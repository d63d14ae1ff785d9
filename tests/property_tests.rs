//! Property-based tests over generated inputs.
//!
//! JSON output is checked by parsing it back with `serde_json`; JSV output is
//! checked against its quoting rules directly.

use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use typetext::{reflect_object, to_json, to_jsv, Value};

struct Entry {
    name: String,
    score: i64,
    note: Option<String>,
}

reflect_object!(Entry { name, score, note });

fn parse(json: &str) -> serde_json::Value {
    match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => panic!("invalid JSON {:?}: {}", json, e),
    }
}

fn jsv_unquote(text: &str) -> String {
    match text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        Some(inner) if text.len() >= 2 => inner.replace("\"\"", "\""),
        _ => text.to_string(),
    }
}

const JSV_SPECIAL: &[char] = &['"', ',', ':', '{', '}', '[', ']', '\r', '\n'];

proptest! {
    #[test]
    fn prop_i64_json(n in any::<i64>()) {
        prop_assert_eq!(to_json(&n).unwrap(), n.to_string());
    }

    #[test]
    fn prop_u64_jsv(n in any::<u64>()) {
        prop_assert_eq!(to_jsv(&n).unwrap(), n.to_string());
    }

    #[test]
    fn prop_string_json_parses_back(s in any::<String>()) {
        let json = to_json(&s).unwrap();
        prop_assert_eq!(parse(&json), serde_json::Value::String(s));
    }

    #[test]
    fn prop_json_string_has_no_raw_controls(s in any::<String>()) {
        let json = to_json(&s).unwrap();
        prop_assert!(!json.chars().any(|c| c.is_control()));
    }

    #[test]
    fn prop_string_jsv_quoting(s in any::<String>()) {
        let jsv = to_jsv(&s).unwrap();
        let needs_quotes = s.contains(JSV_SPECIAL) || s.starts_with(' ') || s.ends_with(' ');
        if needs_quotes {
            prop_assert!(jsv.starts_with('"') && jsv.ends_with('"'));
            prop_assert_eq!(jsv_unquote(&jsv), s);
        } else {
            prop_assert_eq!(jsv, s);
        }
    }

    #[test]
    fn prop_vec_i32_json(v in prop::collection::vec(any::<i32>(), 0..20)) {
        let json = to_json(&v).unwrap();
        let parsed: Vec<i32> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, v);
    }

    #[test]
    fn prop_vec_i32_jsv(v in prop::collection::vec(any::<i32>(), 0..20)) {
        let expected = format!(
            "[{}]",
            v.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
        );
        prop_assert_eq!(to_jsv(&v).unwrap(), expected);
    }

    #[test]
    fn prop_option_i32(opt in proptest::option::of(any::<i32>())) {
        let json = to_json(&opt).unwrap();
        let parsed: Option<i32> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, opt);
        let jsv = to_jsv(&opt).unwrap();
        prop_assert_eq!(jsv, opt.map(|n| n.to_string()).unwrap_or_default());
    }

    #[test]
    fn prop_string_map_json(m in prop::collection::hash_map("[a-z]{1,8}", any::<i32>(), 0..10)) {
        let json = to_json(&m).unwrap();
        let parsed: HashMap<String, i32> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, m);
    }

    #[test]
    fn prop_integer_keys_are_quoted(m in prop::collection::btree_map(any::<i16>(), "[ -~]{0,8}", 0..10)) {
        let json = to_json(&m).unwrap();
        let parsed: BTreeMap<i16, String> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, m);
    }

    #[test]
    fn prop_objects_parse_back(
        name in any::<String>(),
        score in any::<i64>(),
        note in proptest::option::of(any::<String>()),
    ) {
        let entry = Entry { name: name.clone(), score, note: note.clone() };
        let parsed = parse(&to_json(&entry).unwrap());
        prop_assert_eq!(&parsed["name"], &serde_json::Value::String(name));
        prop_assert_eq!(&parsed["score"], &serde_json::json!(score));
        match note {
            Some(note) => prop_assert_eq!(&parsed["note"], &serde_json::Value::String(note)),
            None => prop_assert!(parsed.get("note").is_none()),
        }
    }

    #[test]
    fn prop_dynamic_values_match_serde_json(v in prop::collection::vec("[a-z ,:\"{}]{0,12}", 0..8)) {
        let source = serde_json::json!({ "items": v, "count": v.len() });
        let value: Value = serde_json::from_value(source.clone()).unwrap();
        prop_assert_eq!(parse(&to_json(&value).unwrap()), source);
    }
}
