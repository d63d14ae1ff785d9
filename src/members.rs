//! Member introspection for composite types.
//!
//! [`introspect`] turns the fields of an object descriptor into the ordered
//! list of [`MemberDescriptor`]s the composite writer walks. Types built with
//! [`DataMember`](crate::DataMember) tags are contracts: only tagged members
//! are written, ordered by their `order` (untagged order first, then
//! ascending), with declaration order breaking ties.
//!
//! The engine caches the result per type, so the work happens once.

use crate::compiler::ProcedureRef;
use crate::options::Options;
use crate::reflect::{DefaultValue, FieldInfo, Reflect, TypeDescriptor, TypeKind};
use crate::Result;
use std::fmt;

/// One writable member of a composite type.
pub struct MemberDescriptor {
    field: &'static FieldInfo,
    name: &'static str,
    camel_name: String,
    order: Option<i32>,
    procedure: ProcedureRef,
    default: Option<(DefaultValue, Box<dyn Reflect>)>,
}

impl MemberDescriptor {
    fn new(options: &Options, field: &'static FieldInfo, contract: bool) -> Self {
        let tag = field.data_member().filter(|_| contract);
        let (name, camel_name) = match tag.and_then(|tag| tag.name) {
            Some(name) => (name, name.to_string()),
            None => (field.name(), camel_case(field.name())),
        };

        let member_type = field.member_type();
        let default = if member_type.is_value_type() && options.has_hook(member_type.type_id()) {
            member_type
                .default_value()
                .map(|default| (*default, default.make()))
        } else {
            None
        };

        MemberDescriptor {
            field,
            name,
            camel_name,
            order: tag.and_then(|tag| tag.order),
            procedure: ProcedureRef::new(field.type_ref()),
            default,
        }
    }

    /// The member name as declared, or its contract override.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn camel_name(&self) -> &str {
        &self.camel_name
    }

    /// The name to write under the given naming setting.
    #[must_use]
    pub fn name_for(&self, camel_case: bool) -> &str {
        if camel_case {
            &self.camel_name
        } else {
            self.name
        }
    }

    #[must_use]
    pub fn order(&self) -> Option<i32> {
        self.order
    }

    #[must_use]
    pub fn member_type(&self) -> &'static TypeDescriptor {
        self.field.member_type()
    }

    pub fn get<'a>(&self, owner: &'a dyn Reflect) -> Result<&'a dyn Reflect> {
        self.field.get(owner)
    }

    #[must_use]
    pub fn procedure(&self) -> &ProcedureRef {
        &self.procedure
    }

    /// Whether `value` equals the member type's default. Only value types
    /// with a custom hook carry a default to compare against.
    #[must_use]
    pub fn is_default(&self, value: &dyn Reflect) -> bool {
        self.default
            .as_ref()
            .map_or(false, |(default, instance)| {
                default.matches(value, instance.as_ref())
            })
    }

    /// Whether the member is omitted when null values are not written.
    #[must_use]
    pub fn is_skippable(&self, value: &dyn Reflect) -> bool {
        value.is_null() || self.is_default(value)
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("camel_name", &self.camel_name)
            .field("order", &self.order)
            .field("member_type", &self.member_type().type_path())
            .finish()
    }
}

/// Returns the writable members of `ty` in write order.
///
/// Non-object types have no members.
#[must_use]
pub fn introspect(options: &Options, ty: &'static TypeDescriptor) -> Vec<MemberDescriptor> {
    let TypeKind::Object(info) = ty.kind() else {
        return Vec::new();
    };
    let contract = info.is_contract();
    let mut members: Vec<MemberDescriptor> = info
        .fields()
        .iter()
        .filter(|field| !contract || field.data_member().is_some())
        .map(|field| MemberDescriptor::new(options, field, contract))
        .collect();
    if contract {
        members.sort_by_key(|member| member.order.map_or((0, 0), |order| (1, order)));
    }
    log::debug!(
        "introspected {} members of {}",
        members.len(),
        ty.type_path()
    );
    members
}

/// Converts a member name to camelCase.
///
/// Snake case names are joined with each following word capitalised;
/// other names only have their first character lowercased.
///
/// # Examples
///
/// ```rust
/// use typetext::members::camel_case;
///
/// assert_eq!(camel_case("first_name"), "firstName");
/// assert_eq!(camel_case("Name"), "name");
/// assert_eq!(camel_case("id"), "id");
/// ```
#[must_use]
pub fn camel_case(name: &str) -> String {
    let mut camel = String::with_capacity(name.len());
    let mut upper_next = false;
    for (index, c) in name.chars().enumerate() {
        if c == '_' && index > 0 {
            upper_next = true;
        } else if upper_next {
            camel.extend(c.to_uppercase());
            upper_next = false;
        } else if camel.is_empty() {
            camel.extend(c.to_lowercase());
        } else {
            camel.push(c);
        }
    }
    camel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::descriptor_of;
    use crate::DataMember;

    #[derive(Default)]
    struct Plain {
        first_name: String,
        age: i32,
    }

    impl Reflect for Plain {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::object::<Plain>("Plain")
                .field("first_name", |p| &p.first_name)
                .field("age", |p| &p.age)
                .build()
        }
    }

    struct Tagged {
        a: i32,
        b: i32,
        c: i32,
        hidden: i32,
    }

    impl Reflect for Tagged {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::object::<Tagged>("Tagged")
                .data_member("a", DataMember::new().order(2), |t| &t.a)
                .data_member("b", DataMember::new(), |t| &t.b)
                .data_member("c", DataMember::new().named("Gamma").order(1), |t| &t.c)
                .field("hidden", |t| &t.hidden)
                .build()
        }
    }

    #[test]
    fn test_declaration_order() {
        let members = introspect(&Options::new(), descriptor_of::<Plain>());
        let names: Vec<_> = members.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["first_name", "age"]);
        assert_eq!(members[0].camel_name(), "firstName");
        assert_eq!(members[0].name_for(true), "firstName");
        assert_eq!(members[0].name_for(false), "first_name");
    }

    #[test]
    fn test_contract_filters_and_orders() {
        let members = introspect(&Options::new(), descriptor_of::<Tagged>());
        let names: Vec<_> = members.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["b", "Gamma", "a"]);
        assert_eq!(members[1].camel_name(), "Gamma");
        assert_eq!(members[1].order(), Some(1));
    }

    #[test]
    fn test_member_access() {
        let plain = Plain {
            first_name: "Ann".to_string(),
            age: 30,
        };
        let members = introspect(&Options::new(), descriptor_of::<Plain>());
        let age = members[1].get(&plain).unwrap();
        assert_eq!(*crate::reflect::downcast::<i32>(age).unwrap(), 30);
        assert!(members[0].get(&5i32).is_err());
    }

    #[test]
    fn test_defaults_only_for_hooked_value_types() {
        let plain = Plain::default();
        let members = introspect(&Options::new(), descriptor_of::<Plain>());
        assert!(!members[1].is_default(members[1].get(&plain).unwrap()));

        let hooked = Options::new().with_serialize_fn::<i32>(|n| n.to_string());
        let members = introspect(&hooked, descriptor_of::<Plain>());
        assert!(members[1].is_skippable(members[1].get(&plain).unwrap()));
        assert!(!members[1].is_skippable(&7i32));
    }

    #[test]
    fn test_non_objects_have_no_members() {
        assert!(introspect(&Options::new(), descriptor_of::<i32>()).is_empty());
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("FirstName"), "firstName");
        assert_eq!(camel_case("user_id_value"), "userIdValue");
        assert_eq!(camel_case("_private"), "_private");
        assert_eq!(camel_case(""), "");
    }
}
