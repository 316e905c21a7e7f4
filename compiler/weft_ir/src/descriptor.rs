//! Structural type descriptors.
//!
//! Descriptors are the managed runtime's view of an interface type: a tree of
//! `{"typefamily": ...}` objects. Integers of every width and enums collapse
//! to `int`; by-reference markers disappear.

use serde::Serialize;

/// A structural type descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "typefamily", rename_all = "lowercase")]
pub enum Descriptor {
    Int,
    Bool,
    Double,
    String,
    Void,
    Name {
        name: String,
    },
    Array {
        elemtype: Box<Descriptor>,
    },
    /// A method attached to an object; the receiver is implicit.
    Method {
        args: Vec<Member>,
        #[serde(rename = "return")]
        ret: Box<Descriptor>,
    },
    /// A free function value.
    Function {
        args: Vec<Member>,
        #[serde(rename = "return")]
        ret: Box<Descriptor>,
    },
    Constructor {
        args: Vec<Member>,
        #[serde(rename = "return")]
        ret: Box<Descriptor>,
    },
    Object {
        members: Vec<Member>,
        #[serde(skip_serializing_if = "Option::is_none")]
        typename: Option<String>,
    },
}

impl Descriptor {
    /// Reference to a registered class by name.
    pub fn name(name: impl Into<String>) -> Self {
        Descriptor::Name { name: name.into() }
    }

    /// Anonymous object with the given members.
    pub fn object(members: Vec<Member>) -> Self {
        Descriptor::Object {
            members,
            typename: None,
        }
    }

    /// Object type carrying its class name.
    pub fn typed_object(members: Vec<Member>, typename: impl Into<String>) -> Self {
        Descriptor::Object {
            members,
            typename: Some(typename.into()),
        }
    }

    pub fn function(args: Vec<Member>, ret: Descriptor) -> Self {
        Descriptor::Function {
            args,
            ret: Box::new(ret),
        }
    }

    pub fn constructor(args: Vec<Member>, ret: Descriptor) -> Self {
        Descriptor::Constructor {
            args,
            ret: Box::new(ret),
        }
    }
}

/// A named member or argument of a descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Member {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Descriptor,
}

impl Member {
    /// Argument names carry no meaning for the runtime; every argument is `x`.
    pub const ARG_NAME: &'static str = "x";

    pub fn new(name: impl Into<String>, ty: Descriptor) -> Self {
        Member {
            name: name.into(),
            ty,
        }
    }

    /// Positional argument member.
    pub fn arg(ty: Descriptor) -> Self {
        Member::new(Self::ARG_NAME, ty)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_unit_families_serialize_as_tag_only() {
        assert_eq!(
            serde_json::to_value(Descriptor::Int).unwrap(),
            json!({"typefamily": "int"})
        );
        assert_eq!(
            serde_json::to_value(Descriptor::Void).unwrap(),
            json!({"typefamily": "void"})
        );
    }

    #[test]
    fn test_method_uses_return_key() {
        let d = Descriptor::Method {
            args: vec![Member::arg(Descriptor::Bool)],
            ret: Box::new(Descriptor::name("Widget")),
        };
        assert_eq!(
            serde_json::to_value(d).unwrap(),
            json!({
                "typefamily": "method",
                "args": [{"name": "x", "type": {"typefamily": "bool"}}],
                "return": {"typefamily": "name", "name": "Widget"}
            })
        );
    }

    #[test]
    fn test_object_typename_is_optional() {
        let anon = Descriptor::object(vec![]);
        assert_eq!(
            serde_json::to_value(anon).unwrap(),
            json!({"typefamily": "object", "members": []})
        );

        let typed = Descriptor::typed_object(vec![], "Button");
        assert_eq!(
            serde_json::to_value(typed).unwrap(),
            json!({"typefamily": "object", "members": [], "typename": "Button"})
        );
    }

    #[test]
    fn test_array_elemtype() {
        let d = Descriptor::Array {
            elemtype: Box::new(Descriptor::String),
        };
        assert_eq!(
            serde_json::to_value(d).unwrap(),
            json!({"typefamily": "array", "elemtype": {"typefamily": "string"}})
        );
    }
}
