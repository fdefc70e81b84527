use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Runtime type marker.
///
/// `Integer` and `Float` are subtypes of `Number`; every tag is a subtype of
/// `Any`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Any,
    Null,
    Bool,
    Number,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl TypeTag {
    /// Most specific tag of `value`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => TypeTag::Integer,
            Value::Number(_) => TypeTag::Float,
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Object(_) => TypeTag::Object,
        }
    }

    /// True when a value tagged `found` is an instance of `self`.
    pub fn admits(self, found: TypeTag) -> bool {
        match (self, found) {
            (TypeTag::Any, _) => true,
            (TypeTag::Number, TypeTag::Integer | TypeTag::Float) => true,
            (expected, found) => expected == found,
        }
    }

    pub fn admits_value(self, value: &Value) -> bool {
        self.admits(Self::of(value))
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Any => "Any",
            TypeTag::Null => "Null",
            TypeTag::Bool => "Bool",
            TypeTag::Number => "Number",
            TypeTag::Integer => "Integer",
            TypeTag::Float => "Float",
            TypeTag::String => "String",
            TypeTag::Array => "Array",
            TypeTag::Object => "Object",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
