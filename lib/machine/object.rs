use core::fmt;
use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
};

use anyhow::Result;

/// Native function exposed to scripts.
pub type Builtin = fn(Vec<Object>) -> Result<Object>;

#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Integer(i64),
    String(String),
    Boolean(bool),
    Null,
    Array(Vec<Object>),
    Hash(HashMap<Object, Object>),
    ReturnValue(Box<Object>),
    BuiltInFunction(Builtin),
}

impl Object {
    pub fn hashable(&self) -> bool {
        matches!(
            self,
            Object::Integer(_) | Object::Boolean(_) | Object::String(_)
        )
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Integer(_) => "integer",
            Object::String(_) => "string",
            Object::Boolean(_) => "boolean",
            Object::Null => "null",
            Object::Array(_) => "array",
            Object::Hash(_) => "hash",
            Object::ReturnValue(_) => "return value",
            Object::BuiltInFunction(_) => "builtin function",
        }
    }
}

impl Eq for Object {}

impl Hash for Object {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Object::Integer(value) => value.hash(state),
            Object::String(value) => value.hash(state),
            Object::Boolean(value) => value.hash(state),
            _ => panic!("Cannot hash object {:?}", self),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::String(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::Null => write!(f, "null"),
            Object::Array(values) => {
                let values: Vec<String> = values.iter().map(|v| format!("{}", v)).collect();
                write!(f, "[{}]", values.join(", "))
            }
            Object::ReturnValue(value) => write!(f, "return {}", value),
            Object::BuiltInFunction(_) => write!(f, "builtin function"),
            Object::Hash(hash) => {
                let mut pairs = hash
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect::<Vec<String>>();
                pairs.sort();
                write!(f, "{{{}}}", pairs.join(", "))
            }
        }
    }
}
