//! Object Module
//!
//! Dynamic interpreter values as seen by the socket binding, and the argument
//! accessors that raise the interpreter's usual TypeError/ValueError.

use crate::error::ObjError;

/// Interpreter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Obj {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
    Tuple(Vec<Obj>),
    List(Vec<Obj>),
}

impl Obj {
    /// Build a tuple object
    pub fn tuple(items: Vec<Obj>) -> Obj {
        Obj::Tuple(items)
    }

    /// The shared empty bytes object returned on end-of-stream
    pub fn empty_bytes() -> Obj {
        Obj::Bytes(Vec::new())
    }

    /// Interpreter type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Obj::None => "NoneType",
            Obj::Bool(_) => "bool",
            Obj::Int(_) => "int",
            Obj::Str(_) => "str",
            Obj::Bytes(_) => "bytes",
            Obj::Tuple(_) => "tuple",
            Obj::List(_) => "list",
        }
    }

    /// Integer value; bools are accepted as 0/1 like the interpreter does
    pub fn get_int(&self) -> Result<i64, ObjError> {
        match self {
            Obj::Int(v) => Ok(*v),
            Obj::Bool(b) => Ok(*b as i64),
            other => Err(ObjError::type_error(format!(
                "can't convert {} to int",
                other.type_name()
            ))),
        }
    }

    /// String contents
    pub fn get_str(&self) -> Result<&str, ObjError> {
        match self {
            Obj::Str(s) => Ok(s),
            other => Err(ObjError::type_error(format!(
                "can't convert '{}' object to str implicitly",
                other.type_name()
            ))),
        }
    }

    /// Items of a tuple or list that must have exactly `n` elements
    pub fn get_array_fixed_n(&self, n: usize) -> Result<&[Obj], ObjError> {
        let items = match self {
            Obj::Tuple(items) | Obj::List(items) => items.as_slice(),
            other => {
                return Err(ObjError::type_error(format!(
                    "object '{}' isn't a tuple or list",
                    other.type_name()
                )))
            }
        };
        if items.len() != n {
            return Err(ObjError::value_error(format!(
                "requested length {} but object has length {}",
                n,
                items.len()
            )));
        }
        Ok(items)
    }

    /// Truthiness
    pub fn is_true(&self) -> bool {
        match self {
            Obj::None => false,
            Obj::Bool(b) => *b,
            Obj::Int(v) => *v != 0,
            Obj::Str(s) => !s.is_empty(),
            Obj::Bytes(b) => !b.is_empty(),
            Obj::Tuple(items) | Obj::List(items) => !items.is_empty(),
        }
    }

    /// Length of a sized object
    pub fn len(&self) -> Option<usize> {
        match self {
            Obj::Str(s) => Some(s.len()),
            Obj::Bytes(b) => Some(b.len()),
            Obj::Tuple(items) | Obj::List(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Read-only buffer view (bytes and str support the buffer protocol)
    pub fn get_buffer(&self) -> Result<&[u8], ObjError> {
        match self {
            Obj::Bytes(b) => Ok(b),
            Obj::Str(s) => Ok(s.as_bytes()),
            other => Err(ObjError::type_error(format!(
                "object with buffer protocol required, got '{}'",
                other.type_name()
            ))),
        }
    }
}

impl From<i64> for Obj {
    fn from(v: i64) -> Self {
        Obj::Int(v)
    }
}

impl From<i32> for Obj {
    fn from(v: i32) -> Self {
        Obj::Int(v as i64)
    }
}

impl From<u32> for Obj {
    fn from(v: u32) -> Self {
        Obj::Int(v as i64)
    }
}

impl From<bool> for Obj {
    fn from(v: bool) -> Self {
        Obj::Bool(v)
    }
}

impl From<&str> for Obj {
    fn from(v: &str) -> Self {
        Obj::Str(v.to_string())
    }
}

impl From<String> for Obj {
    fn from(v: String) -> Self {
        Obj::Str(v)
    }
}

impl From<Vec<u8>> for Obj {
    fn from(v: Vec<u8>) -> Self {
        Obj::Bytes(v)
    }
}
