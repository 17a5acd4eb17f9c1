//! The runtime [`Value`] enum.

use std::fmt;
use std::sync::Arc;

use morph_types::ShapeId;

use crate::{Elements, ObjectRef, SeqRef, StreamValue, StructValue};

/// Runtime value converted by compiled routines.
#[derive(Clone)]
pub enum Value {
    Null,

    // Primitives (inline)
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    /// Immutable string. Shares its allocation on clone.
    Str(Arc<str>),

    // Records
    /// Inline value-type record.
    Struct(StructValue),
    /// Reference form of a value-type value (a boxed struct or primitive).
    Boxed(Arc<Value>),
    /// Reference-type record.
    Object(ObjectRef),

    // Collections
    /// Counted collection.
    Seq(SeqRef),
    /// Uncounted enumerable.
    Stream(StreamValue),
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Shape of the value itself, `None` for null.
    pub fn runtime_shape(&self) -> Option<ShapeId> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(ShapeId::BOOL),
            Value::Int(_) => Some(ShapeId::INT),
            Value::Float(_) => Some(ShapeId::FLOAT),
            Value::Char(_) => Some(ShapeId::CHAR),
            Value::Str(_) => Some(ShapeId::STR),
            Value::Struct(s) => Some(s.shape()),
            Value::Boxed(inner) => inner.runtime_shape(),
            Value::Object(o) => Some(o.shape()),
            Value::Seq(s) => Some(s.shape()),
            Value::Stream(s) => Some(s.shape()),
        }
    }

    /// Reference identity. Two nulls are the same instance; inline values
    /// never are.
    pub fn same_instance(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Str(a), Value::Str(b)) => Arc::ptr_eq(a, b),
            (Value::Boxed(a), Value::Boxed(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Seq(a), Value::Seq(b)) => a.ptr_eq(b),
            (Value::Stream(a), Value::Stream(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Move an inline value-type value into reference form. Reference values
    /// and null are returned unchanged.
    #[must_use]
    pub fn boxed(self) -> Value {
        match self {
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Char(_) | Value::Struct(_) => {
                Value::Boxed(Arc::new(self))
            }
            other => other,
        }
    }

    /// Inline form of a boxed value; anything else is cloned as is.
    #[must_use]
    pub fn unboxed(&self) -> Value {
        match self {
            Value::Boxed(inner) => (**inner).clone(),
            other => other.clone(),
        }
    }

    #[inline]
    pub fn is_enumerable(&self) -> bool {
        matches!(self, Value::Seq(_) | Value::Stream(_))
    }

    /// Count of a collection that exposes one without enumerating.
    pub fn known_count(&self) -> Option<usize> {
        match self {
            Value::Seq(s) => Some(s.len()),
            _ => None,
        }
    }

    /// Enumerate a collection. Strings are scalars, not character sequences.
    pub fn elements(&self) -> Option<Elements> {
        match self {
            Value::Seq(s) => Some(Elements::counted(s.snapshot())),
            Value::Stream(s) => Some(Elements::uncounted(s.iter())),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.unboxed() {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&SeqRef> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }

    /// Member value of a record, looking through boxes.
    pub fn member(&self, index: usize) -> Option<Value> {
        match self {
            Value::Struct(s) => s.get(index).cloned(),
            Value::Boxed(inner) => inner.member(index),
            Value::Object(o) => o.get(index),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    /// Structural equality. Boxed values compare equal to their inline form.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => a == b,
            (Value::Boxed(a), b) => **a == *b,
            (a, Value::Boxed(b)) => *a == **b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Stream(a), Value::Stream(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Char(c) => write!(f, "{c:?}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Struct(s) => write!(f, "{s:?}"),
            Value::Boxed(inner) => write!(f, "box({inner:?})"),
            Value::Object(o) => write!(f, "{o:?}"),
            Value::Seq(s) => write!(f, "{s:?}"),
            Value::Stream(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}
