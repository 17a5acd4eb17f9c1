//! Zero values and default-constructed instances.

use morph_types::{PrimitiveKind, ShapeDescriptor, ShapeError, ShapeId, ShapeKind, ShapePool};

use crate::{ObjectRef, SeqRef, StructValue, Value};

/// Zero value of a shape: `false`, `0`, `0.0`, `'\0'` for primitives, a
/// struct of member defaults for value-type records, and null for every
/// reference shape.
///
/// Value-type records must not contain themselves; reference members break
/// any cycle because they default to null.
pub fn zero_value(pool: &ShapePool, shape: ShapeId) -> Result<Value, ShapeError> {
    let desc = pool.get(shape)?;
    zero_of(pool, shape, &desc)
}

fn zero_of(pool: &ShapePool, shape: ShapeId, desc: &ShapeDescriptor) -> Result<Value, ShapeError> {
    Ok(match desc.kind {
        ShapeKind::Primitive(PrimitiveKind::Bool) => Value::Bool(false),
        ShapeKind::Primitive(PrimitiveKind::Int) => Value::Int(0),
        ShapeKind::Primitive(PrimitiveKind::Float) => Value::Float(0.0),
        ShapeKind::Primitive(PrimitiveKind::Char) => Value::Char('\0'),
        ShapeKind::Record if desc.is_value_type() => {
            Value::Struct(StructValue::new(shape, member_defaults(pool, desc)?))
        }
        _ => Value::Null,
    })
}

/// Initial member values of a fresh record: zero for value-type members,
/// null for the rest.
fn member_defaults(pool: &ShapePool, desc: &ShapeDescriptor) -> Result<Vec<Value>, ShapeError> {
    desc.members
        .iter()
        .map(|member| zero_value(pool, member.shape))
        .collect()
}

#[derive(Clone, Debug)]
enum Template {
    /// Value types: a copy of the zero value.
    Zero(Value),
    /// Reference records: a fresh object with these member defaults.
    Object(Vec<Value>),
    /// Buildable collections: a fresh empty collection.
    Seq,
    /// Nothing can be built for this shape.
    Absent,
}

/// Pre-computed recipe for a default instance of one shape.
///
/// Resolving member shapes against the pool happens once, when the template
/// is built; [`instantiate`](Self::instantiate) only clones.
#[derive(Clone, Debug)]
pub struct InstanceTemplate {
    shape: ShapeId,
    template: Template,
}

impl InstanceTemplate {
    /// Template honouring the shape's constructability. Reference shapes
    /// without a parameterless constructor yield null.
    pub fn new(pool: &ShapePool, shape: ShapeId) -> Result<Self, ShapeError> {
        let desc = pool.get(shape)?;
        let template = if desc.is_value_type() {
            Template::Zero(zero_of(pool, shape, &desc)?)
        } else if !desc.has_default_constructor() {
            Template::Absent
        } else {
            match desc.kind {
                ShapeKind::Record => Template::Object(member_defaults(pool, &desc)?),
                ShapeKind::Collection { .. } => Template::Seq,
                _ => Template::Absent,
            }
        };
        Ok(InstanceTemplate { shape, template })
    }

    #[inline]
    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    /// Whether [`instantiate`](Self::instantiate) can produce a non-null value.
    pub fn is_constructible(&self) -> bool {
        match &self.template {
            Template::Zero(v) => !v.is_null(),
            Template::Object(_) | Template::Seq => true,
            Template::Absent => false,
        }
    }

    pub fn instantiate(&self) -> Value {
        match &self.template {
            Template::Zero(v) => v.clone(),
            Template::Object(fields) => Value::Object(ObjectRef::new(self.shape, fields.clone())),
            Template::Seq => Value::Seq(SeqRef::new(self.shape, Vec::new())),
            Template::Absent => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests;
