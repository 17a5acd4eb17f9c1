//! Record values: inline value-type structs and reference objects.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use morph_types::ShapeId;

use crate::Value;

/// Inline value-type record. Cloning copies every field.
#[derive(Clone, PartialEq)]
pub struct StructValue {
    shape: ShapeId,
    fields: Vec<Value>,
}

impl StructValue {
    pub fn new(shape: ShapeId, fields: Vec<Value>) -> Self {
        StructValue { shape, fields }
    }

    #[inline]
    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.fields.get(index)
    }

    /// Returns `false` if `index` is out of range.
    pub fn set(&mut self, index: usize, value: Value) -> bool {
        match self.fields.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn fields(&self) -> &[Value] {
        &self.fields
    }
}

impl fmt::Debug for StructValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "struct{} ", self.shape)?;
        f.debug_list().entries(&self.fields).finish()
    }
}

/// Reference record with identity.
///
/// Fields sit behind a lock so a routine can populate a caller-supplied
/// instance in place while other clones of the reference observe the result.
#[derive(Clone)]
pub struct ObjectRef {
    shape: ShapeId,
    fields: Arc<RwLock<Vec<Value>>>,
}

impl ObjectRef {
    pub fn new(shape: ShapeId, fields: Vec<Value>) -> Self {
        ObjectRef {
            shape,
            fields: Arc::new(RwLock::new(fields)),
        }
    }

    #[inline]
    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.fields.read().get(index).cloned()
    }

    /// Returns `false` if `index` is out of range.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.fields.write().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Copy of the current field values.
    pub fn fields(&self) -> Vec<Value> {
        self.fields.read().clone()
    }

    pub fn len(&self) -> usize {
        self.fields.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        // Same allocation short-circuits; it also avoids taking the read lock twice.
        self.ptr_eq(other) || (self.shape == other.shape && self.fields() == other.fields())
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object{} ", self.shape)?;
        f.debug_list().entries(self.fields().iter()).finish()
    }
}
