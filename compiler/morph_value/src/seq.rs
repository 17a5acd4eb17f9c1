//! Sequence values: counted collections and uncounted streams.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use morph_types::ShapeId;

use crate::Value;

/// Collection instance with identity: array, list, untyped list, or any
/// insertable container. The shape says which.
#[derive(Clone)]
pub struct SeqRef {
    shape: ShapeId,
    items: Arc<RwLock<Vec<Value>>>,
}

impl SeqRef {
    pub fn new(shape: ShapeId, items: Vec<Value>) -> Self {
        SeqRef {
            shape,
            items: Arc::new(RwLock::new(items)),
        }
    }

    pub fn with_capacity(shape: ShapeId, capacity: usize) -> Self {
        Self::new(shape, Vec::with_capacity(capacity))
    }

    #[inline]
    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    pub fn push(&self, value: Value) {
        self.items.write().push(value);
    }

    /// Returns `false` if `index` is out of range.
    pub fn set(&self, index: usize, value: Value) -> bool {
        match self.items.write().get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.read().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.items.read().capacity()
    }

    /// Copy of the current items. Reference items keep their identity.
    pub fn snapshot(&self) -> Vec<Value> {
        self.items.read().clone()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &SeqRef) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl PartialEq for SeqRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.shape == other.shape && self.snapshot() == other.snapshot())
    }
}

impl fmt::Debug for SeqRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq{} ", self.shape)?;
        f.debug_list().entries(self.snapshot().iter()).finish()
    }
}

type Producer = dyn Fn() -> Box<dyn Iterator<Item = Value> + Send> + Send + Sync;

/// Enumerable value that does not expose a count.
///
/// Each enumeration calls the producer again, so a stream can be read more
/// than once.
#[derive(Clone)]
pub struct StreamValue {
    shape: ShapeId,
    producer: Arc<Producer>,
}

impl StreamValue {
    pub fn new<F, I>(shape: ShapeId, producer: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: Iterator<Item = Value> + Send + 'static,
    {
        StreamValue {
            shape,
            producer: Arc::new(move || Box::new(producer()) as Box<dyn Iterator<Item = Value> + Send>),
        }
    }

    /// A stream replaying `items` while hiding their count.
    pub fn from_values(shape: ShapeId, items: Vec<Value>) -> Self {
        Self::new(shape, move || items.clone().into_iter())
    }

    #[inline]
    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = Value> + Send> {
        (self.producer)()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &StreamValue) -> bool {
        Arc::ptr_eq(&self.producer, &other.producer)
    }
}

impl fmt::Debug for StreamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream{}", self.shape)
    }
}

/// One enumeration of an enumerable value.
pub struct Elements {
    count: Option<usize>,
    iter: ElementsIter,
}

enum ElementsIter {
    Snapshot(std::vec::IntoIter<Value>),
    Stream(Box<dyn Iterator<Item = Value> + Send>),
}

impl Elements {
    pub(crate) fn counted(items: Vec<Value>) -> Self {
        Elements {
            count: Some(items.len()),
            iter: ElementsIter::Snapshot(items.into_iter()),
        }
    }

    pub(crate) fn uncounted(iter: Box<dyn Iterator<Item = Value> + Send>) -> Self {
        Elements {
            count: None,
            iter: ElementsIter::Stream(iter),
        }
    }

    /// The element count, when the source exposes it up front.
    #[inline]
    pub fn known_count(&self) -> Option<usize> {
        self.count
    }
}

impl Iterator for Elements {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match &mut self.iter {
            ElementsIter::Snapshot(iter) => iter.next(),
            ElementsIter::Stream(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.iter {
            ElementsIter::Snapshot(iter) => iter.size_hint(),
            ElementsIter::Stream(iter) => iter.size_hint(),
        }
    }
}
