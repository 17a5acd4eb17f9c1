//! Concurrent shape pool.
//!
//! Hands out [`ShapeId`]s and owns every [`ShapeDescriptor`]. Descriptors are
//! immutable once defined and shared as `Arc`s, so readers never hold the
//! pool lock while they inspect a shape.
//!
//! # Thread Safety
//! A single `RwLock` guards the slot table. Lookups take the read lock;
//! declarations and definitions take the write lock and re-check state after
//! acquiring it.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::{
    CollectionFamily, PrimitiveKind, ShapeDescriptor, ShapeError, ShapeId, ShapeKind, Shaped,
};

/// One declared shape. `descriptor` is `None` between `declare` and `define`.
struct Slot {
    name: String,
    descriptor: Option<Arc<ShapeDescriptor>>,
}

struct PoolInner {
    slots: Vec<Slot>,
    by_name: FxHashMap<String, ShapeId>,
}

impl PoolInner {
    fn with_pre_interned() -> Self {
        let mut inner = PoolInner {
            slots: Vec::with_capacity(64),
            by_name: FxHashMap::default(),
        };

        // Order must match the ShapeId constants.
        for kind in [
            PrimitiveKind::Bool,
            PrimitiveKind::Int,
            PrimitiveKind::Float,
            PrimitiveKind::Char,
            PrimitiveKind::Str,
        ] {
            inner.push_defined(ShapeDescriptor::primitive(kind));
        }
        inner.push_defined(ShapeDescriptor {
            name: "any".to_owned(),
            kind: ShapeKind::Any,
            members: Vec::new(),
            value_type: false,
            default_constructor: false,
        });
        inner.push_defined(ShapeDescriptor::collection(
            "list",
            CollectionFamily::UntypedList,
            None,
        ));

        debug_assert_eq!(inner.slots.len(), ShapeId::FIRST_DECLARED as usize);
        inner
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "shape counts never exceed u32"
    )]
    fn next_id(&self) -> ShapeId {
        ShapeId::from_raw(self.slots.len() as u32)
    }

    fn push_defined(&mut self, descriptor: ShapeDescriptor) -> ShapeId {
        let id = self.next_id();
        self.by_name.insert(descriptor.name.clone(), id);
        self.slots.push(Slot {
            name: descriptor.name.clone(),
            descriptor: Some(Arc::new(descriptor)),
        });
        id
    }

    fn declare(&mut self, name: &str) -> ShapeId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = self.next_id();
        self.by_name.insert(name.to_owned(), id);
        self.slots.push(Slot {
            name: name.to_owned(),
            descriptor: None,
        });
        id
    }

    fn define(&mut self, id: ShapeId, descriptor: ShapeDescriptor) -> Result<(), ShapeError> {
        let slot = self
            .slots
            .get_mut(id.index())
            .ok_or(ShapeError::Unknown(id))?;
        if slot.name != descriptor.name {
            return Err(ShapeError::NameMismatch {
                id,
                declared: slot.name.clone(),
                defined: descriptor.name,
            });
        }
        if let Some(existing) = &slot.descriptor {
            // Re-defining with an identical descriptor is a no-op.
            if **existing == descriptor {
                return Ok(());
            }
            return Err(ShapeError::AlreadyDefined {
                id,
                name: descriptor.name,
            });
        }
        slot.descriptor = Some(Arc::new(descriptor));
        Ok(())
    }
}

/// Thread-safe registry of shapes.
pub struct ShapePool {
    inner: RwLock<PoolInner>,
}

impl ShapePool {
    /// Create a pool holding only the pre-interned shapes.
    pub fn new() -> Self {
        ShapePool {
            inner: RwLock::new(PoolInner::with_pre_interned()),
        }
    }

    /// Reserve an id for `name` without describing it yet.
    ///
    /// Declaring an existing name returns its id, so recursive shapes can be
    /// declared from several places.
    pub fn declare(&self, name: &str) -> ShapeId {
        if let Some(&id) = self.inner.read().by_name.get(name) {
            return id;
        }
        self.inner.write().declare(name)
    }

    /// Attach a descriptor to a declared id.
    pub fn define(&self, id: ShapeId, descriptor: ShapeDescriptor) -> Result<(), ShapeError> {
        self.inner.write().define(id, descriptor)
    }

    /// Declare and define in one step.
    pub fn register(&self, descriptor: ShapeDescriptor) -> Result<ShapeId, ShapeError> {
        let mut inner = self.inner.write();
        let id = inner.declare(&descriptor.name);
        inner.define(id, descriptor)?;
        Ok(id)
    }

    /// Descriptor for `id`.
    pub fn get(&self, id: ShapeId) -> Result<Arc<ShapeDescriptor>, ShapeError> {
        let inner = self.inner.read();
        let slot = inner.slots.get(id.index()).ok_or(ShapeError::Unknown(id))?;
        slot.descriptor
            .clone()
            .ok_or_else(|| ShapeError::Undefined {
                id,
                name: slot.name.clone(),
            })
    }

    pub fn lookup(&self, name: &str) -> Option<ShapeId> {
        self.inner.read().by_name.get(name).copied()
    }

    /// Human-readable name, for diagnostics.
    pub fn name_of(&self, id: ShapeId) -> String {
        self.inner
            .read()
            .slots
            .get(id.index())
            .map_or_else(|| format!("<unknown {id}>"), |slot| slot.name.clone())
    }

    /// Number of declared shapes, pre-interned ones included.
    pub fn len(&self) -> usize {
        self.inner.read().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Structural shapes

    /// Fixed-size array of `element`.
    pub fn array_of(&self, element: ShapeId) -> Result<ShapeId, ShapeError> {
        let name = format!("[{}]", self.declared_name(element)?);
        self.register(ShapeDescriptor::collection(
            name,
            CollectionFamily::Array,
            Some(element),
        ))
    }

    /// Growable list of `element`.
    pub fn list_of(&self, element: ShapeId) -> Result<ShapeId, ShapeError> {
        let name = format!("List<{}>", self.declared_name(element)?);
        self.register(ShapeDescriptor::collection(
            name,
            CollectionFamily::List,
            Some(element),
        ))
    }

    /// `inner` or null.
    pub fn nullable(&self, inner: ShapeId) -> Result<ShapeId, ShapeError> {
        let inner_desc = self.get(inner)?;
        if let ShapeKind::Nullable(_) = inner_desc.kind {
            return Ok(inner);
        }
        self.register(ShapeDescriptor {
            name: format!("{}?", inner_desc.name),
            kind: ShapeKind::Nullable(inner),
            members: Vec::new(),
            value_type: false,
            default_constructor: false,
        })
    }

    /// A named container supporting ordered insertion.
    pub fn insertable(
        &self,
        name: impl Into<String>,
        element: Option<ShapeId>,
    ) -> Result<ShapeId, ShapeError> {
        self.register(ShapeDescriptor::collection(
            name,
            CollectionFamily::Insertable,
            element,
        ))
    }

    /// A named enumerable that cannot be built.
    pub fn opaque(
        &self,
        name: impl Into<String>,
        element: Option<ShapeId>,
    ) -> Result<ShapeId, ShapeError> {
        self.register(ShapeDescriptor::collection(
            name,
            CollectionFamily::Opaque,
            element,
        ))
    }

    /// Follow `Nullable` wrappers down to the underlying shape.
    pub fn strip_nullable(&self, mut id: ShapeId) -> Result<ShapeId, ShapeError> {
        loop {
            match self.get(id)?.kind {
                ShapeKind::Nullable(inner) => id = inner,
                _ => return Ok(id),
            }
        }
    }

    /// Shape of a Rust type that describes itself.
    pub fn shape_of<T: Shaped>(&self) -> Result<ShapeId, ShapeError> {
        T::register(self)
    }

    fn declared_name(&self, id: ShapeId) -> Result<String, ShapeError> {
        self.inner
            .read()
            .slots
            .get(id.index())
            .map(|slot| slot.name.clone())
            .ok_or(ShapeError::Unknown(id))
    }
}

impl Default for ShapePool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShapePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapePool")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
