//! Collection conversion engine.
//!
//! Destinations fall into four kinds:
//!
//! | Kind | Built as | Reuses a supplied instance |
//! |---|---|---|
//! | `Array` | fixed length, pre-sized from the source count | no |
//! | `TypedList` | growable, capacity from the source count | no |
//! | `UntypedList` | growable list of `any` | no |
//! | `GenericInsertable` | via its construction program | yes |
//!
//! A source that is not enumerable is treated as a one-element collection.
//! Null elements are carried over untouched. Element order is preserved.

use morph_ir::Program;
use morph_types::{CollectionFamily, ShapeDescriptor, ShapeId, ShapePool};
use morph_value::{Elements, SeqRef, Value};

use crate::config::{CopyMode, MappingConfig};
use crate::construct::create_instance_program;
use crate::lower::LoweredProgram;
use crate::registry::Linker;
use crate::routine::LazyRoutine;
use crate::{CompileError, ConversionError};

/// Destination collection kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Array,
    TypedList,
    UntypedList,
    GenericInsertable,
}

impl CollectionKind {
    /// Kind of a destination shape; `None` when it cannot be built.
    pub fn resolve(descriptor: &ShapeDescriptor) -> Option<Self> {
        match descriptor.collection_family()? {
            CollectionFamily::Array => Some(CollectionKind::Array),
            CollectionFamily::List => Some(CollectionKind::TypedList),
            CollectionFamily::UntypedList => Some(CollectionKind::UntypedList),
            CollectionFamily::Insertable => Some(CollectionKind::GenericInsertable),
            CollectionFamily::Opaque => None,
        }
    }
}

/// How each element reaches the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementRoute {
    /// Element references are copied as they are.
    Verbatim,
    /// Through the routine for this statically known pair.
    Static { from: ShapeId, to: ShapeId },
    /// Through a routine picked from each element's runtime shape. `to` is
    /// the destination element shape, `None` for "the element's own shape".
    Dynamic { to: Option<ShapeId> },
}

/// Compiled form of a collection routine before lowering.
#[derive(Clone, Debug, PartialEq)]
pub struct CollectionPlan {
    pub kind: CollectionKind,
    pub to: ShapeId,
    pub route: ElementRoute,
    /// Converted elements are stored inline rather than boxed.
    pub inline_elements: bool,
    /// Construction program for generic insertables.
    pub construct: Option<Program>,
}

/// Plan the conversion of `from` into the collection shape `to`.
///
/// Returns `Ok(None)` when the destination kind cannot be resolved.
pub fn plan_collection(
    pool: &ShapePool,
    config: &MappingConfig,
    from: ShapeId,
    src: &ShapeDescriptor,
    to: ShapeId,
    dst: &ShapeDescriptor,
) -> Result<Option<CollectionPlan>, CompileError> {
    let Some(kind) = CollectionKind::resolve(dst) else {
        return Ok(None);
    };

    // Element shape of the source, or the source itself for scalars.
    let source_element = if src.is_collection() {
        src.element_shape().unwrap_or(ShapeId::ANY)
    } else {
        from
    };
    let dest_element = dst.element_shape();
    let shallow = config.copy_mode() == CopyMode::Shallow;

    let route = match kind {
        CollectionKind::Array | CollectionKind::TypedList => {
            let element = dest_element.unwrap_or(ShapeId::ANY);
            if shallow && (source_element == element || element == ShapeId::ANY) {
                ElementRoute::Verbatim
            } else if source_element == ShapeId::ANY {
                ElementRoute::Dynamic {
                    to: (element != ShapeId::ANY).then_some(element),
                }
            } else {
                ElementRoute::Static {
                    from: source_element,
                    to: element,
                }
            }
        }
        CollectionKind::UntypedList if shallow => ElementRoute::Verbatim,
        CollectionKind::UntypedList => ElementRoute::Dynamic { to: None },
        CollectionKind::GenericInsertable if shallow => ElementRoute::Verbatim,
        CollectionKind::GenericInsertable => ElementRoute::Dynamic { to: dest_element },
    };

    let inline_elements = match dest_element {
        Some(element) => pool.get(pool.strip_nullable(element)?)?.is_value_type(),
        None => false,
    };

    let construct = match kind {
        CollectionKind::GenericInsertable => Some(create_instance_program(pool, to)?),
        _ => None,
    };

    Ok(Some(CollectionPlan {
        kind,
        to,
        route,
        inline_elements,
        construct,
    }))
}

enum BoundRoute {
    Verbatim,
    Static(LazyRoutine),
    Dynamic { to: Option<ShapeId>, linker: Linker },
}

/// Executable collection routine.
pub(crate) struct CollectionMapper {
    kind: CollectionKind,
    to: ShapeId,
    route: BoundRoute,
    inline_elements: bool,
    construct: Option<LoweredProgram>,
}

impl CollectionMapper {
    pub(crate) fn bind(
        plan: CollectionPlan,
        construct: Option<LoweredProgram>,
        linker: &Linker,
    ) -> Self {
        let route = match plan.route {
            ElementRoute::Verbatim => BoundRoute::Verbatim,
            ElementRoute::Static { from, to } => BoundRoute::Static(linker.link(from, to)),
            ElementRoute::Dynamic { to } => BoundRoute::Dynamic {
                to,
                linker: linker.clone(),
            },
        };
        CollectionMapper {
            kind: plan.kind,
            to: plan.to,
            route,
            inline_elements: plan.inline_elements,
            construct,
        }
    }

    pub(crate) fn sub_routine(&self) -> Option<&LazyRoutine> {
        match &self.route {
            BoundRoute::Static(link) => Some(link),
            BoundRoute::Verbatim | BoundRoute::Dynamic { .. } => None,
        }
    }

    pub(crate) fn convert(
        &self,
        source: &Value,
        destination: &Value,
        state: &Value,
    ) -> Result<Value, ConversionError> {
        if source.is_null() {
            return Ok(Value::Null);
        }
        match self.kind {
            CollectionKind::Array => self.to_array(source, state),
            CollectionKind::TypedList | CollectionKind::UntypedList => self.to_list(source, state),
            CollectionKind::GenericInsertable => self.to_insertable(source, destination, state),
        }
    }

    fn to_array(&self, source: &Value, state: &Value) -> Result<Value, ConversionError> {
        let Some(elements) = source.elements() else {
            let item = self.map_element(source.clone(), state)?;
            return Ok(Value::Seq(SeqRef::new(self.to, vec![item])));
        };
        match elements.known_count() {
            Some(count) => self.fill_array(count, elements, state),
            None => {
                // Arrays need their length up front.
                let buffered: Vec<Value> = elements.collect();
                self.fill_array(buffered.len(), buffered.into_iter(), state)
            }
        }
    }

    fn fill_array(
        &self,
        count: usize,
        elements: impl Iterator<Item = Value>,
        state: &Value,
    ) -> Result<Value, ConversionError> {
        let mut items = vec![Value::Null; count];
        for (slot, element) in items.iter_mut().zip(elements) {
            *slot = self.map_element(element, state)?;
        }
        Ok(Value::Seq(SeqRef::new(self.to, items)))
    }

    fn to_list(&self, source: &Value, state: &Value) -> Result<Value, ConversionError> {
        let list = match source.elements() {
            Some(elements) => {
                let list = SeqRef::with_capacity(self.to, elements.known_count().unwrap_or(0));
                self.append(&list, elements, state)?;
                list
            }
            None => SeqRef::new(self.to, vec![self.map_element(source.clone(), state)?]),
        };
        Ok(Value::Seq(list))
    }

    fn to_insertable(
        &self,
        source: &Value,
        destination: &Value,
        state: &Value,
    ) -> Result<Value, ConversionError> {
        let target = match destination {
            Value::Seq(seq) if seq.shape() == self.to => seq.clone(),
            _ => match self.construct_instance(state)? {
                Some(seq) => seq,
                None => return Ok(Value::Null),
            },
        };
        match source.elements() {
            Some(elements) => self.append(&target, elements, state)?,
            None => target.push(self.map_element(source.clone(), state)?),
        }
        Ok(Value::Seq(target))
    }

    fn construct_instance(&self, state: &Value) -> Result<Option<SeqRef>, ConversionError> {
        let Some(construct) = &self.construct else {
            return Ok(None);
        };
        match construct.run(&Value::Null, &Value::Null, state)? {
            Value::Seq(seq) => Ok(Some(seq)),
            _ => Ok(None),
        }
    }

    fn append(&self, target: &SeqRef, elements: Elements, state: &Value) -> Result<(), ConversionError> {
        for element in elements {
            target.push(self.map_element(element, state)?);
        }
        Ok(())
    }

    fn map_element(&self, element: Value, state: &Value) -> Result<Value, ConversionError> {
        if element.is_null() {
            return Ok(Value::Null);
        }
        let mapped = match &self.route {
            BoundRoute::Verbatim => return Ok(element),
            BoundRoute::Static(link) => link.resolve()?.invoke(&element, None, state)?,
            BoundRoute::Dynamic { to, linker } => {
                let Some(shape) = element.runtime_shape() else {
                    return Ok(Value::Null);
                };
                linker
                    .resolve(shape, to.unwrap_or(shape))?
                    .invoke(&element, None, state)?
            }
        };
        Ok(if self.inline_elements {
            mapped.unboxed()
        } else {
            mapped
        })
    }
}
