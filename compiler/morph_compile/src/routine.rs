//! Compiled routines and lazily bound sub-routine links.

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use morph_types::ShapeId;
use morph_value::Value;

use crate::collection::CollectionMapper;
use crate::config::{ConfigId, CopyMode};
use crate::lower::LoweredProgram;
use crate::registry::Linker;
use crate::stack::ensure_sufficient_stack;
use crate::ConversionError;

/// Cache key of a routine.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RoutineKey {
    pub from: ShapeId,
    pub to: ShapeId,
    pub config: ConfigId,
}

impl RoutineKey {
    pub fn new(from: ShapeId, to: ShapeId, config: ConfigId) -> Self {
        RoutineKey { from, to, config }
    }
}

pub(crate) enum RoutineBody {
    Program(LoweredProgram),
    Collection(CollectionMapper),
    /// Destination collection kind is unknown; always yields null.
    Unresolved,
}

/// An executable conversion routine.
///
/// Immutable after compilation and safe to invoke from any number of
/// threads at once.
pub struct CompiledRoutine {
    key: RoutineKey,
    copy_mode: CopyMode,
    body: RoutineBody,
}

impl CompiledRoutine {
    pub(crate) fn new(key: RoutineKey, copy_mode: CopyMode, body: RoutineBody) -> Self {
        CompiledRoutine {
            key,
            copy_mode,
            body,
        }
    }

    #[inline]
    pub fn key(&self) -> &RoutineKey {
        &self.key
    }

    #[inline]
    pub fn from(&self) -> ShapeId {
        self.key.from
    }

    #[inline]
    pub fn to(&self) -> ShapeId {
        self.key.to
    }

    #[inline]
    pub fn config(&self) -> &ConfigId {
        &self.key.config
    }

    #[inline]
    pub fn copy_mode(&self) -> CopyMode {
        self.copy_mode
    }

    /// Element routine of a collection routine, if elements are converted
    /// through a statically known pair.
    pub fn sub_routine(&self) -> Option<&LazyRoutine> {
        match &self.body {
            RoutineBody::Collection(mapper) => mapper.sub_routine(),
            RoutineBody::Program(_) | RoutineBody::Unresolved => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.body, RoutineBody::Collection(_))
    }

    /// Convert `source`, reusing `destination` where the routine allows it.
    /// `state` is passed untouched to custom converters.
    pub fn invoke(
        &self,
        source: &Value,
        destination: Option<&Value>,
        state: &Value,
    ) -> Result<Value, ConversionError> {
        let none = Value::Null;
        let destination = destination.unwrap_or(&none);
        ensure_sufficient_stack(|| match &self.body {
            RoutineBody::Program(program) => program.run(source, destination, state),
            RoutineBody::Collection(mapper) => mapper.convert(source, destination, state),
            RoutineBody::Unresolved => Ok(Value::Null),
        })
    }

    /// Convert `source` into a fresh destination.
    pub fn map(&self, source: &Value) -> Result<Value, ConversionError> {
        self.invoke(source, None, &Value::Null)
    }
}

impl fmt::Debug for CompiledRoutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = match self.body {
            RoutineBody::Program(_) => "program",
            RoutineBody::Collection(_) => "collection",
            RoutineBody::Unresolved => "unresolved",
        };
        f.debug_struct("CompiledRoutine")
            .field("from", &self.key.from)
            .field("to", &self.key.to)
            .field("config", &self.key.config)
            .field("copy_mode", &self.copy_mode)
            .field("body", &body)
            .finish()
    }
}

/// Link to the routine for `(from, to)` under the linking routine's
/// configuration, resolved through the registry on first use.
///
/// Holds the routine weakly; the registry owns it.
pub struct LazyRoutine {
    from: ShapeId,
    to: ShapeId,
    linker: Linker,
    resolved: OnceLock<Weak<CompiledRoutine>>,
}

impl LazyRoutine {
    pub(crate) fn new(linker: Linker, from: ShapeId, to: ShapeId) -> Self {
        LazyRoutine {
            from,
            to,
            linker,
            resolved: OnceLock::new(),
        }
    }

    #[inline]
    pub fn from(&self) -> ShapeId {
        self.from
    }

    #[inline]
    pub fn to(&self) -> ShapeId {
        self.to
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    pub fn resolve(&self) -> Result<Arc<CompiledRoutine>, ConversionError> {
        if let Some(routine) = self.resolved.get().and_then(Weak::upgrade) {
            return Ok(routine);
        }
        let routine = self.linker.resolve(self.from, self.to)?;
        self.resolved.get_or_init(|| Arc::downgrade(&routine));
        Ok(routine)
    }
}

impl fmt::Debug for LazyRoutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyRoutine")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
