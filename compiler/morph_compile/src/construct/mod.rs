//! Instance-construction strategy.
//!
//! Decides how a destination instance of a shape comes into existence when
//! none is supplied, and emits the IR that does it.

use morph_ir::{IrBuilder, Node, Program};
use morph_types::{ShapeDescriptor, ShapeId, ShapePool};

use crate::CompileError;

/// How an instance of a shape is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Construction {
    /// Value type: a local holding the zero value, boxed.
    ValueDefault,
    /// Reference type with a parameterless constructor.
    DefaultConstructor,
    /// No instance can be produced; the result is null.
    Impossible,
}

impl Construction {
    /// Strategy for a descriptor whose nullable wrapper is already stripped.
    pub fn for_shape(descriptor: &ShapeDescriptor) -> Self {
        if descriptor.is_value_type() {
            Construction::ValueDefault
        } else if descriptor.has_default_constructor() {
            Construction::DefaultConstructor
        } else {
            Construction::Impossible
        }
    }

    /// Expression producing the instance in reference form.
    pub fn emit(self, builder: &mut IrBuilder, shape: ShapeId) -> Node {
        match self {
            Construction::ValueDefault => {
                let (local, declare) = builder.declare_local(shape);
                Node::Sequence(vec![declare, Node::box_value(Node::ReadLocal(local))])
            }
            Construction::DefaultConstructor => Node::NewInstance(shape),
            Construction::Impossible => Node::Null,
        }
    }
}

/// Stand-alone program returning a fresh instance of `shape`, or null when
/// none can be built. A nullable shape constructs its underlying shape.
pub fn create_instance_program(pool: &ShapePool, shape: ShapeId) -> Result<Program, CompileError> {
    let shape = pool.strip_nullable(shape)?;
    let descriptor = pool.get(shape)?;
    let mut builder = IrBuilder::new();
    let instance = Construction::for_shape(&descriptor).emit(&mut builder, shape);
    Ok(builder.finish(Node::ret(instance)))
}

#[cfg(test)]
mod tests;
