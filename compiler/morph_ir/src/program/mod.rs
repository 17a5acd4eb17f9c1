//! Programs, the IR builder, and IR validation.

use thiserror::Error;

use morph_types::ShapeId;

use crate::{LocalId, Node};

/// A malformed program. Always a bug in whatever emitted the IR.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IrDefect {
    #[error("local {0} is used before it is declared")]
    UndeclaredLocal(LocalId),

    #[error("local {0} is declared twice")]
    Redeclared(LocalId),

    #[error("local {local} is out of range ({count} locals allocated)")]
    OutOfRange { local: LocalId, count: usize },

    #[error("local {local} is declared as {declared:?} but was allocated as {allocated:?}")]
    ShapeMismatch {
        local: LocalId,
        declared: ShapeId,
        allocated: ShapeId,
    },
}

/// A finished IR tree plus its local table.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    locals: Vec<ShapeId>,
    body: Node,
}

impl Program {
    /// Shapes of all allocated locals, indexed by [`LocalId::index`].
    pub fn locals(&self) -> &[ShapeId] {
        &self.locals
    }

    pub fn body(&self) -> &Node {
        &self.body
    }

    pub fn local_shape(&self, local: LocalId) -> Option<ShapeId> {
        self.locals.get(local.index()).copied()
    }

    /// Check that every local is declared exactly once and before any read
    /// or write, following evaluation order.
    ///
    /// Declarations made inside a conditional branch (`IfNotNull::then`,
    /// `Coalesce::fallback`) are only visible inside that branch.
    pub fn validate(&self) -> Result<(), IrDefect> {
        let mut declared = vec![false; self.locals.len()];
        self.check(&self.body, &mut declared)
    }

    fn check(&self, node: &Node, declared: &mut [bool]) -> Result<(), IrDefect> {
        match node {
            Node::ReadArgument(_) | Node::NewInstance(_) | Node::Null => Ok(()),
            Node::ReadLocal(local) => self.require(*local, declared),
            Node::WriteLocal { local, value } | Node::WriteMember { local, value, .. } => {
                self.check(value, declared)?;
                self.require(*local, declared)
            }
            Node::DeclareLocal { local, shape } => {
                let allocated = self.slot(*local)?;
                if allocated != *shape {
                    return Err(IrDefect::ShapeMismatch {
                        local: *local,
                        declared: *shape,
                        allocated,
                    });
                }
                if declared[local.index()] {
                    return Err(IrDefect::Redeclared(*local));
                }
                declared[local.index()] = true;
                Ok(())
            }
            Node::Box(value)
            | Node::Unbox(value)
            | Node::Return(value)
            | Node::Convert { value, .. }
            | Node::ReadMember { object: value, .. } => self.check(value, declared),
            Node::Sequence(children) => children
                .iter()
                .try_for_each(|child| self.check(child, declared)),
            Node::InvokeRoutine {
                source,
                destination,
                ..
            } => {
                self.check(source, declared)?;
                self.check(destination, declared)
            }
            Node::Coalesce {
                value: first,
                fallback: branch,
            }
            | Node::IfNotNull {
                test: first,
                then: branch,
            } => {
                self.check(first, declared)?;
                let mut scoped = declared.to_vec();
                self.check(branch, &mut scoped)
            }
        }
    }

    fn slot(&self, local: LocalId) -> Result<ShapeId, IrDefect> {
        self.local_shape(local).ok_or(IrDefect::OutOfRange {
            local,
            count: self.locals.len(),
        })
    }

    fn require(&self, local: LocalId, declared: &[bool]) -> Result<(), IrDefect> {
        self.slot(local)?;
        if declared[local.index()] {
            Ok(())
        } else {
            Err(IrDefect::UndeclaredLocal(local))
        }
    }
}

/// Builder for a [`Program`].
///
/// Locals are allocated here and declared in the tree with the
/// `DeclareLocal` node returned alongside their id, so a local cannot be
/// referenced without an allocation backing it.
#[derive(Debug, Default)]
pub struct IrBuilder {
    locals: Vec<ShapeId>,
}

impl IrBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a local of `shape`. Place the returned declaration in the
    /// tree before any use of the id.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "local counts never exceed u32"
    )]
    pub fn declare_local(&mut self, shape: ShapeId) -> (LocalId, Node) {
        let local = LocalId::new(self.locals.len() as u32);
        self.locals.push(shape);
        (local, Node::DeclareLocal { local, shape })
    }

    pub fn local_count(&self) -> usize {
        self.locals.len()
    }

    /// Finish the program. Debug builds validate it immediately.
    pub fn finish(self, body: Node) -> Program {
        let program = Program {
            locals: self.locals,
            body,
        };
        debug_assert!(
            program.validate().is_ok(),
            "malformed IR: {:?}",
            program.validate()
        );
        program
    }
}

#[cfg(test)]
mod tests;
