//! Transformation compiler.
//!
//! Turns a `(source shape, destination shape)` pair under a
//! [`MappingConfig`] into a [`RoutinePlan`]: an IR [`Program`] for records
//! and primitives, a [`CollectionPlan`] for collection destinations, or
//! [`RoutinePlan::Unresolved`] when the destination collection kind cannot
//! be built.
//!
//! Compilation never resolves other routines. Member and element
//! conversions are named by shape pair (`InvokeRoutine`) and bound lazily
//! when the routine is lowered.

use morph_ir::{Argument, Conversion, IrBuilder, Node, Program};
use morph_types::{ShapeDescriptor, ShapeId, ShapeKind, ShapePool};

use crate::collection::{plan_collection, CollectionPlan};
use crate::config::{CopyMode, MappingConfig};
use crate::construct::Construction;
use crate::convert::can_convert;
use crate::CompileError;

/// Compiled form of one routine before lowering.
#[derive(Clone, Debug, PartialEq)]
pub enum RoutinePlan {
    Program(Program),
    Collection(CollectionPlan),
    /// The destination is a collection the engine cannot build; every
    /// conversion yields null.
    Unresolved,
}

/// Compiles routines against one pool and configuration.
pub struct Compiler<'a> {
    pool: &'a ShapePool,
    config: &'a MappingConfig,
}

impl<'a> Compiler<'a> {
    pub fn new(pool: &'a ShapePool, config: &'a MappingConfig) -> Self {
        Compiler { pool, config }
    }

    /// Compile the routine converting `from` into `to`.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(from = %self.pool.name_of(from), to = %self.pool.name_of(to), config = %self.config.id())
    )]
    pub fn compile(&self, from: ShapeId, to: ShapeId) -> Result<RoutinePlan, CompileError> {
        if let Some(plan) = self.custom_plan(from, to) {
            return Ok(plan);
        }
        let from = self.pool.strip_nullable(from)?;
        let to = self.pool.strip_nullable(to)?;
        if let Some(plan) = self.custom_plan(from, to) {
            return Ok(plan);
        }

        let src = self.pool.get(from)?;
        let dst = self.pool.get(to)?;

        if dst.is_collection() {
            let plan = plan_collection(self.pool, self.config, from, &src, to, &dst)?;
            return Ok(match plan {
                Some(plan) => RoutinePlan::Collection(plan),
                None => {
                    tracing::debug!(to = %dst.name, "unresolvable collection destination");
                    RoutinePlan::Unresolved
                }
            });
        }

        let program = match (src.kind, dst.kind) {
            (_, ShapeKind::Any) => self.any_program(from),
            (ShapeKind::Any, _) => {
                // Dispatch on the runtime shape of the source.
                argument_program(|source, destination| {
                    Node::invoke(ShapeId::ANY, to, source, destination)
                })
            }
            (ShapeKind::Primitive(a), ShapeKind::Primitive(b)) if a == b => {
                argument_program(|source, _| source)
            }
            (ShapeKind::Primitive(a), ShapeKind::Primitive(b)) => {
                if !can_convert(a, b) {
                    return Err(self.no_conversion(from, to));
                }
                argument_program(|source, _| {
                    Node::convert(Conversion::Primitive { from: a, to: b }, source)
                })
            }
            (_, ShapeKind::Primitive(_)) => return Err(self.no_conversion(from, to)),
            _ => self.record_program(from, &src, to, &dst)?,
        };
        Ok(RoutinePlan::Program(program))
    }

    /// A registered converter replaces the generated routine.
    fn custom_plan(&self, from: ShapeId, to: ShapeId) -> Option<RoutinePlan> {
        let id = self.config.converter_for(from, to)?;
        Some(RoutinePlan::Program(argument_program(|source, _| {
            Node::convert(Conversion::Custom(id), source)
        })))
    }

    /// Destination shape `any`: shallow copies pass the source through,
    /// deep copies convert it to a copy of its own shape.
    fn any_program(&self, from: ShapeId) -> Program {
        match self.config.copy_mode() {
            CopyMode::Shallow => argument_program(|source, _| source),
            CopyMode::Deep if from == ShapeId::ANY => argument_program(|source, _| {
                Node::invoke(ShapeId::ANY, ShapeId::ANY, source, Node::Null)
            }),
            CopyMode::Deep => argument_program(|source, _| Node::invoke(from, from, source, Node::Null)),
        }
    }

    /// Record destination: reuse or construct the destination, then write
    /// each corresponding member.
    fn record_program(
        &self,
        from: ShapeId,
        src: &ShapeDescriptor,
        to: ShapeId,
        dst: &ShapeDescriptor,
    ) -> Result<Program, CompileError> {
        let mut builder = IrBuilder::new();
        let (src_local, src_decl) = builder.declare_local(from);
        let (dst_local, dst_decl) = builder.declare_local(to);
        let construct = Construction::for_shape(dst).emit(&mut builder, to);

        let mut writes = Vec::new();
        for pair in self.config.rules().match_members(src, dst) {
            let (Some(src_member), Some(dst_member)) =
                (src.members.get(pair.source), dst.members.get(pair.destination))
            else {
                continue;
            };
            let read = Node::read_member(Node::ReadLocal(src_local), from, member_index(pair.source));
            let current = Node::read_member(Node::ReadLocal(dst_local), to, member_index(pair.destination));
            let value = self.member_value(read, src_member.shape, dst_member.shape, current)?;
            writes.push(Node::write_member(dst_local, member_index(pair.destination), value));
        }

        let result = if dst.is_value_type() {
            Node::box_value(Node::ReadLocal(dst_local))
        } else {
            Node::ReadLocal(dst_local)
        };
        writes.push(Node::ret(result));

        let body = Node::Sequence(vec![
            src_decl,
            Node::write_local(src_local, Node::unbox(Node::ReadArgument(Argument::Source))),
            dst_decl,
            Node::write_local(
                dst_local,
                Node::unbox(Node::coalesce(Node::ReadArgument(Argument::Destination), construct)),
            ),
            Node::if_not_null(Node::ReadLocal(dst_local), Node::Sequence(writes)),
            // No destination could be produced.
            Node::ret(Node::Null),
        ]);
        Ok(builder.finish(Node::if_not_null(Node::ReadArgument(Argument::Source), body)))
    }

    /// Expression converting one member value.
    fn member_value(
        &self,
        read: Node,
        from: ShapeId,
        to: ShapeId,
        current: Node,
    ) -> Result<Node, CompileError> {
        if let Some(id) = self.config.converter_for(from, to) {
            return Ok(Node::convert(Conversion::Custom(id), read));
        }
        let from = self.pool.strip_nullable(from)?;
        let to = self.pool.strip_nullable(to)?;
        if let Some(id) = self.config.converter_for(from, to) {
            return Ok(Node::convert(Conversion::Custom(id), read));
        }

        let src = self.pool.get(from)?;
        let dst = self.pool.get(to)?;
        let shallow = self.config.copy_mode() == CopyMode::Shallow;

        let node = match (src.kind, dst.kind) {
            (ShapeKind::Primitive(a), ShapeKind::Primitive(b)) if a == b => read,
            (ShapeKind::Primitive(a), ShapeKind::Primitive(b)) => {
                if !can_convert(a, b) {
                    return Err(self.no_conversion(from, to));
                }
                Node::convert(Conversion::Primitive { from: a, to: b }, read)
            }
            (ShapeKind::Any, ShapeKind::Primitive(_)) => Node::unbox(Node::invoke(ShapeId::ANY, to, read, Node::Null)),
            (_, ShapeKind::Primitive(_)) => return Err(self.no_conversion(from, to)),
            _ if shallow && (from == to || to == ShapeId::ANY) => read,
            (_, ShapeKind::Any) => Node::invoke(from, from, read, Node::Null),
            _ => {
                let invoke = Node::invoke(from, to, read, current);
                if dst.is_value_type() {
                    Node::unbox(invoke)
                } else {
                    invoke
                }
            }
        };
        Ok(node)
    }

    fn no_conversion(&self, from: ShapeId, to: ShapeId) -> CompileError {
        CompileError::NoConversion {
            from: self.pool.name_of(from),
            to: self.pool.name_of(to),
        }
    }
}

/// Program returning `f(source, destination)` over the routine arguments.
fn argument_program(f: impl FnOnce(Node, Node) -> Node) -> Program {
    let body = f(
        Node::ReadArgument(Argument::Source),
        Node::ReadArgument(Argument::Destination),
    );
    IrBuilder::new().finish(Node::ret(body))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "member count never approaches u32::MAX"
)]
fn member_index(index: usize) -> u32 {
    index as u32
}
