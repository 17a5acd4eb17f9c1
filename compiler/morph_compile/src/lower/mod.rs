//! Lowering: IR programs to executable closures.
//!
//! Each node becomes a boxed closure over a [`Frame`]. A closure yields
//! `ControlFlow::Continue(value)` for the node's value or
//! `ControlFlow::Break(value)` once a `Return` has run, which unwinds the
//! enclosing sequences.
//!
//! Programs are validated before lowering. A program that fails validation
//! is a compiler bug, not a user error, and lowering panics with the defect.

use std::ops::ControlFlow;
use std::sync::Arc;

use morph_ir::{Argument, Conversion, Node, Program};
use morph_types::{ShapeId, ShapePool};
use morph_value::{zero_value, InstanceTemplate, Value};

use crate::collection::CollectionMapper;
use crate::compiler::RoutinePlan;
use crate::convert::convert_primitive;
use crate::registry::Linker;
use crate::routine::RoutineBody;
use crate::{CompileError, ConversionError};

type Flow = Result<ControlFlow<Value, Value>, ConversionError>;
type Step = Box<dyn Fn(&mut Frame<'_>) -> Flow + Send + Sync>;

/// Box a closure as a [`Step`], fixing its signature.
fn op(f: impl Fn(&mut Frame<'_>) -> Flow + Send + Sync + 'static) -> Step {
    Box::new(f)
}

/// Evaluate a step, propagating an early return.
macro_rules! eval {
    ($step:expr, $frame:expr) => {
        match ($step)($frame)? {
            ControlFlow::Continue(value) => value,
            ControlFlow::Break(value) => return Ok(ControlFlow::Break(value)),
        }
    };
}

/// Per-invocation state: the three routine arguments and the local slots.
pub(crate) struct Frame<'a> {
    source: &'a Value,
    destination: &'a Value,
    state: &'a Value,
    locals: Vec<Value>,
}

/// A lowered, executable program.
pub(crate) struct LoweredProgram {
    step: Step,
    local_count: usize,
}

impl LoweredProgram {
    pub(crate) fn run(&self, source: &Value, destination: &Value, state: &Value) -> Result<Value, ConversionError> {
        let mut frame = Frame {
            source,
            destination,
            state,
            locals: vec![Value::Null; self.local_count],
        };
        match (self.step)(&mut frame)? {
            ControlFlow::Continue(value) | ControlFlow::Break(value) => Ok(value),
        }
    }
}

/// Lower a compiled plan into a routine body.
pub(crate) fn lower_plan(plan: RoutinePlan, pool: &ShapePool, linker: &Linker) -> Result<RoutineBody, CompileError> {
    Ok(match plan {
        RoutinePlan::Program(program) => RoutineBody::Program(lower_program(&program, pool, linker)?),
        RoutinePlan::Collection(mut plan) => {
            let construct = match plan.construct.take() {
                Some(program) => Some(lower_program(&program, pool, linker)?),
                None => None,
            };
            RoutineBody::Collection(CollectionMapper::bind(plan, construct, linker))
        }
        RoutinePlan::Unresolved => RoutineBody::Unresolved,
    })
}

pub(crate) fn lower_program(program: &Program, pool: &ShapePool, linker: &Linker) -> Result<LoweredProgram, CompileError> {
    if let Err(defect) = program.validate() {
        panic!("malformed routine IR: {defect}\n{program}");
    }
    tracing::trace!(ir = %program, "lowering routine");

    let lowerer = Lowerer { pool, linker };
    Ok(LoweredProgram {
        step: lowerer.lower(program.body())?,
        local_count: program.locals().len(),
    })
}

struct Lowerer<'a> {
    pool: &'a ShapePool,
    linker: &'a Linker,
}

impl Lowerer<'_> {
    fn lower(&self, node: &Node) -> Result<Step, CompileError> {
        let step: Step = match node {
            Node::ReadArgument(argument) => {
                let argument = *argument;
                op(move |frame| {
                    let value = match argument {
                        Argument::Source => frame.source,
                        Argument::Destination => frame.destination,
                        Argument::State => frame.state,
                    };
                    Ok(ControlFlow::Continue(value.clone()))
                })
            }

            Node::ReadLocal(local) => {
                let index = local.index();
                op(move |frame| Ok(ControlFlow::Continue(frame.locals[index].clone())))
            }

            Node::WriteLocal { local, value } => {
                let index = local.index();
                let value = self.lower(value)?;
                op(move |frame| {
                    frame.locals[index] = eval!(value, frame);
                    Ok(ControlFlow::Continue(Value::Null))
                })
            }

            Node::DeclareLocal { local, shape } => {
                let index = local.index();
                let zero = zero_value(self.pool, *shape)?;
                op(move |frame| {
                    frame.locals[index] = zero.clone();
                    Ok(ControlFlow::Continue(Value::Null))
                })
            }

            Node::NewInstance(shape) => {
                let template = InstanceTemplate::new(self.pool, *shape)?;
                op(move |_| Ok(ControlFlow::Continue(template.instantiate())))
            }

            Node::Box(value) => {
                let value = self.lower(value)?;
                op(move |frame| Ok(ControlFlow::Continue(eval!(value, frame).boxed())))
            }

            Node::Unbox(value) => {
                let value = self.lower(value)?;
                op(move |frame| Ok(ControlFlow::Continue(eval!(value, frame).unboxed())))
            }

            Node::Return(value) => {
                let value = self.lower(value)?;
                op(move |frame| Ok(ControlFlow::Break(eval!(value, frame))))
            }

            Node::Sequence(children) => {
                let steps = children
                    .iter()
                    .map(|child| self.lower(child))
                    .collect::<Result<Vec<_>, _>>()?;
                op(move |frame| {
                    let mut last = Value::Null;
                    for step in &steps {
                        last = eval!(step, frame);
                    }
                    Ok(ControlFlow::Continue(last))
                })
            }

            Node::InvokeRoutine {
                from,
                to,
                source,
                destination,
            } => self.lower_invoke(*from, *to, source, destination)?,

            Node::Null => op(|_| Ok(ControlFlow::Continue(Value::Null))),

            Node::ReadMember {
                object,
                shape,
                member,
            } => {
                let object = self.lower(object)?;
                let shape = *shape;
                let index = *member as usize;
                op(move |frame| {
                    let object = eval!(object, frame);
                    let Some(found) = object.runtime_shape() else {
                        return Ok(ControlFlow::Continue(Value::Null));
                    };
                    if found != shape {
                        return Err(ConversionError::ShapeMismatch {
                            expected: shape,
                            found,
                        });
                    }
                    Ok(ControlFlow::Continue(object.member(index).unwrap_or(Value::Null)))
                })
            }

            Node::WriteMember {
                local,
                member,
                value,
            } => {
                let slot = local.index();
                let index = *member as usize;
                let value = self.lower(value)?;
                op(move |frame| {
                    let value = eval!(value, frame);
                    write_member(&mut frame.locals[slot], index, value);
                    Ok(ControlFlow::Continue(Value::Null))
                })
            }

            Node::Coalesce { value, fallback } => {
                let value = self.lower(value)?;
                let fallback = self.lower(fallback)?;
                op(move |frame| {
                    let first = eval!(value, frame);
                    if !first.is_null() {
                        return Ok(ControlFlow::Continue(first));
                    }
                    Ok(ControlFlow::Continue(eval!(fallback, frame)))
                })
            }

            Node::IfNotNull { test, then } => {
                let test = self.lower(test)?;
                let then = self.lower(then)?;
                op(move |frame| {
                    if eval!(test, frame).is_null() {
                        return Ok(ControlFlow::Continue(Value::Null));
                    }
                    Ok(ControlFlow::Continue(eval!(then, frame)))
                })
            }

            Node::Convert { conversion, value } => self.lower_convert(*conversion, value)?,
        };
        Ok(step)
    }

    fn lower_invoke(
        &self,
        from: ShapeId,
        to: ShapeId,
        source: &Node,
        destination: &Node,
    ) -> Result<Step, CompileError> {
        let source = self.lower(source)?;
        let destination = self.lower(destination)?;

        if from == ShapeId::ANY {
            let linker = self.linker.clone();
            return Ok(op(move |frame| {
                let source = eval!(source, frame);
                let Some(shape) = source.runtime_shape() else {
                    return Ok(ControlFlow::Continue(Value::Null));
                };
                let destination = eval!(destination, frame);
                let to = if to == ShapeId::ANY { shape } else { to };
                let routine = linker.resolve(shape, to)?;
                let value = routine.invoke(&source, Some(&destination), frame.state)?;
                Ok(ControlFlow::Continue(value))
            }));
        }

        let link = self.linker.link(from, to);
        Ok(op(move |frame| {
            let source = eval!(source, frame);
            if source.is_null() {
                return Ok(ControlFlow::Continue(Value::Null));
            }
            let destination = eval!(destination, frame);
            let value = link.resolve()?.invoke(&source, Some(&destination), frame.state)?;
            Ok(ControlFlow::Continue(value))
        }))
    }

    fn lower_convert(&self, conversion: Conversion, value: &Node) -> Result<Step, CompileError> {
        let value = self.lower(value)?;
        let step: Step = match conversion {
            Conversion::Primitive { to, .. } => op(move |frame| {
                let value = eval!(value, frame);
                Ok(ControlFlow::Continue(convert_primitive(&value, to)?))
            }),
            Conversion::Custom(id) => {
                let Some(func) = self.linker.config().converter(id).cloned() else {
                    panic!("malformed routine IR: unknown converter {}", id.index());
                };
                op(move |frame| {
                    let value = eval!(value, frame);
                    if value.is_null() {
                        return Ok(ControlFlow::Continue(Value::Null));
                    }
                    Ok(ControlFlow::Continue(func(&value, frame.state)?))
                })
            }
        };
        Ok(step)
    }
}

/// Store `value` into member `index` of the record held in `slot`.
fn write_member(slot: &mut Value, index: usize, value: Value) {
    match slot {
        Value::Object(object) => {
            object.set(index, value);
        }
        Value::Struct(record) => {
            record.set(index, value);
        }
        Value::Boxed(inner) => write_member(Arc::make_mut(inner), index, value),
        _ => {}
    }
}
