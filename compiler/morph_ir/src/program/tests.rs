use super::*;
use crate::{Argument, Conversion};
use morph_types::PrimitiveKind;
use pretty_assertions::assert_eq;

const POINT: ShapeId = ShapeId::from_raw(7);

#[test]
fn builder_allocates_sequential_locals() {
    let mut builder = IrBuilder::new();
    let (a, decl_a) = builder.declare_local(POINT);
    let (b, _) = builder.declare_local(ShapeId::INT);
    assert_eq!(a, LocalId::new(0));
    assert_eq!(b, LocalId::new(1));
    assert_eq!(builder.local_count(), 2);
    assert_eq!(
        decl_a,
        Node::DeclareLocal {
            local: a,
            shape: POINT
        }
    );
}

#[test]
fn declare_then_write_then_read_is_valid() {
    let mut builder = IrBuilder::new();
    let (local, decl) = builder.declare_local(POINT);
    let program = builder.finish(Node::Sequence(vec![
        decl,
        Node::write_local(local, Node::ReadArgument(Argument::Source)),
        Node::ret(Node::box_value(Node::ReadLocal(local))),
    ]));
    assert_eq!(program.validate(), Ok(()));
    assert_eq!(program.locals(), &[POINT]);
    assert_eq!(program.local_shape(local), Some(POINT));
}

fn unchecked(locals: Vec<ShapeId>, body: Node) -> Program {
    Program { locals, body }
}

#[test]
fn read_before_declare_is_a_defect() {
    let l0 = LocalId::new(0);
    let program = unchecked(
        vec![POINT],
        Node::Sequence(vec![
            Node::ReadLocal(l0),
            Node::DeclareLocal {
                local: l0,
                shape: POINT,
            },
        ]),
    );
    assert_eq!(program.validate(), Err(IrDefect::UndeclaredLocal(l0)));
}

#[test]
fn write_value_is_evaluated_before_the_target() {
    // The value reads the local being declared later in the same write.
    let l0 = LocalId::new(0);
    let program = unchecked(
        vec![POINT],
        Node::write_local(
            l0,
            Node::Sequence(vec![Node::DeclareLocal {
                local: l0,
                shape: POINT,
            }]),
        ),
    );
    assert_eq!(program.validate(), Ok(()));
}

#[test]
fn double_declaration_is_a_defect() {
    let l0 = LocalId::new(0);
    let decl = Node::DeclareLocal {
        local: l0,
        shape: POINT,
    };
    let program = unchecked(vec![POINT], Node::Sequence(vec![decl.clone(), decl]));
    assert_eq!(program.validate(), Err(IrDefect::Redeclared(l0)));
}

#[test]
fn out_of_range_local_is_a_defect() {
    let program = unchecked(vec![], Node::ReadLocal(LocalId::new(3)));
    assert_eq!(
        program.validate(),
        Err(IrDefect::OutOfRange {
            local: LocalId::new(3),
            count: 0
        })
    );
}

#[test]
fn declared_shape_must_match_allocation() {
    let l0 = LocalId::new(0);
    let program = unchecked(
        vec![POINT],
        Node::DeclareLocal {
            local: l0,
            shape: ShapeId::INT,
        },
    );
    assert!(matches!(
        program.validate(),
        Err(IrDefect::ShapeMismatch { .. })
    ));
}

#[test]
fn branch_declarations_do_not_leak() {
    let l0 = LocalId::new(0);
    let program = unchecked(
        vec![POINT],
        Node::Sequence(vec![
            Node::if_not_null(
                Node::ReadArgument(Argument::Source),
                Node::DeclareLocal {
                    local: l0,
                    shape: POINT,
                },
            ),
            Node::ReadLocal(l0),
        ]),
    );
    assert_eq!(program.validate(), Err(IrDefect::UndeclaredLocal(l0)));
}

#[test]
fn outer_declarations_are_visible_in_branches() {
    let mut builder = IrBuilder::new();
    let (local, decl) = builder.declare_local(POINT);
    let program = builder.finish(Node::Sequence(vec![
        decl,
        Node::coalesce(
            Node::ReadArgument(Argument::Destination),
            Node::ReadLocal(local),
        ),
    ]));
    assert_eq!(program.validate(), Ok(()));
}

#[test]
fn node_size_counts_every_node() {
    let node = Node::Sequence(vec![
        Node::Null,
        Node::ret(Node::convert(
            Conversion::Primitive {
                from: PrimitiveKind::Int,
                to: PrimitiveKind::Str,
            },
            Node::ReadArgument(Argument::Source),
        )),
    ]);
    assert_eq!(node.size(), 5);
}

#[test]
fn display_dumps_program() {
    let mut builder = IrBuilder::new();
    let (local, decl) = builder.declare_local(POINT);
    let program = builder.finish(Node::Sequence(vec![
        decl,
        Node::write_local(local, Node::unbox(Node::ReadArgument(Argument::Source))),
        Node::write_member(
            local,
            1,
            Node::invoke(
                ShapeId::ANY,
                ShapeId::ANY,
                Node::read_member(Node::ReadArgument(Argument::Source), POINT, 0),
                Node::Null,
            ),
        ),
        Node::ret(Node::ReadLocal(local)),
    ]));
    let expected = "\
locals: l0: #7
(seq
  (declare l0 #7)
  (write l0 (unbox (arg source)))
  (set l0.1 (invoke #5->#5 (member #7.0 (arg source)) null))
  (return (read l0)))";
    assert_eq!(program.to_string(), expected);
}
