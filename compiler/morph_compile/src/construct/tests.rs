use morph_ir::{IrBuilder, Node};
use morph_types::{CollectionFamily, RecordBuilder, ShapeId, ShapePool};
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn strategy_by_shape() {
    let pool = ShapePool::new();
    let vec2 = pool
        .register(RecordBuilder::new("Vec2").member("x", ShapeId::FLOAT).value_type().build())
        .unwrap();
    let person = pool
        .register(RecordBuilder::new("Person").member("name", ShapeId::STR).build())
        .unwrap();
    let handle = pool
        .register(RecordBuilder::new("Handle").without_default_constructor().build())
        .unwrap();

    let strategy = |id| Construction::for_shape(&pool.get(id).unwrap());
    assert_eq!(strategy(ShapeId::INT), Construction::ValueDefault);
    assert_eq!(strategy(vec2), Construction::ValueDefault);
    assert_eq!(strategy(person), Construction::DefaultConstructor);
    assert_eq!(strategy(ShapeId::UNTYPED_LIST), Construction::DefaultConstructor);
    assert_eq!(strategy(handle), Construction::Impossible);
    assert_eq!(strategy(ShapeId::STR), Construction::Impossible);
    assert_eq!(strategy(ShapeId::ANY), Construction::Impossible);
}

#[test]
fn value_type_program_declares_and_boxes() {
    let pool = ShapePool::new();
    let program = create_instance_program(&pool, ShapeId::INT).unwrap();

    let mut builder = IrBuilder::new();
    let (local, declare) = builder.declare_local(ShapeId::INT);
    let expected = builder.finish(Node::ret(Node::Sequence(vec![
        declare,
        Node::box_value(Node::ReadLocal(local)),
    ])));
    assert_eq!(program, expected);
    assert!(program.validate().is_ok());
}

#[test]
fn reference_and_impossible_programs() {
    let pool = ShapePool::new();
    let bag = pool.insertable("Bag", Some(ShapeId::INT)).unwrap();
    let stream = pool.opaque("Stream<int>", Some(ShapeId::INT)).unwrap();

    assert_eq!(
        create_instance_program(&pool, bag).unwrap().body(),
        &Node::ret(Node::NewInstance(bag))
    );
    assert_eq!(
        create_instance_program(&pool, stream).unwrap().body(),
        &Node::ret(Node::Null)
    );
    assert!(matches!(
        pool.get(stream).unwrap().collection_family(),
        Some(CollectionFamily::Opaque)
    ));
}

#[test]
fn nullable_constructs_underlying_shape() {
    let pool = ShapePool::new();
    let person = pool
        .register(RecordBuilder::new("Person").member("name", ShapeId::STR).build())
        .unwrap();
    let maybe = pool.nullable(person).unwrap();

    let program = create_instance_program(&pool, maybe).unwrap();
    assert_eq!(program.body(), &Node::ret(Node::NewInstance(person)));
}
