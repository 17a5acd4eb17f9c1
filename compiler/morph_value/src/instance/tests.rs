use super::*;
use morph_types::RecordBuilder;
use pretty_assertions::assert_eq;

fn pool_with_shapes() -> (ShapePool, ShapeId, ShapeId) {
    let pool = ShapePool::new();
    let vec2 = pool
        .register(
            RecordBuilder::new("Vec2")
                .member("x", ShapeId::FLOAT)
                .member("y", ShapeId::FLOAT)
                .value_type()
                .build(),
        )
        .unwrap();
    let body = pool
        .register(
            RecordBuilder::new("Body")
                .member("name", ShapeId::STR)
                .member("position", vec2)
                .member("mass", ShapeId::INT)
                .build(),
        )
        .unwrap();
    (pool, vec2, body)
}

#[test]
fn primitive_zero_values() {
    let pool = ShapePool::new();
    assert_eq!(zero_value(&pool, ShapeId::INT).unwrap(), Value::Int(0));
    assert_eq!(zero_value(&pool, ShapeId::BOOL).unwrap(), Value::Bool(false));
    assert_eq!(zero_value(&pool, ShapeId::FLOAT).unwrap(), Value::Float(0.0));
    assert_eq!(zero_value(&pool, ShapeId::CHAR).unwrap(), Value::Char('\0'));
    assert_eq!(zero_value(&pool, ShapeId::STR).unwrap(), Value::Null);
}

#[test]
fn value_record_zero_value() {
    let (pool, vec2, _) = pool_with_shapes();
    assert_eq!(
        zero_value(&pool, vec2).unwrap(),
        Value::Struct(StructValue::new(
            vec2,
            vec![Value::Float(0.0), Value::Float(0.0)]
        ))
    );
}

#[test]
fn reference_record_instances_are_fresh() {
    let (pool, vec2, body) = pool_with_shapes();
    let template = InstanceTemplate::new(&pool, body).unwrap();
    assert!(template.is_constructible());

    let a = template.instantiate();
    let b = template.instantiate();
    assert!(!a.same_instance(&b));
    assert_eq!(
        a.as_object().unwrap().fields(),
        vec![
            Value::Null,
            Value::Struct(StructValue::new(
                vec2,
                vec![Value::Float(0.0), Value::Float(0.0)]
            )),
            Value::Int(0),
        ]
    );
}

#[test]
fn shapes_without_constructor_are_absent() {
    let pool = ShapePool::new();
    let locked = pool
        .register(
            RecordBuilder::new("Locked")
                .member("id", ShapeId::INT)
                .without_default_constructor()
                .build(),
        )
        .unwrap();
    let template = InstanceTemplate::new(&pool, locked).unwrap();
    assert!(!template.is_constructible());
    assert!(template.instantiate().is_null());
}

#[test]
fn collections_instantiate_empty() {
    let pool = ShapePool::new();
    let list = pool.list_of(ShapeId::INT).unwrap();
    let value = InstanceTemplate::new(&pool, list).unwrap().instantiate();
    let seq = value.as_seq().unwrap();
    assert!(seq.is_empty());
    assert_eq!(seq.shape(), list);
}
