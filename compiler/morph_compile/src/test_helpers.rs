//! Shared fixtures for compiler, lowering, collection and registry tests.
//! Only compiled in test builds.

use std::sync::Arc;

use morph_types::{RecordBuilder, ShapeId, ShapePool};
use morph_value::{ObjectRef, SeqRef, StructValue, Value};

use crate::{MappingConfig, RoutineRegistry};

/// A pool with the shapes most tests need.
pub(crate) struct Shapes {
    pub pool: Arc<ShapePool>,
    /// `Point { x: int, y: int }`
    pub point: ShapeId,
    /// `PointDto { x: float, y: str, z: int }`
    pub point_dto: ShapeId,
    /// Value type `Vec2 { x: float, y: float }`
    pub vec2: ShapeId,
    /// `Person { name: str, home: Point, spot: Vec2, tags: List<str> }`
    pub person: ShapeId,
    /// `Node { value: int, next: Node, children: List<Node> }`
    pub node: ShapeId,
    /// `Handle { id: int }` without a default constructor.
    pub handle: ShapeId,
}

pub(crate) fn shapes() -> Shapes {
    let pool = ShapePool::new();
    let point = pool
        .register(
            RecordBuilder::new("Point")
                .member("x", ShapeId::INT)
                .member("y", ShapeId::INT)
                .build(),
        )
        .unwrap();
    let point_dto = pool
        .register(
            RecordBuilder::new("PointDto")
                .member("x", ShapeId::FLOAT)
                .member("y", ShapeId::STR)
                .member("z", ShapeId::INT)
                .build(),
        )
        .unwrap();
    let vec2 = pool
        .register(
            RecordBuilder::new("Vec2")
                .member("x", ShapeId::FLOAT)
                .member("y", ShapeId::FLOAT)
                .value_type()
                .build(),
        )
        .unwrap();
    let tags = pool.list_of(ShapeId::STR).unwrap();
    let person = pool
        .register(
            RecordBuilder::new("Person")
                .member("name", ShapeId::STR)
                .member("home", point)
                .member("spot", vec2)
                .member("tags", tags)
                .build(),
        )
        .unwrap();

    let node = pool.declare("Node");
    let children = pool.list_of(node).unwrap();
    pool.define(
        node,
        RecordBuilder::new("Node")
            .member("value", ShapeId::INT)
            .member("next", node)
            .member("children", children)
            .build(),
    )
    .unwrap();

    let handle = pool
        .register(
            RecordBuilder::new("Handle")
                .member("id", ShapeId::INT)
                .without_default_constructor()
                .build(),
        )
        .unwrap();

    Shapes {
        pool: Arc::new(pool),
        point,
        point_dto,
        vec2,
        person,
        node,
        handle,
    }
}

pub(crate) fn registry(shapes: &Shapes) -> RoutineRegistry {
    RoutineRegistry::new(Arc::clone(&shapes.pool))
}

pub(crate) fn deep() -> Arc<MappingConfig> {
    Arc::new(MappingConfig::new("deep"))
}

pub(crate) fn shallow() -> Arc<MappingConfig> {
    Arc::new(MappingConfig::new("shallow").shallow())
}

pub(crate) fn point(shapes: &Shapes, x: i64, y: i64) -> Value {
    Value::Object(ObjectRef::new(shapes.point, vec![Value::Int(x), Value::Int(y)]))
}

pub(crate) fn vec2(shapes: &Shapes, x: f64, y: f64) -> Value {
    Value::Struct(StructValue::new(shapes.vec2, vec![Value::Float(x), Value::Float(y)]))
}

pub(crate) fn seq(shape: ShapeId, items: Vec<Value>) -> Value {
    Value::Seq(SeqRef::new(shape, items))
}
