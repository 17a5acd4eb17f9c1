use super::*;
use crate::{MemberAccess, RecordBuilder};
use pretty_assertions::assert_eq;

fn point(pool: &ShapePool) -> ShapeId {
    pool.register(
        RecordBuilder::new("Point")
            .member("x", ShapeId::INT)
            .member("y", ShapeId::INT)
            .build(),
    )
    .unwrap()
}

#[test]
fn pre_interned_shapes_are_defined() {
    let pool = ShapePool::new();
    assert_eq!(pool.len(), ShapeId::FIRST_DECLARED as usize);

    let int = pool.get(ShapeId::INT).unwrap();
    assert_eq!(int.primitive_kind(), Some(PrimitiveKind::Int));
    assert!(int.is_value_type());

    let s = pool.get(ShapeId::STR).unwrap();
    assert!(!s.is_value_type());
    assert!(!s.has_default_constructor());

    let list = pool.get(ShapeId::UNTYPED_LIST).unwrap();
    assert_eq!(list.collection_family(), Some(CollectionFamily::UntypedList));
    assert_eq!(list.element_shape(), None);
    assert_eq!(pool.lookup("any"), Some(ShapeId::ANY));
}

#[test]
fn register_assigns_first_declared_id() {
    let pool = ShapePool::new();
    let id = point(&pool);
    assert_eq!(id.raw(), ShapeId::FIRST_DECLARED);
    assert_eq!(pool.lookup("Point"), Some(id));
    assert_eq!(pool.name_of(id), "Point");

    let desc = pool.get(id).unwrap();
    assert!(desc.is_record());
    assert_eq!(desc.members.len(), 2);
    assert_eq!(desc.member("y").map(|(i, _)| i), Some(1));
}

#[test]
fn register_is_idempotent_for_identical_descriptors() {
    let pool = ShapePool::new();
    let first = point(&pool);
    let second = point(&pool);
    assert_eq!(first, second);
}

#[test]
fn register_rejects_conflicting_definition() {
    let pool = ShapePool::new();
    let id = point(&pool);
    let err = pool
        .register(RecordBuilder::new("Point").member("z", ShapeId::INT).build())
        .unwrap_err();
    assert_eq!(
        err,
        ShapeError::AlreadyDefined {
            id,
            name: "Point".to_owned()
        }
    );
}

#[test]
fn declared_but_undefined_shape_reports_error() {
    let pool = ShapePool::new();
    let id = pool.declare("Later");
    assert!(matches!(pool.get(id), Err(ShapeError::Undefined { .. })));
}

#[test]
fn unknown_shape_reports_error() {
    let pool = ShapePool::new();
    let bogus = ShapeId::from_raw(999);
    assert_eq!(pool.get(bogus).unwrap_err(), ShapeError::Unknown(bogus));
    assert_eq!(pool.name_of(bogus), "<unknown #999>");
}

#[test]
fn define_checks_declared_name() {
    let pool = ShapePool::new();
    let id = pool.declare("Node");
    let err = pool
        .define(id, RecordBuilder::new("Other").build())
        .unwrap_err();
    assert!(matches!(err, ShapeError::NameMismatch { .. }));
}

#[test]
fn self_referential_shape() {
    let pool = ShapePool::new();
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

    let desc = pool.get(node).unwrap();
    assert_eq!(desc.members[1].shape, node);
    assert_eq!(pool.name_of(children), "List<Node>");
    let list = pool.get(children).unwrap();
    assert_eq!(list.element_shape(), Some(node));
}

#[test]
fn structural_shapes_are_interned() {
    let pool = ShapePool::new();
    let a = pool.array_of(ShapeId::INT).unwrap();
    let b = pool.array_of(ShapeId::INT).unwrap();
    assert_eq!(a, b);
    assert_eq!(pool.name_of(a), "[int]");

    let l = pool.list_of(ShapeId::INT).unwrap();
    assert_ne!(a, l);
}

#[test]
fn nullable_wraps_once_and_strips() {
    let pool = ShapePool::new();
    let opt = pool.nullable(ShapeId::INT).unwrap();
    let opt2 = pool.nullable(opt).unwrap();
    assert_eq!(opt, opt2);
    assert_eq!(pool.name_of(opt), "int?");
    assert_eq!(pool.strip_nullable(opt), Ok(ShapeId::INT));
    assert_eq!(pool.strip_nullable(ShapeId::STR), Ok(ShapeId::STR));
}

#[test]
fn insertable_and_opaque_families() {
    let pool = ShapePool::new();
    let bag = pool.insertable("Bag", Some(ShapeId::STR)).unwrap();
    let seq = pool.opaque("Seq", None).unwrap();

    let bag = pool.get(bag).unwrap();
    assert!(bag.has_default_constructor());
    assert_eq!(bag.collection_family(), Some(CollectionFamily::Insertable));

    let seq = pool.get(seq).unwrap();
    assert!(!seq.has_default_constructor());
}

#[test]
fn shaped_types_register_themselves() {
    let pool = ShapePool::new();
    assert_eq!(pool.shape_of::<i64>(), Ok(ShapeId::INT));
    let list = pool.shape_of::<Vec<Option<String>>>().unwrap();
    assert_eq!(pool.name_of(list), "List<str?>");
}

#[test]
fn builder_access_modes() {
    let desc = RecordBuilder::new("Account")
        .read_only("id", ShapeId::INT)
        .write_only("secret", ShapeId::STR)
        .value_type()
        .without_default_constructor()
        .build();
    assert!(desc.is_value_type());
    assert!(!desc.has_default_constructor());
    assert_eq!(desc.members[0].access, MemberAccess::READ);
    assert!(!desc.members[1].access.is_readable());
    assert!(desc.members[1].access.is_writable());
}

#[test]
fn concurrent_declarations_converge() {
    let pool = std::sync::Arc::new(ShapePool::new());
    let ids: Vec<ShapeId> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let pool = &pool;
                scope.spawn(move || pool.declare("Shared"))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect()
    });
    assert!(ids.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(pool.len(), ShapeId::FIRST_DECLARED as usize + 1);
}
