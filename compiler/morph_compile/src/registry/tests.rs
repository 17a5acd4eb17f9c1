use std::sync::Arc;

use morph_types::ShapeId;
use morph_value::{ObjectRef, Value};
use pretty_assertions::assert_eq;
use rayon::prelude::*;

use super::*;
use crate::test_helpers::{deep, point, registry, seq, shallow, shapes};
use crate::{ConversionError, MappingConfig};

#[test]
fn routines_are_cached_per_key() {
    let s = shapes();
    let registry = registry(&s);
    let config = deep();

    let first = registry.get_or_compile(s.point, s.point_dto, &config).unwrap();
    let second = registry.get_or_compile(s.point, s.point_dto, &config).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.compile_count(), 1);

    let key = RoutineKey::new(s.point, s.point_dto, config.id().clone());
    assert!(Arc::ptr_eq(&registry.get(&key).unwrap(), &first));
}

#[test]
fn configurations_are_separate_keys() {
    let s = shapes();
    let registry = registry(&s);

    let deep_routine = registry.get_or_compile(s.point, s.point, &deep()).unwrap();
    let shallow_routine = registry.get_or_compile(s.point, s.point, &shallow()).unwrap();
    assert!(!Arc::ptr_eq(&deep_routine, &shallow_routine));
    assert_eq!(deep_routine.copy_mode(), crate::CopyMode::Deep);
    assert_eq!(shallow_routine.copy_mode(), crate::CopyMode::Shallow);

    // Same name, same configuration identity.
    let again = registry
        .get_or_compile(s.point, s.point, &Arc::new(MappingConfig::new("deep")))
        .unwrap();
    assert!(Arc::ptr_eq(&deep_routine, &again));
    assert_eq!(registry.len(), 2);
}

#[test]
fn routine_reports_its_signature() {
    let s = shapes();
    let routine = registry(&s).get_or_compile(s.point, s.point_dto, &deep()).unwrap();
    assert_eq!(routine.from(), s.point);
    assert_eq!(routine.to(), s.point_dto);
    assert_eq!(routine.config().as_str(), "deep");
    assert!(!routine.is_collection());
}

#[test]
fn compile_errors_are_not_cached() {
    let s = shapes();
    let registry = registry(&s);
    assert!(registry.get_or_compile(s.point, ShapeId::INT, &deep()).is_err());
    assert!(registry.is_empty());
}

#[test]
fn sub_routines_are_resolved_on_first_use() {
    let s = shapes();
    let registry = registry(&s);
    let points = registry.pool().list_of(s.point).unwrap();

    let routine = registry.get_or_compile(points, points, &deep()).unwrap();
    let link = routine.sub_routine().unwrap();
    assert_eq!((link.from(), link.to()), (s.point, s.point));
    assert!(!link.is_resolved());
    assert_eq!(registry.len(), 1);

    routine.map(&seq(points, vec![point(&s, 1, 2)])).unwrap();
    assert!(link.is_resolved());
    assert_eq!(registry.len(), 2);

    let resolved = link.resolve().unwrap();
    let cached = registry.get_or_compile(s.point, s.point, &deep()).unwrap();
    assert!(Arc::ptr_eq(&resolved, &cached));
}

#[test]
fn self_referential_routine_links_to_itself() {
    let s = shapes();
    let registry = registry(&s);
    let routine = registry.get_or_compile(s.node, s.node, &deep()).unwrap();

    let leaf = Value::Object(ObjectRef::new(s.node, vec![Value::Int(2), Value::Null, Value::Null]));
    let root = Value::Object(ObjectRef::new(s.node, vec![Value::Int(1), leaf.clone(), Value::Null]));
    let copy = routine.map(&root).unwrap();

    assert_eq!(copy, root);
    assert!(!copy.same_instance(&root));
    assert!(!copy.member(1).unwrap().same_instance(&leaf));
    assert_eq!(registry.len(), 1);
}

#[test]
fn concurrent_requests_observe_one_routine() {
    let s = shapes();
    let registry = registry(&s);
    let config = deep();

    let routines: Vec<_> = (0..64)
        .into_par_iter()
        .map(|_| registry.get_or_compile(s.person, s.person, &config).unwrap())
        .collect();

    let published = registry
        .get(&RoutineKey::new(s.person, s.person, config.id().clone()))
        .unwrap();
    assert!(routines.iter().all(|r| Arc::ptr_eq(r, &published)));
    assert_eq!(registry.len(), 1);
    assert!(registry.compile_count() >= 1);
}

#[test]
fn concurrent_invocations_share_lazy_links() {
    let s = shapes();
    let registry = registry(&s);
    let points = registry.pool().list_of(s.point).unwrap();
    let routine = registry.get_or_compile(points, points, &deep()).unwrap();

    let results: Vec<Value> = (0..32_i64)
        .into_par_iter()
        .map(|i| routine.map(&seq(points, vec![point(&s, i, -i)])).unwrap())
        .collect();

    for (i, result) in (0_i64..).zip(&results) {
        assert_eq!(result.as_seq().unwrap().get(0).unwrap().member(0), Some(Value::Int(i)));
    }
    assert_eq!(registry.len(), 2);
}

#[test]
fn dropped_registry_is_reported() {
    let s = shapes();
    let points = s.pool.list_of(s.point).unwrap();
    let routine = registry(&s).get_or_compile(points, points, &deep()).unwrap();

    let err = routine.map(&seq(points, vec![point(&s, 1, 2)])).unwrap_err();
    assert_eq!(err, ConversionError::RegistryDropped);
}
