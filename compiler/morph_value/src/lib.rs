//! Morph Value - runtime values flowing through compiled routines.
//!
//! Every value carries enough information to report its runtime shape, so
//! untyped collections can pick a per-element routine on demand.
//!
//! # Identity
//!
//! Reference values ([`ObjectRef`], [`SeqRef`], [`StreamValue`], boxed values
//! and strings) share their allocation on `clone()`. [`Value::same_instance`]
//! compares allocations, `==` compares contents field by field. Inline
//! value-type records ([`StructValue`]) are copied on `clone()` and have no
//! identity.

mod instance;
mod object;
mod seq;
mod value;

pub use instance::{zero_value, InstanceTemplate};
pub use object::{ObjectRef, StructValue};
pub use seq::{Elements, SeqRef, StreamValue};
pub use value::Value;
