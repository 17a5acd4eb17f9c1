//! Morph Types - shape metadata for the transformation compiler.
//!
//! A *shape* is the structural description of a data type: its members,
//! whether it is a value type, whether it can be default-constructed, and
//! whether it is collection-like. The compiler never inspects Rust types
//! directly; it reads shapes from a [`ShapePool`].
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: shapes are referred to by [`ShapeId`] (a `u32`),
//!   descriptors live once in the pool behind an `Arc`.
//! - **Declare, then define**: a shape id can be reserved before its
//!   descriptor exists, so self-referential and mutually-referential shapes
//!   can be described.
//! - **Static capability**: any Rust type can describe itself through the
//!   [`Shaped`] trait instead of relying on runtime reflection.

mod builder;
mod descriptor;
mod error;
mod flags;
mod pool;
mod shape_id;
mod shaped;

pub use builder::RecordBuilder;
pub use descriptor::{CollectionFamily, MemberDescriptor, PrimitiveKind, ShapeDescriptor, ShapeKind};
pub use error::ShapeError;
pub use flags::MemberAccess;
pub use pool::ShapePool;
pub use shape_id::ShapeId;
pub use shaped::Shaped;
