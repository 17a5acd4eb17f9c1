//! Compilation and conversion errors.
//!
//! Only failures live here. "No instance could be built" and "destination
//! collection kind is unknown" are ordinary outcomes and surface as
//! [`Value::Null`](morph_value::Value::Null) results.

use thiserror::Error;

use morph_types::{ShapeError, ShapeId};

/// Error raised while compiling a routine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// No built-in conversion exists and no custom converter is registered.
    #[error("no conversion from `{from}` to `{to}`")]
    NoConversion { from: String, to: String },
}

/// Error raised while running a routine.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConversionError {
    /// A sub-routine resolved on first use failed to compile.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A routine received a value of a shape it was not compiled for.
    #[error("expected a value of shape {expected}, found {found}")]
    ShapeMismatch { expected: ShapeId, found: ShapeId },

    #[error("cannot convert {value} to {to}")]
    Primitive { value: String, to: &'static str },

    /// A routine outlived the registry it resolves sub-routines from.
    #[error("the routine registry was dropped")]
    RegistryDropped,

    #[error("custom converter failed: {0}")]
    Custom(String),
}
