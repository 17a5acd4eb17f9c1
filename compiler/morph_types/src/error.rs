//! Shape pool errors.

use thiserror::Error;

use crate::ShapeId;

/// Error raised by [`ShapePool`](crate::ShapePool) operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The id was never handed out by this pool.
    #[error("unknown shape {0}")]
    Unknown(ShapeId),

    /// The id was declared but no descriptor was ever defined for it.
    #[error("shape `{name}` ({id}) was declared but never defined")]
    Undefined { id: ShapeId, name: String },

    /// A descriptor already exists for this id.
    #[error("shape `{name}` ({id}) is already defined")]
    AlreadyDefined { id: ShapeId, name: String },

    /// The descriptor's name does not match the declared name.
    #[error("shape {id} was declared as `{declared}` but defined as `{defined}`")]
    NameMismatch {
        id: ShapeId,
        declared: String,
        defined: String,
    },
}
