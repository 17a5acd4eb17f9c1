//! Static capability interface for describing Rust types as shapes.

use crate::{ShapeError, ShapeId, ShapePool};

/// A type that can describe its own shape.
///
/// Implementations register (or look up) their descriptor in the pool and
/// return its id. Registration must be idempotent: calling it twice yields
/// the same id.
///
/// ```text
/// impl Shaped for Point {
///     fn register(pool: &ShapePool) -> Result<ShapeId, ShapeError> {
///         pool.register(
///             RecordBuilder::new("Point")
///                 .member("x", ShapeId::INT)
///                 .member("y", ShapeId::INT)
///                 .build(),
///         )
///     }
/// }
/// ```
pub trait Shaped {
    fn register(pool: &ShapePool) -> Result<ShapeId, ShapeError>;
}

macro_rules! impl_shaped_primitive {
    ($($ty:ty => $id:expr),* $(,)?) => {
        $(
            impl Shaped for $ty {
                #[inline]
                fn register(_pool: &ShapePool) -> Result<ShapeId, ShapeError> {
                    Ok($id)
                }
            }
        )*
    };
}

impl_shaped_primitive! {
    bool => ShapeId::BOOL,
    i64 => ShapeId::INT,
    f64 => ShapeId::FLOAT,
    char => ShapeId::CHAR,
    String => ShapeId::STR,
}

impl<T: Shaped> Shaped for Vec<T> {
    fn register(pool: &ShapePool) -> Result<ShapeId, ShapeError> {
        let element = T::register(pool)?;
        pool.list_of(element)
    }
}

impl<T: Shaped> Shaped for Option<T> {
    fn register(pool: &ShapePool) -> Result<ShapeId, ShapeError> {
        let inner = T::register(pool)?;
        pool.nullable(inner)
    }
}
