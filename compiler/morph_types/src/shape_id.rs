//! Interned shape identifiers.

use std::fmt;

/// Interned shape identifier.
///
/// Pre-interned shapes have known indices (0-6). Every other shape is
/// assigned the next free index when it is declared in a [`ShapePool`].
///
/// [`ShapePool`]: crate::ShapePool
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ShapeId(u32);

impl ShapeId {
    pub const BOOL: ShapeId = ShapeId(0);
    pub const INT: ShapeId = ShapeId(1);
    pub const FLOAT: ShapeId = ShapeId(2);
    pub const CHAR: ShapeId = ShapeId(3);
    pub const STR: ShapeId = ShapeId(4);
    /// The untyped top shape. Any value conforms to it.
    pub const ANY: ShapeId = ShapeId(5);
    /// A growable list whose elements are `ANY`.
    pub const UNTYPED_LIST: ShapeId = ShapeId(6);

    /// First index handed out for declared shapes.
    pub const FIRST_DECLARED: u32 = 7;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        ShapeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::BOOL => write!(f, "ShapeId::BOOL"),
            Self::INT => write!(f, "ShapeId::INT"),
            Self::FLOAT => write!(f, "ShapeId::FLOAT"),
            Self::CHAR => write!(f, "ShapeId::CHAR"),
            Self::STR => write!(f, "ShapeId::STR"),
            Self::ANY => write!(f, "ShapeId::ANY"),
            Self::UNTYPED_LIST => write!(f, "ShapeId::UNTYPED_LIST"),
            _ => write!(f, "ShapeId({})", self.0),
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
