//! Shape descriptors.

use crate::{MemberAccess, ShapeId};

/// Kind of a primitive shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Int,
    Float,
    Char,
    Str,
}

impl PrimitiveKind {
    /// The pre-interned shape for this primitive.
    pub const fn shape(self) -> ShapeId {
        match self {
            PrimitiveKind::Bool => ShapeId::BOOL,
            PrimitiveKind::Int => ShapeId::INT,
            PrimitiveKind::Float => ShapeId::FLOAT,
            PrimitiveKind::Char => ShapeId::CHAR,
            PrimitiveKind::Str => ShapeId::STR,
        }
    }

    /// Strings are immutable references; every other primitive is a value type.
    pub const fn is_value_type(self) -> bool {
        !matches!(self, PrimitiveKind::Str)
    }

    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Str => "str",
        }
    }
}

/// Family of a collection-like shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CollectionFamily {
    /// Fixed-size array with a declared element shape.
    Array,
    /// Growable list with a declared element shape.
    List,
    /// Growable list of untyped elements.
    UntypedList,
    /// Any other container that supports ordered item insertion.
    Insertable,
    /// Enumerable only. Can be read from, never built.
    Opaque,
}

/// Structural kind of a shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Primitive(PrimitiveKind),
    /// The untyped top shape.
    Any,
    /// A record with named members.
    Record,
    /// Either null or a value of the inner shape.
    Nullable(ShapeId),
    Collection {
        family: CollectionFamily,
        /// Declared element shape, `None` when elements are untyped.
        element: Option<ShapeId>,
    },
}

/// A member of a record shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemberDescriptor {
    pub name: String,
    pub shape: ShapeId,
    pub access: MemberAccess,
}

impl MemberDescriptor {
    pub fn new(name: impl Into<String>, shape: ShapeId, access: MemberAccess) -> Self {
        MemberDescriptor {
            name: name.into(),
            shape,
            access,
        }
    }
}

/// Metadata for a data shape. Immutable once defined in a pool.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShapeDescriptor {
    pub name: String,
    pub kind: ShapeKind,
    /// Members in declaration order. Runtime instances store member values
    /// in the same order.
    pub members: Vec<MemberDescriptor>,
    pub value_type: bool,
    pub default_constructor: bool,
}

impl ShapeDescriptor {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        ShapeDescriptor {
            name: kind.name().to_owned(),
            kind: ShapeKind::Primitive(kind),
            members: Vec::new(),
            value_type: kind.is_value_type(),
            default_constructor: false,
        }
    }

    /// Collection shapes are reference types. Every family except `Opaque`
    /// can be default-constructed.
    pub fn collection(
        name: impl Into<String>,
        family: CollectionFamily,
        element: Option<ShapeId>,
    ) -> Self {
        ShapeDescriptor {
            name: name.into(),
            kind: ShapeKind::Collection { family, element },
            members: Vec::new(),
            value_type: false,
            default_constructor: family != CollectionFamily::Opaque,
        }
    }

    #[inline]
    pub fn is_value_type(&self) -> bool {
        self.value_type
    }

    #[inline]
    pub fn has_default_constructor(&self) -> bool {
        self.default_constructor
    }

    #[inline]
    pub fn is_collection(&self) -> bool {
        matches!(self.kind, ShapeKind::Collection { .. })
    }

    #[inline]
    pub fn is_record(&self) -> bool {
        matches!(self.kind, ShapeKind::Record)
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.kind {
            ShapeKind::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn collection_family(&self) -> Option<CollectionFamily> {
        match self.kind {
            ShapeKind::Collection { family, .. } => Some(family),
            _ => None,
        }
    }

    /// Declared element shape of a collection, `None` for untyped elements
    /// and for non-collections.
    pub fn element_shape(&self) -> Option<ShapeId> {
        match self.kind {
            ShapeKind::Collection { element, .. } => element,
            _ => None,
        }
    }

    pub fn member(&self, name: &str) -> Option<(usize, &MemberDescriptor)> {
        self.members.iter().enumerate().find(|(_, m)| m.name == name)
    }
}
