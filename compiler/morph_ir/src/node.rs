//! IR nodes.

use morph_types::{PrimitiveKind, ShapeId};

use crate::{Argument, LocalId};

/// Index of a custom converter in the mapping configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ConverterId(u32);

impl ConverterId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// How a `Convert` node turns one value into another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// Built-in conversion between two primitive kinds.
    Primitive {
        from: PrimitiveKind,
        to: PrimitiveKind,
    },
    /// User conversion registered on the configuration. Receives the
    /// correlation state.
    Custom(ConverterId),
}

/// One operation in a conversion routine.
///
/// Every node produces a value; statements produce null. Children are
/// evaluated left to right.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Read one of the routine's arguments.
    ReadArgument(Argument),
    /// Read a declared local.
    ReadLocal(LocalId),
    /// Store into a declared local.
    WriteLocal { local: LocalId, value: Box<Node> },
    /// Bring a local into scope, initialised to the zero value of `shape`.
    DeclareLocal { local: LocalId, shape: ShapeId },
    /// Default-construct an instance of `shape`.
    NewInstance(ShapeId),
    /// Move a value-type value into reference form.
    Box(Box<Node>),
    /// Inline form of a boxed value.
    Unbox(Box<Node>),
    /// Finish the routine with this value.
    Return(Box<Node>),
    /// Children in order; the last child's value is the result.
    Sequence(Vec<Node>),
    /// Run the routine converting `from` into `to`.
    ///
    /// `from == ShapeId::ANY` resolves the routine from the runtime shape of
    /// the source value; `to == ShapeId::ANY` then means "the same shape".
    InvokeRoutine {
        from: ShapeId,
        to: ShapeId,
        source: Box<Node>,
        destination: Box<Node>,
    },
    /// The null constant.
    Null,
    /// Read member `member` of a record of shape `shape`. Null-safe.
    ReadMember {
        object: Box<Node>,
        shape: ShapeId,
        member: u32,
    },
    /// Write member `member` of the record held in `local`.
    WriteMember {
        local: LocalId,
        member: u32,
        value: Box<Node>,
    },
    /// `value`, or `fallback` when `value` is null. `fallback` only runs on null.
    Coalesce { value: Box<Node>, fallback: Box<Node> },
    /// Run `then` unless `test` is null; null otherwise.
    IfNotNull { test: Box<Node>, then: Box<Node> },
    /// Convert a value; null converts to null.
    Convert {
        conversion: Conversion,
        value: Box<Node>,
    },
}

impl Node {
    pub fn write_local(local: LocalId, value: Node) -> Node {
        Node::WriteLocal {
            local,
            value: Box::new(value),
        }
    }

    pub fn ret(value: Node) -> Node {
        Node::Return(Box::new(value))
    }

    pub fn box_value(value: Node) -> Node {
        Node::Box(Box::new(value))
    }

    pub fn unbox(value: Node) -> Node {
        Node::Unbox(Box::new(value))
    }

    pub fn invoke(from: ShapeId, to: ShapeId, source: Node, destination: Node) -> Node {
        Node::InvokeRoutine {
            from,
            to,
            source: Box::new(source),
            destination: Box::new(destination),
        }
    }

    pub fn read_member(object: Node, shape: ShapeId, member: u32) -> Node {
        Node::ReadMember {
            object: Box::new(object),
            shape,
            member,
        }
    }

    pub fn write_member(local: LocalId, member: u32, value: Node) -> Node {
        Node::WriteMember {
            local,
            member,
            value: Box::new(value),
        }
    }

    pub fn coalesce(value: Node, fallback: Node) -> Node {
        Node::Coalesce {
            value: Box::new(value),
            fallback: Box::new(fallback),
        }
    }

    pub fn if_not_null(test: Node, then: Node) -> Node {
        Node::IfNotNull {
            test: Box::new(test),
            then: Box::new(then),
        }
    }

    pub fn convert(conversion: Conversion, value: Node) -> Node {
        Node::Convert {
            conversion,
            value: Box::new(value),
        }
    }

    /// Number of nodes in this tree, including `self`.
    pub fn size(&self) -> usize {
        1 + match self {
            Node::ReadArgument(_)
            | Node::ReadLocal(_)
            | Node::DeclareLocal { .. }
            | Node::NewInstance(_)
            | Node::Null => 0,
            Node::WriteLocal { value, .. }
            | Node::Box(value)
            | Node::Unbox(value)
            | Node::Return(value)
            | Node::WriteMember { value, .. }
            | Node::Convert { value, .. }
            | Node::ReadMember { object: value, .. } => value.size(),
            Node::Sequence(children) => children.iter().map(Node::size).sum(),
            Node::InvokeRoutine {
                source,
                destination,
                ..
            } => source.size() + destination.size(),
            Node::Coalesce { value, fallback } => value.size() + fallback.size(),
            Node::IfNotNull { test, then } => test.size() + then.size(),
        }
    }
}
