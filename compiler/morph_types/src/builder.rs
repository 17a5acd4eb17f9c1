//! Manual declaration of record shapes.

use crate::{MemberAccess, MemberDescriptor, ShapeDescriptor, ShapeId, ShapeKind};

/// Builder for record [`ShapeDescriptor`]s.
///
/// Records default to reference types with a parameterless constructor.
#[derive(Clone, Debug)]
pub struct RecordBuilder {
    descriptor: ShapeDescriptor,
}

impl RecordBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        RecordBuilder {
            descriptor: ShapeDescriptor {
                name: name.into(),
                kind: ShapeKind::Record,
                members: Vec::new(),
                value_type: false,
                default_constructor: true,
            },
        }
    }

    /// Add a readable and writable member.
    #[must_use]
    pub fn member(self, name: impl Into<String>, shape: ShapeId) -> Self {
        self.member_with_access(name, shape, MemberAccess::READ_WRITE)
    }

    #[must_use]
    pub fn read_only(self, name: impl Into<String>, shape: ShapeId) -> Self {
        self.member_with_access(name, shape, MemberAccess::READ)
    }

    #[must_use]
    pub fn write_only(self, name: impl Into<String>, shape: ShapeId) -> Self {
        self.member_with_access(name, shape, MemberAccess::WRITE)
    }

    #[must_use]
    pub fn member_with_access(
        mut self,
        name: impl Into<String>,
        shape: ShapeId,
        access: MemberAccess,
    ) -> Self {
        self.descriptor
            .members
            .push(MemberDescriptor::new(name, shape, access));
        self
    }

    /// Mark the record as a value type. Value types always have a zero value,
    /// so the default-constructor flag no longer matters for them.
    #[must_use]
    pub fn value_type(mut self) -> Self {
        self.descriptor.value_type = true;
        self
    }

    #[must_use]
    pub fn without_default_constructor(mut self) -> Self {
        self.descriptor.default_constructor = false;
        self
    }

    pub fn build(self) -> ShapeDescriptor {
        self.descriptor
    }
}
