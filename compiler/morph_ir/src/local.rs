//! Local slots and routine arguments.

use std::fmt;

/// Local slot within one [`Program`](crate::Program).
///
/// IDs are allocated sequentially from 0 by [`IrBuilder`](crate::IrBuilder).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct LocalId(u32);

impl LocalId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Index into the local table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}", self.0)
    }
}

/// The three arguments every routine receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Argument {
    /// The value being converted.
    Source,
    /// A pre-existing destination to populate, or null.
    Destination,
    /// Caller correlation state, passed through untouched.
    State,
}

impl Argument {
    pub const fn name(self) -> &'static str {
        match self {
            Argument::Source => "source",
            Argument::Destination => "destination",
            Argument::State => "state",
        }
    }
}
