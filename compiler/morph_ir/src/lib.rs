//! Morph IR - the node language describing one conversion routine.
//!
//! A routine reads its three arguments (source, destination to reuse,
//! correlation state), works on typed local slots, and returns one value.
//!
//! - [`Node`]: a tree of operations; a `Sequence` owns its children
//! - [`IrBuilder`]: allocates locals and produces a [`Program`]
//! - [`Program::validate`]: declared-before-used check over evaluation order
//!
//! # Design Philosophy
//!
//! - **Trees, not graphs**: children are owned `Box<Node>`s, so a program is
//!   acyclic by construction.
//! - **Forward only**: there are no loops and no backward branches. The only
//!   conditional forms (`Coalesce`, `IfNotNull`) skip ahead on null.
//! - **Backend agnostic**: nothing here knows how a program is executed.

mod display;
mod local;
mod node;
mod program;

pub use local::{Argument, LocalId};
pub use node::{Conversion, ConverterId, Node};
pub use program::{IrBuilder, IrDefect, Program};
