//! Textual dump of IR programs, used for trace logging and tests.
//!
//! ```text
//! locals: l0: #7, l1: #8
//! (seq
//!   (declare l0 #7)
//!   (write l0 (unbox (arg source)))
//!   (return (read l0)))
//! ```

use std::fmt::{self, Write};

use crate::{Conversion, Node, Program};

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("locals:")?;
        for (i, shape) in self.locals().iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}l{i}: {shape}")?;
        }
        f.write_char('\n')?;
        write_node(f, self.body(), 0)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self, 0)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, indent: usize) -> fmt::Result {
    match node {
        Node::ReadArgument(arg) => write!(f, "(arg {})", arg.name()),
        Node::ReadLocal(local) => write!(f, "(read {local})"),
        Node::WriteLocal { local, value } => {
            write!(f, "(write {local} ")?;
            write_node(f, value, indent)?;
            f.write_char(')')
        }
        Node::DeclareLocal { local, shape } => write!(f, "(declare {local} {shape})"),
        Node::NewInstance(shape) => write!(f, "(new {shape})"),
        Node::Box(value) => wrap(f, "box", value, indent),
        Node::Unbox(value) => wrap(f, "unbox", value, indent),
        Node::Return(value) => wrap(f, "return", value, indent),
        Node::Sequence(children) => {
            f.write_str("(seq")?;
            for child in children {
                f.write_char('\n')?;
                write!(f, "{:width$}", "", width = (indent + 1) * 2)?;
                write_node(f, child, indent + 1)?;
            }
            f.write_char(')')
        }
        Node::InvokeRoutine {
            from,
            to,
            source,
            destination,
        } => {
            write!(f, "(invoke {from}->{to} ")?;
            write_node(f, source, indent)?;
            f.write_char(' ')?;
            write_node(f, destination, indent)?;
            f.write_char(')')
        }
        Node::Null => f.write_str("null"),
        Node::ReadMember {
            object,
            shape,
            member,
        } => {
            write!(f, "(member {shape}.{member} ")?;
            write_node(f, object, indent)?;
            f.write_char(')')
        }
        Node::WriteMember {
            local,
            member,
            value,
        } => {
            write!(f, "(set {local}.{member} ")?;
            write_node(f, value, indent)?;
            f.write_char(')')
        }
        Node::Coalesce { value, fallback } => {
            f.write_str("(coalesce ")?;
            write_node(f, value, indent)?;
            f.write_char(' ')?;
            write_node(f, fallback, indent)?;
            f.write_char(')')
        }
        Node::IfNotNull { test, then } => {
            f.write_str("(if-not-null ")?;
            write_node(f, test, indent)?;
            f.write_char(' ')?;
            write_node(f, then, indent)?;
            f.write_char(')')
        }
        Node::Convert { conversion, value } => {
            match conversion {
                Conversion::Primitive { from, to } => {
                    write!(f, "(convert {}->{} ", from.name(), to.name())?;
                }
                Conversion::Custom(id) => write!(f, "(convert custom{} ", id.index())?,
            }
            write_node(f, value, indent)?;
            f.write_char(')')
        }
    }
}

fn wrap(f: &mut fmt::Formatter<'_>, head: &str, value: &Node, indent: usize) -> fmt::Result {
    write!(f, "({head} ")?;
    write_node(f, value, indent)?;
    f.write_char(')')
}
