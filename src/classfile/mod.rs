//! Compiled class input.
//!
//! [`ClassFile::parse`] decodes a `.class` file; [`emit_class`] feeds the
//! decoded structure to a [`ModelEvents`](crate::import::ModelEvents) sink the
//! same way the source scanner does.

mod events;
mod reader;
#[cfg(test)]
pub(crate) mod testing;

pub use events::{emit_class, unit_name};
pub use reader::{ClassFile, ClassfileError, InnerClassInfo, MemberInfo, access};
