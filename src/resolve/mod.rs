//! Name resolution.
//!
//! - [`names`] - string heuristics: generics/varargs stripping, array
//!   suffixes, the uppercase package/class split
//! - [`Scope`] / [`Resolver`] - the context chain walked for unqualified names
//! - [`ClassPath`] - external types outside the model

mod classpath;
pub mod names;
mod scope;

pub use classpath::{ClassPath, EmptyClassPath, ExternalType, FileClassPath, LibraryIndex};
pub(crate) use classpath::is_archive;
#[cfg(feature = "archives")]
pub(crate) use classpath::entry_capacity;
pub use scope::{Resolution, Resolver, Scope, binary_name, import_suppliers, lookup_profile};
