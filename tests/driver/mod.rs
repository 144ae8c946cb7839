//! Import drivers over real files:
//! - Source directories and unit failures
//! - Classfiles, jar archives and the classpath

#[cfg(feature = "archives")]
pub mod tests_classfile_import;
pub mod tests_source_import;
