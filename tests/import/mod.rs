//! Modeller behaviour observed through whole imports:
//! - Re-import identity and retraction
//! - Name resolution across units and packages
//! - Feature representation under the import settings

pub mod tests_features;
pub mod tests_reimport;
pub mod tests_resolution;
