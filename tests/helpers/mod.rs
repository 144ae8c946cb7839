//! Shared test helpers.

#![allow(dead_code)]

#[path = "../../src/classfile/testing.rs"]
pub mod classfiles;
pub mod model_helpers;
pub mod source_fixtures;
