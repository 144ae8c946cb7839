//! Import phases.
//!
//! A [`Modeller`](super::Modeller) is parameterized by the phase it runs in:
//!
//! | Phase      | Level | Used by                      | Cross-references |
//! |------------|-------|------------------------------|------------------|
//! | [`Outline`]  | 0   | single-pass import           | none             |
//! | [`Skeleton`] | 1   | first sweep of a two-pass    | none             |
//! | [`Resolve`]  | 2   | second sweep of a two-pass   | wired            |
//!
//! Edges between classifiers (generalizations, realizations, associations,
//! dependencies, classifier-typed features) can only be created through a
//! [`Linker`], and only [`Resolve`] hands one out.

use std::fmt;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Outline {}
    impl Sealed for super::Skeleton {}
    impl Sealed for super::Resolve {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Outline = 0,
    Skeleton = 1,
    Resolve = 2,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {}", *self as u8)
    }
}

/// Capability to create edges between classifiers.
#[derive(Clone, Copy, Debug)]
pub struct Linker {
    _private: (),
}

pub trait Phase: sealed::Sealed {
    const LEVEL: Level;

    fn linker() -> Option<Linker> {
        None
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Outline;

#[derive(Clone, Copy, Debug, Default)]
pub struct Skeleton;

#[derive(Clone, Copy, Debug, Default)]
pub struct Resolve;

impl Phase for Outline {
    const LEVEL: Level = Level::Outline;
}

impl Phase for Skeleton {
    const LEVEL: Level = Level::Skeleton;
}

impl Phase for Resolve {
    const LEVEL: Level = Level::Resolve;

    fn linker() -> Option<Linker> {
        Some(Linker { _private: () })
    }
}
