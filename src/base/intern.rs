//! String interning for element names.
//!
//! Member lookups in the model graph are keyed on `(namespace, Name)`, so
//! every element name goes through an [`Interner`] once when the element is
//! indexed.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::fmt;

/// An interned element name.
///
/// A `Name` is only meaningful together with the [`Interner`] that produced it.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Name(u32);

impl Name {
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

/// Deduplicating string store.
///
/// Lookups that must not grow the table (probing for a member that may not
/// exist) use [`Interner::find`].
#[derive(Default)]
pub struct Interner {
    inner: RwLock<InternerInner>,
}

#[derive(Default)]
struct InternerInner {
    map: FxHashMap<SmolStr, u32>,
    strings: Vec<SmolStr>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s`, returning the existing handle if it was seen before.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(name) = self.find(s) {
            return name;
        }

        let mut inner = self.inner.write();
        if let Some(&index) = inner.map.get(s) {
            return Name(index);
        }
        let smol = SmolStr::new(s);
        let index = inner.strings.len() as u32;
        inner.strings.push(smol.clone());
        inner.map.insert(smol, index);
        Name(index)
    }

    /// Handle for `s` if it has already been interned.
    pub fn find(&self, s: &str) -> Option<Name> {
        self.inner.read().map.get(s).copied().map(Name)
    }

    /// The string behind `name`, if it came from this interner.
    pub fn lookup(&self, name: Name) -> Option<SmolStr> {
        self.inner.read().strings.get(name.0 as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Clone for Interner {
    fn clone(&self) -> Self {
        let inner = self.inner.read();
        Self {
            inner: RwLock::new(InternerInner {
                map: inner.map.clone(),
                strings: inner.strings.clone(),
            }),
        }
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner")
            .field("count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_same_string() {
        let interner = Interner::new();
        let a = interner.intern("Foo");
        let b = interner.intern("Foo");
        assert_eq!(a, b);
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn test_find_does_not_insert() {
        let interner = Interner::new();
        assert!(interner.find("Bar").is_none());
        assert!(interner.is_empty());

        let bar = interner.intern("Bar");
        assert_eq!(interner.find("Bar"), Some(bar));
    }

    #[test]
    fn test_lookup_round_trips() {
        let interner = Interner::new();
        let name = interner.intern("java.lang");
        assert_eq!(interner.lookup(name).as_deref(), Some("java.lang"));
    }
}
