//! Declaration records handed from parsers to the modeller.
//!
//! Plain owned data: names are kept exactly as written (generic arguments,
//! array brackets and all) and resolved by the modeller.

use std::fmt;

use crate::model::{ParameterDirection, Visibility};

/// Declaration modifiers, using the JVM access flag bit layout so that
/// classfile flags can be passed through unchanged.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u16);

impl Modifiers {
    pub const PUBLIC: Self = Self(0x0001);
    pub const PRIVATE: Self = Self(0x0002);
    pub const PROTECTED: Self = Self(0x0004);
    pub const STATIC: Self = Self(0x0008);
    pub const FINAL: Self = Self(0x0010);
    pub const ABSTRACT: Self = Self(0x0400);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Modifier for a source keyword, if it is one the model records.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "public" => Self::PUBLIC,
            "private" => Self::PRIVATE,
            "protected" => Self::PROTECTED,
            "static" => Self::STATIC,
            "final" => Self::FINAL,
            "abstract" => Self::ABSTRACT,
            _ => return None,
        })
    }

    pub fn visibility(self) -> Visibility {
        if self.contains(Self::PUBLIC) {
            Visibility::Public
        } else if self.contains(Self::PROTECTED) {
            Visibility::Protected
        } else if self.contains(Self::PRIVATE) {
            Visibility::Private
        } else {
            Visibility::Package
        }
    }

    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    pub fn is_final(self) -> bool {
        self.contains(Self::FINAL)
    }

    pub fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modifiers({:#06x})", self.0)
    }
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// A class, interface or enumeration header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub modifiers: Modifiers,
    pub type_parameters: Vec<String>,
    /// `extends` of a class. Unused for interfaces.
    pub superclass: Option<String>,
    /// `implements` of a class or enumeration, `extends` of an interface.
    pub interfaces: Vec<String>,
    /// Raw javadoc comment.
    pub documentation: Option<String>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Modifiers::PUBLIC,
            ..Self::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_documentation(mut self, doc: impl Into<String>) -> Self {
        self.documentation = Some(doc.into());
        self
    }
}

/// A field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeDecl {
    pub name: String,
    pub type_name: String,
    pub modifiers: Modifiers,
    /// Raw initializer text.
    pub initial_value: Option<String>,
    pub documentation: Option<String>,
}

impl AttributeDecl {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            modifiers: Modifiers::PRIVATE,
            ..Self::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }
}

/// A parameter, or the return type when `direction` is `Return`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub type_name: String,
    pub direction: ParameterDirection,
}

impl ParamDecl {
    pub fn input(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            direction: ParameterDirection::In,
        }
    }

    pub fn returns(type_name: impl Into<String>) -> Self {
        Self {
            name: "return".to_string(),
            type_name: type_name.into(),
            direction: ParameterDirection::Return,
        }
    }

    pub fn is_return(&self) -> bool {
        self.direction == ParameterDirection::Return
    }
}

/// A method or constructor.
///
/// Constructors carry no `Return` parameter; `void` methods carry one typed
/// `void`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OperationDecl {
    pub name: String,
    pub modifiers: Modifiers,
    pub type_parameters: Vec<String>,
    pub params: Vec<ParamDecl>,
    /// Raw body text without the enclosing braces.
    pub body: Option<String>,
    pub documentation: Option<String>,
}

impl OperationDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: Modifiers::PUBLIC,
            ..Self::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn param(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.params.push(ParamDecl::input(name, type_name));
        self
    }

    pub fn returns(mut self, type_name: impl Into<String>) -> Self {
        self.params.push(ParamDecl::returns(type_name));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_visibility() {
        assert_eq!(Modifiers::PUBLIC.visibility(), Visibility::Public);
        assert_eq!(Modifiers::empty().visibility(), Visibility::Package);
        assert_eq!(
            (Modifiers::PRIVATE | Modifiers::STATIC).visibility(),
            Visibility::Private
        );
        assert!((Modifiers::STATIC | Modifiers::FINAL).is_final());
    }

    #[test]
    fn test_modifiers_from_classfile_bits() {
        let m = Modifiers::from_bits(0x0001 | 0x0400 | 0x0200);
        assert!(m.is_abstract());
        assert_eq!(m.visibility(), Visibility::Public);
        assert_eq!(Modifiers::from_keyword("protected"), Some(Modifiers::PROTECTED));
        assert_eq!(Modifiers::from_keyword("synchronized"), None);
    }
}
