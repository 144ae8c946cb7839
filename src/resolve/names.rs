//! Type-name heuristics shared by resolution and the modeller.
//!
//! Source and classfile parsers hand the modeller type names exactly as they
//! were written: `List<String>`, `Object...`, `byte[][]`, `Map.Entry`,
//! `com.example.Outer.Inner`. Only the naming conventions of Java separate
//! packages from classes in a dotted path, so [`split_qualified`] treats a
//! trailing run of uppercase-initial segments as (nested) classes. Names that
//! break the convention can be split incorrectly.

use crate::base::constants::PRIMITIVES;

/// A dotted type name split into its package path and class chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QualifiedName<'a> {
    /// Package segments, outermost first. Empty for the default package.
    pub package: Vec<&'a str>,
    /// Class segments, outermost first. Never empty for a valid name.
    pub classes: Vec<&'a str>,
}

impl<'a> QualifiedName<'a> {
    pub fn package_path(&self) -> String {
        self.package.join(".")
    }

    pub fn simple_name(&self) -> &'a str {
        self.classes.last().copied().unwrap_or_default()
    }

    pub fn is_qualified(&self) -> bool {
        !self.package.is_empty() || self.classes.len() > 1
    }

    /// Classfile binary name, e.g. `com.example.Outer$Inner`.
    pub fn binary_name(&self) -> String {
        let classes = self.classes.join("$");
        if self.package.is_empty() {
            classes
        } else {
            format!("{}.{classes}", self.package_path())
        }
    }
}

/// Drop generic arguments, a varargs suffix and surrounding whitespace.
///
/// Array brackets are kept; see [`split_array`].
pub fn strip_decorations(name: &str) -> String {
    strip_generics(&strip_varargs(name))
}

fn strip_varargs(name: &str) -> String {
    match name.trim().strip_suffix("...") {
        Some(base) => format!("{}[]", base.trim_end()),
        None => name.trim().to_string(),
    }
}

fn strip_generics(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    for c in name.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 && !c.is_whitespace() => out.push(c),
            _ => {}
        }
    }
    out
}

/// Split trailing `[]` pairs: `int[][]` → (`int`, 2).
pub fn split_array(name: &str) -> (&str, usize) {
    let mut base = name.trim_end();
    let mut dims = 0;
    while let Some(rest) = base.strip_suffix("[]") {
        base = rest.trim_end();
        dims += 1;
    }
    (base, dims)
}

/// Split a dotted name into package and class segments.
///
/// The last segment is always a class. Walking backwards, every preceding
/// segment that starts with an uppercase letter is taken as an enclosing
/// class; the first lowercase segment ends the class chain.
///
/// ```text
/// com.example.Foo       → [com, example] / [Foo]
/// com.example.Foo.Bar   → [com, example] / [Foo, Bar]
/// Map.Entry             → []             / [Map, Entry]
/// ```
pub fn split_qualified(name: &str) -> QualifiedName<'_> {
    let segments: Vec<&str> = name.split('.').filter(|s| !s.is_empty()).collect();
    let Some((last, rest)) = segments.split_last() else {
        return QualifiedName {
            package: Vec::new(),
            classes: Vec::new(),
        };
    };

    let mut split = rest.len();
    while split > 0 && starts_uppercase(rest[split - 1]) {
        split -= 1;
    }

    let mut classes = rest[split..].to_vec();
    classes.push(last);
    QualifiedName {
        package: rest[..split].to_vec(),
        classes,
    }
}

fn starts_uppercase(segment: &str) -> bool {
    segment.chars().next().is_some_and(char::is_uppercase)
}

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

/// Whether `name` is a single Java identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (unicode_ident::is_xid_start(first) || first == '_' || first == '$')
        && chars.all(|c| unicode_ident::is_xid_continue(c) || c == '$')
}

/// Whether every dotted segment of `name` is an identifier.
pub fn is_qualified_identifier(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("List<String>", "List")]
    #[case("java.util.Map<K, List<V>>", "java.util.Map")]
    #[case("Object...", "Object[]")]
    #[case(" int[] ", "int[]")]
    #[case("Outer<T>.Inner", "Outer.Inner")]
    fn test_strip_decorations(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_decorations(input), expected);
    }

    #[rstest]
    #[case("int", "int", 0)]
    #[case("byte[][]", "byte", 2)]
    #[case("String []", "String", 1)]
    fn test_split_array(#[case] input: &str, #[case] base: &str, #[case] dims: usize) {
        assert_eq!(split_array(input), (base, dims));
    }

    #[rstest]
    #[case("com.example.Foo", "com.example", &["Foo"])]
    #[case("com.example.Foo.Bar", "com.example", &["Foo", "Bar"])]
    #[case("Map.Entry", "", &["Map", "Entry"])]
    #[case("Foo", "", &["Foo"])]
    #[case("com.Example.foo.Bar", "com.Example.foo", &["Bar"])]
    fn test_split_qualified(#[case] input: &str, #[case] package: &str, #[case] classes: &[&str]) {
        let q = split_qualified(input);
        assert_eq!(q.package_path(), package);
        assert_eq!(q.classes, classes);
    }

    #[test]
    fn test_binary_name() {
        let q = split_qualified("com.example.Foo.Bar");
        assert_eq!(q.binary_name(), "com.example.Foo$Bar");
        assert_eq!(q.simple_name(), "Bar");
        assert!(q.is_qualified());
        assert!(!split_qualified("Foo").is_qualified());
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("foo_Bar$1"));
        assert!(is_identifier("Ünïcode"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier(""));
        assert!(is_qualified_identifier("java.util.List"));
        assert!(!is_qualified_identifier("java..List"));
    }
}
