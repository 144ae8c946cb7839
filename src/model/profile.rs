//! The Java library profile.
//!
//! A read-only root holding the primitive datatypes and the well-known
//! platform types. Fields typed by anything in here are always modelled as
//! plain attributes, and forced creation never adds to it.

use super::element::{Element, ElementKind, Origin};
use super::graph::Model;
use super::ids::NodeId;
use crate::base::constants::{PRIMITIVES, PROFILE_NAME};

/// `(package, classes, interfaces)`
const LIBRARY: &[(&str, &[&str], &[&str])] = &[
    (
        "java.lang",
        &[
            "Object", "String", "StringBuilder", "StringBuffer", "Boolean", "Byte",
            "Character", "Short", "Integer", "Long", "Float", "Double", "Number", "Void",
            "Class", "Enum", "Math", "System", "Thread", "Throwable", "Exception",
            "RuntimeException", "Error", "IllegalArgumentException",
            "IllegalStateException", "NullPointerException",
            "UnsupportedOperationException",
        ],
        &[
            "Runnable", "Comparable", "CharSequence", "Iterable", "Cloneable",
            "AutoCloseable",
        ],
    ),
    (
        "java.util",
        &[
            "ArrayList", "LinkedList", "HashMap", "LinkedHashMap", "TreeMap", "HashSet",
            "LinkedHashSet", "TreeSet", "Vector", "Hashtable", "Stack", "Date", "Calendar",
            "Random", "Optional", "Objects", "Arrays", "Collections", "UUID",
        ],
        &[
            "Collection", "List", "Set", "SortedSet", "Map", "SortedMap", "Queue", "Deque",
            "Iterator", "Comparator", "Enumeration",
        ],
    ),
    (
        "java.io",
        &[
            "File", "InputStream", "OutputStream", "Reader", "Writer", "IOException",
            "PrintStream",
        ],
        &["Serializable", "Closeable"],
    ),
    ("java.math", &["BigDecimal", "BigInteger"], &[]),
];

/// Install the profile into `model` and return its root.
pub(super) fn install_java_profile(model: &mut Model) -> NodeId {
    let profile = model.add_root(
        Element::new(ElementKind::Profile, PROFILE_NAME).with_origin(Origin::Library),
    );
    model.set_profile(profile);

    for primitive in PRIMITIVES {
        model.add(
            Element::new(ElementKind::DataType, *primitive)
                .with_namespace(profile)
                .with_origin(Origin::Library),
        );
    }

    for (package, classes, interfaces) in LIBRARY {
        let pkg = model.ensure_package(profile, package);
        let entries = classes
            .iter()
            .map(|name| (name, ElementKind::Class))
            .chain(interfaces.iter().map(|name| (name, ElementKind::Interface)));
        for (name, kind) in entries {
            model.add(
                Element::new(kind, *name)
                    .with_namespace(pkg)
                    .with_origin(Origin::Library),
            );
        }
    }

    profile
}
