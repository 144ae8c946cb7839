//! Common Java sources for tests.

pub const ENGINE: &str = "package p;\npublic class Engine {}\n";

pub const CAR: &str = r#"
package p;

import java.util.List;

/** A car. */
public class Car {
    private Engine engine;
    private int wheels;
    private List<String> owners;

    public Car(Engine engine) {
        this.engine = engine;
    }

    public Engine getEngine() {
        return engine;
    }
}
"#;

pub const OUTER_WITH_INNER: &str = r#"
package com.example;

public class Foo {
    public static class Bar {}
}
"#;

pub const USES_INNER: &str = r#"
package q;

public class User {
    com.example.Foo.Bar bar;
}
"#;
