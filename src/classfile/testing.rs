//! Minimal classfile writer for tests.
//!
//! Only depends on `std` so integration tests can include it with `#[path]`.

#![allow(dead_code)]

use std::collections::HashMap;

struct Member {
    access: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
    constant: Option<String>,
}

struct Inner {
    inner: String,
    outer: Option<String>,
    simple_name: Option<String>,
    access: u16,
}

/// Builds the bytes of a version 52 classfile.
pub struct ClassBuilder {
    this_class: String,
    access: u16,
    super_class: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<Member>,
    methods: Vec<Member>,
    signature: Option<String>,
    inner_classes: Vec<Inner>,
}

impl ClassBuilder {
    pub fn new(internal_name: &str) -> Self {
        Self {
            this_class: internal_name.to_string(),
            access: 0x0001,
            super_class: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            signature: None,
            inner_classes: Vec::new(),
        }
    }

    pub fn access(mut self, access: u16) -> Self {
        self.access = access;
        self
    }

    pub fn super_class(mut self, name: &str) -> Self {
        self.super_class = Some(name.to_string());
        self
    }

    pub fn interface(mut self, name: &str) -> Self {
        self.interfaces.push(name.to_string());
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn field(self, access: u16, name: &str, descriptor: &str) -> Self {
        self.push_field(access, name, descriptor, None, None)
    }

    pub fn field_sig(self, access: u16, name: &str, descriptor: &str, signature: &str) -> Self {
        self.push_field(access, name, descriptor, Some(signature), None)
    }

    /// A field with a `String` constant value.
    pub fn constant_field(self, access: u16, name: &str, descriptor: &str, value: &str) -> Self {
        self.push_field(access, name, descriptor, None, Some(value))
    }

    pub fn method(mut self, access: u16, name: &str, descriptor: &str) -> Self {
        self.methods.push(Member {
            access,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
            constant: None,
        });
        self
    }

    pub fn method_sig(mut self, access: u16, name: &str, descriptor: &str, signature: &str) -> Self {
        self.methods.push(Member {
            access,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: Some(signature.to_string()),
            constant: None,
        });
        self
    }

    pub fn inner_class(
        mut self,
        inner: &str,
        outer: Option<&str>,
        simple_name: Option<&str>,
        access: u16,
    ) -> Self {
        self.inner_classes.push(Inner {
            inner: inner.to_string(),
            outer: outer.map(str::to_string),
            simple_name: simple_name.map(str::to_string),
            access,
        });
        self
    }

    fn push_field(
        mut self,
        access: u16,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
        constant: Option<&str>,
    ) -> Self {
        self.fields.push(Member {
            access,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: signature.map(str::to_string),
            constant: constant.map(str::to_string),
        });
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut pool = Pool::default();
        let mut body = Vec::new();

        put_u2(&mut body, self.access);
        let this_class = pool.class(&self.this_class);
        put_u2(&mut body, this_class);
        let super_class = self.super_class.as_deref().map_or(0, |s| pool.class(s));
        put_u2(&mut body, super_class);
        put_u2(&mut body, self.interfaces.len() as u16);
        for interface in &self.interfaces {
            let index = pool.class(interface);
            put_u2(&mut body, index);
        }
        for members in [&self.fields, &self.methods] {
            put_u2(&mut body, members.len() as u16);
            for member in members {
                put_u2(&mut body, member.access);
                let name = pool.utf8(&member.name);
                put_u2(&mut body, name);
                let descriptor = pool.utf8(&member.descriptor);
                put_u2(&mut body, descriptor);
                let mut attributes = Vec::new();
                if let Some(signature) = &member.signature {
                    attributes.push(("Signature", pool.utf8(signature)));
                }
                if let Some(constant) = &member.constant {
                    attributes.push(("ConstantValue", pool.string(constant)));
                }
                put_u2(&mut body, attributes.len() as u16);
                for (attr, value) in attributes {
                    let attr = pool.utf8(attr);
                    put_u2(&mut body, attr);
                    put_u4(&mut body, 2);
                    put_u2(&mut body, value);
                }
            }
        }

        let mut attributes: Vec<(u16, Vec<u8>)> = Vec::new();
        if let Some(signature) = &self.signature {
            let name = pool.utf8("Signature");
            let value = pool.utf8(signature);
            attributes.push((name, value.to_be_bytes().to_vec()));
        }
        if !self.inner_classes.is_empty() {
            let name = pool.utf8("InnerClasses");
            let mut data = Vec::new();
            put_u2(&mut data, self.inner_classes.len() as u16);
            for entry in &self.inner_classes {
                let inner = pool.class(&entry.inner);
                put_u2(&mut data, inner);
                let outer = entry.outer.as_deref().map_or(0, |o| pool.class(o));
                put_u2(&mut data, outer);
                let simple = entry.simple_name.as_deref().map_or(0, |s| pool.utf8(s));
                put_u2(&mut data, simple);
                put_u2(&mut data, entry.access);
            }
            attributes.push((name, data));
        }
        put_u2(&mut body, attributes.len() as u16);
        for (name, data) in attributes {
            put_u2(&mut body, name);
            put_u4(&mut body, data.len() as u32);
            body.extend_from_slice(&data);
        }

        let mut out = Vec::new();
        put_u4(&mut out, 0xCAFE_BABE);
        put_u2(&mut out, 0);
        put_u2(&mut out, 52);
        put_u2(&mut out, pool.count);
        out.extend_from_slice(&pool.bytes);
        out.extend_from_slice(&body);
        out
    }
}

struct Pool {
    bytes: Vec<u8>,
    count: u16,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl Default for Pool {
    fn default() -> Self {
        Self {
            bytes: Vec::new(),
            count: 1,
            utf8: HashMap::new(),
            classes: HashMap::new(),
        }
    }
}

impl Pool {
    fn next(&mut self) -> u16 {
        let index = self.count;
        self.count += 1;
        index
    }

    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(&index) = self.utf8.get(value) {
            return index;
        }
        self.bytes.push(1);
        put_u2(&mut self.bytes, value.len() as u16);
        self.bytes.extend_from_slice(value.as_bytes());
        let index = self.next();
        self.utf8.insert(value.to_string(), index);
        index
    }

    fn class(&mut self, name: &str) -> u16 {
        if let Some(&index) = self.classes.get(name) {
            return index;
        }
        let name_index = self.utf8(name);
        self.bytes.push(7);
        put_u2(&mut self.bytes, name_index);
        let index = self.next();
        self.classes.insert(name.to_string(), index);
        index
    }

    fn string(&mut self, value: &str) -> u16 {
        let value_index = self.utf8(value);
        self.bytes.push(8);
        put_u2(&mut self.bytes, value_index);
        self.next()
    }
}

fn put_u2(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_u4(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}
