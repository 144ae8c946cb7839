//! Classfile descriptor and generic signature normalization.
//!
//! Pure string-to-string conversions from the JVM encodings into Java source
//! spelling, shared by the classfile reader and the import drivers:
//!
//! ```text
//! I                                   → int
//! [[Ljava/lang/String;                → java.lang.String[][]
//! (ILjava/util/List;)V                → [int, java.util.List] → void
//! Ljava/util/Map<TK;+Ljava/lang/Number;>;  → java.util.Map<K, ? extends java.lang.Number>
//! ```
//!
//! Nested class separators (`$`) are rendered as `.` so that the result can
//! be fed straight into dotted-name resolution.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("unexpected end of descriptor `{descriptor}`")]
    UnexpectedEnd { descriptor: String },

    #[error("unexpected `{found}` at {position} in descriptor `{descriptor}`")]
    UnexpectedChar {
        descriptor: String,
        position: usize,
        found: char,
    },

    #[error("trailing input at {position} in descriptor `{descriptor}`")]
    TrailingInput { descriptor: String, position: usize },
}

/// Parameter and return types of a method descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub parameters: Vec<String>,
    pub return_type: String,
}

impl MethodDescriptor {
    /// `[params..., return]`
    pub fn into_names(self) -> Vec<String> {
        let mut names = self.parameters;
        names.push(self.return_type);
        names
    }
}

/// A declared type parameter, e.g. `T extends Comparable<T>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    pub bounds: Vec<String>,
}

/// Decoded `Signature` attribute of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub superclass: String,
    pub interfaces: Vec<String>,
}

/// Decoded `Signature` attribute of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<String>,
    pub return_type: String,
    pub throws: Vec<String>,
}

/// Convert an internal class name (`java/util/Map$Entry`) to dotted form.
pub fn internal_name(name: &str) -> String {
    name.replace(['/', '$'], ".")
}

/// Convert a field descriptor to a Java type name.
pub fn field_type(descriptor: &str) -> Result<String, DescriptorError> {
    let mut cursor = Cursor::new(descriptor);
    let ty = cursor.field_type(false)?;
    cursor.finish()?;
    Ok(ty)
}

/// Convert a method descriptor into its parameter and return type names.
pub fn method_descriptor(descriptor: &str) -> Result<MethodDescriptor, DescriptorError> {
    let mut cursor = Cursor::new(descriptor);
    cursor.expect(b'(')?;
    let mut parameters = Vec::new();
    while cursor.peek()? != b')' {
        parameters.push(cursor.field_type(false)?);
    }
    cursor.expect(b')')?;
    let return_type = cursor.field_type(true)?;
    cursor.finish()?;
    Ok(MethodDescriptor {
        parameters,
        return_type,
    })
}

/// Decode a class `Signature` attribute.
pub fn class_signature(signature: &str) -> Result<ClassSignature, DescriptorError> {
    let mut cursor = Cursor::new(signature);
    let type_parameters = cursor.type_parameters()?;
    let superclass = cursor.reference_type()?;
    let mut interfaces = Vec::new();
    while !cursor.at_end() {
        interfaces.push(cursor.reference_type()?);
    }
    Ok(ClassSignature {
        type_parameters,
        superclass,
        interfaces,
    })
}

/// Decode a field `Signature` attribute.
pub fn field_signature(signature: &str) -> Result<String, DescriptorError> {
    let mut cursor = Cursor::new(signature);
    let ty = cursor.reference_type()?;
    cursor.finish()?;
    Ok(ty)
}

/// Decode a method `Signature` attribute.
pub fn method_signature(signature: &str) -> Result<MethodSignature, DescriptorError> {
    let mut cursor = Cursor::new(signature);
    let type_parameters = cursor.type_parameters()?;
    cursor.expect(b'(')?;
    let mut parameters = Vec::new();
    while cursor.peek()? != b')' {
        parameters.push(cursor.java_type(false)?);
    }
    cursor.expect(b')')?;
    let return_type = cursor.java_type(true)?;
    let mut throws = Vec::new();
    while !cursor.at_end() {
        cursor.expect(b'^')?;
        throws.push(cursor.reference_type()?);
    }
    Ok(MethodSignature {
        type_parameters,
        parameters,
        return_type,
        throws,
    })
}

// ============================================================================
// CURSOR
// ============================================================================

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Result<u8, DescriptorError> {
        self.text
            .as_bytes()
            .get(self.pos)
            .copied()
            .ok_or_else(|| DescriptorError::UnexpectedEnd {
                descriptor: self.text.to_string(),
            })
    }

    fn bump(&mut self) -> Result<u8, DescriptorError> {
        let b = self.peek()?;
        self.pos += 1;
        Ok(b)
    }

    fn unexpected(&self, at: usize) -> DescriptorError {
        DescriptorError::UnexpectedChar {
            descriptor: self.text.to_string(),
            position: at,
            found: self.text[at..].chars().next().unwrap_or('\0'),
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), DescriptorError> {
        let at = self.pos;
        if self.bump()? == expected {
            Ok(())
        } else {
            Err(self.unexpected(at))
        }
    }

    fn finish(&self) -> Result<(), DescriptorError> {
        if self.at_end() {
            Ok(())
        } else {
            Err(DescriptorError::TrailingInput {
                descriptor: self.text.to_string(),
                position: self.pos,
            })
        }
    }

    /// Characters up to (not including) any byte in `stops`.
    fn identifier(&mut self, stops: &[u8]) -> Result<&'a str, DescriptorError> {
        let start = self.pos;
        while !stops.contains(&self.peek()?) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.unexpected(start));
        }
        Ok(&self.text[start..self.pos])
    }

    fn base_type(b: u8, allow_void: bool) -> Option<&'static str> {
        Some(match b {
            b'B' => "byte",
            b'C' => "char",
            b'D' => "double",
            b'F' => "float",
            b'I' => "int",
            b'J' => "long",
            b'S' => "short",
            b'Z' => "boolean",
            b'V' if allow_void => "void",
            _ => return None,
        })
    }

    // ── Plain descriptors ───────────────────────────────────────────

    fn field_type(&mut self, allow_void: bool) -> Result<String, DescriptorError> {
        let at = self.pos;
        let b = self.bump()?;
        if let Some(base) = Self::base_type(b, allow_void) {
            return Ok(base.to_string());
        }
        match b {
            b'L' => {
                let name = self.identifier(b";")?;
                self.expect(b';')?;
                Ok(internal_name(name))
            }
            b'[' => Ok(format!("{}[]", self.field_type(false)?)),
            _ => Err(self.unexpected(at)),
        }
    }

    // ── Generic signatures ──────────────────────────────────────────

    fn type_parameters(&mut self) -> Result<Vec<TypeParameter>, DescriptorError> {
        let mut params = Vec::new();
        if self.at_end() || self.peek()? != b'<' {
            return Ok(params);
        }
        self.bump()?;
        while self.peek()? != b'>' {
            let name = self.identifier(b":")?.to_string();
            let mut bounds = Vec::new();
            // class bound (may be empty), then interface bounds
            while !self.at_end() && self.peek()? == b':' {
                self.bump()?;
                if matches!(self.peek()?, b'L' | b'T' | b'[') {
                    bounds.push(self.reference_type()?);
                }
            }
            bounds.retain(|b| b != "java.lang.Object");
            params.push(TypeParameter { name, bounds });
        }
        self.bump()?;
        Ok(params)
    }

    fn java_type(&mut self, allow_void: bool) -> Result<String, DescriptorError> {
        let b = self.peek()?;
        match Self::base_type(b, allow_void) {
            Some(base) => {
                self.bump()?;
                Ok(base.to_string())
            }
            None => self.reference_type(),
        }
    }

    fn reference_type(&mut self) -> Result<String, DescriptorError> {
        let at = self.pos;
        match self.bump()? {
            b'L' => self.class_type_body(),
            b'T' => {
                let name = self.identifier(b";")?.to_string();
                self.expect(b';')?;
                Ok(name)
            }
            b'[' => Ok(format!("{}[]", self.java_type(false)?)),
            _ => Err(self.unexpected(at)),
        }
    }

    /// Everything after the leading `L` of a class type signature.
    fn class_type_body(&mut self) -> Result<String, DescriptorError> {
        let mut out = internal_name(self.identifier(b"<.;")?);
        loop {
            match self.peek()? {
                b'<' => {
                    out.push_str(&self.type_arguments()?);
                }
                b'.' => {
                    self.bump()?;
                    out.push('.');
                    out.push_str(&internal_name(self.identifier(b"<.;")?));
                }
                b';' => {
                    self.bump()?;
                    return Ok(out);
                }
                _ => return Err(self.unexpected(self.pos)),
            }
        }
    }

    fn type_arguments(&mut self) -> Result<String, DescriptorError> {
        self.expect(b'<')?;
        let mut args = Vec::new();
        while self.peek()? != b'>' {
            let arg = match self.peek()? {
                b'*' => {
                    self.bump()?;
                    "?".to_string()
                }
                b'+' => {
                    self.bump()?;
                    format!("? extends {}", self.reference_type()?)
                }
                b'-' => {
                    self.bump()?;
                    format!("? super {}", self.reference_type()?)
                }
                _ => self.reference_type()?,
            };
            args.push(arg);
        }
        self.bump()?;
        Ok(format!("<{}>", args.join(", ")))
    }
}
