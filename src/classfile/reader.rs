//! Classfile reader.
//!
//! Decodes the parts of a `.class` file the modeller cares about: the class
//! header, the constant pool entries it points into, fields, methods and the
//! `Signature`, `ConstantValue`, `SourceFile` and `InnerClasses` attributes.
//! Code attributes are skipped by length.
//!
//! ```text
//! ClassFile {
//!     u4 magic (0xCAFEBABE)
//!     u2 minor, major
//!     constant pool (count - 1 entries, long/double take two slots)
//!     u2 access_flags, this_class, super_class
//!     interfaces, fields, methods, attributes
//! }
//! ```

use thiserror::Error;

use crate::descriptor::{DescriptorError, internal_name};
use crate::import::ModellerError;

const MAGIC: u32 = 0xCAFE_BABE;

/// JVM access flags (JVMS §4.1, §4.5, §4.6).
pub mod access {
    pub const PUBLIC: u16 = 0x0001;
    pub const PRIVATE: u16 = 0x0002;
    pub const PROTECTED: u16 = 0x0004;
    pub const STATIC: u16 = 0x0008;
    pub const FINAL: u16 = 0x0010;
    pub const BRIDGE: u16 = 0x0040;
    pub const INTERFACE: u16 = 0x0200;
    pub const ABSTRACT: u16 = 0x0400;
    pub const SYNTHETIC: u16 = 0x1000;
    pub const ANNOTATION: u16 = 0x2000;
    pub const ENUM: u16 = 0x4000;
}

#[derive(Debug, Error)]
pub enum ClassfileError {
    #[error("unexpected end of classfile at offset {0}")]
    Truncated(usize),

    #[error("bad magic number {0:#010x}")]
    BadMagic(u32),

    #[error("invalid constant pool index {0}")]
    BadIndex(u16),

    #[error("unsupported constant pool tag {tag} at index {index}")]
    BadTag { tag: u8, index: u16 },

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Modeller(#[from] ModellerError),
}

// ============================================================================
// DECODED TYPES
// ============================================================================

/// A field or method.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberInfo {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub signature: Option<String>,
    /// Rendered `ConstantValue`, fields only.
    pub constant_value: Option<String>,
}

impl MemberInfo {
    pub fn is_synthetic(&self) -> bool {
        self.access_flags & access::SYNTHETIC != 0
    }
}

/// One `InnerClasses` entry, names in internal form.
#[derive(Clone, Debug, PartialEq)]
pub struct InnerClassInfo {
    pub inner: String,
    /// `None` for local and anonymous classes.
    pub outer: Option<String>,
    /// `None` for anonymous classes.
    pub simple_name: Option<String>,
    pub access_flags: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassFile {
    pub access_flags: u16,
    /// Internal name, e.g. `java/util/Map$Entry`.
    pub this_class: String,
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<MemberInfo>,
    pub methods: Vec<MemberInfo>,
    pub signature: Option<String>,
    pub source_file: Option<String>,
    pub inner_classes: Vec<InnerClassInfo>,
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> Result<Self, ClassfileError> {
        let mut input = Input { bytes, pos: 0 };
        let magic = input.u4()?;
        if magic != MAGIC {
            return Err(ClassfileError::BadMagic(magic));
        }
        input.u2()?; // minor
        input.u2()?; // major
        let pool = ConstantPool::read(&mut input)?;

        let access_flags = input.u2()?;
        let this_class = pool.class_name(input.u2()?)?.to_string();
        let super_index = input.u2()?;
        let super_class = match super_index {
            0 => None,
            index => Some(pool.class_name(index)?.to_string()),
        };

        let interface_count = input.u2()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            interfaces.push(pool.class_name(input.u2()?)?.to_string());
        }

        let fields = read_members(&mut input, &pool)?;
        let methods = read_members(&mut input, &pool)?;

        let mut class = ClassFile {
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            signature: None,
            source_file: None,
            inner_classes: Vec::new(),
        };

        let attribute_count = input.u2()?;
        for _ in 0..attribute_count {
            let name = pool.utf8(input.u2()?)?;
            let length = input.u4()? as usize;
            let mut body = Input {
                bytes: input.take(length)?,
                pos: 0,
            };
            match name {
                "Signature" => class.signature = Some(pool.utf8(body.u2()?)?.to_string()),
                "SourceFile" => class.source_file = Some(pool.utf8(body.u2()?)?.to_string()),
                "InnerClasses" => class.inner_classes = read_inner_classes(&mut body, &pool)?,
                _ => {}
            }
        }
        Ok(class)
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags & access::INTERFACE != 0
    }

    pub fn is_annotation(&self) -> bool {
        self.access_flags & access::ANNOTATION != 0
    }

    pub fn is_enum(&self) -> bool {
        self.access_flags & access::ENUM != 0
    }

    /// Dotted name with nested classes separated by `.`.
    pub fn java_name(&self) -> String {
        internal_name(&self.this_class)
    }

    /// The `InnerClasses` entry describing this class itself, if nested.
    pub fn own_inner_entry(&self) -> Option<&InnerClassInfo> {
        self.inner_classes.iter().find(|e| e.inner == self.this_class)
    }
}

// ============================================================================
// CONSTANT POOL
// ============================================================================

#[derive(Clone, Debug)]
enum Constant {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(u16),
    String(u16),
    /// References, handles and other entries the reader never follows.
    Other,
    /// Second slot of a long or double.
    Unusable,
}

struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    fn read(input: &mut Input<'_>) -> Result<Self, ClassfileError> {
        let count = input.u2()?;
        let mut entries = Vec::with_capacity(count as usize);
        entries.push(Constant::Unusable);

        let mut index = 1;
        while index < count {
            let tag = input.u1()?;
            let constant = match tag {
                1 => {
                    let length = input.u2()? as usize;
                    Constant::Utf8(String::from_utf8_lossy(input.take(length)?).into_owned())
                }
                3 => Constant::Integer(input.u4()? as i32),
                4 => Constant::Float(f32::from_bits(input.u4()?)),
                5 => Constant::Long(input.u8()? as i64),
                6 => Constant::Double(f64::from_bits(input.u8()?)),
                7 => Constant::Class(input.u2()?),
                8 => Constant::String(input.u2()?),
                9..=12 | 17 | 18 => {
                    input.take(4)?;
                    Constant::Other
                }
                15 => {
                    input.take(3)?;
                    Constant::Other
                }
                16 | 19 | 20 => {
                    input.take(2)?;
                    Constant::Other
                }
                tag => return Err(ClassfileError::BadTag { tag, index }),
            };
            let wide = matches!(constant, Constant::Long(_) | Constant::Double(_));
            entries.push(constant);
            index += 1;
            if wide {
                entries.push(Constant::Unusable);
                index += 1;
            }
        }
        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&Constant, ClassfileError> {
        match self.entries.get(index as usize) {
            Some(Constant::Unusable) | None => Err(ClassfileError::BadIndex(index)),
            Some(c) => Ok(c),
        }
    }

    fn utf8(&self, index: u16) -> Result<&str, ClassfileError> {
        match self.get(index)? {
            Constant::Utf8(s) => Ok(s),
            _ => Err(ClassfileError::BadIndex(index)),
        }
    }

    fn class_name(&self, index: u16) -> Result<&str, ClassfileError> {
        match self.get(index)? {
            Constant::Class(name) => self.utf8(*name),
            _ => Err(ClassfileError::BadIndex(index)),
        }
    }

    /// Java source rendering of a `ConstantValue`.
    fn literal(&self, index: u16, descriptor: &str) -> Result<String, ClassfileError> {
        Ok(match self.get(index)? {
            Constant::Integer(v) => match descriptor {
                "Z" => (*v != 0).to_string(),
                "C" => match char::from_u32(*v as u32) {
                    Some(c) => format!("'{}'", c.escape_default()),
                    None => v.to_string(),
                },
                _ => v.to_string(),
            },
            Constant::Long(v) => format!("{v}L"),
            Constant::Float(v) => format!("{v:?}f"),
            Constant::Double(v) => format!("{v:?}"),
            Constant::String(s) => format!("\"{}\"", self.utf8(*s)?.escape_default()),
            _ => return Err(ClassfileError::BadIndex(index)),
        })
    }
}

fn read_members(
    input: &mut Input<'_>,
    pool: &ConstantPool,
) -> Result<Vec<MemberInfo>, ClassfileError> {
    let count = input.u2()?;
    let mut members = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let access_flags = input.u2()?;
        let name = pool.utf8(input.u2()?)?.to_string();
        let descriptor = pool.utf8(input.u2()?)?.to_string();
        let mut member = MemberInfo {
            access_flags,
            name,
            descriptor,
            signature: None,
            constant_value: None,
        };

        let attribute_count = input.u2()?;
        for _ in 0..attribute_count {
            let attr = pool.utf8(input.u2()?)?;
            let length = input.u4()? as usize;
            let mut body = Input {
                bytes: input.take(length)?,
                pos: 0,
            };
            match attr {
                "Signature" => member.signature = Some(pool.utf8(body.u2()?)?.to_string()),
                "ConstantValue" => {
                    member.constant_value = Some(pool.literal(body.u2()?, &member.descriptor)?)
                }
                _ => {}
            }
        }
        members.push(member);
    }
    Ok(members)
}

fn read_inner_classes(
    input: &mut Input<'_>,
    pool: &ConstantPool,
) -> Result<Vec<InnerClassInfo>, ClassfileError> {
    let count = input.u2()?;
    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let inner = pool.class_name(input.u2()?)?.to_string();
        let outer = match input.u2()? {
            0 => None,
            index => Some(pool.class_name(index)?.to_string()),
        };
        let simple_name = match input.u2()? {
            0 => None,
            index => Some(pool.utf8(index)?.to_string()),
        };
        let access_flags = input.u2()?;
        entries.push(InnerClassInfo {
            inner,
            outer,
            simple_name,
            access_flags,
        });
    }
    Ok(entries)
}

// ============================================================================
// BYTE INPUT
// ============================================================================

struct Input<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Input<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], ClassfileError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(ClassfileError::Truncated(self.pos))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u1(&mut self) -> Result<u8, ClassfileError> {
        Ok(self.take(1)?[0])
    }

    fn u2(&mut self) -> Result<u16, ClassfileError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u4(&mut self) -> Result<u32, ClassfileError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u8(&mut self) -> Result<u64, ClassfileError> {
        let b = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(b);
        Ok(u64::from_be_bytes(buf))
    }
}
