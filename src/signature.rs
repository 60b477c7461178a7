//! JVM method descriptors, e.g. `(ILjava/lang/String;[B)V`.
//!
//! Parsing maps each descriptor element to the JNI type a native
//! implementation receives for it: primitives to their scalar kind,
//! `java/lang/String` and `java/lang/Class` to `jstring`/`jclass`, other
//! references to `jobject`, one-dimensional primitive arrays to the typed
//! array handle, and every other array to `jobjectArray`.

use std::fmt;

use crate::error::{ArgumentError, Result};
use crate::value::Kind;

/// The JNI-side type of one descriptor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Only valid as a return type.
    Void,
    Primitive(Kind),
    Object,
    String,
    Class,
    /// One-dimensional array of a primitive kind.
    Array(Kind),
    ObjectArray,
}

impl ValueType {
    /// The `jni.h` type name.
    pub fn jni_name(self) -> &'static str {
        match self {
            ValueType::Void => "void",
            ValueType::Primitive(kind) => kind.name(),
            ValueType::Object => "jobject",
            ValueType::String => "jstring",
            ValueType::Class => "jclass",
            ValueType::Array(kind) => match kind {
                Kind::Boolean => "jbooleanArray",
                Kind::Byte => "jbyteArray",
                Kind::Char => "jcharArray",
                Kind::Short => "jshortArray",
                Kind::Int => "jintArray",
                Kind::Long => "jlongArray",
                Kind::Float => "jfloatArray",
                Kind::Double => "jdoubleArray",
                Kind::Object => "jobjectArray",
            },
            ValueType::ObjectArray => "jobjectArray",
        }
    }

    /// The scalar kind this type occupies in a `jvalue`, `None` for void.
    pub fn kind(self) -> Option<Kind> {
        match self {
            ValueType::Void => None,
            ValueType::Primitive(kind) => Some(kind),
            _ => Some(Kind::Object),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.jni_name())
    }
}

/// A parsed method descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub ret: ValueType,
    pub args: Vec<ValueType>,
}

impl MethodSignature {
    pub fn parse(signature: &str) -> Result<Self> {
        parse(signature)
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    signature: &'a str,
}

impl<'a> Reader<'a> {
    fn new(signature: &'a str) -> Self {
        Self {
            data: signature.as_bytes(),
            pos: 0,
            signature,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn error(&self, reason: impl Into<String>) -> ArgumentError {
        ArgumentError::InvalidSignature {
            signature: self.signature.to_owned(),
            reason: reason.into(),
        }
    }

    fn expect(&mut self, b: u8) -> Result<(), ArgumentError> {
        match self.bump() {
            Some(found) if found == b => Ok(()),
            Some(found) => Err(self.error(format!(
                "expected '{}' at offset {}, found '{}'",
                b as char,
                self.pos - 1,
                found as char
            ))),
            None => Err(self.error(format!("expected '{}', found end of input", b as char))),
        }
    }

    fn read_type(&mut self, allow_void: bool) -> Result<ValueType, ArgumentError> {
        let mut dims = 0usize;
        while self.peek() == Some(b'[') {
            self.pos += 1;
            dims += 1;
        }
        let start = self.pos;
        let tag = self
            .bump()
            .ok_or_else(|| self.error("unexpected end of input"))?;
        match tag {
            b'V' if allow_void && dims == 0 => Ok(ValueType::Void),
            b'L' => {
                let rest = &self.data[self.pos..];
                let end = rest
                    .iter()
                    .position(|&b| b == b';')
                    .ok_or_else(|| self.error("unterminated class name"))?;
                let class = &self.signature[self.pos..self.pos + end];
                self.pos += end + 1;
                if class.is_empty() {
                    return Err(self.error(format!("empty class name at offset {start}")));
                }
                Ok(match (dims, class) {
                    (0, "java/lang/String") => ValueType::String,
                    (0, "java/lang/Class") => ValueType::Class,
                    (0, _) => ValueType::Object,
                    _ => ValueType::ObjectArray,
                })
            }
            other => match Kind::from_signature(other as char) {
                Some(kind) => Ok(match dims {
                    0 => ValueType::Primitive(kind),
                    1 => ValueType::Array(kind),
                    _ => ValueType::ObjectArray,
                }),
                None => Err(self.error(format!(
                    "invalid type '{}' at offset {start}",
                    other as char
                ))),
            },
        }
    }
}

/// Parses a method descriptor.
pub fn parse(signature: &str) -> Result<MethodSignature> {
    let mut r = Reader::new(signature);
    r.expect(b'(')?;

    let mut args = Vec::new();
    loop {
        match r.peek() {
            Some(b')') => {
                r.pos += 1;
                break;
            }
            Some(_) => args.push(r.read_type(false)?),
            None => return Err(r.error("missing ')'").into()),
        }
    }

    let ret = r.read_type(true)?;
    if r.pos != r.data.len() {
        return Err(r
            .error(format!("trailing characters at offset {}", r.pos))
            .into());
    }
    Ok(MethodSignature { ret, args })
}
