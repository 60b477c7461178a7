//! Runtime descriptions of native kinds and host-side boxed values.
//!
//! [`Kind`] names the nine JNI scalar kinds and carries the per-kind
//! dispatch table (size, alignment, descriptor character). [`NativeValue`]
//! is a kind-tagged native scalar, the boxed form of a cell. [`HostValue`]
//! is what the embedding scripting runtime hands to setters and receives
//! from getters.

use std::fmt;
use std::mem::{align_of, size_of};

use crate::error::{ArgumentError, Error, Result};
use crate::sys::jni;

/// The closed set of JNI scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Object,
}

/// Static facts about one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    /// The `jni.h` type name, e.g. `"jint"`.
    pub name: &'static str,
    /// Descriptor character used in method signatures.
    pub signature: char,
    pub size: usize,
    pub align: usize,
}

const fn info<T>(name: &'static str, signature: char) -> KindInfo {
    KindInfo {
        name,
        signature,
        size: size_of::<T>(),
        align: align_of::<T>(),
    }
}

static KIND_TABLE: [KindInfo; 9] = [
    info::<jni::jboolean>("jboolean", 'Z'),
    info::<jni::jbyte>("jbyte", 'B'),
    info::<jni::jchar>("jchar", 'C'),
    info::<jni::jshort>("jshort", 'S'),
    info::<jni::jint>("jint", 'I'),
    info::<jni::jlong>("jlong", 'J'),
    info::<jni::jfloat>("jfloat", 'F'),
    info::<jni::jdouble>("jdouble", 'D'),
    info::<jni::jobject>("jobject", 'L'),
];

impl Kind {
    pub const ALL: [Kind; 9] = [
        Kind::Boolean,
        Kind::Byte,
        Kind::Char,
        Kind::Short,
        Kind::Int,
        Kind::Long,
        Kind::Float,
        Kind::Double,
        Kind::Object,
    ];

    pub fn info(self) -> &'static KindInfo {
        &KIND_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn size(self) -> usize {
        self.info().size
    }

    pub fn align(self) -> usize {
        self.info().align
    }

    /// Maps a primitive descriptor character (`Z`, `B`, ... `D`) to its kind.
    pub fn from_signature(c: char) -> Option<Kind> {
        match c {
            'Z' => Some(Kind::Boolean),
            'B' => Some(Kind::Byte),
            'C' => Some(Kind::Char),
            'S' => Some(Kind::Short),
            'I' => Some(Kind::Int),
            'J' => Some(Kind::Long),
            'F' => Some(Kind::Float),
            'D' => Some(Kind::Double),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A native scalar tagged with its kind.
///
/// Object handles are carried as their numeric address so the value can be
/// stored and compared without holding a raw pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeValue {
    Boolean(jni::jboolean),
    Byte(jni::jbyte),
    Char(jni::jchar),
    Short(jni::jshort),
    Int(jni::jint),
    Long(jni::jlong),
    Float(jni::jfloat),
    Double(jni::jdouble),
    Object(usize),
}

impl NativeValue {
    pub fn kind(&self) -> Kind {
        match self {
            NativeValue::Boolean(_) => Kind::Boolean,
            NativeValue::Byte(_) => Kind::Byte,
            NativeValue::Char(_) => Kind::Char,
            NativeValue::Short(_) => Kind::Short,
            NativeValue::Int(_) => Kind::Int,
            NativeValue::Long(_) => Kind::Long,
            NativeValue::Float(_) => Kind::Float,
            NativeValue::Double(_) => Kind::Double,
            NativeValue::Object(_) => Kind::Object,
        }
    }

    /// The all-zero value of `kind`.
    pub fn zero(kind: Kind) -> NativeValue {
        match kind {
            Kind::Boolean => NativeValue::Boolean(0),
            Kind::Byte => NativeValue::Byte(0),
            Kind::Char => NativeValue::Char(0),
            Kind::Short => NativeValue::Short(0),
            Kind::Int => NativeValue::Int(0),
            Kind::Long => NativeValue::Long(0),
            Kind::Float => NativeValue::Float(0.0),
            Kind::Double => NativeValue::Double(0.0),
            Kind::Object => NativeValue::Object(0),
        }
    }

    /// False iff the bit pattern is all zero. `-0.0` is therefore truthy.
    pub fn is_truthy(&self) -> bool {
        match *self {
            NativeValue::Boolean(v) => v != 0,
            NativeValue::Byte(v) => v != 0,
            NativeValue::Char(v) => v != 0,
            NativeValue::Short(v) => v != 0,
            NativeValue::Int(v) => v != 0,
            NativeValue::Long(v) => v != 0,
            NativeValue::Float(v) => v.to_bits() != 0,
            NativeValue::Double(v) => v.to_bits() != 0,
            NativeValue::Object(v) => v != 0,
        }
    }
}

/// A value boxed by the host runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    None,
    Bool(bool),
    Int(i128),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// A boxed native cell. Same-kind setters copy its bits verbatim.
    Native(NativeValue),
}

impl HostValue {
    /// Host-side type name used in conversion errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::None => "None",
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Float(_) => "float",
            HostValue::Str(_) => "str",
            HostValue::Bytes(_) => "bytes",
            HostValue::Native(v) => v.kind().name(),
        }
    }

    /// Coerces to a 64-bit signed integer, the widest native integer.
    pub fn as_long(&self) -> Result<i64> {
        match self {
            HostValue::Bool(b) => Ok(i64::from(*b)),
            HostValue::Int(v) => i64::try_from(*v).map_err(|_| Error::Conversion {
                expected: "a 64-bit integer",
                found: "an out-of-range int",
            }),
            other => Err(Error::Conversion {
                expected: "int",
                found: other.type_name(),
            }),
        }
    }

    pub fn as_double(&self) -> Result<f64> {
        match self {
            HostValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            HostValue::Int(v) => Ok(*v as f64),
            HostValue::Float(v) => Ok(*v),
            other => Err(Error::Conversion {
                expected: "float",
                found: other.type_name(),
            }),
        }
    }

    /// Coerces to a single UTF-16 code unit.
    pub fn as_utf16_unit(&self) -> Result<jni::jchar> {
        match self {
            HostValue::Str(s) => {
                let mut units = s.encode_utf16();
                match (units.next(), units.next()) {
                    (Some(unit), None) => Ok(unit),
                    _ => Err(ArgumentError::CharLength {
                        len: s.encode_utf16().count(),
                    }
                    .into()),
                }
            }
            other => Err(Error::Conversion {
                expected: "str",
                found: other.type_name(),
            }),
        }
    }

    /// Coerces to a pointer-width address; `None` is the null address.
    ///
    /// Negative integers that fit `isize` wrap to their two's complement
    /// address. Anything wider than the native pointer is an overflow.
    pub fn as_address(&self, kind: Kind) -> Result<usize> {
        match self {
            HostValue::None => Ok(0),
            HostValue::Bool(b) => Ok(usize::from(*b)),
            HostValue::Int(v) => {
                let value = *v;
                if let Ok(address) = usize::try_from(value) {
                    Ok(address)
                } else if let Ok(signed) = isize::try_from(value) {
                    Ok(signed as usize)
                } else {
                    Err(ArgumentError::Overflow { value, kind }.into())
                }
            }
            other => Err(Error::Conversion {
                expected: "int or None",
                found: other.type_name(),
            }),
        }
    }
}

impl From<NativeValue> for HostValue {
    fn from(value: NativeValue) -> Self {
        HostValue::Native(value)
    }
}

impl From<bool> for HostValue {
    fn from(value: bool) -> Self {
        HostValue::Bool(value)
    }
}

impl From<i64> for HostValue {
    fn from(value: i64) -> Self {
        HostValue::Int(i128::from(value))
    }
}

impl From<f64> for HostValue {
    fn from(value: f64) -> Self {
        HostValue::Float(value)
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        HostValue::Str(value.to_owned())
    }
}
