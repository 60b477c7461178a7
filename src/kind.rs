//! Compile-time kind markers for [`NativeCell`](crate::cell::NativeCell).
//!
//! Each marker ties a [`Kind`] to its `jni.h` representation and to the
//! host conversion rule for that kind. The trait is sealed: the set of
//! kinds is fixed by the ABI.

use std::fmt;
use std::ptr;

use crate::error::{Error, Result};
use crate::sys::jni;
use crate::value::{HostValue, Kind, NativeValue};

mod sealed {
    pub trait Sealed {}
}

/// A JNI scalar kind.
pub trait NativeKind: sealed::Sealed + Copy + fmt::Debug + 'static {
    /// The exact `jni.h` type.
    type Native: Copy + PartialEq + fmt::Debug;

    const KIND: Kind;
    const ZERO: Self::Native;

    /// True iff every bit of `value` is zero.
    fn is_zero(value: Self::Native) -> bool;

    /// Converts a host value. A boxed cell of the same kind is copied
    /// bit-for-bit; a boxed cell of another kind is rejected.
    fn from_host(value: &HostValue) -> Result<Self::Native>;

    fn to_host(value: Self::Native) -> HostValue;

    fn to_native(value: Self::Native) -> NativeValue;

    fn from_native(value: NativeValue) -> Option<Self::Native>;
}

fn kind_mismatch(expected: Kind, found: &NativeValue) -> Error {
    Error::Conversion {
        expected: expected.name(),
        found: found.kind().name(),
    }
}

macro_rules! integer_kind {
    ($(#[$doc:meta])* $marker:ident, $native:ty, $variant:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $marker;

        impl sealed::Sealed for $marker {}

        impl NativeKind for $marker {
            type Native = $native;

            const KIND: Kind = Kind::$variant;
            const ZERO: $native = 0;

            fn is_zero(value: $native) -> bool {
                value == 0
            }

            fn from_host(value: &HostValue) -> Result<$native> {
                match value {
                    HostValue::Native(NativeValue::$variant(v)) => Ok(*v),
                    HostValue::Native(other) => Err(kind_mismatch(Kind::$variant, other)),
                    // Two's-complement truncation, as a C cast would do.
                    other => Ok(other.as_long()? as $native),
                }
            }

            fn to_host(value: $native) -> HostValue {
                HostValue::Int(i128::from(value))
            }

            fn to_native(value: $native) -> NativeValue {
                NativeValue::$variant(value)
            }

            fn from_native(value: NativeValue) -> Option<$native> {
                match value {
                    NativeValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

macro_rules! float_kind {
    ($(#[$doc:meta])* $marker:ident, $native:ty, $variant:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $marker;

        impl sealed::Sealed for $marker {}

        impl NativeKind for $marker {
            type Native = $native;

            const KIND: Kind = Kind::$variant;
            const ZERO: $native = 0.0;

            fn is_zero(value: $native) -> bool {
                value.to_bits() == 0
            }

            fn from_host(value: &HostValue) -> Result<$native> {
                match value {
                    HostValue::Native(NativeValue::$variant(v)) => Ok(*v),
                    HostValue::Native(other) => Err(kind_mismatch(Kind::$variant, other)),
                    other => Ok(other.as_double()? as $native),
                }
            }

            fn to_host(value: $native) -> HostValue {
                HostValue::Float(f64::from(value))
            }

            fn to_native(value: $native) -> NativeValue {
                NativeValue::$variant(value)
            }

            fn from_native(value: NativeValue) -> Option<$native> {
                match value {
                    NativeValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

integer_kind!(
    /// `jbyte`: signed 8-bit.
    JByte, jni::jbyte, Byte
);
integer_kind!(
    /// `jshort`: signed 16-bit.
    JShort, jni::jshort, Short
);
integer_kind!(
    /// `jint` (and `jsize`): signed 32-bit.
    JInt, jni::jint, Int
);
integer_kind!(
    /// `jlong`: signed 64-bit.
    JLong, jni::jlong, Long
);
float_kind!(
    /// `jfloat`: IEEE-754 binary32.
    JFloat, jni::jfloat, Float
);
float_kind!(
    /// `jdouble`: IEEE-754 binary64.
    JDouble, jni::jdouble, Double
);

/// `jboolean`: one unsigned byte. Host integers coerce to `JNI_TRUE` when
/// nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct JBoolean;

impl sealed::Sealed for JBoolean {}

impl NativeKind for JBoolean {
    type Native = jni::jboolean;

    const KIND: Kind = Kind::Boolean;
    const ZERO: jni::jboolean = jni::JNI_FALSE;

    fn is_zero(value: jni::jboolean) -> bool {
        value == 0
    }

    fn from_host(value: &HostValue) -> Result<jni::jboolean> {
        match value {
            HostValue::Native(NativeValue::Boolean(v)) => Ok(*v),
            HostValue::Native(other) => Err(kind_mismatch(Kind::Boolean, other)),
            other => Ok(if other.as_long()? != 0 {
                jni::JNI_TRUE
            } else {
                jni::JNI_FALSE
            }),
        }
    }

    fn to_host(value: jni::jboolean) -> HostValue {
        HostValue::Int(i128::from(value))
    }

    fn to_native(value: jni::jboolean) -> NativeValue {
        NativeValue::Boolean(value)
    }

    fn from_native(value: NativeValue) -> Option<jni::jboolean> {
        match value {
            NativeValue::Boolean(v) => Some(v),
            _ => None,
        }
    }
}

/// `jchar`: one UTF-16 code unit. Host strings must be exactly one unit long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct JChar;

impl sealed::Sealed for JChar {}

impl NativeKind for JChar {
    type Native = jni::jchar;

    const KIND: Kind = Kind::Char;
    const ZERO: jni::jchar = 0;

    fn is_zero(value: jni::jchar) -> bool {
        value == 0
    }

    fn from_host(value: &HostValue) -> Result<jni::jchar> {
        match value {
            HostValue::Native(NativeValue::Char(v)) => Ok(*v),
            HostValue::Native(other) => Err(kind_mismatch(Kind::Char, other)),
            other => other.as_utf16_unit(),
        }
    }

    /// Lone surrogates have no `str` form and come back boxed, so writing
    /// the result back stores the same code unit.
    fn to_host(value: jni::jchar) -> HostValue {
        match char::from_u32(u32::from(value)) {
            Some(c) => HostValue::Str(c.to_string()),
            None => HostValue::Native(NativeValue::Char(value)),
        }
    }

    fn to_native(value: jni::jchar) -> NativeValue {
        NativeValue::Char(value)
    }

    fn from_native(value: NativeValue) -> Option<jni::jchar> {
        match value {
            NativeValue::Char(v) => Some(v),
            _ => None,
        }
    }
}

/// `jobject`: a pointer-sized opaque reference. `None` on the host side is
/// the null pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct JPointer;

impl sealed::Sealed for JPointer {}

impl NativeKind for JPointer {
    type Native = jni::jobject;

    const KIND: Kind = Kind::Object;
    const ZERO: jni::jobject = ptr::null_mut();

    fn is_zero(value: jni::jobject) -> bool {
        value.is_null()
    }

    fn from_host(value: &HostValue) -> Result<jni::jobject> {
        match value {
            HostValue::Native(NativeValue::Object(address)) => Ok(*address as jni::jobject),
            HostValue::Native(other) => Err(kind_mismatch(Kind::Object, other)),
            other => Ok(other.as_address(Kind::Object)? as jni::jobject),
        }
    }

    fn to_host(value: jni::jobject) -> HostValue {
        if value.is_null() {
            HostValue::None
        } else {
            HostValue::Int(value as usize as i128)
        }
    }

    fn to_native(value: jni::jobject) -> NativeValue {
        NativeValue::Object(value as usize)
    }

    fn from_native(value: NativeValue) -> Option<jni::jobject> {
        match value {
            NativeValue::Object(address) => Some(address as jni::jobject),
            _ => None,
        }
    }
}
