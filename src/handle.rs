//! Opaque JNI references and identifiers.
//!
//! Every JNI reference type (`jobject`, `jclass`, `jstring`, the array
//! types, `jweak`) and both member identifiers (`jfieldID`, `jmethodID`) are
//! pointer-sized values that this crate never dereferences. They share one
//! representation, [`Handle<T>`], distinguished only by a zero-sized tag.

use std::ffi::c_void;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ptr;

use crate::cell::CData;
use crate::error::Result;
use crate::value::{HostValue, Kind, NativeValue};

mod sealed {
    pub trait Sealed {}
}

/// Static tag naming what a [`Handle`] refers to.
pub trait HandleKind: sealed::Sealed + 'static {
    /// The `jni.h` type name.
    const NAME: &'static str;
}

macro_rules! handle_kinds {
    ($($(#[$doc:meta])* $tag:ident => $name:literal, $alias:ident;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub enum $tag {}

            impl sealed::Sealed for $tag {}

            impl HandleKind for $tag {
                const NAME: &'static str = $name;
            }

            pub type $alias = Handle<$tag>;
        )*
    };
}

handle_kinds! {
    /// Any object reference.
    Object => "jobject", JObject;
    Class => "jclass", JClass;
    Throwable => "jthrowable", JThrowable;
    JavaString => "jstring", JString;
    Array => "jarray", JArray;
    BooleanArray => "jbooleanArray", JBooleanArray;
    ByteArray => "jbyteArray", JByteArray;
    CharArray => "jcharArray", JCharArray;
    ShortArray => "jshortArray", JShortArray;
    IntArray => "jintArray", JIntArray;
    LongArray => "jlongArray", JLongArray;
    FloatArray => "jfloatArray", JFloatArray;
    DoubleArray => "jdoubleArray", JDoubleArray;
    ObjectArray => "jobjectArray", JObjectArray;
    /// Weak global reference.
    Weak => "jweak", JWeak;
    /// Field identifier. Not an object reference.
    FieldId => "jfieldID", JFieldId;
    /// Method identifier. Not an object reference.
    MethodId => "jmethodID", JMethodId;
}

/// A pointer-sized opaque value; all-zero is null.
///
/// Equality, hashing and truthiness are by address. The handle is borrowed
/// from the VM: nothing here allocates, frees or counts references.
#[repr(transparent)]
pub struct Handle<T: HandleKind> {
    raw: *mut c_void,
    _tag: PhantomData<fn() -> T>,
}

unsafe impl<T: HandleKind> CData for Handle<T> {}

/// The null object reference.
pub const NULL: JObject = Handle::null();

impl<T: HandleKind> Handle<T> {
    pub const fn null() -> Self {
        Handle {
            raw: ptr::null_mut(),
            _tag: PhantomData,
        }
    }

    /// `None` and `Some(0)` both give the null handle.
    pub fn new(address: Option<usize>) -> Self {
        Self::from_raw(address.unwrap_or(0) as *mut c_void)
    }

    pub const fn from_raw(raw: *mut c_void) -> Self {
        Handle {
            raw,
            _tag: PhantomData,
        }
    }

    /// Converts a host value: `None`, an address that fits the native
    /// pointer width, or a boxed `jobject` cell.
    pub fn from_host(value: &HostValue) -> Result<Self> {
        let address = match value {
            HostValue::Native(NativeValue::Object(address)) => *address,
            other => other.as_address(Kind::Object)?,
        };
        Ok(Self::new(Some(address)))
    }

    pub fn as_raw(&self) -> *mut c_void {
        self.raw
    }

    /// The address, or `None` for the null handle.
    pub fn address(&self) -> Option<usize> {
        match self.raw as usize {
            0 => None,
            address => Some(address),
        }
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }

    pub fn is_truthy(&self) -> bool {
        !self.is_null()
    }

    /// Reinterprets the handle under another tag. No check is made that the
    /// referent actually has that type.
    pub fn cast<U: HandleKind>(self) -> Handle<U> {
        Handle::from_raw(self.raw)
    }

    pub fn to_host(&self) -> HostValue {
        match self.address() {
            Some(address) => HostValue::Int(address as i128),
            None => HostValue::None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        T::NAME
    }
}

impl<T: HandleKind> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: HandleKind> Copy for Handle<T> {}

impl<T: HandleKind> Default for Handle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: HandleKind> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: HandleKind> Eq for Handle<T> {}

impl<T: HandleKind> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.raw as usize).hash(state);
    }
}

impl<T: HandleKind> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address() {
            Some(address) => write!(f, "{}({:#x})", T::NAME, address),
            None => write!(f, "{}(NULL)", T::NAME),
        }
    }
}

macro_rules! object_upcast {
    ($($tag:ident),*) => {
        $(
            impl From<Handle<$tag>> for JObject {
                fn from(handle: Handle<$tag>) -> JObject {
                    handle.cast()
                }
            }
        )*
    };
}

object_upcast!(
    Class,
    Throwable,
    JavaString,
    Array,
    BooleanArray,
    ByteArray,
    CharArray,
    ShortArray,
    IntArray,
    LongArray,
    FloatArray,
    DoubleArray,
    ObjectArray,
    Weak
);

impl<T: HandleKind> From<Handle<T>> for NativeValue {
    fn from(handle: Handle<T>) -> Self {
        NativeValue::Object(handle.raw as usize)
    }
}
