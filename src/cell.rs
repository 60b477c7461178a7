//! Native value cells: one fixed-layout scalar of a single JNI kind.
//!
//! A [`NativeCell<K>`] is `#[repr(transparent)]` over `K::Native`, so its
//! address can be handed to foreign code expecting a `jint *`, `jobject *`
//! and so on. Cells are created zeroed unless a value is supplied, mutated
//! in place, and never resized.

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::slice;

use crate::error::Result;
use crate::kind::{
    JBoolean, JByte, JChar, JDouble, JFloat, JInt, JLong, JPointer, JShort, NativeKind,
};
use crate::sys::jni;
use crate::value::{HostValue, Kind, NativeValue};

/// Raw-memory access shared by every fixed-layout value in this crate.
///
/// # Safety
///
/// Implementors must be plain data with a stable layout, so that the
/// pointers returned here may be passed to foreign code for the lifetime of
/// the borrow.
pub unsafe trait CData: Sized {
    fn size_of() -> usize {
        mem::size_of::<Self>()
    }

    fn align_of() -> usize {
        mem::align_of::<Self>()
    }

    fn as_ptr(&self) -> *const Self {
        self
    }

    fn as_mut_ptr(&mut self) -> *mut Self {
        self
    }
}

/// One native scalar of kind `K`.
#[repr(transparent)]
pub struct NativeCell<K: NativeKind> {
    value: K::Native,
    _kind: PhantomData<K>,
}

unsafe impl<K: NativeKind> CData for NativeCell<K> {}

impl<K: NativeKind> NativeCell<K> {
    /// A zero-initialised cell.
    pub fn new() -> Self {
        Self::with_value(K::ZERO)
    }

    pub fn with_value(value: K::Native) -> Self {
        NativeCell {
            value,
            _kind: PhantomData,
        }
    }

    /// Creates a cell from a host value; `HostValue::None` yields zero.
    pub fn from_host(value: &HostValue) -> Result<Self> {
        match value {
            HostValue::None => Ok(Self::new()),
            value => Ok(Self::with_value(K::from_host(value)?)),
        }
    }

    pub fn get(&self) -> K::Native {
        self.value
    }

    pub fn set(&mut self, value: K::Native) {
        self.value = value;
    }

    /// Converts and stores a host value. On error the cell is unchanged.
    pub fn set_host(&mut self, value: &HostValue) -> Result<()> {
        self.value = K::from_host(value)?;
        Ok(())
    }

    pub fn to_host(&self) -> HostValue {
        K::to_host(self.value)
    }

    pub fn to_native(&self) -> NativeValue {
        K::to_native(self.value)
    }

    /// False iff every bit of the stored value is zero.
    pub fn is_truthy(&self) -> bool {
        !K::is_zero(self.value)
    }

    pub fn kind(&self) -> Kind {
        K::KIND
    }

    /// The stored bytes in native order. JNI scalars have no padding.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: `self` is a padding-free scalar of exactly `size_of::<Self>()` bytes.
        unsafe { slice::from_raw_parts(self as *const Self as *const u8, mem::size_of::<Self>()) }
    }
}

impl NativeCell<JChar> {
    /// Creates a `jchar` cell from a one-unit string.
    pub fn from_char_str(s: &str) -> Result<Self> {
        Self::from_host(&HostValue::Str(s.to_owned()))
    }

    /// The stored code unit as a `char`, if it is not a lone surrogate.
    pub fn as_char(&self) -> Option<char> {
        char::from_u32(u32::from(self.value))
    }
}

impl<K: NativeKind> Default for NativeCell<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: NativeKind> Clone for NativeCell<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: NativeKind> Copy for NativeCell<K> {}

impl<K: NativeKind> PartialEq for NativeCell<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K: NativeKind> fmt::Debug for NativeCell<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", K::KIND.name(), self.value)
    }
}

impl<K: NativeKind> From<NativeCell<K>> for NativeValue {
    fn from(cell: NativeCell<K>) -> Self {
        cell.to_native()
    }
}

impl<K: NativeKind> From<NativeCell<K>> for HostValue {
    fn from(cell: NativeCell<K>) -> Self {
        HostValue::Native(cell.to_native())
    }
}

pub type JBooleanCell = NativeCell<JBoolean>;
pub type JByteCell = NativeCell<JByte>;
pub type JCharCell = NativeCell<JChar>;
pub type JShortCell = NativeCell<JShort>;
pub type JIntCell = NativeCell<JInt>;
pub type JLongCell = NativeCell<JLong>;
pub type JFloatCell = NativeCell<JFloat>;
pub type JDoubleCell = NativeCell<JDouble>;
pub type JObjectCell = NativeCell<JPointer>;
/// `jsize` is `jint`.
pub type JSizeCell = JIntCell;

const _: () = {
    assert!(mem::size_of::<JBooleanCell>() == mem::size_of::<jni::jboolean>());
    assert!(mem::size_of::<JCharCell>() == 2);
    assert!(mem::size_of::<JLongCell>() == 8);
    assert!(mem::size_of::<JObjectCell>() == mem::size_of::<usize>());
    assert!(mem::align_of::<JDoubleCell>() == mem::align_of::<jni::jdouble>());
};
