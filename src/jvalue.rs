//! The `jvalue` union.
//!
//! [`JValue`] wraps the raw `jni::jvalue` with one getter/setter pair per
//! view. There is no stored discriminant: reading a view other than the
//! last one written returns whatever the bytes reinterpret to.

use std::fmt;
use std::mem;
use std::slice;

use crate::cell::CData;
use crate::error::Result;
use crate::handle::{Handle, HandleKind, JObject};
use crate::kind::{
    JBoolean, JByte, JChar, JDouble, JFloat, JInt, JLong, JPointer, JShort, NativeKind,
};
use crate::sys::jni;
use crate::value::{HostValue, Kind, NativeValue};

#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct JValue {
    raw: jni::jvalue,
}

unsafe impl CData for JValue {}

macro_rules! view {
    ($get:ident, $set:ident, $field:ident, $ty:ty) => {
        pub fn $get(&self) -> $ty {
            // SAFETY: every byte of the union is initialised and any bit
            // pattern is a valid value of this primitive type.
            unsafe { self.raw.$field }
        }

        pub fn $set(&mut self, value: $ty) {
            self.raw.$field = value;
        }
    };
}

impl JValue {
    /// A union with all eight bytes zeroed.
    pub fn new() -> Self {
        JValue {
            raw: jni::jvalue { j: 0 },
        }
    }

    /// Wraps a raw union.
    ///
    /// # Safety
    ///
    /// Every byte of `raw` must be initialised. A union whose only write was
    /// a narrow view leaves the upper bytes undefined.
    pub unsafe fn from_raw(raw: jni::jvalue) -> Self {
        JValue { raw }
    }

    pub fn into_raw(self) -> jni::jvalue {
        self.raw
    }

    view!(z, set_z, z, jni::jboolean);
    view!(b, set_b, b, jni::jbyte);
    view!(c, set_c, c, jni::jchar);
    view!(s, set_s, s, jni::jshort);
    view!(i, set_i, i, jni::jint);
    view!(j, set_j, j, jni::jlong);
    view!(f, set_f, f, jni::jfloat);
    view!(d, set_d, d, jni::jdouble);

    /// The object view; null when the pointer bits are zero.
    pub fn l(&self) -> JObject {
        // SAFETY: see `view!`.
        Handle::from_raw(unsafe { self.raw.l })
    }

    pub fn set_l<T: HandleKind>(&mut self, handle: Handle<T>) {
        self.raw.l = handle.as_raw();
    }

    /// Reads the union through the view for `kind`.
    pub fn get(&self, kind: Kind) -> NativeValue {
        match kind {
            Kind::Boolean => NativeValue::Boolean(self.z()),
            Kind::Byte => NativeValue::Byte(self.b()),
            Kind::Char => NativeValue::Char(self.c()),
            Kind::Short => NativeValue::Short(self.s()),
            Kind::Int => NativeValue::Int(self.i()),
            Kind::Long => NativeValue::Long(self.j()),
            Kind::Float => NativeValue::Float(self.f()),
            Kind::Double => NativeValue::Double(self.d()),
            Kind::Object => NativeValue::Object(self.l().address().unwrap_or(0)),
        }
    }

    /// Writes through the view matching the value's kind. Bytes outside
    /// that view keep their previous contents.
    pub fn set(&mut self, value: NativeValue) {
        match value {
            NativeValue::Boolean(v) => self.set_z(v),
            NativeValue::Byte(v) => self.set_b(v),
            NativeValue::Char(v) => self.set_c(v),
            NativeValue::Short(v) => self.set_s(v),
            NativeValue::Int(v) => self.set_i(v),
            NativeValue::Long(v) => self.set_j(v),
            NativeValue::Float(v) => self.set_f(v),
            NativeValue::Double(v) => self.set_d(v),
            NativeValue::Object(address) => self.set_l(JObject::new(Some(address))),
        }
    }

    pub fn get_host(&self, kind: Kind) -> HostValue {
        match kind {
            Kind::Boolean => JBoolean::to_host(self.z()),
            Kind::Byte => JByte::to_host(self.b()),
            Kind::Char => JChar::to_host(self.c()),
            Kind::Short => JShort::to_host(self.s()),
            Kind::Int => JInt::to_host(self.i()),
            Kind::Long => JLong::to_host(self.j()),
            Kind::Float => JFloat::to_host(self.f()),
            Kind::Double => JDouble::to_host(self.d()),
            Kind::Object => self.l().to_host(),
        }
    }

    /// Converts a host value with the rules of `kind` and writes it through
    /// that view. On error the union is unchanged.
    pub fn set_host(&mut self, kind: Kind, value: &HostValue) -> Result<()> {
        match kind {
            Kind::Boolean => self.set_z(JBoolean::from_host(value)?),
            Kind::Byte => self.set_b(JByte::from_host(value)?),
            Kind::Char => self.set_c(JChar::from_host(value)?),
            Kind::Short => self.set_s(JShort::from_host(value)?),
            Kind::Int => self.set_i(JInt::from_host(value)?),
            Kind::Long => self.set_j(JLong::from_host(value)?),
            Kind::Float => self.set_f(JFloat::from_host(value)?),
            Kind::Double => self.set_d(JDouble::from_host(value)?),
            Kind::Object => self.raw.l = JPointer::from_host(value)?,
        }
        Ok(())
    }

    /// All eight bytes in native order.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: construction guarantees every byte is initialised.
        unsafe { slice::from_raw_parts(self as *const Self as *const u8, mem::size_of::<Self>()) }
    }
}

impl Default for JValue {
    fn default() -> Self {
        Self::new()
    }
}

impl From<NativeValue> for JValue {
    fn from(value: NativeValue) -> Self {
        let mut jvalue = JValue::new();
        jvalue.set(value);
        jvalue
    }
}

impl fmt::Debug for JValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "jvalue({:#018x})", self.j())
    }
}

const _: () = {
    assert!(mem::size_of::<JValue>() == 8);
    assert!(mem::align_of::<JValue>() == mem::align_of::<jni::jlong>());
};
