//! Common imports for marshalling JNI values.
//!
//! This prelude is intentionally small. It covers the types most callers
//! touch while avoiding over-broad re-exports.

pub use crate::binder::{BindPolicy, Binder, BinderConfig};
pub use crate::cell::{
    CData, JBooleanCell, JByteCell, JCharCell, JDoubleCell, JFloatCell, JIntCell, JLongCell,
    JObjectCell, JShortCell, NativeCell,
};
pub use crate::embed::{Invocation, JavaVm, JavaVmBuilder};
pub use crate::error::{ArgumentError, Error, Result};
pub use crate::handle::{JClass, JFieldId, JMethodId, JObject, JString, JThrowable, NULL};
pub use crate::jvalue::JValue;
pub use crate::record::{NativeMethod, Record, VmAttachArgs, VmInitArgs, VmOption};
pub use crate::sys::jni;
pub use crate::value::{HostValue, Kind, NativeValue};
