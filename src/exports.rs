//! Process-wide registry of exported type and constant names.
//!
//! The host runtime looks types up by their `jni.h` names and reads the
//! numeric constants from here. The registry is built on the first
//! [`init`] and dropped by [`teardown`]; both are idempotent.

use std::mem::{align_of, size_of};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::cell::{
    JBooleanCell, JByteCell, JCharCell, JDoubleCell, JFloatCell, JIntCell, JLongCell,
    JObjectCell, JShortCell,
};
use crate::handle::{
    JArray, JBooleanArray, JByteArray, JCharArray, JClass, JDoubleArray, JFieldId, JFloatArray,
    JIntArray, JLongArray, JMethodId, JObjectArray, JShortArray, JString, JThrowable,
    JWeak,
};
use crate::jvalue::JValue;
use crate::record::{NativeMethod, VmAttachArgs, VmInitArgs, VmOption};
use crate::status::VERSIONS;
use crate::sys::jni;
use crate::value::Kind;

/// What sort of type an export names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Scalar(Kind),
    Handle,
    Union,
    Record,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeExport {
    pub name: &'static str,
    pub kind: ExportKind,
    pub size: usize,
    pub align: usize,
}

#[derive(Debug)]
pub struct Exports {
    types: Vec<TypeExport>,
    constants: Vec<(&'static str, jni::jint)>,
}

impl Exports {
    fn build() -> Self {
        macro_rules! ty {
            ($name:literal, $kind:expr, $t:ty) => {
                TypeExport {
                    name: $name,
                    kind: $kind,
                    size: size_of::<$t>(),
                    align: align_of::<$t>(),
                }
            };
        }

        let types = vec![
            ty!("jboolean", ExportKind::Scalar(Kind::Boolean), JBooleanCell),
            ty!("jbyte", ExportKind::Scalar(Kind::Byte), JByteCell),
            ty!("jchar", ExportKind::Scalar(Kind::Char), JCharCell),
            ty!("jshort", ExportKind::Scalar(Kind::Short), JShortCell),
            ty!("jint", ExportKind::Scalar(Kind::Int), JIntCell),
            ty!("jsize", ExportKind::Scalar(Kind::Int), JIntCell),
            ty!("jlong", ExportKind::Scalar(Kind::Long), JLongCell),
            ty!("jfloat", ExportKind::Scalar(Kind::Float), JFloatCell),
            ty!("jdouble", ExportKind::Scalar(Kind::Double), JDoubleCell),
            ty!("jobject", ExportKind::Scalar(Kind::Object), JObjectCell),
            ty!("jclass", ExportKind::Handle, JClass),
            ty!("jstring", ExportKind::Handle, JString),
            ty!("jarray", ExportKind::Handle, JArray),
            ty!("jobjectArray", ExportKind::Handle, JObjectArray),
            ty!("jbooleanArray", ExportKind::Handle, JBooleanArray),
            ty!("jbyteArray", ExportKind::Handle, JByteArray),
            ty!("jcharArray", ExportKind::Handle, JCharArray),
            ty!("jshortArray", ExportKind::Handle, JShortArray),
            ty!("jintArray", ExportKind::Handle, JIntArray),
            ty!("jlongArray", ExportKind::Handle, JLongArray),
            ty!("jfloatArray", ExportKind::Handle, JFloatArray),
            ty!("jdoubleArray", ExportKind::Handle, JDoubleArray),
            ty!("jthrowable", ExportKind::Handle, JThrowable),
            ty!("jweak", ExportKind::Handle, JWeak),
            ty!("jvalue", ExportKind::Union, JValue),
            ty!("jfieldID", ExportKind::Handle, JFieldId),
            ty!("jmethodID", ExportKind::Handle, JMethodId),
            ty!("JNINativeMethod", ExportKind::Record, NativeMethod<'static>),
            ty!("JavaVMOption", ExportKind::Record, VmOption<'static>),
            ty!("JavaVMInitArgs", ExportKind::Record, VmInitArgs<'static>),
            ty!("JavaVMAttachArgs", ExportKind::Record, VmAttachArgs<'static>),
        ];

        let mut constants = vec![
            ("JNI_FALSE", jni::jint::from(jni::JNI_FALSE)),
            ("JNI_TRUE", jni::jint::from(jni::JNI_TRUE)),
            ("JNI_OK", jni::JNI_OK),
            ("JNI_ERR", jni::JNI_ERR),
            ("JNI_EDETACHED", jni::JNI_EDETACHED),
            ("JNI_EVERSION", jni::JNI_EVERSION),
            ("JNI_ENOMEM", jni::JNI_ENOMEM),
            ("JNI_EEXIST", jni::JNI_EEXIST),
            ("JNI_EINVAL", jni::JNI_EINVAL),
            ("JNI_COMMIT", jni::JNI_COMMIT),
            ("JNI_ABORT", jni::JNI_ABORT),
            ("JNIInvalidRefType", jni::JNIInvalidRefType),
            ("JNILocalRefType", jni::JNILocalRefType),
            ("JNIGlobalRefType", jni::JNIGlobalRefType),
            ("JNIWeakGlobalRefType", jni::JNIWeakGlobalRefType),
        ];
        constants.extend_from_slice(VERSIONS);

        Exports { types, constants }
    }

    pub fn types(&self) -> &[TypeExport] {
        &self.types
    }

    pub fn type_info(&self, name: &str) -> Option<&TypeExport> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn constants(&self) -> &[(&'static str, jni::jint)] {
        &self.constants
    }

    pub fn constant(&self, name: &str) -> Option<jni::jint> {
        self.constants
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }
}

static REGISTRY: RwLock<Option<Arc<Exports>>> = RwLock::new(None);

/// Builds the registry, or returns the one already built.
pub fn init() -> Arc<Exports> {
    if let Some(exports) = get() {
        return exports;
    }
    let mut slot = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    match slot.as_ref() {
        Some(exports) => Arc::clone(exports),
        None => {
            let exports = Arc::new(Exports::build());
            debug!(
                target: "jni_cdata::exports",
                types = exports.types.len(),
                constants = exports.constants.len(),
                "export registry initialised"
            );
            *slot = Some(Arc::clone(&exports));
            exports
        }
    }
}

/// The registry if [`init`] has run since the last [`teardown`].
pub fn get() -> Option<Arc<Exports>> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

pub fn is_initialized() -> bool {
    get().is_some()
}

/// Drops the registry. Outstanding `Arc`s stay valid.
pub fn teardown() {
    let previous = REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    if previous.is_some() {
        debug!(target: "jni_cdata::exports", "export registry torn down");
    }
}
