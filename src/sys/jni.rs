// jni-cdata/src/sys/jni.rs
//
// Raw JNI declarations needed by the marshalling layer.
//
// Only the data half of jni.h lives here: primitive types, reference
// aliases, the jvalue union, status/version constants, the native-method
// registration record and the Invocation API records. The JNIEnv function
// table is opaque; calls through it belong to the caller.
//
// Layouts follow jni.h exactly. Field order must never be changed.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use std::ffi::c_void;
use std::os::raw::c_char;

// =============================================================================
// Primitive Types
// =============================================================================

pub type jint = i32;
pub type jlong = i64;
pub type jbyte = i8;
pub type jboolean = u8;
pub type jchar = u16;
pub type jshort = i16;
pub type jfloat = f32;
pub type jdouble = f64;
pub type jsize = jint;

// =============================================================================
// Reference Types (opaque pointers)
// =============================================================================

pub type jobject = *mut c_void;
pub type jclass = jobject;
pub type jstring = jobject;
pub type jarray = jobject;
pub type jthrowable = jobject;
pub type jweak = jobject;

// Typed arrays (all just aliases to jobject in FFI)
pub type jobjectArray = jarray;
pub type jbooleanArray = jarray;
pub type jbyteArray = jarray;
pub type jcharArray = jarray;
pub type jshortArray = jarray;
pub type jintArray = jarray;
pub type jlongArray = jarray;
pub type jfloatArray = jarray;
pub type jdoubleArray = jarray;

// =============================================================================
// ID Types (opaque identifiers)
// =============================================================================

pub type jmethodID = *mut c_void;
pub type jfieldID = *mut c_void;

// =============================================================================
// jvalue Union
// =============================================================================

#[repr(C)]
#[derive(Copy, Clone)]
pub union jvalue {
    pub z: jboolean,
    pub b: jbyte,
    pub c: jchar,
    pub s: jshort,
    pub i: jint,
    pub j: jlong,
    pub f: jfloat,
    pub d: jdouble,
    pub l: jobject,
}

// =============================================================================
// Constants
// =============================================================================

pub const JNI_OK: jint = 0;
pub const JNI_ERR: jint = -1;
pub const JNI_EDETACHED: jint = -2;
pub const JNI_EVERSION: jint = -3;
pub const JNI_ENOMEM: jint = -4;
pub const JNI_EEXIST: jint = -5;
pub const JNI_EINVAL: jint = -6;

pub const JNI_TRUE: jboolean = 1;
pub const JNI_FALSE: jboolean = 0;

// Release modes for Release<Type>ArrayElements
pub const JNI_COMMIT: jint = 1;
pub const JNI_ABORT: jint = 2;

// JNI Version constants
pub const JNI_VERSION_1_1: jint = 0x00010001;
pub const JNI_VERSION_1_2: jint = 0x00010002;
pub const JNI_VERSION_1_4: jint = 0x00010004;
pub const JNI_VERSION_1_6: jint = 0x00010006;
pub const JNI_VERSION_1_8: jint = 0x00010008;
pub const JNI_VERSION_9: jint = 0x00090000;
pub const JNI_VERSION_10: jint = 0x000a0000;
pub const JNI_VERSION_19: jint = 0x00130000;
pub const JNI_VERSION_20: jint = 0x00140000;
pub const JNI_VERSION_21: jint = 0x00150000;
pub const JNI_VERSION_24: jint = 0x00180000;

// =============================================================================
// jobjectRefType enum (JNI 1.6+)
// =============================================================================

pub type jobjectRefType = std::os::raw::c_int;

pub const JNIInvalidRefType: jobjectRefType = 0;
pub const JNILocalRefType: jobjectRefType = 1;
pub const JNIGlobalRefType: jobjectRefType = 2;
pub const JNIWeakGlobalRefType: jobjectRefType = 3;

// =============================================================================
// JNINativeMethod for RegisterNatives
// =============================================================================

#[repr(C)]
#[derive(Copy, Clone)]
pub struct JNINativeMethod {
    pub name: *mut c_char,
    pub signature: *mut c_char,
    pub fnPtr: *mut c_void,
}

// =============================================================================
// JNIEnv - opaque here
// =============================================================================
//
// In C JNI, JNIEnv is a pointer to the function table:
//   typedef const struct JNINativeInterface_ *JNIEnv;
// The table itself is never read by this crate, so it stays opaque.

#[repr(C)]
pub struct JNINativeInterface_ {
    _private: [u8; 0],
}

pub type JNIEnv = *const JNINativeInterface_;

// =============================================================================
// JNIInvokeInterface_ - The JavaVM function table
// =============================================================================

#[repr(C)]
pub struct JNIInvokeInterface_ {
    pub reserved0: *mut c_void,
    pub reserved1: *mut c_void,
    pub reserved2: *mut c_void,

    pub DestroyJavaVM: unsafe extern "system" fn(vm: *mut JavaVM) -> jint,
    pub AttachCurrentThread:
        unsafe extern "system" fn(vm: *mut JavaVM, penv: *mut *mut c_void, args: *mut c_void) -> jint,
    pub DetachCurrentThread: unsafe extern "system" fn(vm: *mut JavaVM) -> jint,
    pub GetEnv:
        unsafe extern "system" fn(vm: *mut JavaVM, penv: *mut *mut c_void, version: jint) -> jint,
    pub AttachCurrentThreadAsDaemon:
        unsafe extern "system" fn(vm: *mut JavaVM, penv: *mut *mut c_void, args: *mut c_void) -> jint,
}

/// JavaVM is directly the vtable pointer (C ABI definition)
pub type JavaVM = *const JNIInvokeInterface_;

// =============================================================================
// Invocation API records
// =============================================================================

#[repr(C)]
#[derive(Copy, Clone)]
pub struct JavaVMOption {
    pub optionString: *mut c_char,
    pub extraInfo: *mut c_void,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct JavaVMInitArgs {
    pub version: jint,
    pub nOptions: jint,
    pub options: *mut JavaVMOption,
    pub ignoreUnrecognized: jboolean,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct JavaVMAttachArgs {
    pub version: jint,
    pub name: *mut c_char,
    pub group: jobject,
}

// =============================================================================
// Exported Invocation API entry points (resolved at run time)
// =============================================================================

pub type JNI_GetDefaultJavaVMInitArgs = unsafe extern "system" fn(args: *mut c_void) -> jint;

pub type JNI_CreateJavaVM = unsafe extern "system" fn(
    pvm: *mut *mut JavaVM,
    penv: *mut *mut JNIEnv,
    args: *mut JavaVMInitArgs,
) -> jint;

pub type JNI_GetCreatedJavaVMs =
    unsafe extern "system" fn(vm_buf: *mut *mut JavaVM, buf_len: jsize, n_vms: *mut jsize) -> jint;

// =============================================================================
// Helper macros
// =============================================================================

/// Helper to call JavaVM functions through the vtable.
/// vm_ptr: *mut JavaVM = *mut *const JNIInvokeInterface_
/// *vm_ptr: *const JNIInvokeInterface_ (vtable pointer)
/// **vm_ptr: JNIInvokeInterface_ (vtable itself)
#[macro_export]
macro_rules! jvm_call {
    ($vm:expr, $func:ident $(, $args:expr)*) => {{
        let vm_ptr = $vm;
        ((**vm_ptr).$func)(vm_ptr $(, $args)*)
    }};
}
