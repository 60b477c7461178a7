//! Composite records passed to the VM by address.
//!
//! Each record is `#[repr(transparent)]` over its `jni.h` struct, so a
//! `&NativeMethod` can be cast to `*const JNINativeMethod` and a slice of
//! them passed to `RegisterNatives` as-is. String fields only borrow: the
//! lifetime `'a` ties a record to the C strings and option arrays it points
//! at, so storage cannot be dropped while the record still refers to it.
//!
//! Every record also publishes a field table ([`Record::FIELDS`]) with the
//! offsets and sizes computed from the raw struct.

use std::ffi::{c_void, CStr};
use std::marker::PhantomData;
use std::mem::{self, offset_of};
use std::os::raw::c_char;
use std::ptr;
use std::slice;

use crate::cell::CData;
use crate::error::{ArgumentError, Error, Result};
use crate::handle::{Handle, HandleKind, JObject};
use crate::kind::{JBoolean, JInt, JPointer, NativeKind};
use crate::signature::{self, MethodSignature};
use crate::sys::jni;
use crate::value::HostValue;

/// How a record field is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Boolean,
    /// Pointer to a NUL-terminated modified-UTF-8 string.
    CString,
    Pointer,
}

/// One entry of a record's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDesc {
    pub name: &'static str,
    pub kind: FieldKind,
    pub offset: usize,
    pub size: usize,
}

/// A fixed-layout aggregate with a published field table.
///
/// # Safety
///
/// `FIELDS` must describe fields that lie entirely within `Self` and are
/// always initialised.
pub unsafe trait Record: CData {
    /// The `jni.h` struct name.
    const NAME: &'static str;
    const FIELDS: &'static [FieldDesc];

    fn field(name: &str) -> Option<&'static FieldDesc> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }

    /// The raw bytes of one field, in native order.
    fn field_bytes(&self, name: &str) -> Option<&[u8]> {
        let desc = Self::field(name)?;
        // SAFETY: the trait contract keeps the range inside `self` and initialised.
        Some(unsafe {
            slice::from_raw_parts(
                (self as *const Self as *const u8).add(desc.offset),
                desc.size,
            )
        })
    }

    /// Reads a field by name as a host value.
    fn get_host(&self, field: &str) -> Result<HostValue>;

    /// Writes a field by name from a host value.
    ///
    /// String fields only accept `None` here, which stores a null pointer.
    /// The record borrows its strings and cannot keep `HostValue::Bytes`
    /// alive, so host callers holding bytes build a `CString` and pass it
    /// to the typed setter: [`NativeMethod::set_name`],
    /// [`NativeMethod::set_signature`], [`VmOption::set_option_string`] or
    /// [`VmAttachArgs::set_name`].
    fn set_host(&mut self, field: &str, value: &HostValue) -> Result<()>;
}

macro_rules! field {
    ($raw:ty, $name:ident: $ty:ty, $kind:ident) => {
        FieldDesc {
            name: stringify!($name),
            kind: FieldKind::$kind,
            offset: offset_of!($raw, $name),
            size: mem::size_of::<$ty>(),
        }
    };
}

/// # Safety
///
/// `ptr` must be null or point at a NUL-terminated string valid for `'a`.
unsafe fn borrowed_cstr<'a>(ptr: *const c_char) -> Option<&'a CStr> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr))
    }
}

fn cstr_ptr(s: Option<&CStr>) -> *mut c_char {
    s.map_or(ptr::null_mut(), |s| s.as_ptr() as *mut c_char)
}

fn cstr_to_host(s: Option<&CStr>) -> HostValue {
    match s {
        Some(s) => HostValue::Bytes(s.to_bytes().to_vec()),
        None => HostValue::None,
    }
}

/// String fields through `set_host` can only be nulled. Non-null strings go
/// through the typed `&'a CStr` setters.
fn clear_cstr(value: &HostValue) -> Result<*mut c_char> {
    match value {
        HostValue::None => Ok(ptr::null_mut()),
        other => Err(Error::Conversion {
            expected: "None",
            found: other.type_name(),
        }),
    }
}

fn unknown_field(record: &'static str, field: &str) -> Error {
    ArgumentError::UnknownField {
        record,
        field: field.to_owned(),
    }
    .into()
}

fn null_field(record: &'static str, field: &'static str) -> Error {
    ArgumentError::NullField { record, field }.into()
}

// =============================================================================
// JNINativeMethod
// =============================================================================

/// A `RegisterNatives` entry: name, descriptor and implementation address.
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct NativeMethod<'a> {
    raw: jni::JNINativeMethod,
    _storage: PhantomData<&'a CStr>,
}

unsafe impl CData for NativeMethod<'_> {}

unsafe impl Record for NativeMethod<'_> {
    const NAME: &'static str = "JNINativeMethod";
    const FIELDS: &'static [FieldDesc] = &[
        field!(jni::JNINativeMethod, name: *mut c_char, CString),
        field!(jni::JNINativeMethod, signature: *mut c_char, CString),
        field!(jni::JNINativeMethod, fnPtr: *mut c_void, Pointer),
    ];

    fn get_host(&self, field: &str) -> Result<HostValue> {
        match field {
            "name" => Ok(cstr_to_host(self.name())),
            "signature" => Ok(cstr_to_host(self.signature())),
            "fnPtr" => Ok(JPointer::to_host(self.fn_ptr())),
            other => Err(unknown_field(Self::NAME, other)),
        }
    }

    fn set_host(&mut self, field: &str, value: &HostValue) -> Result<()> {
        match field {
            "name" => self.raw.name = clear_cstr(value)?,
            "signature" => self.raw.signature = clear_cstr(value)?,
            "fnPtr" => self.raw.fnPtr = JPointer::from_host(value)?,
            other => return Err(unknown_field(Self::NAME, other)),
        }
        Ok(())
    }
}

impl<'a> NativeMethod<'a> {
    /// Builds an entry after checking that `signature` is a well-formed
    /// method descriptor.
    pub fn new(name: &'a CStr, signature: &'a CStr, fn_ptr: *mut c_void) -> Result<Self> {
        parse_cstr_signature(signature)?;
        let mut method = Self::empty();
        method.set_name(Some(name));
        method.set_signature(Some(signature));
        method.set_fn_ptr(fn_ptr);
        Ok(method)
    }

    /// All fields null.
    pub fn empty() -> Self {
        NativeMethod {
            raw: jni::JNINativeMethod {
                name: ptr::null_mut(),
                signature: ptr::null_mut(),
                fnPtr: ptr::null_mut(),
            },
            _storage: PhantomData,
        }
    }

    pub fn name(&self) -> Option<&'a CStr> {
        // SAFETY: only `set_name` stores this pointer, from a `&'a CStr`.
        unsafe { borrowed_cstr(self.raw.name) }
    }

    pub fn set_name(&mut self, name: Option<&'a CStr>) {
        self.raw.name = cstr_ptr(name);
    }

    pub fn signature(&self) -> Option<&'a CStr> {
        // SAFETY: see `name`.
        unsafe { borrowed_cstr(self.raw.signature) }
    }

    pub fn set_signature(&mut self, signature: Option<&'a CStr>) {
        self.raw.signature = cstr_ptr(signature);
    }

    pub fn fn_ptr(&self) -> *mut c_void {
        self.raw.fnPtr
    }

    pub fn set_fn_ptr(&mut self, fn_ptr: *mut c_void) {
        self.raw.fnPtr = fn_ptr;
    }

    /// Parses the stored descriptor.
    pub fn parsed_signature(&self) -> Result<MethodSignature> {
        match self.signature() {
            Some(signature) => parse_cstr_signature(signature),
            None => Err(null_field(Self::NAME, "signature")),
        }
    }

    /// Checks that the entry can be handed to `RegisterNatives`.
    pub fn validate(&self) -> Result<()> {
        if self.raw.name.is_null() {
            return Err(null_field(Self::NAME, "name"));
        }
        if self.raw.fnPtr.is_null() {
            return Err(null_field(Self::NAME, "fnPtr"));
        }
        self.parsed_signature().map(|_| ())
    }

    pub fn as_raw(&self) -> &jni::JNINativeMethod {
        &self.raw
    }

    /// Pointer to the first entry, suitable for `RegisterNatives`.
    pub fn slice_as_raw(methods: &[NativeMethod<'a>]) -> *const jni::JNINativeMethod {
        methods.as_ptr().cast()
    }
}

impl Default for NativeMethod<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for NativeMethod<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeMethod")
            .field("name", &self.name())
            .field("signature", &self.signature())
            .field("fnPtr", &self.raw.fnPtr)
            .finish()
    }
}

fn parse_cstr_signature(signature: &CStr) -> Result<MethodSignature> {
    let text = signature
        .to_str()
        .map_err(|_| ArgumentError::InvalidSignature {
            signature: signature.to_string_lossy().into_owned(),
            reason: "not valid UTF-8".to_owned(),
        })?;
    signature::parse(text)
}

// =============================================================================
// JavaVMOption
// =============================================================================

/// One `-X...`/`-D...` startup option.
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct VmOption<'a> {
    raw: jni::JavaVMOption,
    _storage: PhantomData<&'a CStr>,
}

unsafe impl CData for VmOption<'_> {}

unsafe impl Record for VmOption<'_> {
    const NAME: &'static str = "JavaVMOption";
    const FIELDS: &'static [FieldDesc] = &[
        field!(jni::JavaVMOption, optionString: *mut c_char, CString),
        field!(jni::JavaVMOption, extraInfo: *mut c_void, Pointer),
    ];

    fn get_host(&self, field: &str) -> Result<HostValue> {
        match field {
            "optionString" => Ok(cstr_to_host(self.option_string())),
            "extraInfo" => Ok(JPointer::to_host(self.extra_info())),
            other => Err(unknown_field(Self::NAME, other)),
        }
    }

    fn set_host(&mut self, field: &str, value: &HostValue) -> Result<()> {
        match field {
            "optionString" => self.raw.optionString = clear_cstr(value)?,
            "extraInfo" => self.raw.extraInfo = JPointer::from_host(value)?,
            other => return Err(unknown_field(Self::NAME, other)),
        }
        Ok(())
    }
}

impl<'a> VmOption<'a> {
    pub fn new(option: &'a CStr) -> Self {
        let mut opt = Self::empty();
        opt.set_option_string(Some(option));
        opt
    }

    pub fn empty() -> Self {
        VmOption {
            raw: jni::JavaVMOption {
                optionString: ptr::null_mut(),
                extraInfo: ptr::null_mut(),
            },
            _storage: PhantomData,
        }
    }

    pub fn option_string(&self) -> Option<&'a CStr> {
        // SAFETY: only `set_option_string` stores this pointer, from a `&'a CStr`.
        unsafe { borrowed_cstr(self.raw.optionString) }
    }

    pub fn set_option_string(&mut self, option: Option<&'a CStr>) {
        self.raw.optionString = cstr_ptr(option);
    }

    pub fn extra_info(&self) -> *mut c_void {
        self.raw.extraInfo
    }

    /// Used by the `vfprintf`, `exit` and `abort` hook options.
    pub fn set_extra_info(&mut self, extra_info: *mut c_void) {
        self.raw.extraInfo = extra_info;
    }

    pub fn as_raw(&self) -> &jni::JavaVMOption {
        &self.raw
    }
}

impl Default for VmOption<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for VmOption<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VmOption")
            .field("optionString", &self.option_string())
            .field("extraInfo", &self.raw.extraInfo)
            .finish()
    }
}

// =============================================================================
// JavaVMInitArgs
// =============================================================================

/// Arguments to `JNI_CreateJavaVM` and `JNI_GetDefaultJavaVMInitArgs`.
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct VmInitArgs<'a> {
    raw: jni::JavaVMInitArgs,
    _options: PhantomData<&'a [VmOption<'a>]>,
}

unsafe impl CData for VmInitArgs<'_> {}

unsafe impl Record for VmInitArgs<'_> {
    const NAME: &'static str = "JavaVMInitArgs";
    const FIELDS: &'static [FieldDesc] = &[
        field!(jni::JavaVMInitArgs, version: jni::jint, Int),
        field!(jni::JavaVMInitArgs, nOptions: jni::jint, Int),
        field!(jni::JavaVMInitArgs, options: *mut jni::JavaVMOption, Pointer),
        field!(jni::JavaVMInitArgs, ignoreUnrecognized: jni::jboolean, Boolean),
    ];

    fn get_host(&self, field: &str) -> Result<HostValue> {
        match field {
            "version" => Ok(JInt::to_host(self.version())),
            "nOptions" => Ok(JInt::to_host(self.n_options())),
            "options" => Ok(JPointer::to_host(self.options().cast())),
            "ignoreUnrecognized" => Ok(JBoolean::to_host(self.raw.ignoreUnrecognized)),
            other => Err(unknown_field(Self::NAME, other)),
        }
    }

    fn set_host(&mut self, field: &str, value: &HostValue) -> Result<()> {
        match field {
            "version" => self.raw.version = JInt::from_host(value)?,
            "nOptions" => self.raw.nOptions = JInt::from_host(value)?,
            "options" => self.raw.options = JPointer::from_host(value)?.cast(),
            "ignoreUnrecognized" => self.raw.ignoreUnrecognized = JBoolean::from_host(value)?,
            other => return Err(unknown_field(Self::NAME, other)),
        }
        Ok(())
    }
}

impl<'a> VmInitArgs<'a> {
    /// Builds init args pointing at `options`.
    pub fn new(
        version: jni::jint,
        options: &'a [VmOption<'a>],
        ignore_unrecognized: bool,
    ) -> Result<Self> {
        let mut args = Self::empty();
        args.set_version(version);
        args.set_options(options)?;
        args.set_ignore_unrecognized(ignore_unrecognized);
        Ok(args)
    }

    /// Zero version, no options.
    pub fn empty() -> Self {
        VmInitArgs {
            raw: jni::JavaVMInitArgs {
                version: 0,
                nOptions: 0,
                options: ptr::null_mut(),
                ignoreUnrecognized: jni::JNI_FALSE,
            },
            _options: PhantomData,
        }
    }

    pub fn version(&self) -> jni::jint {
        self.raw.version
    }

    pub fn set_version(&mut self, version: jni::jint) {
        self.raw.version = version;
    }

    pub fn n_options(&self) -> jni::jint {
        self.raw.nOptions
    }

    /// Raw count. `set_options` keeps it in step with the array.
    pub fn set_n_options(&mut self, n_options: jni::jint) {
        self.raw.nOptions = n_options;
    }

    pub fn options(&self) -> *mut jni::JavaVMOption {
        self.raw.options
    }

    /// Points the record at `options` and sets `nOptions` to its length.
    pub fn set_options(&mut self, options: &'a [VmOption<'a>]) -> Result<()> {
        let count = jni::jint::try_from(options.len()).map_err(|_| ArgumentError::Overflow {
            value: options.len() as i128,
            kind: crate::value::Kind::Int,
        })?;
        self.raw.options = if options.is_empty() {
            ptr::null_mut()
        } else {
            options.as_ptr() as *mut jni::JavaVMOption
        };
        self.raw.nOptions = count;
        Ok(())
    }

    pub fn ignore_unrecognized(&self) -> bool {
        self.raw.ignoreUnrecognized != jni::JNI_FALSE
    }

    pub fn set_ignore_unrecognized(&mut self, ignore: bool) {
        self.raw.ignoreUnrecognized = if ignore { jni::JNI_TRUE } else { jni::JNI_FALSE };
    }

    pub fn as_raw(&self) -> &jni::JavaVMInitArgs {
        &self.raw
    }

    /// Out-pointer for calls that fill the record in place.
    pub fn as_raw_ptr(&mut self) -> *mut jni::JavaVMInitArgs {
        &mut self.raw
    }
}

impl Default for VmInitArgs<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for VmInitArgs<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VmInitArgs")
            .field("version", &format_args!("{:#x}", self.raw.version))
            .field("nOptions", &self.raw.nOptions)
            .field("options", &self.raw.options)
            .field("ignoreUnrecognized", &self.raw.ignoreUnrecognized)
            .finish()
    }
}

// =============================================================================
// JavaVMAttachArgs
// =============================================================================

/// Arguments to `AttachCurrentThread[AsDaemon]`.
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct VmAttachArgs<'a> {
    raw: jni::JavaVMAttachArgs,
    _storage: PhantomData<&'a CStr>,
}

unsafe impl CData for VmAttachArgs<'_> {}

unsafe impl Record for VmAttachArgs<'_> {
    const NAME: &'static str = "JavaVMAttachArgs";
    const FIELDS: &'static [FieldDesc] = &[
        field!(jni::JavaVMAttachArgs, version: jni::jint, Int),
        field!(jni::JavaVMAttachArgs, name: *mut c_char, CString),
        field!(jni::JavaVMAttachArgs, group: jni::jobject, Pointer),
    ];

    fn get_host(&self, field: &str) -> Result<HostValue> {
        match field {
            "version" => Ok(JInt::to_host(self.version())),
            "name" => Ok(cstr_to_host(self.name())),
            "group" => Ok(self.group().to_host()),
            other => Err(unknown_field(Self::NAME, other)),
        }
    }

    fn set_host(&mut self, field: &str, value: &HostValue) -> Result<()> {
        match field {
            "version" => self.raw.version = JInt::from_host(value)?,
            "name" => self.raw.name = clear_cstr(value)?,
            "group" => self.raw.group = JPointer::from_host(value)?,
            other => return Err(unknown_field(Self::NAME, other)),
        }
        Ok(())
    }
}

impl<'a> VmAttachArgs<'a> {
    pub fn new(version: jni::jint, name: Option<&'a CStr>, group: JObject) -> Self {
        let mut args = Self::empty();
        args.set_version(version);
        args.set_name(name);
        args.set_group(group);
        args
    }

    pub fn empty() -> Self {
        VmAttachArgs {
            raw: jni::JavaVMAttachArgs {
                version: 0,
                name: ptr::null_mut(),
                group: ptr::null_mut(),
            },
            _storage: PhantomData,
        }
    }

    pub fn version(&self) -> jni::jint {
        self.raw.version
    }

    pub fn set_version(&mut self, version: jni::jint) {
        self.raw.version = version;
    }

    pub fn name(&self) -> Option<&'a CStr> {
        // SAFETY: only `set_name` stores this pointer, from a `&'a CStr`.
        unsafe { borrowed_cstr(self.raw.name) }
    }

    pub fn set_name(&mut self, name: Option<&'a CStr>) {
        self.raw.name = cstr_ptr(name);
    }

    /// The thread group, a global reference or null.
    pub fn group(&self) -> JObject {
        Handle::from_raw(self.raw.group)
    }

    pub fn set_group<T: HandleKind>(&mut self, group: Handle<T>) {
        self.raw.group = group.as_raw();
    }

    pub fn as_raw(&self) -> &jni::JavaVMAttachArgs {
        &self.raw
    }

    /// Out-pointer for calls that fill the record in place.
    pub fn as_raw_ptr(&mut self) -> *mut jni::JavaVMAttachArgs {
        &mut self.raw
    }
}

impl Default for VmAttachArgs<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for VmAttachArgs<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VmAttachArgs")
            .field("version", &format_args!("{:#x}", self.raw.version))
            .field("name", &self.name())
            .field("group", &self.group())
            .finish()
    }
}

const _: () = {
    assert!(mem::size_of::<NativeMethod<'static>>() == 3 * mem::size_of::<usize>());
    assert!(mem::size_of::<VmOption<'static>>() == 2 * mem::size_of::<usize>());
    assert!(offset_of!(jni::JavaVMInitArgs, options) == 8);
};
