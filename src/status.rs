//! JNI result codes and version numbers.

use std::borrow::Cow;
use std::fmt;

use crate::error::{Error, Result};
use crate::sys::jni;

/// A JNI function result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Err,
    Detached,
    Version,
    NoMemory,
    Exists,
    Invalid,
    /// A code outside the `jni.h` set, kept verbatim.
    Unknown(jni::jint),
}

impl Status {
    pub fn from_code(code: jni::jint) -> Status {
        match code {
            jni::JNI_OK => Status::Ok,
            jni::JNI_ERR => Status::Err,
            jni::JNI_EDETACHED => Status::Detached,
            jni::JNI_EVERSION => Status::Version,
            jni::JNI_ENOMEM => Status::NoMemory,
            jni::JNI_EEXIST => Status::Exists,
            jni::JNI_EINVAL => Status::Invalid,
            other => Status::Unknown(other),
        }
    }

    pub fn code(self) -> jni::jint {
        match self {
            Status::Ok => jni::JNI_OK,
            Status::Err => jni::JNI_ERR,
            Status::Detached => jni::JNI_EDETACHED,
            Status::Version => jni::JNI_EVERSION,
            Status::NoMemory => jni::JNI_ENOMEM,
            Status::Exists => jni::JNI_EEXIST,
            Status::Invalid => jni::JNI_EINVAL,
            Status::Unknown(code) => code,
        }
    }

    /// Human-readable text. Display only; callers match on the code.
    pub fn reason(self) -> Cow<'static, str> {
        match self {
            Status::Ok => "success".into(),
            Status::Err => "unknown error".into(),
            Status::Detached => "thread detached from the VM".into(),
            Status::Version => "JNI version error".into(),
            Status::NoMemory => "not enough memory".into(),
            Status::Exists => "VM already created".into(),
            Status::Invalid => "invalid arguments".into(),
            Status::Unknown(code) => format!("unknown error code {code}").into(),
        }
    }

    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason())
    }
}

/// Maps a foreign result code to `Ok(())` or [`Error::ForeignCall`].
pub fn check(code: jni::jint, info: Option<&'static str>) -> Result<()> {
    if code == jni::JNI_OK {
        Ok(())
    } else {
        Err(Error::ForeignCall { code, info })
    }
}

/// Named JNI versions, oldest first.
pub const VERSIONS: &[(&str, jni::jint)] = &[
    ("JNI_VERSION_1_1", jni::JNI_VERSION_1_1),
    ("JNI_VERSION_1_2", jni::JNI_VERSION_1_2),
    ("JNI_VERSION_1_4", jni::JNI_VERSION_1_4),
    ("JNI_VERSION_1_6", jni::JNI_VERSION_1_6),
    ("JNI_VERSION_1_8", jni::JNI_VERSION_1_8),
    ("JNI_VERSION_9", jni::JNI_VERSION_9),
    ("JNI_VERSION_10", jni::JNI_VERSION_10),
    ("JNI_VERSION_19", jni::JNI_VERSION_19),
    ("JNI_VERSION_20", jni::JNI_VERSION_20),
    ("JNI_VERSION_21", jni::JNI_VERSION_21),
    ("JNI_VERSION_24", jni::JNI_VERSION_24),
];

/// The constant name for a known version. Unknown versions are still valid
/// `jint`s and simply have no name.
pub fn version_name(version: jni::jint) -> Option<&'static str> {
    VERSIONS
        .iter()
        .find(|(_, v)| *v == version)
        .map(|(name, _)| *name)
}
