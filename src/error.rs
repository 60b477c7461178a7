//! Error types for the marshalling layer.
//!
//! Every accessor fails fast and locally. Nothing here is retried: a
//! marshalling error is a programming error at the call site, and a foreign
//! status code is surfaced exactly as the foreign side returned it.

use thiserror::Error;

use crate::status::Status;
use crate::sys::jni;
use crate::value::Kind;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A setter received a value that cannot be represented in the target kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// A `jchar` needs exactly one UTF-16 code unit.
    #[error("one unicode character expected, got a string of length {len}")]
    CharLength { len: usize },

    /// The integer does not fit the target kind (pointer width for handles).
    #[error("value {value} does not fit in {kind}")]
    Overflow { value: i128, kind: Kind },

    /// A string field that must be set before the record is handed to the VM.
    #[error("{record}.{field} must not be null")]
    NullField {
        record: &'static str,
        field: &'static str,
    },

    /// A VM option string contains an interior NUL byte.
    #[error("invalid option {option:?}: NUL byte at position {position}")]
    InvalidOption { option: String, position: usize },

    /// A record has no field of that name.
    #[error("{record} has no field {field:?}")]
    UnknownField {
        record: &'static str,
        field: String,
    },

    /// A method descriptor that does not follow the JVM grammar.
    #[error("invalid method signature {signature:?}: {reason}")]
    InvalidSignature { signature: String, reason: String },
}

/// Errors produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// The host value has no conversion to the requested native kind.
    #[error("cannot convert {found} to {expected}")]
    Conversion {
        expected: &'static str,
        found: &'static str,
    },

    /// The platform loader refused the library. `message` is its text verbatim.
    #[error("failed to load {path}: {message}")]
    LibraryLoad { path: String, message: String },

    /// Strict binding found a symbol missing from the library.
    #[error("symbol {name} not found in {path}")]
    MissingSymbol { name: &'static str, path: String },

    /// The binder is not in the `Bound` state.
    #[error("no library is bound")]
    NotBound,

    /// The foreign side returned a status other than `JNI_OK`.
    #[error("{}", foreign_message(.code, .info))]
    ForeignCall {
        code: jni::jint,
        info: Option<&'static str>,
    },

    /// The libjvm locator could not find a library to load.
    #[error("{0}")]
    Locate(String),
}

fn foreign_message(code: &jni::jint, info: &Option<&'static str>) -> String {
    let reason = Status::from_code(*code).reason();
    match info {
        Some(info) => format!("{info}: {reason}"),
        None => reason.into_owned(),
    }
}

impl Error {
    /// Returns the raw foreign status code for `ForeignCall` errors.
    pub fn code(&self) -> Option<jni::jint> {
        match self {
            Error::ForeignCall { code, .. } => Some(*code),
            _ => None,
        }
    }
}
