//! # jni-cdata
//!
//! ABI-exact JNI values for a host scripting runtime.
//!
//! This crate exposes the data half of the Java Native Interface: the
//! primitive types, object handles, member identifiers, the `jvalue` union
//! and the Invocation API records. Every value has exactly the layout
//! `jni.h` gives it, so its address can be handed straight to the VM.
//!
//! It also carries a small dynamic-loader shim, [`binder::Binder`], that
//! opens a shared library and resolves a fixed list of entry points.
//!
//! ## Quick Start
//!
//! ```rust
//! use jni_cdata::prelude::*;
//!
//! let mut count = JIntCell::new();
//! count.set_host(&HostValue::Int(42)).unwrap();
//! assert_eq!(count.get(), 42);
//!
//! let mut v = JValue::new();
//! v.set_j(-1);
//! assert_eq!(v.i(), -1);
//! assert_eq!(v.b(), -1);
//! ```
//!
//! Records borrow the strings they point at:
//!
//! ```rust
//! use jni_cdata::prelude::*;
//!
//! let heap = c"-Xmx512m";
//! let options = [VmOption::new(heap)];
//! let args = VmInitArgs::new(jni::JNI_VERSION_1_8, &options, false).unwrap();
//! assert_eq!(args.n_options(), 1);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Host runtime                          │
//! │              HostValue in, HostValue out                 │
//! ├─────────────────────────────────────────────────────────┤
//! │     Invocation (embed)         Export registry           │
//! │  JNI_CreateJavaVM, JavaVm     type + constant tables     │
//! ├─────────────────────────────────────────────────────────┤
//! │   Records            JValue           Binder             │
//! │ NativeMethod, VM*   jvalue union   dlopen + symbols      │
//! ├─────────────────────────────────────────────────────────┤
//! │          NativeCell<K>            Handle<T>              │
//! │        one scalar per kind     opaque references         │
//! ├─────────────────────────────────────────────────────────┤
//! │              Raw FFI declarations (sys::jni)             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`sys::jni`] | Raw `jni.h` types, constants and records |
//! | [`value`] | [`Kind`](value::Kind), native and host boxed values |
//! | [`cell`] | [`NativeCell`](cell::NativeCell) and the [`CData`](cell::CData) trait |
//! | [`jvalue`] | The `jvalue` union |
//! | [`handle`] | Object references and member identifiers |
//! | [`record`] | `JNINativeMethod`, `JavaVMOption`, `JavaVMInitArgs`, `JavaVMAttachArgs` |
//! | [`signature`] | Method descriptor parsing |
//! | [`status`] | Result codes and versions |
//! | [`binder`] | Dynamic symbol binding |
//! | [`embed`] | `libjvm` location and the Invocation API |
//! | [`exports`] | Process-wide type and constant registry |
//!
//! ## Thread Safety
//!
//! Cells, unions and records are plain memory with no locking. Anything
//! holding a raw pointer is `!Send`; share it across threads only under
//! your own synchronisation. The export registry is the one piece of
//! process-wide state and sits behind an `RwLock`.
//!
//! ## Logging
//!
//! Library loading and registry changes are reported through `tracing`
//! under the `jni_cdata::*` targets. No subscriber is installed.

pub mod binder;
pub mod cell;
pub mod embed;
pub mod error;
pub mod exports;
pub mod handle;
pub mod jvalue;
pub mod kind;
pub mod prelude;
pub mod record;
pub mod signature;
pub mod status;
pub mod sys;
pub mod value;

pub use error::{ArgumentError, Error, Result};
