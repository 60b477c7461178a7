//! Raw FFI declarations mirroring `jni.h`.
//!
//! Everything here is plain data: type aliases, `#[repr(C)]` structs and the
//! `jvalue` union. The safe layer in the crate root is built on top of it.

pub mod jni;
