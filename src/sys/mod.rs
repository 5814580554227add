//! Raw FFI declarations.

pub mod jni;
