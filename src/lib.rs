//! # jni-shadow
//!
//! Trace every JNI call a native library makes, by handing it a **shadow
//! `JNIEnv`** whose function table forwards to the real VM.
//!
//! Each slot of the shadow table holds generated code that restores the
//! calling thread's real `JNIEnv*`, calls the real function, reports the call
//! to a [`TraceSink`] and returns the real result unchanged.
//!
//! ## Features
//!
//! - **Every slot**: all 229 functions of the JNI 1.6 table, 232 with the
//!   JDK 24 layout
//! - **Variadic calls decoded**: `Call<T>Method(env, obj, mid, ...)`
//!   arguments are typed from the signature seen by `GetMethodID`
//! - **`va_list` calls decoded**: `Call<T>MethodV` arguments are read from a
//!   copy of the list, x86_64 and AArch64
//! - **Bit-exact returns**: floating results are bit-cast, never converted
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jni_shadow::prelude::*;
//!
//! fn install(real_env: *mut jni::JNIEnv) -> jni_shadow::Result<*mut jni::JNIEnv> {
//!     let registry = Arc::new(ThreadEnvRegistry::new());
//!     registry.register_current(real_env);
//!
//!     let config = TraceConfig::parse("version=auto,exclude=ExceptionCheck")?;
//!     let ctx = Arc::new(
//!         Interception::new(registry, Arc::new(LogSink)).with_filter(config.filter.clone()),
//!     );
//!     let table = ShadowTableBuilder::with_config(ctx, &config).build()?;
//!
//!     // Hand this to the traced library instead of `real_env`.
//!     Ok(table.env())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 ShadowTableBuilder (shadow)              │
//! │   reads the real table, one interceptor per CallShape    │
//! ├──────────────────┬──────────────────┬───────────────────┤
//! │  fixed           │  variadic        │  valist           │
//! │  closure per     │  dispatch thunk  │  closure per slot │
//! │  slot, captures  │  + closure per   │  + va_list copy   │
//! │  signatures      │  (slot, method)  │    reader         │
//! ├──────────────────┴──────────────────┴───────────────────┤
//! │   Interception: registry, sink, caches, retainer        │
//! ├─────────────────────────────────────────────────────────┤
//! │   trampoline (libffi)  │  trampoline::dispatch (asm)    │
//! ├─────────────────────────────────────────────────────────┤
//! │   catalog · signature · types · sys::jni                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`sys::jni`] | Raw JNI types and table layout constants |
//! | [`types`] | C type tags, calling-convention types, decoded values |
//! | [`signature`] | Method descriptor parser |
//! | [`catalog`] | Name and signature of every table slot |
//! | [`registry`] | Thread → real env lookup |
//! | [`cache`] | Resolved signatures, synthesized trampolines |
//! | [`retainer`] | Keeps generated code alive |
//! | [`sink`] | Trace events and their consumers |
//! | [`config`] | Agent option parsing |
//! | [`trampoline`] | libffi closures, forwarders, dispatch thunks |
//! | [`intercept`] | The three interceptors |
//! | [`shadow`] | Table construction |
//!
//! ## Platform Support
//!
//! | Target | Shadow table |
//! |--------|--------------|
//! | x86_64 Linux / Android | yes |
//! | AArch64 Linux / Android | yes |
//! | anything else | [`TraceError::UnsupportedPlatform`] from the builder |
//!
//! Every table contains `...` slots, and their dispatch stubs exist only for
//! the System V x86_64 and AAPCS64 calling conventions. The `va_list` layout
//! read by the `va_list` module is the one those two ABIs use on Linux.
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`] facade: table construction and
//! trampoline synthesis at `debug`, undecodable arguments at `warn`,
//! unresolved method ids and sink panics at `error`. [`LogSink`] writes
//! events at `info` under the `jni_shadow::trace` target.

pub mod sys;

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod intercept;
pub mod prelude;
pub mod registry;
pub mod retainer;
pub mod shadow;
pub mod signature;
pub mod sink;
pub mod trampoline;
pub mod types;
#[cfg(all(
    any(target_os = "linux", target_os = "android"),
    any(target_arch = "x86_64", target_arch = "aarch64")
))]
pub mod va_list;

pub use crate::sys::jni;

pub use crate::cache::{MethodId, MethodSignatureCache, MethodSignatureRecord, TrampolineCache};
pub use crate::catalog::{CallShape, JniVersion, MethodCatalog, MethodDescriptor};
pub use crate::config::{MethodFilter, TraceConfig, VersionSelection};
pub use crate::error::{Result, TraceError};
pub use crate::intercept::Interception;
pub use crate::registry::{EnvPtr, EnvironmentRegistry, ThreadEnvRegistry};
pub use crate::retainer::ReferenceRetainer;
pub use crate::shadow::{ShadowTable, ShadowTableBuilder};
pub use crate::signature::{JavaSignature, JavaType, ParseError};
pub use crate::sink::{CallContext, LogSink, TraceEvent, TraceSink};
pub use crate::types::{FfiType, JValue, NativeType, RawValue};
