//! Common imports for installing a tracer.
//!
//! This prelude is intentionally small. It covers what an agent needs to build
//! a shadow table and consume its events.

pub use crate::config::{MethodFilter, TraceConfig, VersionSelection};
pub use crate::error::{Result, TraceError};
pub use crate::intercept::Interception;
pub use crate::registry::{EnvironmentRegistry, ThreadEnvRegistry};
pub use crate::shadow::{ShadowTable, ShadowTableBuilder};
pub use crate::sink::{LogSink, TraceEvent, TraceSink};
pub use crate::sys::jni;
pub use crate::types::JValue;
