//! Trace events and where they go.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, ThreadId};

use crate::catalog::MethodDescriptor;
use crate::types::{JValue, NativeType};

/// Who made the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub thread: ThreadId,
}

impl CallContext {
    pub fn current() -> Self {
        Self {
            thread: thread::current().id(),
        }
    }
}

/// One observed JNI call.
///
/// `args` holds the values of the descriptor's fixed parameters in order.
/// When the call's Java-level arguments were decoded (variadic, `va_list` and
/// `jvalue` array entries with a resolved method id), they follow the fixed
/// values and `java_params` holds their declared types.
#[derive(Debug, Clone)]
pub struct TraceEvent {
    pub descriptor: &'static MethodDescriptor,
    pub args: Vec<JValue>,
    pub ret: JValue,
    pub context: CallContext,
    pub java_params: Option<Vec<NativeType>>,
}

impl TraceEvent {
    /// Values of the descriptor's fixed parameters.
    pub fn fixed_args(&self) -> &[JValue] {
        let n = self.descriptor.fixed_args().len().min(self.args.len());
        &self.args[..n]
    }

    /// Decoded Java-level arguments; empty when none were decoded.
    pub fn java_args(&self) -> &[JValue] {
        let n = self.descriptor.fixed_args().len().min(self.args.len());
        &self.args[n..]
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}(", self.context.thread, self.descriptor.name)?;
        let fixed = self.descriptor.fixed_args();
        for (i, value) in self.fixed_args().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {value}", fixed[i])?;
        }
        if let Some(types) = &self.java_params {
            f.write_str(" | ")?;
            for (i, (ty, value)) in types.iter().zip(self.java_args()).enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{ty} {value}")?;
            }
        }
        f.write_str(")")?;
        if self.descriptor.ret != NativeType::Void {
            write!(f, " = {} {}", self.descriptor.ret, self.ret)?;
        }
        Ok(())
    }
}

/// Receives every traced call, on the calling thread, before the caller sees
/// the return value.
pub trait TraceSink: Send + Sync {
    fn trace(&self, event: &TraceEvent);
}

/// Writes each event at `info` level under the `jni_shadow::trace` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn trace(&self, event: &TraceEvent) {
        log::info!(target: "jni_shadow::trace", "{event}");
    }
}

impl<F> TraceSink for F
where
    F: Fn(&TraceEvent) + Send + Sync,
{
    fn trace(&self, event: &TraceEvent) {
        self(event)
    }
}

/// Hands `event` to `sink`. A panic inside the sink is logged and swallowed;
/// it must not unwind into native frames.
pub(crate) fn emit(sink: &dyn TraceSink, event: &TraceEvent) {
    let result = panic::catch_unwind(AssertUnwindSafe(|| sink.trace(event)));
    if result.is_err() {
        log::error!("trace sink panicked while handling {}", event.descriptor.name);
    }
}
