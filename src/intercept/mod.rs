//! Per-slot interceptors.
//!
//! | Shape                 | Interceptor                | Installed code             |
//! |-----------------------|----------------------------|----------------------------|
//! | [`CallShape::Fixed`]    | [`FixedArityInterceptor`]  | libffi closure             |
//! | [`CallShape::Variadic`] | [`VariadicInterceptor`]    | dispatch thunk + lazy closures |
//! | [`CallShape::VaList`]   | [`VaListInterceptor`]      | libffi closure             |
//!
//! All three share one [`Interception`] context.
//!
//! [`CallShape::Fixed`]: crate::catalog::CallShape::Fixed
//! [`CallShape::Variadic`]: crate::catalog::CallShape::Variadic
//! [`CallShape::VaList`]: crate::catalog::CallShape::VaList

pub mod fixed;
pub mod valist;
pub mod variadic;

pub use fixed::FixedArityInterceptor;
pub use valist::VaListInterceptor;
pub use variadic::{VariadicInterceptor, VariadicShape};

use std::fmt;
use std::sync::Arc;
use std::thread;

use crate::cache::{MethodSignatureCache, TrampolineCache};
use crate::catalog::MethodDescriptor;
use crate::config::MethodFilter;
use crate::error::TraceError;
use crate::registry::{EnvPtr, EnvironmentRegistry};
use crate::retainer::ReferenceRetainer;
use crate::sink::{self, TraceEvent, TraceSink};
use crate::trampoline::Trampoline;

/// State shared by every interceptor of a tracer.
pub struct Interception {
    pub registry: Arc<dyn EnvironmentRegistry>,
    pub sink: Arc<dyn TraceSink>,
    pub signatures: MethodSignatureCache,
    pub trampolines: TrampolineCache<Trampoline>,
    pub retainer: ReferenceRetainer,
    pub filter: MethodFilter,
}

impl Interception {
    pub fn new(registry: Arc<dyn EnvironmentRegistry>, sink: Arc<dyn TraceSink>) -> Self {
        Self {
            registry,
            sink,
            signatures: MethodSignatureCache::new(),
            trampolines: TrampolineCache::new(),
            retainer: ReferenceRetainer::new(),
            filter: MethodFilter::all(),
        }
    }

    pub fn with_filter(mut self, filter: MethodFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Whether calls to `descriptor` are reported.
    pub fn wants(&self, descriptor: &MethodDescriptor) -> bool {
        self.filter.allows(descriptor.name)
    }

    pub(crate) fn emit(&self, event: &TraceEvent) {
        sink::emit(self.sink.as_ref(), event);
    }

    /// Real env of the calling thread. Without one the call cannot be
    /// forwarded safely, so the process is aborted.
    pub(crate) fn real_env_or_abort(&self, descriptor: &MethodDescriptor) -> EnvPtr {
        match self.registry.current() {
            Some(env) => env,
            None => {
                let err = TraceError::MissingEnvironment(format!("{:?}", thread::current().id()));
                log::error!("{}: {err}; aborting", descriptor.name);
                std::process::abort()
            }
        }
    }
}

impl fmt::Debug for Interception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interception")
            .field("signatures", &self.signatures)
            .field("trampolines", &self.trampolines)
            .field("retainer", &self.retainer)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}
