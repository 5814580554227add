//! Interception of C variadic (`...`) slots.
//!
//! Two levels:
//!
//! 1. A dispatch thunk sits in the table. On every call it reads the method
//!    id from the argument registers and picks a target.
//! 2. A per-`(slot, method id)` closure built on first use from the
//!    signature recorded when the id was resolved. It has the concrete,
//!    promoted parameter list of that method, so libffi can read every
//!    argument, and it forwards through a variadic call interface.

use std::ffi::c_void;
use std::sync::Arc;

use crate::cache::{MethodId, MethodSignatureRecord};
use crate::catalog::MethodDescriptor;
use crate::error::{Result, TraceError};
use crate::intercept::Interception;
use crate::sink::{CallContext, TraceEvent};
use crate::sys::jni::JNIEnv;
use crate::trampoline::dispatch::{DispatchArena, DispatchContext, DispatchResolver};
use crate::trampoline::{
    emit_trampoline, CallHandler, CodeAddress, Forwarder, Trampoline, TrampolineSpec,
};
use crate::types::{self, FfiType, JValue, NativeType, RawValue};

/// Native shape of one variadic slot called with one specific method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariadicShape {
    /// Fixed prefix followed by the promoted Java parameters.
    pub params: Vec<FfiType>,
    /// Length of the fixed prefix.
    pub fixed: usize,
    /// Declared Java parameter types, for reporting.
    pub java_params: Vec<NativeType>,
    pub ret: FfiType,
}

impl VariadicShape {
    pub fn new(descriptor: &MethodDescriptor, record: &MethodSignatureRecord) -> Result<Self> {
        let mut params = types::convert_all(descriptor.fixed_args())?;
        let fixed = params.len();
        params.extend(record.params.iter().map(|t| t.promoted()));
        Ok(Self {
            params,
            fixed,
            java_params: record.java_params.clone(),
            ret: descriptor.ret.ffi_type()?,
        })
    }

    pub fn spec(&self) -> TrampolineSpec {
        TrampolineSpec::new(self.params.clone(), self.ret)
    }
}

/// Installs dispatch thunks for variadic slots.
#[derive(Debug, Clone)]
pub struct VariadicInterceptor {
    ctx: Arc<Interception>,
    arena: Arc<DispatchArena>,
}

impl VariadicInterceptor {
    pub fn new(ctx: Arc<Interception>, arena: Arc<DispatchArena>) -> Self {
        Self { ctx, arena }
    }

    pub fn create_intercept(
        &self,
        descriptor: &'static MethodDescriptor,
        real: *const c_void,
    ) -> Result<CodeAddress> {
        let id_position = descriptor.method_id_position().ok_or(TraceError::UnsupportedType(
            "variadic entry without a jmethodID parameter",
        ))?;
        let resolver = VariadicResolver {
            ctx: self.ctx.clone(),
            descriptor,
            real: real as usize,
            id_position,
        };
        let context = self
            .ctx
            .retainer
            .retain(Arc::new(DispatchContext::new(Box::new(resolver))));
        self.arena.emit_thunk(&context)
    }
}

struct VariadicResolver {
    ctx: Arc<Interception>,
    descriptor: &'static MethodDescriptor,
    real: usize,
    id_position: usize,
}

impl VariadicResolver {
    fn synthesize(&self, id: MethodId) -> Result<Arc<Trampoline>> {
        let record = self.ctx.signatures.get(id).ok_or(TraceError::UnresolvedMethod {
            name: self.descriptor.name,
            method_id: id.addr(),
        })?;
        let shape = VariadicShape::new(self.descriptor, &record)?;
        log::debug!(
            "{}: synthesizing trampoline for {id} with {:?}",
            self.descriptor.name,
            shape.params
        );
        let forwarder = Forwarder::variadic(
            &shape.params,
            shape.fixed,
            shape.ret,
            self.real as *const c_void,
        )?;
        let spec = shape.spec();
        let handler = VariadicHandler {
            ctx: self.ctx.clone(),
            descriptor: self.descriptor,
            shape,
            forwarder,
        };
        Ok(self.ctx.retainer.retain(Arc::new(emit_trampoline(spec, handler))))
    }
}

impl DispatchResolver for VariadicResolver {
    unsafe fn resolve(&self, regs: &mut [usize]) -> usize {
        let env = self.ctx.real_env_or_abort(self.descriptor);
        regs[0] = env.addr();

        let Some(id) = MethodId::from_addr(regs[self.id_position]) else {
            log::error!("{}: called with a null method id", self.descriptor.name);
            return self.real;
        };
        let slot = self.descriptor.index;
        match self.ctx.trampolines.get_or_synthesize(slot, id, || self.synthesize(id)) {
            Ok(trampoline) => trampoline.code().addr(),
            Err(e) => {
                log::error!("{e}; forwarding untraced");
                self.real
            }
        }
    }
}

struct VariadicHandler {
    ctx: Arc<Interception>,
    descriptor: &'static MethodDescriptor,
    shape: VariadicShape,
    forwarder: Forwarder,
}

impl CallHandler for VariadicHandler {
    unsafe fn call(&self, args: &[*const c_void]) -> RawValue {
        let real_env: *mut JNIEnv = self.ctx.real_env_or_abort(self.descriptor).as_ptr();
        let mut forwarded = args.to_vec();
        forwarded[0] = &real_env as *const *mut JNIEnv as *const c_void;

        let ret = self.forwarder.call(&forwarded);

        if self.ctx.wants(self.descriptor) {
            let (fixed, java) = forwarded.split_at(self.shape.fixed);
            let values = self
                .descriptor
                .fixed_args()
                .iter()
                .zip(fixed)
                .map(|(ty, ptr)| JValue::read(*ty, *ptr))
                .chain(
                    self.shape
                        .java_params
                        .iter()
                        .zip(java)
                        .map(|(ty, ptr)| JValue::read_promoted(*ty, *ptr)),
                )
                .collect();
            self.ctx.emit(&TraceEvent {
                descriptor: self.descriptor,
                args: values,
                ret: ret.decode(self.descriptor.ret),
                context: CallContext::current(),
                java_params: Some(self.shape.java_params.clone()),
            });
        }

        ret
    }
}
