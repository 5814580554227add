//! Interception of ordinary fixed-arity slots.

use std::ffi::{c_char, c_void, CStr};
use std::sync::Arc;

use crate::cache::{MethodId, MethodSignatureRecord};
use crate::catalog::MethodDescriptor;
use crate::error::{Result, TraceError};
use crate::intercept::Interception;
use crate::signature::JavaSignature;
use crate::sink::{CallContext, TraceEvent};
use crate::sys::jni::{jvalue, JNIEnv};
use crate::trampoline::{emit_trampoline, CallHandler, CodeAddress, Forwarder, TrampolineSpec};
use crate::types::{self, JValue, NativeType, RawValue};

/// Argument position of the descriptor string in `GetMethodID` and
/// `GetStaticMethodID`.
const SIGNATURE_ARG: usize = 3;

/// Builds one forwarding trampoline per fixed-arity slot.
#[derive(Debug, Clone)]
pub struct FixedArityInterceptor {
    ctx: Arc<Interception>,
}

impl FixedArityInterceptor {
    pub fn new(ctx: Arc<Interception>) -> Self {
        Self { ctx }
    }

    /// Returns the entry point to install in place of `real`.
    pub fn create_intercept(
        &self,
        descriptor: &'static MethodDescriptor,
        real: *const c_void,
    ) -> Result<CodeAddress> {
        let params = types::convert_all(descriptor.args)?;
        let ret = descriptor.ret.ffi_type()?;
        let handler = FixedHandler {
            ctx: self.ctx.clone(),
            descriptor,
            forwarder: Forwarder::new(&params, ret, real),
        };
        let trampoline = emit_trampoline(TrampolineSpec::new(params, ret), handler);
        let trampoline = self.ctx.retainer.retain(Arc::new(trampoline));
        Ok(trampoline.code())
    }
}

struct FixedHandler {
    ctx: Arc<Interception>,
    descriptor: &'static MethodDescriptor,
    forwarder: Forwarder,
}

impl FixedHandler {
    /// Records the signature behind a freshly resolved method id.
    unsafe fn capture_signature(&self, args: &[*const c_void], ret: RawValue) {
        let Some(id) = MethodId::from_addr(ret.bits() as usize) else {
            return;
        };
        let sig_ptr = *(args[SIGNATURE_ARG] as *const *const c_char);
        if sig_ptr.is_null() {
            return;
        }
        let descriptor = CStr::from_ptr(sig_ptr).to_string_lossy();
        let record = JavaSignature::parse(&descriptor)
            .map_err(TraceError::from)
            .and_then(|sig| MethodSignatureRecord::from_signature(&sig));
        match record {
            Ok(record) => {
                self.ctx.signatures.insert(id, record);
                log::debug!("{}: {id} has signature {descriptor}", self.descriptor.name);
            }
            Err(e) => log::warn!("{}: cannot use signature {descriptor:?}: {e}", self.descriptor.name),
        }
    }

    /// Decodes the `jvalue` array of an `*A` call when its method id is known.
    unsafe fn expand_jvalues(&self, args: &[*const c_void]) -> Option<(Vec<JValue>, Vec<NativeType>)> {
        let position = self.descriptor.method_id_position()?;
        let id = MethodId::from_addr(*(args[position] as *const usize))?;
        let record = self.ctx.signatures.get(id)?;
        let values = *(args[args.len() - 1] as *const *const jvalue);
        if values.is_null() && !record.java_params.is_empty() {
            return None;
        }
        let decoded = record
            .java_params
            .iter()
            .enumerate()
            .map(|(i, ty)| JValue::from_jvalue(*ty, &*values.add(i)))
            .collect();
        Some((decoded, record.java_params.clone()))
    }
}

impl CallHandler for FixedHandler {
    unsafe fn call(&self, args: &[*const c_void]) -> RawValue {
        let real_env: *mut JNIEnv = self.ctx.real_env_or_abort(self.descriptor).as_ptr();
        let mut forwarded = args.to_vec();
        forwarded[0] = &real_env as *const *mut JNIEnv as *const c_void;

        let ret = self.forwarder.call(&forwarded);

        if self.descriptor.is_method_resolution() {
            self.capture_signature(&forwarded, ret);
        }

        if self.ctx.wants(self.descriptor) {
            let mut values: Vec<JValue> = self
                .descriptor
                .args
                .iter()
                .zip(&forwarded)
                .map(|(ty, ptr)| JValue::read(*ty, *ptr))
                .collect();
            let mut java_params = None;
            if self.descriptor.takes_jvalues() {
                if let Some((decoded, types)) = self.expand_jvalues(&forwarded) {
                    values.extend(decoded);
                    java_params = Some(types);
                }
            }
            self.ctx.emit(&TraceEvent {
                descriptor: self.descriptor,
                args: values,
                ret: ret.decode(self.descriptor.ret),
                context: CallContext::current(),
                java_params,
            });
        }

        ret
    }
}
