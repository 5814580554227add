//! Interception of `va_list` slots (`Call<T>MethodV` and friends).
//!
//! The slot holds a closure with the slot's fixed signature, the `va_list`
//! being an ordinary pointer argument. Arguments are read from a copy of the
//! list before forwarding; the callee receives the list untouched.

use std::ffi::c_void;
use std::sync::Arc;

use crate::cache::MethodId;
use crate::catalog::MethodDescriptor;
use crate::error::{Result, TraceError};
use crate::intercept::Interception;
use crate::sink::{CallContext, TraceEvent};
use crate::sys::jni::JNIEnv;
use crate::trampoline::{emit_trampoline, CallHandler, CodeAddress, Forwarder, TrampolineSpec};
use crate::types::{self, JValue, NativeType, RawValue};
#[cfg(all(
    any(target_os = "linux", target_os = "android"),
    any(target_arch = "x86_64", target_arch = "aarch64")
))]
use crate::va_list::VaListReader;

/// Builds before/after instrumentation for `va_list` slots.
#[derive(Debug, Clone)]
pub struct VaListInterceptor {
    ctx: Arc<Interception>,
}

impl VaListInterceptor {
    pub fn new(ctx: Arc<Interception>) -> Self {
        Self { ctx }
    }

    pub fn create_intercept(
        &self,
        descriptor: &'static MethodDescriptor,
        real: *const c_void,
    ) -> Result<CodeAddress> {
        let id_position = descriptor.method_id_position().ok_or(TraceError::UnsupportedType(
            "va_list entry without a jmethodID parameter",
        ))?;
        let params = types::convert_all(descriptor.args)?;
        let ret = descriptor.ret.ffi_type()?;
        let handler = VaListHandler {
            ctx: self.ctx.clone(),
            descriptor,
            id_position,
            forwarder: Forwarder::new(&params, ret, real),
        };
        let trampoline = emit_trampoline(TrampolineSpec::new(params, ret), handler);
        let trampoline = self.ctx.retainer.retain(Arc::new(trampoline));
        Ok(trampoline.code())
    }
}

/// What `on_enter` learned about one call.
struct Entered {
    real_env: *mut JNIEnv,
    extracted: Option<(Vec<JValue>, Vec<NativeType>)>,
}

struct VaListHandler {
    ctx: Arc<Interception>,
    descriptor: &'static MethodDescriptor,
    id_position: usize,
    forwarder: Forwarder,
}

impl VaListHandler {
    /// Returns `None` when the call must pass through untouched: the thread
    /// has no known real env, or the caller already used it.
    unsafe fn on_enter(&self, args: &[*const c_void]) -> Option<Entered> {
        let passed_env = *(args[0] as *const usize);
        let real_env = self.ctx.registry.current()?;
        if real_env.addr() == passed_env {
            return None;
        }

        let mut extracted = None;
        if self.ctx.wants(self.descriptor) {
            let id = MethodId::from_addr(*(args[self.id_position] as *const usize));
            match id.and_then(|id| self.ctx.signatures.get(id)) {
                Some(record) => {
                    let va_list = *(args[args.len() - 1] as *const *const c_void);
                    extracted = read_va_list(va_list, &record.java_params)
                        .map(|values| (values, record.java_params.clone()));
                }
                None => log::warn!(
                    "{}: no signature for method id {:?}, arguments not decoded",
                    self.descriptor.name,
                    id
                ),
            }
        }

        Some(Entered {
            real_env: real_env.as_ptr(),
            extracted,
        })
    }

    fn on_leave(&self, args: &[*const c_void], entered: Entered, ret: RawValue) {
        if !self.ctx.wants(self.descriptor) {
            return;
        }
        let fixed = self.descriptor.fixed_args();
        let mut values: Vec<JValue> = fixed
            .iter()
            .zip(args)
            .map(|(ty, ptr)| unsafe { JValue::read(*ty, *ptr) })
            .collect();
        let java_params = entered.extracted.map(|(decoded, types)| {
            values.extend(decoded);
            types
        });
        self.ctx.emit(&TraceEvent {
            descriptor: self.descriptor,
            args: values,
            ret: ret.decode(self.descriptor.ret),
            context: CallContext::current(),
            java_params,
        });
    }
}

impl CallHandler for VaListHandler {
    unsafe fn call(&self, args: &[*const c_void]) -> RawValue {
        let Some(entered) = self.on_enter(args) else {
            return self.forwarder.call(args);
        };

        let real_env = entered.real_env;
        let mut forwarded = args.to_vec();
        forwarded[0] = &real_env as *const *mut JNIEnv as *const c_void;
        let ret = self.forwarder.call(&forwarded);

        self.on_leave(&forwarded, entered, ret);
        ret
    }
}

#[cfg(all(
    any(target_os = "linux", target_os = "android"),
    any(target_arch = "x86_64", target_arch = "aarch64")
))]
unsafe fn read_va_list(va_list: *const c_void, types: &[NativeType]) -> Option<Vec<JValue>> {
    if va_list.is_null() {
        return None;
    }
    Some(VaListReader::new(va_list).read_all(types))
}

#[cfg(not(all(
    any(target_os = "linux", target_os = "android"),
    any(target_arch = "x86_64", target_arch = "aarch64")
)))]
unsafe fn read_va_list(_va_list: *const c_void, _types: &[NativeType]) -> Option<Vec<JValue>> {
    None
}
