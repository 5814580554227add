//! Generated entry points and forwarding calls.
//!
//! A [`Trampoline`] is a libffi closure: a fresh native function with a
//! runtime-described signature whose body is a [`CallHandler`]. A
//! [`Forwarder`] is the opposite direction, a prepared call interface bound
//! to a real function address.
//!
//! ```text
//!  caller ──► Trampoline (closure) ──► CallHandler::call(args)
//!                                          │  substitute env, record
//!                                          ▼
//!                                      Forwarder::call ──► real JNI function
//! ```
//!
//! Both sides exchange results through a single 64-bit slot ([`RawValue`]),
//! so a forwarded result goes back to the caller bit for bit.

pub mod dispatch;

use std::ffi::c_void;
use std::fmt;
use std::slice;

use libffi::low::{self, ffi_cif};
use libffi::middle::{Cif, Closure, CodePtr};
use libffi::raw;

use crate::error::{Result, TraceError};
use crate::types::{FfiType, RawValue};

/// Address of generated or real machine code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodeAddress(usize);

impl CodeAddress {
    pub fn addr(self) -> usize {
        self.0
    }

    pub fn as_ptr(self) -> *const c_void {
        self.0 as *const c_void
    }
}

impl fmt::Display for CodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Native signature of a generated entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrampolineSpec {
    pub params: Vec<FfiType>,
    pub ret: FfiType,
}

impl TrampolineSpec {
    pub fn new(params: Vec<FfiType>, ret: FfiType) -> Self {
        Self { params, ret }
    }

    fn cif(&self) -> Cif {
        Cif::new(self.params.iter().map(|t| t.to_libffi()), self.ret.to_libffi())
    }
}

/// Body of a trampoline.
pub trait CallHandler: Send + Sync {
    /// `args` holds one pointer per declared parameter, each pointing at the
    /// parameter's storage. The returned slot is handed to the caller.
    ///
    /// # Safety
    ///
    /// Only called from the trampoline with the storage libffi prepared for
    /// the trampoline's own signature.
    unsafe fn call(&self, args: &[*const c_void]) -> RawValue;
}

struct HandlerCell {
    handler: Box<dyn CallHandler>,
    arity: usize,
    returns_value: bool,
}

unsafe extern "C" fn on_call(
    _cif: &ffi_cif,
    result: &mut u64,
    args: *const *const c_void,
    cell: &HandlerCell,
) {
    let args = if cell.arity == 0 {
        &[][..]
    } else {
        slice::from_raw_parts(args, cell.arity)
    };
    let raw = cell.handler.call(args);
    if cell.returns_value {
        *result = raw.bits();
    }
}

/// A generated native entry point.
pub struct Trampoline {
    // Declared before `cell`: the closure refers to it and must go first.
    closure: Closure<'static>,
    cell: Box<HandlerCell>,
    spec: TrampolineSpec,
}

// The closure's code and the handler are immutable once built, and
// `CallHandler` is `Send + Sync`.
unsafe impl Send for Trampoline {}
unsafe impl Sync for Trampoline {}

impl Trampoline {
    pub fn code(&self) -> CodeAddress {
        CodeAddress(*self.closure.code_ptr() as usize)
    }

    pub fn spec(&self) -> &TrampolineSpec {
        &self.spec
    }

    pub fn arity(&self) -> usize {
        self.cell.arity
    }
}

impl fmt::Debug for Trampoline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trampoline")
            .field("code", &self.code())
            .field("spec", &self.spec)
            .finish()
    }
}

/// Builds a native entry point with signature `spec` that runs `handler`.
pub fn emit_trampoline<H>(spec: TrampolineSpec, handler: H) -> Trampoline
where
    H: CallHandler + 'static,
{
    let cell = Box::new(HandlerCell {
        handler: Box::new(handler),
        arity: spec.params.len(),
        returns_value: spec.ret != FfiType::Void,
    });
    // The cell is heap-allocated and owned by the trampoline, which drops the
    // closure first.
    let userdata: &'static HandlerCell = unsafe { &*(&*cell as *const HandlerCell) };
    let closure = Closure::new(spec.cif(), on_call, userdata);
    Trampoline { closure, cell, spec }
}

/// A prepared call to a real function.
pub struct Forwarder {
    cif: Cif,
    target: CodePtr,
}

// `ffi_call` only reads the prepared cif.
unsafe impl Send for Forwarder {}
unsafe impl Sync for Forwarder {}

impl Forwarder {
    pub fn new(params: &[FfiType], ret: FfiType, target: *const c_void) -> Self {
        Self {
            cif: Cif::new(params.iter().map(|t| t.to_libffi()), ret.to_libffi()),
            target: CodePtr(target as *mut c_void),
        }
    }

    /// Call interface for a C variadic target: the first `fixed` parameters
    /// are named, the rest are variadic. Variadic parameter types must
    /// already be promoted.
    pub fn variadic(
        params: &[FfiType],
        fixed: usize,
        ret: FfiType,
        target: *const c_void,
    ) -> Result<Self> {
        let cif = Cif::new(params.iter().map(|t| t.to_libffi()), ret.to_libffi());
        // Re-prepare in place; the `Cif` keeps owning the type arrays.
        unsafe {
            let prepared = cif.as_raw_ptr();
            low::prep_cif_var(
                prepared,
                raw::ffi_abi_FFI_DEFAULT_ABI,
                fixed,
                params.len(),
                (*prepared).rtype,
                (*prepared).arg_types,
            )
            .map_err(|e| TraceError::CallInterface(format!("{e:?}")))?;
        }
        Ok(Self {
            cif,
            target: CodePtr(target as *mut c_void),
        })
    }

    /// Calls the target.
    ///
    /// # Safety
    ///
    /// `args` must hold one pointer per parameter of the call interface, each
    /// pointing at a value of that parameter's type.
    pub unsafe fn call(&self, args: &[*const c_void]) -> RawValue {
        let mut ret: u64 = 0;
        raw::ffi_call(
            self.cif.as_raw_ptr(),
            Some(*self.target.as_safe_fun()),
            &mut ret as *mut u64 as *mut c_void,
            args.as_ptr() as *mut *mut c_void,
        );
        RawValue::from_bits(ret)
    }
}

impl fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forwarder")
            .field("target", &self.target.as_ptr())
            .finish()
    }
}
