//! Register-preserving dispatch thunks for C variadic entries.
//!
//! A `...` entry cannot be a libffi closure: its argument list is only known
//! once the method id is. Each variadic slot instead gets a small thunk that
//! loads a pointer to its [`DispatchContext`] and jumps to a shared assembly
//! stub. The stub spills every argument register, asks the context's
//! [`DispatchResolver`] where the call should go, restores the registers
//! (with any env rewrite applied) and tail-jumps there. The callee sees the
//! original stack and registers, exactly as if it had been called directly.
//!
//! Thunk layouts:
//!
//! ```text
//! x86_64  (32 bytes)            aarch64 (32 bytes)
//! 49 BA <ctx:8>  movabs r10     ldr x17, #16
//! 49 BB <stub:8> movabs r11     ldr x16, #20
//! 41 FF E3       jmp r11        br  x16
//! CC ...         int3 padding   nop
//!                               <ctx:8> <stub:8>
//! ```
//!
//! Supported: x86_64 System V and AArch64 AAPCS64 on Linux and Android.

use std::ffi::c_void;
use std::fmt;
use std::sync::Arc;

use memmap2::{Mmap, MmapMut};
use parking_lot::Mutex;

use crate::error::{Result, TraceError};
use crate::trampoline::CodeAddress;

/// Size of one thunk.
pub const THUNK_SIZE: usize = 32;

/// Number of integer argument registers spilled by the stub and visible to
/// the resolver.
#[cfg(target_arch = "x86_64")]
pub const INT_ARG_REGS: usize = 6;
#[cfg(target_arch = "aarch64")]
pub const INT_ARG_REGS: usize = 8;
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub const INT_ARG_REGS: usize = 0;

/// True when this target has a dispatch stub.
pub const SUPPORTED: bool = cfg!(all(
    any(target_os = "linux", target_os = "android"),
    any(target_arch = "x86_64", target_arch = "aarch64")
));

/// Decides where one variadic call goes.
pub trait DispatchResolver: Send + Sync {
    /// `regs` holds the caller's integer argument registers in order. Writes
    /// to it are visible to the callee. Returns the address to jump to.
    ///
    /// # Safety
    ///
    /// Only called from the dispatch stub, on the thread making the call.
    unsafe fn resolve(&self, regs: &mut [usize]) -> usize;
}

type EntryFn = unsafe extern "C" fn(ctx: *const c_void, regs: *mut usize) -> usize;

/// Per-slot state referenced by a thunk. The stub calls the function stored
/// in the first field.
#[repr(C)]
pub struct DispatchContext {
    entry: EntryFn,
    resolver: Box<dyn DispatchResolver>,
}

impl DispatchContext {
    pub fn new(resolver: Box<dyn DispatchResolver>) -> Self {
        Self {
            entry: dispatch_entry,
            resolver,
        }
    }
}

impl fmt::Debug for DispatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchContext").finish_non_exhaustive()
    }
}

unsafe extern "C" fn dispatch_entry(ctx: *const c_void, regs: *mut usize) -> usize {
    let ctx = &*(ctx as *const DispatchContext);
    let regs = std::slice::from_raw_parts_mut(regs, INT_ARG_REGS);
    ctx.resolver.resolve(regs)
}

struct ArenaState {
    map: Option<MmapMut>,
    used: usize,
}

/// Executable memory holding the thunks of one shadow table.
///
/// Thunks are written while the arena is writable; [`DispatchArena::seal`]
/// flips the pages to read+execute. Thunk addresses do not change on sealing.
pub struct DispatchArena {
    state: Mutex<ArenaState>,
    capacity: usize,
    sealed: Mutex<Option<Arc<Mmap>>>,
}

impl DispatchArena {
    /// Reserves room for `thunks` thunks.
    pub fn new(thunks: usize) -> Result<Self> {
        if !SUPPORTED {
            return Err(TraceError::UnsupportedPlatform(std::env::consts::ARCH));
        }
        let map = MmapMut::map_anon((thunks * THUNK_SIZE).max(THUNK_SIZE))?;
        Ok(Self {
            state: Mutex::new(ArenaState {
                map: Some(map),
                used: 0,
            }),
            capacity: thunks,
            sealed: Mutex::new(None),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.state.lock().used
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes a thunk bound to `context`. The context must outlive the arena.
    pub fn emit_thunk(&self, context: &Arc<DispatchContext>) -> Result<CodeAddress> {
        let mut state = self.state.lock();
        let used = state.used;
        if used >= self.capacity {
            return Err(TraceError::CodeAllocation(std::io::Error::new(
                std::io::ErrorKind::OutOfMemory,
                format!("dispatch arena full ({} thunks)", self.capacity),
            )));
        }
        let map = state.map.as_mut().ok_or_else(|| {
            TraceError::CodeAllocation(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "dispatch arena already sealed",
            ))
        })?;
        let offset = used * THUNK_SIZE;
        let thunk = encode_thunk(Arc::as_ptr(context) as usize, stub_address());
        map[offset..offset + THUNK_SIZE].copy_from_slice(&thunk);
        let address = CodeAddress(map.as_ptr() as usize + offset);
        state.used += 1;
        Ok(address)
    }

    /// Makes the thunks executable. Further [`emit_thunk`](Self::emit_thunk)
    /// calls fail.
    pub fn seal(&self) -> Result<Arc<Mmap>> {
        let mut sealed = self.sealed.lock();
        if let Some(map) = sealed.as_ref() {
            return Ok(map.clone());
        }
        let mut state = self.state.lock();
        let map = state.map.take().ok_or_else(|| {
            TraceError::CodeAllocation(std::io::Error::new(
                std::io::ErrorKind::Other,
                "dispatch arena lost its mapping",
            ))
        })?;
        flush_icache(map.as_ptr(), state.used * THUNK_SIZE);
        let map = Arc::new(map.make_exec()?);
        log::debug!("sealed dispatch arena with {} thunks", state.used);
        *sealed = Some(map.clone());
        Ok(map)
    }
}

impl fmt::Debug for DispatchArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchArena")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

// =============================================================================
// x86_64
// =============================================================================

#[cfg(target_arch = "x86_64")]
fn encode_thunk(ctx: usize, stub: usize) -> [u8; THUNK_SIZE] {
    let mut code = [0xCCu8; THUNK_SIZE];
    code[0..2].copy_from_slice(&[0x49, 0xBA]);
    code[2..10].copy_from_slice(&(ctx as u64).to_le_bytes());
    code[10..12].copy_from_slice(&[0x49, 0xBB]);
    code[12..20].copy_from_slice(&(stub as u64).to_le_bytes());
    code[20..23].copy_from_slice(&[0x41, 0xFF, 0xE3]);
    code
}

// Frame: rbp, then 64 bytes of GP registers and 128 bytes of xmm0-7.
// rax carries the vector register count of a variadic call.
#[cfg(all(target_arch = "x86_64", any(target_os = "linux", target_os = "android")))]
std::arch::global_asm!(
    ".text",
    ".p2align 4",
    ".globl jni_shadow_dispatch_stub",
    "jni_shadow_dispatch_stub:",
    "push rbp",
    "mov rbp, rsp",
    "sub rsp, 192",
    "mov qword ptr [rsp], rdi",
    "mov qword ptr [rsp + 8], rsi",
    "mov qword ptr [rsp + 16], rdx",
    "mov qword ptr [rsp + 24], rcx",
    "mov qword ptr [rsp + 32], r8",
    "mov qword ptr [rsp + 40], r9",
    "mov qword ptr [rsp + 48], rax",
    "movdqu xmmword ptr [rsp + 64], xmm0",
    "movdqu xmmword ptr [rsp + 80], xmm1",
    "movdqu xmmword ptr [rsp + 96], xmm2",
    "movdqu xmmword ptr [rsp + 112], xmm3",
    "movdqu xmmword ptr [rsp + 128], xmm4",
    "movdqu xmmword ptr [rsp + 144], xmm5",
    "movdqu xmmword ptr [rsp + 160], xmm6",
    "movdqu xmmword ptr [rsp + 176], xmm7",
    "mov rdi, r10",
    "mov rsi, rsp",
    "call qword ptr [r10]",
    "mov r11, rax",
    "movdqu xmm0, xmmword ptr [rsp + 64]",
    "movdqu xmm1, xmmword ptr [rsp + 80]",
    "movdqu xmm2, xmmword ptr [rsp + 96]",
    "movdqu xmm3, xmmword ptr [rsp + 112]",
    "movdqu xmm4, xmmword ptr [rsp + 128]",
    "movdqu xmm5, xmmword ptr [rsp + 144]",
    "movdqu xmm6, xmmword ptr [rsp + 160]",
    "movdqu xmm7, xmmword ptr [rsp + 176]",
    "mov rdi, qword ptr [rsp]",
    "mov rsi, qword ptr [rsp + 8]",
    "mov rdx, qword ptr [rsp + 16]",
    "mov rcx, qword ptr [rsp + 24]",
    "mov r8, qword ptr [rsp + 32]",
    "mov r9, qword ptr [rsp + 40]",
    "mov rax, qword ptr [rsp + 48]",
    "mov rsp, rbp",
    "pop rbp",
    "jmp r11",
);

// =============================================================================
// aarch64
// =============================================================================

#[cfg(target_arch = "aarch64")]
fn encode_thunk(ctx: usize, stub: usize) -> [u8; THUNK_SIZE] {
    const LDR_X17_PC_16: u32 = 0x5800_0091;
    const LDR_X16_PC_20: u32 = 0x5800_00B0;
    const BR_X16: u32 = 0xD61F_0200;
    const NOP: u32 = 0xD503_201F;

    let mut code = [0u8; THUNK_SIZE];
    for (i, insn) in [LDR_X17_PC_16, LDR_X16_PC_20, BR_X16, NOP].iter().enumerate() {
        code[i * 4..i * 4 + 4].copy_from_slice(&insn.to_le_bytes());
    }
    code[16..24].copy_from_slice(&(ctx as u64).to_le_bytes());
    code[24..32].copy_from_slice(&(stub as u64).to_le_bytes());
    code
}

// Frame: x29/x30, then x0-x8 (80 bytes with padding) and q0-q7 (128 bytes).
// x8 is the indirect result register.
#[cfg(all(target_arch = "aarch64", any(target_os = "linux", target_os = "android")))]
std::arch::global_asm!(
    ".text",
    ".p2align 4",
    ".globl jni_shadow_dispatch_stub",
    "jni_shadow_dispatch_stub:",
    "stp x29, x30, [sp, #-16]!",
    "mov x29, sp",
    "sub sp, sp, #208",
    "stp x0, x1, [sp, #0]",
    "stp x2, x3, [sp, #16]",
    "stp x4, x5, [sp, #32]",
    "stp x6, x7, [sp, #48]",
    "str x8, [sp, #64]",
    "stp q0, q1, [sp, #80]",
    "stp q2, q3, [sp, #112]",
    "stp q4, q5, [sp, #144]",
    "stp q6, q7, [sp, #176]",
    "mov x0, x17",
    "mov x1, sp",
    "ldr x9, [x17]",
    "blr x9",
    "mov x16, x0",
    "ldp q0, q1, [sp, #80]",
    "ldp q2, q3, [sp, #112]",
    "ldp q4, q5, [sp, #144]",
    "ldp q6, q7, [sp, #176]",
    "ldp x0, x1, [sp, #0]",
    "ldp x2, x3, [sp, #16]",
    "ldp x4, x5, [sp, #32]",
    "ldp x6, x7, [sp, #48]",
    "ldr x8, [sp, #64]",
    "mov sp, x29",
    "ldp x29, x30, [sp], #16",
    "br x16",
);

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn encode_thunk(_ctx: usize, _stub: usize) -> [u8; THUNK_SIZE] {
    [0u8; THUNK_SIZE]
}

#[cfg(all(
    any(target_os = "linux", target_os = "android"),
    any(target_arch = "x86_64", target_arch = "aarch64")
))]
fn stub_address() -> usize {
    extern "C" {
        fn jni_shadow_dispatch_stub();
    }
    jni_shadow_dispatch_stub as *const () as usize
}

#[cfg(not(all(
    any(target_os = "linux", target_os = "android"),
    any(target_arch = "x86_64", target_arch = "aarch64")
)))]
fn stub_address() -> usize {
    0
}

#[cfg(target_arch = "aarch64")]
fn flush_icache(start: *const u8, len: usize) {
    extern "C" {
        fn __clear_cache(begin: *mut std::ffi::c_char, end: *mut std::ffi::c_char);
    }
    unsafe {
        __clear_cache(start as *mut _, start.add(len) as *mut _);
    }
}

#[cfg(not(target_arch = "aarch64"))]
fn flush_icache(_start: *const u8, _len: usize) {}
