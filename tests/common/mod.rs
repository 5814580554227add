#![allow(dead_code)]

use parking_lot::Mutex;

use jni_shadow::{TraceEvent, TraceSink};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Sink that keeps every event.
#[derive(Default)]
pub struct Collector {
    events: Mutex<Vec<TraceEvent>>,
}

impl Collector {
    pub fn take(&self) -> Vec<TraceEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|e| e.descriptor.name).collect()
    }
}

impl TraceSink for Collector {
    fn trace(&self, event: &TraceEvent) {
        self.events.lock().push(event.clone());
    }
}

/// A `va_list` built by hand, laid out the way a C caller would leave it
/// after consuming `gp_used` named integer arguments.
#[cfg(all(
    any(target_os = "linux", target_os = "android"),
    any(target_arch = "x86_64", target_arch = "aarch64")
))]
pub struct FakeVaList {
    pub raw: jni_shadow::va_list::RawVaList,
    _gp: Box<[u8; 256]>,
    _fp: Box<[u8; 256]>,
    _stack: Box<[u64; 16]>,
}

#[cfg(all(
    any(target_os = "linux", target_os = "android"),
    any(target_arch = "x86_64", target_arch = "aarch64")
))]
impl FakeVaList {
    pub fn as_ptr(&mut self) -> *mut std::ffi::c_void {
        &mut self.raw as *mut jni_shadow::va_list::RawVaList as *mut std::ffi::c_void
    }
}

/// Integer argument registers available to a variadic callee.
#[cfg(target_arch = "x86_64")]
pub const GP_REGS: usize = 6;
#[cfg(target_arch = "aarch64")]
pub const GP_REGS: usize = 8;

/// `ints` continue the register area after `gp_used` slots, `doubles` fill
/// the vector registers from the start, `stack` is the overflow area.
#[cfg(all(any(target_os = "linux", target_os = "android"), target_arch = "x86_64"))]
pub fn fake_va_list(gp_used: usize, ints: &[u64], doubles: &[f64], stack: &[u64]) -> FakeVaList {
    use jni_shadow::va_list::RawVaList;

    let mut gp = Box::new([0u8; 256]);
    for (i, v) in ints.iter().enumerate() {
        let off = (gp_used + i) * 8;
        gp[off..off + 8].copy_from_slice(&v.to_le_bytes());
    }
    for (i, d) in doubles.iter().enumerate() {
        let off = 48 + i * 16;
        gp[off..off + 8].copy_from_slice(&d.to_le_bytes());
    }
    let mut st = Box::new([0u64; 16]);
    st[..stack.len()].copy_from_slice(stack);

    let raw = RawVaList {
        gp_offset: (gp_used * 8) as u32,
        fp_offset: 48,
        overflow_arg_area: st.as_mut_ptr() as *mut u8,
        reg_save_area: gp.as_mut_ptr(),
    };
    FakeVaList {
        raw,
        _gp: gp,
        _fp: Box::new([0u8; 256]),
        _stack: st,
    }
}

#[cfg(all(any(target_os = "linux", target_os = "android"), target_arch = "aarch64"))]
pub fn fake_va_list(gp_used: usize, ints: &[u64], doubles: &[f64], stack: &[u64]) -> FakeVaList {
    use jni_shadow::va_list::RawVaList;

    let mut gp = Box::new([0u8; 256]);
    for (i, v) in ints.iter().enumerate() {
        let off = (gp_used + i) * 8;
        gp[off..off + 8].copy_from_slice(&v.to_le_bytes());
    }
    let mut fp = Box::new([0u8; 256]);
    for (i, d) in doubles.iter().enumerate() {
        let off = i * 16;
        fp[off..off + 8].copy_from_slice(&d.to_le_bytes());
    }
    let mut st = Box::new([0u64; 16]);
    st[..stack.len()].copy_from_slice(stack);

    let raw = unsafe {
        RawVaList {
            stack: st.as_mut_ptr() as *mut u8,
            gr_top: gp.as_mut_ptr().add(64),
            vr_top: fp.as_mut_ptr().add(128),
            gr_offs: -(((GP_REGS - gp_used) * 8) as i32),
            vr_offs: -128,
        }
    };
    FakeVaList {
        raw,
        _gp: gp,
        _fp: fp,
        _stack: st,
    }
}
