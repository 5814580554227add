//! Reading arguments out of a C `va_list`.
//!
//! The reader works on a private copy of the list state, so the callee that
//! later consumes the same `va_list` still sees every argument.
//!
//! | ABI              | Integer class                       | Floating class                       |
//! |------------------|-------------------------------------|--------------------------------------|
//! | x86_64 System V  | `reg_save_area + gp_offset` (< 48)  | `reg_save_area + fp_offset` (< 176)  |
//! | AArch64 AAPCS64  | `gr_top + gr_offs` (< 0)            | `vr_top + vr_offs` (< 0)             |
//!
//! Once a register area is exhausted both classes continue in the overflow
//! (stack) area, 8 bytes per argument. Floating values are always stored as
//! `double`; `jfloat` arguments are narrowed after reading.

use std::ffi::c_void;

use crate::types::{JValue, NativeType, RawValue};

/// x86_64 System V `__va_list_tag`.
#[cfg(target_arch = "x86_64")]
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawVaList {
    pub gp_offset: u32,
    pub fp_offset: u32,
    pub overflow_arg_area: *mut u8,
    pub reg_save_area: *mut u8,
}

#[cfg(target_arch = "x86_64")]
impl RawVaList {
    /// End of the six general-purpose registers in the save area.
    pub const GP_LIMIT: u32 = 48;
    /// End of the eight vector registers in the save area.
    pub const FP_LIMIT: u32 = 176;

    unsafe fn next_int(&mut self) -> u64 {
        if self.gp_offset < Self::GP_LIMIT {
            let v = *(self.reg_save_area.add(self.gp_offset as usize) as *const u64);
            self.gp_offset += 8;
            v
        } else {
            self.next_overflow()
        }
    }

    unsafe fn next_double(&mut self) -> f64 {
        if self.fp_offset < Self::FP_LIMIT {
            let v = *(self.reg_save_area.add(self.fp_offset as usize) as *const f64);
            self.fp_offset += 16;
            v
        } else {
            f64::from_bits(self.next_overflow())
        }
    }

    unsafe fn next_overflow(&mut self) -> u64 {
        let v = *(self.overflow_arg_area as *const u64);
        self.overflow_arg_area = self.overflow_arg_area.add(8);
        v
    }
}

/// AArch64 AAPCS64 `va_list`.
#[cfg(target_arch = "aarch64")]
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawVaList {
    pub stack: *mut u8,
    pub gr_top: *mut u8,
    pub vr_top: *mut u8,
    pub gr_offs: i32,
    pub vr_offs: i32,
}

#[cfg(target_arch = "aarch64")]
impl RawVaList {
    unsafe fn next_int(&mut self) -> u64 {
        if self.gr_offs < 0 {
            let v = *(self.gr_top.offset(self.gr_offs as isize) as *const u64);
            self.gr_offs += 8;
            v
        } else {
            self.next_stack()
        }
    }

    unsafe fn next_double(&mut self) -> f64 {
        if self.vr_offs < 0 {
            let v = *(self.vr_top.offset(self.vr_offs as isize) as *const f64);
            self.vr_offs += 16;
            v
        } else {
            f64::from_bits(self.next_stack())
        }
    }

    unsafe fn next_stack(&mut self) -> u64 {
        let v = *(self.stack as *const u64);
        self.stack = self.stack.add(8);
        v
    }
}

/// Sequential reader over a copied `va_list`.
#[derive(Debug, Clone)]
pub struct VaListReader {
    state: RawVaList,
}

impl VaListReader {
    /// Copies the list state behind `va_list`, the value a JNI `*V` function
    /// receives as its last argument.
    ///
    /// # Safety
    ///
    /// `va_list` must point to a live, initialized `va_list` of this ABI.
    pub unsafe fn new(va_list: *const c_void) -> Self {
        Self {
            state: *(va_list as *const RawVaList),
        }
    }

    /// Reads the next argument, declared as `ty`.
    ///
    /// # Safety
    ///
    /// The list must hold another argument of type `ty`.
    pub unsafe fn next(&mut self, ty: NativeType) -> JValue {
        match ty {
            NativeType::Float => JValue::Float(self.state.next_double() as f32),
            NativeType::Double => JValue::Double(self.state.next_double()),
            NativeType::Void | NativeType::Variadic => JValue::Void,
            other => RawValue::from_bits(self.state.next_int()).decode(other),
        }
    }

    /// Reads one argument per entry of `types`.
    ///
    /// # Safety
    ///
    /// See [`next`](Self::next).
    pub unsafe fn read_all(&mut self, types: &[NativeType]) -> Vec<JValue> {
        types.iter().map(|t| self.next(*t)).collect()
    }
}
