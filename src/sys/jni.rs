// jni-shadow/src/sys/jni.rs
//
// Raw JNI types used at the shadow-table boundary.
//
// Only the pieces the tracer touches are declared here: the primitive and
// reference typedefs, the jvalue union, the version constants and the layout
// facts of the JNINativeInterface_ function table. The table itself is treated
// as an array of pointer-sized slots; its per-slot signatures live in the
// method catalog (crate::catalog).
//
// Newer JDKs append functions at the END of the table:
//   - JNI 1.6: GetObjectRefType (index 232)
//   - JDK 9:   GetModule (index 233)
//   - JDK 19:  IsVirtualThread (index 234)
//   - JDK 24:  GetStringUTFLengthAsLong (index 235)

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

use std::ffi::c_void;

// =============================================================================
// Primitive Types
// =============================================================================

pub type jint = i32;
pub type jlong = i64;
pub type jbyte = i8;
pub type jboolean = u8;
pub type jchar = u16;
pub type jshort = i16;
pub type jfloat = f32;
pub type jdouble = f64;
pub type jsize = jint;

// =============================================================================
// Reference and ID Types (opaque pointers)
// =============================================================================

pub type jobject = *mut c_void;
pub type jclass = jobject;
pub type jstring = jobject;
pub type jarray = jobject;
pub type jthrowable = jobject;
pub type jweak = jobject;

pub type jmethodID = *mut c_void;
pub type jfieldID = *mut c_void;

// =============================================================================
// jvalue Union
// =============================================================================

#[repr(C)]
#[derive(Copy, Clone)]
pub union jvalue {
    pub z: jboolean,
    pub b: jbyte,
    pub c: jchar,
    pub s: jshort,
    pub i: jint,
    pub j: jlong,
    pub f: jfloat,
    pub d: jdouble,
    pub l: jobject,
}

// =============================================================================
// Constants
// =============================================================================

pub const JNI_VERSION_1_4: jint = 0x00010004;
pub const JNI_VERSION_1_6: jint = 0x00010006;
pub const JNI_VERSION_1_8: jint = 0x00010008;
pub const JNI_VERSION_9: jint = 0x00090000;
pub const JNI_VERSION_19: jint = 0x00130000;
pub const JNI_VERSION_21: jint = 0x00150000;
pub const JNI_VERSION_24: jint = 0x00180000;

// =============================================================================
// JNINativeInterface_ layout
// =============================================================================
//
// 4 reserved slots followed by the function pointers. The reserved slots are
// NULL in every shipping VM and are never called.

/// Number of reserved slots at the start of the function table.
pub const RESERVED_SLOTS: usize = 4;

/// Index of `GetVersion`, the first callable slot.
pub const GET_VERSION_INDEX: usize = 4;

/// Opaque function table. Only its address is ever handled.
#[repr(C)]
pub struct JNINativeInterface_ {
    _private: [u8; 0],
}

/// JNIEnv is directly the table pointer (C ABI definition):
///   typedef const struct JNINativeInterface_ *JNIEnv;
pub type JNIEnv = *const JNINativeInterface_;

/// Signature of slot 4, called to detect the table version before building.
pub type GetVersionFn = unsafe extern "system" fn(env: *mut JNIEnv) -> jint;

/// Reads slot `index` of the function table behind `env`.
///
/// # Safety
///
/// `env` must be a valid `JNIEnv*` whose table has more than `index` slots.
pub unsafe fn read_slot(env: *mut JNIEnv, index: usize) -> *const c_void {
    let table = *env as *const *const c_void;
    *table.add(index)
}
