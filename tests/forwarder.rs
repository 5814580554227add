use std::ffi::c_void;

use jni_shadow::trampoline::Forwarder;
use jni_shadow::{FfiType, JValue, NativeType};

extern "C" fn narrow(value: i16) -> i16 {
    value - 1
}

fn arg<T>(value: &T) -> *const c_void {
    value as *const T as *const c_void
}

#[test]
fn plain_call_returns_the_widened_result() {
    let forwarder = Forwarder::new(&[FfiType::I16], FfiType::I16, narrow as *const c_void);
    let value: i16 = -7;
    let ret = unsafe { forwarder.call(&[arg(&value)]) };
    assert_eq!(ret.decode(NativeType::Short), JValue::Short(-8));
}

// A variadic call interface reaches a callee with the same promoted
// parameter list; both conventions agree for these types on Linux.
#[cfg(all(
    any(target_os = "linux", target_os = "android"),
    any(target_arch = "x86_64", target_arch = "aarch64")
))]
#[test]
fn variadic_call_interface_forwards_promoted_arguments() {
    extern "C" fn scale(factor: i32, value: f64) -> f64 {
        f64::from(factor) * value
    }

    let forwarder = Forwarder::variadic(
        &[FfiType::I32, FfiType::F64],
        1,
        FfiType::F64,
        scale as *const c_void,
    )
    .unwrap();
    let factor: i32 = 3;
    let value: f64 = 2.5;
    let ret = unsafe { forwarder.call(&[arg(&factor), arg(&value)]) };
    assert_eq!(ret.decode(NativeType::Double), JValue::Double(7.5));
}
