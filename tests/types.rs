#![allow(clippy::approx_constant)]

use std::ffi::c_void;

use jni_shadow::sys::jni::jvalue;
use jni_shadow::{FfiType, JValue, NativeType, RawValue, TraceError};

#[test]
fn maps_native_types_to_calling_convention() {
    let cases = [
        (NativeType::Void, FfiType::Void, 0),
        (NativeType::Boolean, FfiType::U8, 1),
        (NativeType::Byte, FfiType::I8, 1),
        (NativeType::Char, FfiType::U16, 2),
        (NativeType::Short, FfiType::I16, 2),
        (NativeType::Int, FfiType::I32, 4),
        (NativeType::Size, FfiType::I32, 4),
        (NativeType::Long, FfiType::I64, 8),
        (NativeType::Float, FfiType::F32, 4),
        (NativeType::Double, FfiType::F64, 8),
        (NativeType::MethodId, FfiType::Pointer, std::mem::size_of::<usize>()),
        (NativeType::CString, FfiType::Pointer, std::mem::size_of::<usize>()),
        (NativeType::VaList, FfiType::Pointer, std::mem::size_of::<usize>()),
    ];
    for (native, ffi, size) in cases {
        assert_eq!(native.ffi_type().unwrap(), ffi, "{native}");
        assert_eq!(native.size().unwrap(), size, "{native}");
    }
}

#[test]
fn variadic_marker_has_no_fixed_representation() {
    match NativeType::Variadic.ffi_type() {
        Err(TraceError::UnsupportedType(name)) => assert_eq!(name, "..."),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn default_argument_promotion() {
    assert_eq!(FfiType::F32.promoted(), FfiType::F64);
    assert_eq!(FfiType::U8.promoted(), FfiType::I32);
    assert_eq!(FfiType::I16.promoted(), FfiType::I32);
    assert_eq!(FfiType::U16.promoted(), FfiType::I32);
    assert_eq!(FfiType::I64.promoted(), FfiType::I64);
    assert_eq!(FfiType::F64.promoted(), FfiType::F64);
    assert_eq!(FfiType::Pointer.promoted(), FfiType::Pointer);
}

#[test]
fn float_returns_are_bit_cast() {
    let float = RawValue::from_bits(u64::from(3.14f32.to_bits()));
    assert_eq!(float.decode(NativeType::Float), JValue::Float(3.14));

    let double = RawValue::from_bits(3.14f64.to_bits());
    assert_eq!(double.decode(NativeType::Double), JValue::Double(3.14));

    // A numeric conversion of these bits would give a huge integer-valued float.
    assert_ne!(double.decode(NativeType::Double), JValue::Double(3.14f64.to_bits() as f64));
}

#[test]
fn float_decode_ignores_high_bits() {
    let raw = RawValue::from_bits(0xDEAD_BEEF_0000_0000 | u64::from(2.5f32.to_bits()));
    assert_eq!(raw.decode(NativeType::Float), JValue::Float(2.5));
}

#[test]
fn integer_returns_are_narrowed() {
    let raw = RawValue::from_bits(0xFFFF_FFFF_FFFF_FFFF);
    assert_eq!(raw.decode(NativeType::Int), JValue::Int(-1));
    assert_eq!(raw.decode(NativeType::Byte), JValue::Byte(-1));
    assert_eq!(raw.decode(NativeType::Char), JValue::Char(0xFFFF));
    assert_eq!(raw.decode(NativeType::Long), JValue::Long(-1));
    assert_eq!(RawValue::from_bits(1).decode(NativeType::Boolean), JValue::Boolean(1));
    assert_eq!(RawValue::from_bits(0x1234).decode(NativeType::Object), JValue::Pointer(0x1234));
    assert_eq!(RawValue::from_bits(42).decode(NativeType::Void), JValue::Void);
}

#[test]
fn reads_declared_and_promoted_storage() {
    let short: i16 = -7;
    let float: f32 = 1.5;
    let promoted_short: i32 = -7;
    let promoted_float: f64 = 1.5;
    unsafe {
        assert_eq!(
            JValue::read(NativeType::Short, &short as *const i16 as *const c_void),
            JValue::Short(-7)
        );
        assert_eq!(
            JValue::read(NativeType::Float, &float as *const f32 as *const c_void),
            JValue::Float(1.5)
        );
        assert_eq!(
            JValue::read_promoted(NativeType::Short, &promoted_short as *const i32 as *const c_void),
            JValue::Short(-7)
        );
        assert_eq!(
            JValue::read_promoted(NativeType::Float, &promoted_float as *const f64 as *const c_void),
            JValue::Float(1.5)
        );
    }
}

#[test]
fn decodes_jvalue_elements() {
    let values = [jvalue { i: 7 }, jvalue { f: 2.5 }, jvalue { z: 1 }];
    assert_eq!(JValue::from_jvalue(NativeType::Int, &values[0]), JValue::Int(7));
    assert_eq!(JValue::from_jvalue(NativeType::Float, &values[1]), JValue::Float(2.5));
    assert_eq!(JValue::from_jvalue(NativeType::Boolean, &values[2]), JValue::Boolean(1));
}

#[test]
fn values_display_like_java() {
    assert_eq!(JValue::Boolean(1).to_string(), "true");
    assert_eq!(JValue::Char(u16::from(b'x')).to_string(), "'x'");
    assert_eq!(JValue::Pointer(0x10).to_string(), "0x10");
    assert_eq!(NativeType::ObjectArray.to_string(), "jobjectArray");
}
