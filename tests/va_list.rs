#![cfg(all(
    any(target_os = "linux", target_os = "android"),
    any(target_arch = "x86_64", target_arch = "aarch64")
))]

mod common;

use common::{fake_va_list, GP_REGS};
use jni_shadow::va_list::VaListReader;
use jni_shadow::{JValue, NativeType};

#[test]
fn reads_integers_and_floats_from_register_areas() {
    // env, clazz and methodID were named arguments.
    let mut list = fake_va_list(3, &[7], &[2.5], &[]);
    let values = unsafe {
        VaListReader::new(list.as_ptr()).read_all(&[NativeType::Int, NativeType::Float])
    };
    assert_eq!(values, vec![JValue::Int(7), JValue::Float(2.5)]);
}

#[test]
fn integer_classes_are_narrowed_by_declared_type() {
    let mut list = fake_va_list(
        3,
        &[0xFFFF_FFFF_FFFF_FF80, 0x0000_0000_0001_0041, 1],
        &[],
        &[],
    );
    let values = unsafe {
        VaListReader::new(list.as_ptr()).read_all(&[
            NativeType::Byte,
            NativeType::Char,
            NativeType::Boolean,
        ])
    };
    assert_eq!(
        values,
        vec![JValue::Byte(-128), JValue::Char(0x41), JValue::Boolean(1)]
    );
}

#[test]
fn integers_continue_in_the_overflow_area() {
    let mut list = fake_va_list(GP_REGS - 1, &[11], &[0.5], &[22, 33]);
    let values = unsafe {
        VaListReader::new(list.as_ptr()).read_all(&[
            NativeType::Int,
            NativeType::Long,
            NativeType::Double,
            NativeType::Object,
        ])
    };
    assert_eq!(
        values,
        vec![
            JValue::Int(11),
            JValue::Long(22),
            JValue::Double(0.5),
            JValue::Pointer(33),
        ]
    );
}

#[test]
fn doubles_continue_in_the_overflow_area() {
    let in_registers: Vec<f64> = (1..=8).map(f64::from).collect();
    let mut list = fake_va_list(3, &[], &in_registers, &[9.0f64.to_bits()]);
    let types = [NativeType::Double; 9];
    let values = unsafe { VaListReader::new(list.as_ptr()).read_all(&types) };
    let expected: Vec<JValue> = (1..=9).map(|v| JValue::Double(f64::from(v))).collect();
    assert_eq!(values, expected);
}

#[test]
fn reading_does_not_consume_the_callers_list() {
    let mut list = fake_va_list(3, &[5, 6], &[], &[]);
    let types = [NativeType::Int, NativeType::Int];
    let first = unsafe { VaListReader::new(list.as_ptr()).read_all(&types) };
    let second = unsafe { VaListReader::new(list.as_ptr()).read_all(&types) };
    assert_eq!(first, vec![JValue::Int(5), JValue::Int(6)]);
    assert_eq!(first, second);
}
