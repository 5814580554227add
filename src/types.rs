//! Native type tags and their calling-convention representation.
//!
//! Three layers of typing meet here:
//!
//! - [`NativeType`]: the JNI C type of a parameter as written in `jni.h`
//!   (`jint`, `jclass`, `const char*`, ...), plus the `va_list` and `...`
//!   markers that end some signatures.
//! - [`FfiType`]: the calling-convention primitive used when declaring a
//!   trampoline or a forwarding call. Every JNI type folds into one of ten.
//! - [`JValue`]: a decoded value as reported in a trace event.
//!
//! [`RawValue`] is the integer-register-sized result of a forwarded call. It
//! is passed back to the caller untouched and decoded for reporting only.

use std::ffi::c_void;
use std::fmt;

use crate::error::{Result, TraceError};
use crate::sys::jni;

/// A JNI C type as it appears in the function table signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    Void,
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    /// `jsize`
    Size,
    Object,
    Class,
    String,
    Throwable,
    Weak,
    Array,
    ObjectArray,
    BooleanArray,
    ByteArray,
    CharArray,
    ShortArray,
    IntArray,
    LongArray,
    FloatArray,
    DoubleArray,
    MethodId,
    FieldId,
    /// `JNIEnv*`
    Env,
    /// `const char*`
    CString,
    /// `const jvalue*`
    JValues,
    /// Any other data pointer (`jboolean*`, `void*`, `JavaVM**`, element buffers).
    Pointer,
    /// `jobjectRefType`
    RefType,
    /// Trailing `va_list` parameter.
    VaList,
    /// Trailing `...` marker.
    Variadic,
}

impl NativeType {
    /// The type's spelling in `jni.h`.
    pub fn c_name(self) -> &'static str {
        match self {
            NativeType::Void => "void",
            NativeType::Boolean => "jboolean",
            NativeType::Byte => "jbyte",
            NativeType::Char => "jchar",
            NativeType::Short => "jshort",
            NativeType::Int => "jint",
            NativeType::Long => "jlong",
            NativeType::Float => "jfloat",
            NativeType::Double => "jdouble",
            NativeType::Size => "jsize",
            NativeType::Object => "jobject",
            NativeType::Class => "jclass",
            NativeType::String => "jstring",
            NativeType::Throwable => "jthrowable",
            NativeType::Weak => "jweak",
            NativeType::Array => "jarray",
            NativeType::ObjectArray => "jobjectArray",
            NativeType::BooleanArray => "jbooleanArray",
            NativeType::ByteArray => "jbyteArray",
            NativeType::CharArray => "jcharArray",
            NativeType::ShortArray => "jshortArray",
            NativeType::IntArray => "jintArray",
            NativeType::LongArray => "jlongArray",
            NativeType::FloatArray => "jfloatArray",
            NativeType::DoubleArray => "jdoubleArray",
            NativeType::MethodId => "jmethodID",
            NativeType::FieldId => "jfieldID",
            NativeType::Env => "JNIEnv*",
            NativeType::CString => "const char*",
            NativeType::JValues => "const jvalue*",
            NativeType::Pointer => "void*",
            NativeType::RefType => "jobjectRefType",
            NativeType::VaList => "va_list",
            NativeType::Variadic => "...",
        }
    }

    /// True for `va_list` and `...`, the markers that end a signature.
    pub fn is_marker(self) -> bool {
        matches!(self, NativeType::VaList | NativeType::Variadic)
    }

    /// Calling-convention type used for this parameter or return value.
    ///
    /// `va_list` is passed as a single pointer on every supported ABI. The
    /// `...` marker has no fixed representation; hitting it here means the
    /// catalog and the requested call shape disagree.
    pub fn ffi_type(self) -> Result<FfiType> {
        let ty = match self {
            NativeType::Void => FfiType::Void,
            NativeType::Boolean => FfiType::U8,
            NativeType::Byte => FfiType::I8,
            NativeType::Char => FfiType::U16,
            NativeType::Short => FfiType::I16,
            NativeType::Int | NativeType::Size | NativeType::RefType => FfiType::I32,
            NativeType::Long => FfiType::I64,
            NativeType::Float => FfiType::F32,
            NativeType::Double => FfiType::F64,
            NativeType::Variadic => return Err(TraceError::UnsupportedType(self.c_name())),
            _ => FfiType::Pointer,
        };
        Ok(ty)
    }

    /// Byte size of the value in argument storage.
    pub fn size(self) -> Result<usize> {
        self.ffi_type().map(FfiType::size)
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_name())
    }
}

/// Converts a whole parameter list, folding a trailing `va_list` to a pointer.
pub fn convert_all(types: &[NativeType]) -> Result<Vec<FfiType>> {
    types.iter().map(|t| t.ffi_type()).collect()
}

/// Calling-convention primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfiType {
    Void,
    I8,
    U8,
    I16,
    U16,
    I32,
    I64,
    F32,
    F64,
    Pointer,
}

impl FfiType {
    pub fn size(self) -> usize {
        match self {
            FfiType::Void => 0,
            FfiType::I8 | FfiType::U8 => 1,
            FfiType::I16 | FfiType::U16 => 2,
            FfiType::I32 | FfiType::F32 => 4,
            FfiType::I64 | FfiType::F64 => 8,
            FfiType::Pointer => std::mem::size_of::<*const c_void>(),
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, FfiType::F32 | FfiType::F64)
    }

    /// C default argument promotion, applied to every variadic argument.
    ///
    /// `float` becomes `double`; integers narrower than `int` become `int`.
    pub fn promoted(self) -> FfiType {
        match self {
            FfiType::F32 => FfiType::F64,
            FfiType::I8 | FfiType::U8 | FfiType::I16 | FfiType::U16 => FfiType::I32,
            other => other,
        }
    }

    pub fn to_libffi(self) -> libffi::middle::Type {
        use libffi::middle::Type;
        match self {
            FfiType::Void => Type::void(),
            FfiType::I8 => Type::i8(),
            FfiType::U8 => Type::u8(),
            FfiType::I16 => Type::i16(),
            FfiType::U16 => Type::u16(),
            FfiType::I32 => Type::i32(),
            FfiType::I64 => Type::i64(),
            FfiType::F32 => Type::f32(),
            FfiType::F64 => Type::f64(),
            FfiType::Pointer => Type::pointer(),
        }
    }
}

/// A decoded argument or return value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JValue {
    Void,
    Boolean(jni::jboolean),
    Byte(jni::jbyte),
    Char(jni::jchar),
    Short(jni::jshort),
    Int(jni::jint),
    Long(jni::jlong),
    Float(jni::jfloat),
    Double(jni::jdouble),
    Pointer(usize),
}

impl JValue {
    /// Reads a value of type `ty` from argument storage.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a readable value laid out as `ty.ffi_type()`.
    pub unsafe fn read(ty: NativeType, ptr: *const c_void) -> JValue {
        match ty {
            NativeType::Void | NativeType::Variadic => JValue::Void,
            NativeType::Boolean => JValue::Boolean(*(ptr as *const u8)),
            NativeType::Byte => JValue::Byte(*(ptr as *const i8)),
            NativeType::Char => JValue::Char(*(ptr as *const u16)),
            NativeType::Short => JValue::Short(*(ptr as *const i16)),
            NativeType::Int | NativeType::Size | NativeType::RefType => {
                JValue::Int(*(ptr as *const i32))
            }
            NativeType::Long => JValue::Long(*(ptr as *const i64)),
            NativeType::Float => JValue::Float(*(ptr as *const f32)),
            NativeType::Double => JValue::Double(*(ptr as *const f64)),
            _ => JValue::Pointer(*(ptr as *const usize)),
        }
    }

    /// Reads a value stored with its promoted variadic type and narrows it
    /// back to the declared type `ty`.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a readable value laid out as
    /// `ty.ffi_type().promoted()`.
    pub unsafe fn read_promoted(ty: NativeType, ptr: *const c_void) -> JValue {
        match ty {
            NativeType::Boolean => JValue::Boolean(*(ptr as *const i32) as u8),
            NativeType::Byte => JValue::Byte(*(ptr as *const i32) as i8),
            NativeType::Char => JValue::Char(*(ptr as *const i32) as u16),
            NativeType::Short => JValue::Short(*(ptr as *const i32) as i16),
            NativeType::Float => JValue::Float(*(ptr as *const f64) as f32),
            other => JValue::read(other, ptr),
        }
    }

    /// Decodes element `value` of a `const jvalue*` array as type `ty`.
    pub fn from_jvalue(ty: NativeType, value: &jni::jvalue) -> JValue {
        unsafe {
            match ty {
                NativeType::Boolean => JValue::Boolean(value.z),
                NativeType::Byte => JValue::Byte(value.b),
                NativeType::Char => JValue::Char(value.c),
                NativeType::Short => JValue::Short(value.s),
                NativeType::Int | NativeType::Size | NativeType::RefType => JValue::Int(value.i),
                NativeType::Long => JValue::Long(value.j),
                NativeType::Float => JValue::Float(value.f),
                NativeType::Double => JValue::Double(value.d),
                NativeType::Void | NativeType::Variadic => JValue::Void,
                _ => JValue::Pointer(value.l as usize),
            }
        }
    }

    /// The value as a pointer-sized integer, for reference and id arguments.
    pub fn as_pointer(&self) -> Option<usize> {
        match *self {
            JValue::Pointer(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for JValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JValue::Void => f.write_str("void"),
            JValue::Boolean(v) => write!(f, "{}", *v != 0),
            JValue::Byte(v) => write!(f, "{v}"),
            JValue::Char(v) => match char::from_u32(u32::from(*v)) {
                Some(c) => write!(f, "{c:?}"),
                None => write!(f, "\\u{v:04x}"),
            },
            JValue::Short(v) => write!(f, "{v}"),
            JValue::Int(v) => write!(f, "{v}"),
            JValue::Long(v) => write!(f, "{v}"),
            JValue::Float(v) => write!(f, "{v}"),
            JValue::Double(v) => write!(f, "{v}"),
            JValue::Pointer(p) => write!(f, "{p:#x}"),
        }
    }
}

/// Raw 64-bit result slot of a forwarded call.
///
/// libffi widens integer results narrower than a register to the full slot
/// and stores floating results as their IEEE-754 bytes at the start of it.
/// The slot is handed back to the caller verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct RawValue(u64);

impl RawValue {
    pub const fn from_bits(bits: u64) -> Self {
        RawValue(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Reinterprets the slot as a value of the declared return type.
    ///
    /// Integers are narrowed numerically. `jfloat` and `jdouble` are
    /// bit-casts of the low 32 bits and the full 64 bits respectively;
    /// never numeric conversions.
    pub fn decode(self, ty: NativeType) -> JValue {
        let bits = self.0;
        match ty {
            NativeType::Void | NativeType::Variadic => JValue::Void,
            NativeType::Boolean => JValue::Boolean(bits as u8),
            NativeType::Byte => JValue::Byte(bits as i8),
            NativeType::Char => JValue::Char(bits as u16),
            NativeType::Short => JValue::Short(bits as i16),
            NativeType::Int | NativeType::Size | NativeType::RefType => JValue::Int(bits as i32),
            NativeType::Long => JValue::Long(bits as i64),
            NativeType::Float => JValue::Float(f32::from_bits(bits as u32)),
            NativeType::Double => JValue::Double(f64::from_bits(bits)),
            _ => JValue::Pointer(bits as usize),
        }
    }
}
