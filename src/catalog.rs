//! Static catalog of every callable slot in the JNI function table.
//!
//! Each slot from `GetVersion` (index 4) to the last function of the newest
//! supported table layout has one [`MethodDescriptor`]: its name, its C
//! parameter list and its return type. Parameter lists end in
//! [`NativeType::Variadic`] for `...` entries and [`NativeType::VaList`] for
//! `va_list` entries, which selects the interceptor used for the slot.
//!
//! | Range     | Family                                      |
//! |-----------|---------------------------------------------|
//! | 4..=33    | version, classes, exceptions, references    |
//! | 34..=63   | `Call<T>Method{,V,A}`                       |
//! | 64..=93   | `CallNonvirtual<T>Method{,V,A}`             |
//! | 94..=112  | instance field access                       |
//! | 113..=143 | `GetStaticMethodID`, `CallStatic<T>Method`  |
//! | 144..=162 | static field access                         |
//! | 163..=214 | strings and arrays                          |
//! | 215..=235 | natives, monitors, buffers, later additions |

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::{Result, TraceError};
use crate::sys::jni::{self, jint, RESERVED_SLOTS};
use crate::types::NativeType;

/// How a slot receives its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallShape {
    /// A fixed C parameter list.
    Fixed,
    /// Ends in `...`; the tail is described by the method signature.
    Variadic,
    /// Ends in a `va_list`; the tail is described by the method signature.
    VaList,
}

/// One entry of the JNI function table.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub index: usize,
    pub name: &'static str,
    pub args: &'static [NativeType],
    pub ret: NativeType,
}

impl MethodDescriptor {
    pub fn shape(&self) -> CallShape {
        match self.args.last() {
            Some(NativeType::Variadic) => CallShape::Variadic,
            Some(NativeType::VaList) => CallShape::VaList,
            _ => CallShape::Fixed,
        }
    }

    /// The parameters before any `...` or `va_list` marker.
    pub fn fixed_args(&self) -> &'static [NativeType] {
        match self.args.split_last() {
            Some((last, rest)) if last.is_marker() => rest,
            _ => self.args,
        }
    }

    /// Position of the `jmethodID` parameter, if the slot takes one.
    ///
    /// 2 for `Call<T>Method*`, `CallStatic<T>Method*` and `NewObject*`;
    /// 3 for `CallNonvirtual<T>Method*`.
    pub fn method_id_position(&self) -> Option<usize> {
        self.args.iter().position(|a| *a == NativeType::MethodId)
    }

    /// True for the two slots whose result is a method id described by a
    /// signature string argument.
    pub fn is_method_resolution(&self) -> bool {
        matches!(self.name, "GetMethodID" | "GetStaticMethodID")
    }

    /// True for `*A` slots: a method id followed by a `const jvalue*` array.
    pub fn takes_jvalues(&self) -> bool {
        self.args.last() == Some(&NativeType::JValues) && self.method_id_position().is_some()
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.ret, self.name)?;
        for (i, a) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{a}")?;
        }
        f.write_str(")")
    }
}

/// JNI function table layouts, named after the release that last grew the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum JniVersion {
    /// Ends after the NIO direct buffer functions.
    V1_4,
    /// Adds `GetObjectRefType`. Also the layout of JDK 8 and Android ART.
    #[default]
    V1_6,
    /// Adds `GetModule`.
    V9,
    /// Adds `IsVirtualThread`.
    V19,
    /// Adds `GetStringUTFLengthAsLong`.
    V24,
}

impl JniVersion {
    /// Number of slots in the table, reserved slots included.
    pub const fn table_len(self) -> usize {
        match self {
            JniVersion::V1_4 => 232,
            JniVersion::V1_6 => 233,
            JniVersion::V9 => 234,
            JniVersion::V19 => 235,
            JniVersion::V24 => 236,
        }
    }

    /// Maps a value returned by `GetVersion` to the table layout it implies.
    ///
    /// Versions older than 1.4 predate the direct buffer functions and are
    /// not supported.
    pub fn from_raw(version: jint) -> Option<Self> {
        match version {
            v if v >= jni::JNI_VERSION_24 => Some(JniVersion::V24),
            v if v >= jni::JNI_VERSION_19 => Some(JniVersion::V19),
            v if v >= jni::JNI_VERSION_9 => Some(JniVersion::V9),
            v if v >= jni::JNI_VERSION_1_6 => Some(JniVersion::V1_6),
            v if v >= jni::JNI_VERSION_1_4 => Some(JniVersion::V1_4),
            _ => None,
        }
    }
}

impl fmt::Display for JniVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JniVersion::V1_4 => "1.4",
            JniVersion::V1_6 => "1.6",
            JniVersion::V9 => "9",
            JniVersion::V19 => "19",
            JniVersion::V24 => "24",
        })
    }
}

impl FromStr for JniVersion {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1.4" => Ok(JniVersion::V1_4),
            "1.6" | "1.8" | "8" => Ok(JniVersion::V1_6),
            "9" => Ok(JniVersion::V9),
            "19" | "21" => Ok(JniVersion::V19),
            "24" => Ok(JniVersion::V24),
            other => Err(TraceError::InvalidOption {
                key: "version".to_string(),
                message: format!("unknown JNI version `{other}`"),
            }),
        }
    }
}

/// Index-ordered view of the descriptors valid for one table layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodCatalog {
    version: JniVersion,
}

impl MethodCatalog {
    pub fn new(version: JniVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> JniVersion {
        self.version
    }

    /// Valid slot indices: `RESERVED_SLOTS..table_len`.
    pub fn range(&self) -> Range<usize> {
        RESERVED_SLOTS..self.version.table_len()
    }

    pub fn len(&self) -> usize {
        self.range().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn descriptor(&self, index: usize) -> Result<&'static MethodDescriptor> {
        let range = self.range();
        if !range.contains(&index) {
            return Err(TraceError::IndexOutOfRange {
                index,
                start: range.start,
                end: range.end,
            });
        }
        Ok(&DESCRIPTORS[index - RESERVED_SLOTS])
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static MethodDescriptor> {
        DESCRIPTORS[..self.len()].iter()
    }

    pub fn by_name(&self, name: &str) -> Option<&'static MethodDescriptor> {
        self.iter().find(|d| d.name == name)
    }
}

macro_rules! descriptors {
    ($($index:literal => $name:ident($($arg:ident),*) -> $ret:ident;)*) => {
        static DESCRIPTORS: &[MethodDescriptor] = &[
            $(MethodDescriptor {
                index: $index,
                name: stringify!($name),
                args: &[$(NativeType::$arg),*],
                ret: NativeType::$ret,
            },)*
        ];
    };
}

descriptors! {
    // Version, classes and reflection
    4 => GetVersion(Env) -> Int;
    5 => DefineClass(Env, CString, Object, Pointer, Size) -> Class;
    6 => FindClass(Env, CString) -> Class;
    7 => FromReflectedMethod(Env, Object) -> MethodId;
    8 => FromReflectedField(Env, Object) -> FieldId;
    9 => ToReflectedMethod(Env, Class, MethodId, Boolean) -> Object;
    10 => GetSuperclass(Env, Class) -> Class;
    11 => IsAssignableFrom(Env, Class, Class) -> Boolean;
    12 => ToReflectedField(Env, Class, FieldId, Boolean) -> Object;

    // Exceptions
    13 => Throw(Env, Throwable) -> Int;
    14 => ThrowNew(Env, Class, CString) -> Int;
    15 => ExceptionOccurred(Env) -> Throwable;
    16 => ExceptionDescribe(Env) -> Void;
    17 => ExceptionClear(Env) -> Void;
    18 => FatalError(Env, CString) -> Void;

    // References
    19 => PushLocalFrame(Env, Int) -> Int;
    20 => PopLocalFrame(Env, Object) -> Object;
    21 => NewGlobalRef(Env, Object) -> Object;
    22 => DeleteGlobalRef(Env, Object) -> Void;
    23 => DeleteLocalRef(Env, Object) -> Void;
    24 => IsSameObject(Env, Object, Object) -> Boolean;
    25 => NewLocalRef(Env, Object) -> Object;
    26 => EnsureLocalCapacity(Env, Int) -> Int;

    // Object construction
    27 => AllocObject(Env, Class) -> Object;
    28 => NewObject(Env, Class, MethodId, Variadic) -> Object;
    29 => NewObjectV(Env, Class, MethodId, VaList) -> Object;
    30 => NewObjectA(Env, Class, MethodId, JValues) -> Object;
    31 => GetObjectClass(Env, Object) -> Class;
    32 => IsInstanceOf(Env, Object, Class) -> Boolean;

    // Instance methods
    33 => GetMethodID(Env, Class, CString, CString) -> MethodId;
    34 => CallObjectMethod(Env, Object, MethodId, Variadic) -> Object;
    35 => CallObjectMethodV(Env, Object, MethodId, VaList) -> Object;
    36 => CallObjectMethodA(Env, Object, MethodId, JValues) -> Object;
    37 => CallBooleanMethod(Env, Object, MethodId, Variadic) -> Boolean;
    38 => CallBooleanMethodV(Env, Object, MethodId, VaList) -> Boolean;
    39 => CallBooleanMethodA(Env, Object, MethodId, JValues) -> Boolean;
    40 => CallByteMethod(Env, Object, MethodId, Variadic) -> Byte;
    41 => CallByteMethodV(Env, Object, MethodId, VaList) -> Byte;
    42 => CallByteMethodA(Env, Object, MethodId, JValues) -> Byte;
    43 => CallCharMethod(Env, Object, MethodId, Variadic) -> Char;
    44 => CallCharMethodV(Env, Object, MethodId, VaList) -> Char;
    45 => CallCharMethodA(Env, Object, MethodId, JValues) -> Char;
    46 => CallShortMethod(Env, Object, MethodId, Variadic) -> Short;
    47 => CallShortMethodV(Env, Object, MethodId, VaList) -> Short;
    48 => CallShortMethodA(Env, Object, MethodId, JValues) -> Short;
    49 => CallIntMethod(Env, Object, MethodId, Variadic) -> Int;
    50 => CallIntMethodV(Env, Object, MethodId, VaList) -> Int;
    51 => CallIntMethodA(Env, Object, MethodId, JValues) -> Int;
    52 => CallLongMethod(Env, Object, MethodId, Variadic) -> Long;
    53 => CallLongMethodV(Env, Object, MethodId, VaList) -> Long;
    54 => CallLongMethodA(Env, Object, MethodId, JValues) -> Long;
    55 => CallFloatMethod(Env, Object, MethodId, Variadic) -> Float;
    56 => CallFloatMethodV(Env, Object, MethodId, VaList) -> Float;
    57 => CallFloatMethodA(Env, Object, MethodId, JValues) -> Float;
    58 => CallDoubleMethod(Env, Object, MethodId, Variadic) -> Double;
    59 => CallDoubleMethodV(Env, Object, MethodId, VaList) -> Double;
    60 => CallDoubleMethodA(Env, Object, MethodId, JValues) -> Double;
    61 => CallVoidMethod(Env, Object, MethodId, Variadic) -> Void;
    62 => CallVoidMethodV(Env, Object, MethodId, VaList) -> Void;
    63 => CallVoidMethodA(Env, Object, MethodId, JValues) -> Void;

    // Non-virtual methods
    64 => CallNonvirtualObjectMethod(Env, Object, Class, MethodId, Variadic) -> Object;
    65 => CallNonvirtualObjectMethodV(Env, Object, Class, MethodId, VaList) -> Object;
    66 => CallNonvirtualObjectMethodA(Env, Object, Class, MethodId, JValues) -> Object;
    67 => CallNonvirtualBooleanMethod(Env, Object, Class, MethodId, Variadic) -> Boolean;
    68 => CallNonvirtualBooleanMethodV(Env, Object, Class, MethodId, VaList) -> Boolean;
    69 => CallNonvirtualBooleanMethodA(Env, Object, Class, MethodId, JValues) -> Boolean;
    70 => CallNonvirtualByteMethod(Env, Object, Class, MethodId, Variadic) -> Byte;
    71 => CallNonvirtualByteMethodV(Env, Object, Class, MethodId, VaList) -> Byte;
    72 => CallNonvirtualByteMethodA(Env, Object, Class, MethodId, JValues) -> Byte;
    73 => CallNonvirtualCharMethod(Env, Object, Class, MethodId, Variadic) -> Char;
    74 => CallNonvirtualCharMethodV(Env, Object, Class, MethodId, VaList) -> Char;
    75 => CallNonvirtualCharMethodA(Env, Object, Class, MethodId, JValues) -> Char;
    76 => CallNonvirtualShortMethod(Env, Object, Class, MethodId, Variadic) -> Short;
    77 => CallNonvirtualShortMethodV(Env, Object, Class, MethodId, VaList) -> Short;
    78 => CallNonvirtualShortMethodA(Env, Object, Class, MethodId, JValues) -> Short;
    79 => CallNonvirtualIntMethod(Env, Object, Class, MethodId, Variadic) -> Int;
    80 => CallNonvirtualIntMethodV(Env, Object, Class, MethodId, VaList) -> Int;
    81 => CallNonvirtualIntMethodA(Env, Object, Class, MethodId, JValues) -> Int;
    82 => CallNonvirtualLongMethod(Env, Object, Class, MethodId, Variadic) -> Long;
    83 => CallNonvirtualLongMethodV(Env, Object, Class, MethodId, VaList) -> Long;
    84 => CallNonvirtualLongMethodA(Env, Object, Class, MethodId, JValues) -> Long;
    85 => CallNonvirtualFloatMethod(Env, Object, Class, MethodId, Variadic) -> Float;
    86 => CallNonvirtualFloatMethodV(Env, Object, Class, MethodId, VaList) -> Float;
    87 => CallNonvirtualFloatMethodA(Env, Object, Class, MethodId, JValues) -> Float;
    88 => CallNonvirtualDoubleMethod(Env, Object, Class, MethodId, Variadic) -> Double;
    89 => CallNonvirtualDoubleMethodV(Env, Object, Class, MethodId, VaList) -> Double;
    90 => CallNonvirtualDoubleMethodA(Env, Object, Class, MethodId, JValues) -> Double;
    91 => CallNonvirtualVoidMethod(Env, Object, Class, MethodId, Variadic) -> Void;
    92 => CallNonvirtualVoidMethodV(Env, Object, Class, MethodId, VaList) -> Void;
    93 => CallNonvirtualVoidMethodA(Env, Object, Class, MethodId, JValues) -> Void;

    // Instance fields
    94 => GetFieldID(Env, Class, CString, CString) -> FieldId;
    95 => GetObjectField(Env, Object, FieldId) -> Object;
    96 => GetBooleanField(Env, Object, FieldId) -> Boolean;
    97 => GetByteField(Env, Object, FieldId) -> Byte;
    98 => GetCharField(Env, Object, FieldId) -> Char;
    99 => GetShortField(Env, Object, FieldId) -> Short;
    100 => GetIntField(Env, Object, FieldId) -> Int;
    101 => GetLongField(Env, Object, FieldId) -> Long;
    102 => GetFloatField(Env, Object, FieldId) -> Float;
    103 => GetDoubleField(Env, Object, FieldId) -> Double;
    104 => SetObjectField(Env, Object, FieldId, Object) -> Void;
    105 => SetBooleanField(Env, Object, FieldId, Boolean) -> Void;
    106 => SetByteField(Env, Object, FieldId, Byte) -> Void;
    107 => SetCharField(Env, Object, FieldId, Char) -> Void;
    108 => SetShortField(Env, Object, FieldId, Short) -> Void;
    109 => SetIntField(Env, Object, FieldId, Int) -> Void;
    110 => SetLongField(Env, Object, FieldId, Long) -> Void;
    111 => SetFloatField(Env, Object, FieldId, Float) -> Void;
    112 => SetDoubleField(Env, Object, FieldId, Double) -> Void;

    // Static methods
    113 => GetStaticMethodID(Env, Class, CString, CString) -> MethodId;
    114 => CallStaticObjectMethod(Env, Class, MethodId, Variadic) -> Object;
    115 => CallStaticObjectMethodV(Env, Class, MethodId, VaList) -> Object;
    116 => CallStaticObjectMethodA(Env, Class, MethodId, JValues) -> Object;
    117 => CallStaticBooleanMethod(Env, Class, MethodId, Variadic) -> Boolean;
    118 => CallStaticBooleanMethodV(Env, Class, MethodId, VaList) -> Boolean;
    119 => CallStaticBooleanMethodA(Env, Class, MethodId, JValues) -> Boolean;
    120 => CallStaticByteMethod(Env, Class, MethodId, Variadic) -> Byte;
    121 => CallStaticByteMethodV(Env, Class, MethodId, VaList) -> Byte;
    122 => CallStaticByteMethodA(Env, Class, MethodId, JValues) -> Byte;
    123 => CallStaticCharMethod(Env, Class, MethodId, Variadic) -> Char;
    124 => CallStaticCharMethodV(Env, Class, MethodId, VaList) -> Char;
    125 => CallStaticCharMethodA(Env, Class, MethodId, JValues) -> Char;
    126 => CallStaticShortMethod(Env, Class, MethodId, Variadic) -> Short;
    127 => CallStaticShortMethodV(Env, Class, MethodId, VaList) -> Short;
    128 => CallStaticShortMethodA(Env, Class, MethodId, JValues) -> Short;
    129 => CallStaticIntMethod(Env, Class, MethodId, Variadic) -> Int;
    130 => CallStaticIntMethodV(Env, Class, MethodId, VaList) -> Int;
    131 => CallStaticIntMethodA(Env, Class, MethodId, JValues) -> Int;
    132 => CallStaticLongMethod(Env, Class, MethodId, Variadic) -> Long;
    133 => CallStaticLongMethodV(Env, Class, MethodId, VaList) -> Long;
    134 => CallStaticLongMethodA(Env, Class, MethodId, JValues) -> Long;
    135 => CallStaticFloatMethod(Env, Class, MethodId, Variadic) -> Float;
    136 => CallStaticFloatMethodV(Env, Class, MethodId, VaList) -> Float;
    137 => CallStaticFloatMethodA(Env, Class, MethodId, JValues) -> Float;
    138 => CallStaticDoubleMethod(Env, Class, MethodId, Variadic) -> Double;
    139 => CallStaticDoubleMethodV(Env, Class, MethodId, VaList) -> Double;
    140 => CallStaticDoubleMethodA(Env, Class, MethodId, JValues) -> Double;
    141 => CallStaticVoidMethod(Env, Class, MethodId, Variadic) -> Void;
    142 => CallStaticVoidMethodV(Env, Class, MethodId, VaList) -> Void;
    143 => CallStaticVoidMethodA(Env, Class, MethodId, JValues) -> Void;

    // Static fields
    144 => GetStaticFieldID(Env, Class, CString, CString) -> FieldId;
    145 => GetStaticObjectField(Env, Class, FieldId) -> Object;
    146 => GetStaticBooleanField(Env, Class, FieldId) -> Boolean;
    147 => GetStaticByteField(Env, Class, FieldId) -> Byte;
    148 => GetStaticCharField(Env, Class, FieldId) -> Char;
    149 => GetStaticShortField(Env, Class, FieldId) -> Short;
    150 => GetStaticIntField(Env, Class, FieldId) -> Int;
    151 => GetStaticLongField(Env, Class, FieldId) -> Long;
    152 => GetStaticFloatField(Env, Class, FieldId) -> Float;
    153 => GetStaticDoubleField(Env, Class, FieldId) -> Double;
    154 => SetStaticObjectField(Env, Class, FieldId, Object) -> Void;
    155 => SetStaticBooleanField(Env, Class, FieldId, Boolean) -> Void;
    156 => SetStaticByteField(Env, Class, FieldId, Byte) -> Void;
    157 => SetStaticCharField(Env, Class, FieldId, Char) -> Void;
    158 => SetStaticShortField(Env, Class, FieldId, Short) -> Void;
    159 => SetStaticIntField(Env, Class, FieldId, Int) -> Void;
    160 => SetStaticLongField(Env, Class, FieldId, Long) -> Void;
    161 => SetStaticFloatField(Env, Class, FieldId, Float) -> Void;
    162 => SetStaticDoubleField(Env, Class, FieldId, Double) -> Void;

    // Strings and object arrays
    163 => NewString(Env, Pointer, Size) -> String;
    164 => GetStringLength(Env, String) -> Size;
    165 => GetStringChars(Env, String, Pointer) -> Pointer;
    166 => ReleaseStringChars(Env, String, Pointer) -> Void;
    167 => NewStringUTF(Env, CString) -> String;
    168 => GetStringUTFLength(Env, String) -> Size;
    169 => GetStringUTFChars(Env, String, Pointer) -> CString;
    170 => ReleaseStringUTFChars(Env, String, CString) -> Void;
    171 => GetArrayLength(Env, Array) -> Size;
    172 => NewObjectArray(Env, Size, Class, Object) -> ObjectArray;
    173 => GetObjectArrayElement(Env, ObjectArray, Size) -> Object;
    174 => SetObjectArrayElement(Env, ObjectArray, Size, Object) -> Void;

    // Primitive arrays
    175 => NewBooleanArray(Env, Size) -> BooleanArray;
    176 => NewByteArray(Env, Size) -> ByteArray;
    177 => NewCharArray(Env, Size) -> CharArray;
    178 => NewShortArray(Env, Size) -> ShortArray;
    179 => NewIntArray(Env, Size) -> IntArray;
    180 => NewLongArray(Env, Size) -> LongArray;
    181 => NewFloatArray(Env, Size) -> FloatArray;
    182 => NewDoubleArray(Env, Size) -> DoubleArray;
    183 => GetBooleanArrayElements(Env, BooleanArray, Pointer) -> Pointer;
    184 => GetByteArrayElements(Env, ByteArray, Pointer) -> Pointer;
    185 => GetCharArrayElements(Env, CharArray, Pointer) -> Pointer;
    186 => GetShortArrayElements(Env, ShortArray, Pointer) -> Pointer;
    187 => GetIntArrayElements(Env, IntArray, Pointer) -> Pointer;
    188 => GetLongArrayElements(Env, LongArray, Pointer) -> Pointer;
    189 => GetFloatArrayElements(Env, FloatArray, Pointer) -> Pointer;
    190 => GetDoubleArrayElements(Env, DoubleArray, Pointer) -> Pointer;
    191 => ReleaseBooleanArrayElements(Env, BooleanArray, Pointer, Int) -> Void;
    192 => ReleaseByteArrayElements(Env, ByteArray, Pointer, Int) -> Void;
    193 => ReleaseCharArrayElements(Env, CharArray, Pointer, Int) -> Void;
    194 => ReleaseShortArrayElements(Env, ShortArray, Pointer, Int) -> Void;
    195 => ReleaseIntArrayElements(Env, IntArray, Pointer, Int) -> Void;
    196 => ReleaseLongArrayElements(Env, LongArray, Pointer, Int) -> Void;
    197 => ReleaseFloatArrayElements(Env, FloatArray, Pointer, Int) -> Void;
    198 => ReleaseDoubleArrayElements(Env, DoubleArray, Pointer, Int) -> Void;
    199 => GetBooleanArrayRegion(Env, BooleanArray, Size, Size, Pointer) -> Void;
    200 => GetByteArrayRegion(Env, ByteArray, Size, Size, Pointer) -> Void;
    201 => GetCharArrayRegion(Env, CharArray, Size, Size, Pointer) -> Void;
    202 => GetShortArrayRegion(Env, ShortArray, Size, Size, Pointer) -> Void;
    203 => GetIntArrayRegion(Env, IntArray, Size, Size, Pointer) -> Void;
    204 => GetLongArrayRegion(Env, LongArray, Size, Size, Pointer) -> Void;
    205 => GetFloatArrayRegion(Env, FloatArray, Size, Size, Pointer) -> Void;
    206 => GetDoubleArrayRegion(Env, DoubleArray, Size, Size, Pointer) -> Void;
    207 => SetBooleanArrayRegion(Env, BooleanArray, Size, Size, Pointer) -> Void;
    208 => SetByteArrayRegion(Env, ByteArray, Size, Size, Pointer) -> Void;
    209 => SetCharArrayRegion(Env, CharArray, Size, Size, Pointer) -> Void;
    210 => SetShortArrayRegion(Env, ShortArray, Size, Size, Pointer) -> Void;
    211 => SetIntArrayRegion(Env, IntArray, Size, Size, Pointer) -> Void;
    212 => SetLongArrayRegion(Env, LongArray, Size, Size, Pointer) -> Void;
    213 => SetFloatArrayRegion(Env, FloatArray, Size, Size, Pointer) -> Void;
    214 => SetDoubleArrayRegion(Env, DoubleArray, Size, Size, Pointer) -> Void;

    // Natives, monitors and critical regions
    215 => RegisterNatives(Env, Class, Pointer, Int) -> Int;
    216 => UnregisterNatives(Env, Class) -> Int;
    217 => MonitorEnter(Env, Object) -> Int;
    218 => MonitorExit(Env, Object) -> Int;
    219 => GetJavaVM(Env, Pointer) -> Int;
    220 => GetStringRegion(Env, String, Size, Size, Pointer) -> Void;
    221 => GetStringUTFRegion(Env, String, Size, Size, Pointer) -> Void;
    222 => GetPrimitiveArrayCritical(Env, Array, Pointer) -> Pointer;
    223 => ReleasePrimitiveArrayCritical(Env, Array, Pointer, Int) -> Void;
    224 => GetStringCritical(Env, String, Pointer) -> Pointer;
    225 => ReleaseStringCritical(Env, String, Pointer) -> Void;
    226 => NewWeakGlobalRef(Env, Object) -> Weak;
    227 => DeleteWeakGlobalRef(Env, Weak) -> Void;
    228 => ExceptionCheck(Env) -> Boolean;

    // NIO direct buffers (JNI 1.4)
    229 => NewDirectByteBuffer(Env, Pointer, Long) -> Object;
    230 => GetDirectBufferAddress(Env, Object) -> Pointer;
    231 => GetDirectBufferCapacity(Env, Object) -> Long;

    // JNI 1.6
    232 => GetObjectRefType(Env, Object) -> RefType;

    // JDK 9
    233 => GetModule(Env, Class) -> Object;

    // JDK 19
    234 => IsVirtualThread(Env, Object) -> Boolean;

    // JDK 24
    235 => GetStringUTFLengthAsLong(Env, String) -> Long;
}
