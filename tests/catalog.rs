use jni_shadow::catalog::{CallShape, JniVersion, MethodCatalog};
use jni_shadow::sys::jni;
use jni_shadow::{NativeType, TraceError};

#[test]
fn descriptors_are_index_ordered() {
    let catalog = MethodCatalog::new(JniVersion::V24);
    assert_eq!(catalog.range(), 4..236);
    assert_eq!(catalog.len(), 232);
    for (i, descriptor) in catalog.iter().enumerate() {
        assert_eq!(descriptor.index, i + 4, "{}", descriptor.name);
        assert_eq!(descriptor.args.first(), Some(&NativeType::Env), "{}", descriptor.name);
        assert!(
            descriptor.args[..descriptor.args.len() - 1].iter().all(|a| !a.is_marker()),
            "{} has a marker before its last parameter",
            descriptor.name
        );
    }
}

#[test]
fn well_known_slots() {
    let catalog = MethodCatalog::default();
    let cases = [
        (4, "GetVersion"),
        (6, "FindClass"),
        (28, "NewObject"),
        (33, "GetMethodID"),
        (34, "CallObjectMethod"),
        (49, "CallIntMethod"),
        (50, "CallIntMethodV"),
        (61, "CallVoidMethod"),
        (64, "CallNonvirtualObjectMethod"),
        (93, "CallNonvirtualVoidMethodA"),
        (94, "GetFieldID"),
        (113, "GetStaticMethodID"),
        (114, "CallStaticObjectMethod"),
        (143, "CallStaticVoidMethodA"),
        (167, "NewStringUTF"),
        (215, "RegisterNatives"),
        (228, "ExceptionCheck"),
        (232, "GetObjectRefType"),
    ];
    for (index, name) in cases {
        assert_eq!(catalog.descriptor(index).unwrap().name, name);
        assert_eq!(catalog.by_name(name).unwrap().index, index);
    }
}

#[test]
fn version_bounds_the_range() {
    assert_eq!(MethodCatalog::new(JniVersion::V1_4).range(), 4..232);
    assert_eq!(MethodCatalog::new(JniVersion::V1_6).range(), 4..233);
    assert_eq!(MethodCatalog::new(JniVersion::V9).range(), 4..234);
    assert_eq!(MethodCatalog::new(JniVersion::V19).range(), 4..235);

    let v9 = MethodCatalog::new(JniVersion::V9);
    assert_eq!(v9.descriptor(233).unwrap().name, "GetModule");
    assert!(v9.by_name("IsVirtualThread").is_none());
    assert_eq!(
        MethodCatalog::new(JniVersion::V24).descriptor(235).unwrap().name,
        "GetStringUTFLengthAsLong"
    );
}

#[test]
fn out_of_range_is_an_error() {
    let catalog = MethodCatalog::new(JniVersion::V1_6);
    for index in [0, 3, 233, 1000] {
        match catalog.descriptor(index) {
            Err(TraceError::IndexOutOfRange { index: i, start, end }) => {
                assert_eq!((i, start, end), (index, 4, 233));
            }
            other => panic!("slot {index}: unexpected {other:?}"),
        }
    }
}

#[test]
fn call_shapes() {
    let catalog = MethodCatalog::new(JniVersion::V24);
    let shape = |name: &str| catalog.by_name(name).unwrap().shape();
    assert_eq!(shape("CallStaticIntMethod"), CallShape::Variadic);
    assert_eq!(shape("CallIntMethodV"), CallShape::VaList);
    assert_eq!(shape("CallIntMethodA"), CallShape::Fixed);
    assert_eq!(shape("GetVersion"), CallShape::Fixed);

    let count = |s: CallShape| catalog.iter().filter(|d| d.shape() == s).count();
    // NewObject plus ten return types for each of the three call families.
    assert_eq!(count(CallShape::Variadic), 31);
    assert_eq!(count(CallShape::VaList), 31);
    assert_eq!(count(CallShape::Fixed), 232 - 62);
}

#[test]
fn method_id_positions() {
    let catalog = MethodCatalog::default();
    let position = |name: &str| catalog.by_name(name).unwrap().method_id_position();
    assert_eq!(position("CallIntMethodV"), Some(2));
    assert_eq!(position("CallStaticVoidMethod"), Some(2));
    assert_eq!(position("NewObjectV"), Some(2));
    assert_eq!(position("CallNonvirtualFloatMethodV"), Some(3));
    assert_eq!(position("FindClass"), None);

    let a = catalog.by_name("CallNonvirtualIntMethodA").unwrap();
    assert!(a.takes_jvalues());
    assert!(!catalog.by_name("CallIntMethodV").unwrap().takes_jvalues());
}

#[test]
fn fixed_args_drop_the_marker() {
    let catalog = MethodCatalog::default();
    let v = catalog.by_name("CallStaticDoubleMethodV").unwrap();
    assert_eq!(
        v.fixed_args(),
        &[NativeType::Env, NativeType::Class, NativeType::MethodId]
    );
    assert_eq!(v.ret, NativeType::Double);
    let find = catalog.by_name("FindClass").unwrap();
    assert_eq!(find.fixed_args(), find.args);
}

#[test]
fn resolution_slots() {
    let catalog = MethodCatalog::default();
    let resolvers: Vec<_> = catalog
        .iter()
        .filter(|d| d.is_method_resolution())
        .map(|d| d.name)
        .collect();
    assert_eq!(resolvers, ["GetMethodID", "GetStaticMethodID"]);
}

#[test]
fn versions_from_the_vm() {
    assert_eq!(JniVersion::from_raw(jni::JNI_VERSION_1_4), Some(JniVersion::V1_4));
    assert_eq!(JniVersion::from_raw(jni::JNI_VERSION_1_6), Some(JniVersion::V1_6));
    assert_eq!(JniVersion::from_raw(jni::JNI_VERSION_1_8), Some(JniVersion::V1_6));
    assert_eq!(JniVersion::from_raw(jni::JNI_VERSION_9), Some(JniVersion::V9));
    assert_eq!(JniVersion::from_raw(jni::JNI_VERSION_21), Some(JniVersion::V19));
    assert_eq!(JniVersion::from_raw(jni::JNI_VERSION_24), Some(JniVersion::V24));
    assert_eq!(JniVersion::from_raw(0x0001_0002), None);
    assert_eq!("1.6".parse::<JniVersion>().unwrap(), JniVersion::V1_6);
    assert!("7".parse::<JniVersion>().is_err());
}
