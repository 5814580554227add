use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use jni_shadow::cache::{MethodId, MethodSignatureCache, MethodSignatureRecord, TrampolineCache};
use jni_shadow::signature::JavaSignature;
use jni_shadow::{EnvironmentRegistry, FfiType, NativeType, ReferenceRetainer, ThreadEnvRegistry};

fn record(descriptor: &str) -> MethodSignatureRecord {
    MethodSignatureRecord::from_signature(&JavaSignature::parse(descriptor).unwrap()).unwrap()
}

fn id(addr: usize) -> MethodId {
    MethodId::from_addr(addr).unwrap()
}

#[test]
fn records_keep_declared_and_ffi_types() {
    let r = record("(IFLjava/lang/String;[J)D");
    assert_eq!(
        r.java_params,
        vec![NativeType::Int, NativeType::Float, NativeType::String, NativeType::LongArray]
    );
    assert_eq!(
        r.params,
        vec![FfiType::I32, FfiType::F32, FfiType::Pointer, FfiType::Pointer]
    );
    assert_eq!(r.ret, FfiType::F64);
}

#[test]
fn first_signature_wins() {
    let cache = MethodSignatureCache::new();
    let first = cache.insert(id(0x100), record("(I)V"));
    let second = cache.insert(id(0x100), record("(D)V"));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.get(id(0x100)).unwrap().java_params, vec![NativeType::Int]);
    assert_eq!(cache.len(), 1);
    assert!(cache.get(id(0x200)).is_none());
}

#[test]
fn null_method_id_is_rejected() {
    assert!(MethodId::from_addr(0).is_none());
    assert!(MethodId::new(std::ptr::null_mut()).is_none());
}

#[test]
fn concurrent_misses_synthesize_once() {
    const THREADS: usize = 16;
    let cache: TrampolineCache<usize> = TrampolineCache::new();
    let syntheses = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    let results: Vec<Arc<usize>> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    cache
                        .get_or_synthesize(49, id(0xABC), || {
                            syntheses.fetch_add(1, Ordering::SeqCst);
                            thread::yield_now();
                            Ok(Arc::new(7))
                        })
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(syntheses.load(Ordering::SeqCst), 1);
    assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
    let stats = cache.stats();
    assert_eq!(stats.syntheses, 1);
    assert_eq!(stats.hits, THREADS as u64 - 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn keys_include_the_slot() {
    let cache: TrampolineCache<&'static str> = TrampolineCache::new();
    let a = cache.get_or_synthesize(49, id(1), || Ok(Arc::new("int"))).unwrap();
    let b = cache.get_or_synthesize(140, id(1), || Ok(Arc::new("void"))).unwrap();
    assert_eq!((*a, *b), ("int", "void"));
    assert_eq!(cache.len(), 2);
}

#[test]
fn failed_synthesis_is_retried() {
    let cache: TrampolineCache<u8> = TrampolineCache::new();
    let err = cache.get_or_synthesize(49, id(1), || {
        Err(jni_shadow::TraceError::UnresolvedMethod {
            name: "CallIntMethod",
            method_id: 1,
        })
    });
    assert!(err.is_err());
    assert!(cache.get(49, id(1)).is_none());
    assert_eq!(*cache.get_or_synthesize(49, id(1), || Ok(Arc::new(3))).unwrap(), 3);
}

#[test]
fn retainer_keeps_values_alive() {
    let retainer = ReferenceRetainer::new();
    let value = retainer.retain(Arc::new(String::from("code")));
    retainer.retain(Arc::new(5u32));
    assert_eq!(retainer.len(), 2);
    assert_eq!(Arc::strong_count(&value), 2);
}

#[test]
fn registry_tracks_threads() {
    let registry = ThreadEnvRegistry::new();
    let env = 0x1000 as *mut jni_shadow::jni::JNIEnv;
    registry.register_current(env);
    assert_eq!(registry.current().unwrap().as_ptr(), env);

    let other = thread::scope(|s| s.spawn(|| registry.current()).join().unwrap());
    assert!(other.is_none());

    registry.register_current(std::ptr::null_mut());
    assert!(registry.current().is_none());
    assert!(registry.is_empty());
}
