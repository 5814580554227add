use std::sync::Arc;

use jni_shadow::trampoline::dispatch::{
    DispatchArena, DispatchContext, DispatchResolver, SUPPORTED, THUNK_SIZE,
};
use jni_shadow::TraceError;

struct Unreachable;

impl DispatchResolver for Unreachable {
    unsafe fn resolve(&self, _regs: &mut [usize]) -> usize {
        unreachable!("thunks are never entered here")
    }
}

fn context() -> Arc<DispatchContext> {
    Arc::new(DispatchContext::new(Box::new(Unreachable)))
}

#[cfg(all(
    any(target_os = "linux", target_os = "android"),
    any(target_arch = "x86_64", target_arch = "aarch64")
))]
#[test]
fn arena_places_thunks_back_to_back_until_full() {
    assert!(SUPPORTED);
    let arena = DispatchArena::new(2).unwrap();
    assert_eq!(arena.capacity(), 2);
    assert!(arena.is_empty());

    let ctx = context();
    let first = arena.emit_thunk(&ctx).unwrap();
    let second = arena.emit_thunk(&ctx).unwrap();
    assert_eq!(second.addr() - first.addr(), THUNK_SIZE);
    assert_eq!(arena.len(), 2);

    assert!(matches!(arena.emit_thunk(&ctx), Err(TraceError::CodeAllocation(_))));
}

#[cfg(all(
    any(target_os = "linux", target_os = "android"),
    any(target_arch = "x86_64", target_arch = "aarch64")
))]
#[test]
fn sealing_keeps_addresses_and_stops_emission() {
    let arena = DispatchArena::new(4).unwrap();
    let ctx = context();
    let thunk = arena.emit_thunk(&ctx).unwrap();

    let code = arena.seal().unwrap();
    assert_eq!(code.as_ptr() as usize, thunk.addr());
    assert!(Arc::ptr_eq(&code, &arena.seal().unwrap()));
    assert!(matches!(arena.emit_thunk(&ctx), Err(TraceError::CodeAllocation(_))));
}

#[cfg(not(all(
    any(target_os = "linux", target_os = "android"),
    any(target_arch = "x86_64", target_arch = "aarch64")
)))]
#[test]
fn other_targets_are_refused_up_front() {
    assert!(!SUPPORTED);
    let _ = context();
    assert!(matches!(
        DispatchArena::new(1),
        Err(TraceError::UnsupportedPlatform(_))
    ));
}
