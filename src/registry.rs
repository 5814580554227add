//! Thread → real `JNIEnv*` lookup.
//!
//! Every trampoline receives the shadow env as its first argument and must
//! substitute the real env of the calling thread before forwarding. Where that
//! env comes from is the agent's business; the tracer only asks
//! [`EnvironmentRegistry::env_for`].

use std::thread::{self, ThreadId};

use dashmap::DashMap;

use crate::sys::jni::JNIEnv;

/// A non-null real `JNIEnv*`, stored as an address so it can cross threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvPtr(usize);

impl EnvPtr {
    /// Returns `None` for a null env.
    pub fn new(env: *mut JNIEnv) -> Option<Self> {
        if env.is_null() {
            None
        } else {
            Some(EnvPtr(env as usize))
        }
    }

    pub fn as_ptr(self) -> *mut JNIEnv {
        self.0 as *mut JNIEnv
    }

    pub fn addr(self) -> usize {
        self.0
    }
}

/// Source of the real env for a thread.
pub trait EnvironmentRegistry: Send + Sync {
    fn env_for(&self, thread: ThreadId) -> Option<EnvPtr>;

    fn current(&self) -> Option<EnvPtr> {
        self.env_for(thread::current().id())
    }
}

/// Registry fed explicitly by the agent, typically from `ThreadStart` and
/// `ThreadEnd` callbacks or right after `AttachCurrentThread`.
#[derive(Debug, Default)]
pub struct ThreadEnvRegistry {
    envs: DashMap<ThreadId, EnvPtr>,
}

impl ThreadEnvRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `env` for `thread`. A null env removes the entry.
    pub fn register(&self, thread: ThreadId, env: *mut JNIEnv) {
        match EnvPtr::new(env) {
            Some(env) => {
                self.envs.insert(thread, env);
            }
            None => {
                self.envs.remove(&thread);
            }
        }
    }

    pub fn register_current(&self, env: *mut JNIEnv) {
        self.register(thread::current().id(), env);
    }

    pub fn unregister(&self, thread: ThreadId) -> Option<EnvPtr> {
        self.envs.remove(&thread).map(|(_, env)| env)
    }

    pub fn len(&self) -> usize {
        self.envs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }
}

impl EnvironmentRegistry for ThreadEnvRegistry {
    fn env_for(&self, thread: ThreadId) -> Option<EnvPtr> {
        self.envs.get(&thread).map(|e| *e)
    }
}
