//! Resolved method signatures and synthesized per-method trampolines.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::Result;
use crate::signature::JavaSignature;
use crate::sys::jni::jmethodID;
use crate::types::{self, FfiType, NativeType};

/// An opaque `jmethodID`, held by address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(usize);

impl MethodId {
    /// Returns `None` for a null id.
    pub fn new(id: jmethodID) -> Option<Self> {
        Self::from_addr(id as usize)
    }

    pub fn from_addr(addr: usize) -> Option<Self> {
        if addr == 0 {
            None
        } else {
            Some(MethodId(addr))
        }
    }

    pub fn addr(self) -> usize {
        self.0
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// What a resolution call told us about a method id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignatureRecord {
    /// Calling-convention types of the declared parameters, unpromoted.
    pub params: Vec<FfiType>,
    /// Declared parameter types, as reported in events.
    pub java_params: Vec<NativeType>,
    pub ret: FfiType,
}

impl MethodSignatureRecord {
    pub fn from_signature(sig: &JavaSignature) -> Result<Self> {
        let java_params = sig.native_params();
        Ok(Self {
            params: types::convert_all(&java_params)?,
            java_params,
            ret: sig.ret.native_type().ffi_type()?,
        })
    }
}

/// `jmethodID` → resolved signature. The first record stored for an id is
/// kept for the life of the process.
#[derive(Debug, Default)]
pub struct MethodSignatureCache {
    records: DashMap<MethodId, Arc<MethodSignatureRecord>>,
}

impl MethodSignatureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` unless `id` already has one. Returns the record now
    /// associated with `id`.
    pub fn insert(&self, id: MethodId, record: MethodSignatureRecord) -> Arc<MethodSignatureRecord> {
        self.records.entry(id).or_insert_with(|| Arc::new(record)).clone()
    }

    pub fn get(&self, id: MethodId) -> Option<Arc<MethodSignatureRecord>> {
        self.records.get(&id).map(|r| r.clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Hit and synthesis counts of a [`TrampolineCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub syntheses: u64,
}

/// `(slot, method id)` → synthesized value, built at most once per key.
///
/// Synthesis runs while the key's shard is write-locked, so concurrent
/// misses on one key wait for the first and then share its `Arc`.
pub struct TrampolineCache<T> {
    entries: DashMap<(usize, MethodId), Arc<T>>,
    hits: AtomicU64,
    syntheses: AtomicU64,
}

impl<T> TrampolineCache<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            syntheses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, slot: usize, id: MethodId) -> Option<Arc<T>> {
        self.entries.get(&(slot, id)).map(|e| e.clone())
    }

    /// Returns the cached value for `(slot, id)`, synthesizing it on a miss.
    ///
    /// A failed synthesis leaves the key empty; the next call retries.
    pub fn get_or_synthesize<F>(&self, slot: usize, id: MethodId, synthesize: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<Arc<T>>,
    {
        let key = (slot, id);
        if let Some(hit) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit.clone());
        }

        match self.entries.entry(key) {
            Entry::Occupied(e) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(e.get().clone())
            }
            Entry::Vacant(v) => {
                let value = synthesize()?;
                self.syntheses.fetch_add(1, Ordering::Relaxed);
                Ok(v.insert(value).clone())
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            syntheses: self.syntheses.load(Ordering::Relaxed),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for TrampolineCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TrampolineCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrampolineCache")
            .field("len", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}
