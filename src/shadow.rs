//! The shadow function table.
//!
//! ```text
//!  real JNIEnv*  ──► [ r0 r1 r2 r3 | GetVersion | FindClass | ... ]
//!                                        ▲            ▲
//!                                        │ forwards   │ forwards
//!  shadow env()  ──► [ 0  0  0  0  | trampoline | trampoline | ... ]
//! ```
//!
//! The table is index-aligned with the real one. Slots 0..4 are left zero.
//! Every other slot holds generated code chosen by the slot's
//! [`CallShape`].

use std::ffi::c_void;
use std::fmt;
use std::ptr;
use std::sync::Arc;
use std::thread;

use crate::catalog::{CallShape, JniVersion, MethodCatalog};
use crate::config::{TraceConfig, VersionSelection};
use crate::error::{Result, TraceError};
use crate::intercept::{FixedArityInterceptor, Interception, VaListInterceptor, VariadicInterceptor};
use crate::sys::jni::{self, JNIEnv, JNINativeInterface_};
use crate::trampoline::dispatch::DispatchArena;

/// A complete substitute function table.
pub struct ShadowTable {
    slots: Box<[*const c_void]>,
    env: Box<JNIEnv>,
    version: JniVersion,
}

// Immutable after construction; the slots are code addresses.
unsafe impl Send for ShadowTable {}
unsafe impl Sync for ShadowTable {}

impl ShadowTable {
    fn new(slots: Box<[*const c_void]>, version: JniVersion) -> Self {
        let env = Box::new(slots.as_ptr() as JNIEnv);
        Self { slots, env, version }
    }

    /// A `JNIEnv*` whose function table is this shadow table. Usable
    /// anywhere the real env is.
    pub fn env(&self) -> *mut JNIEnv {
        &*self.env as *const JNIEnv as *mut JNIEnv
    }

    /// The function table itself.
    pub fn slots(&self) -> &[*const c_void] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<*const c_void> {
        self.slots.get(index).copied()
    }

    pub fn version(&self) -> JniVersion {
        self.version
    }

    pub fn table(&self) -> *const JNINativeInterface_ {
        *self.env
    }
}

impl fmt::Debug for ShadowTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShadowTable")
            .field("version", &self.version)
            .field("slots", &self.slots.len())
            .field("env", &self.env())
            .finish()
    }
}

/// Builds a [`ShadowTable`] against a real env.
#[derive(Debug, Clone)]
pub struct ShadowTableBuilder {
    ctx: Arc<Interception>,
    version: VersionSelection,
}

impl ShadowTableBuilder {
    pub fn new(ctx: Arc<Interception>) -> Self {
        Self {
            ctx,
            version: VersionSelection::default(),
        }
    }

    /// Builder with the version selection of `config`. The config's filter
    /// belongs to the [`Interception`] and is applied there.
    pub fn with_config(ctx: Arc<Interception>, config: &TraceConfig) -> Self {
        Self::new(ctx).version(config.version)
    }

    pub fn version(mut self, version: VersionSelection) -> Self {
        self.version = version;
        self
    }

    pub fn interception(&self) -> &Arc<Interception> {
        &self.ctx
    }

    /// Builds against the real env registered for the current thread.
    pub fn build(&self) -> Result<Arc<ShadowTable>> {
        let env = self
            .ctx
            .registry
            .current()
            .ok_or_else(|| TraceError::MissingEnvironment(format!("{:?}", thread::current().id())))?;
        unsafe { self.build_from(env.as_ptr()) }
    }

    /// Builds against `real_env`.
    ///
    /// # Safety
    ///
    /// `real_env` must be a valid `JNIEnv*` whose table has at least as many
    /// slots as the selected layout, and must stay valid for the life of
    /// the process.
    pub unsafe fn build_from(&self, real_env: *mut JNIEnv) -> Result<Arc<ShadowTable>> {
        let version = self.version.resolve(real_env)?;
        let catalog = MethodCatalog::new(version);

        let variadic = catalog
            .iter()
            .filter(|d| d.shape() == CallShape::Variadic)
            .count();
        let arena = Arc::new(DispatchArena::new(variadic)?);

        let fixed = FixedArityInterceptor::new(self.ctx.clone());
        let varargs = VariadicInterceptor::new(self.ctx.clone(), arena.clone());
        let valist = VaListInterceptor::new(self.ctx.clone());

        let mut slots = vec![ptr::null::<c_void>(); version.table_len()].into_boxed_slice();
        for descriptor in catalog.iter() {
            let real = jni::read_slot(real_env, descriptor.index);
            if real.is_null() {
                return Err(TraceError::NullSlot {
                    index: descriptor.index,
                    name: descriptor.name,
                });
            }
            let code = match descriptor.shape() {
                CallShape::Fixed => fixed.create_intercept(descriptor, real)?,
                CallShape::Variadic => varargs.create_intercept(descriptor, real)?,
                CallShape::VaList => valist.create_intercept(descriptor, real)?,
            };
            slots[descriptor.index] = code.as_ptr();
        }

        let code = arena.seal()?;
        self.ctx.retainer.retain(code);
        self.ctx.retainer.retain(arena);

        let table = self.ctx.retainer.retain(Arc::new(ShadowTable::new(slots, version)));
        log::debug!(
            "built JNI {} shadow table: {} slots, {} dispatch thunks",
            version,
            catalog.len(),
            variadic
        );
        Ok(table)
    }
}
