use thiserror::Error;

use crate::signature::ParseError;

/// Errors raised while building or running the shadow table.
///
/// Construction-time errors (catalog range, unsupported types, code
/// allocation) are fatal to initialization and are returned from
/// [`ShadowTableBuilder::build`](crate::shadow::ShadowTableBuilder::build).
/// Errors that happen inside a trampoline have no caller to return to; those
/// are logged and the documented fallback for that call path is taken.
#[derive(Error, Debug)]
pub enum TraceError {
    /// A table index outside the catalog range was requested.
    ///
    /// The catalog is versioned with the VM's table layout, so this means the
    /// configured [`JniVersion`](crate::catalog::JniVersion) does not match the VM.
    #[error("JNI table index {index} is outside the catalog range {start}..{end}")]
    IndexOutOfRange {
        /// The requested slot
        index: usize,
        /// First valid slot
        start: usize,
        /// One past the last valid slot
        end: usize,
    },

    /// A type marker that has no calling-convention representation was
    /// used where a concrete type is required.
    #[error("type `{0}` cannot be used in a fixed call signature")]
    UnsupportedType(&'static str),

    /// No real `JNIEnv*` is registered for the calling thread.
    #[error("no JNIEnv registered for thread {0}")]
    MissingEnvironment(String),

    /// The real table holds a null pointer in a slot the catalog declares callable.
    #[error("real JNI table has a null entry for {name} (slot {index})")]
    NullSlot {
        /// Slot index
        index: usize,
        /// Catalog name of the slot
        name: &'static str,
    },

    /// A variadic call arrived for a method id whose signature was never resolved.
    #[error("{name}: no resolved signature for method id {method_id:#x}")]
    UnresolvedMethod {
        /// Catalog name of the entry being called
        name: &'static str,
        /// The opaque method id
        method_id: usize,
    },

    /// A method signature string could not be parsed.
    #[error("invalid method signature: {0}")]
    Signature(#[from] ParseError),

    /// Executable memory for dispatcher thunks could not be mapped or sealed.
    #[error("failed to allocate trampoline code: {0}")]
    CodeAllocation(#[from] std::io::Error),

    /// libffi rejected a call interface.
    #[error("cannot prepare call interface: {0}")]
    CallInterface(String),

    /// Variadic dispatch is not implemented for this target.
    #[error("variadic dispatch is not supported on {0}")]
    UnsupportedPlatform(&'static str),

    /// An agent option could not be understood.
    #[error("invalid option `{key}`: {message}")]
    InvalidOption {
        /// The offending key
        key: String,
        /// What was wrong with it
        message: String,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TraceError>;
