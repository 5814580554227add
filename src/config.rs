//! Tracer configuration.
//!
//! Options arrive as the agent option string, comma-separated `key=value`
//! pairs:
//!
//! ```text
//! -agentpath:libtracer.so=version=auto,include=Call*|NewObject*,exclude=CallVoidMethodA
//! ```
//!
//! | Key       | Values                                 | Default |
//! |-----------|----------------------------------------|---------|
//! | `version` | `1.4`, `1.6`, `9`, `19`, `24`, `auto`  | `1.6`   |
//! | `include` | method names, `*` suffix matches a prefix | all  |
//! | `exclude` | same                                   | none    |
//!
//! Several names are separated by `|`.
//!
//! Filters only decide which events reach the sink. Every slot is still
//! intercepted, so env substitution and signature capture are unaffected.

use std::str::FromStr;

use crate::catalog::JniVersion;
use crate::error::{Result, TraceError};
use crate::sys::jni::{self, JNIEnv};

/// Which table layout to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSelection {
    Fixed(JniVersion),
    /// Ask the real env's `GetVersion` before building.
    Auto,
}

impl Default for VersionSelection {
    fn default() -> Self {
        VersionSelection::Fixed(JniVersion::default())
    }
}

impl VersionSelection {
    /// Resolves the layout for `real_env`.
    ///
    /// # Safety
    ///
    /// With [`VersionSelection::Auto`], `real_env` must be a valid `JNIEnv*`
    /// attached to the calling thread.
    pub unsafe fn resolve(self, real_env: *mut JNIEnv) -> Result<JniVersion> {
        match self {
            VersionSelection::Fixed(v) => Ok(v),
            VersionSelection::Auto => {
                let slot = jni::read_slot(real_env, jni::GET_VERSION_INDEX);
                if slot.is_null() {
                    return Err(TraceError::NullSlot {
                        index: jni::GET_VERSION_INDEX,
                        name: "GetVersion",
                    });
                }
                let get_version: jni::GetVersionFn = std::mem::transmute(slot);
                let raw = get_version(real_env);
                let version = JniVersion::from_raw(raw).ok_or_else(|| TraceError::InvalidOption {
                    key: "version".to_string(),
                    message: format!("VM reports unsupported JNI version {raw:#x}"),
                })?;
                log::debug!("detected JNI version {raw:#x}, using {version} table layout");
                Ok(version)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Exact(String),
    Prefix(String),
}

impl Pattern {
    fn parse(s: &str) -> Self {
        match s.strip_suffix('*') {
            Some(prefix) => Pattern::Prefix(prefix.to_string()),
            None => Pattern::Exact(s.to_string()),
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Pattern::Exact(n) => n == name,
            Pattern::Prefix(p) => name.starts_with(p.as_str()),
        }
    }
}

/// Name-based event filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl MethodFilter {
    /// Passes everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn include(mut self, pattern: &str) -> Self {
        self.include.push(Pattern::parse(pattern));
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.exclude.push(Pattern::parse(pattern));
        self
    }

    /// An empty include list includes every name. Exclusion wins.
    pub fn allows(&self, name: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|p| p.matches(name));
        included && !self.exclude.iter().any(|p| p.matches(name))
    }
}

/// Parsed agent options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceConfig {
    pub version: VersionSelection,
    pub filter: MethodFilter,
}

impl TraceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: VersionSelection) -> Self {
        self.version = version;
        self
    }

    pub fn filter(mut self, filter: MethodFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Parses an agent option string. An empty string yields the defaults.
    pub fn parse(options: &str) -> Result<Self> {
        let mut config = TraceConfig::default();
        for pair in options.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| TraceError::InvalidOption {
                key: pair.to_string(),
                message: "expected key=value".to_string(),
            })?;
            let (key, value) = (key.trim(), value.trim());
            match key {
                "version" => {
                    config.version = if value.eq_ignore_ascii_case("auto") {
                        VersionSelection::Auto
                    } else {
                        VersionSelection::Fixed(value.parse()?)
                    };
                }
                "include" | "exclude" => {
                    for pattern in value.split('|').map(str::trim) {
                        if pattern.is_empty() || (pattern == "*" && key == "exclude") {
                            return Err(TraceError::InvalidOption {
                                key: key.to_string(),
                                message: format!("unusable pattern `{pattern}`"),
                            });
                        }
                        config.filter = if key == "include" {
                            config.filter.include(pattern)
                        } else {
                            config.filter.exclude(pattern)
                        };
                    }
                }
                _ => {
                    return Err(TraceError::InvalidOption {
                        key: key.to_string(),
                        message: "unknown option".to_string(),
                    })
                }
            }
        }
        Ok(config)
    }
}

impl FromStr for TraceConfig {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        TraceConfig::parse(s)
    }
}
