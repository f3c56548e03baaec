// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Mapping of flattened config keys to environment variable names.

#[cfg(test)]
#[path = "./envvar_test.rs"]
mod envvar_test;

/// Default replacement for both `.` and `-`.
pub const DEFAULT_SEPARATOR: &str = "_";

/// How config keys become environment variable names.
///
/// snapd uses dots for hierarchy and hyphens as segment separators; each of
/// them maps to its own replacement string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVarPolicy {
    /// Replacement for `.` in `config.<x.y>`.
    pub hierarchy_separator: String,

    /// Replacement for `-` in `config.<x-y>`.
    pub segment_separator: String,

    /// Allow dotted keys. When false, a dotted key is an error.
    pub hierarchy: bool,
}

impl Default for EnvVarPolicy {
    fn default() -> Self {
        Self {
            hierarchy_separator: DEFAULT_SEPARATOR.to_string(),
            segment_separator: DEFAULT_SEPARATOR.to_string(),
            hierarchy: false,
        }
    }
}

impl EnvVarPolicy {
    /// Policy with hierarchical keys enabled and default separators.
    pub fn hierarchical() -> Self {
        Self {
            hierarchy: true,
            ..Self::default()
        }
    }

    pub fn with_hierarchy_separator<S: Into<String>>(mut self, sep: S) -> Self {
        self.hierarchy_separator = sep.into();
        self
    }

    pub fn with_segment_separator<S: Into<String>>(mut self, sep: S) -> Self {
        self.segment_separator = sep.into();
        self
    }

    /// Convert a flattened config key to an environment variable name.
    ///
    /// `x.y-z` becomes `X_Y_Z` with the default separators.
    pub fn to_env_var(&self, key: &str) -> crate::Result<String> {
        to_env_var(
            key,
            &self.hierarchy_separator,
            &self.segment_separator,
            self.hierarchy,
        )
    }
}

/// Convert `key` using explicit separators.
pub fn to_env_var(
    key: &str,
    hierarchy_separator: &str,
    segment_separator: &str,
    hierarchy: bool,
) -> crate::Result<String> {
    let name = if hierarchy {
        key.replace('.', hierarchy_separator)
    } else if key.contains('.') {
        return Err(crate::Error::IllegalDottedKey(key.to_string()));
    } else {
        key.to_string()
    };

    Ok(name.replace('-', segment_separator).to_uppercase())
}
