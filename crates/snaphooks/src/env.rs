// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Snap environment variables provided by snapd to hooks and apps.

use std::path::{Path, PathBuf};

use crate::Error;

#[cfg(test)]
#[path = "./env_test.rs"]
mod env_test;

pub const SNAP: &str = "SNAP";
pub const SNAP_COMMON: &str = "SNAP_COMMON";
pub const SNAP_DATA: &str = "SNAP_DATA";
pub const SNAP_INSTANCE_NAME: &str = "SNAP_INSTANCE_NAME";
pub const SNAP_NAME: &str = "SNAP_NAME";
pub const SNAP_REVISION: &str = "SNAP_REVISION";

/// The snap context of the current process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapEnv {
    pub snap: PathBuf,
    pub snap_common: PathBuf,
    pub snap_data: PathBuf,
    pub instance_name: String,
    pub name: String,
    pub revision: String,
}

impl SnapEnv {
    /// Load from the environment of this process.
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through `lookup`; every variable must be set and non-empty.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| match lookup(name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(Error::MissingEnv(name)),
        };

        Ok(Self {
            snap: require(SNAP)?.into(),
            snap_common: require(SNAP_COMMON)?.into(),
            snap_data: require(SNAP_DATA)?.into(),
            instance_name: require(SNAP_INSTANCE_NAME)?,
            name: require(SNAP_NAME)?,
            revision: require(SNAP_REVISION)?,
        })
    }

    /// `$SNAP/config`, the read-only configuration shipped with the snap.
    pub fn snap_conf(&self) -> PathBuf {
        self.snap.join("config")
    }

    /// `$SNAP_DATA/config`, the writable configuration and default override root.
    pub fn snap_data_conf(&self) -> PathBuf {
        self.snap_data.join("config")
    }

    /// Fully qualified name of one of this snap's apps.
    pub fn service_name(&self, app: &str) -> String {
        format!("{}.{app}", self.name)
    }

    pub fn snap_data(&self) -> &Path {
        &self.snap_data
    }
}
