// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Location of override files on disk.

use std::path::{Path, PathBuf};

#[cfg(test)]
#[path = "./layout_test.rs"]
mod layout_test;

/// File name of a service's environment override file.
pub const OVERRIDES_FILENAME: &str = "overrides.env";

/// Maps service names to override file paths.
///
/// Services normally get `<root>/<service>/overrides.env`. At most one
/// service is root-level and gets `<root>/overrides.env` instead, so that no
/// two services ever share a file. This is used by bundles whose single
/// service reads its configuration straight from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideLayout {
    root: PathBuf,
    root_level: Option<String>,
}

impl OverrideLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            root_level: None,
        }
    }

    /// Write the overrides of `service` at the root, replacing any service
    /// designated before.
    pub fn with_root_level_service<S: Into<String>>(mut self, service: S) -> Self {
        self.root_level = Some(service.into());
        self
    }

    pub fn root_level_service(&self) -> Option<&str> {
        self.root_level.as_deref()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_root_level(&self, service: &str) -> bool {
        self.root_level.as_deref() == Some(service)
    }

    /// Directory holding the override file of `service`.
    pub fn dir_for(&self, service: &str) -> PathBuf {
        if self.is_root_level(service) {
            self.root.clone()
        } else {
            self.root.join(service)
        }
    }

    /// Override file path of `service`.
    pub fn path_for(&self, service: &str) -> PathBuf {
        self.dir_for(service).join(OVERRIDES_FILENAME)
    }
}
