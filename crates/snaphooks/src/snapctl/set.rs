// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use crate::exec::Runner;
use crate::Error;

#[cfg(test)]
#[path = "./set_test.rs"]
mod set_test;

/// `snapctl set [-t|-s] [:<plug|slot>] key=value...`
///
/// All changes are persisted by snapd at once, after the hook returns.
#[derive(Debug, Clone, Default)]
pub struct Set {
    pairs: Vec<(String, String)>,
    interface: Option<String>,
    document: bool,
    string: bool,
}

impl Set {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `key=value` assignment. Nested keys use a dotted path.
    pub fn pair<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Set attributes of the named plug or slot.
    pub fn interface<S: Into<String>>(mut self, name: S) -> Self {
        self.interface = Some(name.into());
        self
    }

    /// Parse values strictly as JSON documents (`-t`).
    pub fn document(mut self) -> Self {
        self.document = true;
        self
    }

    /// Parse values as plain strings (`-s`).
    pub fn string(mut self) -> Self {
        self.string = true;
        self
    }

    fn validate(&self) -> crate::Result<()> {
        if self.pairs.is_empty() {
            return Err(Error::InvalidInput(
                "at least one key-value pair is required".to_string(),
            ));
        }
        for (key, _) in &self.pairs {
            if key.is_empty() || key.contains(' ') || key.contains('=') {
                return Err(Error::InvalidInput(format!(
                    "key must be non-empty without spaces or '='. Got: '{key}'"
                )));
            }
        }
        super::validate_interface(&self.interface)
    }

    pub fn args(&self) -> crate::Result<Vec<String>> {
        self.validate()?;

        let mut args = vec!["set".to_string()];
        if self.document {
            args.push("-t".to_string());
        }
        if self.string {
            args.push("-s".to_string());
        }
        if let Some(name) = &self.interface {
            args.push(format!(":{name}"));
        }
        args.extend(self.pairs.iter().map(|(k, v)| format!("{k}={v}")));
        Ok(args)
    }

    pub async fn run(&self, snapctl: &dyn Runner) -> crate::Result<()> {
        snapctl.run(&self.args()?).await.map(|_| ())
    }
}
