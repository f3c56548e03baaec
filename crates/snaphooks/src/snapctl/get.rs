// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use crate::exec::Runner;

#[cfg(test)]
#[path = "./get_test.rs"]
mod get_test;

/// `snapctl get [-d] [-t] [:<plug|slot>] [<keys>...]`
///
/// Reads configuration options, or interface attributes when an interface
/// is given. With several keys, or with [`Get::document`], the output is a
/// JSON document keyed by option name.
#[derive(Debug, Clone, Default)]
pub struct Get {
    keys: Vec<String>,
    interface: Option<String>,
    document: bool,
    strict: bool,
}

impl Get {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: super::collect(keys),
            ..Self::default()
        }
    }

    /// Read attributes of the named plug or slot.
    pub fn interface<S: Into<String>>(mut self, name: S) -> Self {
        self.interface = Some(name.into());
        self
    }

    /// Always return a document, even for a single key (`-d`).
    pub fn document(mut self) -> Self {
        self.document = true;
        self
    }

    /// Strict typing with nulls and quoted strings (`-t`).
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn args(&self) -> crate::Result<Vec<String>> {
        super::validate_interface(&self.interface)?;

        let mut args = vec!["get".to_string()];
        if self.document {
            args.push("-d".to_string());
        }
        if self.strict {
            args.push("-t".to_string());
        }
        if let Some(name) = &self.interface {
            args.push(format!(":{name}"));
        }
        args.extend(self.keys.iter().cloned());
        Ok(args)
    }

    pub async fn run(&self, snapctl: &dyn Runner) -> crate::Result<String> {
        snapctl.run(&self.args()?).await
    }
}
