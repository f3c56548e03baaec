// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use crate::exec::Runner;
use crate::Error;

#[cfg(test)]
#[path = "./is_connected_test.rs"]
mod is_connected_test;

/// `snapctl is-connected <plug|slot>`
///
/// snapctl reports the result through its exit code, which is mapped to a
/// boolean here.
#[derive(Debug, Clone)]
pub struct IsConnected {
    name: String,
}

impl IsConnected {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    pub fn args(&self) -> crate::Result<Vec<String>> {
        if self.name.is_empty() {
            return Err(Error::InvalidInput("plug or slot name is required".to_string()));
        }
        super::validate_no_spaces("plug or slot name", std::slice::from_ref(&self.name))?;
        Ok(vec!["is-connected".to_string(), self.name.clone()])
    }

    pub async fn run(&self, snapctl: &dyn Runner) -> crate::Result<bool> {
        match snapctl.run(&self.args()?).await {
            Ok(_) => Ok(true),
            // A plain non-zero exit without a message means "not connected"
            Err(Error::CommandFailed { output, .. }) if output.is_empty() => Ok(false),
            Err(err) => Err(err),
        }
    }
}
