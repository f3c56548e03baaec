// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use crate::exec::Runner;
use crate::Error;

#[cfg(test)]
#[path = "./unset_test.rs"]
mod unset_test;

/// `snapctl unset <keys>...`
#[derive(Debug, Clone, Default)]
pub struct Unset {
    keys: Vec<String>,
}

impl Unset {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: super::collect(keys),
        }
    }

    pub fn args(&self) -> crate::Result<Vec<String>> {
        if self.keys.is_empty() {
            return Err(Error::InvalidInput("no keys to unset".to_string()));
        }
        super::validate_no_spaces("key", &self.keys)?;

        let mut args = vec!["unset".to_string()];
        args.extend(self.keys.iter().cloned());
        Ok(args)
    }

    pub async fn run(&self, snapctl: &dyn Runner) -> crate::Result<()> {
        snapctl.run(&self.args()?).await.map(|_| ())
    }
}
