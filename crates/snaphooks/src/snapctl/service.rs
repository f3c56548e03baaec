// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Service lifecycle commands. Service names are `<snap>.<app>`.

use crate::exec::Runner;
use crate::Error;

#[cfg(test)]
#[path = "./service_test.rs"]
mod service_test;

fn service_args(subcommand: &str, flag: Option<&str>, names: &[String]) -> crate::Result<Vec<String>> {
    if names.is_empty() {
        return Err(Error::InvalidInput(format!("no services set to {subcommand}")));
    }
    super::validate_no_spaces("service name", names)?;

    let mut args = vec![subcommand.to_string()];
    args.extend(flag.map(String::from));
    args.extend(names.iter().cloned());
    Ok(args)
}

/// `snapctl start [--enable] <service>...`
///
/// From the configure hook the services start after the hook finishes.
#[derive(Debug, Clone, Default)]
pub struct Start {
    names: Vec<String>,
    enable: bool,
}

impl Start {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: super::collect(names),
            enable: false,
        }
    }

    /// Also enable the services so they start on boot.
    pub fn enable(mut self) -> Self {
        self.enable = true;
        self
    }

    pub fn args(&self) -> crate::Result<Vec<String>> {
        service_args("start", self.enable.then_some("--enable"), &self.names)
    }

    pub async fn run(&self, snapctl: &dyn Runner) -> crate::Result<()> {
        snapctl.run(&self.args()?).await.map(|_| ())
    }
}

/// `snapctl stop [--disable] <service>...`
#[derive(Debug, Clone, Default)]
pub struct Stop {
    names: Vec<String>,
    disable: bool,
}

impl Stop {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: super::collect(names),
            disable: false,
        }
    }

    /// Also disable the services so they do not start on boot.
    pub fn disable(mut self) -> Self {
        self.disable = true;
        self
    }

    pub fn args(&self) -> crate::Result<Vec<String>> {
        service_args("stop", self.disable.then_some("--disable"), &self.names)
    }

    pub async fn run(&self, snapctl: &dyn Runner) -> crate::Result<()> {
        snapctl.run(&self.args()?).await.map(|_| ())
    }
}

/// `snapctl restart [--reload] <service>...`
#[derive(Debug, Clone, Default)]
pub struct Restart {
    names: Vec<String>,
    reload: bool,
}

impl Restart {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: super::collect(names),
            reload: false,
        }
    }

    /// Reload services that support it instead of restarting them.
    pub fn reload(mut self) -> Self {
        self.reload = true;
        self
    }

    pub fn args(&self) -> crate::Result<Vec<String>> {
        service_args("restart", self.reload.then_some("--reload"), &self.names)
    }

    pub async fn run(&self, snapctl: &dyn Runner) -> crate::Result<()> {
        snapctl.run(&self.args()?).await.map(|_| ())
    }
}
