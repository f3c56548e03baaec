// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Execution of external tools such as `snapctl` and `secrets-config`.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;

use crate::Error;

#[cfg(test)]
#[path = "./exec_test.rs"]
mod exec_test;

/// Default limit for a single external command.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that runs a command line tool with arguments.
///
/// Implementations return the trimmed standard output on success.
#[async_trait]
pub trait Runner: Send + Sync {
    async fn run(&self, args: &[String]) -> crate::Result<String>;
}

/// Runs a program as a child process, killing it if it exceeds the timeout.
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    program: PathBuf,
    current_dir: Option<PathBuf>,
    timeout: Duration,
}

impl ExternalCommand {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            current_dir: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// The `snapctl` tool found on `PATH`.
    pub fn snapctl() -> Self {
        Self::new("snapctl")
    }

    pub fn with_current_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command_line(&self, args: &[String]) -> String {
        let mut line = self.program.display().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

#[async_trait]
impl Runner for ExternalCommand {
    async fn run(&self, args: &[String]) -> crate::Result<String> {
        let command = self.command_line(args);
        tracing::debug!("Executing '{command}'");

        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|error| Error::SpawnFailed {
                command: command.clone(),
                error,
            })?,
            Err(_) => {
                return Err(Error::CommandTimeout {
                    command,
                    timeout: self.timeout,
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::CommandFailed {
                command,
                status: output.status.to_string(),
                output: format!("{stdout}{stderr}").trim().to_string(),
            });
        }

        Ok(stdout.trim().to_string())
    }
}
