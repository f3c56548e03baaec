// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! snaphooks - Snap Configuration Hook Support CLI

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use miette::Result;
use snaphooks::exec::ExternalCommand;
use snaphooks::snapctl::Get;
use tracing::Instrument;

mod cmd_autostart;
mod cmd_configure;
mod cmd_services;

use cmd_autostart::CmdAutostart;
use cmd_configure::CmdConfigure;
use cmd_services::CmdServices;

#[derive(Parser)]
#[clap(
    name = "snaphooks",
    about = "Snap Configuration Hook Support",
    version,
    long_about = "Turn snap options into service environment overrides and manage snap services from hooks"
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    #[clap(flatten)]
    snapctl: SnapctlFlags,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
struct Logging {
    /// Increase verbosity (-v, -vv, -vvv)
    #[clap(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[clap(short, long, global = true)]
    quiet: bool,

    /// Component name added to the log context
    #[clap(long, global = true, env = "SNAPHOOKS_COMPONENT")]
    component: Option<String>,
}

#[derive(Parser, Clone, Debug)]
pub struct SnapctlFlags {
    /// Path to the snapctl tool
    #[clap(long, global = true, env = "SNAPHOOKS_SNAPCTL", default_value = "snapctl")]
    pub snapctl: PathBuf,

    /// Timeout in seconds for each external command
    #[clap(long, global = true, env = "SNAPHOOKS_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,
}

impl SnapctlFlags {
    pub fn command(&self) -> ExternalCommand {
        ExternalCommand::new(&self.snapctl).with_timeout(Duration::from_secs(self.timeout))
    }
}

#[derive(Subcommand)]
enum Command {
    /// Write environment overrides from config options
    Configure(CmdConfigure),

    /// Start or stop services from autostart options
    Autostart(CmdAutostart),

    /// Show the status of snap services
    Services(CmdServices),
}

fn is_true(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

impl Opt {
    async fn run(self) -> Result<i32> {
        let snapctl = self.snapctl.command();

        // Debug output can be requested through the environment or the snap
        // option, the latter only when running inside a snap.
        let debug = std::env::var("DEBUG").is_ok_and(|v| is_true(&v))
            || Get::new(["debug"])
                .run(&snapctl)
                .await
                .is_ok_and(|v| is_true(&v));

        // Setup logging
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (_, _) if debug => tracing::Level::DEBUG,
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .init();

        let instance = std::env::var(snaphooks::env::SNAP_INSTANCE_NAME)
            .unwrap_or_else(|_| "snaphooks".to_string());
        let span = match &self.logging.component {
            Some(component) => tracing::info_span!("hook", %instance, %component),
            None => tracing::info_span!("hook", %instance),
        };

        // Dispatch to command
        async move {
            match self.cmd {
                Command::Configure(mut cmd) => cmd.run(&snapctl).await,
                Command::Autostart(mut cmd) => cmd.run(&snapctl).await,
                Command::Services(mut cmd) => cmd.run(&snapctl).await,
            }
        }
        .instrument(span)
        .await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();
    let code = opt.run().await?;
    std::process::exit(code);
}
