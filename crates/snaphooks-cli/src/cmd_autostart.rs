// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `snaphooks autostart` command.

use clap::Args;
use colored::Colorize;
use miette::Result;
use snaphooks::exec::ExternalCommand;

/// Start or stop services from autostart options
#[derive(Debug, Args)]
pub struct CmdAutostart {
    /// Services managed by this snap
    #[clap(required = true)]
    services: Vec<String>,

    /// Name of the snap owning the services
    #[clap(long, env = "SNAP_NAME")]
    snap_name: String,
}

impl CmdAutostart {
    pub async fn run(&mut self, snapctl: &ExternalCommand) -> Result<i32> {
        let resolved = snaphooks::process_autostart(snapctl, &self.snap_name, &self.services).await?;

        for (service, autostart) in resolved {
            let state = match autostart {
                Some(true) => "started".green(),
                Some(false) => "stopped".yellow(),
                None => "unchanged".dimmed(),
            };
            tracing::info!("{}.{service}: {state}", self.snap_name);
        }
        Ok(0)
    }
}
