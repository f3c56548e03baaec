// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `snaphooks services` command.

use std::collections::BTreeMap;

use clap::Args;
use colored::Colorize;
use miette::Result;
use snaphooks::exec::ExternalCommand;
use snaphooks::snapctl::{ServiceStatus, Services};

/// Show the status of snap services
#[derive(Debug, Args)]
pub struct CmdServices {
    /// Services to show, as <snap>.<app> (default: all)
    names: Vec<String>,

    /// Output format: table, yaml, json
    #[clap(long, default_value = "table")]
    format: String,
}

impl CmdServices {
    pub async fn run(&mut self, snapctl: &ExternalCommand) -> Result<i32> {
        let statuses = Services::new(self.names.iter().cloned()).run(snapctl).await?;

        match self.format.as_str() {
            "json" => println!(
                "{}",
                serde_json::to_string_pretty(&statuses)
                    .map_err(|e| miette::miette!("Failed to render json: {e}"))?
            ),
            "yaml" => print!(
                "{}",
                serde_yaml::to_string(&statuses)
                    .map_err(|e| miette::miette!("Failed to render yaml: {e}"))?
            ),
            _ => self.show_table(&statuses),
        }
        Ok(0)
    }

    fn show_table(&self, statuses: &BTreeMap<String, ServiceStatus>) {
        if statuses.is_empty() {
            println!("  {}", "(no services)".dimmed());
            return;
        }

        let width = statuses.keys().map(String::len).max().unwrap_or(0);
        println!("{:width$}  {:8}  {:8}  {}", "Service".bold(), "Startup".bold(), "Current".bold(), "Notes".bold());
        for (name, status) in statuses {
            let startup = if status.enabled {
                "enabled".green()
            } else {
                "disabled".yellow()
            };
            let current = if status.active {
                "active".green()
            } else {
                "inactive".dimmed()
            };
            println!("{:width$}  {:8}  {:8}  {}", name.cyan(), startup, current, status.notes);
        }
    }
}
