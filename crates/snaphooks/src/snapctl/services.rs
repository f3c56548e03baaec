// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::exec::Runner;
use crate::Error;

#[cfg(test)]
#[path = "./services_test.rs"]
mod services_test;

static COLUMNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid column regex"));

/// Status of one service as reported by `snapctl services`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ServiceStatus {
    /// Startup column: the service starts on boot
    pub enabled: bool,
    /// Current column: the service is running
    pub active: bool,
    pub notes: String,
}

/// `snapctl services [<service>...]`
///
/// Without names, every service of the snap is listed.
#[derive(Debug, Clone, Default)]
pub struct Services {
    names: Vec<String>,
}

impl Services {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: super::collect(names),
        }
    }

    pub fn args(&self) -> crate::Result<Vec<String>> {
        super::validate_no_spaces("service name", &self.names)?;
        let mut args = vec!["services".to_string()];
        args.extend(self.names.iter().cloned());
        Ok(args)
    }

    pub async fn run(&self, snapctl: &dyn Runner) -> crate::Result<BTreeMap<String, ServiceStatus>> {
        let output = snapctl.run(&self.args()?).await?;
        parse_services_output(&output)
    }
}

/// Parse the table printed by `snapctl services`.
///
/// The first line is the column header and is skipped.
pub fn parse_services_output(output: &str) -> crate::Result<BTreeMap<String, ServiceStatus>> {
    let mut statuses = BTreeMap::new();
    for line in output.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let columns: Vec<&str> = COLUMNS.splitn(line, 4).collect();
        if columns.len() < 3 {
            return Err(Error::UnexpectedOutput(format!(
                "expected at least 3 columns in services line: '{line}'"
            )));
        }

        let enabled = match columns[1] {
            "enabled" => true,
            "disabled" => false,
            other => {
                return Err(Error::UnexpectedOutput(format!(
                    "unknown startup state '{other}' for {}",
                    columns[0]
                )));
            }
        };
        let active = match columns[2] {
            "active" => true,
            "inactive" => false,
            other => {
                return Err(Error::UnexpectedOutput(format!(
                    "unknown current state '{other}' for {}",
                    columns[0]
                )));
            }
        };
        let notes = columns.get(3).map(|n| n.to_string()).unwrap_or_default();

        statuses.insert(
            columns[0].to_string(),
            ServiceStatus {
                enabled,
                active,
                notes,
            },
        );
    }
    Ok(statuses)
}
