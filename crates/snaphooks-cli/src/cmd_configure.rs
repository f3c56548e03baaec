// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `snaphooks configure` command.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use miette::Result;
use snaphooks::exec::ExternalCommand;
use snaphooks::options::SECRETS_CONFIG_APP;
use snaphooks::{
    process_app_custom_options,
    ConfigProcessor,
    EnvOverrides,
    EnvVarPolicy,
    OverrideLayout,
    SecurityProxy,
    SnapEnv,
};

#[cfg(test)]
#[path = "./cmd_configure_test.rs"]
mod cmd_configure_test;

/// Write environment overrides from config options
#[derive(Debug, Args)]
pub struct CmdConfigure {
    /// Services managed by this snap
    #[clap(required = true)]
    services: Vec<String>,

    #[clap(flatten)]
    policy: PolicyFlags,

    #[clap(flatten)]
    layout: LayoutFlags,

    /// Show the overrides without writing any file
    #[clap(long)]
    dry_run: bool,

    /// Output format for --dry-run: table, yaml, json
    #[clap(long, default_value = "table")]
    format: String,
}

#[derive(Args, Clone, Debug, Default)]
pub struct PolicyFlags {
    /// Allow dotted keys, mapped with the hierarchy separator
    #[clap(long, env = "SNAPHOOKS_HIERARCHY")]
    pub hierarchy: bool,

    /// Replacement for '.' in hierarchical keys
    #[clap(long, env = "SNAPHOOKS_HIERARCHY_SEPARATOR", default_value = snaphooks::envvar::DEFAULT_SEPARATOR)]
    pub hierarchy_separator: String,

    /// Replacement for '-' in keys
    #[clap(long, env = "SNAPHOOKS_SEGMENT_SEPARATOR", default_value = snaphooks::envvar::DEFAULT_SEPARATOR)]
    pub segment_separator: String,
}

impl PolicyFlags {
    pub fn policy(&self) -> EnvVarPolicy {
        let policy = if self.hierarchy {
            EnvVarPolicy::hierarchical()
        } else {
            EnvVarPolicy::default()
        };
        policy
            .with_hierarchy_separator(&self.hierarchy_separator)
            .with_segment_separator(&self.segment_separator)
    }
}

#[derive(Args, Clone, Debug, Default)]
pub struct LayoutFlags {
    /// Directory holding the override files (default: $SNAP_DATA/config)
    #[clap(long, env = "SNAPHOOKS_OVERRIDE_ROOT")]
    pub override_root: Option<PathBuf>,

    /// Service whose overrides are written directly under the root
    #[clap(long, env = "SNAPHOOKS_ROOT_LEVEL_SERVICE")]
    pub root_level_service: Option<String>,
}

impl LayoutFlags {
    pub fn layout(&self) -> Result<OverrideLayout> {
        let root = match &self.override_root {
            Some(root) => root.clone(),
            None => SnapEnv::from_env()?.snap_data_conf(),
        };
        let layout = OverrideLayout::new(root);
        Ok(match &self.root_level_service {
            Some(service) => layout.with_root_level_service(service),
            None => layout,
        })
    }
}

impl CmdConfigure {
    pub async fn run(&mut self, snapctl: &ExternalCommand) -> Result<i32> {
        let processor = ConfigProcessor::new(snapctl, self.policy.policy(), self.layout.layout()?);

        if self.dry_run {
            let overrides = processor.prepare(&self.services).await?;
            let output = match self.format.as_str() {
                "json" => serde_json::to_string_pretty(overrides.services())
                    .map_err(|e| miette::miette!("Failed to render json: {e}"))?,
                "yaml" => serde_yaml::to_string(overrides.services())
                    .map_err(|e| miette::miette!("Failed to render yaml: {e}"))?,
                _ => render_table(&overrides, processor.layout()),
            };
            println!("{}", output.trim_end());
            return Ok(0);
        }

        processor.process(&self.services).await?;

        if self.services.iter().any(|s| s == SECRETS_CONFIG_APP) {
            let env = SnapEnv::from_env()?;
            let tool = ExternalCommand::new(snaphooks::SECRETS_CONFIG_TOOL)
                .with_current_dir(SecurityProxy::work_dir_for(&env))
                .with_timeout(snapctl.timeout());
            let proxy = SecurityProxy::new(&tool, SecurityProxy::state_dir_for(&env));
            for service in &self.services {
                process_app_custom_options(snapctl, &proxy, service).await?;
            }
        }

        Ok(0)
    }
}

/// One block per service: the target file followed by its variables.
pub fn render_table(overrides: &EnvOverrides, layout: &OverrideLayout) -> String {
    let mut out = String::new();
    for (service, vars) in overrides.iter() {
        let path = layout.path_for(service);
        out.push_str(&format!(
            "{} {}\n",
            service.bold(),
            path.display().to_string().dimmed()
        ));
        if vars.is_empty() {
            out.push_str(&format!("  {}\n", "(removed)".yellow()));
        }
        for (name, value) in vars {
            out.push_str(&format!("  {}=\"{}\"\n", name.cyan(), value.green()));
        }
    }
    out
}
