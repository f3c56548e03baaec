// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Per-service environment overrides accumulated during one processing run.

use std::collections::BTreeMap;

use crate::envvar::EnvVarPolicy;

#[cfg(test)]
#[path = "./overrides_test.rs"]
mod overrides_test;

/// Environment variable name to value, for a single service.
pub type EnvVars = BTreeMap<String, String>;

/// Override sets for every service of a run.
///
/// Later additions win over earlier ones for the same variable, so global
/// options are added first and per-service options second.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    policy: EnvVarPolicy,
    services: BTreeMap<String, EnvVars>,
}

impl EnvOverrides {
    /// Start a run with an empty override set for each of `services`.
    pub fn new<S: AsRef<str>>(services: &[S], policy: EnvVarPolicy) -> Self {
        let services = services
            .iter()
            .map(|s| (s.as_ref().to_string(), EnvVars::new()))
            .collect();
        Self { policy, services }
    }

    /// Map `key` to its variable name and store `value` for `service`.
    pub fn add(&mut self, service: &str, key: &str, value: &str) -> crate::Result<()> {
        let name = self.policy.to_env_var(key)?;
        tracing::debug!("Mapping {key} to {name} for {service}");
        self.services
            .entry(service.to_string())
            .or_default()
            .insert(name, value.to_string());
        Ok(())
    }

    /// Overrides collected for `service`.
    pub fn get(&self, service: &str) -> Option<&EnvVars> {
        self.services.get(service)
    }

    /// All services with their overrides, sorted by service name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnvVars)> {
        self.services.iter().map(|(name, vars)| (name.as_str(), vars))
    }

    pub fn services(&self) -> &BTreeMap<String, EnvVars> {
        &self.services
    }

    /// True when no service received any override.
    pub fn is_empty(&self) -> bool {
        self.services.values().all(EnvVars::is_empty)
    }
}
