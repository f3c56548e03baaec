// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Processing of `config` and `apps.<app>.config` snap options into
//! per-service override files.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::envvar::EnvVarPolicy;
use crate::exec::Runner;
use crate::flatten::{decode_document, flatten_tree, ConfigTree, ConfigValue};
use crate::layout::OverrideLayout;
use crate::overrides::EnvOverrides;
use crate::proxy::{ProxyOptions, SecurityProxy};
use crate::snapctl::Get;
use crate::{writer, Error};

#[cfg(test)]
#[path = "./options_test.rs"]
mod options_test;

/// Option holding the legacy `env.<service>.<key>` scheme.
pub const LEGACY_ENV_OPTION: &str = "env";
/// Option that used to opt into the current scheme.
pub const APP_OPTIONS_OPTION: &str = "app-options";
/// The app with custom proxy options.
pub const SECRETS_CONFIG_APP: &str = "secrets-config";

/// The snap options read by a processing run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapOptions {
    /// Options applied to every service
    #[serde(default)]
    pub config: Option<ConfigTree>,
    #[serde(default)]
    pub apps: Option<BTreeMap<String, AppOptions>>,
}

/// Options under `apps.<app>`.
///
/// Unknown keys are ignored, they are custom options of other apps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppOptions {
    #[serde(default)]
    pub config: Option<ConfigTree>,
    /// Either a boolean or one of the accepted autostart strings
    #[serde(default)]
    pub autostart: Option<ConfigValue>,
    #[serde(default)]
    pub proxy: Option<ProxyOptions>,
}

impl SnapOptions {
    /// Read `config` and `apps` in a single `snapctl get`.
    pub async fn load(snapctl: &dyn Runner) -> crate::Result<Self> {
        let doc = Get::new(["config", "apps"]).document().run(snapctl).await?;
        decode_document(&doc)
    }

    pub fn app(&self, name: &str) -> Option<&AppOptions> {
        self.apps.as_ref().and_then(|apps| apps.get(name))
    }
}

/// Check that every app with `config` options is one of `services`.
pub fn validate_app_services<S: AsRef<str>>(
    apps: &BTreeMap<String, AppOptions>,
    services: &[S],
) -> crate::Result<()> {
    for (name, app) in apps {
        if app.config.is_none() {
            continue;
        }
        if !services.iter().any(|s| s.as_ref() == name) {
            return Err(Error::UnsupportedService {
                service: name.clone(),
                expected: services.iter().map(|s| s.as_ref().to_string()).collect(),
            });
        }
    }
    Ok(())
}

/// Build the overrides of `services` from decoded `options`.
///
/// Global options go to every service first, per-service options second so
/// that they win.
pub fn resolve<S: AsRef<str>>(
    options: &SnapOptions,
    services: &[S],
    policy: &EnvVarPolicy,
) -> crate::Result<EnvOverrides> {
    if services.is_empty() {
        return Err(Error::EmptyServiceList);
    }
    if let Some(apps) = &options.apps {
        validate_app_services(apps, services)?;
    }

    let mut overrides = EnvOverrides::new(services, policy.clone());

    if let Some(global) = &options.config {
        let flat = flatten_tree(global);
        for service in services {
            for (key, value) in &flat {
                overrides.add(service.as_ref(), key, value)?;
            }
        }
    }

    for service in services {
        let service = service.as_ref();
        let Some(config) = options.app(service).and_then(|app| app.config.as_ref()) else {
            continue;
        };
        for (key, value) in &flatten_tree(config) {
            overrides.add(service, key, value)?;
        }
    }

    Ok(overrides)
}

/// Reads config options through `snapctl` and materializes override files.
pub struct ConfigProcessor<'a> {
    snapctl: &'a dyn Runner,
    policy: EnvVarPolicy,
    layout: OverrideLayout,
}

impl<'a> ConfigProcessor<'a> {
    pub fn new(snapctl: &'a dyn Runner, policy: EnvVarPolicy, layout: OverrideLayout) -> Self {
        Self {
            snapctl,
            policy,
            layout,
        }
    }

    pub fn layout(&self) -> &OverrideLayout {
        &self.layout
    }

    /// Compute the overrides of `services` without touching the filesystem.
    pub async fn prepare<S: AsRef<str>>(&self, services: &[S]) -> crate::Result<EnvOverrides> {
        if services.is_empty() {
            return Err(Error::EmptyServiceList);
        }

        let app_options = Get::new([APP_OPTIONS_OPTION]).run(self.snapctl).await?;
        tracing::debug!("{APP_OPTIONS_OPTION}: {app_options:?}");
        check_legacy_options(self.snapctl).await?;

        let options = SnapOptions::load(self.snapctl).await?;
        resolve(&options, services, &self.policy)
    }

    /// Process the options of `services` and write their override files.
    pub async fn process<S: AsRef<str>>(&self, services: &[S]) -> crate::Result<EnvOverrides> {
        let overrides = self.prepare(services).await?;
        writer::write_all(&overrides, &self.layout)?;
        Ok(overrides)
    }
}

/// Fail when options of the legacy `env` scheme are still set.
pub async fn check_legacy_options(snapctl: &dyn Runner) -> crate::Result<()> {
    let value = Get::new([LEGACY_ENV_OPTION]).run(snapctl).await?;
    let trimmed = value.trim();
    let empty = trimmed.is_empty()
        || serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(trimmed)
            .map(|map| map.is_empty())
            .unwrap_or(false);
    if empty {
        return Ok(());
    }
    Err(Error::DisallowedLegacyOptions(trimmed.to_string()))
}

/// Apply the custom options of `service`, if it has any.
pub async fn process_app_custom_options(
    snapctl: &dyn Runner,
    proxy: &SecurityProxy<'_>,
    service: &str,
) -> crate::Result<()> {
    match service {
        SECRETS_CONFIG_APP => {
            let options = SnapOptions::load(snapctl).await?;
            match options.app(service).and_then(|app| app.proxy.as_ref()) {
                Some(proxy_options) => proxy.apply(proxy_options).await,
                None => {
                    tracing::debug!("No proxy options for {service}");
                    Ok(())
                }
            }
        }
        _ => Ok(()),
    }
}
