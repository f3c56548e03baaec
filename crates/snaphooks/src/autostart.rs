// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Starting or stopping services from the `autostart` options.

use std::collections::BTreeMap;

use crate::exec::Runner;
use crate::flatten::ConfigValue;
use crate::options::SnapOptions;
use crate::snapctl::{Get, Start, Stop};
use crate::Error;

#[cfg(test)]
#[path = "./autostart_test.rs"]
mod autostart_test;

pub const AUTOSTART_OPTION: &str = "autostart";

/// Parse an autostart value; the empty string means unset.
///
/// `yes` and `no` are accepted next to `true` and `false`.
pub fn parse_autostart(value: &str) -> crate::Result<Option<bool>> {
    match value.to_lowercase().as_str() {
        "" => Ok(None),
        "true" | "yes" => Ok(Some(true)),
        "false" | "no" => Ok(Some(false)),
        _ => Err(Error::InvalidAutostart(value.to_string())),
    }
}

fn app_autostart(value: &ConfigValue) -> crate::Result<Option<bool>> {
    match value {
        ConfigValue::Bool(b) => Ok(Some(*b)),
        ConfigValue::String(s) => parse_autostart(s),
        other => Err(Error::InvalidAutostart(format!("{other:?}"))),
    }
}

/// Resolve the autostart setting of each service.
///
/// `apps.<service>.autostart` overrides the global `autostart`.
pub async fn resolve_autostart<S: AsRef<str>>(
    snapctl: &dyn Runner,
    services: &[S],
) -> crate::Result<BTreeMap<String, Option<bool>>> {
    if services.is_empty() {
        return Err(Error::EmptyServiceList);
    }

    let global = parse_autostart(&Get::new([AUTOSTART_OPTION]).run(snapctl).await?)?;
    let options = SnapOptions::load(snapctl).await?;

    let mut resolved = BTreeMap::new();
    for service in services {
        let service = service.as_ref();
        let app = match options.app(service).and_then(|app| app.autostart.as_ref()) {
            Some(value) => app_autostart(value)?,
            None => None,
        };
        let autostart = app.or(global);
        tracing::debug!("{service}: autostart={autostart:?} (global={global:?}, app={app:?})");
        resolved.insert(service.to_string(), autostart);
    }
    Ok(resolved)
}

/// Start and enable, or stop and disable, `services` of `snap_name`.
///
/// Services without any autostart setting are left alone. Returns the
/// resolved settings.
pub async fn process_autostart<S: AsRef<str>>(
    snapctl: &dyn Runner,
    snap_name: &str,
    services: &[S],
) -> crate::Result<BTreeMap<String, Option<bool>>> {
    let resolved = resolve_autostart(snapctl, services).await?;

    for (service, autostart) in &resolved {
        let Some(autostart) = autostart else {
            continue;
        };
        let name = format!("{snap_name}.{service}");
        tracing::info!("{service}: autostart={autostart}");
        if *autostart {
            Start::new([name]).enable().run(snapctl).await?;
        } else {
            Stop::new([name]).disable().run(snapctl).await?;
        }
    }
    Ok(resolved)
}
