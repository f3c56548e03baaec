// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! snaphooks - Snap Configuration Hook Support
//!
//! This crate turns snap configuration options into per-service environment
//! override files and drives services through the `snapctl` control utility.
//!
//! # Overview
//!
//! Options are set by users with `snap set`, for example:
//!
//! ```text
//! snap set edgexfoundry config.service-port=59880        # every service
//! snap set edgexfoundry apps.core-data.config.debug=true # one service
//! ```
//!
//! From a configure hook, the options of the snap's services are read as one
//! JSON document, flattened into dotted keys, mapped to environment variable
//! names and written to `<root>/<service>/overrides.env`:
//!
//! ```text
//! SERVICE_PORT="59880"
//! DEBUG="true"
//! ```
//!
//! Per-service options win over global ones. Each file is replaced
//! atomically and removed when a service no longer has any options.

pub mod autostart;
pub mod env;
pub mod envvar;
pub mod error;
pub mod exec;
pub mod files;
pub mod flatten;
pub mod layout;
pub mod options;
pub mod overrides;
pub mod proxy;
pub mod snapctl;
pub mod writer;

#[cfg(test)]
mod fake;

pub use autostart::{parse_autostart, process_autostart};
pub use env::SnapEnv;
pub use envvar::{to_env_var, EnvVarPolicy};
pub use error::{Error, Result};
pub use exec::{ExternalCommand, Runner};
pub use flatten::{decode_document, flatten, flatten_tree, ConfigTree, ConfigValue, FlatConfig};
pub use layout::{OverrideLayout, OVERRIDES_FILENAME};
pub use options::{process_app_custom_options, resolve, ConfigProcessor, SnapOptions};
pub use overrides::{EnvOverrides, EnvVars};
pub use proxy::{ProxyOptions, SecurityProxy};
pub use writer::write_all;

/// Name of the secrets tool used to set up the security proxy.
pub const SECRETS_CONFIG_TOOL: &str = "secrets-config";
