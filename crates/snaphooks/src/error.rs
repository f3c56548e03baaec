// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for snaphooks operations.

use miette::Diagnostic;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Convenience Result type with snaphooks Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while processing snap hook options.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// A processing run was started without any services
    #[error("empty service list")]
    #[diagnostic(
        code(snaphooks::empty_service_list),
        help("Pass the names of the services managed by this snap")
    )]
    EmptyServiceList,

    /// Per-service options name a service this snap does not manage
    #[error("unsupported service in app config option: {service}. Supported services are: {expected:?}")]
    #[diagnostic(code(snaphooks::unsupported_service))]
    UnsupportedService {
        service: String,
        expected: Vec<String>,
    },

    /// Dotted config key while hierarchy mode is disabled
    #[error("illegal dotted key: {0}")]
    #[diagnostic(
        code(snaphooks::illegal_dotted_key),
        help("Dots are reserved for hierarchical keys; use hyphens to separate words")
    )]
    IllegalDottedKey(String),

    /// The option document holds a node kind that cannot become an override
    #[error("invalid configuration at '{path}': {error}")]
    #[diagnostic(
        code(snaphooks::unsupported_node),
        help("Configuration values must be strings, booleans, numbers or objects")
    )]
    UnsupportedNode {
        path: String,
        #[source]
        error: serde_json::Error,
    },

    /// Options of the legacy scheme are still set
    #[error("disallowed env options: {0}")]
    #[diagnostic(
        code(snaphooks::legacy_options),
        help("Move 'env.*' options to 'config.*' or 'apps.<app>.config.*' and unset 'env'")
    )]
    DisallowedLegacyOptions(String),

    /// Invalid value for the autostart option
    #[error("invalid value for 'autostart': '{0}'")]
    #[diagnostic(code(snaphooks::invalid_autostart), help("Use true, false, yes or no"))]
    InvalidAutostart(String),

    /// Command input rejected before anything was executed
    #[error("invalid input: {0}")]
    #[diagnostic(code(snaphooks::invalid_input))]
    InvalidInput(String),

    /// An external command exited unsuccessfully
    #[error("'{command}' failed ({status}): {output}")]
    #[diagnostic(code(snaphooks::command_failed))]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },

    /// An external command did not finish in time
    #[error("'{command}' timed out after {timeout:?}")]
    #[diagnostic(code(snaphooks::command_timeout))]
    CommandTimeout { command: String, timeout: Duration },

    /// An external command could not be started
    #[error("failed to execute '{command}'")]
    #[diagnostic(code(snaphooks::spawn_failed))]
    SpawnFailed {
        command: String,
        #[source]
        error: std::io::Error,
    },

    /// Output of an external command did not have the expected shape
    #[error("unexpected snapctl output: {0}")]
    #[diagnostic(code(snaphooks::unexpected_output))]
    UnexpectedOutput(String),

    /// A required snap environment variable is missing
    #[error("{0} is not set")]
    #[diagnostic(
        code(snaphooks::missing_env),
        help("snaphooks must run inside a snap hook or app context")
    )]
    MissingEnv(&'static str),

    /// Invalid secrets-config proxy options
    #[error("error validating secrets-config proxy options: {0}")]
    #[diagnostic(code(snaphooks::invalid_proxy_options))]
    InvalidProxyOptions(String),

    /// Another proxy user is already registered
    #[error("the proxy user has already been set to '{0}'")]
    #[diagnostic(
        code(snaphooks::proxy_user_exists),
        help("To add a new user, first delete the current user by setting the admin public key to an empty string")
    )]
    ProxyUserExists(String),

    /// Failed to write a file
    #[error("Failed to write file: {path:?}")]
    #[diagnostic(code(snaphooks::write_failed))]
    WriteFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to read a file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(snaphooks::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
}
