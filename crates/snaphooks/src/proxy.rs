// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Security proxy setup through the `secrets-config` tool.
//!
//! The proxy keeps its own state, so each change is recorded in a semaphore
//! file and repeated requests for the same state are skipped.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::env::SnapEnv;
use crate::exec::Runner;
use crate::Error;

#[cfg(test)]
#[path = "./proxy_test.rs"]
mod proxy_test;

/// Service name of the proxy setup tool, used for its state and working directories.
pub const SETUP_SERVICE: &str = "security-proxy-setup";

pub const USER_SEMAPHORE_FILE: &str = ".secrets-config-user";
pub const TLS_SEMAPHORE_FILE: &str = ".secrets-config-tls";
pub const ADMIN_TOKEN_FILE: &str = "kong-admin-jwt";

const PUBLIC_KEY_FILE: &str = "jwt-user-public-key.pem";
const TLS_CERT_FILE: &str = "tls-certificate.pem";
const TLS_KEY_FILE: &str = "tls-private-key.pem";

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_USER_ID: &str = "1";
pub const ADMIN_USER_ALGORITHM: &str = "ES256";

/// `apps.secrets-config.proxy` options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProxyOptions {
    pub admin: AdminOptions,
    pub tls: TlsOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AdminOptions {
    pub public_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TlsOptions {
    pub cert: String,
    pub key: String,
    pub snis: String,
}

impl ProxyOptions {
    pub fn validate(&self) -> crate::Result<()> {
        let tls = &self.tls;
        if tls.cert.is_empty() != tls.key.is_empty() {
            return Err(Error::InvalidProxyOptions(
                "proxy cert and key must be set together".to_string(),
            ));
        }
        if tls.cert.is_empty() && !tls.snis.is_empty() {
            return Err(Error::InvalidProxyOptions(
                "proxy snis must be set together with proxy cert and key".to_string(),
            ));
        }
        Ok(())
    }
}

/// Applies [`ProxyOptions`] with the `secrets-config` tool.
pub struct SecurityProxy<'a> {
    tool: &'a dyn Runner,
    state_dir: PathBuf,
}

impl<'a> SecurityProxy<'a> {
    /// `tool` runs `secrets-config`; `state_dir` holds tokens and semaphores.
    pub fn new<P: Into<PathBuf>>(tool: &'a dyn Runner, state_dir: P) -> Self {
        Self {
            tool,
            state_dir: state_dir.into(),
        }
    }

    /// `$SNAP_DATA/secrets/security-proxy-setup`
    pub fn state_dir_for(env: &SnapEnv) -> PathBuf {
        env.snap_data().join("secrets").join(SETUP_SERVICE)
    }

    /// `$SNAP_DATA/config/security-proxy-setup`, where the tool is run.
    pub fn work_dir_for(env: &SnapEnv) -> PathBuf {
        env.snap_data_conf().join(SETUP_SERVICE)
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Bring the proxy in line with `options`.
    pub async fn apply(&self, options: &ProxyOptions) -> crate::Result<()> {
        tracing::debug!("Processing secrets-config proxy: {options:?}");
        options.validate()?;

        if options.admin.public_key.is_empty() {
            self.delete_current_user_if_set().await?;
        } else {
            self.add_user(
                ADMIN_USERNAME,
                ADMIN_USER_ID,
                ADMIN_USER_ALGORITHM,
                &options.admin.public_key,
            )
            .await?;
        }

        if options.tls.cert.is_empty() {
            self.delete_current_tls_cert_if_set()?;
        } else {
            self.set_tls_certificate(&options.tls.cert, &options.tls.key, &options.tls.snis)
                .await?;
        }
        Ok(())
    }

    /// Register a JWT user with the proxy.
    ///
    /// Adding the user that is already registered is a no-op, adding a
    /// different one is an error until the current user is deleted.
    pub async fn add_user(
        &self,
        username: &str,
        id: &str,
        algorithm: &str,
        public_key: &str,
    ) -> crate::Result<()> {
        if let Some(current) = self.read_optional(USER_SEMAPHORE_FILE)? {
            if current == username {
                tracing::debug!("proxy: Ignoring request to set up same user again");
                return Ok(());
            }
            if !current.is_empty() {
                return Err(Error::ProxyUserExists(current));
            }
        }

        let public_key_path = self
            .write_state(PUBLIC_KEY_FILE, public_key)?
            .display()
            .to_string();
        let token = self.read_state(ADMIN_TOKEN_FILE)?;

        let args = [
            "proxy",
            "adduser",
            "--token-type",
            "jwt",
            "--user",
            username,
            "--id",
            id,
            "--algorithm",
            algorithm,
            "--public_key",
            public_key_path.as_str(),
            "--jwt",
            token.as_str(),
        ];
        self.run(&args).await?;

        self.write_state(USER_SEMAPHORE_FILE, username)?;
        tracing::info!("proxy: Added new user {username}");
        Ok(())
    }

    /// Delete the registered user, if any.
    pub async fn delete_current_user_if_set(&self) -> crate::Result<()> {
        let Some(username) = self.read_optional(USER_SEMAPHORE_FILE)? else {
            tracing::debug!("proxy: No user has been set up");
            return Ok(());
        };
        let token = self.read_state(ADMIN_TOKEN_FILE)?;

        self.run(&["proxy", "deluser", "--user", username.as_str(), "--jwt", token.as_str()])
            .await?;

        self.remove_state(USER_SEMAPHORE_FILE)?;
        tracing::info!("proxy: Removed current user");
        Ok(())
    }

    /// Install the TLS certificate unless one has been installed already.
    pub async fn set_tls_certificate(&self, cert: &str, key: &str, snis: &str) -> crate::Result<()> {
        if self.read_optional(TLS_SEMAPHORE_FILE)?.is_some() {
            tracing::debug!(
                "proxy: The TLS certificate has already been set. To set it again, first set cert and key to an empty string"
            );
            return Ok(());
        }

        let cert_path = self.write_state(TLS_CERT_FILE, cert)?.display().to_string();
        let key_path = self.write_state(TLS_KEY_FILE, key)?.display().to_string();
        let token = self.read_state(ADMIN_TOKEN_FILE)?;

        let mut args = vec![
            "proxy",
            "tls",
            "--incert",
            cert_path.as_str(),
            "--inkey",
            key_path.as_str(),
            "--admin_api_jwt",
            token.as_str(),
        ];
        if !snis.is_empty() {
            args.extend(["--snis", snis]);
        }
        self.run(&args).await?;

        self.write_state(TLS_SEMAPHORE_FILE, "TLS certificate set")?;
        tracing::info!("proxy: New TLS certificate and private key set");
        Ok(())
    }

    /// Forget the installed certificate so that a new one can be set.
    pub fn delete_current_tls_cert_if_set(&self) -> crate::Result<()> {
        self.remove_state(TLS_SEMAPHORE_FILE)
    }

    async fn run(&self, args: &[&str]) -> crate::Result<String> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.tool.run(&args).await
    }

    fn read_state(&self, name: &str) -> crate::Result<String> {
        let path = self.state_dir.join(name);
        let contents = std::fs::read_to_string(&path)
            .map_err(|error| Error::ReadFailed { path: path.clone(), error })?;
        tracing::debug!("Read file '{}'", path.display());
        Ok(contents)
    }

    fn read_optional(&self, name: &str) -> crate::Result<Option<String>> {
        match self.read_state(name) {
            Ok(contents) => Ok(Some(contents)),
            Err(Error::ReadFailed { error, .. }) if error.kind() == std::io::ErrorKind::NotFound => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Write a file readable by the owner only.
    fn write_state(&self, name: &str, contents: &str) -> crate::Result<PathBuf> {
        let path = self.state_dir.join(name);
        let write_failed = |error: std::io::Error| Error::WriteFailed {
            path: path.clone(),
            error,
        };

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&path).map_err(write_failed)?;
        file.write_all(contents.as_bytes()).map_err(write_failed)?;

        tracing::debug!("Wrote file '{}'", path.display());
        Ok(path)
    }

    fn remove_state(&self, name: &str) -> crate::Result<()> {
        let path = self.state_dir.join(name);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Removed file '{}'", path.display());
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(Error::WriteFailed { path, error }),
        }
    }
}
