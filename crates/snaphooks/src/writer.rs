// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Writing override files to disk.

use std::io::Write as _;
use std::path::Path;

use crate::layout::OverrideLayout;
use crate::overrides::{EnvOverrides, EnvVars};
use crate::Error;

#[cfg(test)]
#[path = "./writer_test.rs"]
mod writer_test;

/// Render override file contents: one `NAME="value"` line per variable.
pub fn render_env_file(vars: &EnvVars) -> String {
    vars.iter()
        .map(|(name, value)| format!("{name}=\"{value}\"\n"))
        .collect()
}

/// Persist the overrides of every service in `overrides`.
///
/// Services without overrides get their previous file removed. Each file is
/// replaced atomically, but there is no atomicity across services: a failure
/// leaves already written services in place.
pub fn write_all(overrides: &EnvOverrides, layout: &OverrideLayout) -> crate::Result<()> {
    for (service, vars) in overrides.iter() {
        let path = layout.path_for(service);
        if vars.is_empty() {
            remove_env_file(&path)?;
            continue;
        }

        let contents = render_env_file(vars);
        tracing::info!(
            "Writing settings to {}: {}",
            path.display(),
            contents.trim_end().replace('\n', " ")
        );
        write_env_file(&path, &contents)?;
    }
    Ok(())
}

/// Write an override file atomically, see [`write_atomic`].
pub fn write_env_file(path: &Path, contents: &str) -> crate::Result<()> {
    write_atomic(path, contents.as_bytes())
}

/// Write `contents` to `path` through a temporary sibling file and a rename.
///
/// Readers see either the previous file or the complete new one. Missing
/// parent directories are created and the file gets mode 0644.
pub fn write_atomic(path: &Path, contents: &[u8]) -> crate::Result<()> {
    let dir = path.parent().ok_or_else(|| {
        Error::InvalidInput(format!("override path has no parent directory: {path:?}"))
    })?;
    std::fs::create_dir_all(dir).map_err(|error| Error::WriteFailed {
        path: dir.to_path_buf(),
        error,
    })?;

    let write_failed = |error: std::io::Error| Error::WriteFailed {
        path: path.to_path_buf(),
        error,
    };

    // The temporary file is deleted on drop, so a failed write or rename
    // leaves nothing behind.
    let mut tmp = tempfile::Builder::new()
        .prefix(".snaphooks")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_failed)?;
    tmp.write_all(contents).map_err(write_failed)?;
    tmp.as_file().sync_all().map_err(write_failed)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(write_failed)?;
    }

    tmp.persist(path).map_err(|err| write_failed(err.error))?;
    Ok(())
}

/// Remove the override file at `path`; a missing file is not an error.
pub fn remove_env_file(path: &Path) -> crate::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!("Removed {}", path.display());
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(Error::WriteFailed {
            path: path.to_path_buf(),
            error,
        }),
    }
}
