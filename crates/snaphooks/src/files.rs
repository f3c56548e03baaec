// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Copying default files shipped in `$SNAP` into the writable `$SNAP_DATA`,
//! as done from install hooks.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::env::SnapEnv;
use crate::writer::write_atomic;
use crate::Error;

#[cfg(test)]
#[path = "./files_test.rs"]
mod files_test;

fn read(path: &Path) -> crate::Result<Vec<u8>> {
    std::fs::read(path).map_err(|error| Error::ReadFailed {
        path: path.to_path_buf(),
        error,
    })
}

/// `path` relative to `base`; a leading `/` does not escape `base`.
fn snap_path(base: &Path, path: &Path) -> PathBuf {
    base.join(path.strip_prefix("/").unwrap_or(path))
}

/// Copy one file, replacing the destination atomically.
pub fn copy_file(src: &Path, dst: &Path) -> crate::Result<()> {
    write_atomic(dst, &read(src)?)
}

/// Copy `src` to `dst`, replacing the first occurrence of each key of
/// `replacements` with its value.
pub fn copy_file_replace(
    src: &Path,
    dst: &Path,
    replacements: &BTreeMap<String, String>,
) -> crate::Result<()> {
    let contents = String::from_utf8_lossy(&read(src)?).into_owned();
    let contents = replacements
        .iter()
        .fold(contents, |acc, (from, to)| acc.replacen(from.as_str(), to, 1));
    write_atomic(dst, contents.as_bytes())
}

/// Copy a directory tree, creating directories as needed.
pub fn copy_dir(src: &Path, dst: &Path) -> crate::Result<()> {
    let read_failed = |error: std::io::Error| Error::ReadFailed {
        path: src.to_path_buf(),
        error,
    };
    std::fs::create_dir_all(dst).map_err(|error| Error::WriteFailed {
        path: dst.to_path_buf(),
        error,
    })?;

    for entry in std::fs::read_dir(src).map_err(read_failed)? {
        let entry = entry.map_err(read_failed)?;
        let target = dst.join(entry.file_name());
        if entry.file_type().map_err(read_failed)?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            copy_file(&entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Copy `$SNAP/<path>` to `$SNAP_DATA/<path>`.
///
/// An existing destination is kept, it may be provided through a content
/// interface. Returns whether the file was copied.
pub fn copy_file_from_snap_to_snap_data(env: &SnapEnv, path: &Path) -> crate::Result<bool> {
    let src = snap_path(&env.snap, path);
    let dst = snap_path(&env.snap_data, path);
    if dst.exists() {
        tracing::debug!("{} already exists, not copying", dst.display());
        return Ok(false);
    }

    copy_file(&src, &dst)?;
    tracing::debug!("Copied {} to {}", src.display(), dst.display());
    Ok(true)
}

/// Whether `$SNAP_DATA/<dir>` exists.
pub fn snap_data_dir_exists(env: &SnapEnv, dir: &Path) -> bool {
    snap_path(&env.snap_data, dir).is_dir()
}
