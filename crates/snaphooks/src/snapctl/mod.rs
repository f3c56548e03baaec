// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Typed commands for the `snapctl` control utility.
//!
//! Each command validates its input, renders the argument list and runs it
//! through a [`Runner`](crate::exec::Runner):
//!
//! ```no_run
//! # async fn example() -> snaphooks::Result<()> {
//! use snaphooks::exec::ExternalCommand;
//! use snaphooks::snapctl::{Get, Start};
//!
//! let snapctl = ExternalCommand::snapctl();
//! let doc = Get::new(["config"]).document().run(&snapctl).await?;
//! Start::new(["my-snap.server"]).enable().run(&snapctl).await?;
//! # Ok(())
//! # }
//! ```

mod get;
mod is_connected;
mod service;
mod services;
mod set;
mod unset;

pub use get::Get;
pub use is_connected::IsConnected;
pub use service::{Restart, Start, Stop};
pub use services::{parse_services_output, ServiceStatus, Services};
pub use set::Set;
pub use unset::Unset;

use crate::Error;

fn collect<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

/// Reject any item containing a space.
fn validate_no_spaces(what: &str, items: &[String]) -> crate::Result<()> {
    match items.iter().find(|item| item.contains(' ')) {
        Some(item) => Err(Error::InvalidInput(format!(
            "{what} must not contain spaces. Got: '{item}'"
        ))),
        None => Ok(()),
    }
}

/// Plug or slot names are passed without the leading colon.
fn validate_interface(name: &Option<String>) -> crate::Result<()> {
    match name {
        Some(name) if name.starts_with(':') => Err(Error::InvalidInput(
            "interface plug/slot name must not contain colon as prefix".to_string(),
        )),
        _ => Ok(()),
    }
}
