// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;
use crate::fake::FakeSnapctl;

#[rstest]
fn test_args() {
    assert_eq!(IsConnected::new("home").args().unwrap(), vec!["is-connected", "home"]);
    assert!(IsConnected::new("").args().is_err());
    assert!(IsConnected::new("a b").args().is_err());
}

#[tokio::test]
async fn test_connected_and_disconnected() {
    let snapctl = FakeSnapctl::default().with_connection("home");

    assert!(IsConnected::new("home").run(&snapctl).await.unwrap());
    assert!(!IsConnected::new("removable-media").run(&snapctl).await.unwrap());
}

#[tokio::test]
async fn test_failure_with_message_is_error() {
    let snapctl = FakeSnapctl::default().failing("is-connected", "error: unknown plug or slot");
    let err = IsConnected::new("nope").run(&snapctl).await.unwrap_err();
    assert!(matches!(err, Error::CommandFailed { .. }));
}
