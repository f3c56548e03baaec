// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use rstest::rstest;

use super::*;

#[rstest]
#[case("core-data", "/var/snap/x/current/config/core-data/overrides.env")]
#[case("app-service-configurable", "/var/snap/x/current/config/overrides.env")]
fn test_path_for(#[case] service: &str, #[case] expected: &str) {
    let layout = OverrideLayout::new("/var/snap/x/current/config")
        .with_root_level_service("app-service-configurable");
    assert_eq!(layout.path_for(service), PathBuf::from(expected));
}

#[rstest]
fn test_no_root_level_services_by_default() {
    let layout = OverrideLayout::new("/root");
    assert!(!layout.is_root_level("anything"));
    assert_eq!(layout.dir_for("svc"), PathBuf::from("/root/svc"));
    assert_eq!(layout.root(), PathBuf::from("/root").as_path());
}

#[rstest]
fn test_single_root_level_service() {
    let layout = OverrideLayout::new("/root")
        .with_root_level_service("a")
        .with_root_level_service("b");

    assert_eq!(layout.root_level_service(), Some("b"));
    assert!(!layout.is_root_level("a"));
    assert_eq!(layout.path_for("a"), PathBuf::from("/root/a/overrides.env"));
    assert_eq!(layout.path_for("b"), PathBuf::from("/root/overrides.env"));
}
