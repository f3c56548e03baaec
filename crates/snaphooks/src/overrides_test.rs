// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;

#[rstest]
fn test_new_starts_empty_for_each_service() {
    let overrides = EnvOverrides::new(&["a", "b"], EnvVarPolicy::default());
    assert_eq!(overrides.services().len(), 2);
    assert!(overrides.get("a").unwrap().is_empty());
    assert!(overrides.get("b").unwrap().is_empty());
    assert!(overrides.is_empty());
}

#[rstest]
fn test_add_maps_key_and_last_write_wins() {
    let mut overrides = EnvOverrides::new(&["svc"], EnvVarPolicy::default());
    overrides.add("svc", "log-level", "INFO").unwrap();
    overrides.add("svc", "log-level", "DEBUG").unwrap();

    let vars = overrides.get("svc").unwrap();
    assert_eq!(vars.len(), 1);
    assert_eq!(vars["LOG_LEVEL"], "DEBUG");
    assert!(!overrides.is_empty());
}

#[rstest]
fn test_add_propagates_mapping_error() {
    let mut overrides = EnvOverrides::new(&["svc"], EnvVarPolicy::default());
    let err = overrides
        .add("svc", "service.port", "8080")
        .expect_err("Dotted key without hierarchy should fail");
    assert!(matches!(err, crate::Error::IllegalDottedKey(_)));
    assert!(overrides.get("svc").unwrap().is_empty());
}

#[rstest]
fn test_different_keys_can_collide_on_name() {
    // x-y and x.y both become X_Y with hierarchy enabled
    let mut overrides = EnvOverrides::new(&["svc"], EnvVarPolicy::hierarchical());
    overrides.add("svc", "x-y", "first").unwrap();
    overrides.add("svc", "x.y", "second").unwrap();
    assert_eq!(overrides.get("svc").unwrap()["X_Y"], "second");
}

#[rstest]
fn test_iter_is_sorted_by_service() {
    let overrides = EnvOverrides::new(&["zeta", "alpha"], EnvVarPolicy::default());
    let names: Vec<&str> = overrides.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}
