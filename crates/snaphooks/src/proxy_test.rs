// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;
use tempfile::TempDir;

use super::*;
use crate::fake::RecordingTool;

fn state_dir_with_token() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join(ADMIN_TOKEN_FILE), "admin-token").unwrap();
    tmp
}

fn options(public_key: &str, cert: &str, key: &str, snis: &str) -> ProxyOptions {
    ProxyOptions {
        admin: AdminOptions {
            public_key: public_key.to_string(),
        },
        tls: TlsOptions {
            cert: cert.to_string(),
            key: key.to_string(),
            snis: snis.to_string(),
        },
    }
}

#[rstest]
#[case(options("", "", "", ""), true)]
#[case(options("pk", "cert", "key", "example.com"), true)]
#[case(options("", "cert", "", ""), false)]
#[case(options("", "", "key", ""), false)]
#[case(options("", "", "", "example.com"), false)]
fn test_validate(#[case] options: ProxyOptions, #[case] valid: bool) {
    assert_eq!(options.validate().is_ok(), valid);
}

#[rstest]
fn test_decode_options() {
    let decoded: ProxyOptions = serde_json::from_str(
        r#"{"admin": {"public-key": "pk"}, "tls": {"cert": "c", "key": "k"}}"#,
    )
    .unwrap();
    assert_eq!(decoded, options("pk", "c", "k", ""));
}

#[tokio::test]
async fn test_add_user_once() {
    let tmp = state_dir_with_token();
    let tool = RecordingTool::default();
    let proxy = SecurityProxy::new(&tool, tmp.path());

    proxy.apply(&options("public-key-pem", "", "", "")).await.unwrap();
    proxy.apply(&options("public-key-pem", "", "", "")).await.unwrap();

    let calls = tool.calls();
    assert_eq!(calls.len(), 1, "Same user should only be added once");
    let key_path = tmp.path().join("jwt-user-public-key.pem");
    assert_eq!(
        calls[0],
        vec![
            "proxy",
            "adduser",
            "--token-type",
            "jwt",
            "--user",
            "admin",
            "--id",
            "1",
            "--algorithm",
            "ES256",
            "--public_key",
            key_path.to_str().unwrap(),
            "--jwt",
            "admin-token",
        ]
    );
    assert_eq!(std::fs::read_to_string(&key_path).unwrap(), "public-key-pem");
    assert_eq!(
        std::fs::read_to_string(tmp.path().join(USER_SEMAPHORE_FILE)).unwrap(),
        "admin"
    );
}

#[tokio::test]
async fn test_add_different_user_fails() {
    let tmp = state_dir_with_token();
    std::fs::write(tmp.path().join(USER_SEMAPHORE_FILE), "someone").unwrap();
    let tool = RecordingTool::default();
    let proxy = SecurityProxy::new(&tool, tmp.path());

    let err = proxy.add_user("admin", "1", "ES256", "pk").await.unwrap_err();
    assert!(matches!(err, Error::ProxyUserExists(user) if user == "someone"));
    assert!(tool.calls().is_empty());
}

#[tokio::test]
async fn test_clearing_key_deletes_user() {
    let tmp = state_dir_with_token();
    std::fs::write(tmp.path().join(USER_SEMAPHORE_FILE), "admin").unwrap();
    let tool = RecordingTool::default();
    let proxy = SecurityProxy::new(&tool, tmp.path());

    proxy.apply(&ProxyOptions::default()).await.unwrap();

    assert_eq!(
        tool.calls(),
        vec![vec!["proxy", "deluser", "--user", "admin", "--jwt", "admin-token"]]
    );
    assert!(!tmp.path().join(USER_SEMAPHORE_FILE).exists());

    // Nothing left to delete
    proxy.apply(&ProxyOptions::default()).await.unwrap();
    assert_eq!(tool.calls().len(), 1);
}

#[tokio::test]
async fn test_set_tls_certificate_with_snis() {
    let tmp = state_dir_with_token();
    let tool = RecordingTool::default();
    let proxy = SecurityProxy::new(&tool, tmp.path());

    proxy
        .apply(&options("", "CERT", "KEY", "example.com"))
        .await
        .unwrap();

    let calls = tool.calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(&call[..2], &["proxy", "tls"]);
    assert_eq!(&call[call.len() - 2..], &["--snis", "example.com"]);
    assert!(call.contains(&"admin-token".to_string()));
    assert!(tmp.path().join(TLS_SEMAPHORE_FILE).exists());

    // Already set: skipped until the certificate is cleared
    proxy.apply(&options("", "CERT", "KEY", "")).await.unwrap();
    assert_eq!(tool.calls().len(), 1);

    proxy.apply(&ProxyOptions::default()).await.unwrap();
    assert!(!tmp.path().join(TLS_SEMAPHORE_FILE).exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_state_files_are_private() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = state_dir_with_token();
    let tool = RecordingTool::default();
    let proxy = SecurityProxy::new(&tool, tmp.path());
    proxy.set_tls_certificate("CERT", "KEY", "").await.unwrap();

    for name in ["tls-certificate.pem", "tls-private-key.pem", TLS_SEMAPHORE_FILE] {
        let mode = std::fs::metadata(tmp.path().join(name)).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600, "{name} should be private");
    }
}

#[tokio::test]
async fn test_missing_admin_token_fails() {
    let tmp = TempDir::new().unwrap();
    let tool = RecordingTool::default();
    let proxy = SecurityProxy::new(&tool, tmp.path());

    let err = proxy.add_user("admin", "1", "ES256", "pk").await.unwrap_err();
    assert!(matches!(err, Error::ReadFailed { .. }));
    assert!(!tmp.path().join(USER_SEMAPHORE_FILE).exists());
}

#[tokio::test]
async fn test_tool_failure_leaves_no_semaphore() {
    let tmp = state_dir_with_token();
    let tool = RecordingTool::failing("kong unreachable");
    let proxy = SecurityProxy::new(&tool, tmp.path());

    let err = proxy.add_user("admin", "1", "ES256", "pk").await.unwrap_err();
    assert!(matches!(err, Error::CommandFailed { output, .. } if output == "kong unreachable"));
    assert!(!tmp.path().join(USER_SEMAPHORE_FILE).exists());
}
