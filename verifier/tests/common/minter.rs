#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;

use tempfile::TempDir;
use verifier::token::TOKEN_CLI_BIN;

/// Stages a fake token-minting CLI in a temp dir. The returned guard keeps the
/// directory alive for the duration of the test.
pub fn stage_minter(script_body: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("create minter dir");
    let path = dir.path().join(TOKEN_CLI_BIN);
    std::fs::write(&path, script_body).expect("write minter script");

    let mut perms = std::fs::metadata(&path)
        .expect("stat minter script")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod minter script");

    dir
}

pub fn minter_printing(stdout: &str) -> String {
    format!("#!/bin/sh\nprintf '{stdout}'\n")
}

pub fn minter_with_stderr(stdout: &str, stderr: &str) -> String {
    format!("#!/bin/sh\nprintf '{stdout}'\nprintf '{stderr}' >&2\n")
}

pub fn minter_failing(exit_code: i32) -> String {
    format!("#!/bin/sh\nexit {exit_code}\n")
}
