// Copyright (c) 2022 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

fn main() {
    built::write_built_file().expect("Failed to acquire build-time information");

    // git information which is not provided by the built crate without libgit2
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR must be set by cargo");
    let version = match git_version() {
        Some(v) => format!("Some({v:?})"),
        None => "None".to_string(),
    };
    let content = format!(
        "// Git information generated at build time\n\
         pub const GIT_VERSION: Option<&'static str> = {version};\n\
         pub const GIT_DIRTY: bool = {};\n",
        is_git_dirty()
    );
    fs::write(Path::new(&out_dir).join("git_built.rs"), content)
        .expect("Failed to write git information");
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|v| v.trim().to_string())
}

/// Version from the last `v*` tag, or the short commit hash.
fn git_version() -> Option<String> {
    if let Some(version) = git(&["describe", "--match", "v[0-9]*", "--tags", "HEAD"])
        && !version.is_empty()
    {
        return Some(version.trim_start_matches('v').to_string());
    }
    git(&["rev-parse", "--short", "HEAD"]).filter(|v| !v.is_empty())
}

fn is_git_dirty() -> bool {
    git(&["diff-index", "--name-only", "HEAD", "--"])
        .map(|changes| !changes.is_empty())
        .unwrap_or_default()
}
