use std::{
    process::Command,
    time::{SystemTime, UNIX_EPOCH},
};

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let version = match git_describe() {
        // Tagged clean checkout: "v1.2.0" -> "1.2.0"
        Some(tag) if !tag.ends_with("-dirty") => tag,
        // Local edits on top of a tag or commit
        Some(tag) => format!("{}-{}", tag, timestamp()),
        // No git, or not a repository (e.g. a source tarball)
        None => format!("0.0.0-unknown-{}", timestamp()),
    };

    println!("cargo:rustc-env=APPDEPS_VERSION={}", version);
}

/// `git describe` output without the leading `v`, if git produced any.
fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;

    let described = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let version = described.strip_prefix('v').unwrap_or(&described);
    (!version.is_empty()).then(|| version.to_string())
}

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
