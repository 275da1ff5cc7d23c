//! Build script for version info

use std::process::Command;

fn main() {
    let today = chrono::Utc::now().format("%Y-%m-%d");
    println!("cargo:rustc-env=LU_BUILD_DATE={today}");

    // Absent outside a git checkout (e.g. a crates.io build)
    let sha = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|sha| !sha.is_empty());
    if let Some(sha) = sha {
        println!("cargo:rustc-env=LU_GIT_SHA={sha}");
    }

    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");
}
