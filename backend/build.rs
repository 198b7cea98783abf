// Shared build script used by multiple crates.
// - Captures Git commit hash, branch and build timestamp
// - Falls back to version.toml if git is not available (e.g., Docker builds)

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn main() {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let repo_root = find_repo_root(&manifest_dir).unwrap_or_else(|| manifest_dir.clone());

    // Try to read from version.toml first (for Docker/CI builds)
    let fallback = read_version_toml(&repo_root.join("version.toml"));

    let commit_hash = git_output(&["rev-parse", "--short", "HEAD"]).unwrap_or(fallback.0);
    let branch = git_output(&["rev-parse", "--abbrev-ref", "HEAD"]).unwrap_or(fallback.1);

    // Capture build date/time in ISO 8601 format
    let build_date = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

    println!("cargo:rustc-env=GIT_COMMIT_HASH={}", commit_hash);
    println!("cargo:rustc-env=BUILD_DATE={}", build_date);
    println!("cargo:rustc-env=GIT_BRANCH={}", branch);

    // Re-run build script if .git/HEAD changes (new commits) or version.toml changes
    let git_head = repo_root.join(".git").join("HEAD");
    let git_heads_dir = repo_root.join(".git").join("refs").join("heads");
    if git_head.exists() {
        println!("cargo:rerun-if-changed={}", git_head.display());
    }
    if git_heads_dir.exists() {
        println!("cargo:rerun-if-changed={}", git_heads_dir.display());
    }
    let version_toml = repo_root.join("version.toml");
    if version_toml.exists() {
        println!("cargo:rerun-if-changed={}", version_toml.display());
    }
}

fn git_output(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    // Look for version.toml or .git to identify repository root.
    for ancestor in start.ancestors() {
        if ancestor.join("version.toml").exists() || ancestor.join(".git").exists() {
            return Some(ancestor.to_path_buf());
        }
    }
    None
}

/// Read fallback values from version.toml
/// Returns (commit_hash, branch) with defaults if file doesn't exist
fn read_version_toml(path: &Path) -> (String, String) {
    let mut commit = "unknown".to_string();
    let mut branch = "unknown".to_string();

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return (commit, branch),
    };

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with("git_commit_hash") {
            if let Some(val) = extract_toml_value(line) {
                commit = val;
            }
        } else if line.starts_with("git_branch") {
            if let Some(val) = extract_toml_value(line) {
                branch = val;
            }
        }
    }

    (commit, branch)
}

/// Extract value from a TOML line like: key = "value"
fn extract_toml_value(line: &str) -> Option<String> {
    let (_, val) = line.split_once('=')?;
    let val = val.trim().trim_matches('"');
    if !val.is_empty() && val != "unknown" {
        return Some(val.to_string());
    }
    None
}
