use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[allow(unused)]
pub const WEB_MANIFEST: &str = "Manifest-Version: 1.0\r\n\
Bundle-ManifestVersion: 2\r\n\
Bundle-SymbolicName: com.acme.web;singleton:=true\r\n\
Bundle-Version: 1.0.36\r\n\
Bundle-Name: Acme Web\r\n\
Import-Package: javax.servlet;version=\"[2.6,3)\",javax.servlet.http;versi\r\n on=\"[2.6,3)\",\
org.osgi.framework\r\n\
\r\n";

#[allow(unused)]
pub const UNRELATED_MANIFEST: &str = "Manifest-Version: 1.0\n\
Bundle-SymbolicName: org.other.util\n\
Export-Package: org.other.util;version=\"1.0\"\n";

#[allow(unused)]
pub const RULES: &str = r#"
[renames]
"javax.servlet.*" = "jakarta.servlet"

[versions]
"jakarta.servlet" = "[5.0,6)"

[bundles."com.acme.web"]
symbolic-name = "com.acme.web.jakarta"
version = "2.0.0"
name = "+ (Jakarta)"
"#;

/// Creates a workspace with one bundle that the rules rewrite and one
/// they do not touch.
#[allow(unused)]
pub fn create_test_bundles() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_manifest(temp.path(), "web", WEB_MANIFEST);
    write_manifest(temp.path(), "util", UNRELATED_MANIFEST);
    fs::write(temp.path().join("rules.toml"), RULES).unwrap();
    temp
}

/// Writes `<root>/<bundle>/META-INF/MANIFEST.MF`.
#[allow(unused)]
pub fn write_manifest(root: &Path, bundle: &str, content: &str) -> PathBuf {
    let dir = root.join(bundle).join("META-INF");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("MANIFEST.MF");
    fs::write(&path, content).unwrap();
    path
}

#[allow(unused)]
pub fn manifest_path(root: &Path, bundle: &str) -> PathBuf {
    root.join(bundle).join("META-INF").join("MANIFEST.MF")
}

/// Runs `osgi-rename transform --rules rules.toml <paths>` in `root`.
pub fn run_transform(root: &Path, paths: &[&str], extra_args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = cargo_bin_cmd!("osgi-rename");
    cmd.arg("transform")
        .arg("--rules")
        .arg("rules.toml")
        .args(extra_args)
        .args(paths)
        .env_remove("RUST_LOG")
        .current_dir(root);

    cmd.assert()
}
