//! Common test utilities for devsite integration tests
//!
//! `TestHost` lays out a scratch machine in a temp directory and puts stub
//! versions of nginx, composer, mysql, php, mkcert and chown first on `PATH`,
//! so the real binary can run the whole pipeline without touching the system.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

mod snapshot;
pub use snapshot::snapshot;

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn devsite_cmd() -> Command {
    Command::cargo_bin("devsite").unwrap()
}

const NGINX_STUB: &str = r#"#!/bin/sh
echo "nginx $*" >> "@ROOT@/nginx.log"
exit 0
"#;

const COMPOSER_STUB: &str = r#"#!/bin/sh
for arg in "$@"; do dir="$arg"; done
mkdir -p "$dir/public" "$dir/storage" "$dir/bootstrap/cache"
echo '{}' > "$dir/composer.json"
touch "$dir/artisan"
printf 'APP_NAME=Laravel\nAPP_ENV=local\nAPP_KEY=\nAPP_URL=http://localhost\n\nDB_CONNECTION=sqlite\n# DB_HOST=127.0.0.1\n# DB_DATABASE=laravel\n' > "$dir/.env.example"
"#;

const MYSQL_STUB: &str = r#"#!/bin/sh
for arg in "$@"; do stmt="$arg"; done
case "$stmt" in
  SHOW*) [ -f "@ROOT@/databases" ] && cat "@ROOT@/databases" ;;
  CREATE*) echo "$stmt" | sed 's/[^`]*`\([^`]*\)`.*/\1/' >> "@ROOT@/databases" ;;
esac
exit 0
"#;

const PHP_STUB: &str = r#"#!/bin/sh
sed -i 's/^APP_KEY=.*/APP_KEY=base64:c3R1Yg==/' .env
"#;

const MKCERT_STUB: &str = r#"#!/bin/sh
while [ $# -gt 0 ]; do
  case "$1" in
    -cert-file) cert="$2"; shift ;;
    -key-file) key="$2"; shift ;;
  esac
  shift
done
echo CERT > "$cert"
echo KEY > "$key"
"#;

const CHOWN_STUB: &str = "#!/bin/sh\nexit 0\n";

/// A scratch machine for end-to-end runs
pub struct TestHost {
    /// Temporary directory
    pub temp: TempDir,
    /// Scratch root
    pub path: PathBuf,
}

impl TestHost {
    /// Create the layout, the stub tools and a settings file
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        let host = Self { temp, path };

        for dir in ["bin", "www", "nginx/sites-available", "nginx/sites-enabled", "ssl", "run"] {
            fs::create_dir_all(host.path.join(dir)).expect("Failed to create directory");
        }
        host.write_file("hosts", "127.0.0.1 localhost\n");
        host.write_file("run/php8.3-fpm.sock", "");

        for (name, script) in [
            ("nginx", NGINX_STUB),
            ("composer", COMPOSER_STUB),
            ("mysql", MYSQL_STUB),
            ("php", PHP_STUB),
            ("mkcert", MKCERT_STUB),
            ("chown", CHOWN_STUB),
        ] {
            host.install_stub(name, script);
        }

        host.write_file("config.yaml", &host.settings_yaml());
        host
    }

    fn settings_yaml(&self) -> String {
        let root = self.path.display();
        format!(
            "base_dir: {root}/www\n\
             elevation: none\n\
             php:\n  socket_template: \"{root}/run/php{{version}}-fpm.sock\"\n\
             nginx:\n  sites_available: {root}/nginx/sites-available\n  sites_enabled: {root}/nginx/sites-enabled\n  reload_command: [nginx, -s, reload]\n\
             tls:\n  cert_dir: {root}/ssl\n\
             hosts:\n  file: {root}/hosts\n"
        )
    }

    /// Write an executable script into the stub bin directory
    pub fn install_stub(&self, name: &str, script: &str) {
        let path = self.path.join("bin").join(name);
        let script = script.replace("@ROOT@", &self.path.display().to_string());
        fs::write(&path, script).expect("Failed to write stub");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to mark stub executable");
    }

    /// Remove a stub so the tool looks uninstalled
    pub fn remove_stub(&self, name: &str) {
        fs::remove_file(self.path.join("bin").join(name)).expect("Failed to remove stub");
    }

    /// `devsite` with the stub tools first on PATH and the scratch settings
    pub fn cmd(&self) -> Command {
        let mut cmd = devsite_cmd();
        cmd.env(
            "PATH",
            format!("{}:/usr/bin:/bin", self.path.join("bin").display()),
        )
        .env("DEVSITE_CONFIG", self.path.join("config.yaml"))
        .env_remove("DEVSITE_BASE_DIR")
        .env_remove("RUST_LOG");
        cmd
    }

    pub fn project_dir(&self, name: &str) -> PathBuf {
        self.path.join("www").join(name)
    }

    /// Write a file under the scratch root
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file under the scratch root
    pub fn read_file(&self, path: &str) -> String {
        fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists under the scratch root
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_layout() {
        let host = TestHost::new();
        assert!(host.file_exists("bin/composer"));
        assert!(host.file_exists("run/php8.3-fpm.sock"));
        assert!(host.read_file("config.yaml").contains("elevation: none"));
    }

    #[test]
    fn test_snapshot_sees_nested_files_and_empty_dirs() {
        let host = TestHost::new();
        host.write_file("tree/b.txt", "b");
        host.write_file("tree/a/c.txt", "c");
        fs::create_dir_all(host.path.join("tree/empty")).expect("Failed to create dir");

        let paths: Vec<_> = snapshot(&host.path.join("tree"))
            .into_iter()
            .map(|(path, _)| path)
            .collect();
        assert_eq!(
            paths,
            ["a", "a/c.txt", "b.txt", "empty"].map(PathBuf::from).to_vec()
        );
    }
}
