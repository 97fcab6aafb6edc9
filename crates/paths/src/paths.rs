//! Path context for runtime environment detection and data-folder layout.
//!
//! Every file the spawn service owns lives below one data folder:
//!
//! ```text
//! <base>/<app_id>/
//!     config.ron      policy settings (delta against defaults)
//!     spawns.ron      stored spawn entries
//!     logs/           one log file per run
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identifies the runtime environment where the application is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    /// Running via `cargo run` or from a `target/` directory
    Development,
    /// Running as an installed binary
    Production,
}

/// Resolves the files of one application's data folder.
#[derive(Debug, Clone)]
pub struct PathContext {
    environment: RuntimeEnvironment,
    base_path: Arc<Path>,
    app_id: &'static str,
}

impl PathContext {
    /// Creates a new PathContext with automatic environment detection.
    pub fn new(app_id: &'static str) -> Self {
        let environment = Self::detect_environment();
        let base_path = Self::determine_base_path(environment);

        Self {
            environment,
            base_path: base_path.into(),
            app_id,
        }
    }

    /// Creates a PathContext with an explicit base path (tests, `--data-dir`).
    pub fn with_base_path(base_path: impl Into<PathBuf>, app_id: &'static str) -> Self {
        let base_path: PathBuf = base_path.into();
        Self {
            environment: Self::detect_environment(),
            base_path: base_path.into(),
            app_id,
        }
    }

    fn detect_environment() -> RuntimeEnvironment {
        if let Ok(exe_path) = std::env::current_exe() {
            if exe_path.components().any(|c| c.as_os_str() == "target") {
                return RuntimeEnvironment::Development;
            }
        }

        if std::env::var("CARGO").is_ok() || std::env::var("CARGO_MANIFEST_DIR").is_ok() {
            return RuntimeEnvironment::Development;
        }

        RuntimeEnvironment::Production
    }

    fn determine_base_path(environment: RuntimeEnvironment) -> PathBuf {
        match environment {
            RuntimeEnvironment::Development => std::env::current_dir()
                .map(|dir| dir.join(".out"))
                .unwrap_or_else(|_| PathBuf::from(".out")),
            // Installed servers keep their plugin data next to the working directory
            // unless the platform offers a local data directory.
            RuntimeEnvironment::Production => dirs::data_local_dir()
                .map(|dir| dir.join("PlayerSpawn"))
                .unwrap_or_else(|| PathBuf::from("plugins")),
        }
    }

    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn app_id(&self) -> &str {
        self.app_id
    }

    /// `<base>/<app_id>`
    pub fn data_dir(&self) -> PathBuf {
        self.base_path.join(self.app_id)
    }

    /// `<base>/<app_id>/config.ron`
    pub fn config_file(&self) -> PathBuf {
        self.data_dir().join("config.ron")
    }

    /// `<base>/<app_id>/spawns.ron`
    pub fn spawns_file(&self) -> PathBuf {
        self.data_dir().join("spawns.ron")
    }

    /// `<base>/<app_id>/logs`
    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    /// `<base>/<app_id>/logs/<app_id>.<timestamp>.log`
    pub fn log_file(&self, timestamp: &str) -> PathBuf {
        self.logs_dir()
            .join(format!("{}.{}.log", self.app_id, timestamp))
    }

    pub fn log_file_now(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        self.log_file(&timestamp)
    }

    /// Ensures the data folder and its log directory exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [self.data_dir(), self.logs_dir()] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_folder_layout() {
        let ctx = PathContext::with_base_path("/srv/minecraft/plugins", "playerspawn");

        assert_eq!(ctx.app_id(), "playerspawn");
        assert_eq!(
            ctx.data_dir(),
            PathBuf::from("/srv/minecraft/plugins/playerspawn")
        );
        assert_eq!(
            ctx.config_file(),
            PathBuf::from("/srv/minecraft/plugins/playerspawn/config.ron")
        );
        assert_eq!(
            ctx.spawns_file(),
            PathBuf::from("/srv/minecraft/plugins/playerspawn/spawns.ron")
        );
    }

    #[test]
    fn test_log_file_path() {
        let ctx = PathContext::with_base_path("/base", "app");

        assert_eq!(
            ctx.log_file("20240315-120000"),
            PathBuf::from("/base/app/logs/app.20240315-120000.log")
        );
    }

    #[test]
    fn test_ensure_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = PathContext::with_base_path(dir.path(), "app");

        ctx.ensure_directories().expect("create dirs");
        assert!(ctx.data_dir().is_dir());
        assert!(ctx.logs_dir().is_dir());
    }
}
