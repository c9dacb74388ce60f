//! Configuration loader that always fails.

use std::ffi::OsString;
use std::fs;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use tempfile::TempDir;

use jsdriver_config::Config;

use crate::bootstrap::ConfigLoader;

/// Loader pointing `ortho_config` at a malformed configuration file.
pub struct BrokenConfigLoader {
    dir: TempDir,
}

impl BrokenConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temporary directory");
        fs::write(dir.path().join("jsdriver.toml"), "workers = [\n")
            .expect("failed to write malformed configuration");
        Self { dir }
    }
}

impl ConfigLoader for BrokenConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = [
            OsString::from("jsdriverd"),
            OsString::from("--config-path"),
            self.dir.path().join("jsdriver.toml").into_os_string(),
        ];
        Config::load_from_iter(args)
    }
}
