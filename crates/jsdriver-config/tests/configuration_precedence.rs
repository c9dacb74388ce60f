//! Behavioural tests for layered configuration loading.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use ortho_config::OrthoConfig;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use jsdriver_config::{
    Config, RunMode, default_log_filter, default_log_format, default_max_request_bytes,
    default_mode, default_workers,
};

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct Harness {
    temp_dir: TempDir,
    cli_args: RefCell<Vec<OsString>>,
    env_overrides: RefCell<Vec<(String, Option<OsString>)>>,
    loaded: RefCell<Option<Config>>,
    error: RefCell<Option<String>>,
    _env_guard: MutexGuard<'static, ()>,
}

impl Harness {
    fn new() -> Self {
        let env_guard = ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let temp_dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(error) => panic!("failed to create temporary directory: {error}"),
        };
        Self {
            temp_dir,
            cli_args: RefCell::new(vec![OsString::from("jsdriverd")]),
            env_overrides: RefCell::new(Vec::new()),
            loaded: RefCell::new(None),
            error: RefCell::new(None),
            _env_guard: env_guard,
        }
    }

    fn write_config(&self, contents: &str) {
        let path = self.temp_dir.path().join("jsdriver.toml");
        if let Err(error) = fs::write(&path, contents) {
            panic!("failed to write configuration: {error}");
        }

        let mut args = self.cli_args.borrow_mut();
        args.push(OsString::from("--config-path"));
        args.push(path.into_os_string());
    }

    fn set_env(&self, key: &str, value: &str) {
        let previous = std::env::var_os(key);
        // Restored in `Drop`; `ENV_MUTEX` keeps scenarios from racing.
        unsafe { std::env::set_var(key, value) };
        self.env_overrides
            .borrow_mut()
            .push((key.to_string(), previous));
    }

    fn push_cli_arg(&self, arg: impl Into<OsString>) {
        self.cli_args.borrow_mut().push(arg.into());
    }

    fn load(&self) {
        if self.loaded.borrow().is_some() || self.error.borrow().is_some() {
            return;
        }

        let args = self.cli_args.borrow().clone();
        match Config::load_from_iter(args) {
            Ok(config) => *self.loaded.borrow_mut() = Some(config),
            Err(error) => *self.error.borrow_mut() = Some(error.to_string()),
        }
    }

    fn config(&self) -> Config {
        self.load();
        if let Some(error) = self.error.borrow().as_ref() {
            panic!("configuration failed to load: {error}");
        }
        match self.loaded.borrow().as_ref() {
            Some(config) => config.clone(),
            None => panic!("configuration was not loaded"),
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let mut overrides = self.env_overrides.borrow_mut();
        while let Some((key, value)) = overrides.pop() {
            if let Some(os_value) = value {
                unsafe { std::env::set_var(&key, os_value) };
            } else {
                unsafe { std::env::remove_var(&key) };
            }
        }
    }
}

fn parse_count(value: &str) -> usize {
    match value.parse() {
        Ok(count) => count,
        Err(error) => panic!("invalid count '{value}': {error}"),
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

#[given("a configuration file setting workers to \"{workers}\"")]
fn given_configuration_file(harness: &Harness, workers: String) {
    let workers = parse_count(&workers);
    harness.write_config(&format!("workers = {workers}\n"));
}

#[given("the environment overrides workers to \"{workers}\"")]
fn given_environment_override(harness: &Harness, workers: String) {
    harness.set_env("JSDRIVER_WORKERS", &workers);
}

#[when("the CLI sets workers to \"{workers}\"")]
fn when_cli_sets_workers(harness: &Harness, workers: String) {
    harness.push_cli_arg("--workers");
    harness.push_cli_arg(workers);
}

#[when("the CLI sets the mode to \"{mode}\"")]
fn when_cli_sets_mode(harness: &Harness, mode: String) {
    harness.push_cli_arg("--mode");
    harness.push_cli_arg(mode);
}

#[when("the configuration loads without overrides")]
fn when_load_without_overrides(harness: &Harness) {
    harness.load();
}

#[then("loading the configuration resolves workers to \"{workers}\"")]
fn then_resolved_workers(harness: &Harness, workers: String) {
    assert_eq!(harness.config().workers(), parse_count(&workers));
}

#[then("loading the configuration resolves the mode to \"{mode}\"")]
fn then_resolved_mode(harness: &Harness, mode: String) {
    let expected = match mode.parse::<RunMode>() {
        Ok(mode) => mode,
        Err(error) => panic!("invalid mode '{mode}': {error}"),
    };
    assert_eq!(harness.config().mode(), expected);
}

#[then("loading the configuration applies the built-in defaults")]
fn then_defaults_applied(harness: &Harness) {
    let config = harness.config();
    assert_eq!(config.log_filter(), default_log_filter());
    assert_eq!(config.log_format(), default_log_format());
    assert_eq!(config.mode(), default_mode());
    assert_eq!(config.workers(), default_workers());
    assert_eq!(config.max_request_bytes(), default_max_request_bytes());
}

#[scenario(path = "tests/features/configuration_precedence.feature")]
fn configuration_precedence(#[from(harness)] harness: Harness) {
    let _ = harness;
}
