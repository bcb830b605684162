//! Opt-in debug logging.
//!
//! The crate logs through the `log` facade and stays silent unless
//! [`DEBUG_LOGGING_ENV`] is set. When it is, [`init`] starts a debug-level
//! file logger writing `redesign.log` into the given directory (the user
//! files directory, so the log survives add-on updates).

use std::path::Path;
use std::sync::Mutex;

use flexi_logger::{FileSpec, Logger, LoggerHandle};
use once_cell::sync::OnceCell;

use crate::error::Result;

/// Presence of this variable turns on the debug log. Its value is ignored.
pub const DEBUG_LOGGING_ENV: &str = "ANKI_REDESIGN_DEBUG_LOGGING";

/// Base name of the log file.
pub const LOG_BASENAME: &str = "redesign";

static HANDLE: OnceCell<Mutex<LoggerHandle>> = OnceCell::new();

/// Abstraction over environment variables.
pub trait EnvReader {
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealEnv;

impl EnvReader for RealEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }
}

/// Fixed variables for tests.
#[derive(Debug, Default, Clone)]
pub struct MockEnv {
    vars: Vec<(String, String)>,
}

impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.vars.push((name.to_string(), value.to_string()));
        self
    }
}

impl EnvReader for MockEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }
}

pub fn debug_logging_requested(env: &dyn EnvReader) -> bool {
    env.var(DEBUG_LOGGING_ENV).is_some()
}

/// Starts the file logger if requested. Returns whether logging is active.
///
/// Only the first successful call starts a logger. Later calls report
/// `true` without touching it.
pub fn init(env: &dyn EnvReader, log_dir: &Path) -> Result<bool> {
    if HANDLE.get().is_some() {
        return Ok(true);
    }
    if !debug_logging_requested(env) {
        return Ok(false);
    }

    std::fs::create_dir_all(log_dir)?;
    HANDLE.get_or_try_init(|| -> Result<Mutex<LoggerHandle>> {
        let handle = Logger::try_with_str("debug")?
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir)
                    .basename(LOG_BASENAME)
                    .suppress_timestamp()
                    .suffix("log"),
            )
            .format(flexi_logger::detailed_format)
            .start()?;
        Ok(Mutex::new(handle))
    })?;
    log::debug!("debug logging started in {}", log_dir.display());
    Ok(true)
}

/// Flushes buffered log lines, if a logger is running.
pub fn flush() {
    if let Some(handle) = HANDLE.get() {
        if let Ok(handle) = handle.lock() {
            handle.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_mock_env_flag() {
        assert!(!debug_logging_requested(&MockEnv::new()));
        assert!(debug_logging_requested(
            &MockEnv::new().with_var(DEBUG_LOGGING_ENV, "")
        ));
    }

    #[test]
    #[serial]
    fn test_real_env_flag() {
        std::env::remove_var(DEBUG_LOGGING_ENV);
        assert!(!debug_logging_requested(&RealEnv));
        std::env::set_var(DEBUG_LOGGING_ENV, "1");
        assert!(debug_logging_requested(&RealEnv));
        std::env::remove_var(DEBUG_LOGGING_ENV);
    }

    #[test]
    #[serial]
    fn test_init_is_noop_without_flag() {
        let dir = TempDir::new().unwrap();
        if HANDLE.get().is_none() {
            assert!(!init(&MockEnv::new(), dir.path()).unwrap());
            assert!(!dir.path().join("redesign.log").exists());
        }
    }

    #[test]
    #[serial]
    fn test_init_writes_log_file_once() {
        let dir = TempDir::new().unwrap();
        let env = MockEnv::new().with_var(DEBUG_LOGGING_ENV, "1");

        assert!(init(&env, dir.path()).unwrap());
        assert!(init(&env, dir.path()).unwrap());
        log::debug!("hello from the test");
        flush();
        assert!(dir.path().join("redesign.log").exists());
    }
}
