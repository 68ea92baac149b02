//! Runtime settings.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional `route-rerun.toml` in the working directory (or an explicit file
//! passed on the command line), then `ROUTE_RERUN_*` environment variables.
//!
//! ```toml
//! data_dir = "/data/media/0/realdata"
//! app_id = "rerun_test"
//! workers = 4
//! install_command = ["cargo", "install", "--locked", "rerun-cli"]
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

/// Route streamed when `--demo` is given.
pub const DEMO_ROUTE: &str = "a2a0ccea32023010|2023-07-27--13-01-19";

/// Settings file picked up from the working directory when present.
pub const DEFAULT_SETTINGS_FILE: &str = "route-rerun";

/// Prefix for environment overrides, e.g. `ROUTE_RERUN_DATA_DIR`.
pub const ENV_PREFIX: &str = "ROUTE_RERUN";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Root of the local route store.
    pub data_dir: PathBuf,
    /// Route used by `--demo`.
    pub demo_route: String,
    /// Application id every viewer session is opened with.
    pub app_id: String,
    /// Timeline the log monotonic time is recorded on.
    pub timeline: String,
    /// Command (program followed by arguments) run by `--install`.
    pub install_command: Vec<String>,
    /// Optional JSON registry replacing the built-in service list.
    pub services_file: Option<PathBuf>,
    /// Worker pool size; `None` uses every available core.
    pub workers: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("realdata"),
            demo_route: DEMO_ROUTE.to_string(),
            app_id: "rerun_test".to_string(),
            timeline: "TIMELINE".to_string(),
            install_command: ["cargo", "install", "--locked", "rerun-cli"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            services_file: None,
            workers: None,
        }
    }
}

impl Settings {
    /// Load settings, reading `path` if given (it must exist) or the default
    /// settings file if one is present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(" ")
                    .with_list_parse_key("install_command"),
            )
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    /// Number of workers to run segments on.
    pub fn worker_count(&self) -> usize {
        self.workers.filter(|&n| n > 0).unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}
