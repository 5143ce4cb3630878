use crate::cli::Cli;
use crate::error::{AppError, Result};
use crate::metrics::monitor::MonitorSettings;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub hosts: Vec<String>,

    #[serde(default = "default_probe_interval", with = "humantime_duration")]
    pub probe_interval: Duration,

    #[serde(default = "default_probe_timeout", with = "humantime_duration")]
    pub probe_timeout: Duration,

    #[serde(default = "default_render_interval", with = "humantime_duration")]
    pub render_interval: Duration,

    #[serde(default = "default_history_size")]
    pub history_size: usize,

    #[serde(default = "default_scale_floor")]
    pub scale_floor_ms: f64,

    #[serde(default = "default_workers")]
    pub workers: usize,

    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            probe_interval: default_probe_interval(),
            probe_timeout: default_probe_timeout(),
            render_interval: default_render_interval(),
            history_size: default_history_size(),
            scale_floor_ms: default_scale_floor(),
            workers: default_workers(),
            log_file: None,
        }
    }
}

fn default_probe_interval() -> Duration {
    crate::metrics::monitor::DEFAULT_PROBE_INTERVAL
}

fn default_probe_timeout() -> Duration {
    crate::metrics::monitor::DEFAULT_PROBE_TIMEOUT
}

fn default_render_interval() -> Duration {
    Duration::from_millis(800)
}

fn default_history_size() -> usize {
    crate::metrics::sample::DEFAULT_CAPACITY
}

fn default_scale_floor() -> f64 {
    crate::chart::DEFAULT_SCALE_FLOOR_MS
}

fn default_workers() -> usize {
    crate::metrics::pool::DEFAULT_WORKERS
}

impl Config {
    pub fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "ping-tui")
    }

    pub fn default_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn default_log_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_local_dir().join("ping-tui.log"))
    }

    /// Reads `path` if given (it must exist), otherwise the default config
    /// file if present, otherwise built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(&expand_path(path)),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&contents)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Command-line values win over the file; command-line hosts are added
    /// after the configured ones.
    pub fn apply_cli(&mut self, cli: &Cli) {
        self.hosts.extend(cli.hosts.iter().cloned());
        if let Some(interval) = cli.interval {
            self.probe_interval = interval;
        }
        if let Some(timeout) = cli.timeout {
            self.probe_timeout = timeout;
        }
        if let Some(render_interval) = cli.render_interval {
            self.render_interval = render_interval;
        }
        if let Some(history) = cli.history {
            self.history_size = history;
        }
        if let Some(workers) = cli.workers {
            self.workers = workers;
        }
        if let Some(log_file) = &cli.log_file {
            self.log_file = Some(expand_path(log_file));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.probe_interval.is_zero() {
            return Err(AppError::Config("probe_interval must be positive".into()));
        }
        if self.probe_timeout.is_zero() {
            return Err(AppError::Config("probe_timeout must be positive".into()));
        }
        if self.render_interval.is_zero() {
            return Err(AppError::Config("render_interval must be positive".into()));
        }
        if self.history_size < 2 {
            return Err(AppError::Config("history_size must be at least 2".into()));
        }
        if self.workers == 0 {
            return Err(AppError::Config("workers must be at least 1".into()));
        }
        if !(self.scale_floor_ms.is_finite() && self.scale_floor_ms > 0.0) {
            return Err(AppError::Config("scale_floor_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            interval: self.probe_interval,
            timeout: self.probe_timeout,
            capacity: self.history_size,
        }
    }
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
