use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use solarlog_core::{FileRecordRepository, DEFAULT_MIN_ENERGY};
use tracing::Level;

pub const SETTING_KEYS: [&str; 4] = ["data_file", "min_energy", "chart_unit_kwh", "log_level"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" => Some(LogLevel::Off),
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    pub fn as_tracing_level(&self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Session data file; the platform data directory when unset.
    pub data_file: Option<PathBuf>,
    pub min_energy: f64,
    /// kWh represented by one `*` in the chart.
    pub chart_unit_kwh: f64,
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: None,
            min_energy: DEFAULT_MIN_ENERGY,
            chart_unit_kwh: 10.0,
            log_level: LogLevel::Info,
        }
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("solarlog")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Log files live next to the default data file.
pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("solarlog")
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Lenient load for normal runs. A broken file falls back to defaults
    /// with a warning on stderr, since logging is not set up yet.
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Warning: ignoring settings file: {:#}", e);
                Self::default()
            }
        }
    }

    /// Strict load used before rewriting the file, so a typo is reported
    /// instead of being replaced by defaults.
    pub fn try_load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let settings =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(FileRecordRepository::default_location)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data_file" => {
                self.data_file = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "min_energy" => {
                let min: f64 = value.parse().with_context(|| format!("'{}' is not a number", value))?;
                if !min.is_finite() || min < 0.0 {
                    return Err(anyhow!("min_energy must be a non-negative number"));
                }
                self.min_energy = min;
            }
            "chart_unit_kwh" => {
                let unit: f64 = value.parse().with_context(|| format!("'{}' is not a number", value))?;
                if !unit.is_finite() || unit <= 0.0 {
                    return Err(anyhow!("chart_unit_kwh must be greater than zero"));
                }
                self.chart_unit_kwh = unit;
            }
            "log_level" => {
                self.log_level = LogLevel::from_str(value)
                    .ok_or_else(|| anyhow!("unknown log level '{}'", value))?;
            }
            _ => {
                return Err(anyhow!(
                    "unknown setting '{}', expected one of {:?}",
                    key,
                    SETTING_KEYS
                ))
            }
        }
        Ok(())
    }
}
