use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use crate::errors::FormError;
use crate::submission::SimulatedLatency;

const CONFIG_FILE: &str = "config.json";
const APP_DIR: &str = "form_core";
const TMP_SUFFIX: &str = "tmp";

pub const HOME_ENV: &str = "FORM_CORE_HOME";
pub const LATENCY_ENV: &str = "FORM_CORE_LATENCY_MS";
pub const FAILURE_ENV: &str = "FORM_CORE_SIMULATE_FAILURE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    /// Delay of the simulated submission call.
    pub simulated_latency_ms: u64,
    /// Makes every simulated submission fail.
    pub simulate_failure: bool,
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".into(),
            simulated_latency_ms: SimulatedLatency::DEFAULT_DELAY.as_millis() as u64,
            simulate_failure: false,
            quiet: false,
        }
    }
}

impl Config {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    pub fn operation(&self) -> SimulatedLatency {
        if self.simulate_failure {
            SimulatedLatency::failing(self.latency())
        } else {
            SimulatedLatency::new(self.latency())
        }
    }

    /// Applies `FORM_CORE_LATENCY_MS` and `FORM_CORE_SIMULATE_FAILURE`.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Applies overrides from `lookup`. Unparseable values are logged and
    /// ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(LATENCY_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.simulated_latency_ms = ms,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid {LATENCY_ENV}"),
            }
        }
        if let Some(raw) = lookup(FAILURE_ENV) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.simulate_failure = true,
                "0" | "false" | "no" | "" => self.simulate_failure = false,
                _ => tracing::warn!(value = %raw, "ignoring invalid {FAILURE_ENV}"),
            }
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Uses `FORM_CORE_HOME` when set, else the platform config directory.
    pub fn new() -> Result<Self, FormError> {
        if let Some(home) = env::var_os(HOME_ENV) {
            return Ok(Self::with_base_dir(PathBuf::from(home)));
        }
        let base = dirs::config_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no config directory"))?;
        Ok(Self::with_base_dir(base.join(APP_DIR)))
    }

    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            path: base.join(CONFIG_FILE),
        }
    }

    /// Reads the stored config, or the defaults when none was saved yet.
    pub fn load(&self) -> Result<Config, FormError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), FormError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_all(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_all(path: &Path, data: &str) -> Result<(), FormError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
