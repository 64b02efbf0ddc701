use crate::error::{Result, YieldCastError};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_EXOGENOUS_BASELINE_YEAR: i32 = 2020;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub adjustment: AdjustmentConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Serialized base-model bundle (JSON)
    #[serde(default = "default_model_file")]
    pub model_file: PathBuf,
}

fn default_model_file() -> PathBuf {
    PathBuf::from("models/crop_models.json")
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_file: default_model_file(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    #[serde(default = "default_processed_data_dir")]
    pub processed_data_dir: PathBuf,
    #[serde(default = "default_merged_file")]
    pub merged_file: String,
}

fn default_processed_data_dir() -> PathBuf {
    PathBuf::from("data/processed")
}

fn default_merged_file() -> String {
    "merged_data.csv".into()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            processed_data_dir: default_processed_data_dir(),
            merged_file: default_merged_file(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdjustmentConfig {
    #[serde(default = "default_exogenous_baseline_year")]
    pub exogenous_baseline_year: i32,
    /// "Now" for confidence decay. Falls back to the calendar year when unset.
    #[serde(default, deserialize_with = "deserialize_optional_year")]
    pub reference_year: Option<i32>,
}

fn default_exogenous_baseline_year() -> i32 {
    DEFAULT_EXOGENOUS_BASELINE_YEAR
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            exogenous_baseline_year: DEFAULT_EXOGENOUS_BASELINE_YEAR,
            reference_year: None,
        }
    }
}

/// Accepts a number, a numeric string (env substitution leaves strings), or blank.
fn deserialize_optional_year<'de, D>(deserializer: D) -> std::result::Result<Option<i32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum YearValue {
        Number(i32),
        Text(String),
    }

    match Option::<YearValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(YearValue::Number(y)) => Ok(Some(y)),
        Some(YearValue::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(YearValue::Text(s)) => s.trim().parse::<i32>().map(Some).map_err(|_| {
            D::Error::custom(format!(
                "invalid reference_year '{}' - ensure YIELDCAST_REFERENCE_YEAR is a year",
                s
            ))
        }),
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(YieldCastError::Config(format!(
                "Config file not found at {:?}",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| YieldCastError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Parse YAML after `${VAR}` substitution, then apply environment overrides.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content);

        let mut config: Config = serde_yaml::from_str(&content)
            .map_err(|e| YieldCastError::Config(format!("Failed to parse config: {}", e)))?;

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load from the usual locations, or fall back to built-in defaults.
    pub fn load_or_default(config_override: Option<PathBuf>) -> Result<Self> {
        if Self::exists(config_override.as_ref()) {
            return Self::load(config_override);
        }

        if let Some(path) = config_override {
            return Err(YieldCastError::Config(format!(
                "Config file not found at {:?}",
                path
            )));
        }

        tracing::info!("No config file found, using defaults");
        let mut config = Config::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let default_path = dirs::config_dir()
            .ok_or_else(|| YieldCastError::Config("Cannot determine config directory".into()))?
            .join("yieldcast")
            .join("config.yaml");
        Ok(default_path)
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("YIELDCAST_MODEL_FILE") {
            self.model.model_file = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("YIELDCAST_PROCESSED_DATA_DIR") {
            self.data.processed_data_dir = PathBuf::from(dir);
        }
        if let Ok(year) = std::env::var("YIELDCAST_REFERENCE_YEAR") {
            let year = year.trim().parse::<i32>().map_err(|_| {
                YieldCastError::Config(format!("YIELDCAST_REFERENCE_YEAR '{}' is not a year", year))
            })?;
            self.adjustment.reference_year = Some(year);
        }
        Ok(())
    }

    fn substitute_env_vars(content: &str) -> String {
        let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
            return content.to_string();
        };

        let mut result = content.to_string();
        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            // Unset variables become blank so optional keys parse as absent
            let value = std::env::var(var_name).unwrap_or_default();
            result = result.replace(placeholder, &value);
        }

        result
    }

    pub fn historical_data_path(&self) -> PathBuf {
        self.data.processed_data_dir.join(&self.data.merged_file)
    }

    /// Reference year for confidence decay, with an explicit override taking priority.
    pub fn reference_year(&self, override_year: Option<i32>) -> i32 {
        override_year
            .or(self.adjustment.reference_year)
            .unwrap_or_else(|| Local::now().year())
    }
}
