use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Config file picked up from the working directory when present.
pub const CONFIG_FILE: &str = "aging-atlas.json";
/// Overrides the config file location.
pub const CONFIG_ENV: &str = "AGING_ATLAS_CONFIG";
/// Overrides the dataset path from the config file.
pub const DATASET_ENV: &str = "AGING_ATLAS_DATASET";

const DEFAULT_DATASET: &str = "Alzheimer's_Disease_and_Healthy_Aging_Data_20260221.csv";
const DEFAULT_LOCATION_COUNT: usize = 5;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Survey file loaded at startup.
    pub dataset_path: PathBuf,
    /// How many locations the comparison view preselects.
    pub default_location_count: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            default_location_count: DEFAULT_LOCATION_COUNT,
        }
    }
}

impl Settings {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Defaults, then config file, then `AGING_ATLAS_DATASET`, then the first
    /// command-line argument.
    pub fn resolve<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let settings = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_json_file(Path::new(&path))?,
            None if Path::new(CONFIG_FILE).is_file() => {
                Self::from_json_file(Path::new(CONFIG_FILE))?
            }
            None => Self::default(),
        };
        Ok(settings.with_overrides(std::env::var_os(DATASET_ENV), args.into_iter().next()))
    }

    fn with_overrides(mut self, env_dataset: Option<OsString>, cli_dataset: Option<String>) -> Self {
        if let Some(path) = env_dataset {
            self.dataset_path = PathBuf::from(path);
        }
        if let Some(path) = cli_dataset {
            self.dataset_path = PathBuf::from(path);
        }
        self
    }
}
