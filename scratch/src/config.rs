//! Configuration for scratch

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::materializer::DEFAULT_ALLOWED_ENTRIES;
use crate::registry::{DEFAULT_DATE_FORMAT, check_date_format};
use crate::ui::DEFAULT_PROMPT;

/// Environment variable overriding the templates directory
pub const TEMPLATES_ENV: &str = "SCRATCH_TEMPLATES";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory with templates (default: <config dir>/scratch/templates)
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,

    /// Prompt shown when reading values
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Force colors on or off; unset means detect from the terminal
    #[serde(default)]
    pub color: Option<bool>,

    /// Entries a target directory may contain before generation
    #[serde(default = "default_allowed_entries")]
    pub allowed_entries: Vec<String>,

    /// strftime format for SPEC_CHANGELOG_DATE
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_allowed_entries() -> Vec<String> {
    DEFAULT_ALLOWED_ENTRIES.iter().map(|s| s.to_string()).collect()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_templates_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scratch")
        .join("templates")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates_dir: None,
            prompt: default_prompt(),
            color: None,
            allowed_entries: default_allowed_entries(),
            date_format: default_date_format(),
            log_level: None,
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    ///
    /// Without an explicit path, `./.scratch.yml` and then
    /// `~/.config/scratch/scratch.yml` are tried.
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::load_from_file(config_path)
                .context(format!("Failed to load config from {}", config_path.display()));
        }

        let default_paths = [
            Some(PathBuf::from(".scratch.yml")),
            dirs::config_dir().map(|p| p.join("scratch").join("scratch.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
            }
        }

        Ok(Config::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        check_date_format(&config.date_format)?;
        Ok(config)
    }

    /// Templates root with priority: CLI flag > SCRATCH_TEMPLATES > config > default
    pub fn resolve_templates_dir(&self, cli_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = cli_dir {
            return dir.to_path_buf();
        }

        if let Some(dir) = std::env::var_os(TEMPLATES_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }

        self.templates_dir.clone().unwrap_or_else(default_templates_dir)
    }
}
