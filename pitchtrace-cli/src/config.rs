//! Configuration management

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use pitchtrace_contour::{PraatConfig, DEFAULT_PRAAT_BINARY, DEFAULT_TIMEOUT};
use pitchtrace_params::ParameterOverrides;
use serde::{Deserialize, Serialize};

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Path to configuration file
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Praat executable
    pub praat_binary: String,

    /// Arguments placed before the script path
    pub praat_launch_args: Vec<String>,

    /// Extraction script (None = script bundled with pitchtrace)
    pub praat_script: Option<PathBuf>,

    /// Seconds before a Praat run is killed
    pub timeout_secs: u64,

    /// Where scratch artifacts go (None = platform runtime/temp directory)
    pub scratch_dir: Option<PathBuf>,

    /// Parameter overrides applied before command-line flags
    pub parameters: ParameterOverrides,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            praat_binary: DEFAULT_PRAAT_BINARY.to_string(),
            praat_launch_args: vec!["--run".to_string()],
            praat_script: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            scratch_dir: None,
            parameters: ParameterOverrides::new(),
        }
    }
}

impl CliConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one the default location is
    /// used, and a default file is created there on first run.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                Self::read(path)
            }
            None => {
                let config_path = pitchtrace_paths::default_config_path()?;
                if config_path.exists() {
                    Self::read(&config_path)
                } else {
                    let config = Self::at(config_path);
                    config.save().context("Failed to save default config")?;
                    Ok(config)
                }
            }
        }
    }

    /// Default configuration bound to `config_path`
    pub fn at(config_path: PathBuf) -> Self {
        Self {
            config_path,
            ..Self::default()
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config: CliConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&self.config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Praat launch settings described by this config
    pub fn praat_config(&self) -> PraatConfig {
        let mut praat = PraatConfig::default()
            .binary(&self.praat_binary)
            .launch_args(self.praat_launch_args.iter().cloned())
            .timeout(Duration::from_secs(self.timeout_secs));

        if let Some(script) = &self.praat_script {
            praat = praat.script(script);
        }
        if let Some(dir) = &self.scratch_dir {
            praat = praat.scratch_root(dir);
        }
        praat
    }
}
