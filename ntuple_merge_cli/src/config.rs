use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use ntuple_merge_core::engine::DEFAULT_HADD_PROGRAM;
use ntuple_merge_core::{
    DEFAULT_PATTERN, DiscoveryOptions, EngineKind, EngineSettings, MatchPolicy, OutputMode,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prefix for environment overrides, e.g. `NTUPLE_MERGE_MERGE__ENGINE=concat`
pub const ENV_PREFIX: &str = "NTUPLE_MERGE_";

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub jobs: JobsConfig,

    #[serde(default)]
    pub merge: MergeConfig,
}

/// Settings for job descriptor generation
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct JobsConfig {
    pub storage_root: PathBuf,
    pub pattern: String,
    pub local_script: PathBuf,
    pub batch_file: PathBuf,
    pub log_dir: PathBuf,
    /// Program each generated job invokes
    pub executable: String,
    pub job_flavour: String,
}

/// Settings for the merge command
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MergeConfig {
    pub engine: EngineKind,
    pub hadd_executable: PathBuf,
    pub output_mode: OutputMode,
    pub match_policy: MatchPolicy,
    pub follow_links: bool,
}

impl Default for JobsConfig {
    fn default() -> Self {
        let user = std::env::var("USER").unwrap_or_default();
        Self {
            storage_root: PathBuf::from(format!(
                "/eos/cms/store/group/phys_jetmet/{user}/JMETriggerAnalysis/JESC/JESC_ntuple/250407_winter25v9/"
            )),
            pattern: DEFAULT_PATTERN.to_string(),
            local_script: PathBuf::from("merge_Locally.sh"),
            batch_file: PathBuf::from("merge_using_condor.sub"),
            log_dir: PathBuf::from("merge_condor_logs"),
            executable: "ntuple-merge".to_string(),
            job_flavour: "tomorrow".to_string(),
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            hadd_executable: PathBuf::from(DEFAULT_HADD_PROGRAM),
            output_mode: OutputMode::default(),
            match_policy: MatchPolicy::default(),
            follow_links: false,
        }
    }
}

impl MergeConfig {
    /// Engine settings for the core factory
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            kind: self.engine,
            mode: self.output_mode,
            hadd_program: self.hadd_executable.clone(),
        }
    }

    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions::new().with_follow_links(self.follow_links)
    }
}

/// Configuration manager that handles XDG-compliant paths and layered configuration
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with default XDG-compliant paths
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn get_config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    fn default_config_path() -> PathBuf {
        #[cfg(not(target_os = "windows"))]
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("ntuple-merge/config.toml");
        }

        #[cfg(not(target_os = "windows"))]
        {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config/ntuple-merge/config.toml")
        }

        #[cfg(target_os = "windows")]
        {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("ntuple-merge\\config.toml")
        }
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new();

        // Layer 1: Defaults
        figment = figment.merge(Serialized::defaults(AppConfig::default()));

        // Layer 2: Config file (if exists)
        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        // Layer 3: Environment variables
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().context("Failed to load configuration")
    }

    /// Effective configuration rendered as TOML
    pub fn show(&self) -> Result<String> {
        let config = self.load()?;
        toml::to_string_pretty(&config).context("Failed to render configuration")
    }

    /// Get a configuration value by key (dot notation)
    pub fn get(&self, key: &str) -> Result<String> {
        let config = self.load()?;
        let toml_string = toml::to_string(&config)?;
        let value: toml::Value = toml::from_str(&toml_string)?;

        let mut current = &value;
        for part in key.split('.') {
            match current {
                toml::Value::Table(table) => {
                    current = table
                        .get(part)
                        .ok_or_else(|| anyhow::anyhow!("Key '{}' not found", key))?;
                }
                _ => anyhow::bail!("Invalid key path: {}", key),
            }
        }

        match current {
            toml::Value::String(s) => Ok(s.clone()),
            toml::Value::Integer(i) => Ok(i.to_string()),
            toml::Value::Boolean(b) => Ok(b.to_string()),
            _ => anyhow::bail!("Value at '{}' is not a simple type", key),
        }
    }
}
