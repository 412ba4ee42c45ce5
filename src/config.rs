//! Configuration management for assoc-proc.
//!
//! Configuration is loaded from multiple sources in priority order:
//! 1. Environment variables (`ASSOC_PROC_DIMENSION`, `ASSOC_PROC_SEED`)
//! 2. Project-local config file (`./assoc-proc.toml`)
//! 3. User config file (`~/.config/assoc-proc/config.toml`)
//! 4. Built-in defaults
//!
//! # Config File Format
//!
//! ```toml
//! # assoc-proc.toml
//!
//! # Memory dimension N (N words of N bits)
//! dimension = 16
//!
//! # Seed for the randomized initial memory
//! seed = 42
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::device::{self, AssociativeMemory, DEFAULT_DIMENSION};

/// Global cached configuration.
static CONFIG: OnceLock<Config> = OnceLock::new();

/// assoc-proc configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Memory dimension N.
    pub dimension: Option<usize>,

    /// RNG seed for the initial memory contents.
    /// Unset means a fresh random memory every run.
    pub seed: Option<u64>,
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Project-local `assoc-proc.toml`
    /// 3. User config `~/.config/assoc-proc/config.toml`
    /// 4. Defaults
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(user_config) = Self::load_user_config() {
            config.merge(user_config);
        }

        if let Some(local_config) = Self::load_local_config() {
            config.merge(local_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Get the cached global configuration.
    ///
    /// Loads configuration on first call and caches it.
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(|| {
            let config = Self::load();
            log::debug!("Loaded configuration: {:?}", config);
            config
        })
    }

    /// Memory dimension, falling back to the default when unset or unusable.
    pub fn dimension(&self) -> usize {
        match self.dimension {
            Some(n) if device::is_valid_dimension(n) => n,
            Some(n) => {
                log::warn!(
                    "Ignoring unsupported dimension {} (must be 1..={}), using {}",
                    n,
                    device::MAX_DIMENSION,
                    DEFAULT_DIMENSION
                );
                DEFAULT_DIMENSION
            }
            None => DEFAULT_DIMENSION,
        }
    }

    /// Build a fresh memory according to this configuration.
    pub fn new_memory(&self) -> AssociativeMemory {
        match self.seed {
            Some(seed) => AssociativeMemory::seeded(self.dimension(), seed),
            None => AssociativeMemory::random(self.dimension()),
        }
    }

    /// Load user configuration from ~/.config/assoc-proc/config.toml
    fn load_user_config() -> Option<Self> {
        let config_path = Self::user_config_path()?;
        Self::load_from_file(&config_path)
    }

    /// Load project-local configuration from ./assoc-proc.toml
    fn load_local_config() -> Option<Self> {
        let local_path = Path::new("assoc-proc.toml");
        if let Some(config) = Self::load_from_file(local_path) {
            return Some(config);
        }

        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let project_path = Path::new(&manifest_dir).join("assoc-proc.toml");
            if let Some(config) = Self::load_from_file(&project_path) {
                return Some(config);
            }
        }

        None
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Merge another config into this one.
    /// Only overrides fields that are Some in the other config.
    fn merge(&mut self, other: Self) {
        if other.dimension.is_some() {
            self.dimension = other.dimension;
        }
        if other.seed.is_some() {
            self.seed = other.seed;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Some(dimension) = Self::env_number("ASSOC_PROC_DIMENSION") {
            self.dimension = Some(dimension);
        }
        if let Some(seed) = Self::env_number("ASSOC_PROC_SEED") {
            self.seed = Some(seed);
        }
    }

    fn env_number<T: std::str::FromStr>(var: &str) -> Option<T> {
        let raw = std::env::var(var).ok()?;
        match raw.trim().parse() {
            Ok(value) => {
                log::info!("Using {} from environment: {}", var, raw);
                Some(value)
            }
            Err(_) => {
                log::warn!("Ignoring {}: '{}' is not a valid number", var, raw);
                None
            }
        }
    }

    /// Get the path to the user config file (for display/creation).
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("assoc-proc").join("config.toml"))
    }

    /// Generate a sample config file content.
    pub fn sample_config() -> String {
        r#"# assoc-proc configuration
# Place this file at ~/.config/assoc-proc/config.toml or ./assoc-proc.toml

# Memory dimension N: N words of N bits each (1..=64).
# The masked sum needs at least 16.
dimension = 16

# Seed for the randomized initial memory (optional).
# Without it every run starts from different contents.
# seed = 42
"#
        .to_string()
    }
}
