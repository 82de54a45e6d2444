//! Model tiers and per-operation sampling
//!
//! Picks the model for each call and the sampling parameters for each
//! operation:
//! - Primary tier for every first attempt
//! - Secondary (lighter) tier for the variation quota fallback
//! - Per-operation temperature / top_p / top_k
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/mealmind/config/models.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ai::AiOperation;
use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/models.toml");

/// Sampling parameters sent with a generation request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

impl SamplingConfig {
    /// Built-in sampling for an operation, used when the config omits it
    pub fn defaults_for(operation: AiOperation) -> Self {
        match operation {
            AiOperation::Variation => Self {
                temperature: 0.4,
                top_p: 0.9,
                top_k: 40,
            },
            AiOperation::StatsEstimate => Self {
                temperature: 0.1,
                top_p: 0.8,
                top_k: 20,
            },
            AiOperation::IngredientGeneration => Self {
                temperature: 0.7,
                top_p: 0.95,
                top_k: 40,
            },
        }
    }
}

/// Router configuration
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Model for every first attempt
    pub primary_model: String,
    /// Lighter model used after a quota error
    pub secondary_model: String,
    /// Transport timeout for the provider HTTP client
    pub timeout: Duration,
    /// Per-operation sampling overrides
    pub operations: HashMap<AiOperation, SamplingConfig>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            primary_model: "gemini-2.0-flash".to_string(),
            secondary_model: "gemini-2.0-flash-lite".to_string(),
            timeout: Duration::from_secs(60),
            operations: HashMap::new(),
        }
    }
}

/// Model Router for tier and sampling selection
#[derive(Debug, Clone)]
pub struct ModelRouter {
    config: RouterConfig,
    config_path: Option<PathBuf>,
}

impl ModelRouter {
    /// Create a new model router with default configuration
    pub fn new() -> Result<Self> {
        let config = load_config(None)?;
        Ok(Self {
            config,
            config_path: default_config_path(),
        })
    }

    /// Create with a custom config path
    pub fn with_config_path(path: PathBuf) -> Result<Self> {
        let config = load_config(Some(&path))?;
        Ok(Self {
            config,
            config_path: Some(path),
        })
    }

    /// Create with an explicit configuration (for testing)
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            config,
            config_path: None,
        }
    }

    pub fn primary_model(&self) -> &str {
        &self.config.primary_model
    }

    pub fn secondary_model(&self) -> &str {
        &self.config.secondary_model
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Get the sampling parameters for an operation
    pub fn sampling_for(&self, operation: AiOperation) -> SamplingConfig {
        self.config
            .operations
            .get(&operation)
            .copied()
            .unwrap_or_else(|| SamplingConfig::defaults_for(operation))
    }

    /// Get the router configuration
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Get the config path (if using file-based config)
    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }
}

impl Default for ModelRouter {
    fn default() -> Self {
        Self::new().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Invalid model config, using built-in defaults");
            Self::with_config(RouterConfig::default())
        })
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("mealmind").join("config").join("models.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<RouterConfig> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(default_config_path)
        .filter(|p| p.exists());

    let content = match path {
        Some(path) => fs::read_to_string(&path)
            .map_err(|e| Error::InvalidData(format!("Failed to read config: {}", e)))?,
        None => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    models: Option<RawModels>,
    operations: Option<HashMap<String, RawSampling>>,
}

#[derive(Debug, Deserialize)]
struct RawModels {
    primary: Option<String>,
    secondary: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawSampling {
    temperature: Option<f32>,
    top_p: Option<f32>,
    top_k: Option<u32>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<RouterConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid config TOML: {}", e)))?;

    let mut config = RouterConfig::default();

    if let Some(models) = raw.models {
        if let Some(primary) = models.primary {
            config.primary_model = primary;
        }
        if let Some(secondary) = models.secondary {
            config.secondary_model = secondary;
        }
        if let Some(timeout) = models.timeout_secs {
            config.timeout = Duration::from_secs(timeout);
        }
    }

    if let Some(operations) = raw.operations {
        for (name, sampling) in operations {
            let Some(operation) = AiOperation::parse(&name) else {
                continue; // Skip unknown operations
            };
            let defaults = SamplingConfig::defaults_for(operation);
            config.operations.insert(
                operation,
                SamplingConfig {
                    temperature: sampling.temperature.unwrap_or(defaults.temperature),
                    top_p: sampling.top_p.unwrap_or(defaults.top_p),
                    top_k: sampling.top_k.unwrap_or(defaults.top_k),
                },
            );
        }
    }

    Ok(config)
}
