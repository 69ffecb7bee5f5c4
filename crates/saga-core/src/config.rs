//! Configuration for the generation service, map layout and narrative settings.
//!
//! Load order: `.saga/config.toml` → environment variables → defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;

/// Top-level repo-saga configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SagaConfig {
    pub service: ServiceConfig,
    pub layout: LayoutConfig,
    pub script: ScriptConfig,
    pub chat: ChatConfig,
}

/// Remote generation service connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL the endpoint paths are appended to.
    pub base_url: String,
    /// Global per-request timeout. A timeout is treated like any transport failure.
    pub timeout_secs: u64,
}

/// Placement of nodes the wire format gives no coordinates for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fixed seed for reproducible maps. `None` scatters from OS entropy.
    pub seed: Option<u64>,
    /// Lower bound of the inset range, inclusive.
    pub inset_min: f64,
    /// Upper bound of the inset range, exclusive.
    pub inset_max: f64,
    pub node_size: f64,
}

/// Narrative panel generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Panels requested from the generator (3..=8).
    pub num_panels: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Most recent chat turns forwarded with each message.
    pub history_turns: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 120,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: Some(0x5A6A),
            inset_min: 10.0,
            inset_max: 90.0,
            node_size: 6.0,
        }
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self { num_panels: 5 }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { history_turns: 5 }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl SagaConfig {
    /// Load config from `.saga/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".saga").join("config.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("invalid config in {}", config_path.display()))?
        } else {
            Self::default()
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("SAGA_SERVICE_URL")
            && !url.trim().is_empty()
        {
            self.service.base_url = url.trim().to_string();
        }
        env_override("SAGA_TIMEOUT_SECS", &mut self.service.timeout_secs);
        env_override("SAGA_NUM_PANELS", &mut self.script.num_panels);
        env_override("SAGA_CHAT_HISTORY", &mut self.chat.history_turns);

        if let Ok(v) = std::env::var("SAGA_LAYOUT_SEED")
            && let Ok(seed) = v.trim().parse()
        {
            self.layout.seed = Some(seed);
        }
    }

    /// Reject settings the decoder or orchestrator cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.layout.inset_min.partial_cmp(&self.layout.inset_max) != Some(Ordering::Less) {
            anyhow::bail!(
                "layout.inset_min ({}) must be less than layout.inset_max ({})",
                self.layout.inset_min,
                self.layout.inset_max,
            );
        }
        if !(0.0..=100.0).contains(&self.layout.inset_min)
            || !(0.0..=100.0).contains(&self.layout.inset_max)
        {
            anyhow::bail!("layout inset range must lie within [0, 100]");
        }
        if self.layout.node_size <= 0.0 {
            anyhow::bail!(
                "layout.node_size ({}) must be positive",
                self.layout.node_size
            );
        }
        if !(3..=8).contains(&self.script.num_panels) {
            anyhow::bail!(
                "script.num_panels ({}) must be between 3 and 8",
                self.script.num_panels
            );
        }
        if self.service.timeout_secs == 0 {
            anyhow::bail!("service.timeout_secs must be at least 1");
        }
        Ok(())
    }
}
