//! `h2trainer.toml` loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use h2trainer_core::grading::{PassThreshold, DEFAULT_QUESTION_COUNT};
use h2trainer_report::certificate::DEFAULT_ISSUER;
use h2trainer_sim::DispersionParams;

pub const CONFIG_FILE: &str = "h2trainer.toml";

/// Top-level trainer configuration. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Question bank used when `--bank` is not given.
    #[serde(default)]
    pub question_bank: Option<PathBuf>,
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
    /// Minimum percentage needed to pass.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold_percent: f64,
    /// Where exported results go.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Organisation named on certificates.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Certificate verification link prefix.
    #[serde(default)]
    pub verify_url_base: Option<String>,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

fn default_question_count() -> usize {
    DEFAULT_QUESTION_COUNT
}
fn default_shuffle() -> bool {
    true
}
fn default_pass_threshold() -> f64 {
    f64::from(PassThreshold::DEFAULT.percent())
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./h2trainer-results")
}
fn default_issuer() -> String {
    DEFAULT_ISSUER.to_string()
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            question_bank: None,
            question_count: default_question_count(),
            shuffle: default_shuffle(),
            pass_threshold_percent: default_pass_threshold(),
            output_dir: default_output_dir(),
            issuer: default_issuer(),
            verify_url_base: None,
            simulation: SimulationConfig::default(),
        }
    }
}

impl TrainerConfig {
    pub fn pass_threshold(&self) -> PassThreshold {
        PassThreshold::from_percent(self.pass_threshold_percent)
    }
}

/// The `[simulation]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub leak_rate: f64,
    pub vent_strength: f64,
    pub buoyancy: f64,
    pub diffusion: f64,
    /// Gap between live ticks.
    pub tick_interval_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let p = DispersionParams::default();
        Self {
            leak_rate: p.leak_rate,
            vent_strength: p.vent_strength,
            buoyancy: p.buoyancy,
            diffusion: p.diffusion,
            tick_interval_ms: 40,
        }
    }
}

impl SimulationConfig {
    pub fn params(&self) -> DispersionParams {
        DispersionParams {
            leak_rate: self.leak_rate,
            vent_strength: self.vent_strength,
            buoyancy: self.buoyancy,
            diffusion: self.diffusion,
        }
    }
}

/// Load config from an explicit path, or `./h2trainer.toml` if present, or
/// fall back to defaults.
pub fn load_config_from(path: Option<&Path>) -> Result<TrainerConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(CONFIG_FILE);
        local.exists().then_some(local)
    };

    match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<TrainerConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(TrainerConfig::default()),
    }
}
