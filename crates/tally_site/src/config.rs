//! Site configuration file handling
//!
//! One TOML file describes the whole site: `[site]` metadata, `[engine]`
//! tuning for the reveal engine and particle backdrop, and the content
//! tables. Every engine setting has a default, so a file with only content
//! is valid.
//!
//! ```toml
//! [site]
//! title = "Jordan Vale, CPA"
//!
//! [engine]
//! seed = 7
//!
//! [engine.particles]
//! spawn_interval_ms = 400
//! easing = "ease_out_quad"
//!
//! [profile]
//! name = "Jordan Vale"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tally_animation::{Easing, MAX_FPS};
use tally_reveal::{ParticleConfig, DEFAULT_GLYPHS};

use crate::content::SiteContent;
use crate::error::{ConfigError, Result};

/// The whole site file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteMetadata,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(flatten)]
    pub content: SiteContent,
}

/// Site metadata
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteMetadata {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: default_title(),
            language: default_language(),
            base_url: None,
        }
    }
}

fn default_title() -> String {
    "Portfolio".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

/// Reveal engine tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineSettings {
    /// Frame rate used by the simulator
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Seed for particle randomness; random when unset
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub particles: ParticleSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            seed: None,
            particles: ParticleSettings::default(),
        }
    }
}

fn default_fps() -> u32 {
    60
}

/// Hero backdrop settings
///
/// Ranges are `[min, max]` pairs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParticleSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_glyphs")]
    pub glyphs: Vec<String>,
    #[serde(default = "default_spawn_interval_ms")]
    pub spawn_interval_ms: u64,
    #[serde(default = "default_burst_count")]
    pub burst_count: u32,
    #[serde(default = "default_burst_stagger_ms")]
    pub burst_stagger_ms: u64,
    #[serde(default = "default_font_size")]
    pub font_size: [f32; 2],
    #[serde(default = "default_rise")]
    pub rise: [f32; 2],
    #[serde(default = "default_drift")]
    pub drift: [f32; 2],
    #[serde(default = "default_rotation")]
    pub rotation: [f32; 2],
    #[serde(default = "default_lifetime_secs")]
    pub lifetime_secs: [f32; 2],
    #[serde(default = "default_particle_easing")]
    pub easing: Easing,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            glyphs: default_glyphs(),
            spawn_interval_ms: default_spawn_interval_ms(),
            burst_count: default_burst_count(),
            burst_stagger_ms: default_burst_stagger_ms(),
            font_size: default_font_size(),
            rise: default_rise(),
            drift: default_drift(),
            rotation: default_rotation(),
            lifetime_secs: default_lifetime_secs(),
            easing: default_particle_easing(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_glyphs() -> Vec<String> {
    DEFAULT_GLYPHS.iter().map(|g| g.to_string()).collect()
}

fn default_spawn_interval_ms() -> u64 {
    400
}

fn default_burst_count() -> u32 {
    15
}

fn default_burst_stagger_ms() -> u64 {
    100
}

fn default_font_size() -> [f32; 2] {
    [20.0, 50.0]
}

fn default_rise() -> [f32; 2] {
    [100.0, 300.0]
}

fn default_drift() -> [f32; 2] {
    [-50.0, 50.0]
}

fn default_rotation() -> [f32; 2] {
    [-180.0, 180.0]
}

fn default_lifetime_secs() -> [f32; 2] {
    [4.0, 7.0]
}

fn default_particle_easing() -> Easing {
    Easing::EaseOutQuad
}

impl ParticleSettings {
    /// Spawner configuration, validated
    pub fn to_config(&self) -> Result<ParticleConfig> {
        let [font_min, font_max] = self.font_size;
        let [rise_min, rise_max] = self.rise;
        let [drift_min, drift_max] = self.drift;
        let [rot_min, rot_max] = self.rotation;
        let [life_min, life_max] = self.lifetime_secs;

        let config = ParticleConfig {
            glyphs: self.glyphs.clone(),
            spawn_interval: Duration::from_millis(self.spawn_interval_ms),
            burst_count: self.burst_count,
            burst_stagger: Duration::from_millis(self.burst_stagger_ms),
            font_size: font_min..font_max,
            rise: rise_min..rise_max,
            drift: drift_min..drift_max,
            rotation: rot_min..rot_max,
            lifetime: life_min..life_max,
            easing: self.easing,
        };
        config.validate()?;
        Ok(config)
    }
}

impl SiteConfig {
    /// Load and validate a site file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text, path)?;
        tracing::debug!(
            path = %path.display(),
            skills = config.content.skills.len(),
            "site configuration loaded"
        );
        Ok(config)
    }

    /// Parse and validate site TOML that didn't come from a file
    pub fn from_toml(text: &str) -> Result<Self> {
        Self::parse(text, Path::new("<inline>"))
    }

    fn parse(text: &str, path: &Path) -> Result<Self> {
        let config: SiteConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from(path),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.content.validate()?;
        if !(1..=MAX_FPS).contains(&self.engine.fps) {
            return Err(ConfigError::Invalid(format!(
                "engine.fps must be between 1 and {MAX_FPS}, got {}",
                self.engine.fps
            )));
        }
        if self.engine.particles.enabled {
            self.engine.particles.to_config()?;
        }
        Ok(())
    }

    /// Spawner configuration for the hero backdrop, if enabled
    pub fn particle_config(&self) -> Result<Option<ParticleConfig>> {
        if self.engine.particles.enabled {
            self.engine.particles.to_config().map(Some)
        } else {
            Ok(None)
        }
    }
}
