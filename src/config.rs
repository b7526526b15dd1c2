//! Game configuration handed over from JS as an optional JSON string.
//! Every field has a default, so `{}` (or no config at all) is valid.

use serde::Deserialize;

use crate::world::MotionConfig;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub footprint: f64,
    pub step: f64,
    pub nudge: f64,
    /// Credential for the external match service. Absent or blank disables
    /// the external path entirely.
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub debug_logging: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        let motion = MotionConfig::default();
        Self {
            viewport_width: motion.viewport_width,
            viewport_height: motion.viewport_height,
            footprint: motion.footprint,
            step: motion.step,
            nudge: motion.nudge,
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            debug_logging: false,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }

    pub fn motion(&self) -> MotionConfig {
        MotionConfig {
            viewport_width: self.viewport_width,
            viewport_height: self.viewport_height,
            footprint: self.footprint,
            step: self.step,
            nudge: self.nudge,
        }
    }

    /// The credential, if one is actually usable.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug_logging {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}
