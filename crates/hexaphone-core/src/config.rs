use crate::broadcast::BroadcastTarget;
use crate::constants::{DRAG_SAMPLE_RATE_MS, MIN_KEY_SCALE, TARGET_FPS};
use crate::error::ConfigError;
use crate::music::{KeyLabels, Tonality};
use crate::timbre::Timbre;
use std::str::FromStr;

/// Runtime settings of a board.
///
/// Every field has a sensible default; front-ends override individual keys
/// with `apply` (the web crate reads them from the page's query string).
#[derive(Clone, Debug, PartialEq)]
pub struct BoardConfig {
    pub target_fps: f64,
    pub drag_sample_rate_ms: f64,
    /// Fixed key tip radius in px; derived from the viewport when `None`.
    pub key_scale: Option<f32>,
    pub tonality: Option<Tonality>,
    pub labels: KeyLabels,
    pub timbre: Timbre,
    pub broadcast: Option<BroadcastTarget>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            target_fps: TARGET_FPS,
            drag_sample_rate_ms: DRAG_SAMPLE_RATE_MS,
            key_scale: None,
            tonality: None,
            labels: KeyLabels::default(),
            timbre: Timbre::default(),
            broadcast: None,
        }
    }
}

impl BoardConfig {
    pub const KEYS: [&'static str; 7] = [
        "fps", "drag_ms", "scale", "tonality", "labels", "timbre", "broadcast",
    ];

    /// Overrides one setting from its textual form. `tonality=none` clears the
    /// filter.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "fps" => self.target_fps = parse_positive(value).ok_or_else(invalid)?,
            "drag_ms" => {
                self.drag_sample_rate_ms = value
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .ok_or_else(invalid)?
            }
            "scale" => {
                self.key_scale = Some(
                    parse_positive(value)
                        .filter(|v| *v >= f64::from(MIN_KEY_SCALE))
                        .ok_or_else(invalid)? as f32,
                )
            }
            "tonality" => {
                self.tonality = match value.trim() {
                    "" | "none" => None,
                    v => Some(Tonality::from_str(v).map_err(|_| invalid())?),
                }
            }
            "labels" => self.labels = value.parse().map_err(|_| invalid())?,
            "timbre" => self.timbre = value.parse().map_err(|_| invalid())?,
            "broadcast" => self.broadcast = Some(value.parse().map_err(|_| invalid())?),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Applies every pair, logging and skipping the ones that do not parse.
    pub fn apply_all<'a>(&mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (key, value) in pairs {
            if let Err(e) = self.apply(key, value) {
                log::warn!("[config] {}", e);
            }
        }
    }
}

fn parse_positive(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}
