use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ITEM_HEIGHT: f64 = 40.0;
pub const DEFAULT_VISIBLE_COUNT: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("item height must be a positive finite number, got {0}")]
    InvalidItemHeight(f64),
    #[error("visible count must be at least 1")]
    InvalidVisibleCount,
    #[error("momentum decay must be in (0, 1), got {0}")]
    InvalidDecay(f64),
    #[error("momentum frame duration must be positive, got {0}")]
    InvalidFrame(f64),
    #[error("momentum thresholds must be non-negative")]
    InvalidThreshold,
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tuning for the post-release inertia.
///
/// Velocities are in offset units per frame, where a frame is
/// `frame_ms` milliseconds of wall time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MomentumConfig {
    /// Nominal refresh interval the velocity unit is normalized to.
    pub frame_ms: f64,
    /// A release faster than this starts a momentum run.
    pub release_threshold: f64,
    /// A run stops once velocity falls to this or below.
    pub stop_threshold: f64,
    /// Velocity multiplier applied after every tick.
    pub decay: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            frame_ms: 16.0,
            release_threshold: 0.5,
            stop_threshold: 0.1,
            decay: 0.95,
        }
    }
}

/// Geometry and physics of one wheel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PickerConfig {
    /// Height of one item in logical pixels; the unit of the scroll offset.
    pub item_height: f64,
    /// Rows shown at once. Also sizes the blank padding above and below.
    pub visible_count: usize,
    pub momentum: MomentumConfig,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            item_height: DEFAULT_ITEM_HEIGHT,
            visible_count: DEFAULT_VISIBLE_COUNT,
            momentum: MomentumConfig::default(),
        }
    }
}

impl PickerConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.item_height.is_finite() && self.item_height > 0.0) {
            return Err(ConfigError::InvalidItemHeight(self.item_height));
        }
        if self.visible_count == 0 {
            return Err(ConfigError::InvalidVisibleCount);
        }
        let m = &self.momentum;
        if !(m.decay > 0.0 && m.decay < 1.0) {
            return Err(ConfigError::InvalidDecay(m.decay));
        }
        if !(m.frame_ms.is_finite() && m.frame_ms > 0.0) {
            return Err(ConfigError::InvalidFrame(m.frame_ms));
        }
        if !(m.release_threshold >= 0.0 && m.stop_threshold >= 0.0) {
            return Err(ConfigError::InvalidThreshold);
        }
        Ok(())
    }

    /// Height of the visible window.
    pub fn viewport_height(&self) -> f64 {
        self.visible_count as f64 * self.item_height
    }

    /// Blank slots above the first item (and below the last).
    pub fn padding_slots(&self) -> usize {
        self.visible_count / 2
    }

    /// Distance from the top of the window to the selection band.
    pub fn band_inset(&self) -> f64 {
        self.padding_slots() as f64 * self.item_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_widget_contract() {
        let c = PickerConfig::default();
        assert_eq!(c.item_height, 40.0);
        assert_eq!(c.visible_count, 5);
        assert_eq!(c.viewport_height(), 200.0);
        assert_eq!(c.padding_slots(), 2);
        assert_eq!(c.band_inset(), 80.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = PickerConfig::from_json(br#"{"itemHeight": 32, "momentum": {"decay": 0.9}}"#);
        let Ok(c) = c else {
            unreachable!("config should parse");
        };
        assert_eq!(c.item_height, 32.0);
        assert_eq!(c.visible_count, 5);
        assert_eq!(c.momentum.decay, 0.9);
        assert_eq!(c.momentum.frame_ms, 16.0);
    }

    #[test]
    fn rejects_bad_geometry() {
        let c = PickerConfig {
            item_height: 0.0,
            ..PickerConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::InvalidItemHeight(_))));

        let c = PickerConfig {
            visible_count: 0,
            ..PickerConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::InvalidVisibleCount)));
    }

    #[test]
    fn rejects_non_decaying_momentum() {
        let mut c = PickerConfig::default();
        c.momentum.decay = 1.0;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidDecay(_))));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            PickerConfig::from_json(b"{itemHeight"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn even_visible_counts_round_padding_down() {
        let c = PickerConfig {
            visible_count: 4,
            ..PickerConfig::default()
        };
        assert_eq!(c.padding_slots(), 2);
        assert_eq!(c.viewport_height(), 160.0);
    }
}
