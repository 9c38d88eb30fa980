//! Game balance
//!
//! Every number the paddle actions depend on lives here so a JSON file can
//! override it. Missing fields fall back to the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::BALL_LAUNCH_SPEED;
use crate::sim::action::{ActionKind, Glyph};

/// Tuning could not be loaded or makes no sense
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Per-kind resource limits and glyphs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionLimits {
    /// Uses before the action unbinds itself (-1 = unlimited)
    pub press_limit: i32,
    /// Seconds before the action unbinds itself (-1 = unlimited)
    pub duration_limit: f32,
    pub unpressed_glyph: Option<Glyph>,
    pub pressed_glyph: Option<Glyph>,
}

impl Default for ActionLimits {
    fn default() -> Self {
        Self {
            press_limit: -1,
            duration_limit: -1.0,
            unpressed_glyph: None,
            pressed_glyph: None,
        }
    }
}

impl ActionLimits {
    fn with_glyph(glyph: Glyph) -> Self {
        Self {
            unpressed_glyph: Some(glyph),
            ..Self::default()
        }
    }

    fn presses(mut self, limit: i32) -> Self {
        self.press_limit = limit;
        self
    }

    fn seconds(mut self, limit: f32) -> Self {
        self.duration_limit = limit;
        self
    }
}

/// Limits for every action kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionTable {
    pub magnetize: ActionLimits,
    pub magnetize_once: ActionLimits,
    pub slam: ActionLimits,
    pub ghost_paddle: ActionLimits,
    pub grow_paddle: ActionLimits,
    pub shrink_paddle: ActionLimits,
    pub laser_fire: ActionLimits,
}

impl Default for ActionTable {
    fn default() -> Self {
        Self {
            magnetize: ActionLimits {
                pressed_glyph: Some(Glyph::MagnetOff),
                ..ActionLimits::with_glyph(Glyph::Magnet)
            }
            .seconds(20.0),
            magnetize_once: ActionLimits::with_glyph(Glyph::Magnet).presses(1),
            slam: ActionLimits::with_glyph(Glyph::Slam).seconds(15.0),
            ghost_paddle: ActionLimits::with_glyph(Glyph::Ghost).presses(3),
            grow_paddle: ActionLimits::with_glyph(Glyph::Grow).seconds(12.0),
            shrink_paddle: ActionLimits::with_glyph(Glyph::Shrink).seconds(12.0),
            laser_fire: ActionLimits::with_glyph(Glyph::Laser).presses(5),
        }
    }
}

impl ActionTable {
    pub fn get(&self, kind: ActionKind) -> &ActionLimits {
        match kind {
            ActionKind::Magnetize => &self.magnetize,
            ActionKind::MagnetizeOnce => &self.magnetize_once,
            ActionKind::Slam => &self.slam,
            ActionKind::GhostPaddle => &self.ghost_paddle,
            ActionKind::GrowPaddle => &self.grow_paddle,
            ActionKind::ShrinkPaddle => &self.shrink_paddle,
            ActionKind::LaserFire => &self.laser_fire,
        }
    }
}

/// Slam dash kinematics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlamTuning {
    /// Kick applied on press (units/s)
    pub initial_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    /// Constant speed on the way back
    pub return_speed: f32,
    /// Floor so the dash always reaches its end
    pub min_speed: f32,
    /// Travel toward the center before returning
    pub distance: f32,
    /// Progress (0-1) where acceleration flips to deceleration
    pub switch_progress: f32,
}

impl Default for SlamTuning {
    fn default() -> Self {
        Self {
            initial_speed: 16.0,
            acceleration: 850.0,
            deceleration: 1050.0,
            return_speed: 12.0,
            min_speed: 2.0,
            distance: 2.0,
            switch_progress: 0.7,
        }
    }
}

/// Grow/Shrink factors and clamps, relative to the home height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeTuning {
    pub grow_factor: f32,
    pub max_multiple: f32,
    pub shrink_factor: f32,
    pub min_fraction: f32,
}

impl Default for ResizeTuning {
    fn default() -> Self {
        Self {
            grow_factor: 1.5,
            max_multiple: 2.0,
            shrink_factor: 0.6,
            min_fraction: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub actions: ActionTable,
    pub slam: SlamTuning,
    pub resize: ResizeTuning,
    /// Vertical paddle speed at full input (units/s)
    pub paddle_move_speed: f32,
    /// Speed a ghost clone drifts toward the far edge
    pub ghost_drift_speed: f32,
    /// Vertical ghost speed while steered
    pub ghost_move_speed: f32,
    pub laser_speed: f32,
    pub ball_launch_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            actions: ActionTable::default(),
            slam: SlamTuning::default(),
            resize: ResizeTuning::default(),
            paddle_move_speed: 10.0,
            ghost_drift_speed: 6.0,
            ghost_move_speed: 10.0,
            laser_speed: 25.0,
            ball_launch_speed: BALL_LAUNCH_SPEED,
        }
    }
}

impl Tuning {
    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load from `path` if given, otherwise (or on any failure) use defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default tuning");
            return Self::default();
        };

        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("{}, using default tuning", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be positive, got {}", value),
                })
            }
        }

        let slam = &self.slam;
        positive("slam.initial_speed", slam.initial_speed)?;
        positive("slam.return_speed", slam.return_speed)?;
        positive("slam.min_speed", slam.min_speed)?;
        positive("slam.distance", slam.distance)?;
        if !(0.0..=1.0).contains(&slam.switch_progress) {
            return Err(TuningError::Invalid {
                field: "slam.switch_progress",
                reason: format!("must be within 0..=1, got {}", slam.switch_progress),
            });
        }

        let resize = &self.resize;
        positive("resize.grow_factor", resize.grow_factor)?;
        positive("resize.shrink_factor", resize.shrink_factor)?;
        positive("resize.min_fraction", resize.min_fraction)?;
        if resize.max_multiple < 1.0 || resize.min_fraction > 1.0 {
            return Err(TuningError::Invalid {
                field: "resize",
                reason: format!(
                    "clamp range [{}, {}] must contain the home size",
                    resize.min_fraction, resize.max_multiple
                ),
            });
        }

        positive("paddle_move_speed", self.paddle_move_speed)?;
        positive("ghost_drift_speed", self.ghost_drift_speed)?;
        positive("ghost_move_speed", self.ghost_move_speed)?;
        positive("laser_speed", self.laser_speed)?;
        positive("ball_launch_speed", self.ball_launch_speed)?;

        for kind in ActionKind::ALL {
            let limits = self.actions.get(kind);
            if limits.press_limit == 0 {
                return Err(TuningError::Invalid {
                    field: "actions.press_limit",
                    reason: format!("{} would unbind before its first use", kind.as_str()),
                });
            }
            if limits.duration_limit == 0.0 || limits.duration_limit.is_nan() {
                return Err(TuningError::Invalid {
                    field: "actions.duration_limit",
                    reason: format!("{} would unbind on its first tick", kind.as_str()),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "slam": { "distance": 3.5 }, "laser_speed": 40.0 }"#).unwrap();
        assert_eq!(tuning.slam.distance, 3.5);
        assert_eq!(tuning.slam.return_speed, SlamTuning::default().return_speed);
        assert_eq!(tuning.laser_speed, 40.0);
        assert_eq!(tuning.actions, ActionTable::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut tuning = Tuning::default();
        tuning.actions.laser_fire.press_limit = 9;
        let back = Tuning::from_json(&tuning.to_json().unwrap()).unwrap();
        assert_eq!(back, tuning);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "slam": { "switch_progress": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "slam.switch_progress", .. }));

        let err = Tuning::from_json(r#"{ "actions": { "slam": { "press_limit": 0 } } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { .. }));

        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = Path::new("/definitely/not/here/tuning.json");
        assert!(matches!(Tuning::load(path), Err(TuningError::Io { .. })));
        assert_eq!(Tuning::load_or_default(Some(path)), Tuning::default());
    }

    #[test]
    fn test_table_lookup_matches_kind() {
        let table = ActionTable::default();
        assert_eq!(table.get(ActionKind::LaserFire).press_limit, 5);
        assert_eq!(table.get(ActionKind::MagnetizeOnce).press_limit, 1);
        assert_eq!(table.get(ActionKind::Magnetize).pressed_glyph, Some(Glyph::MagnetOff));
        assert!(table.get(ActionKind::Slam).duration_limit > 0.0);
    }
}
