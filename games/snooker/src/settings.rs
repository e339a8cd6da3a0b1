//! Game settings, loaded from JSON supplied by the host page.

use serde::Deserialize;
use thiserror::Error;

use crate::rack::TableMode;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Every field is optional in the JSON; missing ones take the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnookerSettings {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Delay between the table coming to rest and the cue reappearing.
    pub cue_lag_ms: f64,
    pub foul_display_ms: f64,
    /// Cue ball speed (units per second) at full power.
    pub max_shot_speed: f32,
    pub ball_restitution: f32,
    pub ball_friction: f32,
    /// Felt friction, as linear damping per second.
    pub felt_damping: f32,
    pub cushion_restitution: f32,
    pub cushion_thickness: f32,
    /// Seed for random racks. Without one, racks differ per session.
    pub seed: Option<u64>,
    /// Mode racked at start-up. Without one the table holds only the cue ball.
    pub initial_mode: Option<TableMode>,
}

impl Default for SnookerSettings {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            canvas_height: 600.0,
            cue_lag_ms: 3100.0,
            foul_display_ms: 2000.0,
            max_shot_speed: 1900.0,
            ball_restitution: 0.9,
            ball_friction: 0.02,
            felt_damping: 0.6,
            cushion_restitution: 0.85,
            cushion_thickness: 20.0,
            seed: None,
            initial_mode: None,
        }
    }
}

impl SnookerSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("canvas_width", self.canvas_width)?;
        positive("canvas_height", self.canvas_height)?;
        positive("max_shot_speed", self.max_shot_speed)?;
        positive("cushion_thickness", self.cushion_thickness)?;
        non_negative("cue_lag_ms", self.cue_lag_ms as f32)?;
        non_negative("foul_display_ms", self.foul_display_ms as f32)?;
        non_negative("ball_friction", self.ball_friction)?;
        non_negative("felt_damping", self.felt_damping)?;
        unit("ball_restitution", self.ball_restitution)?;
        unit("cushion_restitution", self.cushion_restitution)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> SettingsError {
    SettingsError::Invalid { field, reason }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be a positive number, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must not be negative, got {value}")))
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be between 0 and 1, got {value}")))
    }
}
