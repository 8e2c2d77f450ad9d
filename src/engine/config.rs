// Session configuration.
// Loads tunables and the zone table from JSON strings (file IO left to the app).
// Anything missing falls back to the built-in museum.

use serde::{Deserialize, Serialize};

use super::camera::LOOK_SENSITIVITY;
use super::error::ConfigurationError;
use super::layout;
use super::movement::MOVE_SPEED;
use super::zone::{Zone, ZoneRegistry};

/// Per-frame tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// World units per frame step.
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    /// Radians per pixel of mouse motion.
    #[serde(default = "default_look_sensitivity")]
    pub look_sensitivity: f32,
}

fn default_move_speed() -> f32 {
    MOVE_SPEED
}

fn default_look_sensitivity() -> f32 {
    LOOK_SENSITIVITY
}

impl Tuning {
    /// Both values must be finite and non-negative. A NaN speed would
    /// survive the wall clamp and poison the position.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (field, value) in [
            ("tuning.move_speed", self.move_speed),
            ("tuning.look_sensitivity", self.look_sensitivity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidTuning { field, value });
            }
        }
        Ok(())
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: default_move_speed(),
            look_sensitivity: default_look_sensitivity(),
        }
    }
}

/// Root configuration for a navigation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub tuning: Tuning,
    #[serde(default = "layout::museum")]
    pub zones: Vec<Zone>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tuning: Tuning::default(),
            zones: layout::museum(),
        }
    }
}

impl SessionConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigurationError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate_tuning()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigurationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate_tuning(&self) -> Result<(), ConfigurationError> {
        self.tuning.validate()
    }

    /// Validate every zone and build the registry.
    pub fn registry(&self) -> Result<ZoneRegistry, ConfigurationError> {
        ZoneRegistry::from_zones(self.zones.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::zone::ZoneId;

    #[test]
    fn empty_object_gives_the_museum() {
        let config = SessionConfig::from_json_str("{}").unwrap();
        assert_eq!(config.tuning, Tuning::default());
        assert_eq!(config.zones.len(), 4);
        assert!(config.registry().is_ok());
    }

    #[test]
    fn tuning_can_be_overridden() {
        let config = SessionConfig::from_json_str(r#"{ "tuning": { "move_speed": 0.3 } }"#).unwrap();
        assert_eq!(config.tuning.move_speed, 0.3);
        assert_eq!(config.tuning.look_sensitivity, LOOK_SENSITIVITY);
    }

    #[test]
    fn negative_speed_is_rejected() {
        let err = SessionConfig::from_json_str(r#"{ "tuning": { "move_speed": -1.0 } }"#);
        assert!(matches!(err, Err(ConfigurationError::InvalidTuning { .. })));
    }

    #[test]
    fn tuning_built_in_code_is_checked_too() {
        let nan = Tuning {
            move_speed: f32::NAN,
            ..Tuning::default()
        };
        assert!(matches!(
            nan.validate(),
            Err(ConfigurationError::InvalidTuning { field: "tuning.move_speed", .. })
        ));
        let backwards = Tuning {
            look_sensitivity: -0.005,
            ..Tuning::default()
        };
        assert!(matches!(
            backwards.validate(),
            Err(ConfigurationError::InvalidTuning { field: "tuning.look_sensitivity", .. })
        ));
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn malformed_json_is_a_configuration_error() {
        assert!(matches!(
            SessionConfig::from_json_str("{ zones: "),
            Err(ConfigurationError::Json(_))
        ));
    }

    #[test]
    fn zones_survive_a_json_trip() {
        let json = SessionConfig::default().to_json_string().unwrap();
        let config = SessionConfig::from_json_str(&json).unwrap();
        let registry = config.registry().unwrap();
        let corridor = registry.get(ZoneId::Corridor).unwrap();
        assert_eq!(corridor.pois.len(), 3);
        assert!(!corridor.clamp_pitch);
    }

    #[test]
    fn inverted_zone_in_json_fails_registration() {
        let mut config = SessionConfig::default();
        config.zones[1].boundary.z_min = 10.0;
        let json = config.to_json_string().unwrap();
        let config = SessionConfig::from_json_str(&json).unwrap();
        assert!(matches!(
            config.registry(),
            Err(ConfigurationError::EmptyBoundary { zone: ZoneId::Origins, axis: "z", .. })
        ));
    }
}
