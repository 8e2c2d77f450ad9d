// Configuration errors raised when zones are registered.
// The frame step itself never fails: inputs are clamped, not rejected.

use thiserror::Error;

use super::zone::{PoiId, ZoneId};

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("zone {zone:?}: {field} is not a finite number")]
    NonFinite { zone: ZoneId, field: &'static str },

    #[error("zone {zone:?}: boundary is empty on the {axis} axis (min {min} >= max {max})")]
    EmptyBoundary {
        zone: ZoneId,
        axis: &'static str,
        min: f32,
        max: f32,
    },

    #[error("zone {zone:?}: player radius {radius} leaves no walkable area")]
    PlayerRadiusTooLarge { zone: ZoneId, radius: f32 },

    #[error("zone {zone:?}: {field} must be positive, got {value}")]
    NonPositive {
        zone: ZoneId,
        field: &'static str,
        value: f32,
    },

    #[error("zone {zone:?}: {which} spawn ({x}, {z}) lies outside the walkable boundary")]
    SpawnOutsideBoundary {
        zone: ZoneId,
        which: &'static str,
        x: f32,
        z: f32,
    },

    #[error("zone {zone:?}: {which} spawn ({x}, {z}) lies inside the exclusion")]
    SpawnInsideExclusion {
        zone: ZoneId,
        which: &'static str,
        x: f32,
        z: f32,
    },

    #[error("zone {zone:?}: point of interest {poi} has a zero dwell threshold")]
    ZeroDwell { zone: ZoneId, poi: PoiId },

    #[error("zone {zone:?}: duplicate point of interest id {poi}")]
    DuplicatePoi { zone: ZoneId, poi: PoiId },

    #[error("zone {zone:?}: designated point of interest {poi} is not configured")]
    MissingDesignatedPoi { zone: ZoneId, poi: PoiId },

    #[error("zone {0:?} is registered twice")]
    DuplicateZone(ZoneId),

    #[error("zone {0:?} is required but was not configured")]
    MissingZone(ZoneId),

    #[error("zone {zone:?}: point of interest {poi} targets unknown zone {target:?}")]
    UnknownTarget {
        zone: ZoneId,
        poi: PoiId,
        target: ZoneId,
    },

    #[error("{field} must be a finite, non-negative number, got {value}")]
    InvalidTuning { field: &'static str, value: f32 },

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}
