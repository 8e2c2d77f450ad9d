// Zone configuration: boundaries, spawn poses and points of interest.
// Zones are immutable once registered; the registry validates them up front
// so a bad layout never turns into NaN positions at frame time.

use std::collections::{HashMap, HashSet};
use std::fmt;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

// ============================================================================
// IDENTIFIERS
// ============================================================================

/// The navigable zones of the museum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneId {
    Corridor,
    Origins,
    Travels,
    FinalGift,
}

impl ZoneId {
    pub const ALL: [ZoneId; 4] = [
        ZoneId::Corridor,
        ZoneId::Origins,
        ZoneId::Travels,
        ZoneId::FinalGift,
    ];

    /// Label shown on the HUD.
    pub fn title(self) -> &'static str {
        match self {
            ZoneId::Corridor => "Corridor",
            ZoneId::Origins => "Hall of Origins",
            ZoneId::Travels => "Travels Gallery",
            ZoneId::FinalGift => "A Thought",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoiId(pub String);

impl PoiId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PoiId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// POSE
// ============================================================================

/// Eye position plus yaw/pitch in radians. Yaw 0 looks along -Z.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

impl Pose {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self { position, yaw, pitch }
    }

    /// Pose at `position` looking straight down -Z.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, 0.0, 0.0)
    }

    /// Position projected onto the XZ ground plane.
    pub fn horizontal(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }
}

// ============================================================================
// BOUNDARY
// ============================================================================

/// An impassable prop inside a zone, e.g. the gift box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularExclusion {
    /// Center on the XZ plane (`x`, `z`).
    pub center: Vec2,
    pub radius: f32,
}

/// Axis-aligned walkable rectangle on the XZ plane.
///
/// The player is a circle of `player_radius`, so the walkable area for the
/// eye position is the rectangle shrunk by that radius on every side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneBoundary {
    pub x_min: f32,
    pub x_max: f32,
    pub z_min: f32,
    pub z_max: f32,
    /// Camera height, pinned every frame.
    pub eye_height: f32,
    pub player_radius: f32,
    #[serde(default)]
    pub exclusion: Option<CircularExclusion>,
}

impl ZoneBoundary {
    /// Walkable x range for the eye position.
    pub fn walkable_x(&self) -> (f32, f32) {
        (self.x_min + self.player_radius, self.x_max - self.player_radius)
    }

    /// Walkable z range for the eye position.
    pub fn walkable_z(&self) -> (f32, f32) {
        (self.z_min + self.player_radius, self.z_max - self.player_radius)
    }

    /// Clamp x and z independently into the walkable rectangle.
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        let (x_lo, x_hi) = self.walkable_x();
        let (z_lo, z_hi) = self.walkable_z();
        Vec2::new(p.x.clamp(x_lo, x_hi), p.y.clamp(z_lo, z_hi))
    }

    /// Exact test, no slack: an idle player is never clamped, so a spawn
    /// must already satisfy the walkable bounds.
    pub fn contains(&self, p: Vec2) -> bool {
        let (x_lo, x_hi) = self.walkable_x();
        let (z_lo, z_hi) = self.walkable_z();
        (x_lo..=x_hi).contains(&p.x) && (z_lo..=z_hi).contains(&p.y)
    }

    /// True if a player centered at `p` would overlap the exclusion.
    pub fn blocked(&self, p: Vec2) -> bool {
        match self.exclusion {
            Some(ex) => p.distance(ex.center) < ex.radius + self.player_radius,
            None => false,
        }
    }
}

// ============================================================================
// POINTS OF INTEREST
// ============================================================================

/// What a point of interest does once the player has dwelt there long enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "zone", rename_all = "snake_case")]
pub enum Transition {
    EnterZone(ZoneId),
    ExitToParent,
    RevealContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: PoiId,
    /// Position on the XZ plane (`x`, `z`). Height is ignored for proximity.
    pub position: Vec2,
    pub radius: f32,
    /// Continuous time inside `radius` needed to fire, in milliseconds.
    pub dwell_ms: u64,
    pub transition: Transition,
    /// Doors can also be entered by clicking them.
    #[serde(default)]
    pub clickable: bool,
}

impl PointOfInterest {
    pub fn horizontal_distance(&self, position: Vec3) -> f32 {
        Vec2::new(position.x, position.z).distance(self.position)
    }
}

/// How a zone picks which point of interest is being dwelt at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerPolicy {
    /// Only the closest point counts (corridor doors).
    Nearest,
    /// A single fixed point counts (room exits, the gift).
    Designated(PoiId),
}

// ============================================================================
// ZONE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub boundary: ZoneBoundary,
    pub spawn: Pose,
    /// Pose used when coming back into an already-visited zone.
    #[serde(default)]
    pub reentry_spawn: Option<Pose>,
    pub pois: Vec<PointOfInterest>,
    pub trigger_policy: TriggerPolicy,
    /// Rooms stop pitch at straight up/down; the corridor does not.
    pub clamp_pitch: bool,
}

impl Zone {
    pub fn poi(&self, id: &PoiId) -> Option<&PointOfInterest> {
        self.pois.iter().find(|p| &p.id == id)
    }

    /// Pose the player is placed at when this zone becomes active.
    pub fn entry_pose(&self, reentry: bool) -> Pose {
        match (reentry, self.reentry_spawn) {
            (true, Some(pose)) => pose,
            _ => self.spawn,
        }
    }

    /// Check everything that can be checked without looking at other zones.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let zone = self.id;
        let b = &self.boundary;

        let finite = |field: &'static str, v: f32| {
            if v.is_finite() {
                Ok(())
            } else {
                Err(ConfigurationError::NonFinite { zone, field })
            }
        };
        finite("x_min", b.x_min)?;
        finite("x_max", b.x_max)?;
        finite("z_min", b.z_min)?;
        finite("z_max", b.z_max)?;
        finite("eye_height", b.eye_height)?;
        finite("player_radius", b.player_radius)?;

        if b.x_min >= b.x_max {
            return Err(ConfigurationError::EmptyBoundary {
                zone,
                axis: "x",
                min: b.x_min,
                max: b.x_max,
            });
        }
        if b.z_min >= b.z_max {
            return Err(ConfigurationError::EmptyBoundary {
                zone,
                axis: "z",
                min: b.z_min,
                max: b.z_max,
            });
        }
        if b.player_radius <= 0.0 {
            return Err(ConfigurationError::NonPositive {
                zone,
                field: "player_radius",
                value: b.player_radius,
            });
        }
        let (x_lo, x_hi) = b.walkable_x();
        let (z_lo, z_hi) = b.walkable_z();
        if x_lo > x_hi || z_lo > z_hi {
            return Err(ConfigurationError::PlayerRadiusTooLarge {
                zone,
                radius: b.player_radius,
            });
        }

        if let Some(ex) = b.exclusion {
            finite("exclusion.center.x", ex.center.x)?;
            finite("exclusion.center.y", ex.center.y)?;
            finite("exclusion.radius", ex.radius)?;
            if ex.radius <= 0.0 {
                return Err(ConfigurationError::NonPositive {
                    zone,
                    field: "exclusion.radius",
                    value: ex.radius,
                });
            }
        }

        let mut spawns = vec![("entry", self.spawn)];
        if let Some(pose) = self.reentry_spawn {
            spawns.push(("re-entry", pose));
        }
        for (which, pose) in spawns {
            finite("spawn.x", pose.position.x)?;
            finite("spawn.y", pose.position.y)?;
            finite("spawn.z", pose.position.z)?;
            finite("spawn.yaw", pose.yaw)?;
            finite("spawn.pitch", pose.pitch)?;
            let p = pose.horizontal();
            if !b.contains(p) {
                return Err(ConfigurationError::SpawnOutsideBoundary {
                    zone,
                    which,
                    x: p.x,
                    z: p.y,
                });
            }
            if b.blocked(p) {
                return Err(ConfigurationError::SpawnInsideExclusion {
                    zone,
                    which,
                    x: p.x,
                    z: p.y,
                });
            }
        }

        let mut seen = HashSet::new();
        for poi in &self.pois {
            finite("poi.position.x", poi.position.x)?;
            finite("poi.position.y", poi.position.y)?;
            finite("poi.radius", poi.radius)?;
            if poi.radius <= 0.0 {
                return Err(ConfigurationError::NonPositive {
                    zone,
                    field: "poi.radius",
                    value: poi.radius,
                });
            }
            if poi.dwell_ms == 0 {
                return Err(ConfigurationError::ZeroDwell {
                    zone,
                    poi: poi.id.clone(),
                });
            }
            if !seen.insert(&poi.id) {
                return Err(ConfigurationError::DuplicatePoi {
                    zone,
                    poi: poi.id.clone(),
                });
            }
        }

        if let TriggerPolicy::Designated(id) = &self.trigger_policy {
            if self.poi(id).is_none() {
                return Err(ConfigurationError::MissingDesignatedPoi {
                    zone,
                    poi: id.clone(),
                });
            }
        }

        Ok(())
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Validated set of zones, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: HashMap<ZoneId, Zone>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register every zone, then check that every `EnterZone`
    /// transition points at a registered zone.
    pub fn from_zones(zones: impl IntoIterator<Item = Zone>) -> Result<Self, ConfigurationError> {
        let mut registry = Self::new();
        for zone in zones {
            registry.register(zone)?;
        }
        registry.check_targets()?;
        Ok(registry)
    }

    pub fn register(&mut self, zone: Zone) -> Result<(), ConfigurationError> {
        zone.validate()?;
        if self.zones.contains_key(&zone.id) {
            return Err(ConfigurationError::DuplicateZone(zone.id));
        }
        log::debug!("registered zone {:?} with {} points of interest", zone.id, zone.pois.len());
        self.zones.insert(zone.id, zone);
        Ok(())
    }

    fn check_targets(&self) -> Result<(), ConfigurationError> {
        for zone in self.zones.values() {
            for poi in &zone.pois {
                if let Transition::EnterZone(target) = poi.transition {
                    if !self.zones.contains_key(&target) {
                        return Err(ConfigurationError::UnknownTarget {
                            zone: zone.id,
                            poi: poi.id.clone(),
                            target,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(&id)
    }

    pub fn require(&self, id: ZoneId) -> Result<&Zone, ConfigurationError> {
        self.zones.get(&id).ok_or(ConfigurationError::MissingZone(id))
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Zone {
        Zone {
            id: ZoneId::Origins,
            boundary: ZoneBoundary {
                x_min: -6.8,
                x_max: 6.8,
                z_min: -6.5,
                z_max: 6.8,
                eye_height: 1.6,
                player_radius: 0.3,
                exclusion: None,
            },
            spawn: Pose::at(Vec3::new(0.0, 1.6, 4.0)),
            reentry_spawn: None,
            pois: vec![PointOfInterest {
                id: "exit".into(),
                position: Vec2::new(0.0, 6.3),
                radius: 2.0,
                dwell_ms: 2000,
                transition: Transition::ExitToParent,
                clickable: false,
            }],
            trigger_policy: TriggerPolicy::Designated("exit".into()),
            clamp_pitch: true,
        }
    }

    #[test]
    fn valid_room_passes() {
        assert!(room().validate().is_ok());
    }

    #[test]
    fn inverted_boundary_is_rejected() {
        let mut zone = room();
        zone.boundary.x_min = 7.0;
        assert!(matches!(
            zone.validate(),
            Err(ConfigurationError::EmptyBoundary { axis: "x", .. })
        ));
    }

    #[test]
    fn oversized_player_radius_is_rejected() {
        let mut zone = room();
        zone.boundary.player_radius = 7.0;
        assert!(matches!(
            zone.validate(),
            Err(ConfigurationError::PlayerRadiusTooLarge { .. })
        ));
    }

    #[test]
    fn spawn_outside_walkable_area_is_rejected() {
        let mut zone = room();
        zone.spawn.position.z = 6.7;
        assert!(matches!(
            zone.validate(),
            Err(ConfigurationError::SpawnOutsideBoundary { which: "entry", .. })
        ));
    }

    #[test]
    fn spawn_a_hair_past_the_wall_is_rejected() {
        let mut zone = room();
        let (_, x_hi) = zone.boundary.walkable_x();
        zone.spawn.position.x = x_hi;
        assert!(zone.validate().is_ok());
        zone.spawn.position.x = x_hi + 9e-5;
        assert!(matches!(
            zone.validate(),
            Err(ConfigurationError::SpawnOutsideBoundary { which: "entry", .. })
        ));
    }

    #[test]
    fn spawn_inside_exclusion_is_rejected() {
        let mut zone = room();
        zone.boundary.exclusion = Some(CircularExclusion {
            center: Vec2::new(0.0, 3.5),
            radius: 1.0,
        });
        assert!(matches!(
            zone.validate(),
            Err(ConfigurationError::SpawnInsideExclusion { .. })
        ));
    }

    #[test]
    fn nan_is_rejected_before_it_reaches_integration() {
        let mut zone = room();
        zone.spawn.position.x = f32::NAN;
        assert!(matches!(
            zone.validate(),
            Err(ConfigurationError::NonFinite { field: "spawn.x", .. })
        ));
    }

    #[test]
    fn missing_designated_poi_is_rejected() {
        let mut zone = room();
        zone.trigger_policy = TriggerPolicy::Designated("door".into());
        assert!(matches!(
            zone.validate(),
            Err(ConfigurationError::MissingDesignatedPoi { .. })
        ));
    }

    #[test]
    fn duplicate_poi_is_rejected() {
        let mut zone = room();
        let copy = zone.pois[0].clone();
        zone.pois.push(copy);
        assert!(matches!(
            zone.validate(),
            Err(ConfigurationError::DuplicatePoi { .. })
        ));
    }

    #[test]
    fn registry_rejects_unknown_targets_and_duplicates() {
        let mut zone = room();
        zone.pois[0].transition = Transition::EnterZone(ZoneId::Travels);
        assert!(matches!(
            ZoneRegistry::from_zones([zone]),
            Err(ConfigurationError::UnknownTarget { target: ZoneId::Travels, .. })
        ));

        assert!(matches!(
            ZoneRegistry::from_zones([room(), room()]),
            Err(ConfigurationError::DuplicateZone(ZoneId::Origins))
        ));
    }

    #[test]
    fn reentry_pose_falls_back_to_spawn() {
        let zone = room();
        assert_eq!(zone.entry_pose(true), zone.spawn);
    }
}
