// The museum: one long corridor with three doors, two galleries that lead
// back to it, and the room with the gift.
//
// All distances are world units, all thresholds milliseconds.

use glam::{Vec2, Vec3};

use super::zone::{
    CircularExclusion, PointOfInterest, Pose, Transition, TriggerPolicy, Zone, ZoneBoundary, ZoneId,
};

pub const EYE_HEIGHT: f32 = 1.6;

/// Radius around a door that counts as "standing at it".
pub const DOOR_PROXIMITY: f32 = 2.0;
pub const DOOR_DWELL_MS: u64 = 1000;
pub const EXIT_DWELL_MS: u64 = 2000;
pub const GIFT_PROXIMITY: f32 = 2.5;
pub const GIFT_DWELL_MS: u64 = 1000;

/// Door on the corridor's left wall, right wall, and at the far end.
pub const ORIGINS_DOOR: Vec2 = Vec2::new(-5.5, -27.0);
pub const TRAVELS_DOOR: Vec2 = Vec2::new(5.5, -27.0);
pub const FINAL_DOOR: Vec2 = Vec2::new(0.0, -54.0);
/// Exit door at the back of both galleries.
pub const ROOM_EXIT: Vec2 = Vec2::new(0.0, 6.3);
pub const GIFT: Vec2 = Vec2::new(0.0, -2.0);
pub const GIFT_RADIUS: f32 = 1.2;

pub fn museum() -> Vec<Zone> {
    vec![corridor(), gallery(ZoneId::Origins, 4.0), gallery(ZoneId::Travels, 2.0), final_gift()]
}

fn door(id: &str, position: Vec2, room: ZoneId) -> PointOfInterest {
    PointOfInterest {
        id: id.into(),
        position,
        radius: DOOR_PROXIMITY,
        dwell_ms: DOOR_DWELL_MS,
        transition: Transition::EnterZone(room),
        clickable: true,
    }
}

pub fn corridor() -> Zone {
    Zone {
        id: ZoneId::Corridor,
        boundary: ZoneBoundary {
            x_min: -5.5,
            x_max: 5.5,
            z_min: -53.7,
            z_max: 0.5,
            eye_height: EYE_HEIGHT,
            player_radius: 0.5,
            exclusion: None,
        },
        spawn: Pose::at(Vec3::new(0.0, EYE_HEIGHT, -20.0)),
        reentry_spawn: Some(Pose::at(Vec3::new(0.0, EYE_HEIGHT, -10.0))),
        pois: vec![
            door("origins", ORIGINS_DOOR, ZoneId::Origins),
            door("travels", TRAVELS_DOOR, ZoneId::Travels),
            door("final", FINAL_DOOR, ZoneId::FinalGift),
        ],
        trigger_policy: TriggerPolicy::Nearest,
        clamp_pitch: false,
    }
}

/// Origins and Travels share their shape and differ in where you arrive.
pub fn gallery(id: ZoneId, spawn_z: f32) -> Zone {
    Zone {
        id,
        boundary: ZoneBoundary {
            x_min: -6.8,
            x_max: 6.8,
            z_min: -6.5,
            z_max: 6.8,
            eye_height: EYE_HEIGHT,
            player_radius: 0.3,
            exclusion: None,
        },
        spawn: Pose::at(Vec3::new(0.0, EYE_HEIGHT, spawn_z)),
        reentry_spawn: None,
        pois: vec![PointOfInterest {
            id: "exit".into(),
            position: ROOM_EXIT,
            radius: DOOR_PROXIMITY,
            dwell_ms: EXIT_DWELL_MS,
            transition: Transition::ExitToParent,
            clickable: false,
        }],
        trigger_policy: TriggerPolicy::Designated("exit".into()),
        clamp_pitch: true,
    }
}

pub fn final_gift() -> Zone {
    Zone {
        id: ZoneId::FinalGift,
        boundary: ZoneBoundary {
            x_min: -6.8,
            x_max: 6.8,
            z_min: -6.5,
            z_max: 3.5,
            eye_height: EYE_HEIGHT,
            player_radius: 0.5,
            exclusion: Some(CircularExclusion {
                center: GIFT,
                radius: GIFT_RADIUS,
            }),
        },
        spawn: Pose::at(Vec3::new(0.0, EYE_HEIGHT, 3.0)),
        reentry_spawn: None,
        pois: vec![PointOfInterest {
            id: "gift".into(),
            position: GIFT,
            radius: GIFT_PROXIMITY,
            dwell_ms: GIFT_DWELL_MS,
            transition: Transition::RevealContent,
            clickable: false,
        }],
        trigger_policy: TriggerPolicy::Designated("gift".into()),
        clamp_pitch: true,
    }
}
