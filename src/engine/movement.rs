// WASD movement with axis-aligned wall collision.
//
// Speed is a fixed distance per frame step, not per second: traversal speed
// follows the host's render rate, like the page this walk was built from.

use glam::{Vec2, Vec3};

use super::camera::{forward_flat, right_flat};
use super::input::{InputSnapshot, MoveKey};
use super::zone::ZoneBoundary;

/// World units moved per frame step while a key is held.
pub const MOVE_SPEED: f32 = 0.15;

/// Direction the held keys ask for on the XZ plane, normalized.
/// Zero when nothing (or two opposing keys) is held.
pub fn wish_direction(input: &InputSnapshot, yaw: f32) -> Vec2 {
    let forward = forward_flat(yaw);
    let right = right_flat(yaw);

    let mut dir = Vec2::ZERO;
    if input.is_held(MoveKey::Forward) {
        dir += forward;
    }
    if input.is_held(MoveKey::Back) {
        dir -= forward;
    }
    if input.is_held(MoveKey::Left) {
        dir -= right;
    }
    if input.is_held(MoveKey::Right) {
        dir += right;
    }

    dir.normalize_or_zero()
}

/// Advance `position` by one frame step inside `boundary`.
///
/// A step that would put the player into the boundary's exclusion is dropped
/// whole (no sliding). Otherwise x and z are clamped independently to the
/// walkable rectangle. Height is pinned to the eye height every call.
pub fn integrate(
    position: Vec3,
    yaw: f32,
    input: &InputSnapshot,
    boundary: &ZoneBoundary,
    speed: f32,
) -> Vec3 {
    let current = Vec2::new(position.x, position.z);
    let dir = wish_direction(input, yaw);

    let next = if dir == Vec2::ZERO {
        current
    } else {
        let candidate = current + dir * speed;
        if boundary.blocked(candidate) {
            current
        } else {
            let clamped = boundary.clamp(candidate);
            // The clamp can only push inward, but never into the prop either.
            if boundary.blocked(clamped) { current } else { clamped }
        }
    };

    Vec3::new(next.x, boundary.eye_height, next.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::zone::CircularExclusion;

    const EPS: f32 = 1e-5;

    fn corridor() -> ZoneBoundary {
        ZoneBoundary {
            x_min: -5.5,
            x_max: 5.5,
            z_min: -53.7,
            z_max: 0.5,
            eye_height: 1.6,
            player_radius: 0.5,
            exclusion: None,
        }
    }

    fn holding(keys: &[MoveKey]) -> InputSnapshot {
        InputSnapshot {
            held: keys.iter().copied().collect(),
            mouse_delta: (0.0, 0.0),
        }
    }

    #[test]
    fn forward_moves_along_negative_z() {
        let p = integrate(Vec3::new(0.0, 1.6, -20.0), 0.0, &holding(&[MoveKey::Forward]), &corridor(), MOVE_SPEED);
        assert!((p.z - (-20.15)).abs() < EPS);
        assert!(p.x.abs() < EPS);
    }

    #[test]
    fn diagonal_is_not_faster() {
        let start = Vec3::new(0.0, 1.6, -20.0);
        let p = integrate(start, 0.3, &holding(&[MoveKey::Forward, MoveKey::Left]), &corridor(), MOVE_SPEED);
        let moved = Vec2::new(p.x - start.x, p.z - start.z).length();
        assert!((moved - MOVE_SPEED).abs() < EPS);
    }

    #[test]
    fn opposing_keys_cancel() {
        let start = Vec3::new(1.0, 1.6, -20.0);
        let p = integrate(start, 0.0, &holding(&[MoveKey::Forward, MoveKey::Back]), &corridor(), MOVE_SPEED);
        assert_eq!(p, start);
    }

    #[test]
    fn walls_clamp_exactly() {
        let mut p = Vec3::new(0.0, 1.6, -20.0);
        for _ in 0..100 {
            p = integrate(p, 0.0, &holding(&[MoveKey::Right]), &corridor(), MOVE_SPEED);
        }
        assert_eq!(p.x, 5.0);
    }

    #[test]
    fn height_is_pinned_even_when_idle() {
        let p = integrate(Vec3::new(0.0, 9.0, -20.0), 0.0, &holding(&[]), &corridor(), MOVE_SPEED);
        assert_eq!(p.y, 1.6);
    }

    #[test]
    fn exclusion_rejects_the_whole_step() {
        let mut boundary = corridor();
        boundary.exclusion = Some(CircularExclusion {
            center: Vec2::new(0.0, -22.0),
            radius: 1.2,
        });
        // 1.75 from the center; one step forward lands inside 1.2 + 0.5.
        let start = Vec3::new(0.0, 1.6, -20.25);
        let p = integrate(start, 0.0, &holding(&[MoveKey::Forward]), &boundary, MOVE_SPEED);
        assert_eq!(p, start);

        // Sideways is still fine.
        let p = integrate(start, 0.0, &holding(&[MoveKey::Right]), &boundary, MOVE_SPEED);
        assert!((p.x - MOVE_SPEED).abs() < EPS);
    }
}
