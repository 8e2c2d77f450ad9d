// Click-to-enter picking for doors.
// The view ray is tested against a vertical disc around each clickable point,
// flattened onto the ground plane: a door is hit if the ray passes within
// half the door width of its center, in front of the eye, and is still
// between the floor and the lintel when it gets there.

use glam::Vec2;

use super::camera::view_direction;
use super::zone::{PointOfInterest, Pose};

/// Half the width of a door's invisible click box.
pub const CLICK_HALF_WIDTH: f32 = 1.25;

/// Height of a door's click box, standing on the floor.
pub const DOOR_HEIGHT: f32 = 3.0;

/// Distance along the view ray to the closest clickable point it hits.
fn hit_distance(origin: Vec2, dir: Vec2, target: Vec2, half_width: f32) -> Option<f32> {
    let to_target = target - origin;
    let along = to_target.dot(dir);
    if along < 0.0 {
        return None;
    }
    let off_axis = (to_target - dir * along).length();
    (off_axis <= half_width).then_some(along)
}

/// The clickable point of interest the player is looking at, if any.
pub fn pick_clickable<'a>(pose: &Pose, pois: &'a [PointOfInterest]) -> Option<&'a PointOfInterest> {
    let view = view_direction(pose);
    let flat = Vec2::new(view.x, view.z);
    let run = flat.length();
    if run <= f32::EPSILON {
        // Straight up or down.
        return None;
    }
    let origin = pose.horizontal();
    let dir = flat / run;
    let rise = view.y / run;

    pois.iter()
        .filter(|poi| poi.clickable)
        .filter_map(|poi| {
            let along = hit_distance(origin, dir, poi.position, CLICK_HALF_WIDTH)?;
            let height = pose.position.y + rise * along;
            (0.0..=DOOR_HEIGHT).contains(&height).then_some((poi, along))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(poi, _)| poi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::layout;
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn looking_down_the_corridor_picks_the_far_door() {
        let zone = layout::corridor();
        let pose = Pose::at(Vec3::new(0.0, 1.6, -20.0));
        let hit = pick_clickable(&pose, &zone.pois).unwrap();
        assert_eq!(hit.id.as_str(), "final");
    }

    #[test]
    fn turning_left_picks_the_origins_door() {
        let zone = layout::corridor();
        let pose = Pose::new(Vec3::new(0.0, 1.6, -27.0), FRAC_PI_2, 0.1);
        let hit = pick_clickable(&pose, &zone.pois).unwrap();
        assert_eq!(hit.id.as_str(), "origins");
    }

    #[test]
    fn doors_behind_are_not_picked() {
        let zone = layout::corridor();
        let pose = Pose::new(Vec3::new(0.0, 1.6, -20.0), std::f32::consts::PI, 0.0);
        assert!(pick_clickable(&pose, &zone.pois).is_none());
    }

    #[test]
    fn non_clickable_points_are_skipped() {
        let zone = layout::gallery(crate::engine::zone::ZoneId::Origins, 4.0);
        let pose = Pose::new(Vec3::new(0.0, 1.6, 4.0), std::f32::consts::PI, 0.0);
        assert!(pick_clickable(&pose, &zone.pois).is_none());
    }

    #[test]
    fn looking_at_the_floor_misses_the_door_ahead() {
        let zone = layout::corridor();
        let pose = Pose::new(Vec3::new(0.0, 1.6, -50.0), 0.0, -1.2);
        assert!(pick_clickable(&pose, &zone.pois).is_none());
    }

    #[test]
    fn looking_over_the_lintel_misses() {
        let zone = layout::corridor();
        // 4 units from the far door, the ray clears 3.0 well before it.
        let pose = Pose::new(Vec3::new(0.0, 1.6, -50.0), 0.0, 0.6);
        assert!(pick_clickable(&pose, &zone.pois).is_none());

        let pose = Pose::new(Vec3::new(0.0, 1.6, -50.0), 0.0, 0.2);
        assert_eq!(pick_clickable(&pose, &zone.pois).unwrap().id.as_str(), "final");
    }

    #[test]
    fn straight_down_picks_nothing() {
        let zone = layout::corridor();
        let pose = Pose::new(Vec3::new(0.0, 1.6, -52.0), 0.0, -FRAC_PI_2);
        assert!(pick_clickable(&pose, &zone.pois).is_none());
    }
}
