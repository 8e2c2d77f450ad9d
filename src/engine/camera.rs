// First-person camera: mouse-look orientation and the matrices the renderer needs.
//
// Camera model:
//   - Eye position and yaw/pitch live in a Pose, owned by the navigation state
//   - yaw = 0 looks along -Z; positive yaw turns left (counter-clockwise from above)
//   - Mouse X turns (yaw), mouse Y tilts (pitch)
//   - Rooms clamp pitch to straight up/down, the corridor leaves it unbounded
//
// The camera never stores the pose itself. It only turns one into matrices.

use std::f32::consts::FRAC_PI_2;

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use super::zone::Pose;

/// Radians of turn per pixel of mouse motion.
pub const LOOK_SENSITIVITY: f32 = 0.005;

/// Apply one frame's mouse delta to the pose's orientation.
pub fn apply_look(pose: &mut Pose, delta: (f32, f32), sensitivity: f32, clamp_pitch: bool) {
    let (yaw, pitch) = look(pose.yaw, pose.pitch, delta, sensitivity, clamp_pitch);
    pose.yaw = yaw;
    pose.pitch = pitch;
}

/// Pure form of [`apply_look`].
pub fn look(yaw: f32, pitch: f32, (dx, dy): (f32, f32), sensitivity: f32, clamp_pitch: bool) -> (f32, f32) {
    let yaw = yaw - dx * sensitivity;
    let mut pitch = pitch - dy * sensitivity;
    if clamp_pitch {
        pitch = pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
    }
    (yaw, pitch)
}

/// Horizontal facing direction on the XZ plane, as (x, z).
pub fn forward_flat(yaw: f32) -> Vec2 {
    Vec2::new(-yaw.sin(), -yaw.cos())
}

/// Horizontal strafe-right direction on the XZ plane, as (x, z).
pub fn right_flat(yaw: f32) -> Vec2 {
    Vec2::new(yaw.cos(), -yaw.sin())
}

/// Orientation as a quaternion (yaw about Y, then pitch about local X).
pub fn orientation(pose: &Pose) -> Quat {
    Quat::from_euler(EulerRot::YXZ, pose.yaw, pose.pitch, 0.0)
}

/// Unit view direction in world space. Well defined for any pitch.
pub fn view_direction(pose: &Pose) -> Vec3 {
    orientation(pose) * Vec3::NEG_Z
}

pub struct FirstPersonCamera {
    /// Vertical field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl FirstPersonCamera {
    pub fn new() -> Self {
        Self {
            fov: 75.0_f32.to_radians(),
            near: 0.1,
            far: 200.0,
        }
    }

    /// View matrix for the given pose. Built from the rotation directly so
    /// looking straight up or down doesn't degenerate.
    pub fn view_matrix(&self, pose: &Pose) -> Mat4 {
        Mat4::from_rotation_translation(orientation(pose), pose.position).inverse()
    }

    /// Perspective projection matrix.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }

    /// Combined view-projection matrix ready to upload to the GPU.
    pub fn view_projection(&self, pose: &Pose, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix(pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn mouse_right_turns_right() {
        let (yaw, pitch) = look(0.0, 0.0, (100.0, 0.0), LOOK_SENSITIVITY, true);
        assert!((yaw + 0.5).abs() < EPS);
        assert_eq!(pitch, 0.0);
        // Facing has swung towards +X.
        assert!(forward_flat(yaw).x > 0.0);
    }

    #[test]
    fn rooms_clamp_pitch() {
        let (_, pitch) = look(0.0, 0.0, (0.0, -10_000.0), LOOK_SENSITIVITY, true);
        assert_eq!(pitch, FRAC_PI_2);
        let (_, pitch) = look(0.0, 0.0, (0.0, 10_000.0), LOOK_SENSITIVITY, true);
        assert_eq!(pitch, -FRAC_PI_2);
    }

    #[test]
    fn corridor_pitch_is_unbounded() {
        let (_, pitch) = look(0.0, 0.0, (0.0, -1000.0), LOOK_SENSITIVITY, false);
        assert!((pitch - 5.0).abs() < EPS);
    }

    #[test]
    fn basis_is_orthonormal() {
        for yaw in [0.0_f32, 0.7, -2.3, 3.1] {
            let f = forward_flat(yaw);
            let r = right_flat(yaw);
            assert!((f.length() - 1.0).abs() < EPS);
            assert!((r.length() - 1.0).abs() < EPS);
            assert!(f.dot(r).abs() < EPS);
        }
        assert_eq!(forward_flat(0.0), Vec2::new(-0.0, -1.0));
        assert_eq!(right_flat(0.0), Vec2::new(1.0, -0.0));
    }

    #[test]
    fn view_direction_matches_flat_forward_at_zero_pitch() {
        let pose = Pose::new(Vec3::ZERO, 1.2, 0.0);
        let dir = view_direction(&pose);
        let flat = forward_flat(1.2);
        assert!((dir.x - flat.x).abs() < EPS);
        assert!(dir.y.abs() < EPS);
        assert!((dir.z - flat.y).abs() < EPS);
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let camera = FirstPersonCamera::new();
        let pose = Pose::new(Vec3::new(1.0, 1.6, -20.0), 0.4, FRAC_PI_2);
        let eye = camera.view_matrix(&pose).transform_point3(pose.position);
        assert!(eye.length() < 1e-4);
    }
}
