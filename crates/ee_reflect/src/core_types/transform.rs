use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rotation angles in degrees, applied in X, Y, Z order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EulerAngles {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerAngles {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn to_quat(self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.x.to_radians(),
            self.y.to_radians(),
            self.z.to_radians(),
        )
    }

    #[inline]
    pub fn from_quat(rotation: Quat) -> Self {
        let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
        Self::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
    }
}

/// A rotation, translation and uniform scale.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub rotation: Quat,
    pub translation: Vec3,
    pub scale: f32,
}

impl Default for Transform {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
        scale: 1.0,
    };

    #[inline]
    pub const fn new(rotation: Quat, translation: Vec3, scale: f32) -> Self {
        Self { rotation, translation, scale }
    }

    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.translation)
    }

    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * (point * self.scale) + self.translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euler_quat_round_trip_is_close() {
        let angles = EulerAngles::new(10.0, 20.0, 30.0);
        let back = EulerAngles::from_quat(angles.to_quat());
        assert!((back.x - 10.0).abs() < 1e-3);
        assert!((back.y - 20.0).abs() < 1e-3);
        assert!((back.z - 30.0).abs() < 1e-3);
    }

    #[test]
    fn default_is_identity() {
        let transform = Transform::default();
        assert_eq!(transform.scale, 1.0);
        assert_eq!(transform.transform_point(Vec3::X), Vec3::X);
        assert_eq!(transform.to_matrix(), Mat4::IDENTITY);
    }
}
