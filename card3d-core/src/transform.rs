/// Card orientation and model matrices
use nalgebra::{Matrix4, Vector3};

/// Pointer-driven tilt of the card (in radians)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    /// Rotation about the horizontal axis.
    pub tilt_x: f32,
    /// Rotation about the vertical axis.
    pub tilt_y: f32,
}

impl Orientation {
    pub fn new(tilt_x: f32, tilt_y: f32) -> Self {
        Self { tilt_x, tilt_y }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Exponential smoothing step: move `factor` of the way to `target`.
    pub fn lerp_toward(&mut self, target: Orientation, factor: f32) {
        self.tilt_x += (target.tilt_x - self.tilt_x) * factor;
        self.tilt_y += (target.tilt_y - self.tilt_y) * factor;
    }

    pub fn magnitude(&self) -> f32 {
        self.tilt_x.hypot(self.tilt_y)
    }
}

/// Transform builder for card transformations
pub struct Transform;

impl Transform {
    /// Rotation for an orientation, X applied outermost (Euler order XYZ)
    pub fn rotation_matrix(orientation: &Orientation) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(orientation.tilt_x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, orientation.tilt_y, 0.0));
        rx * ry
    }

    /// Rotation about the vertical axis by the flip angle
    pub fn flip_matrix(angle: f32) -> Matrix4<f32> {
        Matrix4::new_rotation(Vector3::new(0.0, angle, 0.0))
    }

    pub fn scale_matrix(scale: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(scale)
    }

    /// Card body transform: tilt, then uniform scale.
    pub fn model_matrix(orientation: &Orientation, scale: f32) -> Matrix4<f32> {
        Self::rotation_matrix(orientation) * Self::scale_matrix(scale)
    }

    /// Front and back face transforms. The back face is the same surface
    /// turned half a revolution so it shows when the front faces away.
    pub fn face_matrices(
        orientation: &Orientation,
        scale: f32,
        flip_angle: f32,
    ) -> (Matrix4<f32>, Matrix4<f32>) {
        let body = Self::model_matrix(orientation, scale) * Self::flip_matrix(flip_angle);
        let back = body * Self::flip_matrix(std::f32::consts::PI);
        (body, back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_lerp_toward() {
        let mut o = Orientation::zero();
        o.lerp_toward(Orientation::new(1.0, -2.0), 0.2);
        assert!((o.tilt_x - 0.2).abs() < 1e-6);
        assert!((o.tilt_y + 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(&Orientation::zero());
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_full_flip_is_identity() {
        let (front, _) = Transform::face_matrices(&Orientation::zero(), 1.0, std::f32::consts::TAU);
        assert!((front - Matrix4::identity()).norm() < 1e-5);
    }

    #[test]
    fn test_back_face_mirrors_x() {
        let (_, back) = Transform::face_matrices(&Orientation::zero(), 1.0, 0.0);
        let p = back.transform_point(&Point3::new(1.0, 0.5, 0.0));
        assert!((p - Point3::new(-1.0, 0.5, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_scale_applies_before_rotation() {
        let m = Transform::model_matrix(&Orientation::zero(), 1.2);
        let p = m.transform_point(&Point3::new(1.0, 1.0, 0.0));
        assert!((p - Point3::new(1.2, 1.2, 0.0)).norm() < 1e-6);
    }
}
