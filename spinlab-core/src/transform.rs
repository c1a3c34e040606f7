/// Per-object model transform built from translation, two rotations and scale
use nalgebra::{Matrix4, Vector3};

/// Model transform of a single renderable.
///
/// Holds a translation `T`, a rotation about X `Rx`, a rotation about Y `Ry`
/// and a scale `S`, all as column-vector 4x4 matrices. The composed model
/// matrix is always `T * Rx * Ry * S`: the object is scaled, spun about its
/// local origin, then placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    translation: Matrix4<f32>,
    rotation_x: Matrix4<f32>,
    rotation_y: Matrix4<f32>,
    scale: Matrix4<f32>,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            translation: Matrix4::identity(),
            rotation_x: Matrix4::identity(),
            rotation_y: Matrix4::identity(),
            scale: Matrix4::identity(),
        }
    }

    /// Replace the translation matrix
    pub fn set_translation(&mut self, translation: Matrix4<f32>) {
        self.translation = translation;
    }

    /// Replace the translation with one moving by `offset`
    pub fn set_translation_vector(&mut self, offset: Vector3<f32>) {
        self.translation = translation_matrix(offset.x, offset.y, offset.z);
    }

    /// Replace the scale matrix. A zero factor yields a singular model matrix.
    pub fn set_scale(&mut self, scale: Matrix4<f32>) {
        self.scale = scale;
    }

    pub fn set_scale_vector(&mut self, factors: Vector3<f32>) {
        self.scale = scale_matrix(factors.x, factors.y, factors.z);
    }

    /// Accumulate a rotation about the X axis (degrees)
    pub fn rotate_x(&mut self, angle_degrees: f32) {
        self.rotation_x *= Matrix4::from_axis_angle(&Vector3::x_axis(), angle_degrees.to_radians());
    }

    /// Accumulate a rotation about the Y axis (degrees)
    pub fn rotate_y(&mut self, angle_degrees: f32) {
        self.rotation_y *= Matrix4::from_axis_angle(&Vector3::y_axis(), angle_degrees.to_radians());
    }

    /// The combined model matrix `T * Rx * Ry * S`
    pub fn compose(&self) -> Matrix4<f32> {
        self.translation * self.rotation_x * self.rotation_y * self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a translation matrix
pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::new_translation(&Vector3::new(x, y, z))
}

/// Create a scale matrix
pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
    Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
}

/// Create a model-view-projection matrix
pub fn mvp_matrix(
    model: &Matrix4<f32>,
    view: &Matrix4<f32>,
    projection: &Matrix4<f32>,
) -> Matrix4<f32> {
    projection * view * model
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector4};

    #[test]
    fn test_identity_composes_to_identity() {
        let transform = Transform::new();
        assert_eq!(transform.compose(), Matrix4::identity());
    }

    #[test]
    fn test_compose_is_idempotent() {
        let mut transform = Transform::new();
        transform.set_translation_vector(Vector3::new(1.0, -2.0, 3.0));
        transform.rotate_x(17.0);
        transform.rotate_y(-42.5);
        transform.set_scale_vector(Vector3::new(0.5, 2.0, 1.0));

        let first = transform.compose();
        let second = transform.compose();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rotations_accumulate_about_fixed_axis() {
        let cases = [(10.0, 20.0), (90.0, 90.0), (-45.0, 300.0), (0.25, 719.0)];

        for (a1, a2) in cases {
            let mut stepped = Transform::new();
            stepped.rotate_x(a1);
            stepped.rotate_x(a2);
            let mut single = Transform::new();
            single.rotate_x(a1 + a2);
            assert_relative_eq!(stepped.compose(), single.compose(), epsilon = 1e-5);

            let mut stepped = Transform::new();
            stepped.rotate_y(a1);
            stepped.rotate_y(a2);
            let mut single = Transform::new();
            single.rotate_y(a1 + a2);
            assert_relative_eq!(stepped.compose(), single.compose(), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_rotation_about_local_origin_before_translation() {
        let mut transform = Transform::new();
        transform.set_translation_vector(Vector3::new(5.0, 0.0, 0.0));
        transform.rotate_y(90.0);

        // +X spins onto -Z, then the whole object moves along +X
        let moved = transform.compose().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved, Point3::new(5.0, 0.0, -1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_scale_does_not_stretch_translation() {
        let mut transform = Transform::new();
        transform.set_translation_vector(Vector3::new(2.0, 3.0, 4.0));
        transform.set_scale_vector(Vector3::new(10.0, 10.0, 10.0));

        let column = transform.compose().column(3).into_owned();
        assert_eq!(column, Vector4::new(2.0, 3.0, 4.0, 1.0));
    }

    #[test]
    fn test_set_translation_replaces() {
        let mut transform = Transform::new();
        transform.set_translation(translation_matrix(1.0, 1.0, 1.0));
        transform.set_translation(translation_matrix(0.0, 2.0, 0.0));
        assert_eq!(transform.compose(), translation_matrix(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_zero_scale_is_singular() {
        let mut transform = Transform::new();
        transform.set_scale(scale_matrix(0.0, 1.0, 1.0));
        assert!(transform.compose().try_inverse().is_none());
    }

    #[test]
    fn test_mvp_order() {
        let model = translation_matrix(1.0, 0.0, 0.0);
        let view = translation_matrix(0.0, 0.0, -5.0);
        let projection = scale_matrix(2.0, 2.0, 1.0);
        let mvp = mvp_matrix(&model, &view, &projection);
        let p = mvp.transform_point(&Point3::origin());
        assert_relative_eq!(p, Point3::new(2.0, 0.0, -5.0), epsilon = 1e-6);
    }
}
