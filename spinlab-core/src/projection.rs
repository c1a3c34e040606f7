/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Back the camera off and aim it so a scene of `radius` around `center` fits the view
    pub fn framing(mut self, center: Point3<f32>, radius: f32) -> Self {
        let distance = radius / (self.fov / 2.0).tan() + radius;
        self.target = center;
        self.position = center + Vector3::new(0.0, 0.0, distance);
        self.far = self.far.max(distance + radius * 2.0);
        self
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the perspective projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Projection times view, ready to be multiplied by a model matrix
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Project a point through a full model-view-projection matrix to screen space.
///
/// Returns `(x, y, depth)` with depth in normalized device range `-1..=1`,
/// or `None` when the point is behind the eye or outside the view volume.
pub fn project_to_screen(
    point: &Point3<f32>,
    mvp: &Matrix4<f32>,
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let clip = mvp * point.to_homogeneous();

    // Prevent division by near-zero or negative w (behind the camera)
    if clip.w < 1e-6 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let depth = clip.z / clip.w;

    // Clip test
    let inside = |value: f32| (-1.0..=1.0).contains(&value);
    if !inside(ndc_x) || !inside(ndc_y) || !inside(depth) {
        return None;
    }

    // Convert to screen space
    let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

    Some((screen_x, screen_y, depth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::translation_matrix;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_projection_is_perspective() {
        let camera = Camera::new(100, 100);
        let vp = camera.view_projection();
        let near = Point3::new(1.0, 0.0, 1.0);
        let far = Point3::new(1.0, 0.0, -1.0);
        let (near_x, _, _) = project_to_screen(&near, &vp, 100, 100).unwrap();
        let (far_x, _, _) = project_to_screen(&far, &vp, 100, 100).unwrap();
        // the same lateral offset shrinks with distance
        assert!(near_x - 50.0 > far_x - 50.0);
        assert!(far_x > 50.0);
    }

    #[test]
    fn test_zero_height_viewport() {
        let camera = Camera::new(80, 0);
        assert!(camera.aspect.is_finite());
    }

    #[test]
    fn test_origin_lands_mid_screen() {
        let camera = Camera::new(100, 50);
        let mvp = camera.view_projection();
        let (x, y, depth) = project_to_screen(&Point3::origin(), &mvp, 100, 50).unwrap();
        assert!((x - 50.0).abs() < 1e-3);
        assert!((y - 25.0).abs() < 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_nearer_point_has_smaller_depth() {
        let camera = Camera::new(100, 100);
        let vp = camera.view_projection();
        let near = vp * translation_matrix(0.0, 0.0, 1.0);
        let (_, _, far_depth) = project_to_screen(&Point3::origin(), &vp, 100, 100).unwrap();
        let (_, _, near_depth) = project_to_screen(&Point3::origin(), &near, 100, 100).unwrap();
        assert!(near_depth < far_depth);
    }

    #[test]
    fn test_point_behind_camera_is_clipped() {
        let camera = Camera::new(100, 100);
        let mvp = camera.view_projection();
        assert!(project_to_screen(&Point3::new(0.0, 0.0, 10.0), &mvp, 100, 100).is_none());
    }

    #[test]
    fn test_framing_keeps_target() {
        let camera = Camera::default().framing(Point3::new(0.0, 2.0, 0.0), 3.0);
        assert_eq!(camera.target, Point3::new(0.0, 2.0, 0.0));
        assert!(camera.position.z > 3.0);
    }
}
