/// Camera and projection utilities
use nalgebra::{Matrix4, Point2, Point3, Vector3};

/// Distance from the camera to the card centre.
pub const ORBIT_DISTANCE: f32 = 5.0;

/// Perspective camera looking at the card.
///
/// The camera can orbit horizontally around the target. Distance and height
/// are fixed: no zoom, no pan, and the polar angle stays at π/2.
pub struct Camera {
    pub position: Point3<f32>,
    /// Horizontal orbit angle in radians; 0 looks down -z at the card front.
    azimuth: f32,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Camera for a viewport `width` x `height` (any consistent unit)
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, ORBIT_DISTANCE),
            azimuth: 0.0,
            target: Point3::origin(),
            up: Vector3::y(),
            fov: 50f32.to_radians(),
            aspect: if height > 0.0 { width / height } else { 1.0 },
            near: 0.1,
            far: 100.0,
        }
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    /// Place the camera `azimuth` radians around the vertical axis, wrapped
    /// into [0, 2π).
    pub fn set_azimuth(&mut self, azimuth: f32) {
        if !azimuth.is_finite() {
            return;
        }
        let wrapped = azimuth.rem_euclid(std::f32::consts::TAU);
        // rem_euclid can round tiny negative angles up to exactly 2π.
        self.azimuth = if wrapped >= std::f32::consts::TAU { 0.0 } else { wrapped };
        let offset = Vector3::new(self.azimuth.sin(), 0.0, self.azimuth.cos()) * ORBIT_DISTANCE;
        self.position = self.target + offset;
    }

    /// Orbit horizontally by `delta` radians.
    pub fn orbit(&mut self, delta: f32) {
        self.set_azimuth(self.azimuth + delta);
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Project a model-space point to screen space as `(x, y, depth)`.
    /// Returns `None` for points behind the camera or outside the frustum.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        if clip.w <= 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

        Some((screen_x, screen_y, ndc.z))
    }
}

/// Convert a screen position (y down) into normalised device coordinates in
/// [-1, 1] with y up, the form the card controller expects for the pointer.
pub fn screen_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Point2<f32> {
    if width <= 0.0 || height <= 0.0 {
        return Point2::origin();
    }
    Point2::new(
        (x / width * 2.0 - 1.0).clamp(-1.0, 1.0),
        (1.0 - y / height * 2.0).clamp(-1.0, 1.0),
    )
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
