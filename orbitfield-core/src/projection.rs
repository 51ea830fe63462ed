/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Perspective camera that always looks down -Z from its position.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: Point3::new(0.0, 0.0, 6.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: 35f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        };
        camera.resize(width, height, 1.0);
        camera
    }

    /// Recompute the aspect ratio for a viewport of `width x height` cells,
    /// where each cell is `cell_aspect` times as wide as it is tall.
    pub fn resize(&mut self, width: u32, height: u32, cell_aspect: f32) {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        self.aspect = width / height * cell_aspect;
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let target = self.position - Vector3::z();
        Matrix4::look_at_rh(&self.position, &target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a 3D point to 2D screen space
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.view_projection() * model_matrix;
        self.project_with(&mvp, point, width, height)
    }

    /// Project through a precomputed model-view-projection matrix.
    ///
    /// Returns `(screen_x, screen_y, depth)` with depth in NDC, or `None` for
    /// points in front of the near plane.
    pub fn project_with(
        &self,
        mvp: &Matrix4<f32>,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let clip = mvp * point.to_homogeneous();

        // w is the view-space distance along the viewing axis
        if clip.w < self.near {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        // Convert to screen space
        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 6.0));
    }

    #[test]
    fn test_resize_with_cell_aspect() {
        let mut camera = Camera::new(800, 600);
        camera.resize(120, 40, 0.5);
        assert!((camera.aspect - 1.5).abs() < 1e-6);

        camera.resize(0, 0, 1.0);
        assert!((camera.aspect - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(800, 600);
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_point_ahead_projects_to_centre() {
        let camera = Camera::new(800, 600);
        let (x, y, depth) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 800, 600)
            .unwrap();
        assert!((x - 400.0).abs() < 1e-3);
        assert!((y - 300.0).abs() < 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let camera = Camera::new(800, 600);
        let behind = Point3::new(0.0, 0.0, 10.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 800, 600)
            .is_none());
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let camera = Camera::new(800, 600);
        let identity = Matrix4::identity();
        let (_, _, near) = camera
            .project_to_screen(&Point3::new(0.0, 0.0, 2.0), &identity, 800, 600)
            .unwrap();
        let (_, _, far) = camera
            .project_to_screen(&Point3::new(0.0, 0.0, -5.0), &identity, 800, 600)
            .unwrap();
        assert!(near < far);
    }
}
