/// Depth-buffered software rasterizer shared by the terminal and web front ends
use nalgebra::{Matrix4, Point3};

use crate::geometry::{Mesh, Triangle};
use crate::material::{shade, DirectionalLight, Material};
use crate::projection::Camera;

/// What ended up in one framebuffer cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shade {
    Empty,
    /// Lit mesh surface with brightness in [0, 1]
    Surface(f32),
    Particle,
}

/// Grid of shaded cells plus the depth buffer used to resolve them.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Shade>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![Shade::Empty; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[Shade] {
        &self.cells
    }

    /// Cell at column `x`, row `y`; `None` outside the buffer.
    pub fn cell(&self, x: usize, y: usize) -> Option<Shade> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x).copied()
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(Shade::Empty);
    }

    /// Rasterize every triangle of `mesh` placed by `model_matrix`.
    pub fn draw_mesh(
        &mut self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        material: &Material,
        light: &DirectionalLight,
    ) {
        let view_projection = camera.view_projection();
        for triangle in &mesh.triangles {
            self.draw_triangle(triangle, model_matrix, &view_projection, camera, material, light);
        }
    }

    fn draw_triangle(
        &mut self,
        triangle: &Triangle,
        model_matrix: &Matrix4<f32>,
        view_projection: &Matrix4<f32>,
        camera: &Camera,
        material: &Material,
        light: &DirectionalLight,
    ) {
        let world = triangle
            .vertices
            .map(|vertex| model_matrix.transform_point(&vertex.position));

        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, point) in screen_coords.iter_mut().zip(&world) {
            match camera.project_with(
                view_projection,
                point,
                self.width as u32,
                self.height as u32,
            ) {
                Some(coords) => *slot = coords,
                None => return, // Triangle crosses the near plane
            }
        }

        let normal = model_matrix
            .transform_vector(&triangle.vertices[0].normal)
            .normalize();
        let centroid = Point3::from((world[0].coords + world[1].coords + world[2].coords) / 3.0);
        let Some(to_eye) = (camera.position - centroid).try_normalize(1e-12) else {
            return;
        };

        let brightness = shade(material, light, &normal, &to_eye);
        self.rasterize_triangle(&screen_coords, Shade::Surface(brightness));
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], shade: Shade) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x as usize, y as usize, depth, shade);
                    }
                }
            }
        }
    }

    /// Depth-test each point and mark its cell as a particle.
    pub fn draw_points(&mut self, points: &[Point3<f32>], camera: &Camera) {
        let view_projection = camera.view_projection();
        for point in points {
            let Some((x, y, depth)) =
                camera.project_with(&view_projection, point, self.width as u32, self.height as u32)
            else {
                continue;
            };
            if x < 0.0 || y < 0.0 || depth > 1.0 {
                continue;
            }
            let (x, y) = (x as usize, y as usize);
            if x < self.width && y < self.height {
                self.plot(x, y, depth, Shade::Particle);
            }
        }
    }

    fn plot(&mut self, x: usize, y: usize, depth: f32, shade: Shade) {
        let idx = y * self.width + x;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.cells[idx] = shade;
        }
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
