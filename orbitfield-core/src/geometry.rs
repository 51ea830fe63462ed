/// Geometry primitives for 3D rendering
use nalgebra::{Point3, Vector3};
use std::f32::consts::TAU;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    /// Build a flat-shaded triangle: every vertex carries the face normal.
    pub fn flat(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        let normal = face_normal(&a, &b, &c);
        Self {
            vertices: [
                Vertex::new(a, normal),
                Vertex::new(b, normal),
                Vertex::new(c, normal),
            ],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        face_normal(
            &self.vertices[0].position,
            &self.vertices[1].position,
            &self.vertices[2].position,
        )
    }
}

fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    // Degenerate slivers fall back to +Z so shading never sees NaN.
    edge1
        .cross(&edge2)
        .try_normalize(1e-12)
        .unwrap_or_else(Vector3::z)
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Ring torus lying in the XY plane.
    ///
    /// `radius` is the distance from the centre to the middle of the tube,
    /// `radial_segments` subdivide the tube cross-section and
    /// `tubular_segments` subdivide the ring.
    pub fn torus(radius: f32, tube: f32, radial_segments: usize, tubular_segments: usize) -> Self {
        sweep(tubular_segments, radial_segments, |i, j| {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let v = j as f32 / radial_segments as f32 * TAU;
            let ring = radius + tube * v.cos();
            Point3::new(ring * u.cos(), ring * u.sin(), tube * v.sin())
        })
    }

    /// (p, q) torus knot: a tube swept along a curve that winds `p` times
    /// around the axis of rotational symmetry and `q` times around the
    /// interior circle.
    pub fn torus_knot(
        radius: f32,
        tube: f32,
        tubular_segments: usize,
        radial_segments: usize,
        p: u32,
        q: u32,
    ) -> Self {
        let curve = |u: f32| -> Vector3<f32> {
            let q_over_p = q as f32 / p as f32 * u;
            let cs = q_over_p.cos();
            Vector3::new(
                radius * (2.0 + cs) * 0.5 * u.cos(),
                radius * (2.0 + cs) * 0.5 * u.sin(),
                radius * q_over_p.sin() * 0.5,
            )
        };

        sweep(tubular_segments, radial_segments, |i, j| {
            let u = i as f32 / tubular_segments as f32 * p as f32 * TAU;
            let v = j as f32 / radial_segments as f32 * TAU;

            // Frenet-like frame from two samples along the curve
            let p1 = curve(u);
            let p2 = curve(u + 0.01);
            let tangent = p2 - p1;
            let mut normal = p2 + p1;
            let binormal = tangent.cross(&normal).normalize();
            normal = binormal.cross(&tangent).normalize();

            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            Point3::from(p1 + normal * cx + binormal * cy)
        })
    }

    /// Regular octahedron with its vertices on a sphere of `radius`.
    pub fn octahedron(radius: f32) -> Self {
        const VERTICES: [[f32; 3]; 6] = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        const FACES: [[usize; 3]; 8] = [
            [0, 2, 4],
            [0, 4, 3],
            [0, 3, 5],
            [0, 5, 2],
            [1, 2, 5],
            [1, 5, 3],
            [1, 3, 4],
            [1, 4, 2],
        ];
        polyhedron(&VERTICES, &FACES, radius)
    }

    /// Regular icosahedron with its vertices on a sphere of `radius`.
    pub fn icosahedron(radius: f32) -> Self {
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let vertices = [
            [-1.0, t, 0.0],
            [1.0, t, 0.0],
            [-1.0, -t, 0.0],
            [1.0, -t, 0.0],
            [0.0, -1.0, t],
            [0.0, 1.0, t],
            [0.0, -1.0, -t],
            [0.0, 1.0, -t],
            [t, 0.0, -1.0],
            [t, 0.0, 1.0],
            [-t, 0.0, -1.0],
            [-t, 0.0, 1.0],
        ];
        const FACES: [[usize; 3]; 20] = [
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];
        polyhedron(&vertices, &FACES, radius)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// The four shapes that orbit the scene, in phase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Torus,
    Octahedron,
    TorusKnot,
    Icosahedron,
}

impl Primitive {
    pub const ALL: [Primitive; 4] = [
        Primitive::Torus,
        Primitive::Octahedron,
        Primitive::TorusKnot,
        Primitive::Icosahedron,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Torus => "torus",
            Primitive::Octahedron => "octahedron",
            Primitive::TorusKnot => "torus-knot",
            Primitive::Icosahedron => "icosahedron",
        }
    }

    pub fn mesh(self) -> Mesh {
        match self {
            Primitive::Torus => Mesh::torus(1.0, 0.4, 16, 60),
            Primitive::Octahedron => Mesh::octahedron(1.0),
            Primitive::TorusKnot => Mesh::torus_knot(0.8, 0.35, 100, 16, 2, 3),
            Primitive::Icosahedron => Mesh::icosahedron(1.0),
        }
    }
}

/// Triangulate a `(rows + 1) x (cols + 1)` parametric grid into quads.
fn sweep(rows: usize, cols: usize, point: impl Fn(usize, usize) -> Point3<f32>) -> Mesh {
    let stride = cols + 1;
    let grid: Vec<Point3<f32>> = (0..=rows)
        .flat_map(|i| (0..=cols).map(move |j| (i, j)))
        .map(|(i, j)| point(i, j))
        .collect();

    let mut mesh = Mesh::with_capacity(rows * cols * 2);
    for i in 0..rows {
        for j in 0..cols {
            let a = grid[i * stride + j];
            let b = grid[(i + 1) * stride + j];
            let c = grid[(i + 1) * stride + j + 1];
            let d = grid[i * stride + j + 1];
            mesh.add_triangle(Triangle::flat(a, b, d));
            mesh.add_triangle(Triangle::flat(b, c, d));
        }
    }
    mesh
}

fn polyhedron(vertices: &[[f32; 3]], faces: &[[usize; 3]], radius: f32) -> Mesh {
    let points: Vec<Point3<f32>> = vertices
        .iter()
        .map(|&[x, y, z]| Point3::from(Vector3::new(x, y, z).normalize() * radius))
        .collect();

    let mut mesh = Mesh::with_capacity(faces.len());
    for &[a, b, c] in faces {
        mesh.add_triangle(Triangle::flat(points[a], points[b], points[c]));
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_triangle_counts() {
        assert_eq!(Primitive::Torus.mesh().triangles.len(), 2 * 16 * 60);
        assert_eq!(Primitive::Octahedron.mesh().triangles.len(), 8);
        assert_eq!(Primitive::TorusKnot.mesh().triangles.len(), 2 * 100 * 16);
        assert_eq!(Primitive::Icosahedron.mesh().triangles.len(), 20);
    }

    #[test]
    fn test_polyhedra_vertices_on_sphere() {
        for mesh in [Mesh::octahedron(1.5), Mesh::icosahedron(1.5)] {
            for triangle in &mesh.triangles {
                for vertex in &triangle.vertices {
                    assert!((vertex.position.coords.norm() - 1.5).abs() < 1e-5);
                }
            }
        }
    }

    #[test]
    fn test_torus_vertices_on_tube() {
        let mesh = Mesh::torus(1.0, 0.4, 8, 12);
        for triangle in &mesh.triangles {
            for vertex in &triangle.vertices {
                let p = vertex.position;
                let ring = (p.x * p.x + p.y * p.y).sqrt() - 1.0;
                let distance = (ring * ring + p.z * p.z).sqrt();
                assert!((distance - 0.4).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_flat_normals_are_unit_length() {
        for primitive in Primitive::ALL {
            for triangle in &primitive.mesh().triangles {
                let n = triangle.vertices[0].normal;
                assert!((n.norm() - 1.0).abs() < 1e-4, "{}", primitive.name());
                assert_eq!(n, triangle.vertices[2].normal);
            }
        }
    }

    #[test]
    fn test_degenerate_triangle_normal() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let triangle = Triangle::flat(p, p, p);
        assert_eq!(triangle.calculate_normal(), Vector3::z());
    }
}
