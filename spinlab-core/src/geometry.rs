/// Geometry primitives shared by every frontend
use nalgebra::{Point3, Vector3};

/// RGBA color with components in `0.0..=1.0`
pub type Color = [f32; 4];

pub const RED: Color = [0.9, 0.2, 0.2, 1.0];
pub const GREEN: Color = [0.2, 0.8, 0.3, 1.0];
pub const BLUE: Color = [0.2, 0.4, 0.9, 1.0];
pub const YELLOW: Color = [0.9, 0.8, 0.2, 1.0];
pub const MAGENTA: Color = [0.8, 0.3, 0.8, 1.0];
pub const CYAN: Color = [0.2, 0.8, 0.8, 1.0];

/// A 3D vertex with position and color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub color: Color,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, color: Color) -> Self {
        Self {
            position: Point3::new(x, y, z),
            color,
        }
    }
}

/// A triangle face resolved from a mesh's index buffer
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices (counter-clockwise winding)
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// Indexed triangle-list mesh: a vertex buffer plus an index buffer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate the faces described by the index buffer
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.chunks_exact(3).map(move |face| {
            Triangle::new(
                self.vertices[face[0] as usize],
                self.vertices[face[1] as usize],
                self.vertices[face[2] as usize],
            )
        })
    }

    fn push_vertex(&mut self, position: Point3<f32>, color: Color) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(Vertex { position, color });
        index
    }

    /// Append a flat-colored triangle with its own three vertices
    pub fn add_triangle(&mut self, corners: [Point3<f32>; 3], color: Color) {
        for corner in corners {
            let index = self.push_vertex(corner, color);
            self.indices.push(index);
        }
    }

    /// Append a flat-colored quad as two triangles sharing four vertices.
    /// Corners are expected in counter-clockwise order seen from the front.
    pub fn add_quad(&mut self, corners: [Point3<f32>; 4], color: Color) {
        let base = self.vertices.len() as u32;
        for corner in corners {
            self.push_vertex(corner, color);
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// The classic first-demo triangle with a red, green and blue corner
    pub fn triangle() -> Self {
        let mut mesh = Self::with_capacity(3, 3);
        mesh.vertices = vec![
            Vertex::new(-0.5, -0.5, 0.0, RED),
            Vertex::new(0.5, -0.5, 0.0, GREEN),
            Vertex::new(0.0, 0.5, 0.0, BLUE),
        ];
        mesh.indices = vec![0, 1, 2];
        mesh
    }

    /// Axis-aligned cube centered on the origin, one color per face
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let p = Point3::<f32>::new;
        let mut mesh = Self::with_capacity(24, 36);

        // Front
        mesh.add_quad([p(-h, -h, h), p(h, -h, h), p(h, h, h), p(-h, h, h)], RED);
        // Back
        mesh.add_quad([p(h, -h, -h), p(-h, -h, -h), p(-h, h, -h), p(h, h, -h)], GREEN);
        // Top
        mesh.add_quad([p(-h, h, h), p(h, h, h), p(h, h, -h), p(-h, h, -h)], BLUE);
        // Bottom
        mesh.add_quad([p(-h, -h, -h), p(h, -h, -h), p(h, -h, h), p(-h, -h, h)], YELLOW);
        // Right
        mesh.add_quad([p(h, -h, h), p(h, -h, -h), p(h, h, -h), p(h, h, h)], MAGENTA);
        // Left
        mesh.add_quad([p(-h, -h, -h), p(-h, -h, h), p(-h, h, h), p(-h, h, -h)], CYAN);

        mesh
    }

    /// Square-based pyramid with its apex on +Y, one color per face
    pub fn pyramid(size: f32) -> Self {
        let h = size / 2.0;
        let p = Point3::<f32>::new;
        let apex = p(0.0, h, 0.0);
        let mut mesh = Self::with_capacity(16, 18);

        mesh.add_quad([p(-h, -h, -h), p(h, -h, -h), p(h, -h, h), p(-h, -h, h)], YELLOW);
        mesh.add_triangle([p(-h, -h, h), p(h, -h, h), apex], RED);
        mesh.add_triangle([p(h, -h, h), p(h, -h, -h), apex], GREEN);
        mesh.add_triangle([p(h, -h, -h), p(-h, -h, -h), apex], BLUE);
        mesh.add_triangle([p(-h, -h, -h), p(-h, -h, h), apex], MAGENTA);

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_outward(mesh: &Mesh) {
        for triangle in mesh.triangles() {
            let centroid = triangle
                .vertices
                .iter()
                .fold(Vector3::zeros(), |acc, v| acc + v.position.coords)
                / 3.0;
            assert!(
                triangle.calculate_normal().dot(&centroid) > 0.0,
                "inward facing triangle {:?}",
                triangle
            );
        }
    }

    #[test]
    fn test_cube_buffers() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertices.len()));
        assert_outward(&cube);
    }

    #[test]
    fn test_pyramid_buffers() {
        let pyramid = Mesh::pyramid(1.0);
        assert_eq!(pyramid.vertices.len(), 16);
        assert_eq!(pyramid.triangle_count(), 6);
        assert!(pyramid
            .indices
            .iter()
            .all(|&i| (i as usize) < pyramid.vertices.len()));
        assert_outward(&pyramid);
    }

    #[test]
    fn test_triangle_faces_viewer() {
        let triangle = Mesh::triangle();
        let face = triangle.triangles().next().unwrap();
        assert_relative_eq!(face.calculate_normal(), Vector3::z(), epsilon = 1e-6);
        assert_eq!(face.vertices[0].color, RED);
    }
}
