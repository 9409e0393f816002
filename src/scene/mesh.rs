//! Mesh data model
//!
//! Pure data: a vertex list, a face list, and the per-frame transform
//! vectors the animation loop mutates. All pipeline logic lives in the
//! rasterizer module.

use crate::rasterizer::{Color, Face, Vec2, Vec3};

/// Triangulated geometry plus its current model transform
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub translation: Vec3,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self {
            vertices,
            faces,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            translation: Vec3::ZERO,
        }
    }

    /// Built-in unit cube: 8 vertices, 12 faces, one color per side.
    /// The fallback model when no OBJ file is configured.
    pub fn cube() -> Self {
        let vertices = vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ];

        // Each side is two triangles sharing the same color and the same
        // square UV mapping
        let sides: [(usize, usize, usize, usize, usize, usize, Color); 6] = [
            (0, 1, 2, 0, 2, 3, Color::RED),    // front
            (3, 2, 4, 3, 4, 5, Color::GREEN),  // right
            (5, 4, 6, 5, 6, 7, Color::BLUE),   // back
            (7, 6, 1, 7, 1, 0, Color::YELLOW), // left
            (1, 6, 4, 1, 4, 2, Color::MAGENTA), // top
            (5, 7, 0, 5, 0, 3, Color::CYAN),   // bottom
        ];

        let uv_first = (Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0));
        let uv_second = (Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0));

        let mut faces = Vec::with_capacity(12);
        for (a0, b0, c0, a1, b1, c1, color) in sides {
            faces.push(
                Face::new(a0, b0, c0)
                    .with_uvs(uv_first.0, uv_first.1, uv_first.2)
                    .with_color(color),
            );
            faces.push(
                Face::new(a1, b1, c1)
                    .with_uvs(uv_second.0, uv_second.1, uv_second.2)
                    .with_color(color),
            );
        }

        Self::new(vertices, faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_shape() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.faces.len(), 12);
    }

    #[test]
    fn test_cube_indices_in_range() {
        let cube = Mesh::cube();
        for face in &cube.faces {
            assert!(face.a < cube.vertices.len());
            assert!(face.b < cube.vertices.len());
            assert!(face.c < cube.vertices.len());
        }
    }

    #[test]
    fn test_new_mesh_has_identity_transform() {
        let mesh = Mesh::new(vec![], vec![]);
        assert_eq!(mesh.scale, Vec3::ONE);
        assert_eq!(mesh.rotation, Vec3::ZERO);
        assert_eq!(mesh.translation, Vec3::ZERO);
    }
}
