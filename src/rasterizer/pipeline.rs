//! Per-frame geometry pipeline: transform, cull, light, project, sort.
//!
//! Consumes mesh data and produces the frame's render list. The stages run
//! in a fixed order per face: world transform, backface test, flat lighting,
//! perspective projection, screen mapping, average-depth bookkeeping.

use super::math::{Mat4, Vec3, Vec4};
use super::types::{Face, Light, RenderSettings, RenderTriangle};

/// Immutable per-frame inputs shared by every pipeline stage
pub struct FrameContext {
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub light: Light,
    pub screen_width: f32,
    pub screen_height: f32,
}

/// Compose the world matrix: scale first, then rotate about X, Y, Z,
/// then translate. Reordering changes the rotation semantics.
pub fn build_world_matrix(scale: Vec3, rotation: Vec3, translation: Vec3) -> Mat4 {
    Mat4::translation(translation.x, translation.y, translation.z)
        * Mat4::rotation_z(rotation.z)
        * Mat4::rotation_y(rotation.y)
        * Mat4::rotation_x(rotation.x)
        * Mat4::scale(scale.x, scale.y, scale.z)
}

/// Map a perspective-divided point to pixel coordinates. The projection
/// comes out with both axes inverted relative to the screen, so scale to
/// half-resolution, negate, and recenter. z and w pass through untouched.
pub fn map_to_screen(p: Vec4, width: f32, height: f32) -> Vec4 {
    let mut out = p;
    out.x *= width / 2.0;
    out.y *= height / 2.0;
    out.x = -out.x;
    out.y = -out.y;
    out.x += width / 2.0;
    out.y += height / 2.0;
    out
}

/// Run the geometry stages over every face and collect the surviving
/// triangles. The returned list is unsorted; see [`sort_render_list`].
pub fn build_render_list(
    vertices: &[Vec3],
    faces: &[Face],
    world: &Mat4,
    ctx: &FrameContext,
    settings: &RenderSettings,
) -> Vec<RenderTriangle> {
    let mut triangles = Vec::with_capacity(faces.len());

    for face in faces {
        let face_vertices = [vertices[face.a], vertices[face.b], vertices[face.c]];

        let transformed = face_vertices.map(|v| *world * Vec4::from_vec3(v));

        // Face normal from normalized edges AB and AC
        let a = transformed[0].to_vec3();
        let b = transformed[1].to_vec3();
        let c = transformed[2].to_vec3();
        let ab = (b - a).normalize();
        let ac = (c - a).normalize();
        let normal = ab.cross(ac).normalize();

        let camera_ray = ctx.camera_position - a;
        if settings.cull_backfaces && normal.dot(camera_ray) < 0.0 {
            continue;
        }

        let color = face.color.apply_intensity(ctx.light.intensity(normal));

        let points = transformed.map(|v| {
            map_to_screen(ctx.projection.project(v), ctx.screen_width, ctx.screen_height)
        });

        // Pre-projection depth, used only for ordering
        let avg_depth = (transformed[0].z + transformed[1].z + transformed[2].z) / 3.0;

        triangles.push(RenderTriangle {
            points,
            texcoords: [face.a_uv, face.b_uv, face.c_uv],
            color,
            avg_depth,
        });
    }

    triangles
}

/// Painter's algorithm ordering: farthest triangles first so nearer ones
/// overwrite them. Ties land in unspecified order.
pub fn sort_render_list(triangles: &mut [RenderTriangle]) {
    triangles.sort_unstable_by(|a, b| b.avg_depth.total_cmp(&a.avg_depth));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::Vec2;
    use crate::rasterizer::types::{Color, LIGHT_MIN_INTENSITY};

    const EPS: f32 = 1e-4;

    fn test_context() -> FrameContext {
        let width = 800.0;
        let height = 600.0;
        FrameContext {
            projection: Mat4::perspective(
                std::f32::consts::FRAC_PI_3,
                height / width,
                0.1,
                100.0,
            ),
            camera_position: Vec3::ZERO,
            light: Light::new(Vec3::new(0.0, 0.0, 1.0), Color::WHITE),
            screen_width: width,
            screen_height: height,
        }
    }

    /// One triangle at z=5, wound so its normal faces the camera at origin
    fn facing_triangle() -> (Vec<Vec3>, Vec<Face>) {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 1.0, 5.0),
            Vec3::new(1.0, 0.0, 5.0),
        ];
        let faces = vec![Face::new(0, 1, 2).with_color(Color::new(100, 100, 100))];
        (vertices, faces)
    }

    #[test]
    fn test_world_matrix_rotates_before_translating() {
        let world = build_world_matrix(
            Vec3::ONE,
            Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2),
            Vec3::new(10.0, 0.0, 0.0),
        );
        let p = world * Vec4::from_vec3(Vec3::new(1.0, 0.0, 0.0));
        assert!((p.x - 10.0).abs() < EPS, "rotation must apply before translation");
        assert!((p.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_screen_mapping_centers_ndc_origin() {
        let p = map_to_screen(Vec4::new(0.0, 0.0, 0.5, 5.0), 800.0, 600.0);
        assert_eq!((p.x, p.y), (400.0, 300.0));
        assert_eq!((p.z, p.w), (0.5, 5.0));
    }

    #[test]
    fn test_screen_mapping_flips_both_axes() {
        // NDC (+1, +1) lands at the top-left corner after the flip
        let p = map_to_screen(Vec4::new(1.0, 1.0, 0.0, 1.0), 800.0, 600.0);
        assert_eq!((p.x, p.y), (0.0, 0.0));
    }

    #[test]
    fn test_single_face_scenario() {
        let (vertices, faces) = facing_triangle();
        // The triangle's normal is (0, 0, -1); light along +x is orthogonal
        let mut ctx = test_context();
        ctx.light = Light::new(Vec3::new(1.0, 0.0, 0.0), Color::WHITE);
        let world = build_world_matrix(Vec3::ONE, Vec3::ZERO, Vec3::ZERO);
        let list = build_render_list(&vertices, &faces, &world, &ctx, &RenderSettings::default());

        assert_eq!(list.len(), 1);
        assert!((list[0].avg_depth - 5.0).abs() < EPS);

        // Light direction is orthogonal to the face normal, so the
        // intensity floor applies: channels scale by exactly 0.2
        let expected = (100.0 * LIGHT_MIN_INTENSITY) as u8;
        assert_eq!(list[0].color, Color::new(expected, expected, expected));
    }

    #[test]
    fn test_culling_drops_back_winding() {
        let (vertices, mut faces) = facing_triangle();
        // Reverse the winding so the normal points away from the camera
        let f = faces[0];
        faces[0] = Face::new(f.a, f.c, f.b).with_color(f.color);

        let ctx = test_context();
        let world = build_world_matrix(Vec3::ONE, Vec3::ZERO, Vec3::ZERO);

        let culled = build_render_list(&vertices, &faces, &world, &ctx, &RenderSettings::default());
        assert!(culled.is_empty());

        let settings = RenderSettings { cull_backfaces: false, ..Default::default() };
        let kept = build_render_list(&vertices, &faces, &world, &ctx, &settings);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_half_turn_about_y_toggles_visibility() {
        // Triangle near the origin, pushed out to z=5 by the world matrix
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ];
        let faces = vec![Face::new(0, 1, 2)];
        let ctx = test_context();
        let settings = RenderSettings::default();

        let world = build_world_matrix(Vec3::ONE, Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0));
        let before = build_render_list(&vertices, &faces, &world, &ctx, &settings);

        let world = build_world_matrix(
            Vec3::ONE,
            Vec3::new(0.0, std::f32::consts::PI, 0.0),
            Vec3::new(0.0, 0.0, 5.0),
        );
        let after = build_render_list(&vertices, &faces, &world, &ctx, &settings);

        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 0, "flipped winding must be culled");
    }

    #[test]
    fn test_uvs_carried_through_unchanged() {
        let (vertices, mut faces) = facing_triangle();
        faces[0] = faces[0].with_uvs(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        );
        let ctx = test_context();
        let world = build_world_matrix(Vec3::ONE, Vec3::ZERO, Vec3::ZERO);
        let list = build_render_list(&vertices, &faces, &world, &ctx, &RenderSettings::default());
        assert_eq!(list[0].texcoords[2], Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_sort_is_farthest_first() {
        let mk = |depth: f32| RenderTriangle {
            points: [Vec4::default(); 3],
            texcoords: [Vec2::default(); 3],
            color: Color::WHITE,
            avg_depth: depth,
        };
        let mut list = vec![mk(1.0), mk(7.5), mk(3.0), mk(7.5), mk(-2.0)];
        sort_render_list(&mut list);
        for pair in list.windows(2) {
            assert!(pair[0].avg_depth >= pair[1].avg_depth);
        }
    }
}
