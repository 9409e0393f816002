//! Application state and per-frame orchestration
//!
//! One thread does everything, in order: pace the frame, poll input,
//! animate the mesh, run the geometry pipeline, rasterize, hand the buffer
//! to the presenter. The render list is created and dropped inside a single
//! frame.

use std::time::Duration;

use macroquad::prelude::{get_time, is_key_pressed, KeyCode};

use crate::config::RenderConfig;
use crate::rasterizer::{
    build_render_list, build_world_matrix, draw_render_list, sort_render_list, Color, FrameContext,
    Framebuffer, Light, Mat4, RenderSettings, RenderTriangle, Texture, Vec3,
};
use crate::scene::{load_obj, Mesh};

/// Per-frame rotation increments in radians
const SPIN_X: f32 = 0.003;
const SPIN_Y: f32 = 0.005;

const GRID_SPACING: usize = 10;
const GRID_COLOR: Color = Color { r: 40, g: 40, b: 40, a: 255 };
const CLEAR_COLOR: Color = Color::BLACK;

/// Fallback checkerboard dimensions when no texture file is configured
const FALLBACK_TEXTURE_SIZE: usize = 64;

pub struct App {
    pub framebuffer: Framebuffer,
    pub mesh: Mesh,
    pub texture: Texture,
    pub settings: RenderSettings,
    pub context: FrameContext,
    pub running: bool,
    mesh_distance: f32,
    frame_target: f64,
    previous_frame_time: f64,
}

impl App {
    pub fn new(config: &RenderConfig) -> Self {
        let mesh = match &config.obj_path {
            Some(path) => match load_obj(path) {
                Ok(mesh) => {
                    println!(
                        "Loaded {} ({} vertices, {} faces)",
                        path,
                        mesh.vertices.len(),
                        mesh.faces.len()
                    );
                    mesh
                }
                Err(e) => {
                    eprintln!("Failed to load {}: {} - using built-in cube", path, e);
                    Mesh::cube()
                }
            },
            None => Mesh::cube(),
        };

        let texture = match &config.texture_path {
            Some(path) => match Texture::from_file(path) {
                Ok(tex) => {
                    println!("Loaded texture {} ({}x{})", path, tex.width, tex.height);
                    tex
                }
                Err(e) => {
                    eprintln!("{} - using checkerboard", e);
                    fallback_texture()
                }
            },
            None => fallback_texture(),
        };

        let context = FrameContext {
            projection: Mat4::perspective(config.fov, config.aspect(), config.znear, config.zfar),
            camera_position: Vec3::ZERO,
            light: Light::new(config.light_direction, config.light_color),
            screen_width: config.width as f32,
            screen_height: config.height as f32,
        };

        Self {
            framebuffer: Framebuffer::new(config.width, config.height),
            mesh,
            texture,
            settings: RenderSettings::default(),
            context,
            running: true,
            mesh_distance: config.mesh_distance,
            frame_target: config.frame_target_ms as f64 / 1000.0,
            previous_frame_time: 0.0,
        }
    }

    /// Poll the keyboard once per frame. Number keys pick a display-mode
    /// preset, C/D switch culling, Escape requests shutdown after the
    /// current frame.
    pub fn process_input(&mut self) {
        if is_key_pressed(KeyCode::Escape) {
            self.running = false;
        }
        if is_key_pressed(KeyCode::Key1) {
            apply_display_preset(&mut self.settings, true, true, false, false);
        }
        if is_key_pressed(KeyCode::Key2) {
            apply_display_preset(&mut self.settings, false, true, false, false);
        }
        if is_key_pressed(KeyCode::Key3) {
            apply_display_preset(&mut self.settings, false, false, true, false);
        }
        if is_key_pressed(KeyCode::Key4) {
            apply_display_preset(&mut self.settings, false, true, true, false);
        }
        if is_key_pressed(KeyCode::Key5) {
            apply_display_preset(&mut self.settings, false, false, false, true);
        }
        if is_key_pressed(KeyCode::Key6) {
            apply_display_preset(&mut self.settings, false, true, false, true);
        }
        if is_key_pressed(KeyCode::C) {
            self.settings.cull_backfaces = true;
        }
        if is_key_pressed(KeyCode::D) {
            self.settings.cull_backfaces = false;
        }
    }

    /// Pace the frame, advance the animation, and run the geometry stages.
    /// Returns the sorted render list for this frame.
    pub fn update(&mut self) -> Vec<RenderTriangle> {
        self.pace_frame();

        self.mesh.rotation.x += SPIN_X;
        self.mesh.rotation.y += SPIN_Y;
        self.mesh.translation.z = self.mesh_distance;

        let world = build_world_matrix(self.mesh.scale, self.mesh.rotation, self.mesh.translation);
        let mut triangles = build_render_list(
            &self.mesh.vertices,
            &self.mesh.faces,
            &world,
            &self.context,
            &self.settings,
        );
        sort_render_list(&mut triangles);
        triangles
    }

    /// Rasterize the sorted list into the color buffer
    pub fn render(&mut self, triangles: &[RenderTriangle]) {
        self.framebuffer.clear(CLEAR_COLOR);
        self.framebuffer.draw_grid(GRID_SPACING, GRID_COLOR);
        draw_render_list(&mut self.framebuffer, triangles, &self.texture, &self.settings);
    }

    /// Sleep off the remainder of the frame budget when the previous frame
    /// finished early
    fn pace_frame(&mut self) {
        let elapsed = get_time() - self.previous_frame_time;
        let to_wait = self.frame_target - elapsed;
        if to_wait > 0.0 && to_wait <= self.frame_target {
            std::thread::sleep(Duration::from_secs_f64(to_wait));
        }
        self.previous_frame_time = get_time();
    }
}

fn fallback_texture() -> Texture {
    Texture::checkerboard(
        FALLBACK_TEXTURE_SIZE,
        FALLBACK_TEXTURE_SIZE,
        Color::new(180, 60, 50),
        Color::new(120, 120, 130),
    )
}

/// Set the four display flags together; culling is controlled separately
fn apply_display_preset(
    settings: &mut RenderSettings,
    dots: bool,
    wireframe: bool,
    filled: bool,
    textured: bool,
) {
    settings.show_vertex_dots = dots;
    settings.show_wireframe = wireframe;
    settings.show_filled = filled;
    settings.show_textured = textured;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_preset_leaves_culling_alone() {
        let mut settings = RenderSettings { cull_backfaces: false, ..Default::default() };
        apply_display_preset(&mut settings, false, false, false, true);
        assert!(settings.show_textured);
        assert!(!settings.show_wireframe);
        assert!(!settings.cull_backfaces);
    }
}
