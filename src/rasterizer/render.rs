//! Framebuffer and triangle rasterization
//!
//! Three drawing modes, combinable per frame: wireframe (DDA lines), filled
//! flat-color triangles (flat-top/flat-bottom scanline split), and textured
//! triangles (per-pixel barycentric, perspective-correct sampling). No
//! z-buffer; callers feed triangles painter's-order.

use super::math::{barycentric_weights, Vec2, Vec4};
use super::types::{Color, RenderSettings, RenderTriangle, Texture};

/// Side length of the square drawn for vertex markers
const VERTEX_DOT_SIZE: i32 = 5;

/// Color buffer for software rendering (RGBA, 4 bytes per pixel)
pub struct Framebuffer {
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Plot one pixel; coordinates outside the buffer are ignored
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height {
            let idx = (y as usize * self.width + x as usize) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.pack().to_be_bytes());
        }
    }

    /// Read one pixel back; out-of-bounds reads come back black
    pub fn get_pixel(&self, x: i32, y: i32) -> Color {
        if x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height {
            let idx = (y as usize * self.width + x as usize) * 4;
            let word = u32::from_be_bytes([
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            ]);
            Color::unpack(word)
        } else {
            Color::BLACK
        }
    }

    /// Dotted background grid, one dot every `spacing` pixels
    pub fn draw_grid(&mut self, spacing: usize, color: Color) {
        for y in (0..self.height).step_by(spacing) {
            for x in (0..self.width).step_by(spacing) {
                self.set_pixel(x as i32, y as i32, color);
            }
        }
    }

    /// DDA line: step along the longer axis, advancing the other by its
    /// per-step slope, plotting the rounded pixel each iteration.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs());

        if steps == 0 {
            self.set_pixel(x0, y0, color);
            return;
        }

        let x_inc = dx as f32 / steps as f32;
        let y_inc = dy as f32 / steps as f32;

        let mut x = x0 as f32;
        let mut y = y0 as f32;
        for _ in 0..=steps {
            self.set_pixel(x.round() as i32, y.round() as i32, color);
            x += x_inc;
            y += y_inc;
        }
    }

    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        for row in y..y + h {
            for col in x..x + w {
                self.set_pixel(col, row, color);
            }
        }
    }

    /// Wireframe triangle: three lines between the screen points
    pub fn draw_triangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        self.draw_line(x0, y0, x1, y1, color);
        self.draw_line(x1, y1, x2, y2, color);
        self.draw_line(x2, y2, x0, y0, color);
    }

    fn fill_span(&mut self, x_start: i32, x_end: i32, y: i32, color: Color) {
        let (lo, hi) = if x_start <= x_end { (x_start, x_end) } else { (x_end, x_start) };
        for x in lo..=hi {
            self.set_pixel(x, y, color);
        }
    }

    /// Flat-bottom half: apex (x0, y0), bottom edge at y1 == y2
    fn fill_flat_bottom(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        // Zero-height edges contribute a zero inverse slope
        let inv_slope_1 = if y1 != y0 { (x1 - x0) as f32 / (y1 - y0) as f32 } else { 0.0 };
        let inv_slope_2 = if y2 != y0 { (x2 - x0) as f32 / (y2 - y0) as f32 } else { 0.0 };

        let mut x_start = x0 as f32;
        let mut x_end = x0 as f32;
        for y in y0..=y2 {
            self.fill_span(x_start.round() as i32, x_end.round() as i32, y, color);
            x_start += inv_slope_1;
            x_end += inv_slope_2;
        }
    }

    /// Flat-top half: top edge at y0 == y1, apex (x2, y2)
    fn fill_flat_top(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        let inv_slope_1 = if y2 != y0 { (x2 - x0) as f32 / (y2 - y0) as f32 } else { 0.0 };
        let inv_slope_2 = if y2 != y1 { (x2 - x1) as f32 / (y2 - y1) as f32 } else { 0.0 };

        let mut x_start = x2 as f32;
        let mut x_end = x2 as f32;
        for y in (y0..=y2).rev() {
            self.fill_span(x_start.round() as i32, x_end.round() as i32, y, color);
            x_start -= inv_slope_1;
            x_end -= inv_slope_2;
        }
    }

    /// Filled flat-color triangle via flat-top/flat-bottom decomposition
    pub fn draw_filled_triangle(
        &mut self,
        mut x0: i32, mut y0: i32,
        mut x1: i32, mut y1: i32,
        mut x2: i32, mut y2: i32,
        color: Color,
    ) {
        // Sort by ascending y
        if y0 > y1 {
            std::mem::swap(&mut y0, &mut y1);
            std::mem::swap(&mut x0, &mut x1);
        }
        if y1 > y2 {
            std::mem::swap(&mut y1, &mut y2);
            std::mem::swap(&mut x1, &mut x2);
        }
        if y0 > y1 {
            std::mem::swap(&mut y0, &mut y1);
            std::mem::swap(&mut x0, &mut x1);
        }

        if y1 == y2 {
            self.fill_flat_bottom(x0, y0, x1, y1, x2, y2, color);
        } else if y0 == y1 {
            self.fill_flat_top(x0, y0, x1, y1, x2, y2, color);
        } else {
            // Synthesized midpoint splits the triangle at y1
            let my = y1;
            let mx = (x2 - x0) * (y1 - y0) / (y2 - y0) + x0;
            self.fill_flat_bottom(x0, y0, x1, y1, mx, my, color);
            self.fill_flat_top(x1, y1, mx, my, x2, y2, color);
        }
    }

    /// One perspective-correct textured pixel. Interpolates u/w, v/w and
    /// 1/w by barycentric weight, then divides to recover true (u, v).
    pub fn draw_texel(
        &mut self,
        x: i32,
        y: i32,
        a: Vec4,
        b: Vec4,
        c: Vec4,
        a_uv: Vec2,
        b_uv: Vec2,
        c_uv: Vec2,
        texture: &Texture,
    ) {
        let p = Vec2::new(x as f32, y as f32);
        let weights = match barycentric_weights(a.to_vec2(), b.to_vec2(), c.to_vec2(), p) {
            Some(w) => w,
            None => return,
        };
        let (alpha, beta, gamma) = (weights.x, weights.y, weights.z);

        // w carries view-space depth; a vertex at the camera plane is
        // degenerate and the pixel is skipped
        if a.w.abs() < 1e-6 || b.w.abs() < 1e-6 || c.w.abs() < 1e-6 {
            return;
        }

        let interp_u = (a_uv.x / a.w) * alpha + (b_uv.x / b.w) * beta + (c_uv.x / c.w) * gamma;
        let interp_v = (a_uv.y / a.w) * alpha + (b_uv.y / b.w) * beta + (c_uv.y / c.w) * gamma;
        let interp_inv_w = alpha / a.w + beta / b.w + gamma / c.w;

        if interp_inv_w.abs() < 1e-6 {
            return;
        }

        let u = interp_u / interp_inv_w;
        let v = interp_v / interp_inv_w;

        self.set_pixel(x, y, texture.sample(u, v));
    }

    /// Textured triangle: same scanline decomposition as the filled path,
    /// sampling per pixel through [`Framebuffer::draw_texel`].
    pub fn draw_textured_triangle(&mut self, points: [Vec4; 3], texcoords: [Vec2; 3], texture: &Texture) {
        let mut verts: [(Vec4, Vec2); 3] = [
            (points[0], texcoords[0]),
            (points[1], texcoords[1]),
            (points[2], texcoords[2]),
        ];
        verts.sort_by(|p, q| p.0.y.total_cmp(&q.0.y));

        let (a, a_uv) = verts[0];
        let (b, b_uv) = verts[1];
        let (c, c_uv) = verts[2];

        let (x0, y0) = (a.x as i32, a.y as i32);
        let (x1, y1) = (b.x as i32, b.y as i32);
        let (x2, y2) = (c.x as i32, c.y as i32);

        // Upper half (flat bottom at y1)
        let inv_slope_1 = if y1 != y0 { (x1 - x0) as f32 / (y1 - y0).abs() as f32 } else { 0.0 };
        let inv_slope_2 = if y2 != y0 { (x2 - x0) as f32 / (y2 - y0).abs() as f32 } else { 0.0 };

        if y1 != y0 {
            for y in y0..=y1 {
                let x_start = x1 + ((y - y1) as f32 * inv_slope_1) as i32;
                let x_end = x0 + ((y - y0) as f32 * inv_slope_2) as i32;
                let (lo, hi) = if x_start <= x_end { (x_start, x_end) } else { (x_end, x_start) };
                for x in lo..hi {
                    self.draw_texel(x, y, a, b, c, a_uv, b_uv, c_uv, texture);
                }
            }
        }

        // Lower half (flat top at y1)
        let inv_slope_1 = if y2 != y1 { (x2 - x1) as f32 / (y2 - y1).abs() as f32 } else { 0.0 };

        if y2 != y1 {
            for y in y1..=y2 {
                let x_start = x1 + ((y - y1) as f32 * inv_slope_1) as i32;
                let x_end = x0 + ((y - y0) as f32 * inv_slope_2) as i32;
                let (lo, hi) = if x_start <= x_end { (x_start, x_end) } else { (x_end, x_start) };
                for x in lo..hi {
                    self.draw_texel(x, y, a, b, c, a_uv, b_uv, c_uv, texture);
                }
            }
        }
    }
}

/// Draw a sorted render list under the active mode flags. Fill and texture
/// layers go down first, then wireframe, then vertex markers on top.
pub fn draw_render_list(
    fb: &mut Framebuffer,
    triangles: &[RenderTriangle],
    texture: &Texture,
    settings: &RenderSettings,
) {
    for tri in triangles {
        let [a, b, c] = tri.points;

        if settings.show_filled {
            fb.draw_filled_triangle(
                a.x as i32, a.y as i32,
                b.x as i32, b.y as i32,
                c.x as i32, c.y as i32,
                tri.color,
            );
        }

        if settings.show_textured {
            fb.draw_textured_triangle(tri.points, tri.texcoords, texture);
        }

        if settings.show_wireframe {
            fb.draw_triangle(
                a.x as i32, a.y as i32,
                b.x as i32, b.y as i32,
                c.x as i32, c.y as i32,
                Color::WHITE,
            );
        }

        if settings.show_vertex_dots {
            let half = VERTEX_DOT_SIZE / 2;
            for p in tri.points {
                fb.draw_rect(
                    p.x as i32 - half,
                    p.y as i32 - half,
                    VERTEX_DOT_SIZE,
                    VERTEX_DOT_SIZE,
                    Color::RED,
                );
            }
        }
    }
}
