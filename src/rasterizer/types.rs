//! Core types for the rendering pipeline

use serde::{Serialize, Deserialize};
use super::math::{Vec2, Vec3, Vec4};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };
    pub const YELLOW: Color = Color { r: 255, g: 255, b: 0, a: 255 };
    pub const MAGENTA: Color = Color { r: 255, g: 0, b: 255, a: 255 };
    pub const CYAN: Color = Color { r: 0, g: 255, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack into a 32-bit RGBA word
    pub fn pack(self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | (self.a as u32)
    }

    /// Unpack a 32-bit RGBA word
    pub fn unpack(word: u32) -> Self {
        Self {
            r: (word >> 24) as u8,
            g: (word >> 16) as u8,
            b: (word >> 8) as u8,
            a: word as u8,
        }
    }

    /// RGBA byte order for the framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Scale R, G, B by a factor in [0, 1]; alpha is left untouched.
    pub fn apply_intensity(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * f) as u8,
            g: (self.g as f32 * f) as u8,
            b: (self.b as f32 * f) as u8,
            a: self.a,
        }
    }
}

/// Floor for directional light so faces never go fully black
pub const LIGHT_MIN_INTENSITY: f32 = 0.2;

/// Single directional light, fixed after startup
#[derive(Debug, Clone, Copy)]
pub struct Light {
    pub direction: Vec3,
    pub color: Color,
}

impl Light {
    pub fn new(direction: Vec3, color: Color) -> Self {
        Self { direction, color }
    }

    /// Diffuse intensity for a face normal, clamped to [0.2, 1.0].
    /// The sign flip makes surfaces facing against the light brightest.
    pub fn intensity(&self, normal: Vec3) -> f32 {
        (-normal.dot(self.direction)).clamp(LIGHT_MIN_INTENSITY, 1.0)
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.0, -0.5, 1.0),
            color: Color::WHITE,
        }
    }
}

/// Owned RGBA pixel grid sampled by the textured rasterizer
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
}

impl Texture {
    /// Decode a texture from an image file (PNG and friends)
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, String> {
        use image::GenericImageView;

        let path = path.as_ref();
        let img = image::open(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;

        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
        })
    }

    /// Procedural checkerboard, the fallback when no texture file is set
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 8) + (y / 8)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels }
    }

    /// Nearest-texel sample with wrapping. UVs outside [0, 1) repeat.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let tx = ((u * self.width as f32) as usize) % self.width;
        let ty = ((v * self.height as f32) as usize) % self.height;
        self.pixels[ty * self.width + tx]
    }
}

/// A triangle face: 0-based indices into a vertex list, per-vertex texture
/// coordinates, and one flat color. Index conversion from 1-based formats
/// happens at mesh ingestion, never here.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub a_uv: Vec2,
    pub b_uv: Vec2,
    pub c_uv: Vec2,
    pub color: Color,
}

impl Face {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            a,
            b,
            c,
            a_uv: Vec2::default(),
            b_uv: Vec2::default(),
            c_uv: Vec2::default(),
            color: Color::WHITE,
        }
    }

    pub fn with_uvs(mut self, a_uv: Vec2, b_uv: Vec2, c_uv: Vec2) -> Self {
        self.a_uv = a_uv;
        self.b_uv = b_uv;
        self.c_uv = c_uv;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Render-mode flags, toggled by input between frames
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    pub show_wireframe: bool,
    pub show_filled: bool,
    pub show_textured: bool,
    pub show_vertex_dots: bool,
    pub cull_backfaces: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            show_wireframe: true,
            show_filled: false,
            show_textured: false,
            show_vertex_dots: false,
            cull_backfaces: true,
        }
    }
}

/// A triangle ready for rasterization. Lives for one frame only.
///
/// Points are screen-mapped; x/y are pixel coordinates, w still holds the
/// view-space depth for perspective-correct texture interpolation.
#[derive(Debug, Clone, Copy)]
pub struct RenderTriangle {
    pub points: [Vec4; 3],
    pub texcoords: [Vec2; 3],
    pub color: Color,
    pub avg_depth: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_pack_unpack_roundtrip() {
        let c = Color::with_alpha(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.pack(), 0x12345678);
        assert_eq!(Color::unpack(c.pack()), c);
    }

    #[test]
    fn test_apply_intensity_never_brightens() {
        let c = Color::with_alpha(200, 100, 50, 128);
        for factor in [0.0, 0.2, 0.5, 0.99, 1.0] {
            let lit = c.apply_intensity(factor);
            assert!(lit.r <= c.r);
            assert!(lit.g <= c.g);
            assert!(lit.b <= c.b);
            assert_eq!(lit.a, c.a, "alpha must pass through unscaled");
        }
    }

    #[test]
    fn test_apply_intensity_full_is_identity() {
        let c = Color::new(200, 100, 50);
        assert_eq!(c.apply_intensity(1.0), c);
    }

    #[test]
    fn test_apply_intensity_clamps_factor() {
        let c = Color::new(100, 100, 100);
        assert_eq!(c.apply_intensity(2.0), c);
        assert_eq!(c.apply_intensity(-1.0).r, 0);
    }

    #[test]
    fn test_light_intensity_range() {
        let light = Light::default();
        let dirs = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.3, 0.4, -0.5).normalize(),
        ];
        for n in dirs {
            let i = light.intensity(n);
            assert!((LIGHT_MIN_INTENSITY..=1.0).contains(&i), "intensity {} out of range", i);
        }
    }

    #[test]
    fn test_light_orthogonal_normal_hits_floor() {
        // Light along +z, normal along +x: no diffuse term, floor applies
        let light = Light::new(Vec3::new(0.0, 0.0, 1.0), Color::WHITE);
        let i = light.intensity(Vec3::new(1.0, 0.0, 0.0));
        assert!((i - LIGHT_MIN_INTENSITY).abs() < 1e-6);
    }

    #[test]
    fn test_checkerboard_sample_alternates() {
        let tex = Texture::checkerboard(16, 16, Color::WHITE, Color::BLACK);
        assert_eq!(tex.sample(0.0, 0.0), Color::WHITE);
        assert_eq!(tex.sample(0.5, 0.0), Color::BLACK);
    }

    #[test]
    fn test_sample_wraps_out_of_range() {
        let tex = Texture::checkerboard(16, 16, Color::WHITE, Color::BLACK);
        assert_eq!(tex.sample(1.0, 1.0), tex.sample(0.0, 0.0));
    }
}
