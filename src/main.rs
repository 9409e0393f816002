//! facet: painter's-algorithm software 3D renderer
//!
//! Everything is drawn on the CPU into an RGBA color buffer:
//! - world transform, backface culling, flat directional lighting
//! - perspective projection with average-depth sorting (no z-buffer)
//! - wireframe, filled, and perspective-correct textured triangles
//!
//! Keys 1-6 pick display modes, C/D toggle backface culling, Esc quits.

mod app;
mod config;
mod rasterizer;
mod scene;

use macroquad::prelude::*;

use app::App;
use config::RenderConfig;
use rasterizer::{HEIGHT, WIDTH};

const CONFIG_PATH: &str = "assets/config.ron";

fn window_conf() -> Conf {
    Conf {
        window_title: "facet".to_string(),
        window_width: WIDTH as i32,
        window_height: HEIGHT as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = RenderConfig::load_or_default(CONFIG_PATH);
    let mut app = App::new(&config);

    println!("=== facet ===");
    println!("1-6: display modes | C/D: culling on/off | Esc: quit");

    while app.running {
        app.process_input();

        let triangles = app.update();
        app.render(&triangles);

        // Present: upload the color buffer and stretch it to the window
        let frame = Texture2D::from_rgba8(
            app.framebuffer.width as u16,
            app.framebuffer.height as u16,
            &app.framebuffer.pixels,
        );
        frame.set_filter(FilterMode::Nearest);
        draw_texture_ex(
            &frame,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                ..Default::default()
            },
        );

        next_frame().await;
    }
}
