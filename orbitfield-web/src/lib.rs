/// orbitfield Web - the orbiting-shapes scene for browser canvases
///
/// `WebScene` is the handle a page drives directly; `start` wires one up to a
/// canvas with window listeners and an animation-frame loop.
use orbitfield_core::{panel, FrameBuffer, FrameClock, Rgb, Scene, SceneConfig};
use wasm_bindgen::prelude::*;

pub mod pixels;

#[cfg(target_arch = "wasm32")]
mod app;

#[cfg(target_arch = "wasm32")]
pub use app::start;

/// Device pixels per framebuffer cell; the canvas is stretched by CSS.
pub const RENDER_SCALE: f64 = 2.0;

/// CSS pixels covered by one framebuffer cell at `device_pixel_ratio`.
/// Re-read on every resize, since the ratio changes with zoom and monitor.
pub fn cell_css_size(device_pixel_ratio: f64) -> f64 {
    let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    RENDER_SCALE / ratio
}

/// Framebuffer extent for a CSS length, never zero.
pub fn buffer_extent(css_pixels: f64, device_pixel_ratio: f64) -> u32 {
    let cells = css_pixels / cell_css_size(device_pixel_ratio);
    if cells.is_finite() {
        (cells as u32).max(1)
    } else {
        1
    }
}

#[wasm_bindgen]
pub struct WebScene {
    scene: Scene,
    frame: FrameBuffer,
    clock: FrameClock,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl WebScene {
    /// Stock scene for a `width x height` pixel buffer.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> WebScene {
        Self::build(&SceneConfig::default(), width, height)
    }

    /// Scene built from a TOML config string.
    pub fn with_config(config: &str, width: u32, height: u32) -> Result<WebScene, JsValue> {
        let config = SceneConfig::from_toml(config).map_err(to_js)?;
        Ok(Self::build(&config, width, height))
    }

    pub fn width(&self) -> u32 {
        self.frame.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.frame.height() as u32
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.on_resize(width, height);
        self.frame.resize(width as usize, height as usize);
    }

    /// Wheel event `deltaY`.
    pub fn wheel(&mut self, delta_y: f32) {
        self.scene.on_wheel(delta_y);
    }

    /// Pointer position in buffer pixels.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.scene.on_pointer_move(x, y);
    }

    /// Advance and draw one frame; `now_ms` is a `performance.now()` stamp.
    pub fn frame(&mut self, now_ms: f64) {
        let dt = self.clock.delta(now_ms / 1000.0);
        self.scene.frame(dt);
        self.scene.render(&mut self.frame);
        pixels::write_rgba(
            &self.frame,
            self.scene.material.color,
            self.scene.particles.color,
            &mut self.pixels,
        );
    }

    /// RGBA bytes of the last frame, row-major.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixel_slice().to_vec()
    }

    pub fn color(&self) -> String {
        self.scene.material.color.to_string()
    }

    /// Set the material color from `#rrggbb`.
    pub fn set_color(&mut self, hex: &str) -> Result<(), JsValue> {
        let color: Rgb = hex.parse().map_err(to_js)?;
        self.scene.material.color = color;
        tracing::debug!(%color, "material color set");
        Ok(())
    }

    pub fn metalness(&self) -> f32 {
        self.scene.material.metalness
    }

    /// Set metalness, clamped to [0, 1] in steps of 0.01.
    pub fn set_metalness(&mut self, value: f32) {
        panel::set_metalness(&mut self.scene.material, value);
    }

    pub fn speed(&self) -> f32 {
        self.scene.angular().speed
    }

    pub fn rotation(&self) -> f32 {
        self.scene.angular().rotation
    }
}

impl WebScene {
    fn build(config: &SceneConfig, width: u32, height: u32) -> Self {
        Self {
            scene: Scene::new(config, width, height, 1.0),
            frame: FrameBuffer::new(width as usize, height as usize),
            clock: FrameClock::new(),
            pixels: Vec::new(),
        }
    }

    pub(crate) fn pixel_slice(&self) -> &[u8] {
        &self.pixels
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // tracing falls back to `log` records when no subscriber is installed
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        return Err(to_js(err));
    }
    Ok(())
}
