/// ASCII presentation of the scene framebuffer
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use orbitfield_core::{FrameBuffer, Rgb, Shade};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

const PARTICLE_GLYPH: char = '\'';

/// Terminal renderer that turns shaded cells into colored characters
pub struct AsciiRenderer {
    frame: FrameBuffer,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            frame: FrameBuffer::new(width, height),
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.frame.resize(width, height);
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    pub fn draw<W: Write>(
        &self,
        writer: &mut W,
        surface_color: Rgb,
        particle_color: Rgb,
    ) -> std::io::Result<()> {
        let mut current: Option<Rgb> = None;
        for y in 0..self.frame.height() {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.frame.width() {
                let shade = self.frame.cell(x, y).unwrap_or(Shade::Empty);
                let (ch, color) = glyph(shade, surface_color, particle_color);

                // Only switch colors when the run changes
                if color.is_some() && color != current {
                    if let Some(Rgb { r, g, b }) = color {
                        writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                    }
                    current = color;
                }
                writer.queue(Print(ch))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Glyph and foreground color for one cell; `None` color means blank.
pub fn glyph(shade: Shade, surface_color: Rgb, particle_color: Rgb) -> (char, Option<Rgb>) {
    match shade {
        Shade::Empty => (' ', None),
        Shade::Particle => (PARTICLE_GLYPH, Some(particle_color)),
        Shade::Surface(brightness) => {
            let brightness = brightness.clamp(0.0, 1.0);
            let index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
            let index = index.min(LUMINOSITY_RAMP.len() - 1);
            // Keep dim faces visible against the background
            let tint = 0.35 + 0.65 * brightness;
            (LUMINOSITY_RAMP[index], Some(surface_color.scaled(tint)))
        }
    }
}
