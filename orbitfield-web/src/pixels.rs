/// Conversion of shaded cells into canvas RGBA pixels
use orbitfield_core::{FrameBuffer, Rgb, Shade};

/// Fill `out` with one RGBA quadruple per framebuffer cell. Empty cells are
/// fully transparent so the page background shows through.
pub fn write_rgba(
    frame: &FrameBuffer,
    surface_color: Rgb,
    particle_color: Rgb,
    out: &mut Vec<u8>,
) {
    out.clear();
    out.reserve(frame.cells().len() * 4);
    for cell in frame.cells() {
        let rgba = match *cell {
            Shade::Empty => [0, 0, 0, 0],
            Shade::Particle => [particle_color.r, particle_color.g, particle_color.b, 255],
            Shade::Surface(brightness) => {
                let Rgb { r, g, b } = surface_color.scaled(brightness);
                [r, g, b, 255]
            }
        };
        out.extend_from_slice(&rgba);
    }
}
