//! Color

use serde::Deserialize;
use stage_geom::Vec4;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "ColorRepr")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Config files spell colors either as `0xRRGGBB` integers or `[r, g, b]` floats.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(u32),
    Rgb([f32; 3]),
    Rgba([f32; 4]),
}

impl From<ColorRepr> for Color {
    fn from(repr: ColorRepr) -> Self {
        match repr {
            ColorRepr::Hex(hex) => Color::hex(hex),
            ColorRepr::Rgb([r, g, b]) => Color::rgb(r, g, b),
            ColorRepr::Rgba([r, g, b, a]) => Color::rgba(r, g, b, a),
        }
    }
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Color {
        Color { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color { r, g, b, a }
    }

    pub fn hex(hex: u32) -> Color {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Color::rgb(channel(16), channel(8), channel(0))
    }

    pub fn to_hex(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub const fn black() -> Color {
        Color::rgb(0.0, 0.0, 0.0)
    }

    pub const fn white() -> Color {
        Color::rgb(1.0, 1.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::white()
    }
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

impl From<[f32; 4]> for Color {
    fn from(a: [f32; 4]) -> Self {
        Color::rgba(a[0], a[1], a[2], a[3])
    }
}

impl From<Color> for Vec4 {
    fn from(c: Color) -> Self {
        Vec4::new(c.r, c.g, c.b, c.a)
    }
}
