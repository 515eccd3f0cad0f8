#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`. Malformed input falls back to opaque
    /// black per channel rather than failing.
    pub fn from_hex(hex: &str) -> Self {
        let s = hex.trim_start_matches('#');
        let ch = |i: usize| u8::from_str_radix(s.get(i..i + 2).unwrap_or("00"), 16).unwrap_or(0);
        match s.len() {
            6 => Color::rgb(ch(0), ch(2), ch(4)),
            8 => Color::rgba(ch(0), ch(2), ch(4), ch(6)),
            _ => Color::BLACK,
        }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Color { a, ..self }
    }

    /// Scale alpha by a factor in `[0, 1]`.
    pub fn mul_alpha(self, f: f32) -> Self {
        let a = ((self.a as f32) * f.clamp(0.0, 1.0)) as u8;
        Color { a, ..self }
    }
}
