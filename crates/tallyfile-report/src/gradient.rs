//! Three-point color scale for completion values.

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB` form.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl From<Rgb> for crossterm::style::Color {
    fn from(c: Rgb) -> Self {
        crossterm::style::Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}

/// Linear min/mid/max color scale over [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScale {
    pub min: Rgb,
    pub mid: Rgb,
    pub max: Rgb,
}

/// Red at 0, yellow at 0.5, green at 1.
pub const COMPLETION_SCALE: ColorScale = ColorScale {
    min: Rgb::new(0xF8, 0x69, 0x6B),
    mid: Rgb::new(0xFF, 0xEB, 0x84),
    max: Rgb::new(0x00, 0xFF, 0x99),
};

impl ColorScale {
    /// Position of the midpoint stop.
    pub const MIDPOINT: f64 = 0.5;

    /// Color for a value; out-of-range values are clamped.
    pub fn color_at(&self, value: f64) -> Rgb {
        let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        if v <= Self::MIDPOINT {
            self.min.lerp(self.mid, v / Self::MIDPOINT)
        } else {
            self.mid.lerp(self.max, (v - Self::MIDPOINT) / (1.0 - Self::MIDPOINT))
        }
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        COMPLETION_SCALE
    }
}
