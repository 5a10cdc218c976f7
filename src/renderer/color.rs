/// Selects which color palette to use for field rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ColorMap {
    /// Hue ramp: blue (cold) -> cyan -> green -> yellow -> red (hot).
    #[default]
    Spectrum,
    /// Tokyo Night: navy -> blue -> purple -> pink -> orange.
    TokyoNight,
}

impl ColorMap {
    pub fn next(self) -> Self {
        match self {
            ColorMap::Spectrum => ColorMap::TokyoNight,
            ColorMap::TokyoNight => ColorMap::Spectrum,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorMap::Spectrum => "spectrum",
            ColorMap::TokyoNight => "tokyo night",
        }
    }
}

/// Tokyo Night-inspired color stops for field mapping.
/// Deep navy -> blue -> purple -> pink -> orange
pub(crate) const COLOR_STOPS: [(f64, f64, f64); 5] = [
    (26.0, 27.0, 38.0),    // #1a1b26 navy         (0.00)
    (122.0, 162.0, 247.0), // #7aa2f7 blue         (0.25)
    (187.0, 154.0, 247.0), // #bb9af7 purple       (0.50)
    (247.0, 118.0, 142.0), // #f7768e pink         (0.75)
    (255.0, 158.0, 100.0), // #ff9e64 orange       (1.00)
];

/// Convert a [0.0, 1.0] value to RGBA using the specified color map.
pub fn map_to_rgba(t: f64, colormap: ColorMap) -> [u8; 4] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    match colormap {
        ColorMap::Spectrum => spectrum(t),
        ColorMap::TokyoNight => stops(t, &COLOR_STOPS),
    }
}

/// Fully saturated hue, 240 deg at t = 0 down to 0 deg at t = 1.
fn spectrum(t: f64) -> [u8; 4] {
    let h = (1.0 - t) * 240.0 / 60.0;
    let x = 1.0 - ((h % 2.0) - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        _ => (x, 0.0, 1.0),
    };
    [
        (r * 255.0_f64).round() as u8,
        (g * 255.0_f64).round() as u8,
        (b * 255.0_f64).round() as u8,
        255,
    ]
}

fn stops(t: f64, stops: &[(f64, f64, f64); 5]) -> [u8; 4] {
    let seg = t * 4.0;
    let i = (seg as usize).min(3);
    let s = seg - i as f64;

    let (r0, g0, b0) = stops[i];
    let (r1, g1, b1) = stops[i + 1];

    [
        (r0 + s * (r1 - r0)) as u8,
        (g0 + s * (g1 - g0)) as u8,
        (b0 + s * (b1 - b0)) as u8,
        255,
    ]
}
