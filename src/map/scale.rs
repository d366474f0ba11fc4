use crate::model::ParameterConfig;
use glam::DVec3;
use std::fmt;

/// An opaque sRGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

    pub const fn from_hex(hex: u32) -> Self {
        Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    fn to_vec3(self) -> DVec3 {
        DVec3::new(self.0 as f64, self.1 as f64, self.2 as f64)
    }

    fn from_vec3(v: DVec3) -> Self {
        let v = v.round().clamp(DVec3::ZERO, DVec3::splat(255.0));
        Rgb(v.x as u8, v.y as u8, v.z as u8)
    }

    /// Blend towards `background` as if drawn with the given opacity
    pub fn with_opacity(self, opacity: f64, background: Rgb) -> Rgb {
        let t = opacity.clamp(0.0, 1.0);
        Self::from_vec3(background.to_vec3().lerp(self.to_vec3(), t))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Viridis sampled at 11 evenly spaced points
const VIRIDIS: [Rgb; 11] = [
    Rgb::from_hex(0x440154),
    Rgb::from_hex(0x482475),
    Rgb::from_hex(0x414487),
    Rgb::from_hex(0x355f8d),
    Rgb::from_hex(0x2a788e),
    Rgb::from_hex(0x21918c),
    Rgb::from_hex(0x22a884),
    Rgb::from_hex(0x44bf70),
    Rgb::from_hex(0x7ad151),
    Rgb::from_hex(0xbddf26),
    Rgb::from_hex(0xfde725),
];

/// Perceptually uniform viridis ramp, `t` in [0, 1]
pub fn viridis(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let n = VIRIDIS.len() - 1;
    let idx = ((t * n as f64).floor() as usize).min(n - 1);
    let frac = t * n as f64 - idx as f64;
    Rgb::from_vec3(VIRIDIS[idx].to_vec3().lerp(VIRIDIS[idx + 1].to_vec3(), frac))
}

/// Sequential color scale: maps the domain linearly onto the viridis ramp.
/// Domain order encodes ramp direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SequentialScale {
    domain: [f64; 2],
}

impl SequentialScale {
    pub fn new(domain: [f64; 2]) -> Self {
        Self { domain }
    }

    /// Build the scale for a parameter, swapping the domain when reversed
    pub fn for_parameter(config: &ParameterConfig) -> Self {
        let (min, max) = (config.range.min, config.range.max);
        if config.reverse {
            Self::new([max, min])
        } else {
            Self::new([min, max])
        }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    /// Normalized ramp position of a value
    pub fn normalize(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return 0.5;
        }
        (value - d0) / span
    }

    pub fn color(&self, value: f64) -> Rgb {
        viridis(self.normalize(value))
    }
}

/// Linear mapping from a numeric domain to output coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// `count` evenly spaced tick values from domain[0] to domain[1] inclusive
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let [d0, d1] = self.domain;
        match count {
            0 => Vec::new(),
            1 => vec![d0],
            _ => (0..count)
                .map(|i| d0 + (d1 - d0) * i as f64 / (count - 1) as f64)
                .collect(),
        }
    }
}

/// Integer tick label
pub fn format_tick(value: f64) -> String {
    let rounded = value.round();
    // avoid "-0"
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Range;

    fn config(min: f64, max: f64, reverse: bool) -> ParameterConfig {
        ParameterConfig {
            range: Range { min, max },
            label: "Cases".to_string(),
            reverse,
        }
    }

    #[test]
    fn test_viridis_endpoints() {
        assert_eq!(viridis(0.0), Rgb::from_hex(0x440154));
        assert_eq!(viridis(1.0), Rgb::from_hex(0xfde725));
        assert_eq!(viridis(0.5), Rgb::from_hex(0x21918c));
        assert_eq!(viridis(-3.0), viridis(0.0));
        assert_eq!(viridis(7.0), viridis(1.0));
    }

    #[test]
    fn test_reverse_swaps_domain() {
        assert_eq!(SequentialScale::for_parameter(&config(0.0, 100.0, false)).domain(), [0.0, 100.0]);
        let reversed = SequentialScale::for_parameter(&config(0.0, 100.0, true));
        assert_eq!(reversed.domain(), [100.0, 0.0]);
        assert_eq!(reversed.color(100.0), viridis(0.0));
        assert_eq!(reversed.color(0.0), viridis(1.0));
    }

    #[test]
    fn test_degenerate_domain() {
        let scale = SequentialScale::new([5.0, 5.0]);
        assert_eq!(scale.color(5.0), viridis(0.5));
    }

    #[test]
    fn test_linear_ticks() {
        let scale = LinearScale::new([0.0, 100.0], [400.0, 0.0]);
        assert_eq!(scale.ticks(5), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(scale.apply(0.0), 400.0);
        assert_eq!(scale.apply(100.0), 0.0);
        assert_eq!(scale.apply(25.0), 300.0);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(12.6), "13");
        assert_eq!(format_tick(-0.2), "0");
        assert_eq!(format_tick(-12.0), "-12");
    }

    #[test]
    fn test_hex_display_and_opacity() {
        assert_eq!(Rgb::from_hex(0xcccccc).to_string(), "#cccccc");
        let black = Rgb(0, 0, 0);
        assert_eq!(Rgb(200, 100, 50).with_opacity(0.5, black), Rgb(100, 50, 25));
        assert_eq!(Rgb(200, 100, 50).with_opacity(1.0, black), Rgb(200, 100, 50));
    }
}
