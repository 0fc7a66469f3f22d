//! Hue/lightness/saturation conversions.
//!
//! The formulas are the classic ones, but they are fed 0-255 channel values
//! instead of 0-1 fractions. Lightness therefore lands on the 0-255 scale,
//! hue stays a fraction and saturation comes out negative for anything
//! lighter than near-black. The foreground derivation and the thresholds it
//! compares against depend on exactly this behaviour, so it is kept as is.

use image::Rgb;

const ONE_THIRD: f64 = 1.0 / 3.0;
const ONE_SIXTH: f64 = 1.0 / 6.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hls {
    pub hue: f64,
    pub lightness: f64,
    pub saturation: f64,
}

pub fn rgb_to_hls(r: f64, g: f64, b: f64) -> Hls {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let sumc = maxc + minc;
    let rangec = maxc - minc;
    let lightness = sumc / 2.0;

    if minc == maxc {
        return Hls {
            hue: 0.0,
            lightness,
            saturation: 0.0,
        };
    }

    let saturation = if lightness <= 0.5 {
        rangec / sumc
    } else {
        rangec / (2.0 - maxc - minc)
    };

    let rc = (maxc - r) / rangec;
    let gc = (maxc - g) / rangec;
    let bc = (maxc - b) / rangec;
    let hue = if r == maxc {
        bc - gc
    } else if g == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };

    Hls {
        hue: (hue / 6.0).rem_euclid(1.0),
        lightness,
        saturation,
    }
}

pub fn hls_to_rgb(hls: Hls) -> (f64, f64, f64) {
    let Hls {
        hue,
        lightness: l,
        saturation: s,
    } = hls;

    if s == 0.0 {
        return (l, l, l);
    }

    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - (l * s) };
    let m1 = 2.0 * l - m2;

    (
        channel(m1, m2, hue + ONE_THIRD),
        channel(m1, m2, hue),
        channel(m1, m2, hue - ONE_THIRD),
    )
}

fn channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < ONE_SIXTH {
        return m1 + (m2 - m1) * hue * 6.0;
    }
    if hue < 0.5 {
        return m2;
    }
    if hue < TWO_THIRDS {
        return m1 + (m2 - m1) * (TWO_THIRDS - hue) * 6.0;
    }
    m1
}

impl Hls {
    pub fn from_rgb(color: Rgb<u8>) -> Self {
        let [r, g, b] = color.0;
        rgb_to_hls(r as f64, g as f64, b as f64)
    }

    /// Converts back to an 8-bit color, truncating toward zero and clamping
    /// each channel into `0..=255`.
    pub fn to_rgb(self) -> Rgb<u8> {
        let (r, g, b) = hls_to_rgb(self);
        Rgb([r as u8, g as u8, b as u8])
    }
}
