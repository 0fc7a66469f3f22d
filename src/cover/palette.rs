use image::{DynamicImage, Rgb, RgbImage, imageops, imageops::FilterType};

use crate::cover::{
    error::{CoverError, CoverResult},
    hls::Hls,
    kmeans::{self, Point},
    layout::CoverConfig,
    random::RandomSource,
};

/// Hue rotation applied to the background, a third of the 0-255 wheel.
pub const HUE_SHIFT: f64 = 255.0 / 3.0;
const WASHED_OUT_SATURATION: f64 = 255.0 * 0.3;
const WASHED_OUT_LIGHTNESS_MIN: f64 = 255.0 * 0.4;
const WASHED_OUT_LIGHTNESS_MAX: f64 = 255.0 * 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb<u8>,
    pub foreground: Rgb<u8>,
}

/// Derives background and foreground colors from the highest priority sample.
///
/// Without a sample the sampling canvas stays solid white.
pub fn extract(
    sample: Option<&DynamicImage>,
    config: &CoverConfig,
    rng: &mut dyn RandomSource,
) -> CoverResult<Palette> {
    let canvas = sample_canvas(sample, config.sample_size);
    let background = dominant_color(&canvas, config, rng)?;
    let foreground = foreground_hls(background, rng).to_rgb();

    Ok(Palette {
        background,
        foreground,
    })
}

/// Builds the throwaway canvas that drives clustering. The sample is
/// stretched to fill it, aspect ratio is not preserved.
pub fn sample_canvas(sample: Option<&DynamicImage>, size: u32) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(size, size, Rgb([255, 255, 255]));
    if let Some(sample) = sample {
        let stretched = imageops::resize(&sample.to_rgb8(), size, size, FilterType::CatmullRom);
        imageops::replace(&mut canvas, &stretched, 0, 0);
    }
    canvas
}

/// Centroid of the most populated color cluster, channels truncated.
pub fn dominant_color(
    canvas: &RgbImage,
    config: &CoverConfig,
    rng: &mut dyn RandomSource,
) -> CoverResult<Rgb<u8>> {
    let points: Vec<Point> = canvas
        .pixels()
        .map(|p| [p[0] as f64, p[1] as f64, p[2] as f64])
        .collect();

    let clustering = kmeans::kmeans(
        &points,
        config.clusters,
        config.kmeans_restarts,
        config.kmeans_threshold,
        rng,
    )?;

    let assignments = kmeans::assign(&points, &clustering.codebook);
    let counts = kmeans::populations(&assignments, clustering.codebook.len());

    // first maximum wins on ties
    let mut peak: Option<(usize, usize)> = None;
    for (index, &count) in counts.iter().enumerate() {
        if peak.is_none_or(|(_, best)| count > best) {
            peak = Some((index, count));
        }
    }

    let (index, _) = peak.ok_or_else(|| CoverError::clustering("empty codebook"))?;
    let [r, g, b] = clustering.codebook[index];
    Ok(Rgb([r as u8, g as u8, b as u8]))
}

/// True for near-gray, mid-lightness colors where plain inversion would
/// leave too little contrast.
pub fn is_washed_out(hls: &Hls) -> bool {
    hls.saturation < WASHED_OUT_SATURATION
        && hls.lightness > WASHED_OUT_LIGHTNESS_MIN
        && hls.lightness < WASHED_OUT_LIGHTNESS_MAX
}

/// Foreground in HLS form: hue rotated, lightness inverted or, for washed
/// out backgrounds, pushed to 0 or 255 by a coin toss. Saturation is kept.
pub fn foreground_hls(background: Rgb<u8>, rng: &mut dyn RandomSource) -> Hls {
    let bg = Hls::from_rgb(background);
    let hue = (bg.hue + HUE_SHIFT).rem_euclid(255.0);

    let lightness = if is_washed_out(&bg) {
        if rng.coin() { 255.0 } else { 0.0 }
    } else {
        255.0 - bg.lightness
    };

    Hls {
        hue,
        lightness,
        saturation: bg.saturation,
    }
}
