use std::{collections::HashMap, io::Cursor};

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use monthlycli::cover::{
    CompositionRequest, CoverComposer, CoverConfig, CoverError, CoverResult, ImageFetcher,
    NoFont, RngSource, canvas,
    layout::{Placement, fit_to_slot},
};

// Serves in-memory images by URL
struct MapFetcher(HashMap<String, Vec<u8>>);

impl MapFetcher {
    fn new(images: &[(&str, Vec<u8>)]) -> Self {
        Self(
            images
                .iter()
                .map(|(url, bytes)| (url.to_string(), bytes.clone()))
                .collect(),
        )
    }
}

impl ImageFetcher for MapFetcher {
    fn fetch_image(&self, url: &str) -> CoverResult<Vec<u8>> {
        self.0
            .get(url)
            .cloned()
            .ok_or_else(|| CoverError::fetch(url, "404 Not Found"))
    }
}

fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb(color));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

fn fast_config() -> CoverConfig {
    CoverConfig {
        kmeans_restarts: 2,
        ..CoverConfig::default()
    }
}

fn close(a: Rgb<u8>, b: Rgb<u8>, tolerance: i32) -> bool {
    a.0.iter()
        .zip(b.0.iter())
        .all(|(x, y)| (*x as i32 - *y as i32).abs() <= tolerance)
}

fn decode(jpeg: &[u8]) -> RgbImage {
    image::load_from_memory(jpeg).unwrap().to_rgb8()
}

const RED: [u8; 3] = [220, 20, 20];
const GREEN: [u8; 3] = [20, 200, 40];
const BLUE: [u8; 3] = [30, 40, 210];
const WHITE: [u8; 3] = [255, 255, 255];

#[test]
fn test_fit_landscape_into_slot() {
    let placement = fit_to_slot(400, 200, 230);
    assert_eq!(
        placement,
        Placement {
            width: 230,
            height: 115,
            offset_x: 0,
            offset_y: 57,
        }
    );
}

#[test]
fn test_fit_portrait_into_slot() {
    let placement = fit_to_slot(200, 400, 190);
    assert_eq!(placement.width, 95);
    assert_eq!(placement.height, 190);
    assert_eq!(placement.offset_x, 47);
    assert_eq!(placement.offset_y, 0);
}

#[test]
fn test_fit_square_passthrough() {
    for slot in [230, 190, 150] {
        let placement = fit_to_slot(300, 300, slot);
        assert_eq!(
            placement,
            Placement {
                width: slot,
                height: slot,
                offset_x: 0,
                offset_y: 0,
            }
        );
    }
}

#[test]
fn test_slot_layout_matches_expected_composite() {
    let fetcher = MapFetcher::new(&[
        ("one", solid_png(300, 300, RED)),
        ("two", solid_png(300, 300, GREEN)),
        ("three", solid_png(300, 300, BLUE)),
    ]);
    let composer = CoverComposer::new(fast_config(), fetcher, NoFont);
    let request = CompositionRequest::new(
        vec!["one".into(), "two".into(), "three".into()],
        "March",
        "Top Tracks",
    );

    let composition = composer
        .compose(&request, &mut RngSource::seeded(1))
        .unwrap();
    let actual = decode(&composition.jpeg);

    let images: Vec<Option<DynamicImage>> = [RED, GREEN, BLUE]
        .iter()
        .map(|c| Some(DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb(*c)))))
        .collect();
    let expected = canvas::compose(
        &composition.palette,
        ("March", "Top Tracks"),
        &images,
        composer.config(),
        &NoFont,
    )
    .unwrap();

    // slot interiors, away from edges where JPEG blocks mix colors
    let probes = [
        ((100, 330), RED),   // slot one only
        ((230, 330), RED),   // slot one over slot two
        ((290, 330), GREEN), // slot two only
        ((355, 330), GREEN), // slot two over slot three
        ((440, 330), BLUE),  // slot three only
    ];
    for ((x, y), color) in probes {
        let got = *actual.get_pixel(x, y);
        assert!(
            close(got, *expected.get_pixel(x, y), 12),
            "pixel ({}, {}) = {:?}, expected {:?}",
            x,
            y,
            got,
            expected.get_pixel(x, y)
        );
        assert!(close(got, Rgb(color), 12), "pixel ({}, {}) = {:?}", x, y, got);
    }

    // below the slots only the background remains
    let corner = *actual.get_pixel(480, 480);
    assert!(close(corner, composition.palette.background, 12));
}

#[test]
fn test_landscape_source_is_centered_vertically() {
    let fetcher = MapFetcher::new(&[
        ("square", solid_png(300, 300, WHITE)),
        ("wide", solid_png(400, 200, GREEN)),
    ]);
    let composer = CoverComposer::new(fast_config(), fetcher, NoFont);
    let request = CompositionRequest::new(vec!["square".into(), "wide".into()], "", "");

    let composition = composer
        .compose(&request, &mut RngSource::seeded(2))
        .unwrap();
    assert_eq!(composition.palette.background, Rgb(WHITE));

    // slot two: size 190 at (195, 236); 400x200 scales to 190x95, offset 47
    let actual = decode(&composition.jpeg);
    assert!(close(*actual.get_pixel(320, 250), Rgb(WHITE), 12));
    assert!(close(*actual.get_pixel(320, 330), Rgb(GREEN), 12));
    assert!(close(*actual.get_pixel(320, 420), Rgb(WHITE), 12));
}

#[test]
fn test_extra_sources_are_ignored() {
    // the last two URLs are unknown to the fetcher and would fail if fetched
    let fetcher = MapFetcher::new(&[
        ("a", solid_png(64, 64, RED)),
        ("b", solid_png(64, 64, GREEN)),
        ("c", solid_png(64, 64, BLUE)),
    ]);
    let composer = CoverComposer::new(fast_config(), fetcher, NoFont);
    let request = CompositionRequest::new(
        vec![
            "a".into(),
            "b".into(),
            "c".into(),
            "missing-4".into(),
            "missing-5".into(),
        ],
        "May",
        "Recommended Tracks",
    );

    assert_eq!(composer.config().slots_used(request.sources.len()), 3);
    assert!(composer.compose(&request, &mut RngSource::seeded(3)).is_ok());
}

#[test]
fn test_all_sources_empty_uses_white_sample() {
    let composer = CoverComposer::new(fast_config(), MapFetcher::new(&[]), NoFont);
    let request =
        CompositionRequest::new(vec![String::new(), String::new(), String::new()], "June", "");

    let composition = composer
        .compose(&request, &mut RngSource::seeded(4))
        .unwrap();

    assert_eq!(composition.palette.background, Rgb([255, 255, 255]));
    assert_eq!(composition.palette.foreground, Rgb([0, 0, 0]));

    let decoded = decode(&composition.jpeg);
    assert_eq!(decoded.dimensions(), (500, 500));
    assert!(close(*decoded.get_pixel(250, 250), Rgb(WHITE), 4));
}

#[test]
fn test_base64_decodes_to_jpeg_canvas() {
    let fetcher = MapFetcher::new(&[("a", solid_png(120, 80, BLUE))]);
    let composer = CoverComposer::new(fast_config(), fetcher, NoFont);
    let request = CompositionRequest::new(vec!["a".into()], "July", "Top Tracks");

    let composition = composer
        .compose(&request, &mut RngSource::seeded(5))
        .unwrap();
    let bytes = STANDARD.decode(composition.to_base64()).unwrap();

    assert_eq!(bytes, composition.jpeg);
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    let image = image::load_from_memory(&bytes).unwrap();
    assert_eq!((image.width(), image.height()), (500, 500));
}

#[test]
fn test_fetch_failure_aborts_composition() {
    let composer = CoverComposer::new(fast_config(), MapFetcher::new(&[]), NoFont);
    let request = CompositionRequest::new(vec!["gone".into()], "", "");

    match composer.compose(&request, &mut RngSource::seeded(6)) {
        Err(CoverError::ImageFetch { url, .. }) => assert_eq!(url, "gone"),
        other => panic!("expected fetch error, got {:?}", other.map(|c| c.palette)),
    }
}

#[test]
fn test_whitespace_source_is_fetched() {
    // only the empty string leaves a slot blank
    let composer = CoverComposer::new(fast_config(), MapFetcher::new(&[]), NoFont);
    let request = CompositionRequest::new(vec![" ".into()], "", "");

    match composer.compose(&request, &mut RngSource::seeded(9)) {
        Err(CoverError::ImageFetch { url, .. }) => assert_eq!(url, " "),
        other => panic!("expected fetch error, got {:?}", other.map(|c| c.palette)),
    }
}

#[test]
fn test_undecodable_source_aborts_composition() {
    let fetcher = MapFetcher::new(&[("html", b"<html>not an image</html>".to_vec())]);
    let composer = CoverComposer::new(fast_config(), fetcher, NoFont);
    let request = CompositionRequest::new(vec!["html".into()], "", "");

    let result = composer.compose(&request, &mut RngSource::seeded(7));
    assert!(matches!(result, Err(CoverError::ImageDecode { .. })));
}

#[test]
fn test_mismatched_layout_tables_clamp_slots() {
    let config = CoverConfig {
        slot_positions: vec![(25, 216), (195, 236)],
        ..fast_config()
    };
    assert_eq!(config.slots_used(3), 2);
    assert!(config.slot(2).is_none());

    let fetcher = MapFetcher::new(&[
        ("a", solid_png(32, 32, RED)),
        ("b", solid_png(32, 32, GREEN)),
    ]);
    let composer = CoverComposer::new(config, fetcher, NoFont);
    let request = CompositionRequest::new(vec!["a".into(), "b".into(), "never".into()], "", "");
    assert!(composer.compose(&request, &mut RngSource::seeded(8)).is_ok());
}
