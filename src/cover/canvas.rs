use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, RgbImage, codecs::jpeg::JpegEncoder, imageops, imageops::FilterType};

use crate::cover::{
    error::CoverResult,
    font::FontResolver,
    layout::{CoverConfig, LabelStyle, fit_to_slot},
    palette::Palette,
};

/// Paints the cover: background, both labels, then the thumbnails from the
/// lowest priority slot to the highest so slot one ends up on top.
///
/// `images` holds one entry per used slot; `None` leaves the slot empty.
pub fn compose(
    palette: &Palette,
    labels: (&str, &str),
    images: &[Option<DynamicImage>],
    config: &CoverConfig,
    fonts: &dyn FontResolver,
) -> CoverResult<RgbImage> {
    let mut canvas = RgbImage::from_pixel(config.canvas_size, config.canvas_size, palette.background);

    draw_label(&mut canvas, labels.0, &config.large_label, palette, fonts)?;
    draw_label(&mut canvas, labels.1, &config.small_label, palette, fonts)?;

    let used = config.slots_used(images.len());
    for index in (0..used).rev() {
        let (Some(image), Some(slot)) = (&images[index], config.slot(index)) else {
            continue;
        };

        let placement = fit_to_slot(image.width(), image.height(), slot.size);
        let thumb = imageops::resize(
            &image.to_rgb8(),
            placement.width,
            placement.height,
            FilterType::CatmullRom,
        );

        let x = slot.position.0 + placement.offset_x;
        let y = slot.position.1 + placement.offset_y;
        imageops::replace(&mut canvas, &thumb, x as i64, y as i64);
    }

    Ok(canvas)
}

fn draw_label(
    canvas: &mut RgbImage,
    text: &str,
    style: &LabelStyle,
    palette: &Palette,
    fonts: &dyn FontResolver,
) -> CoverResult<()> {
    if text.is_empty() {
        return Ok(());
    }
    if let Some(font) = fonts.resolve_font(style.size)? {
        font.draw(canvas, style.origin, text, palette.foreground);
    }
    Ok(())
}

pub fn encode_jpeg(canvas: &RgbImage, quality: u8) -> CoverResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    canvas.write_with_encoder(encoder)?;
    Ok(buffer.into_inner())
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
