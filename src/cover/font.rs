use std::path::Path;

use image::{Rgb, RgbImage};
use rusttype::{Font, Scale, point};

use crate::cover::error::{CoverError, CoverResult};

/// A font bound to a render size.
#[derive(Clone)]
pub struct FontHandle {
    font: Font<'static>,
    scale: Scale,
}

impl FontHandle {
    /// Binds `font` at an em size of `size` pixels.
    ///
    /// rusttype scales by the ascent-to-descent height, so the em size is
    /// converted through the font's own vertical metrics.
    pub fn new(font: Font<'static>, size: f32) -> Self {
        let metrics = font.v_metrics_unscaled();
        let line = metrics.ascent - metrics.descent;
        let units_per_em = f32::from(font.units_per_em());
        let height = if line > 0.0 && units_per_em > 0.0 {
            size * line / units_per_em
        } else {
            size
        };

        Self {
            font,
            scale: Scale::uniform(height),
        }
    }

    /// Distance from ascender to descender in pixels.
    pub fn line_height(&self) -> f32 {
        self.scale.y
    }

    /// Draws `text` with its top-left corner at `origin`, blending glyph
    /// coverage into the canvas. Pixels outside the canvas are dropped.
    pub fn draw(&self, canvas: &mut RgbImage, origin: (i32, i32), text: &str, color: Rgb<u8>) {
        let v_metrics = self.font.v_metrics(self.scale);
        let start = point(origin.0 as f32, origin.1 as f32 + v_metrics.ascent);

        for glyph in self.font.layout(text, self.scale, start) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 || px >= canvas.width() as i32 || py >= canvas.height() as i32 {
                    return;
                }
                if coverage <= 0.0 {
                    return;
                }
                let coverage = coverage.min(1.0);
                let dst = canvas.get_pixel_mut(px as u32, py as u32);
                let inv = 1.0 - coverage;
                for c in 0..3 {
                    let blended = color.0[c] as f32 * coverage + dst.0[c] as f32 * inv;
                    dst.0[c] = blended.round() as u8;
                }
            });
        }
    }
}

/// Resolves the label font for a given size.
///
/// `Ok(None)` means no font is available and labels are skipped.
pub trait FontResolver {
    fn resolve_font(&self, size: f32) -> CoverResult<Option<FontHandle>>;
}

/// Resolver serving a single TrueType file at every size.
#[derive(Clone)]
pub struct FileFontResolver {
    font: Font<'static>,
}

impl FileFontResolver {
    pub fn load(path: impl AsRef<Path>) -> CoverResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| CoverError::font(format!("{}: {}", path.display(), e)))?;
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| CoverError::font(format!("{} is not a usable font", path.display())))?;
        Ok(Self { font })
    }
}

impl FontResolver for FileFontResolver {
    fn resolve_font(&self, size: f32) -> CoverResult<Option<FontHandle>> {
        Ok(Some(FontHandle::new(self.font.clone(), size)))
    }
}

/// Resolver for environments without a label font.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFont;

impl FontResolver for NoFont {
    fn resolve_font(&self, _size: f32) -> CoverResult<Option<FontHandle>> {
        Ok(None)
    }
}

impl<T: FontResolver> FontResolver for Option<T> {
    fn resolve_font(&self, size: f32) -> CoverResult<Option<FontHandle>> {
        match self {
            Some(resolver) => resolver.resolve_font(size),
            None => Ok(None),
        }
    }
}
