//! # Playlist Cover Composer
//!
//! Builds the square cover uploaded for every generated playlist. The cover
//! background is the dominant color of the highest priority album art, the
//! labels use a complementary foreground and up to three thumbnails are
//! stacked in fixed slots, slot one on top.
//!
//! ```text
//! sources ──fetch──> images ──first──> palette::extract ──> Palette
//!                       │                                      │
//!                       └──────────────> canvas::compose <─────┘
//!                                              │
//!                                     JPEG ──> base64
//! ```
//!
//! The composer is synchronous. Network access, fonts and randomness come in
//! through [`ImageFetcher`], [`FontResolver`] and [`RandomSource`] so the
//! algorithmic part runs without network or filesystem.

pub mod canvas;
pub mod error;
pub mod fetch;
pub mod font;
pub mod hls;
pub mod kmeans;
pub mod layout;
pub mod palette;
pub mod random;

pub use error::{CoverError, CoverResult};
pub use fetch::{HttpImageFetcher, ImageFetcher};
pub use font::{FileFontResolver, FontHandle, FontResolver, NoFont};
pub use layout::{CoverConfig, LabelStyle, Placement, Slot};
pub use palette::Palette;
pub use random::{RandomSource, RngSource};

/// Inputs for a single cover.
#[derive(Debug, Clone, Default)]
pub struct CompositionRequest {
    /// Image URLs in slot priority order. Empty strings leave a slot blank;
    /// entries beyond the configured slots are ignored.
    pub sources: Vec<String>,
    pub label_large: String,
    pub label_small: String,
}

impl CompositionRequest {
    pub fn new(
        sources: Vec<String>,
        label_large: impl Into<String>,
        label_small: impl Into<String>,
    ) -> Self {
        Self {
            sources,
            label_large: label_large.into(),
            label_small: label_small.into(),
        }
    }
}

/// A finished cover.
#[derive(Debug, Clone)]
pub struct Composition {
    pub palette: Palette,
    pub jpeg: Vec<u8>,
}

impl Composition {
    /// Base64 form expected by the playlist cover upload endpoint.
    pub fn to_base64(&self) -> String {
        canvas::encode_base64(&self.jpeg)
    }
}

pub struct CoverComposer<F, T> {
    config: CoverConfig,
    fetcher: F,
    fonts: T,
}

impl<F: ImageFetcher, T: FontResolver> CoverComposer<F, T> {
    pub fn new(config: CoverConfig, fetcher: F, fonts: T) -> Self {
        Self {
            config,
            fetcher,
            fonts,
        }
    }

    pub fn config(&self) -> &CoverConfig {
        &self.config
    }

    /// Composes and encodes a cover. Any fetch, decode or clustering failure
    /// aborts the whole composition.
    pub fn compose(
        &self,
        request: &CompositionRequest,
        rng: &mut dyn RandomSource,
    ) -> CoverResult<Composition> {
        let used = self.config.slots_used(request.sources.len());
        let images = request.sources[..used]
            .iter()
            .map(|url| fetch::load_source(&self.fetcher, url))
            .collect::<CoverResult<Vec<_>>>()?;

        let sample = images.iter().flatten().next();
        let palette = palette::extract(sample, &self.config, rng)?;

        let image = canvas::compose(
            &palette,
            (&request.label_large, &request.label_small),
            &images,
            &self.config,
            &self.fonts,
        )?;
        let jpeg = canvas::encode_jpeg(&image, self.config.jpeg_quality)?;

        Ok(Composition { palette, jpeg })
    }
}
