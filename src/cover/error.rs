/// Convenience result type used by the cover composer.
pub type CoverResult<T> = Result<T, CoverError>;

/// Everything that can abort a cover composition.
///
/// A failed composition never yields a partial image; callers decide whether
/// the playlist is kept without a cover.
#[derive(thiserror::Error, Debug)]
pub enum CoverError {
    /// A source image could not be retrieved.
    #[error("failed to fetch image {url}: {reason}")]
    ImageFetch { url: String, reason: String },

    /// A source image was retrieved but is not a decodable raster.
    #[error("failed to decode image {url}: {source}")]
    ImageDecode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    /// Dominant color extraction received unusable input.
    #[error("clustering error: {0}")]
    Clustering(String),

    /// The label font could not be resolved or parsed.
    #[error("font error: {0}")]
    Font(String),

    /// The finished canvas could not be encoded.
    #[error("failed to encode cover: {0}")]
    Encode(#[from] image::ImageError),
}

impl CoverError {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::ImageFetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn clustering(msg: impl Into<String>) -> Self {
        Self::Clustering(msg.into())
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }
}
