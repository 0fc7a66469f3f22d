use std::time::Duration;

use image::DynamicImage;
use reqwest::blocking::Client;

use crate::cover::error::{CoverError, CoverResult};

/// Retrieves the raw bytes behind an image URL.
pub trait ImageFetcher {
    fn fetch_image(&self, url: &str) -> CoverResult<Vec<u8>>;
}

/// Blocking HTTP fetcher for album art.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new() -> CoverResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CoverError::fetch("<client>", e))?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch_image(&self, url: &str) -> CoverResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| CoverError::fetch(url, e))?;
        let bytes = response.bytes().map_err(|e| CoverError::fetch(url, e))?;
        Ok(bytes.to_vec())
    }
}

/// Fetches and decodes the image behind `url`. Only the empty string marks a
/// slot without an image and yields `None`.
pub fn load_source(fetcher: &dyn ImageFetcher, url: &str) -> CoverResult<Option<DynamicImage>> {
    if url.is_empty() {
        return Ok(None);
    }
    let bytes = fetcher.fetch_image(url)?;
    let image = image::load_from_memory(&bytes).map_err(|source| CoverError::ImageDecode {
        url: url.to_string(),
        source,
    })?;
    Ok(Some(image))
}
