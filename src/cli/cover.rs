use std::path::PathBuf;

use crate::{
    config,
    cover::{CompositionRequest, CoverComposer, FileFontResolver, HttpImageFetcher, RngSource},
    error, info, success, warning,
};

/// Composes a cover from image URLs and writes it to `out`, as JPEG or as
/// the base64 text the upload endpoint takes.
pub async fn cover(sources: Vec<String>, label: String, title: String, out: PathBuf, base64: bool) {
    let fonts = load_fonts();
    let request = CompositionRequest::new(sources, label, title);

    info!("Composing cover from {} source(s)", request.sources.len());
    let handle = tokio::task::spawn_blocking(move || {
        let fetcher = HttpImageFetcher::new()?;
        let composer = CoverComposer::new(config::cover_config(), fetcher, fonts);
        composer.compose(&request, &mut RngSource::thread())
    });

    let composition = match handle.await {
        Ok(Ok(composition)) => composition,
        Ok(Err(e)) => error!("Failed to compose cover: {}", e),
        Err(e) => error!("Task join error: {}", e),
    };

    let bytes = if base64 {
        composition.to_base64().into_bytes()
    } else {
        composition.jpeg.clone()
    };

    if let Err(e) = async_fs::write(&out, bytes).await {
        error!("Failed to write {}: {}", out.display(), e);
    }

    let [r, g, b] = composition.palette.background.0;
    let [fr, fg, fb] = composition.palette.foreground.0;
    success!(
        "Cover written to {} (background #{:02x}{:02x}{:02x}, foreground #{:02x}{:02x}{:02x})",
        out.display(),
        r,
        g,
        b,
        fr,
        fg,
        fb
    );
}

/// Label font from `COVER_FONT_PATH`. Covers are still produced, without
/// labels, when it is unset or unusable.
pub(crate) fn load_fonts() -> Option<FileFontResolver> {
    let Some(path) = config::cover_font_path() else {
        warning!("COVER_FONT_PATH is not set, covers are drawn without labels");
        return None;
    };

    match FileFontResolver::load(&path) {
        Ok(fonts) => Some(fonts),
        Err(e) => {
            warning!("{}, covers are drawn without labels", e);
            None
        }
    }
}
