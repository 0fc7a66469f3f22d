use std::collections::HashSet;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Datelike, Duration, NaiveDate};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::Track;

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Month name and year of the day before `today`, so a run on the first of
/// a month labels the month that just ended.
pub fn month_label(today: NaiveDate) -> (String, i32) {
    let yesterday = today - Duration::days(1);
    (yesterday.format("%B").to_string(), yesterday.year())
}

pub fn track_uri(id: &str) -> String {
    format!("spotify:track:{}", id)
}

/// Ids of `tracks`, in order, skipping tracks without one.
pub fn track_ids(tracks: &[Track]) -> Vec<String> {
    tracks.iter().filter_map(|t| t.id.clone()).collect()
}

/// Album cover URLs of `tracks`, in order, one per track that has one.
pub fn cover_urls(tracks: &[Track]) -> Vec<String> {
    tracks
        .iter()
        .filter_map(|t| t.cover_url())
        .map(str::to_string)
        .collect()
}

/// Distinct artist ids across `tracks`, in first-seen order.
pub fn unique_artist_ids(tracks: &[Track]) -> Vec<String> {
    let mut seen = HashSet::new();
    tracks
        .iter()
        .flat_map(|t| t.artists.iter())
        .filter_map(|a| a.id.clone())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

pub fn format_band(min: f64, max: f64) -> String {
    format!("{:.2}-{:.2}", min, max)
}
