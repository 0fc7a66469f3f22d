//! Listening taste signals derived from a user's recent top tracks.
//!
//! The signals feed the recommendation request: the two most frequent
//! genres, the interquartile band of four audio features, and the set of
//! ISRCs that must never be recommended back to the user.

use std::collections::{HashMap, HashSet};

use crate::types::{AudioFeatures, Track};

pub const RECOMMENDATION_TARGET: usize = 25;
pub const RECOMMENDATION_ATTEMPTS: usize = 5;
pub const BANDED_ATTEMPTS: usize = 3;

/// Genre occurrence counts, remembering first-seen order.
#[derive(Debug, Clone, Default)]
pub struct GenreTally {
    order: Vec<String>,
    counts: HashMap<String, u32>,
}

impl GenreTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, genre: &str) {
        match self.counts.get_mut(genre) {
            Some(count) => *count += 1,
            None => {
                self.order.push(genre.to_string());
                self.counts.insert(genre.to_string(), 1);
            }
        }
    }

    pub fn count(&self, genre: &str) -> u32 {
        self.counts.get(genre).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The two leading genres, scanned in first-seen order. A later genre
    /// only displaces an earlier one with a strictly higher count.
    pub fn top_two(&self) -> Vec<String> {
        let mut top: Vec<String> = Vec::with_capacity(2);
        for genre in &self.order {
            let count = self.count(genre);
            match top.len() {
                0 => top.push(genre.clone()),
                1 => {
                    if count > self.count(&top[0]) {
                        top.insert(0, genre.clone());
                    } else {
                        top.push(genre.clone());
                    }
                }
                _ => {
                    if count > self.count(&top[1]) {
                        if count > self.count(&top[0]) {
                            top[1] = top[0].clone();
                            top[0] = genre.clone();
                        } else {
                            top[1] = genre.clone();
                        }
                    }
                }
            }
        }
        top
    }
}

/// Percentile with linear interpolation between the closest ranks.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    fn quartiles(values: &[f64]) -> Option<Self> {
        Some(Self {
            min: percentile(values, 25.0)?,
            max: percentile(values, 75.0)?,
        })
    }
}

/// Interquartile bands of the audio features used to steer recommendations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureBands {
    pub danceability: Band,
    pub energy: Band,
    pub valence: Band,
    pub tempo: Band,
}

impl FeatureBands {
    pub fn from_features(features: &[AudioFeatures]) -> Option<Self> {
        let column = |f: fn(&AudioFeatures) -> f64| features.iter().map(f).collect::<Vec<_>>();
        Some(Self {
            danceability: Band::quartiles(&column(|f| f.danceability))?,
            energy: Band::quartiles(&column(|f| f.energy))?,
            valence: Band::quartiles(&column(|f| f.valence))?,
            tempo: Band::quartiles(&column(|f| f.tempo))?,
        })
    }

    /// Query parameters in the form the recommendations endpoint expects.
    pub fn query_params(&self) -> Vec<(String, String)> {
        [
            ("danceability", self.danceability),
            ("energy", self.energy),
            ("valence", self.valence),
            ("tempo", self.tempo),
        ]
        .iter()
        .flat_map(|(name, band)| {
            [
                (format!("min_{}", name), band.min.to_string()),
                (format!("max_{}", name), band.max.to_string()),
            ]
        })
        .collect()
    }
}

/// ISRCs that must not be recommended. Matching on ISRC also catches other
/// market releases of the same recording.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    isrcs: HashSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the track's ISRC. Tracks without one (local files) are ignored.
    pub fn add_track(&mut self, track: &Track) {
        if let Some(isrc) = track.isrc() {
            self.isrcs.insert(isrc.to_string());
        }
    }

    pub fn excludes(&self, track: &Track) -> bool {
        track.isrc().is_some_and(|isrc| self.isrcs.contains(isrc))
    }

    pub fn len(&self) -> usize {
        self.isrcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.isrcs.is_empty()
    }
}

/// Unique recommended track ids and album image URLs, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecommendationPool {
    ids: Vec<String>,
    images: Vec<String>,
    seen_ids: HashSet<String>,
    seen_images: HashSet<String>,
}

impl RecommendationPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every track the exclusions allow and returns how many were new.
    pub fn absorb(&mut self, tracks: &[Track], exclusions: &ExclusionSet) -> usize {
        let before = self.ids.len();
        for track in tracks {
            let Some(id) = &track.id else {
                continue;
            };
            if exclusions.excludes(track) {
                continue;
            }
            if self.seen_ids.insert(id.clone()) {
                self.ids.push(id.clone());
            }
            if let Some(url) = track.cover_url() {
                if self.seen_images.insert(url.to_string()) {
                    self.images.push(url.to_string());
                }
            }
        }
        self.ids.len() - before
    }

    pub fn is_satisfied(&self) -> bool {
        self.ids.len() >= RECOMMENDATION_TARGET
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Whether the given zero-based attempt should send the feature bands.
pub fn attempt_uses_bands(attempt: usize) -> bool {
    attempt < BANDED_ATTEMPTS
}
