use monthlycli::{
    taste::{
        self, Band, ExclusionSet, FeatureBands, GenreTally, RecommendationPool, percentile,
    },
    types::{AudioFeatures, Track},
};
use serde_json::json;

fn track(id: &str, isrc: Option<&str>, image: Option<&str>) -> Track {
    let album = match image {
        Some(url) => json!({ "images": [{ "url": url, "height": 640, "width": 640 }] }),
        None => json!({ "images": [] }),
    };
    serde_json::from_value(json!({
        "id": id,
        "name": format!("Track {}", id),
        "external_ids": { "isrc": isrc },
        "album": album,
        "artists": [{ "id": format!("{}_artist", id), "name": "Artist" }],
    }))
    .unwrap()
}

fn features(values: &[(f64, f64, f64, f64)]) -> Vec<AudioFeatures> {
    values
        .iter()
        .enumerate()
        .map(|(i, &(danceability, energy, valence, tempo))| AudioFeatures {
            id: format!("t{}", i),
            danceability,
            energy,
            valence,
            tempo,
        })
        .collect()
}

fn tally(genres: &[&str]) -> GenreTally {
    let mut tally = GenreTally::new();
    for genre in genres {
        tally.add(genre);
    }
    tally
}

#[test]
fn test_percentile_interpolates_linearly() {
    let values = [4.0, 1.0, 3.0, 2.0];
    assert_eq!(percentile(&values, 25.0), Some(1.75));
    assert_eq!(percentile(&values, 75.0), Some(3.25));
    assert_eq!(percentile(&values, 0.0), Some(1.0));
    assert_eq!(percentile(&values, 100.0), Some(4.0));
}

#[test]
fn test_percentile_edge_cases() {
    assert_eq!(percentile(&[0.42], 25.0), Some(0.42));
    assert_eq!(percentile(&[], 75.0), None);
}

#[test]
fn test_top_two_picks_highest_counts() {
    let tally = tally(&["a", "b", "c", "b", "c", "b"]);
    assert_eq!(tally.count("b"), 3);
    assert_eq!(tally.len(), 3);
    assert_eq!(tally.top_two(), vec!["b", "c"]);
}

#[test]
fn test_top_two_keeps_earlier_genre_on_ties() {
    let tally = tally(&["rock", "jazz", "pop", "pop", "rock", "jazz"]);
    assert_eq!(tally.top_two(), vec!["rock", "jazz"]);
}

#[test]
fn test_top_two_with_few_genres() {
    assert!(GenreTally::new().top_two().is_empty());
    assert_eq!(tally(&["indie"]).top_two(), vec!["indie"]);
    assert_eq!(tally(&["indie", "folk", "folk"]).top_two(), vec!["folk", "indie"]);
}

#[test]
fn test_feature_bands_are_interquartile() {
    let features = features(&[
        (0.1, 0.4, 0.2, 100.0),
        (0.2, 0.3, 0.4, 120.0),
        (0.3, 0.2, 0.6, 140.0),
        (0.4, 0.1, 0.8, 160.0),
    ]);
    let bands = FeatureBands::from_features(&features).unwrap();

    assert!((bands.danceability.min - 0.175).abs() < 1e-9);
    assert!((bands.danceability.max - 0.325).abs() < 1e-9);
    assert!((bands.energy.min - 0.175).abs() < 1e-9);
    assert!((bands.valence.max - 0.65).abs() < 1e-9);
    assert_eq!(bands.tempo, Band { min: 115.0, max: 145.0 });
}

#[test]
fn test_feature_bands_need_features() {
    assert!(FeatureBands::from_features(&[]).is_none());
}

#[test]
fn test_feature_band_query_params() {
    let bands = FeatureBands::from_features(&features(&[(0.5, 0.6, 0.7, 128.0)])).unwrap();
    let params = bands.query_params();

    assert_eq!(params.len(), 8);
    assert!(params.contains(&("min_danceability".to_string(), "0.5".to_string())));
    assert!(params.contains(&("max_energy".to_string(), "0.6".to_string())));
    assert!(params.contains(&("min_valence".to_string(), "0.7".to_string())));
    assert!(params.contains(&("max_tempo".to_string(), "128".to_string())));
}

#[test]
fn test_exclusions_match_on_isrc() {
    let mut exclusions = ExclusionSet::new();
    exclusions.add_track(&track("a", Some("USRC17607839"), None));
    exclusions.add_track(&track("local", None, None));

    assert_eq!(exclusions.len(), 1);
    // same recording released under another id
    assert!(exclusions.excludes(&track("b", Some("USRC17607839"), None)));
    assert!(!exclusions.excludes(&track("c", Some("GBAYE0601498"), None)));
    assert!(!exclusions.excludes(&track("d", None, None)));
}

#[test]
fn test_pool_skips_excluded_and_duplicates() {
    let mut exclusions = ExclusionSet::new();
    exclusions.add_track(&track("top", Some("ISRC-TOP"), None));

    let mut pool = RecommendationPool::new();
    let first = pool.absorb(
        &[
            track("r1", Some("ISRC-1"), Some("https://img/1")),
            track("r2", Some("ISRC-TOP"), Some("https://img/2")),
            track("r3", Some("ISRC-3"), Some("https://img/1")),
        ],
        &exclusions,
    );
    let second = pool.absorb(
        &[
            track("r3", Some("ISRC-3"), Some("https://img/1")),
            track("r4", None, Some("https://img/4")),
        ],
        &exclusions,
    );

    assert_eq!(first, 2);
    assert_eq!(second, 1);
    assert_eq!(pool.ids(), ["r1", "r3", "r4"]);
    assert_eq!(pool.images(), ["https://img/1", "https://img/4"]);
}

#[test]
fn test_pool_satisfied_at_target() {
    let exclusions = ExclusionSet::new();
    let mut pool = RecommendationPool::new();
    assert!(pool.is_empty());

    let tracks: Vec<Track> = (0..taste::RECOMMENDATION_TARGET - 1)
        .map(|i| track(&format!("id{}", i), None, None))
        .collect();
    pool.absorb(&tracks, &exclusions);
    assert!(!pool.is_satisfied());

    pool.absorb(&[track("last", None, None)], &exclusions);
    assert!(pool.is_satisfied());
    assert!(pool.images().is_empty());
}

#[test]
fn test_bands_only_on_early_attempts() {
    let banded: Vec<bool> = (0..taste::RECOMMENDATION_ATTEMPTS)
        .map(taste::attempt_uses_bands)
        .collect();
    assert_eq!(banded, vec![true, true, true, false, false]);
}
