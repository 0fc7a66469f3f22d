use reqwest::Client;

use crate::{Res, spotify, taste::FeatureBands, types::{RecommendationsResponse, Track}};

/// Tracks recommended from the given seeds, optionally constrained to the
/// audio feature bands. Spotify accepts at most five seeds in total.
pub async fn get(
    token: &str,
    seed_tracks: &[String],
    seed_genres: &[String],
    bands: Option<&FeatureBands>,
    limit: u32,
) -> Res<Vec<Track>> {
    let url = spotify::api_url("/recommendations")?;

    let mut params: Vec<(String, String)> = vec![("limit".to_string(), limit.min(100).to_string())];
    if !seed_tracks.is_empty() {
        params.push(("seed_tracks".to_string(), seed_tracks.join(",")));
    }
    if !seed_genres.is_empty() {
        params.push(("seed_genres".to_string(), seed_genres.join(",")));
    }
    if let Some(bands) = bands {
        params.extend(bands.query_params());
    }

    let client = Client::new();
    let response =
        spotify::send(|| client.get(&url).bearer_auth(token).query(&params)).await?;

    Ok(response.json::<RecommendationsResponse>().await?.tracks)
}
