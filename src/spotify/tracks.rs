use reqwest::Client;

use crate::{
    Res, spotify,
    types::{
        Artist, AudioFeatures, AudioFeaturesResponse, SeveralArtistsResponse, TopTracksResponse,
        Track,
    },
};

const AUDIO_FEATURES_BATCH: usize = 100;
const ARTISTS_BATCH: usize = 50;

/// The user's most played tracks over `time_range`
/// (`short_term`, `medium_term` or `long_term`). `limit` is capped at 50.
pub async fn top_tracks(token: &str, limit: u32, time_range: &str) -> Res<Vec<Track>> {
    let url = spotify::api_url("/me/top/tracks")?;
    let limit = limit.min(50).to_string();
    let client = Client::new();
    let response = spotify::send(|| {
        client
            .get(&url)
            .bearer_auth(token)
            .query(&[("limit", limit.as_str()), ("time_range", time_range)])
    })
    .await?;

    Ok(response.json::<TopTracksResponse>().await?.items)
}

/// Audio features for `ids`, batched 100 per request. Tracks Spotify has no
/// analysis for are left out.
pub async fn audio_features(token: &str, ids: &[String]) -> Res<Vec<AudioFeatures>> {
    let url = spotify::api_url("/audio-features")?;
    let client = Client::new();
    let mut features = Vec::with_capacity(ids.len());

    for chunk in ids.chunks(AUDIO_FEATURES_BATCH) {
        let joined = chunk.join(",");
        let response = spotify::send(|| {
            client
                .get(&url)
                .bearer_auth(token)
                .query(&[("ids", joined.as_str())])
        })
        .await?;
        let json = response.json::<AudioFeaturesResponse>().await?;
        features.extend(json.audio_features.into_iter().flatten());
    }

    Ok(features)
}

/// Full artist objects for `ids`, batched 50 per request.
pub async fn artists(token: &str, ids: &[String]) -> Res<Vec<Artist>> {
    let url = spotify::api_url("/artists")?;
    let client = Client::new();
    let mut artists = Vec::with_capacity(ids.len());

    for chunk in ids.chunks(ARTISTS_BATCH) {
        let joined = chunk.join(",");
        let response = spotify::send(|| {
            client
                .get(&url)
                .bearer_auth(token)
                .query(&[("ids", joined.as_str())])
        })
        .await?;
        let json = response.json::<SeveralArtistsResponse>().await?;
        artists.extend(json.artists.into_iter().flatten());
    }

    Ok(artists)
}
