use reqwest::{Client, header::CONTENT_TYPE};

use crate::{
    Res, spotify,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, FollowPlaylistRequest, GetUserPlaylistsResponse, Playlist,
        PlaylistItemsResponse, Track,
    },
    utils,
};

pub const PLAYLIST_PAGE_SIZE: usize = 50;
const ADD_TRACKS_BATCH: usize = 100;

/// One page of the current user's playlists.
pub async fn list_page(token: &str, offset: usize) -> Res<Vec<Playlist>> {
    let url = spotify::api_url("/me/playlists")?;
    let limit = PLAYLIST_PAGE_SIZE.to_string();
    let offset = offset.to_string();
    let client = Client::new();
    let response = spotify::send(|| {
        client
            .get(&url)
            .bearer_auth(token)
            .query(&[("limit", limit.as_str()), ("offset", offset.as_str())])
    })
    .await?;

    Ok(response.json::<GetUserPlaylistsResponse>().await?.items)
}

/// Every playlist of the current user. Paging stops at the first short page.
pub async fn all(token: &str) -> Res<Vec<Playlist>> {
    let mut playlists = Vec::new();
    let mut offset = 0;
    loop {
        let page = list_page(token, offset).await?;
        let short = page.len() < PLAYLIST_PAGE_SIZE;
        playlists.extend(page);
        if short {
            break;
        }
        offset += PLAYLIST_PAGE_SIZE;
    }
    Ok(playlists)
}

/// Tracks of a playlist, following `next` links. Episodes and removed
/// tracks come back without a track and are skipped.
pub async fn tracks(token: &str, playlist_id: &str) -> Res<Vec<Track>> {
    let client = Client::new();
    let mut next = Some(format!(
        "{}?limit=100",
        spotify::api_url(&format!("/playlists/{}/tracks", playlist_id))?
    ));
    let mut tracks = Vec::new();

    while let Some(url) = next {
        let response = spotify::send(|| client.get(&url).bearer_auth(token)).await?;
        let page = response.json::<PlaylistItemsResponse>().await?;
        tracks.extend(page.items.into_iter().filter_map(|item| item.track));
        next = page.next;
    }

    Ok(tracks)
}

/// Creates a private playlist owned by `user_id`.
pub async fn create(
    token: &str,
    user_id: &str,
    name: &str,
    description: &str,
) -> Res<CreatePlaylistResponse> {
    let url = spotify::api_url(&format!("/users/{}/playlists", user_id))?;
    let body = CreatePlaylistRequest {
        name: name.to_string(),
        description: description.to_string(),
        public: false,
        collaborative: false,
    };

    let client = Client::new();
    let response = spotify::send(|| client.post(&url).bearer_auth(token).json(&body)).await?;
    Ok(response.json::<CreatePlaylistResponse>().await?)
}

/// Appends tracks by id, 100 per request. Returns the last snapshot id.
pub async fn add_tracks(
    token: &str,
    playlist_id: &str,
    track_ids: &[String],
) -> Res<Option<String>> {
    let url = spotify::api_url(&format!("/playlists/{}/tracks", playlist_id))?;
    let client = Client::new();
    let mut snapshot = None;

    for chunk in track_ids.chunks(ADD_TRACKS_BATCH) {
        let body = AddTrackToPlaylistRequest {
            uris: chunk.iter().map(|id| utils::track_uri(id)).collect(),
        };
        let response = spotify::send(|| client.post(&url).bearer_auth(token).json(&body)).await?;
        snapshot = Some(response.json::<AddTrackToPlaylistResponse>().await?.snapshot_id);
    }

    Ok(snapshot)
}

/// Replaces the playlist cover with a base64 encoded JPEG.
pub async fn upload_cover(token: &str, playlist_id: &str, jpeg_base64: &str) -> Res<()> {
    let url = spotify::api_url(&format!("/playlists/{}/images", playlist_id))?;
    let client = Client::new();
    spotify::send(|| {
        client
            .put(&url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "image/jpeg")
            .body(jpeg_base64.to_string())
    })
    .await?;
    Ok(())
}

/// Follows a playlist with the account owning `token`.
pub async fn follow(token: &str, playlist_id: &str) -> Res<()> {
    let url = spotify::api_url(&format!("/playlists/{}/followers", playlist_id))?;
    let body = FollowPlaylistRequest { public: true };
    let client = Client::new();
    spotify::send(|| client.put(&url).bearer_auth(token).json(&body)).await?;
    Ok(())
}
