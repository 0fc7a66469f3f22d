use std::{collections::HashMap, time::Duration};

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    Res, config,
    cli::{auth::session, cover::load_fonts},
    cover::{
        CompositionRequest, CoverComposer, CoverConfig, FileFontResolver, HttpImageFetcher,
        RngSource,
    },
    error, info, spotify, success,
    taste::{self, ExclusionSet, FeatureBands, GenreTally, RecommendationPool},
    types::{TasteTableRow, Track},
    utils, warning,
};

const TOP_TRACK_LIMIT: u32 = 50;
const TOP_TRACK_RANGE: &str = "short_term";
const SEED_TRACKS: usize = 3;
const RECOMMENDATION_LIMIT: u32 = 100;
const RECOMMENDED_PLAYLIST_SIZE: usize = 50;
const COVER_SOURCES: usize = 3;

/// Everything gathered for one listener before playlists are written.
struct Listening {
    display_name: String,
    top_ids: Vec<String>,
    top_images: Vec<String>,
    genres: Vec<String>,
    bands: Option<FeatureBands>,
    exclusions: usize,
    recommendations: RecommendationPool,
}

/// Controller account context shared by every listener.
struct Controller {
    token: String,
    user_id: String,
    month: String,
    year: i32,
    cover_config: CoverConfig,
    fonts: Option<FileFontResolver>,
}

/// Builds this month's playlists for every configured listener, or only for
/// `only_user`.
pub async fn run(only_user: Option<String>) {
    let users = match only_user {
        Some(user) => vec![user],
        None => match config::listener_users() {
            Ok(users) => users,
            Err(e) => error!("{}", e),
        },
    };

    let controller_name = match config::controller_user() {
        Ok(name) => name,
        Err(e) => error!("{}", e),
    };

    let mut controller_mgr = match session(&controller_name, &config::controller_scope()).await {
        Ok(mgr) => mgr,
        Err(e) => error!("Failed to authorize controller {}: {}", controller_name, e),
    };

    let controller_token = controller_mgr.get_valid_token().await;
    let controller_id = match spotify::users::current_user(&controller_token).await {
        Ok(user) => user.id,
        Err(e) => error!("Failed to load controller profile: {}", e),
    };

    let (month, year) = utils::month_label(Local::now().date_naive());
    let controller = Controller {
        token: controller_token,
        user_id: controller_id,
        month,
        year,
        cover_config: config::cover_config(),
        fonts: load_fonts(),
    };

    let mut rows = Vec::new();
    for user in &users {
        match process_user(user, &controller).await {
            Ok(row) => rows.push(row),
            Err(e) => warning!("Skipping {}: {}", user, e),
        }
    }

    if !rows.is_empty() {
        println!("{}", Table::new(rows));
    }
    success!("Done!");
}

async fn process_user(user: &str, controller: &Controller) -> Res<TasteTableRow> {
    let mut listener_mgr = session(user, &config::listener_scope()).await?;
    let token = listener_mgr.get_valid_token().await;

    let pb = spinner(format!("Analysing listening of {}...", user));
    let listening = analyse(&token, &pb).await;
    pb.finish_and_clear();
    let listening = listening?;
    success!(
        "{}: {} top tracks, {} recommendations",
        listening.display_name,
        listening.top_ids.len(),
        listening.recommendations.ids().len()
    );

    let top_name = format!("{}'s Top Tracks", controller.month);
    let top_description = format!(
        "{}'s top tracks for {} {}.",
        listening.display_name, controller.month, controller.year
    );
    publish(
        controller,
        &token,
        &top_name,
        &top_description,
        &listening.top_ids,
        &listening.top_images,
        "Top Tracks",
    )
    .await?;

    if listening.recommendations.is_empty() {
        info!("No recommendations for {}, skipping the second playlist", user);
    } else {
        let ids = listening.recommendations.ids();
        let ids = &ids[..ids.len().min(RECOMMENDED_PLAYLIST_SIZE)];
        let name = format!("{}'s Recommended Tracks", controller.month);
        let description = format!(
            "{}'s recommended tracks for {} {}.",
            listening.display_name, controller.month, controller.year
        );
        publish(
            controller,
            &token,
            &name,
            &description,
            ids,
            listening.recommendations.images(),
            "Recommended Tracks",
        )
        .await?;
    }

    Ok(taste_row(user, &listening))
}

async fn analyse(token: &str, pb: &ProgressBar) -> Res<Listening> {
    pb.set_message("Fetching top tracks...");
    let top = spotify::tracks::top_tracks(token, TOP_TRACK_LIMIT, TOP_TRACK_RANGE).await?;
    let top_ids = utils::track_ids(&top);
    let top_images = utils::cover_urls(&top);

    let mut exclusions = ExclusionSet::new();
    for track in &top {
        exclusions.add_track(track);
    }

    pb.set_message("Counting genres...");
    let tally = genre_tally(token, &top).await?;
    let genres = tally.top_two();

    pb.set_message("Reading audio features...");
    let features = spotify::tracks::audio_features(token, &top_ids).await?;
    let bands = FeatureBands::from_features(&features);

    pb.set_message("Collecting tracks already in playlists...");
    let playlists = spotify::playlist::all(token).await?;
    for (i, playlist) in playlists.iter().enumerate() {
        pb.set_message(format!(
            "Reading playlist {}/{}: {}",
            i + 1,
            playlists.len(),
            playlist.name
        ));
        for track in spotify::playlist::tracks(token, &playlist.id).await? {
            exclusions.add_track(&track);
        }
    }

    pb.set_message("Requesting recommendations...");
    let seeds = &top_ids[..top_ids.len().min(SEED_TRACKS)];
    let recommendations = recommend(token, seeds, &genres, bands.as_ref(), &exclusions).await?;

    let display_name = spotify::users::current_user(token).await?.name().to_string();

    Ok(Listening {
        display_name,
        top_ids,
        top_images,
        genres,
        bands,
        exclusions: exclusions.len(),
        recommendations,
    })
}

/// Genres counted once per artist credit on the top tracks.
async fn genre_tally(token: &str, tracks: &[Track]) -> Res<GenreTally> {
    let artist_ids = utils::unique_artist_ids(tracks);
    let artists = spotify::tracks::artists(token, &artist_ids).await?;
    let genres_by_artist: HashMap<&str, &Vec<String>> =
        artists.iter().map(|a| (a.id.as_str(), &a.genres)).collect();

    let mut tally = GenreTally::new();
    for artist_id in tracks
        .iter()
        .flat_map(|t| t.artists.iter())
        .filter_map(|a| a.id.as_deref())
    {
        if let Some(genres) = genres_by_artist.get(artist_id) {
            for genre in genres.iter() {
                tally.add(genre);
            }
        }
    }
    Ok(tally)
}

async fn recommend(
    token: &str,
    seeds: &[String],
    genres: &[String],
    bands: Option<&FeatureBands>,
    exclusions: &ExclusionSet,
) -> Res<RecommendationPool> {
    let mut pool = RecommendationPool::new();
    if seeds.is_empty() && genres.is_empty() {
        return Ok(pool);
    }

    for attempt in 0..taste::RECOMMENDATION_ATTEMPTS {
        if pool.is_satisfied() {
            break;
        }
        let bands = bands.filter(|_| taste::attempt_uses_bands(attempt));
        let tracks =
            spotify::recommendations::get(token, seeds, genres, bands, RECOMMENDATION_LIMIT)
                .await?;
        pool.absorb(&tracks, exclusions);
    }
    Ok(pool)
}

/// Creates a controller playlist, fills it, uploads its cover and lets the
/// listener follow it. A failed cover only warns.
async fn publish(
    controller: &Controller,
    listener_token: &str,
    name: &str,
    description: &str,
    track_ids: &[String],
    images: &[String],
    title: &str,
) -> Res<()> {
    let playlist = spotify::playlist::create(
        &controller.token,
        &controller.user_id,
        name,
        description,
    )
    .await?;
    spotify::playlist::add_tracks(&controller.token, &playlist.id, track_ids).await?;
    success!("Playlist {} created with {} tracks", name, track_ids.len());

    let sources = images.iter().take(COVER_SOURCES).cloned().collect();
    let request = CompositionRequest::new(sources, controller.month.clone(), title);
    match compose_cover(controller, request).await {
        Ok(cover) => {
            if let Err(e) =
                spotify::playlist::upload_cover(&controller.token, &playlist.id, &cover).await
            {
                warning!("Failed to upload cover for {}: {}", name, e);
            }
        }
        Err(e) => warning!("Failed to compose cover for {}: {}", name, e),
    }

    spotify::playlist::follow(listener_token, &playlist.id).await?;
    Ok(())
}

async fn compose_cover(controller: &Controller, request: CompositionRequest) -> Res<String> {
    let config = controller.cover_config.clone();
    let fonts = controller.fonts.clone();
    let handle = tokio::task::spawn_blocking(move || {
        let fetcher = HttpImageFetcher::new()?;
        let composer = CoverComposer::new(config, fetcher, fonts);
        composer
            .compose(&request, &mut RngSource::thread())
            .map(|c| c.to_base64())
    });
    Ok(handle.await??)
}

fn taste_row(user: &str, listening: &Listening) -> TasteTableRow {
    let band = |pick: fn(&FeatureBands) -> (f64, f64)| {
        listening
            .bands
            .as_ref()
            .map(|b| {
                let (min, max) = pick(b);
                utils::format_band(min, max)
            })
            .unwrap_or_else(|| "-".to_string())
    };

    TasteTableRow {
        user: user.to_string(),
        genres: listening.genres.join(","),
        danceability: band(|b| (b.danceability.min, b.danceability.max)),
        energy: band(|b| (b.energy.min, b.energy.max)),
        valence: band(|b| (b.valence.min, b.valence.max)),
        tempo: band(|b| (b.tempo.min, b.tempo.max)),
        excluded: listening.exclusions,
        recommended: listening.recommendations.ids().len(),
    }
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
