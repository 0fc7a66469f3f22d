use std::{future::Future, net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::sync::Mutex;

use crate::{Res, api, config, types::PkceToken};

/// Serves the OAuth callback until `shutdown` resolves.
pub async fn start_api_server<S>(state: Arc<Mutex<Option<PkceToken>>>, shutdown: S) -> Res<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state));

    let addr = SocketAddr::from_str(&config::server_addr()?)
        .map_err(|e| format!("Failed to parse server address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
