use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    Res, config, error, info, management::TokenManager, spotify, success, types::PkceToken,
};

/// Authorizes `user` (or the controller account) and caches its token.
pub async fn auth(user: Option<String>, controller: bool) {
    let (user, scope) = match resolve_account(user, controller) {
        Ok(account) => account,
        Err(e) => error!("{}", e),
    };

    info!("Authorize {} with scope \"{}\"", user, scope);
    let shared_state: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
    match spotify::auth::auth(&user, &scope, shared_state).await {
        Ok(_) => success!("Authentication of {} successful!", user),
        Err(e) => error!("{}", e),
    }
}

fn resolve_account(user: Option<String>, controller: bool) -> Result<(String, String), String> {
    if controller {
        let user = match user {
            Some(user) => user,
            None => config::controller_user()?,
        };
        return Ok((user, config::controller_scope()));
    }

    let user = user.ok_or("Name the account to authorize with --user, or pass --controller.")?;
    Ok((user, config::listener_scope()))
}

/// Cached token for `user`, running the authorization flow when none is
/// cached yet or the cached one was granted fewer scopes than `scope`.
pub async fn session(user: &str, scope: &str) -> Res<TokenManager> {
    match TokenManager::load(user).await {
        Ok(manager) if manager.covers_scope(scope) => return Ok(manager),
        Ok(_) => info!("Cached token of {} lacks scope \"{}\", authorizing again", user, scope),
        Err(_) => info!("No cached token for {}, starting authorization", user),
    }

    let shared_state: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
    spotify::auth::auth(user, scope, shared_state).await
}
