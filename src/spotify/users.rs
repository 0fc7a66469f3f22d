use reqwest::Client;

use crate::{Res, spotify, types::CurrentUser};

/// Profile of the account owning `token`.
pub async fn current_user(token: &str) -> Res<CurrentUser> {
    let url = spotify::api_url("/me")?;
    let client = Client::new();
    let response = spotify::send(|| client.get(&url).bearer_auth(token)).await?;
    Ok(response.json::<CurrentUser>().await?)
}
