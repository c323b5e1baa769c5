// User operations: broadcaster identity after login, login lookup,
// and blocking.

use serde::Deserialize;

use super::client::HelixClient;
use crate::error::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct TwitchUser {
    pub id: String,
    pub login: String,
    pub display_name: String,
    #[serde(default)]
    pub profile_image_url: String,
}

#[derive(Deserialize)]
struct UsersPage {
    data: Vec<TwitchUser>,
}

/// Resolve the user the access token belongs to. `GET /users` with no
/// parameters returns the token's own user.
pub async fn current_user(client: &HelixClient) -> Result<TwitchUser, Error> {
    let page: UsersPage = client.get_json("users", &[]).await?;
    page.data.into_iter().next().ok_or_else(|| {
        Error::Authentication("access token did not resolve to a user".to_string())
    })
}

/// Look up a user by login name. `None` when the login does not exist.
pub async fn user_by_login(
    client: &HelixClient,
    login: &str,
) -> Result<Option<TwitchUser>, Error> {
    let page: UsersPage = client.get_json("users", &[("login", login)]).await?;
    Ok(page.data.into_iter().next())
}

/// Block a user on behalf of the authenticated broadcaster.
/// Requires the user:manage:blocked_users scope.
pub async fn block_user(client: &HelixClient, target_user_id: &str) -> Result<(), Error> {
    client
        .put("users/blocks", &[("target_user_id", target_user_id)])
        .await
}
