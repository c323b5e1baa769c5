// Follower list fetching with cursor pagination.
//
// Walks `GET /channels/followers` in pages of up to 100, following the
// opaque `after` cursor until the platform stops returning one. A fault
// on any page ends the walk but keeps what was already accumulated — the
// earlier pages are not thrown away over a late failure.

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::client::HelixClient;

/// One distinct follower of the audited broadcaster. Immutable once fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct Follower {
    pub user_name: String,
    pub user_id: String,
}

#[derive(Deserialize)]
struct FollowersPage {
    data: Vec<Follower>,
    #[serde(default)]
    pagination: Pagination,
}

#[derive(Deserialize, Default)]
struct Pagination {
    cursor: Option<String>,
}

/// Fetch the full follower list for a broadcaster.
///
/// Returns a partial list (with a logged diagnostic) if a page fails;
/// no retry.
pub async fn fetch_all(client: &HelixClient, broadcaster_id: &str) -> Vec<Follower> {
    let mut followers = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let mut params = vec![("broadcaster_id", broadcaster_id), ("first", "100")];
        if let Some(ref after) = cursor {
            params.push(("after", after.as_str()));
        }

        let page: FollowersPage = match client.get_json("channels/followers", &params).await {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "Follower page fetch failed, keeping partial list");
                break;
            }
        };

        if page.data.is_empty() {
            break;
        }
        followers.extend(page.data);

        debug!(total = followers.len(), "Fetched follower page");

        cursor = page.pagination.cursor.filter(|c| !c.is_empty());
        if cursor.is_none() {
            break;
        }
    }

    info!(count = followers.len(), "Collected followers");
    followers
}
