// Followed-channel lists from the external collaborator.
//
// Helix has no "channels this user follows" endpoint a third party can
// call, so the audit leans on a community API that indexes follow
// relationships. The source may repeat a channel id; deduplication keeps
// the first occurrence.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::Error;

/// One (follower, channel) follow relationship.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowedLink {
    #[serde(rename = "id")]
    pub channel_id: String,
    #[serde(rename = "followedAt", default)]
    pub followed_at: Option<DateTime<Utc>>,
}

/// Seam between the audit coordinator and the follows source.
#[async_trait]
pub trait FollowsProvider: Send + Sync {
    async fn follows_of(&self, user_name: &str) -> Result<Vec<FollowedLink>, Error>;
}

/// HTTP implementation against the community follows API.
pub struct HttpFollowsProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFollowsProvider {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent("varta/0.1 (follower-audit)")
            .build()
            .map_err(Error::Transport)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl FollowsProvider for HttpFollowsProvider {
    async fn follows_of(&self, user_name: &str) -> Result<Vec<FollowedLink>, Error> {
        let url = format!("{}/getfollows/{}", self.base_url, user_name);

        debug!(user = user_name, "Fetching followed channels");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Error::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        response.json::<Vec<FollowedLink>>().await.map_err(Error::Parse)
    }
}

/// Drop duplicate channel ids, keeping the first occurrence of each.
pub fn dedup_follows(links: Vec<FollowedLink>) -> Vec<FollowedLink> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.channel_id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn dedup_keeps_first_occurrence() {
        let later = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let links = vec![
            FollowedLink {
                channel_id: "A".to_string(),
                followed_at: None,
            },
            FollowedLink {
                channel_id: "A".to_string(),
                followed_at: Some(later),
            },
            FollowedLink {
                channel_id: "B".to_string(),
                followed_at: None,
            },
        ];

        let deduped = dedup_follows(links);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].channel_id, "A");
        // First occurrence wins, so the timestamped duplicate is dropped.
        assert!(deduped[0].followed_at.is_none());
        assert_eq!(deduped[1].channel_id, "B");
    }
}
