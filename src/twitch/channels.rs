// Channel metadata lookup in batches.
//
// `GET /channels` accepts up to 100 repeated broadcaster_id parameters
// per request. A rejected batch is skipped rather than aborting the whole
// lookup, so callers must tolerate a result set smaller than the input id
// set — the unresolved count makes that shortfall visible.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::client::HelixClient;
use crate::error::Error;

/// Helix caps the repeated broadcaster_id parameter at 100 per call.
pub const MAX_IDS_PER_REQUEST: usize = 100;

/// Raw channel metadata as returned by the platform. Read-only.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelMetadata {
    pub broadcaster_id: String,
    pub broadcaster_name: String,
    pub broadcaster_language: String,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
struct ChannelsPage {
    data: Vec<ChannelMetadata>,
}

/// Result of a batched lookup. Order is chunk order, not input order.
#[derive(Debug, Default)]
pub struct ChannelLookup {
    pub channels: Vec<ChannelMetadata>,
    /// Ids that did not come back: skipped batches plus ids the platform
    /// simply did not return.
    pub unresolved: usize,
}

/// Seam between the audit coordinator and the metadata source.
#[async_trait]
pub trait ChannelResolver: Send + Sync {
    async fn fetch_many(&self, channel_ids: &[String]) -> Result<ChannelLookup, Error>;
}

#[async_trait]
impl ChannelResolver for HelixClient {
    /// Resolve metadata for a list of channel ids, 100 per request.
    ///
    /// An API rejection of one batch is absorbed (logged, batch skipped);
    /// a transport or parse fault aborts, since nothing after it can be
    /// trusted either.
    async fn fetch_many(&self, channel_ids: &[String]) -> Result<ChannelLookup, Error> {
        let mut lookup = ChannelLookup::default();

        for chunk in channel_ids.chunks(MAX_IDS_PER_REQUEST) {
            let params: Vec<(&str, &str)> = chunk
                .iter()
                .map(|id| ("broadcaster_id", id.as_str()))
                .collect();

            match self.get_json::<ChannelsPage>("channels", &params).await {
                Ok(page) => lookup.channels.extend(page.data),
                Err(Error::Api { status, body }) => {
                    warn!(
                        %status,
                        batch_size = chunk.len(),
                        body = %body,
                        "Channel info batch rejected, skipping"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        lookup.unresolved = channel_ids.len().saturating_sub(lookup.channels.len());
        if lookup.unresolved > 0 {
            warn!(
                unresolved = lookup.unresolved,
                requested = channel_ids.len(),
                "Some channel ids did not resolve"
            );
        }

        Ok(lookup)
    }
}
