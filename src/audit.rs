// Per-follower audit: resolve followed channels, classify each, and
// aggregate counts and detail rows.
//
// Audits run strictly sequentially — one follower's network calls finish
// before the next begin, which bounds concurrent load on the platform API
// and keeps progress reporting ordered.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::classify::{self, RuleSet, Verdict};
use crate::error::Error;
use crate::follows::{dedup_follows, FollowedLink, FollowsProvider};
use crate::twitch::channels::ChannelResolver;
use crate::twitch::followers::Follower;

pub const UNKNOWN_DATE: &str = "Unknown date";
pub const NO_PROBLEM_ROW: &str = "No problematic follows found.";

/// Lifecycle of a follower's audit. Completed and NoFollows are terminal
/// and block automatic re-entry; Failed is terminal for the attempt only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuditState {
    #[default]
    NotAnalyzed,
    InProgress,
    NoFollows,
    Completed,
    Failed,
}

/// One displayed row: a Warning/Bad channel, or the single sentinel row
/// of a clean audit.
#[derive(Debug, Clone)]
pub struct DetailRow {
    pub icon: String,
    pub channel_name: String,
    pub follow_date: String,
    pub reason: String,
}

/// Aggregated result of one follower's audit. Replaced wholesale on
/// re-analysis, never patched in place.
#[derive(Debug, Clone, Default)]
pub struct FollowerAudit {
    pub state: AuditState,
    /// Raw follow count, before deduplication.
    pub total_followed_channels: usize,
    pub bad_count: usize,
    pub warning_count: usize,
    pub details: Vec<DetailRow>,
}

impl FollowerAudit {
    pub fn no_follows() -> Self {
        Self {
            state: AuditState::NoFollows,
            ..Default::default()
        }
    }

    pub fn failed() -> Self {
        Self {
            state: AuditState::Failed,
            ..Default::default()
        }
    }

    /// States that a plain "analyze all" pass must not re-enter.
    pub fn is_settled(&self) -> bool {
        matches!(self.state, AuditState::Completed | AuditState::NoFollows)
    }

    pub fn status_text(&self) -> String {
        derive_status(self)
    }
}

/// Derive the display status from counts and state.
///
/// NoFollows keeps its own text — a follower with zero follows is a
/// different outcome than "analyzed, nothing found" and must not be
/// absorbed into the generic derivation.
pub fn derive_status(audit: &FollowerAudit) -> String {
    match audit.state {
        AuditState::NotAnalyzed => "Awaiting analysis...".to_string(),
        AuditState::InProgress => "Analyzing...".to_string(),
        AuditState::NoFollows => "No followed channels".to_string(),
        AuditState::Failed => "Analysis failed".to_string(),
        AuditState::Completed => {
            if audit.total_followed_channels > 0 {
                if audit.bad_count > 0 || audit.warning_count > 0 {
                    format!(
                        "🟥 Flagged: {}, 🟨 Suspicious: {} (of {})",
                        audit.bad_count, audit.warning_count, audit.total_followed_channels
                    )
                } else {
                    format!("✅ None detected (of {})", audit.total_followed_channels)
                }
            } else {
                "✅ None detected".to_string()
            }
        }
    }
}

/// A follower together with their audit state, as held by the CLI.
#[derive(Debug, Clone)]
pub struct FollowerRecord {
    pub follower: Follower,
    pub audit: FollowerAudit,
}

impl FollowerRecord {
    pub fn new(follower: Follower) -> Self {
        Self {
            follower,
            audit: FollowerAudit::default(),
        }
    }
}

/// Orchestrates one follower's audit against the follows source and the
/// channel metadata source.
pub struct Auditor<'a> {
    pub follows: &'a dyn FollowsProvider,
    pub channels: &'a dyn ChannelResolver,
    pub rules: &'a RuleSet,
}

impl<'a> Auditor<'a> {
    /// Audit a single follower.
    ///
    /// A fault from either collaborator aborts this follower's audit and
    /// propagates; counts are never taken from a partial state.
    pub async fn audit(&self, follower: &Follower) -> Result<FollowerAudit, Error> {
        let follows = self.follows.follows_of(&follower.user_name).await?;
        let total = follows.len();

        if follows.is_empty() {
            return Ok(FollowerAudit::no_follows());
        }

        let follows = dedup_follows(follows);
        let ids: Vec<String> = follows.iter().map(|f| f.channel_id.clone()).collect();
        let lookup = self.channels.fetch_many(&ids).await?;

        let links: HashMap<&str, &FollowedLink> = follows
            .iter()
            .map(|link| (link.channel_id.as_str(), link))
            .collect();

        let mut audit = FollowerAudit {
            state: AuditState::Completed,
            total_followed_channels: total,
            ..Default::default()
        };

        for channel in &lookup.channels {
            let analysis = classify::analyze(channel, self.rules);
            if !analysis.verdict.is_problematic() {
                continue;
            }

            let follow_date = links
                .get(channel.broadcaster_id.as_str())
                .and_then(|link| link.followed_at)
                .map(|date| date.format("%d %B %Y").to_string())
                .unwrap_or_else(|| UNKNOWN_DATE.to_string());

            audit.details.push(DetailRow {
                icon: analysis.verdict.icon().to_string(),
                channel_name: channel.broadcaster_name.clone(),
                follow_date,
                reason: analysis.reasons.join(", "),
            });

            match analysis.verdict {
                Verdict::Bad => audit.bad_count += 1,
                Verdict::Warning => audit.warning_count += 1,
                Verdict::Neutral | Verdict::Friend => {}
            }
        }

        if audit.details.is_empty() {
            audit.details.push(DetailRow {
                icon: String::new(),
                channel_name: NO_PROBLEM_ROW.to_string(),
                follow_date: String::new(),
                reason: String::new(),
            });
        }

        info!(
            follower = %follower.user_name,
            total,
            bad = audit.bad_count,
            warning = audit.warning_count,
            "Audit completed"
        );

        Ok(audit)
    }

    /// Audit one record in place, honoring the re-entry guard.
    ///
    /// Returns Ok(false) when the record was skipped as already settled.
    /// On a fault the record is marked Failed and the error propagates;
    /// a later pass (or --force) may retry it.
    pub async fn audit_record(
        &self,
        record: &mut FollowerRecord,
        force: bool,
    ) -> Result<bool, Error> {
        if !force && record.audit.is_settled() {
            return Ok(false);
        }

        record.audit.state = AuditState::InProgress;
        match self.audit(&record.follower).await {
            Ok(audit) => {
                record.audit = audit;
                Ok(true)
            }
            Err(e) => {
                record.audit = FollowerAudit::failed();
                Err(e)
            }
        }
    }

    /// Audit every record, strictly sequentially. Returns how many audits
    /// actually ran (skipped settled records don't count).
    pub async fn audit_all(&self, records: &mut [FollowerRecord], force: bool) -> usize {
        let total = records.len();
        let mut audited = 0;

        for (i, record) in records.iter_mut().enumerate() {
            println!(
                "  Auditing {}/{} ({})...",
                i + 1,
                total,
                record.follower.user_name
            );
            match self.audit_record(record, force).await {
                Ok(true) => audited += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(
                        follower = %record.follower.user_name,
                        error = %e,
                        "Audit failed"
                    );
                }
            }
        }

        audited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_for_flagged_counts() {
        let audit = FollowerAudit {
            state: AuditState::Completed,
            total_followed_channels: 40,
            bad_count: 2,
            warning_count: 1,
            details: Vec::new(),
        };
        assert_eq!(derive_status(&audit), "🟥 Flagged: 2, 🟨 Suspicious: 1 (of 40)");
    }

    #[test]
    fn status_for_clean_audit() {
        let audit = FollowerAudit {
            state: AuditState::Completed,
            total_followed_channels: 12,
            ..Default::default()
        };
        assert_eq!(derive_status(&audit), "✅ None detected (of 12)");
    }

    #[test]
    fn no_follows_text_is_not_overwritten_by_generic_derivation() {
        let audit = FollowerAudit::no_follows();
        assert_eq!(derive_status(&audit), "No followed channels");
    }

    #[test]
    fn settled_states_block_automatic_reentry() {
        assert!(FollowerAudit::no_follows().is_settled());
        assert!(FollowerAudit {
            state: AuditState::Completed,
            ..Default::default()
        }
        .is_settled());
        assert!(!FollowerAudit::failed().is_settled());
        assert!(!FollowerAudit::default().is_settled());
    }
}
