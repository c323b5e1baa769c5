// Channel classification — pure rules, no I/O.
//
// Maps one channel's metadata (language code, tag list, title) to a
// tri-level verdict with human-readable reasons. Mixed signals downgrade
// Bad to Warning rather than cancel out: an ambiguous channel is surfaced
// for human review, never silently cleared.

use crate::twitch::channels::ChannelMetadata;

/// Keyword sets and the flagged language code driving classification.
///
/// Kept on `Config` rather than as module constants so alternate rule
/// sets can be swapped in without touching the engine.
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// ISO language code that flags a channel on its own.
    pub flagged_language: String,
    /// Lower-case tags treated as a hostile signal.
    pub flagged_tags: Vec<String>,
    /// Lower-case tags treated as a protective signal.
    pub protective_tags: Vec<String>,
    /// Code points whose presence in a title is a protective signal
    /// (letters unique to the Ukrainian alphabet).
    pub protective_chars: Vec<char>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            flagged_language: "ru".to_string(),
            flagged_tags: vec![
                "русский".to_string(),
                "россия".to_string(),
                "russian".to_string(),
            ],
            protective_tags: vec![
                "українською".to_string(),
                "ukraine".to_string(),
                "україна".to_string(),
                "ukrainian".to_string(),
            ],
            protective_chars: "іІїЇєЄґҐ".chars().collect(),
        }
    }
}

pub const REASON_FLAGGED_LANGUAGE: &str = "Stream language is Russian";
pub const REASON_FLAGGED_TAG: &str = "Has a Russian-affiliated tag";
pub const REASON_PROTECTIVE_TAG: &str = "Has a Ukrainian tag";
pub const REASON_PROTECTIVE_TITLE: &str = "Ukrainian characters in the stream title";

/// Classification outcome for a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Neutral,
    Friend,
    Warning,
    Bad,
}

impl Verdict {
    /// Warning and Bad are flagged for review; Neutral and Friend are not.
    pub fn is_problematic(self) -> bool {
        matches!(self, Verdict::Warning | Verdict::Bad)
    }

    pub fn icon(self) -> &'static str {
        match self {
            Verdict::Bad => "🟥",
            Verdict::Warning => "🟨",
            Verdict::Friend | Verdict::Neutral => "",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Neutral => "Neutral",
            Verdict::Friend => "Friend",
            Verdict::Warning => "Warning",
            Verdict::Bad => "Bad",
        }
    }
}

/// Verdict plus the reasons behind it, in detection order
/// (bad reasons before friend reasons).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub verdict: Verdict,
    pub reasons: Vec<String>,
}

/// Classify one channel. Deterministic: same input, same verdict and
/// reason order, every call.
pub fn analyze(channel: &ChannelMetadata, rules: &RuleSet) -> AnalysisResult {
    let tags: Vec<String> = channel.tags.iter().map(|t| t.to_lowercase()).collect();

    let mut bad_reasons = Vec::new();
    let mut friend_reasons = Vec::new();

    if channel.broadcaster_language == rules.flagged_language {
        bad_reasons.push(REASON_FLAGGED_LANGUAGE.to_string());
    }
    if tags.iter().any(|t| rules.flagged_tags.contains(t)) {
        bad_reasons.push(REASON_FLAGGED_TAG.to_string());
    }

    if tags.iter().any(|t| rules.protective_tags.contains(t)) {
        friend_reasons.push(REASON_PROTECTIVE_TAG.to_string());
    }
    if channel
        .title
        .chars()
        .any(|c| rules.protective_chars.contains(&c))
    {
        friend_reasons.push(REASON_PROTECTIVE_TITLE.to_string());
    }

    match (!bad_reasons.is_empty(), !friend_reasons.is_empty()) {
        (true, true) => {
            let mut reasons = bad_reasons;
            reasons.extend(friend_reasons);
            AnalysisResult {
                verdict: Verdict::Warning,
                reasons,
            }
        }
        (true, false) => AnalysisResult {
            verdict: Verdict::Bad,
            reasons: bad_reasons,
        },
        // Friend and Neutral carry no detail row, so no reasons either.
        (false, true) => AnalysisResult {
            verdict: Verdict::Friend,
            reasons: Vec::new(),
        },
        (false, false) => AnalysisResult {
            verdict: Verdict::Neutral,
            reasons: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(language: &str, title: &str, tags: &[&str]) -> ChannelMetadata {
        ChannelMetadata {
            broadcaster_id: "1".to_string(),
            broadcaster_name: "test".to_string(),
            broadcaster_language: language.to_string(),
            title: title.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn flagged_language_alone_is_bad() {
        let result = analyze(&channel("ru", "stream", &[]), &RuleSet::default());
        assert_eq!(result.verdict, Verdict::Bad);
        assert_eq!(result.reasons, vec![REASON_FLAGGED_LANGUAGE.to_string()]);
    }

    #[test]
    fn mixed_signals_downgrade_to_warning() {
        let result = analyze(
            &channel("ru", "stream", &["ukraine"]),
            &RuleSet::default(),
        );
        assert_eq!(result.verdict, Verdict::Warning);
        assert_eq!(
            result.reasons,
            vec![
                REASON_FLAGGED_LANGUAGE.to_string(),
                REASON_PROTECTIVE_TAG.to_string()
            ]
        );
    }

    #[test]
    fn protective_title_characters_make_friend() {
        let result = analyze(&channel("uk", "Граємо далі", &[]), &RuleSet::default());
        assert_eq!(result.verdict, Verdict::Friend);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn tag_matching_is_case_insensitive() {
        let result = analyze(&channel("en", "stream", &["RUSSIAN"]), &RuleSet::default());
        assert_eq!(result.verdict, Verdict::Bad);
        assert_eq!(result.reasons, vec![REASON_FLAGGED_TAG.to_string()]);
    }
}
