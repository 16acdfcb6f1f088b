use serde::{Deserialize, Serialize};

/// One show in a day bucket.
///
/// Immutable once constructed. `title` falls back to `"Unknown Title"` and
/// `time` falls back to the bucket's day name when the source markup lacks
/// them; `episode_label` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowEntry {
    pub title: String,
    pub time: String,
    pub episode_label: String,
}

/// The normalized result of one extraction pass.
///
/// Produced fresh each time and never mutated. All three buckets may be
/// empty — that is a valid "no shows" state, distinct from the degraded
/// sentinel produced by [`ScheduleSnapshot::degraded`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub yesterday: Vec<ShowEntry>,
    pub today: Vec<ShowEntry>,
    pub tomorrow: Vec<ShowEntry>,
    pub featured_image_url: Option<String>,
}

impl ScheduleSnapshot {
    /// The fixed sentinel snapshot returned when extraction fails outright
    /// (navigation failure, timeout, unreachable source).
    pub fn degraded() -> Self {
        Self {
            yesterday: Vec::new(),
            today: vec![ShowEntry {
                title: "Scraping Error".to_string(),
                time: "N/A".to_string(),
                episode_label: "Please check next-episode.net manually".to_string(),
            }],
            tomorrow: Vec::new(),
            featured_image_url: None,
        }
    }

    /// True when all three day buckets are empty.
    pub fn is_empty(&self) -> bool {
        self.yesterday.is_empty() && self.today.is_empty() && self.tomorrow.is_empty()
    }
}

/// Opaque, stable identifier of a chat destination.
///
/// Telegram chat IDs are integers, but the storage file historically also
/// held string identities, so both JSON shapes are accepted (`42` and
/// `"42"` are distinct identities — no coercion).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatIdentity {
    Int(i64),
    Str(String),
}

impl std::fmt::Display for ChatIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatIdentity::Int(id) => write!(f, "{id}"),
            ChatIdentity::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ChatIdentity {
    fn from(id: i64) -> Self {
        ChatIdentity::Int(id)
    }
}

impl From<&str> for ChatIdentity {
    fn from(s: &str) -> Self {
        ChatIdentity::Str(s.to_string())
    }
}

/// A registered destination together with its routing sub-target.
///
/// `topic_id = None` routes to the chat's general section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub chat: ChatIdentity,
    pub topic_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_snapshot_has_exact_sentinel() {
        let snap = ScheduleSnapshot::degraded();
        assert!(snap.yesterday.is_empty());
        assert!(snap.tomorrow.is_empty());
        assert!(snap.featured_image_url.is_none());
        assert_eq!(snap.today.len(), 1);
        assert_eq!(snap.today[0].title, "Scraping Error");
        assert_eq!(snap.today[0].time, "N/A");
        assert_eq!(
            snap.today[0].episode_label,
            "Please check next-episode.net manually"
        );
    }

    #[test]
    fn degraded_snapshot_is_not_empty() {
        assert!(!ScheduleSnapshot::degraded().is_empty());
        assert!(ScheduleSnapshot::default().is_empty());
    }

    #[test]
    fn chat_identity_accepts_both_json_shapes() {
        let int: ChatIdentity = serde_json::from_str("-100123").unwrap();
        assert_eq!(int, ChatIdentity::Int(-100123));

        let s: ChatIdentity = serde_json::from_str("\"-100123\"").unwrap();
        assert_eq!(s, ChatIdentity::Str("-100123".to_string()));

        // No coercion: the two shapes are distinct identities.
        assert_ne!(int, s);
    }

    #[test]
    fn chat_identity_serializes_back_to_native_shape() {
        assert_eq!(
            serde_json::to_string(&ChatIdentity::Int(7)).unwrap(),
            "7"
        );
        assert_eq!(
            serde_json::to_string(&ChatIdentity::Str("abc".into())).unwrap(),
            "\"abc\""
        );
    }
}
