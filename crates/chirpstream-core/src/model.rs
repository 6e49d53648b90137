// ── Tweet domain type ──

use serde::{Deserialize, Serialize};

/// A single tweet as relayed by the stream server.
///
/// The relay forwards Twitter's JSON unmodified, so only `text` is
/// required; everything else is optional metadata. `#[serde(flatten)]`
/// captures all fields beyond the core set, so nothing from the relay
/// is silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    /// Tweet body. The view projection filters on this field.
    pub text: String,

    /// String form of the tweet id.
    #[serde(default, rename = "id_str")]
    pub id: Option<String>,

    /// Author, when the relay includes one.
    #[serde(default)]
    pub user: Option<TweetUser>,

    /// Creation timestamp in Twitter's own format.
    #[serde(default)]
    pub created_at: Option<String>,

    /// All remaining fields the relay sends.
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// Author sub-object of a relayed tweet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetUser {
    #[serde(default)]
    pub screen_name: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl Tweet {
    /// Parse one raw feed record.
    pub fn from_record(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// The author's screen name, when known.
    pub fn author(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.screen_name.as_deref())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_relay_payload() {
        let raw = r#"{
            "id_str": "850006245121695744",
            "text": "Never drive a Porsche into a lake",
            "created_at": "Thu Apr 06 15:24:15 +0000 2017",
            "user": { "screen_name": "ferry", "name": "Ferry P.", "verified": false },
            "retweet_count": 3,
            "lang": "en"
        }"#;

        let tweet = Tweet::from_record(raw).unwrap();
        assert_eq!(tweet.text, "Never drive a Porsche into a lake");
        assert_eq!(tweet.id.as_deref(), Some("850006245121695744"));
        assert_eq!(tweet.author(), Some("ferry"));
        assert_eq!(
            tweet.created_at.as_deref(),
            Some("Thu Apr 06 15:24:15 +0000 2017")
        );
        // Fields outside the core set land in `extra`.
        assert_eq!(tweet.extra["retweet_count"], 3);
        assert_eq!(tweet.extra["lang"], "en");
    }

    #[test]
    fn text_only_payload_is_enough() {
        let tweet = Tweet::from_record(r#"{"text":"bare"}"#).unwrap();
        assert_eq!(tweet.text, "bare");
        assert!(tweet.id.is_none());
        assert!(tweet.author().is_none());
    }

    #[test]
    fn missing_text_is_rejected() {
        assert!(Tweet::from_record(r#"{"id_str":"1"}"#).is_err());
    }

    #[test]
    fn invalid_syntax_is_rejected() {
        assert!(Tweet::from_record("not json at all").is_err());
    }
}
