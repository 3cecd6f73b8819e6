//! Raw form submission as received from the host.

use serde::Deserialize;

use crate::sanitize::sanitize;
use crate::CampaignFields;

/// Submission key carrying the chosen destination URL.
pub const SELECT_PAGE_KEY: &str = "select-page";

/// Unsanitized submission. Missing keys deserialize to `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CampaignSubmission {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "select-page")]
    pub select_page: Option<String>,
}

impl CampaignSubmission {
    /// Build from key/value pairs. Unknown keys are ignored; a repeated key
    /// keeps its last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut out = Self::default();
        for (k, v) in pairs {
            let slot = match k.as_ref() {
                "source" => &mut out.source,
                "medium" => &mut out.medium,
                "term" => &mut out.term,
                "content" => &mut out.content,
                "name" => &mut out.name,
                SELECT_PAGE_KEY => &mut out.select_page,
                _ => continue,
            };
            *slot = Some(v.into());
        }
        out
    }

    /// Sanitize the five text fields and attach an already-resolved
    /// destination. The destination is never sanitized.
    pub fn to_fields(&self, destination_url: String) -> CampaignFields {
        CampaignFields {
            source: sanitize(self.source.as_deref()),
            medium: sanitize(self.medium.as_deref()),
            term: sanitize(self.term.as_deref()),
            content: sanitize(self.content.as_deref()),
            name: sanitize(self.name.as_deref()),
            destination_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_maps_known_keys() {
        let sub = CampaignSubmission::from_pairs([
            ("source", "google"),
            ("medium", "cpc"),
            ("select-page", "https://example.com/a b/"),
            ("submit", "Generate"),
        ]);
        assert_eq!(sub.source.as_deref(), Some("google"));
        assert_eq!(sub.medium.as_deref(), Some("cpc"));
        assert_eq!(sub.term, None);
        assert_eq!(sub.select_page.as_deref(), Some("https://example.com/a b/"));
    }

    #[test]
    fn to_fields_sanitizes_text_but_not_destination() {
        let sub = CampaignSubmission::from_pairs([
            ("source", "news letter"),
            ("name", "O'Brien \"promo\""),
        ]);
        let fields = sub.to_fields("https://example.com/a b/".to_string());
        assert_eq!(fields.source, "news%20letter");
        assert_eq!(fields.medium, "");
        assert_eq!(fields.name, "OBrien%20%22promo%22");
        assert_eq!(fields.destination_url, "https://example.com/a b/");
    }

    #[test]
    fn deserializes_select_page_key() {
        let sub: CampaignSubmission =
            serde_json::from_str(r#"{"source":"g","select-page":"https://e.com/"}"#).unwrap();
        assert_eq!(sub.source.as_deref(), Some("g"));
        assert_eq!(sub.select_page.as_deref(), Some("https://e.com/"));
        assert_eq!(sub.name, None);
    }
}
