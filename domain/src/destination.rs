//! Destination candidates and selection policy.

use crate::DestinationCandidate;

pub const NONE_ID: &str = "none";
pub const HOME_ID: &str = "home";

impl DestinationCandidate {
    /// "No page": the operator appends the parameters to a URL by hand.
    pub fn none() -> Self {
        Self {
            id: NONE_ID.to_string(),
            title: "None (append to your own URL)".to_string(),
            url: String::new(),
        }
    }

    /// Site root, normalized to a single trailing slash.
    pub fn home(site_url: &str) -> Self {
        Self {
            id: HOME_ID.to_string(),
            title: "Home Page".to_string(),
            url: format!("{}/", site_url.trim_end_matches('/')),
        }
    }
}

/// Full option list: none, home, then the host's items in their order.
pub fn candidate_list(site_url: &str, items: Vec<DestinationCandidate>) -> Vec<DestinationCandidate> {
    let mut out = Vec::with_capacity(items.len() + 2);
    out.push(DestinationCandidate::none());
    out.push(DestinationCandidate::home(site_url));
    out.extend(items);
    out
}

/// How a submitted `select-page` value is treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DestinationPolicy {
    /// Use the submitted URL as-is.
    #[default]
    Trusted,
    /// Accept only URLs of offered candidates; anything else means no page.
    Validated,
}

impl DestinationPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trusted" => Some(DestinationPolicy::Trusted),
            "validated" => Some(DestinationPolicy::Validated),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationPolicy::Trusted => "trusted",
            DestinationPolicy::Validated => "validated",
        }
    }

    /// Resolve the selection to a URL prefix. Never fails.
    pub fn resolve(&self, selection: Option<&str>, candidates: &[DestinationCandidate]) -> String {
        let selection = selection.unwrap_or_default();
        match self {
            DestinationPolicy::Trusted => selection.to_string(),
            DestinationPolicy::Validated if is_offered(selection, candidates) => {
                selection.to_string()
            }
            DestinationPolicy::Validated => String::new(),
        }
    }
}

/// Whether `url` is one of the candidate URLs (empty always counts as "none").
pub fn is_offered(url: &str, candidates: &[DestinationCandidate]) -> bool {
    url.is_empty() || candidates.iter().any(|c| c.url == url)
}
