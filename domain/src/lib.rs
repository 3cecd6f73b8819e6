//! Domain library for the campaign URL creator.
//!
//! This crate holds the domain types, the host port (trait) for destination
//! pages, and error definitions. It only depends on `serde` for the types that
//! cross the HTTP boundary. Keep adapters and IO concerns out of this crate.

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The five free-text fields of a campaign, in form order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Source,
    Medium,
    Term,
    Content,
    Name,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Source,
        Field::Medium,
        Field::Term,
        Field::Content,
        Field::Name,
    ];

    /// Submission key used by the form.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Source => "source",
            Field::Medium => "medium",
            Field::Term => "term",
            Field::Content => "content",
            Field::Name => "name",
        }
    }

    /// Query parameter the field is emitted as.
    pub fn param(&self) -> &'static str {
        match self {
            Field::Source => "utm_source",
            Field::Medium => "utm_medium",
            Field::Term => "utm_term",
            Field::Content => "utm_content",
            Field::Name => "utm_campaign",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Source => "Campaign Source",
            Field::Medium => "Campaign Medium",
            Field::Term => "Campaign Term",
            Field::Content => "Campaign Content",
            Field::Name => "Campaign Name",
        }
    }

    /// Short usage hint shown under the input.
    pub fn hint(&self) -> &'static str {
        match self {
            Field::Source => "(referrer: google, citysearch, newsletter4)",
            Field::Medium => "(marketing medium: cpc, banner, email)",
            Field::Term => "(identify the paid keywords)",
            Field::Content => "(use to differentiate ads)",
            Field::Name => "(product, promo code or slogan)",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Field::Source | Field::Medium | Field::Name)
    }
}

/// Sanitized campaign inputs plus the chosen destination prefix.
///
/// Built fresh from each submission and never stored. Empty strings mean
/// "absent"; `destination_url` empty means no page was chosen.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignFields {
    pub source: String,
    pub medium: String,
    pub term: String,
    pub content: String,
    pub name: String,
    pub destination_url: String,
}

impl CampaignFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Source => &self.source,
            Field::Medium => &self.medium,
            Field::Term => &self.term,
            Field::Content => &self.content,
            Field::Name => &self.name,
        }
    }
}

/// A campaign URL produced by the builder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GeneratedUrl(String);

impl GeneratedUrl {
    pub(crate) fn new(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for GeneratedUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A required field that was empty after sanitization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingField {
    Source,
    Medium,
    Name,
}

impl MissingField {
    /// Fixed check order.
    pub const ORDER: [MissingField; 3] = [MissingField::Source, MissingField::Medium, MissingField::Name];

    pub fn field(&self) -> Field {
        match self {
            MissingField::Source => Field::Source,
            MissingField::Medium => Field::Medium,
            MissingField::Name => Field::Name,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.field().key()
    }

    /// One human-readable notice line.
    pub fn message(&self) -> String {
        format!("{} is required", self.field().label())
    }
}

/// Ordered set of missing required fields (always Source, Medium, Name order).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MissingFields(Vec<MissingField>);

impl MissingFields {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert keeping check order and set semantics.
    pub fn insert(&mut self, field: MissingField) {
        if self.0.contains(&field) {
            return;
        }
        self.0.push(field);
        self.0
            .sort_by_key(|f| MissingField::ORDER.iter().position(|o| o == f));
    }

    pub fn contains(&self, field: MissingField) -> bool {
        self.0.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MissingField> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[MissingField] {
        &self.0
    }
}

impl Display for MissingFields {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|m| m.as_str()).collect();
        write!(f, "missing required fields: {}", names.join(", "))
    }
}

impl Error for MissingFields {}

/// Outcome of validating and assembling a campaign.
pub type ValidationResult = Result<GeneratedUrl, MissingFields>;

/// A page the operator can pick as the URL prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationCandidate {
    pub id: String,
    pub title: String,
    /// Absolute URL; empty for the "none" candidate.
    pub url: String,
}

/// Host port supplying the destination pages and the site root.
///
/// Called once per request; implementations must not cache on behalf of the
/// core.
pub trait ContentSource: Send + Sync {
    fn site_url(&self) -> Result<String, CoreError>;
    /// Published items in display order.
    fn published_items(&self) -> Result<Vec<DestinationCandidate>, CoreError>;
}

/// Registration data for the host admin menu entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminPage {
    pub parent: &'static str,
    pub page_title: &'static str,
    pub menu_title: &'static str,
    /// Permission tag the host must grant the operator.
    pub capability: &'static str,
    pub menu_slug: &'static str,
}

impl AdminPage {
    pub fn path(&self) -> String {
        format!("/admin/{}/{}", self.parent, self.menu_slug)
    }
}

pub const URL_CREATOR_PAGE: AdminPage = AdminPage {
    parent: "tools",
    page_title: "URL Creator",
    menu_title: "URL Creator",
    capability: "manage_options",
    menu_slug: "url-creator",
};

/// Core domain errors (no external error crates to keep deps minimal).
#[derive(Debug)]
pub enum CoreError {
    MissingRequiredField(MissingFields),
    ContentSource(String),
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::MissingRequiredField(m) => write!(f, "{}", m),
            CoreError::ContentSource(msg) => write!(f, "content source error: {}", msg),
        }
    }
}

impl Error for CoreError {}

impl From<MissingFields> for CoreError {
    fn from(m: MissingFields) -> Self {
        CoreError::MissingRequiredField(m)
    }
}

/// Return a short about/version line for the binary to print.
pub fn about() -> String {
    let pkg = env!("CARGO_PKG_NAME");
    let ver = env!("CARGO_PKG_VERSION");
    format!("{} v{} - campaign URL creator", pkg, ver)
}

pub mod adapters;
pub mod builder;
pub mod destination;
pub mod form;
pub mod sanitize;
pub mod service;
