//! Validation and assembly of campaign URLs.

use crate::{CampaignFields, Field, GeneratedUrl, MissingField, MissingFields, ValidationResult};

/// Check that source, medium and name are present.
pub fn validate(fields: &CampaignFields) -> Result<(), MissingFields> {
    let mut missing = MissingFields::new();
    for m in MissingField::ORDER {
        if fields.get(m.field()).is_empty() {
            missing.insert(m);
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

/// Validate and, if valid, assemble `destination?utm_...`.
///
/// Parameter order is fixed; term and content are emitted only when non-empty.
/// Values are used verbatim.
pub fn build(fields: &CampaignFields) -> ValidationResult {
    validate(fields)?;

    let params: Vec<String> = Field::ALL
        .into_iter()
        .filter(|f| f.is_required() || !fields.get(*f).is_empty())
        .map(|f| format!("{}={}", f.param(), fields.get(f)))
        .collect();

    let mut url = String::with_capacity(fields.destination_url.len() + 64);
    url.push_str(&fields.destination_url);
    url.push('?');
    url.push_str(&params.join("&"));
    Ok(GeneratedUrl::new(url))
}
