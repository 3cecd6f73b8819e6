use crate::builder::build;
use crate::destination::{candidate_list, is_offered, DestinationPolicy};
use crate::form::CampaignSubmission;
use crate::{CampaignFields, ContentSource, CoreError, DestinationCandidate, ValidationResult};

/// Result of processing one submission, ready for rendering.
#[derive(Clone, Debug)]
pub struct FormOutcome {
    /// Sanitized values, echoed back into the form.
    pub fields: CampaignFields,
    pub result: ValidationResult,
    /// Options offered with this response.
    pub candidates: Vec<DestinationCandidate>,
    /// True when a non-empty selection was discarded by the policy.
    pub destination_rejected: bool,
}

/// Application service wiring the sanitizer and builder to the host's
/// destination pages.
///
/// Holds no per-request state: every call re-reads the candidates from the
/// content source.
pub struct CampaignService<S: ContentSource> {
    source: S,
    policy: DestinationPolicy,
}

impl<S: ContentSource> CampaignService<S> {
    pub fn new(source: S, policy: DestinationPolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> DestinationPolicy {
        self.policy
    }

    /// None, home, then the host's published items.
    pub fn candidates(&self) -> Result<Vec<DestinationCandidate>, CoreError> {
        let site = self.source.site_url()?;
        let items = self.source.published_items()?;
        Ok(candidate_list(&site, items))
    }

    /// Sanitize, resolve the destination and build the campaign URL.
    ///
    /// Missing required fields are reported inside the outcome, not as an
    /// error; only a failing content source returns `Err`.
    pub fn generate(&self, submission: &CampaignSubmission) -> Result<FormOutcome, CoreError> {
        let candidates = self.candidates()?;
        let selection = submission.select_page.as_deref();
        let destination = self.policy.resolve(selection, &candidates);
        let destination_rejected = self.policy == DestinationPolicy::Validated
            && !is_offered(selection.unwrap_or_default(), &candidates);

        let fields = submission.to_fields(destination);
        let result = build(&fields);
        Ok(FormOutcome {
            fields,
            result,
            candidates,
            destination_rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_source::InMemoryContentSource;
    use crate::MissingField;

    fn source() -> InMemoryContentSource {
        let src = InMemoryContentSource::new("https://example.com");
        src.add_page("12", "Spring Sale", "https://example.com/spring-sale/")
            .unwrap();
        src
    }

    fn submission(pairs: &[(&str, &str)]) -> CampaignSubmission {
        CampaignSubmission::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn generates_url_for_home_page() {
        let svc = CampaignService::new(source(), DestinationPolicy::Trusted);
        let out = svc
            .generate(&submission(&[
                ("source", "google"),
                ("medium", "cpc"),
                ("name", "spring sale"),
                ("select-page", "https://example.com/"),
            ]))
            .unwrap();
        assert_eq!(
            out.result.unwrap().as_str(),
            "https://example.com/?utm_source=google&utm_medium=cpc&utm_campaign=spring%20sale"
        );
        assert_eq!(out.candidates.len(), 3);
        assert!(!out.destination_rejected);
    }

    #[test]
    fn missing_fields_keep_sanitized_values() {
        let svc = CampaignService::new(source(), DestinationPolicy::Trusted);
        let out = svc
            .generate(&submission(&[("source", "news letter"), ("term", "O'Brien")]))
            .unwrap();
        let missing = out.result.unwrap_err();
        assert_eq!(missing.as_slice(), &[MissingField::Medium, MissingField::Name]);
        assert_eq!(out.fields.source, "news%20letter");
        assert_eq!(out.fields.term, "OBrien");
    }

    #[test]
    fn trusted_policy_accepts_unlisted_destination() {
        let svc = CampaignService::new(source(), DestinationPolicy::Trusted);
        let out = svc
            .generate(&submission(&[
                ("source", "g"),
                ("medium", "m"),
                ("name", "n"),
                ("select-page", "https://other.test/"),
            ]))
            .unwrap();
        assert!(out.result.unwrap().as_str().starts_with("https://other.test/?"));
        assert!(!out.destination_rejected);
    }

    #[test]
    fn validated_policy_rejects_unlisted_destination() {
        let svc = CampaignService::new(source(), DestinationPolicy::Validated);
        let out = svc
            .generate(&submission(&[
                ("source", "g"),
                ("medium", "m"),
                ("name", "n"),
                ("select-page", "https://other.test/"),
            ]))
            .unwrap();
        assert!(out.destination_rejected);
        assert_eq!(out.fields.destination_url, "");
        assert_eq!(
            out.result.unwrap().as_str(),
            "?utm_source=g&utm_medium=m&utm_campaign=n"
        );
    }

    #[test]
    fn validated_policy_accepts_listed_page() {
        let svc = CampaignService::new(source(), DestinationPolicy::Validated);
        let out = svc
            .generate(&submission(&[
                ("source", "g"),
                ("medium", "m"),
                ("name", "n"),
                ("select-page", "https://example.com/spring-sale/"),
            ]))
            .unwrap();
        assert!(!out.destination_rejected);
        assert!(out
            .result
            .unwrap()
            .as_str()
            .starts_with("https://example.com/spring-sale/?utm_source=g"));
    }

    #[test]
    fn candidates_put_synthetic_options_first() {
        let svc = CampaignService::new(source(), DestinationPolicy::Trusted);
        let ids: Vec<String> = svc.candidates().unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["none", "home", "12"]);
    }
}
