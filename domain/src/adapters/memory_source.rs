use std::sync::Mutex;

use crate::{ContentSource, CoreError, DestinationCandidate};

/// Simple in-memory content source: a site root plus an ordered page list
/// guarded by a mutex.
pub struct InMemoryContentSource {
    site_url: String,
    pages: Mutex<Vec<DestinationCandidate>>,
}

impl InMemoryContentSource {
    pub fn new<S: Into<String>>(site_url: S) -> Self {
        Self {
            site_url: site_url.into(),
            pages: Mutex::new(Vec::new()),
        }
    }

    /// Append a published page. Ids must be unique.
    pub fn add_page(&self, id: &str, title: &str, url: &str) -> Result<(), CoreError> {
        let mut pages = self
            .pages
            .lock()
            .map_err(|_| CoreError::ContentSource("mutex poisoned".into()))?;
        if pages.iter().any(|p| p.id == id) {
            return Err(CoreError::ContentSource(format!("duplicate page id {}", id)));
        }
        pages.push(DestinationCandidate {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
        });
        Ok(())
    }
}

impl ContentSource for InMemoryContentSource {
    fn site_url(&self) -> Result<String, CoreError> {
        Ok(self.site_url.clone())
    }

    fn published_items(&self) -> Result<Vec<DestinationCandidate>, CoreError> {
        let pages = self
            .pages
            .lock()
            .map_err(|_| CoreError::ContentSource("mutex poisoned".into()))?;
        Ok(pages.clone())
    }
}
