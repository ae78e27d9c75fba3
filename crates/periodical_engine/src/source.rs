use periodical_core::{ArticleDraft, ImageRegistry};
use thiserror::Error;

use crate::cache::{CacheError, ResponseCache};

/// What a source found for one issue.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Issue {
    pub title: String,
    pub cover: String,
    pub date: String,
    pub articles: Vec<ArticleDraft>,
    /// Images known before any body is normalized; body images are appended.
    pub images: ImageRegistry,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("{0}")]
    Invalid(String),
}

/// Site-specific knowledge: where an issue lives and how to read it.
pub trait SourceProvider {
    /// Namespace of the on-disk response cache.
    fn name(&self) -> &str;

    /// Prefix of the temporary directory and of derived output filenames.
    fn prefix(&self) -> &str;

    /// Where the source reads from, quoted when an issue turns up empty.
    fn base_url(&self) -> &str;

    /// Collect title, cover, date and articles, fetching through `cache`.
    fn populate(&self, cache: &ResponseCache) -> Result<Issue, SourceError>;

    /// Source-specific cleanup applied to every body before normalization.
    fn prepare_body(&self, body: String) -> String {
        body
    }
}
