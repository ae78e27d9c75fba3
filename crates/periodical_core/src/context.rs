use std::path::PathBuf;

use crate::{group_by_subsection, Article, ImageRegistry, SubsectionGroup};

/// Local asset name of the cover image.
pub const COVER_ASSET: &str = "cover.jpg";

/// Everything one run knows about the issue being assembled.
///
/// Created after population, filled during normalization and discarded
/// once the output file has been produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentContext {
    pub title: String,
    pub date: String,
    pub cover: String,
    pub articles: Vec<Article>,
    pub images: ImageRegistry,
    pub grouped: Vec<SubsectionGroup>,
    pub tempdir: PathBuf,
}

impl DocumentContext {
    pub fn new(title: impl Into<String>, cover: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            cover: cover.into(),
            date: date.into(),
            ..Self::default()
        }
    }

    /// Recompute `grouped` from the current article order.
    pub fn regroup(&mut self) {
        self.grouped = group_by_subsection(&self.articles);
    }

    pub fn cover_asset(&self) -> &'static str {
        COVER_ASSET
    }
}
