/// An article as handed over by a source, before assembly assigns its position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleDraft {
    pub subsection: String,
    pub title: String,
    pub body: String,
}

impl ArticleDraft {
    pub fn new(subsection: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subsection: subsection.into(),
            title: String::new(),
            body: body.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Sequence position within the issue, assigned during normalization.
    pub index: usize,
    /// Grouping key; adjacent articles with equal values share a section.
    pub subsection: String,
    pub title: String,
    /// HTML body, rewritten in place during normalization.
    pub body: String,
}

impl Article {
    pub fn from_draft(index: usize, draft: ArticleDraft) -> Self {
        Self {
            index,
            subsection: draft.subsection,
            title: draft.title,
            body: draft.body,
        }
    }

    /// Title shown in the table of contents.
    pub fn display_title(&self) -> String {
        let trimmed = self.title.trim();
        if trimmed.is_empty() {
            format!("Article {}", self.index + 1)
        } else {
            trimmed.to_string()
        }
    }

    /// Anchor used to link the table of contents and navigation to the body.
    pub fn anchor(&self) -> String {
        format!("article-{}", self.index)
    }
}
