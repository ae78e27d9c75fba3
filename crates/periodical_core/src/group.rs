use crate::Article;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsectionGroup {
    pub subsection: String,
    pub articles: Vec<Article>,
}

/// Partition articles into runs of adjacent equal subsections.
///
/// No sorting happens first: `[A, A, B, A]` yields three groups.
pub fn group_by_subsection(articles: &[Article]) -> Vec<SubsectionGroup> {
    let mut groups: Vec<SubsectionGroup> = Vec::new();
    for article in articles {
        match groups.last_mut() {
            Some(group) if group.subsection == article.subsection => {
                group.articles.push(article.clone());
            }
            _ => groups.push(SubsectionGroup {
                subsection: article.subsection.clone(),
                articles: vec![article.clone()],
            }),
        }
    }
    groups
}
