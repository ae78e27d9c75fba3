use scraper::{Html, Selector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub title: Option<String>,
    pub body_html: String,
}

/// Pulls the readable part out of a full article page.
pub trait BodyExtractor: Send + Sync {
    fn extract(&self, html: &str) -> ExtractedArticle;
}

/// Takes the first `<article>`, else `<main>`, else `<body>`, else the whole
/// document. The title is the first `<h1>`, else `<title>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArticleElementExtractor;

impl BodyExtractor for ArticleElementExtractor {
    fn extract(&self, html: &str) -> ExtractedArticle {
        let doc = Html::parse_document(html);

        let title = ["h1", "title"]
            .iter()
            .find_map(|sel| first_text(&doc, sel));

        let body_html = ["article", "main", "body"]
            .iter()
            .filter_map(|sel| Selector::parse(sel).ok())
            .find_map(|sel| doc.select(&sel).next().map(|node| node.inner_html()))
            .unwrap_or_else(|| doc.root_element().html());

        ExtractedArticle {
            title,
            body_html: body_html.trim().to_string(),
        }
    }
}

fn first_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel)
        .next()
        .map(|node| node.text().collect::<Vec<_>>().join(" "))
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
}
