//! Issue manifests: a file-backed source for the assembler.
//!
//! A manifest names the issue, its cover and its articles. Articles carry
//! their HTML inline or point at a page whose `<article>` is fetched through
//! the response cache.

use std::fs;
use std::path::Path;

use periodical_core::ArticleDraft;
use periodical_engine::{
    ArticleElementExtractor, BodyExtractor, Issue, ResponseCache, SourceError, SourceProvider,
};
use periodical_logging::periodical_debug;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestArticle {
    pub subsection: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    pub name: String,
    #[serde(default)]
    pub prefix: Option<String>,
    pub base_url: String,
    pub title: String,
    pub cover: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub articles: Vec<ManifestArticle>,
}

pub struct ManifestSource {
    manifest: Manifest,
    prefix: String,
    extractor: Box<dyn BodyExtractor>,
}

impl ManifestSource {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ManifestError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, ron::error::SpannedError> {
        let manifest: Manifest = ron::from_str(text)?;
        Ok(Self::new(manifest))
    }

    pub fn new(manifest: Manifest) -> Self {
        let prefix = manifest
            .prefix
            .clone()
            .unwrap_or_else(|| manifest.name.clone());
        Self {
            manifest,
            prefix,
            extractor: Box::new(ArticleElementExtractor),
        }
    }

    fn article(
        &self,
        entry: &ManifestArticle,
        cache: &ResponseCache,
    ) -> Result<ArticleDraft, SourceError> {
        let title = entry.title.clone().unwrap_or_default();
        if let Some(body) = &entry.body {
            return Ok(ArticleDraft::new(&entry.subsection, body.as_str()).with_title(title));
        }
        let url = entry.url.as_deref().ok_or_else(|| {
            SourceError::Invalid(format!(
                "article in {:?} has neither body nor url",
                entry.subsection
            ))
        })?;

        let page = cache.fetch(url, &[])?.text();
        periodical_debug!("Decoded {} as {}", url, page.encoding_label);
        let extracted = self.extractor.extract(&page.text);
        let title = if title.is_empty() {
            extracted.title.unwrap_or_default()
        } else {
            title
        };
        Ok(ArticleDraft::new(&entry.subsection, extracted.body_html).with_title(title))
    }
}

impl SourceProvider for ManifestSource {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn base_url(&self) -> &str {
        &self.manifest.base_url
    }

    fn populate(&self, cache: &ResponseCache) -> Result<Issue, SourceError> {
        let articles = self
            .manifest
            .articles
            .iter()
            .map(|entry| self.article(entry, cache))
            .collect::<Result<Vec<_>, _>>()?;

        let date = self
            .manifest
            .date
            .clone()
            .unwrap_or_else(|| chrono::Local::now().format("%-d %B %Y").to_string());

        Ok(Issue {
            title: self.manifest.title.clone(),
            cover: self.manifest.cover.clone(),
            date,
            articles,
            images: self.manifest.images.iter().cloned().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use periodical_engine::{
        CacheSettings, CachedResponse, FailureKind, FetchError, ResponseCache, SourceProvider,
        Transport, Url,
    };

    use super::{ManifestError, ManifestSource};

    const MANIFEST: &str = r#"(
        name: "weekly",
        base_url: "https://weekly.example.com/",
        title: "The Weekly",
        cover: "https://weekly.example.com/cover.jpg",
        date: Some("4 May 2024"),
        articles: [
            (subsection: "News", title: Some("Inline"), body: Some("<p>inline body</p>")),
            (subsection: "Arts", url: Some("https://weekly.example.com/arts/1")),
        ],
    )"#;

    #[derive(Clone, Default)]
    struct PageTransport {
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl Transport for PageTransport {
        fn get(&self, url: &Url) -> Result<CachedResponse, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            if url.path() != "/arts/1" {
                return Err(FetchError::new(FailureKind::Network, "unexpected url"));
            }
            Ok(CachedResponse {
                url: url.to_string(),
                status: 200,
                headers: vec![("content-type".into(), "text/html; charset=utf-8".into())],
                body: b"<html><body><nav>menu</nav><article><h1>Fetched</h1><p>page body</p></article></body></html>".to_vec(),
            })
        }
    }

    #[test]
    fn parses_manifest_and_defaults_prefix() {
        let source = ManifestSource::parse(MANIFEST).unwrap();
        assert_eq!(source.name(), "weekly");
        assert_eq!(source.prefix(), "weekly");
        assert_eq!(source.base_url(), "https://weekly.example.com/");
    }

    #[test]
    fn populate_uses_inline_bodies_and_fetches_pages() {
        let temp = tempfile::TempDir::new().unwrap();
        let transport = PageTransport::default();
        let cache = ResponseCache::new(CacheSettings::new(temp.path()), Box::new(transport.clone()));
        let source = ManifestSource::parse(MANIFEST).unwrap();

        let issue = source.populate(&cache).unwrap();

        assert_eq!(issue.title, "The Weekly");
        assert_eq!(issue.date, "4 May 2024");
        assert_eq!(issue.articles.len(), 2);
        assert_eq!(issue.articles[0].body, "<p>inline body</p>");
        assert_eq!(issue.articles[0].title, "Inline");
        assert_eq!(issue.articles[1].title, "Fetched");
        assert!(issue.articles[1].body.contains("<p>page body</p>"));
        assert!(!issue.articles[1].body.contains("menu"));
        assert_eq!(transport.requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn article_without_body_or_url_is_rejected() {
        let text = r#"(
            name: "weekly",
            base_url: "https://weekly.example.com/",
            title: "The Weekly",
            cover: "https://weekly.example.com/cover.jpg",
            articles: [(subsection: "News")],
        )"#;
        let temp = tempfile::TempDir::new().unwrap();
        let cache = ResponseCache::new(
            CacheSettings::new(temp.path()),
            Box::new(PageTransport::default()),
        );

        let err = ManifestSource::parse(text)
            .unwrap()
            .populate(&cache)
            .unwrap_err();
        assert!(err.to_string().contains("neither body nor url"));
    }

    #[test]
    fn malformed_manifest_reports_parse_error() {
        assert!(ManifestSource::parse("(name: )").is_err());
    }

    #[test]
    fn load_keeps_the_parse_error_as_source() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("issue.ron");
        std::fs::write(&path, "(name: )").unwrap();

        let err = match ManifestSource::load(&path) {
            Err(err) => err,
            Ok(_) => panic!("malformed manifest loaded"),
        };
        assert!(matches!(err, ManifestError::Parse { .. }));
        let source = std::error::Error::source(&err).expect("parse error source");
        assert!(source.downcast_ref::<ron::error::SpannedError>().is_some());
        assert!(err.to_string().contains("issue.ron"));
    }

    #[test]
    fn load_reports_missing_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = match ManifestSource::load(&temp.path().join("absent.ron")) {
            Err(err) => err,
            Ok(_) => panic!("missing manifest loaded"),
        };
        assert!(matches!(err, ManifestError::Read { .. }));
    }
}
