/// Remote image URLs discovered while normalizing bodies, in discovery order.
///
/// The position of a URL is the stem of its local asset (`{position}.jpg`).
/// Registration always appends: an image referenced from two places is
/// registered, and later downloaded, twice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageRegistry {
    urls: Vec<String>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `url` and returns its 0-based position.
    pub fn register(&mut self, url: impl Into<String>) -> usize {
        self.urls.push(url.into());
        self.urls.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.urls.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.urls.iter().enumerate().map(|(idx, url)| (idx, url.as_str()))
    }

    /// Local asset filename for a position.
    pub fn asset_name(index: usize) -> String {
        format!("{index}.jpg")
    }
}

impl<S: Into<String>> FromIterator<S> for ImageRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            urls: iter.into_iter().map(Into::into).collect(),
        }
    }
}
