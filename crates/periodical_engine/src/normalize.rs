use std::sync::OnceLock;

use periodical_core::ImageRegistry;
use regex::{Captures, Regex};

/// Rewrites an article body into its offline form.
///
/// Implementations register every remote image they rewrite with `images`
/// and point the tag at the registered local asset.
pub trait BodyNormalizer: Send + Sync {
    fn normalize(&self, body: &str, images: &mut ImageRegistry) -> String;
}

/// Pattern-based normalizer over raw markup. Steps run in a fixed order:
/// frames, then images, then widows.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexNormalizer;

impl BodyNormalizer for RegexNormalizer {
    fn normalize(&self, body: &str, images: &mut ImageRegistry) -> String {
        let body = strip_frames(body);
        let body = rewrite_images(&body, images);
        widont(&body)
    }
}

fn frame_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</?iframe\b[^>]*>").expect("frame pattern"))
}

fn image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)<img\s(?:[^>]*?\s)?src\s*=\s*(?:"([^"]+)"|'([^']+)')[^>]*>"#)
            .expect("image pattern")
    })
}

fn widont_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)([^<>\s])\s+([^<>\s]+\s*)(</?(?:address|blockquote|br|dd|div|dt|fieldset|form|h[1-6]|li|noscript|p|td|th)[^>]*>|$)",
        )
        .expect("widont pattern")
    })
}

/// Remove `<iframe>` opening and closing tags.
pub fn strip_frames(body: &str) -> String {
    frame_re().replace_all(body, "").into_owned()
}

/// Replace every `<img>` carrying a `src` with a reference to its local asset.
pub fn rewrite_images(body: &str, images: &mut ImageRegistry) -> String {
    image_re()
        .replace_all(body, |caps: &Captures| {
            let src = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            let index = images.register(src);
            format!(r#"<img src="{}" width="50%">"#, ImageRegistry::asset_name(index))
        })
        .into_owned()
}

/// Bind the last word before a block boundary (or the end of the text) to
/// the word before it with `&nbsp;`.
pub fn widont(text: &str) -> String {
    widont_re().replace_all(text, "${1}&nbsp;${2}${3}").into_owned()
}
