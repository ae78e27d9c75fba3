use std::fmt::{self, Write as _};

use periodical_core::{DocumentContext, ImageRegistry, COVER_ASSET};
use thiserror::Error;

/// The files that make up the container handed to the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Index,
    Toc,
    Stylesheet,
    Navigation,
    Manifest,
}

impl Artifact {
    pub const ALL: [Artifact; 5] = [
        Artifact::Index,
        Artifact::Toc,
        Artifact::Stylesheet,
        Artifact::Navigation,
        Artifact::Manifest,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Artifact::Index => "index.html",
            Artifact::Toc => "toc.html",
            Artifact::Stylesheet => "style.css",
            Artifact::Navigation => "toc.ncx",
            Artifact::Manifest => "book.opf",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("failed to format {artifact}")]
    Format { artifact: &'static str },
}

/// Turns the shared context into the text of one artifact.
pub trait Renderer: Send + Sync {
    fn render(&self, artifact: Artifact, ctx: &DocumentContext) -> Result<String, RenderError>;
}

/// Kindle periodical markup built directly from the context.
#[derive(Debug, Clone)]
pub struct BuiltinRenderer {
    pub language: String,
    pub stylesheet: String,
}

impl Default for BuiltinRenderer {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            stylesheet: DEFAULT_STYLESHEET.to_string(),
        }
    }
}

const DEFAULT_STYLESHEET: &str = "\
body { font-family: serif; }
h1 { font-size: 1.4em; margin-bottom: 0.4em; }
h2.subsection { font-size: 1.1em; text-transform: uppercase; }
div.article { margin-bottom: 2em; }
img { display: block; margin: 0.5em auto; }
p { text-indent: 0; margin: 0 0 0.6em 0; }
";

impl Renderer for BuiltinRenderer {
    fn render(&self, artifact: Artifact, ctx: &DocumentContext) -> Result<String, RenderError> {
        let out = match artifact {
            Artifact::Index => self.index(ctx),
            Artifact::Toc => self.toc(ctx),
            Artifact::Stylesheet => Ok(self.stylesheet.clone()),
            Artifact::Navigation => self.navigation(ctx),
            Artifact::Manifest => self.manifest(ctx),
        };
        out.map_err(|fmt::Error| RenderError::Format {
            artifact: artifact.file_name(),
        })
    }
}

impl BuiltinRenderer {
    fn index(&self, ctx: &DocumentContext) -> Result<String, fmt::Error> {
        let mut out = html_head(&ctx.title);
        for group in &ctx.grouped {
            writeln!(
                out,
                "<div class=\"section\">\n<h2 class=\"subsection\">{}</h2>",
                escape(&group.subsection)
            )?;
            for article in &group.articles {
                writeln!(
                    out,
                    "<div class=\"article\" id=\"{}\">\n<h1>{}</h1>\n{}\n</div>\n<mbp:pagebreak/>",
                    article.anchor(),
                    escape(&article.display_title()),
                    article.body
                )?;
            }
            out.push_str("</div>\n");
        }
        out.push_str("</body>\n</html>\n");
        Ok(out)
    }

    fn toc(&self, ctx: &DocumentContext) -> Result<String, fmt::Error> {
        let mut out = html_head(&ctx.title);
        out.push_str("<h1>Contents</h1>\n<ul>\n");
        for group in &ctx.grouped {
            writeln!(out, "<li>{}\n<ul>", escape(&group.subsection))?;
            for article in &group.articles {
                writeln!(
                    out,
                    "<li><a href=\"index.html#{}\">{}</a></li>",
                    article.anchor(),
                    escape(&article.display_title())
                )?;
            }
            out.push_str("</ul>\n</li>\n");
        }
        out.push_str("</ul>\n</body>\n</html>\n");
        Ok(out)
    }

    fn navigation(&self, ctx: &DocumentContext) -> Result<String, fmt::Error> {
        let mut play_order = 0usize;
        let mut next = || {
            play_order += 1;
            play_order
        };

        let mut out = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <ncx xmlns:mbp=\"http://mobipocket.com/ns/mbp\" xmlns=\"http://www.daisy.org/z3986/2005/ncx/\" version=\"2005-1\" xml:lang=\"",
        );
        writeln!(out, "{}\">", escape(&self.language))?;
        writeln!(
            out,
            "<head><meta name=\"dtb:depth\" content=\"3\"/></head>\n<docTitle><text>{}</text></docTitle>\n<navMap>",
            escape(&ctx.title)
        )?;
        writeln!(
            out,
            "<navPoint playOrder=\"{}\" class=\"periodical\" id=\"periodical\">\n<navLabel><text>{}</text></navLabel>\n<content src=\"toc.html\"/>",
            next(),
            escape(&ctx.title)
        )?;
        for (idx, group) in ctx.grouped.iter().enumerate() {
            let first = group
                .articles
                .first()
                .map(|a| a.anchor())
                .unwrap_or_default();
            writeln!(
                out,
                "<navPoint playOrder=\"{}\" class=\"section\" id=\"section-{idx}\">\n<navLabel><text>{}</text></navLabel>\n<content src=\"index.html#{first}\"/>",
                next(),
                escape(&group.subsection)
            )?;
            for article in &group.articles {
                writeln!(
                    out,
                    "<navPoint playOrder=\"{}\" class=\"article\" id=\"{anchor}\">\n<navLabel><text>{}</text></navLabel>\n<content src=\"index.html#{anchor}\"/>\n</navPoint>",
                    next(),
                    escape(&article.display_title()),
                    anchor = article.anchor()
                )?;
            }
            out.push_str("</navPoint>\n");
        }
        out.push_str("</navPoint>\n</navMap>\n</ncx>\n");
        Ok(out)
    }

    fn manifest(&self, ctx: &DocumentContext) -> Result<String, fmt::Error> {
        let mut out = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <package xmlns=\"http://www.idpf.org/2007/opf\" version=\"2.0\" unique-identifier=\"uid\">\n",
        );
        writeln!(
            out,
            "<metadata>\n<dc-metadata xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\n\
             <dc:title>{title}</dc:title>\n<dc:language>{lang}</dc:language>\n\
             <dc:identifier id=\"uid\">{title} {date}</dc:identifier>\n<dc:date>{date}</dc:date>\n\
             </dc-metadata>\n<x-metadata>\n\
             <output content-type=\"application/x-mobipocket-subscription-magazine\" encoding=\"utf-8\"/>\n\
             </x-metadata>\n<meta name=\"cover\" content=\"cover-image\"/>\n</metadata>",
            title = escape(&ctx.title),
            lang = escape(&self.language),
            date = escape(&ctx.date),
        )?;

        out.push_str("<manifest>\n");
        for (id, artifact) in [
            ("content", Artifact::Index),
            ("toc", Artifact::Toc),
            ("style", Artifact::Stylesheet),
        ] {
            let media = if artifact == Artifact::Stylesheet {
                "text/css"
            } else {
                "application/xhtml+xml"
            };
            writeln!(
                out,
                "<item id=\"{id}\" media-type=\"{media}\" href=\"{}\"/>",
                artifact.file_name()
            )?;
        }
        writeln!(
            out,
            "<item id=\"ncx\" media-type=\"application/x-dtbncx+xml\" href=\"{}\"/>",
            Artifact::Navigation.file_name()
        )?;
        writeln!(
            out,
            "<item id=\"cover-image\" media-type=\"image/jpeg\" href=\"{COVER_ASSET}\"/>"
        )?;
        for (idx, _) in ctx.images.iter() {
            writeln!(
                out,
                "<item id=\"image-{idx}\" media-type=\"image/jpeg\" href=\"{}\"/>",
                ImageRegistry::asset_name(idx)
            )?;
        }
        out.push_str("</manifest>\n");

        out.push_str(
            "<spine toc=\"ncx\">\n<itemref idref=\"toc\"/>\n<itemref idref=\"content\"/>\n</spine>\n\
             <guide>\n<reference type=\"toc\" title=\"Table of Contents\" href=\"toc.html\"/>\n\
             <reference type=\"text\" title=\"Beginning\" href=\"index.html\"/>\n</guide>\n</package>\n",
        );
        Ok(out)
    }
}

fn html_head(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n\
         <meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\"/>\n\
         <title>{}</title>\n\
         <link rel=\"stylesheet\" href=\"style.css\" type=\"text/css\"/>\n\
         </head>\n<body>\n",
        escape(title)
    )
}

/// Escape text for use in element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
