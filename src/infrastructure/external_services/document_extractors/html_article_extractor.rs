use html2text::from_read;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::path::Path;

use crate::application::ports::ArticleExtractor;
use crate::application::ports::article_extractor::ArticleExtractionError;
use crate::domain::entities::ArticleContent;

const HEADLINE: &str = ".article-header__headline";
const BODY: &str = ".article-body";
const RELATED_TOPICS: &str = "aside.related-topics";
const AUTHOR: &str = "span.author__name";
const PUBLISHED_AT: &str = "time.datetime";

pub const NO_AUTHOR: &str = "No Author";
const PUBLISHED_AT_CHARS: usize = 22;

const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "section", "article",
    "blockquote", "figure", "figcaption", "header", "footer", "table", "tr", "td",
];

/// Extracts news articles from the publisher's article page markup.
pub struct HtmlArticleExtractor;

impl HtmlArticleExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlArticleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleExtractor for HtmlArticleExtractor {
    fn extract(&self, file_path: &Path) -> Result<ArticleContent, ArticleExtractionError> {
        let markup = std::fs::read_to_string(file_path)
            .map_err(|e| ArticleExtractionError::IoError(format!("{}: {}", file_path.display(), e)))?;

        self.extract_from_markup(&markup)
    }

    fn extract_from_markup(&self, markup: &str) -> Result<ArticleContent, ArticleExtractionError> {
        let document = Html::parse_document(markup);

        let title = match select_text(&document, HEADLINE)? {
            Some(title) if !title.is_empty() => title,
            _ => extract_title_from_html(markup).unwrap_or_default(),
        };

        let body = match document.select(&selector(BODY)?).next() {
            Some(body) => {
                let related_topics = selector(RELATED_TOPICS)?;
                let mut text = String::new();
                collect_text(body, &related_topics, &mut text);
                normalize_whitespace(&text)
            }
            None => {
                let text = from_read(markup.as_bytes(), 80).map_err(|e| {
                    ArticleExtractionError::ExtractionFailed(format!(
                        "Failed to convert HTML to text: {}",
                        e
                    ))
                })?;
                normalize_whitespace(&text)
            }
        };

        let author = select_text(&document, AUTHOR)?
            .filter(|author| !author.is_empty())
            .unwrap_or_else(|| NO_AUTHOR.to_string());

        let published_at = select_text(&document, PUBLISHED_AT)?
            .map(|value| value.chars().take(PUBLISHED_AT_CHARS).collect())
            .unwrap_or_default();

        Ok(ArticleContent {
            title,
            body,
            author,
            published_at,
        })
    }
}

fn selector(css: &str) -> Result<Selector, ArticleExtractionError> {
    Selector::parse(css).map_err(|e| {
        ArticleExtractionError::ExtractionFailed(format!("Invalid selector {}: {}", css, e))
    })
}

/// Whitespace-normalised text of the first element matching `css`.
fn select_text(document: &Html, css: &str) -> Result<Option<String>, ArticleExtractionError> {
    Ok(document.select(&selector(css)?).next().map(|element| {
        let mut text = String::new();
        for fragment in element.text() {
            text.push_str(fragment);
        }
        normalize_whitespace(&text)
    }))
}

fn collect_text(element: ElementRef<'_>, excluded: &Selector, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(inner) => {
                let Some(child_element) = ElementRef::wrap(child) else {
                    continue;
                };
                if excluded.matches(&child_element) {
                    continue;
                }
                let is_block = BLOCK_ELEMENTS.contains(&inner.name());
                if is_block {
                    out.push(' ');
                }
                collect_text(child_element, excluded, out);
                if is_block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_title_from_html(html: &str) -> Option<String> {
    let title_regex = regex::Regex::new(r"<title[^>]*>([^<]+)</title>").ok()?;
    title_regex
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}
