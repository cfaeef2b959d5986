use scraper::{ElementRef, Html, Selector};
use tracing::Span;

use crate::domain::{ParsedDocument, ParsedEntry, Queries, Query, QuerySpec};
use crate::errors::{ScrapeError, ScrapeResult};
use crate::extract::{compile_selector, CompiledQuery};

mod decode;

pub use decode::decode;

/// Turns an HTML page into a `ParsedDocument` using one feed's queries.
pub struct Parser {
    entries: Selector,
    entries_css: String,
    link: CompiledQuery,
    title: Option<CompiledQuery>,
    content: Option<CompiledQuery>,
    date: Option<CompiledQuery>,
    image: Option<CompiledQuery>,
    canonical: CompiledQuery,
    head_title: CompiledQuery,
    span: Span,
}

fn compile_optional(spec: &Option<QuerySpec>) -> ScrapeResult<Option<CompiledQuery>> {
    spec.as_ref().map(CompiledQuery::new).transpose()
}

/// Trimmed value, `None` when nothing but whitespace is left.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Parser {
    /// Compile every selector up front so a bad configuration fails before any fetch.
    pub fn new(queries: &Queries, span: Span) -> ScrapeResult<Self> {
        let canonical = Query::new("head link")
            .with_attribute("rel", "canonical")
            .with_target("href");

        Ok(Self {
            entries: compile_selector(&queries.entries)?,
            entries_css: queries.entries.clone(),
            link: CompiledQuery::new(&queries.link)?,
            title: compile_optional(&queries.title)?,
            content: compile_optional(&queries.content)?,
            date: compile_optional(&queries.date)?,
            image: compile_optional(&queries.image)?,
            canonical: CompiledQuery::new(&canonical.into())?,
            head_title: CompiledQuery::new(&QuerySpec::from("head title"))?,
            span,
        })
    }

    pub fn parse(&self, buffer: &[u8]) -> ScrapeResult<ParsedDocument> {
        let _enter = self.span.enter();

        let markup = decode(buffer)?;
        let html = Html::parse_document(&markup);
        let root = html.root_element();

        let link = self
            .canonical
            .get(root)
            .into_iter()
            .flatten()
            .next()
            .unwrap_or_default();

        let title = self
            .head_title
            .get(root)
            .into_iter()
            .flatten()
            .next()
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        let entries = root
            .select(&self.entries)
            .enumerate()
            .map(|(index, node)| self.parse_entry(index, node))
            .collect::<ScrapeResult<Vec<_>>>()?;

        tracing::debug!(
            entries = entries.len(),
            selector = %self.entries_css,
            has_canonical = !link.is_empty(),
            "Parsed document"
        );

        Ok(ParsedDocument {
            link,
            title: Some(title),
            description: None,
            entries,
        })
    }

    fn parse_entry(&self, index: usize, node: ElementRef<'_>) -> ScrapeResult<ParsedEntry> {
        let link = non_blank(self.link.get_one(node)?).ok_or_else(|| {
            ScrapeError::missing_field(
                "link",
                format!(
                    "entry #{} matched by '{}' has nothing for '{}'",
                    index + 1,
                    self.entries_css,
                    self.link.query().selector
                ),
            )
        })?;

        Ok(ParsedEntry::new(link)
            .with_title(self.single(&self.title, node)?)
            .with_content(self.joined(&self.content, node))
            .with_image(self.single(&self.image, node)?)
            .with_date(self.single(&self.date, node)?))
    }

    fn single(
        &self,
        query: &Option<CompiledQuery>,
        node: ElementRef<'_>,
    ) -> ScrapeResult<Option<String>> {
        match query {
            Some(query) => Ok(non_blank(query.get_one(node)?)),
            None => Ok(None),
        }
    }

    /// Content may span several nodes (one per paragraph, say).
    ///
    /// Unlike a plain join of every non-`None` result, pieces are trimmed and
    /// blank ones dropped, and an entry with no content left gets `None`
    /// rather than an empty string.
    fn joined(&self, query: &Option<CompiledQuery>, node: ElementRef<'_>) -> Option<String> {
        let pieces: Vec<String> = query
            .as_ref()?
            .get(node)
            .into_iter()
            .filter_map(non_blank)
            .collect();

        if pieces.is_empty() {
            None
        } else {
            Some(pieces.join("\n"))
        }
    }
}
