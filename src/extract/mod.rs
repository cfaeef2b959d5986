//! Selector-based field extraction.
//!
//! A [`Query`] selects descendant elements of a node, optionally keeps only
//! those carrying a set of attribute values, and yields either an attribute
//! of each survivor or its text content.
//!
//! Key behaviors:
//! - Results keep document order.
//! - Text is every descendant text node concatenated, untrimmed.
//! - A missing target attribute yields `None`, never the tag's text.
//! - [`get_one`] fails with `AmbiguousResult` when more than one node survives.

use scraper::{ElementRef, Selector};

use crate::domain::{Query, QuerySpec};
use crate::errors::{ScrapeError, ScrapeResult};

/// Attributes that hold a whitespace-separated list of values, per tag.
fn is_multi_valued(tag: &str, attribute: &str) -> bool {
    match attribute {
        "class" | "accesskey" | "dropzone" => true,
        "rel" => matches!(tag, "a" | "link" | "area"),
        "rev" => matches!(tag, "a" | "link"),
        "headers" => matches!(tag, "td" | "th"),
        "accept-charset" => tag == "form",
        "archive" => tag == "object",
        "sizes" => tag == "link",
        "sandbox" => tag == "iframe",
        "for" => tag == "output",
        _ => false,
    }
}

/// True when the element carries every `(name, value)` pair of the filter.
fn matches_attributes<'a, I>(element: &ElementRef<'_>, filter: I) -> bool
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let tag = element.value().name();

    filter.into_iter().all(|(name, value)| {
        let name = name.to_ascii_lowercase();
        match element.value().attr(&name) {
            None => false,
            Some(raw) if is_multi_valued(tag, &name) => {
                raw.split_ascii_whitespace().any(|v| v == value)
            }
            Some(raw) => raw == value,
        }
    })
}

/// A query whose selector has been parsed once and can be run many times.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    query: Query,
    selector: Selector,
    // html5ever stores attribute names lower-cased
    target: Option<String>,
}

impl CompiledQuery {
    pub fn new(spec: &QuerySpec) -> ScrapeResult<Self> {
        let query = spec.to_query();
        let selector = compile_selector(&query.selector)?;
        let target = query.target.as_deref().map(str::to_ascii_lowercase);
        Ok(Self {
            query,
            selector,
            target,
        })
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// All values extracted below `node`, in document order.
    pub fn get(&self, node: ElementRef<'_>) -> Vec<Option<String>> {
        node.select(&self.selector)
            .filter(|element| match &self.query.attributes {
                Some(filter) => matches_attributes(element, filter),
                None => true,
            })
            .map(|element| match &self.target {
                Some(target) => element.value().attr(target).map(str::to_string),
                None => Some(element.text().collect::<String>()),
            })
            .collect()
    }

    /// The single value extracted below `node`, `None` when nothing matched.
    pub fn get_one(&self, node: ElementRef<'_>) -> ScrapeResult<Option<String>> {
        let mut results = self.get(node);

        match results.len() {
            0 => Ok(None),
            1 => Ok(results.pop().flatten()),
            count => Err(ScrapeError::AmbiguousResult {
                selector: self.query.selector.clone(),
                count,
            }),
        }
    }
}

pub fn compile_selector(css: &str) -> ScrapeResult<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::InvalidSelector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Run `query` against the subtree of `node`.
pub fn get(node: ElementRef<'_>, query: &QuerySpec) -> ScrapeResult<Vec<Option<String>>> {
    Ok(CompiledQuery::new(query)?.get(node))
}

/// Run `query` against the subtree of `node`, expecting at most one match.
pub fn get_one(node: ElementRef<'_>, query: &QuerySpec) -> ScrapeResult<Option<String>> {
    CompiledQuery::new(query)?.get_one(node)
}
