use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How to pull one field out of a DOM subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Query {
    pub selector: String,
    /// Attribute/value pairs a matched tag must carry to be kept
    #[serde(default)]
    pub attributes: Option<BTreeMap<String, String>>,
    /// Attribute to read instead of the tag's text
    #[serde(default, alias = "attribute")]
    pub target: Option<String>,
}

impl Query {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            attributes: None,
            target: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }
}

/// A query as written in configuration: either a bare selector or a full descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuerySpec {
    Selector(String),
    Full(Query),
}

impl QuerySpec {
    /// Resolve to the canonical `Query` form.
    pub fn to_query(&self) -> Query {
        match self {
            QuerySpec::Selector(selector) => Query::new(selector.clone()),
            QuerySpec::Full(query) => query.clone(),
        }
    }

    pub fn selector(&self) -> &str {
        match self {
            QuerySpec::Selector(selector) => selector,
            QuerySpec::Full(query) => &query.selector,
        }
    }
}

impl From<&str> for QuerySpec {
    fn from(selector: &str) -> Self {
        QuerySpec::Selector(selector.to_string())
    }
}

impl From<String> for QuerySpec {
    fn from(selector: String) -> Self {
        QuerySpec::Selector(selector)
    }
}

impl From<Query> for QuerySpec {
    fn from(query: Query) -> Self {
        QuerySpec::Full(query)
    }
}
