use std::fmt::{Display, Formatter};

/// A controlled-vocabulary term, as resolved by a term lookup.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OntologyTerm {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub uri: Option<String>,
}

impl Display for OntologyTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.uri {
            Some(uri) => write!(f, "'{}' <{}>", self.label, uri),
            None => write!(f, "'{}'", self.label),
        }
    }
}

/// A categorical annotation: a free-text (or term) value under a vocabulary category.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct Characteristic {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub category_uri: Option<String>,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub value_uri: Option<String>,
}

impl Characteristic {
    /// A value under `category`, carrying the category's label and URI.
    pub fn in_category(category: &OntologyTerm, value: &str) -> Self {
        Self {
            category: category.label.clone(),
            category_uri: category.uri.clone(),
            value: value.to_string(),
            value_uri: None,
        }
    }
}
