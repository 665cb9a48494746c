use experiment::characteristic::OntologyTerm;
use thiserror::Error;

use crate::readiness::Readiness;

/// Resolves factor categories to controlled-vocabulary terms.
///
/// Implementations may load their terms in the background; callers wait on [`TermLookup::readiness`] before
/// the first lookup.
pub trait TermLookup {
    fn readiness(&self) -> Readiness;

    /// Finds the term whose label is exactly `label`.
    fn find_by_label(&self, label: &str) -> Result<Option<OntologyTerm>, VocabularyError>;
}

impl<T: TermLookup + ?Sized> TermLookup for &T {
    fn readiness(&self) -> Readiness {
        (**self).readiness()
    }

    fn find_by_label(&self, label: &str) -> Result<Option<OntologyTerm>, VocabularyError> {
        (**self).find_by_label(label)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VocabularyError {
    #[error("Vocabulary unavailable. reason: {0}")]
    Unavailable(String),
}

/// A vocabulary whose terms are known up-front.
#[derive(Debug, Clone, Default)]
pub struct StaticVocabulary {
    terms: Vec<OntologyTerm>,
}

impl StaticVocabulary {
    pub fn new(terms: Vec<OntologyTerm>) -> Self {
        Self {
            terms,
        }
    }

    pub fn from_labels(labels: &[&str]) -> Self {
        Self::new(
            labels
                .iter()
                .map(|label| OntologyTerm {
                    label: label.to_string(),
                    uri: None,
                })
                .collect(),
        )
    }
}

impl TermLookup for StaticVocabulary {
    fn readiness(&self) -> Readiness {
        Readiness::ready()
    }

    fn find_by_label(&self, label: &str) -> Result<Option<OntologyTerm>, VocabularyError> {
        Ok(self
            .terms
            .iter()
            .find(|term| term.label == label)
            .cloned())
    }
}
