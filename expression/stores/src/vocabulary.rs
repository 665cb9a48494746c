use std::sync::{Arc, OnceLock};
use std::thread;

use anyhow::{Context, Error};
use design_importer::readiness::{readiness, Readiness};
use design_importer::vocabulary::{TermLookup, VocabularyError};
use experiment::characteristic::OntologyTerm;
use tracing::{debug, error, info, trace, Level};
use util::source::Source;

use crate::csv::TermRecord;

pub type VocabularySource = Source;

/// Loads a `Label,Uri` CSV file.
#[tracing::instrument(level = Level::DEBUG)]
pub fn load_terms(source: &VocabularySource) -> Result<Vec<OntologyTerm>, Error> {
    info!("Loading vocabulary. source: {}", source);

    let reader = source
        .open()
        .with_context(|| format!("Error opening vocabulary. source: {}", source))?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut terms: Vec<OntologyTerm> = vec![];

    for result in csv_reader.deserialize() {
        let record: TermRecord = result.with_context(|| "Deserializing term record".to_string())?;

        trace!("{:?}", record);

        let term = record
            .build_term()
            .with_context(|| format!("Building term from record. record: {:?}", record))?;

        terms.push(term);
    }

    info!("Loaded vocabulary. source: {}, terms: {}", source, terms.len());

    Ok(terms)
}

type LoadResult = Result<Vec<OntologyTerm>, String>;

/// A vocabulary loaded from a CSV file on a background thread.
///
/// Lookups made before [`TermLookup::readiness`] completes fail, as do all lookups after a failed load.
pub struct CsvVocabulary {
    source: VocabularySource,
    terms: Arc<OnceLock<LoadResult>>,
    readiness: Readiness,
}

impl CsvVocabulary {
    pub fn load_in_background(source: VocabularySource) -> Self {
        let terms: Arc<OnceLock<LoadResult>> = Arc::new(OnceLock::new());
        let (signal, readiness) = readiness();

        let thread_terms = terms.clone();
        let thread_source = source.clone();
        thread::spawn(move || {
            let result = load_terms(&thread_source).map_err(|error| {
                error!("Unable to load vocabulary. source: {}, cause: {:#}", thread_source, error);
                format!("{:#}", error)
            });
            if thread_terms.set(result).is_err() {
                debug!("Vocabulary already loaded, keeping first result. source: {}", thread_source);
            }
            signal.complete();
        });

        Self {
            source,
            terms,
            readiness,
        }
    }

    pub fn source(&self) -> &VocabularySource {
        &self.source
    }
}

impl TermLookup for CsvVocabulary {
    fn readiness(&self) -> Readiness {
        self.readiness.clone()
    }

    fn find_by_label(&self, label: &str) -> Result<Option<OntologyTerm>, VocabularyError> {
        match self.terms.get() {
            Some(Ok(terms)) => Ok(terms
                .iter()
                .find(|term| term.label == label)
                .cloned()),
            Some(Err(reason)) => Err(VocabularyError::Unavailable(reason.clone())),
            None => Err(VocabularyError::Unavailable(format!("not loaded. source: {}", self.source))),
        }
    }
}
