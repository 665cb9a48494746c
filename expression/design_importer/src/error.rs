use std::time::Duration;

use experiment::bio_material::FactorValueAssignmentError;
use experiment::design::DesignError;
use experiment::names::{FactorName, NameError};
use thiserror::Error;

use crate::persistence::PersistenceError;
use crate::readiness::ReadinessError;
use crate::vocabulary::VocabularyError;

/// Problems with the structure of a design file. Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DesignFileFormatError {
    #[error("No factor description lines. sentinel: '{sentinel}'")]
    MissingFactorDescriptions { sentinel: String },

    #[error("No sample header line.")]
    MissingHeader,

    #[error("No sample lines.")]
    MissingSampleLines,

    #[error(
        "Invalid factor description, expected '<name> : Category=<category> Type=<type>'. line: {line}, text: '{text}'"
    )]
    InvalidFactorDescription { line: usize, text: String },

    #[error("Invalid factor description. line: {line}, cause: {cause}")]
    InvalidFactorName { line: usize, cause: NameError },

    #[error("Invalid factor properties. line: {line}, reason: {reason}")]
    InvalidFactorProperties { line: usize, reason: String },

    #[error(
        "Column count mismatch, expected between {declared} and {} columns. line: {line}, columns: {columns}",
        declared + 2
    )]
    ColumnCountMismatch { line: usize, columns: usize, declared: usize },

    #[error("Header has no sample column, one column per factor only. line: {line}")]
    MissingSampleColumn { line: usize },

    #[error("Header column does not name a declared factor. line: {line}, column: {column}, text: '{text}'")]
    UnknownFactorColumn { line: usize, column: usize, text: String },

    #[error("Header names a factor more than once. line: {line}, factor: '{factor}'")]
    DuplicateFactorColumn { line: usize, factor: FactorName },

    #[error("Row width does not match header. line: {line}, columns: {columns}, expected: {expected}")]
    RowWidthMismatch { line: usize, columns: usize, expected: usize },

    #[error("Blank sample identifier. line: {line}")]
    BlankSampleIdentifier { line: usize },
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unable to read design file. cause: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid design file. cause: {0}")]
    Format(#[from] DesignFileFormatError),

    #[error("Vocabulary not ready. waited: {0:?}")]
    VocabularyNotReady(Duration),

    #[error("Vocabulary error. cause: {0}")]
    Vocabulary(#[from] VocabularyError),

    #[error("No vocabulary term matches factor category. factor: '{factor}', category: '{category}'")]
    UnknownCategory { factor: FactorName, category: String },

    #[error(
        "No sample in the experiment matches. line: {line}, sample: '{sample}', external_id: {external_id:?}, experiment: '{experiment}'"
    )]
    UnmatchedSample {
        line: usize,
        sample: String,
        external_id: Option<String>,
        experiment: String,
    },

    #[error("Sample identifier matches more than one sample. line: {line}, identifier: '{identifier}'")]
    AmbiguousSample { line: usize, identifier: String },

    #[error("Design error. cause: {0}")]
    Design(#[from] DesignError),

    #[error("Factor value assignment error. cause: {0}")]
    Assignment(#[from] FactorValueAssignmentError),

    #[error("Persistence error. cause: {0}")]
    Persistence(#[from] PersistenceError),
}

impl From<ReadinessError> for ImportError {
    fn from(value: ReadinessError) -> Self {
        match value {
            ReadinessError::TimedOut(waited) => ImportError::VocabularyNotReady(waited),
        }
    }
}
