/// Imports an experimental design from a tab-delimited design file.
///
/// A design file has three parts: factor description lines, a sample header line and one data line per
/// sample, e.g.
///
/// ```text
/// #$Age : Category=age Type=Continuous
/// #$Treatment : Category=treatment Type=Categorical
/// Bioassay	Age	Treatment
/// f-aa	50	control
/// f-ab	62	drug
/// ```
///
/// The pipeline is: [`parser`] -> [`layout`] validation -> [`factor_builder`] -> [`value_reconciler`] and
/// [`bio_material_binder`] -> [`persistence`], driven by [`importer::DesignImporter`].
pub mod bio_material_binder;
pub mod config;
pub mod error;
pub mod factor_builder;
pub mod importer;
pub mod layout;
pub mod parser;
pub mod persistence;
pub mod readiness;
pub mod value_reconciler;
pub mod vocabulary;

pub use config::ImporterConfig;
pub use error::{DesignFileFormatError, ImportError};
pub use importer::{DesignImporter, ImportStage, ImportSummary};
pub use persistence::{DesignPersister, PersistenceError};
pub use readiness::{Readiness, ReadinessSignal};
pub use vocabulary::{StaticVocabulary, TermLookup, VocabularyError};
