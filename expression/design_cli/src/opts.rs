#![deny(missing_docs)]

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use cli::parsers::DurationSecondsParser;
use design_importer::config::DEFAULT_SENTINEL;
use experiment::names::ShortName;
use util::source::Source;

#[derive(Parser, Debug)]
#[command(name = "design_cli")]
#[command(bin_name = "design_cli")]
#[command(version, about, long_about = None)]
pub(crate) struct Opts {
    /// Path of the directory holding experiment files
    #[arg(long, default_value = ".")]
    pub(crate) path: PathBuf,

    /// Experiment short name, e.g. 'GSE1234'
    #[arg(long, value_name = "SHORT_NAME")]
    pub(crate) experiment: ShortName,

    #[command(subcommand)]
    pub(crate) command: ExperimentCommand,

    /// Trace log file
    #[arg(long, num_args = 0..=1, default_missing_value = "trace.log")]
    pub(crate) trace: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) verbose: Verbosity<InfoLevel>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum ExperimentCommand {
    /// Create an experiment from a sample sheet
    Create {
        /// Descriptive name of the experiment
        #[arg(long)]
        name: String,

        /// Sample sheet, CSV with 'BioMaterial', 'BioAssay' and 'Accession' columns
        #[arg(long, value_name = "FILE")]
        samples: Source,
    },
    /// Import an experimental design file, '-' reads from stdin
    ImportDesign {
        /// Design file
        #[arg(long, value_name = "FILE")]
        file: Source,

        /// Controlled vocabulary, CSV with 'Label' and 'Uri' columns
        #[arg(long, value_name = "FILE")]
        vocabulary: Source,

        /// Validate and reconcile the design without saving anything
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Prefix of factor description lines
        #[arg(long, default_value = DEFAULT_SENTINEL)]
        sentinel: String,

        /// Seconds to wait for the vocabulary to load
        #[arg(long, value_name = "SECONDS", value_parser = DurationSecondsParser::default(), default_value = "100")]
        vocabulary_timeout: Duration,
    },
    /// Export the experimental design in the format 'import-design' reads
    ExportDesign {
        /// Output file
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Show factors, factor values and sample assignments
    Show,
}

/// Relative file sources are relative to `--path`.
pub(crate) fn resolve_source(source: Source, path: &std::path::Path) -> anyhow::Result<Source> {
    match source {
        Source::File(file) => Ok(Source::try_from_path(path, file)?),
        Source::Stdin => Ok(Source::Stdin),
    }
}
