use std::fmt::Write;
use std::time::Duration;

use anyhow::{bail, Context};
use design_importer::config::ImporterConfig;
use design_importer::importer::DesignImporter;
use experiment::experiment::ExpressionExperiment;
use experiment::names::ShortName;
use stores::design_writer::export_design;
use stores::experiments::{ExperimentStore, StoreDesignPersister};
use stores::samples::{add_samples, load_samples};
use stores::vocabulary::CsvVocabulary;
use tracing::{info, warn};
use util::source::Source;

use crate::opts::{resolve_source, ExperimentCommand, Opts};

pub(crate) fn run(opts: Opts) -> anyhow::Result<()> {
    let store = ExperimentStore::new(opts.path.clone());
    let short_name = opts.experiment;

    match opts.command {
        ExperimentCommand::Create {
            name,
            samples,
        } => {
            let samples = resolve_source(samples, &opts.path)?;
            create(&store, short_name, name, &samples)
        }
        ExperimentCommand::ImportDesign {
            file,
            vocabulary,
            dry_run,
            sentinel,
            vocabulary_timeout,
        } => {
            let file = resolve_source(file, &opts.path)?;
            let vocabulary = resolve_source(vocabulary, &opts.path)?;
            import_design(&store, &short_name, &file, vocabulary, dry_run, &sentinel, vocabulary_timeout)
        }
        ExperimentCommand::ExportDesign {
            output,
        } => {
            let experiment = store.load(&short_name)?;
            let output = match output.is_absolute() {
                true => output,
                false => opts.path.join(output),
            };
            export_design(&experiment, &output)?;
            info!("Exported design. path: {}", output.display());
            Ok(())
        }
        ExperimentCommand::Show => {
            let experiment = store.load(&short_name)?;
            print!("{}", describe(&experiment)?);
            Ok(())
        }
    }
}

fn create(store: &ExperimentStore, short_name: ShortName, name: String, samples: &Source) -> anyhow::Result<()> {
    if store.exists(&short_name) {
        bail!(
            "Experiment already exists. short_name: {}, path: {}",
            short_name,
            store.path(&short_name).display()
        );
    }

    let mut experiment = ExpressionExperiment::new(short_name, name);
    let count = add_samples(&mut experiment, load_samples(samples)?)?;
    if count == 0 {
        warn!("Sample sheet has no samples. source: {}", samples);
    }

    store.save(&experiment)?;

    info!(
        "Created experiment. short_name: {}, bio_materials: {}, bio_assays: {}",
        experiment.short_name,
        experiment.bio_materials().count(),
        experiment.bio_assays().len()
    );

    Ok(())
}

fn import_design(
    store: &ExperimentStore,
    short_name: &ShortName,
    file: &Source,
    vocabulary: Source,
    dry_run: bool,
    sentinel: &str,
    vocabulary_timeout: Duration,
) -> anyhow::Result<()> {
    let config = ImporterConfig::new(sentinel, vocabulary_timeout)?;

    // start loading while the experiment is read
    let vocabulary = CsvVocabulary::load_in_background(vocabulary);

    let mut experiment = store.load(short_name)?;
    let persister = StoreDesignPersister::open(store.clone(), short_name)?;
    let mut importer = DesignImporter::new(config, vocabulary, persister);

    let reader = file
        .open()
        .with_context(|| format!("Error opening design file. source: {}", file))?;

    let summary = importer
        .import_design(&mut experiment, reader, dry_run)
        .with_context(|| format!("Error importing design. source: {}", file))?;

    match dry_run {
        true => info!("Dry run complete, nothing was saved. {}", summary),
        false => info!("Imported design successfully. path: {}", store.path(short_name).display()),
    }

    Ok(())
}

fn describe(experiment: &ExpressionExperiment) -> anyhow::Result<String> {
    let mut out = String::new();
    let design = experiment.design();

    writeln!(out, "Experiment: {} ({})", experiment.short_name, experiment.name)?;

    for factor in design.factors() {
        writeln!(
            out,
            "Factor: {}, category: {}, type: {}",
            factor.name, factor.category, factor.factor_type
        )?;
        for factor_value in factor.values() {
            match factor_value.measurement() {
                Some(measurement) => writeln!(
                    out,
                    "  {}: {} ({})",
                    factor_value.id, factor_value.value(), measurement.representation
                )?,
                None => writeln!(out, "  {}: {}", factor_value.id, factor_value.value())?,
            }
        }
    }

    for bio_material in experiment.bio_materials() {
        let export_name = experiment
            .export_name(&bio_material.id)
            .unwrap_or_default();
        writeln!(out, "Sample: {} ({})", bio_material.name, export_name)?;
        for factor in design.factors() {
            let value = bio_material
                .factor_value(&factor.name)
                .and_then(|id| factor.value(&id))
                .map_or("-", |factor_value| factor_value.value());
            writeln!(out, "  {}: {}", factor.name, value)?;
        }
    }

    Ok(out)
}
