use anyhow::{Context, Error};
use experiment::experiment::ExpressionExperiment;
use tracing::{info, trace, Level};
use util::source::Source;

use crate::csv::{Sample, SampleRecord};

pub type SampleSheetSource = Source;

/// Loads a `BioMaterial,BioAssay,Accession` CSV file, one line per assay.
#[tracing::instrument(level = Level::DEBUG)]
pub fn load_samples(source: &SampleSheetSource) -> Result<Vec<Sample>, Error> {
    info!("Loading sample sheet. source: {}", source);

    let reader = source
        .open()
        .with_context(|| format!("Error opening sample sheet. source: {}", source))?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples: Vec<Sample> = vec![];

    for result in csv_reader.deserialize() {
        let record: SampleRecord = result.with_context(|| "Deserializing sample record".to_string())?;

        trace!("{:?}", record);

        let sample = record
            .build_sample()
            .with_context(|| format!("Building sample from record. record: {:?}", record))?;

        samples.push(sample);
    }

    Ok(samples)
}

/// Adds every sample in the sheet to `experiment`, returning the number of assays added.
pub fn add_samples(experiment: &mut ExpressionExperiment, samples: Vec<Sample>) -> Result<usize, Error> {
    let count = samples.len();

    for sample in samples {
        experiment
            .add_sample(&sample.bio_material, &sample.bio_assay, sample.accession)
            .with_context(|| format!("Adding sample. bio_material: '{}'", sample.bio_material))?;
    }

    Ok(count)
}
