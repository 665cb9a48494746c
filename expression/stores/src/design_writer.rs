use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Error};
use csv::{QuoteStyle, Terminator};
use design_importer::config::DEFAULT_SENTINEL;
use design_importer::factor_builder::CATEGORY_SPACE;
use design_importer::layout::EXTERNAL_ID_COLUMN;
use experiment::experiment::ExpressionExperiment;
use itertools::Itertools;
use tracing::info;

pub const SAMPLE_COLUMN: &str = "Bioassay";

/// Writes the design in the format the importer reads: factor descriptions, then a header of
/// `Bioassay`, `ExternalID` and one column per factor, then one line per sample.
///
/// Samples are written by export name, which never starts with `#`. Spaces in category labels are written as
/// `_` so each factor description keeps exactly two properties. The external id is the `/`-separated accessions of the sample's assays, or their names when they have no
/// accession. Samples without a value for a factor get a blank cell.
pub fn write_design<W: Write>(experiment: &ExpressionExperiment, mut writer: W) -> Result<(), Error> {
    let design = experiment.design();

    for factor in design.factors() {
        writeln!(
            writer,
            "{}{} : Category={} Type={}",
            DEFAULT_SENTINEL,
            factor.name,
            factor
                .category
                .label
                .replace(' ', &CATEGORY_SPACE.to_string()),
            factor.factor_type
        )?;
    }

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Never)
        .from_writer(writer);

    let mut header: Vec<String> = vec![SAMPLE_COLUMN.to_string(), EXTERNAL_ID_COLUMN.to_string()];
    header.extend(
        design
            .factors()
            .map(|factor| factor.name.to_string()),
    );
    csv_writer.write_record(&header)?;

    for bio_material in experiment.bio_materials() {
        let export_name = experiment
            .export_name(&bio_material.id)
            .with_context(|| format!("Building export name. bio_material: '{}'", bio_material.name))?;

        let external_id = experiment
            .bio_assays_for(&bio_material.id)
            .map(|bio_assay| {
                bio_assay
                    .accession
                    .as_deref()
                    .unwrap_or(bio_assay.name.as_str())
            })
            .join("/");

        let mut record: Vec<String> = vec![export_name, external_id];
        record.extend(design.factors().map(|factor| {
            bio_material
                .factor_value(&factor.name)
                .and_then(|id| factor.value(&id))
                .map(|factor_value| factor_value.value().to_string())
                .unwrap_or_default()
        }));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;

    Ok(())
}

pub fn export_design(experiment: &ExpressionExperiment, path: &Path) -> Result<(), Error> {
    info!(
        "Exporting design. experiment: '{}', path: {}",
        experiment.short_name,
        path.display()
    );

    let file = File::create(path).with_context(|| format!("Error creating design file. path: {}", path.display()))?;
    write_design(experiment, file).with_context(|| format!("Error writing design file. path: {}", path.display()))?;

    Ok(())
}
