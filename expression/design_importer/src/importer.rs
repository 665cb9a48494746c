use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::io::BufRead;

use experiment::experiment::ExpressionExperiment;
use experiment::ids::{BioMaterialId, FactorValueId};
use experiment::names::FactorName;
use tracing::{debug, info};

use crate::bio_material_binder::{finish_binding, SampleResolver};
use crate::config::ImporterConfig;
use crate::error::ImportError;
use crate::factor_builder::{build_factors, DeclaredFactors};
use crate::layout::ColumnLayout;
use crate::parser::parse_design_file;
use crate::persistence::{persist_assignments, persist_factors, DesignPersister};
use crate::value_reconciler::{reconcile_cell, Reconciliation};
use crate::vocabulary::TermLookup;

/// Stages of an import, in the order they are entered. An import ends in either
/// [`ImportStage::Persisting`] or [`ImportStage::DryRunComplete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportStage {
    Parsing,
    Validating,
    BuildingFactors,
    BindingValues,
    Persisting,
    DryRunComplete,
}

impl Display for ImportStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportStage::Parsing => f.write_str("Parsing"),
            ImportStage::Validating => f.write_str("Validating"),
            ImportStage::BuildingFactors => f.write_str("BuildingFactors"),
            ImportStage::BindingValues => f.write_str("BindingValues"),
            ImportStage::Persisting => f.write_str("Persisting"),
            ImportStage::DryRunComplete => f.write_str("DryRunComplete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub stage: ImportStage,
    pub dry_run: bool,
    pub factors_created: Vec<FactorName>,
    pub factors_reused: Vec<FactorName>,
    pub samples: usize,
    pub values_created: usize,
    pub values_reused: usize,
    pub values_unchanged: usize,
    pub values_pruned: usize,
    pub blank_cells: usize,
    pub conflicts: usize,
    /// Sample name and factor, for each sample left without a value for a factor named in the file.
    pub unassigned: Vec<(String, FactorName)>,
}

impl ImportSummary {
    fn new(dry_run: bool) -> Self {
        Self {
            stage: ImportStage::Parsing,
            dry_run,
            factors_created: vec![],
            factors_reused: vec![],
            samples: 0,
            values_created: 0,
            values_reused: 0,
            values_unchanged: 0,
            values_pruned: 0,
            blank_cells: 0,
            conflicts: 0,
            unassigned: vec![],
        }
    }
}

impl Display for ImportSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "stage: {}, dry_run: {}, factors_created: {}, factors_reused: {}, samples: {}, values_created: {}, values_reused: {}, values_unchanged: {}, values_pruned: {}, blank_cells: {}, conflicts: {}, unassigned: {}",
            self.stage,
            self.dry_run,
            self.factors_created.len(),
            self.factors_reused.len(),
            self.samples,
            self.values_created,
            self.values_reused,
            self.values_unchanged,
            self.values_pruned,
            self.blank_cells,
            self.conflicts,
            self.unassigned.len(),
        )
    }
}

/// Imports design files into experiments, resolving categories with `L` and persisting through `P`.
pub struct DesignImporter<L, P> {
    config: ImporterConfig,
    lookup: L,
    persister: P,
}

impl<L: TermLookup, P: DesignPersister> DesignImporter<L, P> {
    pub fn new(config: ImporterConfig, lookup: L, persister: P) -> Self {
        Self {
            config,
            lookup,
            persister,
        }
    }

    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }

    pub fn persister(&self) -> &P {
        &self.persister
    }

    pub fn into_persister(self) -> P {
        self.persister
    }

    /// Reads a design file and applies it to `experiment`.
    ///
    /// All changes are made to a copy which replaces `experiment` only when a real run succeeds; a failed import
    /// or a dry run leaves `experiment` as it was. A dry run makes no persistence calls. A real run persists new
    /// factors once they are built and everything else at the end.
    pub fn import_design<R: BufRead>(
        &mut self,
        experiment: &mut ExpressionExperiment,
        reader: R,
        dry_run: bool,
    ) -> Result<ImportSummary, ImportError> {
        info!(
            "Importing design. experiment: '{}', dry_run: {}",
            experiment.short_name, dry_run
        );
        let mut summary = ImportSummary::new(dry_run);

        enter(&mut summary, ImportStage::Parsing);
        let design_file = parse_design_file(reader, self.config.sentinel())?;

        enter(&mut summary, ImportStage::Validating);
        let declared = DeclaredFactors::from_lines(&design_file.factor_lines)?;
        let layout = ColumnLayout::from_header(&design_file.header, &declared)?;
        for row in design_file.rows.iter() {
            layout.check_row(row)?;
        }

        let mut working = experiment.clone();

        enter(&mut summary, ImportStage::BuildingFactors);
        self.lookup
            .readiness()
            .wait(self.config.vocabulary_timeout())?;
        let built = build_factors(working.design_mut(), &declared, &self.lookup)?;
        if !dry_run {
            persist_factors(&mut self.persister, &working, &built.created)?;
        }
        summary.factors_created = built.created;
        summary.factors_reused = built.reused;

        enter(&mut summary, ImportStage::BindingValues);
        let resolver = SampleResolver::new(&working);
        let mut created_values: BTreeSet<(FactorName, FactorValueId)> = BTreeSet::new();
        let mut modified: BTreeSet<BioMaterialId> = BTreeSet::new();
        let mut samples: BTreeSet<BioMaterialId> = BTreeSet::new();

        for row in design_file.rows.iter() {
            let external_id = layout
                .external_id_column()
                .map(|column| row.cell(column));
            let bio_material = resolver.resolve(row.line, row.cell(ColumnLayout::SAMPLE_COLUMN), external_id)?;
            samples.insert(bio_material);

            for (column, factor) in layout.factor_columns() {
                match reconcile_cell(&mut working, bio_material, factor, row.cell(*column))? {
                    Reconciliation::Blank => summary.blank_cells += 1,
                    Reconciliation::Unchanged(_) => summary.values_unchanged += 1,
                    Reconciliation::Conflict {
                        ..
                    } => summary.conflicts += 1,
                    Reconciliation::Created(id) => {
                        created_values.insert((factor.clone(), id));
                        modified.insert(bio_material);
                        summary.values_created += 1;
                    }
                    Reconciliation::Reused(_) => {
                        modified.insert(bio_material);
                        summary.values_reused += 1;
                    }
                }
            }
        }
        summary.samples = samples.len();

        let report = finish_binding(&mut working, layout.factor_names())?;
        summary.values_pruned = report.pruned;
        summary.unassigned = report.unassigned;

        if dry_run {
            enter(&mut summary, ImportStage::DryRunComplete);
            info!("Validated design. experiment: '{}', {}", experiment.short_name, summary);
            return Ok(summary);
        }

        enter(&mut summary, ImportStage::Persisting);
        persist_assignments(&mut self.persister, &working, &created_values, &modified)?;
        *experiment = working;

        info!("Imported design. experiment: '{}', {}", experiment.short_name, summary);

        Ok(summary)
    }
}

fn enter(summary: &mut ImportSummary, stage: ImportStage) {
    debug!("Import stage. from: {}, to: {}", summary.stage, stage);
    info!("Import stage: {}", stage);
    summary.stage = stage;
}
