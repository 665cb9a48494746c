use std::collections::{BTreeMap, BTreeSet};

use experiment::experiment::ExpressionExperiment;
use experiment::ids::BioMaterialId;
use experiment::names::{FactorName, ShortName};
use tracing::{debug, info, warn};

use crate::error::ImportError;

/// Separates grouped external ids, e.g. `GSM1/GSM2`.
pub const EXTERNAL_ID_SEPARATOR: char = '/';

/// Maps the identifiers a design file may use to the experiment's samples.
///
/// A sample is found by, in order: its name; its alias `<token>__<short_name>`; an accession, assay name or
/// export name; then each `/`-separated external id. Identifiers shared by different samples are ambiguous and
/// rejected when used.
#[derive(Debug, Clone)]
pub struct SampleResolver {
    experiment: ShortName,
    by_name: BTreeMap<String, BioMaterialId>,
    by_external_key: BTreeMap<String, BioMaterialId>,
    ambiguous: BTreeSet<String>,
}

impl SampleResolver {
    pub fn new(experiment: &ExpressionExperiment) -> Self {
        let mut resolver = Self {
            experiment: experiment.short_name.clone(),
            by_name: BTreeMap::new(),
            by_external_key: BTreeMap::new(),
            ambiguous: BTreeSet::new(),
        };

        for bio_material in experiment.bio_materials() {
            resolver
                .by_name
                .insert(bio_material.name.clone(), bio_material.id);

            let mut keys: Vec<String> = vec![];
            for bio_assay in experiment.bio_assays_for(&bio_material.id) {
                if let Some(accession) = bio_assay
                    .accession
                    .as_ref()
                    .filter(|accession| !accession.trim().is_empty())
                {
                    keys.push(accession.clone());
                }
                keys.push(bio_assay.name.clone());
            }
            if let Some(export_name) = experiment.export_name(&bio_material.id) {
                keys.push(export_name);
            }

            for key in keys {
                resolver.insert_external_key(key, bio_material.id);
            }
        }

        debug!(
            "Sample resolver. experiment: '{}', names: {}, external_keys: {}, ambiguous: {}",
            resolver.experiment,
            resolver.by_name.len(),
            resolver.by_external_key.len(),
            resolver.ambiguous.len()
        );

        resolver
    }

    fn insert_external_key(&mut self, key: String, id: BioMaterialId) {
        if self.ambiguous.contains(&key) {
            return;
        }
        match self.by_external_key.get(&key) {
            Some(existing) if *existing != id => {
                debug!("Ambiguous sample identifier. identifier: '{}', samples: {}, {}", key, existing, id);
                self.by_external_key.remove(&key);
                self.ambiguous.insert(key);
            }
            Some(_) => {}
            None => {
                self.by_external_key.insert(key, id);
            }
        }
    }

    fn lookup_external(&self, line: usize, key: &str) -> Result<Option<BioMaterialId>, ImportError> {
        if self.ambiguous.contains(key) {
            return Err(ImportError::AmbiguousSample {
                line,
                identifier: key.to_string(),
            });
        }

        Ok(self.by_external_key.get(key).copied())
    }

    pub fn resolve(&self, line: usize, sample: &str, external_id: Option<&str>) -> Result<BioMaterialId, ImportError> {
        if let Some(id) = self.by_name.get(sample) {
            return Ok(*id);
        }

        if let Some(id) = self
            .by_name
            .get(&self.experiment.sample_alias(sample))
        {
            debug!("Matched sample by alias. line: {}, sample: '{}', id: {}", line, sample, id);
            return Ok(*id);
        }

        if let Some(id) = self.lookup_external(line, sample)? {
            debug!("Matched sample by assay. line: {}, sample: '{}', id: {}", line, sample, id);
            return Ok(id);
        }

        for token in external_id
            .unwrap_or_default()
            .split(EXTERNAL_ID_SEPARATOR)
            .map(str::trim)
            .filter(|token| !token.is_empty())
        {
            if let Some(id) = self.lookup_external(line, token)? {
                debug!("Matched sample by external id. line: {}, external_id: '{}', id: {}", line, token, id);
                return Ok(id);
            }
        }

        Err(ImportError::UnmatchedSample {
            line,
            sample: sample.to_string(),
            external_id: external_id
                .filter(|external_id| !external_id.is_empty())
                .map(str::to_string),
            experiment: self.experiment.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingReport {
    /// Sample name and factor, for each sample left without a value for a factor named in the file.
    pub unassigned: Vec<(String, FactorName)>,
    pub pruned: usize,
}

/// Warns about samples without a value for each of `factors`, then removes the values of those factors that no
/// sample refers to.
pub fn finish_binding<'a>(
    experiment: &mut ExpressionExperiment,
    factors: impl IntoIterator<Item = &'a FactorName>,
) -> Result<BindingReport, ImportError> {
    let mut report = BindingReport::default();

    for factor in factors {
        for bio_material in experiment.bio_materials_without_value(factor) {
            warn!(
                "Sample has no value for factor. bio_material: '{}', factor: '{}'",
                bio_material.name, factor
            );
            report
                .unassigned
                .push((bio_material.name.clone(), factor.clone()));
        }

        let pruned = experiment.prune_unused_factor_values(factor)?;
        report.pruned += pruned.len();
    }

    if report.pruned > 0 {
        info!("Pruned unused factor values. count: {}", report.pruned);
    }

    Ok(report)
}
