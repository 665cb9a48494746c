use std::collections::BTreeSet;

use experiment::bio_material::BioMaterial;
use experiment::design::ExperimentalDesign;
use experiment::experiment::ExpressionExperiment;
use experiment::factor::{ExperimentalFactor, FactorValue};
use experiment::ids::{BioMaterialId, FactorValueId};
use experiment::names::{FactorName, ShortName};
use thiserror::Error;
use tracing::{debug, info};

/// Receives the changes an import makes, in dependency order: factors, then their values, then the design,
/// then every sample that gained a value.
pub trait DesignPersister {
    fn create_factor(&mut self, experiment: &ShortName, factor: &ExperimentalFactor) -> Result<(), PersistenceError>;

    fn create_factor_value(
        &mut self,
        experiment: &ShortName,
        factor_value: &FactorValue,
    ) -> Result<(), PersistenceError>;

    fn update_design(&mut self, experiment: &ShortName, design: &ExperimentalDesign) -> Result<(), PersistenceError>;

    fn update_bio_material(
        &mut self,
        experiment: &ShortName,
        bio_material: &BioMaterial,
    ) -> Result<(), PersistenceError>;
}

#[derive(Error, Debug)]
#[error("Unable to persist {entity}. experiment: '{experiment}', reason: {reason}")]
pub struct PersistenceError {
    pub experiment: String,
    pub entity: String,
    pub reason: anyhow::Error,
}

impl PersistenceError {
    pub fn new(experiment: &ShortName, entity: impl Into<String>, reason: anyhow::Error) -> Self {
        Self {
            experiment: experiment.to_string(),
            entity: entity.into(),
            reason,
        }
    }
}

/// Persists the factors the import created.
pub fn persist_factors<P: DesignPersister + ?Sized>(
    persister: &mut P,
    experiment: &ExpressionExperiment,
    created: &[FactorName],
) -> Result<(), PersistenceError> {
    for factor in created
        .iter()
        .filter_map(|name| experiment.design().factor(name))
    {
        debug!("Persisting factor. name: '{}'", factor.name);
        persister.create_factor(&experiment.short_name, factor)?;
    }

    Ok(())
}

/// Persists the surviving new values, the design and the modified samples.
///
/// Values in `created_values` that were pruned in the meantime are skipped.
pub fn persist_assignments<P: DesignPersister + ?Sized>(
    persister: &mut P,
    experiment: &ExpressionExperiment,
    created_values: &BTreeSet<(FactorName, FactorValueId)>,
    modified: &BTreeSet<BioMaterialId>,
) -> Result<(), PersistenceError> {
    let short_name = &experiment.short_name;

    let mut value_count = 0;
    for factor_value in created_values
        .iter()
        .filter_map(|(factor, id)| {
            experiment
                .design()
                .factor_value(factor, id)
        })
    {
        persister.create_factor_value(short_name, factor_value)?;
        value_count += 1;
    }

    persister.update_design(short_name, experiment.design())?;

    for bio_material in modified
        .iter()
        .filter_map(|id| experiment.bio_material(id))
    {
        persister.update_bio_material(short_name, bio_material)?;
    }

    info!(
        "Persisted design. experiment: '{}', factor_values: {}, bio_materials: {}",
        short_name,
        value_count,
        modified.len()
    );

    Ok(())
}
