use experiment::bio_material::FactorValueAssignmentError;
use experiment::characteristic::Characteristic;
use experiment::design::DesignError;
use experiment::experiment::ExpressionExperiment;
use experiment::factor::{FactorType, FactorValueKind};
use experiment::ids::{BioMaterialId, FactorValueId};
use experiment::measurement::Measurement;
use experiment::names::FactorName;
use tracing::{trace, warn};

use crate::error::ImportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The cell was empty.
    Blank,
    /// The sample already holds an equal value.
    Unchanged(FactorValueId),
    Created(FactorValueId),
    Reused(FactorValueId),
    /// The sample already holds a different value; the cell was skipped.
    Conflict { existing: FactorValueId },
}

/// Turns one cell into a factor value on `bio_material`.
///
/// Continuous factors get a new measurement value per cell. Categorical factors reuse an existing value whose
/// text matches ignoring case, otherwise a new one is created in the factor's category.
pub fn reconcile_cell(
    experiment: &mut ExpressionExperiment,
    bio_material: BioMaterialId,
    factor: &FactorName,
    raw: &str,
) -> Result<Reconciliation, ImportError> {
    let raw = raw.trim();
    if raw.is_empty() {
        trace!("Blank cell. bio_material: {}, factor: '{}'", bio_material, factor);
        return Ok(Reconciliation::Blank);
    }

    let experimental_factor = experiment
        .design()
        .factor(factor)
        .ok_or_else(|| DesignError::UnknownFactor(factor.clone()))?;
    let factor_type = experimental_factor.factor_type;

    let sample = experiment
        .bio_material(&bio_material)
        .ok_or(FactorValueAssignmentError::UnknownBioMaterial(bio_material))?;

    if let Some(existing) = sample.factor_value(factor) {
        let existing_value = experimental_factor
            .value(&existing)
            .map_or("", |factor_value| factor_value.value());

        if same_value(factor_type, existing_value, raw) {
            trace!("Value unchanged. bio_material: '{}', factor: '{}', value: '{}'", sample.name, factor, raw);
            return Ok(Reconciliation::Unchanged(existing));
        }

        warn!(
            "Sample already has a value for factor, skipping. bio_material: '{}', factor: '{}', existing: '{}', skipped: '{}'",
            sample.name, factor, existing_value, raw
        );
        return Ok(Reconciliation::Conflict {
            existing,
        });
    }

    let (id, reconciliation) = match factor_type {
        FactorType::Continuous => {
            let id = experiment
                .design_mut()
                .add_factor_value(factor, FactorValueKind::Measurement(Measurement::infer(raw)))?;
            (id, Reconciliation::Created(id))
        }
        FactorType::Categorical => match experimental_factor.find_categorical_value(raw) {
            Some(id) => (id, Reconciliation::Reused(id)),
            None => {
                let characteristic = Characteristic::in_category(&experimental_factor.category, raw);
                let id = experiment
                    .design_mut()
                    .add_factor_value(factor, FactorValueKind::Characteristic(characteristic))?;
                (id, Reconciliation::Created(id))
            }
        },
    };

    experiment.assign_factor_value(&bio_material, factor, id)?;

    Ok(reconciliation)
}

fn same_value(factor_type: FactorType, existing: &str, raw: &str) -> bool {
    match factor_type {
        FactorType::Categorical => existing.to_lowercase() == raw.to_lowercase(),
        FactorType::Continuous => existing.trim() == raw,
    }
}
