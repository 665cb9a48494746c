use std::collections::BTreeMap;

use serde_with::serde_as;
use thiserror::Error;

use crate::ids::{BioMaterialId, FactorValueId};
use crate::names::FactorName;

/// A physical sample.
///
/// Holds references to factor values, keyed by factor. The values themselves belong to the factors of the
/// experiment's design.
#[serde_as]
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct BioMaterial {
    pub id: BioMaterialId,
    pub name: String,

    #[serde_as(as = "Vec<(_, _)>")]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[serde(default)]
    factor_values: BTreeMap<FactorName, FactorValueId>,
}

impl BioMaterial {
    pub fn new(id: BioMaterialId, name: String) -> Self {
        Self {
            id,
            name,
            factor_values: BTreeMap::default(),
        }
    }

    pub fn factor_value(&self, factor: &FactorName) -> Option<FactorValueId> {
        self.factor_values.get(factor).copied()
    }

    pub fn factor_values(&self) -> impl Iterator<Item = (&FactorName, &FactorValueId)> {
        self.factor_values.iter()
    }

    /// Holds at most one value per factor; a second assignment for the same factor is refused.
    pub(crate) fn assign_factor_value(
        &mut self,
        factor: &FactorName,
        id: FactorValueId,
    ) -> Result<(), FactorValueAssignmentError> {
        if let Some(existing) = self.factor_values.get(factor) {
            return Err(FactorValueAssignmentError::AlreadyAssigned {
                bio_material: self.name.clone(),
                factor: factor.clone(),
                existing: *existing,
                rejected: id,
            });
        }

        self.factor_values
            .insert(factor.clone(), id);

        Ok(())
    }
}

/// A single assay run on a sample.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct BioAssay {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub accession: Option<String>,
    pub bio_material: BioMaterialId,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactorValueAssignmentError {
    #[error(
        "Sample already has a value for factor. bio_material: '{bio_material}', factor: '{factor}', existing: {existing}, rejected: {rejected}"
    )]
    AlreadyAssigned {
        bio_material: String,
        factor: FactorName,
        existing: FactorValueId,
        rejected: FactorValueId,
    },
    #[error("Unknown sample. id: {0}")]
    UnknownBioMaterial(BioMaterialId),
    #[error("Unknown factor value. factor: '{factor}', id: {id}")]
    UnknownFactorValue { factor: FactorName, id: FactorValueId },
}
