use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use serde_with::serde_as;
use thiserror::Error;
use tracing::info;

use crate::bio_material::{BioAssay, BioMaterial, FactorValueAssignmentError};
use crate::design::{DesignError, ExperimentalDesign};
use crate::factor::FactorValue;
use crate::ids::{BioMaterialId, FactorValueId};
use crate::names::{FactorName, ShortName};

/// Separates the sample name from the assay names in an export name.
pub const EXPORT_NAME_DELIMITER: &str = "___";

#[serde_as]
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct ExpressionExperiment {
    pub short_name: ShortName,
    pub name: String,

    #[serde_as(as = "Vec<(_, _)>")]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[serde(default)]
    bio_materials: BTreeMap<BioMaterialId, BioMaterial>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    bio_assays: Vec<BioAssay>,

    #[serde(default)]
    design: ExperimentalDesign,
}

impl ExpressionExperiment {
    pub fn new(short_name: ShortName, name: String) -> Self {
        Self {
            short_name,
            name,
            bio_materials: BTreeMap::default(),
            bio_assays: vec![],
            design: ExperimentalDesign::default(),
        }
    }

    /// Adds an assay, creating its sample when no sample of that name exists yet.
    ///
    /// Assay names are unique within an experiment.
    pub fn add_sample(
        &mut self,
        bio_material_name: &str,
        bio_assay_name: &str,
        accession: Option<String>,
    ) -> Result<BioMaterialId, ExperimentError> {
        if self
            .bio_assays
            .iter()
            .any(|bio_assay| bio_assay.name == bio_assay_name)
        {
            return Err(ExperimentError::DuplicateBioAssay(bio_assay_name.to_string()));
        }

        let bio_material_id = match self.bio_material_by_name(bio_material_name) {
            Some(bio_material) => bio_material.id,
            None => {
                let id = BioMaterialId(
                    self.bio_materials
                        .keys()
                        .last()
                        .map_or(1, |id| id.0 + 1),
                );
                self.bio_materials
                    .insert(id, BioMaterial::new(id, bio_material_name.to_string()));
                info!("Added sample. name: '{}', id: {}", bio_material_name, id);
                id
            }
        };

        self.bio_assays.push(BioAssay {
            name: bio_assay_name.to_string(),
            accession,
            bio_material: bio_material_id,
        });

        Ok(bio_material_id)
    }

    pub fn bio_materials(&self) -> impl Iterator<Item = &BioMaterial> {
        self.bio_materials.values()
    }

    pub fn bio_material(&self, id: &BioMaterialId) -> Option<&BioMaterial> {
        self.bio_materials.get(id)
    }

    pub fn bio_material_by_name(&self, name: &str) -> Option<&BioMaterial> {
        self.bio_materials
            .values()
            .find(|bio_material| bio_material.name == name)
    }

    pub fn bio_assays(&self) -> &[BioAssay] {
        &self.bio_assays
    }

    pub fn bio_assays_for<'a>(&'a self, id: &'a BioMaterialId) -> impl Iterator<Item = &'a BioAssay> + 'a {
        self.bio_assays
            .iter()
            .filter(move |bio_assay| bio_assay.bio_material.eq(id))
    }

    pub fn design(&self) -> &ExperimentalDesign {
        &self.design
    }

    pub fn design_mut(&mut self) -> &mut ExperimentalDesign {
        &mut self.design
    }

    pub fn replace_design(&mut self, design: ExperimentalDesign) {
        self.design = design;
    }

    /// Replaces the stored sample that has the same id as `bio_material`.
    pub fn replace_bio_material(&mut self, bio_material: BioMaterial) -> Result<(), ExperimentError> {
        let existing = self
            .bio_materials
            .get_mut(&bio_material.id)
            .ok_or(ExperimentError::UnknownBioMaterial(bio_material.id))?;

        *existing = bio_material;

        Ok(())
    }

    /// The column name used for a sample in exported data files.
    ///
    /// `<sample>___<assay>[.<assay>...]`, with anything other than ASCII alphanumerics, `_` and `.` replaced by
    /// `_`.
    pub fn export_name(&self, id: &BioMaterialId) -> Option<String> {
        let bio_material = self.bio_materials.get(id)?;

        let bio_assay_names = self
            .bio_assays_for(id)
            .map(|bio_assay| bio_assay.name.as_str())
            .join(".");

        let name = format!("{}{}{}", bio_material.name, EXPORT_NAME_DELIMITER, bio_assay_names);

        Some(mangle(&name))
    }

    /// Records that sample `bio_material` has value `id` for `factor`.
    ///
    /// The value must already exist on the factor, and the sample must not have a value for that factor yet.
    pub fn assign_factor_value(
        &mut self,
        bio_material: &BioMaterialId,
        factor: &FactorName,
        id: FactorValueId,
    ) -> Result<(), FactorValueAssignmentError> {
        if self
            .design
            .factor_value(factor, &id)
            .is_none()
        {
            return Err(FactorValueAssignmentError::UnknownFactorValue {
                factor: factor.clone(),
                id,
            });
        }

        let bio_material = self
            .bio_materials
            .get_mut(bio_material)
            .ok_or(FactorValueAssignmentError::UnknownBioMaterial(*bio_material))?;

        bio_material.assign_factor_value(factor, id)
    }

    /// Values of `factor` that at least one sample refers to.
    pub fn referenced_factor_values(&self, factor: &FactorName) -> BTreeSet<FactorValueId> {
        self.bio_materials
            .values()
            .filter_map(|bio_material| bio_material.factor_value(factor))
            .collect()
    }

    pub fn bio_materials_without_value<'a>(
        &'a self,
        factor: &'a FactorName,
    ) -> impl Iterator<Item = &'a BioMaterial> + 'a {
        self.bio_materials
            .values()
            .filter(move |bio_material| bio_material.factor_value(factor).is_none())
    }

    /// Removes the values of `factor` that no sample refers to.
    pub fn prune_unused_factor_values(&mut self, factor: &FactorName) -> Result<Vec<FactorValue>, DesignError> {
        let used = self.referenced_factor_values(factor);

        self.design
            .prune_unused_values(factor, &used)
    }
}

fn mangle(name: &str) -> String {
    name.chars()
        .map(|c| match c.is_ascii_alphanumeric() || c == '_' || c == '.' {
            true => c,
            false => '_',
        })
        .collect()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    #[error("Duplicate bio assay. name: '{0}'")]
    DuplicateBioAssay(String),
    #[error("Unknown sample. id: {0}")]
    UnknownBioMaterial(BioMaterialId),
}
