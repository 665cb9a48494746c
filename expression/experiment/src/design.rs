use std::collections::BTreeSet;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::factor::{ExperimentalFactor, FactorValue, FactorValueKind};
use crate::ids::FactorValueId;
use crate::names::FactorName;

/// The experimental factors of an experiment, in the order they were added.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ExperimentalDesign {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    #[serde(default)]
    factors: IndexMap<FactorName, ExperimentalFactor>,

    /// The next id to hand out. Ids are never reused, even after a value is pruned.
    #[serde(default)]
    next_factor_value_id: u64,
}

impl ExperimentalDesign {
    pub fn factors(&self) -> impl Iterator<Item = &ExperimentalFactor> {
        self.factors.values()
    }

    pub fn factor(&self, name: &FactorName) -> Option<&ExperimentalFactor> {
        self.factors.get(name)
    }

    pub fn factor_count(&self) -> usize {
        self.factors.len()
    }

    pub fn add_factor(&mut self, factor: ExperimentalFactor) -> Result<(), DesignError> {
        if self.factors.contains_key(&factor.name) {
            return Err(DesignError::DuplicateFactor(factor.name));
        }

        info!(
            "Added factor. name: '{}', category: {}, type: {}",
            factor.name, factor.category, factor.factor_type
        );
        self.factors
            .insert(factor.name.clone(), factor);

        Ok(())
    }

    pub fn factor_value(&self, factor: &FactorName, id: &FactorValueId) -> Option<&FactorValue> {
        self.factors
            .get(factor)
            .and_then(|factor| factor.value(id))
    }

    /// Creates a value on `factor` and returns its newly allocated id.
    pub fn add_factor_value(&mut self, factor: &FactorName, kind: FactorValueKind) -> Result<FactorValueId, DesignError> {
        let next_id = FactorValueId(self.next_factor_value_id + 1);

        let factor = self
            .factors
            .get_mut(factor)
            .ok_or_else(|| DesignError::UnknownFactor(factor.clone()))?;

        let factor_value = FactorValue {
            id: next_id,
            factor: factor.name.clone(),
            kind,
        };
        debug!("Added factor value. value: {}", factor_value);
        factor.insert_value(factor_value);

        self.next_factor_value_id = next_id.0;

        Ok(next_id)
    }

    /// Adds a value that already has an id, e.g. one allocated by another copy of this design.
    ///
    /// Ids allocated afterwards are greater than `factor_value.id`.
    pub fn insert_factor_value(&mut self, factor_value: FactorValue) -> Result<(), DesignError> {
        let factor = self
            .factors
            .get_mut(&factor_value.factor)
            .ok_or_else(|| DesignError::UnknownFactor(factor_value.factor.clone()))?;

        if factor
            .value(&factor_value.id)
            .is_some()
        {
            return Err(DesignError::DuplicateFactorValue(factor_value.id));
        }

        self.next_factor_value_id = self
            .next_factor_value_id
            .max(factor_value.id.0);
        factor.insert_value(factor_value);

        Ok(())
    }

    /// Removes every value of `factor` whose id is not in `used`, returning the removed values.
    ///
    /// Callers outside the crate go through [`crate::experiment::ExpressionExperiment`], which knows which
    /// values its samples reference.
    pub(crate) fn prune_unused_values(
        &mut self,
        factor: &FactorName,
        used: &BTreeSet<FactorValueId>,
    ) -> Result<Vec<FactorValue>, DesignError> {
        let factor = self
            .factors
            .get_mut(factor)
            .ok_or_else(|| DesignError::UnknownFactor(factor.clone()))?;

        let unused: Vec<FactorValueId> = factor
            .values()
            .map(|factor_value| factor_value.id)
            .filter(|id| !used.contains(id))
            .collect();

        let removed: Vec<FactorValue> = unused
            .iter()
            .filter_map(|id| factor.remove_value(id))
            .collect();

        for factor_value in removed.iter() {
            info!("Removed unused factor value. value: {}", factor_value);
        }

        Ok(removed)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DesignError {
    #[error("Duplicate factor. name: '{0}'")]
    DuplicateFactor(FactorName),
    #[error("Unknown factor. name: '{0}'")]
    UnknownFactor(FactorName),
    #[error("Duplicate factor value. id: {0}")]
    DuplicateFactorValue(FactorValueId),
}

#[cfg(test)]
mod experimental_design_tests {
    use std::collections::BTreeSet;

    use crate::characteristic::{Characteristic, OntologyTerm};
    use crate::design::{DesignError, ExperimentalDesign};
    use crate::factor::{ExperimentalFactor, FactorType, FactorValue, FactorValueKind};
    use crate::ids::FactorValueId;
    use crate::measurement::Measurement;
    use crate::names::FactorName;

    fn age() -> ExperimentalFactor {
        ExperimentalFactor::new(
            "Age".parse().unwrap(),
            OntologyTerm {
                label: "age".to_string(),
                uri: None,
            },
            FactorType::Continuous,
        )
    }

    #[test]
    fn duplicate_factor_names_are_rejected() {
        // given
        let mut design = ExperimentalDesign::default();
        design.add_factor(age()).unwrap();

        // when
        let result = design.add_factor(age());

        // then
        assert_eq!(result, Err(DesignError::DuplicateFactor("Age".parse().unwrap())));
        assert_eq!(design.factor_count(), 1);
    }

    #[test]
    fn value_ids_are_never_reused() {
        // given
        let mut design = ExperimentalDesign::default();
        design.add_factor(age()).unwrap();
        let age_name: FactorName = "Age".parse().unwrap();

        // when
        let first = design
            .add_factor_value(&age_name, FactorValueKind::Measurement(Measurement::infer("50")))
            .unwrap();
        design
            .prune_unused_values(&age_name, &BTreeSet::new())
            .unwrap();
        let second = design
            .add_factor_value(&age_name, FactorValueKind::Measurement(Measurement::infer("60")))
            .unwrap();

        // then
        assert_eq!(first, FactorValueId(1));
        assert_eq!(second, FactorValueId(2));
    }

    #[test]
    fn values_cannot_be_added_to_unknown_factors() {
        // given
        let mut design = ExperimentalDesign::default();
        let category = OntologyTerm {
            label: "treatment".to_string(),
            uri: None,
        };

        // when
        let result = design.add_factor_value(
            &"Treatment".parse().unwrap(),
            FactorValueKind::Characteristic(Characteristic::in_category(&category, "control")),
        );

        // then
        assert_eq!(result, Err(DesignError::UnknownFactor("Treatment".parse().unwrap())));
    }

    #[test]
    fn inserted_values_keep_their_ids() {
        // given
        let mut design = ExperimentalDesign::default();
        design.add_factor(age()).unwrap();
        let age_name: FactorName = "Age".parse().unwrap();
        let factor_value = FactorValue {
            id: FactorValueId(7),
            factor: age_name.clone(),
            kind: FactorValueKind::Measurement(Measurement::infer("50")),
        };

        // when
        design
            .insert_factor_value(factor_value.clone())
            .unwrap();
        let duplicate = design.insert_factor_value(factor_value);
        let next = design
            .add_factor_value(&age_name, FactorValueKind::Measurement(Measurement::infer("60")))
            .unwrap();

        // then
        assert_eq!(duplicate, Err(DesignError::DuplicateFactorValue(FactorValueId(7))));
        assert_eq!(next, FactorValueId(8));
    }

    #[test]
    fn prune_keeps_used_values() {
        // given
        let mut design = ExperimentalDesign::default();
        design.add_factor(age()).unwrap();
        let age_name: FactorName = "Age".parse().unwrap();
        let used = design
            .add_factor_value(&age_name, FactorValueKind::Measurement(Measurement::infer("50")))
            .unwrap();
        let unused = design
            .add_factor_value(&age_name, FactorValueKind::Measurement(Measurement::infer("60")))
            .unwrap();

        // when
        let removed = design
            .prune_unused_values(&age_name, &BTreeSet::from([used]))
            .unwrap();

        // then
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, unused);
        assert!(design.factor_value(&age_name, &used).is_some());
        assert!(design.factor_value(&age_name, &unused).is_none());
    }
}
