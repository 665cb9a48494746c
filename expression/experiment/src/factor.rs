use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde_with::serde_as;

use crate::characteristic::{Characteristic, OntologyTerm};
use crate::ids::FactorValueId;
use crate::measurement::Measurement;
use crate::names::FactorName;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum FactorType {
    Categorical,
    Continuous,
}

impl FactorType {
    /// Maps a declared type, case-insensitively.
    ///
    /// Returns `None` for anything other than `categorical` or `continuous`; callers decide the fallback.
    pub fn from_declared(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "categorical" => Some(FactorType::Categorical),
            "continuous" => Some(FactorType::Continuous),
            _ => None,
        }
    }
}

impl Display for FactorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FactorType::Categorical => f.write_str("Categorical"),
            FactorType::Continuous => f.write_str("Continuous"),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub enum FactorValueKind {
    Characteristic(Characteristic),
    Measurement(Measurement),
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct FactorValue {
    pub id: FactorValueId,
    pub factor: FactorName,
    pub kind: FactorValueKind,
}

impl FactorValue {
    /// The text a user would see for this value, as written in a design file.
    pub fn value(&self) -> &str {
        match &self.kind {
            FactorValueKind::Characteristic(characteristic) => characteristic.value.as_str(),
            FactorValueKind::Measurement(measurement) => measurement.value.as_str(),
        }
    }

    pub fn measurement(&self) -> Option<&Measurement> {
        match &self.kind {
            FactorValueKind::Measurement(measurement) => Some(measurement),
            FactorValueKind::Characteristic(_) => None,
        }
    }
}

impl Display for FactorValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}='{}'", self.id, self.factor, self.value())
    }
}

#[serde_as]
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct ExperimentalFactor {
    pub name: FactorName,
    pub category: OntologyTerm,
    pub factor_type: FactorType,

    #[serde_as(as = "Vec<(_, _)>")]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    #[serde(default)]
    values: BTreeMap<FactorValueId, FactorValue>,
}

impl ExperimentalFactor {
    pub fn new(name: FactorName, category: OntologyTerm, factor_type: FactorType) -> Self {
        Self {
            name,
            category,
            factor_type,
            values: BTreeMap::default(),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &FactorValue> {
        self.values.values()
    }

    pub fn value(&self, id: &FactorValueId) -> Option<&FactorValue> {
        self.values.get(id)
    }

    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Finds an existing categorical value whose text matches `raw`, ignoring case.
    pub fn find_categorical_value(&self, raw: &str) -> Option<FactorValueId> {
        let wanted = raw.to_lowercase();

        self.values
            .values()
            .find(|factor_value| match &factor_value.kind {
                FactorValueKind::Characteristic(characteristic) => characteristic.value.to_lowercase() == wanted,
                FactorValueKind::Measurement(_) => false,
            })
            .map(|factor_value| factor_value.id)
    }

    /// Only [`crate::design::ExperimentalDesign`] allocates ids, so only it may add values.
    pub(crate) fn insert_value(&mut self, factor_value: FactorValue) {
        self.values
            .insert(factor_value.id, factor_value);
    }

    pub(crate) fn remove_value(&mut self, id: &FactorValueId) -> Option<FactorValue> {
        self.values.remove(id)
    }
}
