use std::fmt::{Display, Formatter};

/// Identifies a factor value within a design. Allocated by [`crate::design::ExperimentalDesign`].
#[derive(
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash
)]
pub struct FactorValueId(pub u64);

impl Display for FactorValueId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "FV{}", self.0)
    }
}

/// Identifies a sample within an experiment.
#[derive(
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash
)]
pub struct BioMaterialId(pub u64);

impl Display for BioMaterialId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BM{}", self.0)
    }
}
