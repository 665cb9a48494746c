use experiment::characteristic::OntologyTerm;
use thiserror::Error;

pub const FIELD_LABEL: &str = "Label";
pub const FIELD_URI: &str = "Uri";

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all(deserialize = "PascalCase"))]
pub struct TermRecord {
    pub label: String,
    #[serde(default)]
    pub uri: Option<String>,
}

impl TermRecord {
    pub fn build_term(&self) -> Result<OntologyTerm, RecordError> {
        let label = self.label.trim();
        if label.is_empty() {
            return Err(RecordError::MissingField(FIELD_LABEL));
        }

        Ok(OntologyTerm {
            label: label.to_string(),
            uri: non_blank(self.uri.as_deref()),
        })
    }
}

pub const FIELD_BIO_MATERIAL: &str = "BioMaterial";
pub const FIELD_BIO_ASSAY: &str = "BioAssay";

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all(deserialize = "PascalCase"))]
pub struct SampleRecord {
    pub bio_material: String,
    pub bio_assay: String,
    #[serde(default)]
    pub accession: Option<String>,
}

/// A sample sheet line, checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub bio_material: String,
    pub bio_assay: String,
    pub accession: Option<String>,
}

impl SampleRecord {
    pub fn build_sample(&self) -> Result<Sample, RecordError> {
        let bio_material = self.bio_material.trim();
        if bio_material.is_empty() {
            return Err(RecordError::MissingField(FIELD_BIO_MATERIAL));
        }
        let bio_assay = self.bio_assay.trim();
        if bio_assay.is_empty() {
            return Err(RecordError::MissingField(FIELD_BIO_ASSAY));
        }

        Ok(Sample {
            bio_material: bio_material.to_string(),
            bio_assay: bio_assay.to_string(),
            accession: non_blank(self.accession.as_deref()),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Missing field. field: {0}")]
    MissingField(&'static str),
}
