use csv::QuoteStyle;

#[derive(Debug, Default, serde::Serialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct TestTermRecord {
    pub label: String,
    pub uri: String,
}

#[derive(Debug, Default, serde::Serialize)]
#[serde(rename_all(serialize = "PascalCase"))]
pub struct TestSampleRecord {
    pub bio_material: String,
    pub bio_assay: String,
    pub accession: String,
}

impl TestSampleRecord {
    /// A sample with one assay whose name is also its accession.
    pub fn with_accession(bio_material: &str, accession: &str) -> Self {
        Self {
            bio_material: bio_material.to_string(),
            bio_assay: accession.to_string(),
            accession: accession.to_string(),
        }
    }
}

/// Renders records as CSV, with a header row.
pub fn as_csv<T: serde::Serialize>(records: &[T]) -> String {
    let content: Vec<u8> = vec![];

    let mut writer = csv::WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(content);

    for record in records.iter() {
        writer.serialize(record).unwrap();
    }

    writer.flush().unwrap();

    String::from_utf8(writer.into_inner().unwrap()).unwrap()
}
