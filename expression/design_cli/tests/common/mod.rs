use std::path::{Path, PathBuf};

use stores::test::{as_csv, TestSampleRecord, TestTermRecord};
use tempfile::TempDir;
use util::test::build_temp_file;

pub struct Context {
    pub temp_dir: TempDir,

    pub trace_log_arg: String,
    pub path_arg: String,
    pub experiment_arg: String,
    pub test_trace_log_path: PathBuf,
    pub test_experiment_path: PathBuf,
    pub samples_path: PathBuf,
    pub vocabulary_path: PathBuf,
}

impl Context {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().unwrap();

        let path_arg = format!("--path {}", temp_dir.path().to_str().unwrap());

        let (test_trace_log_path, _) = build_temp_file(&temp_dir, "trace", "log");
        let trace_log_arg = format!("--trace {}", test_trace_log_path.to_str().unwrap());

        let (test_experiment_path, _) = build_temp_file(&temp_dir, "GSE1", "experiment.json");
        let experiment_arg = "--experiment GSE1".to_string();

        let (samples_path, _) = build_temp_file(&temp_dir, "samples", "csv");
        std::fs::write(
            &samples_path,
            as_csv(&[
                TestSampleRecord::with_accession("f-aa", "GSM1"),
                TestSampleRecord::with_accession("f-ab", "GSM2"),
            ]),
        )
        .unwrap();

        let (vocabulary_path, _) = build_temp_file(&temp_dir, "terms", "csv");
        std::fs::write(
            &vocabulary_path,
            as_csv(&[
                TestTermRecord {
                    label: "age".to_string(),
                    uri: "http://www.ebi.ac.uk/efo/EFO_0000246".to_string(),
                },
                TestTermRecord {
                    label: "treatment".to_string(),
                    uri: "http://www.ebi.ac.uk/efo/EFO_0000727".to_string(),
                },
            ]),
        )
        .unwrap();

        Context {
            temp_dir,
            trace_log_arg,
            path_arg,
            experiment_arg,
            test_trace_log_path,
            test_experiment_path,
            samples_path,
            vocabulary_path,
        }
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let mut path = PathBuf::from(self.temp_dir.path());
        path.push(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn samples_arg(&self) -> String {
        format!("--samples {}", path_str(&self.samples_path))
    }

    pub fn vocabulary_arg(&self) -> String {
        format!("--vocabulary {}", path_str(&self.vocabulary_path))
    }
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}
